//! `Result` alias shared by the service clients.
//!
//! Domain error enums live next to the code that raises them; this alias
//! carries them as a `rootcause::Report` across async calls.

use rootcause::Report;

/// `std::result::Result` with a `Report<C>` error.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Rejected;

    impl std::fmt::Display for Rejected {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("request rejected")
        }
    }

    impl std::error::Error for Rejected {}

    fn reject() -> Result<u16, Rejected> {
        Err(Rejected.into())
    }

    #[test]
    fn report_keeps_the_domain_error_message() {
        let err = reject().unwrap_err();
        assert!(err.to_string().contains("request rejected"));
    }
}
