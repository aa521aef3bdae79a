//! Page components for the application.

pub mod admin;
pub mod home;
pub mod login;

pub use admin::AdminPage;
pub use home::HomePage;
pub use login::LoginPage;
