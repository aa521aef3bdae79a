//! HTTP client for the compliance-console identity service.
//!
//! Implements the session crate's `IdentityService` over three endpoints
//! relative to the configured API base URL:
//!
//! - `GET auth/me` resolves a bearer token into a profile
//! - `POST auth/refresh` exchanges a refresh token for an access token
//! - `POST auth/login` exchanges credentials for a token pair
//!
//! The client works both natively and in the browser (reqwest's fetch
//! backend on `wasm32`).

mod client;
mod types;

pub use client::HttpIdentityService;
