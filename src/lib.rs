//! `KerkPoint` - church service schedules, collection goals and sermon feeds.
//!
//! This crate wraps the `KerkPoint` REST API behind a caching client and turns
//! its records into display-ready widgets for a church website.


// Re-export public modules for use in integration tests and as a library
pub mod admin;
pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod feed;
pub mod locale;
pub mod projection;
pub mod qr;
pub mod settings;
pub mod types;
