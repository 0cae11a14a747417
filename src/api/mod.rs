//! KerkPoint API integration.
//!
//! Provides the authenticated client for the four upstream resources,
//! including cache handling, fetch-status bookkeeping and derived lookups.

/// API client with cache lifecycle and lookup maps
pub mod client;
/// HTTP transport seam
pub mod transport;
/// Data types representing KerkPoint resources
pub mod types;

// Re-export key components
pub use client::KerkPointClient;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::{Building, CollectionGoal, Preacher, Resource, Service};
