//! Music catalog lookup - resolves a search term to track metadata.
//!
//! # Architecture
//!
//! This module keeps a clean separation between:
//! - **Domain models** (`domain.rs`) - internal types the rest of the crate uses
//! - **API DTOs** (`dto.rs`) - exact iTunes Search API response shapes
//! - **Adapter** (`adapter.rs`) - converts DTOs to domain models
//! - **Client** (`client.rs`) - the HTTP client
//! - **Traits** (`traits.rs`) - the [`CatalogApi`] seam, mockable in tests
//!
//! The decoupling means catalog API changes don't ripple through the
//! resolver, and the resolver can be tested against mock catalogs.

pub mod adapter;
pub mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use client::ItunesClient;
pub use domain::{CatalogError, SongMatch};
pub use traits::CatalogApi;
