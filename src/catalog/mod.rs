//! Remote artwork catalog (iTunes Search API)
//!
//! Turns a free-text query into an ordered list of [`Candidate`]s whose
//! thumbnails can be shown in the picker. The provider decides the ranking;
//! nothing here re-sorts results.

pub mod dto;
pub mod domain;
mod client;
pub mod traits;

pub use client::ItunesClient;
pub use domain::{Candidate, CatalogError};
pub use traits::CatalogApi;
