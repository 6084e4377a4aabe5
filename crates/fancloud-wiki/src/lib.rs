//! Encyclopedia lookup and article scraping for oshi profiles.
//!
//! [`WikiClient`] resolves a subject name to its canonical article, fetches
//! the page and hands the HTML to [`parse::parse_profile`], which walks the
//! page through the typed [`document`] layer.

pub mod client;
pub mod document;
pub mod error;
pub mod parse;
pub mod types;

pub use client::{WikiClient, SEARCH_LIMIT};
pub use error::WikiError;
pub use parse::{parse_profile, parse_profile_with, ParseRules, PLACEHOLDER_IMAGE_URL};
