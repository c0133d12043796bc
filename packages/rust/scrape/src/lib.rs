//! Listing extraction and detail enrichment for the project site.
//!
//! This crate provides:
//! - [`list_projects`] — fetch the listing page, one [`ListingItem`] per project
//! - [`fetch_description`] — fetch one project's long-form description
//! - [`Markup`] — the site-specific selectors both of them rely on
//!
//! [`ListingItem`]: projectbook_shared::ListingItem

pub mod detail;
pub mod listing;
pub mod selectors;

pub use detail::{fetch_description, parse_description};
pub use listing::{list_projects, parse_listing};
pub use selectors::{Markup, RawItem};
