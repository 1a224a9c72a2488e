// src/links/mod.rs
// =============================================================================
// Everything that happens to links once a page body is in hand.
//
// Submodules:
// - extension: keeps/drops URLs by the file extension of their path
// - html: pulls raw href values out of a page
// - reconcile: splits links into site-wide ("root") and page-specific sets
// =============================================================================

mod extension;
mod html;
mod reconcile;

pub use extension::{drop_denied_extensions, keep_allowed_extensions};
pub use html::extract_hrefs;
pub use reconcile::{reconcile, PageLinks, ROOT_URL};
