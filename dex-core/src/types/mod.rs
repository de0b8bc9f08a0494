//! Domain types for the dex catalog.
//!
//! - [`ListPage`]: one page of creature summaries plus paging links
//! - [`CreatureDetails`]: the subset of a creature record the client reads
//! - [`CatalogPayload`]: what the cache stores for either request kind
//! - [`Creature`]: the view-facing model built from either payload

mod catalog;
mod creature;

pub use catalog::*;
pub use creature::*;
