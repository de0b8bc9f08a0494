//! # Dex Core
//!
//! Core types, errors, and traits shared by the dex catalog crates.
//!
//! - **Types**: catalog payloads (list pages, creature details) and the
//!   [`Creature`] domain model built from them
//! - **Errors**: the [`DexError`] taxonomy used across cache and client
//! - **Constants**: catalog endpoints and cache defaults
//! - **Traits**: the [`ByteStore`] seam for durable cache backends
//!
//! ## Example
//!
//! ```rust
//! use dex_core::{CatalogPayload, ListPage};
//!
//! let page: ListPage = serde_json::from_str(
//!     r#"{"count":1,"next":null,"previous":null,"results":[{"name":"bulbasaur","url":"u"}]}"#,
//! ).unwrap();
//! let payload = CatalogPayload::List(page);
//! assert_eq!(payload.kind(), "list");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{DexError, Result};
pub use traits::*;
pub use types::*;
