//! Catalog API payloads.
//!
//! Only the fields the client reads are modelled; anything else in the
//! catalog's JSON is ignored on deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named link to another catalog resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g. "grass")
    pub name: String,
    /// Absolute URL of the resource
    #[serde(default)]
    pub url: String,
}

/// A creature summary as it appears in a list page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Creature name
    pub name: String,
    /// Details URL for this creature
    pub url: String,
}

/// One page of the creature list.
///
/// `next` and `previous` are opaque locators: pass them back to
/// `fetch_list` to move through the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    /// Total number of creatures in the catalog
    pub count: u64,
    /// URL of the following page, if any
    pub next: Option<String>,
    /// URL of the preceding page, if any
    pub previous: Option<String>,
    /// Summaries on this page
    pub results: Vec<ListEntry>,
}

impl ListPage {
    /// Returns true if there is a following page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// A type slot of a creature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    /// The type
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// A move a creature can learn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    /// The move
    #[serde(rename = "move")]
    pub entry: NamedResource,
}

/// Full record for one creature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureDetails {
    /// Catalog identifier
    pub id: u64,
    /// Creature name
    pub name: String,
    /// Type slots, in catalog order
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Learnable moves
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
    /// Sprite URLs keyed by description; values may be null or nested sets
    #[serde(default)]
    pub sprites: BTreeMap<String, serde_json::Value>,
}

/// A parsed catalog response, as stored in the cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CatalogPayload {
    /// A list page
    List(ListPage),
    /// A single creature record
    Details(CreatureDetails),
}

impl CatalogPayload {
    /// Short name of the payload kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogPayload::List(_) => "list",
            CatalogPayload::Details(_) => "details",
        }
    }
}
