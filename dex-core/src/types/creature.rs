//! The view-facing creature model.

use serde::{Deserialize, Serialize};

use super::catalog::{CreatureDetails, ListEntry};

/// A displayable image of a creature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureImage {
    /// Human-readable label (e.g. "Front shiny")
    pub description: String,
    /// Image URL
    pub url: String,
}

/// A creature as shown to users.
///
/// Built either from a list entry (name and URL only) or from a full
/// details record (id, types, moves, images).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    /// Creature name
    pub name: String,
    /// Details URL, when built from a list entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Catalog identifier, when built from details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Capitalized type names
    #[serde(default)]
    pub types: Vec<String>,
    /// Move names
    #[serde(default)]
    pub moves: Vec<String>,
    /// Top-level sprite images
    #[serde(default)]
    pub images: Vec<CreatureImage>,
}

impl Creature {
    /// Returns true if this creature was built from a full record.
    pub fn has_details(&self) -> bool {
        self.id.is_some()
    }
}

impl From<&ListEntry> for Creature {
    fn from(entry: &ListEntry) -> Self {
        Self {
            name: entry.name.clone(),
            url: Some(entry.url.clone()),
            ..Default::default()
        }
    }
}

impl From<CreatureDetails> for Creature {
    fn from(details: CreatureDetails) -> Self {
        let types = details
            .types
            .iter()
            .map(|slot| capitalize(&slot.kind.name))
            .collect();
        let moves = details.moves.into_iter().map(|slot| slot.entry.name).collect();

        // Nested sprite sets (other, versions) are skipped
        let images = details
            .sprites
            .iter()
            .filter_map(|(key, value)| {
                value.as_str().filter(|url| !url.is_empty()).map(|url| CreatureImage {
                    description: capitalize(&key.replace('_', " ")),
                    url: url.to_string(),
                })
            })
            .collect();

        Self {
            name: details.name,
            url: None,
            id: Some(details.id),
            types,
            moves,
            images,
        }
    }
}

/// Uppercases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sample_details() -> CreatureDetails {
        serde_json::from_value(serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}],
            "moves": [
                {"move": {"name": "mega-punch", "url": ""}},
                {"move": {"name": "pay-day", "url": ""}}
            ],
            "sprites": {
                "front_default": "https://img.test/25.png",
                "front_shiny": "https://img.test/shiny/25.png",
                "back_female": null,
                "other": {"dream_world": {"front_default": "https://img.test/dw/25.svg"}}
            }
        }))
        .unwrap()
    }

    #[test_case("grass", "Grass")]
    #[test_case("front shiny", "Front shiny")]
    #[test_case("", "")]
    #[test_case("élan", "Élan")]
    fn test_capitalize(input: &str, expected: &str) {
        assert_eq!(capitalize(input), expected);
    }

    #[test]
    fn test_creature_from_details() {
        let creature = Creature::from(sample_details());

        assert_eq!(creature.name, "pikachu");
        assert_eq!(creature.id, Some(25));
        assert!(creature.has_details());
        assert_eq!(creature.types, vec!["Electric"]);
        assert_eq!(creature.moves, vec!["mega-punch", "pay-day"]);

        let descriptions: Vec<_> = creature.images.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Front default", "Front shiny"]);
    }

    #[test]
    fn test_creature_from_list_entry() {
        let entry = ListEntry {
            name: "ivysaur".into(),
            url: "https://pokeapi.co/api/v2/pokemon/2/".into(),
        };
        let creature = Creature::from(&entry);

        assert_eq!(creature.name, "ivysaur");
        assert_eq!(creature.url.as_deref(), Some("https://pokeapi.co/api/v2/pokemon/2/"));
        assert!(!creature.has_details());
        assert!(creature.images.is_empty());
    }
}
