// 📦 Catalogue Model - entries as the remote API describes them
// Wire shapes (serde) are kept separate from the domain types the UI works with

use serde::Deserialize;

// ============================================================================
// DOMAIN TYPES
// ============================================================================

/// One catalogue entry. Immutable once fetched; `id` is the natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// 1-based identifier, same numbering as the remote catalogue
    pub id: u32,

    pub name: String,

    /// Types in the order the source lists them
    pub types: Vec<TypeSlot>,

    pub abilities: Vec<String>,

    /// Units as returned by the source (decimetres)
    pub height: u32,

    /// Units as returned by the source (hectograms)
    pub weight: u32,

    /// Base stats in source order
    pub stats: Vec<Stat>,
}

impl Entry {
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }
}

/// A type the entry belongs to, plus where to look up its damage relations
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSlot {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub name: String,
    pub base_value: u32,
}

/// Summary row from the paginated list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Summary {
    pub name: String,
    pub url: String,
}

/// Everything the detail overlay shows for one entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDetail {
    pub entry: Entry,

    /// Egg groups from the species endpoint
    pub categories: Vec<String>,

    /// De-duplicated union of "double damage from" across all types
    pub weaknesses: Vec<String>,
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub results: Vec<Summary>,
}

#[derive(Debug, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct EntryResponse {
    pub id: u32,
    pub name: String,
    pub types: Vec<TypeSlotResponse>,
    pub abilities: Vec<AbilitySlotResponse>,
    pub height: u32,
    pub weight: u32,
    pub stats: Vec<StatResponse>,
}

#[derive(Debug, Deserialize)]
pub struct TypeSlotResponse {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct AbilitySlotResponse {
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct StatResponse {
    pub stat: NamedResource,
    pub base_stat: u32,
}

#[derive(Debug, Deserialize)]
pub struct SpeciesResponse {
    pub egg_groups: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
pub struct TypeDetailResponse {
    pub damage_relations: DamageRelations,
}

#[derive(Debug, Deserialize)]
pub struct DamageRelations {
    pub double_damage_from: Vec<NamedResource>,
}

impl From<EntryResponse> for Entry {
    fn from(raw: EntryResponse) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            types: raw
                .types
                .into_iter()
                .map(|slot| TypeSlot {
                    name: slot.kind.name,
                    url: slot.kind.url,
                })
                .collect(),
            abilities: raw.abilities.into_iter().map(|a| a.ability.name).collect(),
            height: raw.height,
            weight: raw.weight,
            stats: raw
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base_value: s.base_stat,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_wire_keeps_source_order() {
        let raw: EntryResponse = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "bulbasaur",
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "http://x/type/12/"}},
                {"slot": 2, "type": {"name": "poison", "url": "http://x/type/4/"}}
            ],
            "abilities": [
                {"ability": {"name": "overgrow", "url": "http://x/ability/65/"}},
                {"ability": {"name": "chlorophyll", "url": "http://x/ability/34/"}}
            ],
            "height": 7,
            "weight": 69,
            "stats": [
                {"base_stat": 45, "effort": 0, "stat": {"name": "hp"}},
                {"base_stat": 65, "effort": 1, "stat": {"name": "special-attack"}}
            ]
        }))
        .unwrap();

        let entry = Entry::from(raw);

        assert_eq!(entry.id, 1);
        assert_eq!(entry.type_names(), vec!["grass", "poison"]);
        assert_eq!(entry.types[1].url, "http://x/type/4/");
        assert_eq!(entry.abilities, vec!["overgrow", "chlorophyll"]);
        assert_eq!(entry.stats[1].name, "special-attack");
        assert_eq!(entry.stats[1].base_value, 65);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let raw = serde_json::from_value::<EntryResponse>(serde_json::json!({
            "id": 1,
            "name": "bulbasaur"
        }));

        assert!(raw.is_err());
    }
}
