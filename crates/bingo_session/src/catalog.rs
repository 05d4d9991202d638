//! Identifier map: the session's name/id dictionary.
//!
//! Translates protocol identifiers to board-cell and location names and back.
//! Built exactly once per session from the data-package payload, after the
//! `Connected` handshake has established which location ids belong to this
//! session; immutable afterwards and rebuilt from scratch on reconnect.

use bingo_protocol::{GameData, ItemId, LocationId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Bidirectional name/id lookup for items and locations.
///
/// The data package describes every game on the server, and even this game's
/// entry may cover locations belonging to other sessions sharing the same
/// dictionaries. Location entries are therefore filtered to the session's
/// location universe before indexing; a lookup that misses is expected data
/// scoping, not an error.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    item_name_to_id: HashMap<String, ItemId>,
    item_id_to_name: HashMap<ItemId, String>,
    location_name_to_id: HashMap<String, LocationId>,
    location_id_to_name: HashMap<LocationId, String>,
}

impl IdentifierMap {
    /// Builds the session's identifier map.
    ///
    /// `location_universe` is the set of location ids relevant to this
    /// session, taken from the `Connected` handshake; `game` is this game's
    /// entry in the data package. Location entries outside the universe are
    /// discarded. Calling this before the universe is known yields an empty,
    /// unusable map (logged, not fatal) - the caller must defer and retry
    /// once `Connected` has been processed.
    pub fn build(location_universe: &HashSet<LocationId>, game: &GameData) -> Self {
        if location_universe.is_empty() {
            warn!("identifier map requested before the location universe is known; returning an empty map");
            return Self::default();
        }

        let location_name_to_id: HashMap<String, LocationId> = game
            .location_name_to_id
            .iter()
            .filter(|(_, id)| location_universe.contains(id))
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        let location_id_to_name = location_name_to_id
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect();

        let item_name_to_id: HashMap<String, ItemId> = game
            .item_name_to_id
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        let item_id_to_name = item_name_to_id
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect();

        let map = Self {
            item_name_to_id,
            item_id_to_name,
            location_name_to_id,
            location_id_to_name,
        };
        debug!(
            items = map.item_name_to_id.len(),
            locations = map.location_name_to_id.len(),
            "identifier map built"
        );
        map
    }

    /// Resolves an item id to its semantic name (a board cell for this game).
    pub fn item_name(&self, id: ItemId) -> Option<&str> {
        self.item_id_to_name.get(&id).map(String::as_str)
    }

    /// Resolves an item name to its protocol id.
    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Resolves a location name to its protocol id, if it belongs to this session.
    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.location_name_to_id.get(name).copied()
    }

    /// Resolves a location id to its name, if it belongs to this session.
    pub fn location_name(&self, id: LocationId) -> Option<&str> {
        self.location_id_to_name.get(&id).map(String::as_str)
    }

    /// Number of locations indexed for this session.
    pub fn location_count(&self) -> usize {
        self.location_name_to_id.len()
    }

    /// Whether the map holds no usable entries.
    pub fn is_empty(&self) -> bool {
        self.item_name_to_id.is_empty() && self.location_name_to_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_data() -> GameData {
        GameData {
            item_name_to_id: [("A1".to_string(), ItemId(1))].into_iter().collect(),
            location_name_to_id: [
                ("Bingo (A1-A5)-0".to_string(), LocationId(10)),
                ("Bingo (A1-A5)-1".to_string(), LocationId(11)),
                ("Bingo (B1-B5)-0".to_string(), LocationId(12)),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn filters_locations_to_the_session_universe() {
        let universe: HashSet<LocationId> = [LocationId(10), LocationId(11)].into_iter().collect();
        let map = IdentifierMap::build(&universe, &game_data());

        assert_eq!(map.location_id("Bingo (A1-A5)-0"), Some(LocationId(10)));
        assert_eq!(map.location_id("Bingo (A1-A5)-1"), Some(LocationId(11)));
        assert_eq!(map.location_id("Bingo (B1-B5)-0"), None);
        assert_eq!(map.location_count(), 2);
        assert_eq!(map.item_name(ItemId(1)), Some("A1"));
    }

    #[test]
    fn empty_universe_yields_unusable_map() {
        let map = IdentifierMap::build(&HashSet::new(), &game_data());
        assert!(map.is_empty());
    }
}
