//! The tile cross-reference table: which name (and therefore which image) belongs to each id.

use std::collections::{BTreeMap, HashMap};

use bevy_ecs::resource::Resource;
use tracing::{debug, trace};

use crate::constants::tile;
use crate::error::CatalogError;

/// Names every catalog must define.
pub const REQUIRED_NAMES: [&str; 5] = ["pellet", "ghost-door", "door-h", "door-v", "glasses"];

/// Ids of the tiles the simulation reacts to by name rather than by fixed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTiles {
    pub pellet: u32,
    pub ghost_door: u32,
    pub door_horizontal: u32,
    pub door_vertical: u32,
    pub glasses: u32,
}

/// Owns the id/name tables for one set of content.
#[derive(Resource, Debug, Clone)]
pub struct TileCatalog {
    names: BTreeMap<u32, String>,
    ids: HashMap<String, u32>,
    special: SpecialTiles,
}

impl TileCatalog {
    /// Parses the cross-reference text.
    ///
    /// Each meaningful line is `<id> <name>`; blank lines, lines starting with `#` or `'`,
    /// and lines with fewer than two fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`] when an id is not a number, and
    /// [`CatalogError::MissingName`] when any of [`REQUIRED_NAMES`] is absent.
    /// Level files count pellets by the fixed id 2, so a catalog that maps `pellet`
    /// anywhere else is rejected with [`CatalogError::PelletId`].
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut names = BTreeMap::new();
        let mut ids = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let (Some(first), Some(name)) = (fields.next(), fields.next()) else {
                continue;
            };
            if first.starts_with('#') || first.starts_with('\'') {
                continue;
            }

            let id: u32 = first.parse().map_err(|_| CatalogError::InvalidId {
                line: index + 1,
                token: first.to_string(),
            })?;

            trace!(id, name, "Catalog entry");
            names.insert(id, name.to_string());
            ids.insert(name.to_string(), id);
        }

        let lookup = |name: &'static str| ids.get(name).copied().ok_or(CatalogError::MissingName(name));
        let special = SpecialTiles {
            pellet: lookup("pellet")?,
            ghost_door: lookup("ghost-door")?,
            door_horizontal: lookup("door-h")?,
            door_vertical: lookup("door-v")?,
            glasses: lookup("glasses")?,
        };
        if special.pellet != tile::PELLET {
            return Err(CatalogError::PelletId(special.pellet));
        }

        debug!(entries = names.len(), "Tile catalog parsed");
        Ok(Self { names, ids, special })
    }

    pub fn special(&self) -> SpecialTiles {
        self.special
    }

    pub fn id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// The image path of a tile, or `None` for unknown ids and tiles drawn as nothing.
    pub fn image_path(&self, id: u32) -> Option<String> {
        if id == tile::BLANK_IMAGE {
            return None;
        }
        self.name(id).map(|name| format!("tiles/{name}.gif"))
    }

    /// All entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
# comment line
' another comment
2 pellet
3 pellet-power
5 ghost-door
6 door-h
7 door-v
8 glasses
23 blank
100 wall-straight
";

    #[test]
    fn parses_entries_and_special_ids() {
        let catalog = TileCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.special().ghost_door, 5);
        assert_eq!(catalog.id("pellet-power"), Some(3));
        assert_eq!(catalog.name(100), Some("wall-straight"));
    }

    #[test]
    fn blank_tile_has_no_image() {
        let catalog = TileCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.image_path(23), None);
        assert_eq!(catalog.image_path(6).as_deref(), Some("tiles/door-h.gif"));
    }

    #[test]
    fn pellet_must_keep_its_level_id() {
        let text = CATALOG.replace("2 pellet\n", "9 pellet\n");
        assert_eq!(TileCatalog::parse(&text).unwrap_err(), CatalogError::PelletId(9));
    }

    #[test]
    fn missing_required_name_is_an_error() {
        let text = CATALOG.replace("8 glasses", "");
        assert_eq!(
            TileCatalog::parse(&text).unwrap_err(),
            CatalogError::MissingName("glasses")
        );
    }

    #[test]
    fn non_numeric_id_is_an_error() {
        let text = format!("{CATALOG}x7 oops\n");
        assert!(matches!(
            TileCatalog::parse(&text),
            Err(CatalogError::InvalidId { line: 11, .. })
        ));
    }
}
