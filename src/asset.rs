//! Asset loading contract and the handle tables built on top of it.
//!
//! The simulation never decodes images itself. It asks an [`AssetLoader`] for opaque
//! [`AssetHandle`]s and hands those back to the renderer when drawing.

use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use tracing::{debug, trace};

use crate::constants::PURSUER_COUNT;
use crate::error::AssetError;
use crate::map::catalog::TileCatalog;
use crate::map::palette::Palette;

/// Number of bonus item sprites shipped with the content.
pub const BONUS_KINDS: u32 = 5;

/// An opaque reference to something the renderer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u32);

/// Loads drawable assets by path.
pub trait AssetLoader {
    fn load(&mut self, path: &str) -> Result<AssetHandle, AssetError>;

    /// Loads a maze tile, recolored with `palette`. Loaders that do not recolor can rely on
    /// the default, which ignores the palette.
    fn load_tile(&mut self, path: &str, palette: &Palette) -> Result<AssetHandle, AssetError> {
        let _ = palette;
        self.load(path)
    }
}

/// A loader that hands out sequential handles without touching the filesystem.
#[derive(Debug, Default)]
pub struct NullAssets {
    next: u32,
}

impl AssetLoader for NullAssets {
    fn load(&mut self, path: &str) -> Result<AssetHandle, AssetError> {
        let handle = AssetHandle(self.next);
        self.next += 1;
        trace!(path, handle = handle.0, "Null asset issued");
        Ok(handle)
    }
}

/// Non-send resource wrapper for the host's asset loader.
pub struct AssetResource(pub Box<dyn AssetLoader>);

/// Tile images for the current palette, keyed by tile id.
#[derive(Resource, Debug, Default, Clone)]
pub struct TileImages {
    images: HashMap<u32, AssetHandle>,
}

impl TileImages {
    /// Reloads every catalog tile with the given palette.
    ///
    /// # Errors
    ///
    /// Propagates the first loader failure; a missing tile image is a fatal content error.
    pub fn reload(
        &mut self,
        catalog: &TileCatalog,
        palette: &Palette,
        loader: &mut dyn AssetLoader,
    ) -> Result<(), AssetError> {
        self.images.clear();
        for (id, _) in catalog.iter() {
            if let Some(path) = catalog.image_path(id) {
                let handle = loader.load_tile(&path, palette)?;
                self.images.insert(id, handle);
            }
        }
        debug!(count = self.images.len(), "Tile images loaded");
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<AssetHandle> {
        self.images.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Handles for every mover sprite.
#[derive(Resource, Debug, Clone)]
pub struct SpriteSet {
    pub player: AssetHandle,
    pub pursuers: [AssetHandle; PURSUER_COUNT],
    pub frightened: AssetHandle,
    pub bonus: Vec<AssetHandle>,
}

impl SpriteSet {
    pub fn load(loader: &mut dyn AssetLoader) -> Result<Self, AssetError> {
        let player = loader.load("sprite/pacman.gif")?;
        let mut pursuers = [AssetHandle(0); PURSUER_COUNT];
        for (id, handle) in pursuers.iter_mut().enumerate() {
            *handle = loader.load(&format!("sprite/ghost {}.gif", id + 1))?;
        }
        let frightened = loader.load("sprite/ghost 5.gif")?;
        let bonus = (0..BONUS_KINDS)
            .map(|kind| loader.load(&format!("sprite/fruit {kind}.gif")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            player,
            pursuers,
            frightened,
            bonus,
        })
    }

    /// Sprite for a bonus item kind; unknown kinds wrap around.
    pub fn bonus(&self, kind: u32) -> Option<AssetHandle> {
        if self.bonus.is_empty() {
            return None;
        }
        self.bonus.get(kind as usize % self.bonus.len()).copied()
    }
}
