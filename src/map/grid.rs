//! The tile grid of the current level.

use bevy_ecs::resource::Resource;
use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::constants::{tile, TILE_SIZE};
use crate::map::catalog::SpecialTiles;
use crate::map::geometry::{cell_origin, neighborhood, overlaps};
use crate::map::parser::LevelDefinition;

/// Something a mover picked up or triggered while passing over the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    Pellet,
    PowerPellet,
    /// The mover stepped into a door and must be moved to this pixel position.
    Teleport(IVec2),
}

/// Width-by-height tile ids for the loaded level, plus the pellet counter.
///
/// Any query outside the grid behaves as a wall (for [`TileGrid::is_wall`]) or as an empty
/// cell (for [`TileGrid::tile`]), so per-tick lookups never need to bounds-check first.
#[derive(Resource, Debug, Clone)]
pub struct TileGrid {
    size: IVec2,
    tiles: Vec<u32>,
    special: SpecialTiles,
    pellets: u32,
}

impl TileGrid {
    pub fn new(level: &LevelDefinition, special: SpecialTiles) -> Self {
        Self {
            size: level.size,
            tiles: level.tiles.clone(),
            special,
            pellets: level.pellets,
        }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Size of the maze in pixels.
    pub fn pixel_size(&self) -> IVec2 {
        self.size * TILE_SIZE
    }

    pub fn special(&self) -> SpecialTiles {
        self.special
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell).then(|| (cell.y * self.size.x + cell.x) as usize)
    }

    /// The id at `cell`, or empty when out of bounds.
    pub fn tile(&self, cell: IVec2) -> u32 {
        self.index(cell).map_or(tile::EMPTY, |i| self.tiles[i])
    }

    /// Overwrites a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: IVec2, id: u32) {
        if let Some(i) = self.index(cell) {
            self.tiles[i] = id;
        }
    }

    pub fn is_wall(&self, cell: IVec2) -> bool {
        if !self.in_bounds(cell) {
            return true;
        }
        (tile::WALL_FIRST..=tile::WALL_LAST).contains(&self.tile(cell))
    }

    pub fn pellets_remaining(&self) -> u32 {
        self.pellets
    }

    /// Iterates every in-bounds cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.size.y).flat_map(move |y| (0..self.size.x).map(move |x| IVec2::new(x, y)))
    }

    /// Whether a mover placed at `pos` would overlap a wall in the 3x3 neighborhood of `cell`.
    pub fn hits_wall(&self, pos: IVec2, cell: IVec2) -> bool {
        neighborhood(cell).any(|c| overlaps(pos, c) && self.is_wall(c))
    }

    /// Consumes whatever the mover at `pos` overlaps around `cell`.
    ///
    /// Pellets and power pellets are cleared from the grid; the pellet counter drops by one
    /// per regular pellet. A door moves the mover to the paired door on the same row
    /// (horizontal) or column (vertical), one tile further along its direction of travel;
    /// scanning stops after a teleport since the mover is no longer here.
    pub fn consume_at(&mut self, pos: IVec2, cell: IVec2, velocity: IVec2) -> SmallVec<[Pickup; 4]> {
        let mut pickups = SmallVec::new();

        for c in neighborhood(cell) {
            if !overlaps(pos, c) {
                continue;
            }

            let id = self.tile(c);
            if id == self.special.pellet {
                self.set(c, tile::EMPTY);
                self.pellets = self.pellets.saturating_sub(1);
                trace!(cell = ?c, remaining = self.pellets, "Pellet consumed");
                pickups.push(Pickup::Pellet);
            } else if id == tile::POWER_PELLET {
                self.set(c, tile::EMPTY);
                trace!(cell = ?c, "Power pellet consumed");
                pickups.push(Pickup::PowerPellet);
            } else if id == self.special.door_horizontal || id == self.special.door_vertical {
                if let Some(target) = self.door_exit(c, id, pos, velocity) {
                    debug!(from = ?c, to = ?target, "Door teleport");
                    pickups.push(Pickup::Teleport(target));
                    break;
                }
            }
        }

        pickups
    }

    /// The pixel position a mover arrives at after entering the door at `door`.
    fn door_exit(&self, door: IVec2, id: u32, pos: IVec2, velocity: IVec2) -> Option<IVec2> {
        let partner = self.door_partner(door, id)?;
        let origin = cell_origin(partner);

        Some(if id == self.special.door_horizontal {
            let shift = if velocity.x > 0 { TILE_SIZE } else { -TILE_SIZE };
            IVec2::new(origin.x + shift, pos.y)
        } else {
            let shift = if velocity.y > 0 { TILE_SIZE } else { -TILE_SIZE };
            IVec2::new(pos.x, origin.y + shift)
        })
    }

    /// First door of the same kind on the same row (horizontal) or column (vertical).
    fn door_partner(&self, door: IVec2, id: u32) -> Option<IVec2> {
        if id == self.special.door_horizontal {
            (0..self.size.x)
                .map(|x| IVec2::new(x, door.y))
                .find(|&c| c != door && self.tile(c) == id)
        } else {
            (0..self.size.y)
                .map(|y| IVec2::new(door.x, y))
                .find(|&c| c != door && self.tile(c) == id)
        }
    }

    /// The first ghost-door cell in row-major order.
    pub fn ghost_box_cell(&self) -> Option<IVec2> {
        self.cells().find(|&c| self.tile(c) == self.special.ghost_door)
    }

    /// Picks a random door and pairs it with its partner, giving a bonus item an entry and
    /// an exit.
    pub fn door_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(IVec2, IVec2)> {
        let doors: Vec<IVec2> = self
            .cells()
            .filter(|&c| {
                let id = self.tile(c);
                id == self.special.door_horizontal || id == self.special.door_vertical
            })
            .collect();

        let entrance = *doors.choose(rng)?;
        let exit = self.door_partner(entrance, self.tile(entrance))?;
        Some((entrance, exit))
    }

    /// Cells a wandering pursuer may head for: every remaining pellet, or every open cell
    /// once the pellets are gone.
    pub fn wander_targets(&self) -> Vec<IVec2> {
        let pellets: Vec<IVec2> = self.cells().filter(|&c| self.tile(c) == self.special.pellet).collect();
        if !pellets.is_empty() {
            return pellets;
        }
        self.cells().filter(|&c| !self.is_wall(c)).collect()
    }
}
