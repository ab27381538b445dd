//! Camera tracking and the per-tick draw pass.

use bevy_ecs::{
    query::{With, Without},
    resource::Resource,
    system::{Local, NonSendMut, Query, Res, ResMut},
};
use glam::IVec2;

use crate::asset::{AssetHandle, SpriteSet, TileImages};
use crate::constants::{tile, HALF_TILE, TILE_SIZE, VIEW_CELLS, VIEW_PIXELS};
use crate::map::grid::TileGrid;
use crate::systems::{
    components::{BonusItem, Mover, Player, Pursuer, PursuerState},
    state::{Mode, ModeState},
};

/// Draws opaque handles at screen pixel positions.
pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, handle: AssetHandle, at: IVec2);
    fn end_frame(&mut self) {}
}

/// Discards every draw call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _handle: AssetHandle, _at: IVec2) {}
}

/// Non-send resource wrapper for the host's renderer.
pub struct RenderResource(pub Box<dyn Renderer>);

/// Ticks the power pellets stay visible, then hidden, per blink cycle.
const POWER_PELLET_BLINK: u32 = 30;

/// Top-left corner of the visible part of the maze, in maze pixels.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    pub origin: IVec2,
}

impl Camera {
    /// Centers the view on `focus` without showing anything past the maze edges.
    ///
    /// Mazes smaller than the view are pinned to the top-left corner.
    pub fn follow(&mut self, focus: IVec2, maze_pixels: IVec2) {
        let centered = focus + IVec2::splat(HALF_TILE) - VIEW_PIXELS / 2;
        let max = (maze_pixels - VIEW_PIXELS).max(IVec2::ZERO);
        self.origin = centered.clamp(IVec2::ZERO, max);
    }

    /// The cell drawn in the top-left corner of the view.
    pub fn first_cell(&self) -> IVec2 {
        self.origin.div_euclid(IVec2::splat(TILE_SIZE))
    }

    /// Converts a maze pixel position to a screen position.
    pub fn to_screen(&self, pos: IVec2) -> IVec2 {
        pos - self.origin
    }
}

pub fn camera_system(
    grid: Res<TileGrid>,
    mut camera: ResMut<Camera>,
    player: Query<&Mover, With<Player>>,
) {
    if let Ok(mover) = player.single() {
        camera.follow(mover.pos, grid.pixel_size());
    }
}

/// Draws the visible maze tiles, then the pursuers, the bonus item and the player.
///
/// Nothing but the frame itself is produced during a level transition, and movers are hidden
/// while no game is running.
#[allow(clippy::too_many_arguments)]
pub fn render_system(
    mut renderer: NonSendMut<RenderResource>,
    mut blink: Local<u32>,
    camera: Res<Camera>,
    grid: Res<TileGrid>,
    images: Res<TileImages>,
    sprites: Res<SpriteSet>,
    state: Res<ModeState>,
    player: Query<&Mover, With<Player>>,
    pursuers: Query<(&Mover, &Pursuer), Without<Player>>,
    bonus: Query<(&Mover, &BonusItem), (Without<Player>, Without<Pursuer>)>,
) {
    *blink = (*blink + 1) % (POWER_PELLET_BLINK * 2);
    let renderer = renderer.0.as_mut();
    renderer.begin_frame();

    if state.mode() == Mode::LevelTransition {
        renderer.end_frame();
        return;
    }

    let special = grid.special();
    let first = camera.first_cell();
    for y in 0..=VIEW_CELLS.y {
        for x in 0..=VIEW_CELLS.x {
            let cell = first + IVec2::new(x, y);
            let id = grid.tile(cell);
            let hidden = id == tile::EMPTY
                || id == special.door_horizontal
                || id == special.door_vertical
                || (id == tile::POWER_PELLET && *blink >= POWER_PELLET_BLINK);
            if hidden {
                continue;
            }
            if let Some(handle) = images.get(id) {
                renderer.draw(handle, camera.to_screen(cell * TILE_SIZE));
            }
        }
    }

    if state.mode() != Mode::GameOver {
        for (mover, pursuer) in pursuers.iter() {
            let handle = match pursuer.state {
                PursuerState::Patrol => sprites.pursuers.get(pursuer.id).copied(),
                PursuerState::Frightened => Some(sprites.frightened),
                PursuerState::Returning => images.get(special.glasses),
            };
            if let Some(handle) = handle {
                renderer.draw(handle, camera.to_screen(mover.pos));
            }
        }

        for (mover, item) in bonus.iter() {
            if !item.active {
                continue;
            }
            if let Some(handle) = sprites.bonus(item.kind) {
                let lifted = mover.pos - IVec2::new(0, item.bounce_offset);
                renderer.draw(handle, camera.to_screen(lifted));
            }
        }

        if let Ok(mover) = player.single() {
            renderer.draw(sprites.player, camera.to_screen(mover.pos));
        }
    }

    renderer.end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_clamps_to_maze_edges() {
        let maze = IVec2::new(40, 40) * TILE_SIZE;
        let mut camera = Camera::default();

        camera.follow(IVec2::ZERO, maze);
        assert_eq!(camera.origin, IVec2::ZERO);

        camera.follow(maze, maze);
        assert_eq!(camera.origin, maze - VIEW_PIXELS);

        camera.follow(IVec2::new(20, 20) * TILE_SIZE, maze);
        assert_eq!(camera.to_screen(IVec2::new(20, 20) * TILE_SIZE), VIEW_PIXELS / 2 - IVec2::splat(HALF_TILE));
    }

    #[test]
    fn small_mazes_stay_pinned() {
        let mut camera = Camera::default();
        camera.follow(IVec2::new(100, 100), IVec2::new(5, 5) * TILE_SIZE);
        assert_eq!(camera.origin, IVec2::ZERO);
    }
}
