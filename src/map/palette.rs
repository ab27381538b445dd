//! Maze colors and the recoloring palette applied to tile imagery.

use bevy_ecs::resource::Resource;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// The four colors a level uses to recolor its tile images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub edge_light: Color,
    pub edge_shadow: Color,
    pub fill: Color,
    pub pellet: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            edge_light: Color::rgb(255, 255, 0),
            edge_shadow: Color::rgb(255, 150, 0),
            fill: Color::rgb(0, 255, 255),
            pellet: Color::rgb(255, 255, 255),
        }
    }
}

impl Palette {
    /// The palette shown on the "lit" beats of the level-clear flash.
    ///
    /// Pellet color is carried over from `self`; by the time the maze flashes there are no
    /// pellets left to draw anyway.
    pub fn flashed(&self) -> Self {
        let white = Color::rgb(255, 255, 254);
        Self {
            edge_light: white,
            edge_shadow: white,
            fill: Color::BLACK,
            pellet: self.pellet,
        }
    }
}

/// The palette currently applied to the maze, plus the snapshot taken before a flash.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelPalette {
    pub current: Palette,
    pub snapshot: Option<Palette>,
}

impl LevelPalette {
    pub fn new(palette: Palette) -> Self {
        Self {
            current: palette,
            snapshot: None,
        }
    }

    /// Remembers the current palette so it can be restored once flashing ends.
    pub fn take_snapshot(&mut self) {
        self.snapshot = Some(self.current);
    }

    pub fn flash(&mut self) {
        let base = self.snapshot.unwrap_or(self.current);
        self.current = base.flashed();
    }

    /// Restores the snapshot, if one was taken.
    pub fn restore(&mut self) {
        if let Some(original) = self.snapshot {
            self.current = original;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_without_snapshot_keeps_current() {
        let mut palette = LevelPalette::new(Palette::default());
        palette.flash();
        let flashed = palette.current;
        palette.restore();
        assert_eq!(palette.current, flashed);
    }

    #[test]
    fn flash_then_restore_returns_to_snapshot() {
        let mut palette = LevelPalette::new(Palette::default());
        palette.take_snapshot();
        palette.flash();
        assert_eq!(palette.current, Palette::default().flashed());
        palette.restore();
        assert_eq!(palette.current, Palette::default());
    }
}
