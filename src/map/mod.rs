//! The maze: level text, the tile catalog, the live tile grid and the pixel geometry that
//! relates movers to cells.

pub mod catalog;
pub mod direction;
pub mod geometry;
pub mod grid;
pub mod palette;
pub mod parser;
