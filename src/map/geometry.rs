//! Pixel/cell conversions shared by every mover.

use glam::IVec2;

use crate::constants::{HALF_TILE, TILE_SIZE};

/// The cell whose center is closest to a pixel position.
pub fn nearest_cell(pos: IVec2) -> IVec2 {
    (pos + IVec2::splat(HALF_TILE)).div_euclid(IVec2::splat(TILE_SIZE))
}

/// The pixel position of a cell's top-left corner.
pub fn cell_origin(cell: IVec2) -> IVec2 {
    cell * TILE_SIZE
}

/// Whether a pixel position sits exactly on a cell boundary on both axes.
pub fn on_boundary(pos: IVec2) -> bool {
    pos.rem_euclid(IVec2::splat(TILE_SIZE)) == IVec2::ZERO
}

/// Whether a mover at `pos` overlaps `cell` at all.
pub fn overlaps(pos: IVec2, cell: IVec2) -> bool {
    let delta = (pos - cell_origin(cell)).abs();
    delta.x < TILE_SIZE && delta.y < TILE_SIZE
}

/// Axis-aligned proximity test: both axis deltas strictly below `cushion`.
pub fn in_contact(a: IVec2, b: IVec2, cushion: i32) -> bool {
    let delta = (a - b).abs();
    delta.x < cushion && delta.y < cushion
}

/// Cells of the 3x3 neighborhood around `center`, in row-major order.
pub fn neighborhood(center: IVec2) -> impl Iterator<Item = IVec2> {
    (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| center + IVec2::new(dx, dy)))
}

/// Manhattan distance between two cells.
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    let d = (a - b).abs();
    (d.x + d.y) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rounds_half_up() {
        assert_eq!(nearest_cell(IVec2::new(11, 0)), IVec2::new(0, 0));
        assert_eq!(nearest_cell(IVec2::new(12, 0)), IVec2::new(1, 0));
        assert_eq!(nearest_cell(IVec2::new(48, 35)), IVec2::new(2, 1));
    }

    #[test]
    fn boundary_requires_both_axes() {
        assert!(on_boundary(IVec2::new(24, 48)));
        assert!(!on_boundary(IVec2::new(24, 47)));
        assert!(on_boundary(IVec2::new(-24, 0)));
    }

    #[test]
    fn overlap_is_strict() {
        assert!(overlaps(IVec2::new(23, 0), IVec2::new(1, 0)));
        assert!(!overlaps(IVec2::new(0, 0), IVec2::new(1, 0)));
    }

    #[test]
    fn contact_uses_both_axes() {
        assert!(in_contact(IVec2::new(0, 0), IVec2::new(11, -11), 12));
        assert!(!in_contact(IVec2::new(0, 0), IVec2::new(12, 0), 12));
    }

    #[test]
    fn neighborhood_has_nine_cells() {
        let cells: Vec<_> = neighborhood(IVec2::new(5, 5)).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], IVec2::new(4, 4));
        assert_eq!(cells[4], IVec2::new(5, 5));
    }
}
