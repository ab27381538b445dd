use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use glam::IVec2;

use crate::map::direction::Direction;

/// A character that is not one of `L`, `R`, `U`, `D`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid direction code {0:?}")]
pub struct InvalidDirection(pub char);

/// An ordered sequence of single-cell steps, as produced by a path search.
///
/// The front of the route is the step a mover is currently traversing; it is popped when
/// the mover reaches the next cell boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route(VecDeque<Direction>);

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a route from consecutive orthogonally-adjacent cells.
    ///
    /// Returns `None` if two consecutive cells are not neighbors.
    pub fn from_cells(cells: &[IVec2]) -> Option<Self> {
        cells
            .windows(2)
            .map(|pair| Direction::from_step(pair[1] - pair[0]))
            .collect::<Option<VecDeque<_>>>()
            .map(Route)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn front(&self) -> Option<Direction> {
        self.0.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<Direction> {
        self.0.pop_front()
    }

    pub fn push_back(&mut self, direction: Direction) {
        self.0.push_back(direction);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.iter().copied()
    }

    /// The cells visited when walking this route from `start`, excluding `start` itself.
    pub fn cells_from(&self, start: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        self.0.iter().scan(start, |cell, direction| {
            *cell += direction.as_ivec2();
            Some(*cell)
        })
    }

    /// Where the route ends when walked from `start`.
    pub fn destination(&self, start: IVec2) -> IVec2 {
        self.cells_from(start).last().unwrap_or(start)
    }
}

impl FromIterator<Direction> for Route {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Route(iter.into_iter().collect())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|d| write!(f, "{}", d.as_char()))
    }
}

impl FromStr for Route {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| Direction::from_char(c).ok_or(InvalidDirection(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_and_parses_codes() {
        let route: Route = "RRDL".parse().unwrap();
        assert_eq!(route.len(), 4);
        assert_eq!(route.front(), Some(Direction::Right));
        assert_eq!(route.to_string(), "RRDL");
        assert_eq!("RX".parse::<Route>(), Err(InvalidDirection('X')));
    }

    #[test]
    fn destination_follows_steps() {
        let route: Route = "RRD".parse().unwrap();
        assert_eq!(route.destination(IVec2::new(1, 1)), IVec2::new(3, 2));
        assert_eq!(Route::new().destination(IVec2::new(4, 4)), IVec2::new(4, 4));
    }

    #[test]
    fn from_cells_rejects_gaps() {
        let cells = [IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(1, 1)];
        assert_eq!(Route::from_cells(&cells).unwrap().to_string(), "RD");
        assert!(Route::from_cells(&[IVec2::new(0, 0), IVec2::new(2, 0)]).is_none());
    }
}
