//! Grid directions and the two coordinate systems used by the pipeline.
//!
//! Pixels are addressed with integer [`GridPos`] values. Diagram vertices are
//! [`Point`]s stored in quarter-pixel units so they hash and compare exactly:
//! pixel `(x, y)` covers `[x, x+1] x [y, y+1]` and its centre sits at
//! `(4x + 2, 4y + 2)` quarters.

use serde::Serialize;

pub const NUM_DIRECTIONS: usize = 8;

/// The eight neighbour directions, in ring order.
///
/// The ring goes NW, W, SW, S, SE, E, NE, N, which is counter-clockwise on a
/// y-down grid. Weights in the similarity graph, the corner-code sampling
/// table and the cell polygons all follow this order, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest = 0,
    West,
    SouthWest,
    South,
    SouthEast,
    East,
    NorthEast,
    North,
}

impl Direction {
    pub const ALL: [Direction; NUM_DIRECTIONS] = [
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
        Direction::East,
        Direction::NorthEast,
        Direction::North,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % NUM_DIRECTIONS]
    }

    /// Unit offset `(dx, dy)` with y growing downwards.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::NorthEast => (1, -1),
            Direction::North => (0, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        Self::from_index(self.index() + NUM_DIRECTIONS / 2)
    }

    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }
}

/// Integer pixel coordinate. May point outside the grid; bounds are checked
/// by whoever owns the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Centre of this pixel in quarter-pixel units.
    pub const fn center(self) -> Point {
        Point::new(4 * self.x + 2, 4 * self.y + 2)
    }
}

/// A diagram vertex in quarter-pixel units.
///
/// The derived ordering is lexicographic on `(x, y)` and is what edges use to
/// put their endpoints in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn translate(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Coordinates in pixel units.
    pub fn to_f64(self) -> (f64, f64) {
        (self.x as f64 / 4.0, self.y as f64 / 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_cancel_out() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0), "{dir:?}");
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_ring_alternates_corners_and_sides() {
        for (i, dir) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), dir);
            assert_eq!(dir.is_diagonal(), i % 2 == 0);
        }
    }

    #[test]
    fn test_ring_is_counter_clockwise() {
        // Cross product of consecutive offsets is negative on a y-down grid
        // when turning counter-clockwise on screen.
        for i in 0..NUM_DIRECTIONS {
            let (ax, ay) = Direction::from_index(i).offset();
            let (bx, by) = Direction::from_index(i + 1).offset();
            assert!(ax * by - ay * bx < 0, "step {i}");
        }
    }

    #[test]
    fn test_grid_step_and_center() {
        let p = GridPos::new(3, 5);
        assert_eq!(p.step(Direction::NorthWest), GridPos::new(2, 4));
        assert_eq!(p.step(Direction::South), GridPos::new(3, 6));
        assert_eq!(p.center(), Point::new(14, 22));
        assert_eq!(p.center().to_f64(), (3.5, 5.5));
    }

    #[test]
    fn test_point_ordering_is_lexicographic() {
        assert!(Point::new(0, 9) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
    }
}
