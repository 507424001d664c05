//! Precomputed Voronoi cell shapes.
//!
//! The shape of a pixel's cell only depends on which diagonals touch its four
//! corners, so all 256 possible shapes are generated once and looked up by an
//! 8-bit corner code. Each corner owns two bits of the code: one set when the
//! pixel itself is linked diagonally across that corner (the cell grows into
//! the corner), one set when the two neighbours flanking the corner are linked
//! (their diagonal cuts the corner off).
//!
//! | corner | own diagonal | cutting diagonal |
//! |--------|--------------|------------------|
//! | NW     | bit 0        | bit 1            |
//! | NE     | bit 3        | bit 2            |
//! | SE     | bit 4        | bit 5            |
//! | SW     | bit 7        | bit 6            |

use crate::geometry::{Direction, GridPos, Point};
use crate::similarity_graph::SimilarityGraph;
use std::sync::OnceLock;

pub type CornerCode = u8;

pub const CELL_TYPE_COUNT: usize = 256;

/// Cell polygon as offsets from the pixel centre, in quarter-pixel units.
pub type VoronoiCell = Vec<Point>;

/// Where each corner-code bit is sampled: the edge leaving `pixel + offset`
/// (or the pixel itself for `None`) towards the given direction.
const CORNER_SAMPLES: [(Option<Direction>, Direction); 8] = [
    (Some(Direction::NorthWest), Direction::SouthEast),
    (Some(Direction::West), Direction::NorthEast),
    (Some(Direction::North), Direction::SouthEast),
    (None, Direction::NorthEast),
    (None, Direction::SouthEast),
    (Some(Direction::South), Direction::NorthEast),
    (Some(Direction::West), Direction::SouthEast),
    (Some(Direction::SouthWest), Direction::NorthEast),
];

/// `(own diagonal bit, cutting diagonal bit)` per corner, in ring order:
/// NW, SW, SE, NE. Corners sit at even ring positions.
const CORNER_BITS: [(u8, u8); 4] = [(0, 1), (7, 6), (4, 5), (3, 2)];

/// Bits of the corner `corner`, which must be a diagonal direction.
const fn corner_bits(corner: Direction) -> (u8, u8) {
    CORNER_BITS[corner.index() / 2]
}

/// Corner code of pixel `p`, read from the similarity graph.
pub fn corner_code(graph: &SimilarityGraph, p: GridPos) -> CornerCode {
    CORNER_SAMPLES
        .iter()
        .enumerate()
        .fold(0, |code, (bit, &(offset, query))| {
            let from = offset.map_or(p, |d| p.step(d));
            if graph.edge(from, query) {
                code | (1 << bit)
            } else {
                code
            }
        })
}

/// False when some corner has both its own and its cutting diagonal set,
/// which a planar similarity graph can never produce.
pub fn check_cell_type(code: CornerCode) -> bool {
    (0..4).all(|quadrant| (code >> (2 * quadrant)) & 0b11 != 0b11)
}

/// Build the cell polygon for `code`.
///
/// The polygon walks the ring NW, W, SW, S, SE, E, NE, N. Sides contribute
/// their edge midpoint. A corner contributes two points straddling it when the
/// pixel's own diagonal crosses it, a single inset point when a neighbouring
/// diagonal cuts it, and the plain pixel corner otherwise.
pub fn generate_cell(code: CornerCode) -> VoronoiCell {
    let mut cell = Vec::with_capacity(12);

    for (i, dir) in Direction::ALL.into_iter().enumerate() {
        let (dx, dy) = dir.offset();
        if !dir.is_diagonal() {
            cell.push(Point::new(2 * dx, 2 * dy));
            continue;
        }

        let (own, cut) = corner_bits(dir);
        if code & (1 << own) != 0 {
            // The point nearer the side walked before this corner comes first.
            let (px, _) = Direction::from_index(i + Direction::ALL.len() - 1).offset();
            let near_vertical_side = Point::new(dx, 3 * dy);
            let near_horizontal_side = Point::new(3 * dx, dy);
            if px == 0 {
                cell.push(near_vertical_side);
                cell.push(near_horizontal_side);
            } else {
                cell.push(near_horizontal_side);
                cell.push(near_vertical_side);
            }
        } else if code & (1 << cut) != 0 {
            cell.push(Point::new(dx, dy));
        } else {
            cell.push(Point::new(2 * dx, 2 * dy));
        }
    }

    cell
}

/// All 256 cell shapes, indexed by corner code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTable {
    cells: [VoronoiCell; CELL_TYPE_COUNT],
}

impl CellTable {
    /// Generate every cell shape from scratch.
    pub fn generate() -> Self {
        Self {
            cells: std::array::from_fn(|code| generate_cell(code as CornerCode)),
        }
    }

    /// The process-wide table, generated on first use and never modified.
    pub fn global() -> &'static CellTable {
        static TABLE: OnceLock<CellTable> = OnceLock::new();
        TABLE.get_or_init(CellTable::generate)
    }

    pub fn cell(&self, code: CornerCode) -> &[Point] {
        &self.cells[code as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CornerCode, &[Point])> {
        self.cells
            .iter()
            .enumerate()
            .map(|(code, cell)| (code as CornerCode, cell.as_slice()))
    }
}
