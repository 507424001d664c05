//! Pixel similarity graph and its planarization.
//!
//! Every pixel is linked to each of its eight neighbours whose colour is
//! similar in YUV space. Where both diagonals of a 2x2 block are linked the
//! graph cannot be drawn without a crossing; [`SimilarityGraph::planarize`]
//! resolves each such block, either by dropping both diagonals of a uniform
//! block or by scoring the two diagonals with the islands, curves and
//! sparse-pixels heuristics and dropping the weaker one.

use crate::color::{similar, SimilarityThresholds};
use crate::geometry::{Direction, GridPos, NUM_DIRECTIONS};
use crate::pixel_grid::PixelGrid;
use log::debug;

/// Score bonus for each diagonal endpoint that would otherwise be isolated.
const ISLAND_BONUS: i32 = 5;
/// Side of the square window searched by the sparse-pixels heuristic.
const SPARSE_WINDOW: usize = 8;
/// Offset of the block's top-left pixel inside that window.
const SPARSE_WINDOW_ORIGIN: i32 = 3;

/// Per-direction edge weights, indexed by [`Direction::index`].
pub type DirectionWeights = [i32; NUM_DIRECTIONS];

/// Weighted 8-neighbour adjacency over a pixel grid.
///
/// A weight of 0 means "no edge". Positive weights mark an edge; their
/// magnitude only matters while planarization scores competing diagonals.
/// The weight stored at `p` towards `d` always equals the weight stored at
/// `p + d` towards `d.opposite()`, and no weight points outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityGraph {
    width: usize,
    height: usize,
    weights: Vec<DirectionWeights>,
}

/// What [`SimilarityGraph::planarize`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanarizeStats {
    /// 2x2 blocks where both diagonals were present.
    pub crossings: usize,
    /// Crossings inside a fully connected block; both diagonals dropped.
    pub uniform_blocks: usize,
    /// Crossings settled by the heuristic scores.
    pub heuristic_resolutions: usize,
    /// Heuristic resolutions where both scores were equal; the main
    /// (top-left to bottom-right) diagonal was dropped.
    pub ties: usize,
}

/// The four pixels of the 2x2 block whose top-left corner is `top_left`.
#[derive(Debug, Clone, Copy)]
struct Block {
    top_left: GridPos,
    top_right: GridPos,
    bottom_left: GridPos,
    bottom_right: GridPos,
}

impl Block {
    fn at(top_left: GridPos) -> Self {
        Self {
            top_left,
            top_right: top_left.step(Direction::East),
            bottom_left: top_left.step(Direction::South),
            bottom_right: top_left.step(Direction::SouthEast),
        }
    }
}

impl SimilarityGraph {
    /// Link every pair of neighbouring pixels whose colours are similar.
    pub fn new(grid: &PixelGrid, thresholds: &SimilarityThresholds) -> Self {
        let width = grid.width();
        let height = grid.height();
        let mut weights = vec![[0; NUM_DIRECTIONS]; width * height];

        for y in 0..height {
            for x in 0..width {
                let pos = GridPos::new(x as i32, y as i32);
                let color = grid.color(pos);
                let slot = &mut weights[y * width + x];
                for dir in Direction::ALL {
                    let neighbor = pos.step(dir);
                    if grid.contains(neighbor) && similar(color, grid.color(neighbor), thresholds) {
                        slot[dir.index()] = 1;
                    }
                }
            }
        }

        Self {
            width,
            height,
            weights,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, p: GridPos) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// True when `p` sits in the first or last row or column.
    pub fn is_on_border(&self, p: GridPos) -> bool {
        p.x == 0 || p.y == 0 || p.x as usize == self.width - 1 || p.y as usize == self.height - 1
    }

    fn index(&self, p: GridPos) -> Option<usize> {
        self.contains(p)
            .then(|| p.y as usize * self.width + p.x as usize)
    }

    /// Raw weight of the edge from `p` towards `dir`; 0 outside the grid.
    pub fn weight(&self, p: GridPos, dir: Direction) -> i32 {
        self.index(p)
            .map_or(0, |i| self.weights[i][dir.index()])
    }

    pub fn edge(&self, p: GridPos, dir: Direction) -> bool {
        self.weight(p, dir) != 0
    }

    /// Remove the edge between `p` and `p + dir` from both endpoints.
    pub fn delete_edge(&mut self, p: GridPos, dir: Direction) {
        self.set_mirrored(p, dir, |_| 0);
    }

    fn add_weight(&mut self, p: GridPos, dir: Direction, amount: i32) {
        self.set_mirrored(p, dir, |w| w + amount);
    }

    fn set_mirrored(&mut self, p: GridPos, dir: Direction, update: impl Fn(i32) -> i32) {
        if let Some(i) = self.index(p) {
            let w = &mut self.weights[i][dir.index()];
            *w = update(*w);
        }
        if let Some(j) = self.index(p.step(dir)) {
            let w = &mut self.weights[j][dir.opposite().index()];
            *w = update(*w);
        }
    }

    /// Number of edges incident to `p`.
    pub fn valence(&self, p: GridPos) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.contains(p.step(d)) && self.edge(p, d))
            .count()
    }

    /// Number of undirected edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.weights
            .iter()
            .map(|w| w.iter().filter(|&&v| v != 0).count())
            .sum::<usize>()
            / 2
    }

    /// True when both diagonals of the block at `top_left` are present.
    pub fn cross(&self, top_left: GridPos) -> bool {
        let bottom_left = top_left.step(Direction::South);
        self.edge(top_left, Direction::SouthEast) && self.edge(bottom_left, Direction::NorthEast)
    }

    /// Remove every diagonal crossing so the graph becomes planar.
    pub fn planarize(&mut self) -> PlanarizeStats {
        let mut stats = PlanarizeStats::default();

        for x in 0..self.width.saturating_sub(1) {
            for y in 0..self.height.saturating_sub(1) {
                let block = Block::at(GridPos::new(x as i32, y as i32));
                if !self.cross(block.top_left) {
                    continue;
                }
                stats.crossings += 1;

                if self.is_fully_connected(&block) {
                    self.delete_edge(block.top_left, Direction::SouthEast);
                    self.delete_edge(block.top_right, Direction::SouthWest);
                    stats.uniform_blocks += 1;
                    continue;
                }

                self.islands_heuristic(&block);
                self.curves_heuristic(&block);
                self.sparse_pixels_heuristic(&block);
                stats.heuristic_resolutions += 1;

                // A tie drops the main diagonal; the anti diagonal is then
                // compared against a deleted (zero) weight and survives.
                let main = self.weight(block.top_left, Direction::SouthEast);
                let anti = self.weight(block.top_right, Direction::SouthWest);
                if main <= anti {
                    self.delete_edge(block.top_left, Direction::SouthEast);
                } else {
                    self.delete_edge(block.top_right, Direction::SouthWest);
                }
                if main == anti {
                    stats.ties += 1;
                }
            }
        }

        debug!(
            "planarized {}x{} graph: {} crossings, {} uniform blocks, {} heuristic ({} ties)",
            self.width,
            self.height,
            stats.crossings,
            stats.uniform_blocks,
            stats.heuristic_resolutions,
            stats.ties
        );
        stats
    }

    fn is_fully_connected(&self, block: &Block) -> bool {
        self.edge(block.top_left, Direction::South)
            && self.edge(block.top_left, Direction::East)
            && self.edge(block.bottom_left, Direction::East)
            && self.edge(block.bottom_right, Direction::North)
    }

    fn islands_heuristic(&mut self, block: &Block) {
        let bonus = |g: &Self, a: GridPos, b: GridPos| {
            ISLAND_BONUS * ((g.valence(a) == 1) as i32 + (g.valence(b) == 1) as i32)
        };
        let main = bonus(self, block.top_left, block.bottom_right);
        let anti = bonus(self, block.top_right, block.bottom_left);
        self.add_weight(block.top_left, Direction::SouthEast, main);
        self.add_weight(block.top_right, Direction::SouthWest, anti);
    }

    fn curves_heuristic(&mut self, block: &Block) {
        let main = self.curve_length(block.top_left, Direction::SouthEast);
        let anti = self.curve_length(block.top_right, Direction::SouthWest);
        self.add_weight(block.top_left, Direction::SouthEast, main);
        self.add_weight(block.top_right, Direction::SouthWest, anti);
    }

    /// Length in edges of the valence-2 curve through the edge `start -> start + dir`.
    ///
    /// Walks outwards from both endpoints, never back along the edge it
    /// arrived by, until it meets a vertex whose valence is not 2 or the
    /// two walks meet on a closed loop.
    fn curve_length(&self, start: GridPos, dir: Direction) -> i32 {
        let max_steps = self.width * self.height;
        let end = start.step(dir);
        let mut length = 1;

        let mut a = start;
        let mut heading = dir.opposite();
        let mut steps = 0;
        while self.valence(a) == 2 && a != end && steps < max_steps {
            length += 1;
            steps += 1;
            match self.next_on_curve(a, heading) {
                Some(next) => {
                    heading = next;
                    a = a.step(next);
                }
                None => break,
            }
        }

        let mut b = end;
        heading = dir;
        steps = 0;
        while self.valence(b) == 2 && b != a && steps < max_steps {
            length += 1;
            steps += 1;
            match self.next_on_curve(b, heading) {
                Some(next) => {
                    heading = next;
                    b = b.step(next);
                }
                None => break,
            }
        }

        length
    }

    /// First edge out of `p`, in ring order, that does not lead back the way
    /// the walk arrived (`heading` is the direction travelled into `p`).
    fn next_on_curve(&self, p: GridPos, heading: Direction) -> Option<Direction> {
        let back = heading.opposite();
        Direction::ALL
            .into_iter()
            .find(|&d| d != back && self.weight(p, d) > 0)
    }

    fn sparse_pixels_heuristic(&mut self, block: &Block) {
        let mut labels = [[0u8; SPARSE_WINDOW]; SPARSE_WINDOW];
        let origin = SPARSE_WINDOW_ORIGIN as usize;

        labels[origin][origin] = 1;
        self.label_window_component(block.top_left, block.top_left, &mut labels, 1);
        labels[origin + 1][origin] = 2;
        self.label_window_component(block.top_left, block.top_right, &mut labels, 2);

        let count = |label: u8| -> i32 {
            labels.iter().flatten().filter(|&&l| l == label).count() as i32
        };
        let main = count(1);
        let anti = count(2);
        self.add_weight(block.top_left, Direction::SouthEast, main);
        self.add_weight(block.top_right, Direction::SouthWest, anti);
    }

    /// Depth-first search from `start`, confined to the 8x8 window around the
    /// block at `top_left`. Unlabelled pixels reached are given `label`.
    /// `labels` is indexed `[x][y]` relative to the window.
    fn label_window_component(
        &self,
        top_left: GridPos,
        start: GridPos,
        labels: &mut [[u8; SPARSE_WINDOW]; SPARSE_WINDOW],
        label: u8,
    ) {
        let mut stack = Vec::with_capacity(SPARSE_WINDOW * SPARSE_WINDOW);
        stack.push(start);

        while let Some(p) = stack.pop() {
            for dir in Direction::ALL {
                if !self.edge(p, dir) {
                    continue;
                }
                let next = p.step(dir);
                let wx = next.x - top_left.x + SPARSE_WINDOW_ORIGIN;
                let wy = next.y - top_left.y + SPARSE_WINDOW_ORIGIN;
                if !(0..SPARSE_WINDOW as i32).contains(&wx) || !(0..SPARSE_WINDOW as i32).contains(&wy) {
                    continue;
                }
                let slot = &mut labels[wx as usize][wy as usize];
                if *slot != 0 {
                    continue;
                }
                *slot = label;
                stack.push(next);
            }
        }
    }
}
