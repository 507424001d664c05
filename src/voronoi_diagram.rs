//! Simplified Voronoi diagram of a planarized similarity graph.
//!
//! Each pixel gets the precomputed cell for its corner code, translated to its
//! grid position. Vertices shared by exactly two faces lie in the middle of a
//! boundary segment and are dropped, merging their two incident edges. The
//! exterior of the image counts as a face for vertices on the image frame, and
//! the four frame corners are always kept.

use crate::active_edges::{ActiveEdges, Edge};
use crate::color::VisibilityThresholds;
use crate::error::{DepixError, Result};
use crate::geometry::{GridPos, Point};
use crate::pixel_grid::PixelGrid;
use crate::similarity_graph::SimilarityGraph;
use crate::voronoi_cells::{check_cell_type, corner_code, CellTable, CornerCode};
use log::{debug, warn};
use std::collections::HashMap;

/// Undirected adjacency between diagram vertices. Each neighbour is listed
/// once per vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    adjacency: HashMap<Point, Vec<Point>>,
}

impl Diagram {
    fn connect(&mut self, a: Point, b: Point) {
        if a == b {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            let list = self.adjacency.entry(from).or_default();
            if !list.contains(&to) {
                list.push(to);
            }
        }
    }

    pub fn neighbors(&self, p: Point) -> &[Point] {
        self.adjacency.get(&p).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, p: Point) -> bool {
        self.adjacency.contains_key(&p)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.adjacency.keys().copied()
    }

    /// Every edge once, endpoints in canonical order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().flat_map(|(&p, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&q| p < q)
                .map(move |&q| Edge::new(p, q))
        })
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// An interior pixel whose corner code has a corner claimed by both
/// diagonals, which planarization should have made impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanarityViolation {
    pub position: GridPos,
    pub code: CornerCode,
}

#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    width: usize,
    height: usize,
    codes: Vec<CornerCode>,
    /// Unsimplified cell rings in absolute quarter-pixel coordinates, row-major.
    cells: Vec<Vec<Point>>,
    /// How many cell rings each vertex appears in.
    occurrences: HashMap<Point, u32>,
    diagram: Diagram,
    active_edges: ActiveEdges,
    violations: Vec<PlanarityViolation>,
}

impl VoronoiDiagram {
    /// Build the diagram of `graph` using the shared cell table.
    pub fn build(
        graph: &SimilarityGraph,
        grid: &PixelGrid,
        thresholds: &VisibilityThresholds,
    ) -> Result<Self> {
        Self::build_with_table(graph, grid, thresholds, CellTable::global())
    }

    pub fn build_with_table(
        graph: &SimilarityGraph,
        grid: &PixelGrid,
        thresholds: &VisibilityThresholds,
        table: &CellTable,
    ) -> Result<Self> {
        if (graph.width(), graph.height()) != (grid.width(), grid.height()) {
            return Err(DepixError::DimensionMismatch {
                graph: (graph.width(), graph.height()),
                grid: (grid.width(), grid.height()),
            });
        }

        let mut diagram = Self {
            width: grid.width(),
            height: grid.height(),
            codes: Vec::with_capacity(grid.pixels().len()),
            cells: Vec::with_capacity(grid.pixels().len()),
            occurrences: HashMap::new(),
            diagram: Diagram::default(),
            active_edges: ActiveEdges::new(*thresholds),
            violations: Vec::new(),
        };
        diagram.place_cells(graph, table);
        diagram.simplify(grid);

        debug!(
            "voronoi diagram {}x{}: {} vertices, {} edges, {} active edges, {} violations",
            diagram.width,
            diagram.height,
            diagram.diagram.len(),
            diagram.diagram.edge_count(),
            diagram.active_edges.len(),
            diagram.violations.len()
        );
        Ok(diagram)
    }

    fn place_cells(&mut self, graph: &SimilarityGraph, table: &CellTable) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = GridPos::new(x, y);
                let code = corner_code(graph, pos);
                if !graph.is_on_border(pos) && !check_cell_type(code) {
                    warn!("similarity graph is not planar at ({x}, {y}): corner code {code:#010b}");
                    self.violations.push(PlanarityViolation {
                        position: pos,
                        code,
                    });
                }

                let center = pos.center();
                let ring: Vec<Point> = table
                    .cell(code)
                    .iter()
                    .map(|&offset| center.translate(offset))
                    .collect();
                for &p in &ring {
                    *self.occurrences.entry(p).or_insert(0) += 1;
                }
                self.codes.push(code);
                self.cells.push(ring);
            }
        }
    }

    /// Walk every cell ring, keeping only vertices whose valency is not 2.
    /// Each span between two kept vertices becomes a diagram edge and is
    /// reported to the active-edge collector with the pixel's colour.
    fn simplify(&mut self, grid: &PixelGrid) {
        let mut diagram = Diagram::default();
        let mut active_edges = self.active_edges.clone();

        for (ring, &color) in self.cells.iter().zip(grid.pixels()) {
            let n = ring.len();
            let Some(start) = ring.iter().position(|&p| self.is_retained(p)) else {
                for (i, &p) in ring.iter().enumerate() {
                    let q = ring[(i + 1) % n];
                    diagram.connect(p, q);
                    active_edges.observe(Edge::new(p, q), color);
                }
                continue;
            };

            let mut anchor = ring[start];
            let mut first_absorbed: Option<Point> = None;
            for step in 1..=n {
                let p = ring[(start + step) % n];
                if !self.is_retained(p) {
                    first_absorbed.get_or_insert(p);
                    continue;
                }

                // The span replaces the raw segments it absorbed. Only
                // degenerate rings ever record a raw segment, and it would
                // leave from the anchor.
                if let Some(q) = first_absorbed.take() {
                    active_edges.discard(&Edge::new(anchor, q));
                }

                if anchor != p {
                    diagram.connect(anchor, p);
                    active_edges.observe(Edge::new(anchor, p), color);
                }
                anchor = p;
            }
        }

        active_edges.prune();
        self.diagram = diagram;
        self.active_edges = active_edges;
    }

    fn on_frame(&self, p: Point) -> bool {
        p.x == 0 || p.y == 0 || p.x == 4 * self.width as i32 || p.y == 4 * self.height as i32
    }

    fn is_frame_corner(&self, p: Point) -> bool {
        (p.x == 0 || p.x == 4 * self.width as i32) && (p.y == 0 || p.y == 4 * self.height as i32)
    }

    /// Number of faces meeting at `p`, counting the image exterior for
    /// vertices on the frame. 0 for points that are not cell vertices.
    pub fn valency(&self, p: Point) -> u32 {
        match self.occurrences.get(&p) {
            Some(&count) => count + self.on_frame(p) as u32,
            None => 0,
        }
    }

    /// Whether `p` survives simplification.
    pub fn is_retained(&self, p: Point) -> bool {
        self.valency(p) != 2 || self.is_frame_corner(p)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn active_edges(&self) -> &ActiveEdges {
        &self.active_edges
    }

    pub fn violations(&self) -> &[PlanarityViolation] {
        &self.violations
    }

    /// Corner code of the pixel at `(x, y)`.
    pub fn corner_code(&self, x: usize, y: usize) -> Option<CornerCode> {
        (x < self.width && y < self.height).then(|| self.codes[y * self.width + x])
    }

    /// Unsimplified cell ring of the pixel at `(x, y)`, in quarter-pixel units.
    pub fn cell(&self, x: usize, y: usize) -> Option<&[Point]> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].as_slice())
    }
}
