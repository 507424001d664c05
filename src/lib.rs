//! depix - pixel-art depixelization library
//!
//! This library turns a small raster image into the first stages of a
//! resolution-independent vector representation.
//!
//! ## Pipeline
//!
//! - **Similarity graph** linking every pixel to its YUV-similar neighbours
//! - **Planarization** of crossing diagonals using the islands, curves and
//!   sparse-pixels heuristics
//! - **Voronoi cells** looked up from a precomputed table of 256 shapes
//! - **Simplified diagram** with degree-2 vertices removed, plus the visible
//!   (shading or contour) edges between differently coloured cells
//!
//! ## Example
//!
//! ```rust
//! use depix::{depixelize, DepixOptions, PixelGrid};
//! use rgb::RGB8;
//!
//! let black = RGB8::new(0, 0, 0);
//! let white = RGB8::new(255, 255, 255);
//! let grid = PixelGrid::new(1, 3, vec![black, white, black])?;
//!
//! let result = depixelize(&grid, &DepixOptions::default())?;
//! assert_eq!(result.voronoi.active_edges().len(), 2);
//! # Ok::<(), depix::DepixError>(())
//! ```

pub mod active_edges;
pub mod color;
pub mod error;
pub mod geometry;
pub mod pixel_grid;
pub mod similarity_graph;
pub mod voronoi_cells;
pub mod voronoi_diagram;

pub use active_edges::{ActiveEdges, Edge, EdgeProperties};
pub use color::{SimilarityThresholds, Visibility, VisibilityThresholds};
pub use error::{DepixError, Result};
pub use geometry::{Direction, GridPos, Point};
pub use pixel_grid::PixelGrid;
pub use similarity_graph::{PlanarizeStats, SimilarityGraph};
pub use voronoi_cells::{CellTable, CornerCode, VoronoiCell};
pub use voronoi_diagram::{Diagram, PlanarityViolation, VoronoiDiagram};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Options for depixelization
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepixOptions {
    /// YUV thresholds for linking neighbouring pixels (default: 42/7/6)
    pub similarity: SimilarityThresholds,
    /// Squared-distance thresholds for grading edges (default: 4/255, 100/255)
    pub visibility: VisibilityThresholds,
}

impl DepixOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything produced for one image.
#[derive(Debug, Clone)]
pub struct Depixelized {
    /// The planarized similarity graph.
    pub graph: SimilarityGraph,
    pub planarization: PlanarizeStats,
    pub voronoi: VoronoiDiagram,
}

/// Run the whole pipeline on one image
///
/// # Arguments
///
/// * `grid` - The pixels to depixelize
/// * `options` - Similarity and visibility thresholds
pub fn depixelize(grid: &PixelGrid, options: &DepixOptions) -> Result<Depixelized> {
    let mut graph = SimilarityGraph::new(grid, &options.similarity);
    let planarization = graph.planarize();
    let voronoi = VoronoiDiagram::build(&graph, grid, &options.visibility)?;

    Ok(Depixelized {
        graph,
        planarization,
        voronoi,
    })
}

/// Depixelize independent images in parallel. Results keep the input order.
pub fn depixelize_batch(grids: &[PixelGrid], options: &DepixOptions) -> Vec<Result<Depixelized>> {
    grids
        .par_iter()
        .map(|grid| depixelize(grid, options))
        .collect()
}
