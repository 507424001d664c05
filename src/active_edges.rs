//! Visible diagram edges and the colours on either side of them.

use crate::color::{classify_edge, Visibility, VisibilityThresholds};
use crate::error::{DepixError, Result};
use crate::geometry::Point;
use rgb::RGB8;
use serde::Serialize;
use std::collections::HashMap;

/// Undirected diagram edge with its endpoints in ascending order, so both
/// traversal directions of a boundary segment compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    a: Point,
    b: Point,
}

impl Edge {
    pub fn new(p: Point, q: Point) -> Self {
        if p <= q {
            Self { a: p, b: q }
        } else {
            Self { a: q, b: p }
        }
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.a, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeProperties {
    /// One colour while only one side has been seen, two once resolved.
    pub colors: Vec<RGB8>,
    pub visibility: Visibility,
}

/// One exported active edge: its endpoints, flanking colours and visibility.
#[derive(Serialize)]
struct ActiveEdgeRecord<'a> {
    #[serde(flatten)]
    edge: &'a Edge,
    #[serde(flatten)]
    properties: &'a EdgeProperties,
}

/// Collects flanking colours for diagram edges and grades them.
#[derive(Debug, Clone)]
pub struct ActiveEdges {
    thresholds: VisibilityThresholds,
    edges: HashMap<Edge, EdgeProperties>,
}

impl ActiveEdges {
    pub fn new(thresholds: VisibilityThresholds) -> Self {
        Self {
            thresholds,
            edges: HashMap::new(),
        }
    }

    /// Record that a pixel of `color` borders `edge`.
    ///
    /// The second colour is only kept when the edge is visible; an edge whose
    /// sides classify as [`Visibility::None`] keeps its single colour and is
    /// dropped by [`ActiveEdges::prune`].
    pub fn observe(&mut self, edge: Edge, color: RGB8) {
        let thresholds = self.thresholds;
        let props = self.edges.entry(edge).or_insert_with(|| EdgeProperties {
            colors: Vec::with_capacity(2),
            visibility: Visibility::None,
        });
        match props.colors.len() {
            0 => props.colors.push(color),
            1 => {
                let visibility = classify_edge(props.colors[0], color, &thresholds);
                props.visibility = visibility;
                if visibility != Visibility::None {
                    props.colors.push(color);
                }
            }
            _ => {}
        }
    }

    /// Forget `edge`, e.g. because simplification absorbed it into a longer span.
    pub fn discard(&mut self, edge: &Edge) {
        self.edges.remove(edge);
    }

    /// Keep only edges with two recorded colours.
    pub fn prune(&mut self) {
        self.edges.retain(|_, props| props.colors.len() == 2);
    }

    pub fn get(&self, edge: &Edge) -> Option<&EdgeProperties> {
        self.edges.get(edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Edge, &EdgeProperties)> {
        self.edges.iter()
    }

    pub fn count_by_visibility(&self, visibility: Visibility) -> usize {
        self.edges
            .values()
            .filter(|props| props.visibility == visibility)
            .count()
    }

    /// Serialize every edge as a JSON array sorted by endpoints, e.g.
    /// `{"a": {"x": 0, "y": 4}, "b": {"x": 4, "y": 4}, "colors": [...], "visibility": "Contour"}`.
    /// Points are in quarter-pixel units.
    pub fn to_json(&self) -> Result<String> {
        let mut records: Vec<ActiveEdgeRecord> = self
            .edges
            .iter()
            .map(|(edge, properties)| ActiveEdgeRecord { edge, properties })
            .collect();
        records.sort_by_key(|record| *record.edge);
        serde_json::to_string_pretty(&records).map_err(DepixError::Export)
    }
}
