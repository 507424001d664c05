//! YUV colour comparisons used to connect pixels and to grade edges.

use rgb::RGB8;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Yuv {
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Yuv {
    pub fn from_rgb(c: RGB8) -> Self {
        let (r, g, b) = (c.r as f32, c.g as f32, c.b as f32);
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        Self {
            y,
            u: 0.492 * (b - y),
            v: 0.877 * (r - y),
        }
    }
}

/// Per-channel YUV bounds under which two pixels count as similar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityThresholds {
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            y: 42.0,
            u: 7.0,
            v: 6.0,
        }
    }
}

/// True iff every channel differs by strictly less than its threshold.
pub fn similar(a: RGB8, b: RGB8, thresholds: &SimilarityThresholds) -> bool {
    let ca = Yuv::from_rgb(a);
    let cb = Yuv::from_rgb(b);
    (ca.y - cb.y).abs() < thresholds.y
        && (ca.u - cb.u).abs() < thresholds.u
        && (ca.v - cb.v).abs() < thresholds.v
}

/// How strongly an edge separates its two flanking colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Visibility {
    None,
    Shading,
    Contour,
}

/// Squared-YUV distances splitting edges into [`Visibility`] classes.
/// `shading_distance` must stay below `contour_distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityThresholds {
    pub shading_distance: f32,
    pub contour_distance: f32,
}

impl Default for VisibilityThresholds {
    fn default() -> Self {
        Self {
            shading_distance: 4.0 / 255.0,
            contour_distance: 100.0 / 255.0,
        }
    }
}

pub fn yuv_squared_distance(a: RGB8, b: RGB8) -> f32 {
    let ca = Yuv::from_rgb(a);
    let cb = Yuv::from_rgb(b);
    let (dy, du, dv) = (ca.y - cb.y, ca.u - cb.u, ca.v - cb.v);
    dy * dy + du * du + dv * dv
}

pub fn classify_edge(a: RGB8, b: RGB8, thresholds: &VisibilityThresholds) -> Visibility {
    let distance = yuv_squared_distance(a, b);
    if distance < thresholds.shading_distance {
        Visibility::None
    } else if distance < thresholds.contour_distance {
        Visibility::Shading
    } else {
        Visibility::Contour
    }
}
