#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::color::{SimilarityThresholds, Visibility};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rgb::RGB8;

    const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
    const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };

    fn grid_from_rows(rows: &[&str]) -> PixelGrid {
        PixelGrid::from_fn(rows[0].len(), rows.len(), |x, y| {
            if rows[y].as_bytes()[x] == b'#' { BLACK } else { WHITE }
        })
        .unwrap()
    }

    fn planar_diagram(grid: &PixelGrid) -> VoronoiDiagram {
        let mut graph = SimilarityGraph::new(grid, &SimilarityThresholds::default());
        graph.planarize();
        VoronoiDiagram::build(&graph, grid, &VisibilityThresholds::default()).unwrap()
    }

    fn assert_well_formed(voronoi: &VoronoiDiagram) {
        let diagram = voronoi.diagram();
        for p in diagram.points() {
            let neighbors = diagram.neighbors(p);
            assert!(neighbors.len() >= 2, "dangling vertex {p:?}: {neighbors:?}");
            assert!(!neighbors.contains(&p), "self loop at {p:?}");
            assert!(voronoi.is_retained(p), "elided vertex {p:?} in diagram");
            for q in neighbors {
                assert!(diagram.neighbors(*q).contains(&p), "one-way edge {p:?} -> {q:?}");
            }
        }
        for (edge, props) in voronoi.active_edges().iter() {
            let (a, b) = edge.endpoints();
            assert!(diagram.neighbors(a).contains(&b), "active edge {edge:?} not in diagram");
            assert!(
                voronoi.is_retained(a) && voronoi.is_retained(b),
                "absorbed segment {edge:?} still active"
            );
            assert_eq!(props.colors.len(), 2);
            assert_ne!(props.visibility, Visibility::None);
        }
    }

    #[test]
    fn test_uniform_block_has_no_active_edges() {
        let voronoi = planar_diagram(&grid_from_rows(&["..", ".."]));
        assert!(voronoi.violations().is_empty());
        assert!(voronoi.active_edges().is_empty());

        let diagram = voronoi.diagram();
        // Pixel corners only: a 3x3 lattice with 12 unit segments.
        assert_eq!(diagram.len(), 9);
        assert_eq!(diagram.edge_count(), 12);
        for x in [0, 4, 8] {
            for y in [0, 4, 8] {
                assert!(diagram.contains(Point::new(x, y)));
            }
        }
        assert!(!diagram.contains(Point::new(2, 0)));
        assert!(!diagram.contains(Point::new(4, 2)));
        assert_eq!(voronoi.valency(Point::new(4, 4)), 4);
        assert_eq!(voronoi.valency(Point::new(4, 2)), 2);
        assert_well_formed(&voronoi);
    }

    #[test]
    fn test_single_pixel_keeps_frame_corners() {
        let voronoi = planar_diagram(&grid_from_rows(&["#"]));
        let diagram = voronoi.diagram();
        assert_eq!(diagram.len(), 4);
        assert_eq!(diagram.edge_count(), 4);
        assert_eq!(voronoi.valency(Point::new(0, 0)), 2);
        assert!(voronoi.is_retained(Point::new(0, 0)));
        assert!(!voronoi.is_retained(Point::new(2, 0)));
        assert!(voronoi.active_edges().is_empty());
    }

    #[test]
    fn test_alternating_strip_has_contour_between_rows() {
        let voronoi = planar_diagram(&grid_from_rows(&["#", ".", "#", "."]));
        let active = voronoi.active_edges();
        assert_eq!(active.len(), 3);
        assert_eq!(active.count_by_visibility(Visibility::Contour), 3);
        for y in 1..4 {
            let edge = Edge::new(Point::new(0, 4 * y), Point::new(4, 4 * y));
            let props = active.get(&edge).unwrap();
            assert!(props.colors.contains(&BLACK));
            assert!(props.colors.contains(&WHITE));
        }
        // Half-segments ending at an elided midpoint never become active.
        assert!(active.get(&Edge::new(Point::new(0, 4), Point::new(2, 4))).is_none());
        assert!(!voronoi.is_retained(Point::new(2, 4)));

        // Two frame vertices on every row boundary.
        let diagram = voronoi.diagram();
        assert_eq!(diagram.len(), 10);
        assert_eq!(diagram.edge_count(), 13);
        assert_well_formed(&voronoi);
    }

    #[test]
    fn test_diagonal_link_extends_cells() {
        let voronoi = planar_diagram(&grid_from_rows(&["#.", ".#", ".."]));
        assert!(voronoi.violations().is_empty());
        assert_eq!(voronoi.corner_code(0, 0), Some(1 << 4));

        // The top-left cell reaches into the bottom-right pixel's corner.
        let cell = voronoi.cell(0, 0).unwrap();
        assert!(cell.contains(&Point::new(3, 5)));
        assert!(cell.contains(&Point::new(5, 3)));
        assert_eq!(cell.len(), 9);

        let active = voronoi.active_edges();
        assert!(!active.is_empty());
        assert_eq!(active.count_by_visibility(Visibility::Contour), active.len());
        assert_well_formed(&voronoi);
    }

    #[test]
    fn test_out_of_range_cell_queries() {
        let voronoi = planar_diagram(&grid_from_rows(&["..", ".."]));
        assert!(voronoi.cell(2, 0).is_none());
        assert!(voronoi.corner_code(0, 2).is_none());
        assert_eq!(voronoi.valency(Point::new(100, 100)), 0);
        assert_eq!(voronoi.width(), 2);
        assert_eq!(voronoi.height(), 2);
    }

    #[test]
    fn test_unplanarized_graph_reports_violation() {
        let grid = grid_from_rows(&["#.#", ".#.", "#.#"]);
        let graph = SimilarityGraph::new(&grid, &SimilarityThresholds::default());
        let voronoi = VoronoiDiagram::build(&graph, &grid, &VisibilityThresholds::default()).unwrap();
        // Only the centre pixel is off the border.
        assert_eq!(voronoi.violations().len(), 1);
        assert_eq!(voronoi.violations()[0].position, GridPos::new(1, 1));
        assert!(!check_cell_type(voronoi.violations()[0].code));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let grid = grid_from_rows(&["..", ".."]);
        let other = grid_from_rows(&["...", "..."]);
        let graph = SimilarityGraph::new(&other, &SimilarityThresholds::default());
        let err = VoronoiDiagram::build(&graph, &grid, &VisibilityThresholds::default()).unwrap_err();
        assert!(matches!(
            err,
            DepixError::DimensionMismatch { graph: (3, 2), grid: (2, 2) }
        ));
    }

    #[test]
    fn test_explicit_table_matches_global() {
        let grid = grid_from_rows(&["#..", ".#.", "..#"]);
        let mut graph = SimilarityGraph::new(&grid, &SimilarityThresholds::default());
        graph.planarize();
        let thresholds = VisibilityThresholds::default();
        let table = CellTable::generate();
        let a = VoronoiDiagram::build(&graph, &grid, &thresholds).unwrap();
        let b = VoronoiDiagram::build_with_table(&graph, &grid, &thresholds, &table).unwrap();
        assert_eq!(a.diagram(), b.diagram());
        assert_eq!(a.active_edges().len(), b.active_edges().len());
    }

    #[test]
    fn test_random_grids_produce_well_formed_diagrams() {
        let palette = [BLACK, WHITE, RGB8::new(0, 0, 1), RGB8::new(220, 40, 40)];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..30 {
            let width = rng.gen_range(1..10);
            let height = rng.gen_range(1..10);
            let grid = PixelGrid::from_fn(width, height, |_, _| {
                palette[rng.gen_range(0..palette.len())]
            })
            .unwrap();
            let voronoi = planar_diagram(&grid);
            assert!(voronoi.violations().is_empty());
            assert_well_formed(&voronoi);
            for corner in [
                Point::new(0, 0),
                Point::new(4 * width as i32, 0),
                Point::new(0, 4 * height as i32),
                Point::new(4 * width as i32, 4 * height as i32),
            ] {
                assert!(voronoi.diagram().contains(corner), "missing frame corner {corner:?}");
            }
        }
    }
}
