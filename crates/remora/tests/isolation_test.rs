use remora::data::{AFFECTED_EDGES, DataMap, ROUTE_EDGES, SELECTED_NODES};
use remora::graphlib::{EdgeId, ElementId, GraphOptions};
use remora::isolation::{EdgePredicate, is_orthogonal};
use remora::{
    EdgeCategory, EdgeLabel, Error, GenericLabeling, GridLayout, IsolationStage, LabelLayout,
    LayoutAlgorithm, LayoutGraph, LayoutStage, NodeLabel, OrthogonalRouter, Point,
    StraightLineRouter,
};

fn node(g: &mut LayoutGraph, id: &str) {
    g.set_node(id, NodeLabel::sized(20.0, 10.0));
}

fn snapshot(g: &LayoutGraph) -> Vec<(EdgeId, Vec<Point>)> {
    g.edges()
        .map(|e| (e, g.edge(e).unwrap().points.clone()))
        .collect()
}

fn positions(g: &LayoutGraph) -> Vec<(f64, f64)> {
    g.nodes()
        .map(|n| {
            let lbl = g.node(n).unwrap();
            (lbl.x, lbl.y)
        })
        .collect()
}

/// a, b, c plus a group `p` containing c.
fn grouped() -> (LayoutGraph, Vec<EdgeId>) {
    let mut g = LayoutGraph::new(GraphOptions { compound: true });
    for id in ["a", "b", "c", "p"] {
        node(&mut g, id);
    }
    let c = g.node_id("c").unwrap();
    let p = g.node_id("p").unwrap();
    g.set_parent(c, p);
    let edges = vec![
        g.set_edge("a", "b"),
        g.set_edge("a", "p"),
        g.set_edge("p", "b"),
        g.set_edge("c", "b"),
    ];
    (g, edges)
}

#[test]
fn group_incident_edges_are_hidden_from_the_inner_layout() {
    let (mut g, edges) = grouped();
    let mut seen: Vec<Vec<EdgeId>> = Vec::new();
    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        seen.push(g.edges().collect());
        Ok(())
    };

    let mut stage = IsolationStage::group_edges();
    stage.apply_stage(&mut g, &mut core).unwrap();

    assert_eq!(seen, vec![vec![edges[0], edges[3]]]);
    assert_eq!(stage.last_hidden(), &[edges[1], edges[2]]);
    assert_eq!(g.edge_count(), 4);
}

#[test]
fn ungrouped_graph_is_a_pass_through() {
    let mut g = LayoutGraph::new(GraphOptions::default());
    for id in ["a", "b", "c", "d", "e"] {
        node(&mut g, id);
    }
    g.set_edge("a", "b");
    g.set_edge("b", "c");
    g.set_edge("d", "e");
    let mut direct = g.clone();

    let mut calls = 0;
    let mut grid = GridLayout::default();
    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        calls += 1;
        grid.apply_layout(g)
    };
    let mut stage = IsolationStage::group_edges().with_router(OrthogonalRouter::default());
    stage.apply_stage(&mut g, &mut core).unwrap();
    assert_eq!(calls, 1);
    assert!(stage.last_hidden().is_empty());

    GridLayout::default().apply_layout(&mut direct).unwrap();
    assert_eq!(positions(&g), positions(&direct));
    assert_eq!(snapshot(&g), snapshot(&direct));
}

#[test]
fn empty_predicate_matches_direct_run() {
    let (mut g, _) = grouped();
    let mut direct = g.clone();

    let nothing: EdgePredicate = Box::new(|_: &LayoutGraph, _: EdgeId| false);
    let mut stage = IsolationStage::new(EdgeCategory::Custom(nothing));
    stage.apply_stage(&mut g, &mut GridLayout::default()).unwrap();
    GridLayout::default().apply_layout(&mut direct).unwrap();

    assert_eq!(positions(&g), positions(&direct));
    assert_eq!(snapshot(&g), snapshot(&direct));
}

#[test]
fn hidden_edges_are_restored_when_the_inner_layout_fails() {
    let (mut g, _) = grouped();
    let before = snapshot(&g);
    let mut core = |_: &mut LayoutGraph| -> remora::Result<()> {
        Err(Error::algorithm("failing", "inner layout gave up"))
    };

    let mut stage = IsolationStage::group_edges();
    let err = stage.apply_stage(&mut g, &mut core).unwrap_err();
    assert!(matches!(err, Error::Algorithm { .. }));
    assert_eq!(snapshot(&g), before);
}

#[test]
fn router_only_touches_restored_edges() {
    let (mut g, edges) = grouped();
    let marker = vec![Point::new(999.0, 999.0)];
    g.for_each_edge_mut(|_, lbl| lbl.points = marker.clone());

    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        let coords = [("a", 0.0, 0.0), ("b", 100.0, 100.0), ("c", 50.0, 200.0), ("p", 200.0, 0.0)];
        for (id, x, y) in coords {
            let n = g.node_id(id).unwrap();
            let lbl = g.node_mut(n).unwrap();
            lbl.x = x;
            lbl.y = y;
        }
        Ok(())
    };

    let mut stage = IsolationStage::group_edges().with_router(OrthogonalRouter::default());
    stage.apply_stage(&mut g, &mut core).unwrap();

    assert_eq!(g.edge(edges[0]).unwrap().points, marker);
    assert_eq!(g.edge(edges[3]).unwrap().points, marker);
    // a (0,0) -> p (200,0) is already aligned.
    assert!(g.edge(edges[1]).unwrap().points.is_empty());
    // p (200,0) -> b (100,100): |dy| >= |dx| leaves vertically.
    assert_eq!(
        g.edge(edges[2]).unwrap().points,
        vec![Point::new(200.0, 50.0), Point::new(100.0, 50.0)]
    );
}

#[test]
fn router_scope_key_gets_its_prior_value_back() {
    let (mut g, edges) = grouped();
    let mut prior: DataMap<EdgeId, bool> = DataMap::default();
    prior.insert(edges[0], false);
    g.graph_mut().data.set(ROUTE_EDGES, prior.clone());

    let mut stage = IsolationStage::group_edges().with_router(OrthogonalRouter::default());
    stage.apply_stage(&mut g, &mut GridLayout::default()).unwrap();
    assert_eq!(g.graph().data.get(ROUTE_EDGES), Some(&prior));
}

#[test]
fn router_scope_key_is_removed_when_it_was_absent() {
    let (mut g, _) = grouped();
    let mut stage = IsolationStage::group_edges().with_router(OrthogonalRouter::default());
    stage.apply_stage(&mut g, &mut GridLayout::default()).unwrap();
    assert!(!g.graph().data.contains(ROUTE_EDGES));
}

#[test]
fn labels_of_restored_edges_are_placed() {
    let mut g = LayoutGraph::new(GraphOptions::default());
    node(&mut g, "a");
    node(&mut g, "b");
    node(&mut g, "c");
    let labelled = EdgeLabel {
        labels: vec![LabelLayout::sized(10.0, 4.0)],
        ..Default::default()
    };
    let hidden = g.set_edge_with_label("a", "b", labelled.clone());
    let kept = g.set_edge_with_label("b", "c", labelled);

    let only_hidden: EdgePredicate = Box::new(move |_: &LayoutGraph, e: EdgeId| e == hidden);
    let mut stage = IsolationStage::new(EdgeCategory::Custom(only_hidden))
        .with_label_placement(GenericLabeling::default());
    stage
        .apply_stage(
            &mut g,
            &mut GridLayout {
                columns: Some(3),
                spacing: 80.0,
            },
        )
        .unwrap();

    // Cells are 100 wide: a at x=50, b at x=150, both at y=45.
    let placed = &g.edge(hidden).unwrap().labels[0];
    assert_eq!((placed.x, placed.y), (100.0, 45.0));
    let untouched = &g.edge(kept).unwrap().labels[0];
    assert_eq!((untouched.x, untouched.y), (0.0, 0.0));
    assert!(!g.graph().data.contains(remora::data::AFFECTED_LABELS));
}

/// 2x2 grid: a b / c d.
fn square() -> (LayoutGraph, [EdgeId; 5]) {
    let mut g = LayoutGraph::new(GraphOptions::default());
    for id in ["a", "b", "c", "d"] {
        node(&mut g, id);
    }
    let edges = [
        g.set_edge("a", "b"),
        g.set_edge("a", "d"),
        g.set_edge("b", "d"),
        g.set_edge("a", "c"),
        g.set_edge("c", "b"),
    ];
    (g, edges)
}

fn grid2() -> GridLayout {
    GridLayout {
        columns: Some(2),
        spacing: 50.0,
    }
}

#[test]
fn non_orthogonal_edges_are_found_after_a_first_pass() {
    let (mut g, edges) = square();
    let mut runs: Vec<usize> = Vec::new();
    let mut grid = grid2();
    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        runs.push(g.edge_count());
        grid.apply_layout(g)
    };

    let mut stage = IsolationStage::non_orthogonal_edges().with_router(OrthogonalRouter::default());
    stage.apply_stage(&mut g, &mut core).unwrap();

    assert_eq!(runs, vec![5, 3]);
    assert_eq!(stage.last_hidden(), &[edges[1], edges[4]]);
    for e in edges {
        assert!(is_orthogonal(&g, e, 1e-4), "edge {e} is not orthogonal");
    }
}

#[test]
fn orthogonal_result_runs_the_inner_layout_once() {
    let (mut g, _) = square();
    let mut runs = 0;
    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        runs += 1;
        // Stack everything on one vertical line.
        g.for_each_node_mut(|n, lbl| {
            lbl.x = 0.0;
            lbl.y = n.index() as f64 * 40.0;
        });
        Ok(())
    };
    let mut stage = IsolationStage::non_orthogonal_edges();
    stage.apply_stage(&mut g, &mut core).unwrap();
    assert_eq!(runs, 1);
    assert!(stage.last_hidden().is_empty());
}

#[test]
fn selected_endpoints_keep_non_orthogonal_edges() {
    let (mut g, edges) = square();
    let a = g.node_id("a").unwrap();
    let mut selected = DataMap::default();
    selected.insert(a, true);
    g.graph_mut().data.set(SELECTED_NODES, selected);

    let mut stage = IsolationStage::non_orthogonal_edges();
    stage.apply_stage(&mut g, &mut grid2()).unwrap();
    assert_eq!(stage.last_hidden(), &[edges[4]]);
}

#[test]
fn only_affected_edges_are_considered() {
    let (mut g, edges) = square();
    let mut affected = DataMap::default();
    affected.insert(edges[1], true);
    affected.insert(edges[4], false);
    g.graph_mut().data.set(AFFECTED_EDGES, affected);

    let mut stage = IsolationStage::non_orthogonal_edges();
    stage.apply_stage(&mut g, &mut grid2()).unwrap();
    assert_eq!(stage.last_hidden(), &[edges[1]]);
}

#[test]
fn unselected_edges_are_isolated_once_something_is_selected() {
    let (mut g, edges) = square();
    let mut stage = IsolationStage::unselected_edges();
    stage.apply_stage(&mut g, &mut grid2()).unwrap();
    assert!(stage.last_hidden().is_empty());

    let b = g.node_id("b").unwrap();
    let mut selected = DataMap::default();
    selected.insert(b, true);
    g.graph_mut().data.set(SELECTED_NODES, selected);

    let mut seen = 0;
    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        seen = g.edge_count();
        Ok(())
    };
    stage.apply_stage(&mut g, &mut core).unwrap();
    assert_eq!(stage.last_hidden(), &[edges[1], edges[3]]);
    assert_eq!(seen, 3);
    assert_eq!(g.edge_count(), 5);
}

#[test]
fn straight_line_router_clears_bends_of_restored_edges() {
    let (mut g, edges) = grouped();
    let bends = vec![Point::new(1.0, 2.0)];
    g.for_each_edge_mut(|_, lbl| lbl.points = bends.clone());

    let mut stage = IsolationStage::group_edges().with_router(StraightLineRouter::default());
    stage
        .apply_stage(&mut g, &mut |_: &mut LayoutGraph| -> remora::Result<()> { Ok(()) })
        .unwrap();

    assert!(g.edge(edges[1]).unwrap().points.is_empty());
    assert!(g.edge(edges[2]).unwrap().points.is_empty());
    assert_eq!(g.edge(edges[0]).unwrap().points, bends);
}

#[test]
fn every_isolated_edge_comes_back_even_if_one_was_shown_early() {
    let mut g = LayoutGraph::new(GraphOptions::default());
    let edges: Vec<EdgeId> = (0..4).map(|i| g.set_edge("a", &format!("b{i}"))).collect();
    let first = edges[0];

    let everything: EdgePredicate = Box::new(|_: &LayoutGraph, _: EdgeId| true);
    let mut stage = IsolationStage::new(EdgeCategory::Custom(everything));
    let mut core = |g: &mut LayoutGraph| -> remora::Result<()> {
        g.unhide_edge(first)?;
        Ok(())
    };
    let err = stage.apply_stage(&mut g, &mut core).unwrap_err();

    assert!(matches!(
        err,
        Error::Graph(remora::graphlib::Error::NotHidden(ElementId::Edge(e))) if e == first
    ));
    assert_eq!(g.edge_count(), 4);
    assert!(edges.iter().all(|&e| !g.is_edge_hidden(e)));
}
