use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use remora::graphlib::GraphOptions;
use remora::{
    BusDetectionOptions, GridLayout, IsolationStage, LayoutGraph, LayoutStage, NodeLabel,
    OrthogonalRouter, detect_buses,
};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct HubShape {
    hubs: usize,
    leaves: usize,
    // Every `cross_every`-th leaf also links to the next hub's first leaf.
    cross_every: usize,
}

impl HubShape {
    fn build(&self, compound: bool) -> LayoutGraph {
        let mut g = LayoutGraph::new(GraphOptions { compound });
        for h in 0..self.hubs {
            let hub = format!("h{h}");
            for l in 0..self.leaves {
                let leaf = format!("h{h}_l{l}");
                if l % 2 == 0 {
                    g.set_edge(&hub, &leaf);
                } else {
                    g.set_edge(&leaf, &hub);
                }
                if self.cross_every > 0 && l % self.cross_every == 0 {
                    g.set_edge(&leaf, &format!("h{}_l0", (h + 1) % self.hubs));
                }
            }
        }
        if compound {
            for h in (0..self.hubs).step_by(3) {
                let group = g.ensure_node(&format!("group{h}"));
                if let Some(hub) = g.node_id(&format!("h{h}")) {
                    g.set_parent(hub, group);
                }
                g.set_edge(&format!("group{h}"), &format!("h{h}_l1"));
            }
        }
        g.for_each_node_mut(|_, lbl| *lbl = NodeLabel::sized(30.0, 20.0));
        g
    }
}

fn bench_bus_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("bus_detection");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        (
            "hubs_20_l8",
            HubShape {
                hubs: 20,
                leaves: 8,
                cross_every: 0,
            },
        ),
        (
            "hubs_50_l16_x4",
            HubShape {
                hubs: 50,
                leaves: 16,
                cross_every: 4,
            },
        ),
        (
            "hubs_200_l12_x3",
            HubShape {
                hubs: 200,
                leaves: 12,
                cross_every: 3,
            },
        ),
    ];

    let opts = BusDetectionOptions::default();
    for (name, shape) in cases {
        let g = shape.build(false);
        group.bench_with_input(BenchmarkId::new("detect_buses", name), &g, |b, g| {
            b.iter(|| black_box(detect_buses(black_box(g), &opts).len()))
        });
    }

    group.finish();
}

fn bench_isolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("isolation");

    let shape = HubShape {
        hubs: 60,
        leaves: 10,
        cross_every: 5,
    };
    group.bench_with_input(
        BenchmarkId::new("group_edges+grid", "hubs_60_l10"),
        &shape,
        |b, shape| {
            b.iter_batched(
                || shape.build(true),
                |mut g| {
                    let mut stage =
                        IsolationStage::group_edges().with_router(OrthogonalRouter::default());
                    let _ = stage.apply_stage(black_box(&mut g), &mut GridLayout::default());
                    black_box(g.edge_count());
                },
                BatchSize::LargeInput,
            )
        },
    );

    group.finish();
}

criterion_group!(benches, bench_bus_detection, bench_isolation);
criterion_main!(benches);
