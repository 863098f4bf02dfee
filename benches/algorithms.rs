//! 图算法基准测试

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graphkit::algorithm::{
    BridgeFinder, CommunityDetector, KeyVertexFinder, MinimumSpanningTree, SccFinder,
    ShortestPathFinder,
};
use graphkit::{Graph, GraphKind, Vertex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_graph(kind: GraphKind, n: usize, m: usize) -> (Graph<usize>, Vec<Vertex<usize>>) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut graph = Graph::new(kind);
    let vertices: Vec<_> = (0..n).map(|i| graph.add_vertex(i)).collect();

    while graph.edge_count() < m {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b {
            continue;
        }
        if kind.weighted {
            let w = rng.gen_range(1..100);
            graph
                .add_weighted_edge(&vertices[a], &vertices[b], w)
                .unwrap();
        } else {
            graph.add_edge(&vertices[a], &vertices[b]).unwrap();
        }
    }
    (graph, vertices)
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    for &n in &[100usize, 1000] {
        let (undirected, _) = random_graph(GraphKind::UNDIRECTED, n, n * 2);
        group.bench_with_input(BenchmarkId::new("bridges", n), &undirected, |b, g| {
            b.iter(|| BridgeFinder::new(black_box(g)).find().unwrap())
        });

        let (directed, _) = random_graph(GraphKind::DIRECTED, n, n * 2);
        group.bench_with_input(BenchmarkId::new("scc", n), &directed, |b, g| {
            b.iter(|| SccFinder::new(black_box(g)).find().unwrap())
        });
    }
    group.finish();
}

fn bench_weighted(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted");
    for &n in &[100usize, 1000] {
        let (graph, v) = random_graph(GraphKind::WEIGHTED_DIRECTED, n, n * 4);
        group.bench_with_input(BenchmarkId::new("dijkstra", n), &graph, |b, g| {
            b.iter(|| {
                ShortestPathFinder::new(black_box(g))
                    .find(&v[0], &v[n - 1])
                    .unwrap()
            })
        });

        let (graph, _) = random_graph(GraphKind::WEIGHTED_UNDIRECTED, n, n * 4);
        group.bench_with_input(BenchmarkId::new("kruskal", n), &graph, |b, g| {
            b.iter(|| MinimumSpanningTree::new(black_box(g)).find().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("louvain", n), &graph, |b, g| {
            b.iter(|| CommunityDetector::new(black_box(g)).find().unwrap())
        });
    }
    group.finish();
}

fn bench_centrality(c: &mut Criterion) {
    let (graph, _) = random_graph(GraphKind::WEIGHTED_UNDIRECTED, 200, 800);
    c.bench_function("key_vertices_200", |b| {
        b.iter(|| KeyVertexFinder::new(black_box(&graph)).find().unwrap())
    });
}

criterion_group!(benches, bench_traversal, bench_weighted, bench_centrality);
criterion_main!(benches);
