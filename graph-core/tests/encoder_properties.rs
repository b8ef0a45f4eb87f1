//! Structural properties of the encoder on randomly generated programs.

use std::collections::HashMap;

use graph_core::sparse::{self, SparseCsc};
use graph_core::{encode, ConstraintSense, HeteroGraph, NodeKind, Relation};

/// Random program with `density` fraction of nonzeros.
struct RandomProgram {
    a: SparseCsc,
    b: Vec<f64>,
    c: Vec<f64>,
    senses: Vec<ConstraintSense>,
    mask: Vec<bool>,
}

fn generate_random_program(m: usize, n: usize, density: f64, seed: u64) -> RandomProgram {
    // Simple LCG random number generator
    let mut rng_state = seed;
    let mut rand = || -> f64 {
        rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((rng_state >> 33) as f64) / (u32::MAX as f64)
    };

    let mut triplets = Vec::new();
    for i in 0..m {
        for j in 0..n {
            if rand() < density {
                triplets.push((i, j, 2.0 * rand() - 1.0));
            }
        }
    }

    let b: Vec<f64> = (0..m).map(|_| rand() * 10.0).collect();
    let c: Vec<f64> = (0..n).map(|_| rand() - 0.5).collect();
    let senses: Vec<ConstraintSense> = (0..m)
        .map(|_| match (rand() * 3.0) as usize {
            0 => ConstraintSense::LessEqual,
            1 => ConstraintSense::Equal,
            _ => ConstraintSense::GreaterEqual,
        })
        .collect();
    let mask: Vec<bool> = (0..n).map(|_| rand() < 0.3).collect();

    RandomProgram {
        a: sparse::from_triplets(m, n, triplets),
        b,
        c,
        senses,
        mask,
    }
}

fn dense_nonzeros(a: &SparseCsc) -> HashMap<(usize, usize), f64> {
    a.iter()
        .filter(|&(&v, _)| v != 0.0)
        .map(|(&v, (i, j))| ((i, j), v))
        .collect()
}

fn assert_mirrored(g: &HeteroGraph, forward: Relation) {
    let fwd = g.edges(forward).expect("forward relation");
    let rev = g.edges(forward.reverse()).expect("reverse relation");
    assert_eq!(fwd.len(), rev.len());
    assert_eq!(fwd.src(), rev.dst());
    assert_eq!(fwd.dst(), rev.src());
    for (w1, w2) in fwd.weights().iter().zip(rev.weights()) {
        assert_eq!(w1.to_bits(), w2.to_bits());
    }
}

#[test]
fn test_flat_counts_match_program() {
    for seed in 0..20 {
        let p = generate_random_program(7 + seed as usize % 5, 11, 0.3, seed);
        let g = encode(&p.a, &p.b, &p.c, None, None).unwrap();

        assert_eq!(g.num_nodes(NodeKind::Constraint), p.b.len());
        assert_eq!(g.num_nodes(NodeKind::Variable), p.c.len());
        assert_eq!(g.num_edges(Relation::VarToCon), sparse::count_nonzeros(&p.a));
        assert!(g.check_consistency().is_ok());
    }
}

#[test]
fn test_weights_round_trip_exactly() {
    for seed in 100..110 {
        let p = generate_random_program(9, 6, 0.4, seed);
        let g = encode(&p.a, &p.b, &p.c, Some(&p.senses), None).unwrap();
        let expected = dense_nonzeros(&p.a);

        let v2c = g.edges(Relation::VarToCon).unwrap();
        let c2v = g.edges(Relation::ConToVar).unwrap();
        let forward: HashMap<(usize, usize), f64> = v2c.iter().map(|(j, i, w)| ((i, j), w)).collect();
        let backward: HashMap<(usize, usize), f64> = c2v.iter().map(|(i, j, w)| ((i, j), w)).collect();

        assert_eq!(forward.len(), expected.len());
        for (&(i, j), &w) in &expected {
            assert_eq!(forward[&(i, j)].to_bits(), w.to_bits(), "v2c weight at ({}, {})", i, j);
            assert_eq!(backward[&(i, j)].to_bits(), w.to_bits(), "c2v weight at ({}, {})", i, j);
        }
        assert_mirrored(&g, Relation::VarToCon);
    }
}

#[test]
fn test_cone_partition_is_respected() {
    for seed in 200..220 {
        let p = generate_random_program(8, 12, 0.35, seed);
        let g = encode(&p.a, &p.b, &p.c, Some(&p.senses), Some(&p.mask)).unwrap();

        let plain: Vec<usize> = (0..p.mask.len()).filter(|&j| !p.mask[j]).collect();
        let cone: Vec<usize> = (0..p.mask.len()).filter(|&j| p.mask[j]).collect();

        assert_eq!(g.num_nodes(NodeKind::Constraint), 8);
        assert_eq!(g.num_nodes(NodeKind::Variable), plain.len());
        assert_eq!(g.num_nodes(NodeKind::ConeVariable), cone.len());

        // Every edge maps back to a nonzero of the right variable group.
        let expected = dense_nonzeros(&p.a);
        let mut seen = 0;
        for (rel, globals) in [(Relation::VarToCon, &plain), (Relation::ConeToCon, &cone)] {
            let store = g.edges(rel).unwrap();
            for (local, i, w) in store.iter() {
                assert!(local < globals.len(), "{} local index {} out of range", rel, local);
                let j = globals[local];
                assert_eq!(p.mask[j], rel == Relation::ConeToCon);
                assert_eq!(expected[&(i, j)].to_bits(), w.to_bits());
                seen += 1;
            }
            assert_mirrored(&g, rel);
        }
        assert_eq!(seen, expected.len());

        // Node features follow the same dense renumbering.
        let x_var = g.node_features(NodeKind::Variable).unwrap();
        for (local, &j) in plain.iter().enumerate() {
            assert_eq!(x_var[[local, 0]], p.c[j]);
        }
        let x_soc = g.node_features(NodeKind::ConeVariable).unwrap();
        for (local, &j) in cone.iter().enumerate() {
            assert_eq!(x_soc[[local, 0]], p.c[j]);
        }
    }
}

#[test]
fn test_all_zero_matrix_gives_empty_relations() {
    let a = sparse::from_triplets(3, 2, Vec::new());
    let g = encode(&a, &[1.0, 2.0, 3.0], &[0.0, 1.0], None, None).unwrap();

    assert_eq!(g.num_nodes(NodeKind::Constraint), 3);
    assert_eq!(g.num_nodes(NodeKind::Variable), 2);
    for rel in g.relations() {
        assert_eq!(g.num_edges(rel), 0, "{} should be empty", rel);
    }

    let g = encode(&a, &[1.0, 2.0, 3.0], &[0.0, 1.0], None, Some(&[true, false])).unwrap();
    assert_eq!(g.relations().count(), 4);
    for rel in Relation::ALL {
        assert_eq!(g.num_edges(rel), 0);
    }
    assert_eq!(g.num_nodes(NodeKind::ConeVariable), 1);
}

#[test]
fn test_graph_survives_json_round_trip() {
    let p = generate_random_program(5, 5, 0.5, 7);
    let g = encode(&p.a, &p.b, &p.c, Some(&p.senses), Some(&p.mask)).unwrap();

    let json = serde_json::to_string(&g).unwrap();
    assert!(json.contains("\"v2c\""));
    assert!(json.contains("\"soc\""));

    let back: HeteroGraph = serde_json::from_str(&json).unwrap();
    assert!(back.check_consistency().is_ok());
    assert_eq!(back, g);
}

#[test]
fn test_json_round_trip_is_bit_exact() {
    for seed in 300..320 {
        let p = generate_random_program(6, 9, 0.5, seed);
        let g = encode(&p.a, &p.b, &p.c, Some(&p.senses), Some(&p.mask)).unwrap();
        let back: HeteroGraph = serde_json::from_str(&serde_json::to_string(&g).unwrap()).unwrap();

        for rel in Relation::ALL {
            let before = g.edge_weights(rel).unwrap();
            let after = back.edge_weights(rel).unwrap();
            let same = before.iter().zip(after).all(|(a, b)| a.to_bits() == b.to_bits());
            assert!(same && before.len() == after.len(), "{} weights changed (seed {})", rel, seed);
        }
        for kind in NodeKind::ALL {
            let before = g.node_features(kind).unwrap();
            let after = back.node_features(kind).unwrap();
            assert!(before.iter().zip(after).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }
}
