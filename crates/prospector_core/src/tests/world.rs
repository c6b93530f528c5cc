use super::*;
use crate::graph::{steps_to_station, UNREACHABLE};
use crate::world::{generate_market, generate_world};

#[test]
fn test_world_shape_across_seeds() {
    for seed in 0..64 {
        let world = generate_world(&mut Pcg32::for_world(seed));
        assert!((8..=32).contains(&world.node_count), "seed {seed}");
        let inline: &[Node; constants::MAX_NODES] = &world.nodes;
        assert_eq!(inline.len(), constants::MAX_NODES);
        assert_eq!(world.nodes[0].kind, NodeKind::Station);
        assert!(world.live_nodes()[1..]
            .iter()
            .all(|node| node.kind != NodeKind::Station));
    }
}

#[test]
fn test_edges_are_symmetric_and_distinct() {
    for seed in 0..64 {
        let world = generate_world(&mut Pcg32::for_world(seed));
        for (index, node) in world.live_nodes().iter().enumerate() {
            let mut targets = Vec::new();
            for edge in node.edges.iter().flatten() {
                assert_ne!(edge.to, index, "self loop at {index}");
                assert!(edge.to < world.node_count);
                assert!((1..=8).contains(&edge.travel_time));
                assert!((0.0..=1.0).contains(&edge.threat));
                assert!(!targets.contains(&edge.to), "duplicate edge");
                targets.push(edge.to);

                let back = world.nodes[edge.to]
                    .edges
                    .iter()
                    .flatten()
                    .find(|other| other.to == index)
                    .expect("reverse edge");
                assert_eq!(back.travel_time, edge.travel_time);
                assert_eq!(back.fuel_cost.to_bits(), edge.fuel_cost.to_bits());
                assert_eq!(back.threat.to_bits(), edge.threat.to_bits());
            }
        }
    }
}

#[test]
fn test_every_node_reaches_the_station() {
    for seed in 0..128 {
        let world = generate_world(&mut Pcg32::for_world(seed));
        let mut seen = vec![false; world.node_count];
        let mut stack = vec![0_usize];
        seen[0] = true;
        while let Some(node) = stack.pop() {
            for edge in world.nodes[node].edges.iter().flatten() {
                if !seen[edge.to] {
                    seen[edge.to] = true;
                    stack.push(edge.to);
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "seed {seed} is disconnected");
    }
}

#[test]
fn test_reachability_index_matches_bfs() {
    let world = generate_world(&mut Pcg32::for_world(5));
    let steps = steps_to_station(&world);
    assert_eq!(steps[0], 0);
    for (index, node) in world.live_nodes().iter().enumerate() {
        assert_eq!(node.steps_to_station, steps[index]);
        if index > 0 {
            let best_neighbor = node
                .edges
                .iter()
                .flatten()
                .map(|edge| steps[edge.to])
                .min()
                .unwrap();
            assert_eq!(steps[index], best_neighbor + 1);
        }
    }
    for dead in &steps[world.node_count..] {
        assert_eq!(*dead, UNREACHABLE);
    }
}

#[test]
fn test_asteroid_fields() {
    for seed in 0..32 {
        let world = generate_world(&mut Pcg32::for_world(seed));
        assert!(world.nodes[0].asteroids.iter().all(Option::is_none));
        for node in &world.live_nodes()[1..] {
            let count = node.asteroids.iter().flatten().count();
            assert!((5..=16).contains(&count));
            // Occupied slots are a prefix.
            assert!(node.asteroids[..count].iter().all(Option::is_some));
            for asteroid in node.asteroids.iter().flatten() {
                let truth: f32 = asteroid.composition.iter().sum();
                let belief: f32 = asteroid.estimate.composition.iter().sum();
                assert!((truth - 1.0).abs() < 1e-5);
                assert!((belief - 1.0).abs() < 1e-5);
                assert!((0.2..=4.0).contains(&asteroid.richness));
                assert!((0.0..=1.0).contains(&asteroid.stability));
                assert!((0.04..=0.2201).contains(&asteroid.noise_profile));
                assert_close(asteroid.depletion, 0.0, "depletion");
                assert_close(asteroid.estimate.confidence, 0.1, "confidence prior");
            }
        }
    }
}

#[test]
fn test_market_starts_inside_price_bands() {
    let mut rng = Pcg32::for_world(17);
    let _ = generate_world(&mut rng);
    let market = generate_market(&mut rng);
    for (index, entry) in market.commodities.iter().enumerate() {
        assert!(entry.price >= constants::PRICE_MIN[index]);
        assert!(entry.price <= constants::PRICE_MAX[index]);
        assert_eq!(entry.price.to_bits(), entry.prev_price.to_bits());
        assert!((20.0..=120.01).contains(&entry.inventory));
        assert_close(entry.recent_sales, 0.0, "recent sales");
    }
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate_world(&mut Pcg32::for_world(99));
    let b = generate_world(&mut Pcg32::for_world(99));
    assert_eq!(a, b);
}
