//! Procedural world generation: node graph, asteroid fields, market.
//!
//! Draw order is fixed: node count, per-node kind/hazard/pirate, spanning
//! tree, extra edges, asteroids per node, then market per commodity.

use crate::constants::{
    EDGE_FUEL_COST_MIN, EDGE_THREAT_NOISE, EDGE_THREAT_PRIOR, HAZARD_NODE_HAZARD_BOOST,
    HAZARD_NODE_PIRATE_BOOST, HAZARD_NODE_PROBABILITY, MAX_ASTEROIDS, MAX_NODES, MIN_ASTEROIDS,
    MIN_NODES, PRICE_BASE, PRICE_MAX, PRICE_MIN, TRAVEL_FUEL_COST_MAX,
    TRAVEL_TIME_MAX, TWO_PI,
};
use crate::graph::index_reachability;
use crate::rng::Pcg32;
use crate::{Asteroid, AsteroidEstimate, CommodityMarket, Edge, Market, NodeKind, World};

#[allow(clippy::cast_possible_truncation)]
const MAX_NODES_U32: u32 = MAX_NODES as u32;
#[allow(clippy::cast_possible_truncation)]
const MAX_ASTEROIDS_U32: u32 = MAX_ASTEROIDS as u32;
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const TRAVEL_TIME_MAX_U32: u32 = TRAVEL_TIME_MAX as u32;

pub fn generate_world(rng: &mut Pcg32) -> World {
    let node_count = rng.range(MIN_NODES, MAX_NODES_U32 + 1) as usize;
    let mut world = World::empty(node_count);
    world.nodes[0].kind = NodeKind::Station;

    for node in &mut world.nodes[1..node_count] {
        node.kind = if rng.next_f32() < HAZARD_NODE_PROBABILITY {
            NodeKind::Hazard
        } else {
            NodeKind::Cluster
        };
        node.hazard = rng.uniform(0.05, 0.35);
        node.pirate = rng.uniform(0.05, 0.30);
        if node.kind == NodeKind::Hazard {
            node.hazard += HAZARD_NODE_HAZARD_BOOST;
            node.pirate += HAZARD_NODE_PIRATE_BOOST;
        }
    }

    build_spanning_tree(&mut world, rng);

    for _ in 0..node_count {
        let u = rng.range(0, node_count as u32) as usize;
        let v = rng.range(0, node_count as u32) as usize;
        if u == v {
            continue;
        }
        add_edge(&mut world, rng, u, v);
    }

    index_reachability(&mut world);
    generate_asteroids(&mut world, rng);
    world
}

/// Attaches node `i` to a uniformly drawn earlier node.
///
/// If the drawn parent has no free slot, `i` attaches to the lowest-index
/// earlier node that still has one, so the graph stays connected.
fn build_spanning_tree(world: &mut World, rng: &mut Pcg32) {
    for node in 1..world.node_count {
        let parent = rng.range(0, node as u32) as usize;
        if add_edge(world, rng, node, parent) {
            continue;
        }
        let fallback = (0..node).find(|&candidate| {
            world.nodes[candidate].first_free_slot().is_some()
                && !world.nodes[node].has_edge_to(candidate)
        });
        if let Some(fallback) = fallback {
            add_edge(world, rng, node, fallback);
        }
    }
}

/// Places an undirected edge, drawing its attributes only when it fits.
///
/// Returns `false` without consuming draws for duplicates or full slots.
fn add_edge(world: &mut World, rng: &mut Pcg32, u: usize, v: usize) -> bool {
    if u >= world.node_count || v >= world.node_count || world.nodes[u].has_edge_to(v) {
        return false;
    }
    let (Some(u_slot), Some(v_slot)) = (
        world.nodes[u].first_free_slot(),
        world.nodes[v].first_free_slot(),
    ) else {
        return false;
    };

    #[allow(clippy::cast_possible_truncation)] // range is 1..=8
    let travel_time = rng.range(1, TRAVEL_TIME_MAX_U32 + 1) as u8;
    let fuel_cost = rng.uniform(EDGE_FUEL_COST_MIN, TRAVEL_FUEL_COST_MAX * 0.7);
    let (nu, nv) = (&world.nodes[u], &world.nodes[v]);
    let threat = (0.5 * (nu.hazard + nv.hazard)
        + 0.5 * (nu.pirate + nv.pirate)
        + rng.normal(0.0, EDGE_THREAT_NOISE))
    .clamp(0.0, 1.0);

    let side = |to| Edge {
        to,
        travel_time,
        fuel_cost,
        threat,
        threat_estimate: EDGE_THREAT_PRIOR,
    };
    world.nodes[u].edges[u_slot] = Some(side(v));
    world.nodes[v].edges[v_slot] = Some(side(u));
    true
}

fn generate_asteroids(world: &mut World, rng: &mut Pcg32) {
    let node_count = world.node_count;
    for node in &mut world.nodes[..node_count] {
        if node.kind == NodeKind::Station {
            continue;
        }
        let count = rng.range(MIN_ASTEROIDS, MAX_ASTEROIDS_U32 + 1) as usize;
        for slot in &mut node.asteroids[..count] {
            let composition = rng.dirichlet();
            let richness = rng.lognormal(-0.2, 0.65).clamp(0.2, 4.0);
            let stability = rng.beta_3_2();
            let noise_profile = rng.uniform(0.04, 0.22);
            let estimate = AsteroidEstimate::uninformed(rng.dirichlet());
            *slot = Some(Asteroid {
                composition,
                richness,
                stability,
                noise_profile,
                depletion: 0.0,
                estimate,
            });
        }
    }
}

pub fn generate_market(rng: &mut Pcg32) -> Market {
    let mut market = Market::default();
    for (index, commodity) in market.commodities.iter_mut().enumerate() {
        let inventory = rng.uniform(20.0, 120.0);
        let phase = rng.uniform(0.0, TWO_PI);
        let period = rng.uniform(180.0, 380.0);
        let amplitude = PRICE_BASE[index] * rng.uniform(0.10, 0.30);
        let price =
            (PRICE_BASE[index] + amplitude * phase.sin()).clamp(PRICE_MIN[index], PRICE_MAX[index]);
        *commodity = CommodityMarket {
            price,
            prev_price: price,
            phase,
            period,
            amplitude,
            inventory,
            recent_sales: 0.0,
        };
    }
    market
}
