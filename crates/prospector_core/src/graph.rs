use crate::constants::MAX_NODES;
use crate::World;
use std::collections::VecDeque;

/// Hop distance cap; also the value reported for unreachable nodes.
#[allow(clippy::cast_possible_truncation)]
pub const UNREACHABLE: u8 = (MAX_NODES - 1) as u8;

/// Breadth-first hop counts from the station (node 0) over live nodes.
///
/// Every slot starts at [`UNREACHABLE`]; distances saturate at the same cap.
pub fn steps_to_station(world: &World) -> [u8; MAX_NODES] {
    let mut steps = [UNREACHABLE; MAX_NODES];
    if world.node_count == 0 {
        return steps;
    }
    let mut visited = [false; MAX_NODES];
    let mut queue = VecDeque::with_capacity(MAX_NODES);
    visited[0] = true;
    steps[0] = 0;
    queue.push_back(0usize);
    while let Some(node) = queue.pop_front() {
        let dist = steps[node];
        for edge in world.nodes[node].edges.iter().flatten() {
            let neighbor = edge.to;
            if neighbor >= world.node_count || visited[neighbor] {
                continue;
            }
            visited[neighbor] = true;
            steps[neighbor] = dist.saturating_add(1).min(UNREACHABLE);
            queue.push_back(neighbor);
        }
    }
    steps
}

/// Writes [`steps_to_station`] into each node.
pub fn index_reachability(world: &mut World) {
    let steps = steps_to_station(world);
    for (node, dist) in world.nodes.iter_mut().zip(steps) {
        node.steps_to_station = dist;
    }
}
