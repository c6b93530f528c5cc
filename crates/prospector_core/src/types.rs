use crate::constants::{
    ASTEROID_CONFIDENCE_PRIOR, ASTEROID_STABILITY_PRIOR, DEFAULT_INVALID_ACTION_PENALTY,
    FUEL_MAX, HULL_MAX, MAX_ASTEROIDS, MAX_NEIGHBORS, MAX_NODES, N_COMMODITIES, PRICE_BASE,
    START_DECOYS, START_REPAIR_KITS, START_STABILIZERS, TIME_MAX, TOOL_MAX,
};
use crate::rng::Pcg32;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Per-instance configuration. Non-positive values fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub time_max: f32,
    pub invalid_action_penalty: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_max: TIME_MAX,
            invalid_action_penalty: DEFAULT_INVALID_ACTION_PENALTY,
        }
    }
}

impl EngineConfig {
    /// Replaces every non-positive field with its default.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            time_max: if self.time_max > 0.0 {
                self.time_max
            } else {
                defaults.time_max
            },
            invalid_action_penalty: if self.invalid_action_penalty > 0.0 {
                self.invalid_action_penalty
            } else {
                defaults.invalid_action_penalty
            },
        }
    }
}

// ---------------------------------------------------------------------------
// World graph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Station,
    #[default]
    Cluster,
    Hazard,
}

impl NodeKind {
    /// Position in the observation's one-hot node-type block.
    pub fn index(self) -> usize {
        match self {
            NodeKind::Station => 0,
            NodeKind::Cluster => 1,
            NodeKind::Hazard => 2,
        }
    }
}

/// One side of an undirected edge, stored in the owning node's slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: usize,
    pub travel_time: u8,
    pub fuel_cost: f32,
    pub threat: f32,
    pub threat_estimate: f32,
}

/// The agent's noisy knowledge of an asteroid. Only scans touch it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidEstimate {
    pub composition: [f32; N_COMMODITIES],
    pub stability: f32,
    pub confidence: f32,
}

impl AsteroidEstimate {
    pub fn uninformed(composition: [f32; N_COMMODITIES]) -> Self {
        Self {
            composition,
            stability: ASTEROID_STABILITY_PRIOR,
            confidence: ASTEROID_CONFIDENCE_PRIOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub composition: [f32; N_COMMODITIES],
    pub richness: f32,
    pub stability: f32,
    pub noise_profile: f32,
    pub depletion: f32,
    pub estimate: AsteroidEstimate,
}

impl Asteroid {
    pub fn is_depleted(&self) -> bool {
        self.depletion >= 1.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub hazard: f32,
    pub pirate: f32,
    pub edges: [Option<Edge>; MAX_NEIGHBORS],
    pub asteroids: [Option<Asteroid>; MAX_ASTEROIDS],
    /// BFS hop count to the station, saturated at `MAX_NODES - 1`.
    pub steps_to_station: u8,
}

impl Node {
    pub fn has_edge_to(&self, other: usize) -> bool {
        self.edges.iter().flatten().any(|edge| edge.to == other)
    }

    pub fn first_free_slot(&self) -> Option<usize> {
        self.edges.iter().position(Option::is_none)
    }

    pub fn neighbor_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub node_count: usize,
    pub nodes: [Node; MAX_NODES],
}

impl World {
    /// All `MAX_NODES` slots are held inline; only the first `node_count` are live.
    pub fn empty(node_count: usize) -> Self {
        Self {
            node_count,
            nodes: std::array::from_fn(|_| Node::default()),
        }
    }

    pub fn live_nodes(&self) -> &[Node] {
        &self.nodes[..self.node_count]
    }
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CommodityMarket {
    pub price: f32,
    pub prev_price: f32,
    pub phase: f32,
    pub period: f32,
    pub amplitude: f32,
    pub inventory: f32,
    pub recent_sales: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub commodities: [CommodityMarket; N_COMMODITIES],
}

impl Market {
    /// Cargo valued at current prices.
    pub fn value_of(&self, cargo: &[f32; N_COMMODITIES]) -> f32 {
        let mut value = 0.0_f32;
        for (held, commodity) in cargo.iter().zip(&self.commodities) {
            value += held * commodity.price;
        }
        value
    }

    pub fn base_price(commodity: usize) -> f32 {
        PRICE_BASE[commodity]
    }
}

// ---------------------------------------------------------------------------
// Ship and episode bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub credits: f32,
    pub fuel: f32,
    pub hull: f32,
    pub heat: f32,
    pub tool: f32,
    pub alert: f32,
    pub cargo: [f32; N_COMMODITIES],
    pub repair_kits: u8,
    pub stabilizers: u8,
    pub decoys: u8,
    pub escape_buff: u8,
    /// Indexed by asteroid slot, independent of node.
    pub stabilize_buff: [u8; MAX_ASTEROIDS],
    pub node: usize,
    pub selected: Option<usize>,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            credits: 0.0,
            fuel: FUEL_MAX,
            hull: HULL_MAX,
            heat: 0.0,
            tool: TOOL_MAX,
            alert: 0.0,
            cargo: [0.0; N_COMMODITIES],
            repair_kits: START_REPAIR_KITS,
            stabilizers: START_STABILIZERS,
            decoys: START_DECOYS,
            escape_buff: 0,
            stabilize_buff: [0; MAX_ASTEROIDS],
            node: 0,
            selected: None,
        }
    }
}

impl Ship {
    pub fn cargo_total(&self) -> f32 {
        let mut total = 0.0_f32;
        for held in &self.cargo {
            total += held;
        }
        total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub total_spend: f32,
    pub overheat_ticks: u32,
    pub pirate_encounters: u32,
    pub value_lost_to_pirates: f32,
    pub scan_count: u32,
    pub mining_ticks: u32,
    pub fuel_start: f32,
    pub hull_start: f32,
    pub tool_start: f32,
    pub cargo_util_sum: f32,
    pub cargo_util_count: f32,
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Full state of one instance: regenerated wholesale on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub config: EngineConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub world: World,
    pub market: Market,
    pub ship: Ship,
    pub stats: EpisodeStats,
    pub ticks_elapsed: u32,
    pub time_remaining: f32,
}

impl SimState {
    pub fn current_node(&self) -> &Node {
        &self.world.nodes[self.ship.node]
    }

    pub fn at_station(&self) -> bool {
        self.current_node().kind == NodeKind::Station
    }

    /// Selected asteroid slot if it exists at the current node and is not depleted.
    pub fn valid_selection(&self) -> Option<usize> {
        let slot = self.ship.selected?;
        match self.current_node().asteroids.get(slot) {
            Some(Some(asteroid)) if !asteroid.is_depleted() => Some(slot),
            _ => None,
        }
    }

    pub fn asteroid_mut(&mut self, slot: usize) -> Option<&mut Asteroid> {
        let node = self.ship.node;
        self.world.nodes[node].asteroids[slot].as_mut()
    }

    pub fn cargo_value(&self) -> f32 {
        self.market.value_of(&self.ship.cargo)
    }
}
