//! Force-directed layout: inverse-square repulsion between all pairs,
//! linear springs along edges.

use rand::Rng;

use crate::error::ConfigError;
use crate::graph::LayoutGraph;
use crate::vector::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub repulsion_strength: f64,
    /// Rest length of an edge spring.
    pub spring_length: f64,
    pub spring_strength: f64,
    /// Velocity scale applied every frame. Must lie in (0, 1).
    pub damping: f64,
    /// Distances below this count as coincident.
    pub min_distance: f64,
    /// Multiplier on `repulsion_strength` for coincident nodes, which are
    /// pushed apart along a random direction.
    pub coincident_boost: f64,
    /// Edge of the cube, centred on the origin, that new nodes are
    /// scattered in.
    pub initial_spread: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 0.3,
            spring_length: 0.2,
            spring_strength: 0.3,
            damping: 0.2,
            min_distance: 0.001,
            coincident_boost: 1000.0,
            initial_spread: 2.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("repulsion_strength", self.repulsion_strength),
            ("spring_length", self.spring_length),
            ("spring_strength", self.spring_strength),
            ("damping", self.damping),
            ("min_distance", self.min_distance),
            ("coincident_boost", self.coincident_boost),
            ("initial_spread", self.initial_spread),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
        }

        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::DampingOutOfRange {
                value: self.damping,
            });
        }
        for (name, value) in [
            ("min_distance", self.min_distance),
            ("coincident_boost", self.coincident_boost),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name });
            }
        }
        for (name, value) in [
            ("repulsion_strength", self.repulsion_strength),
            ("spring_length", self.spring_length),
            ("spring_strength", self.spring_strength),
            ("initial_spread", self.initial_spread),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { name });
            }
        }
        Ok(())
    }
}

/// Advances node kinematics; never changes graph topology.
///
/// `R` supplies the random directions used to separate coincident nodes.
pub struct ForceLayout<R> {
    config: LayoutConfig,
    rng: R,
    positions: Vec<Vec3>,
    forces: Vec<Vec3>,
}

impl<R: Rng> ForceLayout<R> {
    pub fn new(config: LayoutConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            positions: Vec::new(),
            forces: Vec::new(),
        })
    }

    /// Force on a node at `a` pushing it away from a node at `b`.
    fn repulsion(&mut self, a: Vec3, b: Vec3) -> Vec3 {
        let delta = a - b;
        let distance = delta.length();
        if distance < self.config.min_distance {
            return self.random_direction()
                * (self.config.repulsion_strength * self.config.coincident_boost);
        }
        delta.normalize() * (self.config.repulsion_strength / (distance * distance))
    }

    /// Spring force on the `from` end of an edge; `to` receives the negation.
    fn attraction(&self, from: Vec3, to: Vec3) -> Vec3 {
        let delta = to - from;
        let distance = delta.length();
        if distance < self.config.min_distance {
            return Vec3::ZERO;
        }
        delta.normalize() * (self.config.spring_strength * (distance - self.config.spring_length))
    }

    fn random_direction(&mut self) -> Vec3 {
        let v = Vec3::new(
            self.rng.gen::<f64>() - 0.5,
            self.rng.gen::<f64>() - 0.5,
            self.rng.gen::<f64>() - 0.5,
        );
        if v.length() > 0.0 {
            v.normalize()
        } else {
            Vec3::X
        }
    }

    /// Sum every force acting on each node, in node order.
    pub fn accumulate(&mut self, graph: &LayoutGraph) -> &[Vec3] {
        self.positions.clear();
        self.positions.extend(graph.nodes().map(|node| node.position));
        let n = self.positions.len();
        self.forces.clear();
        self.forces.resize(n, Vec3::ZERO);

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let (a, b) = (self.positions[i], self.positions[j]);
                    let force = self.repulsion(a, b);
                    self.forces[i] += force;
                }
            }
        }

        for &(from, to) in graph.edge_ends() {
            let force = self.attraction(self.positions[from], self.positions[to]);
            self.forces[from] += force;
            self.forces[to] -= force;
        }

        &self.forces
    }

    /// Advance the layout by one unit of simulated time.
    pub fn step(&mut self, graph: &mut LayoutGraph) {
        self.accumulate(graph);
        let damping = self.config.damping;
        for (node, &force) in graph.nodes_mut().zip(&self.forces) {
            node.acceleration = force;
            node.velocity += node.acceleration;
            node.velocity *= damping;
            node.position += node.velocity;
        }
    }
}
