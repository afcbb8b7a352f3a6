use rand::Rng;

use crate::behavior;
use crate::error::FlockError;
use crate::math;
use crate::vector::Vector3D;

/// Half-extents of the box the agents fly in. The box spans `±width`,
/// `±height` and `±depth` around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl WorldBounds {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn validate(&self) -> Result<(), FlockError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) && ok(self.depth) {
            Ok(())
        } else {
            Err(FlockError::InvalidBounds {
                width: self.width,
                height: self.height,
                depth: self.depth,
            })
        }
    }

    pub fn contains(&self, point: Vector3D) -> bool {
        math::abs(point.x) <= self.width
            && math::abs(point.y) <= self.height
            && math::abs(point.z) <= self.depth
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(1000.0, 1000.0, 400.0)
    }
}

/// Per-agent tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    pub max_speed: f32,
    pub max_steer_force: f32,
    pub neighborhood_radius: f32,
    pub wall_avoidance_weight: f32,
    pub goal_weight: f32,
    /// Chance per tick that the flocking rules run at all.
    pub flocking_chance: f32,
    /// Chance that a given peer is considered by one flocking rule.
    pub peer_sample_rate: f32,
    pub repulse_radius: f32,
    pub repulse_weight: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            max_steer_force: 0.1,
            neighborhood_radius: 100.0,
            wall_avoidance_weight: 5.0,
            goal_weight: 0.005,
            flocking_chance: 0.5,
            peer_sample_rate: 0.4,
            repulse_radius: 150.0,
            repulse_weight: 0.5,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), FlockError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        let probability = |v: f32| (0.0..=1.0).contains(&v);

        let reason = if !positive(self.max_speed) {
            "max_speed must be finite and positive"
        } else if !positive(self.max_steer_force) {
            "max_steer_force must be finite and positive"
        } else if !positive(self.neighborhood_radius) {
            "neighborhood_radius must be finite and positive"
        } else if !non_negative(self.wall_avoidance_weight) {
            "wall_avoidance_weight must be finite and non-negative"
        } else if !non_negative(self.goal_weight) {
            "goal_weight must be finite and non-negative"
        } else if !probability(self.flocking_chance) {
            "flocking_chance must be within [0, 1]"
        } else if !probability(self.peer_sample_rate) {
            "peer_sample_rate must be within [0, 1]"
        } else if !non_negative(self.repulse_radius) {
            "repulse_radius must be finite and non-negative"
        } else if !non_negative(self.repulse_weight) {
            "repulse_weight must be finite and non-negative"
        } else {
            return Ok(());
        };

        Err(FlockError::InvalidConfig { reason })
    }
}

/// A single self-propelled agent.
///
/// Position and velocity only change through [`SteeringAgent::step`]; other
/// agents are read, never written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringAgent {
    position: Vector3D,
    velocity: Vector3D,
    acceleration: Vector3D,
    config: AgentConfig,
    bounds: WorldBounds,
    avoid_walls: bool,
    goal: Option<Vector3D>,
}

impl SteeringAgent {
    pub fn new(position: Vector3D, velocity: Vector3D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector3D::zero(),
            config: AgentConfig::default(),
            bounds: WorldBounds::default(),
            avoid_walls: false,
            goal: None,
        }
    }

    pub fn with_config(
        position: Vector3D,
        velocity: Vector3D,
        config: AgentConfig,
    ) -> Result<Self, FlockError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(position, velocity)
        })
    }

    /// Draws a fresh agent inside `bounds`: x and y across the full span,
    /// z in `[0, depth)`, velocity components in `[-1, 1)`.
    pub fn random<R: Rng>(bounds: WorldBounds, config: AgentConfig, rng: &mut R) -> Self {
        let position = Vector3D::new(
            rng.gen_range(-bounds.width..bounds.width),
            rng.gen_range(-bounds.height..bounds.height),
            rng.gen_range(0.0..bounds.depth),
        );
        let velocity = Vector3D::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );

        let mut agent = Self::new(position, velocity);
        agent.config = config;
        agent.bounds = bounds;
        agent.avoid_walls = true;
        agent
    }

    pub fn position(&self) -> Vector3D {
        self.position
    }

    pub fn velocity(&self) -> Vector3D {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector3D {
        self.acceleration
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn avoids_walls(&self) -> bool {
        self.avoid_walls
    }

    pub fn goal(&self) -> Option<Vector3D> {
        self.goal
    }

    pub fn set_goal(&mut self, goal: Option<Vector3D>) {
        self.goal = goal;
    }

    pub fn set_avoid_walls(&mut self, avoid_walls: bool) {
        self.avoid_walls = avoid_walls;
    }

    pub fn set_world_bounds(&mut self, bounds: WorldBounds) {
        self.bounds = bounds;
    }

    pub fn apply_force(&mut self, force: Vector3D) {
        self.acceleration += force;
    }

    /// Pushes the agent away from `target` when it is within the repulse
    /// radius. The push is applied on the next [`step`](Self::step).
    pub fn repulse(&mut self, target: Vector3D) {
        let force = behavior::repulse(
            self.position,
            target,
            self.config.repulse_radius,
            self.config.repulse_weight,
        );
        self.apply_force(force);
    }

    /// Advances the agent one tick against `peers`, which may include the
    /// agent itself.
    pub fn step<R: Rng>(&mut self, peers: &[SteeringAgent], rng: &mut R) {
        if self.avoid_walls {
            let avoidance = behavior::avoid_walls(self.position, &self.bounds)
                * self.config.wall_avoidance_weight;
            self.apply_force(avoidance);
        }

        if rng.gen_bool(f64::from(self.config.flocking_chance)) {
            self.flock(peers, rng);
        }

        self.integrate();
    }

    fn flock<R: Rng>(&mut self, peers: &[SteeringAgent], rng: &mut R) {
        let rate = f64::from(self.config.peer_sample_rate);

        let reach = match self.goal {
            Some(goal) => behavior::reach(self.position, goal, self.config.goal_weight),
            None => Vector3D::zero(),
        };
        // Each rule samples its own subset of peers.
        let alignment = behavior::alignment(self, peers.iter().filter(|_| rng.gen_bool(rate)));
        let cohesion = behavior::cohesion(self, peers.iter().filter(|_| rng.gen_bool(rate)));
        let separation = behavior::separation(self, peers.iter().filter(|_| rng.gen_bool(rate)));

        self.apply_force(reach);
        self.apply_force(alignment);
        self.apply_force(cohesion);
        self.apply_force(separation);
    }

    fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(self.config.max_speed);
        self.position += self.velocity;
        self.acceleration = Vector3D::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_agent_creation() {
        let agent = SteeringAgent::new(Vector3D::new(10.0, 20.0, 30.0), Vector3D::new(1.0, 1.0, 0.0));

        assert_eq!(agent.position(), Vector3D::new(10.0, 20.0, 30.0));
        assert_eq!(agent.velocity(), Vector3D::new(1.0, 1.0, 0.0));
        assert_eq!(agent.acceleration(), Vector3D::zero());
        assert!(agent.goal().is_none());
        assert!(!agent.avoids_walls());
    }

    #[test]
    fn test_integrate_moves_by_velocity() {
        let mut agent = SteeringAgent::new(Vector3D::zero(), Vector3D::new(1.0, 1.0, 1.0));
        agent.integrate();
        assert_eq!(agent.position(), Vector3D::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_step_clamps_speed_and_clears_acceleration() {
        let mut rng = create_rng(7);
        let mut agent = SteeringAgent::new(Vector3D::zero(), Vector3D::new(3.0, 0.0, 0.0));
        agent.apply_force(Vector3D::new(50.0, -20.0, 5.0));

        agent.step(&[], &mut rng);

        assert!(agent.velocity().magnitude() <= agent.config().max_speed);
        assert_eq!(agent.acceleration(), Vector3D::zero());
    }

    #[test]
    fn test_speed_invariant_over_many_ticks() {
        let mut rng = create_rng(11);
        let bounds = WorldBounds::default();
        let mut agents: Vec<SteeringAgent> = (0..12)
            .map(|_| SteeringAgent::random(bounds, AgentConfig::default(), &mut rng))
            .collect();

        for _ in 0..300 {
            for index in 0..agents.len() {
                let mut agent = agents[index];
                agent.step(&agents, &mut rng);
                assert!(agent.velocity().magnitude() <= agent.config().max_speed);
                assert_eq!(agent.acceleration(), Vector3D::zero());
                agents[index] = agent;
            }
        }
    }

    #[test]
    fn test_random_agent_within_spawn_volume() {
        let mut rng = create_rng(3);
        let bounds = WorldBounds::default();
        for _ in 0..200 {
            let agent = SteeringAgent::random(bounds, AgentConfig::default(), &mut rng);
            let p = agent.position();
            assert!(p.x >= -1000.0 && p.x < 1000.0);
            assert!(p.y >= -1000.0 && p.y < 1000.0);
            assert!(p.z >= 0.0 && p.z < 400.0);
            let v = agent.velocity();
            assert!(v.x.abs() <= 1.0 && v.y.abs() <= 1.0 && v.z.abs() <= 1.0);
            assert!(agent.avoids_walls());
        }
    }

    #[test]
    fn test_agent_outside_bounds_returns() {
        let mut rng = create_rng(99);
        let bounds = WorldBounds::default();
        let mut agent = SteeringAgent::new(
            Vector3D::new(1100.0, 200.0, 100.0),
            Vector3D::new(1.0, 0.0, 0.0),
        );
        agent.set_world_bounds(bounds);
        agent.set_avoid_walls(true);

        let returned = (0..200).any(|_| {
            agent.step(&[], &mut rng);
            bounds.contains(agent.position())
        });

        assert!(returned, "agent still outside at {:?}", agent.position());
    }

    #[test]
    fn test_agent_on_wall_stays_finite() {
        let mut rng = create_rng(5);
        let mut agent = SteeringAgent::new(
            Vector3D::new(1000.0, 0.0, 0.0),
            Vector3D::zero(),
        );
        agent.set_avoid_walls(true);

        for _ in 0..10 {
            agent.step(&[], &mut rng);
            assert!(agent.position().is_finite());
            assert!(agent.velocity().is_finite());
        }
    }

    #[test]
    fn test_goal_pulls_agent() {
        let config = AgentConfig {
            flocking_chance: 1.0,
            ..AgentConfig::default()
        };
        let mut rng = create_rng(1);
        let mut agent =
            SteeringAgent::with_config(Vector3D::zero(), Vector3D::zero(), config).unwrap();
        agent.set_goal(Some(Vector3D::new(0.0, 500.0, 0.0)));

        agent.step(&[], &mut rng);

        assert!(agent.velocity().y > 0.0);
    }

    #[test]
    fn test_repulse_within_radius() {
        let mut agent = SteeringAgent::new(Vector3D::new(100.0, 0.0, 0.0), Vector3D::zero());
        agent.repulse(Vector3D::zero());
        assert!(agent.acceleration().x > 0.0);

        let mut far = SteeringAgent::new(Vector3D::new(400.0, 0.0, 0.0), Vector3D::zero());
        far.repulse(Vector3D::zero());
        assert_eq!(far.acceleration(), Vector3D::zero());
    }

    #[test]
    fn test_with_config_rejects_bad_probability() {
        let config = AgentConfig {
            peer_sample_rate: 1.5,
            ..AgentConfig::default()
        };
        let err = SteeringAgent::with_config(Vector3D::zero(), Vector3D::zero(), config)
            .unwrap_err();
        assert_eq!(
            err,
            FlockError::InvalidConfig {
                reason: "peer_sample_rate must be within [0, 1]"
            }
        );
    }

    #[test]
    fn test_bounds_validation() {
        assert!(WorldBounds::default().validate().is_ok());
        assert!(WorldBounds::new(0.0, 10.0, 10.0).validate().is_err());
        assert!(WorldBounds::new(10.0, f32::NAN, 10.0).validate().is_err());
        assert!(WorldBounds::new(10.0, 10.0, -1.0).validate().is_err());
    }
}
