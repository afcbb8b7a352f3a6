use rand::Rng;

use crate::agent::{AgentConfig, SteeringAgent, WorldBounds};
use crate::error::FlockError;
use crate::presentation::Presentation;
use crate::rng::{create_rng, FlockRng};
use crate::vector::Vector3D;

/// Read-only view of one agent after a frame, keyed by its spawn index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub index: usize,
    pub position: Vector3D,
    pub heading: f32,
    pub bank: f32,
    pub wing_phase: f32,
}

fn validate(population: usize, bounds: &WorldBounds, config: &AgentConfig) -> Result<(), FlockError> {
    if population == 0 {
        return Err(FlockError::EmptyPopulation);
    }
    bounds.validate()?;
    config.validate()
}

fn spawn<R: Rng>(
    bounds: WorldBounds,
    config: AgentConfig,
    rng: &mut R,
) -> (SteeringAgent, Presentation) {
    let agent = SteeringAgent::random(bounds, config, rng);
    let presentation = Presentation::random(rng);
    (agent, presentation)
}

/// Steps agents in index order against the slice being updated, so agent
/// `i` sees agents `0..i` as they are after this frame and the rest as they
/// were before it.
fn step_sequential<R: Rng>(agents: &mut [SteeringAgent], rng: &mut R) {
    for index in 0..agents.len() {
        let mut agent = agents[index];
        agent.step(agents, rng);
        agents[index] = agent;
    }
}

/// Steps every agent against `previous`, the population as it was before the
/// frame started.
fn step_simultaneous<R: Rng>(
    agents: &mut [SteeringAgent],
    previous: &[SteeringAgent],
    rng: &mut R,
) {
    for agent in agents.iter_mut() {
        agent.step(previous, rng);
    }
}

fn refresh(agents: &[SteeringAgent], presentation: &mut [Presentation]) {
    for (agent, pose) in agents.iter().zip(presentation.iter_mut()) {
        pose.update(agent.velocity());
    }
}

fn snapshots<'a>(
    agents: &'a [SteeringAgent],
    presentation: &'a [Presentation],
) -> impl Iterator<Item = Snapshot> + 'a {
    agents
        .iter()
        .zip(presentation.iter())
        .enumerate()
        .map(|(index, (agent, pose))| Snapshot {
            index,
            position: agent.position(),
            heading: pose.heading(),
            bank: pose.bank(),
            wing_phase: pose.wing_phase(),
        })
}

/// A fixed-capacity flock for embedded (no_std) environments
#[derive(Debug, Clone)]
pub struct Flock<const N: usize, R = FlockRng> {
    agents: heapless::Vec<SteeringAgent, N>,
    presentation: heapless::Vec<Presentation, N>,
    rng: R,
    frame: u64,
}

impl<const N: usize> Flock<N, FlockRng> {
    pub fn seeded(population: usize, bounds: WorldBounds, seed: u64) -> Result<Self, FlockError> {
        Self::initialize(population, bounds, create_rng(seed))
    }
}

impl<const N: usize, R: Rng> Flock<N, R> {
    pub fn initialize(population: usize, bounds: WorldBounds, rng: R) -> Result<Self, FlockError> {
        Self::initialize_with_config(population, bounds, AgentConfig::default(), rng)
    }

    pub fn initialize_with_config(
        population: usize,
        bounds: WorldBounds,
        config: AgentConfig,
        mut rng: R,
    ) -> Result<Self, FlockError> {
        validate(population, &bounds, &config)?;
        if population > N {
            return Err(FlockError::CapacityExceeded {
                requested: population,
                capacity: N,
            });
        }

        let mut agents = heapless::Vec::new();
        let mut presentation = heapless::Vec::new();
        for _ in 0..population {
            let (agent, pose) = spawn(bounds, config, &mut rng);
            let _ = agents.push(agent);
            let _ = presentation.push(pose);
        }

        Ok(Self {
            agents,
            presentation,
            rng,
            frame: 0,
        })
    }

    pub fn advance_frame(&mut self) {
        step_sequential(&mut self.agents, &mut self.rng);
        refresh(&self.agents, &mut self.presentation);
        self.frame += 1;
    }

    /// Like [`advance_frame`](Self::advance_frame), but every agent reads
    /// its peers as they were before the frame. Trajectories differ from the
    /// sequential update.
    pub fn advance_frame_simultaneous(&mut self) {
        let previous = self.agents.clone();
        step_simultaneous(&mut self.agents, &previous, &mut self.rng);
        refresh(&self.agents, &mut self.presentation);
        self.frame += 1;
    }

    pub fn set_goal(&mut self, goal: Option<Vector3D>) {
        for agent in self.agents.iter_mut() {
            agent.set_goal(goal);
        }
    }

    pub fn repulse(&mut self, target: Vector3D) {
        for agent in self.agents.iter_mut() {
            agent.repulse(target);
        }
    }

    pub fn snapshot(&self) -> impl Iterator<Item = Snapshot> + '_ {
        snapshots(&self.agents, &self.presentation)
    }

    pub fn agents(&self) -> &[SteeringAgent] {
        &self.agents
    }

    pub fn presentation(&self) -> &[Presentation] {
        &self.presentation
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of frames advanced since spawn.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// A flock for std environments
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct FlockStd<R = FlockRng> {
    agents: Vec<SteeringAgent>,
    presentation: Vec<Presentation>,
    rng: R,
    frame: u64,
}

#[cfg(feature = "std")]
impl FlockStd<FlockRng> {
    pub fn seeded(population: usize, bounds: WorldBounds, seed: u64) -> Result<Self, FlockError> {
        Self::initialize(population, bounds, create_rng(seed))
    }

    pub fn from_entropy(population: usize, bounds: WorldBounds) -> Result<Self, FlockError> {
        Self::initialize(population, bounds, crate::rng::entropy_rng())
    }
}

#[cfg(feature = "std")]
impl<R: Rng> FlockStd<R> {
    pub fn initialize(population: usize, bounds: WorldBounds, rng: R) -> Result<Self, FlockError> {
        Self::initialize_with_config(population, bounds, AgentConfig::default(), rng)
    }

    pub fn initialize_with_config(
        population: usize,
        bounds: WorldBounds,
        config: AgentConfig,
        mut rng: R,
    ) -> Result<Self, FlockError> {
        validate(population, &bounds, &config)?;

        let (agents, presentation): (Vec<_>, Vec<_>) = (0..population)
            .map(|_| spawn(bounds, config, &mut rng))
            .unzip();

        Ok(Self {
            agents,
            presentation,
            rng,
            frame: 0,
        })
    }

    pub fn advance_frame(&mut self) {
        step_sequential(&mut self.agents, &mut self.rng);
        refresh(&self.agents, &mut self.presentation);
        self.frame += 1;
    }

    /// Like [`advance_frame`](Self::advance_frame), but every agent reads
    /// its peers as they were before the frame. Trajectories differ from the
    /// sequential update.
    pub fn advance_frame_simultaneous(&mut self) {
        let previous = self.agents.clone();
        step_simultaneous(&mut self.agents, &previous, &mut self.rng);
        refresh(&self.agents, &mut self.presentation);
        self.frame += 1;
    }

    pub fn set_goal(&mut self, goal: Option<Vector3D>) {
        for agent in self.agents.iter_mut() {
            agent.set_goal(goal);
        }
    }

    pub fn repulse(&mut self, target: Vector3D) {
        for agent in self.agents.iter_mut() {
            agent.repulse(target);
        }
    }

    pub fn snapshot(&self) -> impl Iterator<Item = Snapshot> + '_ {
        snapshots(&self.agents, &self.presentation)
    }

    pub fn agents(&self) -> &[SteeringAgent] {
        &self.agents
    }

    pub fn presentation(&self) -> &[Presentation] {
        &self.presentation
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
