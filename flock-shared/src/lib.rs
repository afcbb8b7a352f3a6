#![cfg_attr(not(feature = "std"), no_std)]

use flock_core::{AgentConfig, Snapshot, Vector3D, WorldBounds};
use serde::{Deserialize, Serialize};

/// Vertical travel of the wing tips at full flap
pub const WING_FLAP_AMPLITUDE: f32 = 5.0;

/// Height at which a bird is drawn pure black; brighter below, darker above
const SHADE_HORIZON: f32 = 500.0;
const SHADE_RANGE: f32 = 1000.0;

/// A 3D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        libm::sqrtf(dx * dx + dy * dy + dz * dz)
    }
}

impl From<[f32; 3]> for Position3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3D> for Position3 {
    fn from(v: Vector3D) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Position3> for Vector3D {
    fn from(p: Position3) -> Self {
        Vector3D::new(p.x, p.y, p.z)
    }
}

/// Kinematic and animation state of one bird after a frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    /// Spawn index; stable for the life of the flock
    pub index: usize,
    pub position: Position3,
    /// Yaw in radians
    pub heading: f32,
    /// Climb angle in radians
    pub bank: f32,
    /// Flap phase in radians, within `[0, 20π)`
    pub wing_phase: f32,
}

impl From<Snapshot> for AgentSnapshot {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            index: snapshot.index,
            position: snapshot.position.into(),
            heading: snapshot.heading,
            bank: snapshot.bank,
            wing_phase: snapshot.wing_phase,
        }
    }
}

/// How a renderer should draw one bird: mesh transform, wing deformation and
/// depth tint. Derived from an [`AgentSnapshot`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BirdPose {
    pub position: Position3,
    pub rotation_y: f32,
    pub rotation_z: f32,
    /// Vertical offset of both wing-tip vertices
    pub wing_tip_y: f32,
    /// Grey level in `[0, 1]` applied to all colour channels
    pub shade: f32,
}

impl BirdPose {
    /// Floats per bird in [`BirdPose::to_array`]
    pub const STRIDE: usize = 7;

    pub fn to_array(&self) -> [f32; Self::STRIDE] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.rotation_y,
            self.rotation_z,
            self.wing_tip_y,
            self.shade,
        ]
    }
}

impl From<&AgentSnapshot> for BirdPose {
    fn from(snapshot: &AgentSnapshot) -> Self {
        let shade = (SHADE_HORIZON - snapshot.position.z) / SHADE_RANGE;
        Self {
            position: snapshot.position,
            rotation_y: snapshot.heading,
            rotation_z: snapshot.bank,
            wing_tip_y: libm::sinf(snapshot.wing_phase) * WING_FLAP_AMPLITUDE,
            shade: shade.clamp(0.0, 1.0),
        }
    }
}

/// Flock configuration document, loaded by hosts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub population: usize,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Fixed seed for reproducible runs; a fresh one is drawn when absent
    pub seed: Option<u64>,
    pub max_speed: f32,
    pub max_steer_force: f32,
    pub neighborhood_radius: f32,
    pub flocking_chance: f32,
    pub peer_sample_rate: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            population: 30,
            width: 1000.0,
            height: 1000.0,
            depth: 400.0,
            seed: None,
            max_speed: 4.0,
            max_steer_force: 0.1,
            neighborhood_radius: 100.0,
            flocking_chance: 0.5,
            peer_sample_rate: 0.4,
        }
    }
}

impl FlockSettings {
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.width, self.height, self.depth)
    }

    /// Agent tunables from these settings; weights not exposed here keep
    /// their defaults.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            max_speed: self.max_speed,
            max_steer_force: self.max_steer_force,
            neighborhood_radius: self.neighborhood_radius,
            flocking_chance: self.flocking_chance,
            peer_sample_rate: self.peer_sample_rate,
            ..AgentConfig::default()
        }
    }
}

#[cfg(feature = "std")]
impl FlockSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Every bird's snapshot for one frame
#[cfg(feature = "std")]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameRecord {
    pub frame: u64,
    pub birds: Vec<AgentSnapshot>,
}
