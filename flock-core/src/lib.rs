//! Ambient bird flock: steering agents that avoid the walls of a box, seek
//! an optional goal, and align, cohere and separate from sampled neighbours.
//!
//! The host spawns a flock once, calls `advance_frame` on every animation
//! tick and reads `snapshot()` to pose its own meshes. All randomness comes
//! from the generator handed to the flock at spawn, so a seed fully
//! determines a run.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod agent;
pub mod behavior;
pub mod error;
pub mod flock;
mod math;
pub mod presentation;
pub mod rng;
pub mod vector;

pub use agent::{AgentConfig, SteeringAgent, WorldBounds};
pub use error::FlockError;
pub use flock::{Flock, Snapshot};
#[cfg(feature = "std")]
pub use flock::FlockStd;
pub use presentation::{Presentation, WING_PHASE_PERIOD};
pub use rng::{create_rng, FlockRng};
pub use vector::Vector3D;
