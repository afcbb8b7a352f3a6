use core::f32::consts::PI;

use rand::Rng;

use crate::math;
use crate::vector::Vector3D;

/// Wing phase wraps at ten full flap cycles.
pub const WING_PHASE_PERIOD: f32 = 20.0 * PI;

/// Flap advance applied every frame on top of the climb bonus.
const WING_PHASE_STEP: f32 = 0.1;

/// Renderer-facing pose of one agent, derived from its velocity each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Presentation {
    heading: f32,
    bank: f32,
    wing_phase: f32,
}

impl Presentation {
    /// Starts at a whole-number wing phase drawn from `[0, 20π)`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let seed: f32 = rng.gen_range(0.0..WING_PHASE_PERIOD);
        Self {
            heading: 0.0,
            bank: 0.0,
            wing_phase: math::floor(seed),
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn bank(&self) -> f32 {
        self.bank
    }

    pub fn wing_phase(&self) -> f32 {
        self.wing_phase
    }

    /// Recomputes heading and bank from `velocity` and advances the flap.
    /// Climbing birds flap faster.
    pub(crate) fn update(&mut self, velocity: Vector3D) {
        self.heading = heading(velocity);
        self.bank = bank(velocity);
        self.wing_phase = math::wrap(
            self.wing_phase + self.bank.max(0.0) + WING_PHASE_STEP,
            WING_PHASE_PERIOD,
        );
    }
}

/// Yaw in the ground plane.
pub fn heading(velocity: Vector3D) -> f32 {
    math::atan2(-velocity.z, velocity.x)
}

/// Pitch of the velocity out of the ground plane; zero when not moving.
pub fn bank(velocity: Vector3D) -> f32 {
    let speed = velocity.magnitude();
    if speed > 0.0 {
        math::asin((velocity.y / speed).clamp(-1.0, 1.0))
    } else {
        0.0
    }
}
