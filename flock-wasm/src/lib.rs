use flock_core::{FlockStd, Vector3D};
use flock_shared::{AgentSnapshot, BirdPose, FlockSettings, FrameRecord};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Packs every bird's pose into `buffer`, `BirdPose::STRIDE` floats each, in
/// spawn order.
fn pack_poses(flock: &FlockStd, buffer: &mut Vec<f32>) {
    buffer.clear();
    for snapshot in flock.snapshot() {
        let pose = BirdPose::from(&AgentSnapshot::from(snapshot));
        buffer.extend_from_slice(&pose.to_array());
    }
}

fn build_flock(settings: &FlockSettings) -> Result<FlockStd, String> {
    let rng = match settings.seed {
        Some(seed) => flock_core::create_rng(seed),
        None => flock_core::rng::entropy_rng(),
    };
    FlockStd::initialize_with_config(
        settings.population,
        settings.bounds(),
        settings.agent_config(),
        rng,
    )
    .map_err(|e| e.to_string())
}

/// The ambient bird flock as seen from JavaScript. The renderer owns the
/// meshes; this only hands out pose buffers.
#[wasm_bindgen]
pub struct BirdFlock {
    flock: FlockStd,
    poses: Vec<f32>,
}

impl BirdFlock {
    fn with_settings(settings: &FlockSettings) -> Result<BirdFlock, JsValue> {
        console_log!("Initializing bird flock with {} birds", settings.population);

        let flock = build_flock(settings).map_err(|e| JsValue::from_str(&e))?;
        let mut poses = Vec::with_capacity(flock.len() * BirdPose::STRIDE);
        pack_poses(&flock, &mut poses);

        Ok(BirdFlock { flock, poses })
    }
}

#[wasm_bindgen]
impl BirdFlock {
    #[wasm_bindgen(constructor)]
    pub fn new(
        population: usize,
        width: f32,
        height: f32,
        depth: f32,
        seed: Option<u32>,
    ) -> Result<BirdFlock, JsValue> {
        let settings = FlockSettings {
            population,
            width,
            height,
            depth,
            seed: seed.map(u64::from),
            ..FlockSettings::default()
        };
        Self::with_settings(&settings)
    }

    /// Builds a flock from a JSON `FlockSettings` document.
    pub fn from_settings(json: &str) -> Result<BirdFlock, JsValue> {
        let settings =
            FlockSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::with_settings(&settings)
    }

    pub fn advance_frame(&mut self) {
        self.flock.advance_frame();
        pack_poses(&self.flock, &mut self.poses);
    }

    pub fn len(&self) -> usize {
        self.flock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flock.is_empty()
    }

    pub fn frame(&self) -> f64 {
        self.flock.frame() as f64
    }

    /// Pose buffer for the last frame: x, y, z, rotation_y, rotation_z,
    /// wing_tip_y, shade per bird.
    pub fn poses(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.poses[..])
    }

    pub fn stride(&self) -> usize {
        BirdPose::STRIDE
    }

    /// Snapshot of the last frame as a JSON `FrameRecord`.
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let record = FrameRecord {
            frame: self.flock.frame(),
            birds: self.flock.snapshot().map(AgentSnapshot::from).collect(),
        };
        serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_goal(&mut self, x: f32, y: f32, z: f32) {
        self.flock.set_goal(Some(Vector3D::new(x, y, z)));
    }

    pub fn clear_goal(&mut self) {
        self.flock.set_goal(None);
    }

    /// Scatters birds near a point, e.g. the pointer projected into the scene.
    pub fn repulse(&mut self, x: f32, y: f32, z: f32) {
        self.flock.repulse(Vector3D::new(x, y, z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_poses_layout() {
        let flock = FlockStd::seeded(5, flock_core::WorldBounds::default(), 3).unwrap();
        let mut buffer = Vec::new();
        pack_poses(&flock, &mut buffer);

        assert_eq!(buffer.len(), 5 * BirdPose::STRIDE);
        for (chunk, agent) in buffer.chunks(BirdPose::STRIDE).zip(flock.agents()) {
            let position = agent.position();
            assert_eq!(&chunk[..3], &[position.x, position.y, position.z]);
            assert!((0.0..=1.0).contains(&chunk[6]));
        }
    }

    #[test]
    fn test_build_flock_reports_bad_settings() {
        let settings = FlockSettings {
            population: 0,
            ..FlockSettings::default()
        };
        let err = build_flock(&settings).unwrap_err();
        assert_eq!(err, "population size must be at least 1");
    }

    #[test]
    fn test_build_flock_is_seeded() {
        let settings = FlockSettings {
            seed: Some(11),
            ..FlockSettings::default()
        };
        let a = build_flock(&settings).unwrap();
        let b = build_flock(&settings).unwrap();
        assert_eq!(a.agents(), b.agents());
    }
}
