#![cfg(target_arch = "wasm32")]

use flock_wasm::BirdFlock;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_pose_buffer_tracks_population() {
    let mut flock = BirdFlock::new(30, 1000.0, 1000.0, 400.0, Some(7)).unwrap();
    assert_eq!(flock.len(), 30);

    flock.advance_frame();

    let poses = flock.poses().to_vec();
    assert_eq!(poses.len(), 30 * flock.stride());
    assert_eq!(flock.frame(), 1.0);
    for chunk in poses.chunks(flock.stride()) {
        assert!(chunk.iter().all(|v| v.is_finite()));
        assert!((0.0..=1.0).contains(&chunk[6]));
    }
}

#[wasm_bindgen_test]
fn test_same_seed_same_poses() {
    let mut a = BirdFlock::new(12, 1000.0, 1000.0, 400.0, Some(99)).unwrap();
    let mut b = BirdFlock::new(12, 1000.0, 1000.0, 400.0, Some(99)).unwrap();
    for _ in 0..20 {
        a.advance_frame();
        b.advance_frame();
    }
    assert_eq!(a.poses().to_vec(), b.poses().to_vec());
}

#[wasm_bindgen_test]
fn test_rejects_empty_flock() {
    assert!(BirdFlock::new(0, 1000.0, 1000.0, 400.0, None).is_err());
    assert!(BirdFlock::from_settings(r#"{ "population": 5, "depth": -1.0 }"#).is_err());
}

#[wasm_bindgen_test]
fn test_snapshot_json_lists_every_bird() {
    let mut flock = BirdFlock::from_settings(r#"{ "population": 4, "seed": 1 }"#).unwrap();
    flock.set_goal(0.0, 0.0, 200.0);
    flock.repulse(0.0, 0.0, 0.0);
    flock.advance_frame();
    flock.clear_goal();

    let json = flock.snapshot_json().unwrap();
    assert!(json.starts_with("{\"frame\":1,"));
    assert_eq!(json.matches("\"wing_phase\"").count(), 4);
}
