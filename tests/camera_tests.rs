// Host-side tests for the scroll-to-depth controller.

use flight_core::*;

const DT: f32 = 1.0 / 60.0;

fn settle(camera: &mut DepthCamera, scroll: f32, frames: usize) -> Vec<f32> {
    (0..frames).map(|_| camera.step(scroll, DT).z).collect()
}

#[test]
fn target_depth_is_monotonic_in_scroll() {
    let mut prev = target_depth(0.0);
    for i in 1..=1000 {
        let d = target_depth(i as f32 / 1000.0);
        assert!(d <= prev, "target depth increased at scroll {}", i as f32 / 1000.0);
        prev = d;
    }
    assert_eq!(target_depth(0.0), 0.0);
    assert_eq!(target_depth(1.0), -MAX_DEPTH);
}

#[test]
fn target_depth_clamps_out_of_range_scroll() {
    assert_eq!(target_depth(-0.5), 0.0);
    assert_eq!(target_depth(1.5), -MAX_DEPTH);
}

#[test]
fn scroll_zero_stays_at_origin() {
    let mut cam = DepthCamera::new();
    let trace = settle(&mut cam, 0.0, 600);
    assert!(trace.iter().all(|z| z.abs() < 1e-6));
}

#[test]
fn scroll_one_settles_at_max_depth() {
    let mut cam = DepthCamera::new();
    settle(&mut cam, 1.0, 2000);
    assert!((cam.position().z + MAX_DEPTH).abs() < 0.01, "z = {}", cam.position().z);
}

#[test]
fn jump_to_bottom_descends_strictly_without_overshoot() {
    let mut cam = DepthCamera::new();
    settle(&mut cam, 0.0, 10);
    let trace = settle(&mut cam, 1.0, 300);
    let mut prev = 0.0_f32;
    for (i, z) in trace.iter().enumerate() {
        assert!(*z < prev, "frame {i}: {z} !< {prev}");
        assert!(*z >= -MAX_DEPTH, "frame {i}: overshoot to {z}");
        prev = *z;
    }
}

#[test]
fn damping_matches_reference_rate_and_never_exceeds_one() {
    assert!((damping_alpha(DT) - CAMERA_DAMPING).abs() < 1e-4);
    assert!(damping_alpha(0.0).abs() < 1e-6);
    // Long stalls are clamped before compounding.
    assert!(damping_alpha(5.0) <= 1.0);
    assert_eq!(damping_alpha(5.0), damping_alpha(MAX_FRAME_DT_SEC));
}

#[test]
fn frame_rate_does_not_change_the_path() {
    let mut at60 = DepthCamera::new();
    let mut at30 = DepthCamera::new();
    for _ in 0..120 {
        at60.step(0.5, 1.0 / 60.0);
    }
    for _ in 0..60 {
        at30.step(0.5, 1.0 / 30.0);
    }
    assert!((at60.position().z - at30.position().z).abs() < 0.5);
}

#[test]
fn idle_drift_stays_within_amplitudes() {
    let mut cam = DepthCamera::new();
    for _ in 0..5000 {
        let p = cam.step(0.3, DT);
        assert!(p.x.abs() <= DRIFT_X_AMPLITUDE + 1e-6);
        assert!(p.y.abs() <= DRIFT_Y_AMPLITUDE + 1e-6);
    }
}

#[test]
fn camera_looks_down_negative_z() {
    let cam = Camera::looking_down_flight(glam::Vec3::new(0.0, 0.0, -10.0), 16.0 / 9.0);
    let ahead = cam.view_proj().project_point3(glam::Vec3::new(0.0, 0.0, -100.0));
    assert!(ahead.x.abs() < 1e-4 && ahead.y.abs() < 1e-4);
    assert!(ahead.z > 0.0 && ahead.z < 1.0);
}
