// Host-side tests for layer ordering, culling and the fixed post chain.

use flight_core::*;
use glam::Vec3;

fn billboard_order(plan: &FramePlan) -> Vec<SceneId> {
    plan.billboards().map(|b| b.scene).collect()
}

#[test]
fn starfield_then_environment_come_first() {
    let plan = SceneCompositor::default().plan(Vec3::ZERO, 0.0);
    assert_eq!(plan.layers[0], Layer::Starfield);
    assert!(matches!(plan.layers[1], Layer::Environment(_)));
}

#[test]
fn slots_are_sorted_back_to_front() {
    let plan = SceneCompositor::default().plan(Vec3::ZERO, 0.0);
    assert_eq!(
        billboard_order(&plan),
        vec![SceneId::Dubai, SceneId::Washington, SceneId::London]
    );
    let depths: Vec<f32> = plan
        .layers
        .iter()
        .filter_map(|l| match l {
            Layer::Billboard(b) => Some(billboard_center(&b.model).z),
            Layer::Clouds(c) => Some(c.origin.z),
            _ => None,
        })
        .collect();
    assert_eq!(depths.len(), 6);
    assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
}

#[test]
fn slots_behind_the_viewpoint_are_culled() {
    let plan = SceneCompositor::default().plan(Vec3::new(0.0, 0.0, -600.0), 0.0);
    assert_eq!(billboard_order(&plan), vec![SceneId::Dubai]);
    let clouds: Vec<usize> = plan
        .layers
        .iter()
        .filter_map(|l| match l {
            Layer::Clouds(c) => Some(c.patch),
            _ => None,
        })
        .collect();
    assert_eq!(clouds, vec![2]);

    let past_everything = SceneCompositor::default().plan(Vec3::new(0.0, 0.0, -MAX_DEPTH), 0.0);
    assert_eq!(past_everything.layers.len(), 2);
}

#[test]
fn post_settings_do_not_react_to_the_viewpoint() {
    let compositor = SceneCompositor::default();
    for z in [0.0, -150.0, -500.0, -999.0] {
        let plan = compositor.plan(Vec3::new(0.3, -0.2, z), z.abs());
        assert_eq!(plan.post, POST_SETTINGS);
    }
    assert_eq!(POST_SETTINGS.bloom_threshold, 0.1);
    assert_eq!(POST_SETTINGS.grain_opacity, 0.1);
    assert_eq!(POST_SETTINGS.vignette_darkness, 1.2);
}

#[test]
fn billboards_carry_catalog_tint_and_stay_near_their_anchor() {
    let compositor = SceneCompositor::default();
    for t in [0.0, 1.0, 17.5, 300.0] {
        let plan = compositor.plan(Vec3::ZERO, t);
        for draw in plan.billboards() {
            let def = scene(draw.scene);
            assert_eq!(draw.tint, def.tint);
            assert_eq!(draw.opacity, BILLBOARD_OPACITY);
            let center = billboard_center(&draw.model);
            assert!((center - def.anchor()).length() <= def.idle_motion.float_amplitude + 1e-4);
        }
    }
}
