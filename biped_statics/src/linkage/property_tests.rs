#![cfg(test)]
use crate::linkage::center_of_mass::aggregate;
use crate::linkage::engine::StaticsEngine;
use crate::linkage::kinematics::{absolute_orientation, resolve_poses};
use crate::linkage::model::{LinkCatalog, LinkSpec, LiveState};
use bevy::math::Vec2;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 两只固定脚 + 躯干 + 上臂 + 前臂（三层嵌套）
fn chain_links() -> Vec<LinkSpec> {
    vec![
        LinkSpec::new("left_leg", 0.5, 1.0, 90.0)
            .fixed()
            .at(Vec2::new(-0.1, 0.0)),
        LinkSpec::new("right_leg", 0.5, 1.0, 90.0)
            .fixed()
            .at(Vec2::new(0.1, 0.0)),
        LinkSpec::new("torso", 0.6, 3.0, 90.0).attached_to("left_leg", Vec2::new(0.5, 0.0)),
        LinkSpec::new("upper_arm", 0.3, 0.4, -60.0).attached_to("torso", Vec2::new(0.5, 0.0)),
        LinkSpec::new("forearm", 0.25, 0.3, -90.0).attached_to("upper_arm", Vec2::new(0.3, 0.0)),
    ]
}

fn chain() -> LinkCatalog {
    LinkCatalog::new(chain_links()).unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fixed_link_tracks_slope(slope in -45.0f32..=45.0, angle in -180.0f32..=180.0) {
        let catalog = chain();
        let mut state = LiveState::from_catalog(&catalog);
        state.set_ground_slope(slope);
        state.set_joint_angle(0, angle);

        let poses = resolve_poses(&catalog, &state).unwrap();
        prop_assert_eq!(poses.get(0).unwrap().orientation, angle + slope);
        prop_assert_eq!(absolute_orientation(&catalog, &state, 0).unwrap(), angle + slope);
    }

    #[test]
    fn nested_orientation_ignores_ancestors(
        slope in -45.0f32..=45.0,
        own in -180.0f32..=180.0,
        torso_a in -180.0f32..=180.0,
        torso_b in -180.0f32..=180.0,
        arm_a in -180.0f32..=180.0,
        arm_b in -180.0f32..=180.0,
    ) {
        let catalog = chain();
        let forearm = catalog.index_of("forearm").unwrap();
        let torso = catalog.index_of("torso").unwrap();
        let arm = catalog.index_of("upper_arm").unwrap();

        let mut state = LiveState::from_catalog(&catalog);
        state.set_ground_slope(slope);
        state.set_joint_angle(forearm, own);

        state.set_joint_angle(torso, torso_a);
        state.set_joint_angle(arm, arm_a);
        let first = resolve_poses(&catalog, &state).unwrap().get(forearm).unwrap().orientation;

        state.set_joint_angle(torso, torso_b);
        state.set_joint_angle(arm, arm_b);
        let second = resolve_poses(&catalog, &state).unwrap().get(forearm).unwrap().orientation;

        prop_assert_eq!(first, own + slope);
        prop_assert_eq!(second, own + slope);
    }

    #[test]
    fn com_independent_of_non_foot_order(
        seed in any::<u64>(),
        slope in -45.0f32..=45.0,
        torso in -180.0f32..=180.0,
    ) {
        let links = chain_links();
        let catalog = LinkCatalog::new(links.clone()).unwrap();

        // 前两个 link 保持不动，其余按 seed 轮换
        let mut shuffled = links;
        let tail = shuffled.split_off(2);
        let k = (seed % tail.len() as u64) as usize;
        shuffled.extend(tail[k..].iter().cloned());
        shuffled.extend(tail[..k].iter().cloned());
        let permuted = LinkCatalog::new(shuffled).unwrap();

        let mut a = StaticsEngine::new(catalog).unwrap();
        let mut b = StaticsEngine::new(permuted).unwrap();
        for engine in [&mut a, &mut b] {
            engine.set_ground_slope(slope).unwrap();
            engine.set_joint_angle("torso", torso).unwrap();
        }

        let ra = a.recompute().unwrap().stability;
        let rb = b.recompute().unwrap().stability;
        prop_assert!((ra.center_of_mass - rb.center_of_mass).length() < 1e-4);
        prop_assert!((ra.total_mass - rb.total_mass).abs() < 1e-5);
    }

    #[test]
    fn forces_sum_to_weight(slope in -45.0f32..=45.0, torso in -180.0f32..=180.0) {
        let mut engine = StaticsEngine::new(chain()).unwrap();
        engine.set_ground_slope(slope).unwrap();
        engine.set_joint_angle("torso", torso).unwrap();

        let report = engine.recompute().unwrap().stability;
        let sum = report.left_force + report.right_force;
        prop_assert!((sum - report.total_weight).abs() <= 1e-3 * report.total_weight.max(1.0));
        prop_assert_eq!(report.is_stable, report.margin >= 0.0);
    }

    #[test]
    fn reset_reproduces_fresh_engine(
        slope in -45.0f32..=45.0,
        edits in proptest::collection::vec(
            (prop_oneof![Just("torso"), Just("upper_arm"), Just("forearm")], -180.0f32..=180.0),
            0..8,
        ),
    ) {
        let fresh = StaticsEngine::new(chain()).unwrap();
        let mut engine = StaticsEngine::new(chain()).unwrap();

        engine.set_ground_slope(slope).unwrap();
        for (name, angle) in edits {
            engine.set_joint_angle(name, angle).unwrap();
        }
        engine.reset_to_defaults();

        prop_assert_eq!(engine.recompute().unwrap(), fresh.recompute().unwrap());
    }

    #[test]
    fn aggregate_never_yields_non_finite(slope in -45.0f32..=45.0) {
        let catalog = chain();
        let mut state = LiveState::from_catalog(&catalog);
        state.set_ground_slope(slope);
        let poses = resolve_poses(&catalog, &state).unwrap();

        let summary = aggregate(&catalog, &state, &poses).unwrap();
        prop_assert!(summary.center_of_mass.is_finite());
    }
}

#[test]
fn swapping_first_two_links_swaps_feet() {
    let mut links = chain_links();
    links.swap(0, 1);
    let catalog = LinkCatalog::new(links).unwrap();
    let engine = StaticsEngine::new(catalog).unwrap();
    let snapshot = engine.recompute().unwrap();

    // 声明顺序决定左右：现在“左脚”在 x = 0.1
    let left = engine.catalog().support_links().0;
    assert_eq!(engine.catalog().link(left).name, "right_leg");
    assert!((snapshot.poses.get(left).unwrap().base.x - 0.1).abs() < 1e-6);
}
