//! # 质心计算模块
//!
//! 计算整个连杆系统的总质量和质心位置

use bevy::math::Vec2;

use super::error::{DegenerateStateError, LinkageError, MismatchError};
use super::geometry::direction;
use super::kinematics::ResolvedPoses;
use super::model::{LinkCatalog, LiveState};

/// 质量汇总结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSummary {
    /// 全身质心（世界坐标系）
    pub center_of_mass: Vec2,
    /// 总质量 (kg)
    pub total_mass: f32,
}

/// 单个 link 的质心：基点沿原始关节角度方向偏移半个长度
///
/// 注意这里使用的是未叠加坡度的关节角度，与末端位置使用的绝对姿态不同。
#[inline]
pub fn link_center(base: Vec2, length: f32, joint_angle: f32) -> Vec2 {
    base + direction(joint_angle) * (length * 0.5)
}

/// 计算全身质心
///
/// ## 算法
///
/// ```text
/// com_i = base_i + (length_i / 2) * (cos angle_i, sin angle_i)
/// com   = Σ(m_i * com_i) / Σ m_i
/// ```
///
/// 求和与声明顺序无关。
///
/// # Errors
///
/// - `state` 或 `poses` 的数量与目录不符时返回 [`MismatchError`]
/// - 总质量为零时返回 [`DegenerateStateError::ZeroTotalMass`]，不会产生 NaN/Inf
pub fn aggregate(
    catalog: &LinkCatalog,
    state: &LiveState,
    poses: &ResolvedPoses,
) -> Result<MassSummary, LinkageError> {
    MismatchError::check_state(catalog.len(), state.joint_angles().len())?;
    MismatchError::check_poses(catalog.len(), poses.len())?;

    let mut weighted = Vec2::ZERO;
    let mut total_mass = 0.0;

    for ((idx, link), pose) in catalog.links().iter().enumerate().zip(poses.as_slice()) {
        let center = link_center(pose.base, link.length, state.joint_angle(idx));
        weighted += center * link.mass;
        total_mass += link.mass;
    }

    if total_mass <= 0.0 {
        return Err(DegenerateStateError::ZeroTotalMass.into());
    }

    Ok(MassSummary {
        center_of_mass: weighted / total_mass,
        total_mass,
    })
}
