//! # 支撑与稳定性分析模块
//!
//! 两点支撑下的地面反力分配（力矩平衡）和倾覆判定。
//!
//! 支撑多边形退化为左右两个接地点之间的线段，并投影到世界 X 轴上。

use bevy::math::Vec2;

use super::center_of_mass::MassSummary;
use super::error::MismatchError;
use super::kinematics::ResolvedPoses;
use super::model::LinkCatalog;

/// 重力加速度 (m/s^2)
pub const GRAVITY: f32 = 9.81;

/// 两个接地点构成的支撑段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportSegment {
    /// 左脚接地点
    pub left: Vec2,
    /// 右脚接地点
    pub right: Vec2,
}

/// 静力学分析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityReport {
    /// 全身质心
    pub center_of_mass: Vec2,
    /// 总质量 (kg)
    pub total_mass: f32,
    /// 总重量 (N)
    pub total_weight: f32,
    /// 左脚反力 (N)，可能为负（需要拉力）
    pub left_force: f32,
    /// 右脚反力 (N)，可能为负或超过总重量
    pub right_force: f32,
    /// 质心水平投影是否落在支撑段内（闭区间）
    pub is_stable: bool,
    /// 质心到最近支撑边缘的有符号水平距离，稳定时非负
    pub margin: f32,
}

impl SupportSegment {
    /// 由左右接地点构造
    pub fn new(left: Vec2, right: Vec2) -> Self {
        Self { left, right }
    }

    /// 取目录指定的两个接地 link 的基点
    ///
    /// # Errors
    ///
    /// `poses` 不是由同一个 `catalog` 解算得到时（数量不同）返回 [`MismatchError::Poses`]。
    pub fn from_poses(catalog: &LinkCatalog, poses: &ResolvedPoses) -> Result<Self, MismatchError> {
        MismatchError::check_poses(catalog.len(), poses.len())?;
        let (left, right) = catalog.support_links();
        let poses = poses.as_slice();
        Ok(Self::new(poses[left].base, poses[right].base))
    }

    /// 支撑段在 X 轴上的跨度 `right.x - left.x`
    pub fn span(&self) -> f32 {
        self.right.x - self.left.x
    }

    /// 力矩平衡求左右反力
    ///
    /// ```text
    /// W       = m * g
    /// r_right = (com.x - left.x) / span
    /// r_left  = 1 - r_right
    /// ```
    ///
    /// 比例不截断到 [0, 1]。`span = 0` 时平均分配。
    pub fn reaction_forces(&self, center_of_mass: Vec2, total_weight: f32) -> (f32, f32) {
        let span = self.span();
        if span != 0.0 {
            let right_ratio = (center_of_mass.x - self.left.x) / span;
            let left_ratio = 1.0 - right_ratio;
            (total_weight * left_ratio, total_weight * right_ratio)
        } else {
            let half = total_weight / 2.0;
            (half, half)
        }
    }

    /// 质心到支撑段最近边缘的有符号距离
    ///
    /// 按两个接地点 X 坐标的实际最小/最大值计算，与左右顺序无关。
    pub fn margin(&self, center_of_mass: Vec2) -> f32 {
        let lo = self.left.x.min(self.right.x);
        let hi = self.left.x.max(self.right.x);
        (center_of_mass.x - lo).min(hi - center_of_mass.x)
    }

    /// 稳定判定：`min(x) <= com.x <= max(x)`
    pub fn contains(&self, center_of_mass: Vec2) -> bool {
        let lo = self.left.x.min(self.right.x);
        let hi = self.left.x.max(self.right.x);
        lo <= center_of_mass.x && center_of_mass.x <= hi
    }

    /// 完整的静力学分析
    pub fn analyze(&self, center_of_mass: Vec2, total_mass: f32) -> StabilityReport {
        let total_weight = total_mass * GRAVITY;
        let (left_force, right_force) = self.reaction_forces(center_of_mass, total_weight);
        StabilityReport {
            center_of_mass,
            total_mass,
            total_weight,
            left_force,
            right_force,
            is_stable: self.contains(center_of_mass),
            margin: self.margin(center_of_mass),
        }
    }
}

/// 对一次解算结果做支撑分析：`analyze(poses, com, totalMass)`
pub fn analyze(
    catalog: &LinkCatalog,
    poses: &ResolvedPoses,
    mass: &MassSummary,
) -> Result<StabilityReport, MismatchError> {
    Ok(SupportSegment::from_poses(catalog, poses)?.analyze(mass.center_of_mass, mass.total_mass))
}
