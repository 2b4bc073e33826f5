//! # 运动学模块
//!
//! 位姿解算：从关节角度和地面坡度计算每个 link 在世界坐标系中的基点和末端

use bevy::math::Vec2;

use super::geometry::{attachment_offset, direction, rotate};
use super::error::MismatchError;
use super::model::{LinkCatalog, LiveState};

/// 单个 link 的解算结果（世界坐标系）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinkPose {
    /// 绝对姿态（度）
    pub orientation: f32,
    /// 从地面继承的倾角（度）：`ground_slope` 或 `0`
    pub ground_tilt: f32,
    /// 基点
    pub base: Vec2,
    /// 末端
    pub tip: Vec2,
}

/// 一次解算得到的全部位姿，与目录声明顺序对齐
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPoses {
    poses: Vec<LinkPose>,
}

impl ResolvedPoses {
    /// 第 `idx` 个 link 的位姿
    pub fn get(&self, idx: usize) -> Option<&LinkPose> {
        self.poses.get(idx)
    }

    /// 按名称查找位姿
    pub fn by_name(&self, catalog: &LinkCatalog, name: &str) -> Option<&LinkPose> {
        catalog.index_of(name).and_then(|idx| self.poses.get(idx))
    }

    /// 按声明顺序的全部位姿
    pub fn as_slice(&self) -> &[LinkPose] {
        &self.poses
    }

    /// `(名称, 位姿)` 迭代器
    pub fn iter<'a>(
        &'a self,
        catalog: &'a LinkCatalog,
    ) -> impl Iterator<Item = (&'a str, &'a LinkPose)> + 'a {
        catalog
            .links()
            .iter()
            .zip(&self.poses)
            .map(|(link, pose)| (link.name.as_str(), pose))
    }

    /// link 数量
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// 复用已有缓冲区重新解算
    ///
    /// ## 算法
    ///
    /// 按拓扑序（父在前）单遍计算，每个 link 只解算一次：
    ///
    /// 1. **继承倾角**:
    ///    ```text
    ///    tilt = slope            (fixed_angle)
    ///    tilt = tilt_parent      (有父 link)
    ///    tilt = 0                (非固定根 link)
    ///    ```
    /// 2. **绝对姿态**: `θ = angle + tilt`
    ///
    ///    这就是递归规则 `angle + θ_parent - angle_parent` 展开后的结果：
    ///    父 link 自身的关节角度总会被抵消，祖先的角度不会累加到子 link 上。
    ///
    /// 3. **基点**:
    ///    ```text
    ///    base = base_parent + offset(connection_point, θ_parent)   (子 link)
    ///    base = R(slope) * base_position                           (固定根 link)
    ///    base = base_position                                      (其他根 link)
    ///    ```
    /// 4. **末端**: `tip = base + length * (cos θ, sin θ)`
    ///
    /// # Errors
    ///
    /// `state` 不是按 `catalog` 创建的（关节角度数量不同）时返回
    /// [`MismatchError::LiveState`]，缓冲区保持不变。
    pub fn resolve_into(&mut self, catalog: &LinkCatalog, state: &LiveState) -> Result<(), MismatchError> {
        MismatchError::check_state(catalog.len(), state.joint_angles().len())?;
        let slope = state.ground_slope();
        let rule = catalog.attachment();

        self.poses.clear();
        self.poses.resize(catalog.len(), LinkPose::default());

        for &idx in catalog.topological_order() {
            let link = catalog.link(idx);
            let parent = catalog.parent_of(idx).map(|p| self.poses[p]);

            let ground_tilt = if link.fixed_angle {
                slope
            } else {
                parent.map_or(0.0, |p| p.ground_tilt)
            };
            let orientation = state.joint_angle(idx) + ground_tilt;

            let base = match parent {
                Some(p) => {
                    // 目录校验保证子 link 一定有 connection_point
                    let connection = link.connection_point.unwrap_or_default();
                    p.base + attachment_offset(rule, connection, p.orientation)
                }
                None => {
                    let base = link.base_position.unwrap_or_default();
                    if link.fixed_angle {
                        rotate(base, slope)
                    } else {
                        base
                    }
                }
            };
            let tip = base + direction(orientation) * link.length;

            self.poses[idx] = LinkPose {
                orientation,
                ground_tilt,
                base,
                tip,
            };
        }
        Ok(())
    }
}

/// 位姿解算：`resolve(catalog, liveState) → name → pose`
pub fn resolve_poses(catalog: &LinkCatalog, state: &LiveState) -> Result<ResolvedPoses, MismatchError> {
    let mut poses = ResolvedPoses::default();
    poses.resolve_into(catalog, state)?;
    Ok(poses)
}

/// 单个 link 的绝对姿态（度）
///
/// 沿父链上溯：遇到 fixed_angle link 则结果为 `angle + slope`，
/// 一直到达非固定的根 link 则结果为 `angle`。
/// 与 [`resolve_poses`] 给出的 `orientation` 完全相同。
///
/// `idx` 超出目录范围时 panic。
pub fn absolute_orientation(
    catalog: &LinkCatalog,
    state: &LiveState,
    idx: usize,
) -> Result<f32, MismatchError> {
    MismatchError::check_state(catalog.len(), state.joint_angles().len())?;
    let angle = state.joint_angle(idx);
    let mut current = idx;
    loop {
        if catalog.link(current).fixed_angle {
            return Ok(angle + state.ground_slope());
        }
        match catalog.parent_of(current) {
            Some(parent) => current = parent,
            None => return Ok(angle),
        }
    }
}
