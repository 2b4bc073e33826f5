//! # 静力学引擎
//!
//! 持有 link 目录和实时状态，对外提供编辑操作和完整的重算管线。
//!
//! ## 管线
//!
//! ```text
//! LinkCatalog + LiveState
//!     → resolve_poses   (位姿)
//!     → aggregate       (质心, 总质量)
//!     → analyze         (反力, 稳定性)
//! ```
//!
//! 每次重算都是纯函数调用，引擎内部除目录和角度/坡度外不保存任何中间结果。

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::center_of_mass::aggregate;
use super::config::RobotConfig;
use super::error::{ConfigError, ControlError, LinkageError};
use super::kinematics::{resolve_poses, ResolvedPoses};
use super::model::{LinkCatalog, LinkSpec, LiveState};
use super::support::{analyze, StabilityReport};

/// 关节角度和地面坡度的可调范围（度）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlLimits {
    /// 关节角度 `[min, max]`
    pub joint: [f32; 2],
    /// 地面坡度 `[min, max]`
    pub slope: [f32; 2],
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            joint: [-180.0, 180.0],
            slope: [-45.0, 45.0],
        }
    }
}

impl ControlLimits {
    /// 检查范围本身是否合法
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (control, [min, max]) in [("joint", self.joint), ("slope", self.slope)] {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ConfigError::InvalidLimits { control, min, max });
            }
        }
        Ok(())
    }

    /// 检查可操控 link 的初始角度是否在关节范围内
    ///
    /// fixed_angle link 不能被设置，不参与检查。
    pub fn check_initial_angles(&self, catalog: &LinkCatalog) -> Result<(), ConfigError> {
        let [min, max] = self.joint;
        for link in catalog.links().iter().filter(|l| !l.fixed_angle) {
            if !(min..=max).contains(&link.initial_angle) {
                return Err(ConfigError::InitialAngleOutOfRange {
                    link: link.name.clone(),
                    angle: link.initial_angle,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    fn check(control: &str, value: f32, [min, max]: [f32; 2]) -> Result<(), ControlError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ControlError::OutOfRange {
                control: control.to_string(),
                value,
                min,
                max,
            })
        }
    }
}

/// 一次重算的完整结果
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// 各 link 的位姿
    pub poses: ResolvedPoses,
    /// 质心、反力与稳定性
    pub stability: StabilityReport,
}

/// 静力学引擎
#[derive(Debug, Clone)]
pub struct StaticsEngine {
    catalog: LinkCatalog,
    state: LiveState,
    limits: ControlLimits,
}

impl StaticsEngine {
    /// 使用默认控制范围创建引擎，角度取各 link 的 `initial_angle`
    pub fn new(catalog: LinkCatalog) -> Result<Self, ConfigError> {
        Self::with_limits(catalog, ControlLimits::default())
    }

    /// 使用指定控制范围创建引擎
    ///
    /// # Errors
    ///
    /// 范围本身不合法，或某个可操控 link 的 `initial_angle` 超出关节范围。
    pub fn with_limits(catalog: LinkCatalog, limits: ControlLimits) -> Result<Self, ConfigError> {
        limits.validate()?;
        limits.check_initial_angles(&catalog)?;
        let state = LiveState::from_catalog(&catalog);
        info!(links = catalog.len(), "linkage catalog loaded");
        Ok(Self {
            catalog,
            state,
            limits,
        })
    }

    /// 当前目录
    pub fn catalog(&self) -> &LinkCatalog {
        &self.catalog
    }

    /// 当前实时状态
    pub fn state(&self) -> &LiveState {
        &self.state
    }

    /// 当前控制范围
    pub fn limits(&self) -> &ControlLimits {
        &self.limits
    }

    /// 可以单独操控的 link（非 fixed_angle），按声明顺序
    pub fn steerable_links(&self) -> impl Iterator<Item = &LinkSpec> + '_ {
        self.catalog.links().iter().filter(|l| !l.fixed_angle)
    }

    /// 读取某个 link 的关节角度
    pub fn joint_angle(&self, name: &str) -> Option<f32> {
        self.catalog
            .index_of(name)
            .map(|idx| self.state.joint_angle(idx))
    }

    /// 设置关节角度（度）
    ///
    /// # Errors
    ///
    /// 未知 link、fixed_angle link 或超出范围时返回 [`ControlError`]，状态不变。
    pub fn set_joint_angle(&mut self, name: &str, degrees: f32) -> Result<(), ControlError> {
        let idx = self
            .catalog
            .index_of(name)
            .ok_or_else(|| ControlError::UnknownLink(name.to_string()))?;
        if self.catalog.link(idx).fixed_angle {
            return Err(ControlError::FixedLink(name.to_string()));
        }
        ControlLimits::check(name, degrees, self.limits.joint)?;
        self.state.set_joint_angle(idx, degrees);
        Ok(())
    }

    /// 设置地面坡度（度）
    pub fn set_ground_slope(&mut self, degrees: f32) -> Result<(), ControlError> {
        ControlLimits::check("ground slope", degrees, self.limits.slope)?;
        self.state.set_ground_slope(degrees);
        Ok(())
    }

    /// 所有关节角度恢复为 `initial_angle`，坡度恢复为 0
    pub fn reset_to_defaults(&mut self) {
        self.state.reset(&self.catalog);
    }

    /// 整体替换目录，保留当前控制范围
    ///
    /// 关节角度按新目录重新初始化，地面坡度保持不变。
    ///
    /// # Errors
    ///
    /// 新目录的初始角度超出当前关节范围时返回错误，引擎保持不变。
    pub fn reload(&mut self, catalog: LinkCatalog) -> Result<(), ConfigError> {
        self.replace(catalog, self.limits)
    }

    /// 用一份新的配置文档替换目录和控制范围
    ///
    /// 当前坡度超出新的坡度范围时截断到范围边界。
    pub fn reload_config(&mut self, config: RobotConfig) -> Result<(), ConfigError> {
        let limits = config.limits;
        let catalog = config.build_catalog()?;
        self.replace(catalog, limits)
    }

    fn replace(&mut self, catalog: LinkCatalog, limits: ControlLimits) -> Result<(), ConfigError> {
        limits.validate()?;
        limits.check_initial_angles(&catalog)?;

        let [min, max] = limits.slope;
        let previous = self.state.ground_slope();
        let slope = previous.clamp(min, max);
        if slope != previous {
            warn!(previous, slope, "ground slope clamped to reloaded limits");
        }

        self.state = LiveState::from_catalog(&catalog);
        self.state.set_ground_slope(slope);
        info!(links = catalog.len(), "linkage catalog reloaded");
        self.catalog = catalog;
        self.limits = limits;
        Ok(())
    }

    /// 完整重算：位姿 → 质心 → 支撑分析
    ///
    /// # Errors
    ///
    /// 总质量为零时返回 [`LinkageError::Degenerate`]。
    pub fn recompute(&self) -> Result<Snapshot, LinkageError> {
        let poses = resolve_poses(&self.catalog, &self.state)?;
        let mass = aggregate(&self.catalog, &self.state, &poses)?;
        let stability = analyze(&self.catalog, &poses, &mass)?;

        debug!(
            com_x = stability.center_of_mass.x,
            com_y = stability.center_of_mass.y,
            left_force = stability.left_force,
            right_force = stability.right_force,
            stable = stability.is_stable,
            "statics recomputed"
        );

        Ok(Snapshot { poses, stability })
    }

    /// 批量应用坡度和关节角度编辑后重算
    ///
    /// 任何一步失败时实时状态回滚到调用前。
    pub fn apply(
        &mut self,
        slope: Option<f32>,
        angles: &[(String, f32)],
    ) -> Result<Snapshot, LinkageError> {
        let saved = self.state.clone();
        let outcome = self.try_apply(slope, angles);
        if outcome.is_err() {
            self.state = saved;
        }
        outcome
    }

    fn try_apply(
        &mut self,
        slope: Option<f32>,
        angles: &[(String, f32)],
    ) -> Result<Snapshot, LinkageError> {
        if let Some(slope) = slope {
            self.set_ground_slope(slope)?;
        }
        for (name, degrees) in angles {
            self.set_joint_angle(name, *degrees)?;
        }
        self.recompute()
    }
}
