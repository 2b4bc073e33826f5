//! # 配置文件加载
//!
//! 机器人配置是一个 JSON 文档：
//!
//! ```json
//! {
//!   "attachment": "rotated",
//!   "limits": { "joint": [-180, 180], "slope": [-45, 45] },
//!   "links": [
//!     { "name": "left_leg", "length": 0.5, "mass": 1.0, "initial_angle": 90,
//!       "fixed_angle": true, "base_position": [-0.1, 0.0] },
//!     { "name": "torso", "length": 0.6, "mass": 3.0, "initial_angle": 90,
//!       "parent_link": "left_leg", "connection_point": [0.5, 0.0] }
//!   ]
//! }
//! ```
//!
//! `attachment` 和 `limits` 可省略。

use std::path::Path;

use bevy::math::Vec2;
use serde::Deserialize;
use tracing::info;

use super::engine::{ControlLimits, StaticsEngine};
use super::error::ConfigError;
use super::model::{AttachmentRule, LinkCatalog, LinkSpec};

/// 配置文件中的单条 link 记录
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkRecord {
    pub name: String,
    pub length: f32,
    pub mass: f32,
    pub initial_angle: f32,
    #[serde(default)]
    pub fixed_angle: bool,
    #[serde(default)]
    pub parent_link: Option<String>,
    #[serde(default)]
    pub connection_point: Option<[f32; 2]>,
    #[serde(default)]
    pub base_position: Option<[f32; 2]>,
    #[serde(default)]
    pub ground_contact: bool,
}

impl From<LinkRecord> for LinkSpec {
    fn from(record: LinkRecord) -> Self {
        Self {
            name: record.name,
            length: record.length,
            mass: record.mass,
            initial_angle: record.initial_angle,
            fixed_angle: record.fixed_angle,
            parent_link: record.parent_link,
            connection_point: record.connection_point.map(Vec2::from_array),
            base_position: record.base_position.map(Vec2::from_array),
            ground_contact: record.ground_contact,
        }
    }
}

/// 机器人配置文档
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotConfig {
    #[serde(default)]
    pub attachment: AttachmentRule,
    #[serde(default)]
    pub limits: ControlLimits,
    pub links: Vec<LinkRecord>,
}

impl RobotConfig {
    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从文件读取
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), links = config.links.len(), "robot config read");
        Ok(config)
    }

    /// 校验并构建 link 目录
    pub fn build_catalog(self) -> Result<LinkCatalog, ConfigError> {
        let links = self.links.into_iter().map(LinkSpec::from).collect();
        LinkCatalog::with_attachment(links, self.attachment)
    }

    /// 构建带控制范围的引擎
    pub fn build_engine(self) -> Result<StaticsEngine, ConfigError> {
        let limits = self.limits;
        StaticsEngine::with_limits(self.build_catalog()?, limits)
    }
}
