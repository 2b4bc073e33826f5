//! # Planar Linkage Statics
//!
//! 平面连杆机器人的运动学与静力学引擎：给定关节角度和地面坡度，计算
//! 每个 link 的位置、全身质心、两个接地点的反力分配以及静态稳定性。
//!
//! ## 核心概念
//!
//! - **Link Catalog**: 不可变的 link 描述集合，构成父子树
//! - **Pose Resolver**: 父→子坐标变换组合，得到世界坐标系中的基点和末端
//! - **Mass Aggregator**: 按质量加权得到全身质心
//! - **Support Analyzer**: 两点支撑的力矩平衡与倾覆判定
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use biped_statics::linkage::*;
//!
//! // 1. 加载配置
//! let mut engine = RobotConfig::load("robot_config.json")?.build_engine()?;
//!
//! // 2. 编辑实时状态
//! engine.set_joint_angle("torso", 75.0)?;
//! engine.set_ground_slope(5.0)?;
//!
//! // 3. 重算
//! let snapshot = engine.recompute()?;
//! println!("stable: {}", snapshot.stability.is_stable);
//! ```

pub mod center_of_mass;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod model;
pub mod support;

mod property_tests;

// Re-export commonly used types
pub use center_of_mass::{aggregate, MassSummary};
pub use config::{LinkRecord, RobotConfig};
pub use engine::{ControlLimits, Snapshot, StaticsEngine};
pub use error::{ConfigError, ControlError, DegenerateStateError, LinkageError, MismatchError, Result};
pub use kinematics::{absolute_orientation, resolve_poses, LinkPose, ResolvedPoses};
pub use model::{AttachmentRule, LinkCatalog, LinkSpec, LiveState};
pub use support::{analyze, StabilityReport, SupportSegment, GRAVITY};
