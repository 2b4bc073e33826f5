//! # Biped Demo
//!
//! 一个简单的平面双足机器人。
//!
//! ## 系统描述
//!
//! - **左右腿**：固定角度，跟随地面坡度，作为两个接地点
//! - **躯干**：挂在左腿上，连接点带横向偏移，使躯干位于两腿中间
//! - **上臂 / 前臂**：两层嵌套的手臂
//!
//! ```text
//!          upper_arm
//!        ●────╲
//!        │     ╲ forearm
//!        │      │
//!  torso │
//!        │
//!    ────●────
//!    │       │
//!    │ legs  │
//!  ──┴───────┴── ground
//! ```

use bevy::math::Vec2;

use crate::linkage::{ConfigError, LinkCatalog, LinkSpec, StaticsEngine};

/// 腿长 (m)
pub const LEG_LENGTH: f32 = 0.5;
/// 左右脚间距的一半 (m)
pub const HALF_STANCE: f32 = 0.1;
/// link 数量
pub const NUM_LINKS: usize = 5;

/// 示例机器人的 link 列表
pub fn biped_links() -> Vec<LinkSpec> {
    vec![
        LinkSpec::new("left_leg", LEG_LENGTH, 1.0, 90.0)
            .fixed()
            .at(Vec2::new(-HALF_STANCE, 0.0)),
        LinkSpec::new("right_leg", LEG_LENGTH, 1.0, 90.0)
            .fixed()
            .at(Vec2::new(HALF_STANCE, 0.0)),
        // 沿腿向上 LEG_LENGTH，再向右 HALF_STANCE（腿的局部 -y 方向）
        LinkSpec::new("torso", 0.6, 3.0, 90.0)
            .attached_to("left_leg", Vec2::new(LEG_LENGTH, -HALF_STANCE)),
        LinkSpec::new("upper_arm", 0.3, 0.4, -60.0).attached_to("torso", Vec2::new(0.5, 0.0)),
        LinkSpec::new("forearm", 0.25, 0.3, -90.0).attached_to("upper_arm", Vec2::new(0.3, 0.0)),
    ]
}

/// 创建示例机器人的静力学引擎
pub fn create_biped() -> Result<StaticsEngine, ConfigError> {
    StaticsEngine::new(LinkCatalog::new(biped_links())?)
}
