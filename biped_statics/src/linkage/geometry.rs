//! # 几何工具模块
//!
//! 平面旋转相关的小工具。所有角度参数均为度。

use bevy::math::{Mat2, Vec2};

use super::model::AttachmentRule;

/// 角度对应的单位方向向量 `(cos θ, sin θ)`
#[inline]
pub fn direction(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// 用标准 2D 旋转矩阵旋转向量
///
/// ```text
/// R(θ) = | cos θ  -sin θ |
///        | sin θ   cos θ |
/// ```
#[inline]
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    Mat2::from_angle(degrees.to_radians()) * v
}

/// 把父坐标系中的连接点换算为世界坐标系偏移
///
/// - `Rotated`: `R(θ_parent) * connection_point`
/// - `AlongParent`: `connection_point.x * (cos θ_parent, sin θ_parent)`
pub fn attachment_offset(rule: AttachmentRule, connection_point: Vec2, parent_degrees: f32) -> Vec2 {
    match rule {
        AttachmentRule::Rotated => rotate(connection_point, parent_degrees),
        AttachmentRule::AlongParent => direction(parent_degrees) * connection_point.x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), 90.0);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-6);

        let v = rotate(Vec2::new(0.0, 0.5), 90.0);
        assert_relative_eq!(v.x, -0.5, epsilon = 1e-6);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_attachment_rules() {
        // x 分量沿轴线时两种规则一致
        let a = attachment_offset(AttachmentRule::Rotated, Vec2::new(0.5, 0.0), 30.0);
        let b = attachment_offset(AttachmentRule::AlongParent, Vec2::new(0.5, 0.0), 30.0);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-6);

        // AlongParent 忽略 y 分量
        let c = attachment_offset(AttachmentRule::AlongParent, Vec2::new(0.0, 0.5), 90.0);
        assert_relative_eq!(c.length(), 0.0, epsilon = 1e-6);
    }
}
