//! # 错误类型
//!
//! 四类失败分别建模：
//!
//! - [`ConfigError`]: 配置（LinkCatalog）本身不合法，加载即失败
//! - [`DegenerateStateError`]: 配置合法但状态退化（例如总质量为零）
//! - [`ControlError`]: 外部对 LiveState 的编辑请求不合法
//! - [`MismatchError`]: 传入的状态或位姿不是按这个目录构建的
//!
//! [`LinkageError`] 把它们汇总，供引擎和命令行使用。

use thiserror::Error;

/// Link 目录（配置）错误。对加载是致命的，不会回退到默认几何。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 重复的 link 名称。
    #[error("duplicate link name: {0}")]
    DuplicateLink(String),

    /// parent_link 指向不存在的 link。
    #[error("link {link} references undefined parent link {parent}")]
    UndefinedParent {
        /// 发出引用的 link。
        link: String,
        /// 无法解析的父 link 名称。
        parent: String,
    },

    /// 父子链存在环。
    #[error("cyclic parent chain involving link {0}")]
    KinematicLoop(String),

    /// 非根 link 缺少 connection_point。
    #[error("link {0} has a parent_link but no connection_point")]
    MissingConnectionPoint(String),

    /// 长度必须为正且有限。
    #[error("invalid length for link {link}: {length}")]
    InvalidLength {
        /// 出错的 link。
        link: String,
        /// 非法的长度值。
        length: f32,
    },

    /// 质量必须非负且有限。
    #[error("invalid mass for link {link}: {mass}")]
    InvalidMass {
        /// 出错的 link。
        link: String,
        /// 非法的质量值。
        mass: f32,
    },

    /// 角度、偏移等字段出现 NaN / Inf。
    #[error("non-finite {field} on link {link}")]
    NonFinite {
        /// 出错的 link。
        link: String,
        /// 字段名。
        field: &'static str,
    },

    /// 支撑分析需要至少两个 link。
    #[error("support analysis needs at least two links, catalog has {0}")]
    MissingSupport(usize),

    /// 显式标记的接地 link 数量必须恰好为 2。
    #[error("expected exactly two ground_contact links, found {0}")]
    GroundContactCount(usize),

    /// 控制范围配置不合法（min > max 或非有限值）。
    #[error("invalid {control} limits: [{min}, {max}]")]
    InvalidLimits {
        /// 控制量名称。
        control: &'static str,
        /// 下限。
        min: f32,
        /// 上限。
        max: f32,
    },

    /// 可操控 link 的初始角度超出关节控制范围。
    #[error("initial angle {angle} of link {link} outside joint limits [{min}, {max}]")]
    InitialAngleOutOfRange {
        /// 出错的 link。
        link: String,
        /// 初始角度。
        angle: f32,
        /// 下限。
        min: f32,
        /// 上限。
        max: f32,
    },

    /// 读取配置文件失败。
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 语法或字段错误。
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// 构造未定义父 link 错误。
    pub fn undefined_parent(link: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UndefinedParent {
            link: link.into(),
            parent: parent.into(),
        }
    }

    /// 构造非法长度错误。
    pub fn invalid_length(link: impl Into<String>, length: f32) -> Self {
        Self::InvalidLength {
            link: link.into(),
            length,
        }
    }

    /// 构造非法质量错误。
    pub fn invalid_mass(link: impl Into<String>, mass: f32) -> Self {
        Self::InvalidMass {
            link: link.into(),
            mass,
        }
    }

    /// 构造非有限值错误。
    pub fn non_finite(link: impl Into<String>, field: &'static str) -> Self {
        Self::NonFinite {
            link: link.into(),
            field,
        }
    }
}

/// 状态退化：计算结果无定义。
///
/// 与 `span = 0` 的平均分配不同，后者是合法结果而不是错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DegenerateStateError {
    /// 总质量为零，质心无定义。
    #[error("total mass is zero, center of mass is undefined")]
    ZeroTotalMass,
}

/// 对 LiveState 的非法编辑。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// 目录中没有这个 link。
    #[error("unknown link: {0}")]
    UnknownLink(String),

    /// fixed_angle link 跟随地面坡度，不能单独设置角度。
    #[error("link {0} has a fixed angle and cannot be steered")]
    FixedLink(String),

    /// 超出控制范围（或非有限值）。
    #[error("{control} value {value} outside [{min}, {max}]")]
    OutOfRange {
        /// 控制量名称。
        control: String,
        /// 请求的值。
        value: f32,
        /// 下限。
        min: f32,
        /// 上限。
        max: f32,
    },
}

/// 状态或位姿与目录的 link 数量不一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MismatchError {
    /// LiveState 的关节角度数量不对。
    #[error("live state holds {found} joint angles, catalog has {expected} links")]
    LiveState {
        /// 目录中的 link 数量。
        expected: usize,
        /// 实际数量。
        found: usize,
    },

    /// 位姿数量不对（例如 reload 之前解算的结果）。
    #[error("resolved poses cover {found} links, catalog has {expected} links")]
    Poses {
        /// 目录中的 link 数量。
        expected: usize,
        /// 实际数量。
        found: usize,
    },
}

impl MismatchError {
    /// 检查 LiveState 长度。
    pub fn check_state(expected: usize, found: usize) -> std::result::Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::LiveState { expected, found })
        }
    }

    /// 检查位姿长度。
    pub fn check_poses(expected: usize, found: usize) -> std::result::Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::Poses { expected, found })
        }
    }
}

/// 引擎层的汇总错误。
#[derive(Debug, Error)]
pub enum LinkageError {
    /// 配置错误。
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 状态退化。
    #[error(transparent)]
    Degenerate(#[from] DegenerateStateError),

    /// 控制编辑错误。
    #[error(transparent)]
    Control(#[from] ControlError),

    /// 输入与目录不匹配。
    #[error(transparent)]
    Mismatch(#[from] MismatchError),
}

/// Linkage 操作的结果类型。
pub type Result<T> = std::result::Result<T, LinkageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::undefined_parent("torso", "pelvis");
        assert!(err.to_string().contains("torso"));
        assert!(err.to_string().contains("pelvis"));

        let err = ControlError::OutOfRange {
            control: "ground slope".into(),
            value: 60.0,
            min: -45.0,
            max: 45.0,
        };
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn test_mismatch_checks() {
        assert_eq!(MismatchError::check_state(3, 3), Ok(()));
        assert_eq!(
            MismatchError::check_poses(3, 5),
            Err(MismatchError::Poses { expected: 3, found: 5 })
        );
        let err: LinkageError = MismatchError::LiveState { expected: 2, found: 1 }.into();
        assert_eq!(err.to_string(), "live state holds 1 joint angles, catalog has 2 links");
    }

    #[test]
    fn test_degenerate_is_distinct() {
        let err: LinkageError = DegenerateStateError::ZeroTotalMass.into();
        assert!(matches!(
            err,
            LinkageError::Degenerate(DegenerateStateError::ZeroTotalMass)
        ));
    }
}
