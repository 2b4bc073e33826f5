//! # 连杆模型数据结构
//!
//! 定义平面连杆系统的核心数据结构：
//!
//! - [`LinkSpec`]: 单个 link 的不可变描述
//! - [`LinkCatalog`]: 经过校验的 link 集合（名称索引、拓扑序、接地点选择）
//! - [`LiveState`]: 可变的关节角度与地面坡度

use std::collections::HashMap;

use bevy::math::Vec2;
use serde::Deserialize;
use tracing::warn;

use super::error::ConfigError;

/// 连杆描述 (Link Spec)
///
/// 每个命名 link 一份，加载后不再修改。
///
/// ## 拓扑结构
/// - `parent_link` 为空：根 link，直接挂在世界坐标系，位置由 `base_position` 给出
/// - `parent_link` 非空：子 link，通过 `connection_point`（父坐标系中的偏移）连接到父 link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    /// 唯一名称，作为全局查找键
    pub name: String,
    /// 长度 (m)，必须为正
    pub length: f32,
    /// 质量 (kg)，非负
    pub mass: f32,
    /// 初始关节角度（度），用于初始化和复位
    pub initial_angle: f32,
    /// 为 true 时姿态跟随地面坡度，不可单独操控
    pub fixed_angle: bool,
    /// 父 link 名称
    pub parent_link: Option<String>,
    /// 在父 link 局部坐标系中的连接点
    pub connection_point: Option<Vec2>,
    /// 世界坐标系中的基点，仅对根 link 有效
    pub base_position: Option<Vec2>,
    /// 显式接地标记
    pub ground_contact: bool,
}

impl LinkSpec {
    /// 创建一个根 link（基点在原点，非固定角度）
    pub fn new(name: impl Into<String>, length: f32, mass: f32, initial_angle: f32) -> Self {
        Self {
            name: name.into(),
            length,
            mass,
            initial_angle,
            fixed_angle: false,
            parent_link: None,
            connection_point: None,
            base_position: None,
            ground_contact: false,
        }
    }

    /// 设置为固定角度（跟随地面坡度）
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.fixed_angle = true;
        self
    }

    /// 设置世界坐标系基点
    #[must_use]
    pub fn at(mut self, base_position: Vec2) -> Self {
        self.base_position = Some(base_position);
        self
    }

    /// 挂到父 link 的 `connection_point` 处
    #[must_use]
    pub fn attached_to(mut self, parent: impl Into<String>, connection_point: Vec2) -> Self {
        self.parent_link = Some(parent.into());
        self.connection_point = Some(connection_point);
        self
    }

    /// 标记为接地点
    #[must_use]
    pub fn ground_contact(mut self) -> Self {
        self.ground_contact = true;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(ConfigError::invalid_length(&self.name, self.length));
        }
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(ConfigError::invalid_mass(&self.name, self.mass));
        }
        if !self.initial_angle.is_finite() {
            return Err(ConfigError::non_finite(&self.name, "initial_angle"));
        }
        if self.connection_point.is_some_and(|p| !p.is_finite()) {
            return Err(ConfigError::non_finite(&self.name, "connection_point"));
        }
        if self.base_position.is_some_and(|p| !p.is_finite()) {
            return Err(ConfigError::non_finite(&self.name, "base_position"));
        }
        Ok(())
    }
}

/// 子 link 连接点的换算规则
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentRule {
    /// 用父 link 的绝对姿态旋转整个 connection_point（标准 2D 旋转矩阵）
    #[default]
    Rotated,
    /// 只取 connection_point 的 x 分量，沿父 link 轴线方向偏移
    AlongParent,
}

/// 经过校验的 link 目录
///
/// ## 不变量
/// - 名称唯一
/// - 每个 `parent_link` 都能解析，父子关系无环
/// - 每个子 link 都有 `connection_point`
/// - 能确定两个接地 link
#[derive(Debug, Clone)]
pub struct LinkCatalog {
    links: Vec<LinkSpec>,
    index: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    /// 拓扑序：父 link 总在子 link 之前
    order: Vec<usize>,
    support: (usize, usize),
    attachment: AttachmentRule,
}

impl LinkCatalog {
    /// 校验并构建目录，使用默认的 [`AttachmentRule::Rotated`]
    pub fn new(links: Vec<LinkSpec>) -> Result<Self, ConfigError> {
        Self::with_attachment(links, AttachmentRule::default())
    }

    /// 校验并构建目录
    ///
    /// # Errors
    ///
    /// 任何违反不变量的配置都返回 [`ConfigError`]，不会静默回退。
    pub fn with_attachment(
        links: Vec<LinkSpec>,
        attachment: AttachmentRule,
    ) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(links.len());
        for (i, link) in links.iter().enumerate() {
            link.validate()?;
            if index.insert(link.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateLink(link.name.clone()));
            }
        }

        let mut parents = Vec::with_capacity(links.len());
        for link in &links {
            let parent = match &link.parent_link {
                Some(parent_name) => {
                    let parent_idx = *index
                        .get(parent_name)
                        .ok_or_else(|| ConfigError::undefined_parent(&link.name, parent_name))?;
                    if link.connection_point.is_none() {
                        return Err(ConfigError::MissingConnectionPoint(link.name.clone()));
                    }
                    if link.base_position.is_some() {
                        warn!(link = %link.name, "base_position ignored on a child link");
                    }
                    Some(parent_idx)
                }
                None => None,
            };
            parents.push(parent);
        }

        let order = topological_order(&links, &parents)?;
        let support = select_support(&links)?;

        Ok(Self {
            links,
            index,
            parents,
            order,
            support,
            attachment,
        })
    }

    /// 按声明顺序的所有 link
    pub fn links(&self) -> &[LinkSpec] {
        &self.links
    }

    /// link 数量
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// 是否为空（校验后的目录至少有两个 link）
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// 按索引取 link
    pub fn link(&self, idx: usize) -> &LinkSpec {
        &self.links[idx]
    }

    /// 名称 → 索引
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// 父 link 索引
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    /// 拓扑序（父在前）
    pub fn topological_order(&self) -> &[usize] {
        &self.order
    }

    /// 左、右接地 link 的索引
    pub fn support_links(&self) -> (usize, usize) {
        self.support
    }

    /// 连接点换算规则
    pub fn attachment(&self) -> AttachmentRule {
        self.attachment
    }
}

/// Kahn 算法求拓扑序
///
/// 排不出的节点要么在环上，要么是环的后代。报错时从第一个排不出的节点沿父链
/// 上溯直到节点重复，重复的那个节点一定在环上。
fn topological_order(links: &[LinkSpec], parents: &[Option<usize>]) -> Result<Vec<usize>, ConfigError> {
    let n = links.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (child, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(child);
        }
    }

    let mut order: Vec<usize> = (0..n).filter(|&i| parents[i].is_none()).collect();
    let mut head = 0;
    while head < order.len() {
        let idx = order[head];
        order.extend_from_slice(&children[idx]);
        head += 1;
    }

    if order.len() < n {
        let mut placed = vec![false; n];
        for &i in &order {
            placed[i] = true;
        }
        let first = placed.iter().position(|p| !p).unwrap_or(0);
        return Err(ConfigError::KinematicLoop(links[cycle_member(parents, first)].name.clone()));
    }
    Ok(order)
}

/// 从 `start` 沿父链上溯，返回第一个重复访问的节点
fn cycle_member(parents: &[Option<usize>], start: usize) -> usize {
    let mut seen = vec![false; parents.len()];
    let mut current = start;
    while !seen[current] {
        seen[current] = true;
        match parents[current] {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

/// 接地点选择
///
/// 有 `ground_contact` 标记时取被标记的两个 link（按声明顺序）；
/// 否则沿用旧约定：声明顺序的前两个 link。
fn select_support(links: &[LinkSpec]) -> Result<(usize, usize), ConfigError> {
    let tagged: Vec<usize> = links
        .iter()
        .enumerate()
        .filter(|(_, l)| l.ground_contact)
        .map(|(i, _)| i)
        .collect();

    match tagged.len() {
        0 if links.len() >= 2 => Ok((0, 1)),
        0 => Err(ConfigError::MissingSupport(links.len())),
        2 => Ok((tagged[0], tagged[1])),
        n => Err(ConfigError::GroundContactCount(n)),
    }
}

/// 实时状态
///
/// 进程内可变状态，不持久化。只能由 [`LiveState::from_catalog`] 创建，
/// 关节角度与目录的声明顺序一一对应，数量在创建后不再改变。
#[derive(Debug, Clone, PartialEq)]
pub struct LiveState {
    joint_angles: Vec<f32>,
    ground_slope: f32,
}

impl LiveState {
    /// 由目录的 `initial_angle` 初始化，坡度为 0
    pub fn from_catalog(catalog: &LinkCatalog) -> Self {
        Self {
            joint_angles: catalog.links().iter().map(|l| l.initial_angle).collect(),
            ground_slope: 0.0,
        }
    }

    /// 恢复到目录默认值
    pub fn reset(&mut self, catalog: &LinkCatalog) {
        self.joint_angles.clear();
        self.joint_angles
            .extend(catalog.links().iter().map(|l| l.initial_angle));
        self.ground_slope = 0.0;
    }

    /// 按声明顺序的关节角度（度）
    pub fn joint_angles(&self) -> &[f32] {
        &self.joint_angles
    }

    /// 第 `idx` 个 link 的关节角度（度）
    pub fn joint_angle(&self, idx: usize) -> f32 {
        self.joint_angles[idx]
    }

    /// 地面坡度（度）
    pub fn ground_slope(&self) -> f32 {
        self.ground_slope
    }

    /// 不做范围检查的写入，范围由引擎负责
    pub(crate) fn set_joint_angle(&mut self, idx: usize, degrees: f32) {
        self.joint_angles[idx] = degrees;
    }

    pub(crate) fn set_ground_slope(&mut self, degrees: f32) {
        self.ground_slope = degrees;
    }
}
