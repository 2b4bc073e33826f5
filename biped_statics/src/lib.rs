//! # Biped Statics
//!
//! 平面双足连杆的位姿、质心与静态稳定性计算
//!
//! ## 模块组织
//!
//! - `linkage`: 通用的平面连杆静力学引擎
//! - `demos`: 示例机器人配置
//!
//! 绘图、滑块等界面部分不在本 crate 中；`main` 只是一个读取配置并打印结果的命令行外壳。

pub mod demos;
pub mod linkage;
