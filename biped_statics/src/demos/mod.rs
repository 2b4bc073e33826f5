//! # 演示程序模块
//!
//! 包含使用连杆静力学引擎的示例机器人

pub mod biped;

pub use biped::{create_biped, LEG_LENGTH, NUM_LINKS};
