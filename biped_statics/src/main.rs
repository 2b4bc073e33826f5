//! # Biped Statics CLI
//!
//! 读取机器人配置，应用角度/坡度设置，打印位姿、质心、反力与稳定性。
//!
//! ```text
//! biped_statics robot_config.json --slope 10 --angle torso=75
//! biped_statics --demo
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use biped_statics::demos::create_biped;
use biped_statics::linkage::{RobotConfig, Snapshot, StaticsEngine};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "biped_statics", about = "Planar biped pose, center of mass and stability")]
struct Opts {
    /// 机器人配置文件 (JSON)
    #[arg(default_value = "robot_config.json")]
    config: PathBuf,

    /// 使用内置示例机器人，忽略配置文件
    #[arg(long)]
    demo: bool,

    /// 地面坡度（度）
    #[arg(long, allow_hyphen_values = true)]
    slope: Option<f32>,

    /// 关节角度，格式 NAME=DEG，可重复
    #[arg(long = "angle", value_parser = parse_angle, allow_hyphen_values = true)]
    angles: Vec<(String, f32)>,
}

fn parse_angle(s: &str) -> Result<(String, f32)> {
    let (name, deg) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=DEG, got {s}"))?;
    let deg = deg
        .trim()
        .parse::<f32>()
        .with_context(|| format!("invalid angle for {name}"))?;
    Ok((name.trim().to_string(), deg))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    let mut engine = if opts.demo {
        create_biped()?
    } else {
        RobotConfig::load(&opts.config)
            .and_then(RobotConfig::build_engine)
            .with_context(|| format!("failed to load {}", opts.config.display()))?
    };

    let snapshot = engine.apply(opts.slope, &opts.angles)?;
    info!(
        stable = snapshot.stability.is_stable,
        margin = snapshot.stability.margin,
        "statics computed"
    );
    print_report(&engine, &snapshot);
    Ok(())
}

fn print_report(engine: &StaticsEngine, snapshot: &Snapshot) {
    let state = engine.state();
    println!("Ground slope: {:.1}°", state.ground_slope());
    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "link", "angle", "abs", "base.x", "base.y", "tip.x", "tip.y"
    );
    for (idx, (name, pose)) in snapshot.poses.iter(engine.catalog()).enumerate() {
        println!(
            "{:<12} {:>8.1} {:>8.1} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
            name,
            state.joint_angle(idx),
            pose.orientation,
            pose.base.x,
            pose.base.y,
            pose.tip.x,
            pose.tip.y
        );
    }

    let r = &snapshot.stability;
    println!();
    println!("Center of mass: ({:.3}, {:.3}) m", r.center_of_mass.x, r.center_of_mass.y);
    println!("Total mass:     {:.2} kg", r.total_mass);
    println!("Total weight:   {:.1} N", r.total_weight);
    println!("Left force:     {:.1} N", r.left_force);
    println!("Right force:    {:.1} N", r.right_force);
    println!(
        "Stability:      {}",
        if r.is_stable { "stable" } else { "unstable (tip-over risk)" }
    );
}
