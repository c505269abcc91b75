//! Entry point for wallmapper.
//! Loads the scene, then drives the image caches for a number of frames.

mod config;
mod scene;

use std::path::PathBuf;

use anyhow::Result;

use crate::{
    config::{DEFAULT_CONFIG, SceneConfig, find_config},
    scene::Scene,
};

fn parse_config_arg() -> PathBuf {
    // --config=path/to/wallmapper.toml
    std::env::args()
        .find_map(|arg| arg.strip_prefix("--config=").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn parse_frames_arg() -> u32 {
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--frames=") {
            match val.parse::<u32>() {
                Ok(n) => return n,
                Err(_) => log::warn!("Invalid --frames value '{}', using 1", val),
            }
        }
    }
    1
}

fn parse_flag(name: &str) -> Option<bool> {
    // --flag[=on|off]
    for arg in std::env::args() {
        if arg == name {
            return Some(true);
        }
        if let Some(val) = arg.strip_prefix(name).and_then(|v| v.strip_prefix('=')) {
            return Some(matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ));
        }
    }
    None
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = find_config(&parse_config_arg())?;
    let mut config = SceneConfig::load(&config_path)?;
    if let Some(corners) = parse_flag("--print-corners") {
        config.misc.output_corner_vertices = corners;
    }
    let frames = parse_frames_arg();
    let play = parse_flag("--play").unwrap_or(false);

    log::info!(
        "Starting wallmapper. config={}, objects={}, frames={}, play={}",
        config_path.display(),
        config.objects.len(),
        frames,
        play
    );

    let mut scene = Scene::init(&config)?;
    for object in &scene.objects {
        log::debug!(
            "'{}' vertex buffer: {} vertices, {} bytes",
            object.name,
            object.mesh.vertex_count(),
            object.mesh.as_bytes().len()
        );
    }
    scene.state.playing = play;

    for _ in 0..frames {
        scene.frame();
        for line in scene.overlay_lines() {
            log::debug!("{}", line);
        }
    }

    for line in scene.overlay_lines() {
        log::info!("{}", line);
    }
    log::info!("Resident textures: {}", scene.resident_textures());
    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
