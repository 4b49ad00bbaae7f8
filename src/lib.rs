#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The simulation core of a Minecraft-like voxel sandbox: an unbounded world of
//! 16x32x16 chunks, incremental sky lighting, face-culled chunk meshes, block
//! selection by ray casting and first-person player physics.
//!
//! The crate owns no window and no GPU state. A front end feeds it input through
//! [`PlayerAction`], advances it with [`EngineState::tick`] and uploads the
//! [`Mesh`] buffers it hands out.
//!
//! ## Key Modules
//!
//! * `config` - Tunables for world generation and player physics, loadable from JSON
//! * `engine_state` - The session, the voxel data model, meshing, ray casting and the player
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_world::{build_chunk_mesh, BlockType, ChunkPosition, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::flat(16));
//! world.set_block(Point3::new(4, 17, 4), BlockType::OakLog);
//!
//! let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0));
//! assert!(mesh.face_count() > 0);
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunks are generated synchronously the first time something writes to them
//! * Light repairs after an edit only touch the region the edit affected
//! * Meshes are only rebuilt for chunks an edit or a generation made stale

use std::path::Path;

use cgmath::Rad;
use log::{info, warn};
use web_time::{Duration, Instant};

pub mod config;
pub mod engine_state;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, PlayerConfig, TerrainKind, WorldConfig};
pub use engine_state::{
    player::{collision::Aabb, MovementIntent, Player},
    raycast::{direction_from_angles, raycast, RaycastResult},
    rendering::{build_chunk_mesh, Mesh, Vertex},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, Block, MAX_LIGHT},
        chunk::{Chunk, ChunkPosition, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
        world::World,
    },
    EngineState, PlayerAction,
};

/// Length of one simulated frame in the demo session.
const FRAME: Duration = Duration::from_millis(16);

/// Initialises logging, loads the config and plays a short scripted session.
///
/// # Arguments
/// * `config_path` - Optional JSON config file. Defaults are used if it is
///   missing or invalid.
pub fn run(config_path: Option<&Path>) {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = load_config(config_path);
    let started = Instant::now();
    let mut engine_state = EngineState::new(config);
    info!(
        "World ready with {} chunks in {:?}",
        engine_state.world.chunk_count(),
        started.elapsed()
    );

    run_demo_session(&mut engine_state);
}

fn load_config(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return EngineConfig::default();
    };
    match EngineConfig::load(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            warn!("{}, falling back to defaults", err);
            EngineConfig::default()
        }
    }
}

/// Lets the player land, digs the block under their feet, drops into the hole
/// and places a log in front of them, logging what each step did.
fn run_demo_session(engine_state: &mut EngineState) {
    log_meshes(engine_state);

    for _ in 0..60 {
        engine_state.tick(FRAME);
    }
    info!(
        "Player settled at {:?}, on ground: {}",
        engine_state.player.position, engine_state.player.on_ground
    );

    engine_state.player.pitch = Rad(-std::f32::consts::FRAC_PI_2);
    engine_state.tick(FRAME);
    info!("Looking down at {:?}", engine_state.selection());

    engine_state.player_actions.break_block = true;
    engine_state.tick(FRAME);
    for _ in 0..30 {
        engine_state.tick(FRAME);
    }
    info!(
        "Dropped into the hole, feet at {:?} with sky light {}",
        engine_state.player.feet_block_position(),
        engine_state.light_at_player_feet()
    );

    engine_state.player.pitch = Rad(-std::f32::consts::FRAC_PI_4);
    engine_state.tick(FRAME);
    match engine_state.place_at_selection(BlockType::OakLog) {
        Some(position) => info!("Placed an oak log at {:?}", position),
        None => warn!("Nothing to place a log against from {:?}", engine_state.player.eye_position()),
    }

    log_meshes(engine_state);
}

fn log_meshes(engine_state: &mut EngineState) {
    let meshes = engine_state.take_dirty_meshes();
    let faces: usize = meshes.iter().map(|(_, mesh)| mesh.face_count()).sum();
    let bytes: usize = meshes
        .iter()
        .map(|(_, mesh)| mesh.vertex_bytes().len() + mesh.index_bytes().len())
        .sum();
    info!(
        "Rebuilt {} chunk meshes: {} faces, {} bytes of vertex and index data",
        meshes.len(),
        faces,
        bytes
    );
}
