//! # Engine State Module
//!
//! The core engine module that owns a running session of the voxel world.
//!
//! ## Key Components
//!
//! * `EngineState` - The session: one world, one player and the current selection
//! * `voxels` - Handles voxel data, chunks, world generation and sky light
//! * `rendering` - Turns chunks into vertex and index buffers
//! * `player` - First-person movement and collision
//! * `raycast` - Block selection along the view direction
//!
//! ## Architecture
//!
//! The `EngineState` struct serves as the boundary to whatever drives it. Input
//! arrives as a [`PlayerAction`] per frame, time arrives through [`EngineState::tick`],
//! and meshes leave through [`EngineState::take_dirty_meshes`] for every chunk that
//! was generated or edited since the last call.
//!
//! Everything runs synchronously on the calling thread. Generating a chunk is the
//! most expensive thing a tick can do, and only happens when the player crosses a
//! chunk border.

use std::collections::HashSet;

use cgmath::Point3;
use log::{debug, info};
use web_time::Duration;

use crate::config::EngineConfig;
use player::{collision::Aabb, Player};
use raycast::{raycast, RaycastResult};
use rendering::{build_chunk_mesh, Mesh};
use voxels::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{ChunkPosition, CHUNK_DEPTH, CHUNK_WIDTH},
    world::World,
};

pub mod player;
pub mod raycast;
pub mod rendering;
pub mod voxels;

/// Column of the spawn chunk the player is placed on.
const SPAWN_COLUMN: (i32, i32) = (CHUNK_WIDTH / 2, CHUNK_DEPTH / 2);

/// Represents player actions for one frame
///
/// Movement flags describe keys that are held; the rest are one-shot and are
/// cleared once a tick has consumed them.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerAction {
    /// Movement actions - true if key is pressed or held
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,

    /// Mouse movement since the last frame
    pub rotate_view: Option<(f32, f32)>,

    /// Actions that should only trigger on press, not hold
    pub break_block: bool,
    pub place_block: Option<BlockType>,
}

impl PlayerAction {
    fn clear_one_shot(&mut self) {
        self.rotate_view = None;
        self.break_block = false;
        self.place_block = None;
    }
}

/// The main state container for a session
///
/// # Examples
///
/// ```
/// use voxel_world::{BlockType, EngineConfig, EngineState, WorldConfig};
/// use web_time::Duration;
///
/// let config = EngineConfig {
///     world: WorldConfig::flat(16),
///     ..EngineConfig::default()
/// };
/// let mut engine_state = EngineState::new(config);
///
/// // Main loop
/// for _ in 0..10 {
///     engine_state.tick(Duration::from_millis(16));
///     for (_position, _mesh) in engine_state.take_dirty_meshes() {
///         // upload
///     }
/// }
/// ```
pub struct EngineState {
    /// The voxel world containing all chunk data
    pub world: World,
    pub player: Player,
    /// Current player actions, set by the input layer before each tick
    pub player_actions: PlayerAction,
    selection: Option<RaycastResult>,
    dirty_chunks: HashSet<ChunkPosition>,
    view_radius: i32,
    /// Current chunk position of the player
    current_player_chunk_position: ChunkPosition,
}

impl EngineState {
    /// Creates a new session with the player standing on the spawn column.
    ///
    /// Every chunk within `view_radius` of the spawn chunk is generated up
    /// front and queued for meshing.
    pub fn new(config: EngineConfig) -> Self {
        let mut world = World::new(config.world);
        let spawn_chunk = ChunkPosition::new(0, 0);

        let created = world.ensure_chunks_around(spawn_chunk, config.view_radius);
        let ground = world
            .get_or_create_chunk(spawn_chunk)
            .highest_block_at(SPAWN_COLUMN.0, SPAWN_COLUMN.1)
            .map_or(0, |y| y + 1);
        let spawn = Point3::new(
            SPAWN_COLUMN.0 as f32 + 0.5,
            ground as f32,
            SPAWN_COLUMN.1 as f32 + 0.5,
        );
        info!("Spawning player at {:?}", spawn);

        let mut engine_state = EngineState {
            world,
            player: Player::new(spawn, config.player),
            player_actions: PlayerAction::default(),
            selection: None,
            dirty_chunks: HashSet::new(),
            view_radius: config.view_radius,
            current_player_chunk_position: spawn_chunk,
        };
        engine_state.mark_generated(&created);
        engine_state.dirty_chunks.insert(spawn_chunk);
        engine_state.refresh_selection();
        engine_state
    }

    /// Advances the session by one frame.
    ///
    /// Applies the current [`PlayerAction`], runs the player physics, generates
    /// chunks that came into view and refreshes the selection. Break and place
    /// requests are carried out against the refreshed selection.
    ///
    /// # Arguments
    ///
    /// * `dt` - The time elapsed since the last frame
    pub fn tick(&mut self, dt: Duration) {
        let actions = self.player_actions;

        if let Some((delta_x, delta_y)) = actions.rotate_view {
            self.player.rotate(delta_x, delta_y);
        }
        self.player.intent.forward = actions.move_forward;
        self.player.intent.backward = actions.move_backward;
        self.player.intent.left = actions.move_left;
        self.player.intent.right = actions.move_right;
        self.player.intent.jump = actions.jump;

        self.player.update(&self.world, dt);

        let (new_chunk_position, _) = World::world_to_chunk_coords(self.player.feet_block_position());
        if new_chunk_position != self.current_player_chunk_position {
            debug!(
                "Player moved into chunk ({}, {})",
                new_chunk_position.x, new_chunk_position.z
            );
            let created = self
                .world
                .ensure_chunks_around(new_chunk_position, self.view_radius);
            self.mark_generated(&created);
            self.current_player_chunk_position = new_chunk_position;
        }

        self.refresh_selection();

        if actions.break_block {
            self.break_selected();
        }
        if let Some(block_type) = actions.place_block {
            self.place_at_selection(block_type);
        }

        self.player_actions.clear_one_shot();
    }

    /// The block the player is currently looking at, if any is within reach.
    pub fn selection(&self) -> Option<RaycastResult> {
        self.selection
    }

    /// Breaks the selected block.
    ///
    /// # Returns
    /// The position of the broken block, or `None` if nothing is selected or the
    /// block cannot be broken.
    pub fn break_selected(&mut self) -> Option<Point3<i32>> {
        let hit = self.selection?;
        let chunk_position = self.world.set_block(hit.block_position, BlockType::Air)?;
        self.mark_edited(hit.block_position, chunk_position);
        self.refresh_selection();
        Some(hit.block_position)
    }

    /// Places a block against the selected face.
    ///
    /// Refused if nothing is selected, the target is not air, or a solid block
    /// would overlap the player.
    ///
    /// # Returns
    /// The position of the placed block.
    pub fn place_at_selection(&mut self, block_type: BlockType) -> Option<Point3<i32>> {
        let hit = self.selection?;
        if block_type.is_air() {
            return None;
        }
        let target = hit.placement_position();
        if !self.world.get_block_at_world(target).block_type.is_air() {
            return None;
        }
        if block_type.is_solid() && Aabb::block(target).intersects(&self.player.aabb()) {
            debug!("Refusing to place {:?} inside the player at {:?}", block_type, target);
            return None;
        }

        let chunk_position = self.world.set_block(target, block_type)?;
        self.mark_edited(target, chunk_position);
        self.refresh_selection();
        Some(target)
    }

    /// Sky light of the block the player's feet are in.
    pub fn light_at_player_feet(&self) -> u8 {
        self.world.sky_light_at(self.player.feet_block_position())
    }

    /// Rebuilds and hands out the mesh of every chunk that changed since the
    /// last call.
    pub fn take_dirty_meshes(&mut self) -> Vec<(ChunkPosition, Mesh)> {
        let mut positions: Vec<ChunkPosition> = self.dirty_chunks.drain().collect();
        positions.sort_by_key(|position| (position.x, position.z));
        positions
            .into_iter()
            .filter(|&position| self.world.get_chunk(position).is_some())
            .map(|position| (position, build_chunk_mesh(&self.world, position)))
            .collect()
    }

    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty_chunks.len()
    }

    fn refresh_selection(&mut self) {
        self.selection = raycast(
            &self.world,
            self.player.eye_position(),
            self.player.look_direction(),
            self.player.config().reach,
        );
    }

    /// New chunks need a mesh, and their loaded neighbours need theirs rebuilt
    /// because their border faces are no longer exposed.
    fn mark_generated(&mut self, created: &[ChunkPosition]) {
        for &position in created {
            self.dirty_chunks.insert(position);
            for side in [BlockSide::PosX, BlockSide::NegX, BlockSide::PosZ, BlockSide::NegZ] {
                let neighbor = position.offset(side);
                if self.world.get_chunk(neighbor).is_some() {
                    self.dirty_chunks.insert(neighbor);
                }
            }
        }
    }

    fn mark_edited(&mut self, pos: Point3<i32>, chunk_position: ChunkPosition) {
        self.dirty_chunks.insert(chunk_position);
        for neighbor in World::boundary_neighbors(pos) {
            if self.world.get_chunk(neighbor).is_some() {
                self.dirty_chunks.insert(neighbor);
            }
        }
    }
}
