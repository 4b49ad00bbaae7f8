//! # Player
//!
//! A first-person body in the voxel world: where it stands, where it looks and
//! how it moves.
//!
//! ## Movement
//!
//! Each update turns the held movement keys into a horizontal velocity along the
//! facing direction (pitch never affects walking), applies friction when no key is
//! held, then gravity and jumping. The body is then moved one axis at a time, Y
//! first, then X, then Z. After each axis move, any overlap with solid blocks is
//! resolved by snapping back to the face of the block with a small gap.
//!
//! The move-then-resolve scheme can tunnel through blocks at very high speeds.
//! At walking and falling speeds on a unit grid it does not.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Point3, Rad, Vector3, Zero};
use log::debug;
use web_time::Duration;

use crate::config::PlayerConfig;
use crate::engine_state::raycast::direction_from_angles;
use crate::engine_state::voxels::world::World;

pub mod collision;

use collision::{solid_blocks_around, Aabb};

/// Width of the player's collision box along X and Z.
pub const PLAYER_WIDTH: f32 = 0.6;
/// Height of the player's collision box.
pub const PLAYER_HEIGHT: f32 = 1.8;
/// Gap left between the player and a block it collided with.
const COLLISION_EPSILON: f32 = 1e-4;
/// Pitch limit, just short of straight up or down.
const MAX_PITCH: f32 = FRAC_PI_2 * (89.0 / 90.0);

/// Movement keys currently held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Position of the feet, centred horizontally in the collision box
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    /// Horizontal rotation; `0` faces positive X
    pub yaw: Rad<f32>,
    /// Vertical rotation, kept within ±89°
    pub pitch: Rad<f32>,
    pub on_ground: bool,
    pub intent: MovementIntent,
    config: PlayerConfig,
}

impl Player {
    /// Creates a player standing at `position`, facing positive X.
    pub fn new(position: Point3<f32>, config: PlayerConfig) -> Self {
        Player {
            position,
            velocity: Vector3::zero(),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            on_ground: false,
            intent: MovementIntent::default(),
            config,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Turns the view by a mouse movement.
    ///
    /// # Arguments
    /// * `delta_x` - Horizontal mouse movement, positive to the right
    /// * `delta_y` - Vertical mouse movement, positive downwards
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += Rad(delta_x * self.config.mouse_sensitivity);
        self.pitch += Rad(-delta_y * self.config.mouse_sensitivity);
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        self.pitch = Rad(self.pitch.0.clamp(-MAX_PITCH, MAX_PITCH));
    }

    pub fn eye_position(&self) -> Point3<f32> {
        self.position + Vector3::new(0.0, self.config.eye_height, 0.0)
    }

    pub fn look_direction(&self) -> Vector3<f32> {
        direction_from_angles(self.yaw, self.pitch)
    }

    /// The block the feet are in.
    pub fn feet_block_position(&self) -> Point3<i32> {
        Point3::new(
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
            self.position.z.floor() as i32,
        )
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_feet(self.position, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Advances the player's physics by one tick.
    ///
    /// # Arguments
    /// * `world` - The world to collide against
    /// * `dt` - The length of the tick
    pub fn update(&mut self, world: &World, dt: Duration) {
        let dt = dt.as_secs_f32();
        if dt <= 0.0 {
            return;
        }
        self.clamp_pitch();

        self.apply_walking(dt);

        self.velocity.y -= self.config.gravity * dt;
        if self.intent.jump && self.on_ground {
            self.velocity.y = self.config.jump_force;
            self.on_ground = false;
        }

        self.on_ground = false;
        for axis in [1, 0, 2] {
            let delta = self.velocity[axis] * dt;
            self.move_axis(world, axis, delta);
        }
    }

    fn apply_walking(&mut self, dt: f32) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);

        let mut wish = Vector3::zero();
        if self.intent.forward {
            wish += forward;
        }
        if self.intent.backward {
            wish -= forward;
        }
        if self.intent.right {
            wish += right;
        }
        if self.intent.left {
            wish -= right;
        }

        if wish.x != 0.0 || wish.z != 0.0 {
            let length = (wish.x * wish.x + wish.z * wish.z).sqrt();
            self.velocity.x = wish.x / length * self.config.walk_speed;
            self.velocity.z = wish.z / length * self.config.walk_speed;
        } else {
            let factor = (1.0 - self.config.friction * dt).max(0.0);
            self.velocity.x *= factor;
            self.velocity.z *= factor;
        }
    }

    /// Moves along one axis and pushes the player back out of any solid block.
    fn move_axis(&mut self, world: &World, axis: usize, delta: f32) {
        if delta == 0.0 {
            return;
        }
        self.position[axis] += delta;

        let half_width = PLAYER_WIDTH / 2.0;
        let (below, above) = if axis == 1 {
            (0.0, PLAYER_HEIGHT)
        } else {
            (half_width, half_width)
        };

        for block in solid_blocks_around(world, &self.aabb()) {
            if !self.aabb().intersects(&block) {
                continue;
            }
            if delta > 0.0 {
                self.position[axis] = block.min[axis] - above - COLLISION_EPSILON;
            } else {
                self.position[axis] = block.max[axis] + below + COLLISION_EPSILON;
                if axis == 1 {
                    self.on_ground = true;
                }
            }
            self.velocity[axis] = 0.0;
        }

        if self.velocity[axis] == 0.0 {
            debug!("Player collided on axis {} at {:?}", axis, self.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::voxels::{block::block_type::BlockType, chunk::ChunkPosition};

    fn flat_world() -> World {
        let mut world = World::new(WorldConfig::flat(16));
        world.ensure_chunks_around(ChunkPosition::new(0, 0), 1);
        world
    }

    fn tick() -> Duration {
        Duration::from_millis(50)
    }

    #[test]
    fn falling_player_lands_on_the_floor() {
        let world = flat_world();
        let mut player = Player::new(Point3::new(0.5, 17.05, 0.5), PlayerConfig::default());
        player.velocity.y = -5.0;

        player.update(&world, Duration::from_secs_f32(1.0 / 60.0));

        assert!(player.on_ground);
        assert_eq!(player.velocity.y, 0.0);
        assert!((player.position.y - 17.0).abs() < 1e-3);
        assert!(player.position.y >= 17.0);
    }

    #[test]
    fn standing_player_stays_grounded() {
        let world = flat_world();
        let mut player = Player::new(Point3::new(4.5, 17.0001, 4.5), PlayerConfig::default());
        for _ in 0..20 {
            player.update(&world, tick());
            assert!(player.on_ground);
        }
        assert!((player.position.y - 17.0).abs() < 1e-3);
    }

    #[test]
    fn walls_stop_horizontal_movement() {
        let mut world = flat_world();
        world.set_block(Point3::new(3, 17, 0), BlockType::Dirt);
        world.set_block(Point3::new(3, 18, 0), BlockType::Dirt);

        let mut player = Player::new(Point3::new(1.5, 17.0001, 0.5), PlayerConfig::default());
        player.intent.forward = true;
        for _ in 0..40 {
            player.update(&world, tick());
        }

        assert!(player.position.x < 3.0 - PLAYER_WIDTH / 2.0);
        assert!(player.position.x > 2.6);
        assert_eq!(player.velocity.x, 0.0);
        assert!((player.position.z - 0.5).abs() < 1e-4);
    }

    #[test]
    fn jumping_requires_ground() {
        let world = flat_world();
        let mut player = Player::new(Point3::new(4.5, 17.0001, 4.5), PlayerConfig::default());
        player.update(&world, tick());
        assert!(player.on_ground);

        player.intent.jump = true;
        player.update(&world, tick());
        assert!(!player.on_ground);
        assert!(player.velocity.y > 0.0);
        let height = player.position.y;

        // Still holding jump in mid air does not jump again.
        player.update(&world, tick());
        assert!(player.velocity.y < PlayerConfig::default().jump_force - 1.0);
        assert!(player.position.y > height);
    }

    #[test]
    fn friction_slows_and_stops_an_idle_player() {
        let world = flat_world();
        let mut player = Player::new(Point3::new(4.5, 17.0001, 4.5), PlayerConfig::default());
        player.velocity.x = 4.0;
        player.update(&world, tick());
        assert!((player.velocity.x - 2.0).abs() < 1e-4);

        player.update(&world, Duration::from_millis(200));
        assert_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn walking_ignores_pitch() {
        let world = flat_world();
        let mut player = Player::new(Point3::new(4.5, 17.0001, 4.5), PlayerConfig::default());
        player.pitch = Rad(-1.2);
        player.intent.forward = true;
        player.update(&world, tick());
        assert!((player.velocity.x - PlayerConfig::default().walk_speed).abs() < 1e-4);
        assert!(player.velocity.z.abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = Player::new(Point3::new(0.0, 20.0, 0.0), PlayerConfig::default());
        player.rotate(0.0, -1.0e6);
        assert!(player.pitch.0 <= MAX_PITCH);
        assert!(player.pitch.0 > 1.5);
        player.rotate(0.0, 2.0e6);
        assert!(player.pitch.0 >= -MAX_PITCH);
        assert!(player.look_direction().y < -0.99);
    }

    #[test]
    fn eye_sits_above_the_feet() {
        let player = Player::new(Point3::new(0.5, 17.0, 0.5), PlayerConfig::default());
        assert_eq!(player.eye_position(), Point3::new(0.5, 17.0 + 1.6, 0.5));
        assert_eq!(player.feet_block_position(), Point3::new(0, 17, 0));
    }
}
