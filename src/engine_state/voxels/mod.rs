//! # Voxel World Core
//!
//! This module contains the voxel data model: what a block is, how blocks are grouped
//! into chunks, how chunks form an unbounded world, and how sky light is kept
//! consistent as the world is edited.
//!
//! ## Architecture
//!
//! * **Block**: Block types, their static properties and the per-voxel `Block` value
//! * **Chunk**: A fixed-size 16x32x16 column of blocks, its terrain and its local light
//! * **World**: A sparse map of chunks and the world-to-chunk coordinate transform
//! * **Light**: Incremental sky light repair after a block is added or removed
//!
//! ## Data Flow
//!
//! 1. World receives requests for block access or modification
//! 2. World delegates to the appropriate chunk, generating it if necessary
//! 3. Edits that change transparency trigger the light engine
//! 4. The caller rebuilds meshes for the chunks the edit reports as stale
//!
//! Everything here is single threaded and synchronous.

pub mod block;
pub mod chunk;
pub mod light;
pub mod world;
