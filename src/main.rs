//! # Voxel World Entry Point
//!
//! Runs a short scripted session against a generated world and logs what
//! happens. Set `RUST_LOG=debug` to see chunk generation, light and meshing detail.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```

use std::path::PathBuf;

fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    voxel_world::run(config_path.as_deref());
}
