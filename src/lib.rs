//! mineshaft – a side‑on mining game on a procedurally generated block grid
//!
//! The simulation core (grid, generation, collision, mining, light) is plain
//! data plus functions; the Bevy systems around it live next to the code
//! they drive and are wired together in `main.rs`.

pub mod camera;
pub mod collision;
pub mod components;
pub mod config;
pub mod constants;
pub mod economy;
pub mod enemy;
pub mod error;
pub mod input;
pub mod mining;
pub mod player;
pub mod terrain;
pub mod tile_stream;
pub mod visibility;
pub mod world_gen;
