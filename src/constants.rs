use bevy::prelude::*;

/// -------- tiles & screen --------
pub const TILE_SIZE: f32 = 8.0;
pub const TILE_PX: i32   = 8;
pub const SCREEN_W: f32  = 128.0;
pub const SCREEN_H: f32  = 128.0;
pub const WINDOW_SCALE: f32 = 4.0;

/// blocks drawn per axis: one screen plus a margin tile on each side
pub const VIEW_BLOCKS_X: i32 = (SCREEN_W as i32) / TILE_PX + 2;
pub const VIEW_BLOCKS_Y: i32 = (SCREEN_H as i32) / TILE_PX + 2;

/// -------- scrolling --------
pub const SCROLL_BORDER_X: f32 = 80.0;
pub const SCROLL_BORDER_Y: f32 = 80.0;

/// -------- entity box --------
/// every entity occupies one tile‑sized box; the far edge is at +7
pub const BOX_EXTENT: f32 = TILE_SIZE - 1.0;

/// enemies touching the player closer than this end the run
pub const CONTACT_RADIUS: f32 = 6.0;

/// -------- colours --------
pub const SKY_COLOR: Color = Color::srgb(0.18, 0.65, 1.0);
pub const PLAYER_COLOR: Color = Color::srgb(0.95, 0.80, 0.25);
pub const PLAYER_FALLING_COLOR: Color = Color::srgb(1.0, 0.95, 0.60);
pub const MARKER_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);
pub const PROGRESS_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const PROGRESS_BG_COLOR: Color = Color::srgb(0.35, 0.35, 0.4);

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64   = 0.05;
pub const COLOR_VARIATION_LEVELS: i32 = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.12;
pub const VARIANT_STRENGTH: f32 = 0.06;
