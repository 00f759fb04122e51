use bevy::prelude::*;

/* ===========================================================
   shared components
   =========================================================== */
/// top‑left corner of the entity box, world units, y down
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub pos: Vec2,
}

/// displacement applied per tick
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/* ===========================================================
   player
   =========================================================== */
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// -1 left, 1 right
    pub facing: i8,
    pub falling: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self { facing: 1, falling: false }
    }
}

/* ===========================================================
   enemies
   =========================================================== */
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    /// patrol direction, -1 or 1
    pub heading: f32,
}

/* tag added/removed every frame by update_active_tag_system */
#[derive(Component)]
pub struct Active;

/* ===========================================================
   view‑window sprite slots
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotLayer {
    Tile,
    Ore,
    Shade,
}

/// one pooled sprite, pinned to a column/row of the view window
#[derive(Component, Clone, Copy, Debug)]
pub struct ViewSlot {
    pub col: i32,
    pub row: i32,
    pub layer: SlotLayer,
}
