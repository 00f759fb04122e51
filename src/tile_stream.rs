//! run‑time drawing of the already‑generated grid
//!
//! A fixed pool of sprites covers the view window (one screen plus a margin
//! tile on each side). Each frame every slot is pointed at the block under
//! it and re‑tinted, so nothing is spawned or despawned while scrolling.
//! Generation itself is in `world_gen.rs`.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};

use crate::camera::Scroll;
use crate::components::*;
use crate::config::GameConfig;
use crate::constants::*;
use crate::mining::{marker_blocks, MiningEngine};
use crate::terrain::{world_to_block, Cell, Material, Terrain};
use crate::visibility::{overlay_opacity, LightField};

/* ===========================================================
   helpers
   =========================================================== */
/// world units (y down, top‑left) → render space (y up, centred)
#[inline]
pub fn to_render(pos: Vec2) -> Vec2 {
    Vec2::new(pos.x + TILE_SIZE * 0.5, -(pos.y + TILE_SIZE * 0.5))
}

#[inline]
fn block_centre(cell: IVec2) -> Vec2 {
    to_render(cell.as_vec2() * TILE_SIZE)
}

/// first block drawn by the view window (one margin tile before the screen)
#[inline]
pub fn view_origin(scroll: Vec2) -> IVec2 {
    world_to_block(scroll) - IVec2::ONE
}

/// low‑frequency Perlin used to band the material colours
#[derive(Resource)]
pub struct TintNoise(Perlin);

impl TintNoise {
    pub fn new(seed: u32) -> Self {
        Self(Perlin::new(seed))
    }

    /// brightness factor around 1.0, quantised to a few levels so the
    /// colour changes in patches instead of per block
    pub fn factor(&self, cell: IVec2) -> f32 {
        let raw = self.0.get([
            cell.x as f64 * COLOR_NOISE_SCALE,
            cell.y as f64 * COLOR_NOISE_SCALE,
        ]) as f32;

        let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
            .floor()
            .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
        let norm = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
        1.0 + norm * COLOR_VARIATION_STRENGTH
    }
}

/// material colour with the noise band and the cell's variant applied
pub fn cell_color(cell: Cell, factor: f32) -> Color {
    let variant = 1.0 + (cell.variant as f32 - 1.5) * VARIANT_STRENGTH;
    let rgb = (cell.material.base_rgb() * factor * variant).clamp(Vec3::ZERO, Vec3::ONE);
    Color::srgb(rgb.x, rgb.y, rgb.z)
}

#[inline]
fn layer_z(layer: SlotLayer) -> f32 {
    match layer {
        SlotLayer::Tile => 0.0,
        SlotLayer::Ore => 1.0,
        SlotLayer::Shade => 5.0,
    }
}

/* ===========================================================
   start‑up: build the pool
   =========================================================== */
pub fn spawn_view_slots(mut commands: Commands) {
    let mut slots = Vec::with_capacity((VIEW_BLOCKS_X * VIEW_BLOCKS_Y * 3) as usize);
    for row in 0..VIEW_BLOCKS_Y {
        for col in 0..VIEW_BLOCKS_X {
            for (layer, size) in [
                (SlotLayer::Tile, TILE_SIZE),
                (SlotLayer::Ore, TILE_SIZE * 0.5),
                (SlotLayer::Shade, TILE_SIZE),
            ] {
                slots.push((
                    Sprite {
                        custom_size: Some(Vec2::splat(size)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, layer_z(layer)),
                    Visibility::Hidden,
                    ViewSlot { col, row, layer },
                ));
            }
        }
    }
    debug!("view pool: {} sprites", slots.len());
    commands.spawn_batch(slots);
}

/* ===========================================================
   per‑frame: re‑point & re‑tint every slot
   =========================================================== */
pub fn update_view_slots_system(
    terrain: Res<Terrain>,
    light: Res<LightField>,
    config: Res<GameConfig>,
    scroll: Res<Scroll>,
    noise: Res<TintNoise>,
    mut q: Query<(&ViewSlot, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    let origin = view_origin(scroll.offset);
    let surface = config.world.surface_row as i32;
    let base = config.light.base_intensity;

    for (slot, mut sprite, mut tf, mut vis) in &mut q {
        let cell = origin + IVec2::new(slot.col, slot.row);
        let centre = block_centre(cell);
        tf.translation.x = centre.x;
        tf.translation.y = centre.y;

        if !terrain.in_range(cell) {
            *vis = Visibility::Hidden;
            continue;
        }
        let data = terrain.cell(cell);
        let sky = cell.y < surface;

        let shown = match slot.layer {
            SlotLayer::Tile => {
                // open sky is the clear colour; open caves get a backdrop
                if sky && data.material == Material::Air {
                    false
                } else {
                    sprite.color = cell_color(data, noise.factor(cell));
                    true
                }
            }
            SlotLayer::Ore => match terrain.ore(cell) {
                Some(ore) => {
                    let rgb = ore.base_rgb();
                    sprite.color = Color::srgb(rgb.x, rgb.y, rgb.z);
                    true
                }
                None => false,
            },
            SlotLayer::Shade => {
                let alpha = if sky { 0.0 } else { overlay_opacity(light.level(cell), base) };
                sprite.color = Color::srgba(0.0, 0.0, 0.0, alpha);
                alpha > 0.0
            }
        };
        *vis = if shown { Visibility::Inherited } else { Visibility::Hidden };
    }
}

/* ===========================================================
   entity sprites follow their bodies
   =========================================================== */
/// lighter while dropping
#[inline]
pub fn player_color(player: &Player) -> Color {
    if player.falling {
        PLAYER_FALLING_COLOR
    } else {
        PLAYER_COLOR
    }
}

pub fn sync_body_transforms_system(
    mut q: Query<(&Body, &mut Transform, &mut Sprite, Option<&Player>, Option<&Enemy>)>,
) {
    for (body, mut tf, mut sprite, player, enemy) in &mut q {
        let p = to_render(body.pos);
        tf.translation.x = p.x;
        tf.translation.y = p.y;

        if let Some(player) = player {
            sprite.flip_x = player.facing < 0;
            sprite.color = player_color(player);
        } else if let Some(enemy) = enemy {
            sprite.flip_x = enemy.heading < 0.0;
        }
    }
}

/* ===========================================================
   mining gizmos: marker outlines + progress bar
   =========================================================== */
fn outline(gizmos: &mut Gizmos, cell: IVec2, color: Color) {
    let c = block_centre(cell);
    let h = TILE_SIZE * 0.5;
    let (a, b) = (c + Vec2::new(-h, -h), c + Vec2::new(h, -h));
    let (d, e) = (c + Vec2::new(h, h), c + Vec2::new(-h, h));
    gizmos.line_2d(a, b, color);
    gizmos.line_2d(b, d, color);
    gizmos.line_2d(d, e, color);
    gizmos.line_2d(e, a, color);
}

pub fn draw_mining_gizmos_system(
    mut gizmos: Gizmos,
    terrain: Res<Terrain>,
    config: Res<GameConfig>,
    mining: Res<MiningEngine>,
    player_q: Query<&Body, With<Player>>,
) {
    let Ok(body) = player_q.get_single() else { return };

    for (_, cell) in marker_blocks(&terrain, body.pos, config.mining.proximity) {
        outline(&mut gizmos, cell, MARKER_COLOR);
    }

    let Some(target) = mining.target() else { return };
    let required = terrain.material(target).required_hits();
    if required == 0 {
        return;
    }
    let frac = (mining.progress() as f32 / required as f32).clamp(0.0, 1.0);
    let c = block_centre(target);
    let left = c + Vec2::new(-TILE_SIZE * 0.5, -TILE_SIZE * 0.5 - 2.0);
    gizmos.line_2d(left, left + Vec2::X * TILE_SIZE, PROGRESS_BG_COLOR);
    gizmos.line_2d(left, left + Vec2::X * TILE_SIZE * frac, PROGRESS_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_space_flips_y_and_centres() {
        assert_eq!(to_render(Vec2::ZERO), Vec2::new(4.0, -4.0));
        assert_eq!(to_render(Vec2::new(16.0, 24.0)), Vec2::new(20.0, -28.0));
    }

    #[test]
    fn view_starts_one_block_before_the_screen() {
        assert_eq!(view_origin(Vec2::ZERO), IVec2::new(-1, -1));
        assert_eq!(view_origin(Vec2::new(23.0, 80.0)), IVec2::new(1, 9));
    }

    #[test]
    fn tint_stays_within_the_band() {
        let noise = TintNoise::new(7);
        for y in 0..60 {
            for x in 0..60 {
                let f = noise.factor(IVec2::new(x, y));
                assert!((1.0 - COLOR_VARIATION_STRENGTH..=1.0 + COLOR_VARIATION_STRENGTH).contains(&f));
            }
        }
    }

    #[test]
    fn falling_player_is_drawn_lighter() {
        let mut p = Player::default();
        assert_eq!(player_color(&p), PLAYER_COLOR);
        p.falling = true;
        assert_eq!(player_color(&p), PLAYER_FALLING_COLOR);
    }

    #[test]
    fn variants_shift_the_colour() {
        let a = cell_color(Cell { material: Material::Stone, variant: 0 }, 1.0);
        let b = cell_color(Cell { material: Material::Stone, variant: 3 }, 1.0);
        assert_ne!(a, b);
    }
}
