//! light around the player – breadth‑first, rebuilt every frame
//!
//! Light floods out from the player's block through the four orthogonal
//! neighbours. Each hop loses the cost of the block it leaves (cheap for
//! air and grass, expensive for everything else). A block keeps the value
//! it was first reached with, and blocks never reached stay dark.
use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Deserialize;

use crate::components::{Body, Player};
use crate::constants::TILE_SIZE;
use crate::terrain::{world_to_block, Terrain};

/* ===========================================================
   Tunables
   =========================================================== */
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub base_intensity: u8,
    /// attenuation leaving air / grass
    pub open_cost: u8,
    /// attenuation leaving any other block
    pub dense_cost: u8,
    pub window_width: usize,
    pub window_height: usize,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            base_intensity: 9,
            open_cost: 1,
            dense_cost: 3,
            window_width: 19,
            window_height: 19,
        }
    }
}

const NEIGHBOURS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/* ===========================================================
   LightField resource
   =========================================================== */
#[derive(Resource, Clone, Debug)]
pub struct LightField {
    /// block coordinate of the window's top‑left cell
    origin: IVec2,
    width: usize,
    height: usize,
    levels: Vec<u8>,
    open_cost: u8,
    dense_cost: u8,
    queue: VecDeque<(IVec2, u8)>,
    visited: Vec<bool>,
}

impl LightField {
    pub fn new(config: &LightConfig) -> Self {
        let (w, h) = (config.window_width.max(1), config.window_height.max(1));
        Self {
            origin: IVec2::ZERO,
            width: w,
            height: h,
            levels: vec![0; w * h],
            open_cost: config.open_cost,
            dense_cost: config.dense_cost,
            queue: VecDeque::new(),
            visited: vec![false; w * h],
        }
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        self.origin
    }
    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width as u32, self.height as u32)
    }

    #[inline]
    fn idx(&self, cell: IVec2) -> Option<usize> {
        let local = cell - self.origin;
        (local.x >= 0
            && local.y >= 0
            && (local.x as usize) < self.width
            && (local.y as usize) < self.height)
            .then(|| local.y as usize * self.width + local.x as usize)
    }

    /// light at a block; zero outside the window
    #[inline]
    pub fn level(&self, cell: IVec2) -> u8 {
        self.idx(cell).map_or(0, |i| self.levels[i])
    }

    /// Throws away last frame's values and floods again, with the window
    /// centred on `player_cell`.
    pub fn recompute(&mut self, terrain: &Terrain, player_cell: IVec2, base_intensity: u8) {
        self.origin = player_cell - IVec2::new(self.width as i32 / 2, self.height as i32 / 2);
        self.levels.fill(0);
        self.visited.fill(false);
        self.queue.clear();

        let Some(start) = self.idx(player_cell) else { return };
        self.levels[start] = base_intensity;
        self.visited[start] = true;
        self.queue.push_back((player_cell, base_intensity));

        while let Some((cell, level)) = self.queue.pop_front() {
            let cost = if terrain.material(cell).is_translucent() {
                self.open_cost
            } else {
                self.dense_cost
            };
            let next = level.saturating_sub(cost);
            if next == 0 {
                continue;
            }
            for dir in NEIGHBOURS {
                let n = cell + dir;
                let Some(i) = self.idx(n) else { continue };
                if self.visited[i] {
                    continue;
                }
                self.visited[i] = true;
                self.levels[i] = next;
                self.queue.push_back((n, next));
            }
        }
    }

    /// darkness tile index per cell, row‑major over the window: one level
    /// below the light value, 0 meaning pitch black
    pub fn render_overlay(&self) -> Vec<u8> {
        self.levels.iter().map(|&l| overlay_level(l)).collect()
    }
}

#[inline]
pub fn overlay_level(light: u8) -> u8 {
    light.saturating_sub(1)
}

/// opacity of the darkness tile drawn over a cell with `light`
#[inline]
pub fn overlay_opacity(light: u8, base_intensity: u8) -> f32 {
    let top = overlay_level(base_intensity).max(1) as f32;
    1.0 - (overlay_level(light) as f32 / top).clamp(0.0, 1.0)
}

/* ===========================================================
   per‑frame system
   =========================================================== */
pub fn recompute_light_system(
    terrain: Res<Terrain>,
    config: Res<crate::config::GameConfig>,
    player_q: Query<&Body, With<Player>>,
    mut light: ResMut<LightField>,
) {
    let Ok(body) = player_q.get_single() else { return };
    let centre = body.pos + Vec2::splat(TILE_SIZE / 2.0);
    light.recompute(&terrain, world_to_block(centre), config.light.base_intensity);
}
