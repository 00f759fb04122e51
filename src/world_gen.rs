//! world generation: cellular‑automaton caves, depth strata & ore seeding
//!
//! Passes, in order:
//! 1. noise fill – every cell is rock with probability `fill_probability`
//! 2. smoothing – `smoothing_iterations` double‑buffered automaton steps over
//!    the interior, then both side columns are sealed
//! 3. variants – uniform cosmetic index per cell
//! 4. stratification – only solid cells get a depth material, cave air stays
//! 5. ores – per rock cell, rules tested cheapest first, the last hit wins
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::error::MinerError;
use crate::terrain::{Material, Ore, Terrain};

/// neighbours needed for an interior cell to stay / become rock
const BIRTH_NEIGHBOURS: u8 = 5;

/* ===========================================================
   configuration
   =========================================================== */
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub width: usize,
    pub height: usize,
    pub fill_probability: f64,
    pub smoothing_iterations: u32,
    /// rows above are open sky, this row is grass
    pub surface_row: usize,
    /// dirt rows directly under the grass
    pub soil_depth: usize,
    /// depth tiers, shallowest first; the last one runs to the bottom
    pub tiers: Vec<Material>,
    pub band_height: usize,
    /// blended rows between two adjacent tiers
    pub transition_width: usize,
    /// tested in order; put cheap ores first
    pub ores: Vec<OreRule>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OreRule {
    pub ore: Ore,
    /// shallowest row this ore may appear on
    pub min_row: usize,
    pub materials: Vec<Material>,
    pub base_chance: f64,
    /// added chance, scaled by `row / height`
    pub depth_chance: f64,
}

impl OreRule {
    #[inline]
    fn chance(&self, depth_factor: f64) -> f64 {
        (self.base_chance + self.depth_chance * depth_factor).clamp(0.0, 1.0)
    }

    #[inline]
    fn eligible(&self, row: usize, material: Material) -> bool {
        row >= self.min_row && self.materials.contains(&material)
    }
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        use Material::*;
        Self {
            width: 90,
            height: 150,
            fill_probability: 0.72,
            smoothing_iterations: 5,
            surface_row: 6,
            soil_depth: 4,
            tiers: vec![Dirt, Stone, Granite, Obsidian],
            band_height: 24,
            transition_width: 6,
            ores: vec![
                OreRule {
                    ore: Ore::Coal,
                    min_row: 35,
                    materials: vec![Stone, Granite, Obsidian],
                    base_chance: 0.03,
                    depth_chance: 0.05,
                },
                OreRule {
                    ore: Ore::Iron,
                    min_row: 60,
                    materials: vec![Stone, Granite],
                    base_chance: 0.015,
                    depth_chance: 0.04,
                },
                OreRule {
                    ore: Ore::Gold,
                    min_row: 90,
                    materials: vec![Granite, Obsidian],
                    base_chance: 0.006,
                    depth_chance: 0.02,
                },
                OreRule {
                    ore: Ore::Diamond,
                    min_row: 110,
                    materials: vec![Obsidian],
                    base_chance: 0.002,
                    depth_chance: 0.012,
                },
            ],
        }
    }
}

impl WorldGenConfig {
    pub fn validate(&self) -> Result<(), MinerError> {
        let dims = |reason| MinerError::InvalidDimensions {
            width: self.width,
            height: self.height,
            reason,
        };
        if self.width < 3 || self.height < 3 {
            return Err(dims("need at least 3x3 blocks for a sealed interior"));
        }
        if self.surface_row >= self.height {
            return Err(dims("surface row lies below the bottom row"));
        }
        if self.surface_row == 0 {
            return Err(dims("surface row 0 leaves no open row to spawn on"));
        }
        if !(0.0..=1.0).contains(&self.fill_probability) {
            return Err(MinerError::InvalidConfig(format!(
                "fill_probability {} outside 0..=1",
                self.fill_probability
            )));
        }
        if self.tiers.is_empty() || self.tiers.iter().any(|m| !m.is_solid()) {
            return Err(MinerError::InvalidConfig(
                "tiers must list at least one solid material".into(),
            ));
        }
        if self.band_height == 0 {
            return Err(MinerError::InvalidConfig("band_height must be positive".into()));
        }
        for rule in &self.ores {
            let ok = |c: f64| c.is_finite() && c >= 0.0;
            if !ok(rule.base_chance) || !ok(rule.depth_chance) {
                return Err(MinerError::InvalidConfig(format!(
                    "{:?} chances must be finite and non‑negative",
                    rule.ore
                )));
            }
            if rule.materials.iter().any(|m| !m.is_rock()) {
                return Err(MinerError::InvalidConfig(format!(
                    "{:?} may only be placed on rock",
                    rule.ore
                )));
            }
        }
        Ok(())
    }
}

/* ===========================================================
   generator
   =========================================================== */
#[derive(Resource, Clone, Debug)]
pub struct WorldGenerator {
    config: WorldGenConfig,
}

impl WorldGenerator {
    /// rejects configurations that can't produce a complete grid
    pub fn new(config: WorldGenConfig) -> Result<Self, MinerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Terrain {
        let (w, h) = (self.config.width, self.config.height);

        let mut solid = self.noise_fill(rng);
        for _ in 0..self.config.smoothing_iterations {
            solid = smooth(&solid, w, h);
        }
        seal_side_columns(&mut solid, w, h);

        let mut terrain = Terrain::new(w, h);
        seed_variants(&mut terrain, rng);
        self.stratify(&mut terrain, &solid, rng);
        self.seed_ores(&mut terrain, rng);

        let mut ore_counts = [0usize; Ore::ALL.len()];
        for (_, ore) in terrain.ores() {
            ore_counts[ore.index()] += 1;
        }
        info!(
            "generated {w}x{h} world: coal {} iron {} gold {} diamond {}",
            ore_counts[0], ore_counts[1], ore_counts[2], ore_counts[3]
        );
        terrain
    }

    fn noise_fill<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<bool> {
        let p = self.config.fill_probability;
        (0..self.config.width * self.config.height)
            .map(|_| rng.gen_bool(p))
            .collect()
    }

    /// Writes depth materials over the solid cells of `solid`. Open cells
    /// stay air; the sealed side columns stay solid even above the surface.
    pub(crate) fn stratify<R: Rng + ?Sized>(
        &self,
        terrain: &mut Terrain,
        solid: &[bool],
        rng: &mut R,
    ) {
        let (w, h) = (terrain.width(), terrain.height());
        for y in 0..h {
            for x in 0..w {
                if !solid[y * w + x] {
                    continue;
                }
                let side = x == 0 || x == w - 1;
                let material = match self.material_for_row(y, rng) {
                    Some(m) => m,
                    None if side => self.config.tiers[0],
                    None => continue,
                };
                terrain.set_material(IVec2::new(x as i32, y as i32), material);
            }
        }
    }

    /// `None` above the surface
    fn material_for_row<R: Rng + ?Sized>(&self, row: usize, rng: &mut R) -> Option<Material> {
        let cfg = &self.config;
        if row < cfg.surface_row {
            return None;
        }
        if row == cfg.surface_row {
            return Some(Material::Grass);
        }
        if row <= cfg.surface_row + cfg.soil_depth {
            return Some(Material::Dirt);
        }

        let depth = row - (cfg.surface_row + cfg.soil_depth + 1);
        let stride = cfg.band_height + cfg.transition_width;
        let tier = depth / stride;
        let last = cfg.tiers.len() - 1;
        if tier >= last {
            return Some(cfg.tiers[last]);
        }

        let within = depth % stride;
        if within < cfg.band_height {
            return Some(cfg.tiers[tier]);
        }
        let chance = transition_chance(within - cfg.band_height, cfg.transition_width);
        Some(if rng.gen_bool(chance) {
            cfg.tiers[tier + 1]
        } else {
            cfg.tiers[tier]
        })
    }

    pub(crate) fn seed_ores<R: Rng + ?Sized>(&self, terrain: &mut Terrain, rng: &mut R) {
        let h = terrain.height();
        for y in 0..h {
            let depth_factor = y as f64 / h as f64;
            for x in 0..terrain.width() {
                let pos = IVec2::new(x as i32, y as i32);
                let material = terrain.material(pos);
                if !material.is_rock() {
                    continue;
                }
                let mut found = None;
                for rule in &self.config.ores {
                    if rule.eligible(y, material) && rng.gen_bool(rule.chance(depth_factor)) {
                        found = Some(rule.ore);
                    }
                }
                if let Some(ore) = found {
                    terrain.seed_ore(pos, ore);
                }
            }
        }
    }
}

/* ===========================================================
   start‑up
   =========================================================== */
/// rng shared by the start‑up systems; the seed is kept for the log
#[derive(Resource)]
pub struct WorldRng {
    pub seed: u64,
    pub rng: StdRng,
}

impl WorldRng {
    /// fresh random seed when `seed` is `None`
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self { seed, rng: StdRng::seed_from_u64(seed) }
    }
}

/// builds the `Terrain` resource before the first frame
pub fn generate_world_system(
    mut commands: Commands,
    generator: Res<WorldGenerator>,
    mut rng: ResMut<WorldRng>,
) {
    info!("generating world with seed {}", rng.seed);
    let terrain = generator.generate(&mut rng.rng);
    commands.insert_resource(terrain);
}

/* ===========================================================
   helpers
   =========================================================== */

/// chance that row `k` of a transition buffer takes the deeper tier;
/// rises linearly towards the deeper band and never reaches 0 or 1
#[inline]
pub(crate) fn transition_chance(k: usize, width: usize) -> f64 {
    (k + 1) as f64 / (width + 1) as f64
}

/// One automaton step. Reads only `prev`; the outer ring is copied through.
pub(crate) fn smooth(prev: &[bool], w: usize, h: usize) -> Vec<bool> {
    let mut next = prev.to_vec();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut n = 0u8;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if (nx, ny) != (x, y) && prev[ny * w + nx] {
                        n += 1;
                    }
                }
            }
            next[y * w + x] = n >= BIRTH_NEIGHBOURS;
        }
    }
    next
}

fn seal_side_columns(solid: &mut [bool], w: usize, h: usize) {
    for y in 0..h {
        solid[y * w] = true;
        solid[y * w + w - 1] = true;
    }
}

fn seed_variants<R: Rng + ?Sized>(terrain: &mut Terrain, rng: &mut R) {
    for y in 0..terrain.height() {
        for x in 0..terrain.width() {
            terrain.set_variant(IVec2::new(x as i32, y as i32), rng.gen_range(0..4));
        }
    }
}
