//! block grid: materials, cosmetic variants & the ore overlay
//!
//! Row 0 is the top of the world and y grows downwards, in block units.
//! Entity positions use the same orientation in world units
//! (`TILE_SIZE` units per block).
use bevy::prelude::*;
use serde::Deserialize;

use crate::constants::TILE_SIZE;

/// helper conversions (row‑0 = top)
#[inline]
pub fn world_to_block(p: Vec2) -> IVec2 {
    (p / TILE_SIZE).floor().as_ivec2()
}
#[inline]
pub fn block_to_world(b: IVec2) -> Vec2 {
    b.as_vec2() * TILE_SIZE
}

/// -------- materials --------
/// ordered by hardness tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Air,
    Grass,
    Dirt,
    Stone,
    Granite,
    Obsidian,
}

impl Material {
    pub const ALL: [Material; 6] = [
        Material::Air,
        Material::Grass,
        Material::Dirt,
        Material::Stone,
        Material::Granite,
        Material::Obsidian,
    ];

    #[inline]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Material::Air)
    }

    /// the three rock tiers; the only materials that may carry ore
    #[inline]
    pub const fn is_rock(self) -> bool {
        matches!(self, Material::Stone | Material::Granite | Material::Obsidian)
    }

    /// light crosses these at the cheap attenuation cost
    #[inline]
    pub const fn is_translucent(self) -> bool {
        matches!(self, Material::Air | Material::Grass)
    }

    /// damage needed before the block breaks
    pub const fn required_hits(self) -> u32 {
        match self {
            Material::Air => 0,
            Material::Grass => 5,
            Material::Dirt => 10,
            Material::Stone => 20,
            Material::Granite => 35,
            Material::Obsidian => 50,
        }
    }

    pub fn base_rgb(self) -> Vec3 {
        match self {
            Material::Air => Vec3::new(0.20, 0.10, 0.05),
            Material::Grass => Vec3::new(0.13, 0.70, 0.08),
            Material::Dirt => Vec3::new(0.55, 0.27, 0.07),
            Material::Stone => Vec3::new(0.50, 0.50, 0.50),
            Material::Granite => Vec3::new(0.62, 0.42, 0.40),
            Material::Obsidian => Vec3::new(0.20, 0.05, 0.35),
        }
    }
}

/// -------- ores --------
/// rarity tiers, cheapest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ore {
    Coal,
    Iron,
    Gold,
    Diamond,
}

impl Ore {
    pub const ALL: [Ore; 4] = [Ore::Coal, Ore::Iron, Ore::Gold, Ore::Diamond];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// coins paid per unit when sold
    pub const fn value(self) -> u64 {
        match self {
            Ore::Coal => 1,
            Ore::Iron => 3,
            Ore::Gold => 8,
            Ore::Diamond => 20,
        }
    }

    pub fn base_rgb(self) -> Vec3 {
        match self {
            Ore::Coal => Vec3::new(0.08, 0.08, 0.08),
            Ore::Iron => Vec3::new(0.85, 0.60, 0.45),
            Ore::Gold => Vec3::new(1.00, 0.84, 0.10),
            Ore::Diamond => Vec3::new(0.45, 0.95, 1.00),
        }
    }
}

/// -------- cells --------
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub material: Material,
    /// cosmetic tiling seed in 0..=3, never read by the simulation
    pub variant: u8,
}

/// -------- resource --------
/// Dense row‑major grid (`y * width + x`). Coordinates outside the extent
/// read as air with no ore, and writes to them are ignored.
#[derive(Resource, Clone, Debug)]
pub struct Terrain {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    ores: Vec<Option<Ore>>,
}

impl Terrain {
    /// all‑air grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            ores: vec![None; width * height],
        }
    }

    /// grid whose materials come from `f`, variants zero, no ore
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(IVec2) -> Material) -> Self {
        let mut terrain = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let pos = IVec2::new(x as i32, y as i32);
                terrain.set_material(pos, f(pos));
            }
        }
        terrain
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_range(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn idx(&self, pos: IVec2) -> Option<usize> {
        self.in_range(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    #[inline]
    pub fn cell(&self, pos: IVec2) -> Cell {
        self.idx(pos).map_or_else(Cell::default, |i| self.cells[i])
    }
    #[inline]
    pub fn material(&self, pos: IVec2) -> Material {
        self.cell(pos).material
    }
    #[inline]
    pub fn variant(&self, pos: IVec2) -> u8 {
        self.cell(pos).variant
    }
    #[inline]
    pub fn ore(&self, pos: IVec2) -> Option<Ore> {
        self.idx(pos).and_then(|i| self.ores[i])
    }

    /// generation‑time write; drops ore the new material can't carry
    pub(crate) fn set_material(&mut self, pos: IVec2, material: Material) {
        if let Some(i) = self.idx(pos) {
            self.cells[i].material = material;
            if !material.is_rock() {
                self.ores[i] = None;
            }
        }
    }

    pub(crate) fn set_variant(&mut self, pos: IVec2, variant: u8) {
        if let Some(i) = self.idx(pos) {
            self.cells[i].variant = variant & 0b11;
        }
    }

    /// Places `ore` on a rock cell. Returns false (and stores nothing) for
    /// any other material or an out‑of‑range coordinate.
    pub fn seed_ore(&mut self, pos: IVec2, ore: Ore) -> bool {
        match self.idx(pos) {
            Some(i) if self.cells[i].material.is_rock() => {
                self.ores[i] = Some(ore);
                true
            }
            _ => false,
        }
    }

    /// Turns the cell into air and hands back whatever ore it held.
    pub fn destroy(&mut self, pos: IVec2) -> Option<Ore> {
        let i = self.idx(pos)?;
        self.cells[i].material = Material::Air;
        self.ores[i].take()
    }

    /// every in‑range cell carrying ore
    pub fn ores(&self) -> impl Iterator<Item = (IVec2, Ore)> + '_ {
        self.ores.iter().enumerate().filter_map(move |(i, ore)| {
            ore.map(|o| (IVec2::new((i % self.width) as i32, (i / self.width) as i32), o))
        })
    }
}
