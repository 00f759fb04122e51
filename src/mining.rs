//! progressive block mining & target selection
use bevy::prelude::*;
use serde::Deserialize;

use crate::collision::is_solid;
use crate::constants::{BOX_EXTENT, TILE_SIZE};
use crate::economy::OreSink;
use crate::input::Action;
use crate::terrain::{block_to_world, world_to_block, Material, Ore, Terrain};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// damage dealt by one tick of held mining
    pub damage_per_action: u32,
    /// max per‑axis gap between an entity corner and a block corner
    pub proximity: f32,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self { damage_per_action: 1, proximity: 4.0 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MiningState {
    #[default]
    Idle,
    Targeting {
        target: IVec2,
        progress: u32,
        required: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MineOutcome {
    Damaged { progress: u32, required: u32 },
    Destroyed { material: Material, ore: Option<Ore> },
    /// nothing to mine there any more; the engine went idle
    NotSolid,
}

/// Damage tracker for the one block currently being mined. Progress never
/// carries over between targets, and the engine never times out: callers
/// `reset` on every tick without a mining action.
#[derive(Resource, Clone, Debug)]
pub struct MiningEngine {
    state: MiningState,
    damage_per_action: u32,
}

impl MiningEngine {
    pub fn new(damage_per_action: u32) -> Self {
        Self {
            state: MiningState::Idle,
            damage_per_action: damage_per_action.max(1),
        }
    }

    #[inline]
    pub fn state(&self) -> MiningState {
        self.state
    }

    pub fn target(&self) -> Option<IVec2> {
        match self.state {
            MiningState::Targeting { target, .. } => Some(target),
            MiningState::Idle => None,
        }
    }

    pub fn progress(&self) -> u32 {
        match self.state {
            MiningState::Targeting { progress, .. } => progress,
            MiningState::Idle => 0,
        }
    }

    /// One mining action against `target`. Breaking the block empties it
    /// into `sink` and returns the engine to idle.
    pub fn mine(
        &mut self,
        terrain: &mut Terrain,
        target: IVec2,
        sink: &mut impl OreSink,
    ) -> MineOutcome {
        let material = terrain.material(target);
        if !material.is_solid() {
            self.reset();
            return MineOutcome::NotSolid;
        }

        let required = material.required_hits();
        let carried = match self.state {
            MiningState::Targeting { target: current, progress, .. } if current == target => progress,
            _ => 0,
        };
        let progress = carried + self.damage_per_action;

        if progress < required {
            self.state = MiningState::Targeting { target, progress, required };
            return MineOutcome::Damaged { progress, required };
        }

        let ore = terrain.destroy(target);
        if let Some(ore) = ore {
            sink.collect(ore);
        }
        self.state = MiningState::Idle;
        debug!("destroyed {material:?} at {target} (ore: {ore:?})");
        MineOutcome::Destroyed { material, ore }
    }

    pub fn reset(&mut self) {
        self.state = MiningState::Idle;
    }
}

impl Default for MiningEngine {
    fn default() -> Self {
        Self::new(MiningConfig::default().damage_per_action)
    }
}

/* ===========================================================
   target selection
   =========================================================== */
#[inline]
fn corners(p: Vec2) -> [Vec2; 4] {
    [
        p,
        p + Vec2::new(BOX_EXTENT, 0.0),
        p + Vec2::new(0.0, BOX_EXTENT),
        p + Vec2::splat(BOX_EXTENT),
    ]
}

/// corner‑to‑corner test: true when some entity corner lies within
/// `proximity` of some block corner on both axes
pub fn is_close_enough(entity: Vec2, block: IVec2, proximity: f32) -> bool {
    let block_corners = corners(block_to_world(block));
    corners(entity).iter().any(|e| {
        block_corners
            .iter()
            .any(|b| (e.x - b.x).abs() <= proximity && (e.y - b.y).abs() <= proximity)
    })
}

const MARKER_DIRECTIONS: [(Action, IVec2); 4] = [
    (Action::Down, IVec2::new(0, 1)),
    (Action::Jump, IVec2::new(0, -1)),
    (Action::Right, IVec2::new(1, 0)),
    (Action::Left, IVec2::new(-1, 0)),
];

/// Blocks the entity at `pos` could mine, one per direction: the block one
/// tile away from the box centre, kept when solid and close enough.
pub fn marker_blocks(
    terrain: &Terrain,
    pos: Vec2,
    proximity: f32,
) -> impl Iterator<Item = (Action, IVec2)> + '_ {
    let centre = (pos + Vec2::splat(TILE_SIZE / 2.0)).floor();
    MARKER_DIRECTIONS.into_iter().filter_map(move |(action, dir)| {
        let block = world_to_block(centre + dir.as_vec2() * TILE_SIZE);
        (is_solid(terrain, block) && is_close_enough(pos, block, proximity))
            .then_some((action, block))
    })
}
