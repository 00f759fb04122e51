//! player kinematics, mining driver & spawning

use bevy::prelude::*;
use serde::Deserialize;

use crate::camera::Scroll;
use crate::collision::move_with_collision;
use crate::components::*;
use crate::config::GameConfig;
use crate::economy::{Inventory, OreSink};
use crate::input::{Action, ActionInput};
use crate::mining::{marker_blocks, MineOutcome, MiningEngine};
use crate::terrain::Terrain;
use crate::world_gen::WorldGenConfig;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub jump_speed: f32,
    /// horizontal speed kept per tick (truncated toward zero)
    pub friction: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            gravity: 1.0,
            max_fall_speed: 3.0,
            jump_speed: 6.0,
            friction: 0.8,
        }
    }
}

/// where the player starts and respawns
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint(pub Vec2);

impl SpawnPoint {
    /// middle column, resting on the surface row
    pub fn for_world(world: &WorldGenConfig) -> Self {
        let x = (world.width / 2) as f32 * crate::constants::TILE_SIZE;
        let y = world.surface_row.saturating_sub(1) as f32 * crate::constants::TILE_SIZE;
        Self(Vec2::new(x, y))
    }
}

/// largest top‑left corner that keeps the box on the grid
#[inline]
pub fn world_limit(terrain: &Terrain) -> Vec2 {
    Vec2::new(
        terrain.width().saturating_sub(1) as f32,
        terrain.height().saturating_sub(1) as f32,
    ) * crate::constants::TILE_SIZE
}

/* ===========================================================
   kinematics
   =========================================================== */
/// one tick: walk, gravity, jump, collide, friction, clamp
pub fn step_player(
    body: &mut Body,
    vel: &mut Velocity,
    player: &mut Player,
    input: &ActionInput,
    terrain: &Terrain,
    cfg: &PlayerConfig,
) {
    let last_y = body.pos.y;

    if input.down(Action::Left) {
        vel.0.x = -cfg.walk_speed;
        player.facing = -1;
    }
    if input.down(Action::Right) {
        vel.0.x = cfg.walk_speed;
        player.facing = 1;
    }

    vel.0.y = (vel.0.y + cfg.gravity).min(cfg.max_fall_speed);
    if input.just_pressed(Action::Jump) {
        vel.0.y = -cfg.jump_speed;
    }

    body.pos = move_with_collision(terrain, body.pos, vel.0);
    vel.0.x = (vel.0.x * cfg.friction).trunc();
    player.falling = body.pos.y > last_y;

    body.pos = body.pos.clamp(Vec2::ZERO, world_limit(terrain));
}

/// Mines the marker block of the first held action that has one, or resets
/// the engine when no action qualifies this tick.
pub fn drive_mining(
    engine: &mut MiningEngine,
    terrain: &mut Terrain,
    pos: Vec2,
    input: &ActionInput,
    proximity: f32,
    sink: &mut impl OreSink,
) -> Option<MineOutcome> {
    let markers: Vec<_> = marker_blocks(terrain, pos, proximity).collect();
    for action in Action::ALL {
        if !input.held(action) {
            continue;
        }
        let Some(&(_, block)) = markers.iter().find(|(a, _)| *a == action) else {
            continue;
        };
        return Some(engine.mine(terrain, block, sink));
    }
    engine.reset();
    None
}

/* ===========================================================
   systems
   =========================================================== */
pub fn spawn_player(mut commands: Commands, spawn: Res<SpawnPoint>) {
    commands.spawn((
        Sprite {
            color: crate::constants::PLAYER_COLOR,
            custom_size: Some(Vec2::splat(crate::constants::TILE_SIZE)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        Body { pos: spawn.0 },
        Velocity::default(),
        Player::default(),
    ));
}

pub fn player_tick_system(
    mut q: Query<(&mut Body, &mut Velocity, &mut Player)>,
    input: Res<ActionInput>,
    config: Res<GameConfig>,
    mut terrain: ResMut<Terrain>,
    mut mining: ResMut<MiningEngine>,
    mut inventory: ResMut<Inventory>,
    mut scroll: ResMut<Scroll>,
) {
    let Ok((mut body, mut vel, mut ply)) = q.get_single_mut() else { return };

    step_player(&mut body, &mut vel, &mut ply, &input, &terrain, &config.player);

    let world_size = (world_limit(&terrain) + crate::constants::TILE_SIZE).max(Vec2::ZERO);
    scroll.follow(body.pos, world_size);

    drive_mining(
        &mut mining,
        &mut terrain,
        body.pos,
        &input,
        config.mining.proximity,
        &mut *inventory,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawButton;
    use crate::terrain::{Material, Ore};

    fn input_with(held: &[Action], pressed: &[Action], frames: usize) -> ActionInput {
        let mut input = ActionInput::default();
        for f in 0..frames {
            input.update(|a| RawButton {
                just_pressed: f == 0 && pressed.contains(&a),
                down: held.contains(&a) || (f == 0 && pressed.contains(&a)),
            });
        }
        input
    }

    fn floor_world() -> Terrain {
        // open room, floor on row 5
        Terrain::from_fn(10, 6, |p| if p.y == 5 { Material::Dirt } else { Material::Air })
    }

    #[test]
    fn gravity_caps_at_max_fall() {
        let t = Terrain::new(10, 40);
        let input = ActionInput::default();
        let (mut b, mut v, mut p) = (Body { pos: Vec2::new(8.0, 0.0) }, Velocity::default(), Player::default());
        for _ in 0..10 {
            step_player(&mut b, &mut v, &mut p, &input, &t, &PlayerConfig::default());
        }
        assert_eq!(v.0.y, 3.0);
        assert!(p.falling);
        assert_eq!(b.pos.y, 1.0 + 2.0 + 3.0 * 8.0);
    }

    #[test]
    fn walking_sets_facing_and_friction_truncates() {
        let t = floor_world();
        let (mut b, mut v, mut p) = (Body { pos: Vec2::new(40.0, 32.0) }, Velocity::default(), Player::default());
        let left = input_with(&[Action::Left], &[], 1);
        step_player(&mut b, &mut v, &mut p, &left, &t, &PlayerConfig::default());
        assert_eq!(b.pos, Vec2::new(38.0, 32.0));
        assert_eq!(p.facing, -1);
        // -2 * 0.8 = -1.6 → -1
        assert_eq!(v.0.x, -1.0);
        assert!(!p.falling);

        let idle = ActionInput::default();
        step_player(&mut b, &mut v, &mut p, &idle, &t, &PlayerConfig::default());
        assert_eq!(b.pos.x, 37.0);
        assert_eq!(v.0.x, 0.0);
    }

    #[test]
    fn jump_lifts_off_the_floor() {
        let t = floor_world();
        let (mut b, mut v, mut p) = (Body { pos: Vec2::new(40.0, 32.0) }, Velocity::default(), Player::default());
        let jump = input_with(&[], &[Action::Jump], 1);
        step_player(&mut b, &mut v, &mut p, &jump, &t, &PlayerConfig::default());
        assert_eq!(b.pos.y, 26.0);
        assert_eq!(v.0.y, -6.0);
    }

    #[test]
    fn position_is_clamped_to_the_world() {
        let t = Terrain::new(4, 4);
        let (mut b, mut v, mut p) = (Body { pos: Vec2::new(1.0, 23.0) }, Velocity(Vec2::new(-3.0, 0.0)), Player::default());
        step_player(&mut b, &mut v, &mut p, &ActionInput::default(), &t, &PlayerConfig::default());
        assert_eq!(b.pos, Vec2::new(0.0, 24.0));
    }

    #[test]
    fn mining_needs_a_held_direction() {
        let mut t = floor_world();
        t.seed_ore(IVec2::new(5, 5), Ore::Coal); // dirt: refused
        let mut engine = MiningEngine::new(1);
        let mut bag: Vec<Ore> = Vec::new();
        let pos = Vec2::new(40.0, 32.0);

        // pressed but not yet held long enough
        let tapped = input_with(&[Action::Down], &[], 2);
        assert_eq!(drive_mining(&mut engine, &mut t, pos, &tapped, 4.0, &mut bag), None);

        let held = input_with(&[Action::Down], &[], 5);
        for _ in 0..Material::Dirt.required_hits() - 1 {
            assert!(matches!(
                drive_mining(&mut engine, &mut t, pos, &held, 4.0, &mut bag),
                Some(MineOutcome::Damaged { .. })
            ));
        }
        assert!(matches!(
            drive_mining(&mut engine, &mut t, pos, &held, 4.0, &mut bag),
            Some(MineOutcome::Destroyed { material: Material::Dirt, ore: None })
        ));
        assert_eq!(t.material(IVec2::new(5, 5)), Material::Air);
    }

    #[test]
    fn releasing_resets_progress() {
        let mut t = floor_world();
        let mut engine = MiningEngine::new(1);
        let mut bag: Vec<Ore> = Vec::new();
        let pos = Vec2::new(40.0, 32.0);
        let held = input_with(&[Action::Down], &[], 5);
        drive_mining(&mut engine, &mut t, pos, &held, 4.0, &mut bag);
        drive_mining(&mut engine, &mut t, pos, &held, 4.0, &mut bag);
        assert_eq!(engine.progress(), 2);

        drive_mining(&mut engine, &mut t, pos, &ActionInput::default(), 4.0, &mut bag);
        assert_eq!(engine.progress(), 0);
        assert_eq!(engine.target(), None);
    }

    #[test]
    fn spawn_sits_on_the_surface() {
        let cfg = WorldGenConfig::default();
        assert_eq!(SpawnPoint::for_world(&cfg).0, Vec2::new(360.0, 40.0));
    }

    #[test]
    fn spawn_box_is_free_on_generated_worlds() {
        use crate::collision::bounding_box_collides;
        use crate::world_gen::WorldGenerator;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let small = WorldGenConfig { width: 3, height: 3, surface_row: 1, ..default() };
        for cfg in [WorldGenConfig::default(), small] {
            let spawn = SpawnPoint::for_world(&cfg);
            let gen = WorldGenerator::new(cfg).unwrap();
            for seed in 0..8 {
                let t = gen.generate(&mut StdRng::seed_from_u64(seed));
                assert!(!bounding_box_collides(&t, spawn.0), "seed {seed}");
            }
        }
    }
}
