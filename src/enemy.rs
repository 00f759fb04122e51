//! patrolling critters & contact game‑over
use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::{
    camera::Scroll,
    collision::{is_solid, move_with_collision},
    components::*,
    config::GameConfig,
    constants::{CONTACT_RADIUS, SCREEN_H, SCREEN_W, TILE_SIZE},
    mining::MiningEngine,
    player::SpawnPoint,
    terrain::{block_to_world, Terrain},
    world_gen::WorldRng,
};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub count: usize,
    /// horizontal patrol speed per tick
    pub speed: f32,
    /// spawn attempts per enemy before giving up on it
    pub spawn_attempts: usize,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self { count: 12, speed: 1.0, spawn_attempts: 64 }
    }
}

/// open block with solid ground directly below
fn is_perch(terrain: &Terrain, cell: IVec2) -> bool {
    terrain.in_range(cell) && !is_solid(terrain, cell) && is_solid(terrain, cell + IVec2::Y)
}

/// one tick of patrol: gravity, walk, turn round when a wall stops us
pub fn step_enemy(
    body: &mut Body,
    vel: &mut Velocity,
    enemy: &mut Enemy,
    terrain: &Terrain,
    speed: f32,
    gravity: f32,
    max_fall: f32,
) {
    vel.0.y = (vel.0.y + gravity).min(max_fall);
    vel.0.x = enemy.heading * speed;

    let before = body.pos;
    body.pos = move_with_collision(terrain, body.pos, vel.0);
    if vel.0.x != 0.0 && body.pos.x == before.x {
        enemy.heading = -enemy.heading;
    }
}

#[inline]
pub fn touches(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < CONTACT_RADIUS && (a.y - b.y).abs() < CONTACT_RADIUS
}

/* ---------- start‑up: drop critters into caves ---------- */
pub fn spawn_enemies(
    mut commands: Commands,
    terrain: Res<Terrain>,
    config: Res<GameConfig>,
    mut rng: ResMut<WorldRng>,
) {
    let cfg = &config.enemies;
    let below = config.world.surface_row as i32 + 1;
    if below >= terrain.height() as i32 {
        return;
    }

    let mut spawned = 0;
    for _ in 0..cfg.count {
        let found = (0..cfg.spawn_attempts).find_map(|_| {
            let cell = IVec2::new(
                rng.rng.gen_range(0..terrain.width() as i32),
                rng.rng.gen_range(below..terrain.height() as i32),
            );
            is_perch(&terrain, cell).then_some(cell)
        });
        let Some(cell) = found else { continue };

        let heading = if rng.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        commands.spawn((
            Sprite {
                color: Color::srgb(0.85, 0.15, 0.20),
                custom_size: Some(Vec2::splat(TILE_SIZE)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 9.0),
            Body { pos: block_to_world(cell) },
            Velocity::default(),
            Enemy { heading },
        ));
        spawned += 1;
    }
    info!("spawned {spawned} of {} enemies", cfg.count);
}

/* ---------- only enemies near the screen move ---------- */
pub fn update_active_tag_system(
    mut commands: Commands,
    scroll: Res<Scroll>,
    q: Query<(Entity, &Body, Option<&Active>), With<Enemy>>,
) {
    let margin = Vec2::splat(TILE_SIZE * 2.0);
    let min = scroll.offset - margin;
    let max = scroll.offset + Vec2::new(SCREEN_W, SCREEN_H) + margin;

    for (e, body, active) in &q {
        let inside = body.pos.cmpge(min).all() && body.pos.cmple(max).all();
        match (inside, active.is_some()) {
            (true, false) => {
                commands.entity(e).insert(Active);
            }
            (false, true) => {
                commands.entity(e).remove::<Active>();
            }
            _ => {}
        }
    }
}

pub fn enemy_patrol_system(
    mut q: Query<(&mut Body, &mut Velocity, &mut Enemy), With<Active>>,
    terrain: Res<Terrain>,
    config: Res<GameConfig>,
) {
    let p = &config.player;
    for (mut body, mut vel, mut enemy) in &mut q {
        step_enemy(
            &mut body,
            &mut vel,
            &mut enemy,
            &terrain,
            config.enemies.speed,
            p.gravity,
            p.max_fall_speed,
        );
    }
}

/* ---------- touching a critter ends the run ---------- */
pub fn enemy_contact_system(
    mut commands: Commands,
    mut player_q: Query<(&mut Body, &mut Velocity), (With<Player>, Without<Enemy>)>,
    enemies: Query<(Entity, &Body), With<Enemy>>,
    spawn: Res<SpawnPoint>,
    mut scroll: ResMut<Scroll>,
    mut mining: ResMut<MiningEngine>,
) {
    let Ok((mut body, mut vel)) = player_q.get_single_mut() else { return };
    if !enemies.iter().any(|(_, e)| touches(body.pos, e.pos)) {
        return;
    }

    warn!("caught at {}, back to the surface", body.pos);
    body.pos = spawn.0;
    vel.0 = Vec2::ZERO;
    *scroll = Scroll::default();
    mining.reset();
    for (e, _) in &enemies {
        commands.entity(e).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Material;

    #[test]
    fn patrol_turns_at_walls() {
        // corridor on row 1 between walls at x=0 and x=4
        let t = Terrain::from_fn(5, 3, |p| {
            if p.y != 1 || p.x == 0 || p.x == 4 { Material::Stone } else { Material::Air }
        });
        let mut body = Body { pos: Vec2::new(22.0, 8.0) };
        let mut vel = Velocity::default();
        let mut enemy = Enemy { heading: 1.0 };

        for _ in 0..2 {
            step_enemy(&mut body, &mut vel, &mut enemy, &t, 1.0, 1.0, 3.0);
        }
        assert_eq!(body.pos, Vec2::new(24.0, 8.0));
        assert_eq!(enemy.heading, 1.0);

        step_enemy(&mut body, &mut vel, &mut enemy, &t, 1.0, 1.0, 3.0);
        assert_eq!(body.pos.x, 24.0);
        assert_eq!(enemy.heading, -1.0);

        step_enemy(&mut body, &mut vel, &mut enemy, &t, 1.0, 1.0, 3.0);
        assert_eq!(body.pos.x, 23.0);
    }

    #[test]
    fn perch_needs_ground_below() {
        let t = Terrain::from_fn(3, 3, |p| if p.y == 2 { Material::Dirt } else { Material::Air });
        assert!(is_perch(&t, IVec2::new(1, 1)));
        assert!(!is_perch(&t, IVec2::new(1, 0)));
        assert!(!is_perch(&t, IVec2::new(1, 2)));
        assert!(!is_perch(&t, IVec2::new(1, -1)));
    }

    #[test]
    fn contact_is_a_small_box() {
        assert!(touches(Vec2::new(10.0, 10.0), Vec2::new(15.9, 4.1)));
        assert!(!touches(Vec2::new(10.0, 10.0), Vec2::new(16.0, 10.0)));
    }
}
