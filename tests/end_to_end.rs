use bevy::prelude::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mineshaft::collision::{bounding_box_collides, move_with_collision};
use mineshaft::components::{Body, Player, Velocity};
use mineshaft::economy::{Inventory, TriggerRegion};
use mineshaft::input::{Action, ActionInput, RawButton};
use mineshaft::mining::{MineOutcome, MiningEngine};
use mineshaft::player::{drive_mining, step_player, PlayerConfig, SpawnPoint};
use mineshaft::terrain::{Material, Ore, Terrain};
use mineshaft::visibility::{LightConfig, LightField};
use mineshaft::world_gen::{WorldGenConfig, WorldGenerator};

#[test]
fn walking_into_a_wall_stops_flush() {
    let t = Terrain::from_fn(20, 20, |p| if p.x == 10 { Material::Stone } else { Material::Air });
    let mut pos = Vec2::new(0.0, 40.0);
    for _ in 0..40 {
        pos = move_with_collision(&t, pos, Vec2::new(3.0, 0.0));
        assert!(pos.x <= 72.0);
        assert!(!bounding_box_collides(&t, pos));
    }
    assert_eq!(pos, Vec2::new(72.0, 40.0));
}

#[test]
fn dig_down_collect_and_sell() {
    // stone floor on the bottom row with coal right under the player
    let mut t = Terrain::from_fn(10, 6, |p| if p.y == 5 { Material::Stone } else { Material::Air });
    assert!(t.seed_ore(IVec2::new(5, 5), Ore::Coal));

    let cfg = PlayerConfig::default();
    let mut input = ActionInput::default();
    let mut engine = MiningEngine::new(1);
    let mut inventory = Inventory::default();
    let mut body = Body { pos: Vec2::new(40.0, 32.0) };
    let mut vel = Velocity::default();
    let mut player = Player::default();

    let mut destroyed_at = None;
    for frame in 1..=40 {
        input.update(|a| RawButton {
            just_pressed: frame == 1 && a == Action::Down,
            down: a == Action::Down,
        });
        step_player(&mut body, &mut vel, &mut player, &input, &t, &cfg);
        let outcome = drive_mining(&mut engine, &mut t, body.pos, &input, 4.0, &mut inventory);
        if let Some(MineOutcome::Destroyed { material, ore }) = outcome {
            assert_eq!(material, Material::Stone);
            assert_eq!(ore, Some(Ore::Coal));
            destroyed_at = Some(frame);
            break;
        }
    }
    // held from frame 5, twenty hits for stone
    assert_eq!(destroyed_at, Some(24));
    assert_eq!(t.material(IVec2::new(5, 5)), Material::Air);
    assert_eq!(t.ore(IVec2::new(5, 5)), None);
    assert_eq!(inventory.count(Ore::Coal), 1);

    // nothing under the hole: fall until the world clamp
    let idle = ActionInput::default();
    for _ in 0..10 {
        step_player(&mut body, &mut vel, &mut player, &idle, &t, &cfg);
    }
    assert_eq!(body.pos, Vec2::new(40.0, 40.0));

    let shop = TriggerRegion { name: "shop", min: Vec2::new(32.0, 32.0), max: Vec2::new(48.0, 40.0) };
    assert!(shop.contains(body.pos));
    assert_eq!(inventory.sell_all(), Ore::Coal.value());
    assert!(inventory.is_empty());
}

#[test]
fn generated_world_is_playable() {
    let world = WorldGenConfig::default();
    let gen = WorldGenerator::new(world.clone()).unwrap();
    let t = gen.generate(&mut StdRng::seed_from_u64(42));
    assert_eq!((t.width(), t.height()), (world.width, world.height));

    let spawn = SpawnPoint::for_world(&world);
    assert!(!bounding_box_collides(&t, spawn.0));

    let mut light = LightField::new(&LightConfig::default());
    let cell = IVec2::new(world.width as i32 / 2, world.surface_row as i32 - 1);
    light.recompute(&t, cell, 9);
    assert_eq!(light.level(cell), 9);

    // every ore sits in rock
    for (pos, _) in t.ores() {
        assert!(t.material(pos).is_rock(), "ore at {pos} in {:?}", t.material(pos));
    }
}
