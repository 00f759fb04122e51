//! bootstrap for the mining game
//!
//! Loads the config, validates the generator before any window opens, then
//! hands everything to Bevy. Works with **Bevy 0.15**.

use std::path::PathBuf;

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};
use clap::Parser;

use mineshaft::camera::{camera_follow_system, setup_camera, Scroll};
use mineshaft::config::GameConfig;
use mineshaft::constants::{SCREEN_H, SCREEN_W, SKY_COLOR, TILE_SIZE, WINDOW_SCALE};
use mineshaft::economy::{shop_system, Inventory, Shop, TriggerRegion};
use mineshaft::enemy::{
    enemy_contact_system, enemy_patrol_system, spawn_enemies,
    update_active_tag_system,
};
use mineshaft::error::MinerError;
use mineshaft::input::{input_system, ActionInput};
use mineshaft::mining::MiningEngine;
use mineshaft::player::{player_tick_system, spawn_player, SpawnPoint};
use mineshaft::tile_stream::{
    draw_mining_gizmos_system, spawn_view_slots, sync_body_transforms_system,
    update_view_slots_system, TintNoise,
};
use mineshaft::visibility::{recompute_light_system, LightField};
use mineshaft::world_gen::{generate_world_system, WorldGenerator, WorldRng};

#[derive(Parser, Debug)]
#[command(name = "mineshaft", about = "Dig for ore under a procedurally generated surface")]
struct Args {
    /// TOML file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// world seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

/* ------------------------------------------------------------------------ */
/* F11 borderless‑fullscreen toggle                                         */
/* ------------------------------------------------------------------------ */
fn toggle_fullscreen(
    keys: Res<ButtonInput<KeyCode>>,
    mut window_q: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !keys.just_pressed(KeyCode::F11) {
        return;
    }
    let Ok(mut window) = window_q.get_single_mut() else { return };
    window.mode = match window.mode {
        WindowMode::Windowed => {
            WindowMode::BorderlessFullscreen(MonitorSelection::Primary)
        }
        _ => WindowMode::Windowed,
    };
}

/* ------------------------------------------------------------------------ */
/* Q quits                                                                  */
/* ------------------------------------------------------------------------ */
fn quit_on_q(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::KeyQ) {
        info!("quit requested");
        exit.send(AppExit::Success);
    }
}

/// trading post: a few blocks either side of spawn, above the surface
fn shop_around(spawn: SpawnPoint) -> Shop {
    let reach = Vec2::new(3.0 * TILE_SIZE, 2.0 * TILE_SIZE);
    Shop {
        region: TriggerRegion {
            name: "trading post",
            min: spawn.0 - reach,
            max: spawn.0 + Vec2::new(reach.x, 0.0),
        },
    }
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() -> Result<(), MinerError> {
    let args = Args::parse();
    let config = GameConfig::load(args.config.as_deref())?;
    // a bad world config fails here, before any window opens
    let generator = WorldGenerator::new(config.world.clone())?;
    let rng = WorldRng::new(args.seed);
    let spawn = SpawnPoint::for_world(&config.world);

    let source = args
        .config
        .as_ref()
        .map_or_else(|| "built‑in defaults".to_owned(), |p| p.display().to_string());

    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(SKY_COLOR))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "mineshaft".into(),
                        resolution: (SCREEN_W * WINDOW_SCALE, SCREEN_H * WINDOW_SCALE).into(),
                        mode: WindowMode::Windowed,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )

        /* simulation state ------------------------------------------------ */
        .insert_resource(TintNoise::new(rng.seed as u32))
        .insert_resource(MiningEngine::new(config.mining.damage_per_action))
        .insert_resource(LightField::new(&config.light))
        .insert_resource(ActionInput::new(config.input.clone()))
        .insert_resource(shop_around(spawn))
        .insert_resource(spawn)
        .insert_resource(Inventory::default())
        .insert_resource(Scroll::default())
        .insert_resource(generator)
        .insert_resource(rng)
        .insert_resource(config)

        /* startup systems ------------------------------------------------- */
        .add_systems(Startup, move || info!("config: {source}"))
        .add_systems(Startup, setup_camera)
        .add_systems(Startup, generate_world_system)
        .add_systems(Startup, spawn_player.after(generate_world_system))
        .add_systems(Startup, spawn_enemies.after(generate_world_system))
        .add_systems(Startup, spawn_view_slots)

        /* one tick per frame, in order ------------------------------------ */
        .add_systems(
            Update,
            (
                input_system,             // raw → derived signals
                player_tick_system,       // move, scroll, mine
                update_active_tag_system, // enemies near the screen
                enemy_patrol_system,
                enemy_contact_system,     // game over on touch
                shop_system,              // sell inside the trading post
                recompute_light_system,   // fresh light every frame
            )
                .chain(),
        )
        .add_systems(Update, (toggle_fullscreen, quit_on_q))

        /* post‑update (drawing) ------------------------------------------- */
        .add_systems(
            PostUpdate,
            (
                sync_body_transforms_system,
                camera_follow_system,
                update_view_slots_system,
                draw_mining_gizmos_system,
            )
                .before(TransformSystem::TransformPropagate),
        )
        .run();

    Ok(())
}
