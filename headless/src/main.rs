//! Headless maze runner - no window, no GPU
//!
//! Loads a map, drives the shared simulation with a scripted input sequence and
//! logs the player's trajectory. Ticks advance by the logical `tick_dt` as fast
//! as the loop can spin; wall-clock time plays no part.
//!
//! Usage: `headless [MAP_PATH] [TICKS]`. Set `MAZE_CONFIG` to a RON file to override tunables.

mod script;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use shared::{
    spawn_player, MazeConfig, MazeLayout, MazeSimPlugin, MazeSimSet, Player, PlayerState,
    SimulationStatus, TickCadence, TickCount,
};

const DEFAULT_MAP: &str = "client/assets/maps/level1.txt";
const DEFAULT_TICKS: u64 = 500;

/// Log the player position every this many ticks.
const PROGRESS_EVERY: u64 = 50;

/// Stop after this many ticks.
#[derive(Resource)]
struct RunLimit(u64);

fn main() -> AppExit {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)));
    app.add_plugins(bevy::log::LogPlugin::default());

    let args: Vec<String> = std::env::args().collect();
    let map_path = args.get(1).cloned().unwrap_or_else(|| DEFAULT_MAP.to_string());
    let ticks = match args.get(2).map(|s| s.parse::<u64>()).transpose() {
        Ok(ticks) => ticks.unwrap_or(DEFAULT_TICKS),
        Err(e) => {
            error!("Invalid tick count {:?}: {}", args[2], e);
            return AppExit::error();
        }
    };

    let mut config = match std::env::var("MAZE_CONFIG") {
        Ok(path) => match MazeConfig::load_required(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load tunables: {}", e);
                return AppExit::error();
            }
        },
        Err(_) => MazeConfig::default(),
    };
    if config.cadence != TickCadence::PerFrame {
        info!("Headless runs one tick per loop; ignoring cadence {:?}", config.cadence);
        config.cadence = TickCadence::PerFrame;
    }

    // Generation errors are reported before the first tick.
    let (grid, layout) = match MazeLayout::load_from_file(&map_path, &config) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load map {}: {}", map_path, e);
            return AppExit::error();
        }
    };
    info!(
        "Loaded {}x{} map {} ({} walls), running {} ticks of {}s",
        grid.width(),
        grid.height(),
        map_path,
        layout.obstacles.len(),
        ticks,
        config.tick_dt
    );

    app.add_plugins(MazeSimPlugin { config });
    {
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, &layout);
    }
    app.world_mut().flush();
    app.insert_resource(layout);
    app.insert_resource(RunLimit(ticks));

    app.add_systems(Update, script::apply_script.before(MazeSimSet));
    app.add_systems(
        Update,
        (report_progress, stop_when_done).chain().after(MazeSimSet),
    );

    app.run()
}

fn report_progress(ticks: Res<TickCount>, players: Query<&PlayerState, With<Player>>) {
    if !ticks.is_changed() || ticks.0 % PROGRESS_EVERY != 0 {
        return;
    }
    for state in players.iter() {
        info!(
            "tick {:>5}: pos ({:.3}, {:.3}, {:.3}) vy {:.3} {:?}",
            ticks.0,
            state.position.x,
            state.position.y,
            state.position.z,
            state.vertical_velocity,
            state.vertical_state()
        );
    }
}

fn stop_when_done(
    ticks: Res<TickCount>,
    limit: Res<RunLimit>,
    status: Res<SimulationStatus>,
    players: Query<&PlayerState, With<Player>>,
    mut app_exit: MessageWriter<AppExit>,
) {
    if let SimulationStatus::Halted(reason) = &*status {
        error!("Stopping after {} ticks: {}", ticks.0, reason);
        app_exit.write(AppExit::error());
        return;
    }

    if ticks.0 < limit.0 {
        return;
    }

    for state in players.iter() {
        info!("Finished {} ticks at {:?}", ticks.0, state.position);
    }
    app_exit.write(AppExit::Success);
}
