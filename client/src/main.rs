//! Maze Client - Renders the maze and feeds keyboard/mouse input to the shared simulation
//!
//! Usage: `mazewalk [MAP_PATH]` (defaults to `assets/maps/level1.txt`)

mod camera;
mod input;
mod states;
mod world;

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::window::WindowResolution;
use shared::{MazeConfig, MazeSimPlugin, MazeSimSet};
use states::GameState;

/// Tunables file, relative to the asset directory.
const CONFIG_FILE: &str = "maze.ron";

/// Map used when none is given on the command line, relative to the asset directory.
const DEFAULT_MAP: &str = "maps/level1.txt";

/// Get the asset path - for bundled macOS apps, use path relative to executable
fn get_asset_path() -> String {
    // Try to find assets relative to executable (for .app bundles)
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                return bundled_assets.to_string_lossy().to_string();
            }
        }
    }
    // `cargo run` from anywhere in the workspace: the crate's own assets folder
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let crate_assets = Path::new(&manifest_dir).join("assets");
        if crate_assets.exists() {
            return crate_assets.to_string_lossy().to_string();
        }
    }
    // Fall back to default "assets" folder (for development)
    "assets".to_string()
}

fn main() -> AppExit {
    let asset_path = get_asset_path();

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Maze".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path.clone(),
                ..default()
            }),
    );
    info!("Using assets at: {}", asset_path);

    // Tunables are needed before the simulation plugin picks its schedule.
    let config = match MazeConfig::load_from_file(Path::new(&asset_path).join(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load tunables: {}", e);
            return AppExit::error();
        }
    };

    let map_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&asset_path).join(DEFAULT_MAP));

    app.add_plugins(MazeSimPlugin { config });
    app.add_plugins(world::MazeWorldPlugin { map: map_path });
    app.init_state::<GameState>();

    app.add_systems(Startup, camera::spawn_camera.after(world::spawn_maze_visuals));

    // Input is sampled before the resolver so each tick sees this frame's intent.
    app.add_systems(
        Update,
        (
            states::grab_cursor.run_if(in_state(GameState::Paused)),
            states::release_cursor_on_escape.run_if(in_state(GameState::Playing)),
            input::handle_keyboard_input,
            input::handle_mouse_input.run_if(in_state(GameState::Playing)),
        )
            .chain()
            .before(MazeSimSet),
    );

    app.add_systems(
        Update,
        (camera::update_camera, states::report_halt).after(MazeSimSet),
    );

    app.run()
}
