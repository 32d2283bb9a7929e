//! World loading and visuals
//!
//! Floors, ceilings and walls are render-only; collision uses the shared `MazeLayout`.

use std::path::PathBuf;

use bevy::prelude::*;
use shared::{spawn_player, MazeConfig, MazeGrid, MazeLayout};

/// Path of the map file to load at startup
#[derive(Resource)]
pub struct MapSource(pub PathBuf);

/// The parsed grid, kept for building per-cell visuals
#[derive(Resource)]
pub struct LoadedGrid(pub MazeGrid);

/// Root entity for all maze visuals
#[derive(Component)]
pub struct MazeWorldRoot;

/// Loads `map` at startup and builds its visuals.
pub struct MazeWorldPlugin {
    pub map: PathBuf,
}

impl Plugin for MazeWorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MapSource(self.map.clone()));
        // A failed load leaves no layout behind, so the visuals step is a no-op.
        app.add_systems(Startup, (load_maze, spawn_maze_visuals).chain());
    }
}

/// Read and generate the maze. A bad map stops the app before any tick runs.
pub fn load_maze(
    mut commands: Commands,
    source: Res<MapSource>,
    config: Res<MazeConfig>,
    mut app_exit: MessageWriter<AppExit>,
) {
    let (grid, layout) = match MazeLayout::load_from_file(&source.0, &config) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load map {:?}: {}", source.0, e);
            app_exit.write(AppExit::error());
            return;
        }
    };

    info!(
        "Loaded {}x{} map from {:?} ({} walls)",
        grid.width(),
        grid.height(),
        source.0,
        layout.obstacles.len()
    );

    spawn_player(&mut commands, &layout);
    commands.insert_resource(layout);
    commands.insert_resource(LoadedGrid(grid));
}

/// Spawn floor and ceiling tiles for every cell, a box per wall, and lighting.
pub fn spawn_maze_visuals(
    mut commands: Commands,
    grid: Option<Res<LoadedGrid>>,
    layout: Option<Res<MazeLayout>>,
    config: Res<MazeConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let (Some(grid), Some(layout)) = (grid, layout) else {
        return;
    };

    let wall_size = config.wall_size();
    let tile_half = Vec2::new(wall_size.x, wall_size.z) * 0.5;

    let floor_mesh = meshes.add(Plane3d::new(Vec3::Y, tile_half));
    let ceiling_mesh = meshes.add(Plane3d::new(Vec3::NEG_Y, tile_half));
    let wall_mesh = meshes.add(Cuboid::from_size(wall_size));

    let wall_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.8, 0.8),
        perceptual_roughness: 0.9,
        ..default()
    });
    let floor_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 1.0, 1.0),
        perceptual_roughness: 0.95,
        ..default()
    });
    let ceiling_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.7, 0.4),
        perceptual_roughness: 0.95,
        ..default()
    });

    let root = commands
        .spawn((
            MazeWorldRoot,
            Name::new("Maze"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    commands.entity(root).with_children(|parent| {
        for pos in grid.0.floor_positions() {
            parent.spawn((
                Mesh3d(floor_mesh.clone()),
                MeshMaterial3d(floor_mat.clone()),
                Transform::from_translation(pos),
            ));
        }
        for pos in grid.0.ceiling_positions(layout.ceiling_y) {
            parent.spawn((
                Mesh3d(ceiling_mesh.clone()),
                MeshMaterial3d(ceiling_mat.clone()),
                Transform::from_translation(pos),
            ));
        }
        for center in layout.wall_centers() {
            parent.spawn((
                Mesh3d(wall_mesh.clone()),
                MeshMaterial3d(wall_mat.clone()),
                Transform::from_translation(center),
            ));
        }

        // Soft fill from above. No shadows: the ceiling would block everything.
        parent.spawn((
            DirectionalLight {
                illuminance: 2000.0,
                shadows_enabled: false,
                color: Color::srgb(1.0, 1.0, 0.87),
                ..default()
            },
            Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.2, 0.4, 0.0)),
        ));
    });

    // Warm sky / dark ground ambient, approximated by a single tint.
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 0.8),
        brightness: 400.0,
        affects_lightmapped_meshes: true,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.03, 0.03, 0.12)));

    info!(
        "Spawned maze visuals: {} tiles, {} walls",
        grid.0.width() * grid.0.height(),
        layout.obstacles.len()
    );
}
