//! Game state machine and cursor handling

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use shared::SimulationStatus;

/// Main game states
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Cursor free, input ignored. Click to play.
    #[default]
    Paused,
    Playing,
}

fn set_cursor_grab(
    windows: &Query<Entity, With<PrimaryWindow>>,
    cursor_opts: &mut Query<&mut CursorOptions>,
    grab: bool,
) {
    let Ok(window_entity) = windows.single() else {
        return;
    };
    if let Ok(mut cursor) = cursor_opts.get_mut(window_entity) {
        cursor.grab_mode = if grab {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
        cursor.visible = !grab;
    }
}

/// Grab cursor for FPS controls on click
pub fn grab_cursor(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    status: Res<SimulationStatus>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || !status.is_running() {
        return;
    }
    set_cursor_grab(&windows, &mut cursor_opts, true);
    next_state.set(GameState::Playing);
}

/// Release the cursor and pause input on Escape
pub fn release_cursor_on_escape(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    set_cursor_grab(&windows, &mut cursor_opts, false);
    next_state.set(GameState::Paused);
}

/// Log once and free the cursor if the simulation stopped on bad state
pub fn report_halt(
    status: Res<SimulationStatus>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
    mut next_state: ResMut<NextState<GameState>>,
    mut reported: Local<bool>,
) {
    let SimulationStatus::Halted(reason) = &*status else {
        return;
    };
    if *reported {
        return;
    }
    *reported = true;

    warn!("Simulation stopped ({}); movement is frozen", reason);
    set_cursor_grab(&windows, &mut cursor_opts, false);
    next_state.set(GameState::Paused);
}
