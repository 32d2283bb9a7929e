//! Bevy wiring for the per-tick resolver, shared by the windowed client and the headless runner.

use bevy::prelude::*;

use crate::config::{MazeConfig, TickCadence};
use crate::map::MazeLayout;
use crate::movement::{facing_from_look, MovementIntent};
use crate::physics::{step_player, PlayerState};

/// Marker component for the player entity
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Look direction in radians. Yaw turns around +Y, pitch tilts up/down.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    pub fn facing(&self) -> Vec3 {
        facing_from_look(self.yaw, self.pitch)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Whether the resolver is still ticking.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum SimulationStatus {
    #[default]
    Running,
    /// Numeric state became invalid; ticking has stopped for good.
    Halted(String),
}

impl SimulationStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, SimulationStatus::Running)
    }
}

/// Number of ticks simulated so far.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCount(pub u64);

/// Registers tunables, the intent snapshot and the resolver system.
pub struct MazeSimPlugin {
    pub config: MazeConfig,
}

impl Plugin for MazeSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());
        app.init_resource::<MovementIntent>();
        app.init_resource::<SimulationStatus>();
        app.init_resource::<TickCount>();

        let resolver = simulate_player
            .run_if(resource_exists::<MazeLayout>)
            .run_if(simulation_running);

        match self.config.cadence {
            TickCadence::PerFrame => {
                app.add_systems(Update, resolver.in_set(MazeSimSet));
            }
            TickCadence::FixedRate => {
                app.insert_resource(Time::<Fixed>::from_seconds(self.config.tick_dt as f64));
                app.add_systems(FixedUpdate, resolver.in_set(MazeSimSet));
            }
        }
    }
}

/// System set containing the resolver, for ordering input sampling before it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MazeSimSet;

/// Run condition: the simulation has not halted.
pub fn simulation_running(status: Res<SimulationStatus>) -> bool {
    status.is_running()
}

/// Spawn the player entity at the layout's spawn point.
pub fn spawn_player(commands: &mut Commands, layout: &MazeLayout) -> Entity {
    let spawn = layout.spawn_point();
    info!("Spawning player at {:?}", spawn);
    commands
        .spawn((
            Player,
            PlayerState::spawn_at(spawn),
            LookAngles::default(),
            Name::new("Player"),
        ))
        .id()
}

/// Advance every player by one tick of `tick_dt`.
pub fn simulate_player(
    config: Res<MazeConfig>,
    layout: Res<MazeLayout>,
    mut intent: ResMut<MovementIntent>,
    mut status: ResMut<SimulationStatus>,
    mut ticks: ResMut<TickCount>,
    mut players: Query<(&mut PlayerState, &LookAngles), With<Player>>,
) {
    let snapshot = *intent;
    // The jump trigger is consumed by the tick that sees it.
    intent.jump = false;

    for (mut state, look) in players.iter_mut() {
        match step_player(
            &snapshot,
            look.facing(),
            &state,
            &layout.obstacles,
            &config,
            config.tick_dt,
        ) {
            Ok(outcome) => {
                if let Some(idx) = outcome.blocked_by {
                    trace!("Move blocked by obstacle {} at {:?}", idx, state.position);
                }
                *state = outcome.state;
            }
            Err(e) => {
                error!("Simulation halted at tick {}: {}", ticks.0, e);
                *status = SimulationStatus::Halted(e.to_string());
                return;
            }
        }
    }

    ticks.0 += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(map: &str) -> App {
        let config = MazeConfig::default();
        let layout = MazeLayout::from_text(map, &config).unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(MazeSimPlugin { config });
        {
            let mut commands = app.world_mut().commands();
            spawn_player(&mut commands, &layout);
        }
        app.world_mut().flush();
        app.insert_resource(layout);
        app
    }

    fn player_state(app: &mut App) -> PlayerState {
        let mut query = app.world_mut().query_filtered::<&PlayerState, With<Player>>();
        *query.single(app.world()).unwrap()
    }

    #[test]
    fn test_one_tick_per_update() {
        let mut app = test_app("###\n#S#\n#.#\n#.#\n###");
        app.update();
        app.update();
        app.update();

        assert_eq!(app.world().resource::<TickCount>().0, 3);
        let state = player_state(&mut app);
        assert!(state.grounded);
        assert_eq!(state.position.y, 1.8);
    }

    #[test]
    fn test_jump_trigger_is_consumed() {
        let mut app = test_app("S");
        app.update();
        assert!(player_state(&mut app).grounded);

        app.world_mut().resource_mut::<MovementIntent>().jump = true;
        app.update();
        assert!(!player_state(&mut app).grounded);
        assert!(!app.world().resource::<MovementIntent>().jump);
    }

    #[test]
    fn test_invalid_state_halts_simulation() {
        let mut app = test_app("S");
        app.update();

        let mut query = app.world_mut().query_filtered::<&mut PlayerState, With<Player>>();
        query.single_mut(app.world_mut()).unwrap().vertical_velocity = f32::NAN;

        app.update();
        assert!(!app.world().resource::<SimulationStatus>().is_running());
        let ticks = app.world().resource::<TickCount>().0;

        app.update();
        assert_eq!(app.world().resource::<TickCount>().0, ticks);
    }

    #[test]
    fn test_look_angles_facing() {
        let look = LookAngles::default();
        assert!((look.facing() - Vec3::NEG_Z).length() < 1e-6);

        let quarter = LookAngles {
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
        };
        // Turning left by 90 degrees faces -X.
        assert!((quarter.facing() - Vec3::NEG_X).length() < 1e-6);
    }
}
