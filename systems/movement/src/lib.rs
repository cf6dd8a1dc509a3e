#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player control system translating the per-frame control state into
//! movement and rotation commands.
//!
//! Every pressed direction is proposed as its own [`Command::MovePlayer`]. When
//! forward and a strafe are held against a wall, the world rejects the blocked
//! direction and still accepts the open one. A single direction whose
//! destination is a wall is rejected whole; it is not split into axes.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use glam::Vec2;
use raycrawl_core::{Command, ControlState, Event, PlayerSnapshot};

/// Radians of rotation per pixel of horizontal mouse movement.
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.002;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    mouse_sensitivity: f32,
}

impl Config {
    /// Creates a configuration using the provided mouse sensitivity.
    #[must_use]
    pub const fn new(mouse_sensitivity: f32) -> Self {
        Self { mouse_sensitivity }
    }

    /// Radians of rotation per pixel of horizontal mouse movement.
    #[must_use]
    pub const fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MOUSE_SENSITIVITY)
    }
}

/// Pure system that converts held controls into player commands.
#[derive(Debug, Default)]
pub struct Movement {
    config: Config,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes world events and the control state to emit player commands.
    ///
    /// Translation is proportional to the simulated time carried by
    /// [`Event::TimeAdvanced`], so a frozen simulation produces no movement.
    pub fn handle(
        &mut self,
        events: &[Event],
        controls: &ControlState,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        if controls.turn != 0.0 && controls.turn.is_finite() {
            out.push(Command::RotatePlayer {
                radians: controls.turn * self.config.mouse_sensitivity,
            });
        }

        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if dt.is_zero() {
            return;
        }

        let heading = player.angle + controls.turn * self.config.mouse_sensitivity;
        let distance = player.speed * dt.as_secs_f32();
        let forward = Vec2::from_angle(heading) * distance;
        let left = Vec2::from_angle(heading - FRAC_PI_2) * distance;

        let proposals = [
            (controls.forward, forward),
            (controls.backward, -forward),
            (controls.strafe_left, left),
            (controls.strafe_right, -left),
        ];
        for (pressed, delta) in proposals {
            if pressed {
                out.push(Command::MovePlayer { delta });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycrawl_core::AbilityRoster;

    fn player(angle: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Vec2::new(96.0, 96.0),
            angle,
            health: 100.0,
            max_health: 100.0,
            speed: 200.0,
            damage: 10.0,
            level: 1,
            experience: 0,
            experience_threshold: 100,
            upgrade_points: 0,
            weapon_ready_in: Duration::ZERO,
            since_last_shot: None,
            invulnerable_for: Duration::ZERO,
            abilities: AbilityRoster::default(),
        }
    }

    fn tick(millis: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    #[test]
    fn forward_follows_the_facing_direction() {
        let mut movement = Movement::default();
        let controls = ControlState {
            forward: true,
            ..ControlState::default()
        };
        let mut out = Vec::new();
        movement.handle(&tick(500), &controls, &player(0.0), &mut out);

        assert_eq!(
            out,
            vec![Command::MovePlayer {
                delta: Vec2::new(100.0, 0.0),
            }]
        );
    }

    #[test]
    fn strafing_is_perpendicular_to_heading() {
        let mut movement = Movement::default();
        let controls = ControlState {
            strafe_left: true,
            strafe_right: true,
            ..ControlState::default()
        };
        let mut out = Vec::new();
        movement.handle(&tick(1_000), &controls, &player(0.0), &mut out);

        let deltas: Vec<Vec2> = out
            .iter()
            .filter_map(|command| match command {
                Command::MovePlayer { delta } => Some(*delta),
                _ => None,
            })
            .collect();
        assert_eq!(deltas.len(), 2);
        assert!(deltas[0].abs_diff_eq(Vec2::new(0.0, -200.0), 1e-3));
        assert!(deltas[1].abs_diff_eq(Vec2::new(0.0, 200.0), 1e-3));
    }

    #[test]
    fn frozen_time_only_rotates() {
        let mut movement = Movement::new(Config::new(0.01));
        let controls = ControlState {
            forward: true,
            turn: 10.0,
            ..ControlState::default()
        };
        let mut out = Vec::new();
        movement.handle(&[], &controls, &player(1.0), &mut out);

        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Command::RotatePlayer { radians } if (radians - 0.1).abs() < 1e-6
        ));
    }
}
