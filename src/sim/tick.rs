//! Fixed timestep simulation tick
//!
//! Advances the round deterministically: clock first, then the sensor
//! samples gathered since the previous tick, then launches.

use glam::Vec3;

use super::aim::solve_launch;
use super::state::GameState;
use super::trigger::{BodyId, CollisionSample};
use crate::consts::*;

/// Seconds between shots when idle mode plays by itself
pub const IDLE_SHOT_INTERVAL_SECS: f64 = 1.5;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Launch a ball along this world-space direction (click/tap)
    pub launch: Option<Vec3>,
    /// Sensor callbacks received since the last tick, in arrival order
    pub samples: Vec<CollisionSample>,
    /// Bodies the host removed on its own since the last tick
    pub removed: Vec<BodyId>,
    /// Start a new round before advancing
    pub restart: bool,
    /// Idle/demo mode - shoots at the hoop on its own
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        state.new_round();
    }

    state.time_ticks += 1;
    state.elapsed_secs += dt as f64;
    state.launch_cooldown = (state.launch_cooldown - dt).max(0.0);
    state.advance_clock(state.elapsed_secs);

    for sample in &input.samples {
        state.observe(sample);
    }
    for &body in &input.removed {
        state.remove_ball(body);
    }

    if state.is_over() {
        return;
    }

    let aim = input.launch.or_else(|| {
        if input.idle_mode {
            idle_aim(state)
        } else {
            None
        }
    });
    if let Some(aim) = aim {
        state.launch(aim);
    }
}

/// Next auto-play shot, if one is due
fn idle_aim(state: &GameState) -> Option<Vec3> {
    let due = state
        .last_launch_secs
        .is_none_or(|last| state.elapsed_secs - last >= IDLE_SHOT_INTERVAL_SECS);
    if !due || state.launch_cooldown > 0.0 {
        return None;
    }
    let aim = solve_launch(
        state.launch_origin,
        state.hoop_target,
        state.rules.launch_speed,
        GRAVITY,
    );
    if aim.is_none() {
        log::warn!("Idle mode: hoop out of range at speed {}", state.rules.launch_speed);
    }
    aim
}
