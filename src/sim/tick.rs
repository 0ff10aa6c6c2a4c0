//! Simulation tick
//!
//! One tick: ease the wind, integrate every projectile, resolve collisions,
//! then finish the turn once nothing is left in flight and let an AI tank act.
//! Delayed scatter shells run on the wall clock via `advance_clock`.

use super::ai;
use super::collision::{CollisionOutcome, detect_collision};
use super::combat;
use super::physics::step_projectile;
use super::state::{GamePhase, SimulationState};
use super::turn;
use crate::consts::*;

/// Convert a wall-clock frame duration into the tick `dt` multiplier
pub fn frame_dt(frame_ms: f32) -> f32 {
    (frame_ms / FRAME_MS).clamp(0.0, MAX_DT)
}

/// Advance the simulation by one tick of `dt` (clamped to `[0, MAX_DT]`).
///
/// Does nothing while paused or after the round is over.
pub fn tick(state: &mut SimulationState, dt: f32) {
    if state.paused || state.phase == GamePhase::RoundOver {
        return;
    }
    let dt = dt.clamp(0.0, MAX_DT);
    state.time_ticks += 1;

    state.wind += (state.wind_target - state.wind) * (WIND_EASE * dt).min(1.0);

    let mut queue = std::mem::take(&mut state.projectiles).into_iter();
    let mut survivors = Vec::with_capacity(queue.len());

    for mut projectile in queue.by_ref() {
        step_projectile(&mut projectile, &state.tanks, state.gravity, state.wind, dt);

        match detect_collision(&projectile, &state.terrain, &state.tanks) {
            CollisionOutcome::None => {
                survivors.push(projectile);
                continue;
            }
            CollisionOutcome::OutOfBounds => {
                log::debug!("{} #{} left the field", projectile.weapon.as_str(), projectile.id);
            }
            CollisionOutcome::ScatterBurst => combat::scatter_burst(state, &projectile),
            CollisionOutcome::Ground => combat::resolve_ground_impact(state, &projectile),
            CollisionOutcome::DirectHit(target) => combat::resolve_direct_hit(state, &projectile, target),
        }

        if turn::check_round_over(state) {
            break;
        }
    }
    // Anything unprocessed after the round ended stays frozen in place
    survivors.extend(queue);

    // Fragments spawned this tick start moving next tick
    survivors.append(&mut state.projectiles);
    survivors.sort_by_key(|p| p.id);
    state.projectiles = survivors;

    turn::settle_turn(state);
    ai::take_turn_if_ai(state);
}

/// Advance the wall clock and launch delayed spawns that are due.
///
/// Runs regardless of pause; launched shells wait for ticks like any other
/// projectile.
pub fn advance_clock(state: &mut SimulationState, elapsed_ms: f64) {
    if elapsed_ms > 0.0 {
        state.clock_ms += elapsed_ms;
    }

    let now = state.clock_ms;
    let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
        .into_iter()
        .partition(|spawn| spawn.due_ms <= now);
    state.pending = waiting;

    for spawn in due {
        log::debug!("Delayed shell #{} launched", spawn.projectile.id);
        state.projectiles.push(spawn.projectile);
    }
    state.projectiles.sort_by_key(|p| p.id);
}
