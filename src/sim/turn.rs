//! Turn and round state machine
//!
//! AwaitingInput --fire--> Resolving --all projectiles gone--> AwaitingInput
//! (next living tank) ... until one tank remains: RoundOver.

use rand::Rng;

use super::physics::launch_velocity;
use super::state::{GameEvent, GamePhase, Projectile, SimulationState};
use super::terrain::Terrain;
use super::weapon::WeaponKind;
use crate::consts::*;

/// Start a fresh round on the current landscape.
///
/// Scores and control modes survive; max health/fuel grow with the score
/// bonus and are refilled. Tank 0 moves first.
pub fn reset_round(state: &mut SimulationState) {
    let width = state.terrain.width;
    let height = state.terrain.height;
    state.terrain = Terrain::generate(width, height, state.landscape, &mut state.rng);
    state.gravity = state.landscape.gravity();

    for (i, tank) in state.tanks.iter_mut().enumerate() {
        let slot = TANK_SLOTS[i % TANK_SLOTS.len()];
        tank.pos.x = (width as f32 * slot).round();
        tank.angle = if i % 2 == 0 { 45.0 } else { 135.0 };
        tank.power = DEFAULT_POWER;
        tank.apply_round_bonus();
        if !tank.weapon.is_unlocked(tank.score) {
            tank.weapon = WeaponKind::Shell;
        }
    }
    state.settle_tanks();

    state.projectiles.clear();
    state.pending.clear();
    state.current = 0;
    state.phase = GamePhase::AwaitingInput;
    state.winner = None;
    state.roll_wind();
    state.wind = state.wind_target;
    state.round += 1;

    log::info!(
        "Round {} on {}: {} tanks, gravity {:.2}, wind {:.3}",
        state.round,
        state.landscape.as_str(),
        state.tanks.len(),
        state.gravity,
        state.wind
    );
    state.push_event(GameEvent::TurnChanged { tank: 0 });
}

/// Fire the current tank's selected weapon.
///
/// Rejected (returns false, nothing changes) unless the round is waiting for
/// input, the tank is alive and it has the fuel.
pub fn fire_current(state: &mut SimulationState) -> bool {
    if state.phase != GamePhase::AwaitingInput {
        return false;
    }
    let index = state.current;
    let Some(tank) = state.tanks.get_mut(index) else {
        return false;
    };
    if !tank.alive || !tank.consume_fuel(FIRE_FUEL_COST) {
        return false;
    }

    let weapon = if tank.weapon.is_unlocked(tank.score) {
        tank.weapon
    } else {
        WeaponKind::Shell
    };
    let origin = tank.pos;
    let vel = launch_velocity(tank.angle, tank.power, weapon);
    let (angle, power) = (tank.angle, tank.power);

    let id = state.next_entity_id();
    let mut projectile = Projectile::new(id, origin, vel, index, weapon);
    if weapon == WeaponKind::Scatter {
        projectile.fuse = Some(SCATTER_FUSE_TICKS + state.rng.random_range(0.0..SCATTER_FUSE_JITTER));
    }
    state.projectiles.push(projectile);
    state.phase = GamePhase::Resolving;

    log::debug!(
        "Tank {} fired {} (angle {:.1}, power {:.1})",
        index,
        weapon.as_str(),
        angle,
        power
    );
    state.push_event(GameEvent::ShotFired { tank: index, weapon });
    true
}

/// Flag the round over if at most one tank is alive. Returns true if over.
pub fn check_round_over(state: &mut SimulationState) -> bool {
    if state.phase == GamePhase::RoundOver {
        return true;
    }
    if state.alive_count() > 1 {
        return false;
    }

    let winner = state.tanks.iter().position(|t| t.alive);
    state.phase = GamePhase::RoundOver;
    state.winner = winner;
    log::info!("Round {} over, winner {:?}, scores {:?}", state.round, winner, state.scores());
    let scores = state.scores();
    state.push_event(GameEvent::RoundOver { winner, scores });
    true
}

/// Hand the turn to the next living tank (with wraparound) and re-roll wind.
///
/// A tank that cannot afford a shot forfeits its turn and is refunded one
/// shot's worth of fuel, so the match never waits on a tank that can't fire.
pub fn advance_turn(state: &mut SimulationState) {
    if check_round_over(state) {
        return;
    }

    let mut from = state.current;
    for _ in 0..state.tanks.len() {
        let Some(next) = next_living(state, from) else {
            return;
        };
        if state.tanks[next].can_fire() {
            begin_turn(state, next);
            return;
        }
        refund_forfeit(state, next);
        from = next;
    }

    // Every living tank forfeited once; the refunds cover a shot now
    if let Some(next) = next_living(state, from) {
        begin_turn(state, next);
    }
}

/// Pass the current tank's turn because it cannot afford a shot
pub fn forfeit_turn(state: &mut SimulationState) {
    let index = state.current;
    refund_forfeit(state, index);
    advance_turn(state);
}

fn refund_forfeit(state: &mut SimulationState, index: usize) {
    if let Some(tank) = state.tanks.get_mut(index) {
        log::info!("Tank {} is out of fuel, turn forfeited", index);
        tank.regenerate_fuel(FIRE_FUEL_COST);
    }
}

/// Next living tank after `from`, wrapping around
fn next_living(state: &SimulationState, from: usize) -> Option<usize> {
    let count = state.tanks.len();
    (1..=count)
        .map(|step| (from + step) % count)
        .find(|&i| state.tanks[i].alive)
}

fn begin_turn(state: &mut SimulationState, next: usize) {
    state.current = next;
    state.phase = GamePhase::AwaitingInput;
    state.roll_wind();

    log::info!("Turn: tank {} ({})", next, state.tanks[next].control.as_str());
    state.push_event(GameEvent::TurnChanged { tank: next });
}

/// Finish the turn once every projectile and delayed spawn has resolved
pub fn settle_turn(state: &mut SimulationState) {
    if state.phase == GamePhase::Resolving && state.is_quiet() {
        advance_turn(state);
    }
}
