//! AI gunner: grid search over angle/power using the real integrator
//!
//! For each candidate shot the flight is simulated forward until it lands or
//! leaves the field; the candidate whose path passes closest to the target
//! wins. Aim noise scaled by difficulty is applied afterwards.

use glam::Vec2;
use rand::Rng;

use super::collision::out_of_bounds;
use super::physics::{launch_velocity, step_projectile};
use super::state::{ControlMode, GamePhase, Projectile, SimulationState, Tank};
use super::terrain::Terrain;
use super::turn;
use super::weapon::WeaponKind;
use crate::consts::*;

/// A chosen shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    pub angle: f32,
    pub power: f32,
    pub weapon: WeaponKind,
    /// Best trajectory score found by the search (before noise)
    pub score: f32,
}

/// Angle x power grid resolution for a difficulty
pub fn search_grid(mode: ControlMode) -> (usize, usize) {
    match mode {
        ControlMode::Easy => (15, 8),
        ControlMode::Medium | ControlMode::Human => (25, 12),
        ControlMode::Hard => (41, 16),
    }
}

/// Maximum aim error (degrees, power) for a difficulty
pub fn aim_noise(mode: ControlMode) -> (f32, f32) {
    match mode {
        ControlMode::Easy => (4.0, 5.0),
        ControlMode::Medium | ControlMode::Human => (2.0, 3.0),
        ControlMode::Hard => (0.5, 1.0),
    }
}

/// Nearest living enemy by horizontal distance
pub fn pick_target(tanks: &[Tank], shooter: usize) -> Option<usize> {
    let x = tanks.get(shooter)?.pos.x;
    tanks
        .iter()
        .enumerate()
        .filter(|(i, t)| *i != shooter && t.alive)
        .min_by(|(_, a), (_, b)| {
            (a.pos.x - x)
                .abs()
                .partial_cmp(&(b.pos.x - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Hard AI takes the most advanced unlocked weapon, others pick at random
pub fn choose_weapon<R: Rng>(mode: ControlMode, score: u32, rng: &mut R) -> WeaponKind {
    let unlocked = WeaponKind::unlocked(score);
    if mode == ControlMode::Hard {
        return unlocked.last().copied().unwrap_or_default();
    }
    if unlocked.is_empty() {
        return WeaponKind::Shell;
    }
    unlocked[rng.random_range(0..unlocked.len())]
}

/// Read-only view of the world a forward simulation needs
pub struct Ballistics<'a> {
    pub terrain: &'a Terrain,
    pub tanks: &'a [Tank],
    pub gravity: f32,
    pub wind: f32,
}

impl<'a> Ballistics<'a> {
    pub fn from_state(state: &'a SimulationState) -> Self {
        Self {
            terrain: &state.terrain,
            tanks: &state.tanks,
            gravity: state.gravity,
            wind: state.wind,
        }
    }

    /// Score a candidate shot: `1 / (1 + d²)` for the closest approach to `target`.
    ///
    /// The flight is capped at `AI_MAX_TICKS` and ends early on leaving the
    /// field or touching the ground.
    pub fn score_trajectory(
        &self,
        shooter: usize,
        target: Vec2,
        angle: f32,
        power: f32,
        weapon: WeaponKind,
    ) -> f32 {
        let Some(tank) = self.tanks.get(shooter) else {
            return 0.0;
        };
        let mut probe = Projectile::new(0, tank.pos, launch_velocity(angle, power, weapon), shooter, weapon);
        let mut best_d2 = probe.pos.distance_squared(target);

        for _ in 0..AI_MAX_TICKS {
            step_projectile(&mut probe, self.tanks, self.gravity, self.wind, 1.0);
            best_d2 = best_d2.min(probe.pos.distance_squared(target));
            if out_of_bounds(probe.pos, self.terrain) || probe.pos.y >= self.terrain.ground_at(probe.pos.x) {
                break;
            }
        }

        1.0 / (1.0 + best_d2)
    }

    /// Exhaustive grid search, ascending angle then ascending power.
    ///
    /// Ties keep the first candidate found.
    pub fn search(&self, shooter: usize, target: Vec2, weapon: WeaponKind, mode: ControlMode) -> ShotPlan {
        let (angle_steps, power_steps) = search_grid(mode);
        let mut best = ShotPlan {
            angle: AI_MIN_ANGLE,
            power: AI_MIN_POWER,
            weapon,
            score: f32::NEG_INFINITY,
        };

        for ai in 0..angle_steps {
            let angle = lerp_step(AI_MIN_ANGLE, AI_MAX_ANGLE, ai, angle_steps);
            for pi in 0..power_steps {
                let power = lerp_step(AI_MIN_POWER, AI_MAX_POWER, pi, power_steps);
                let score = self.score_trajectory(shooter, target, angle, power, weapon);
                if score > best.score {
                    best = ShotPlan {
                        angle,
                        power,
                        weapon,
                        score,
                    };
                }
            }
        }
        best
    }
}

/// `i`-th of `steps` evenly spaced values covering `[lo, hi]`
fn lerp_step(lo: f32, hi: f32, i: usize, steps: usize) -> f32 {
    if steps <= 1 {
        return lo;
    }
    lo + (hi - lo) * i as f32 / (steps - 1) as f32
}

/// Plan a shot for `shooter`: target, weapon, grid search, then aim noise
pub fn plan_shot(state: &mut SimulationState, shooter: usize) -> Option<ShotPlan> {
    let tank = state.tanks.get(shooter)?;
    let mode = tank.control;
    let score = tank.score;
    let target = pick_target(&state.tanks, shooter)?;
    let target_pos = state.tanks[target].pos;

    let weapon = choose_weapon(mode, score, &mut state.rng);
    let mut plan = Ballistics::from_state(state).search(shooter, target_pos, weapon, mode);

    let (angle_noise, power_noise) = aim_noise(mode);
    plan.angle = (plan.angle + state.rng.random_range(-angle_noise..=angle_noise)).clamp(MIN_ANGLE, MAX_ANGLE);
    plan.power = (plan.power + state.rng.random_range(-power_noise..=power_noise)).clamp(MIN_POWER, MAX_POWER);

    log::debug!(
        "AI tank {} ({}) -> tank {}: {} angle {:.1} power {:.1} (score {:.5})",
        shooter,
        mode.as_str(),
        target,
        weapon.as_str(),
        plan.angle,
        plan.power,
        plan.score
    );
    Some(plan)
}

/// Let AI tanks act while it is an AI tank's turn.
///
/// A tank without fuel for a shot forfeits: it regenerates one shot's worth
/// of fuel and the turn passes. Returns true if an AI tank fired.
pub fn take_turn_if_ai(state: &mut SimulationState) -> bool {
    for _ in 0..state.tanks.len() {
        if state.paused || state.phase != GamePhase::AwaitingInput {
            return false;
        }
        let shooter = state.current;
        let Some(tank) = state.tanks.get(shooter) else {
            return false;
        };
        if !tank.control.is_ai() || !tank.alive {
            return false;
        }

        if !tank.can_fire() {
            turn::forfeit_turn(state);
            continue;
        }

        let Some(plan) = plan_shot(state, shooter) else {
            return false;
        };
        let tank = &mut state.tanks[shooter];
        tank.angle = plan.angle;
        tank.power = plan.power;
        tank.weapon = plan.weapon;
        return turn::fire_current(state);
    }
    false
}
