//! Impact resolution: craters, damage, scoring and scatter bursts

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, PendingSpawn, Projectile, SimulationState};
use super::weapon::WeaponKind;
use crate::consts::*;

/// Missiles released by a scatter burst, fanned over `-SPREAD..=SPREAD`
const SCATTER_FAN_SPREAD: i32 = 3;
/// Share of the carrier's velocity each fragment keeps
const SCATTER_CARRY: f32 = 0.6;
/// Lateral speed added per fan step
const SCATTER_FAN_STEP: f32 = 4.0;
/// Upward kick given to every fan fragment
const SCATTER_LIFT: f32 = 4.0;
/// Position jitter for delayed shells
const SCATTER_POS_JITTER: f32 = 10.0;

/// Ground impact: crater at the impact point, damage the first tank in reach
pub fn resolve_ground_impact(state: &mut SimulationState, projectile: &Projectile) {
    let weapon = projectile.weapon;
    let pos = projectile.pos;
    let radius = weapon.blast_radius();

    state.terrain.deform(pos, radius);
    state.push_event(GameEvent::Explosion { pos, magnitude: radius });

    let reach = radius + BLAST_REACH;
    let victim = state
        .tanks
        .iter()
        .enumerate()
        .find(|(i, t)| *i != projectile.owner && t.alive && t.pos.distance(pos) <= reach)
        .map(|(i, _)| i);

    log::debug!(
        "{} #{} hit ground at ({:.1}, {:.1}), victim {:?}",
        weapon.as_str(),
        projectile.id,
        pos.x,
        pos.y,
        victim
    );

    if let Some(victim) = victim {
        apply_damage(state, victim, weapon.blast_damage());
        award(state, projectile.owner, weapon);
    }

    state.settle_tanks();
}

/// Direct hit: crater under the struck tank, direct-hit damage, points
pub fn resolve_direct_hit(state: &mut SimulationState, projectile: &Projectile, target: usize) {
    let Some(tank_pos) = state.tanks.get(target).map(|t| t.pos) else {
        return;
    };
    let weapon = projectile.weapon;
    let radius = weapon.direct_hit_radius();

    log::debug!("{} #{} direct hit on tank {}", weapon.as_str(), projectile.id, target);

    state.terrain.deform(tank_pos, radius);
    state.push_event(GameEvent::Explosion {
        pos: tank_pos,
        magnitude: radius,
    });

    apply_damage(state, target, weapon.direct_hit_damage());
    award(state, projectile.owner, weapon);

    state.settle_tanks();
}

/// Break a scatter carrier into a fan of missiles plus delayed shells.
///
/// Fan missiles join the flight list immediately; the shells are scheduled on
/// the wall clock and join when `tick::advance_clock` reaches them.
pub fn scatter_burst(state: &mut SimulationState, projectile: &Projectile) {
    let pos = projectile.pos;
    let vel = projectile.vel;
    let owner = projectile.owner;

    log::debug!("Scatter #{} burst at ({:.1}, {:.1})", projectile.id, pos.x, pos.y);
    state.push_event(GameEvent::ScatterBurst { pos });

    for i in -SCATTER_FAN_SPREAD..=SCATTER_FAN_SPREAD {
        let fan_vel = Vec2::new(
            vel.x * SCATTER_CARRY + i as f32 * SCATTER_FAN_STEP,
            vel.y * SCATTER_CARRY - SCATTER_LIFT,
        );
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::new(id, pos, fan_vel, owner, WeaponKind::Missile));
    }

    for k in 0..SCATTER_DELAYED_SHELLS {
        let jitter = Vec2::new(
            state.rng.random_range(-SCATTER_POS_JITTER..=SCATTER_POS_JITTER),
            state.rng.random_range(-SCATTER_POS_JITTER..=SCATTER_POS_JITTER),
        );
        let shell_vel = Vec2::new(
            vel.x * 0.5 + state.rng.random_range(-6.0..=6.0),
            vel.y * 0.5 + state.rng.random_range(-8.0..=2.0),
        );
        let id = state.next_entity_id();
        let due_ms = state.clock_ms + (SCATTER_DELAY_MS + SCATTER_STAGGER_MS * k as f32) as f64;
        state.pending.push(PendingSpawn {
            due_ms,
            projectile: Projectile::new(id, pos + jitter, shell_vel, owner, WeaponKind::Shell),
        });
    }
}

/// Damage a tank, announcing its destruction
pub fn apply_damage(state: &mut SimulationState, target: usize, amount: f32) {
    let Some(tank) = state.tanks.get_mut(target) else {
        return;
    };
    if tank.take_damage(amount) {
        log::info!("Tank {} destroyed", target);
        state.push_event(GameEvent::TankDestroyed { tank: target });
    }
}

/// Credit the shooter with the weapon's points and fuel bonus
pub fn award(state: &mut SimulationState, shooter: usize, weapon: WeaponKind) {
    let Some(tank) = state.tanks.get_mut(shooter) else {
        return;
    };
    tank.score += weapon.points();
    tank.regenerate_fuel(weapon.fuel_bonus());
    let score = tank.score;
    state.push_event(GameEvent::ScoreChanged { tank: shooter, score });
}
