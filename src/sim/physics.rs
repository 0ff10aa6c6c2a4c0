//! Projectile integration under gravity, wind and missile homing

use glam::Vec2;

use super::state::{Projectile, Tank};
use super::weapon::WeaponKind;
use crate::angle_to_direction;
use crate::consts::*;

/// Homing gain applied to the horizontal gap to the target
const HOMING_GAIN: f32 = 0.001;
/// Cap on the per-tick homing correction
const HOMING_MAX_STEER: f32 = 0.25;

/// Muzzle velocity for a barrel angle (degrees) and power setting
pub fn launch_velocity(angle_deg: f32, power: f32, weapon: WeaponKind) -> Vec2 {
    angle_to_direction(angle_deg) * power * SPEED_PER_POWER * weapon.launch_scale()
}

/// Nearest living tank to `pos` other than `owner` (Euclidean)
pub fn nearest_enemy(tanks: &[Tank], owner: usize, pos: Vec2) -> Option<usize> {
    tanks
        .iter()
        .enumerate()
        .filter(|(i, t)| *i != owner && t.alive)
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(pos)
                .partial_cmp(&b.pos.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Advance a projectile by one tick.
///
/// `dt` is the frame-rate multiplier (nominally 1) and is clamped to
/// `[0, MAX_DT]`. Lasers ignore gravity and wind; missiles steer toward
/// the nearest enemy. The scatter fuse burns down by `dt`.
pub fn step_projectile(projectile: &mut Projectile, tanks: &[Tank], gravity: f32, wind: f32, dt: f32) {
    let dt = dt.clamp(0.0, MAX_DT);
    projectile.prev_pos = projectile.pos;

    if projectile.weapon.is_ballistic() {
        projectile.vel.y += gravity * dt;
        projectile.vel.x += wind * dt;
    }

    if projectile.weapon.is_homing() {
        if let Some(target) = nearest_enemy(tanks, projectile.owner, projectile.pos) {
            let steer = ((tanks[target].pos.x - projectile.pos.x) * HOMING_GAIN)
                .clamp(-HOMING_MAX_STEER, HOMING_MAX_STEER);
            projectile.vel.x += steer * dt;
        }
    }

    projectile.pos += projectile.vel * INTEGRATION_SCALE * dt;
    projectile.age += 1;

    if let Some(fuse) = projectile.fuse.as_mut() {
        *fuse -= dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ControlMode;

    fn tank_at(x: f32, y: f32) -> Tank {
        let mut t = Tank::new(ControlMode::Human, 0);
        t.pos = Vec2::new(x, y);
        t
    }

    #[test]
    fn test_launch_velocity_scaling() {
        let shell = launch_velocity(90.0, 60.0, WeaponKind::Shell);
        assert!(shell.x.abs() < 1e-4);
        assert!((shell.y + 30.0).abs() < 1e-4);

        let scatter = launch_velocity(90.0, 60.0, WeaponKind::Scatter);
        assert!((scatter.length() - 30.0 * 0.85).abs() < 1e-4);
        let nuke = launch_velocity(90.0, 60.0, WeaponKind::Nuke);
        assert!((nuke.length() - 30.0 * 0.90).abs() < 1e-4);
    }

    #[test]
    fn test_step_applies_gravity_and_wind() {
        let mut p = Projectile::new(1, Vec2::new(100.0, 100.0), Vec2::new(10.0, -10.0), 0, WeaponKind::Shell);
        step_projectile(&mut p, &[], 0.25, 0.05, 1.0);
        assert_eq!(p.prev_pos, Vec2::new(100.0, 100.0));
        assert!((p.vel.x - 10.05).abs() < 1e-5);
        assert!((p.vel.y + 9.75).abs() < 1e-5);
        assert!((p.pos.x - (100.0 + 10.05 * 0.1)).abs() < 1e-4);
        assert!((p.pos.y - (100.0 - 9.75 * 0.1)).abs() < 1e-4);
        assert_eq!(p.age, 1);
    }

    #[test]
    fn test_laser_flies_straight() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::new(20.0, -5.0), 0, WeaponKind::Laser);
        for _ in 0..10 {
            step_projectile(&mut p, &[], 0.25, 0.05, 1.0);
        }
        assert_eq!(p.vel, Vec2::new(20.0, -5.0));
        assert!((p.pos.x - 20.0).abs() < 1e-4);
        assert!((p.pos.y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut a = Projectile::new(1, Vec2::ZERO, Vec2::new(10.0, 0.0), 0, WeaponKind::Shell);
        let mut b = a.clone();
        step_projectile(&mut a, &[], 0.25, 0.0, 3.0);
        step_projectile(&mut b, &[], 0.25, 0.0, 10.0);
        assert_eq!(a.pos, b.pos);

        let mut c = Projectile::new(1, Vec2::ZERO, Vec2::new(10.0, 0.0), 0, WeaponKind::Shell);
        step_projectile(&mut c, &[], 0.25, 0.0, -1.0);
        assert_eq!(c.pos, Vec2::ZERO);
    }

    #[test]
    fn test_missile_steers_toward_nearest_enemy() {
        // Owner at 0, far enemy to the left, near enemy to the right
        let tanks = vec![tank_at(100.0, 300.0), tank_at(-400.0, 300.0), tank_at(300.0, 300.0)];
        let mut p = Projectile::new(1, Vec2::new(100.0, 200.0), Vec2::ZERO, 0, WeaponKind::Missile);
        step_projectile(&mut p, &tanks, 0.0, 0.0, 1.0);
        // (300 - 100) * 0.001 = 0.2
        assert!((p.vel.x - 0.2).abs() < 1e-5);

        // Steering saturates
        let tanks = vec![tank_at(0.0, 300.0), tank_at(1000.0, 300.0)];
        let mut p = Projectile::new(1, Vec2::new(0.0, 200.0), Vec2::ZERO, 0, WeaponKind::Missile);
        step_projectile(&mut p, &tanks, 0.0, 0.0, 1.0);
        assert!((p.vel.x - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_missile_ignores_dead_and_owner() {
        let mut dead = tank_at(150.0, 300.0);
        dead.alive = false;
        let tanks = vec![tank_at(100.0, 300.0), dead, tank_at(0.0, 300.0)];
        assert_eq!(nearest_enemy(&tanks, 0, Vec2::new(100.0, 300.0)), Some(2));
        assert_eq!(nearest_enemy(&tanks[..2], 0, Vec2::ZERO), None);
    }

    #[test]
    fn test_fuse_burns_with_dt() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::ZERO, 0, WeaponKind::Scatter);
        p.fuse = Some(2.0);
        step_projectile(&mut p, &[], 0.25, 0.0, 0.5);
        assert_eq!(p.fuse, Some(1.5));
    }
}
