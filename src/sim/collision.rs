//! Collision detection for projectiles
//!
//! Each tick a projectile resolves at most one way. Checks run in order:
//! scatter fuse, world bounds, ground, then a swept test against tanks so a
//! fast round cannot tunnel through a hull between two ticks.

use glam::Vec2;

use super::state::{Projectile, Tank};
use super::terrain::Terrain;
use crate::consts::TANK_HIT_RADIUS;

/// How a projectile resolved this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Still flying
    None,
    /// Left the world (no damage)
    OutOfBounds,
    /// Scatter fuse ran out
    ScatterBurst,
    /// Hit the ground
    Ground,
    /// Hit a tank directly (tank index)
    DirectHit(usize),
}

impl CollisionOutcome {
    /// Whether the projectile is consumed
    pub fn is_terminal(&self) -> bool {
        *self != CollisionOutcome::None
    }
}

/// Classify the projectile's state after its latest integration step
pub fn detect_collision(projectile: &Projectile, terrain: &Terrain, tanks: &[Tank]) -> CollisionOutcome {
    if projectile.fuse_expired() {
        return CollisionOutcome::ScatterBurst;
    }

    let pos = projectile.pos;
    if out_of_bounds(pos, terrain) {
        return CollisionOutcome::OutOfBounds;
    }

    if pos.y >= terrain.ground_at(pos.x) {
        return CollisionOutcome::Ground;
    }

    match first_tank_hit(projectile.prev_pos, pos, tanks, projectile.owner) {
        Some(i) => CollisionOutcome::DirectHit(i),
        None => CollisionOutcome::None,
    }
}

/// Outside `[0, width)` horizontally or at/below the bottom edge.
///
/// Above the top of the screen is still in play.
pub fn out_of_bounds(pos: Vec2, terrain: &Terrain) -> bool {
    pos.x < 0.0 || pos.x >= terrain.width as f32 || pos.y >= terrain.height
}

/// First living non-owner tank (array order) within hit range of segment `a -> b`
pub fn first_tank_hit(a: Vec2, b: Vec2, tanks: &[Tank], owner: usize) -> Option<usize> {
    tanks
        .iter()
        .enumerate()
        .filter(|(i, t)| *i != owner && t.alive)
        .find(|(_, t)| segment_point_distance(a, b, t.pos) <= TANK_HIT_RADIUS)
        .map(|(i, _)| i)
}

/// Distance from `point` to the closest point on segment `a -> b`
pub fn segment_point_distance(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 0.0001 {
        // Degenerate segment
        return point.distance(a);
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = a + seg * t;
    point.distance(closest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ControlMode;
    use crate::sim::weapon::WeaponKind;

    fn tank_at(x: f32, y: f32) -> Tank {
        let mut t = Tank::new(ControlMode::Human, 0);
        t.pos = Vec2::new(x, y);
        t
    }

    fn shot(prev: Vec2, pos: Vec2, owner: usize) -> Projectile {
        let mut p = Projectile::new(1, pos, Vec2::ZERO, owner, WeaponKind::Shell);
        p.prev_pos = prev;
        p
    }

    #[test]
    fn test_segment_point_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((segment_point_distance(a, b, Vec2::new(5.0, 3.0)) - 3.0).abs() < 1e-5);
        // Beyond the end clamps to the endpoint
        assert!((segment_point_distance(a, b, Vec2::new(13.0, 4.0)) - 5.0).abs() < 1e-5);
        // Degenerate segment
        assert!((segment_point_distance(a, a, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounds() {
        let terrain = Terrain::flat(100, 500.0, 400.0);
        let p = shot(Vec2::new(99.0, 100.0), Vec2::new(100.0, 100.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &[]), CollisionOutcome::OutOfBounds);
        let p = shot(Vec2::new(1.0, 100.0), Vec2::new(-0.1, 100.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &[]), CollisionOutcome::OutOfBounds);
        // High above the screen is fine
        let p = shot(Vec2::new(50.0, -500.0), Vec2::new(50.0, -600.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &[]), CollisionOutcome::None);
    }

    #[test]
    fn test_below_world_is_out_of_bounds_not_ground() {
        // Blasted column deeper than the world
        let mut terrain = Terrain::flat(100, 500.0, 400.0);
        terrain.samples[50] = 520.0;
        let p = shot(Vec2::new(50.0, 490.0), Vec2::new(50.0, 500.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &[]), CollisionOutcome::OutOfBounds);
    }

    #[test]
    fn test_ground_hit() {
        let terrain = Terrain::flat(100, 500.0, 400.0);
        let p = shot(Vec2::new(50.0, 398.0), Vec2::new(50.0, 400.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &[]), CollisionOutcome::Ground);
        let p = shot(Vec2::new(50.0, 397.0), Vec2::new(50.0, 399.5), 0);
        assert_eq!(detect_collision(&p, &terrain, &[]), CollisionOutcome::None);
    }

    #[test]
    fn test_swept_tank_hit() {
        let terrain = Terrain::flat(400, 500.0, 450.0);
        let tanks = vec![tank_at(20.0, 444.0), tank_at(200.0, 300.0)];
        // Endpoints both far from the tank, but the segment passes through it
        let p = shot(Vec2::new(180.0, 300.0), Vec2::new(220.0, 300.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &tanks), CollisionOutcome::DirectHit(1));
    }

    #[test]
    fn test_owner_and_dead_tanks_are_ignored() {
        let terrain = Terrain::flat(400, 500.0, 450.0);
        let mut tanks = vec![tank_at(200.0, 300.0), tank_at(200.0, 302.0)];
        let p = shot(Vec2::new(195.0, 300.0), Vec2::new(205.0, 300.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &tanks), CollisionOutcome::DirectHit(1));
        tanks[1].alive = false;
        assert_eq!(detect_collision(&p, &terrain, &tanks), CollisionOutcome::None);
    }

    #[test]
    fn test_first_tank_in_array_order_wins() {
        let tanks = vec![tank_at(0.0, 0.0), tank_at(105.0, 0.0), tank_at(100.0, 0.0)];
        let hit = first_tank_hit(Vec2::new(95.0, 0.0), Vec2::new(110.0, 0.0), &tanks, 0);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn test_ground_resolves_before_tank() {
        let terrain = Terrain::flat(400, 500.0, 300.0);
        let tanks = vec![tank_at(0.0, 0.0), tank_at(200.0, 294.0)];
        let p = shot(Vec2::new(200.0, 290.0), Vec2::new(200.0, 301.0), 0);
        assert_eq!(detect_collision(&p, &terrain, &tanks), CollisionOutcome::Ground);
    }

    #[test]
    fn test_expired_fuse_beats_everything() {
        let terrain = Terrain::flat(100, 500.0, 400.0);
        let mut p = shot(Vec2::new(50.0, 398.0), Vec2::new(50.0, 420.0), 0);
        p.weapon = WeaponKind::Scatter;
        p.fuse = Some(0.0);
        let outcome = detect_collision(&p, &terrain, &[]);
        assert_eq!(outcome, CollisionOutcome::ScatterBurst);
        assert!(outcome.is_terminal());
        assert!(!CollisionOutcome::None.is_terminal());
    }
}
