//! Artillery Duel - turn-based tank artillery on destructible terrain
//!
//! Core modules:
//! - `sim`: Simulation core (terrain, ballistics, collisions, combat, turns, AI)
//! - `game`: Controller owning the simulation state, command/query surface
//! - `settings`: Match configuration
//! - `persistence`: Save/load of per-tank progress

pub mod game;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use game::{Game, MoveDirection};
pub use persistence::{Progress, ProgressError};
pub use settings::MatchConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration the `dt` multiplier is measured against (ms)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Upper bound for the per-tick `dt` multiplier
    pub const MAX_DT: f32 = 3.0;
    /// Velocity units to pixels per tick
    pub const INTEGRATION_SCALE: f32 = 0.1;

    /// Gravity per landscape (velocity units per tick)
    pub const EARTH_GRAVITY: f32 = 0.25;
    pub const MOON_GRAVITY: f32 = 0.10;
    pub const MARS_GRAVITY: f32 = 0.16;

    /// Wind target is rolled in [-WIND_MAX, WIND_MAX] every turn
    pub const WIND_MAX: f32 = 0.05;
    /// Fraction of the gap to the wind target closed per tick
    pub const WIND_EASE: f32 = 0.02;

    /// Launch speed per point of shot power
    pub const SPEED_PER_POWER: f32 = 0.5;
    pub const MIN_POWER: f32 = 10.0;
    pub const MAX_POWER: f32 = 100.0;
    pub const MIN_ANGLE: f32 = 0.0;
    pub const MAX_ANGLE: f32 = 180.0;
    pub const DEFAULT_POWER: f32 = 50.0;

    /// Tank centre sits this far above the ground sample
    pub const TANK_OFFSET: f32 = 6.0;
    /// Radius for projectile-vs-tank direct hits
    pub const TANK_HIT_RADIUS: f32 = 8.0;
    /// Extra reach of a ground blast when looking for a tank to damage
    pub const BLAST_REACH: f32 = 4.0;
    /// Base health/fuel, multiplied by the score bonus each round
    pub const BASE_MAX_HEALTH: f32 = 100.0;
    pub const BASE_MAX_FUEL: f32 = 100.0;
    /// Score needed per extra bonus multiplier step
    pub const SCORE_PER_BONUS: u32 = 1000;

    pub const FIRE_FUEL_COST: f32 = 5.0;
    pub const MOVE_FUEL_COST: f32 = 1.0;
    pub const MOVE_STEP: f32 = 2.0;

    /// Tank x positions as fractions of the terrain width
    pub const TANK_SLOTS: [f32; 4] = [0.10, 0.35, 0.65, 0.90];
    pub const MAX_TANKS: usize = 4;
    pub const MIN_TANKS: usize = 2;

    /// Forward simulation cap for the AI search
    pub const AI_MAX_TICKS: u32 = 300;
    pub const AI_MIN_ANGLE: f32 = 5.0;
    pub const AI_MAX_ANGLE: f32 = 170.0;
    pub const AI_MIN_POWER: f32 = 30.0;
    pub const AI_MAX_POWER: f32 = 100.0;

    /// Scatter shell fuse: base ticks plus a random extra in [0, SCATTER_FUSE_JITTER)
    pub const SCATTER_FUSE_TICKS: f32 = 30.0;
    pub const SCATTER_FUSE_JITTER: f32 = 20.0;
    /// Delayed scatter shells: first delay and stagger (wall-clock ms)
    pub const SCATTER_DELAY_MS: f32 = 80.0;
    pub const SCATTER_STAGGER_MS: f32 = 60.0;
    pub const SCATTER_DELAYED_SHELLS: usize = 4;
}

/// Unit direction for a barrel angle in degrees.
///
/// 0° points right, 90° straight up, 180° left. Screen space has y growing
/// downward, so "up" is negative y.
#[inline]
pub fn angle_to_direction(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Score-based bonus multiplier carried into the next round
#[inline]
pub fn bonus_multiplier(score: u32) -> u32 {
    score / consts::SCORE_PER_BONUS + 1
}
