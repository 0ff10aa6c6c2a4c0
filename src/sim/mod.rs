//! Simulation core
//!
//! All gameplay logic lives here. Rules for this module:
//! - State is owned by `SimulationState`, never ambient
//! - Randomness comes only from the state's seeded RNG
//! - Stable iteration order (tanks by slot, projectiles by ID)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod physics;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod turn;
pub mod weapon;

pub use ai::{Ballistics, ShotPlan, plan_shot, take_turn_if_ai};
pub use collision::{CollisionOutcome, detect_collision, segment_point_distance};
pub use physics::{launch_velocity, nearest_enemy, step_projectile};
pub use state::{
    ControlMode, GameEvent, GamePhase, PendingSpawn, Projectile, SimulationState, Tank, TANK_COLORS,
};
pub use terrain::{LandscapeKind, Terrain};
pub use tick::{advance_clock, frame_dt, tick};
pub use turn::{advance_turn, check_round_over, fire_current, forfeit_turn, reset_round};
pub use weapon::WeaponKind;
