//! Match state and core simulation types
//!
//! Everything the tick loop mutates lives in `SimulationState`, owned by a
//! single controller and passed explicitly to every system.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::terrain::{LandscapeKind, Terrain};
use super::weapon::WeaponKind;
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No projectile in flight, the current tank may act
    AwaitingInput,
    /// Projectiles in flight or delayed spawns pending
    Resolving,
    /// Exactly one tank left standing
    RoundOver,
}

/// Who drives a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Human,
    Easy,
    Medium,
    Hard,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Human => "Human",
            ControlMode::Easy => "Easy",
            ControlMode::Medium => "Medium",
            ControlMode::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "player" => Some(ControlMode::Human),
            "easy" => Some(ControlMode::Easy),
            "medium" | "med" => Some(ControlMode::Medium),
            "hard" => Some(ControlMode::Hard),
            _ => None,
        }
    }

    pub fn is_ai(&self) -> bool {
        *self != ControlMode::Human
    }
}

/// A tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// Centre of the hull (rests `TANK_OFFSET` above the ground)
    pub pos: Vec2,
    /// Barrel angle in degrees (0 = right, 90 = up, 180 = left)
    pub angle: f32,
    /// Shot power in [MIN_POWER, MAX_POWER]
    pub power: f32,
    /// Packed RGB, for renderers only
    pub color: u32,
    pub alive: bool,
    pub control: ControlMode,
    pub score: u32,
    pub health: f32,
    pub max_health: f32,
    pub fuel: f32,
    pub max_fuel: f32,
    /// Selected weapon
    #[serde(default)]
    pub weapon: WeaponKind,
}

/// Hull colors by slot
pub const TANK_COLORS: [u32; 4] = [0xE0_4A_3A, 0x3A_8E_E0, 0x5C_C2_4A, 0xE0_B8_3A];

impl Tank {
    pub fn new(control: ControlMode, color: u32) -> Self {
        Self {
            pos: Vec2::ZERO,
            angle: 45.0,
            power: DEFAULT_POWER,
            color,
            alive: true,
            control,
            score: 0,
            health: BASE_MAX_HEALTH,
            max_health: BASE_MAX_HEALTH,
            fuel: BASE_MAX_FUEL,
            max_fuel: BASE_MAX_FUEL,
            weapon: WeaponKind::Shell,
        }
    }

    /// Spend fuel. Fails without touching the tank if there isn't enough.
    pub fn consume_fuel(&mut self, amount: f32) -> bool {
        if amount < 0.0 || amount > self.fuel {
            return false;
        }
        self.fuel -= amount;
        true
    }

    /// Add fuel, capped at `max_fuel`
    pub fn regenerate_fuel(&mut self, amount: f32) {
        if amount > 0.0 {
            self.fuel = (self.fuel + amount).min(self.max_fuel);
        }
    }

    /// Apply damage. Returns true if this hit destroyed the tank.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Recompute max health/fuel from the score bonus and refill both
    pub fn apply_round_bonus(&mut self) {
        let multiplier = crate::bonus_multiplier(self.score) as f32;
        self.max_health = BASE_MAX_HEALTH * multiplier;
        self.max_fuel = BASE_MAX_FUEL * multiplier;
        self.health = self.max_health;
        self.fuel = self.max_fuel;
        self.alive = true;
    }

    pub fn can_fire(&self) -> bool {
        self.alive && self.fuel >= FIRE_FUEL_COST
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Position before the last integration step (swept collision)
    pub prev_pos: Vec2,
    /// Index of the tank that fired it
    pub owner: usize,
    pub weapon: WeaponKind,
    /// Ticks since launch
    pub age: u32,
    /// Scatter fuse: ticks until a forced mid-air burst
    #[serde(default)]
    pub fuse: Option<f32>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, owner: usize, weapon: WeaponKind) -> Self {
        Self {
            id,
            pos,
            vel,
            prev_pos: pos,
            owner,
            weapon,
            age: 0,
            fuse: None,
        }
    }

    pub fn fuse_expired(&self) -> bool {
        matches!(self.fuse, Some(t) if t <= 0.0)
    }
}

/// A projectile waiting on the wall clock before it enters flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSpawn {
    /// Wall-clock time (ms since match start) at which it launches
    pub due_ms: f64,
    pub projectile: Projectile,
}

/// Notifications for rendering/audio/persistence collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { tank: usize, weapon: WeaponKind },
    Explosion { pos: Vec2, magnitude: f32 },
    ScatterBurst { pos: Vec2 },
    TankDestroyed { tank: usize },
    ScoreChanged { tank: usize, score: u32 },
    TurnChanged { tank: usize },
    RoundOver { winner: Option<usize>, scores: Vec<u32> },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Source for terrain noise, wind, AI aim noise and scatter spread
    pub rng: Pcg32,
    pub terrain: Terrain,
    pub tanks: Vec<Tank>,
    /// Projectiles in flight (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Delayed scatter shells
    pub pending: Vec<PendingSpawn>,
    pub landscape: LandscapeKind,
    pub gravity: f32,
    pub wind: f32,
    /// Wind eases toward this value; re-rolled every turn
    pub wind_target: f32,
    /// Index of the tank whose turn it is
    pub current: usize,
    pub phase: GamePhase,
    pub paused: bool,
    pub winner: Option<usize>,
    /// Rounds started so far
    pub round: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Wall clock (ms), advances even while paused
    pub clock_ms: f64,
    /// Undrained notifications
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimulationState {
    /// Create a state with one tank per control mode.
    ///
    /// The terrain is flat and tanks unplaced until `turn::reset_round` runs.
    pub fn new(seed: u64, width: usize, height: f32, landscape: LandscapeKind, controls: &[ControlMode]) -> Self {
        let tanks = controls
            .iter()
            .take(MAX_TANKS)
            .enumerate()
            .map(|(i, &mode)| Tank::new(mode, TANK_COLORS[i % TANK_COLORS.len()]))
            .collect();

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            terrain: Terrain::flat(width, height, height * 0.6),
            tanks,
            projectiles: Vec::new(),
            pending: Vec::new(),
            landscape,
            gravity: landscape.gravity(),
            wind: 0.0,
            wind_target: 0.0,
            current: 0,
            phase: GamePhase::AwaitingInput,
            paused: false,
            winner: None,
            round: 0,
            time_ticks: 0,
            clock_ms: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Roll a fresh wind target
    pub fn roll_wind(&mut self) {
        self.wind_target = self.rng.random_range(-WIND_MAX..=WIND_MAX);
    }

    pub fn alive_count(&self) -> usize {
        self.tanks.iter().filter(|t| t.alive).count()
    }

    pub fn current_tank(&self) -> Option<&Tank> {
        self.tanks.get(self.current)
    }

    /// Nothing in flight and nothing scheduled
    pub fn is_quiet(&self) -> bool {
        self.projectiles.is_empty() && self.pending.is_empty()
    }

    /// Rest every tank on the ground beneath it
    pub fn settle_tanks(&mut self) {
        for tank in &mut self.tanks {
            tank.pos.y = self.terrain.tank_rest_y(tank.pos.x);
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn scores(&self) -> Vec<u32> {
        self.tanks.iter().map(|t| t.score).collect()
    }
}
