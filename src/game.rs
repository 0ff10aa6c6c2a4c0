//! Match controller
//!
//! `Game` owns the `SimulationState` and is the only thing collaborators talk
//! to: renderers and HUDs read through the query methods, input handlers call
//! the commands, and audio/persistence drain the event queue. Commands that
//! are not allowed right now return `false` and change nothing.

use rand::Rng;

use crate::consts::*;
use crate::persistence::{PROGRESS_VERSION, Progress};
use crate::settings::MatchConfig;
use crate::sim::{
    self, GameEvent, GamePhase, LandscapeKind, Projectile, SimulationState, Tank, Terrain, WeaponKind,
};

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

impl MoveDirection {
    fn sign(&self) -> f32 {
        match self {
            MoveDirection::Left => -1.0,
            MoveDirection::Right => 1.0,
        }
    }
}

/// A running match
pub struct Game {
    state: SimulationState,
}

impl Game {
    /// Start a match and its first round
    pub fn new(config: &MatchConfig) -> Self {
        let mut game = Self::unstarted(config);
        game.start_round();
        game
    }

    /// Start a match with previously saved progress applied.
    ///
    /// Scores, control modes and the landscape are restored. The saved max
    /// health/fuel are only written out for collaborators: the round reset
    /// derives both from the restored score. Entries beyond the configured
    /// tank count are ignored.
    pub fn with_progress(config: &MatchConfig, progress: &Progress) -> Self {
        let mut game = Self::unstarted(config);
        let state = &mut game.state;

        state.landscape = progress.landscape;
        for (i, tank) in state.tanks.iter_mut().enumerate() {
            if let Some(&score) = progress.scores.get(i) {
                tank.score = score;
            }
            if let Some(&mode) = progress.control_modes.get(i) {
                tank.control = mode;
            }
        }
        log::info!("Applied saved progress: scores {:?}", state.scores());

        game.start_round();
        game
    }

    fn unstarted(config: &MatchConfig) -> Self {
        let config = config.validated();
        let seed = if config.seed == 0 {
            rand::rng().random()
        } else {
            config.seed
        };
        log::info!(
            "New match: {}x{}, {} tanks, seed {}",
            config.width,
            config.height,
            config.players.len(),
            seed
        );

        Self {
            state: SimulationState::new(
                seed,
                config.width,
                config.height as f32,
                config.landscape,
                &config.players,
            ),
        }
    }

    fn start_round(&mut self) {
        sim::reset_round(&mut self.state);
        sim::take_turn_if_ai(&mut self.state);
    }

    // --- Frame driving ---

    /// Advance by one display frame of `frame_ms` wall-clock milliseconds.
    ///
    /// The wall clock always advances (delayed scatter shells keep their
    /// schedule); the simulation only ticks when not paused.
    pub fn update(&mut self, frame_ms: f32) {
        sim::advance_clock(&mut self.state, frame_ms.max(0.0) as f64);
        if !self.state.paused {
            sim::tick(&mut self.state, sim::frame_dt(frame_ms));
        }
    }

    /// Advance one tick with an explicit `dt`.
    ///
    /// The wall clock moves by the matching `dt * FRAME_MS`, so delayed
    /// scatter shells still launch when a caller only ever ticks.
    pub fn tick(&mut self, dt: f32) {
        if self.state.paused {
            return;
        }
        let dt = dt.clamp(0.0, MAX_DT);
        sim::advance_clock(&mut self.state, (dt * FRAME_MS) as f64);
        sim::tick(&mut self.state, dt);
    }

    // --- Commands ---

    /// Index of the current tank if a human may act on it now
    fn human_turn(&self) -> Option<usize> {
        let state = &self.state;
        if state.paused || state.phase != GamePhase::AwaitingInput {
            return None;
        }
        let tank = state.current_tank()?;
        (tank.alive && !tank.control.is_ai()).then_some(state.current)
    }

    /// Drive the current tank one step, spending fuel.
    ///
    /// Refused if it would leave less fuel than a shot costs.
    pub fn move_player(&mut self, direction: MoveDirection) -> bool {
        let Some(index) = self.human_turn() else {
            log::debug!("Move rejected: not a human turn");
            return false;
        };
        let max_x = (self.state.terrain.width.saturating_sub(1)) as f32;
        let tank = &mut self.state.tanks[index];
        let new_x = (tank.pos.x + direction.sign() * MOVE_STEP).clamp(0.0, max_x);
        if new_x == tank.pos.x || tank.fuel - MOVE_FUEL_COST < FIRE_FUEL_COST {
            log::debug!("Move rejected for tank {} (fuel {:.1})", index, tank.fuel);
            return false;
        }
        if !tank.consume_fuel(MOVE_FUEL_COST) {
            return false;
        }
        tank.pos.x = new_x;
        tank.pos.y = self.state.terrain.tank_rest_y(new_x);
        true
    }

    /// Fire the current tank's selected weapon
    pub fn fire(&mut self) -> bool {
        if self.human_turn().is_none() {
            log::debug!("Fire rejected: not a human turn");
            return false;
        }
        sim::fire_current(&mut self.state)
    }

    /// Set the barrel angle in degrees, [0, 180]
    pub fn set_angle(&mut self, angle: f32) -> bool {
        if !(MIN_ANGLE..=MAX_ANGLE).contains(&angle) {
            return false;
        }
        let Some(index) = self.human_turn() else {
            return false;
        };
        self.state.tanks[index].angle = angle;
        true
    }

    /// Set the shot power, [10, 100]
    pub fn set_power(&mut self, power: f32) -> bool {
        if !(MIN_POWER..=MAX_POWER).contains(&power) {
            return false;
        }
        let Some(index) = self.human_turn() else {
            return false;
        };
        self.state.tanks[index].power = power;
        true
    }

    /// Select a weapon. A locked weapon is refused and the selection falls
    /// back to the shell.
    pub fn set_weapon(&mut self, weapon: WeaponKind) -> bool {
        let Some(index) = self.human_turn() else {
            return false;
        };
        let tank = &mut self.state.tanks[index];
        if !weapon.is_unlocked(tank.score) {
            log::debug!(
                "{} locked for tank {} (score {} < {})",
                weapon.as_str(),
                index,
                tank.score,
                weapon.unlock_score()
            );
            tank.weapon = WeaponKind::Shell;
            return false;
        }
        tank.weapon = weapon;
        true
    }

    /// Start the next round (also "continue" after a win)
    pub fn new_round(&mut self) {
        self.start_round();
    }

    /// Switch landscape and start a fresh round on it
    pub fn set_landscape(&mut self, landscape: LandscapeKind) {
        log::info!("Landscape -> {}", landscape.as_str());
        self.state.landscape = landscape;
        self.start_round();
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.state.paused != paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.state.paused = paused;
        if !paused {
            sim::take_turn_if_ai(&mut self.state);
        }
    }

    // --- Queries ---

    pub fn terrain(&self) -> &Terrain {
        &self.state.terrain
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.state.tanks
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.state.projectiles
    }

    /// Signed wind (positive blows right)
    pub fn wind(&self) -> f32 {
        self.state.wind
    }

    pub fn gravity(&self) -> f32 {
        self.state.gravity
    }

    pub fn current_player(&self) -> usize {
        self.state.current
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_round_over(&self) -> bool {
        self.state.phase == GamePhase::RoundOver
    }

    pub fn winner(&self) -> Option<usize> {
        self.state.winner
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn landscape(&self) -> LandscapeKind {
        self.state.landscape
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    /// Full read access for tools and tests
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access for scenario setup
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Snapshot of what should be persisted
    pub fn progress(&self) -> Progress {
        let tanks = &self.state.tanks;
        Progress {
            version: PROGRESS_VERSION,
            scores: tanks.iter().map(|t| t.score).collect(),
            control_modes: tanks.iter().map(|t| t.control).collect(),
            max_health: tanks.iter().map(|t| t.max_health).collect(),
            max_fuel: tanks.iter().map(|t| t.max_fuel).collect(),
            landscape: self.state.landscape,
        }
    }
}
