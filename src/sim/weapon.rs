//! Weapon kinds and their fixed balance tables

use serde::{Deserialize, Serialize};

/// Weapon kinds, ordered from basic to most advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Shell,
    Missile,
    Scatter,
    Laser,
    Nuke,
}

impl WeaponKind {
    /// All weapons in unlock order
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Shell,
        WeaponKind::Missile,
        WeaponKind::Scatter,
        WeaponKind::Laser,
        WeaponKind::Nuke,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Shell => "Shell",
            WeaponKind::Missile => "Missile",
            WeaponKind::Scatter => "Scatter",
            WeaponKind::Laser => "Laser",
            WeaponKind::Nuke => "Nuke",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shell" => Some(WeaponKind::Shell),
            "missile" => Some(WeaponKind::Missile),
            "scatter" => Some(WeaponKind::Scatter),
            "laser" => Some(WeaponKind::Laser),
            "nuke" => Some(WeaponKind::Nuke),
            _ => None,
        }
    }

    /// Score a tank needs before it may select this weapon
    pub fn unlock_score(&self) -> u32 {
        match self {
            WeaponKind::Shell => 0,
            WeaponKind::Missile => 200,
            WeaponKind::Scatter => 400,
            WeaponKind::Laser => 500,
            WeaponKind::Nuke => 800,
        }
    }

    pub fn is_unlocked(&self, score: u32) -> bool {
        score >= self.unlock_score()
    }

    /// Weapons available at `score`, in unlock order
    pub fn unlocked(score: u32) -> Vec<WeaponKind> {
        Self::ALL.iter().copied().filter(|w| w.is_unlocked(score)).collect()
    }

    /// Fraction of the computed launch speed the round leaves the barrel with
    pub fn launch_scale(&self) -> f32 {
        match self {
            WeaponKind::Scatter => 0.85,
            WeaponKind::Nuke => 0.90,
            _ => 1.0,
        }
    }

    /// Lasers fly straight, ignoring gravity and wind
    pub fn is_ballistic(&self) -> bool {
        *self != WeaponKind::Laser
    }

    pub fn is_homing(&self) -> bool {
        *self == WeaponKind::Missile
    }

    /// Crater radius when the round hits the ground
    pub fn blast_radius(&self) -> f32 {
        match self {
            WeaponKind::Shell | WeaponKind::Scatter | WeaponKind::Laser => 22.0,
            WeaponKind::Missile => 28.0,
            WeaponKind::Nuke => 80.0,
        }
    }

    /// Damage dealt to a tank caught by a ground blast
    pub fn blast_damage(&self) -> f32 {
        match self {
            WeaponKind::Shell | WeaponKind::Scatter => 20.0,
            WeaponKind::Missile | WeaponKind::Laser => 30.0,
            WeaponKind::Nuke => 80.0,
        }
    }

    /// Crater radius carved at the tank on a direct hit
    pub fn direct_hit_radius(&self) -> f32 {
        match self {
            WeaponKind::Shell | WeaponKind::Scatter | WeaponKind::Laser => 22.0,
            WeaponKind::Missile => 26.0,
            WeaponKind::Nuke => 46.0,
        }
    }

    /// Damage dealt on a direct hit
    pub fn direct_hit_damage(&self) -> f32 {
        match self {
            WeaponKind::Shell | WeaponKind::Scatter => 20.0,
            WeaponKind::Missile => 25.0,
            WeaponKind::Laser => 30.0,
            WeaponKind::Nuke => 50.0,
        }
    }

    /// Points awarded to the shooter for damaging a tank
    pub fn points(&self) -> u32 {
        match self {
            WeaponKind::Shell | WeaponKind::Scatter => 100,
            WeaponKind::Missile => 220,
            WeaponKind::Laser => 300,
            WeaponKind::Nuke => 500,
        }
    }

    /// Fuel bonus that comes with the points
    pub fn fuel_bonus(&self) -> f32 {
        (self.points() / 10) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_thresholds() {
        assert!(!WeaponKind::Laser.is_unlocked(499));
        assert!(WeaponKind::Laser.is_unlocked(500));
        assert_eq!(WeaponKind::unlocked(0), vec![WeaponKind::Shell]);
        assert_eq!(
            WeaponKind::unlocked(450),
            vec![WeaponKind::Shell, WeaponKind::Missile, WeaponKind::Scatter]
        );
        assert_eq!(WeaponKind::unlocked(800).last(), Some(&WeaponKind::Nuke));
    }

    #[test]
    fn test_flight_modifiers() {
        assert_eq!(WeaponKind::Scatter.launch_scale(), 0.85);
        assert_eq!(WeaponKind::Nuke.launch_scale(), 0.90);
        assert_eq!(WeaponKind::Laser.launch_scale(), 1.0);
        assert!(!WeaponKind::Laser.is_ballistic());
        assert!(WeaponKind::Missile.is_homing());
        assert!(!WeaponKind::Shell.is_homing());
    }

    #[test]
    fn test_reward_tables() {
        assert_eq!(WeaponKind::Shell.points(), 100);
        assert_eq!(WeaponKind::Nuke.fuel_bonus(), 50.0);
        assert_eq!(WeaponKind::Missile.direct_hit_damage(), 25.0);
        assert_eq!(WeaponKind::Missile.blast_damage(), 30.0);
        assert_eq!(WeaponKind::Nuke.direct_hit_radius(), 46.0);
    }

    #[test]
    fn test_from_str_roundtrip_names() {
        for w in WeaponKind::ALL {
            assert_eq!(WeaponKind::from_str(w.as_str()), Some(w));
        }
        assert_eq!(WeaponKind::from_str("railgun"), None);
    }
}
