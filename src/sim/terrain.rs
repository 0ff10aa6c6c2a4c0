//! Heightmap terrain: procedural generation and blast deformation
//!
//! A terrain is one ground sample per integer x column. Samples are screen-space
//! y values, so a larger sample means lower ground. Explosions only ever push
//! samples down (larger); there are no overhangs.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Ground band after normalization, as fractions of the terrain height
const GROUND_TOP: f32 = 0.35;
const GROUND_BOTTOM: f32 = 0.80;

/// Amplitude of the per-column uniform jitter
const NOISE_JITTER: f32 = 5.0;

/// Moon crater layout (fractions of width)
const CRATER_CENTER: f32 = 0.52;
const CRATER_RADIUS: f32 = 0.28;
const CRATER_DEPTH: f32 = 150.0;
const CRATER_RIM_HEIGHT: f32 = 30.0;
const CRATER_RIM_WIDTH: f32 = 0.04;

/// Mars trench layout (fractions of width)
const TRENCH_CENTER: f32 = 0.60;
const TRENCH_HALF_WIDTH: f32 = 0.18;
const TRENCH_DEPTH: f32 = 180.0;
const TRENCH_EXPONENT: f32 = 1.2;
const TRENCH_TERRACES: f32 = 6.0;

/// Falloff scale for blast deformation depth
const DEFORM_DEPTH_SCALE: f32 = 0.6;

/// Landscape types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LandscapeKind {
    #[default]
    Earth,
    Moon,
    Mars,
}

impl LandscapeKind {
    pub const ALL: [LandscapeKind; 3] = [LandscapeKind::Earth, LandscapeKind::Moon, LandscapeKind::Mars];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandscapeKind::Earth => "Earth",
            LandscapeKind::Moon => "Moon",
            LandscapeKind::Mars => "Mars",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "earth" => Some(LandscapeKind::Earth),
            "moon" => Some(LandscapeKind::Moon),
            "mars" => Some(LandscapeKind::Mars),
            _ => None,
        }
    }

    /// Fixed gravity for this landscape
    pub fn gravity(&self) -> f32 {
        match self {
            LandscapeKind::Earth => EARTH_GRAVITY,
            LandscapeKind::Moon => MOON_GRAVITY,
            LandscapeKind::Mars => MARS_GRAVITY,
        }
    }
}

/// Destructible 1D heightmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub width: usize,
    pub height: f32,
    /// Ground y per integer column (`samples.len() == width`)
    pub samples: Vec<f32>,
}

impl Terrain {
    /// Flat terrain with every column at `ground_y`
    pub fn flat(width: usize, height: f32, ground_y: f32) -> Self {
        Self {
            width,
            height,
            samples: vec![ground_y; width],
        }
    }

    /// Generate a terrain for the given landscape.
    ///
    /// Shape comes from the landscape profile plus noise, then every column is
    /// remapped into `[0.35 * height, 0.80 * height]`.
    pub fn generate<R: Rng>(width: usize, height: f32, kind: LandscapeKind, rng: &mut R) -> Self {
        let mut samples: Vec<f32> = (0..width)
            .map(|x| {
                let xf = x as f32;
                let noise = (xf * 0.15).sin() * 3.0 + rng.random_range(-NOISE_JITTER..=NOISE_JITTER);
                base_profile(kind, xf, width as f32) + noise
            })
            .collect();

        normalize_into(&mut samples, height * GROUND_TOP, height * GROUND_BOTTOM);

        log::debug!("Generated {} terrain ({}x{})", kind.as_str(), width, height);

        Self {
            width,
            height,
            samples,
        }
    }

    /// Ground y under horizontal position `x`.
    ///
    /// Off-map positions report the bottom of the world.
    pub fn ground_at(&self, x: f32) -> f32 {
        if x < 0.0 || x >= self.width as f32 {
            return self.height;
        }
        self.samples
            .get(x as usize)
            .copied()
            .unwrap_or(self.height)
    }

    /// Lower the ground around a blast centre.
    ///
    /// Each column within `radius` horizontally whose ground point lies inside
    /// the blast circle sinks by `(1 - d²/r²) * r * 0.6`.
    pub fn deform(&mut self, center: Vec2, radius: f32) {
        if radius <= 0.0 || self.width == 0 {
            return;
        }
        let last = (self.width - 1) as f32;
        let start = (center.x - radius).floor().max(0.0);
        let end = (center.x + radius).ceil().min(last);
        if start > end {
            return;
        }

        let r2 = radius * radius;
        for x in start as usize..=end as usize {
            let dx = x as f32 - center.x;
            let dy = self.samples[x] - center.y;
            let d2 = dx * dx + dy * dy;
            if d2 < r2 {
                self.samples[x] += (1.0 - d2 / r2) * radius * DEFORM_DEPTH_SCALE;
            }
        }
    }

    /// Resting y for a tank centre at `x`
    pub fn tank_rest_y(&self, x: f32) -> f32 {
        self.ground_at(x) - TANK_OFFSET
    }
}

/// Noise-free landscape shape at column `x` (sample space: positive = deeper)
pub fn base_profile(kind: LandscapeKind, x: f32, width: f32) -> f32 {
    match kind {
        LandscapeKind::Earth => (x * 0.008 + 0.5).sin() * 60.0 + (x * 0.023 + 1.7).sin() * 25.0,
        LandscapeKind::Moon => {
            let hills = (x * 0.011).sin() * 10.0 + (x * 0.029 + 0.8).sin() * 5.0;
            hills + moon_crater(x, width)
        }
        LandscapeKind::Mars => {
            let hills = (x * 0.010).sin() * 8.0 + (x * 0.027 + 2.1).sin() * 4.0;
            hills + mars_trench(x, width)
        }
    }
}

/// Gaussian bowl plus a raised rim at the bowl edge
fn moon_crater(x: f32, width: f32) -> f32 {
    let radius = width * CRATER_RADIUS;
    let dx = x - width * CRATER_CENTER;

    let sigma = radius * 0.5;
    let bowl = CRATER_DEPTH * (-(dx / sigma).powi(2)).exp();

    let rim_offset = (dx.abs() - radius) / (width * CRATER_RIM_WIDTH);
    let rim = CRATER_RIM_HEIGHT * (-rim_offset.powi(2)).exp();

    bowl - rim
}

/// Terraced trench: power-curve depth quantized into discrete steps
fn mars_trench(x: f32, width: f32) -> f32 {
    let half_width = width * TRENCH_HALF_WIDTH;
    let dx = (x - width * TRENCH_CENTER).abs();
    if dx >= half_width || half_width <= 0.0 {
        return 0.0;
    }
    let t = 1.0 - dx / half_width;
    let stepped = (t.powf(TRENCH_EXPONENT) * TRENCH_TERRACES).ceil() / TRENCH_TERRACES;
    stepped * TRENCH_DEPTH
}

/// Min-max normalize `values` into `[lo, hi]`
fn normalize_into(values: &mut [f32], lo: f32, hi: f32) {
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(mn, mx), &v| (mn.min(v), mx.max(v)));

    let range = max - min;
    if !range.is_finite() || range < 1e-6 {
        let mid = (lo + hi) / 2.0;
        values.iter_mut().for_each(|v| *v = mid);
        return;
    }

    for v in values.iter_mut() {
        *v = lo + (*v - min) / range * (hi - lo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const W: usize = 1200;
    const H: f32 = 700.0;

    fn mean(values: &[f32]) -> f32 {
        values.iter().sum::<f32>() / values.len() as f32
    }

    fn std_dev(values: &[f32]) -> f32 {
        let m = mean(values);
        (values.iter().map(|v| (v - m).powi(2)).sum::<f32>() / values.len() as f32).sqrt()
    }

    #[test]
    fn test_generate_length_and_band() {
        for (seed, kind) in LandscapeKind::ALL.iter().enumerate() {
            let mut rng = Pcg32::seed_from_u64(seed as u64 + 7);
            let terrain = Terrain::generate(W, H, *kind, &mut rng);
            assert_eq!(terrain.samples.len(), W);
            for &s in &terrain.samples {
                assert!(s >= H * GROUND_TOP - 1e-3, "{:?} sample {} above band", kind, s);
                assert!(s <= H * GROUND_BOTTOM + 1e-3, "{:?} sample {} below band", kind, s);
            }
        }
    }

    #[test]
    fn test_moon_crater_is_deepest_near_center() {
        let mut rng = Pcg32::seed_from_u64(42);
        let terrain = Terrain::generate(W, H, LandscapeKind::Moon, &mut rng);

        let center: Vec<f32> = terrain.samples[(W * 47 / 100)..(W * 57 / 100)].to_vec();
        let background: Vec<f32> = terrain
            .samples
            .iter()
            .enumerate()
            .filter(|(x, _)| *x < W * 20 / 100 || *x > W * 84 / 100)
            .map(|(_, &s)| s)
            .collect();

        // Larger sample = deeper ground
        let margin = mean(&center) - mean(&background);
        assert!(margin > 2.0 * std_dev(&background), "crater margin {} too small", margin);
    }

    #[test]
    fn test_mars_trench_has_terraces() {
        let w = W as f32;
        let mut levels: Vec<f32> = (0..W)
            .map(|x| mars_trench(x as f32, w))
            .filter(|&d| d > 0.0)
            .collect();
        levels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        levels.dedup_by(|a, b| (*a - *b).abs() < 1e-3);
        assert!(levels.len() >= 3, "only {} terrace levels", levels.len());

        // Terraces are plateaus: most neighbouring columns share a level
        let start = (w * (TRENCH_CENTER - TRENCH_HALF_WIDTH)) as usize + 1;
        let end = (w * (TRENCH_CENTER + TRENCH_HALF_WIDTH)) as usize;
        let steps = (start..end)
            .filter(|&x| (mars_trench(x as f32, w) - mars_trench(x as f32 + 1.0, w)).abs() > 1e-3)
            .count();
        assert!(steps <= 2 * TRENCH_TERRACES as usize + 2);
    }

    #[test]
    fn test_generated_mars_keeps_terraces() {
        let w = W as f32;
        let center = w * TRENCH_CENTER;
        let half = w * TRENCH_HALF_WIDTH;
        // Column for a trench depth fraction `t` on the right-hand wall
        let column = |t: f32| (center + (1.0 - t) * half) as usize;

        for seed in 0..5 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let terrain = Terrain::generate(W, H, LandscapeKind::Mars, &mut rng);

            // Median ground over the middle half of each terrace
            let levels: Vec<f32> = (1..=TRENCH_TERRACES as usize)
                .map(|k| {
                    let t_lo = ((k - 1) as f32 / TRENCH_TERRACES).powf(1.0 / TRENCH_EXPONENT);
                    let t_hi = (k as f32 / TRENCH_TERRACES).powf(1.0 / TRENCH_EXPONENT);
                    let span = t_hi - t_lo;
                    let mut cols = terrain.samples[column(t_hi - span * 0.25)..=column(t_lo + span * 0.25)].to_vec();
                    cols.sort_by(f32::total_cmp);
                    cols[cols.len() / 2]
                })
                .collect();

            let plateaus = 1 + levels.windows(2).filter(|pair| pair[1] - pair[0] > 20.0).count();
            assert!(plateaus >= 3, "seed {seed}: levels {levels:?}");
        }
    }

    #[test]
    fn test_mars_trench_deeper_than_surroundings() {
        let mut rng = Pcg32::seed_from_u64(3);
        let terrain = Terrain::generate(W, H, LandscapeKind::Mars, &mut rng);
        let trench = mean(&terrain.samples[(W * 57 / 100)..(W * 63 / 100)]);
        let plain = mean(&terrain.samples[..(W * 30 / 100)]);
        assert!(trench > plain + 50.0);
    }

    #[test]
    fn test_normalize_degenerate_input() {
        let mut values = vec![3.0; 10];
        normalize_into(&mut values, 100.0, 200.0);
        assert!(values.iter().all(|&v| (v - 150.0).abs() < 1e-6));
    }

    #[test]
    fn test_ground_at_out_of_bounds() {
        let terrain = Terrain::flat(100, 500.0, 300.0);
        assert_eq!(terrain.ground_at(50.5), 300.0);
        assert_eq!(terrain.ground_at(-1.0), 500.0);
        assert_eq!(terrain.ground_at(100.0), 500.0);
    }

    #[test]
    fn test_deform_sinks_ground_at_center() {
        let mut terrain = Terrain::flat(200, 500.0, 300.0);
        terrain.deform(Vec2::new(100.0, 300.0), 22.0);
        // Dead centre sinks by the full r * 0.6
        assert!((terrain.samples[100] - (300.0 + 22.0 * 0.6)).abs() < 1e-4);
        // Outside the radius is untouched
        assert_eq!(terrain.samples[70], 300.0);
        assert_eq!(terrain.samples[130], 300.0);
    }

    #[test]
    fn test_deform_near_edges() {
        let mut terrain = Terrain::flat(50, 500.0, 300.0);
        terrain.deform(Vec2::new(-5.0, 300.0), 22.0);
        terrain.deform(Vec2::new(60.0, 300.0), 22.0);
        assert_eq!(terrain.samples.len(), 50);
        assert!(terrain.samples[0] > 300.0);
        assert!(terrain.samples[49] > 300.0);
        // Entirely off-map does nothing
        let before = terrain.samples.clone();
        terrain.deform(Vec2::new(-100.0, 300.0), 22.0);
        assert_eq!(before, terrain.samples);
    }

    proptest! {
        #[test]
        fn prop_deform_never_raises_ground(
            seed in any::<u64>(),
            cx in -50.0f32..350.0,
            cy in 0.0f32..500.0,
            radius in 1.0f32..90.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut terrain = Terrain::generate(300, 500.0, LandscapeKind::Earth, &mut rng);
            let before = terrain.samples.clone();
            terrain.deform(Vec2::new(cx, cy), radius);
            prop_assert_eq!(terrain.samples.len(), before.len());
            for (after, before) in terrain.samples.iter().zip(before.iter()) {
                prop_assert!(after >= before);
            }
        }
    }
}
