//! # Seeds and Simplex Noise
//!
//! Deterministic seeding and coherent noise for room generation.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`RoomSeed`], every stream derived from it and every
//! noise field built from those streams produces **exactly** the same
//! values on any platform, any time.

use rand::Rng;

use crate::error::{ProcgenError, ProcgenResult};

/// Exclusive upper bound of the room seed domain.
///
/// Session seeds are drawn uniformly from `[0, SEED_CEILING)`.
pub const SEED_CEILING: u32 = 9_999_999;

/// Stream purpose for the boundary-shape noise field.
pub const STREAM_SHAPE: u64 = 1;
/// Stream purpose for the first content field (water by default).
pub const STREAM_FIELD_A: u64 = 2;
/// Stream purpose for the second content field (lava by default).
pub const STREAM_FIELD_B: u64 = 3;
/// Stream purpose for weighted piece selection.
pub const STREAM_PIECES: u64 = 4;

/// Seed for one generated room.
///
/// All randomness used to build a room derives from this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomSeed(u32);

impl RoomSeed {
    /// Creates a room seed, rejecting values outside `[0, SEED_CEILING)`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcgenError::SeedOutOfRange`] for negative values and for
    /// values at or above the ceiling. Values are never clamped or wrapped.
    pub fn new(value: i64) -> ProcgenResult<Self> {
        match u32::try_from(value) {
            Ok(v) if v < SEED_CEILING => Ok(Self(v)),
            _ => Err(ProcgenError::SeedOutOfRange {
                value,
                ceiling: SEED_CEILING,
            }),
        }
    }

    /// Draws a uniform seed from `[0, SEED_CEILING)`.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..SEED_CEILING))
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Derives an independent 64-bit stream seed for a specific purpose.
    ///
    /// FNV-style mixing keeps streams for different purposes decorrelated.
    #[inline]
    #[must_use]
    pub const fn stream(self, purpose: u64) -> u64 {
        let mut hash = 0xcbf2_9ce4_8422_2325_u64 ^ (self.0 as u64);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        hash
    }
}

impl std::fmt::Display for RoomSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pre-computed permutation table for noise.
///
/// Built once per field from its stream seed.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    /// 12 gradient vectors for 2D simplex.
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 0], [1, 1], [0, 1], [-1, 1],
        [-1, 0], [-1, -1], [0, -1], [1, -1],
        [1, 0], [0, 1], [-1, 0], [0, -1],
    ];

    fn new(stream_seed: u64) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // xorshift64 has a fixed point at zero
        let mut state = if stream_seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            stream_seed
        };

        // Fisher-Yates shuffle
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// 2D Simplex noise field.
///
/// Produces smooth, continuous values in `[-1, 1]` ([`sample`](Self::sample))
/// or `[0, 1]` ([`sample01`](Self::sample01)).
///
/// # Example
///
/// ```rust
/// use delve_procedural::noise::{RoomSeed, SimplexNoise, STREAM_SHAPE};
///
/// let seed = RoomSeed::new(42).unwrap();
/// let noise = SimplexNoise::new(seed.stream(STREAM_SHAPE));
/// let value = noise.sample01(3.5, 7.25);
/// assert!((0.0..=1.0).contains(&value));
/// ```
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a noise field from a stream seed.
    #[must_use]
    pub fn new(stream_seed: u64) -> Self {
        Self {
            perm_table: PermutationTable::new(stream_seed),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Skew input coordinates to simplex grid
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let table = &self.perm_table;
        let gi0 = table.get(ii + table.get(jj) as usize);
        let gi1 = table.get(ii + i1 + table.get(jj + j1) as usize);
        let gi2 = table.get(ii + 1 + table.get(jj + 1) as usize);

        let n0 = Self::contribution(x0, y0, gi0);
        let n1 = Self::contribution(x1, y1, gi1);
        let n2 = Self::contribution(x2, y2, gi2);

        // 70.0 normalizes the output to [-1, 1]
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Samples the field and maps it to `[0, 1]`.
    ///
    /// Classification thresholds are expressed on this scale.
    #[inline]
    #[must_use]
    pub fn sample01(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) * 0.5
    }

    #[inline]
    fn contribution(x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }
}

#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_seed_domain() {
        assert_eq!(RoomSeed::new(0).unwrap().value(), 0);
        assert_eq!(
            RoomSeed::new(i64::from(SEED_CEILING) - 1).unwrap().value(),
            SEED_CEILING - 1
        );
        assert!(matches!(
            RoomSeed::new(-1),
            Err(ProcgenError::SeedOutOfRange { value: -1, .. })
        ));
        assert!(RoomSeed::new(i64::from(SEED_CEILING)).is_err());
        assert!(RoomSeed::new(i64::MAX).is_err());
    }

    #[test]
    fn test_drawn_seeds_stay_in_domain() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        for _ in 0..1_000 {
            assert!(RoomSeed::draw(&mut rng).value() < SEED_CEILING);
        }
    }

    #[test]
    fn test_determinism() {
        let seed = RoomSeed::new(12345).unwrap();
        let noise1 = SimplexNoise::new(seed.stream(STREAM_SHAPE));
        let noise2 = SimplexNoise::new(seed.stream(STREAM_SHAPE));

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(noise1.sample(x, y), noise2.sample(x, y));
        }
    }

    #[test]
    fn test_different_streams_differ() {
        let seed = RoomSeed::new(7).unwrap();
        let a = SimplexNoise::new(seed.stream(STREAM_FIELD_A));
        let b = SimplexNoise::new(seed.stream(STREAM_FIELD_B));

        let differing = (0..50)
            .filter(|i| {
                let x = f64::from(*i) * 0.37 + 0.11;
                a.sample(x, x * 0.5) != b.sample(x, x * 0.5)
            })
            .count();
        assert!(differing > 40, "streams should be decorrelated");
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let noise = SimplexNoise::new(0);
        let spread: Vec<f64> = (0..20)
            .map(|i| noise.sample(f64::from(i) * 0.31, 1.7))
            .collect();
        assert!(spread.iter().any(|v| *v != spread[0]));
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(RoomSeed::new(42).unwrap().stream(STREAM_SHAPE));

        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "{value} out of range");
            let unit = noise.sample01(x, y);
            assert!((0.0..=1.0).contains(&unit), "{unit} out of range");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = SimplexNoise::new(42);
        let v1 = noise.sample(10.0, 10.0);
        let v2 = noise.sample(10.001, 10.0);
        assert!((v1 - v2).abs() < 0.01, "noise should be continuous");
    }

    #[test]
    fn test_stream_derivation() {
        let base = RoomSeed::new(42).unwrap();
        assert_ne!(base.stream(1), base.stream(2));
        assert_eq!(base.stream(1), base.stream(1));
        assert_ne!(base.stream(1), RoomSeed::new(43).unwrap().stream(1));
    }
}
