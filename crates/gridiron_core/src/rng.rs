//! Deterministic random streams
//!
//! 모든 시뮬레이션 난수는 이 모듈을 거친다. 플랫폼 RNG는 사용하지 않는다.
//!
//! ## 구성
//! - [`mulberry32`]: 32-bit state stream, `[0, 1)` floats
//! - [`hash_seed`]: FNV-1a fold of any number of string/number parts
//! - [`rng`]: base seed + optional context key → independent sub-stream
//!
//! Each subsystem (a play, a game, the scheduler) derives its own stream
//! from the master seed with a context key, so adding draws in one subsystem
//! never shifts another subsystem's sequence.
//!
//! ```
//! use gridiron_core::rng::rng;
//!
//! let mut a = rng(424242, Some("schedule"));
//! let mut b = rng(424242, Some("schedule"));
//! assert_eq!(a.next_f64(), b.next_f64());
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;
/// Folded between parts so `["ab", "c"]` and `["a", "bc"]` differ.
const PART_SEPARATOR: u8 = 0x1F;
const TWO_POW_32: f64 = 4_294_967_296.0;

// ============================================================================
// Stream
// ============================================================================

/// Mulberry32 stream. Cheap to construct; create one per resolver call,
/// play or game and never share it between independent subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetRng {
    state: u32,
    draws: u64,
}

/// Build a Mulberry32 stream from a 32-bit seed.
pub fn mulberry32(seed: u32) -> DetRng {
    DetRng { state: seed, draws: 0 }
}

impl DetRng {
    /// Raw 32-bit output; advances the state once.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        self.draws += 1;
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Uniform float in `[lo, hi)`.
    #[inline]
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform integer in `[lo, hi]` (inclusive). Swapped bounds are accepted.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi as i64 - lo as i64 + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i64;
        (lo as i64 + offset).min(hi as i64) as i32
    }

    /// Bernoulli trial; always consumes exactly one draw.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Gaussian sample via Box–Muller. Always consumes exactly two draws.
    pub fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + sd * z
    }

    /// Pick one element uniformly. `None` for an empty slice (no draw taken).
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = ((self.next_f64() * items.len() as f64) as usize).min(items.len() - 1);
        items.get(idx)
    }

    /// In-place Fisher–Yates shuffle (descending index walk).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = ((self.next_f64() * (i + 1) as f64) as usize).min(i);
            items.swap(i, j);
        }
    }

    /// Number of draws taken so far. Useful for asserting fixed roll counts.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl rand::RngCore for DetRng {
    fn next_u32(&mut self) -> u32 {
        DetRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = DetRng::next_u32(self) as u64;
        let lo = DetRng::next_u32(self) as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = DetRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// ============================================================================
// Seed hashing
// ============================================================================

/// One component of a derived seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPart<'a> {
    Num(i64),
    Str(&'a str),
}

impl<'a> From<&'a str> for SeedPart<'a> {
    fn from(s: &'a str) -> Self {
        SeedPart::Str(s)
    }
}

impl<'a> From<&'a String> for SeedPart<'a> {
    fn from(s: &'a String) -> Self {
        SeedPart::Str(s.as_str())
    }
}

macro_rules! seed_part_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for SeedPart<'_> {
            fn from(n: $t) -> Self {
                SeedPart::Num(n as i64)
            }
        })*
    };
}

seed_part_from_int!(u8, u16, u32, u64, usize, i32, i64);

/// Build a `[SeedPart; N]` from mixed strings and integers.
///
/// ```
/// use gridiron_core::{rng::hash_seed, seed_parts};
/// let a = hash_seed(&seed_parts![7u32, "week", 3u16]);
/// let b = hash_seed(&seed_parts![7u32, "week", 3u16]);
/// assert_eq!(a, b);
/// ```
#[macro_export]
macro_rules! seed_parts {
    ($($part:expr),* $(,)?) => {
        [$($crate::rng::SeedPart::from($part)),*]
    };
}

#[inline]
fn fnv_fold(mut h: u32, bytes: &[u8]) -> u32 {
    for &b in bytes {
        h ^= b as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// murmur3 fmix32: spreads FNV's weak low bits before seeding.
#[inline]
fn avalanche(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}

/// Fold any number of parts into one 32-bit seed.
///
/// Numbers are normalized to `u32` (wrapping) before folding, so `-1` and
/// `u32::MAX` hash identically.
pub fn hash_seed(parts: &[SeedPart<'_>]) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            h = fnv_fold(h, &[PART_SEPARATOR]);
        }
        h = match part {
            SeedPart::Num(n) => fnv_fold(h, &normalize_seed(*n).to_le_bytes()),
            SeedPart::Str(s) => fnv_fold(h, s.as_bytes()),
        };
    }
    avalanche(h)
}

/// Coerce any integer seed to unsigned 32-bit.
#[inline]
pub fn normalize_seed(seed: i64) -> u32 {
    seed as u32
}

/// Stream for `(seed, context)`. Without a context the normalized seed is used
/// directly.
pub fn rng(seed: impl Into<i64>, context: Option<&str>) -> DetRng {
    let base = normalize_seed(seed.into());
    match context {
        Some(key) => mulberry32(hash_seed(&[SeedPart::Num(base as i64), SeedPart::Str(key)])),
        None => mulberry32(base),
    }
}

/// Stream keyed by an arbitrary list of parts, mixed with the base seed.
pub fn keyed_rng(seed: u32, parts: &[SeedPart<'_>]) -> DetRng {
    let mut all = Vec::with_capacity(parts.len() + 1);
    all.push(SeedPart::Num(seed as i64));
    all.extend_from_slice(parts);
    mulberry32(hash_seed(&all))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(r: &mut DetRng, n: usize) -> Vec<f64> {
        (0..n).map(|_| r.next_f64()).collect()
    }

    #[test]
    fn test_mulberry32_known_values() {
        // Reference outputs of the canonical mulberry32 for seed 1.
        let mut r = mulberry32(1);
        assert_eq!(r.next_u32(), 2_693_262_067);
        assert_eq!(r.next_u32(), 11_749_833);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        for seed in [0i64, 1, 42, 424242, -7, i64::from(u32::MAX)] {
            let a = take(&mut rng(seed, None), 64);
            let b = take(&mut rng(seed, None), 64);
            assert_eq!(a, b, "seed {seed}");
        }
    }

    #[test]
    fn test_outputs_in_unit_interval() {
        let mut r = rng(99, Some("unit"));
        for _ in 0..10_000 {
            let v = r.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_context_keys_diverge() {
        let keys = ["play:1", "play:2", "schedule", "coin-toss", "A", "B"];
        for (i, k1) in keys.iter().enumerate() {
            for k2 in keys.iter().skip(i + 1) {
                let a = take(&mut rng(424242, Some(k1)), 16);
                let b = take(&mut rng(424242, Some(k2)), 16);
                assert_ne!(a, b, "{k1} vs {k2}");
            }
        }
    }

    #[test]
    fn test_keyed_rng_mixes_seed_and_parts() {
        let a = take(&mut keyed_rng(5, &seed_parts!["aggregate", "NYG", "DAL"]), 8);
        assert_eq!(a, take(&mut keyed_rng(5, &seed_parts!["aggregate", "NYG", "DAL"]), 8));
        assert_ne!(a, take(&mut keyed_rng(5, &seed_parts!["aggregate", "DAL", "NYG"]), 8));
        assert_ne!(a, take(&mut keyed_rng(6, &seed_parts!["aggregate", "NYG", "DAL"]), 8));
        assert_eq!(
            take(&mut keyed_rng(5, &seed_parts!["x"]), 4),
            take(&mut mulberry32(hash_seed(&seed_parts![5u32, "x"])), 4)
        );
    }

    #[test]
    fn test_negative_seed_normalized() {
        let a = take(&mut rng(-1, None), 8);
        let b = take(&mut rng(i64::from(u32::MAX), None), 8);
        assert_eq!(a, b);
        assert_eq!(hash_seed(&seed_parts![-1i64]), hash_seed(&seed_parts![u32::MAX]));
    }

    #[test]
    fn test_hash_seed_separates_parts() {
        assert_ne!(hash_seed(&seed_parts!["ab", "c"]), hash_seed(&seed_parts!["a", "bc"]));
        assert_ne!(hash_seed(&seed_parts![1u32, "x"]), hash_seed(&seed_parts!["x", 1u32]));
    }

    #[test]
    fn test_uniform_mean() {
        let mut r = rng(7, Some("mean"));
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| r.next_f64()).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn test_range_i32_inclusive_bounds() {
        let mut r = rng(3, Some("range"));
        let mut seen = [false; 5];
        for _ in 0..2_000 {
            let v = r.range_i32(-2, 2);
            assert!((-2..=2).contains(&v));
            seen[(v + 2) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_normal_consumes_two_draws() {
        let mut r = rng(11, None);
        let _ = r.normal(0.0, 1.0);
        assert_eq!(r.draws(), 2);
    }

    #[test]
    fn test_shuffle_is_permutation_and_deterministic() {
        let mut a: Vec<u32> = (0..32).collect();
        let mut b = a.clone();
        rng(5, Some("shuffle")).shuffle(&mut a);
        rng(5, Some("shuffle")).shuffle(&mut b);
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_rng_core_drives_distributions() {
        use rand_distr::{Distribution, Normal};
        let normal = Normal::new(21.0, 7.0).unwrap();
        let mut a = rng(1, Some("dist"));
        let mut b = rng(1, Some("dist"));
        assert_eq!(normal.sample(&mut a), normal.sample(&mut b));
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: reconstruction always replays the same stream
            #[test]
            fn prop_rng_reproducible(seed in any::<i64>(), key in "[a-z]{1,8}") {
                let a = take(&mut rng(seed, Some(key.as_str())), 8);
                let b = take(&mut rng(seed, Some(key.as_str())), 8);
                prop_assert_eq!(a, b);
            }
        }
    }
}
