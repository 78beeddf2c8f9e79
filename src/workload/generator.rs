//! Sequence Generator
//!
//! Builds the access workloads for the BST experiments. Deterministic
//! patterns are free functions; the stochastic ones draw from the RNG owned
//! by a [`SequenceGenerator`], so two generators built from the same seed
//! emit identical sequences.
//!
//! # Example
//!
//! ```rust,ignore
//! use bst_workbench::workload::{PatternConfig, PatternType, SequenceGenerator};
//!
//! let mut generator = SequenceGenerator::seeded(42);
//! let seq = generator.generate(&PatternConfig::new(PatternType::Hotspot, 1024))?;
//! ```

use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};

use crate::core_types::{Key, Sequence};
use crate::error::ConfigurationError;
use crate::workload::pattern::{PatternConfig, PatternType, validate_hotspot};

/// `n & (n - 1) == 0` with 0 excluded
#[inline]
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Reverse the low `bits` bits of `i`.
#[inline]
pub fn bit_reverse(i: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    i.reverse_bits() >> (usize::BITS - bits)
}

/// `[1..=size]` ascending, or descending when `increasing` is false
pub fn monotonic(size: usize, increasing: bool) -> Sequence {
    let top = size as Key;
    if increasing {
        (1..=top).collect()
    } else {
        (1..=top).rev().collect()
    }
}

/// Bit-reversal permutation of `[1, size]`.
///
/// Index `i` maps to `reverse(i, log2(size)) + 1`. Since reversal is an
/// involution on `[0, size)` the result is a bijection onto `[1, size]`.
pub fn bit_reversal(size: usize) -> Result<Sequence, ConfigurationError> {
    if !is_power_of_two(size) {
        return Err(ConfigurationError::NonPowerOfTwoSize(size));
    }
    let bits = size.trailing_zeros();
    Ok((0..size)
        .map(|i| bit_reverse(i, bits) as Key + 1)
        .collect())
}

/// Alternate smallest and largest unused key, moving inward.
///
/// `zigzag(6) == [1, 6, 2, 5, 3, 4]`
pub fn zigzag(size: usize) -> Sequence {
    let mut seq = Vec::with_capacity(size);
    let (mut left, mut right) = (1 as Key, size as Key);
    while left <= right {
        seq.push(left);
        left += 1;
        if left <= right {
            seq.push(right);
            right -= 1;
        }
    }
    seq
}

/// Hotspot output together with the hot set it was biased towards
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotWorkload {
    pub hot_keys: Vec<Key>,
    pub sequence: Sequence,
}

/// Workload generator owning an injected RNG.
///
/// Each instance is independent; nothing is shared between generators.
#[derive(Debug, Clone)]
pub struct SequenceGenerator<R = StdRng> {
    rng: R,
}

impl SequenceGenerator<StdRng> {
    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> SequenceGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// `size` distinct keys from `[1, size]` in random order
    pub fn random(&mut self, size: usize) -> Result<Sequence, ConfigurationError> {
        self.random_in_range(size, 1..size as Key + 1)
    }

    /// `size` distinct keys drawn without replacement from `range`
    pub fn random_in_range(
        &mut self,
        size: usize,
        range: Range<Key>,
    ) -> Result<Sequence, ConfigurationError> {
        if range.start == 0 || range.is_empty() {
            return Err(ConfigurationError::InvalidKeyRange {
                start: range.start,
                end: range.end,
            });
        }
        let available = range.end - range.start;
        // A range wider than usize can always satisfy an in-memory request
        let length = usize::try_from(available).unwrap_or(usize::MAX);
        if size > length {
            return Err(ConfigurationError::SampleExceedsRange {
                requested: size,
                available,
            });
        }
        Ok(index::sample(&mut self.rng, length, size)
            .into_iter()
            .map(|offset| range.start + offset as Key)
            .collect())
    }

    /// Biased sampling towards `count` random hot keys.
    ///
    /// Each position independently takes a hot key with probability `ratio`,
    /// otherwise any key from `[1, size]`. Values repeat; length is `size`.
    pub fn hotspot(
        &mut self,
        size: usize,
        count: usize,
        ratio: f64,
    ) -> Result<Sequence, ConfigurationError> {
        Ok(self.hotspot_with_hot_set(size, count, ratio)?.sequence)
    }

    pub fn hotspot_with_hot_set(
        &mut self,
        size: usize,
        count: usize,
        ratio: f64,
    ) -> Result<HotspotWorkload, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::ZeroSize);
        }
        validate_hotspot(size, count, ratio)?;

        let hot_keys: Vec<Key> = index::sample(&mut self.rng, size, count)
            .into_iter()
            .map(|i| i as Key + 1)
            .collect();
        let top = size as Key;
        let mut sequence = Vec::with_capacity(size);
        for _ in 0..size {
            let hot = if self.rng.r#gen::<f64>() < ratio {
                // None for an empty hot set: falls through to uniform
                hot_keys.choose(&mut self.rng).copied()
            } else {
                None
            };
            sequence.push(hot.unwrap_or_else(|| self.rng.gen_range(1..=top)));
        }
        Ok(HotspotWorkload { hot_keys, sequence })
    }

    /// Validate `config` and build the sequence it describes.
    pub fn generate(&mut self, config: &PatternConfig) -> Result<Sequence, ConfigurationError> {
        config.validate()?;
        let seq = match config.pattern {
            PatternType::Random => self.random(config.size)?,
            PatternType::MonotonicIncreasing => monotonic(config.size, true),
            PatternType::MonotonicDecreasing => monotonic(config.size, false),
            PatternType::Hotspot => {
                self.hotspot(config.size, config.hotspot_count, config.hotspot_ratio)?
            }
            PatternType::Zigzag => zigzag(config.size),
            PatternType::BitReversal => bit_reversal(config.size)?,
        };
        tracing::debug!(pattern = %config.pattern, size = seq.len(), "sequence generated");
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation_of_1_to_n(seq: &[Key]) -> bool {
        let mut sorted = seq.to_vec();
        sorted.sort_unstable();
        sorted.iter().copied().eq(1..=seq.len() as Key)
    }

    #[test]
    fn test_power_of_two() {
        assert!(!is_power_of_two(0));
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(10));
        assert!(!is_power_of_two(1023));
    }

    #[test]
    fn test_bit_reverse_low_bits() {
        assert_eq!(bit_reverse(0b001, 3), 0b100);
        assert_eq!(bit_reverse(0b110, 3), 0b011);
        assert_eq!(bit_reverse(5, 0), 0);
    }

    #[test]
    fn test_bit_reversal_8_known_value() {
        assert_eq!(bit_reversal(8).unwrap(), vec![1, 5, 3, 7, 2, 6, 4, 8]);
    }

    #[test]
    fn test_bit_reversal_is_bijection() {
        for shift in 0..=14 {
            let n = 1usize << shift;
            let seq = bit_reversal(n).unwrap();
            assert_eq!(seq.len(), n);
            assert!(is_permutation_of_1_to_n(&seq), "n = {}", n);
        }
    }

    #[test]
    fn test_bit_reversal_rejects_non_power_of_two() {
        assert_eq!(
            bit_reversal(10),
            Err(ConfigurationError::NonPowerOfTwoSize(10))
        );
        assert_eq!(bit_reversal(0), Err(ConfigurationError::NonPowerOfTwoSize(0)));
    }

    #[test]
    fn test_zigzag() {
        assert_eq!(zigzag(6), vec![1, 6, 2, 5, 3, 4]);
        assert_eq!(zigzag(5), vec![1, 5, 2, 4, 3]);
        assert_eq!(zigzag(1), vec![1]);
        assert!(zigzag(0).is_empty());
        assert!(is_permutation_of_1_to_n(&zigzag(1001)));
    }

    #[test]
    fn test_monotonic() {
        assert_eq!(monotonic(4, true), vec![1, 2, 3, 4]);
        assert_eq!(monotonic(4, false), vec![4, 3, 2, 1]);
        let mut rev = monotonic(100, false);
        rev.reverse();
        assert_eq!(rev, monotonic(100, true));
    }

    #[test]
    fn test_random_is_permutation_and_reproducible() {
        let a = SequenceGenerator::seeded(7).random(512).unwrap();
        let b = SequenceGenerator::seeded(7).random(512).unwrap();
        assert_eq!(a, b);
        assert!(is_permutation_of_1_to_n(&a));
        // Shuffled, not identity
        assert_ne!(a, monotonic(512, true));
    }

    #[test]
    fn test_random_in_custom_range() {
        let mut generator = SequenceGenerator::seeded(3);
        let seq = generator.random_in_range(50, 100..200).unwrap();
        assert_eq!(seq.len(), 50);
        assert!(seq.iter().all(|k| (100..200).contains(k)));
        let mut dedup = seq.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 50);
    }

    #[test]
    fn test_random_sample_exceeding_range_fails() {
        let mut generator = SequenceGenerator::seeded(3);
        assert_eq!(
            generator.random_in_range(11, 1..11),
            Err(ConfigurationError::SampleExceedsRange {
                requested: 11,
                available: 10
            })
        );
        assert!(matches!(
            generator.random_in_range(1, 0..5),
            Err(ConfigurationError::InvalidKeyRange { .. })
        ));
    }

    #[test]
    fn test_hotspot_shape() {
        let mut generator = SequenceGenerator::seeded(11);
        let w = generator.hotspot_with_hot_set(1000, 5, 0.8).unwrap();
        assert_eq!(w.sequence.len(), 1000);
        assert_eq!(w.hot_keys.len(), 5);
        assert!(w.sequence.iter().all(|&k| (1..=1000).contains(&k)));
        let mut hot = w.hot_keys.clone();
        hot.sort_unstable();
        hot.dedup();
        assert_eq!(hot.len(), 5, "hot set must be distinct");
    }

    #[test]
    fn test_hotspot_ratio_one_stays_in_hot_set() {
        let mut generator = SequenceGenerator::seeded(5);
        let w = generator.hotspot_with_hot_set(256, 3, 1.0).unwrap();
        assert!(w.sequence.iter().all(|k| w.hot_keys.contains(k)));
    }

    #[test]
    fn test_hotspot_without_hot_keys_is_uniform() {
        let mut generator = SequenceGenerator::seeded(5);
        let w = generator.hotspot_with_hot_set(64, 0, 0.9).unwrap();
        assert!(w.hot_keys.is_empty());
        assert_eq!(w.sequence.len(), 64);
    }

    #[test]
    fn test_generate_dispatch() {
        let mut generator = SequenceGenerator::seeded(1);
        let cfg = PatternConfig::new(PatternType::BitReversal, 8);
        assert_eq!(generator.generate(&cfg).unwrap(), bit_reversal(8).unwrap());
        let cfg = PatternConfig::new(PatternType::MonotonicDecreasing, 3);
        assert_eq!(generator.generate(&cfg).unwrap(), vec![3, 2, 1]);
        let cfg = PatternConfig::new(PatternType::BitReversal, 12);
        assert!(generator.generate(&cfg).is_err());
    }
}
