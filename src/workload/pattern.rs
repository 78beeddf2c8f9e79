//! Access pattern tags and their configuration

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;
use crate::workload::generator::is_power_of_two;

/// Shape of a generated workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternType {
    Random,
    MonotonicIncreasing,
    MonotonicDecreasing,
    Hotspot,
    Zigzag,
    BitReversal,
}

impl PatternType {
    pub const ALL: [PatternType; 6] = [
        PatternType::Random,
        PatternType::MonotonicIncreasing,
        PatternType::MonotonicDecreasing,
        PatternType::Hotspot,
        PatternType::Zigzag,
        PatternType::BitReversal,
    ];

    /// Tag used on the command line and as a results directory name
    pub fn as_str(self) -> &'static str {
        match self {
            PatternType::Random => "random",
            PatternType::MonotonicIncreasing => "monotonic_inc",
            PatternType::MonotonicDecreasing => "monotonic_dec",
            PatternType::Hotspot => "hotspot",
            PatternType::Zigzag => "zigzag",
            PatternType::BitReversal => "bit_reversal",
        }
    }

    /// Exact permutations of `[1, size]`; the others sample with repetition
    pub fn is_permutation(self) -> bool {
        !matches!(self, PatternType::Random | PatternType::Hotspot)
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnsupportedType(s.to_string()))
    }
}

/// Parameters of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct PatternConfig {
    pub pattern: PatternType,
    pub size: usize,
    /// Only read by `Hotspot`
    pub hotspot_count: usize,
    /// Only read by `Hotspot`
    pub hotspot_ratio: f64,
}

impl PatternConfig {
    pub const DEFAULT_HOTSPOTS: usize = 5;
    pub const DEFAULT_RATIO: f64 = 0.8;

    pub fn new(pattern: PatternType, size: usize) -> Self {
        Self {
            pattern,
            size,
            hotspot_count: Self::DEFAULT_HOTSPOTS,
            hotspot_ratio: Self::DEFAULT_RATIO,
        }
    }

    pub fn with_hotspots(mut self, count: usize, ratio: f64) -> Self {
        self.hotspot_count = count;
        self.hotspot_ratio = ratio;
        self
    }

    /// Check the invariants the selected pattern depends on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.size == 0 {
            return Err(ConfigurationError::ZeroSize);
        }
        match self.pattern {
            PatternType::BitReversal if !is_power_of_two(self.size) => {
                Err(ConfigurationError::NonPowerOfTwoSize(self.size))
            }
            PatternType::Hotspot => validate_hotspot(self.size, self.hotspot_count, self.hotspot_ratio),
            _ => Ok(()),
        }
    }
}

pub(crate) fn validate_hotspot(
    size: usize,
    count: usize,
    ratio: f64,
) -> Result<(), ConfigurationError> {
    // NaN fails the range check too
    if !(0.0..=1.0).contains(&ratio) {
        return Err(ConfigurationError::RatioOutOfRange(ratio));
    }
    if count > size {
        return Err(ConfigurationError::TooManyHotspots { count, size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for p in PatternType::ALL {
            assert_eq!(p.as_str().parse::<PatternType>().unwrap(), p);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = "spiral".parse::<PatternType>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnsupportedType("spiral".into()));
    }

    #[test]
    fn test_bit_reversal_requires_power_of_two() {
        let cfg = PatternConfig::new(PatternType::BitReversal, 10);
        assert_eq!(
            cfg.validate(),
            Err(ConfigurationError::NonPowerOfTwoSize(10))
        );
        assert!(PatternConfig::new(PatternType::BitReversal, 16).validate().is_ok());
        // Other patterns accept any positive size
        assert!(PatternConfig::new(PatternType::Zigzag, 10).validate().is_ok());
    }

    #[test]
    fn test_hotspot_validation() {
        let base = PatternConfig::new(PatternType::Hotspot, 8);
        assert!(base.clone().with_hotspots(8, 1.0).validate().is_ok());
        assert_eq!(
            base.clone().with_hotspots(9, 0.5).validate(),
            Err(ConfigurationError::TooManyHotspots { count: 9, size: 8 })
        );
        assert!(matches!(
            base.clone().with_hotspots(2, 1.5).validate(),
            Err(ConfigurationError::RatioOutOfRange(_))
        ));
        assert!(base.with_hotspots(2, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            PatternConfig::new(PatternType::MonotonicIncreasing, 0).validate(),
            Err(ConfigurationError::ZeroSize)
        );
    }
}
