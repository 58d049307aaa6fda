//! Conversion counters.
//!
//! Each per-set conversion returns its own [`ConversionStats`]; a batch sums
//! them, which keeps parallel runs free of shared counters.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub specular_converted: usize,
    pub normal_converted: usize,
    pub mer_generated: usize,
    pub texture_sets_created: usize,
    pub errors: usize,
}

impl ConversionStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Number of files written (derived maps plus descriptors)
    pub fn files_written(&self) -> usize {
        self.mer_generated + self.normal_converted + self.texture_sets_created
    }
}

impl Add for ConversionStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for ConversionStats {
    fn add_assign(&mut self, rhs: Self) {
        self.specular_converted += rhs.specular_converted;
        self.normal_converted += rhs.normal_converted;
        self.mer_generated += rhs.mer_generated;
        self.texture_sets_created += rhs.texture_sets_created;
        self.errors += rhs.errors;
    }
}

impl Sum for ConversionStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_stats_reduce() {
        let a = ConversionStats {
            specular_converted: 1,
            mer_generated: 1,
            texture_sets_created: 1,
            ..Default::default()
        };
        let b = ConversionStats {
            normal_converted: 1,
            errors: 2,
            ..Default::default()
        };

        let total: ConversionStats = [a, b, a].into_iter().sum();
        assert_eq!(total.specular_converted, 2);
        assert_eq!(total.normal_converted, 1);
        assert_eq!(total.mer_generated, 2);
        assert_eq!(total.texture_sets_created, 2);
        assert_eq!(total.errors, 2);
        assert_eq!(total.files_written(), 5);
        assert!(total.has_errors());
    }

    #[test]
    fn reset_clears_counters() {
        let mut stats = ConversionStats {
            errors: 3,
            normal_converted: 4,
            ..Default::default()
        };
        stats.reset();
        assert_eq!(stats, ConversionStats::default());
    }
}
