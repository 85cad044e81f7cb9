//! Weighted ranges: one slice of the cumulative weight axis and its value.

use crate::error::RouletteError;
use crate::rng::check_interval;

/// Where a sampled point lies relative to a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The whole range lies below the point (`max < r`).
    Below,
    /// The whole range lies above the point (`min > r`).
    Above,
    /// `min <= r <= max`.
    Contains,
}

/// A `[min, max)` slice of cumulative weight mapped to one stored value.
///
/// Classification treats both endpoints as inclusive, so two adjacent ranges
/// both claim their shared boundary. Which one wins a roll that lands exactly
/// on it depends on the search path. Sources sample `[0, total)`, which keeps
/// the last range's upper bound out of reach.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRange<T> {
    min: f64,
    max: f64,
    value: T,
}

impl<T> WeightedRange<T> {
    /// Fails with [`RouletteError::InvalidRange`] unless `min < max` and both
    /// bounds are finite.
    pub fn new(min: f64, max: f64, value: T) -> Result<Self, RouletteError> {
        check_interval(min, max)?;
        Ok(Self { min, max, value })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn weight(&self) -> f64 {
        self.max - self.min
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// A NaN point is never contained; it classifies as `Above`, so a search
    /// for it runs off the low end and finds no owner.
    pub fn classify(&self, r: f64) -> Placement {
        if self.min <= r && r <= self.max {
            Placement::Contains
        } else if self.max < r {
            Placement::Below
        } else {
            Placement::Above
        }
    }

    /// Shift the range to start at `new_min`, keeping its width.
    pub(crate) fn rebase(&mut self, new_min: f64) {
        let width = self.weight();
        self.min = new_min;
        self.max = new_min + width;
    }

    /// Set the width, keeping `min`. Callers validate `new_width` first.
    pub(crate) fn resize(&mut self, new_width: f64) {
        self.max = self.min + new_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(WeightedRange::new(1.0, 1.0, "a").is_err());
        assert!(WeightedRange::new(2.0, 1.0, "a").is_err());
        assert!(WeightedRange::new(0.0, f64::INFINITY, "a").is_err());
        assert!(WeightedRange::new(f64::NAN, 1.0, "a").is_err());
    }

    #[test]
    fn classify_is_inclusive_on_both_ends() {
        let range = WeightedRange::new(5.0, 7.0, "B").unwrap();
        assert_eq!(range.classify(4.99), Placement::Above);
        assert_eq!(range.classify(5.0), Placement::Contains);
        assert_eq!(range.classify(6.0), Placement::Contains);
        assert_eq!(range.classify(7.0), Placement::Contains);
        assert_eq!(range.classify(7.01), Placement::Below);
    }

    #[test]
    fn nan_is_never_contained() {
        let range = WeightedRange::new(0.0, 7.0, "A").unwrap();
        assert_ne!(range.classify(f64::NAN), Placement::Contains);
    }

    #[test]
    fn rebase_keeps_width() {
        let mut range = WeightedRange::new(5.0, 7.0, "B").unwrap();
        range.rebase(3.0);
        assert_eq!(range.min(), 3.0);
        assert_eq!(range.max(), 5.0);
        assert_eq!(range.weight(), 2.0);
    }

    #[test]
    fn resize_keeps_min() {
        let mut range = WeightedRange::new(0.0, 5.0, "A").unwrap();
        range.resize(3.0);
        assert_eq!(range.min(), 0.0);
        assert_eq!(range.max(), 3.0);
    }

    #[test]
    fn value_accessors() {
        let mut range = WeightedRange::new(0.0, 1.0, String::from("x")).unwrap();
        range.value_mut().push('y');
        assert_eq!(range.value(), "xy");
        assert_eq!(range.into_value(), "xy");
    }
}
