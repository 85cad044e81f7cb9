//! The roulette container: weighted random selection over cumulative ranges.
//!
//! Values live in an ordered `Vec` of [`WeightedRange`]s that partition
//! `[0, total)` with no gaps and no overlaps:
//!
//! - `ranges[0].min == 0` when non-empty
//! - `ranges[i].max == ranges[i + 1].min` for every adjacent pair
//! - every range has a strictly positive width
//!
//! Inserting appends a range at the end in O(1). Removing or re-weighting a
//! value shifts every later range so the partition stays contiguous, which is
//! O(n). Rolling samples a point in `[0, total)` and binary-searches for its
//! owner in O(log n).
//!
//! The container is not synchronized. Iterators borrow it immutably, so the
//! borrow checker rules out mutation while an iteration is live; sharing a
//! roulette across threads needs an outer lock around the whole container.

use std::slice;
use std::vec;

use tracing::{debug, error};

use crate::error::RouletteError;
use crate::range::{Placement, WeightedRange};
use crate::rng::{RandomSource, RngSource};

/// Weighted random selection container.
///
/// `T` is the stored value type; equality on `T` is only needed by the
/// lookup operations (`remove`, `update`, ...). `S` is the random source,
/// defaulting to an entropy-seeded [`RngSource`].
#[derive(Debug, Clone)]
pub struct Roulette<T, S = RngSource> {
    ranges: Vec<WeightedRange<T>>,
    total: f64,
    source: S,
}

impl<T> Roulette<T, RngSource> {
    /// Empty roulette drawing from an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_source(RngSource::from_entropy())
    }
}

impl<T> Default for Roulette<T, RngSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Roulette<T, S> {
    pub fn with_source(source: S) -> Self {
        Self {
            ranges: Vec::new(),
            total: 0.0,
            source,
        }
    }

    /// Build a roulette by inserting each `(value, weight)` pair in order.
    ///
    /// The first invalid weight aborts construction with its error.
    pub fn try_from_entries<I>(entries: I, source: S) -> Result<Self, RouletteError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut roulette = Self::with_source(source);
        for (value, weight) in entries {
            roulette.insert(value, weight)?;
        }
        Ok(roulette)
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Append `value` with the given weight as the range `[total, total + weight)`.
    ///
    /// Fails with [`RouletteError::InvalidWeight`] for a weight that is not
    /// finite and positive, and with [`RouletteError::InvalidRange`] if the
    /// new total would not be representable. Nothing changes on failure.
    pub fn insert(&mut self, value: T, weight: f64) -> Result<(), RouletteError> {
        check_weight(weight)?;
        let range = WeightedRange::new(self.total, self.total + weight, value)?;
        self.total = range.max();
        self.ranges.push(range);
        debug!(
            weight,
            total = self.total,
            len = self.ranges.len(),
            "inserted range"
        );
        Ok(())
    }

    /// Remove the first entry equal to `value`. Returns `false` if absent.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.take(value).is_some()
    }

    /// Remove the first entry equal to `value` and hand its value back.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        let index = self.position(value)?;
        let removed = self.ranges.remove(index);
        self.renumber_from(index, removed.min());
        debug!(
            index,
            weight = removed.weight(),
            total = self.total,
            len = self.ranges.len(),
            "removed range"
        );
        Some(removed.into_value())
    }

    /// Change the weight of the first entry equal to `value`.
    ///
    /// The weight is validated before the lookup, so an invalid weight fails
    /// even for an absent value. Returns `Ok(false)` if `value` is absent.
    /// Fails with [`RouletteError::InvalidRange`], leaving the roulette as it
    /// was, when a shifted range would overflow or collapse to zero width.
    pub fn update<Q>(&mut self, value: &Q, new_weight: f64) -> Result<bool, RouletteError>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        check_weight(new_weight)?;
        let Some(index) = self.position(value) else {
            return Ok(false);
        };

        let old_weight = self.ranges[index].weight();
        self.check_renumber(index, new_weight)?;

        let range = &mut self.ranges[index];
        range.resize(new_weight);
        let offset = range.max();
        self.renumber_from(index + 1, offset);
        debug!(
            index,
            old_weight,
            new_weight,
            total = self.total,
            "updated range"
        );
        Ok(true)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.total = 0.0;
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sum of all weights; the upper bound of the last range, or 0 when empty.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.position(value).is_some()
    }

    pub fn weight_of<Q>(&self, value: &Q) -> Option<f64>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.position(value).map(|i| self.ranges[i].weight())
    }

    /// The ordered ranges, lowest offset first.
    pub fn ranges(&self) -> &[WeightedRange<T>] {
        &self.ranges
    }

    /// The range that owns point `r`, if any.
    pub fn range_at(&self, r: f64) -> Option<&WeightedRange<T>> {
        locate(&self.ranges, r).map(|i| &self.ranges[i])
    }

    /// `(value, weight)` pairs in ascending-offset order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.ranges.iter(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn position<Q>(&self, value: &Q) -> Option<usize>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.ranges.iter().position(|range| range.value() == value)
    }

    /// Dry run of resizing `ranges[index]` to `new_weight` and rebasing the
    /// rest: every shifted range must keep a finite, positive width.
    fn check_renumber(&self, index: usize, new_weight: f64) -> Result<(), RouletteError> {
        let mut offset = self.ranges[index].min();
        let widths = std::iter::once(new_weight)
            .chain(self.ranges[index + 1..].iter().map(|r| r.weight()));
        for width in widths {
            let next = offset + width;
            if !next.is_finite() || next <= offset {
                return Err(RouletteError::InvalidRange {
                    min: offset,
                    max: next,
                });
            }
            offset = next;
        }
        Ok(())
    }

    /// Rebase `ranges[start..]` so the first starts at `offset` and each
    /// following one starts where the previous ends. Sets the new total.
    fn renumber_from(&mut self, start: usize, offset: f64) {
        let mut offset = offset;
        for range in &mut self.ranges[start..] {
            range.rebase(offset);
            offset = range.max();
        }
        self.total = offset;
    }
}

impl<T, S: RandomSource> Roulette<T, S> {
    /// Pick a value with probability proportional to its weight.
    pub fn roll(&mut self) -> Result<&T, RouletteError> {
        let index = draw(&self.ranges, self.total, &mut self.source)?;
        Ok(self.ranges[index].value())
    }

    /// Like [`roll`](Self::roll), but yields the stored value mutably.
    pub fn roll_mut(&mut self) -> Result<&mut T, RouletteError> {
        let index = draw(&self.ranges, self.total, &mut self.source)?;
        Ok(self.ranges[index].value_mut())
    }
}

impl<T, S> Roulette<T, S> {
    /// Roll with a caller-supplied source, leaving the owned source untouched.
    pub fn roll_with<R: RandomSource>(&self, source: &mut R) -> Result<&T, RouletteError> {
        let index = draw(&self.ranges, self.total, source)?;
        Ok(self.ranges[index].value())
    }
}

fn check_weight(weight: f64) -> Result<(), RouletteError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(RouletteError::InvalidWeight { weight })
    }
}

fn draw<T, R: RandomSource>(
    ranges: &[WeightedRange<T>],
    total: f64,
    source: &mut R,
) -> Result<usize, RouletteError> {
    if ranges.is_empty() {
        return Err(RouletteError::EmptyContainer);
    }
    let roll = source.sample(0.0, total)?;
    locate(ranges, roll).ok_or_else(|| {
        error!(roll, total, len = ranges.len(), "no range owns the sampled point");
        RouletteError::InvariantViolation {
            roll,
            total,
            len: ranges.len(),
        }
    })
}

/// Binary search over contiguous ranges. `hi` is exclusive, so an empty slice
/// never computes `len - 1`.
fn locate<T>(ranges: &[WeightedRange<T>], r: f64) -> Option<usize> {
    let mut lo = 0;
    let mut hi = ranges.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match ranges[mid].classify(r) {
            Placement::Below => lo = mid + 1,
            Placement::Above => hi = mid,
            Placement::Contains => return Some(mid),
        }
    }
    None
}

/// Borrowing iterator over `(value, weight)` pairs.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, WeightedRange<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| (r.value(), r.weight()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|r| (r.value(), r.weight()))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Owning iterator over `(value, weight)` pairs.
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: vec::IntoIter<WeightedRange<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (T, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| {
            let weight = r.weight();
            (r.into_value(), weight)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<'a, T, S> IntoIterator for &'a Roulette<T, S> {
    type Item = (&'a T, f64);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> IntoIterator for Roulette<T, S> {
    type Item = (T, f64);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.ranges.into_iter(),
        }
    }
}
