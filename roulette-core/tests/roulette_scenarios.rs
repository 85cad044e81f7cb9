//! End-to-end roulette scenarios.
//!
//! Covers the reference insert/remove/update walk-through, absence handling,
//! empty rolls, and chi-squared checks that seeded rolls follow the weights.

use std::collections::HashMap;

use roulette_core::{Roulette, RouletteError, RngSource, ScriptedSource, SeedHierarchy};

// ── Helpers ──────────────────────────────────────────────────────────

fn bounds<T, S>(roulette: &Roulette<T, S>) -> Vec<(f64, f64)> {
    roulette
        .ranges()
        .iter()
        .map(|r| (r.min(), r.max()))
        .collect()
}

fn count_rolls<S: roulette_core::RandomSource>(
    roulette: &mut Roulette<String, S>,
    rolls: usize,
) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for _ in 0..rolls {
        let value = roulette.roll().unwrap().clone();
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Pearson's chi-squared statistic of observed counts against the weights.
fn chi_squared<S>(
    roulette: &Roulette<String, S>,
    counts: &HashMap<String, usize>,
    rolls: usize,
) -> f64 {
    let total = roulette.total_weight();
    roulette
        .iter()
        .map(|(value, weight)| {
            let expected = rolls as f64 * weight / total;
            let observed = *counts.get(value).unwrap_or(&0) as f64;
            (observed - expected).powi(2) / expected
        })
        .sum()
}

fn owned(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
    entries.iter().map(|(v, w)| (v.to_string(), *w)).collect()
}

// ── Reference walk-through ───────────────────────────────────────────

#[test]
fn insert_remove_update_roll_walkthrough() {
    let mut roulette = Roulette::try_from_entries(
        owned(&[("A", 5.0), ("B", 2.0), ("C", 2.0), ("D", 1.0)]),
        ScriptedSource::constant(4.0),
    )
    .unwrap();
    assert_eq!(
        bounds(&roulette),
        vec![(0.0, 5.0), (5.0, 7.0), (7.0, 9.0), (9.0, 10.0)]
    );
    assert_eq!(roulette.total_weight(), 10.0);

    assert!(roulette.remove("D"));
    assert_eq!(bounds(&roulette), vec![(0.0, 5.0), (5.0, 7.0), (7.0, 9.0)]);
    assert_eq!(roulette.total_weight(), 9.0);

    assert_eq!(roulette.update("A", 3.0), Ok(true));
    assert_eq!(bounds(&roulette), vec![(0.0, 3.0), (3.0, 5.0), (5.0, 7.0)]);
    assert_eq!(roulette.total_weight(), 7.0);

    let values: Vec<_> = roulette.iter().map(|(v, _)| v.as_str()).collect();
    assert_eq!(values, vec!["A", "B", "C"]);

    assert_eq!(roulette.roll().map(String::as_str), Ok("B"));
}

#[test]
fn absent_value_changes_nothing() {
    let mut roulette = Roulette::try_from_entries(
        owned(&[("A", 1.0), ("B", 2.0)]),
        ScriptedSource::default(),
    )
    .unwrap();
    let before = bounds(&roulette);

    assert!(!roulette.remove("never inserted"));
    assert_eq!(roulette.update("never inserted", 9.0), Ok(false));

    assert_eq!(bounds(&roulette), before);
    assert_eq!(roulette.total_weight(), 3.0);
}

#[test]
fn empty_roll_fails_cleanly() {
    let mut roulette: Roulette<String> = Roulette::new();
    assert_eq!(roulette.roll(), Err(RouletteError::EmptyContainer));

    roulette.insert("only".to_string(), 1.0).unwrap();
    assert!(roulette.remove("only"));
    assert_eq!(roulette.roll(), Err(RouletteError::EmptyContainer));
}

#[test]
fn shared_boundary_goes_to_a_neighbour() {
    // 5.0 is both A's max and B's min.
    let mut roulette = Roulette::try_from_entries(
        owned(&[("A", 5.0), ("B", 2.0), ("C", 2.0)]),
        ScriptedSource::constant(5.0),
    )
    .unwrap();
    let rolled = roulette.roll().unwrap();
    assert!(rolled == "A" || rolled == "B", "boundary roll picked {rolled}");
}

// ── Distribution ─────────────────────────────────────────────────────

/// Chi-squared critical value, 3 degrees of freedom, p = 0.001.
const CHI2_DF3_P001: f64 = 16.266;
/// Chi-squared critical value, 8 degrees of freedom, p = 0.001.
const CHI2_DF8_P001: f64 = 26.124;

#[test]
fn roll_frequencies_follow_weights() {
    const ROLLS: usize = 100_000;
    let mut roulette = Roulette::try_from_entries(
        owned(&[("A", 5.0), ("B", 2.0), ("C", 2.0), ("D", 1.0)]),
        RngSource::seeded(2024),
    )
    .unwrap();

    let counts = count_rolls(&mut roulette, ROLLS);
    assert_eq!(counts.values().sum::<usize>(), ROLLS);

    let stat = chi_squared(&roulette, &counts, ROLLS);
    assert!(stat < CHI2_DF3_P001, "chi-squared {stat} too large: {counts:?}");
}

#[test]
fn frequencies_hold_after_remove_and_update() {
    const ROLLS: usize = 100_000;
    let entries: Vec<_> = (0..10).map(|i| (i.to_string(), (i + 1) as f64)).collect();
    let mut roulette = Roulette::try_from_entries(entries, RngSource::seeded(99)).unwrap();

    assert!(roulette.remove("5"));
    assert_eq!(roulette.update("0", 4.0), Ok(true));
    assert_eq!(roulette.total_weight(), 55.0 - 6.0 + 3.0);

    let counts = count_rolls(&mut roulette, ROLLS);
    assert!(!counts.contains_key("5"));

    let stat = chi_squared(&roulette, &counts, ROLLS);
    assert!(stat < CHI2_DF8_P001, "chi-squared {stat} too large: {counts:?}");
}

#[test]
fn equal_weights_show_no_boundary_bias() {
    const ROLLS: usize = 100_000;
    let entries: Vec<_> = ["w", "x", "y", "z"]
        .iter()
        .map(|v| (v.to_string(), 1.0))
        .collect();
    let mut roulette = Roulette::try_from_entries(entries, RngSource::seeded(5)).unwrap();

    let counts = count_rolls(&mut roulette, ROLLS);
    let stat = chi_squared(&roulette, &counts, ROLLS);
    assert!(stat < CHI2_DF3_P001, "chi-squared {stat} too large: {counts:?}");
}

#[test]
fn trials_from_one_master_seed_are_reproducible() {
    let hierarchy = SeedHierarchy::new(42);
    let build = |trial: u64| {
        Roulette::try_from_entries(
            owned(&[("A", 5.0), ("B", 2.0), ("C", 2.0), ("D", 1.0)]),
            hierarchy.source_for("roll", trial),
        )
        .unwrap()
    };

    let first = count_rolls(&mut build(0), 1_000);
    let again = count_rolls(&mut build(0), 1_000);
    assert_eq!(first, again);
}

#[test]
fn roll_with_borrowed_source_matches_owned_source() {
    let entries = owned(&[("A", 5.0), ("B", 2.0), ("C", 2.0), ("D", 1.0)]);
    let mut owning = Roulette::try_from_entries(entries.clone(), RngSource::seeded(11)).unwrap();
    let lending = Roulette::try_from_entries(entries, ScriptedSource::default()).unwrap();
    let mut external = RngSource::seeded(11);

    for _ in 0..200 {
        let a = owning.roll().unwrap().clone();
        let b = lending.roll_with(&mut external).unwrap();
        assert_eq!(&a, b);
    }
}

/// A source that hands back NaN for every draw.
struct NanSource;

impl roulette_core::RandomSource for NanSource {
    fn sample(&mut self, _min: f64, _max: f64) -> Result<f64, RouletteError> {
        Ok(f64::NAN)
    }
}

#[test]
fn nan_sample_fails_instead_of_picking_a_value() {
    let mut roulette = Roulette::try_from_entries(
        owned(&[("A", 5.0), ("B", 2.0), ("C", 2.0), ("D", 1.0)]),
        NanSource,
    )
    .unwrap();
    let err = roulette.roll().unwrap_err();
    assert!(
        matches!(err, RouletteError::InvariantViolation { len: 4, .. }),
        "{err:?}"
    );
}
