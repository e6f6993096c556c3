use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{correlate::CorrelationPolicy, record::RecordSet};

/// Parameters of the timestamp association.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Time offset added to the second stream before comparing, e.g. sensor latency.
    pub offset: f64,
    /// Stamps are associated only if strictly closer than this, in seconds.
    pub max_difference: f64,
    /// How a depth/color pair picks its pose stamp.
    pub policy: CorrelationPolicy,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            offset: 0.0,
            max_difference: 0.02,
            policy: CorrelationPolicy::default(),
        }
    }
}

/// A pair of associated stamps, one from each record set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// The stamp from the first record set.
    pub first: f64,
    /// The stamp from the second record set.
    pub second: f64,
}

/// Associate the stamps of two record sets.
///
/// Every candidate pair `(a, b)` with `|a - (b + offset)| < max_difference` is
/// ranked by `(distance, a, b)` and accepted greedily when neither stamp has
/// been used by an earlier accepted pair. The result is sorted by the first stamp.
///
/// This is a greedy nearest-neighbour assignment, it does not minimise the
/// total distance over all pairs.
///
/// # Arguments
///
/// * `first` - The first record set.
/// * `second` - The second record set.
/// * `offset` - Time offset added to the stamps of `second`.
/// * `max_difference` - Search radius for candidate pairs.
///
/// # Example
///
/// ```
/// use rgbdcloud_assoc::{associate, RecordSet};
///
/// let a: RecordSet = vec![(1.0, vec!["x".to_string()])].into_iter().collect();
/// let b: RecordSet = vec![(1.01, vec!["y".to_string()])].into_iter().collect();
///
/// let matches = associate(&a, &b, 0.0, 0.02);
/// assert_eq!(matches.len(), 1);
/// assert_eq!((matches[0].first, matches[0].second), (1.0, 1.01));
/// ```
pub fn associate(
    first: &RecordSet,
    second: &RecordSet,
    offset: f64,
    max_difference: f64,
) -> Vec<Match> {
    // |x| < max_difference cannot hold
    if max_difference.is_nan() || max_difference <= 0.0 {
        return Vec::new();
    }

    // sorted view of the second stamps to bound the candidate search per first stamp
    let mut second_sorted = second.stamps().collect::<Vec<_>>();
    second_sorted.sort_by(f64::total_cmp);

    let mut candidates = Vec::new();
    for a in first.stamps() {
        // the window is widened by the rounding of `a - offset` and `b + offset`,
        // the exact predicate below decides
        let center = a - offset;
        let slack = f64::EPSILON * 4.0 * (a.abs() + offset.abs() + max_difference).max(1.0);
        let lower = center - max_difference - slack;
        let upper = center + max_difference + slack;

        let start = second_sorted.partition_point(|&b| b < lower);
        let end = second_sorted.partition_point(|&b| b <= upper);

        for &b in &second_sorted[start..end] {
            let distance = (a - (b + offset)).abs();
            if distance < max_difference {
                candidates.push((distance, a, b));
            }
        }
    }

    candidates.sort_by(|x, y| {
        x.0.total_cmp(&y.0)
            .then(x.1.total_cmp(&y.1))
            .then(x.2.total_cmp(&y.2))
    });

    let mut used_first = HashSet::new();
    let mut used_second = HashSet::new();
    let mut matches = Vec::new();

    for (_, a, b) in candidates {
        if used_first.contains(&a.to_bits()) || used_second.contains(&b.to_bits()) {
            continue;
        }
        used_first.insert(a.to_bits());
        used_second.insert(b.to_bits());
        matches.push(Match {
            first: a,
            second: b,
        });
    }

    matches.sort_by(|x, y| {
        x.first
            .total_cmp(&y.first)
            .then(x.second.total_cmp(&y.second))
    });

    log::debug!(
        "associated {} of {} x {} stamps (offset {}, max difference {})",
        matches.len(),
        first.len(),
        second.len(),
        offset,
        max_difference
    );

    matches
}
