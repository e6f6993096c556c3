use serde::{Deserialize, Serialize};

use crate::{
    associate::{associate, AssociationConfig, Match},
    record::RecordSet,
};

/// How a depth/color pair selects its pose stamp among the depth/pose matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationPolicy {
    /// Take the first depth/pose match, in its given order, whose pose stamp is
    /// within range of the color stamp.
    #[default]
    FirstMatch,
    /// Take the pose stamp closest to the color stamp among all matches in range.
    /// Ties go to the earlier match.
    Nearest,
}

/// A correlated depth/color/pose stamp group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triple {
    /// Stamp of the depth map.
    pub depth: f64,
    /// Stamp of the color image.
    pub color: f64,
    /// Stamp of the ground truth pose.
    pub pose: f64,
}

/// Combine depth/color and depth/pose matches into triples.
///
/// For each `(depth, color)` pair, a pose stamp is picked from `depth_pose`
/// such that `|color - pose| < max_difference`. Pairs without any such pose
/// stamp are dropped. Note that the pose stamp is compared against the color
/// stamp, and that a pose stamp may be shared by several triples.
///
/// # Arguments
///
/// * `depth_color` - Matches of depth stamps (first) with color stamps (second).
/// * `depth_pose` - Matches of depth stamps (first) with pose stamps (second).
/// * `max_difference` - Upper bound (exclusive) of the color/pose distance.
/// * `policy` - How to pick among several qualifying pose stamps.
pub fn correlate(
    depth_color: &[Match],
    depth_pose: &[Match],
    max_difference: f64,
    policy: CorrelationPolicy,
) -> Vec<Triple> {
    let triples = depth_color
        .iter()
        .filter_map(|dc| {
            let mut in_range = depth_pose
                .iter()
                .map(|dp| (dp.second, (dc.second - dp.second).abs()))
                .filter(|&(_, distance)| distance < max_difference);

            let pose = match policy {
                CorrelationPolicy::FirstMatch => in_range.next(),
                CorrelationPolicy::Nearest => in_range.fold(None, |best, candidate| match best {
                    Some((_, best_distance)) if best_distance <= candidate.1 => best,
                    _ => Some(candidate),
                }),
            };

            pose.map(|(pose, _)| Triple {
                depth: dc.first,
                color: dc.second,
                pose,
            })
        })
        .collect::<Vec<_>>();

    if triples.len() < depth_color.len() {
        log::debug!(
            "{} depth/color pairs have no pose within {}",
            depth_color.len() - triples.len(),
            max_difference
        );
    }

    triples
}

/// Associate the three streams and correlate them into triples.
///
/// Depth is associated with color and with pose independently, then the two
/// match lists are combined with [`correlate`].
pub fn correlate_streams(
    depth: &RecordSet,
    color: &RecordSet,
    pose: &RecordSet,
    config: &AssociationConfig,
) -> Vec<Triple> {
    let depth_color = associate(depth, color, config.offset, config.max_difference);
    let depth_pose = associate(depth, pose, config.offset, config.max_difference);
    log::info!(
        "found {} depth-color matches and {} depth-pose matches",
        depth_color.len(),
        depth_pose.len()
    );

    correlate(
        &depth_color,
        &depth_pose,
        config.max_difference,
        config.policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pairs: &[(f64, f64)]) -> Vec<Match> {
        pairs
            .iter()
            .map(|&(first, second)| Match { first, second })
            .collect()
    }

    fn records(stamps: &[f64]) -> RecordSet {
        stamps.iter().map(|&s| (s, vec![s.to_string()])).collect()
    }

    #[test]
    fn test_first_match_takes_first_in_range() {
        let depth_color = matches(&[(1.0, 1.0)]);
        // both pose stamps qualify, the first listed wins although it is farther
        let depth_pose = matches(&[(0.99, 1.015), (1.0, 1.001)]);
        let triples = correlate(&depth_color, &depth_pose, 0.02, CorrelationPolicy::FirstMatch);
        assert_eq!(
            triples,
            vec![Triple {
                depth: 1.0,
                color: 1.0,
                pose: 1.015
            }]
        );
    }

    #[test]
    fn test_nearest_takes_closest() {
        let depth_color = matches(&[(1.0, 1.0)]);
        let depth_pose = matches(&[(0.99, 1.015), (1.0, 1.001), (1.01, 0.999)]);
        let triples = correlate(&depth_color, &depth_pose, 0.02, CorrelationPolicy::Nearest);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].pose, 1.001);
    }

    #[test]
    fn test_pair_without_pose_is_dropped() {
        let depth_color = matches(&[(1.0, 1.0), (2.0, 2.0)]);
        let depth_pose = matches(&[(2.0, 2.01)]);
        for policy in [CorrelationPolicy::FirstMatch, CorrelationPolicy::Nearest] {
            let triples = correlate(&depth_color, &depth_pose, 0.02, policy);
            assert_eq!(
                triples,
                vec![Triple {
                    depth: 2.0,
                    color: 2.0,
                    pose: 2.01
                }]
            );
        }
    }

    #[test]
    fn test_pose_compared_against_color_stamp() {
        // the depth stamps differ, only the color/pose distance matters
        let depth_color = matches(&[(5.0, 1.0)]);
        let depth_pose = matches(&[(9.0, 1.01)]);
        let triples = correlate(&depth_color, &depth_pose, 0.02, CorrelationPolicy::FirstMatch);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].pose, 1.01);
    }

    #[test]
    fn test_pose_at_threshold_is_rejected() {
        // |1.0 - 1.5| equals the radius, which is not strictly below it
        let depth_color = matches(&[(1.0, 1.0)]);
        let depth_pose = matches(&[(1.2, 1.5)]);
        for policy in [CorrelationPolicy::FirstMatch, CorrelationPolicy::Nearest] {
            assert!(correlate(&depth_color, &depth_pose, 0.5, policy).is_empty());
            assert_eq!(correlate(&depth_color, &depth_pose, 0.5000001, policy).len(), 1);
        }
    }

    #[test]
    fn test_empty_matches() {
        assert!(correlate(&[], &matches(&[(1.0, 1.0)]), 0.02, CorrelationPolicy::FirstMatch)
            .is_empty());
        assert!(correlate(&matches(&[(1.0, 1.0)]), &[], 0.02, CorrelationPolicy::Nearest)
            .is_empty());
    }

    #[test]
    fn test_correlate_streams() {
        let depth = records(&[1.0, 2.0, 3.0]);
        let color = records(&[1.005, 2.005, 3.5]);
        let pose = records(&[0.99, 2.01, 3.0]);
        let triples = correlate_streams(&depth, &color, &pose, &AssociationConfig::default());
        assert_eq!(
            triples,
            vec![
                Triple {
                    depth: 1.0,
                    color: 1.005,
                    pose: 0.99
                },
                Triple {
                    depth: 2.0,
                    color: 2.005,
                    pose: 2.01
                },
            ]
        );
    }

    #[test]
    fn test_policy_serde_names() -> Result<(), serde_json::Error> {
        let policy: CorrelationPolicy = serde_json::from_str("\"nearest\"")?;
        assert_eq!(policy, CorrelationPolicy::Nearest);
        let config: AssociationConfig = serde_json::from_str("{\"max_difference\": 0.05}")?;
        assert_eq!(config.max_difference, 0.05);
        assert_eq!(config.policy, CorrelationPolicy::FirstMatch);
        Ok(())
    }
}
