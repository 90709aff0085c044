/// Reference series selection.
///
/// Every comparison group has one baseline result against which all other
/// results are differenced. The baseline is found by a substring match of a
/// configured token against the series names, walked in the group's
/// iteration order (sorted by name for frequency groups, first appearance
/// for profile tables).

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::model::Series;

/// What to do when more than one series name contains the reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Take the first match in iteration order and warn about the rest.
    #[default]
    FirstMatch,
    /// Refuse to pick; the group fails with `ReferenceError::Ambiguous`.
    Unique,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("no series containing '{token}' found as reference in {group}")]
    NotFound { group: String, token: String },
    #[error("{} series contain '{token}' in {group}: {}", candidates.len(), candidates.join(", "))]
    Ambiguous {
        group: String,
        token: String,
        candidates: Vec<String>,
    },
}

/// Returns the series of `group` whose name contains `token`.
pub fn resolve_reference<'a, I>(
    group: &str,
    series: I,
    token: &str,
    policy: ReferencePolicy,
) -> Result<&'a Series, ReferenceError>
where
    I: IntoIterator<Item = &'a Series>,
{
    let matches: Vec<&Series> = series
        .into_iter()
        .filter(|s| s.name.contains(token))
        .collect();

    match matches.as_slice() {
        [] => Err(ReferenceError::NotFound {
            group: group.to_string(),
            token: token.to_string(),
        }),
        [only] => Ok(*only),
        [first, rest @ ..] => match policy {
            ReferencePolicy::FirstMatch => {
                let ignored: Vec<&str> = rest.iter().map(|s| s.name.as_str()).collect();
                warn!(
                    group,
                    token,
                    reference = %first.name,
                    ignored = ?ignored,
                    "several series match the reference token, using the first"
                );
                Ok(*first)
            }
            ReferencePolicy::Unique => Err(ReferenceError::Ambiguous {
                group: group.to_string(),
                token: token.to_string(),
                candidates: matches.iter().map(|s| s.name.clone()).collect(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Series> {
        names
            .iter()
            .map(|n| Series::from_pairs(*n, &[(10.0, 1.0)]))
            .collect()
    }

    #[test]
    fn test_resolves_the_matching_series() {
        let group = named(&["2017-totaal-zon", "2023-totaal-met", "2017-fysica-zon"]);
        let reference =
            resolve_reference("km0160", &group, "2023-totaal-met", ReferencePolicy::FirstMatch)
                .unwrap();
        assert_eq!(reference.name, "2023-totaal-met");
    }

    #[test]
    fn test_substring_match() {
        let group = named(&["B2035_OnMt", "Defintf_2023_BOI"]);
        let reference =
            resolve_reference("table", &group, "Defintf", ReferencePolicy::Unique).unwrap();
        assert_eq!(reference.name, "Defintf_2023_BOI");
    }

    #[test]
    fn test_missing_reference_fails() {
        let group = named(&["2017-totaal-zon", "2017-fysica-zon"]);
        let err = resolve_reference("km0160", &group, "2023-totaal-met", ReferencePolicy::FirstMatch)
            .unwrap_err();
        assert_eq!(
            err,
            ReferenceError::NotFound {
                group: "km0160".to_string(),
                token: "2023-totaal-met".to_string(),
            }
        );
        assert!(err.to_string().contains("2023-totaal-met"));
    }

    #[test]
    fn test_empty_group_fails() {
        let group: Vec<Series> = Vec::new();
        assert!(resolve_reference("g", &group, "x", ReferencePolicy::FirstMatch).is_err());
    }

    #[test]
    fn test_first_match_wins_under_default_policy() {
        let group = named(&["Defintf_a", "Defintf_b"]);
        let reference =
            resolve_reference("table", &group, "Defintf", ReferencePolicy::FirstMatch).unwrap();
        assert_eq!(reference.name, "Defintf_a");
    }

    #[test]
    fn test_unique_policy_rejects_ambiguity() {
        let group = named(&["Defintf_a", "other", "Defintf_b"]);
        let err =
            resolve_reference("table", &group, "Defintf", ReferencePolicy::Unique).unwrap_err();
        match err {
            ReferenceError::Ambiguous { candidates, .. } => {
                assert_eq!(candidates, vec!["Defintf_a", "Defintf_b"]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }
}
