use std::fmt::Display;

use crate::config::BallotRules;

/// A broken ballot rule. The display form is the reason shown in the reports.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotViolation {
    TotalExceeded { total: u64, max: u64 },
    PerGameExceeded { offenders: Vec<(String, u64)>, max: u64 },
}

impl Display for BallotViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotViolation::TotalExceeded { total, max } => {
                write!(f, "Total points {} > {}", total, max)
            }
            BallotViolation::PerGameExceeded { offenders, .. } => {
                let l: Vec<String> = offenders
                    .iter()
                    .map(|(title, points)| format!("{} ({})", title, points))
                    .collect();
                write!(f, "Per-game limit exceeded: {}", l.join(", "))
            }
        }
    }
}

/// Checks a resolved ballot against the rules.
///
/// `per_game` holds one entry per title, in the order of the ballot. The
/// offending titles are reported in that order.
///
/// Both rules are always checked, so that a ballot breaking both of them
/// reports both.
pub fn validate_ballot(
    per_game: &[(String, u64)],
    rules: &BallotRules,
) -> Result<(), Vec<BallotViolation>> {
    let mut violations: Vec<BallotViolation> = Vec::new();

    let total: u64 = per_game.iter().fold(0, |acc, (_, p)| acc.saturating_add(*p));
    if total > rules.max_total_points {
        violations.push(BallotViolation::TotalExceeded {
            total,
            max: rules.max_total_points,
        });
    }

    let offenders: Vec<(String, u64)> = per_game
        .iter()
        .filter(|(_, p)| *p > rules.max_points_per_game)
        .cloned()
        .collect();
    if !offenders.is_empty() {
        violations.push(BallotViolation::PerGameExceeded {
            offenders,
            max: rules.max_points_per_game,
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
