/*!
Tallying of point ballots written as free text.

Voters post comments containing `Title (N)` pairs. Each pair gives `N` points
to a title. This crate:
- builds a [`registry::Registry`] of canonical titles, with their aliases and
  the points carried over from a previous round,
- recovers every pair of a comment ([`extract::VoteExtractor`]), even when
  the title itself contains parentheses,
- maps the pairs to canonical titles ([`ballot::resolve_ballot`]),
- rejects the ballots that exceed the [`BallotRules`] in their entirety
  ([`validate::validate_ballot`]),
- sums the valid ballots on top of the rollover points ([`tally::Tally`]).

The long-form documentation of the input and output formats is in the
[`manual`] module.
*/

mod config;
use log::info;

pub mod ballot;
pub mod builder;
pub mod extract;
pub mod manual;
pub mod normalize;
pub mod registry;
pub mod tally;
pub mod validate;

pub use crate::config::*;

/// Runs the whole tally over a list of ballots, in order.
///
/// Arguments:
/// * `registry` the canonical titles, aliases and rollover points
/// * `ballots` the top-level comments, in document order
/// * `rules` the limits applied to each ballot
pub fn run_tally(
    registry: &registry::Registry,
    ballots: &[Ballot],
    rules: &BallotRules,
) -> TallyOutcome {
    info!(
        "Processing {} comments against {} titles, rules: {:?}",
        ballots.len(),
        registry.allowed_titles().len(),
        rules
    );
    let mut builder = builder::Builder::new(registry, rules);
    for ballot in ballots.iter() {
        builder.add(ballot);
    }
    let outcome = builder.finish();
    info!(
        "Counted {} valid and {} invalid ballots",
        outcome.counters.valid_ballots, outcome.counters.invalid_ballots
    );
    outcome
}
