use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::ballot::resolve_ballot;
pub use crate::config::*;
use crate::extract::VoteExtractor;
use crate::registry::Registry;
use crate::tally::Tally;
use crate::validate::validate_ballot;

/// Accumulates the ballots of one run.
///
/// All the state of a run (the tally, the logs and the counters) lives here,
/// so that a run is a function of the registry and of the ballots only.
///
/// ```
/// use points_tally::builder::Builder;
/// use points_tally::registry::Registry;
/// use points_tally::BallotRules;
///
/// let header = vec!["game".to_string(), "alias1".to_string()];
/// let rows = vec![vec!["The Great Game".to_string(), "TGG".to_string()]];
/// let registry = Registry::from_rows(&header, &rows, false)?;
///
/// let mut builder = Builder::new(&registry, &BallotRules::DEFAULT_RULES);
/// builder.add_ballot("alice", "TGG (5) Other Thing (3)");
/// let outcome = builder.finish();
///
/// assert_eq!(outcome.standings, vec![("The Great Game".to_string(), 5)]);
/// assert_eq!(outcome.counters.ignored_pairs, 1);
/// # Ok::<(), points_tally::RegistryError>(())
/// ```
pub struct Builder<'a> {
    registry: &'a Registry,
    rules: BallotRules,
    extractor: VoteExtractor,
    tally: Tally,
    invalid: Vec<String>,
    ignored_by_author: BTreeMap<String, Vec<VotePair>>,
    authors: BTreeSet<String>,
    counters: RunCounters,
}

impl<'a> Builder<'a> {
    pub fn new(registry: &'a Registry, rules: &BallotRules) -> Builder<'a> {
        Builder {
            registry,
            rules: *rules,
            extractor: VoteExtractor::new(),
            tally: Tally::seeded(registry.seeds()),
            invalid: Vec::new(),
            ignored_by_author: BTreeMap::new(),
            authors: BTreeSet::new(),
            counters: RunCounters::default(),
        }
    }

    pub fn add(&mut self, ballot: &Ballot) -> BallotOutcome {
        self.add_ballot(&ballot.author, &ballot.text)
    }

    /// Extracts, resolves, validates and counts one comment.
    pub fn add_ballot(&mut self, author: &str, text: &str) -> BallotOutcome {
        let pairs = self.extractor.extract(text);
        debug!(
            "add_ballot: top-level comment by {}: votes-found={}",
            author,
            pairs.len()
        );
        if pairs.len() < self.rules.min_pairs {
            return BallotOutcome::NotABallot {
                pairs_found: pairs.len(),
            };
        }
        self.counters.ballots_seen += 1;
        self.authors.insert(author.to_string());

        let resolved = resolve_ballot(&pairs, self.registry);
        if !resolved.ignored.is_empty() {
            self.counters.ignored_pairs += resolved.ignored.len();
            self.ignored_by_author
                .entry(author.to_string())
                .or_default()
                .extend(resolved.ignored.iter().cloned());
        }
        if resolved.is_empty() {
            return BallotOutcome::Empty;
        }

        match validate_ballot(&resolved.in_ballot_order(), &self.rules) {
            Ok(()) => {
                self.counters.valid_ballots += 1;
                self.tally.add_ballot(&resolved.per_game);
                debug!("add_ballot: counted the ballot of {}", author);
                BallotOutcome::Valid {
                    per_game: resolved.per_game,
                    ignored: resolved.ignored,
                }
            }
            Err(violations) => {
                self.counters.invalid_ballots += 1;
                let reasons: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                let line = format!("{}: {}", author, reasons.join("; "));
                debug!("add_ballot: invalid: {}", line);
                self.invalid.push(line);
                BallotOutcome::Invalid {
                    per_game: resolved.per_game,
                    ignored: resolved.ignored,
                    reasons,
                }
            }
        }
    }

    pub fn finish(self) -> TallyOutcome {
        let mut invalid = self.invalid;
        invalid.sort();
        invalid.dedup();

        let allowed = self.registry.allowed_titles();
        let counters = RunCounters {
            authors_seen: self.authors.len(),
            rollover_points: self.registry.rollover_total(),
            rollover_games: self.registry.seeds().len(),
            games_with_entries: self.tally.len(),
            games_listed: allowed.len(),
            ..self.counters
        };
        TallyOutcome {
            standings: self.tally.standings(allowed),
            tallied: self.tally.entries(),
            invalid,
            ignored_by_author: self.ignored_by_author,
            counters,
        }
    }
}
