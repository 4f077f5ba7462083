// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// One top-level comment, as handed over by the page reader.
///
/// The text is the raw body of the comment. Nothing has been extracted from it yet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub author: String,
    pub text: String,
}

impl Ballot {
    pub fn new(author: &str, text: &str) -> Ballot {
        Ballot {
            author: author.to_string(),
            text: text.to_string(),
        }
    }
}

/// A `(title, points)` pair as written by a voter, before any lookup.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct VotePair {
    pub title: String,
    pub points: u64,
}

impl VotePair {
    pub fn new(title: &str, points: u64) -> VotePair {
        VotePair {
            title: title.to_string(),
            points,
        }
    }
}

// ******** Output data structures *********

/// What happened to one ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotOutcome {
    /// Fewer pairs than the configured minimum: this comment is not a ballot.
    NotABallot { pairs_found: usize },
    /// Pairs were found but none of them could be read as a vote.
    Empty,
    /// Counted. Contains the points added for each canonical title.
    Valid {
        per_game: BTreeMap<String, u64>,
        ignored: Vec<VotePair>,
    },
    /// Rejected in its entirety.
    Invalid {
        per_game: BTreeMap<String, u64>,
        ignored: Vec<VotePair>,
        reasons: Vec<String>,
    },
}

/// The counters reported at the end of a run.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunCounters {
    pub authors_seen: usize,
    pub ballots_seen: usize,
    pub valid_ballots: usize,
    pub invalid_ballots: usize,
    pub ignored_pairs: usize,
    pub rollover_points: u64,
    pub rollover_games: usize,
    /// Titles with an entry in the tally (seeded or voted for).
    pub games_with_entries: usize,
    /// All the titles of the registry, including the ones without points.
    pub games_listed: usize,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyOutcome {
    /// Every canonical title with its total, highest first.
    pub standings: Vec<(String, u64)>,
    /// The titles with an entry in the tally, even at zero, in the same order.
    pub tallied: Vec<(String, u64)>,
    /// Deduplicated and sorted `"{author}: {reasons}"` lines.
    pub invalid: Vec<String>,
    /// Unmatched pairs, grouped by author.
    pub ignored_by_author: BTreeMap<String, Vec<VotePair>>,
    pub counters: RunCounters,
}

/// Errors that prevent a registry from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RegistryError {
    EmptyHeader,
    MissingTitleColumn { column: String },
}

impl Error for RegistryError {}

impl Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::EmptyHeader => write!(f, "the games list has no header row"),
            RegistryError::MissingTitleColumn { column } => {
                write!(f, "the games list must contain a '{}' column", column)
            }
        }
    }
}

// ********* Configuration **********

/// The limits applied to every ballot.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct BallotRules {
    /// Maximum sum of the points of a ballot.
    pub max_total_points: u64,
    /// Maximum number of points a ballot can give to a single title.
    pub max_points_per_game: u64,
    /// Minimum number of `Title (N)` pairs for a comment to be treated as a ballot.
    pub min_pairs: usize,
}

impl BallotRules {
    pub const DEFAULT_RULES: BallotRules = BallotRules {
        max_total_points: 20,
        max_points_per_game: 5,
        min_pairs: 1,
    };
}

impl Default for BallotRules {
    fn default() -> Self {
        BallotRules::DEFAULT_RULES
    }
}
