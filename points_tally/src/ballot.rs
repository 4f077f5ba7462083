use log::debug;
use std::collections::BTreeMap;

use crate::config::VotePair;
use crate::registry::Registry;

/// A ballot after lookup of its titles.
///
/// Every extracted pair lands in exactly one of the two fields.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResolvedBallot {
    /// Points per canonical title. Repeated titles are summed.
    pub per_game: BTreeMap<String, u64>,
    /// The canonical titles of `per_game`, in order of first appearance.
    pub first_seen: Vec<String>,
    /// The pairs that matched nothing, as written.
    pub ignored: Vec<VotePair>,
}

impl ResolvedBallot {
    pub fn is_empty(&self) -> bool {
        self.per_game.is_empty() && self.ignored.is_empty()
    }

    /// The points per canonical title, in the order the voter wrote them.
    pub fn in_ballot_order(&self) -> Vec<(String, u64)> {
        self.first_seen
            .iter()
            .map(|t| (t.clone(), self.per_game.get(t).cloned().unwrap_or(0)))
            .collect()
    }
}

pub fn resolve_ballot(pairs: &[VotePair], registry: &Registry) -> ResolvedBallot {
    let mut res = ResolvedBallot::default();
    for vp in pairs.iter() {
        match registry.resolve(&vp.title) {
            Some(canonical) => {
                if !res.per_game.contains_key(canonical) {
                    res.first_seen.push(canonical.to_string());
                }
                let entry = res.per_game.entry(canonical.to_string()).or_insert(0);
                *entry = entry.saturating_add(vp.points);
            }
            None => {
                debug!(
                    "resolve_ballot: {:?} ({}) not in the titles or aliases",
                    vp.title, vp.points
                );
                res.ignored.push(vp.clone());
            }
        }
    }
    res
}
