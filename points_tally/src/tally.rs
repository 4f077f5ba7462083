use std::collections::{BTreeMap, BTreeSet};

/// Points per canonical title, seeded with the rollover points.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Tally {
    totals: BTreeMap<String, u64>,
}

impl Tally {
    pub fn seeded(seeds: &BTreeMap<String, u64>) -> Tally {
        Tally {
            totals: seeds.clone(),
        }
    }

    /// Adds the points of a valid ballot.
    pub fn add_ballot(&mut self, per_game: &BTreeMap<String, u64>) {
        for (title, points) in per_game.iter() {
            let entry = self.totals.entry(title.clone()).or_insert(0);
            *entry = entry.saturating_add(*points);
        }
    }

    pub fn get(&self, title: &str) -> u64 {
        self.totals.get(title).cloned().unwrap_or(0)
    }

    /// Number of titles that received an entry, even with zero points.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Every allowed title with its total, including the ones at zero.
    ///
    /// Sorted by decreasing total, then by title ignoring case. The exact
    /// title breaks the remaining ties, so the order never depends on the
    /// iteration order of a map.
    pub fn standings(&self, allowed: &BTreeSet<String>) -> Vec<(String, u64)> {
        let mut rows: Vec<(String, u64)> = allowed
            .iter()
            .map(|title| (title.clone(), self.get(title)))
            .collect();
        sort_rows(&mut rows);
        rows
    }

    /// Only the titles with an entry, seeded or voted for, in the same order
    /// as the standings. An entry may hold zero points.
    pub fn entries(&self) -> Vec<(String, u64)> {
        let mut rows: Vec<(String, u64)> = self
            .totals
            .iter()
            .map(|(t, p)| (t.clone(), *p))
            .collect();
        sort_rows(&mut rows);
        rows
    }
}

fn sort_rows(rows: &mut [(String, u64)]) {
    rows.sort_by(|(t1, p1), (t2, p2)| {
        p2.cmp(p1)
            .then_with(|| t1.to_lowercase().cmp(&t2.to_lowercase()))
            .then_with(|| t1.cmp(t2))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(l: &[(&str, u64)]) -> BTreeMap<String, u64> {
        l.iter().map(|(t, p)| (t.to_string(), *p)).collect()
    }

    fn set(l: &[&str]) -> BTreeSet<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn seeds_are_kept() {
        let tally = Tally::seeded(&map(&[("Hades", 3)]));
        assert_eq!(tally.get("Hades"), 3);
        assert_eq!(tally.standings(&set(&["Hades"])), vec![("Hades".to_string(), 3)]);
    }

    #[test]
    fn ballots_accumulate() {
        let mut tally = Tally::seeded(&map(&[("Hades", 3)]));
        tally.add_ballot(&map(&[("Hades", 2), ("Celeste", 5)]));
        tally.add_ballot(&map(&[("Celeste", 1)]));
        assert_eq!(tally.get("Hades"), 5);
        assert_eq!(tally.get("Celeste"), 6);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn zero_point_titles_are_listed() {
        let mut tally = Tally::default();
        tally.add_ballot(&map(&[("b", 1)]));
        let rows = tally.standings(&set(&["a", "b", "c"]));
        assert_eq!(
            rows,
            vec![
                ("b".to_string(), 1),
                ("a".to_string(), 0),
                ("c".to_string(), 0)
            ]
        );
    }

    #[test]
    fn ordering_is_total() {
        let tally = Tally::seeded(&map(&[("beta", 2), ("Alpha", 2), ("ALPHA", 2), ("zeta", 9)]));
        let rows = tally.standings(&set(&["alpha", "beta", "Alpha", "ALPHA", "zeta"]));
        let titles: Vec<&str> = rows.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["zeta", "ALPHA", "Alpha", "beta", "alpha"]);
    }

    #[test]
    fn entries_with_zero_points() {
        let mut tally = Tally::seeded(&map(&[("Hades", 3)]));
        tally.add_ballot(&map(&[("Celeste", 0), ("Ico", 4)]));
        assert_eq!(
            tally.entries(),
            vec![
                ("Ico".to_string(), 4),
                ("Hades".to_string(), 3),
                ("Celeste".to_string(), 0)
            ]
        );
    }
}
