// Rendering and writing of the reports of a run.

use serde_json::json;
use serde_json::Value as JSValue;
use std::collections::BTreeMap;

use crate::tally::*;

pub const TOP_STANDINGS: usize = 20;

const TALLY_HEADER: [&str; 2] = ["game", "total_points"];

/// The full standings as CSV, with a header row.
pub fn render_tally_csv(standings: &[(String, u64)]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(TALLY_HEADER)?;
    for (title, points) in standings.iter() {
        wtr.write_record([title.as_str(), points.to_string().as_str()])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    // Every field went in as UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn render_invalid(invalid: &[String]) -> String {
    if invalid.is_empty() {
        return "No invalid ballots detected.\n".to_string();
    }
    let mut res = "Invalid ballots (entire ballot not counted):\n".to_string();
    for line in invalid.iter() {
        res.push_str(&format!("- {}\n", line));
    }
    res
}

pub fn render_ignored(ignored_by_author: &BTreeMap<String, Vec<VotePair>>) -> String {
    if ignored_by_author.is_empty() {
        return "No ignored votes detected.\n".to_string();
    }
    let mut res =
        "Ignored votes (titles not in allowed/alias list after normalization):\n".to_string();
    for (author, pairs) in ignored_by_author.iter() {
        res.push_str(&format!("\n[{}]\n", author));
        for p in pairs.iter() {
            res.push_str(&format!("  - {} ({})\n", p.title, p.points));
        }
    }
    res
}

pub fn summary_js(outcome: &TallyOutcome) -> JSValue {
    let c = &outcome.counters;
    let standings: Vec<JSValue> = outcome
        .standings
        .iter()
        .map(|(title, points)| json!({"game": title, "totalPoints": points}))
        .collect();
    json!({
        "authors": c.authors_seen,
        "ballots": {
            "detected": c.ballots_seen,
            "valid": c.valid_ballots,
            "invalid": c.invalid_ballots,
        },
        "ignoredPairs": c.ignored_pairs,
        "rollover": {
            "points": c.rollover_points,
            "games": c.rollover_games,
        },
        "gamesTallied": c.games_with_entries,
        "gamesListed": c.games_listed,
        "invalid": outcome.invalid,
        "standings": standings,
    })
}

/// Writes a report to a file, or to the standard output for `stdout`.
pub fn write_text(path: &str, content: &str) -> TallyResult<()> {
    if path == STDOUT {
        print!("{}", content);
        return Ok(());
    }
    debug!("write_text: writing {} bytes to {:?}", content.len(), path);
    fs::write(path, content).context(WritingSnafu { path })
}

pub fn console_summary(settings: &Settings, outcome: &TallyOutcome) -> String {
    let c = &outcome.counters;
    let lines = vec![
        "".to_string(),
        "=== Scrape Summary ===".to_string(),
        format!("Authors seen:            {}", c.authors_seen),
        format!("Ballots detected:        {}", c.ballots_seen),
        format!("Valid ballots:           {}", c.valid_ballots),
        format!("Invalid ballots:         {}", c.invalid_ballots),
        format!("Ignored vote pairs:      {}", c.ignored_pairs),
        format!(
            "Rollover points applied: {} across {} games",
            c.rollover_points, c.rollover_games
        ),
        format!("Games tallied:           {}", c.games_with_entries),
        format!(
            "Games listed:            {}  (including zero-point games)",
            c.games_listed
        ),
        format!("Wrote tally to:          {}", settings.tally_out),
        format!("Wrote invalids to:       {}", settings.invalid_out),
        format!("Wrote ignored votes to:  {}", settings.ignored_out),
    ];
    let mut res = lines.join("\n");
    res.push('\n');
    res
}

/// The highest scoring titles among the ones with an entry in the tally.
pub fn top_standings(tallied: &[(String, u64)], count: usize) -> String {
    let top: Vec<&(String, u64)> = tallied.iter().take(count).collect();
    if top.is_empty() {
        return "\nNo tallies produced. Use --debug, --author-debug and --dump-html for visibility.\n"
            .to_string();
    }
    let mut res = "\nTop results:\n".to_string();
    for (title, points) in top {
        res.push_str(&format!("  {}: {}\n", title, points));
    }
    res
}

/// Compares two renderings of a tally, ignoring line endings and trailing
/// blank lines.
pub fn same_tally(reference: &str, computed: &str) -> bool {
    let lines = |s: &str| -> Vec<String> {
        let mut l: Vec<String> = s.lines().map(|l| l.trim_end().to_string()).collect();
        while l.last().map(|x| x.is_empty()).unwrap_or(false) {
            l.pop();
        }
        l
    };
    lines(reference) == lines(computed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings() -> Vec<(String, u64)> {
        vec![
            ("Hades".to_string(), 9),
            ("Celeste, Remastered".to_string(), 4),
            ("Ico".to_string(), 0),
        ]
    }

    #[test]
    fn tally_csv() {
        let csv = render_tally_csv(&standings()).unwrap();
        assert_eq!(
            csv,
            "game,total_points\nHades,9\n\"Celeste, Remastered\",4\nIco,0\n"
        );
        assert_eq!(render_tally_csv(&[]).unwrap(), "game,total_points\n");
    }

    #[test]
    fn invalid_report() {
        assert_eq!(render_invalid(&[]), "No invalid ballots detected.\n");
        let lines = vec![
            "alice: Total points 25 > 20".to_string(),
            "bob: Per-game limit exceeded: Hades (7)".to_string(),
        ];
        assert_eq!(
            render_invalid(&lines),
            "Invalid ballots (entire ballot not counted):\n\
             - alice: Total points 25 > 20\n\
             - bob: Per-game limit exceeded: Hades (7)\n"
        );
    }

    #[test]
    fn ignored_report() {
        assert_eq!(render_ignored(&BTreeMap::new()), "No ignored votes detected.\n");
        let mut ignored = BTreeMap::new();
        ignored.insert(
            "zed".to_string(),
            vec![VotePair::new("Mystery Game", 3)],
        );
        ignored.insert(
            "amy".to_string(),
            vec![VotePair::new("Foo", 1), VotePair::new("Bar", 2)],
        );
        assert_eq!(
            render_ignored(&ignored),
            "Ignored votes (titles not in allowed/alias list after normalization):\n\
             \n[amy]\n  - Foo (1)\n  - Bar (2)\n\
             \n[zed]\n  - Mystery Game (3)\n"
        );
    }

    #[test]
    fn top() {
        assert_eq!(
            top_standings(&standings(), 1),
            "\nTop results:\n  Hades: 9\n"
        );
        assert_eq!(
            top_standings(&standings(), 20),
            "\nTop results:\n  Hades: 9\n  Celeste, Remastered: 4\n  Ico: 0\n"
        );
        assert_eq!(
            top_standings(&[("Ico".to_string(), 0)], 20),
            "\nTop results:\n  Ico: 0\n"
        );
        assert!(top_standings(&[], 20).contains("No tallies produced"));
    }

    #[test]
    fn reference_comparison() {
        assert!(same_tally("game,total_points\r\nHades,9\r\n\r\n", "game,total_points\nHades,9\n"));
        assert!(!same_tally("game,total_points\nHades,8\n", "game,total_points\nHades,9\n"));
    }

    #[test]
    fn summary() {
        let outcome = TallyOutcome {
            standings: standings(),
            tallied: standings(),
            invalid: vec!["bob: Total points 25 > 20".to_string()],
            ignored_by_author: BTreeMap::new(),
            counters: RunCounters {
                authors_seen: 2,
                ballots_seen: 2,
                valid_ballots: 1,
                invalid_ballots: 1,
                ..RunCounters::default()
            },
        };
        let js = summary_js(&outcome);
        assert_eq!(js["ballots"]["valid"], 1);
        assert_eq!(js["standings"][0]["game"], "Hades");
        assert_eq!(js["standings"][0]["totalPoints"], 9);
        assert_eq!(js["invalid"][0], "bob: Total points 25 > 20");
    }
}
