use log::{debug, info, warn};

use points_tally::builder::Builder;
use points_tally::registry::Registry;
use points_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use fancy_regex::Regex;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::config_reader::*;
use crate::tally::io_games::read_games;
use crate::tally::io_page::{dump_page, fetch_page, read_page, top_level_comments};
use crate::tally::io_reports::*;

mod config_reader;
mod io_games;
mod io_page;
mod io_reports;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TallyError {
    #[snafu(display("Error opening the games file {path}"))]
    OpeningGames { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the games file {path}"))]
    GamesLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {worksheet} not found in {path}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Invalid games file {path}"))]
    InvalidGames {
        source: RegistryError,
        path: String,
    },
    #[snafu(display("Error opening the configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error fetching {url}"))]
    Fetching { source: reqwest::Error, url: String },
    #[snafu(display("Error reading the page {path}"))]
    ReadingPage {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    Writing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error rendering the tally"))]
    RenderingCsv { source: csv::Error },
    #[snafu(display("Error rendering the summary"))]
    RenderingSummary { source: serde_json::Error },
    #[snafu(display("Error reading the reference tally {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid selector {selector}: {message}"))]
    InvalidSelector { selector: String, message: String },
    #[snafu(display("Invalid author filter {pattern}"))]
    InvalidAuthorFilter {
        source: fancy_regex::Error,
        pattern: String,
    },
    #[snafu(display("The configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;

/// Logs every step for the authors matching a pattern.
struct AuthorWatch {
    all: bool,
    filter: Option<Regex>,
}

impl AuthorWatch {
    fn new(debug: bool, pattern: &Option<String>) -> TallyResult<AuthorWatch> {
        let filter = match pattern {
            Some(p) => Some(Regex::new(p).context(InvalidAuthorFilterSnafu { pattern: p.clone() })?),
            None => None,
        };
        Ok(AuthorWatch { all: debug, filter })
    }

    fn watches(&self, author: &str) -> bool {
        match &self.filter {
            // A failure of the matcher only turns the logging off.
            Some(r) => r.is_match(author).unwrap_or(false),
            None => self.all,
        }
    }

    fn report(&self, author: &str, text: &str, outcome: &BallotOutcome) {
        if !self.watches(author) {
            return;
        }
        debug!("[{}] text: {:?}", author, text);
        match outcome {
            BallotOutcome::NotABallot { pairs_found } => {
                info!("[{}] not a ballot: {} pairs found", author, pairs_found)
            }
            BallotOutcome::Empty => info!("[{}] no vote could be read", author),
            BallotOutcome::Valid { per_game, ignored } => {
                info!("[{}] valid: {:?}", author, per_game);
                for p in ignored.iter() {
                    info!("[{}] ignored: {} ({})", author, p.title, p.points);
                }
            }
            BallotOutcome::Invalid {
                per_game,
                ignored,
                reasons,
            } => {
                info!("[{}] invalid: {:?}: {}", author, per_game, reasons.join("; "));
                for p in ignored.iter() {
                    info!("[{}] ignored: {} ({})", author, p.title, p.points);
                }
            }
        }
    }
}

fn load_page(settings: &Settings) -> TallyResult<String> {
    let html = match &settings.source {
        PageSource::Url(url) => fetch_page(url)?,
        PageSource::File(path) => read_page(path)?,
    };
    if let Some(p) = &settings.dump_html {
        dump_page(p, &html);
    }
    Ok(html)
}

/// Tallies a list of comments and writes every report.
pub fn tally_comments(
    settings: &Settings,
    registry: &Registry,
    comments: &[Ballot],
) -> TallyResult<TallyOutcome> {
    let watch = AuthorWatch::new(settings.debug, &settings.author_debug)?;
    let mut builder = Builder::new(registry, &settings.rules);
    for c in comments.iter() {
        let outcome = builder.add(c);
        watch.report(&c.author, &c.text, &outcome);
    }
    let outcome = builder.finish();

    let tally_csv = render_tally_csv(&outcome.standings).context(RenderingCsvSnafu {})?;
    write_text(&settings.tally_out, &tally_csv)?;
    write_text(&settings.invalid_out, &render_invalid(&outcome.invalid))?;
    write_text(&settings.ignored_out, &render_ignored(&outcome.ignored_by_author))?;
    if let Some(p) = &settings.summary_out {
        let js = summary_js(&outcome);
        let pretty = serde_json::to_string_pretty(&js).context(RenderingSummarySnafu {})?;
        write_text(p, &pretty)?;
    }
    Ok(outcome)
}

pub fn run(args: &Args) -> TallyResult<()> {
    let settings = Settings::from_args(args)?;
    info!("settings: {:?}", settings);

    let registry = read_games(&settings.games_file, &settings.games_worksheet, settings.debug)?;
    let html = load_page(&settings)?;
    let comments = top_level_comments(&html)?;

    let outcome = tally_comments(&settings, &registry, &comments)?;

    print!("{}", console_summary(&settings, &outcome));
    if settings.print_summary {
        print!("{}", top_standings(&outcome.tallied, TOP_STANDINGS));
    }

    if let Some(ref_path) = &settings.reference {
        let computed = render_tally_csv(&outcome.standings).context(RenderingCsvSnafu {})?;
        let reference = fs::read_to_string(ref_path).context(ReadingReferenceSnafu {
            path: ref_path.clone(),
        })?;
        if !same_tally(&reference, &computed) {
            warn!("Found differences with the reference tally");
            print_diff(reference.as_str(), computed.as_str(), "\n");
            whatever!("Difference detected between computed tally and reference tally {}", ref_path)
        }
        info!("The tally matches the reference {}", ref_path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
    }

    fn out_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("tallyvotes-run-{}-{}", std::process::id(), name))
            .display()
            .to_string()
    }

    fn fixture_args(prefix: &str) -> Args {
        let dir = test_dir();
        Args {
            html_file: Some(dir.join("thread.html").display().to_string()),
            games_file: Some(dir.join("games.tsv").display().to_string()),
            tally_out: Some(out_path(&format!("{}-tally.csv", prefix))),
            invalid_out: Some(out_path(&format!("{}-invalid.txt", prefix))),
            ignored_out: Some(out_path(&format!("{}-ignored.txt", prefix))),
            summary_out: Some(out_path(&format!("{}-summary.json", prefix))),
            ..Args::default()
        }
    }

    #[test]
    fn thread_fixture() {
        let _ = env_logger::builder().is_test(true).try_init();
        let args = Args {
            reference: Some(test_dir().join("expected_tally.csv").display().to_string()),
            ..fixture_args("fixture")
        };
        run(&args).unwrap();

        let tally = fs::read_to_string(args.tally_out.as_ref().unwrap()).unwrap();
        let expected = fs::read_to_string(test_dir().join("expected_tally.csv")).unwrap();
        assert_eq!(tally, expected);

        let invalid = fs::read_to_string(args.invalid_out.as_ref().unwrap()).unwrap();
        assert_eq!(
            invalid,
            "Invalid ballots (entire ballot not counted):\n\
             - greedy: Total points 25 > 20\n"
        );

        let ignored = fs::read_to_string(args.ignored_out.as_ref().unwrap()).unwrap();
        assert_eq!(
            ignored,
            "Ignored votes (titles not in allowed/alias list after normalization):\n\
             \n[bob]\n  - Unknown Quest (2)\n"
        );

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(args.summary_out.as_ref().unwrap()).unwrap())
                .unwrap();
        assert_eq!(summary["ballots"]["valid"], 2);
        assert_eq!(summary["ballots"]["invalid"], 1);

        for p in [&args.tally_out, &args.invalid_out, &args.ignored_out, &args.summary_out] {
            fs::remove_file(p.as_ref().unwrap()).unwrap();
        }
    }

    #[test]
    fn reference_mismatch() {
        let reference = out_path("wrong_reference.csv");
        fs::write(&reference, "game,total_points\nHades,1\n").unwrap();
        let args = Args {
            reference: Some(reference.clone()),
            ..fixture_args("mismatch")
        };
        let res = run(&args);
        assert!(matches!(res, Err(TallyError::Whatever { .. })));
        fs::remove_file(&reference).unwrap();
    }

    #[test]
    fn missing_reference() {
        let args = Args {
            reference: Some(out_path("no_such_reference.csv")),
            ..fixture_args("no-reference")
        };
        let res = run(&args);
        match res {
            Err(e @ TallyError::ReadingReference { .. }) => {
                assert!(e.to_string().starts_with("Error reading the reference tally"))
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn bad_author_filter() {
        let res = AuthorWatch::new(false, &Some("(".to_string()));
        assert!(matches!(res, Err(TallyError::InvalidAuthorFilter { .. })));
    }

    #[test]
    fn author_watch() {
        let w = AuthorWatch::new(false, &Some("^ali".to_string())).unwrap();
        assert!(w.watches("alice"));
        assert!(!w.watches("bob"));
        let w = AuthorWatch::new(true, &None).unwrap();
        assert!(w.watches("bob"));
        let w = AuthorWatch::new(false, &None).unwrap();
        assert!(!w.watches("bob"));
    }
}
