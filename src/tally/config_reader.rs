use crate::tally::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_URL: &str = "https://tildes.net/~games/1pvz/colossal_game_adventure_voting_topic";
pub const DEFAULT_GAMES_FILE: &str = "games_population.csv";
pub const DEFAULT_TALLY_OUT: &str = "tally.csv";
pub const DEFAULT_INVALID_OUT: &str = "invalid_votes.txt";
pub const DEFAULT_IGNORED_OUT: &str = "ignored_votes.txt";
pub const STDOUT: &str = "stdout";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "maxTotalPoints")]
    pub max_total_points: Option<u64>,
    #[serde(rename = "maxPointsPerGame")]
    pub max_points_per_game: Option<u64>,
    #[serde(rename = "minPairs")]
    pub min_pairs: Option<usize>,
}

/// The content of the JSON configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    pub url: Option<String>,
    #[serde(rename = "htmlFile")]
    pub html_file: Option<String>,
    #[serde(rename = "gamesFile")]
    pub games_file: Option<String>,
    #[serde(rename = "gamesWorksheet")]
    pub games_worksheet: Option<String>,
    #[serde(rename = "tallyOut")]
    pub tally_out: Option<String>,
    #[serde(rename = "invalidOut")]
    pub invalid_out: Option<String>,
    #[serde(rename = "ignoredOut")]
    pub ignored_out: Option<String>,
    #[serde(rename = "summaryOut")]
    pub summary_out: Option<String>,
    #[serde(rename = "referenceFile")]
    pub reference_file: Option<String>,
    #[serde(rename = "dumpHtml")]
    pub dump_html: Option<String>,
    pub rules: Option<RulesConfig>,
}

/// Where the page of the thread comes from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PageSource {
    Url(String),
    File(String),
}

/// The settings of a run, after merging the configuration file and the
/// command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub source: PageSource,
    pub games_file: String,
    pub games_worksheet: Option<String>,
    pub tally_out: String,
    pub invalid_out: String,
    pub ignored_out: String,
    pub summary_out: Option<String>,
    pub reference: Option<String>,
    pub dump_html: Option<String>,
    pub rules: BallotRules,
    pub debug: bool,
    pub author_debug: Option<String>,
    pub print_summary: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> TallyResult<Settings> {
        let (config, root) = match &args.config {
            Some(config_path) => {
                let config = read_config(config_path)?;
                let root = Path::new(config_path.as_str())
                    .parent()
                    .context(MissingParentDirSnafu {
                        path: config_path.clone(),
                    })?
                    .to_path_buf();
                (config, root)
            }
            None => (TallyConfig::default(), PathBuf::new()),
        };
        Ok(Settings::merge(args, &config, &root))
    }

    /// Values from the command line win. Relative paths of the configuration
    /// file are relative to the directory of that file.
    pub fn merge(args: &Args, config: &TallyConfig, root: &Path) -> Settings {
        let in_root = |p: &Option<String>| -> Option<String> {
            p.as_ref().map(|s| {
                if s == STDOUT {
                    s.clone()
                } else {
                    root.join(s).display().to_string()
                }
            })
        };

        let html_file = args.html_file.clone().or_else(|| in_root(&config.html_file));
        let source = match html_file {
            Some(p) => PageSource::File(p),
            None => PageSource::Url(
                args.url
                    .clone()
                    .or_else(|| config.url.clone())
                    .unwrap_or_else(|| DEFAULT_URL.to_string()),
            ),
        };

        let rules_config = config.rules.clone().unwrap_or_default();
        let defaults = BallotRules::DEFAULT_RULES;
        let rules = BallotRules {
            max_total_points: args
                .max_total_points
                .or(rules_config.max_total_points)
                .unwrap_or(defaults.max_total_points),
            max_points_per_game: args
                .max_points_per_game
                .or(rules_config.max_points_per_game)
                .unwrap_or(defaults.max_points_per_game),
            min_pairs: args
                .min_pairs
                .or(rules_config.min_pairs)
                .unwrap_or(defaults.min_pairs),
        };

        let or_default = |arg: &Option<String>, conf: &Option<String>, default: &str| -> String {
            arg.clone()
                .or_else(|| in_root(conf))
                .unwrap_or_else(|| default.to_string())
        };

        Settings {
            source,
            games_file: or_default(&args.games_file, &config.games_file, DEFAULT_GAMES_FILE),
            games_worksheet: args
                .games_worksheet
                .clone()
                .or_else(|| config.games_worksheet.clone()),
            tally_out: or_default(&args.tally_out, &config.tally_out, DEFAULT_TALLY_OUT),
            invalid_out: or_default(&args.invalid_out, &config.invalid_out, DEFAULT_INVALID_OUT),
            ignored_out: or_default(&args.ignored_out, &config.ignored_out, DEFAULT_IGNORED_OUT),
            summary_out: args.summary_out.clone().or_else(|| in_root(&config.summary_out)),
            reference: args.reference.clone().or_else(|| in_root(&config.reference_file)),
            dump_html: args.dump_html.clone().or_else(|| in_root(&config.dump_html)),
            rules,
            debug: args.debug,
            author_debug: args.author_debug.clone(),
            print_summary: args.print_summary,
        }
    }
}

pub fn read_config(path: &str) -> TallyResult<TallyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TallyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}
