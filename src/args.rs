use clap::Parser;

/// This is a tallying program for point ballots posted in a discussion thread.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of this tally. Any option given on the
    /// command line overrides the value of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (URL) The page of the voting thread.
    #[clap(short, long, value_parser)]
    pub url: Option<String>,

    /// (file path) A saved copy of the page of the voting thread. Takes precedence over --url.
    #[clap(long, value_parser)]
    pub html_file: Option<String>,

    /// (file path, default games_population.csv) The list of games, TAB separated, with a 'game'
    /// column and optional 'alias*' and 'roll_over_points' columns. Excel files (.xlsx) are also
    /// accepted.
    #[clap(short, long, value_parser)]
    pub games_file: Option<String>,

    /// (optional) When using an Excel file for the games, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub games_worksheet: Option<String>,

    /// (file path, default tally.csv) Where to write the points of every game.
    #[clap(long, value_parser)]
    pub tally_out: Option<String>,

    /// (file path, default invalid_votes.txt) Where to write the list of rejected ballots.
    #[clap(long, value_parser)]
    pub invalid_out: Option<String>,

    /// (file path, default ignored_votes.txt) Where to write the votes for unknown titles.
    #[clap(long, value_parser)]
    pub ignored_out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the tally will be written in JSON
    /// format to the given location.
    #[clap(long, value_parser)]
    pub summary_out: Option<String>,

    /// (file path) A reference tally in CSV format. If provided, tallyvotes will check that the
    /// computed tally matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default 1) Minimum number of 'Title (N)' pairs for a comment to be treated as a ballot.
    #[clap(long, value_parser)]
    pub min_pairs: Option<usize>,

    /// (default 20) Maximum number of points in a ballot.
    #[clap(long, value_parser)]
    pub max_total_points: Option<u64>,

    /// (default 5) Maximum number of points a ballot can give to one game.
    #[clap(long, value_parser)]
    pub max_points_per_game: Option<u64>,

    /// (file path) If specified, the fetched page is saved to this location.
    #[clap(long, value_parser)]
    pub dump_html: Option<String>,

    /// (regular expression) Authors for whom every step of the processing is logged.
    #[clap(long, value_parser)]
    pub author_debug: Option<String>,

    /// If passed as an argument, prints the top of the tally.
    #[clap(long, takes_value = false)]
    pub print_summary: bool,

    /// If passed as an argument, reports the problems found in the games list (key collisions,
    /// unreadable rollover points) and the detail of every ballot.
    #[clap(long, takes_value = false)]
    pub debug: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
