use clap::{Parser, Subcommand};

/// Aggregates C7 contribution filings and cross-references the donors with FollowTheMoney.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the directories, the FollowTheMoney settings and
    /// the races. Every value has a default; command line options take precedence.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Merges the raw filings of every candidate into one contributions file per candidate.
    Collect {
        /// (directory) The raw filings, laid out as {city}/{candidate}/.
        #[clap(long, value_parser)]
        raw_dir: Option<String>,
        /// (directory) Where the contributions files are written.
        #[clap(long, value_parser)]
        data_dir: Option<String>,
    },
    /// Removes duplicated rows from the CSV files of a directory and sorts them by date.
    Clean {
        /// (directory, default data) The directory containing the CSV files.
        #[clap(value_parser)]
        dir: Option<String>,
    },
    /// Sums the amounts raised by every candidate.
    Totals {
        #[clap(long, value_parser)]
        data_dir: Option<String>,
        /// (file path, default totals.txt) Where the totals are written.
        #[clap(long, value_parser)]
        out: Option<String>,
    },
    /// Looks up the donors of every contributions file on FollowTheMoney.
    Search {
        /// (file path) Process only this contributions file (pipe-delimited).
        #[clap(long, value_parser)]
        csv: Option<String>,
        #[clap(long, value_parser)]
        data_dir: Option<String>,
        /// (directory, default output) Where donors-{candidate}.csv files are written.
        #[clap(long, value_parser)]
        output_dir: Option<String>,
        /// (file path) A saved search result page used for every lookup instead of the network.
        #[clap(long, value_parser)]
        test_html: Option<String>,
        /// (seconds) Pause between two requests.
        #[clap(long, value_parser)]
        delay: Option<f64>,
        /// (seconds) HTTP timeout.
        #[clap(long, value_parser)]
        timeout: Option<f64>,
    },
    /// Prints the positive-dollar FollowTheMoney matches for one name.
    Lookup {
        #[clap(value_parser)]
        first: Option<String>,
        #[clap(value_parser)]
        last: Option<String>,
        /// (file path) Parse this local HTML page instead of searching.
        #[clap(short, long, value_parser)]
        file: Option<String>,
        #[clap(long, value_parser)]
        timeout: Option<f64>,
    },
    /// Fetches the giving history of every matched donor and splits it per party.
    Party {
        /// (directory, default output) The donors-*.csv files.
        #[clap(long, value_parser)]
        in_dir: Option<String>,
        /// (directory, default by-donor-output) Where the per-party files are written.
        #[clap(long, value_parser)]
        out_dir: Option<String>,
        /// (directory) Read the histories from {eid}.json files instead of the network.
        #[clap(long, value_parser)]
        fixtures: Option<String>,
        /// (seconds) Pause between two requests.
        #[clap(long, value_parser)]
        sleep: Option<f64>,
        #[clap(long, value_parser)]
        timeout: Option<f64>,
        /// Only process the first N eids of every candidate (0 = all).
        #[clap(long, value_parser)]
        limit: Option<usize>,
    },
    /// Removes republican and democratic donors from the nonpartisan and third-party files.
    DedupeParties {
        #[clap(long, value_parser)]
        root: Option<String>,
    },
    /// Lists the donors present in several party files of a candidate.
    Duplicates {
        #[clap(long, value_parser)]
        root: Option<String>,
    },
    /// Computes the party split of the money behind every candidate.
    Splits {
        #[clap(long, value_parser)]
        root: Option<String>,
        /// (file path) A reference splits.csv. The run fails if the output differs.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Relates every donor's contribution to their giving history.
    Report {
        #[clap(long, value_parser)]
        root: Option<String>,
    },
    /// Runs all the stages in order.
    All {
        #[clap(long, value_parser)]
        test_html: Option<String>,
        #[clap(long, value_parser)]
        fixtures: Option<String>,
    },
}
