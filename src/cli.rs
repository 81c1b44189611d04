//! Command-line interface argument parsing.
//!
//! Every analysis knob that varies between runs lives here as a flag with
//! a default, so no threshold or cutoff is hard-coded at a use site.

use crate::render::ChartKind;
use crate::types::{EnrichmentField, FilmSize};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Film budget and business closure trend reports.
///
/// Reads a CSV, converts nominal dollar amounts to a fixed target year
/// with a price index, buckets films by adjusted budget and prints
/// summary tables plus PNG charts.
///
/// Examples:
///   film-trends film-size --input movies.csv
///   film-trends roi --input movies.csv --indie-max 2000000
///   film-trends trends --input movies.csv --size indie --chart area
///   film-trends closures --input businesses.csv --since 2018-01-01
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Share of films per decade by budget class
    FilmSize(FilmReportArgs),

    /// Mean return on investment per decade and budget class
    Roi(FilmReportArgs),

    /// Mean adjusted budget and revenue per decade for one budget class
    Trends(TrendsArgs),

    /// Share of films per decade carrying an enrichment label
    Enrichment(EnrichmentArgs),

    /// Closure rates for art galleries vs. restaurants
    Closures(ClosureArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct FilmReportArgs {
    /// Movie dataset CSV (id, title, release_date, budget, revenue, ...)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Price index JSON snapshot (year -> index value); the bundled CPI-U
    /// table is used when omitted
    #[arg(long, value_name = "FILE")]
    pub cpi: Option<PathBuf>,

    /// Year all dollar amounts are converted to
    #[arg(long, default_value_t = 2024, value_name = "YEAR")]
    pub target_year: i32,

    /// Adjusted budgets at or below this are Indie
    #[arg(long, default_value_t = 15_000_000.0, value_name = "USD")]
    pub indie_max: f64,

    /// Adjusted budgets above this are Blockbuster
    #[arg(long, default_value_t = 100_000_000.0, value_name = "USD")]
    pub blockbuster_min: f64,

    /// Drop films released in or after this year
    #[arg(long, default_value_t = 2025, value_name = "YEAR")]
    pub year_cutoff: i32,

    /// Directory chart PNGs are written to
    #[arg(long, default_value = "charts", value_name = "DIR")]
    pub chart_dir: PathBuf,

    /// Override the report's default chart kind
    #[arg(long, value_enum, value_name = "KIND")]
    pub chart: Option<ChartKind>,

    /// Skip chart rendering, print tables only
    #[arg(long)]
    pub no_chart: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TrendsArgs {
    #[command(flatten)]
    pub film: FilmReportArgs,

    /// Budget class to trace across decades
    #[arg(long, value_enum, default_value = "blockbuster")]
    pub size: FilmSize,

    /// Group by individual release year instead of decade
    #[arg(long)]
    pub by_year: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EnrichmentArgs {
    #[command(flatten)]
    pub film: FilmReportArgs,

    /// Enrichment column to group by
    #[arg(long, value_enum)]
    pub field: EnrichmentField,

    /// Restrict to one budget class; all films when omitted
    #[arg(long, value_enum)]
    pub size: Option<FilmSize>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClosureArgs {
    /// Business dataset CSV (business_id, categories, city, is_open,
    /// last_review_date)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Cities to include, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = vec!["New York City".to_string(), "Los Angeles".to_string()],
        value_name = "CITY"
    )]
    pub cities: Vec<String>,

    /// Only count businesses whose latest review is on or after this date
    #[arg(long, default_value = "2018-01-01", value_name = "DATE")]
    pub since: NaiveDate,

    /// Directory chart PNGs are written to
    #[arg(long, default_value = "charts", value_name = "DIR")]
    pub chart_dir: PathBuf,

    /// Override the report's default chart kind
    #[arg(long, value_enum, value_name = "KIND")]
    pub chart: Option<ChartKind>,

    /// Skip chart rendering, print tables only
    #[arg(long)]
    pub no_chart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_documented_run_configuration() {
        let cli = Cli::try_parse_from(["film-trends", "film-size", "--input", "movies.csv"])
            .unwrap();
        let Command::FilmSize(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.target_year, 2024);
        assert_eq!(args.indie_max, 15_000_000.0);
        assert_eq!(args.blockbuster_min, 100_000_000.0);
        assert_eq!(args.year_cutoff, 2025);
        assert!(!args.no_chart);
    }

    #[test]
    fn trends_defaults_to_blockbusters_by_decade() {
        let cli = Cli::try_parse_from(["film-trends", "trends", "--input", "movies.csv"]).unwrap();
        let Command::Trends(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.size, FilmSize::Blockbuster);
        assert!(!args.by_year);
    }

    #[test]
    fn threshold_variants_are_reachable_by_flag() {
        let cli = Cli::try_parse_from([
            "film-trends",
            "roi",
            "--input",
            "movies.csv",
            "--indie-max",
            "2000000",
            "--blockbuster-min",
            "200000000",
        ])
        .unwrap();
        let Command::Roi(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.indie_max, 2_000_000.0);
        assert_eq!(args.blockbuster_min, 200_000_000.0);
    }

    #[test]
    fn closure_filters_parse_cities_and_date() {
        let cli = Cli::try_parse_from([
            "film-trends",
            "closures",
            "--input",
            "businesses.csv",
            "--cities",
            "New York City,Chicago",
            "--since",
            "2019-06-01",
        ])
        .unwrap();
        let Command::Closures(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.cities, vec!["New York City", "Chicago"]);
        assert_eq!(args.since, NaiveDate::from_ymd_opt(2019, 6, 1).unwrap());
    }
}
