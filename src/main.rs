// Entry point and high-level CLI flow.
//
// Each subcommand runs the same linear pipeline over the movie dataset:
// load -> normalize -> inflation-adjust -> classify -> aggregate, then
// prints a markdown table and renders a PNG chart. The `closures`
// subcommand runs the shorter business-dataset variant of the same shape.
mod aggregate;
mod classify;
mod cli;
mod closures;
mod inflation;
mod loader;
mod normalize;
mod output;
mod render;
mod reports;
mod types;
mod util;

use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};

use cli::{Cli, ClosureArgs, Command, EnrichmentArgs, FilmReportArgs, TrendsArgs};
use classify::Thresholds;
use inflation::{adjust_films, InflationTable, PriceIndex};
use render::{render_chart, ChartKind, ChartOptions};
use types::ClassifiedFilm;
use util::{format_int, format_number};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::FilmSize(args) => run_film_size(args),
        Command::Roi(args) => run_roi(args),
        Command::Trends(args) => run_trends(args),
        Command::Enrichment(args) => run_enrichment(args),
        Command::Closures(args) => run_closures(args),
    }
}

/// Load, clean, adjust and classify the movie dataset, printing the same
/// diagnostics for every report so runs are comparable.
fn prepare_films(args: &FilmReportArgs) -> Result<Vec<ClassifiedFilm>, Box<dyn Error>> {
    let (raw, load) = loader::load_films(&args.input)?;
    let (films, norm) = normalize::normalize_films(&raw, args.year_cutoff);

    println!(
        "Processing dataset... ({} rows loaded, {} kept after cleaning)",
        format_int(load.total_rows as i64),
        format_int(norm.rows_kept as i64)
    );
    if load.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to CSV parse errors.",
            format_int(load.parse_errors as i64)
        );
    }
    let dropped = norm.missing_year + norm.missing_budget + norm.past_cutoff;
    if dropped > 0 {
        println!(
            "Note: {} rows dropped (missing year: {}, missing budget: {}, released {} or later: {}).",
            format_int(dropped as i64),
            format_int(norm.missing_year as i64),
            format_int(norm.missing_budget as i64),
            args.year_cutoff,
            format_int(norm.past_cutoff as i64)
        );
    }

    let index = match &args.cpi {
        Some(path) => PriceIndex::from_json_file(path)?,
        None => PriceIndex::bundled().clone(),
    };
    let table = InflationTable::build(films.iter().map(|f| f.year), &index, args.target_year);
    let (adjusted, no_factor) = adjust_films(&films, &table);
    if no_factor > 0 {
        println!(
            "Info: {} records excluded (no price index entry for their release year).",
            format_int(no_factor as i64)
        );
    }

    let thresholds = Thresholds {
        indie_max: args.indie_max,
        blockbuster_min: args.blockbuster_min,
    };
    println!(
        "Amounts in {} dollars; Indie <= {}, Blockbuster > {}.",
        args.target_year,
        format_number(thresholds.indie_max, 0),
        format_number(thresholds.blockbuster_min, 0)
    );
    let classified = classify::classify_films(&adjusted, &thresholds);
    output::preview_table(
        "Sample of classified films",
        None,
        &reports::film_preview(&classified, 5),
        5,
    );
    Ok(classified)
}

fn chart_path(dir: &Path, file: &str) -> Result<PathBuf, Box<dyn Error>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create chart directory '{}': {}", dir.display(), e))?;
    Ok(dir.join(file))
}

fn run_film_size(args: FilmReportArgs) -> Result<(), Box<dyn Error>> {
    let films = prepare_films(&args)?;
    let (_counts, percent, rows) = reports::film_size_mix(&films);
    output::preview_table(
        "Film Size Mix by Decade",
        Some("count with share of decade"),
        &rows,
        40,
    );

    if !args.no_chart {
        let path = chart_path(&args.chart_dir, "film_size_mix.png")?;
        let opts = ChartOptions {
            title: "Percent of Movies by Film Size and Decade".to_string(),
            x_desc: "Decade".to_string(),
            y_desc: "% of Movies".to_string(),
        };
        render_chart(&percent, args.chart.unwrap_or(ChartKind::Bar), &opts, &path)?;
        println!("Chart written to {}", path.display());
    }
    Ok(())
}

fn run_roi(args: FilmReportArgs) -> Result<(), Box<dyn Error>> {
    let films = prepare_films(&args)?;
    let (pivot, rows) = reports::roi_by_size(&films);
    output::preview_table(
        "Mean ROI by Decade and Film Size",
        Some("films without revenue or with a zero budget are excluded from the mean"),
        &rows,
        60,
    );

    if !args.no_chart {
        let path = chart_path(&args.chart_dir, "roi_by_film_size.png")?;
        let opts = ChartOptions {
            title: "Mean ROI by Film Size and Decade".to_string(),
            x_desc: "Decade".to_string(),
            y_desc: "Mean ROI (%)".to_string(),
        };
        render_chart(&pivot, args.chart.unwrap_or(ChartKind::Line), &opts, &path)?;
        println!("Chart written to {}", path.display());
    }
    Ok(())
}

fn run_trends(args: TrendsArgs) -> Result<(), Box<dyn Error>> {
    let films = prepare_films(&args.film)?;
    let (pivot, rows) = reports::budget_trends(&films, args.size, args.by_year);
    let period = if args.by_year { "Year" } else { "Decade" };
    let title = format!("{} Budget and Revenue by {}", args.size, period);
    output::preview_table(&title, None, &rows, 40);

    if !args.film.no_chart {
        let path = chart_path(&args.film.chart_dir, "budget_revenue_trends.png")?;
        let opts = ChartOptions {
            title,
            x_desc: period.to_string(),
            y_desc: format!("{} USD", args.film.target_year),
        };
        render_chart(
            &pivot,
            args.film.chart.unwrap_or(ChartKind::Line),
            &opts,
            &path,
        )?;
        println!("Chart written to {}", path.display());
    }
    Ok(())
}

fn run_enrichment(args: EnrichmentArgs) -> Result<(), Box<dyn Error>> {
    let films = prepare_films(&args.film)?;
    let (percent, rows) = reports::enrichment_share(&films, args.field, args.size);
    let scope = match args.size {
        Some(size) => format!("{} films", size),
        None => "all films".to_string(),
    };
    let title = format!("Share of {} by '{}' and decade", scope, args.field.column());
    output::preview_table(&title, None, &rows, 60);

    if !args.film.no_chart {
        let path = chart_path(&args.film.chart_dir, "enrichment_share.png")?;
        let opts = ChartOptions {
            title,
            x_desc: "Decade".to_string(),
            y_desc: format!("% of {}", scope),
        };
        render_chart(
            &percent,
            args.film.chart.unwrap_or(ChartKind::Bar),
            &opts,
            &path,
        )?;
        println!("Chart written to {}", path.display());
    }
    Ok(())
}

fn run_closures(args: ClosureArgs) -> Result<(), Box<dyn Error>> {
    let (raw, load) = loader::load_businesses(&args.input)?;
    let filters = closures::ClosureFilters {
        cities: args.cities.clone(),
        since: args.since,
    };
    let (records, report) = closures::normalize_businesses(&raw, &filters);

    println!(
        "Processing dataset... ({} rows loaded, {} kept after filtering)",
        format_int(load.total_rows as i64),
        format_int(report.rows_kept as i64)
    );
    if load.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to CSV parse errors.",
            format_int(load.parse_errors as i64)
        );
    }
    let dropped = report.no_category + report.other_city + report.stale_review + report.bad_is_open;
    if dropped > 0 {
        println!(
            "Note: {} rows dropped (no matching category: {}, other city: {}, no review since {}: {}, bad is_open: {}).",
            format_int(dropped as i64),
            format_int(report.no_category as i64),
            format_int(report.other_city as i64),
            args.since,
            format_int(report.stale_review as i64),
            format_int(report.bad_is_open as i64)
        );
    }

    let (pivot, rows) = closures::closure_summary(&records);
    output::preview_table(
        "Closed Businesses by Category",
        Some("latest-review and city filters applied"),
        &rows,
        40,
    );

    if !args.no_chart {
        let path = chart_path(&args.chart_dir, "closures_by_category.png")?;
        let opts = ChartOptions {
            title: "Share of Closed Businesses by Category".to_string(),
            x_desc: "Category".to_string(),
            y_desc: "% closed".to_string(),
        };
        render_chart(&pivot, args.chart.unwrap_or(ChartKind::Bar), &opts, &path)?;
        println!("Chart written to {}", path.display());
    }
    Ok(())
}
