use crate::infra::{build_report_service, resolve_dataset_path};
use clap::Args;
use crime_risk::config::AppConfig;
use crime_risk::error::AppError;
use crime_risk::neighbourhoods::{
    EntrySource, FileDatasetSource, NeighbourhoodListing, NeighbourhoodReport, ReportFactor,
};
use crime_risk::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Dataset path (defaults to APP_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Neighbourhood name, matched case-insensitively
    #[arg(long, alias = "neighborhood")]
    pub(crate) neighbourhood: String,
    /// Dataset path (defaults to APP_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Print the JSON payload served by the HTTP API
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CheckArgs {
    /// Dataset path (defaults to APP_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

fn prepare(dataset: Option<PathBuf>) -> Result<PathBuf, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(resolve_dataset_path(&config, dataset))
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let path = prepare(args.dataset)?;
    let service = build_report_service(&path);
    render_listing(&service.list());
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        neighbourhood,
        dataset,
        json,
    } = args;

    let path = prepare(dataset)?;
    let service = build_report_service(&path);
    let report = service.report(Some(neighbourhood.as_str()))?;

    if json {
        let payload = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{payload}");
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let path = prepare(args.dataset)?;
    let source = FileDatasetSource::new(&path);

    match source.try_load()? {
        None => println!(
            "No dataset at {}; the built-in catalog will be served.",
            path.display()
        ),
        Some(dataset) => {
            println!("Dataset {}", path.display());
            println!("- neighbourhoods: {}", dataset.neighbourhoods().len());
            match dataset.reported_year() {
                Some(year) => println!("- reported year: {year}"),
                None => println!("- reported year: not stated"),
            }
            println!("- default sources: {}", dataset.source_links().len());
            let empty = dataset
                .neighbourhoods()
                .iter()
                .filter(|record| record.entry.counts.is_empty())
                .count();
            if empty > 0 {
                println!("- neighbourhoods without counts: {empty}");
            }
            if dataset.neighbourhoods().is_empty() {
                println!("No neighbourhoods listed; the built-in catalog will be served.");
            }
        }
    }

    Ok(())
}

fn source_label(source: EntrySource) -> &'static str {
    match source {
        EntrySource::Dataset => "dataset",
        EntrySource::Mock => "built-in catalog",
    }
}

fn render_listing(listing: &NeighbourhoodListing) {
    println!("Neighbourhoods ({})", source_label(listing.data_source));
    for name in &listing.neighbourhoods {
        println!("- {name}");
    }
}

fn render_report(report: &NeighbourhoodReport) {
    println!("Crime risk report: {}", report.neighbourhood);
    println!("Data source: {}", source_label(report.data_source));
    if let Some(year) = &report.year {
        println!("Reported year: {year}");
    }
    println!("Score: {}/100 ({} risk)", report.score, report.risk_level);

    if report.top_factors.is_empty() {
        println!("\nTop factors: none");
    } else {
        println!("\nTop factors");
        for factor in &report.top_factors {
            match factor {
                ReportFactor::Count(factor) => {
                    println!("- {}: {} incidents", factor.category, factor.count)
                }
                ReportFactor::Rate(factor) => {
                    println!("- {}: {} per 1,000", factor.category, factor.rate_per_1000)
                }
            }
        }
    }

    println!("\n{}", report.summary);

    if !report.sources.is_empty() {
        println!("\nSources");
        for source in &report.sources {
            println!("- {source}");
        }
    }
}
