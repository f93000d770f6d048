#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for outbreak spread analysis.
//!
//! Runs analyses over a CSV export of case records and prints the results
//! as pretty JSON, or starts the API server over the same data.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use outbreak_map_cases::{
    CASES_PATH_ENV, CaseSourceError, Clock, CsvCaseSource, FixedClock, SystemClock,
};
use outbreak_map_district::{DistrictRegistry, RegistryError};
use outbreak_map_spread::{DEFAULT_WINDOW_DAYS, SpreadService};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "outbreak_map", about = "Epidemiological spread analysis tool")]
struct Cli {
    /// CSV file of case records (overrides `CASES_PATH`)
    #[arg(long, global = true)]
    cases: Option<PathBuf>,
    /// District reference data TOML (overrides `DISTRICTS_PATH`)
    #[arg(long, global = true)]
    districts: Option<PathBuf>,
    /// Analysis date as `YYYY-MM-DD` (defaults to today, UTC)
    #[arg(long, global = true)]
    now: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full spread analysis of one disease
    Analyze {
        /// Disease name (case-insensitive)
        #[arg(long)]
        disease: String,
        /// Analysis window in days (7-365)
        #[arg(long, default_value_t = i64::from(DEFAULT_WINDOW_DAYS))]
        days: i64,
    },
    /// Near-term prediction for a single district
    Predict {
        /// District name, exactly as in the reference data
        district: String,
        /// Disease name (case-insensitive)
        #[arg(long)]
        disease: String,
        /// Analysis window in days (7-365)
        #[arg(long, default_value_t = i64::from(DEFAULT_WINDOW_DAYS))]
        days: i64,
    },
    /// Compare the spread of several diseases
    Compare {
        /// Comma-separated disease names (at least two)
        #[arg(long, value_delimiter = ',')]
        diseases: Vec<String>,
        /// Analysis window in days (7-365)
        #[arg(long, default_value_t = i64::from(DEFAULT_WINDOW_DAYS))]
        days: i64,
    },
    /// Inferred propagation routes of one disease
    Routes {
        /// Disease name (case-insensitive)
        #[arg(long)]
        disease: String,
        /// Only show routes leaving this district
        #[arg(long)]
        origin: Option<String>,
        /// Analysis window in days (7-365)
        #[arg(long, default_value_t = i64::from(DEFAULT_WINDOW_DAYS))]
        days: i64,
    },
    /// List districts with their density and baseline risk
    Districts {
        /// Print the overview as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start the API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = outbreak_map_server::DEFAULT_BIND_ADDR)]
        bind_addr: String,
        /// Port to listen on
        #[arg(long, default_value_t = outbreak_map_server::DEFAULT_PORT)]
        port: u16,
    },
}

impl Cli {
    fn registry(&self) -> Result<DistrictRegistry, RegistryError> {
        match &self.districts {
            Some(path) => {
                log::debug!("Loading districts from {}", path.display());
                DistrictRegistry::load(path)
            }
            None => DistrictRegistry::from_env(),
        }
    }

    fn case_source(&self) -> Result<CsvCaseSource, CaseSourceError> {
        match &self.cases {
            Some(path) => CsvCaseSource::from_path(path),
            None => CsvCaseSource::from_env()
                .inspect_err(|_| log::error!("Pass --cases or set {CASES_PATH_ENV}")),
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        match self.now {
            Some(date) => Arc::new(FixedClock(date)),
            None => Arc::new(SystemClock),
        }
    }

    fn service(&self) -> Result<SpreadService, Box<dyn std::error::Error>> {
        let registry = self.registry()?;
        let source = self.case_source()?;
        Ok(SpreadService::new(
            Arc::new(registry),
            Arc::new(source),
            self.clock(),
        ))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_districts(registry: &DistrictRegistry) {
    let overview = registry.density_overview();

    println!("{}", overview.city);
    println!(
        "{:<20} {:>10} {:>10} {:>12}  RISK",
        "DISTRICT", "POPULATION", "AREA KM2", "DENSITY"
    );
    println!("{}", "-".repeat(64));
    for district in &overview.districts {
        println!(
            "{:<20} {:>10} {:>10.1} {:>12.0}  {}",
            district.profile.name,
            district.profile.population,
            district.profile.area_km2,
            district.profile.density_per_km2,
            district.baseline_risk
        );
    }
    println!("{}", "-".repeat(64));
    println!(
        "{:<20} {:>10} {:>10.1} {:>12.0}",
        "TOTAL", overview.total_population, overview.total_area_km2, overview.mean_density_per_km2
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze { disease, days } => {
            let analysis = cli.service()?.analyze(disease, *days).await?;
            print_json(&analysis)?;
        }
        Commands::Predict {
            district,
            disease,
            days,
        } => {
            let prediction = cli
                .service()?
                .district_prediction(district, disease, *days)
                .await?;
            print_json(&prediction)?;
        }
        Commands::Compare { diseases, days } => {
            let comparison = cli.service()?.compare(diseases.as_slice(), *days).await?;
            print_json(&comparison)?;
        }
        Commands::Routes {
            disease,
            origin,
            days,
        } => {
            let report = cli
                .service()?
                .route_report(disease, origin.as_deref(), *days)
                .await?;
            print_json(&report)?;
        }
        Commands::Districts { json } => {
            let registry = cli.registry()?;
            if *json {
                print_json(&registry.density_overview())?;
            } else {
                print_districts(&registry);
            }
        }
        Commands::Serve { bind_addr, port } => {
            let service = cli.service()?;
            let bind_addr = bind_addr.clone();
            let port = *port;

            // The server uses actix-web's runtime, so it runs in a blocking
            // task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(outbreak_map_server::serve(
                    service, &bind_addr, port,
                ))
            })
            .await??;
        }
    }

    Ok(())
}
