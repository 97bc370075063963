// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

mod report;

use airnet_core::config::{AnalysisConfig, ConfigManager};
use airnet_core::lookup::Lookup;
use airnet_core::{EarthModel, FlightNetwork, FlightScope};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "flight_data";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset directory or flight_data.zip archive
    #[arg(short, long, env = "AIRNET_DATA")]
    data: Option<PathBuf>,

    /// Config file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Earth model for distances (overrides the config file)
    #[arg(long, value_enum)]
    earth_model: Option<EarthArg>,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum EarthArg {
    Wgs84,
    Sphere,
}

impl From<EarthArg> for EarthModel {
    fn from(arg: EarthArg) -> Self {
        match arg {
            EarthArg::Wgs84 => EarthModel::Wgs84,
            EarthArg::Sphere => EarthModel::Sphere,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    All,
    Domestic,
    International,
}

impl From<ScopeArg> for FlightScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => FlightScope::All,
            ScopeArg::Domestic => FlightScope::Domestic,
            ScopeArg::International => FlightScope::International,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset sizes and merge statistics
    Summary,
    /// Flight distance histogram
    Distances {
        #[arg(short, long, default_value_t = 30)]
        bins: usize,
    },
    /// Most frequent destinations from an airport (IATA code or id)
    Outgoing {
        airport: String,
        #[arg(short = 'n', long)]
        top: Option<usize>,
        #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,
    },
    /// Flight counts for one country, or the split for every country
    Country {
        name: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,
    },
    /// Most used airplane models
    Models {
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// Only count flights leaving these countries
        #[arg(short, long)]
        country: Vec<String>,
    },
    /// Domestic flights short enough to replace by train, with CO2 estimate
    ShortHaul {
        country: Option<String>,
        #[arg(long)]
        cutoff: Option<f64>,
    },
    /// Look up an airplane model by name or code
    Aircraft { name: Option<String> },
    /// Look up an airport by name or code
    Airport { name: String },
    /// Show or update the saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the settings in effect
    Show,
    /// Change saved settings
    Set {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        cutoff: Option<f64>,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long, value_enum)]
        earth_model: Option<EarthArg>,
    },
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let mut config = manager.load()?;
    debug!("Using config {}", manager.path().display());

    if let Commands::Config { action } = &cli.command {
        return run_config(&manager, &mut config, action);
    }

    let data = cli
        .data
        .clone()
        .or_else(|| config.data_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let earth_model = cli.earth_model.map(EarthModel::from).unwrap_or(config.earth_model);

    let network = FlightNetwork::load(&data, earth_model)
        .with_context(|| format!("Failed to load flight data from {}", data.display()))?;

    run_query(&network, &config, &cli.command);
    Ok(())
}

fn run_config(manager: &ConfigManager, config: &mut AnalysisConfig, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", manager.path().display());
            println!(
                "{}",
                serde_json::to_string_pretty(config).context("Failed to serialize config")?
            );
        }
        ConfigAction::Set {
            data,
            cutoff,
            top,
            earth_model,
        } => {
            if let Some(data) = data {
                config.data_path = Some(data.clone());
            }
            if let Some(cutoff) = cutoff {
                config.cutoff_km = *cutoff;
            }
            if let Some(top) = top {
                config.top_n = *top;
            }
            if let Some(model) = earth_model {
                config.earth_model = (*model).into();
            }
            manager.save(config)?;
            println!("Saved {}", manager.path().display());
        }
    }
    Ok(())
}

fn run_query(network: &FlightNetwork, config: &AnalysisConfig, command: &Commands) {
    match command {
        Commands::Summary => report::print_summary(network),
        Commands::Distances { bins } => {
            report::print_histogram(&network.distance_histogram(*bins));
        }
        Commands::Outgoing { airport, top, scope } => {
            let ranking =
                network.outgoing_counts_in(airport, top.unwrap_or(config.top_n), (*scope).into());
            report::print_ranking(&format!("Destinations from {}", airport), &ranking);
        }
        Commands::Country { name: Some(name), scope } => {
            let flights = network.country_flight_counts(name, (*scope).into());
            println!("{} flights leaving {}", flights, name);
            for airport in network.airports_in_country(name) {
                println!("  {}", airport);
            }
        }
        Commands::Country { name: None, .. } => {
            report::print_breakdown(&network.country_breakdown());
        }
        Commands::Models { top, country } => {
            let countries: Vec<&str> = country.iter().map(String::as_str).collect();
            let ranking = network.top_models(top.unwrap_or(config.top_n), Some(countries.as_slice()));
            report::print_ranking("Airplane models", &ranking);
        }
        Commands::ShortHaul { country, cutoff } => {
            let cutoff = cutoff.unwrap_or(config.cutoff_km);
            let estimate = network.short_haul_estimate(country.as_deref(), cutoff);
            let label = country.as_deref().unwrap_or("all countries");
            report::print_short_haul(label, &estimate, &config.emissions);
        }
        Commands::Aircraft { name: None } => {
            for model in network.aircraft_models() {
                println!("{}", model);
            }
        }
        Commands::Aircraft { name: Some(name) } => match network.aircraft_info(name) {
            Lookup::Found(model) => {
                println!("{}", model.name);
                println!("  IATA: {}", model.iata_code.as_deref().unwrap_or("-"));
                println!("  ICAO: {}", model.icao_code.as_deref().unwrap_or("-"));
            }
            missing => report::print_not_found("airplane model", name, &missing),
        },
        Commands::Airport { name } => match network.airport_info(name) {
            Lookup::Found(airport) => {
                println!("{} ({})", airport.name, airport.label());
                println!(
                    "  {}, {}",
                    airport.city.as_deref().unwrap_or("-"),
                    airport.country.as_deref().unwrap_or("-")
                );
                if let (Some(lat), Some(lon)) = (airport.lat, airport.lon) {
                    println!("  {:.4}, {:.4}", lat, lon);
                }
                let ranking = network.outgoing_counts(&airport.label(), config.top_n);
                report::print_ranking("  Top destinations", &ranking);
            }
            missing => report::print_not_found("airport", name, &missing),
        },
        Commands::Config { .. } => {}
    }
}
