//! Flood Monitoring Dashboard - command-line front end
//!
//! Walks the river → town → station selection against the Environment
//! Agency flood-monitoring API and prints the last 24 hours (by default)
//! of readings for the chosen station as a table.
//!
//! Usage:
//!   cargo run                                             # list rivers
//!   cargo run -- --river Thames                           # list towns on the Thames
//!   cargo run -- --river Thames --town Oxford             # list stations in Oxford
//!   cargo run -- --station 1501TH [--hours 48] [--measure stage]
//!   cargo run -- --station 1501TH --measures              # measurement kinds for a station
//!   cargo run -- --endpoint 8080                          # serve the same flow as JSON
//!
//! Environment:
//!   FLOMON_CONFIG - path to the configuration file (default: flomon.toml)

use flomon_dashboard::catalog::Catalog;
use flomon_dashboard::config::{self, DEFAULT_CONFIG_PATH};
use flomon_dashboard::dashboard::{self, Selection, SelectionView};
use flomon_dashboard::endpoint::{self, EndpointState};
use flomon_dashboard::ingest::client::FloodMonitorClient;
use flomon_dashboard::logging::{self, LogLevel};
use flomon_dashboard::model::{ErrorKind, Measure, MonitorError, validate_window_hours};
use std::env;

/// Options parsed from the command line.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<String>,
    river: Option<String>,
    town: Option<String>,
    station: Option<String>,
    measure: Option<Measure>,
    hours: Option<u32>,
    list_measures: bool,
    endpoint: Option<u16>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--measures" {
            cli.list_measures = true;
            i += 1;
            continue;
        }

        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} requires a value", flag))?
            .clone();

        match flag {
            "--config" => cli.config = Some(value),
            "--river" => cli.river = Some(value),
            "--town" => cli.town = Some(value),
            "--station" => cli.station = Some(value),
            "--measure" => {
                let measure = value.parse::<Measure>().map_err(|e| e.message().to_string())?;
                cli.measure = Some(measure);
            }
            "--hours" => {
                let hours = value
                    .parse::<u32>()
                    .map_err(|_| format!("--hours must be a positive whole number, got {}", value))?;
                cli.hours = Some(validate_window_hours(hours).map_err(|e| format!("--hours: {}", e))?);
            }
            "--endpoint" => {
                cli.endpoint = Some(value.parse().map_err(|_| format!("Invalid port: {}", value))?)
            }
            _ => return Err(format!("Unknown argument: {}", flag)),
        }
        i += 2;
    }

    if cli.town.is_some() && cli.river.is_none() {
        return Err("--town requires --river".to_string());
    }
    if cli.list_measures && cli.station.is_none() {
        return Err("--measures requires --station".to_string());
    }

    Ok(cli)
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config PATH] [--river NAME [--town NAME]] [--station ID [--measures] \
         [--measure KIND] [--hours N]] [--endpoint PORT]",
        program
    )
}

fn main() {
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("flomon_dashboard");
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", usage(program));
            std::process::exit(1);
        }
    };

    let config_path = cli
        .config
        .clone()
        .or_else(|| env::var("FLOMON_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match config::load_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };

    logging::init_logger(
        config.logging.log_level().unwrap_or(LogLevel::Info),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );

    let client = FloodMonitorClient::with_base_url(&config.api.base_url);
    let window_hours = cli.hours.unwrap_or(config.api.window_hours);

    if cli.list_measures {
        let station_id = cli.station.as_deref().unwrap_or_default();
        match client.fetch_station_measures(station_id) {
            Ok(measures) => {
                println!("Measures for station {}:", station_id);
                for m in measures {
                    println!("   {:<18} {}", m.measure, m.unit);
                }
            }
            Err(e) => fail(&e),
        }
        return;
    }

    println!("🌊 Flood Monitoring Dashboard");
    println!("=============================\n");

    let catalog = match client.fetch_stations() {
        Ok(stations) => Catalog::from(stations),
        Err(e) => fail(&e),
    };

    if let Some(port) = cli.endpoint.or(config.endpoint.port) {
        let state = EndpointState {
            client,
            catalog,
            window_hours,
        };
        if let Err(e) = endpoint::start_endpoint_server(port, state) {
            eprintln!("❌ Endpoint server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let selection = Selection {
        river: cli.river,
        town: cli.town,
        station: cli.station,
        measure: cli.measure,
        window_hours,
    };

    match dashboard::resolve(&client, &catalog, &selection) {
        Ok(view) => print_view(&view),
        Err(e) if e.kind() == ErrorKind::EmptyResult => {
            println!("{} (last {} hours).", e.why(), window_hours);
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &MonitorError) -> ! {
    eprintln!("\n❌ {}", e.why());
    eprintln!("   {}\n", e);
    std::process::exit(1);
}

fn print_view(view: &SelectionView) {
    match view {
        SelectionView::Rivers { rivers } => {
            println!("Rivers ({}):", rivers.len());
            for river in rivers {
                println!("   {}", river);
            }
            println!("\nPick one with --river NAME");
        }
        SelectionView::Towns { river, towns } => {
            if towns.is_empty() {
                println!("No towns with active stations on {}", river);
                return;
            }
            println!("Towns on {} ({}):", river, towns.len());
            for town in towns {
                println!("   {}", town);
            }
            println!("\nPick one with --town NAME");
        }
        SelectionView::Stations { river, town, stations } => {
            if stations.is_empty() {
                println!("No active stations on {} in {}", river, town);
                return;
            }
            println!("Stations on {} in {}:", river, town);
            for station in stations {
                println!("   {:<10} {}", station.id, station.label);
            }
            println!("\nPick one with --station ID");
        }
        SelectionView::Readings {
            station_id,
            station,
            window_hours,
            table,
        } => {
            let name = station.as_ref().map(|s| s.label.as_str()).unwrap_or(station_id);
            println!("📈 {} ({}) - last {} hours", name, station_id, window_hours);

            if table.is_empty() {
                println!("   No usable readings ({} missing values dropped)", table.dropped);
                return;
            }

            for series in &table.series {
                println!("\n   {} [{}]", series.measure_type, series.unit);
                for row in &series.rows {
                    println!("   {}  {:>10.3}", row.timestamp.format("%Y-%m-%d %H:%M"), row.value);
                }
            }
            if table.dropped > 0 {
                println!("\n   ({} readings with missing values dropped)", table.dropped);
            }
        }
    }
}
