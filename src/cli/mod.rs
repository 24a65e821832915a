use std::{path::Path, sync::Arc};

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    types::{LocalEvent, TrafficUpdate, WeatherAlert, WeatherSnapshot},
    AlternativeSuggestionGenerator, CandidatePools, EngineConfig, GenerativePlanner, Itinerary,
    ItineraryAssembler, OpenAiCompatibleClient, RealTimeUpdateGenerator, StaticCandidateProvider,
    StaticSignalProvider, TextCompletion, TripRequest,
};

/// Contents of a `--signals` file.
#[derive(Debug, Default, Deserialize)]
struct SignalsFile {
    #[serde(default)]
    weather: WeatherSnapshot,
    #[serde(default)]
    events: Vec<LocalEvent>,
}

fn command() -> Command {
    let model = Arg::new("model")
        .short('m')
        .long("model")
        .value_name("MODEL")
        .help("Completion model (or set PLANSMITH_MODEL)");

    Command::new("plansmith")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Synthesize day-by-day travel itineraries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Build an itinerary for a trip request")
                .arg(
                    Arg::new("request")
                        .short('r')
                        .long("request")
                        .value_name("FILE")
                        .help("Trip request JSON")
                        .required(true),
                )
                .arg(
                    Arg::new("candidates")
                        .short('c')
                        .long("candidates")
                        .value_name("FILE")
                        .help("Candidate catalogue JSON (activities, accommodations, flights, restaurants)"),
                )
                .arg(
                    Arg::new("signals")
                        .short('s')
                        .long("signals")
                        .value_name("FILE")
                        .help("Weather snapshot and local events JSON"),
                )
                .arg(
                    Arg::new("offline")
                        .long("offline")
                        .action(ArgAction::SetTrue)
                        .help("Skip the completion service and use the deterministic planner"),
                )
                .arg(model.clone()),
        )
        .subcommand(
            Command::new("suggest")
                .about("Propose alternatives to an itinerary based on feedback")
                .arg(
                    Arg::new("itinerary")
                        .short('i')
                        .long("itinerary")
                        .value_name("FILE")
                        .help("Itinerary JSON produced by `generate`")
                        .required(true),
                )
                .arg(
                    Arg::new("feedback")
                        .short('f')
                        .long("feedback")
                        .value_name("TEXT")
                        .help("What the traveler would like changed")
                        .required(true),
                )
                .arg(model.clone()),
        )
        .subcommand(
            Command::new("update")
                .about("Adjust an itinerary for weather alerts and traffic")
                .arg(
                    Arg::new("itinerary")
                        .short('i')
                        .long("itinerary")
                        .value_name("FILE")
                        .help("Itinerary JSON produced by `generate`")
                        .required(true),
                )
                .arg(
                    Arg::new("weather-alerts")
                        .short('w')
                        .long("weather-alerts")
                        .value_name("FILE")
                        .help("Weather alerts JSON array"),
                )
                .arg(
                    Arg::new("traffic")
                        .short('t')
                        .long("traffic")
                        .value_name("FILE")
                        .help("Traffic updates JSON array"),
                )
                .arg(model),
        )
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("{path} is not valid JSON for this input"))
}

fn read_optional<T: DeserializeOwned + Default>(
    matches: &ArgMatches,
    name: &str,
) -> anyhow::Result<T> {
    match matches.get_one::<String>(name) {
        Some(path) => read_json(path),
        None => Ok(T::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<EngineConfig> {
    let mut config = EngineConfig::from_env()?;
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    Ok(config)
}

/// The configured completion client, or `None` (with a warning) when it cannot be built.
fn completion_service(config: &EngineConfig) -> Option<Arc<dyn TextCompletion>> {
    match OpenAiCompatibleClient::from_config(config) {
        Ok(client) => {
            info!(model = client.model(), base_url = %config.base_url, "completion service ready");
            Some(Arc::new(client))
        }
        Err(err) => {
            warn!(error = %err, "completion service unavailable");
            None
        }
    }
}

async fn generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let request_path = matches
        .get_one::<String>("request")
        .context("--request is required")?;
    let request: TripRequest = read_json(request_path)?;
    let catalogue: CandidatePools = read_optional(matches, "candidates")?;
    let signals: SignalsFile = read_optional(matches, "signals")?;

    let mut assembler = ItineraryAssembler::new()
        .with_candidate_provider(Arc::new(StaticCandidateProvider::new(catalogue)))
        .with_signal_provider(Arc::new(StaticSignalProvider::new(
            signals.weather,
            signals.events,
        )));

    if !matches.get_flag("offline") {
        let config = load_config(matches)?;
        if let Some(service) = completion_service(&config) {
            assembler = assembler.with_planner(GenerativePlanner::from_config(service, &config));
        }
    }

    let itinerary = assembler.assemble(request).await?;
    print_json(&itinerary)
}

async fn suggest(matches: &ArgMatches) -> anyhow::Result<()> {
    let itinerary: Itinerary = read_json(
        matches
            .get_one::<String>("itinerary")
            .context("--itinerary is required")?,
    )?;
    let feedback = matches
        .get_one::<String>("feedback")
        .context("--feedback is required")?;

    let config = load_config(matches)?;
    let generator =
        AlternativeSuggestionGenerator::from_config(completion_service(&config), &config);
    let suggestions = generator.suggest(&itinerary, feedback).await?;
    print_json(&suggestions)
}

async fn update(matches: &ArgMatches) -> anyhow::Result<()> {
    let itinerary: Itinerary = read_json(
        matches
            .get_one::<String>("itinerary")
            .context("--itinerary is required")?,
    )?;
    let alerts: Vec<WeatherAlert> = read_optional(matches, "weather-alerts")?;
    let traffic: Vec<TrafficUpdate> = read_optional(matches, "traffic")?;

    let config = load_config(matches)?;
    let generator = RealTimeUpdateGenerator::from_config(completion_service(&config), &config);
    let updates = generator.updates(&itinerary, &alerts, &traffic).await?;
    print_json(&updates)
}

/// CLI entry point for the plansmith binary
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    match matches.subcommand() {
        Some(("generate", sub)) => generate(sub).await,
        Some(("suggest", sub)) => suggest(sub).await,
        Some(("update", sub)) => update(sub).await,
        other => anyhow::bail!("unknown subcommand: {:?}", other.map(|(name, _)| name)),
    }
}
