use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use playlist_analyzer_rust::api::handlers;
use playlist_analyzer_rust::api::models::{AnalyzeResponse, PlanQuery};
use playlist_analyzer_rust::playlist::is_likely_playlist;
use playlist_analyzer_rust::{
    AggregatorOptions, AnalyzerClient, AnalyzerError, Config, PlaylistAggregator, Range, YouTubeCatalog,
};

fn cli() -> Command {
    Command::new("Playlist Analyzer (Rust)")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Playlist watch-time totals and study planning")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("analyze")
                .about("Total the durations of a playlist")
                .arg(Arg::new("url").help("Playlist URL").required(true))
                .arg(
                    Arg::new("start")
                        .short('s')
                        .long("start")
                        .value_name("N")
                        .help("First item (1-based)")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("end")
                        .short('e')
                        .long("end")
                        .value_name("N")
                        .help("Last item, 0 for the end of the playlist")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("0"),
                )
                .arg(
                    Arg::new("remote")
                        .short('r')
                        .long("remote")
                        .value_name("BASE_URL")
                        .help("Ask a deployed analyzer service instead of the catalog"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the raw JSON response")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Spread watch time over the days before a deadline")
                .arg(
                    Arg::new("hours")
                        .long("hours")
                        .value_name("HOURS")
                        .help("Total watch time at 1x, in hours")
                        .value_parser(clap::value_parser!(f64))
                        .required(true),
                )
                .arg(
                    Arg::new("speed")
                        .long("speed")
                        .value_name("SPEED")
                        .help("Playback speed, e.g. 1.5x")
                        .default_value("1x"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("YYYY-MM-DDTHH:MM")
                        .help("When studying starts")
                        .required(true),
                )
                .arg(
                    Arg::new("deadline")
                        .long("deadline")
                        .value_name("YYYY-MM-DDTHH:MM")
                        .help("Exam or deadline")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("serve").about("Run the HTTP API").arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .value_parser(clap::value_parser!(u16)),
            ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_env();
            config
        }
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };
    config.validate()?;
    Ok(config)
}

fn build_aggregator(config: &Config) -> Result<PlaylistAggregator> {
    config.validate_for_catalog()?;
    let catalog = YouTubeCatalog::new(config.catalog.clone())?;
    Ok(PlaylistAggregator::new(Arc::new(catalog), AggregatorOptions::from(config)))
}

fn print_analysis(response: &AnalyzeResponse) {
    println!("📺 {} by {}", response.playlist_title, response.channel_name);
    println!(
        "🎞️  Videos: {} of {} (range {})",
        response.range_videos, response.total_videos, response.range
    );
    println!("⏱️  Average video: {}", response.average_video);
    println!("   1x:    {}", response.total.normal);
    println!("   1.25x: {}", response.total.x1_25);
    println!("   1.5x:  {}", response.total.x1_5);
    println!("   2x:    {}", response.total.x2);
    println!("   Total hours: {:.2}", response.total_hours);
    for warning in &response.warnings {
        println!("⚠️  {}", warning);
    }
}

async fn run_analyze(config: &Config, matches: &ArgMatches) -> Result<()> {
    let url = matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("url is required"))?;
    let start = matches.get_one::<i64>("start").copied().unwrap_or(1);
    let end = matches.get_one::<i64>("end").copied().unwrap_or(0);
    let range = Range::new(start, end);

    if !is_likely_playlist(url) {
        warn!("{} does not look like a playlist page", url);
    }

    let outcome = match matches.get_one::<String>("remote") {
        Some(base) => {
            let client = AnalyzerClient::new(base, config.catalog.timeout_seconds)?;
            info!("🌐 Using analyzer service at {}", client.endpoint());
            client.analyze(url, range).await
        }
        None => {
            let aggregator = build_aggregator(config)?;
            aggregator
                .aggregate(url, range)
                .await
                .map(|result| AnalyzeResponse::from(&result))
        }
    };

    // Bad input and an unreachable service read differently to the user
    let response = outcome.map_err(|e| {
        match &e {
            AnalyzerError::InvalidInput(_) => error!("❌ {}", e),
            AnalyzerError::Network(_) => error!("📡 {}", e),
            _ => error!("Analysis failed: {}", e),
        }
        e
    })?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_analysis(&response);
    }
    Ok(())
}

async fn run_plan(config: &Config, matches: &ArgMatches) -> Result<()> {
    let query = PlanQuery {
        total_hours: matches.get_one::<f64>("hours").map(ToString::to_string),
        speed: matches.get_one::<String>("speed").cloned(),
        start: matches.get_one::<String>("start").cloned(),
        deadline: matches.get_one::<String>("deadline").cloned(),
    };

    let response = handlers::plan(&query, &config.schedule).await?;
    if !response.achievable {
        println!("📅 Not achievable yet: {}", response.message.unwrap_or_default());
        return Ok(());
    }

    println!(
        "📅 {} study days, {} needed, {} per day",
        response.study_days.unwrap_or_default(),
        response.needed.unwrap_or_default(),
        response.per_day.unwrap_or_default()
    );
    for line in &response.day_breakdown {
        println!("   {}", line);
    }
    Ok(())
}

#[cfg(feature = "api")]
async fn run_serve(mut config: Config, matches: &ArgMatches) -> Result<()> {
    use playlist_analyzer_rust::api::ApiServer;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    let aggregator = build_aggregator(&config)?;
    info!("{}", config.summary());

    let server = ApiServer::new(aggregator, Arc::new(config)).start_background();

    tokio::select! {
        result = server => result??,
        _ = tokio::signal::ctrl_c() => info!("🛑 Shutting down"),
    }
    Ok(())
}

#[cfg(not(feature = "api"))]
async fn run_serve(_config: Config, _matches: &ArgMatches) -> Result<()> {
    Err(anyhow!("built without the `api` feature"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    // Initialize logging
    let default_filter = if matches.get_flag("verbose") {
        "playlist_analyzer=debug,playlist_analyzer_rust=debug,info"
    } else {
        "playlist_analyzer=info,playlist_analyzer_rust=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("analyze", sub)) => run_analyze(&config, sub).await,
        Some(("plan", sub)) => run_plan(&config, sub).await,
        Some(("serve", sub)) => run_serve(config, sub).await,
        _ => Err(anyhow!("unknown command")),
    }
}
