//! surfcast - normalized surf forecasts and regional summaries
//!
//! Reads raw forecast records from the forecast API or a local dataset,
//! and prints per-beach forecasts or averaged regional wind/wave cards.

use std::error::Error;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use surfcast::cache::CacheManager;
use surfcast::cli::{Cli, Request};
use surfcast::config::Config;
use surfcast::forecast::{direction, ForecastError, ForecastPipeline};
use surfcast::report;
use surfcast::source::{DatasetSource, ForecastSource, HttpSource};

/// Installs the log subscriber on stderr
///
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "surfcast=warn",
        1 => "surfcast=info",
        _ => "surfcast=debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn pipeline<S: ForecastSource>(source: S, config: &Config) -> ForecastPipeline<S> {
    ForecastPipeline::new(source)
        .with_days_back(config.forecast.days_back)
        .with_record_limit(config.forecast.record_limit)
}

/// Executes one request and prints its result
async fn run<S: ForecastSource>(
    pipeline: ForecastPipeline<S>,
    request: Request,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    match request {
        Request::Forecast {
            beach_id,
            region,
            days_back,
            smooth,
        } => {
            let points = pipeline.get_forecast(beach_id, &region, days_back).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                let smoothed = smooth.map(|window| {
                    let headings: Vec<f64> = points.iter().map(|p| p.wind_direction_deg).collect();
                    direction::smooth(&headings, window)
                });
                print!("{}", report::forecast_table(&points, smoothed.as_deref()));
            }
        }
        Request::RegionalBeaches { beaches } => {
            let cards = pipeline.get_regional_summary(&beaches).await;
            print_cards(&cards, json)?;
        }
        Request::Region { region } => {
            let cards = pipeline.get_region_summary(region.as_deref()).await?;
            print_cards(&cards, json)?;
        }
        Request::Beaches { region } => {
            let beaches = pipeline.list_beaches(region.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&beaches)?);
            } else {
                print!("{}", report::beach_list(&beaches));
            }
        }
    }
    Ok(())
}

fn print_cards(
    cards: &[surfcast::data::RegionalSummaryCard],
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(cards)?);
    } else {
        print!("{}", report::summary_cards(cards));
    }
    Ok(())
}

async fn try_main(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    let request = Request::from_cli(&cli, &config)?;

    if let Some(ref path) = config.source.dataset {
        let source = DatasetSource::from_path(path)?;
        return run(pipeline(source, &config), request, cli.json).await;
    }

    if let Some(ref base_url) = config.source.base_url {
        let mut source = HttpSource::with_timeout(base_url, config.source.timeout())?;
        if let Some(cache_manager) = CacheManager::new() {
            source = source.with_cache(cache_manager, config.source.beach_cache_ttl_hours);
        }
        return run(pipeline(source, &config), request, cli.json).await;
    }

    Err("no forecast source configured: pass --base-url, --data, or set [source] in the config".into())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = try_main(cli).await {
        eprintln!("error: {}", e);
        if e
            .downcast_ref::<ForecastError>()
            .is_some_and(ForecastError::is_retryable)
        {
            eprintln!("the forecast source may be temporarily unreachable; try again shortly");
        }
        process::exit(1);
    }
}
