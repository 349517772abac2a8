use axum::{routing::get, Extension, Router};
use exam_ranking::build_service;
use exam_ranking::config::AppConfig;
use exam_ranking::ranking::handlers::{handle_get_ranking, handle_post_ranking, ENDPOINT_RANKING};
use exam_ranking::ranking::types::RankingParams;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = AppConfig::from_env()?;

    if args.get(1).map(String::as_str) == Some("rank") {
        return rank_once(&config, &args[2..]).await;
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                let value = flag_value(&args, i)?;
                config.bind_addr = value.parse::<SocketAddr>()?;
                i += 2;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                return Ok(());
            }
            other => {
                print_usage(&args[0]);
                anyhow::bail!("unknown argument: {}", other);
            }
        }
    }

    tracing::info!("Query engine: {}", config.engine_url);
    tracing::info!(
        "Target table: {}.{} (output: {})",
        config.target.database,
        config.target.table,
        config.target.output_location
    );
    tracing::info!(
        "Polling budget: {} attempts, base delay {:?} (worst case {:?})",
        config.poll.max_attempts,
        config.poll.base_delay,
        config.poll.worst_case_wait()
    );

    let service = Arc::new(build_service(&config));

    let app = Router::new()
        .route(
            ENDPOINT_RANKING,
            get(handle_get_ranking).post(handle_post_ranking),
        )
        .layer(Extension(service));

    tracing::info!("HTTP server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `rank --exam <code> --start-date <YYYY-MM-DD> --end-date <YYYY-MM-DD>`
///
/// Serves a single request and prints the envelope to stdout.
async fn rank_once(config: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let mut params = RankingParams::default();

    let mut i = 0;
    while i < args.len() {
        let value = flag_value(args, i)?;
        match args[i].as_str() {
            "--exam" => params.exam = Some(value.to_string()),
            "--start-date" => params.start_date = Some(value.to_string()),
            "--end-date" => params.end_date = Some(value.to_string()),
            other => anyhow::bail!("unknown argument: {}", other),
        }
        i += 2;
    }

    let response = build_service(config).handle(params).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn flag_value(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", args[i]))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--bind <addr:port>]", program);
    eprintln!(
        "       {} rank --exam <code|ALL> --start-date <YYYY-MM-DD> --end-date <YYYY-MM-DD>",
        program
    );
    eprintln!("Example: {} --bind 127.0.0.1:8080", program);
    eprintln!(
        "Example: {} rank --exam SAA --start-date 2024-01-01 --end-date 2024-01-31",
        program
    );
}
