use std::net::SocketAddr;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::planner::PlannerConfig;
use transit_server::web::{create_router, AppState, Dataset};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_server=info,tower_http=info".into()),
        )
        .init();

    let dataset_path =
        std::env::var("TRANSIT_DATASET").unwrap_or_else(|_| "dataset.json".to_string());
    let dataset = match Dataset::from_json_file(Path::new(&dataset_path)) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("failed to load dataset from {dataset_path}: {err}");
            std::process::exit(1);
        }
    };
    info!(
        stops = dataset.timetable.n_stops(),
        connections = dataset.timetable.connections().len(),
        transfers = dataset.transfers.len(),
        "dataset loaded"
    );

    let state = AppState::new(dataset, PlannerConfig::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("TRANSIT_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("TRANSIT_ADDR must be host:port");
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind");
    axum::serve(listener, app).await.expect("serve");
}
