mod routes;
mod logger;
mod config;
mod response;
mod error;
mod models;
mod middleware;
mod state;
mod handler;
mod service;
mod pipeline;
mod extractor;

mod tracer;

use std::sync::Arc;
use log::{info, warn};
use opentelemetry::global;
use opentelemetry::global::shutdown_tracer_provider;
use tokio::signal;
use crate::logger::logger::setup_logger;
use crate::config::settings::SETTINGS;
use crate::pipeline::face_pipeline::face_pipeline::{FaceBackend, FacePipeline};
use crate::pipeline::model_config::config::FaceComparisonConfig;
use crate::pipeline::module::face_comparison::FaceComparison;
use crate::routes::root::{root_routes, RouterState};


#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
use crate::tracer::tracer::init_tracer_provider;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() {
    // Setup environment and logger
    crate::config::parameter::init();
    setup_logger();
    let addr = format!("0.0.0.0:{}", SETTINGS.server.http_port);

    // Setup pipeline
    let face_pipeline: Arc<dyn FaceBackend> = Arc::new(
        FacePipeline::new(&SETTINGS.vision)
            .unwrap_or_else(|e| panic!("Failed to init face pipeline: {}", e))
    );
    let face_comparison = FaceComparison::new(FaceComparisonConfig::new(&SETTINGS.vision));
    info!("completed initializing face pipeline, match tolerance {}", face_comparison.tolerance());

    // Setup tracing
    let tracing_enabled = match &SETTINGS.tracer {
        Some(tracer) => {
            let tracer_provider = init_tracer_provider(tracer, &SETTINGS.app)
                .expect("Failed to initialize tracer provider.");
            global::set_tracer_provider(tracer_provider);
            true
        }
        None => {
            warn!("no tracer uri configured, tracing disabled");
            false
        }
    };

    // Init server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to create new listener: {}", e));
    info!("starting api server on {:?}", addr);
    let router_state = RouterState::new(face_pipeline, face_comparison);

    axum::serve(listener, root_routes(router_state, &SETTINGS.server))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| panic!("Failed to start api server: {}", e));

    if tracing_enabled {
        shutdown_tracer_provider();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
