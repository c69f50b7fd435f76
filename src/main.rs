mod config;
mod db;
mod entities;
mod error;
mod models;
mod rating;
mod routes;
mod service;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{Config, RatingBackend},
    rating::{OmdbClient, RatingProvider, TmdbClient},
    service::MovieService,
};

pub struct AppState {
    pub service: MovieService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinedex=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("cinedex/0.1")
        .timeout(Duration::from_secs(config.rating_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;

    // One provider per process; swapping catalogs is a config change.
    let provider: Arc<dyn RatingProvider> = match config.rating_backend {
        RatingBackend::Tmdb => Arc::new(TmdbClient::new(
            http.clone(),
            config.tmdb_base_url.clone(),
            config.tmdb_api_key.clone(),
        )),
        RatingBackend::Omdb => Arc::new(OmdbClient::new(
            http.clone(),
            config.omdb_base_url.clone(),
            config.omdb_api_key.clone(),
        )),
    };

    let service = MovieService::new(db, provider);
    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/movies", get(routes::index).post(routes::store))
        .route("/movies/{id}", get(routes::show).put(routes::update).delete(routes::destroy))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
