use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RatingBackend {
    Tmdb,
    Omdb,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub rating_backend: RatingBackend,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub rating_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://cinedex.db?mode=rwc".to_string());

        let rating_backend = match std::env::var("RATING_PROVIDER")
            .unwrap_or_else(|_| "tmdb".to_string())
            .to_lowercase()
            .as_str()
        {
            "tmdb" => RatingBackend::Tmdb,
            "omdb" => RatingBackend::Omdb,
            other => anyhow::bail!("RATING_PROVIDER must be 'tmdb' or 'omdb', got '{other}'"),
        };

        let tmdb_api_key = std::env::var("TMDB_API_KEY").unwrap_or_else(|_| "".to_string());
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        let omdb_api_key = std::env::var("OMDB_API_KEY").unwrap_or_else(|_| "".to_string());
        let omdb_base_url = std::env::var("OMDB_BASE_URL")
            .unwrap_or_else(|_| "http://www.omdbapi.com".to_string());

        let rating_timeout_secs: u64 =
            std::env::var("RATING_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(10);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            rating_backend,
            tmdb_api_key,
            tmdb_base_url,
            omdb_api_key,
            omdb_base_url,
            rating_timeout_secs,
        })
    }
}
