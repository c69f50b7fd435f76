use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppResult;

/// Sentinel returned by every provider when the catalog has no rating for a
/// title. Absence of a rating is a normal outcome, not an error.
pub const NO_RATING: &str = "0";

/// External movie-rating lookup. Exactly one implementation is bound at
/// startup via `RATING_PROVIDER`; swapping catalogs is a config change, not
/// a code change.
#[async_trait]
pub trait RatingProvider: Send + Sync {
    async fn rating_for(&self, title: &str) -> AppResult<String>;
}

/// OMDB catalog client. Looks up by exact title and returns the `imdbRating`
/// field verbatim (a 0-10 decimal formatted as a string).
pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no OMDB_API_KEY provided - rating lookups will fail");
        }
        Self { client, base_url, api_key }
    }
}

#[async_trait]
impl RatingProvider for OmdbClient {
    async fn rating_for(&self, title: &str) -> AppResult<String> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let resp: OmdbMovie = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // OMDB answers 200 with an error body for unknown titles; the
        // rating field is simply absent then.
        Ok(resp.imdb_rating.unwrap_or_else(|| NO_RATING.to_string()))
    }
}

/// TMDB catalog client. Runs a fuzzy title search and returns the first
/// result's vote average formatted as a string.
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY provided - rating lookups will fail");
        }
        Self { client, base_url, api_key }
    }
}

#[async_trait]
impl RatingProvider for TmdbClient {
    async fn rating_for(&self, title: &str) -> AppResult<String> {
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: TmdbSearchResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rating = resp
            .results
            .into_iter()
            .next()
            .and_then(|m| m.vote_average)
            .map(|v| format!("{v}"))
            .unwrap_or_else(|| NO_RATING.to_string());

        Ok(rating)
    }
}

#[derive(Debug, Deserialize)]
struct OmdbMovie {
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    results: Vec<TmdbSearchMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchMovie {
    vote_average: Option<f64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn omdb_returns_imdb_rating() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Fight Club",
                "imdbRating": "8.8",
                "Response": "True",
            })))
            .mount(&server)
            .await;

        let client = OmdbClient::new(reqwest::Client::new(), server.uri(), "key".to_string());
        let rating = client.rating_for("Fight Club").await.unwrap();
        assert_eq!(rating, "8.8");
    }

    #[tokio::test]
    async fn omdb_falls_back_to_sentinel_when_title_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Movie not found!",
            })))
            .mount(&server)
            .await;

        let client = OmdbClient::new(reqwest::Client::new(), server.uri(), "key".to_string());
        let rating = client.rating_for("No Such Film").await.unwrap();
        assert_eq!(rating, NO_RATING);
    }

    #[tokio::test]
    async fn tmdb_returns_first_result_vote_average() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "title": "Fight Club", "vote_average": 8.4 },
                    { "title": "Fight Club II", "vote_average": 5.1 },
                ],
            })))
            .mount(&server)
            .await;

        let client = TmdbClient::new(reqwest::Client::new(), server.uri(), "key".to_string());
        let rating = client.rating_for("Fight Club").await.unwrap();
        assert_eq!(rating, "8.4");
    }

    #[tokio::test]
    async fn tmdb_falls_back_to_sentinel_on_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "results": [] })),
            )
            .mount(&server)
            .await;

        let client = TmdbClient::new(reqwest::Client::new(), server.uri(), "key".to_string());
        let rating = client.rating_for("No Such Film").await.unwrap();
        assert_eq!(rating, NO_RATING);
    }

    #[tokio::test]
    async fn non_2xx_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = TmdbClient::new(reqwest::Client::new(), server.uri(), "key".to_string());
        assert!(client.rating_for("Fight Club").await.is_err());
    }
}
