use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateMovie, ListFilter, MovieDetail, MovieSummary, UpdateMovie},
};

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let filter = normalize_filter(filter)?;
    let movies = state.service.list(&filter).await?;
    Ok(Json(movies.into_iter().map(MovieSummary::from).collect()))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDetail>> {
    Ok(Json(state.service.get(&id).await?))
}

pub async fn store(
    State(state): State<Arc<AppState>>,
    Json(mut data): Json<CreateMovie>,
) -> AppResult<(StatusCode, Json<MovieDetail>)> {
    validate_create(&mut data)?;
    let movie = state.service.create(data).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut data): Json<UpdateMovie>,
) -> AppResult<Json<MovieDetail>> {
    validate_update(&mut data)?;
    Ok(Json(state.service.update(&id, data).await?))
}

pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_create(data: &mut CreateMovie) -> AppResult<()> {
    if data.title.trim().chars().count() < 2 {
        return Err(AppError::Validation("title must be at least 2 characters".to_string()));
    }
    if data.description.trim().chars().count() < 6 {
        return Err(AppError::Validation("description must be at least 6 characters".to_string()));
    }
    if let Some(year) = &data.year {
        data.year = Some(parse_release_date(year)?);
    }
    Ok(())
}

fn validate_update(data: &mut UpdateMovie) -> AppResult<()> {
    if let Some(title) = &data.title
        && title.trim().chars().count() < 2
    {
        return Err(AppError::Validation("title must be at least 2 characters".to_string()));
    }
    if let Some(description) = &data.description
        && description.trim().chars().count() < 6
    {
        return Err(AppError::Validation("description must be at least 6 characters".to_string()));
    }
    if let Some(year) = &data.year {
        data.year = Some(parse_release_date(year)?);
    }
    Ok(())
}

fn normalize_filter(mut filter: ListFilter) -> AppResult<ListFilter> {
    if let Some(year) = &filter.year {
        filter.year = Some(parse_release_date(year)?);
    }
    Ok(filter)
}

/// Dates must arrive as `YYYY-MM-DD`. Round-tripping through `jiff` both
/// validates and canonicalizes the stored form.
fn parse_release_date(s: &str) -> AppResult<String> {
    let date: jiff::civil::Date = s
        .parse()
        .map_err(|_| AppError::Validation(format!("'{s}' is not a YYYY-MM-DD date")))?;
    Ok(date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_payload() -> CreateMovie {
        CreateMovie {
            title: "Ran".to_string(),
            description: "a king divides his realm".to_string(),
            year: None,
            genres: None,
        }
    }

    #[test]
    fn create_accepts_two_character_title() {
        let mut data = create_payload();
        assert!(validate_create(&mut data).is_ok());
    }

    #[test]
    fn create_rejects_short_title() {
        let mut data = CreateMovie { title: "R".to_string(), ..create_payload() };
        assert!(matches!(validate_create(&mut data), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_rejects_short_description() {
        let mut data = CreateMovie { description: "short".to_string(), ..create_payload() };
        assert!(matches!(validate_create(&mut data), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_rejects_malformed_year() {
        let mut data = CreateMovie { year: Some("1985".to_string()), ..create_payload() };
        assert!(matches!(validate_create(&mut data), Err(AppError::Validation(_))));

        let mut data = CreateMovie { year: Some("15/04/1988".to_string()), ..create_payload() };
        assert!(matches!(validate_create(&mut data), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_accepts_well_formed_year() {
        let mut data = CreateMovie { year: Some("1988-04-15".to_string()), ..create_payload() };
        assert!(validate_create(&mut data).is_ok());
        assert_eq!(data.year.as_deref(), Some("1988-04-15"));
    }

    #[test]
    fn update_skips_rules_for_absent_fields() {
        let mut data = UpdateMovie::default();
        assert!(validate_update(&mut data).is_ok());
    }

    #[test]
    fn update_rejects_supplied_short_fields() {
        let mut data = UpdateMovie { title: Some("R".to_string()), ..UpdateMovie::default() };
        assert!(matches!(validate_update(&mut data), Err(AppError::Validation(_))));
    }

    #[test]
    fn filter_year_is_canonicalized() {
        let filter =
            ListFilter { genre: None, year: Some("1988-04-15".to_string()) };
        let normalized = normalize_filter(filter).unwrap();
        assert_eq!(normalized.year.as_deref(), Some("1988-04-15"));
    }

    #[test]
    fn filter_rejects_malformed_year() {
        let filter = ListFilter { genre: None, year: Some("not-a-date".to_string()) };
        assert!(matches!(normalize_filter(filter), Err(AppError::Validation(_))));
    }
}
