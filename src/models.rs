use serde::{Deserialize, Serialize};

use crate::entities::{genre, movie};

/// Recognized `GET /movies` query keys. When both are present the genre
/// filter wins; see `MovieService::list`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListFilter {
    pub genre: Option<String>,
    pub year: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    pub description: String,
    pub year: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// Partial update payload. Absent fields leave the stored values unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<String>,
    pub genres: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year_id: Option<String>,
}

impl From<movie::Model> for MovieSummary {
    fn from(m: movie::Model) -> Self {
        Self { id: m.id, title: m.title, description: m.description, year_id: m.year_id }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GenreRef {
    pub id: String,
    pub name: String,
}

impl From<genre::Model> for GenreRef {
    fn from(g: genre::Model) -> Self {
        Self { id: g.id, name: g.name }
    }
}

/// Full movie view with relations loaded. `rating` is transient: populated
/// only on single-record retrieval, never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year: Option<String>,
    pub genres: Vec<GenreRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}
