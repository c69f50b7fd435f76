use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    entities::{genre, genre_movie, movie, year},
    error::{AppError, AppResult},
    models::{CreateMovie, GenreRef, ListFilter, MovieDetail, UpdateMovie},
    rating::{NO_RATING, RatingProvider},
};

/// Orchestrates movie listing, retrieval, and writes. Persistence goes
/// through sea-orm; rating enrichment goes through the provider bound at
/// startup.
#[derive(Clone)]
pub struct MovieService {
    db: DatabaseConnection,
    provider: Arc<dyn RatingProvider>,
}

impl MovieService {
    pub fn new(db: DatabaseConnection, provider: Arc<dyn RatingProvider>) -> Self {
        Self { db, provider }
    }

    /// Filtered listing. At most one filter key is honored; genre takes
    /// precedence over year when both are supplied. An unknown genre name
    /// or year value is `NotFound`. Listings are never rating-enriched.
    pub async fn list(&self, filter: &ListFilter) -> AppResult<Vec<movie::Model>> {
        if let Some(name) = &filter.genre {
            let genre = genre::Entity::find()
                .filter(genre::Column::Name.eq(name.as_str()))
                .one(&self.db)
                .await?
                .ok_or(AppError::NotFound("genre"))?;
            return Ok(genre.find_related(movie::Entity).all(&self.db).await?);
        }

        if let Some(released) = &filter.year {
            let year = year::Entity::find()
                .filter(year::Column::Released.eq(released.as_str()))
                .one(&self.db)
                .await?
                .ok_or(AppError::NotFound("year"))?;
            return Ok(year.find_related(movie::Entity).all(&self.db).await?);
        }

        Ok(movie::Entity::find().all(&self.db).await?)
    }

    /// Single-record retrieval with year and genres loaded, enriched with a
    /// freshly fetched rating.
    pub async fn get(&self, id: &str) -> AppResult<MovieDetail> {
        let movie = movie::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("movie"))?;

        let mut detail = self.load_detail(movie).await?;
        detail.rating = Some(self.fetch_rating(&detail.title).await);
        Ok(detail)
    }

    pub async fn create(&self, data: CreateMovie) -> AppResult<MovieDetail> {
        let txn = self.db.begin().await?;
        let now = now_sec();

        let year_id = match &data.year {
            Some(released) => Some(find_or_create_year(&txn, released, now).await?.id),
            None => None,
        };

        let inserted = movie::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(data.title),
            description: Set(data.description),
            year_id: Set(year_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some(ids) = data.genres {
            attach_genres(&txn, &inserted.id, ids).await?;
        }

        txn.commit().await?;
        self.load_detail(inserted).await
    }

    pub async fn update(&self, id: &str, data: UpdateMovie) -> AppResult<MovieDetail> {
        let txn = self.db.begin().await?;
        let movie = movie::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("movie"))?;
        let now = now_sec();

        if let Some(ids) = data.genres {
            // Sync semantics: the supplied set replaces the current one.
            genre_movie::Entity::delete_many()
                .filter(genre_movie::Column::MovieId.eq(id))
                .exec(&txn)
                .await?;
            attach_genres(&txn, id, ids).await?;
        }

        let mut active: movie::ActiveModel = movie.into();
        if let Some(released) = &data.year {
            active.year_id = Set(Some(find_or_create_year(&txn, released, now).await?.id));
        }
        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(description) = data.description {
            active.description = Set(description);
        }
        active.updated_at = Set(now);

        let updated = active.update(&txn).await?;
        txn.commit().await?;
        self.load_detail(updated).await
    }

    /// Removes the movie and its genre associations. A missing id deletes
    /// zero rows and still succeeds.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let txn = self.db.begin().await?;
        genre_movie::Entity::delete_many()
            .filter(genre_movie::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        movie::Entity::delete_by_id(id.to_string()).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn load_detail(&self, movie: movie::Model) -> AppResult<MovieDetail> {
        let year = match &movie.year_id {
            Some(year_id) => year::Entity::find_by_id(year_id.clone()).one(&self.db).await?,
            None => None,
        };
        let genres = movie.find_related(genre::Entity).all(&self.db).await?;

        Ok(MovieDetail {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            year: year.map(|y| y.released),
            genres: genres.into_iter().map(GenreRef::from).collect(),
            rating: None,
        })
    }

    /// Provider trouble never fails a retrieval: log and fall back to the
    /// no-rating sentinel.
    async fn fetch_rating(&self, title: &str) -> String {
        match self.provider.rating_for(title).await {
            Ok(rating) => rating,
            Err(err) => {
                warn!(error = %err, title, "rating lookup failed, using sentinel");
                NO_RATING.to_string()
            }
        }
    }
}

async fn find_or_create_year(
    conn: &impl ConnectionTrait,
    released: &str,
    now: i64,
) -> AppResult<year::Model> {
    if let Some(existing) = year::Entity::find()
        .filter(year::Column::Released.eq(released))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    Ok(year::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        released: Set(released.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?)
}

/// Resolves the supplied ids against existing genres and links the matches.
/// Unknown ids fall out of the IN query; duplicates collapse to one row.
async fn attach_genres(
    conn: &impl ConnectionTrait,
    movie_id: &str,
    genre_ids: Vec<String>,
) -> AppResult<()> {
    let genres =
        genre::Entity::find().filter(genre::Column::Id.is_in(genre_ids)).all(conn).await?;

    for g in genres {
        genre_movie::ActiveModel { genre_id: Set(g.id), movie_id: Set(movie_id.to_string()) }
            .insert(conn)
            .await?;
    }
    Ok(())
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
