pub mod genre;
pub mod genre_movie;
pub mod movie;
pub mod year;
