use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Years::Table)
                    .if_not_exists()
                    .col(string(Years::Id).primary_key())
                    .col(string(Years::Released))
                    .col(big_integer(Years::CreatedAt))
                    .col(big_integer(Years::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_years_released_unique")
                    .table(Years::Table)
                    .col(Years::Released)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(string(Genres::Id).primary_key())
                    .col(string(Genres::Name))
                    .col(big_integer(Genres::CreatedAt))
                    .col(big_integer(Genres::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_genres_name_unique")
                    .table(Genres::Table)
                    .col(Genres::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(string(Movies::Id).primary_key())
                    .col(string(Movies::Title))
                    .col(string(Movies::Description))
                    .col(string_null(Movies::YearId))
                    .col(big_integer(Movies::CreatedAt))
                    .col(big_integer(Movies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_year_id")
                    .table(Movies::Table)
                    .col(Movies::YearId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GenreMovie::Table)
                    .if_not_exists()
                    .col(string(GenreMovie::GenreId))
                    .col(string(GenreMovie::MovieId))
                    .primary_key(
                        Index::create()
                            .col(GenreMovie::GenreId)
                            .col(GenreMovie::MovieId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_genre_movie_movie_id")
                    .table(GenreMovie::Table)
                    .col(GenreMovie::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GenreMovie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Years::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    YearId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Years {
    Table,
    Id,
    Released,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GenreMovie {
    Table,
    GenreId,
    MovieId,
}
