use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub year_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::year::Entity",
        from = "Column::YearId",
        to = "super::year::Column::Id"
    )]
    Year,
}

impl Related<super::year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Year.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::genre_movie::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::genre_movie::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
