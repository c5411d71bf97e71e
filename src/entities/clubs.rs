use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clubs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Natural key. Lowercased at creation, immutable afterwards.
    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::club_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::club_tags::Relation::Club.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
