//! `pages` table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub route: String,
    #[sea_orm(column_type = "Text")]
    pub display_name: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub avatar_image_url: String,
    pub reference_image_url: String,
    pub state: String,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::page_contacts::Entity")]
    PageContacts,
    #[sea_orm(has_many = "super::page_facts::Entity")]
    PageFacts,
}

impl Related<super::page_contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageContacts.def()
    }
}

impl Related<super::page_facts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageFacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
