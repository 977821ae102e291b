use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub nickname: String,
    pub is_active: bool,
    /// Identity reference issued by the external auth provider, when known.
    pub google_id: Option<String>,
    pub project_id: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(has_many = "super::task_managers::Entity")]
    TaskManagers,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::task_managers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskManagers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new(email: String, nickname: String, is_active: bool, project_id: Option<i32>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            email: Set(email),
            nickname: Set(nickname),
            is_active: Set(is_active),
            google_id: ActiveValue::NotSet,
            project_id: Set(project_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}
