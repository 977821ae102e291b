use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    /// Set for sub-tasks; top-level tasks have no parent.
    pub parent_task_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub progress: Option<i32>,
    pub priority: Option<bool>,
    pub start_date: Option<ChronoDateTimeUtc>,
    pub end_date: Option<ChronoDateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentTaskId",
        to = "Column::Id"
    )]
    ParentTask,
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
    pub fn new(project_id: i32, parent_task_id: Option<i32>, name: String, status: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            project_id: Set(project_id),
            parent_task_id: Set(parent_task_id),
            name: Set(name),
            description: ActiveValue::NotSet,
            status: Set(status),
            progress: ActiveValue::NotSet,
            priority: ActiveValue::NotSet,
            start_date: ActiveValue::NotSet,
            end_date: ActiveValue::NotSet,
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}
