use async_graphql::*;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::database::entities::{members, projects, tasks};
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{Member, Task};

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Project {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub progress: Option<i32>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    pub(crate) db_id: i32,
}

impl From<projects::Model> for Project {
    fn from(model: projects::Model) -> Self {
        Self {
            id: ID(model.id.to_string()),
            name: model.name,
            description: model.description,
            progress: model.progress,
            end_date: model.end_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
            db_id: model.id,
        }
    }
}

#[ComplexObject]
impl Project {
    /// Members attached to this project
    async fn members(&self, ctx: &Context<'_>) -> Result<Vec<Member>> {
        let context = ctx.data::<GraphQLContext>()?;
        let members = members::Entity::find()
            .filter(members::Column::ProjectId.eq(self.db_id))
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member fetch", e))?;

        Ok(members.into_iter().map(Member::from).collect())
    }

    /// Top-level tasks of this project; sub-tasks hang off `Task.subTasks`
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let context = ctx.data::<GraphQLContext>()?;
        let tasks = tasks::Entity::find()
            .filter(
                tasks::Column::ProjectId
                    .eq(self.db_id)
                    .and(tasks::Column::ParentTaskId.is_null()),
            )
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Task fetch", e))?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }
}
