use async_graphql::*;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::database::entities::{members, task_managers, tasks};
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::types::Member;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Task {
    pub id: ID,
    pub project_id: ID,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub progress: Option<i32>,
    pub priority: Option<bool>,
    #[graphql(skip)]
    pub(crate) db_id: i32,
}

impl From<tasks::Model> for Task {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: ID(model.id.to_string()),
            project_id: ID(model.project_id.to_string()),
            name: model.name,
            description: model.description,
            status: model.status,
            start_date: model.start_date,
            end_date: model.end_date,
            progress: model.progress,
            priority: model.priority,
            db_id: model.id,
        }
    }
}

#[ComplexObject]
impl Task {
    /// Members managing this task
    async fn managers(&self, ctx: &Context<'_>) -> Result<Vec<Member>> {
        let context = ctx.data::<GraphQLContext>()?;
        fetch_managers(&context.db, self.db_id).await
    }

    /// Direct sub-tasks of this task
    async fn sub_tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let context = ctx.data::<GraphQLContext>()?;
        let tasks = tasks::Entity::find()
            .filter(tasks::Column::ParentTaskId.eq(self.db_id))
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Task fetch", e))?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }
}

/// Shape returned from sub-task creation: the task fields of the new
/// sub-task with its manager list resolved eagerly.
#[derive(SimpleObject, Clone)]
pub struct SubTaskResponse {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: Option<bool>,
    pub progress: Option<i32>,
    pub managers: Vec<Member>,
    pub sub_tasks: Vec<Task>,
}

#[derive(InputObject)]
pub struct TaskInput {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub managers: Option<Vec<ID>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub progress: Option<i32>,
    pub priority: Option<bool>,
}

pub(crate) async fn fetch_managers(
    db: &sea_orm::DatabaseConnection,
    task_id: i32,
) -> Result<Vec<Member>> {
    let manager_ids: Vec<i32> = task_managers::Entity::find()
        .select_only()
        .column(task_managers::Column::MemberId)
        .filter(task_managers::Column::TaskId.eq(task_id))
        .into_tuple::<i32>()
        .all(db)
        .await
        .map_err(|e| StructuredError::internal("Task managers fetch", e))?;

    if manager_ids.is_empty() {
        return Ok(vec![]);
    }

    let managers = members::Entity::find()
        .filter(members::Column::Id.is_in(manager_ids))
        .all(db)
        .await
        .map_err(|e| StructuredError::internal("Task managers fetch", e))?;

    Ok(managers.into_iter().map(Member::from).collect())
}
