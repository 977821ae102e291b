use async_graphql::*;
use sea_orm::EntityTrait;

use crate::database::entities::tasks;
use crate::graphql::context::{require_user, GraphQLContext};
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{parse_id, Task};

#[derive(Default)]
pub struct TaskQuery;

#[Object]
impl TaskQuery {
    /// Get all tasks
    async fn get_tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let tasks = tasks::Entity::find()
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Task fetch", e))?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }

    /// Get a specific task by ID
    async fn get_task_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<Task> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let task_id = parse_id("id", &id)?;
        let task = tasks::Entity::find_by_id(task_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Task fetch", e))?
            .ok_or_else(|| StructuredError::not_found("Task", task_id))?;

        Ok(Task::from(task))
    }
}
