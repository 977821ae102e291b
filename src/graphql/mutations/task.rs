use async_graphql::*;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};

use crate::database::entities::{members, projects, task_managers, tasks};
use crate::graphql::context::{require_user, GraphQLContext};
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{fetch_managers, parse_id, SubTaskResponse, Task, TaskInput};

#[derive(Default)]
pub struct TaskMutation;

#[Object]
impl TaskMutation {
    /// Create a task under a project
    #[allow(clippy::too_many_arguments)]
    async fn create_task(
        &self,
        ctx: &Context<'_>,
        project_id: ID,
        name: String,
        description: Option<String>,
        status: String,
        managers: Option<Vec<ID>>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        progress: Option<i32>,
        priority: Option<bool>,
    ) -> Result<Task> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let project_id = parse_id("projectId", &project_id)?;
        let manager_ids = parse_manager_ids(managers)?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Task create", e))?;

        projects::Entity::find_by_id(project_id)
            .one(&txn)
            .await
            .map_err(|e| StructuredError::internal("Task create", e))?
            .ok_or_else(|| StructuredError::not_found("Project", project_id))?;

        let mut task = tasks::ActiveModel::new(project_id, None, name, status);
        task.description = Set(description);
        task.progress = Set(progress);
        task.priority = Set(priority);
        task.start_date = Set(start_date);
        task.end_date = Set(end_date);

        let task = task
            .insert(&txn)
            .await
            .map_err(|e| StructuredError::internal("Task create", e))?;

        replace_managers(&txn, task.id, &manager_ids, "Task create").await?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Task create", e))?;

        Ok(Task::from(task))
    }

    /// Update a task; a supplied manager list replaces the current one,
    /// omitted arguments leave the stored fields untouched
    #[allow(clippy::too_many_arguments)]
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        status: Option<String>,
        managers: Option<Vec<ID>>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        progress: Option<i32>,
        priority: Option<bool>,
    ) -> Result<Task> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let task_id = parse_id("id", &id)?;

        let task = tasks::Entity::find_by_id(task_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Task update", e))?
            .ok_or_else(|| StructuredError::not_found("Task", task_id))?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Task update", e))?;

        let mut active: tasks::ActiveModel = task.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        if let Some(status) = status {
            active.status = Set(status);
        }
        if let Some(start_date) = start_date {
            active.start_date = Set(Some(start_date));
        }
        if let Some(end_date) = end_date {
            active.end_date = Set(Some(end_date));
        }
        if let Some(progress) = progress {
            active.progress = Set(Some(progress));
        }
        if let Some(priority) = priority {
            active.priority = Set(Some(priority));
        }

        let task = active
            .set_updated_at()
            .update(&txn)
            .await
            .map_err(|e| StructuredError::internal("Task update", e))?;

        if let Some(managers) = managers {
            let manager_ids = parse_manager_ids(Some(managers))?;
            replace_managers(&txn, task.id, &manager_ids, "Task update").await?;
        }

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Task update", e))?;

        Ok(Task::from(task))
    }

    /// Delete a task and its sub-tasks; returns the task as it existed
    /// before deletion
    async fn delete_task(&self, ctx: &Context<'_>, id: ID) -> Result<Task> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let task_id = parse_id("id", &id)?;

        let task = tasks::Entity::find_by_id(task_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Task delete", e))?
            .ok_or_else(|| StructuredError::not_found("Task", task_id))?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Task delete", e))?;

        delete_task_tree(&txn, task.id, "Task delete").await?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Task delete", e))?;

        Ok(Task::from(task))
    }

    /// Create a sub-task under an existing task; the sub-task inherits the
    /// parent's project
    async fn create_sub_task(
        &self,
        ctx: &Context<'_>,
        parent_task_id: ID,
        task: TaskInput,
    ) -> Result<SubTaskResponse> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let parent_id = parse_id("parentTaskId", &parent_task_id)?;
        let manager_ids = parse_manager_ids(task.managers.clone())?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Sub-task create", e))?;

        let parent = tasks::Entity::find_by_id(parent_id)
            .one(&txn)
            .await
            .map_err(|e| StructuredError::internal("Sub-task create", e))?
            .ok_or_else(|| StructuredError::not_found("Task", parent_id))?;

        let mut sub_task =
            tasks::ActiveModel::new(parent.project_id, Some(parent.id), task.name, task.status);
        sub_task.description = Set(task.description);
        sub_task.progress = Set(task.progress);
        sub_task.priority = Set(task.priority);
        sub_task.start_date = Set(task.start_date);
        sub_task.end_date = Set(task.end_date);

        let sub_task = sub_task
            .insert(&txn)
            .await
            .map_err(|e| StructuredError::internal("Sub-task create", e))?;

        replace_managers(&txn, sub_task.id, &manager_ids, "Sub-task create").await?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Sub-task create", e))?;

        let managers = fetch_managers(&context.db, sub_task.id).await?;

        Ok(SubTaskResponse {
            id: ID(sub_task.id.to_string()),
            name: sub_task.name,
            description: sub_task.description,
            status: sub_task.status,
            priority: sub_task.priority,
            progress: sub_task.progress,
            managers,
            sub_tasks: vec![],
        })
    }

    /// Delete a sub-task of the given parent; returns the parent task
    async fn delete_sub_task(
        &self,
        ctx: &Context<'_>,
        parent_task_id: ID,
        sub_task_id: ID,
    ) -> Result<Task> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let parent_id = parse_id("parentTaskId", &parent_task_id)?;
        let sub_id = parse_id("subTaskId", &sub_task_id)?;

        let parent = tasks::Entity::find_by_id(parent_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Sub-task delete", e))?
            .ok_or_else(|| StructuredError::not_found("Task", parent_id))?;

        let sub_task = tasks::Entity::find_by_id(sub_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Sub-task delete", e))?
            .filter(|t| t.parent_task_id == Some(parent.id))
            .ok_or_else(|| StructuredError::not_found("Sub-task", sub_id))?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Sub-task delete", e))?;

        delete_task_tree(&txn, sub_task.id, "Sub-task delete").await?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Sub-task delete", e))?;

        Ok(Task::from(parent))
    }
}

fn parse_manager_ids(managers: Option<Vec<ID>>) -> Result<Vec<i32>> {
    managers
        .unwrap_or_default()
        .iter()
        .map(|id| parse_id("managers", id))
        .collect()
}

/// Replace a task's manager links, verifying each member exists.
async fn replace_managers<C: ConnectionTrait>(
    conn: &C,
    task_id: i32,
    manager_ids: &[i32],
    operation: &'static str,
) -> Result<()> {
    let found: Vec<i32> = members::Entity::find()
        .select_only()
        .column(members::Column::Id)
        .filter(members::Column::Id.is_in(manager_ids.to_vec()))
        .into_tuple::<i32>()
        .all(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    if let Some(missing) = manager_ids.iter().find(|id| !found.contains(id)) {
        return Err(StructuredError::not_found("Member", missing));
    }

    task_managers::Entity::delete_many()
        .filter(task_managers::Column::TaskId.eq(task_id))
        .exec(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    for member_id in manager_ids {
        task_managers::ActiveModel::new(task_id, *member_id)
            .insert(conn)
            .await
            .map_err(|e| StructuredError::internal(operation, e))?;
    }

    Ok(())
}

/// Delete a task and every task below it, manager links included. The
/// walk is iterative; nesting depth is unbounded.
async fn delete_task_tree<C: ConnectionTrait>(
    conn: &C,
    root_id: i32,
    operation: &'static str,
) -> Result<()> {
    let mut ids = vec![root_id];
    let mut frontier = vec![root_id];
    while !frontier.is_empty() {
        let children: Vec<i32> = tasks::Entity::find()
            .select_only()
            .column(tasks::Column::Id)
            .filter(tasks::Column::ParentTaskId.is_in(frontier.clone()))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| StructuredError::internal(operation, e))?;
        ids.extend(&children);
        frontier = children;
    }

    task_managers::Entity::delete_many()
        .filter(task_managers::Column::TaskId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    tasks::Entity::delete_many()
        .filter(tasks::Column::Id.is_in(ids))
        .exec(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    Ok(())
}
