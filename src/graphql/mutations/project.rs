use async_graphql::*;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait, Value,
};

use crate::database::entities::{members, projects, task_managers, tasks};
use crate::graphql::context::{require_user, GraphQLContext};
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{parse_id, Project};

#[derive(Default)]
pub struct ProjectMutation;

#[Object]
impl ProjectMutation {
    /// Create a project, optionally attaching existing members to it
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: Option<String>,
        members: Option<Vec<ID>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Project> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let member_ids = parse_member_ids(members)?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Project create", e))?;

        let project = projects::ActiveModel::new(name, description, end_date)
            .insert(&txn)
            .await
            .map_err(|e| StructuredError::internal("Project create", e))?;

        if !member_ids.is_empty() {
            attach_members(&txn, project.id, &member_ids, "Project create").await?;
        }

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Project create", e))?;

        Ok(Project::from(project))
    }

    /// Update a project; a supplied member list replaces the current
    /// membership, omitted arguments leave the stored fields untouched
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        members: Option<Vec<ID>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Project> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let project_id = parse_id("id", &id)?;

        let project = projects::Entity::find_by_id(project_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Project update", e))?
            .ok_or_else(|| StructuredError::not_found("Project", project_id))?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Project update", e))?;

        let mut active: projects::ActiveModel = project.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        if let Some(end_date) = end_date {
            active.end_date = Set(Some(end_date));
        }

        let project = active
            .set_updated_at()
            .update(&txn)
            .await
            .map_err(|e| StructuredError::internal("Project update", e))?;

        if let Some(members) = members {
            let member_ids = parse_member_ids(Some(members))?;
            detach_members(&txn, project.id, "Project update").await?;
            attach_members(&txn, project.id, &member_ids, "Project update").await?;
        }

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Project update", e))?;

        Ok(Project::from(project))
    }

    /// Delete a project together with its tasks, detaching its members;
    /// returns the project as it existed before deletion
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> Result<Project> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let project_id = parse_id("id", &id)?;

        let project = projects::Entity::find_by_id(project_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Project delete", e))?
            .ok_or_else(|| StructuredError::not_found("Project", project_id))?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Project delete", e))?;

        detach_members(&txn, project.id, "Project delete").await?;

        let task_ids: Vec<i32> = tasks::Entity::find()
            .select_only()
            .column(tasks::Column::Id)
            .filter(tasks::Column::ProjectId.eq(project.id))
            .into_tuple::<i32>()
            .all(&txn)
            .await
            .map_err(|e| StructuredError::internal("Project delete", e))?;

        if !task_ids.is_empty() {
            task_managers::Entity::delete_many()
                .filter(task_managers::Column::TaskId.is_in(task_ids.clone()))
                .exec(&txn)
                .await
                .map_err(|e| StructuredError::internal("Project delete", e))?;

            tasks::Entity::delete_many()
                .filter(tasks::Column::Id.is_in(task_ids))
                .exec(&txn)
                .await
                .map_err(|e| StructuredError::internal("Project delete", e))?;
        }

        projects::Entity::delete_by_id(project.id)
            .exec(&txn)
            .await
            .map_err(|e| StructuredError::internal("Project delete", e))?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Project delete", e))?;

        Ok(Project::from(project))
    }
}

fn parse_member_ids(members: Option<Vec<ID>>) -> Result<Vec<i32>> {
    members
        .unwrap_or_default()
        .iter()
        .map(|id| parse_id("members", id))
        .collect()
}

/// Point the listed members at the project, verifying each one exists.
async fn attach_members<C: ConnectionTrait>(
    conn: &C,
    project_id: i32,
    member_ids: &[i32],
    operation: &'static str,
) -> Result<()> {
    let found: Vec<i32> = members::Entity::find()
        .select_only()
        .column(members::Column::Id)
        .filter(members::Column::Id.is_in(member_ids.to_vec()))
        .into_tuple::<i32>()
        .all(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    if let Some(missing) = member_ids.iter().find(|id| !found.contains(id)) {
        return Err(StructuredError::not_found("Member", missing));
    }

    members::Entity::update_many()
        .col_expr(members::Column::ProjectId, Expr::value(project_id))
        .filter(members::Column::Id.is_in(member_ids.to_vec()))
        .exec(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    Ok(())
}

async fn detach_members<C: ConnectionTrait>(
    conn: &C,
    project_id: i32,
    operation: &'static str,
) -> Result<()> {
    members::Entity::update_many()
        .col_expr(members::Column::ProjectId, Expr::value(Value::Int(None)))
        .filter(members::Column::ProjectId.eq(project_id))
        .exec(conn)
        .await
        .map_err(|e| StructuredError::internal(operation, e))?;

    Ok(())
}
