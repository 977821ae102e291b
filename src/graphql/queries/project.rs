use async_graphql::*;
use sea_orm::EntityTrait;

use crate::database::entities::projects;
use crate::graphql::context::{require_user, GraphQLContext};
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{parse_id, Project};

#[derive(Default)]
pub struct ProjectQuery;

#[Object]
impl ProjectQuery {
    /// Get all projects
    async fn get_projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let projects = projects::Entity::find()
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Project fetch", e))?;

        Ok(projects.into_iter().map(Project::from).collect())
    }

    /// Get a specific project by ID
    async fn get_project_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<Project> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let project_id = parse_id("id", &id)?;
        let project = projects::Entity::find_by_id(project_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Project fetch", e))?
            .ok_or_else(|| StructuredError::not_found("Project", project_id))?;

        Ok(Project::from(project))
    }
}
