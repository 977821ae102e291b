use async_graphql::*;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect};

use crate::database::entities::members;
use crate::graphql::context::{require_user, GraphQLContext};
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{parse_id, Member};

#[derive(Default)]
pub struct MemberQuery;

#[Object]
impl MemberQuery {
    /// Get all members
    async fn get_members(&self, ctx: &Context<'_>) -> Result<Vec<Member>> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let members = members::Entity::find()
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member fetch", e))?;

        Ok(members.into_iter().map(Member::from).collect())
    }

    /// Get a specific member by ID
    async fn get_member_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<Member> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let member_id = parse_id("id", &id)?;
        let member = members::Entity::find_by_id(member_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member fetch", e))?
            .ok_or_else(|| StructuredError::not_found("Member", member_id))?;

        Ok(Member::from(member))
    }

    /// Get the members attached to a project, as the fixed
    /// id/email/nickname/isActive subset
    async fn get_members_by_project(
        &self,
        ctx: &Context<'_>,
        project_id: ID,
    ) -> Result<Vec<Member>> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let project_id = parse_id("projectId", &project_id)?;
        let rows = members::Entity::find()
            .select_only()
            .column(members::Column::Id)
            .column(members::Column::Email)
            .column(members::Column::Nickname)
            .column(members::Column::IsActive)
            .filter(members::Column::ProjectId.eq(project_id))
            .into_model::<MemberSummary>()
            .all(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member fetch", e))?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_member(project_id))
            .collect())
    }
}

#[derive(FromQueryResult)]
struct MemberSummary {
    id: i32,
    email: String,
    nickname: String,
    is_active: bool,
}

impl MemberSummary {
    fn into_member(self, project_id: i32) -> Member {
        Member {
            id: ID(self.id.to_string()),
            google_id: None,
            project_id: Some(ID(project_id.to_string())),
            email: self.email,
            nickname: self.nickname,
            is_active: self.is_active,
        }
    }
}
