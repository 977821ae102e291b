use async_graphql::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::database::entities::{members, projects, task_managers};
use crate::graphql::context::{require_user, GraphQLContext};
use crate::graphql::errors::StructuredError;
use crate::graphql::types::{parse_id, Member};

#[derive(Default)]
pub struct MemberMutation;

#[Object]
impl MemberMutation {
    /// Create a member, optionally attaching it to a project
    async fn create_member(
        &self,
        ctx: &Context<'_>,
        email: String,
        nickname: String,
        is_active: Option<bool>,
        project_id: Option<ID>,
    ) -> Result<Member> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        tracing::info!(email = %email, nickname = %nickname, is_active, project_id = ?project_id, "creating member");

        let project_id = project_id
            .as_ref()
            .map(|id| parse_id("projectId", id))
            .transpose()?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Member create", e))?;

        // The project link is written with the member row itself, so a
        // created member can never be left unlinked.
        if let Some(project_id) = project_id {
            projects::Entity::find_by_id(project_id)
                .one(&txn)
                .await
                .map_err(|e| StructuredError::internal("Member create", e))?
                .ok_or_else(|| StructuredError::not_found("Project", project_id))?;
        }

        let member =
            members::ActiveModel::new(email, nickname, is_active.unwrap_or(true), project_id)
                .insert(&txn)
                .await
                .map_err(|e| StructuredError::internal("Member create", e))?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Member create", e))?;

        tracing::info!(member_id = member.id, "member created");
        Ok(Member::from(member))
    }

    /// Update a member; omitted arguments leave the stored fields untouched
    async fn update_member(
        &self,
        ctx: &Context<'_>,
        id: ID,
        email: Option<String>,
        nickname: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Member> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let member_id = parse_id("id", &id)?;

        let member = members::Entity::find_by_id(member_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member update", e))?
            .ok_or_else(|| StructuredError::not_found("Member", member_id))?;

        let mut member: members::ActiveModel = member.into();
        if let Some(email) = email {
            member.email = Set(email);
        }
        if let Some(nickname) = nickname {
            member.nickname = Set(nickname);
        }
        if let Some(is_active) = is_active {
            member.is_active = Set(is_active);
        }

        let member = member
            .set_updated_at()
            .update(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member update", e))?;

        Ok(Member::from(member))
    }

    /// Delete a member, detaching it from its project and any managed
    /// tasks; returns the member as it existed before deletion
    async fn delete_member(&self, ctx: &Context<'_>, id: ID) -> Result<Member> {
        require_user(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let member_id = parse_id("id", &id)?;

        let member = members::Entity::find_by_id(member_id)
            .one(&context.db)
            .await
            .map_err(|e| StructuredError::internal("Member delete", e))?
            .ok_or_else(|| StructuredError::not_found("Member", member_id))?;

        let txn = context
            .db
            .begin()
            .await
            .map_err(|e| StructuredError::internal("Member delete", e))?;

        task_managers::Entity::delete_many()
            .filter(task_managers::Column::MemberId.eq(member.id))
            .exec(&txn)
            .await
            .map_err(|e| StructuredError::internal("Member delete", e))?;

        members::Entity::delete_by_id(member.id)
            .exec(&txn)
            .await
            .map_err(|e| StructuredError::internal("Member delete", e))?;

        txn.commit()
            .await
            .map_err(|e| StructuredError::internal("Member delete", e))?;

        Ok(Member::from(member))
    }
}
