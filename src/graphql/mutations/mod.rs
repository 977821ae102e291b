mod member;
mod project;
mod task;

use async_graphql::*;

/// Root mutation object combining the per-entity mutation modules
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub member::MemberMutation,
    pub project::ProjectMutation,
    pub task::TaskMutation,
);
