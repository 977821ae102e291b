mod member;
mod project;
mod task;

use async_graphql::*;

/// Root query object combining the per-entity query modules
#[derive(Default, MergedObject)]
pub struct Query(
    pub member::MemberQuery,
    pub project::ProjectQuery,
    pub task::TaskQuery,
);
