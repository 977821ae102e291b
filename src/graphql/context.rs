use async_graphql::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::auth::CurrentUser;
use crate::graphql::errors::StructuredError;

#[derive(Clone)]
pub struct GraphQLContext {
    pub db: DatabaseConnection,
}

impl GraphQLContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// The authentication guard shared by every resolver: fails before any
/// database access when the request carries no authenticated user.
pub fn require_user<'ctx>(ctx: &Context<'ctx>) -> Result<&'ctx CurrentUser> {
    ctx.data_opt::<CurrentUser>()
        .ok_or_else(StructuredError::unauthenticated)
}
