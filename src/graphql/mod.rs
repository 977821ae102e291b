pub mod context;
pub mod errors;
pub mod mutations;
pub mod queries;
pub mod types;

use async_graphql::{EmptySubscription, Schema};
use sea_orm::DatabaseConnection;

use context::GraphQLContext;
use mutations::Mutation;
use queries::Query;

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn create_schema(db: DatabaseConnection) -> AppSchema {
    Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(GraphQLContext::new(db))
        .finish()
}
