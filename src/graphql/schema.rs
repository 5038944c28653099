use crate::graphql::resolvers::{Mutation, Query};
use crate::media::MediaStore;
use crate::storage::Storage;
use async_graphql::{EmptySubscription, Schema};
use std::sync::Arc;

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub storage: Arc<dyn Storage>,
    pub media: MediaStore,
}

/// The complete GraphQL schema
pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create a new GraphQL schema with the given storage and media store
pub fn create_schema(storage: Arc<dyn Storage>, media: MediaStore) -> GraphQLSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(GraphQLContext { storage, media })
        .finish()
}
