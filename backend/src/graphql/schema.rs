//! GraphQL schema definition with queries, mutations, and subscriptions

use std::sync::Arc;

use async_graphql::extensions::Tracing;
use async_graphql::{MergedObject, Schema};

use crate::db::Database;
use crate::services::{AuthService, PubSub};

use super::mutations::{AuthMutations, LinkMutations, VoteMutations};
use super::queries::{FeedQueries, UserQueries};
use super::subscriptions::SubscriptionRoot;

/// The GraphQL schema type
pub type HackerNewsSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(FeedQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(LinkMutations, AuthMutations, VoteMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService, pubsub: Arc<PubSub>) -> HackerNewsSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), SubscriptionRoot)
        .extension(Tracing)
        .data(db)
        .data(auth)
        .data(pubsub)
        .finish()
}
