//! GraphQL subscriptions for the live feeds
//!
//! Subscriptions allow clients to receive push updates over WebSocket.
//! Neither topic requires authentication.

use std::sync::Arc;

use async_graphql::{Context, Subscription};
use futures::Stream;
use tokio_stream::StreamExt;

use crate::services::PubSub;

use super::types::{Link, Vote};

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Links posted after the subscription starts
    async fn new_link<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Link> + 'ctx {
        let pubsub = ctx.data_unchecked::<Arc<PubSub>>();
        pubsub.new_link.subscribe().map(Link::from)
    }

    /// Votes cast after the subscription starts
    async fn new_vote<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Vote> + 'ctx {
        let pubsub = ctx.data_unchecked::<Arc<PubSub>>();
        pubsub.new_vote.subscribe().map(Vote::from)
    }
}
