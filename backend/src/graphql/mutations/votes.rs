use async_graphql::ID;

use super::prelude::*;

#[derive(Default)]
pub struct VoteMutations;

#[Object]
impl VoteMutations {
    /// Vote for a link as the current user and announce it on `newVote`.
    ///
    /// A user may vote for a link only once.
    async fn vote(&self, ctx: &Context<'_>, link_id: ID) -> Result<Vote> {
        let user = ctx.verify_auth()?;
        let db = ctx.data_unchecked::<Database>();

        let vote = cast_vote(db, link_id.as_str(), user.id).await.into_gql()?;

        tracing::info!(vote_id = vote.id, link_id = vote.link_id, user_id = user.id, "Vote cast");
        ctx.data_unchecked::<Arc<PubSub>>()
            .new_vote
            .publish(vote.clone());

        Ok(Vote::from(vote))
    }
}

/// Existence check followed by insert. The two steps are not atomic; when a
/// concurrent vote wins, the UNIQUE(link_id, user_id) index rejects the insert.
async fn cast_vote(
    db: &Database,
    raw_link_id: &str,
    user_id: i64,
) -> Result<VoteRecord, ApiError> {
    let link_id: i64 = raw_link_id
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidLinkId(raw_link_id.to_string()))?;

    if db.links().get_by_id(link_id).await?.is_none() {
        return Err(ApiError::LinkNotFound(link_id));
    }

    let votes = db.votes();
    if votes.find(link_id, user_id).await?.is_some() {
        return Err(ApiError::AlreadyVoted(link_id));
    }

    match votes.create(link_id, user_id).await {
        Ok(vote) => Ok(vote),
        Err(e) if is_unique_violation(&e) => Err(ApiError::AlreadyVoted(link_id)),
        Err(e) => Err(e.into()),
    }
}
