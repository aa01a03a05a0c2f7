use super::prelude::*;

#[derive(Default)]
pub struct LinkMutations;

#[Object]
impl LinkMutations {
    /// Post a link as the current user and announce it on `newLink`
    async fn post(&self, ctx: &Context<'_>, url: String, description: String) -> Result<Link> {
        let user = ctx.verify_auth()?;
        let db = ctx.data_unchecked::<Database>();

        let link = db
            .links()
            .create(CreateLink {
                description,
                url,
                posted_by_id: Some(user.id),
            })
            .await
            .into_gql()?;

        tracing::info!(link_id = link.id, user_id = user.id, "Link posted");
        ctx.data_unchecked::<Arc<PubSub>>()
            .new_link
            .publish(link.clone());

        Ok(Link::from(link))
    }
}
