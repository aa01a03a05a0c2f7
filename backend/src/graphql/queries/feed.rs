use super::prelude::*;

pub const API_INFO: &str = "This is the API of a Hackernews Clone";

#[derive(Default)]
pub struct FeedQueries;

#[Object]
impl FeedQueries {
    /// Short description of this API
    async fn info(&self) -> String {
        API_INFO.to_string()
    }

    /// Links matching `filter` in description or url, with the total match count
    async fn feed(
        &self,
        ctx: &Context<'_>,
        filter: Option<String>,
        skip: Option<i32>,
        take: Option<i32>,
        order_by: Option<LinkOrderByInput>,
    ) -> Result<Feed> {
        let query = feed_query(filter, skip, take, order_by).into_gql()?;
        let links = ctx.data_unchecked::<Database>().links();

        let count = links.count(&query).await.into_gql()?;
        let records = links.list(&query).await.into_gql()?;

        Ok(Feed {
            links: records.into_iter().map(Link::from).collect(),
            count,
        })
    }
}

fn feed_query(
    filter: Option<String>,
    skip: Option<i32>,
    take: Option<i32>,
    order_by: Option<LinkOrderByInput>,
) -> Result<FeedQuery, ApiError> {
    if skip.is_some_and(|s| s < 0) {
        return Err(ApiError::InvalidArgument("skip must not be negative".to_string()));
    }
    if take.is_some_and(|t| t < 0) {
        return Err(ApiError::InvalidArgument("take must not be negative".to_string()));
    }

    Ok(FeedQuery {
        filter,
        skip: skip.map(i64::from),
        take: take.map(i64::from),
        order: order_by.map(|o| o.to_order()).unwrap_or_default(),
    })
}
