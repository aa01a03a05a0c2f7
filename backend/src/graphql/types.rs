//! GraphQL object and input types
//!
//! Output objects wrap the database records; relation fields are resolved
//! with one repository call each.

use async_graphql::{Context, Enum, ID, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use crate::db::{Database, LinkRecord, LinkSortField, SortOrder, UserRecord, VoteRecord};
use crate::error::IntoGqlResult;

fn record_id(id: i64) -> ID {
    ID(id.to_string())
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone)]
pub struct User(pub UserRecord);

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        record_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    /// Links posted by this user
    async fn links(&self, ctx: &Context<'_>) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.links().list_by_user(self.0.id).await.into_gql()?;
        Ok(records.into_iter().map(Link::from).collect())
    }
}

// ============================================================================
// Link
// ============================================================================

#[derive(Debug, Clone)]
pub struct Link(pub LinkRecord);

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl Link {
    async fn id(&self) -> ID {
        record_id(self.0.id)
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn url(&self) -> &str {
        &self.0.url
    }

    /// The user who posted the link, if known
    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = self.0.posted_by_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let user = db.users().get_by_id(user_id).await.into_gql()?;
        Ok(user.map(User::from))
    }

    /// Votes cast for this link
    async fn votes(&self, ctx: &Context<'_>) -> Result<Vec<Vote>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.votes().list_by_link(self.0.id).await.into_gql()?;
        Ok(records.into_iter().map(Vote::from).collect())
    }
}

// ============================================================================
// Vote
// ============================================================================

#[derive(Debug, Clone)]
pub struct Vote(pub VoteRecord);

impl From<VoteRecord> for Vote {
    fn from(record: VoteRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl Vote {
    async fn id(&self) -> ID {
        record_id(self.0.id)
    }

    async fn link(&self, ctx: &Context<'_>) -> Result<Link> {
        let db = ctx.data_unchecked::<Database>();
        db.links()
            .get_by_id(self.0.link_id)
            .await
            .into_gql()?
            .map(Link::from)
            .ok_or_else(|| format!("Link not found: {}", self.0.link_id).into())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();
        db.users()
            .get_by_id(self.0.user_id)
            .await
            .into_gql()?
            .map(User::from)
            .ok_or_else(|| format!("User not found: {}", self.0.user_id).into())
    }
}

// ============================================================================
// Feed / Auth payloads
// ============================================================================

/// One page of links plus the total number of matches
#[derive(Debug, SimpleObject)]
pub struct Feed {
    pub links: Vec<Link>,
    /// Matching links, ignoring skip/take
    pub count: i64,
}

#[derive(Debug, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

// ============================================================================
// Ordering
// ============================================================================

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(rename_items = "lowercase")]
pub enum Sort {
    Asc,
    Desc,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Asc => SortOrder::Asc,
            Sort::Desc => SortOrder::Desc,
        }
    }
}

/// Feed ordering; fields are applied as description, url, createdAt
#[derive(InputObject, Default, Clone, Debug)]
pub struct LinkOrderByInput {
    pub description: Option<Sort>,
    pub url: Option<Sort>,
    pub created_at: Option<Sort>,
}

impl LinkOrderByInput {
    pub fn to_order(&self) -> Vec<(LinkSortField, SortOrder)> {
        [
            (LinkSortField::Description, self.description),
            (LinkSortField::Url, self.url),
            (LinkSortField::CreatedAt, self.created_at),
        ]
        .into_iter()
        .filter_map(|(field, sort)| sort.map(|s| (field, s.into())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_keeps_field_precedence() {
        let input = LinkOrderByInput {
            description: None,
            url: Some(Sort::Desc),
            created_at: Some(Sort::Asc),
        };
        assert_eq!(
            input.to_order(),
            vec![
                (LinkSortField::Url, SortOrder::Desc),
                (LinkSortField::CreatedAt, SortOrder::Asc),
            ]
        );
        assert!(LinkOrderByInput::default().to_order().is_empty());
    }
}
