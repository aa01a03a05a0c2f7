//! Links repository, including the filtered and paginated feed query

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LinkRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub url: String,
    pub posted_by_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CreateLink {
    pub description: String,
    pub url: String,
    pub posted_by_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSortField {
    Description,
    Url,
    CreatedAt,
}

impl LinkSortField {
    fn column(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Url => "url",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Parameters of the feed query.
///
/// `filter` matches links whose description or url contains it. `order` is
/// applied left to right and always finishes with `id ASC`.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub filter: Option<String>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub order: Vec<(LinkSortField, SortOrder)>,
}

impl FeedQuery {
    fn active_filter(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }

    fn push_where<'a>(&'a self, qb: &mut QueryBuilder<'a, Sqlite>) {
        if let Some(filter) = self.active_filter() {
            qb.push(" WHERE instr(description, ")
                .push_bind(filter)
                .push(") > 0 OR instr(url, ")
                .push_bind(filter)
                .push(") > 0");
        }
    }
}

const LINK_COLUMNS: &str = "id, created_at, description, url, posted_by_id";

pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: CreateLink) -> Result<LinkRecord> {
        let record = sqlx::query_as::<_, LinkRecord>(&format!(
            r#"
            INSERT INTO links (created_at, description, url, posted_by_id)
            VALUES (?, ?, ?, ?)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(Utc::now())
        .bind(&input.description)
        .bind(&input.url)
        .bind(input.posted_by_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<LinkRecord>> {
        let record =
            sqlx::query_as::<_, LinkRecord>(&format!("SELECT {LINK_COLUMNS} FROM links WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    /// Links posted by a user, oldest first
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<LinkRecord>> {
        let records = sqlx::query_as::<_, LinkRecord>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE posted_by_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Number of links matching the feed filter, ignoring pagination
    pub async fn count(&self, query: &FeedQuery) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM links");
        query.push_where(&mut qb);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// One page of the feed
    pub async fn list(&self, query: &FeedQuery) -> Result<Vec<LinkRecord>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {LINK_COLUMNS} FROM links"));
        query.push_where(&mut qb);

        qb.push(" ORDER BY ");
        for (field, order) in &query.order {
            qb.push(field.column()).push(" ").push(order.sql()).push(", ");
        }
        qb.push("id ASC");

        // SQLite only accepts OFFSET after LIMIT; -1 means unbounded.
        if query.take.is_some() || query.skip.is_some() {
            qb.push(" LIMIT ")
                .push_bind(query.take.unwrap_or(-1))
                .push(" OFFSET ")
                .push_bind(query.skip.unwrap_or(0));
        }

        let records = qb.build_query_as::<LinkRecord>().fetch_all(&self.pool).await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::db::{CreateUser, Database};

    use super::*;

    async fn seed(db: &Database) -> i64 {
        let user = db
            .users()
            .create(CreateUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        for (description, url) in [
            ("Rust 2024 edition", "https://blog.rust-lang.org"),
            ("GraphQL spec", "https://spec.graphql.org"),
            ("Async book", "https://rust-lang.github.io/async-book"),
        ] {
            db.links()
                .create(CreateLink {
                    description: description.to_string(),
                    url: url.to_string(),
                    posted_by_id: Some(user.id),
                })
                .await
                .unwrap();
        }
        user.id
    }

    fn descriptions(links: &[LinkRecord]) -> Vec<&str> {
        links.iter().map(|l| l.description.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_list_by_user() {
        let db = Database::connect_in_memory().await.unwrap();
        let user_id = seed(&db).await;

        let links = db.links().list_by_user(user_id).await.unwrap();
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|l| l.posted_by_id == Some(user_id)));

        let first = db.links().get_by_id(links[0].id).await.unwrap();
        assert_eq!(first.as_ref(), Some(&links[0]));
    }

    #[tokio::test]
    async fn test_filter_matches_description_or_url() {
        let db = Database::connect_in_memory().await.unwrap();
        seed(&db).await;
        let links = db.links();

        let query = FeedQuery {
            filter: Some("rust".to_string()),
            ..Default::default()
        };
        assert_eq!(links.count(&query).await.unwrap(), 2);
        assert_eq!(
            descriptions(&links.list(&query).await.unwrap()),
            vec!["Rust 2024 edition", "Async book"]
        );

        // Case-sensitive substring match
        let query = FeedQuery {
            filter: Some("Rust".to_string()),
            ..Default::default()
        };
        assert_eq!(links.count(&query).await.unwrap(), 1);

        let query = FeedQuery {
            filter: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(links.count(&query).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_order_and_pagination() {
        let db = Database::connect_in_memory().await.unwrap();
        seed(&db).await;
        let links = db.links();

        let query = FeedQuery {
            order: vec![(LinkSortField::Description, SortOrder::Desc)],
            ..Default::default()
        };
        assert_eq!(
            descriptions(&links.list(&query).await.unwrap()),
            vec!["Rust 2024 edition", "GraphQL spec", "Async book"]
        );

        let query = FeedQuery {
            skip: Some(1),
            take: Some(1),
            order: vec![(LinkSortField::Url, SortOrder::Asc)],
            ..Default::default()
        };
        assert_eq!(descriptions(&links.list(&query).await.unwrap()), vec!["Async book"]);
        // Count is independent of pagination
        assert_eq!(links.count(&query).await.unwrap(), 3);

        let query = FeedQuery {
            skip: Some(2),
            ..Default::default()
        };
        assert_eq!(descriptions(&links.list(&query).await.unwrap()), vec!["Async book"]);
    }
}
