//! Votes repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoteRecord {
    pub id: i64,
    pub link_id: i64,
    pub user_id: i64,
}

pub struct VoteRepository {
    pool: SqlitePool,
}

impl VoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The vote a user cast for a link, if any
    pub async fn find(&self, link_id: i64, user_id: i64) -> Result<Option<VoteRecord>> {
        let record = sqlx::query_as::<_, VoteRecord>(
            "SELECT id, link_id, user_id FROM votes WHERE link_id = ? AND user_id = ?",
        )
        .bind(link_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a vote. Fails with a UNIQUE violation when the pair already exists.
    pub async fn create(&self, link_id: i64, user_id: i64) -> Result<VoteRecord> {
        let record = sqlx::query_as::<_, VoteRecord>(
            "INSERT INTO votes (link_id, user_id) VALUES (?, ?) RETURNING id, link_id, user_id",
        )
        .bind(link_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list_by_link(&self, link_id: i64) -> Result<Vec<VoteRecord>> {
        let records = sqlx::query_as::<_, VoteRecord>(
            "SELECT id, link_id, user_id FROM votes WHERE link_id = ? ORDER BY id",
        )
        .bind(link_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::{CreateLink, CreateUser, Database, is_unique_violation};

    async fn user_and_link(db: &Database) -> (i64, i64) {
        let user = db
            .users()
            .create(CreateUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let link = db
            .links()
            .create(CreateLink {
                description: "A link".to_string(),
                url: "https://example.com".to_string(),
                posted_by_id: None,
            })
            .await
            .unwrap();
        (user.id, link.id)
    }

    #[tokio::test]
    async fn test_vote_once() {
        let db = Database::connect_in_memory().await.unwrap();
        let (user_id, link_id) = user_and_link(&db).await;
        let votes = db.votes();

        assert!(votes.find(link_id, user_id).await.unwrap().is_none());

        let vote = votes.create(link_id, user_id).await.unwrap();
        assert_eq!(vote.link_id, link_id);
        assert_eq!(vote.user_id, user_id);
        assert_eq!(votes.find(link_id, user_id).await.unwrap(), Some(vote.clone()));

        let err = votes.create(link_id, user_id).await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(votes.list_by_link(link_id).await.unwrap(), vec![vote]);
    }

    #[tokio::test]
    async fn test_vote_for_missing_link_is_rejected() {
        let db = Database::connect_in_memory().await.unwrap();
        let (user_id, _) = user_and_link(&db).await;

        let err = db.votes().create(9999, user_id).await.unwrap_err();
        assert!(!is_unique_violation(&err));
    }
}
