//! Comment repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::comment::{EventComment, CommentWithAuthor};
use crate::utils::errors::VentyTimeError;

const COMMENT_COLUMNS: &str = "id, event_id, user_id, content, is_deleted, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub async fn create(&self, event_id: i64, user_id: i64, content: &str) -> Result<EventComment, VentyTimeError> {
        let comment = sqlx::query_as::<_, EventComment>(&format!(
            r#"
            INSERT INTO event_comments (event_id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Find comment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<EventComment>, VentyTimeError> {
        let comment = sqlx::query_as::<_, EventComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM event_comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Replace a comment's content
    pub async fn update_content(&self, id: i64, content: &str) -> Result<EventComment, VentyTimeError> {
        let comment = sqlx::query_as::<_, EventComment>(&format!(
            "UPDATE event_comments SET content = $2, updated_at = $3 WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Soft-delete a comment; the row stays for audit, listings skip it
    pub async fn soft_delete(&self, id: i64) -> Result<(), VentyTimeError> {
        sqlx::query("UPDATE event_comments SET is_deleted = TRUE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Non-deleted comments for an event with author fields, newest first
    pub async fn list_for_event(&self, event_id: i64, limit: i64, offset: i64) -> Result<Vec<CommentWithAuthor>, VentyTimeError> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.event_id, c.user_id, c.content, c.created_at, c.updated_at,
                   u.email AS author_email, u.first_name AS author_first_name, u.last_name AS author_last_name
            FROM event_comments c
            INNER JOIN users u ON u.id = c.user_id
            WHERE c.event_id = $1 AND c.is_deleted = FALSE
            ORDER BY c.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        )
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Count non-deleted comments for an event
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, VentyTimeError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_comments WHERE event_id = $1 AND is_deleted = FALSE"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
