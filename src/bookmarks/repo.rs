use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::{CreateBookmarkRequest, EditBookmarkRequest};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const BOOKMARK_COLUMNS: &str = "id, user_id, title, link, description, created_at, updated_at";

pub async fn list_by_user(db: &PgPool, user_id: i64) -> Result<Vec<Bookmark>, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(&format!(
        "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Scoped read: absent and owned-by-someone-else both come back as `None`.
pub async fn find_for_user(
    db: &PgPool,
    user_id: i64,
    id: i64,
) -> Result<Option<Bookmark>, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(&format!(
        "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Unscoped read, for the explicit ownership check before a write.
pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Bookmark>, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(&format!(
        "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(
    db: &PgPool,
    user_id: i64,
    fields: &CreateBookmarkRequest,
) -> Result<Bookmark, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(&format!(
        r#"
        INSERT INTO bookmarks (user_id, title, link, description)
        VALUES ($1, $2, $3, $4)
        RETURNING {BOOKMARK_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.link)
    .bind(fields.description.as_deref())
    .fetch_one(db)
    .await
}

/// Merges only the provided fields. Callers must have checked ownership.
/// COALESCE means a provided null is indistinguishable from an absent
/// field, so PATCH cannot clear `description` back to null.
pub async fn update(
    db: &PgPool,
    id: i64,
    fields: &EditBookmarkRequest,
) -> Result<Bookmark, sqlx::Error> {
    sqlx::query_as::<_, Bookmark>(&format!(
        r#"
        UPDATE bookmarks
        SET title       = COALESCE($2, title),
            link        = COALESCE($3, link),
            description = COALESCE($4, description),
            updated_at  = now()
        WHERE id = $1
        RETURNING {BOOKMARK_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(fields.title.as_deref())
    .bind(fields.link.as_deref())
    .bind(fields.description.as_deref())
    .fetch_one(db)
    .await
}

pub async fn delete(db: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM bookmarks WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookmark_serializes_all_public_fields() {
        let bookmark = Bookmark {
            id: 3,
            user_id: 1,
            title: "Example".into(),
            link: "https://example.com".into(),
            description: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json: serde_json::Value = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["title"], "Example");
        assert_eq!(json["description"], serde_json::Value::Null);
    }
}
