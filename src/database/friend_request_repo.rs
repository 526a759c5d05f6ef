use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{FriendRequestRow, PendingRequestRow};

pub const STATE_PENDING: &str = "pending";
pub const STATE_ACCEPTED: &str = "accepted";
pub const STATE_REJECTED: &str = "rejected";
pub const STATE_CANCELLED: &str = "cancelled";

const SQL_INSERT_FRIEND_REQUEST: &str = r#"
INSERT INTO friend_requests (
  id,
  requester_id,
  recipient_id,
  state
) VALUES (?1, ?2, ?3, 'pending')
"#;

const SQL_GET_FRIEND_REQUEST: &str = r#"
SELECT
  id,
  requester_id,
  recipient_id,
  state,
  created_at,
  resolved_at
FROM friend_requests
WHERE id = ?1
LIMIT 1
"#;

const SQL_FIND_PENDING_BETWEEN: &str = r#"
SELECT
  id,
  requester_id,
  recipient_id,
  state,
  created_at,
  resolved_at
FROM friend_requests
WHERE state = 'pending'
  AND (
    (requester_id = ?1 AND recipient_id = ?2)
    OR (requester_id = ?2 AND recipient_id = ?1)
  )
ORDER BY created_at DESC
LIMIT 1
"#;

// The state guard makes concurrent resolution attempts race on
// rows_affected instead of double-applying.
const SQL_MARK_RESOLVED: &str = r#"
UPDATE friend_requests
SET state = ?2,
    resolved_at = datetime('now')
WHERE id = ?1
  AND state = 'pending'
"#;

const SQL_LIST_INCOMING_PENDING: &str = r#"
SELECT
  r.id AS request_id,
  u.user_id,
  u.name,
  u.tagline,
  u.avatar_url,
  r.created_at
FROM friend_requests r
JOIN users u ON u.user_id = r.requester_id
WHERE r.recipient_id = ?1
  AND r.state = 'pending'
ORDER BY r.created_at DESC
"#;

const SQL_LIST_OUTGOING_PENDING: &str = r#"
SELECT
  r.id AS request_id,
  u.user_id,
  u.name,
  u.tagline,
  u.avatar_url,
  r.created_at
FROM friend_requests r
JOIN users u ON u.user_id = r.recipient_id
WHERE r.requester_id = ?1
  AND r.state = 'pending'
ORDER BY r.created_at DESC
"#;

pub async fn insert_friend_request(
    pool: &SqlitePool,
    id: &str,
    requester_id: &str,
    recipient_id: &str,
) -> sqlx::Result<FriendRequestRow> {
    sqlx::query(SQL_INSERT_FRIEND_REQUEST)
        .bind(id)
        .bind(requester_id)
        .bind(recipient_id)
        .execute(pool)
        .await?;

    sqlx::query_as::<_, FriendRequestRow>(SQL_GET_FRIEND_REQUEST)
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn get_friend_request(
    pool: &SqlitePool,
    id: &str,
) -> sqlx::Result<Option<FriendRequestRow>> {
    sqlx::query_as::<_, FriendRequestRow>(SQL_GET_FRIEND_REQUEST)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_pending_between(
    pool: &SqlitePool,
    user_a: &str,
    user_b: &str,
) -> sqlx::Result<Option<FriendRequestRow>> {
    sqlx::query_as::<_, FriendRequestRow>(SQL_FIND_PENDING_BETWEEN)
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(pool)
        .await
}

pub async fn mark_resolved(
    conn: &mut SqliteConnection,
    id: &str,
    new_state: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_RESOLVED)
        .bind(id)
        .bind(new_state)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_incoming_pending(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<PendingRequestRow>> {
    sqlx::query_as::<_, PendingRequestRow>(SQL_LIST_INCOMING_PENDING)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_outgoing_pending(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<PendingRequestRow>> {
    sqlx::query_as::<_, PendingRequestRow>(SQL_LIST_OUTGOING_PENDING)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
