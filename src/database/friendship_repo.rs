use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{FriendCardRow, FriendshipRow};

const SQL_INSERT_FRIENDSHIP: &str = r#"
INSERT INTO friendships (
  id,
  user_a,
  user_b
) VALUES (?1, ?2, ?3)
"#;

const SQL_GET_FRIENDSHIP: &str = r#"
SELECT
  id,
  user_a,
  user_b,
  created_at
FROM friendships
WHERE id = ?1
LIMIT 1
"#;

const SQL_FIND_FRIENDSHIP_BETWEEN: &str = r#"
SELECT
  id,
  user_a,
  user_b,
  created_at
FROM friendships
WHERE user_a = ?1
  AND user_b = ?2
LIMIT 1
"#;

const SQL_DELETE_FRIENDSHIP: &str = r#"
DELETE FROM friendships
WHERE id = ?1
"#;

const SQL_LIST_FRIEND_CARDS: &str = r#"
SELECT
  f.id AS friendship_id,
  u.user_id,
  u.name,
  u.tagline,
  u.avatar_url,
  u.location
FROM friendships f
JOIN users u
  ON u.user_id = CASE WHEN f.user_a = ?1 THEN f.user_b ELSE f.user_a END
WHERE f.user_a = ?1
   OR f.user_b = ?1
ORDER BY f.created_at DESC
"#;

/// Friendship rows are stored with the lexicographically smaller id first so
/// the pair's uniqueness constraint holds in both directions.
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub async fn insert_friendship(
    conn: &mut SqliteConnection,
    id: &str,
    user_a: &str,
    user_b: &str,
) -> sqlx::Result<FriendshipRow> {
    let (first, second) = canonical_pair(user_a, user_b);
    sqlx::query(SQL_INSERT_FRIENDSHIP)
        .bind(id)
        .bind(first)
        .bind(second)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, FriendshipRow>(SQL_GET_FRIENDSHIP)
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn get_friendship(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<FriendshipRow>> {
    sqlx::query_as::<_, FriendshipRow>(SQL_GET_FRIENDSHIP)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_friendship_between(
    pool: &SqlitePool,
    user_a: &str,
    user_b: &str,
) -> sqlx::Result<Option<FriendshipRow>> {
    let (first, second) = canonical_pair(user_a, user_b);
    sqlx::query_as::<_, FriendshipRow>(SQL_FIND_FRIENDSHIP_BETWEEN)
        .bind(first)
        .bind(second)
        .fetch_optional(pool)
        .await
}

pub async fn delete_friendship(pool: &SqlitePool, id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_FRIENDSHIP)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_friend_cards(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<FriendCardRow>> {
    sqlx::query_as::<_, FriendCardRow>(SQL_LIST_FRIEND_CARDS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
