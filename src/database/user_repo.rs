use sqlx::SqlitePool;

use crate::models::UsersRow;

pub const SQL_LOAD_USER_PROFILE: &str = r#"
SELECT
    user_id,
    name,
    tagline,
    bio,
    skills,
    location,
    github_url,
    avatar_url,
    is_organizer,
    last_seen_at
FROM users
WHERE user_id = ?1
LIMIT 1
"#;

pub async fn load_user_profile(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<UsersRow>> {
    sqlx::query_as::<_, UsersRow>(SQL_LOAD_USER_PROFILE)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
