use sqlx::SqlitePool;

use crate::models::HackathonsRow;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

const HACKATHON_COLUMNS: &str = r#"
  id,
  organizer_id,
  name,
  tagline,
  description,
  rules,
  prizes,
  location,
  format,
  starts_at,
  ends_at,
  registration_deadline,
  max_team_size,
  status,
  wizard_step,
  created_at,
  published_at
"#;

const SQL_INSERT_DRAFT: &str = r#"
INSERT INTO hackathons (
  id,
  organizer_id,
  name,
  status,
  wizard_step
) VALUES (?1, ?2, ?3, 'draft', 1)
"#;

const SQL_UPDATE_BASICS: &str = r#"
UPDATE hackathons
SET name = ?2,
    tagline = ?3,
    starts_at = ?4,
    ends_at = ?5,
    registration_deadline = ?6,
    max_team_size = ?7,
    wizard_step = ?8
WHERE id = ?1
"#;

const SQL_UPDATE_DETAILS: &str = r#"
UPDATE hackathons
SET description = ?2,
    rules = ?3,
    prizes = ?4,
    wizard_step = ?5
WHERE id = ?1
"#;

const SQL_UPDATE_VENUE: &str = r#"
UPDATE hackathons
SET location = ?2,
    format = ?3,
    wizard_step = ?4
WHERE id = ?1
"#;

// Guarded on status so a concurrent double publish loses on rows_affected.
const SQL_PUBLISH: &str = r#"
UPDATE hackathons
SET status = 'published',
    published_at = datetime('now')
WHERE id = ?1
  AND status = 'draft'
"#;

pub async fn insert_draft(
    pool: &SqlitePool,
    id: &str,
    organizer_id: &str,
    name: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_DRAFT)
        .bind(id)
        .bind(organizer_id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_hackathon(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<HackathonsRow>> {
    let sql = format!(
        "SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE id = ?1 LIMIT 1"
    );
    sqlx::query_as::<_, HackathonsRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update_basics(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    tagline: Option<&str>,
    starts_at: Option<&str>,
    ends_at: Option<&str>,
    registration_deadline: Option<&str>,
    max_team_size: Option<i64>,
    wizard_step: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_BASICS)
        .bind(id)
        .bind(name)
        .bind(tagline)
        .bind(starts_at)
        .bind(ends_at)
        .bind(registration_deadline)
        .bind(max_team_size)
        .bind(wizard_step)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_details(
    pool: &SqlitePool,
    id: &str,
    description: Option<&str>,
    rules: Option<&str>,
    prizes: Option<&str>,
    wizard_step: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_DETAILS)
        .bind(id)
        .bind(description)
        .bind(rules)
        .bind(prizes)
        .bind(wizard_step)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_venue(
    pool: &SqlitePool,
    id: &str,
    location: Option<&str>,
    format: Option<&str>,
    wizard_step: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_VENUE)
        .bind(id)
        .bind(location)
        .bind(format)
        .bind(wizard_step)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn publish(pool: &SqlitePool, id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_PUBLISH).bind(id).execute(pool).await?;
    Ok(res.rows_affected())
}

pub async fn list_published(
    pool: &SqlitePool,
    search: &str,
    format: &str,
    upcoming_only: bool,
) -> sqlx::Result<Vec<HackathonsRow>> {
    let sql = format!(
        r#"
SELECT {HACKATHON_COLUMNS}
FROM hackathons
WHERE status = 'published'
  AND (?1 = '' OR name LIKE '%' || ?1 || '%' OR tagline LIKE '%' || ?1 || '%')
  AND (?2 = '' OR format = ?2)
  AND (?3 = 0 OR starts_at >= datetime('now'))
ORDER BY COALESCE(published_at, created_at) DESC
LIMIT 100
"#
    );
    sqlx::query_as::<_, HackathonsRow>(&sql)
        .bind(search)
        .bind(format)
        .bind(if upcoming_only { 1_i64 } else { 0_i64 })
        .fetch_all(pool)
        .await
}
