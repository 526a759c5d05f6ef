use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::hackathon_repo::{self, STATUS_DRAFT, STATUS_PUBLISHED};
use crate::models::HackathonsRow;

#[derive(Debug, thiserror::Error)]
pub enum HackathonError {
    #[error("hackathon not found")]
    NotFound,
    #[error("only the organizer may edit this hackathon")]
    Forbidden,
    #[error("this hackathon is no longer editable")]
    InvalidState,
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),
}

const FORMATS: [&str; 3] = ["online", "in_person", "hybrid"];

// Wizard pages in order; each save marks its page done by advancing the
// stored step, so the frontend can resume where the organizer left off.
const STEP_BASICS: i64 = 2;
const STEP_DETAILS: i64 = 3;
const STEP_VENUE: i64 = 4;

#[derive(Debug, Deserialize)]
pub struct BasicsForm {
    pub name: String,
    pub tagline: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub registration_deadline: Option<String>,
    pub max_team_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsForm {
    pub description: Option<String>,
    pub rules: Option<String>,
    pub prizes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VenueForm {
    pub location: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub q: Option<String>,
    pub format: Option<String>,
    pub upcoming: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
pub struct HackathonCardView {
    pub id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub location: Option<String>,
    pub format: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub max_team_size: Option<i64>,
}

pub async fn create_draft(
    pool: &SqlitePool,
    organizer_id: &str,
    name: &str,
) -> Result<HackathonsRow, HackathonError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HackathonError::Validation(
            "name is required".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    hackathon_repo::insert_draft(pool, &id, organizer_id, name).await?;
    load_owned(pool, organizer_id, &id).await
}

pub async fn save_basics(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
    form: &BasicsForm,
) -> Result<HackathonsRow, HackathonError> {
    let row = load_editable(pool, organizer_id, hackathon_id).await?;

    let name = form.name.trim();
    if name.is_empty() {
        return Err(HackathonError::Validation(
            "name is required".to_string(),
        ));
    }

    hackathon_repo::update_basics(
        pool,
        hackathon_id,
        name,
        trimmed(form.tagline.as_deref()),
        trimmed(form.starts_at.as_deref()),
        trimmed(form.ends_at.as_deref()),
        trimmed(form.registration_deadline.as_deref()),
        form.max_team_size,
        row.wizard_step.max(STEP_BASICS),
    )
    .await?;

    load_owned(pool, organizer_id, hackathon_id).await
}

pub async fn save_details(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
    form: &DetailsForm,
) -> Result<HackathonsRow, HackathonError> {
    let row = load_editable(pool, organizer_id, hackathon_id).await?;

    hackathon_repo::update_details(
        pool,
        hackathon_id,
        trimmed(form.description.as_deref()),
        trimmed(form.rules.as_deref()),
        trimmed(form.prizes.as_deref()),
        row.wizard_step.max(STEP_DETAILS),
    )
    .await?;

    load_owned(pool, organizer_id, hackathon_id).await
}

pub async fn save_venue(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
    form: &VenueForm,
) -> Result<HackathonsRow, HackathonError> {
    let row = load_editable(pool, organizer_id, hackathon_id).await?;

    if let Some(format) = trimmed(form.format.as_deref()) {
        if !FORMATS.contains(&format) {
            return Err(HackathonError::Validation(format!(
                "format must be one of {}",
                FORMATS.join(", ")
            )));
        }
    }

    hackathon_repo::update_venue(
        pool,
        hackathon_id,
        trimmed(form.location.as_deref()),
        trimmed(form.format.as_deref()),
        row.wizard_step.max(STEP_VENUE),
    )
    .await?;

    load_owned(pool, organizer_id, hackathon_id).await
}

pub async fn publish(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
) -> Result<HackathonsRow, HackathonError> {
    let row = load_editable(pool, organizer_id, hackathon_id).await?;

    for (value, field) in [
        (Some(row.name.as_str()), "name"),
        (row.tagline.as_deref(), "tagline"),
        (row.description.as_deref(), "description"),
        (row.format.as_deref(), "format"),
        (row.starts_at.as_deref(), "starts_at"),
        (row.ends_at.as_deref(), "ends_at"),
    ] {
        if value.map(str::trim).unwrap_or("").is_empty() {
            return Err(HackathonError::Validation(format!(
                "{field} is required before publishing"
            )));
        }
    }

    let flipped = hackathon_repo::publish(pool, hackathon_id).await?;
    if flipped == 0 {
        // A concurrent publish got there first.
        return Err(HackathonError::InvalidState);
    }

    load_owned(pool, organizer_id, hackathon_id).await
}

pub async fn get_for_organizer(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
) -> Result<HackathonsRow, HackathonError> {
    load_owned(pool, organizer_id, hackathon_id).await
}

pub async fn get_published(
    pool: &SqlitePool,
    hackathon_id: &str,
) -> Result<Option<HackathonsRow>, HackathonError> {
    let row = hackathon_repo::get_hackathon(pool, hackathon_id).await?;
    Ok(row.filter(|r| r.status == STATUS_PUBLISHED))
}

pub async fn list_published(
    pool: &SqlitePool,
    query: &BrowseQuery,
) -> Result<Vec<HackathonCardView>, HackathonError> {
    let search = query.q.as_deref().map(str::trim).unwrap_or("");
    let format = query.format.as_deref().map(str::trim).unwrap_or("");
    let upcoming_only = query.upcoming.unwrap_or(false);

    let rows = hackathon_repo::list_published(pool, search, format, upcoming_only).await?;
    Ok(rows
        .into_iter()
        .map(|row| HackathonCardView {
            id: row.id,
            name: row.name,
            tagline: row.tagline,
            location: row.location,
            format: row.format,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            max_team_size: row.max_team_size,
        })
        .collect())
}

async fn load_owned(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
) -> Result<HackathonsRow, HackathonError> {
    let Some(row) = hackathon_repo::get_hackathon(pool, hackathon_id).await? else {
        return Err(HackathonError::NotFound);
    };
    if row.organizer_id != organizer_id {
        return Err(HackathonError::Forbidden);
    }
    Ok(row)
}

async fn load_editable(
    pool: &SqlitePool,
    organizer_id: &str,
    hackathon_id: &str,
) -> Result<HackathonsRow, HackathonError> {
    let row = load_owned(pool, organizer_id, hackathon_id).await?;
    if row.status != STATUS_DRAFT {
        return Err(HackathonError::InvalidState);
    }
    Ok(row)
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
