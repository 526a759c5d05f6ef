use sqlx::SqlitePool;

use crate::database::user_repo;
use crate::services::friendship_service::{self, FriendshipError, RelationshipView};

#[derive(Debug, serde::Serialize)]
pub struct UserProfileView {
    pub user_id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub avatar_url: Option<String>,
    pub is_organizer: bool,
    pub last_seen_label: Option<String>,
    pub relationship: RelationshipView,
}

/// Profile card plus the viewer's relationship to it, so the frontend can
/// render the right friendship button state from a single fetch.
pub async fn load_user_profile_view(
    pool: &SqlitePool,
    viewer_id: &str,
    user_id: &str,
) -> Result<Option<UserProfileView>, FriendshipError> {
    let Some(row) = user_repo::load_user_profile(pool, user_id).await? else {
        return Ok(None);
    };

    let relationship = friendship_service::check_friendship_status(pool, viewer_id, user_id).await?;

    let skills = parse_skill_names(row.skills.as_deref().unwrap_or("[]"));
    let last_seen_label = row.last_seen_at.as_deref().and_then(format_last_seen);

    Ok(Some(UserProfileView {
        user_id: row.user_id,
        name: row.name.unwrap_or_default(),
        tagline: row.tagline,
        bio: row
            .bio
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        skills,
        location: row.location,
        github_url: row.github_url,
        avatar_url: row.avatar_url,
        is_organizer: row.is_organizer == 1,
        last_seen_label,
        relationship,
    }))
}

fn parse_skill_names(raw: &str) -> Vec<String> {
    let Ok(names) = serde_json::from_str::<Vec<String>>(raw) else {
        return vec![];
    };

    names
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn format_last_seen(raw: &str) -> Option<String> {
    // Expected examples: "2026-08-05T08:06:12.920925"
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut s = raw.to_string();
    if let Some(t_pos) = s.find('T') {
        s.replace_range(t_pos..=t_pos, " ");
    }
    // "YYYY-MM-DD HH:MM"
    Some(s.chars().take(16).collect())
}
