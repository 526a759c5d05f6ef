#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct HackathonsRow {
    pub id: String,
    pub organizer_id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub prizes: Option<String>,
    pub location: Option<String>,
    pub format: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub registration_deadline: Option<String>,
    pub max_team_size: Option<i64>,
    pub status: String,
    pub wizard_step: i64,
    pub created_at: String,
    pub published_at: Option<String>,
}
