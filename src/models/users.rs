#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsersRow {
    pub user_id: String,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub avatar_url: Option<String>,
    pub is_organizer: i64,
    pub last_seen_at: Option<String>,
}
