#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FriendRequestRow {
    pub id: String,
    pub requester_id: String,
    pub recipient_id: String,
    pub state: String, // pending|accepted|rejected|cancelled
    pub created_at: String,
    pub resolved_at: Option<String>,
}
