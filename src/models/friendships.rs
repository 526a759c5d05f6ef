#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FriendshipRow {
    pub id: String,
    pub user_a: String,
    pub user_b: String,
    pub created_at: String,
}
