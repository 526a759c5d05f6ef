/// One row of the friends list: the friendship plus the other party's card.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FriendCardRow {
    pub friendship_id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
}

/// A pending request joined with the counterparty's card fields.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct PendingRequestRow {
    pub request_id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}
