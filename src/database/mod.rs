pub mod friend_request_repo;
pub mod friendship_repo;
pub mod hackathon_repo;
pub mod user_repo;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
