pub mod friends;
pub mod hackathons;
pub mod health;
pub mod users;
