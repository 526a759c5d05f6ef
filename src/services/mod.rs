pub mod friendship_service;
pub mod hackathon_service;
pub mod user_service;
