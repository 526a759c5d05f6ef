pub mod friend_requests;
pub mod friends;
pub mod friendships;
pub mod hackathons;
pub mod users;

pub use friend_requests::FriendRequestRow;
pub use friends::{FriendCardRow, PendingRequestRow};
pub use friendships::FriendshipRow;
pub use hackathons::HackathonsRow;
pub use users::UsersRow;
