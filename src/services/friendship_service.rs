use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::friend_request_repo::{
    self, STATE_ACCEPTED, STATE_CANCELLED, STATE_PENDING, STATE_REJECTED,
};
use crate::database::friendship_repo;
use crate::models::{FriendCardRow, FriendRequestRow, FriendshipRow, PendingRequestRow};

#[derive(Debug, thiserror::Error)]
pub enum FriendshipError {
    #[error("friend request not found")]
    NotFound,
    #[error("you are not allowed to act on this request")]
    Forbidden,
    #[error("this request has already been resolved")]
    InvalidState,
    #[error("a friend request between you two is already open")]
    DuplicateRequest,
    #[error("you are already friends")]
    AlreadyFriends,
    #[error("you cannot send a friend request to yourself")]
    SelfRequest,
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDirection {
    Sent,
    Received,
}

/// What the viewer's relationship to another user looks like right now.
/// `direction` only exists in the pending variant, so a "sent request with no
/// request" or a "friendship with a direction" cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelationshipView {
    None,
    Friends {
        friendship_id: String,
    },
    RequestPending {
        request_id: String,
        direction: RequestDirection,
    },
}

pub struct OpenRequests {
    pub incoming: Vec<PendingRequestRow>,
    pub outgoing: Vec<PendingRequestRow>,
}

pub async fn check_friendship_status(
    pool: &SqlitePool,
    viewer: &str,
    other: &str,
) -> Result<RelationshipView, FriendshipError> {
    if let Some(friendship) = friendship_repo::find_friendship_between(pool, viewer, other).await? {
        return Ok(RelationshipView::Friends {
            friendship_id: friendship.id,
        });
    }

    if let Some(request) = friend_request_repo::find_pending_between(pool, viewer, other).await? {
        let direction = if request.requester_id == viewer {
            RequestDirection::Sent
        } else {
            RequestDirection::Received
        };
        return Ok(RelationshipView::RequestPending {
            request_id: request.id,
            direction,
        });
    }

    Ok(RelationshipView::None)
}

pub async fn send_friend_request(
    pool: &SqlitePool,
    requester: &str,
    recipient: &str,
) -> Result<FriendRequestRow, FriendshipError> {
    if requester == recipient {
        return Err(FriendshipError::SelfRequest);
    }

    if friendship_repo::find_friendship_between(pool, requester, recipient)
        .await?
        .is_some()
    {
        return Err(FriendshipError::AlreadyFriends);
    }

    // One open request per pair, whichever side sent it. A reciprocal send is
    // refused rather than auto-accepted; the caller is told a request is
    // already open and can accept that one.
    if friend_request_repo::find_pending_between(pool, requester, recipient)
        .await?
        .is_some()
    {
        return Err(FriendshipError::DuplicateRequest);
    }

    let id = Uuid::new_v4().to_string();
    match friend_request_repo::insert_friend_request(pool, &id, requester, recipient).await {
        Ok(row) => Ok(row),
        // A racing send slipped in between the pre-check and the insert; the
        // partial unique index on the pending pair catches it.
        Err(e) if is_unique_violation(&e) => Err(FriendshipError::DuplicateRequest),
        Err(e) => Err(e.into()),
    }
}

pub async fn accept_friend_request(
    pool: &SqlitePool,
    request_id: &str,
    acting_user: &str,
) -> Result<FriendshipRow, FriendshipError> {
    let Some(request) = friend_request_repo::get_friend_request(pool, request_id).await? else {
        return Err(FriendshipError::NotFound);
    };
    if request.recipient_id != acting_user {
        return Err(FriendshipError::Forbidden);
    }
    if request.state != STATE_PENDING {
        return Err(FriendshipError::InvalidState);
    }

    // Flip the request and insert the friendship in one transaction, so a
    // crash between the two writes cannot leave an accepted request without
    // its friendship (or the reverse).
    let mut tx = pool.begin().await?;

    let flipped = friend_request_repo::mark_resolved(&mut tx, request_id, STATE_ACCEPTED).await?;
    if flipped == 0 {
        // Someone else resolved it since we loaded the row.
        tx.rollback().await?;
        return Err(FriendshipError::InvalidState);
    }

    let friendship_id = Uuid::new_v4().to_string();
    let friendship = match friendship_repo::insert_friendship(
        &mut tx,
        &friendship_id,
        &request.requester_id,
        &request.recipient_id,
    )
    .await
    {
        Ok(row) => row,
        Err(e) if is_unique_violation(&e) => {
            tx.rollback().await?;
            return Err(FriendshipError::AlreadyFriends);
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    Ok(friendship)
}

pub async fn reject_friend_request(
    pool: &SqlitePool,
    request_id: &str,
    acting_user: &str,
) -> Result<(), FriendshipError> {
    resolve_pending(pool, request_id, acting_user, Resolution::Rejected).await
}

pub async fn cancel_friend_request(
    pool: &SqlitePool,
    request_id: &str,
    acting_user: &str,
) -> Result<(), FriendshipError> {
    resolve_pending(pool, request_id, acting_user, Resolution::Cancelled).await
}

pub async fn remove_friend(
    pool: &SqlitePool,
    friendship_id: &str,
    acting_user: &str,
) -> Result<(), FriendshipError> {
    let Some(friendship) = friendship_repo::get_friendship(pool, friendship_id).await? else {
        return Err(FriendshipError::NotFound);
    };
    if friendship.user_a != acting_user && friendship.user_b != acting_user {
        return Err(FriendshipError::Forbidden);
    }

    let deleted = friendship_repo::delete_friendship(pool, friendship_id).await?;
    if deleted == 0 {
        // The other party unfriended first.
        return Err(FriendshipError::NotFound);
    }
    Ok(())
}

pub async fn list_friends(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<FriendCardRow>, FriendshipError> {
    Ok(friendship_repo::list_friend_cards(pool, user_id).await?)
}

pub async fn list_open_requests(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<OpenRequests, FriendshipError> {
    let incoming = friend_request_repo::list_incoming_pending(pool, user_id).await?;
    let outgoing = friend_request_repo::list_outgoing_pending(pool, user_id).await?;
    Ok(OpenRequests { incoming, outgoing })
}

enum Resolution {
    Rejected,
    Cancelled,
}

impl Resolution {
    fn state(&self) -> &'static str {
        match self {
            Resolution::Rejected => STATE_REJECTED,
            Resolution::Cancelled => STATE_CANCELLED,
        }
    }
}

// Reject belongs to the recipient, cancel to the requester; otherwise the two
// resolutions behave identically.
async fn resolve_pending(
    pool: &SqlitePool,
    request_id: &str,
    acting_user: &str,
    resolution: Resolution,
) -> Result<(), FriendshipError> {
    let Some(request) = friend_request_repo::get_friend_request(pool, request_id).await? else {
        return Err(FriendshipError::NotFound);
    };

    let allowed_actor = match resolution {
        Resolution::Rejected => &request.recipient_id,
        Resolution::Cancelled => &request.requester_id,
    };
    if allowed_actor != acting_user {
        return Err(FriendshipError::Forbidden);
    }
    if request.state != STATE_PENDING {
        return Err(FriendshipError::InvalidState);
    }

    let mut conn = pool.acquire().await?;
    let flipped =
        friend_request_repo::mark_resolved(&mut conn, request_id, resolution.state()).await?;
    if flipped == 0 {
        return Err(FriendshipError::InvalidState);
    }
    Ok(())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
