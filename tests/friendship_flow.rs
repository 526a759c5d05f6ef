use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use hackerflow::database::{friend_request_repo, friendship_repo, MIGRATOR};
use hackerflow::services::friendship_service::{
    self, FriendshipError, RelationshipView, RequestDirection,
};

// In-memory SQLite: a single connection, or every acquire would see a
// different empty database.
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    MIGRATOR.run(&pool).await.expect("migrations");
    pool
}

async fn seed_user(pool: &SqlitePool, id: &str, name: &str) {
    sqlx::query("INSERT INTO users (user_id, name) VALUES (?1, ?2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .expect("seed user");
}

async fn pool_with_users() -> SqlitePool {
    let pool = test_pool().await;
    seed_user(&pool, "alice", "Alice").await;
    seed_user(&pool, "bob", "Bob").await;
    seed_user(&pool, "carol", "Carol").await;
    pool
}

async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .expect("count query")
}

#[tokio::test]
async fn send_creates_pending_views_in_both_directions() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    assert_eq!(request.state, friend_request_repo::STATE_PENDING);
    assert!(request.resolved_at.is_none());

    let from_alice = friendship_service::check_friendship_status(&pool, "alice", "bob")
        .await
        .expect("check");
    assert_eq!(
        from_alice,
        RelationshipView::RequestPending {
            request_id: request.id.clone(),
            direction: RequestDirection::Sent,
        }
    );

    let from_bob = friendship_service::check_friendship_status(&pool, "bob", "alice")
        .await
        .expect("check");
    assert_eq!(
        from_bob,
        RelationshipView::RequestPending {
            request_id: request.id,
            direction: RequestDirection::Received,
        }
    );
}

#[tokio::test]
async fn accept_makes_both_views_friends() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    let friendship = friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .expect("accept");

    for (viewer, other) in [("alice", "bob"), ("bob", "alice")] {
        let view = friendship_service::check_friendship_status(&pool, viewer, other)
            .await
            .expect("check");
        assert_eq!(
            view,
            RelationshipView::Friends {
                friendship_id: friendship.id.clone(),
            }
        );
    }

    let resolved = friend_request_repo::get_friend_request(&pool, &request.id)
        .await
        .expect("get")
        .expect("request still exists");
    assert_eq!(resolved.state, friend_request_repo::STATE_ACCEPTED);
    assert!(resolved.resolved_at.is_some());
}

#[tokio::test]
async fn only_the_correct_actor_may_resolve() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");

    // Requester cannot accept or reject their own request.
    let err = friendship_service::accept_friend_request(&pool, &request.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::Forbidden));

    let err = friendship_service::reject_friend_request(&pool, &request.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::Forbidden));

    // Recipient cannot cancel, and a third party can do nothing.
    let err = friendship_service::cancel_friend_request(&pool, &request.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::Forbidden));

    let err = friendship_service::accept_friend_request(&pool, &request.id, "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::Forbidden));

    // Nothing was resolved along the way.
    let row = friend_request_repo::get_friend_request(&pool, &request.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(row.state, friend_request_repo::STATE_PENDING);
}

#[tokio::test]
async fn second_accept_fails_without_creating_a_second_friendship() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .expect("first accept");

    let err = friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::InvalidState));

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM friendships").await, 1);
}

#[tokio::test]
async fn cancel_returns_the_pair_to_none() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    friendship_service::cancel_friend_request(&pool, &request.id, "alice")
        .await
        .expect("cancel");

    for (viewer, other) in [("alice", "bob"), ("bob", "alice")] {
        let view = friendship_service::check_friendship_status(&pool, viewer, other)
            .await
            .expect("check");
        assert_eq!(view, RelationshipView::None);
    }

    let row = friend_request_repo::get_friend_request(&pool, &request.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(row.state, friend_request_repo::STATE_CANCELLED);
    assert!(row.resolved_at.is_some());
}

#[tokio::test]
async fn rejected_request_is_terminal_but_does_not_block_a_fresh_one() {
    let pool = pool_with_users().await;

    let first = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    friendship_service::reject_friend_request(&pool, &first.id, "bob")
        .await
        .expect("reject");

    let view = friendship_service::check_friendship_status(&pool, "alice", "bob")
        .await
        .expect("check");
    assert_eq!(view, RelationshipView::None);

    // Terminal: the rejected record cannot be resolved again.
    let err = friendship_service::accept_friend_request(&pool, &first.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::InvalidState));

    // Either party may open a new request afterwards.
    let second = friendship_service::send_friend_request(&pool, "bob", "alice")
        .await
        .expect("fresh send");
    assert_ne!(first.id, second.id);
    assert_eq!(second.state, friend_request_repo::STATE_PENDING);
}

#[tokio::test]
async fn duplicate_send_in_the_same_direction_is_refused() {
    let pool = pool_with_users().await;

    friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    let err = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::DuplicateRequest));
}

#[tokio::test]
async fn reciprocal_send_is_refused_while_a_request_is_open() {
    let pool = pool_with_users().await;

    friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    let err = friendship_service::send_friend_request(&pool, "bob", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::DuplicateRequest));

    assert_eq!(
        count(
            &pool,
            "SELECT COUNT(*) FROM friend_requests WHERE state = 'pending'"
        )
        .await,
        1
    );
}

#[tokio::test]
async fn pending_pair_uniqueness_is_enforced_by_the_store_itself() {
    let pool = pool_with_users().await;

    friend_request_repo::insert_friend_request(&pool, "req-1", "alice", "bob")
        .await
        .expect("first insert");

    // Bypass the service pre-checks: the partial unique index still refuses a
    // second live request for the pair, in either direction.
    let err = friend_request_repo::insert_friend_request(&pool, "req-2", "bob", "alice")
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[tokio::test]
async fn sending_to_yourself_is_refused() {
    let pool = pool_with_users().await;

    let err = friendship_service::send_friend_request(&pool, "alice", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::SelfRequest));
}

#[tokio::test]
async fn existing_friendship_blocks_a_new_request() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .expect("accept");

    // Both directions refuse.
    let err = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::AlreadyFriends));
    let err = friendship_service::send_friend_request(&pool, "bob", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::AlreadyFriends));
}

#[tokio::test]
async fn remove_friend_resets_the_pair_and_allows_a_new_request() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    let friendship = friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .expect("accept");

    friendship_service::remove_friend(&pool, &friendship.id, "alice")
        .await
        .expect("unfriend");

    for (viewer, other) in [("alice", "bob"), ("bob", "alice")] {
        let view = friendship_service::check_friendship_status(&pool, viewer, other)
            .await
            .expect("check");
        assert_eq!(view, RelationshipView::None);
    }

    // The historical request record is untouched.
    let row = friend_request_repo::get_friend_request(&pool, &request.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(row.state, friend_request_repo::STATE_ACCEPTED);

    let fresh = friendship_service::send_friend_request(&pool, "bob", "alice")
        .await
        .expect("fresh send");
    assert_eq!(fresh.state, friend_request_repo::STATE_PENDING);
}

#[tokio::test]
async fn only_a_party_to_the_friendship_may_remove_it() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    let friendship = friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .expect("accept");

    let err = friendship_service::remove_friend(&pool, &friendship.id, "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::Forbidden));

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM friendships").await, 1);
}

#[tokio::test]
async fn unknown_ids_report_not_found() {
    let pool = pool_with_users().await;

    let err = friendship_service::accept_friend_request(&pool, "missing", "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound));

    let err = friendship_service::cancel_friend_request(&pool, "missing", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound));

    let err = friendship_service::remove_friend(&pool, "missing", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound));
}

#[tokio::test]
async fn failed_accept_leaves_no_partial_state() {
    let pool = pool_with_users().await;

    let request = friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");
    friendship_service::cancel_friend_request(&pool, &request.id, "alice")
        .await
        .expect("cancel");

    let err = friendship_service::accept_friend_request(&pool, &request.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::InvalidState));

    // Neither half of the accept happened.
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM friendships").await, 0);
    let row = friend_request_repo::get_friend_request(&pool, &request.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(row.state, friend_request_repo::STATE_CANCELLED);
}

#[tokio::test]
async fn friendship_rows_are_stored_in_canonical_order() {
    let pool = pool_with_users().await;

    // bob sent first, so the requester sorts after the recipient.
    let request = friendship_service::send_friend_request(&pool, "bob", "alice")
        .await
        .expect("send");
    let friendship = friendship_service::accept_friend_request(&pool, &request.id, "alice")
        .await
        .expect("accept");

    assert_eq!(friendship.user_a, "alice");
    assert_eq!(friendship.user_b, "bob");

    let found = friendship_repo::find_friendship_between(&pool, "bob", "alice")
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(found.id, friendship.id);
}

#[tokio::test]
async fn friends_and_open_request_lists_reflect_state() {
    let pool = pool_with_users().await;

    // carol -> alice pending, alice -> bob pending.
    let from_carol = friendship_service::send_friend_request(&pool, "carol", "alice")
        .await
        .expect("send");
    friendship_service::send_friend_request(&pool, "alice", "bob")
        .await
        .expect("send");

    let open = friendship_service::list_open_requests(&pool, "alice")
        .await
        .expect("list");
    assert_eq!(open.incoming.len(), 1);
    assert_eq!(open.incoming[0].user_id, "carol");
    assert_eq!(open.incoming[0].name.as_deref(), Some("Carol"));
    assert_eq!(open.outgoing.len(), 1);
    assert_eq!(open.outgoing[0].user_id, "bob");

    friendship_service::accept_friend_request(&pool, &from_carol.id, "alice")
        .await
        .expect("accept");

    let open = friendship_service::list_open_requests(&pool, "alice")
        .await
        .expect("list");
    assert!(open.incoming.is_empty());
    assert_eq!(open.outgoing.len(), 1);

    let friends = friendship_service::list_friends(&pool, "alice")
        .await
        .expect("friends");
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].user_id, "carol");

    let friends_of_carol = friendship_service::list_friends(&pool, "carol")
        .await
        .expect("friends");
    assert_eq!(friends_of_carol.len(), 1);
    assert_eq!(friends_of_carol[0].user_id, "alice");
    assert_eq!(friends_of_carol[0].name.as_deref(), Some("Alice"));
}
