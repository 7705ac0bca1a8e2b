// tests/store_tests.rs
//
// Contract-level tests, run against the in-memory backend (no database
// required). The relational backend implements the same trait; its queries
// are shaped to return identical results for identical histories.

use postgraph::error::AppError;
use postgraph::storage::{MemoryStore, NewComment, NewPost, NewUser, PostPatch, Store};

async fn seed_user(store: &MemoryStore, tag: &str) -> i64 {
    store
        .create_user(NewUser {
            login: format!("user_{}", tag),
            name: "Test".to_string(),
            surname: "User".to_string(),
            phone: format!("+7000{}", tag),
            email: format!("{}@example.com", tag),
        })
        .await
        .expect("create user")
}

async fn seed_post(store: &MemoryStore, author_id: i64) -> i64 {
    store
        .create_post(NewPost {
            author_id,
            title: "title".to_string(),
            body: "body".to_string(),
            is_commented: true,
        })
        .await
        .expect("create post")
}

async fn seed_comment(store: &MemoryStore, post_id: i64, author_id: i64, parent_id: i64) -> i64 {
    store
        .create_comment(NewComment {
            post_id,
            author_id,
            parent_id,
            body: format!("comment under {}", parent_id),
        })
        .await
        .expect("create comment")
}

#[tokio::test]
async fn user_uniqueness_is_case_insensitive() {
    let store = MemoryStore::new();
    seed_user(&store, "alice").await;

    let err = store
        .create_user(NewUser {
            login: "USER_ALICE".to_string(),
            name: "Other".to_string(),
            surname: "User".to_string(),
            phone: "+79990001122".to_string(),
            email: "other@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn create_post_requires_existing_author() {
    let store = MemoryStore::new();
    let err = store
        .create_post(NewPost {
            author_id: 99,
            title: "t".to_string(),
            body: "b".to_string(),
            is_commented: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn get_posts_orders_by_update_time_and_skips_deleted() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "author").await;
    let p1 = seed_post(&store, user).await;
    let p2 = seed_post(&store, user).await;
    let p3 = seed_post(&store, user).await;

    store.delete_post(p2).await.unwrap();
    // Touching p1 bumps its upd_date past p3's.
    store
        .update_post(PostPatch {
            post_id: p1,
            title: Some("updated".to_string()),
            body: None,
            is_commented: None,
        })
        .await
        .unwrap();

    let posts = store.get_posts(user).await.unwrap();
    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p1, p3]);
    assert_eq!(posts[0].title, "updated");
    // Absent patch fields stayed untouched.
    assert_eq!(posts[0].body, "body");
    assert!(posts[0].is_commented);
}

#[tokio::test]
async fn update_of_deleted_post_is_not_found() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    store.delete_post(post).await.unwrap();

    let err = store
        .update_post(PostPatch {
            post_id: post,
            title: Some("x".to_string()),
            body: None,
            is_commented: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = store.delete_post(post).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn thread_page_pairs_root_with_earliest_reply() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    let c1 = seed_comment(&store, post, user, 0).await;
    let c2 = seed_comment(&store, post, user, c1).await;
    let c3 = seed_comment(&store, post, user, c1).await;

    let page = store.get_comments(post, 0, 0, 10).await.unwrap();
    // One root, one preview row; the later reply c3 is not on this page.
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, c1);
    assert_eq!(page[0].parent_id, 0);
    assert_eq!(page[0].child_count, 2);
    assert_eq!(page[1].id, c2);
    assert_eq!(page[1].parent_id, c1);

    // Deeper replies come from a second call with the root as parent.
    let replies = store.get_comments(post, c1, 0, 10).await.unwrap();
    let ids: Vec<i64> = replies.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c2, c3]);
    assert_eq!(replies[0].login, "user_u");
}

#[tokio::test]
async fn roots_are_ordered_by_creation_and_paged() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    let mut ids = Vec::new();
    for _ in 0..15 {
        ids.push(seed_comment(&store, post, user, 0).await);
    }

    // per_page 0 falls back to 10
    let first = store.get_comments(post, 0, 0, 0).await.unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(
        first.iter().map(|c| c.id).collect::<Vec<_>>(),
        ids[..10].to_vec()
    );

    let second = store.get_comments(post, 0, 1, 10).await.unwrap();
    assert_eq!(
        second.iter().map(|c| c.id).collect::<Vec<_>>(),
        ids[10..].to_vec()
    );

    // Out-of-range page is empty, not an error.
    let empty = store.get_comments(post, 0, 5, 10).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn huge_page_values_yield_empty_page() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    let first = seed_comment(&store, post, user, 0).await;
    seed_comment(&store, post, user, 0).await;

    // page numbers near i64::MAX saturate into an empty window
    let empty = store.get_comments(post, 0, i64::MAX, 10).await.unwrap();
    assert!(empty.is_empty());
    let empty = store.get_comments(post, 0, i64::MAX, i64::MAX).await.unwrap();
    assert!(empty.is_empty());

    // an oversized per_page on the first page still returns everything
    let all = store.get_comments(post, 0, 0, i64::MAX).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first);
}

#[tokio::test]
async fn deleted_comment_with_children_renders_placeholder() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    let c1 = seed_comment(&store, post, user, 0).await;
    let c2 = seed_comment(&store, post, user, c1).await;

    store.delete_comment(c1).await.unwrap();

    // Still visible at its level because c2 renders under it.
    let page = store.get_comments(post, 0, 0, 10).await.unwrap();
    assert_eq!(page[0].id, c1);
    assert_eq!(page[0].body, "Comment was deleted");
    assert_eq!(page[0].child_count, 1);

    // Its children remain fetchable directly.
    let replies = store.get_comments(post, c1, 0, 10).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, c2);
}

#[tokio::test]
async fn deleted_childless_comment_disappears() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    let c1 = seed_comment(&store, post, user, 0).await;
    let c2 = seed_comment(&store, post, user, 0).await;

    store.delete_comment(c1).await.unwrap();

    let page = store.get_comments(post, 0, 0, 10).await.unwrap();
    assert_eq!(page.iter().map(|c| c.id).collect::<Vec<_>>(), vec![c2]);
}

#[tokio::test]
async fn deleted_reply_is_never_the_preview() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;
    let c1 = seed_comment(&store, post, user, 0).await;
    let c2 = seed_comment(&store, post, user, c1).await;
    let c3 = seed_comment(&store, post, user, c1).await;

    store.delete_comment(c2).await.unwrap();

    let page = store.get_comments(post, 0, 0, 10).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[1].id, c3);
    // The deleted reply left the child set.
    assert_eq!(page[0].child_count, 1);
}

#[tokio::test]
async fn comment_requires_valid_parent() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post_a = seed_post(&store, user).await;
    let post_b = seed_post(&store, user).await;
    let c_b = seed_comment(&store, post_b, user, 0).await;

    let err = store
        .create_comment(NewComment {
            post_id: post_a,
            author_id: user,
            parent_id: 999,
            body: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // A parent belonging to a different post is just as invalid.
    let err = store
        .create_comment(NewComment {
            post_id: post_a,
            author_id: user,
            parent_id: c_b,
            body: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn get_comments_on_unknown_post_is_not_found() {
    let store = MemoryStore::new();
    let err = store.get_comments(42, 0, 0, 10).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn same_vote_twice_round_trips_to_none() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;

    store.upd_post_likes(user, post, true).await.unwrap();
    store.upd_post_likes(user, post, true).await.unwrap();

    let counts = store.get_post_likes(post).await.unwrap();
    assert_eq!((counts.likes, counts.dislikes), (0, 0));
}

#[tokio::test]
async fn opposite_vote_flips_without_passing_through_none() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;
    let post = seed_post(&store, user).await;

    store.upd_post_likes(user, post, true).await.unwrap();
    let counts = store.get_post_likes(post).await.unwrap();
    assert_eq!((counts.likes, counts.dislikes), (1, 0));

    store.upd_post_likes(user, post, false).await.unwrap();
    let counts = store.get_post_likes(post).await.unwrap();
    assert_eq!((counts.likes, counts.dislikes), (0, 1));
}

#[tokio::test]
async fn comment_reactions_aggregate_per_actor() {
    let store = MemoryStore::new();
    let u1 = seed_user(&store, "u1").await;
    let u2 = seed_user(&store, "u2").await;
    let post = seed_post(&store, u1).await;
    let c1 = seed_comment(&store, post, u1, 0).await;

    store.upd_comment_likes(u1, c1, true).await.unwrap();
    store.upd_comment_likes(u2, c1, false).await.unwrap();

    let counts = store.get_comment_likes(c1).await.unwrap();
    assert_eq!((counts.likes, counts.dislikes), (1, 1));

    let page = store.get_comments(post, 0, 0, 10).await.unwrap();
    assert_eq!((page[0].likes, page[0].dislikes), (1, 1));
}

#[tokio::test]
async fn reaction_on_missing_target_is_not_found() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "u").await;

    let err = store.upd_post_likes(user, 5, true).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = store.get_comment_likes(5).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn drain_is_consume_once() {
    let store = MemoryStore::new();
    let author = seed_user(&store, "author").await;
    let reader = seed_user(&store, "reader").await;
    let post = seed_post(&store, author).await;

    store.create_subscription(reader, post).await.unwrap();
    seed_comment(&store, post, author, 0).await;
    seed_comment(&store, post, author, 0).await;

    assert_eq!(store.drain_new_comments(reader, post).await.unwrap(), 2);
    assert_eq!(store.drain_new_comments(reader, post).await.unwrap(), 0);
}

#[tokio::test]
async fn unsubscribed_users_accumulate_nothing() {
    let store = MemoryStore::new();
    let author = seed_user(&store, "author").await;
    let reader = seed_user(&store, "reader").await;
    let post = seed_post(&store, author).await;

    store.create_subscription(reader, post).await.unwrap();
    seed_comment(&store, post, author, 0).await;
    store.delete_subscription(reader, post).await.unwrap();

    // Unsubscribe cleared the pending list; the row still exists, so the
    // drain succeeds with zero.
    assert_eq!(store.drain_new_comments(reader, post).await.unwrap(), 0);

    // Comments made while unsubscribed never reach the pending list.
    seed_comment(&store, post, author, 0).await;
    store.create_subscription(reader, post).await.unwrap();
    seed_comment(&store, post, author, 0).await;
    assert_eq!(store.drain_new_comments(reader, post).await.unwrap(), 1);
}

#[tokio::test]
async fn resubscribe_returns_the_same_subscription() {
    let store = MemoryStore::new();
    let author = seed_user(&store, "author").await;
    let reader = seed_user(&store, "reader").await;
    let post = seed_post(&store, author).await;

    let first = store.create_subscription(reader, post).await.unwrap();
    store.delete_subscription(reader, post).await.unwrap();
    let second = store.create_subscription(reader, post).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn check_subscription_requires_active_row() {
    let store = MemoryStore::new();
    let author = seed_user(&store, "author").await;
    let reader = seed_user(&store, "reader").await;
    let post = seed_post(&store, author).await;

    let err = store.check_subscription(reader, post).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    store.create_subscription(reader, post).await.unwrap();
    store.check_subscription(reader, post).await.unwrap();

    store.delete_subscription(reader, post).await.unwrap();
    let err = store.check_subscription(reader, post).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn drain_without_subscription_row_is_not_found() {
    let store = MemoryStore::new();
    let author = seed_user(&store, "author").await;
    let post = seed_post(&store, author).await;

    let err = store.drain_new_comments(author, post).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
