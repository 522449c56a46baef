use chrono::{DateTime, TimeZone, Utc};
use livestream_service::models::{
    NewComment, NewStream, SortKey, SortOrder, StreamFilters, StreamPatch, StreamState, User,
};
use livestream_service::{
    CommentService, EndOutcome, InMemoryStreamStore, ServiceError, StreamLifecycleService,
    StreamListingService, StreamStore,
};
use std::sync::Arc;
use uuid::Uuid;

struct Harness {
    store: InMemoryStreamStore,
    lifecycle: StreamLifecycleService,
    listing: StreamListingService,
    comments: CommentService,
}

fn harness() -> Harness {
    let store = InMemoryStreamStore::new();
    let shared: Arc<dyn StreamStore> = Arc::new(store.clone());
    Harness {
        lifecycle: StreamLifecycleService::new(shared.clone()),
        listing: StreamListingService::new(shared.clone()),
        comments: CommentService::new(shared),
        store,
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn stream_one() -> NewStream {
    NewStream {
        title: Some("this is a title from stream service".into()),
        description: Some("arbitrary description".into()),
        app_instance: Some("123-123-123-123".into()),
        created_at: Some(date(2016, 3, 8)),
        ended_at: None,
    }
}

fn stream_two() -> NewStream {
    NewStream {
        title: Some("Its more recent title from stream service".into()),
        description: Some("arbitrary description".into()),
        app_instance: Some("7777-777-777".into()),
        created_at: Some(date(2017, 7, 7)),
        ended_at: None,
    }
}

fn stream_three() -> NewStream {
    NewStream {
        title: Some("old stream, ended stream".into()),
        description: Some("arbitrary description".into()),
        app_instance: Some("7999-777-777".into()),
        created_at: Some(date(2015, 1, 1)),
        ended_at: Some(date(2015, 1, 2)),
    }
}

fn comment(content: &str, created_at_ms: i64, alias: &str) -> NewComment {
    NewComment {
        content: content.into(),
        created_at: Utc.timestamp_millis_opt(created_at_ms).single(),
        alias: Some(alias.into()),
    }
}

async fn bob(h: &Harness) -> User {
    h.store.insert_user("Bob", "Bob the Builder").await
}

async fn alice(h: &Harness) -> User {
    h.store.insert_user("Alice", "Alice in the wonderland").await
}

/// Bob owns all three fixture streams; the third one has already ended.
async fn seed_three_streams(h: &Harness) -> User {
    let bob = bob(h).await;
    for fields in [stream_one(), stream_two(), stream_three()] {
        h.lifecycle
            .create_stream(&bob.id.to_string(), fields)
            .await
            .unwrap();
    }
    bob
}

fn filters(state: StreamState, sort: SortKey, order: SortOrder) -> StreamFilters {
    StreamFilters::new(state, sort, order)
}

fn titles(streams: &[livestream_service::models::StreamDto]) -> Vec<&str> {
    streams.iter().map(|s| s.title.as_str()).collect()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_stream_valid() {
    let h = harness();
    let bob = bob(&h).await;

    let fields = NewStream {
        created_at: None,
        ..stream_one()
    };
    let before = Utc::now();
    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), fields)
        .await
        .unwrap();

    assert_eq!(stream.title, "this is a title from stream service");
    assert_eq!(stream.description.as_deref(), Some("arbitrary description"));
    assert!(stream.live);
    assert_eq!(stream.total_viewers, 0);
    assert!(stream.ended_at.is_none());
    assert!(stream.created_at >= before);
    assert_eq!(stream.owner, bob.id);
    assert_eq!(stream.streamer.username, "Bob");
    assert_eq!(stream.streamer.created_at, bob.created_at);
    assert_eq!(stream.streamer.is_subscribed, None);
}

#[tokio::test]
async fn test_create_stream_unknown_user() {
    let h = harness();

    let err = h
        .lifecycle
        .create_stream(&Uuid::new_v4().to_string(), stream_one())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));

    let err = h.lifecycle.create_stream("", stream_one()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));
}

#[tokio::test]
async fn test_create_stream_validates_before_owner_lookup() {
    let h = harness();
    let fields = NewStream {
        app_instance: None,
        ..stream_one()
    };

    let err = h
        .lifecycle
        .create_stream(&Uuid::new_v4().to_string(), fields)
        .await
        .unwrap_err();
    assert_eq!(err.extra(), Some("appInstance"));
}

#[tokio::test]
async fn test_create_stream_empty_title() {
    let h = harness();
    let bob = bob(&h).await;
    let fields = NewStream {
        title: Some(String::new()),
        ..stream_one()
    };

    let err = h
        .lifecycle
        .create_stream(&bob.id.to_string(), fields)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_field");
    assert_eq!(err.extra(), Some("title"));
}

#[tokio::test]
async fn test_create_stream_duplicate_app_instance() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;
    h.lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();

    // uniqueness is global, not per owner
    let duplicate = NewStream {
        title: Some("duplicate".into()),
        ..stream_one()
    };
    let err = h
        .lifecycle
        .create_stream(&alice.id.to_string(), duplicate)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "appInstance must be unique");
    assert_eq!(err.extra(), Some("appInstance"));
}

#[tokio::test]
async fn test_create_backfilled_stream_is_not_live() {
    let h = harness();
    let bob = bob(&h).await;

    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_three())
        .await
        .unwrap();
    assert!(!stream.live);
    assert_eq!(stream.ended_at, Some(date(2015, 1, 2)));
}

#[tokio::test]
async fn test_get_stream_by_id() {
    let h = harness();
    let bob = bob(&h).await;
    let created = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();

    let stream = h
        .lifecycle
        .get_stream_by_id(&created.stream_id.to_string())
        .await
        .unwrap();
    assert_eq!(stream, created);
    assert_eq!(stream.streamer.username, "Bob");
}

#[tokio::test]
async fn test_get_stream_by_empty_or_malformed_id() {
    let h = harness();
    let bob = bob(&h).await;
    h.lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();

    for id in ["", "asd-234234", &Uuid::new_v4().to_string()] {
        let err = h.lifecycle.get_stream_by_id(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Stream not found"));
    }
}

#[tokio::test]
async fn test_update_stream() {
    let h = harness();
    let bob = bob(&h).await;
    let created = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();

    let updated = h
        .lifecycle
        .update_stream(
            &created.stream_id.to_string(),
            StreamPatch {
                title: Some("new title".into()),
                description: Some("a description".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "new title");
    assert_eq!(updated.description.as_deref(), Some("a description"));
    assert_eq!(updated.app_instance, "123-123-123-123");

    // absent fields are left alone
    let updated = h
        .lifecycle
        .update_stream(
            &created.stream_id.to_string(),
            StreamPatch {
                title: None,
                description: Some("only the description".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "new title");
}

#[tokio::test]
async fn test_update_stream_reports_running_viewer_count() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;
    let created = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    let id = created.stream_id.to_string();
    h.lifecycle
        .create_view(&alice.id.to_string(), &id)
        .await
        .unwrap();

    let updated = h
        .lifecycle
        .update_stream(
            &id,
            StreamPatch {
                title: Some("new title".into()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert!(updated.live);
    assert_eq!(updated.total_viewers, 1);
    assert_eq!(updated.streamer.username, "Bob");
    assert_eq!(updated, h.lifecycle.get_stream_by_id(&id).await.unwrap());
}

#[tokio::test]
async fn test_update_stream_empty_title_leaves_stream_unmodified() {
    let h = harness();
    let bob = bob(&h).await;
    let created = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    let id = created.stream_id.to_string();

    let err = h
        .lifecycle
        .update_stream(
            &id,
            StreamPatch {
                title: Some(String::new()),
                description: Some("a description".into()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.extra(), Some("title"));

    let stream = h.lifecycle.get_stream_by_id(&id).await.unwrap();
    assert_eq!(stream.title, created.title);
    assert_eq!(stream.description, created.description);
}

#[tokio::test]
async fn test_update_unknown_stream() {
    let h = harness();
    let err = h
        .lifecycle
        .update_stream(&Uuid::new_v4().to_string(), StreamPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_end_stream_freezes_viewer_total() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;
    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    let stream_id = stream.stream_id.to_string();

    h.lifecycle
        .create_view(&bob.id.to_string(), &stream_id)
        .await
        .unwrap();
    h.lifecycle
        .create_view(&alice.id.to_string(), &stream_id)
        .await
        .unwrap();

    // live streams report the running count
    let live = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap();
    assert_eq!(live.total_viewers, 2);

    let outcome = h
        .lifecycle
        .end_stream(&bob.id.to_string(), &stream_id)
        .await
        .unwrap();
    assert_eq!(outcome, EndOutcome::Ended { total_viewers: 2 });

    let ended = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap();
    assert!(!ended.live);
    assert!(ended.ended_at.is_some());
    assert_eq!(ended.total_viewers, 2);

    // later views are recorded but do not move the frozen total
    h.lifecycle
        .create_view(&alice.id.to_string(), &stream_id)
        .await
        .unwrap();
    let ended = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap();
    assert_eq!(ended.total_viewers, 2);
}

#[tokio::test]
async fn test_end_stream_twice_is_a_no_op() {
    let h = harness();
    let bob = bob(&h).await;
    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    let stream_id = stream.stream_id.to_string();

    h.lifecycle
        .end_stream(&bob.id.to_string(), &stream_id)
        .await
        .unwrap();
    let first = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap();

    let outcome = h
        .lifecycle
        .end_stream(&bob.id.to_string(), &stream_id)
        .await
        .unwrap();
    assert_eq!(outcome, EndOutcome::AlreadyEnded);

    let second = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap();
    assert_eq!(first.ended_at, second.ended_at);
}

#[tokio::test]
async fn test_end_unknown_stream() {
    let h = harness();
    let bob = bob(&h).await;

    let err = h
        .lifecycle
        .end_stream(&bob.id.to_string(), &Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Stream not found"));
}

#[tokio::test]
async fn test_end_stream_by_non_owner() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;
    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    let stream_id = stream.stream_id.to_string();

    for caller in [alice.id.to_string(), Uuid::new_v4().to_string(), String::new()] {
        let err = h.lifecycle.end_stream(&caller, &stream_id).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::NotAuthorised(ref m) if m == "Not authorised to end stream")
        );
    }

    let stream = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap();
    assert!(stream.live);
}

#[tokio::test]
async fn test_delete_stream() {
    let h = harness();
    let bob = bob(&h).await;
    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    let stream_id = stream.stream_id.to_string();

    h.lifecycle.delete_stream(&stream_id).await.unwrap();

    let err = h.lifecycle.get_stream_by_id(&stream_id).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
    let err = h.lifecycle.delete_stream(&stream_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Stream not found"));
}

#[tokio::test]
async fn test_create_view_requires_stream_and_user() {
    let h = harness();
    let bob = bob(&h).await;
    let stream = h
        .lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();

    let err = h
        .lifecycle
        .create_view(&bob.id.to_string(), &Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Stream not found"));

    let err = h
        .lifecycle
        .create_view(&Uuid::new_v4().to_string(), &stream.stream_id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));

    // repeated views from the same user are all recorded
    for _ in 0..3 {
        h.lifecycle
            .create_view(&bob.id.to_string(), &stream.stream_id.to_string())
            .await
            .unwrap();
    }
    assert_eq!(h.store.count_views(stream.stream_id).await.unwrap(), 3);
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_streams_empty() {
    let h = harness();
    let streams = h
        .listing
        .get_list_of_streams(filters(StreamState::All, SortKey::Title, SortOrder::Asc), None)
        .await
        .unwrap();
    assert!(streams.is_empty());
}

#[tokio::test]
async fn test_list_streams_by_title() {
    let h = harness();
    seed_three_streams(&h).await;

    let asc = h
        .listing
        .get_list_of_streams(filters(StreamState::All, SortKey::Title, SortOrder::Asc), None)
        .await
        .unwrap();
    assert_eq!(
        titles(&asc),
        vec![
            "Its more recent title from stream service",
            "old stream, ended stream",
            "this is a title from stream service",
        ]
    );
    assert!(asc.iter().all(|s| s.streamer.username == "Bob"));

    let desc = h
        .listing
        .get_list_of_streams(filters(StreamState::All, SortKey::Title, SortOrder::Desc), None)
        .await
        .unwrap();
    let mut reversed = titles(&asc);
    reversed.reverse();
    assert_eq!(titles(&desc), reversed);
}

#[tokio::test]
async fn test_list_live_streams_by_time() {
    let h = harness();
    seed_three_streams(&h).await;

    let asc = h
        .listing
        .get_list_of_streams(filters(StreamState::Live, SortKey::Time, SortOrder::Asc), None)
        .await
        .unwrap();
    assert_eq!(
        titles(&asc),
        vec![
            "this is a title from stream service",
            "Its more recent title from stream service",
        ]
    );
    assert!(asc.iter().all(|s| s.live));

    let desc = h
        .listing
        .get_list_of_streams(filters(StreamState::Live, SortKey::Time, SortOrder::Desc), None)
        .await
        .unwrap();
    assert_eq!(
        titles(&desc),
        vec![
            "Its more recent title from stream service",
            "this is a title from stream service",
        ]
    );
}

#[tokio::test]
async fn test_list_streams_by_state() {
    let h = harness();
    seed_three_streams(&h).await;

    let live = h
        .listing
        .get_list_of_streams(filters(StreamState::Live, SortKey::Title, SortOrder::Asc), None)
        .await
        .unwrap();
    assert_eq!(
        titles(&live),
        vec![
            "Its more recent title from stream service",
            "this is a title from stream service",
        ]
    );

    let done = h
        .listing
        .get_list_of_streams(filters(StreamState::Done, SortKey::Title, SortOrder::Asc), None)
        .await
        .unwrap();
    assert_eq!(titles(&done), vec!["old stream, ended stream"]);
    assert!(done[0].ended_at.is_some());
}

#[tokio::test]
async fn test_list_streams_marks_subscriptions() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;
    let carol = h.store.insert_user("Carol", "Carol").await;
    h.store.insert_subscription(alice.id, bob.id).await;

    h.lifecycle
        .create_stream(&bob.id.to_string(), stream_one())
        .await
        .unwrap();
    h.lifecycle
        .create_stream(&bob.id.to_string(), stream_two())
        .await
        .unwrap();
    h.lifecycle
        .create_stream(&carol.id.to_string(), stream_three())
        .await
        .unwrap();

    let all = filters(StreamState::All, SortKey::Title, SortOrder::Asc);

    let for_alice = h
        .listing
        .get_list_of_streams(all, Some(&alice.id.to_string()))
        .await
        .unwrap();
    assert_eq!(for_alice[0].title, "Its more recent title from stream service");
    assert_eq!(for_alice[0].streamer.username, "Bob");
    assert_eq!(for_alice[0].streamer.is_subscribed, Some(true));
    assert_eq!(for_alice[1].streamer.username, "Carol");
    assert_eq!(for_alice[1].streamer.is_subscribed, Some(false));

    let for_carol = h
        .listing
        .get_list_of_streams(all, Some(&carol.id.to_string()))
        .await
        .unwrap();
    assert!(for_carol
        .iter()
        .filter(|s| s.owner == bob.id)
        .all(|s| s.streamer.is_subscribed == Some(false)));

    let anonymous = h.listing.get_list_of_streams(all, None).await.unwrap();
    assert!(anonymous.iter().all(|s| s.streamer.is_subscribed.is_none()));
}

#[tokio::test]
async fn test_streams_from_subscriptions() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;
    h.store.insert_subscription(bob.id, alice.id).await;

    h.lifecycle
        .create_stream(&alice.id.to_string(), stream_one())
        .await
        .unwrap();
    h.lifecycle
        .create_stream(&alice.id.to_string(), stream_two())
        .await
        .unwrap();
    // not followed by bob
    h.lifecycle
        .create_stream(&bob.id.to_string(), stream_three())
        .await
        .unwrap();

    let feed = h
        .listing
        .get_streams_from_subscriptions(&bob.id.to_string())
        .await
        .unwrap();
    assert_eq!(
        titles(&feed),
        vec![
            "Its more recent title from stream service",
            "this is a title from stream service",
        ]
    );
    assert!(feed.iter().all(|s| s.streamer.username == "Alice"));
    assert!(feed.iter().all(|s| s.streamer.is_subscribed == Some(true)));
}

#[tokio::test]
async fn test_streams_from_subscriptions_empty_cases() {
    let h = harness();
    let bob = bob(&h).await;
    let alice = alice(&h).await;

    // no subscriptions at all
    let feed = h
        .listing
        .get_streams_from_subscriptions(&bob.id.to_string())
        .await
        .unwrap();
    assert!(feed.is_empty());

    // subscribed to someone with no streams
    h.store.insert_subscription(bob.id, alice.id).await;
    let feed = h
        .listing
        .get_streams_from_subscriptions(&bob.id.to_string())
        .await
        .unwrap();
    assert!(feed.is_empty());

    let feed = h.listing.get_streams_from_subscriptions("").await.unwrap();
    assert!(feed.is_empty());
}

// ============================================================================
// Comments
// ============================================================================

async fn alice_with_stream(h: &Harness) -> (User, String) {
    let alice = alice(h).await;
    let stream = h
        .lifecycle
        .create_stream(&alice.id.to_string(), stream_one())
        .await
        .unwrap();
    (alice, stream.stream_id.to_string())
}

#[tokio::test]
async fn test_create_comment() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;

    let created = h
        .comments
        .create_comment(
            &alice.id.to_string(),
            &stream_id,
            comment("How do I live without you", 1457431895000, "mariah"),
        )
        .await
        .unwrap();
    assert_eq!(created.content, "How do I live without you");
    assert_eq!(created.user_id, alice.id);
    assert_eq!(created.stream_id.to_string(), stream_id);
    assert_eq!(created.alias, "mariah");
    assert_eq!(created.created_at.timestamp_millis(), 1457431895000);
}

#[tokio::test]
async fn test_create_comment_defaults_alias_and_time() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;

    let before = Utc::now();
    let created = h
        .comments
        .create_comment(
            &alice.id.to_string(),
            &stream_id,
            NewComment {
                content: "hello".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.alias, "Alice in the wonderland");
    assert!(created.created_at >= before);
}

#[tokio::test]
async fn test_create_comment_blank_content() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;

    for content in ["", "   "] {
        let err = h
            .comments
            .create_comment(
                &alice.id.to_string(),
                &stream_id,
                NewComment {
                    content: content.into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.extra(), Some("content"));
    }
}

#[tokio::test]
async fn test_create_comment_requires_stream_and_user() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;
    let fields = comment("How do I ever", 1457431915000, "darren");

    let err = h
        .comments
        .create_comment(&alice.id.to_string(), &Uuid::new_v4().to_string(), fields.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Stream not found"));

    let err = h
        .comments
        .create_comment(&Uuid::new_v4().to_string(), &stream_id, fields)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));
}

#[tokio::test]
async fn test_create_duplicate_comment_returns_existing() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;
    let fields = comment("How do I live without you", 1457431895000, "mariah");

    let first = h
        .comments
        .create_comment(&alice.id.to_string(), &stream_id, fields.clone())
        .await
        .unwrap();
    let second = h
        .comments
        .create_comment(&alice.id.to_string(), &stream_id, fields)
        .await
        .unwrap();
    assert_eq!(first, second);

    let listed = h
        .comments
        .get_list_of_comments_for_stream(&stream_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_list_comments_oldest_first() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;
    let user_id = alice.id.to_string();

    // submitted out of order
    for fields in [
        comment("How do I breathe without you", 1457431905000, "carey"),
        comment("How do I ever", 1457431915000, "darren"),
        comment("How do I live without you", 1457431895000, "mariah"),
    ] {
        h.comments
            .create_comment(&user_id, &stream_id, fields)
            .await
            .unwrap();
    }

    let listed = h
        .comments
        .get_list_of_comments_for_stream(&stream_id)
        .await
        .unwrap();
    let contents: Vec<_> = listed.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "How do I live without you",
            "How do I breathe without you",
            "How do I ever",
        ]
    );
}

#[tokio::test]
async fn test_list_comments_unknown_stream() {
    let h = harness();
    let err = h
        .comments
        .get_list_of_comments_for_stream(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_delete_stream_removes_comments_and_views() {
    let h = harness();
    let (alice, stream_id) = alice_with_stream(&h).await;
    let user_id = alice.id.to_string();

    h.lifecycle.create_view(&user_id, &stream_id).await.unwrap();
    h.comments
        .create_comment(&user_id, &stream_id, comment("bye", 1457431895000, "a"))
        .await
        .unwrap();

    h.lifecycle.delete_stream(&stream_id).await.unwrap();

    let id = Uuid::parse_str(&stream_id).unwrap();
    assert_eq!(h.store.count_views(id).await.unwrap(), 0);
    assert!(h.store.list_comments(id).await.unwrap().is_empty());
}
