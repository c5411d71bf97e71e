use clubhub::db::Store;
use clubhub::services::{
    ClubError, ClubPatch, ClubService, CreateClubRequest, CreateOutcome, CreateUserRequest,
    SeaOrmClubService, SeaOrmTagService, SeaOrmUserService, TagService, UserService,
};

// A single connection keeps the in-memory database alive and shared
// across every query in a test.
async fn test_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to create in-memory store")
}

fn club_request(code: &str, name: &str, tags: &[&str]) -> CreateClubRequest {
    CreateClubRequest {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        tags: tags.iter().map(ToString::to_string).collect(),
    }
}

async fn create_admin(store: &Store, username: &str) {
    let users = SeaOrmUserService::new(store.clone());
    users
        .create_user(CreateUserRequest {
            username: username.to_string(),
            display_name: None,
            email: None,
            admin: true,
        })
        .await
        .expect("Failed to create admin user");
}

#[tokio::test]
async fn created_clubs_round_trip_with_normalized_fields() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());

    let outcome = clubs
        .create_club(CreateClubRequest {
            code: "  PennLabs ".to_string(),
            name: "  Penn Labs  ".to_string(),
            description: Some("Builds software".to_string()),
            tags: vec!["tech".to_string(), " pre professional ".to_string()],
        })
        .await
        .unwrap();

    assert!(outcome.was_created());
    let details = outcome.into_inner();
    assert_eq!(details.code, "pennlabs");
    assert_eq!(details.name, "Penn Labs");
    assert_eq!(details.description.as_deref(), Some("Builds software"));
    assert_eq!(details.tags, vec!["Tech", "Pre Professional"]);
    assert_eq!(details.favorite_count, 0);

    let listed = clubs.list_clubs().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].code, "pennlabs");
}

#[tokio::test]
async fn duplicate_code_never_creates_a_second_row() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &[]))
        .await
        .unwrap();

    // Case/whitespace variants of the code collide with the original.
    let outcome = clubs
        .create_club(club_request(" PENNLABS ", "Imposter Labs", &[]))
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::AlreadyExists(_)));
    let existing = outcome.into_inner();
    assert_eq!(existing.name, "Penn Labs");

    assert_eq!(clubs.list_clubs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn tag_variants_deduplicate_to_one_canonical_tag() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    let tags = SeaOrmTagService::new(store.clone());

    clubs
        .create_club(club_request("one", "Club One", &["music"]))
        .await
        .unwrap();
    clubs
        .create_club(club_request("two", "Club Two", &[" Music "]))
        .await
        .unwrap();

    let listed = tags.list_tags().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Music");
    assert_eq!(listed[0].club_count, 2);
}

#[tokio::test]
async fn blank_tags_are_dropped_from_creation() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());

    let details = clubs
        .create_club(club_request("arty", "Arts Club", &["arts", "  ", ""]))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(details.tags, vec!["Arts"]);
}

#[tokio::test]
async fn missing_code_or_name_is_a_validation_error() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());

    let err = clubs
        .create_club(club_request("   ", "Nameless", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::Validation(_)));

    let err = clubs
        .create_club(club_request("code", "   ", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::Validation(_)));
}

#[tokio::test]
async fn club_code_is_immutable() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    create_admin(&store, "admin1").await;

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &[]))
        .await
        .unwrap();

    let err = clubs
        .update_club(
            "pennlabs",
            Some("admin1"),
            ClubPatch {
                code: Some("newcode".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::ImmutableCode));

    // Stored code untouched after the failed attempt.
    let listed = clubs.list_clubs().await.unwrap();
    assert_eq!(listed[0].code, "pennlabs");

    // Supplying the same code (any case) is a harmless no-op.
    clubs
        .update_club(
            "pennlabs",
            Some("admin1"),
            ClubPatch {
                code: Some(" PennLabs ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_description_leaves_name_and_tags_alone() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    create_admin(&store, "admin1").await;

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &["tech"]))
        .await
        .unwrap();

    let updated = clubs
        .update_club(
            "pennlabs",
            Some("admin1"),
            ClubPatch {
                description: Some(Some("New description".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Penn Labs");
    assert_eq!(updated.tags, vec!["Tech"]);
    assert_eq!(updated.description.as_deref(), Some("New description"));

    // Present-but-null clears the description.
    let cleared = clubs
        .update_club(
            "pennlabs",
            Some("admin1"),
            ClubPatch {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[tokio::test]
async fn blank_name_in_patch_keeps_the_old_value() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    create_admin(&store, "admin1").await;

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &[]))
        .await
        .unwrap();

    let updated = clubs
        .update_club(
            "pennlabs",
            Some("admin1"),
            ClubPatch {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Penn Labs");
}

#[tokio::test]
async fn updating_tags_replaces_the_whole_set() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    let tags = SeaOrmTagService::new(store.clone());
    create_admin(&store, "admin1").await;

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &["a", "b"]))
        .await
        .unwrap();

    let updated = clubs
        .update_club(
            "pennlabs",
            Some("admin1"),
            ClubPatch {
                tags: Some(vec!["c".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.tags, vec!["C"]);

    // Counts are live: A and B now link zero clubs.
    let listed = tags.list_tags().await.unwrap();
    let count_of = |name: &str| {
        listed
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.club_count)
            .unwrap()
    };
    assert_eq!(count_of("A"), 0);
    assert_eq!(count_of("B"), 0);
    assert_eq!(count_of("C"), 1);
}

#[tokio::test]
async fn favorite_distinguishes_missing_club_and_missing_user() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    let users = SeaOrmUserService::new(store.clone());

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &[]))
        .await
        .unwrap();
    users
        .create_user(CreateUserRequest {
            username: "josh".to_string(),
            display_name: Some("Josh".to_string()),
            email: None,
            admin: false,
        })
        .await
        .unwrap();

    let err = clubs.favorite_club("ghost", "josh").await.unwrap_err();
    assert!(matches!(err, ClubError::ClubNotFound(_)));

    let err = clubs.favorite_club("pennlabs", "ghost").await.unwrap_err();
    assert!(matches!(err, ClubError::UserNotFound(_)));

    // Neither failed call left a favorite behind.
    let listed = clubs.list_clubs().await.unwrap();
    assert_eq!(listed[0].favorite_count, 0);
}

#[tokio::test]
async fn repeated_favorites_accumulate() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    let users = SeaOrmUserService::new(store.clone());

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &[]))
        .await
        .unwrap();
    users
        .create_user(CreateUserRequest {
            username: "josh".to_string(),
            display_name: None,
            email: None,
            admin: false,
        })
        .await
        .unwrap();

    let first = clubs.favorite_club("pennlabs", "josh").await.unwrap();
    assert_eq!(first.favorite_count, 1);

    // No idempotence: the same user favoriting again adds a row.
    let second = clubs.favorite_club("pennlabs", "josh").await.unwrap();
    assert_eq!(second.favorite_count, 2);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());

    clubs
        .create_club(club_request("engsoc", "Engineering Society", &[]))
        .await
        .unwrap();
    clubs
        .create_club(club_request("peng", "Penn ENG Club", &[]))
        .await
        .unwrap();
    clubs
        .create_club(club_request("chess", "Chess Club", &[]))
        .await
        .unwrap();

    let hits = clubs.search_clubs("eng").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].name, "Engineering Society");
    assert_eq!(hits[1].name, "Penn ENG Club");

    let misses = clubs.search_clubs("robotics").await.unwrap();
    assert!(misses.is_empty());

    let err = clubs.search_clubs("   ").await.unwrap_err();
    assert!(matches!(err, ClubError::Validation(_)));
}

#[tokio::test]
async fn search_treats_like_metacharacters_literally() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());

    clubs
        .create_club(club_request("pct", "100% Committed", &[]))
        .await
        .unwrap();
    clubs
        .create_club(club_request("thousand", "1000 Strong", &[]))
        .await
        .unwrap();

    // '%' matches itself, not everything.
    let hits = clubs.search_clubs("100%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% Committed");

    // '_' is a literal underscore, not a single-character wildcard.
    let hits = clubs.search_clubs("C_mmitted").await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn update_requires_a_known_admin() {
    let store = test_store().await;
    let clubs = SeaOrmClubService::new(store.clone());
    let users = SeaOrmUserService::new(store.clone());

    clubs
        .create_club(club_request("pennlabs", "Penn Labs", &[]))
        .await
        .unwrap();
    users
        .create_user(CreateUserRequest {
            username: "josh".to_string(),
            display_name: Some("Josh".to_string()),
            email: None,
            admin: false,
        })
        .await
        .unwrap();

    let patch = ClubPatch {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };

    let err = clubs
        .update_club("pennlabs", None, patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::Unauthorized));

    let err = clubs
        .update_club("pennlabs", Some("nobody"), patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::Unauthorized));

    let err = clubs
        .update_club("pennlabs", Some("josh"), patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::Forbidden));

    create_admin(&store, "admin1").await;
    let updated = clubs
        .update_club("pennlabs", Some("admin1"), patch)
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");
}

#[tokio::test]
async fn create_user_reports_already_exists() {
    let store = test_store().await;
    let users = SeaOrmUserService::new(store.clone());

    let request = CreateUserRequest {
        username: "josh".to_string(),
        display_name: Some("Josh".to_string()),
        email: Some("josh@seas.upenn.edu".to_string()),
        admin: false,
    };

    let first = users.create_user(request.clone()).await.unwrap();
    assert!(first.was_created());

    let second = users.create_user(request).await.unwrap();
    assert!(matches!(second, CreateOutcome::AlreadyExists(_)));

    let profile = users.get_profile("josh").await.unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Josh"));
    assert!(!profile.created.is_empty());
}
