// HTTP-level tests for the Supabase client

use gamematch_deck::models::{ProfileUpdate, EMPTY_CHAT_PLACEHOLDER};
use gamematch_deck::services::{ProfileStore, StoreError, SupabaseClient, SupabaseTables};
use mockito::{Matcher, Server};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn client(server: &Server) -> SupabaseClient {
    SupabaseClient::new(
        server.url(),
        "service-key".to_string(),
        SupabaseTables::default(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn json(body: serde_json::Value) -> String {
    body.to_string()
}

#[tokio::test]
async fn test_fetch_candidates_groups_shared_games() {
    let mut server = Server::new_async().await;

    let own = server
        .mock("GET", "/rest/v1/user_games")
        .match_header("apikey", "service-key")
        .match_header("authorization", "Bearer service-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "game_id".into()),
            Matcher::UrlEncoded("user_id".into(), "eq.me".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([{ "game_id": 1 }, { "game_id": 7 }])))
        .create_async()
        .await;

    let shared = server
        .mock("GET", "/rest/v1/user_games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("game_id".into(), "in.(1,7)".into()),
            Matcher::UrlEncoded("user_id".into(), "neq.me".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([
            {
                "user_id": "u2",
                "game": { "name": "Valorant" },
                "user": { "id": "u2", "username": "sage", "display_name": null, "bio": "duo?", "avatar_url": null }
            },
            {
                "user_id": "u3",
                "game": { "name": "Valorant" },
                "user": { "id": "u3", "username": "omen", "display_name": "Omen", "bio": null, "avatar_url": "https://cdn/omen.png" }
            },
            {
                "user_id": "u2",
                "game": { "name": "Rocket League" },
                "user": { "id": "u2", "username": "sage", "display_name": null, "bio": "duo?", "avatar_url": null }
            },
            {
                "user_id": "u4",
                "game": { "name": "Valorant" },
                "user": { "id": "u4", "username": "jett", "display_name": null, "bio": null, "avatar_url": null }
            }
        ])))
        .create_async()
        .await;

    let candidates = client(&server)
        .fetch_candidates("me", &["u4".to_string()])
        .await
        .unwrap();

    own.assert_async().await;
    shared.assert_async().await;

    let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["u2", "u3"]);
    assert_eq!(candidates[0].display_name, "sage");
    assert_eq!(candidates[0].game_tags.len(), 2);
    assert!(candidates[0].game_tags.contains("Rocket League"));
    assert_eq!(candidates[1].display_name, "Omen");
    assert_eq!(candidates[1].avatar_ref.as_deref(), Some("https://cdn/omen.png"));
}

#[tokio::test]
async fn test_fetch_candidates_without_games_is_empty() {
    let mut server = Server::new_async().await;

    let own = server
        .mock("GET", "/rest/v1/user_games")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let candidates = assert_ok!(client(&server).fetch_candidates("me", &[]).await);
    assert!(candidates.is_empty());
    own.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rest/v1/user_games")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let err = assert_err!(client(&server).fetch_candidates("me", &[]).await);
    assert!(matches!(err, StoreError::ApiError(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_create_match_posts_pending_record() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/rest/v1/matches")
        .match_header("prefer", "return=representation")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "user1_id": "me",
            "user2_id": "u2",
            "status": "pending"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([{
            "id": "m-42",
            "user1_id": "me",
            "user2_id": "u2",
            "status": "pending",
            "matched_at": "2025-03-01T12:00:00Z"
        }])))
        .create_async()
        .await;

    let record = client(&server).create_match("me", "u2").await.unwrap();
    mock.assert_async().await;
    assert_eq!(record.id.as_deref(), Some("m-42"));
    assert_eq!(record.user2_id, "u2");
}

#[tokio::test]
async fn test_duplicate_match_is_rejected_not_retried() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/rest/v1/matches")
        .with_status(409)
        .with_body(r#"{"code":"23505","message":"duplicate key value"}"#)
        .create_async()
        .await;

    let err = assert_err!(client(&server).create_match("me", "u2").await);
    assert!(matches!(err, StoreError::Rejected(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_list_chats_uses_last_message_or_placeholder() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rest/v1/matches")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("or".into(), "(user1_id.eq.me,user2_id.eq.me)".into()),
            Matcher::UrlEncoded("order".into(), "matched_at.desc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([
            {
                "id": "m1",
                "matched_at": "2025-03-02T10:00:00Z",
                "user1_id": "me",
                "user2_id": "u2",
                "user1": { "id": "me", "username": "me", "display_name": null },
                "user2": { "id": "u2", "username": "sage", "display_name": "Sage" }
            },
            {
                "id": "m2",
                "matched_at": "2025-03-01T10:00:00Z",
                "user1_id": "u3",
                "user2_id": "me",
                "user1": { "id": "u3", "username": "omen", "display_name": null },
                "user2": { "id": "me", "username": "me", "display_name": null }
            }
        ])))
        .create_async()
        .await;

    server
        .mock("GET", "/rest/v1/messages")
        .match_query(Matcher::UrlEncoded("match_id".into(), "eq.m1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([
            { "content": "queue up?", "sent_at": "2025-03-02T11:00:00Z" }
        ])))
        .create_async()
        .await;

    server
        .mock("GET", "/rest/v1/messages")
        .match_query(Matcher::UrlEncoded("match_id".into(), "eq.m2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let chats = client(&server).list_chats("me").await.unwrap();

    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].user.id, "u2");
    assert_eq!(chats[0].last_message, "queue up?");
    assert_eq!(chats[1].user.id, "u3");
    assert_eq!(chats[1].last_message, EMPTY_CHAT_PLACEHOLDER);
    assert_eq!(chats[1].sent_at.to_rfc3339(), "2025-03-01T10:00:00+00:00");
}

#[tokio::test]
async fn test_profile_missing_and_update() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rest/v1/users")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.nobody".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let patch = server
        .mock("PATCH", "/rest/v1/users")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.me".into()))
        .match_body(Matcher::Json(serde_json::json!({ "bio": "Support main" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([
            { "id": "me", "username": "me", "bio": "Support main" }
        ])))
        .create_async()
        .await;

    let supabase = client(&server);

    let missing = assert_err!(supabase.get_profile("nobody").await);
    assert!(matches!(missing, StoreError::NotFound(_)));

    let update = ProfileUpdate {
        bio: Some("Support main".to_string()),
        ..Default::default()
    };
    let profile = supabase.update_profile("me", &update).await.unwrap();
    patch.assert_async().await;
    assert_eq!(profile.bio.as_deref(), Some("Support main"));
}

#[tokio::test]
async fn test_invalid_key_maps_to_unauthorized() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rest/v1/users")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"Invalid API key"}"#)
        .create_async()
        .await;

    let err = assert_err!(client(&server).get_profile("me").await);
    assert!(matches!(err, StoreError::Unauthorized));
}

#[tokio::test]
async fn test_list_games_orders_catalog_by_name() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/rest/v1/games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "name.asc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([
            { "id": "g2", "name": "Apex Legends", "genre": "Shooter", "platform": ["PC", "PS5"] },
            { "id": "g1", "name": "Valorant", "genre": null, "platform": null }
        ])))
        .create_async()
        .await;

    let games = assert_ok!(client(&server).list_games().await);
    mock.assert_async().await;
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].name, "Apex Legends");
    assert_eq!(games[0].platform.as_deref(), Some(&["PC".to_string(), "PS5".to_string()][..]));
    assert!(games[1].genre.is_none());
}

#[tokio::test]
async fn test_user_games_embeds_catalog_rows() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/rest/v1/user_games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "game_id,game:games(*)".into()),
            Matcher::UrlEncoded("user_id".into(), "eq.me".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json(serde_json::json!([
            { "game_id": "g1", "game": { "id": "g1", "name": "Valorant" } },
            { "game_id": "g9", "game": null }
        ])))
        .create_async()
        .await;

    let games = assert_ok!(client(&server).user_games("me").await);
    mock.assert_async().await;
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, "g1");
}

#[tokio::test]
async fn test_add_game_posts_library_row() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/rest/v1/user_games")
        .match_header("prefer", "return=minimal")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "user_id": "me",
            "game_id": "g1"
        })))
        .with_status(201)
        .create_async()
        .await;

    assert_ok!(client(&server).add_game("me", "g1").await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_game_twice_is_rejected() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/rest/v1/user_games")
        .with_status(409)
        .with_body(r#"{"code":"23505","message":"duplicate key value"}"#)
        .create_async()
        .await;

    let err = assert_err!(client(&server).add_game("me", "g1").await);
    assert!(matches!(err, StoreError::Rejected(_)));
    assert!(!err.is_transient());
}
