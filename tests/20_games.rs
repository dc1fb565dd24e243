mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn create_game_returns_id() {
    let app = TestApp::new();
    let (status, body) = app
        .admin(
            Method::POST,
            "/games/create",
            Some(json!({"title": "This is a test game", "rating": 8, "completed": false})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["game_id"].is_i64());
}

#[tokio::test]
async fn created_game_appears_in_list() {
    let app = TestApp::new();
    app.seed_games(2).await;

    let (_, created) = app
        .admin(
            Method::POST,
            "/games/create",
            Some(json!({"title": "Hollow Knight", "rating": 9, "completed": true})),
        )
        .await;
    let game_id = created["game_id"].clone();

    let (status, body) = app.admin(Method::GET, "/games", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let games = body["games"].as_array().unwrap();
    assert_eq!(games.len(), 3);
    let game = games.iter().find(|g| g["id"] == game_id).unwrap();
    assert_eq!(
        game,
        &json!({"id": game_id, "title": "Hollow Knight", "rating": 9, "completed": true})
    );

    let ids: Vec<_> = games.iter().map(|g| g["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn padded_title_is_stored_verbatim() {
    let app = TestApp::new();
    let title = "  Zelda: Breath of the Wild ";

    let (status, created) = app
        .admin(
            Method::POST,
            "/games/create",
            Some(json!({"title": title, "rating": 10, "completed": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.admin(Method::GET, "/games", None).await;
    let game = body["games"]
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["id"] == created["game_id"])
        .unwrap()
        .clone();
    assert_eq!(game["title"], title);

    let (_, body) = app
        .admin(Method::PATCH, &format!("/games/{}", created["game_id"]), Some(json!({"new_rating": 9})))
        .await;
    assert_eq!(body["title"], title);
}

#[tokio::test]
async fn empty_catalogue_lists_nothing() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::GET, "/games", Some(&app.read_only_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "games": []}));
}

#[tokio::test]
async fn malformed_game_payloads_are_bad_requests() {
    let app = TestApp::new();

    let payloads = [
        json!({"title": "bad title", "rating": "NaN", "completed": false}),
        json!({"title": "bad title", "rating": "8", "completed": false}),
        json!({"title": "bad title", "rating": 8.5, "completed": false}),
        json!({"title": "bad title", "rating": 8, "completed": "no"}),
        json!({"title": "bad title", "rating": 8}),
        json!({"rating": 8, "completed": false}),
        json!({"title": null, "rating": 8, "completed": false}),
        json!({"title": "   ", "rating": 8, "completed": false}),
        json!({"title": 42, "rating": 8, "completed": false}),
        json!({"title": "bad title", "rating": 10_000_000_000i64, "completed": false}),
        json!(["not", "an", "object"]),
    ];

    for payload in payloads {
        let (status, body) = app
            .admin(Method::POST, "/games/create", Some(payload.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(
            body,
            json!({"success": false, "error": 400, "message": "bad request"}),
            "payload {}",
            payload
        );
    }

    assert_eq!(app.game_count().await, 0);
}

#[tokio::test]
async fn unparseable_body_is_bad_request() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/games/create")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.admin_token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "bad request");

    let (status, _) = app.admin(Method::POST, "/games/create", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn body_is_parsed_regardless_of_content_type() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/games/create")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.admin_token))
        .body(Body::from(
            json!({"title": "Outer Wilds", "rating": 10, "completed": true}).to_string(),
        ))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_id"], 1);
}

#[tokio::test]
async fn get_single_game() {
    let app = TestApp::new();
    app.seed_games(3).await;

    let (status, body) = app.admin(Method::GET, "/games/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "game": {"id": 2, "title": "Seed game 2", "rating": 5, "completed": true}
        })
    );

    let (status, body) = app.admin(Method::GET, "/games/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn patch_updates_rating_and_completed() {
    let app = TestApp::new();
    app.seed_games(1).await;

    let (status, body) = app
        .admin(
            Method::PATCH,
            "/games/1",
            Some(json!({"new_rating": 9, "completed": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "title": "Seed game 1"}));

    let (_, body) = app.admin(Method::GET, "/games/1", None).await;
    assert_eq!(body["game"]["rating"], 9);
    assert_eq!(body["game"]["completed"], true);
}

#[tokio::test]
async fn patch_leaves_absent_fields_alone() {
    let app = TestApp::new();
    app.seed_games(1).await;

    let (status, _) = app
        .admin(Method::PATCH, "/games/1", Some(json!({"completed": true})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.admin(Method::GET, "/games/1", None).await;
    assert_eq!(body["game"]["rating"], 5);
    assert_eq!(body["game"]["completed"], true);

    // Empty patch is a no-op that still reports the title
    let (status, body) = app.admin(Method::PATCH, "/games/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Seed game 1");
}

#[tokio::test]
async fn patch_rejects_bad_types_without_mutation() {
    let app = TestApp::new();
    app.seed_games(1).await;

    let (status, body) = app
        .admin(Method::PATCH, "/games/1", Some(json!({"new_rating": "ten"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "bad request");

    let (_, body) = app.admin(Method::GET, "/games/1", None).await;
    assert_eq!(body["game"]["rating"], 5);
}

#[tokio::test]
async fn patch_missing_game_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .admin(Method::PATCH, "/games/1000", Some(json!({"new_rating": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "error": 404, "message": "resource not found"})
    );

    let (status, _) = app.admin(Method::PATCH, "/games/1000", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_is_ok_then_not_found() {
    let app = TestApp::new();
    app.seed_games(3).await;

    let (status, body) = app.admin(Method::DELETE, "/games/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "game_id": 2}));

    let (status, body) = app.admin(Method::DELETE, "/games/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");

    assert_eq!(app.game_count().await, 2);
}

#[tokio::test]
async fn out_of_range_id_is_not_found() {
    let app = TestApp::new();
    app.seed_games(1).await;

    let (status, body) = app.admin(Method::DELETE, "/games/10000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");

    let (status, _) = app.admin(Method::GET, "/games/10000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.admin(Method::DELETE, "/games/not-a-number", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.game_count().await, 1);
}
