mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_empty_note_list_is_bad_request() {
    let app = spawn_app().await;

    let (status, body) = app.get("/notes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No notes found");
}

#[tokio::test]
async fn test_create_and_list_notes_with_owner() {
    let app = spawn_app().await;
    let owner = app.create_user("ivan").await;

    let (status, body) = app
        .json(
            "POST",
            "/notes",
            json!({ "user": owner, "title": "Broken screen", "text": "Replace LCD", "client": "Globex" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New note Broken screen created");

    let (status, body) = app.get("/notes").await;
    assert_eq!(status, StatusCode::OK);

    let notes = body.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Broken screen");
    assert_eq!(notes[0]["user"], owner);
    assert_eq!(notes[0]["username"], "ivan");
    assert_eq!(notes[0]["completed"], false);
    assert!(notes[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_note_validation() {
    let app = spawn_app().await;
    let owner = app.create_user("judy").await;

    let (status, _) = app
        .json(
            "POST",
            "/notes",
            json!({ "user": owner, "title": "Existing", "text": "t", "client": "c" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .json("POST", "/notes", json!({ "user": owner, "title": "No text" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, body) = app
        .json(
            "POST",
            "/notes",
            json!({ "user": 4242, "title": "Orphan", "text": "t", "client": "c" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid note data received");

    let (_, notes) = app.get("/notes").await;
    let notes = notes.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Existing");
}

#[tokio::test]
async fn test_duplicate_title_ignores_case() {
    let app = spawn_app().await;
    let owner = app.create_user("mallory").await;

    let note = json!({ "user": owner, "title": "Laptop", "text": "t", "client": "c" });
    let (status, _) = app.json("POST", "/notes", note).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .json(
            "POST",
            "/notes",
            json!({ "user": owner, "title": "LAPTOP", "text": "t", "client": "c" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate note title");
}

#[tokio::test]
async fn test_update_note() {
    let app = spawn_app().await;
    let owner = app.create_user("niaj").await;
    let other = app.create_user("olivia").await;

    for title in ["Router", "Modem"] {
        let (status, _) = app
            .json(
                "POST",
                "/notes",
                json!({ "user": owner, "title": title, "text": "t", "client": "c" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, notes) = app.get("/notes").await;
    let router_id = notes
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["title"] == "Router")
        .and_then(|n| n["id"].as_i64())
        .unwrap();

    // Keeping the same title is not a duplicate.
    let (status, body) = app
        .json(
            "PATCH",
            "/notes",
            json!({
                "id": router_id,
                "user": other,
                "title": "Router",
                "text": "Firmware flashed",
                "client": "c",
                "completed": true,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("'Router' updated"));

    let (_, notes) = app.get("/notes").await;
    let updated = notes
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == router_id)
        .unwrap();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["username"], "olivia");
    assert_eq!(updated["text"], "Firmware flashed");

    let (status, body) = app
        .json(
            "PATCH",
            "/notes",
            json!({
                "id": router_id,
                "user": other,
                "title": "modem",
                "text": "t",
                "client": "c",
                "completed": false,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate note title");

    let (status, body) = app
        .json(
            "PATCH",
            "/notes",
            json!({ "id": router_id, "user": other, "title": "Router", "text": "t", "client": "c" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, body) = app
        .json(
            "PATCH",
            "/notes",
            json!({
                "id": 9999,
                "user": other,
                "title": "Ghost",
                "text": "t",
                "client": "c",
                "completed": false,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Note not found");
}

#[tokio::test]
async fn test_delete_note_then_owner() {
    let app = spawn_app().await;
    let owner = app.create_user("peggy").await;

    let (status, _) = app
        .json(
            "POST",
            "/notes",
            json!({ "user": owner, "title": "Keyboard", "text": "t", "client": "c" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, notes) = app.get("/notes").await;
    let note_id = notes[0]["id"].as_i64().unwrap();

    let (status, body) = app.json("DELETE", "/notes", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Note ID required");

    let (status, body) = app.json("DELETE", "/notes", json!({ "id": note_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!(format!("Note 'Keyboard' with ID {note_id} deleted"))
    );

    let (status, body) = app.json("DELETE", "/notes", json!({ "id": note_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Note not found");

    let (status, _) = app.json("DELETE", "/users", json!({ "id": owner })).await;
    assert_eq!(status, StatusCode::OK);
}
