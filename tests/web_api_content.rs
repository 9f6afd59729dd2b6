//! Content endpoints and the image lifecycle of saved records.

mod common;

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use serde_json::{json, Value};

use common::{exists, file_form, png_bytes, TestApp};

async fn stage(app: &TestApp, cookie: &Cookie<'static>, name: &str) -> String {
    let body: Value = app
        .server
        .post("/api/upload/temp")
        .add_cookie(cookie.clone())
        .multipart(file_form(name, "image/png", png_bytes()))
        .await
        .json();
    body["url"].as_str().unwrap().to_string()
}

async fn create_ctf(app: &TestApp, cookie: &Cookie<'static>, slug: &str, banner: &str) -> Value {
    let response = app
        .server
        .post("/api/admin/ctfs")
        .add_cookie(cookie.clone())
        .json(&json!({
            "slug": slug,
            "name": "Event",
            "description": "An event",
            "bannerUrl": banner
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

fn file_of(url: &str) -> &str {
    url.strip_prefix("/uploads/").unwrap()
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = TestApp::new();

    let response = app.server.get("/api/admin/ctfs").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/admin/members")
        .json(&json!({ "name": "x", "role": "y" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app.server.post("/api/cleanup").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Public reads stay open.
    app.server.get("/api/ctfs").await.assert_status_ok();
    app.server.get("/api/members").await.assert_status_ok();
}

#[tokio::test]
async fn test_staged_banner_is_finalized_on_save() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let staged_url = stage(&app, &cookie, "banner.png").await;
    assert!(staged_url.starts_with("/uploads/temp/"));

    let ctf = create_ctf(&app, &cookie, "spring-ctf", &staged_url).await;
    let banner = ctf["bannerUrl"].as_str().unwrap();
    assert!(banner.starts_with("/uploads/"));
    assert!(!banner.starts_with("/uploads/temp/"));
    assert!(exists(app.uploads_dir().join(file_of(banner))));
    assert_eq!(std::fs::read_dir(app.temp_dir()).unwrap().count(), 0);

    // Public detail by slug.
    let response = app.server.get("/api/ctfs/spring-ctf").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ctf"]["bannerUrl"], banner);
    assert_eq!(body["data"]["challenges"], json!([]));
}

#[tokio::test]
async fn test_replacing_and_deleting_images() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let first = stage(&app, &cookie, "first.png").await;
    let ctf = create_ctf(&app, &cookie, "replace-me", &first).await;
    let id = ctf["id"].as_str().unwrap().to_string();
    let first_file = file_of(ctf["bannerUrl"].as_str().unwrap()).to_string();

    // Saving with the same reference touches nothing.
    let response = app
        .server
        .put(&format!("/api/admin/ctfs/{id}"))
        .add_cookie(cookie.clone())
        .json(&json!({
            "slug": "replace-me",
            "name": "Renamed",
            "description": "An event",
            "bannerUrl": ctf["bannerUrl"]
        }))
        .await;
    response.assert_status_ok();
    assert!(exists(app.uploads_dir().join(&first_file)));

    // A new staged image replaces the old permanent file.
    let second = stage(&app, &cookie, "second.png").await;
    let response = app
        .server
        .put(&format!("/api/admin/ctfs/{id}"))
        .add_cookie(cookie.clone())
        .json(&json!({
            "slug": "replace-me",
            "name": "Renamed",
            "description": "An event",
            "bannerUrl": second
        }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    let second_file = file_of(updated["data"]["bannerUrl"].as_str().unwrap()).to_string();
    assert_ne!(first_file, second_file);
    assert!(!exists(app.uploads_dir().join(&first_file)));
    assert!(exists(app.uploads_dir().join(&second_file)));

    // Deleting the record deletes its image.
    let response = app
        .server
        .delete(&format!("/api/admin/ctfs/{id}"))
        .add_cookie(cookie)
        .await;
    response.assert_status_ok();
    assert!(!exists(app.uploads_dir().join(&second_file)));
    assert_eq!(
        app.server.get("/api/ctfs/replace-me").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_expired_staged_reference_is_rejected() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .server
        .post("/api/admin/ctfs")
        .add_cookie(cookie)
        .json(&json!({
            "slug": "late",
            "name": "Late",
            "description": "d",
            "bannerUrl": "/uploads/temp/temp_1000.png"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Uploaded image has expired, please upload it again."
    );
    assert_eq!(
        app.server.get("/api/ctfs").await.json::<Value>()["data"],
        json!([])
    );
}

#[tokio::test]
async fn test_ctf_validation_and_slug_conflict() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .server
        .post("/api/admin/ctfs")
        .add_cookie(cookie.clone())
        .json(&json!({
            "slug": "Bad Slug",
            "name": "",
            "description": "d",
            "bannerUrl": "not a url"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"]["slug"].is_array());
    assert_eq!(body["details"]["name"][0], "Name is required.");
    assert!(body["details"]["banner_url"].is_array());

    create_ctf(&app, &cookie, "taken", "").await;
    let response = app
        .server
        .post("/api/admin/ctfs")
        .add_cookie(cookie)
        .json(&json!({ "slug": "taken", "name": "Again", "description": "d" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_challenges_crud_and_search() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let ctf = create_ctf(&app, &cookie, "winter", "").await;
    let ctf_id = ctf["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/api/admin/challenges")
        .add_cookie(cookie.clone())
        .json(&json!({
            "ctfId": "missing",
            "title": "Ghost",
            "category": "Web",
            "description": "d",
            "writeup": "w"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let image = stage(&app, &cookie, "diagram.png").await;
    let response = app
        .server
        .post("/api/admin/challenges")
        .add_cookie(cookie.clone())
        .json(&json!({
            "ctfId": ctf_id,
            "title": "Baby RSA",
            "category": "Crypto",
            "description": "small primes",
            "writeup": "# Solve\nfactor n",
            "imageUrl": image
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let challenge: Value = response.json::<Value>()["data"].clone();
    let image_url = challenge["imageUrl"].as_str().unwrap().to_string();
    assert!(!image_url.starts_with("/uploads/temp/"));

    app.server
        .post("/api/admin/challenges")
        .add_cookie(cookie.clone())
        .json(&json!({
            "ctfId": ctf_id,
            "title": "XSS Playground",
            "category": "Web",
            "description": "d",
            "writeup": "w"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/api/admin/challenges")
        .add_cookie(cookie.clone())
        .add_query_param("q", "rsa")
        .add_query_param("category", "Crypto,OSINT")
        .await;
    response.assert_status_ok();
    let found = response.json::<Value>()["data"].clone();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Baby RSA");

    let response = app
        .server
        .get("/api/admin/challenges")
        .add_cookie(cookie.clone())
        .add_query_param("category", "Forensics")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let public: Value = app
        .server
        .get("/api/challenges")
        .add_query_param("ctf", &ctf_id)
        .await
        .json();
    assert_eq!(public["data"].as_array().unwrap().len(), 2);

    let id = challenge["id"].as_str().unwrap();
    let response = app.server.get(&format!("/api/challenges/{id}")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["writeup"], "# Solve\nfactor n");

    // Deleting the CTF cascades to its challenges and their images.
    app.server
        .delete(&format!("/api/admin/ctfs/{ctf_id}"))
        .add_cookie(cookie)
        .await
        .assert_status_ok();
    assert!(!exists(app.uploads_dir().join(file_of(&image_url))));
    let public: Value = app.server.get("/api/challenges").await.json();
    assert_eq!(public["data"], json!([]));
}

#[tokio::test]
async fn test_members_placeholder_avatar_and_delete() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .server
        .post("/api/admin/members")
        .add_cookie(cookie.clone())
        .json(&json!({
            "name": "n0p",
            "role": "Pwn",
            "social": { "github": "n0p" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let member = response.json::<Value>()["data"].clone();
    assert_eq!(member["avatarUrl"], "/placeholder-avatar.svg");
    assert_eq!(member["social"]["github"], "n0p");
    assert_eq!(member["social"]["twitter"], "");

    let avatar = stage(&app, &cookie, "me.png").await;
    let id = member["id"].as_str().unwrap();
    let response = app
        .server
        .put(&format!("/api/admin/members/{id}"))
        .add_cookie(cookie.clone())
        .json(&json!({ "name": "n0p", "role": "Pwn", "avatarUrl": avatar }))
        .await;
    response.assert_status_ok();
    let avatar_url = response.json::<Value>()["data"]["avatarUrl"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(exists(app.uploads_dir().join(file_of(&avatar_url))));

    app.server
        .delete(&format!("/api/admin/members/{id}"))
        .add_cookie(cookie.clone())
        .await
        .assert_status_ok();
    assert!(!exists(app.uploads_dir().join(file_of(&avatar_url))));

    let response = app
        .server
        .delete(&format!("/api/admin/members/{id}"))
        .add_cookie(cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_orphan_cleanup_endpoint() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .server
        .post("/api/cleanup")
        .add_cookie(cookie)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 0);
}
