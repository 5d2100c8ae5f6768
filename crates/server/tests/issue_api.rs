#![forbid(unsafe_code)]

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use tissue_server::{AppState, api};
use tissue_storage::{CreateIssueRequest, SqliteStore, TagDraft};

struct Harness {
    _dir: tempfile::TempDir,
    database: std::path::PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = dir.path().join("instance").join("tissue.sqlite");
        SqliteStore::provision(&database).expect("provision");

        let mut store = SqliteStore::open(&database).expect("open");
        let maplestory = || TagDraft::new("project", "name", "Maplestory");
        let issue = |title: &str, description: &str, tags: Vec<TagDraft>| CreateIssueRequest {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            tags,
        };
        store
            .create_issues(vec![
                issue(
                    "Leave Maple Island",
                    "There's a boat in Southperry.",
                    vec![maplestory()],
                ),
                issue("Get to level 8", "I think I'm ready.", vec![maplestory()]),
                issue(
                    "Talk to Olaf",
                    "He can be found in Lith Harbor.",
                    vec![maplestory()],
                ),
                issue(
                    "Travel to Ellinia",
                    "Some old man can teach me some magic.",
                    vec![maplestory(), TagDraft::new("links", "blocked-by", "2")],
                ),
                issue(
                    "Talk to Grendel the Really Old",
                    "Become a magician.",
                    vec![maplestory()],
                ),
                issue("Lonely Issue", "This issue has no tags.", Vec::new()),
            ])
            .expect("fixture issues");

        Self { _dir: dir, database }
    }

    fn state(&self) -> web::Data<AppState> {
        web::Data::new(AppState::new(self.database.clone()))
    }
}

async fn body_json(resp: actix_web::dev::ServiceResponse) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("response should be json")
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.state())
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn get_issue_returns_envelope() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/api/issue/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["errors"], json!([]));
    assert_eq!(json["data"]["id"], json!(1));
    assert_eq!(json["data"]["title"], json!("Leave Maple Island"));
    assert_eq!(json["data"]["tags"][0]["value"], json!("Maplestory"));
}

#[actix_web::test]
async fn get_missing_issue_is_404() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/api/issue/81132329").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["errors"], json!(["issue #81132329 does not exist"]));
    assert_eq!(json["data"], json!({}));

    let req = test::TestRequest::get().uri("/api/issue/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn post_creates_and_get_reads_back() {
    let harness = Harness::new();
    let app = app!(harness);

    let payload = json!({
        "title": "Leave Maple Island",
        "description": "There's a boat.",
        "tags": [{"namespace": "project", "predicate": "name", "value": "Maplestory"}]
    });
    let req = test::TestRequest::post()
        .uri("/api/issue")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let issue = &created["data"][0];
    assert_eq!(issue["id"], json!(7));
    assert_eq!(issue["description"], json!("There's a boat."));

    let req = test::TestRequest::get().uri("/api/issue/7").to_request();
    let fetched = body_json(test::call_service(&app, req).await).await;
    assert_eq!(&fetched["data"], issue);
}

#[actix_web::test]
async fn post_batch_with_duplicate_tags_persists_nothing() {
    let harness = Harness::new();
    let app = app!(harness);

    let payload = json!([
        {"title": "Ok"},
        {
            "title": "Twice tagged",
            "tags": [
                {"namespace": "project", "predicate": "name", "value": "Maplestory"},
                {"namespace": "project", "predicate": "name", "value": "Maplestory"}
            ]
        }
    ]);
    let req = test::TestRequest::post()
        .uri("/api/issue")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["errors"][0], json!("constraint violation"));

    let req = test::TestRequest::get().uri("/api/issue/7").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn post_rejects_invalid_payloads() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/issue")
        .set_json(json!({"description": "no title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(
        json["errors"],
        json!(["invalid json payload", "issue[0]: title is required"])
    );

    let req = test::TestRequest::post()
        .uri("/api/issue")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/issue")
        .set_json(json!({
            "title": "t",
            "tags": [{"namespace": "project", "predicate": "", "value": "x"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["errors"][0], json!("constraint violation"));
}

#[actix_web::test]
async fn put_replaces_and_upserts() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::put()
        .uri("/api/issue")
        .set_json(json!([
            {"id": 4, "title": "Travel to Ellinia"},
            {"id": "900", "title": "Find Grendel", "tags": [
                {"namespace": "project", "predicate": "name", "value": "Maplestory"}
            ]}
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["id"], json!(4));
    assert_eq!(json["data"][0]["description"], json!(""));
    assert_eq!(json["data"][0]["tags"], json!([]));
    assert_eq!(json["data"][1]["id"], json!(7));
    assert_eq!(json["data"][1]["title"], json!("Find Grendel"));
}

#[actix_web::test]
async fn put_requires_id() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::put()
        .uri("/api/issue")
        .set_json(json!({"title": "no id"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn patch_adds_tag_and_keeps_title() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::patch()
        .uri("/api/issue")
        .set_json(json!({
            "id": 6,
            "description": "This issue has one tag.",
            "tags": [{"namespace": "project", "predicate": "name", "value": "Loners"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/issue/6").to_request();
    let json = body_json(test::call_service(&app, req).await).await;
    assert_eq!(json["data"]["title"], json!("Lonely Issue"));
    assert_eq!(json["data"]["description"], json!("This issue has one tag."));
    let tags = json["data"]["tags"].as_array().expect("tags array");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["value"], json!("Loners"));
}

#[actix_web::test]
async fn patch_missing_issue_is_404_and_rolls_back_batch() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::patch()
        .uri("/api/issue")
        .set_json(json!([
            {"id": 1, "title": "Renamed"},
            {"id": 404, "title": "Ghost"}
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["errors"], json!(["issue #404 does not exist"]));

    let req = test::TestRequest::get().uri("/api/issue/1").to_request();
    let json = body_json(test::call_service(&app, req).await).await;
    assert_eq!(json["data"]["title"], json!("Leave Maple Island"));
}

#[actix_web::test]
async fn delete_is_idempotent() {
    let harness = Harness::new();
    let app = app!(harness);

    for _ in 0..2 {
        let req = test::TestRequest::delete().uri("/api/issue/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, json!({"data": {}, "errors": []}));
    }

    let req = test::TestRequest::get().uri("/api/issue/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_database_is_500() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(dir.path().join("absent.sqlite"))))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/issue/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["errors"][0], json!("unexpected server error"));
}

#[actix_web::test]
async fn index_serves_banner_and_unknown_routes_use_envelope() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "tissue -- a tiny issue tracker server");

    let req = test::TestRequest::get().uri("/api/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["errors"], json!(["no route for GET /api/nothing"]));
}

fn batch_payload(count: usize) -> Vec<u8> {
    let issues = (0..count)
        .map(|n| {
            json!({
                "title": format!("Batch issue {n:05}"),
                "description": "Collect 100 snail shells for Sera before leaving the island.",
                "tags": [{"namespace": "project", "predicate": "name", "value": "Maplestory"}]
            })
        })
        .collect::<Vec<_>>();
    serde_json::to_vec(&issues).expect("batch should serialize")
}

#[actix_web::test]
async fn large_batch_under_configured_limit_is_accepted() {
    let harness = Harness::new();
    let app = app!(harness);

    let body = batch_payload(2500);
    assert!(body.len() > 256 * 1024, "body is only {} bytes", body.len());
    let req = test::TestRequest::post()
        .uri("/api/issue")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["errors"], json!([]));
    assert_eq!(json["data"].as_array().map(Vec::len), Some(2500));
}

#[actix_web::test]
async fn body_over_limit_is_rejected_with_envelope() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(
                AppState::new(harness.database.clone()).with_body_limit(1024),
            ))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/issue")
        .insert_header(("content-type", "application/json"))
        .set_payload(batch_payload(50))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(resp).await;
    assert_eq!(json["data"], json!({}));
    assert_eq!(
        json["errors"],
        json!(["payload too large", "request body exceeds 1024 bytes"])
    );

    let req = test::TestRequest::get().uri("/api/issue/7").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn wrong_method_on_known_resource_is_405() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::delete().uri("/api/issue").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = body_json(resp).await;
    assert_eq!(
        json["errors"],
        json!(["method DELETE is not allowed on /api/issue"])
    );

    let req = test::TestRequest::post().uri("/api/issue/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn patch_with_tag_of_another_issue_names_the_tag() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/api/issue/1").to_request();
    let json = body_json(test::call_service(&app, req).await).await;
    let foreign_tag = json["data"]["tags"][0]["id"].as_i64().expect("tag id");

    let req = test::TestRequest::patch()
        .uri("/api/issue")
        .set_json(json!({"id": 2, "tags": [{"id": foreign_tag}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(
        json["errors"],
        json!([format!("tag #{foreign_tag} does not exist on issue #2")])
    );
}
