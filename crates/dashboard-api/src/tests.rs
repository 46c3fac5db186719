use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use dashboard_core::event::Event;
use dashboard_engine::fakes::RecordingSink;
use dashboard_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AppState, BASE_PATH, api_router,
  fakes::{FakeCountries, FakeCurrency, FakeWeather, Fakes},
};

struct TestApp {
  router: Router,
  sink:   Arc<RecordingSink>,
}

impl TestApp {
  async fn new() -> Self { Self::with(false, false).await }

  async fn with(countries_down: bool, weather_down: bool) -> Self {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::<Fakes>::new(
      store,
      Arc::new(FakeCountries { down: countries_down }),
      Arc::new(FakeWeather { down: weather_down }),
      Arc::new(FakeCurrency),
      sink.clone(),
    );
    Self { router: api_router(state), sink }
  }

  async fn send(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
      .method(method)
      .uri(format!("{BASE_PATH}{path}"));
    let req = match body {
      Some(body) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();

    let resp = self.router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  /// Register Norway with `features` and return the new id.
  async fn register_norway(&self, features: Value) -> String {
    let (status, body) = self
      .send(
        Method::POST,
        "/registrations",
        Some(json!({ "country": "Norway", "isoCode": "NO", "features": features })),
      )
      .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_owned()
  }
}

// ── Registrations ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_id_and_emits_one_register() {
  let app = TestApp::new().await;
  let (status, body) = app
    .send(
      Method::POST,
      "/registrations",
      Some(json!({ "country": "Norway", "isoCode": "no", "features": { "capital": true } })),
    )
    .await;

  assert_eq!(status, StatusCode::CREATED);
  assert!(body["id"].is_string());
  assert!(body["lastChange"].is_string());
  assert_eq!(app.sink.take(), vec![(Event::Register, "NO".to_string())]);

  let id = body["id"].as_str().unwrap();
  let (status, stored) = app.send(Method::GET, &format!("/registrations/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stored["isoCode"], "NO");
  assert_eq!(stored["features"]["capital"], true);
  assert_eq!(stored["features"]["area"], false);
}

#[tokio::test]
async fn create_with_mismatched_iso_code_is_rejected() {
  let app = TestApp::new().await;
  let (status, body) = app
    .send(
      Method::POST,
      "/registrations",
      Some(json!({ "country": "Norway", "isoCode": "SE" })),
    )
    .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("expected 'NO'"));
  assert!(app.sink.take().is_empty());

  let (_, list) = app.send(Method::GET, "/registrations", None).await;
  assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_requires_country_and_iso_code() {
  let app = TestApp::new().await;
  for body in [json!({ "country": "Norway" }), json!({ "isoCode": "NO" })] {
    let (status, _) = app.send(Method::POST, "/registrations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}

#[tokio::test]
async fn create_with_unknown_country_is_a_bad_request() {
  let app = TestApp::new().await;
  let (status, _) = app
    .send(
      Method::POST,
      "/registrations",
      Some(json!({ "country": "Atlantis", "isoCode": "AT" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_while_country_provider_is_down_is_a_bad_gateway() {
  let app = TestApp::with(true, false).await;
  let (status, _) = app
    .send(
      Method::POST,
      "/registrations",
      Some(json!({ "country": "Norway", "isoCode": "NO" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unknown_registration_is_not_found() {
  let app = TestApp::new().await;
  let path = format!("/registrations/{}", Uuid::new_v4());
  let (status, body) = app.send(Method::GET, &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_changes_country_and_code_together() {
  let app = TestApp::new().await;
  let id = app.register_norway(json!({})).await;
  app.sink.take();

  let (status, body) = app
    .send(
      Method::PUT,
      &format!("/registrations/{id}"),
      Some(json!({ "country": "Sweden", "isoCode": "SE" })),
    )
    .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["country"], "Sweden");
  assert_eq!(body["isoCode"], "SE");
  assert_eq!(app.sink.take(), vec![(Event::Change, "SE".to_string())]);
}

#[tokio::test]
async fn update_of_iso_code_alone_is_checked_against_stored_country() {
  let app = TestApp::new().await;
  let id = app.register_norway(json!({})).await;

  let (status, _) = app
    .send(
      Method::PUT,
      &format!("/registrations/{id}"),
      Some(json!({ "isoCode": "SE" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, stored) = app.send(Method::GET, &format!("/registrations/{id}"), None).await;
  assert_eq!(stored["isoCode"], "NO");
}

#[tokio::test]
async fn update_of_country_without_iso_code_is_rejected() {
  let app = TestApp::new().await;
  let id = app.register_norway(json!({})).await;

  let (status, _) = app
    .send(
      Method::PUT,
      &format!("/registrations/{id}"),
      Some(json!({ "country": "Sweden" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_of_features_keeps_unmentioned_flags() {
  let app = TestApp::new().await;
  let id = app
    .register_norway(json!({ "capital": true, "targetCurrencies": ["EUR"] }))
    .await;

  let (status, body) = app
    .send(
      Method::PUT,
      &format!("/registrations/{id}"),
      Some(json!({ "features": { "area": true, "targetCurrencies": [" usd ", "eur"] } })),
    )
    .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["features"]["capital"], true);
  assert_eq!(body["features"]["area"], true);
  assert_eq!(body["features"]["targetCurrencies"], json!(["EUR", "USD"]));
}

#[tokio::test]
async fn update_of_unknown_registration_is_not_found() {
  let app = TestApp::new().await;
  let (status, _) = app
    .send(
      Method::PUT,
      &format!("/registrations/{}", Uuid::new_v4()),
      Some(json!({ "features": { "area": true } })),
    )
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_twice_is_204_then_404() {
  let app = TestApp::new().await;
  let id = app.register_norway(json!({})).await;
  app.sink.take();
  let path = format!("/registrations/{id}");

  let (first, _) = app.send(Method::DELETE, &path, None).await;
  let (second, _) = app.send(Method::DELETE, &path, None).await;

  assert_eq!(first, StatusCode::NO_CONTENT);
  assert_eq!(second, StatusCode::NOT_FOUND);
  assert_eq!(app.sink.take(), vec![(Event::Delete, "NO".to_string())]);
}

// ── Dashboards ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_carries_only_flagged_features() {
  let app = TestApp::new().await;
  let id = app
    .register_norway(json!({
      "temperature": true,
      "capital": true,
      "targetCurrencies": ["EUR", "JPY"]
    }))
    .await;
  app.sink.take();

  let (status, body) = app.send(Method::GET, &format!("/dashboards/{id}"), None).await;

  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["country"], "Norway");
  assert_eq!(body["isoCode"], "NO");
  assert!(body["retrievedAt"].is_string());
  assert_eq!(
    body["features"],
    json!({ "temperature": 2.0, "capital": "Oslo", "targetCurrencies": { "EUR": 0.5 } })
  );
  assert_eq!(app.sink.take(), vec![(Event::Invoke, "NO".to_string())]);
}

#[tokio::test]
async fn dashboard_for_unknown_registration_is_not_found() {
  let app = TestApp::new().await;
  let (status, _) = app
    .send(Method::GET, &format!("/dashboards/{}", Uuid::new_v4()), None)
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn weather_outage_fails_the_whole_dashboard() {
  let app = TestApp::with(false, true).await;
  let id = app
    .register_norway(json!({ "precipitation": true, "capital": true }))
    .await;
  app.sink.take();

  let (status, body) = app.send(Method::GET, &format!("/dashboards/{id}"), None).await;

  assert_eq!(status, StatusCode::BAD_GATEWAY);
  assert!(body["error"].as_str().unwrap().contains("weather"));
  assert!(app.sink.take().is_empty());
}

// ── Notifications ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn webhook_lifecycle() {
  let app = TestApp::new().await;
  let (status, created) = app
    .send(
      Method::POST,
      "/notifications",
      Some(json!({ "url": "http://hook.test/", "country": "NO", "event": "DELETE" })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["id"].as_str().unwrap().to_owned();
  let path = format!("/notifications/{id}");

  let (status, one) = app.send(Method::GET, &path, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(one["url"], "http://hook.test/");
  assert_eq!(one["event"], "DELETE");

  let (_, all) = app.send(Method::GET, "/notifications", None).await;
  assert_eq!(all.as_array().unwrap().len(), 1);

  assert_eq!(app.send(Method::DELETE, &path, None).await.0, StatusCode::NO_CONTENT);
  assert_eq!(app.send(Method::DELETE, &path, None).await.0, StatusCode::NOT_FOUND);
  assert_eq!(app.send(Method::GET, &path, None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_without_url_is_rejected() {
  let app = TestApp::new().await;
  let (status, _) = app
    .send(
      Method::POST,
      "/notifications",
      Some(json!({ "url": "  ", "event": "INVOKE" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_webhook_country_matches_all() {
  let app = TestApp::new().await;
  let (_, created) = app
    .send(
      Method::POST,
      "/notifications",
      Some(json!({ "url": "http://hook.test/", "country": "", "event": "INVOKE" })),
    )
    .await;
  let id = created["id"].as_str().unwrap();

  let (_, one) = app.send(Method::GET, &format!("/notifications/{id}"), None).await;
  assert!(one.get("country").is_none());
}

// ── Status ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_reports_probes_and_webhook_count() {
  let app = TestApp::with(true, true).await;
  app
    .send(
      Method::POST,
      "/notifications",
      Some(json!({ "url": "http://hook.test/", "event": "REGISTER" })),
    )
    .await;

  let (status, body) = app.send(Method::GET, "/status", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["countriesApi"], 503);
  assert_eq!(body["weatherApi"], "unreachable");
  assert_eq!(body["currencyApi"], 200);
  assert_eq!(body["webhooks"], 1);
  assert_eq!(body["version"], "v1");
  assert!(body["uptime"].is_u64());
}
