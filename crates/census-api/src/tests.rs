//! Router tests driven through `tower::ServiceExt::oneshot` over the
//! in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use census_core::memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AppState, api_router};

fn make_state() -> AppState<MemoryStore, MemoryStore> {
  let store = Arc::new(MemoryStore::new());
  AppState::new(Arc::clone(&store), store)
}

async fn send(
  state:  &AppState<MemoryStore, MemoryStore>,
  method: &str,
  uri:    &str,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn add_person(
  state: &AppState<MemoryStore, MemoryStore>,
  body: Value,
) -> Value {
  let (status, person) = send(state, "POST", "/persons", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "{person}");
  person
}

fn names(list: &Value) -> Vec<&str> {
  list
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["person_name"].as_str().unwrap())
    .collect()
}

// ── Countries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_country() {
  let state = make_state();
  let (status, created) = send(
    &state,
    "POST",
    "/countries",
    Some(json!({ "country_name": "Ostania" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["country_name"], "Ostania");

  let id = created["country_id"].as_str().unwrap();
  let (status, fetched) = send(&state, "GET", &format!("/countries/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, created);

  let (_, all) = send(&state, "GET", "/countries", None).await;
  assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_country_is_conflict() {
  let state = make_state();
  let body = json!({ "country_name": "Westalis" });
  send(&state, "POST", "/countries", Some(body.clone())).await;
  let (status, err) = send(&state, "POST", "/countries", Some(body)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(err["error"].is_string());
}

#[tokio::test]
async fn country_without_name_is_bad_request() {
  let state = make_state();
  let (status, _) = send(&state, "POST", "/countries", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_country_is_404() {
  let state = make_state();
  let uri = format!("/countries/{}", Uuid::new_v4());
  let (status, _) = send(&state, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Persons ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_person_resolves_country_and_age() {
  let state = make_state();
  let (_, country) = send(
    &state,
    "POST",
    "/countries",
    Some(json!({ "country_name": "Ostania" })),
  )
  .await;

  let person = add_person(
    &state,
    json!({
      "person_name": "Anya Forger",
      "email": "anya@eden.example",
      "date_of_birth": "2000-01-01",
      "gender": "Female",
      "country_id": country["country_id"],
    }),
  )
  .await;

  assert_eq!(person["country"], "Ostania");
  assert!(person["age"].as_f64().unwrap() >= 24.0);
  assert_eq!(person["receive_news_letters"], false);

  let id = person["person_id"].as_str().unwrap();
  let (status, fetched) = send(&state, "GET", &format!("/persons/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["person_name"], "Anya Forger");
}

#[tokio::test]
async fn invalid_email_is_bad_request() {
  let state = make_state();
  let (status, err) = send(
    &state,
    "POST",
    "/persons",
    Some(json!({ "person_name": "Bond", "email": "woof" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].as_str().unwrap().contains("email"), "{err}");
}

#[tokio::test]
async fn duplicate_person_is_conflict() {
  let state = make_state();
  add_person(&state, json!({ "person_name": "Bond" })).await;
  let (status, _) =
    send(&state, "POST", "/persons", Some(json!({ "person_name": "Bond" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_defaults_to_name_ascending() {
  let state = make_state();
  for name in ["Yor", "anya", "Loid"] {
    add_person(&state, json!({ "person_name": name })).await;
  }
  let (status, list) = send(&state, "GET", "/persons", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&list), ["anya", "Loid", "Yor"]);
}

#[tokio::test]
async fn list_filters_then_sorts_descending() {
  let state = make_state();
  for name in ["Anya Forger", "Bond", "Loid Forger", "Yor Forger"] {
    add_person(&state, json!({ "person_name": name })).await;
  }
  let (_, list) = send(
    &state,
    "GET",
    "/persons?search_by=PersonName&search_string=forger&sort_by=PersonName&sort_order=DESC",
    None,
  )
  .await;
  assert_eq!(names(&list), ["Yor Forger", "Loid Forger", "Anya Forger"]);
}

#[tokio::test]
async fn unknown_query_names_are_ignored() {
  let state = make_state();
  for name in ["Bond", "Anya"] {
    add_person(&state, json!({ "person_name": name })).await;
  }
  let (status, list) = send(
    &state,
    "GET",
    "/persons?search_by=Nope&search_string=x&sort_by=Nope&sort_order=sideways",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&list), ["Bond", "Anya"]);
}

#[tokio::test]
async fn search_fields_lists_searchable_fields() {
  let state = make_state();
  let (status, fields) = send(&state, "GET", "/persons/search-fields", None).await;
  assert_eq!(status, StatusCode::OK);
  let fields: Vec<_> = fields
    .as_array()
    .unwrap()
    .iter()
    .map(|f| f["field"].as_str().unwrap())
    .collect();
  assert!(fields.contains(&"PersonName"));
  assert!(fields.contains(&"Address"));
  assert!(!fields.contains(&"ReceiveNewsLetters"));
}

#[tokio::test]
async fn update_uses_path_id() {
  let state = make_state();
  let person = add_person(&state, json!({ "person_name": "Loid" })).await;
  let id = person["person_id"].as_str().unwrap();

  let (status, updated) = send(
    &state,
    "PUT",
    &format!("/persons/{id}"),
    Some(json!({
      "person_name": "Twilight",
      "email": "twilight@wise.example",
      "receive_news_letters": true,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{updated}");
  assert_eq!(updated["person_id"], id);
  assert_eq!(updated["person_name"], "Twilight");
  assert_eq!(updated["receive_news_letters"], true);
}

#[tokio::test]
async fn update_unknown_person_is_bad_request() {
  let state = make_state();
  let (status, _) = send(
    &state,
    "PUT",
    &format!("/persons/{}", Uuid::new_v4()),
    Some(json!({ "person_name": "Ghost", "email": "ghost@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
  let state = make_state();
  let person = add_person(&state, json!({ "person_name": "Franky" })).await;
  let uri = format!("/persons/{}", person["person_id"].as_str().unwrap());

  let (status, _) = send(&state, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&state, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&state, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
