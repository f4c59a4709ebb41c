//! In-process stand-in for TheMealDB v1 API.
//!
//! Serves a fixed catalog over real HTTP so the live transport can be tested
//! end to end. Responses follow the upstream quirks: lists come wrapped in
//! `{"meals": [...]}`, "no results" is `{"meals": null}`, and every meal
//! carries twenty `strIngredientN` / `strMeasureN` slots, unused ones set to
//! `""` or `null`.

mod fixtures;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub use fixtures::{Catalog, MAX_INGREDIENTS};

/// Path prefix of every API route, matching the public v1 test key.
pub const API_PREFIX: &str = "/api/json/v1/1";

pub type Db = Arc<Catalog>;

pub fn app() -> Router {
    app_with(Catalog::fixtures())
}

pub fn app_with(catalog: Catalog) -> Router {
    let api = Router::new()
        .route("/categories.php", get(list_categories))
        .route("/filter.php", get(filter_meals))
        .route("/lookup.php", get(lookup_meal))
        .route("/search.php", get(search_meals))
        .route("/random.php", get(random_meal))
        .route("/slow.php", get(slow));
    Router::new().nest(API_PREFIX, api).with_state(Arc::new(catalog))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[derive(Deserialize)]
pub struct FilterQuery {
    pub c: Option<String>,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub i: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub s: Option<String>,
}

#[derive(Deserialize)]
pub struct SlowQuery {
    pub ms: Option<u64>,
}

/// Wrap `items` under `key`, using `null` for an empty list.
fn envelope(key: &str, items: Vec<Value>) -> Json<Value> {
    let list = if items.is_empty() {
        Value::Null
    } else {
        Value::Array(items)
    };
    let mut body = Map::new();
    body.insert(key.to_string(), list);
    Json(Value::Object(body))
}

async fn list_categories(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "categories": db.categories() }))
}

async fn filter_meals(State(db): State<Db>, Query(query): Query<FilterQuery>) -> Json<Value> {
    let meals = match query.c {
        Some(category) => db.summaries_in(&category),
        None => Vec::new(),
    };
    tracing::debug!(count = meals.len(), "filter");
    envelope("meals", meals)
}

async fn lookup_meal(State(db): State<Db>, Query(query): Query<LookupQuery>) -> Json<Value> {
    let meal = query.i.and_then(|id| db.meal(&id).cloned());
    envelope("meals", meal.into_iter().collect())
}

async fn search_meals(State(db): State<Db>, Query(query): Query<SearchQuery>) -> Json<Value> {
    let name = query.s.unwrap_or_default();
    envelope("meals", db.search(&name))
}

async fn random_meal(State(db): State<Db>) -> Json<Value> {
    // Deterministic: always the first meal of the catalog.
    envelope("meals", db.first_meal().cloned().into_iter().collect())
}

/// Sleep before answering, for exercising client timeouts.
async fn slow(Query(query): Query<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(query.ms.unwrap_or(1_000))).await;
    Json(json!({ "meals": null }))
}
