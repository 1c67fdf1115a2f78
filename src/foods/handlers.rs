use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::{
    filter::{filter_foods, FilterPrefs},
    repo_types::FoodRecord,
};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/foods", get(list_foods))
}

/// GET /foods
/// Returns the loaded dataset; any of the preference query params applies the profile filter.
#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(prefs): Query<FilterPrefs>,
) -> Json<Vec<FoodRecord>> {
    if prefs.is_empty() {
        return Json(state.catalog.as_ref().clone());
    }
    let foods: Vec<FoodRecord> = filter_foods(&state.catalog, &prefs)
        .into_iter()
        .cloned()
        .collect();
    debug!(total = state.catalog.len(), kept = foods.len(), "foods filtered");
    Json(foods)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::foods::repo_types::{food, FoodRecord};
    use crate::state::AppState;

    fn catalog() -> Vec<FoodRecord> {
        let mut chicken = food("Chicken Curry", 300.0, "dinner");
        chicken.diet_type = "Non-Veg".into();
        let mut pasta = food("Pasta", 450.0, "lunch");
        pasta.allergen_tags = "gluten".into();
        vec![food("Dal Fry", 200.0, "lunch"), chicken, pasta]
    }

    async fn get_foods(uri: &str) -> Vec<FoodRecord> {
        let app = super::read_routes().with_state(AppState::fake(catalog()));
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn returns_whole_catalog_without_params() {
        let foods = get_foods("/foods").await;
        assert_eq!(foods.len(), 3);
        assert_eq!(foods[1].name, "Chicken Curry");
    }

    #[tokio::test]
    async fn applies_profile_filter_from_query() {
        let foods = get_foods("/foods?dietaryPreference=vegetarian&allergies=gluten").await;
        let names: Vec<_> = foods.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Dal Fry"]);
    }
}
