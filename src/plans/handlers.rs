use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::dto::{DietPlanResponse, GeneratePlanRequest, RegeneratePlanRequest, UserProfile};
use super::services::generate_diet_plan;
use crate::state::AppState;

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/diet-plan", post(create_plan))
        .route("/diet-plan/regenerate", post(regenerate_plan))
}

/// POST /diet-plan
#[instrument(skip(state, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<GeneratePlanRequest>,
) -> Result<Json<DietPlanResponse>, (StatusCode, String)> {
    let seed = payload.seed.unwrap_or(0);
    build_plan(&state, &payload.profile, seed).map(Json)
}

/// POST /diet-plan/regenerate
/// Same profile, fresh time-based seed.
#[instrument(skip(state, payload))]
pub async fn regenerate_plan(
    State(state): State<AppState>,
    Json(payload): Json<RegeneratePlanRequest>,
) -> Result<Json<DietPlanResponse>, (StatusCode, String)> {
    let seed = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    build_plan(&state, &payload.profile, seed).map(Json)
}

fn build_plan(
    state: &AppState,
    profile: &UserProfile,
    seed: i64,
) -> Result<DietPlanResponse, (StatusCode, String)> {
    if let Err(e) = profile.validate() {
        warn!(error = %e, "invalid profile");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let plan = generate_diet_plan(profile, &state.catalog, seed);
    info!(
        seed,
        daily_calories = plan.daily_calories,
        goal = %profile.goal,
        meals_per_day = %profile.meals_per_day,
        "diet plan generated"
    );
    Ok(DietPlanResponse::new(seed, plan))
}
