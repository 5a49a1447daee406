//! Collection size endpoints used by paginated views.

use axum::Json;
use axum::extract::State;
use dormdine_core::resources;
use dormdine_core::store::Collection;

use crate::AppState;
use crate::error::AppResult;
use crate::models::CountResponse;

async fn count(state: &AppState, collection: Collection) -> AppResult<Json<CountResponse>> {
    let count = resources::count(state.store(), collection).await?;
    Ok(Json(CountResponse { count }))
}

/// `GET /api/v1/allmealCount`
pub async fn meal_count_handler(State(state): State<AppState>) -> AppResult<Json<CountResponse>> {
    count(&state, Collection::Meals).await
}

/// `GET /api/v1/allUserCount`
pub async fn user_count_handler(State(state): State<AppState>) -> AppResult<Json<CountResponse>> {
    count(&state, Collection::Users).await
}

/// `GET /api/v1/allReviewCount`
pub async fn review_count_handler(
    State(state): State<AppState>,
) -> AppResult<Json<CountResponse>> {
    count(&state, Collection::Reviews).await
}

/// `GET /api/v1/allServeMealCount`
pub async fn request_count_handler(
    State(state): State<AppState>,
) -> AppResult<Json<CountResponse>> {
    count(&state, Collection::RequestMeals).await
}

/// `GET /api/v1/upcomingMealCount`
pub async fn upcoming_count_handler(
    State(state): State<AppState>,
) -> AppResult<Json<CountResponse>> {
    count(&state, Collection::UpcomingMeals).await
}
