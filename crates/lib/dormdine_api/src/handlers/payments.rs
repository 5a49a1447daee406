//! Payment request handlers.

use axum::Json;
use axum::extract::State;
use dormdine_core::payments::to_minor_units;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::{PaymentIntentRequest, PaymentIntentResponse};

/// `POST /api/v1/create-payment-intent`: create a card intent for `price`.
pub async fn create_payment_intent_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<PaymentIntentRequest>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let amount = to_minor_units(body.price)?;
    let intent = state
        .payments
        .create_charge_intent(amount, &state.config.payment_currency)
        .await?;
    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
