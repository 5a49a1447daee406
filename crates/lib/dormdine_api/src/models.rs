//! Request and response bodies.

use dormdine_core::store::{InsertOneResult, Page};
use serde::{Deserialize, Serialize};

/// Error body returned by every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Registration answers with the insert envelope, or a message when the
/// email is already taken.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    Created(InsertOneResult),
    AlreadyRegistered(MessageResponse),
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub admin: bool,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    pub price: f64,
}

/// `?page=&size=`; both optional, zero-based page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl PageQuery {
    pub fn to_page(&self) -> Option<Page> {
        Page::from_query(self.page, self.size)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEmailQuery {
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub meal_category: Option<String>,
}
