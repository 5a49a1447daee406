//! Resource field names and fixed values.

use serde::{Deserialize, Serialize};

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Resident,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::Admin => "admin",
        }
    }
}

/// Meal request status. The only transition is `Pending` to `Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Delivered,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Delivered => "delivered",
        }
    }
}

/// Membership package given to new users.
pub const DEFAULT_PACKAGE: &str = "none";
/// Badge given to new users.
pub const DEFAULT_BADGE: &str = "bronze";

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Fields an admin may change through the meal edit operation.
pub const EDITABLE_MEAL_FIELDS: [&str; 13] = [
    "mealTitle",
    "mealCategory",
    "mealImage",
    "ingredients",
    "description",
    "price",
    "rating",
    "postTime",
    "likes",
    "reviews",
    "distributorName",
    "distributorEmail",
    "adminId",
];

pub mod fields {
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const PACKAGE: &str = "package";
    pub const BADGE: &str = "badge";
    pub const MEAL_CATEGORY: &str = "mealCategory";
    pub const ADMIN_ID: &str = "adminId";
    pub const LIKES: &str = "likes";
    pub const REVIEWS: &str = "reviews";
    pub const USER_REVIEW: &str = "userReview";
    pub const MEAL_ID: &str = "mealId";
    pub const REVIEWER_ID: &str = "reviewerId";
    pub const REVIEW_TEXT: &str = "reviewText";
    pub const USER_EMAIL: &str = "userEmail";
    pub const STATUS: &str = "status";
}
