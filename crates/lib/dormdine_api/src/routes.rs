//! Route table.
//!
//! Every route is declared once, together with the access it requires, and
//! the router is built from this table. Guards are attached per route, so a
//! route's protection is exactly what its entry says.

use axum::Router;
use axum::http::Method;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, delete, get, patch, post, put};

use crate::AppState;
use crate::handlers::{counts, health, meals, payments, requests, reviews, session, upcoming, users};
use crate::middleware::auth::{require_self_match, require_session};

/// Access a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone may call the route.
    Public,
    /// A valid, unrevoked session cookie is required.
    Session,
    /// A session whose email equals the route's `{email}` parameter.
    SelfMatch,
}

/// One declared route.
pub struct RouteSpec {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
    handler: MethodRouter<AppState>,
}

impl RouteSpec {
    fn new(
        method: Method,
        path: &'static str,
        access: Access,
        handler: MethodRouter<AppState>,
    ) -> Self {
        Self {
            method,
            path,
            access,
            handler,
        }
    }
}

macro_rules! route {
    (GET $path:literal, $access:ident, $handler:path) => {
        RouteSpec::new(Method::GET, $path, Access::$access, get($handler))
    };
    (POST $path:literal, $access:ident, $handler:path) => {
        RouteSpec::new(Method::POST, $path, Access::$access, post($handler))
    };
    (PUT $path:literal, $access:ident, $handler:path) => {
        RouteSpec::new(Method::PUT, $path, Access::$access, put($handler))
    };
    (PATCH $path:literal, $access:ident, $handler:path) => {
        RouteSpec::new(Method::PATCH, $path, Access::$access, patch($handler))
    };
    (DELETE $path:literal, $access:ident, $handler:path) => {
        RouteSpec::new(Method::DELETE, $path, Access::$access, delete($handler))
    };
}

/// All routes served by the API.
///
/// Only meal creation and the admin check are guarded; most mutations are
/// `Public`.
pub fn route_table() -> Vec<RouteSpec> {
    vec![
        route!(GET "/", Public, health::root),
        // Sessions
        route!(POST "/api/v1/jwt", Public, session::issue_handler),
        route!(POST "/api/v1/logout", Public, session::logout_handler),
        // Users
        route!(GET "/api/v1/user", Public, users::user_by_email_handler),
        route!(GET "/api/v1/allUser", Public, users::all_users_handler),
        route!(GET "/api/v1/user/admin/{email}", SelfMatch, users::admin_status_handler),
        route!(POST "/api/v1/user", Public, users::register_handler),
        route!(PATCH "/api/v1/makeadmin/{id}", Public, users::make_admin_handler),
        route!(PUT "/api/v1/checkout/{id}", Public, users::checkout_handler),
        // Meals
        route!(GET "/api/v1/meals", Public, meals::meals_by_category_handler),
        route!(GET "/api/v1/allmeal", Public, meals::all_meals_handler),
        route!(GET "/api/v1/meals/{id}", Public, meals::meal_detail_handler),
        route!(GET "/api/v1/adminprofile/{id}", Public, meals::admin_profile_handler),
        route!(GET "/api/v1/editmeal/{id}", Public, meals::edit_meal_form_handler),
        route!(POST "/api/v1/addMeal", Session, meals::add_meal_handler),
        route!(PATCH "/api/v1/likes/{id}", Public, meals::meal_likes_handler),
        route!(PATCH "/api/v1/editMeal/{id}", Public, meals::edit_meal_handler),
        route!(DELETE "/api/v1/meal/{id}", Public, meals::delete_meal_handler),
        // Upcoming meals
        route!(GET "/api/v1/upcomingmeal", Public, upcoming::all_upcoming_handler),
        route!(POST "/api/v1/upcomingMeal", Session, upcoming::add_upcoming_handler),
        route!(POST "/api/v1/mealpublish/{id}", Public, upcoming::publish_handler),
        route!(PATCH "/api/v1/updateMealLikes/{id}", Public, upcoming::upcoming_likes_handler),
        // Meal requests
        route!(GET "/api/v1/serveMeal", Public, requests::all_requests_handler),
        route!(GET "/api/v1/requestmeal", Public, requests::requests_by_user_handler),
        route!(POST "/api/v1/mealrequest", Public, requests::create_request_handler),
        route!(PATCH "/api/v1/servestatus/{id}", Public, requests::serve_status_handler),
        route!(DELETE "/api/v1/requestmeal/{id}", Public, requests::delete_request_handler),
        // Reviews
        route!(GET "/api/v1/allreview", Public, reviews::all_reviews_handler),
        route!(GET "/api/v1/userreview/{id}", Public, reviews::user_reviews_handler),
        route!(POST "/api/v1/review", Public, reviews::post_review_handler),
        route!(PATCH "/api/v1/updatereview/{id}", Public, reviews::update_review_handler),
        route!(DELETE "/api/v1/userreview/{id}", Public, reviews::delete_review_handler),
        route!(DELETE "/api/v1/review/{id}", Public, reviews::delete_review_handler),
        // Payments
        route!(POST "/api/v1/create-payment-intent", Public, payments::create_payment_intent_handler),
        // Counts
        route!(GET "/api/v1/allmealCount", Public, counts::meal_count_handler),
        route!(GET "/api/v1/allUserCount", Public, counts::user_count_handler),
        route!(GET "/api/v1/allReviewCount", Public, counts::review_count_handler),
        route!(GET "/api/v1/allServeMealCount", Public, counts::request_count_handler),
        route!(GET "/api/v1/upcomingMealCount", Public, counts::upcoming_count_handler),
    ]
}

/// Wraps a handler in the guards its access level requires.
fn guard(
    handler: MethodRouter<AppState>,
    access: Access,
    state: &AppState,
) -> MethodRouter<AppState> {
    match access {
        Access::Public => handler,
        Access::Session => {
            handler.route_layer(from_fn_with_state(state.clone(), require_session))
        }
        // The session layer is added last so it runs first.
        Access::SelfMatch => handler
            .route_layer(from_fn(require_self_match))
            .route_layer(from_fn_with_state(state.clone(), require_session)),
    }
}

/// Builds the API routes from [`route_table`].
pub fn routes(state: &AppState) -> Router<AppState> {
    route_table().into_iter().fold(Router::new(), |router, spec| {
        router.route(spec.path, guard(spec.handler, spec.access, state))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn routes_are_declared_once() {
        let mut seen = HashSet::new();
        for spec in route_table() {
            assert!(
                seen.insert((spec.method.clone(), spec.path)),
                "duplicate route {} {}",
                spec.method,
                spec.path
            );
        }
    }

    #[test]
    fn self_match_routes_carry_an_email_parameter() {
        for spec in route_table() {
            if spec.access == Access::SelfMatch {
                assert!(spec.path.contains("{email}"), "{}", spec.path);
            }
        }
    }

    #[test]
    fn guarded_routes() {
        let guarded: Vec<_> = route_table()
            .into_iter()
            .filter(|s| s.access != Access::Public)
            .map(|s| (s.method, s.path, s.access))
            .collect();
        assert_eq!(
            guarded,
            vec![
                (Method::GET, "/api/v1/user/admin/{email}", Access::SelfMatch),
                (Method::POST, "/api/v1/addMeal", Access::Session),
                (Method::POST, "/api/v1/upcomingMeal", Access::Session),
            ]
        );
    }
}
