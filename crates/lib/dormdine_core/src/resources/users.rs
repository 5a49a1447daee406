//! User operations.

use serde_json::Value;
use tracing::info;

use super::{ResourceError, ResourceResult, required_str};
use crate::models::resources::{DEFAULT_BADGE, DEFAULT_PACKAGE, Role, fields};
use crate::store::{
    Collection, Document, DocumentStore, Filter, InsertOneResult, StoreResult, UpdateResult,
};

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(InsertOneResult),
    AlreadyRegistered,
}

/// Users with the given email.
pub async fn find_by_email(store: &dyn DocumentStore, email: &str) -> StoreResult<Vec<Document>> {
    store
        .find(Collection::Users, &Filter::eq(fields::EMAIL, email), None)
        .await
}

/// Whether the user with `email` holds the admin role. Unknown users are not admins.
pub async fn is_admin(store: &dyn DocumentStore, email: &str) -> StoreResult<bool> {
    let user = store
        .find_one(Collection::Users, &Filter::eq(fields::EMAIL, email))
        .await?;
    Ok(user.is_some_and(|u| u.get(fields::ROLE) == Some(&Value::from(Role::Admin.as_str()))))
}

/// Register a user once per email.
///
/// Role, package and badge always start at their defaults whatever the body says.
pub async fn register(store: &dyn DocumentStore, mut body: Document) -> ResourceResult<Registration> {
    let email = required_str(&body, fields::EMAIL)?.to_string();
    body.insert(fields::ROLE.into(), Role::Resident.as_str().into());
    body.insert(fields::PACKAGE.into(), DEFAULT_PACKAGE.into());
    body.insert(fields::BADGE.into(), DEFAULT_BADGE.into());

    let inserted = store
        .insert_one_unless_exists(
            Collection::Users,
            body,
            &Filter::eq(fields::EMAIL, email.as_str()),
        )
        .await?;
    Ok(match inserted {
        Some(result) => {
            info!(email = %email, user_id = %result.inserted_id, "user registered");
            Registration::Created(result)
        }
        None => Registration::AlreadyRegistered,
    })
}

/// Promote a user to admin.
pub async fn make_admin(store: &dyn DocumentStore, id: &str) -> StoreResult<UpdateResult> {
    let mut set = Document::new();
    set.insert(fields::ROLE.into(), Role::Admin.as_str().into());
    store
        .update_one(Collection::Users, &Filter::by_id(id), set)
        .await
}

/// Assign a membership package and badge to an existing user.
pub async fn checkout(
    store: &dyn DocumentStore,
    id: &str,
    body: &Document,
) -> ResourceResult<UpdateResult> {
    let package = required_str(body, fields::PACKAGE)?;
    let badge = required_str(body, fields::BADGE)?;

    let filter = Filter::by_id(id);
    if store.find_one(Collection::Users, &filter).await?.is_none() {
        return Err(ResourceError::NotFound(format!("user {id}")));
    }

    let mut set = Document::new();
    set.insert(fields::PACKAGE.into(), package.into());
    set.insert(fields::BADGE.into(), badge.into());
    Ok(store.update_one(Collection::Users, &filter, set).await?)
}
