//! User business logic - Registration, profile updates and credential checks.
//!
//! Emails are normalised to lowercase before they are stored or compared, and
//! passwords only ever reach the database as argon2 hashes.

use crate::{
    core::{
        pagination::{Page, Pageable, optional_param},
        password::{hash_password, verify_password},
        repository,
        validation::{email, password, required_text},
    },
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Fields accepted when registering a user.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Login email; stored lowercased and unique.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Administrator flag; `isAdmin` is accepted too.
    #[serde(default, alias = "isAdmin")]
    pub admin: bool,
}

/// Fields accepted when updating a user. A missing password keeps the current one.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Login email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// New password, if changing it.
    #[serde(default)]
    pub password: Option<String>,
    /// Administrator flag; `isAdmin` is accepted too.
    #[serde(default, alias = "isAdmin")]
    pub admin: bool,
}

/// Search filters for users.
///
/// `name` matches a substring of either the first or the last name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Substring of the email.
    #[serde(default, deserialize_with = "optional_param")]
    pub email: Option<String>,
    /// Substring of the first or last name.
    #[serde(default, deserialize_with = "optional_param")]
    pub name: Option<String>,
    /// Administrator flag.
    #[serde(default, deserialize_with = "optional_param")]
    pub admin: Option<bool>,
}

/// Registers a user. The password is hashed before it is stored.
///
/// # Errors
/// Returns an error if:
/// - A name is blank, the email is malformed or the password is too short
/// - Another user already has this email
#[instrument(skip(db, input), fields(email = %input.email, admin = input.admin))]
pub async fn create_user(db: &DatabaseConnection, input: UserInput) -> Result<user::Model> {
    let user = user::ActiveModel {
        email: Set(email(&input.email)?),
        first_name: Set(required_text("firstName", &input.first_name)?),
        last_name: Set(required_text("lastName", &input.last_name)?),
        password_hash: Set(hash_password(password(&input.password)?)?),
        is_admin: Set(input.admin),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = user.insert(db).await?;
    info!(user_id = created.id, "Created user");
    Ok(created)
}

/// Registers a user with administrator rights.
pub async fn create_admin(db: &DatabaseConnection, input: UserInput) -> Result<user::Model> {
    create_user(db, UserInput { admin: true, ..input }).await
}

/// Fetches a user by id.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    repository::find_required::<User, _>(db, user_id).await
}

/// Whether a user with this id exists.
pub async fn user_exists(db: &DatabaseConnection, user_id: i64) -> Result<bool> {
    repository::exists::<User, _>(db, user_id).await
}

/// Looks a user up by email, ignoring case.
pub async fn find_user_by_email(
    db: &DatabaseConnection,
    address: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(address.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the user owning `address` if `secret` matches the stored hash.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] for an unknown email or a wrong
/// password, without telling the two apart.
#[instrument(skip(db, secret))]
pub async fn verify_credentials(
    db: &DatabaseConnection,
    address: &str,
    secret: &str,
) -> Result<user::Model> {
    let Some(user) = find_user_by_email(db, address).await? else {
        debug!("No user with this email");
        return Err(Error::InvalidCredentials);
    };
    if !verify_password(secret, &user.password_hash) {
        debug!(user_id = user.id, "Password mismatch");
        return Err(Error::InvalidCredentials);
    }
    Ok(user)
}

/// Searches users, ordered by id.
pub async fn search_users(
    db: &DatabaseConnection,
    filter: &UserFilter,
    pageable: Pageable,
) -> Result<Page<user::Model>> {
    let mut condition = Condition::all();
    if let Some(address) = &filter.email {
        condition = condition.add(user::Column::Email.contains(address.to_lowercase()));
    }
    if let Some(name) = &filter.name {
        condition = condition.add(
            Condition::any()
                .add(user::Column::FirstName.contains(name.as_str()))
                .add(user::Column::LastName.contains(name.as_str())),
        );
    }
    if let Some(admin) = filter.admin {
        condition = condition.add(user::Column::IsAdmin.eq(admin));
    }

    let select = User::find()
        .filter(condition)
        .order_by_asc(user::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Updates a user's profile, and their password when one is given.
///
/// # Errors
/// Returns an error if the user does not exist, a field is invalid, or the new
/// email belongs to another user.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    input: UserUpdate,
) -> Result<user::Model> {
    let mut user: user::ActiveModel = get_user(db, user_id).await?.into();
    user.email = Set(email(&input.email)?);
    user.first_name = Set(required_text("firstName", &input.first_name)?);
    user.last_name = Set(required_text("lastName", &input.last_name)?);
    user.is_admin = Set(input.admin);
    if let Some(new_password) = input.password.as_deref() {
        user.password_hash = Set(hash_password(password(new_password)?)?);
    }

    let updated = user.update(db).await?;
    info!(user_id, "Updated user");
    Ok(updated)
}

/// Deletes a user together with their session.
///
/// Fails while orders still reference the user.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    repository::delete::<User, _>(db, user_id).await?;
    info!(user_id, "Deleted user");
    Ok(())
}
