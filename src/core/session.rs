//! Session business logic - Login, logout and token lookups.
//!
//! A user holds at most one session. Logging in again throws the old session
//! away and hands out a fresh random access token.

use crate::{
    core::{
        pagination::{Page, Pageable, optional_param},
        repository,
        user::verify_credentials,
        validation::required_text,
    },
    entities::{Session, User, session},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Query parameters for looking up a single session.
///
/// When several keys are present, `id` wins over `userId`, which wins over
/// `accessToken`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    /// Session id.
    #[serde(default, deserialize_with = "optional_param")]
    pub id: Option<i64>,
    /// Owning user id.
    #[serde(default, deserialize_with = "optional_param")]
    pub user_id: Option<i64>,
    /// Access token.
    #[serde(default, deserialize_with = "optional_param")]
    pub access_token: Option<String>,
}

/// The key a session is looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    /// By session id.
    Id(i64),
    /// By the owning user's id.
    UserId(i64),
    /// By access token.
    AccessToken(String),
}

impl fmt::Display for SessionLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::UserId(user_id) => write!(f, "user id {user_id}"),
            // Tokens are credentials; keep them out of messages and logs.
            Self::AccessToken(_) => write!(f, "the given access token"),
        }
    }
}

impl SessionQuery {
    /// Picks the lookup key.
    ///
    /// # Errors
    /// Returns a validation error if no key was given.
    pub fn lookup(&self) -> Result<SessionLookup> {
        if let Some(id) = self.id {
            Ok(SessionLookup::Id(id))
        } else if let Some(user_id) = self.user_id {
            Ok(SessionLookup::UserId(user_id))
        } else if let Some(token) = &self.access_token {
            Ok(SessionLookup::AccessToken(token.clone()))
        } else {
            Err(Error::validation(
                "one of id, userId or accessToken is required",
            ))
        }
    }
}

/// Fields accepted when updating a session. A missing token keeps the current one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    /// User the session belongs to.
    pub user_id: i64,
    /// Replacement token.
    #[serde(default)]
    pub access_token: Option<String>,
}

fn new_access_token() -> String {
    Uuid::new_v4().to_string()
}

/// Logs a user in, replacing any session they already have.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] if the email is unknown or the
/// password does not match.
#[instrument(skip(db, password))]
pub async fn login(db: &DatabaseConnection, email: &str, password: &str) -> Result<session::Model> {
    let user = verify_credentials(db, email, password).await?;

    let txn = db.begin().await?;
    let replaced = Session::delete_many()
        .filter(session::Column::UserId.eq(user.id))
        .exec(&txn)
        .await?;
    let session = session::ActiveModel {
        access_token: Set(new_access_token()),
        user_id: Set(user.id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        user_id = user.id,
        session_id = session.id,
        replaced = replaced.rows_affected,
        "User logged in"
    );
    Ok(session)
}

/// Finds the session matching `lookup`.
///
/// # Errors
/// Returns [`Error::SessionNotFound`] if nothing matches.
pub async fn find_session(db: &DatabaseConnection, lookup: &SessionLookup) -> Result<session::Model> {
    let found = match lookup {
        SessionLookup::Id(id) => repository::find::<Session, _>(db, *id).await?,
        SessionLookup::UserId(user_id) => {
            Session::find()
                .filter(session::Column::UserId.eq(*user_id))
                .one(db)
                .await?
        }
        SessionLookup::AccessToken(token) => {
            Session::find()
                .filter(session::Column::AccessToken.eq(token.as_str()))
                .one(db)
                .await?
        }
    };
    debug!(%lookup, found = found.is_some(), "Session lookup");
    found.ok_or_else(|| Error::SessionNotFound {
        lookup: lookup.to_string(),
    })
}

/// Fetches a session by id.
pub async fn get_session(db: &DatabaseConnection, session_id: i64) -> Result<session::Model> {
    repository::find_required::<Session, _>(db, session_id).await
}

/// Whether a session with this id exists.
pub async fn session_exists(db: &DatabaseConnection, session_id: i64) -> Result<bool> {
    repository::exists::<Session, _>(db, session_id).await
}

/// Lists every session, ordered by id.
pub async fn list_sessions(db: &DatabaseConnection, pageable: Pageable) -> Result<Page<session::Model>> {
    let select = Session::find().order_by_asc(session::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Moves a session to another user or replaces its token.
#[instrument(skip(db, input), fields(user_id = input.user_id))]
pub async fn update_session(
    db: &DatabaseConnection,
    session_id: i64,
    input: SessionInput,
) -> Result<session::Model> {
    let mut session: session::ActiveModel = get_session(db, session_id).await?.into();
    repository::ensure_reference::<User, _>(db, input.user_id).await?;
    session.user_id = Set(input.user_id);
    if let Some(token) = input.access_token.as_deref() {
        session.access_token = Set(required_text("accessToken", token)?);
    }

    let updated = session.update(db).await?;
    info!(session_id, "Updated session");
    Ok(updated)
}

/// Ends a session.
#[instrument(skip(db))]
pub async fn logout(db: &DatabaseConnection, session_id: i64) -> Result<()> {
    repository::delete::<Session, _>(db, session_id).await?;
    info!(session_id, "Logged out");
    Ok(())
}

/// Ends whatever session the user has. Returns the number of sessions removed.
#[instrument(skip(db))]
pub async fn delete_sessions_for_user(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    let result = Session::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    info!(removed = result.rows_affected, "Deleted sessions for user");
    Ok(result.rows_affected)
}

/// Ends the session holding `token`.
///
/// # Errors
/// Returns [`Error::SessionNotFound`] if no session holds the token.
#[instrument(skip_all)]
pub async fn delete_session_by_token(db: &DatabaseConnection, token: &str) -> Result<()> {
    let result = Session::delete_many()
        .filter(session::Column::AccessToken.eq(token))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::SessionNotFound {
            lookup: SessionLookup::AccessToken(token.to_string()).to_string(),
        });
    }
    info!("Deleted session by token");
    Ok(())
}
