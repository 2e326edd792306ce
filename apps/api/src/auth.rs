use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tower_sessions::Session;

use velora_core::AppError;
use velora_domain::Principal;

use crate::dto::{GenericMessageResponse, LoginRequest, PrincipalResponse, RegisterRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "principal";

pub async fn register_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<PrincipalResponse>)> {
    let principal = state
        .user_service
        .register(&payload.email, payload.name, &payload.password)
        .await?;

    establish_session(&session, &principal).await?;
    Ok((StatusCode::CREATED, Json(PrincipalResponse::from(&principal))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<PrincipalResponse>> {
    let principal = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    establish_session(&session, &principal).await?;
    Ok(Json(PrincipalResponse::from(&principal)))
}

pub async fn logout_handler(session: Session) -> ApiResult<Json<GenericMessageResponse>> {
    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear session: {error}")))?;

    Ok(Json(GenericMessageResponse {
        message: "logged out".to_owned(),
    }))
}

pub async fn me_handler(
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<PrincipalResponse>> {
    Ok(Json(PrincipalResponse::from(&principal)))
}

/// Rotates the session id and stores the principal. Every flow that
/// establishes a principal (registration included) gets a fresh id, so
/// a fixated pre-auth session never survives the privilege change.
async fn establish_session(session: &Session, principal: &Principal) -> ApiResult<()> {
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, principal)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to store session principal: {error}")).into()
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use velora_domain::{Principal, Role, UserId};

    use super::{SESSION_USER_KEY, establish_session};

    #[tokio::test]
    async fn establish_session_stores_the_principal_after_rotation() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let principal = Principal::new(UserId::new(), "new@velora.dev", "New User", Role::User);

        let result = establish_session(&session, &principal).await;
        assert!(result.is_ok());

        let stored = session.get::<Principal>(SESSION_USER_KEY).await;
        assert_eq!(stored.ok().flatten(), Some(principal));
    }

    #[tokio::test]
    async fn establish_session_replaces_a_previous_principal() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let first = Principal::new(UserId::new(), "one@velora.dev", "One", Role::User);
        let second = Principal::new(UserId::new(), "two@velora.dev", "Two", Role::Admin);

        assert!(establish_session(&session, &first).await.is_ok());
        assert!(establish_session(&session, &second).await.is_ok());

        let stored = session.get::<Principal>(SESSION_USER_KEY).await;
        assert_eq!(stored.ok().flatten(), Some(second));
    }
}
