use axum::Json;
use axum::extract::State;

use crate::dto::RoleGrantsResponse;
use crate::state::AppState;

/// Public role catalog: every role with its effective permissions, in
/// privilege order.
pub async fn list_roles_handler(State(state): State<AppState>) -> Json<Vec<RoleGrantsResponse>> {
    let catalog = state
        .authorization_service
        .map()
        .iter()
        .map(|(role, permissions)| RoleGrantsResponse {
            role: role.as_str().to_owned(),
            permissions: permissions
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        })
        .collect();

    Json(catalog)
}
