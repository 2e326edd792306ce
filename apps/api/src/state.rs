use velora_application::{AuthorizationService, MediaService, RoleService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub role_service: RoleService,
    pub media_service: MediaService,
    pub user_service: UserService,
    pub frontend_url: String,
}
