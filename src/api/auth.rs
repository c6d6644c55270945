use super::endpoints;
use super::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::user::{
    Acknowledgement, ChangePasswordRequest, CsrfResponse, CurrentUser, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UpdateProfileRequest,
};

impl ApiClient {
    /// `POST /auth/login`. On success the returned access token is stored in
    /// the session. A rejected login leaves any existing session untouched.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let response: LoginResponse = self.post(endpoints::LOGIN, request).await?;

        let token = match (&response.access_token, response.success) {
            (Some(token), true) if !token.is_empty() => token.clone(),
            _ => {
                let message = response.error.clone().unwrap_or_else(|| "Login failed".to_string());
                return Err(ClientError::unknown(message));
            }
        };

        self.session().set_access_token(token);
        tracing::info!(username = %request.username, "login accepted");
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.post(endpoints::REGISTER, request).await
    }

    /// `POST /auth/logout`, best effort. Both tokens are forgotten whatever
    /// the server says, and this never fails.
    pub async fn logout(&self) {
        if let Err(err) = self.post_empty::<Acknowledgement>(endpoints::LOGOUT).await {
            tracing::warn!(error = %err.message(), "logout request failed, clearing session anyway");
        }
        self.session().clear();
    }

    pub async fn profile(&self) -> ClientResult<CurrentUser> {
        self.get(endpoints::PROFILE).await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientResult<Acknowledgement> {
        self.put(endpoints::PROFILE, request).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<Acknowledgement> {
        self.post(endpoints::CHANGE_PASSWORD, request).await
    }

    /// `GET /auth/csrf`. The caller decides whether to keep the token.
    pub async fn fetch_csrf_token(&self) -> ClientResult<String> {
        let response: CsrfResponse = self.get(endpoints::CSRF).await?;
        if response.csrf_token.is_empty() {
            return Err(ClientError::unknown("csrf token missing"));
        }
        Ok(response.csrf_token)
    }
}
