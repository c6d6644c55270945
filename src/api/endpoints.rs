//! Endpoint paths, relative to the configured API base URL.

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const LOGOUT: &str = "/auth/logout";
pub const PROFILE: &str = "/auth/profile";
pub const CHANGE_PASSWORD: &str = "/auth/change-password";
pub const CSRF: &str = "/auth/csrf";

pub const DASHBOARD: &str = "/dashboard";
pub const ACCOUNTS: &str = "/accounts";
pub const INTERNAL_TRANSFER: &str = "/transactions/internal-transfer";
pub const EXTERNAL_TRANSFER: &str = "/transactions/external-transfer";
pub const SUPPORT_TICKETS: &str = "/support/tickets";
pub const OPEN_TICKETS: &str = "/support/tickets/open";
pub const AUDIT_LOGS: &str = "/audit/logs";

pub fn user_accounts(user_id: i64) -> String {
    format!("/accounts/user/{user_id}")
}

pub fn account_balance(account_id: i64) -> String {
    format!("/accounts/{account_id}/balance")
}

pub fn freeze_account(account_id: i64) -> String {
    format!("/accounts/{account_id}/freeze")
}

pub fn unfreeze_account(account_id: i64) -> String {
    format!("/accounts/{account_id}/unfreeze")
}

pub fn account_history(account_id: i64) -> String {
    format!("/transactions/account/{account_id}/history")
}

pub fn user_role(user_id: i64) -> String {
    format!("/admin/users/{user_id}/role")
}

pub fn user_permissions(user_id: i64) -> String {
    format!("/admin/users/{user_id}/permissions")
}
