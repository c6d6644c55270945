//! Permission model - role table and evaluators
//!
//! Checks here only decide what the UI offers. The backend enforces
//! authorization on every request regardless of what this module says.

mod evaluator;
mod role;

pub use evaluator::{has_permission, has_role, permissions_for};
pub use role::Role;

/// Well-known permission tokens
pub mod permissions {
    pub const REGISTER_LOGIN: &str = "register_login";
    pub const MANAGE_OWN_PROFILE: &str = "manage_own_profile";

    // Accounts
    pub const VIEW_OWN_ACCOUNTS: &str = "view_own_accounts";
    pub const VIEW_ALL_USER_ACCOUNTS: &str = "view_all_user_accounts";
    pub const CREATE_ACCOUNTS: &str = "create_accounts";
    pub const FREEZE_UNFREEZE_ACCOUNTS: &str = "freeze_unfreeze_accounts";

    // Transfers and history
    pub const INTERNAL_TRANSFERS: &str = "internal_transfers";
    pub const EXTERNAL_TRANSFERS: &str = "external_transfers";
    pub const VIEW_OWN_TRANSACTIONS: &str = "view_own_transactions";
    pub const VIEW_ALL_TRANSACTIONS: &str = "view_all_transactions";

    // Administration
    pub const ASSIGN_CHANGE_USER_ROLES: &str = "assign_change_user_roles";
    pub const VIEW_AUDIT_SECURITY_LOGS: &str = "view_audit_security_logs";

    // Support
    pub const MANAGE_SUPPORT_TICKETS: &str = "manage_support_tickets";
    pub const VIEW_OPEN_TICKETS: &str = "view_open_tickets";
    pub const UPDATE_TICKET_STATUS: &str = "update_ticket_status";
    pub const ADD_TICKET_NOTES: &str = "add_ticket_notes";

    pub const ALL: &[&str] = &[
        REGISTER_LOGIN,
        MANAGE_OWN_PROFILE,
        VIEW_OWN_ACCOUNTS,
        VIEW_ALL_USER_ACCOUNTS,
        CREATE_ACCOUNTS,
        INTERNAL_TRANSFERS,
        EXTERNAL_TRANSFERS,
        VIEW_OWN_TRANSACTIONS,
        VIEW_ALL_TRANSACTIONS,
        FREEZE_UNFREEZE_ACCOUNTS,
        ASSIGN_CHANGE_USER_ROLES,
        VIEW_AUDIT_SECURITY_LOGS,
        MANAGE_SUPPORT_TICKETS,
        VIEW_OPEN_TICKETS,
        UPDATE_TICKET_STATUS,
        ADD_TICKET_NOTES,
    ];
}
