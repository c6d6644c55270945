use super::permissions::*;
use super::role::Role;
use crate::models::user::CurrentUser;

/// Static role -> permission table. Adding a permission means editing this match.
pub fn permissions_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::Customer => &[
            REGISTER_LOGIN,
            MANAGE_OWN_PROFILE,
            VIEW_OWN_ACCOUNTS,
            CREATE_ACCOUNTS,
            INTERNAL_TRANSFERS,
            EXTERNAL_TRANSFERS,
            VIEW_OWN_TRANSACTIONS,
            MANAGE_SUPPORT_TICKETS,
            ADD_TICKET_NOTES,
        ],
        Role::SupportAgent => &[
            REGISTER_LOGIN,
            MANAGE_OWN_PROFILE,
            VIEW_OWN_ACCOUNTS,
            VIEW_ALL_USER_ACCOUNTS,
            VIEW_OWN_TRANSACTIONS,
            VIEW_ALL_TRANSACTIONS,
            MANAGE_SUPPORT_TICKETS,
            VIEW_OPEN_TICKETS,
            UPDATE_TICKET_STATUS,
            ADD_TICKET_NOTES,
        ],
        Role::Auditor => &[
            REGISTER_LOGIN,
            VIEW_OWN_ACCOUNTS,
            VIEW_ALL_USER_ACCOUNTS,
            VIEW_OWN_TRANSACTIONS,
            VIEW_ALL_TRANSACTIONS,
            VIEW_AUDIT_SECURITY_LOGS,
        ],
        Role::Admin => ALL,
        Role::Unknown => &[],
    }
}

/// True iff there is a user and its role is one of `roles`.
pub fn has_role(user: Option<&CurrentUser>, roles: &[Role]) -> bool {
    match user {
        Some(user) if user.role.is_known() => roles.contains(&user.role),
        _ => false,
    }
}

/// True iff there is a user and its role's table entry contains `permission`.
pub fn has_permission(user: Option<&CurrentUser>, permission: &str) -> bool {
    let Some(user) = user else {
        tracing::trace!(permission = %permission, "no user, permission denied");
        return false;
    };

    let granted = permissions_for(user.role).contains(&permission);
    tracing::trace!(
        user_id = user.id,
        role = %user.role,
        permission = %permission,
        granted,
        "permission check"
    );
    granted
}
