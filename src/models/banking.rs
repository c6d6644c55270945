use serde::{Deserialize, Serialize};

use crate::authz::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest {
    pub account_type: AccountType,
    pub opening_balance: f64,
    /// Staff may open accounts for someone else; customers leave this unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(alias = "id")]
    pub account_id: i64,
    pub account_number: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub balance: f64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub account_id: i64,
    pub account_number: String,
    pub balance: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InternalTransferRequest {
    pub sender_account_id: i64,
    pub receiver_account_id: i64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalTransferRequest {
    pub sender_account_id: i64,
    pub receiver_account_number: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferReceipt {
    pub transaction_id: String,
    pub sender_account: String,
    pub receiver_account: String,
    pub amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleAssignment {
    pub user_id: i64,
    pub username: String,
    pub old_role: Role,
    pub new_role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub subject: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
