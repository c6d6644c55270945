use serde::Deserialize;
use serde_json::Value;

use super::endpoints;
use super::ApiClient;
use crate::errors::ClientResult;
use crate::models::banking::{
    Account, AssignRoleRequest, Balance, CreateAccountRequest, CreateTicketRequest, ExternalTransferRequest,
    InternalTransferRequest, RoleAssignment, Ticket, TransferReceipt,
};
use crate::authz::Role;

#[derive(Deserialize)]
struct AccountList {
    accounts: Vec<Account>,
}

impl ApiClient {
    pub async fn dashboard(&self) -> ClientResult<Value> {
        self.get(endpoints::DASHBOARD).await
    }

    pub async fn create_account(&self, request: &CreateAccountRequest) -> ClientResult<Account> {
        self.post(endpoints::ACCOUNTS, request).await
    }

    pub async fn user_accounts(&self, user_id: i64) -> ClientResult<Vec<Account>> {
        let list: AccountList = self.get(&endpoints::user_accounts(user_id)).await?;
        Ok(list.accounts)
    }

    pub async fn account_balance(&self, account_id: i64) -> ClientResult<Balance> {
        self.get(&endpoints::account_balance(account_id)).await
    }

    pub async fn freeze_account(&self, account_id: i64) -> ClientResult<Account> {
        self.post_empty(&endpoints::freeze_account(account_id)).await
    }

    pub async fn unfreeze_account(&self, account_id: i64) -> ClientResult<Account> {
        self.post_empty(&endpoints::unfreeze_account(account_id)).await
    }

    pub async fn internal_transfer(&self, request: &InternalTransferRequest) -> ClientResult<TransferReceipt> {
        self.post(endpoints::INTERNAL_TRANSFER, request).await
    }

    pub async fn external_transfer(&self, request: &ExternalTransferRequest) -> ClientResult<TransferReceipt> {
        self.post(endpoints::EXTERNAL_TRANSFER, request).await
    }

    pub async fn account_history(&self, account_id: i64) -> ClientResult<Value> {
        self.get(&endpoints::account_history(account_id)).await
    }

    pub async fn assign_role(&self, user_id: i64, role: Role) -> ClientResult<RoleAssignment> {
        self.put(&endpoints::user_role(user_id), &AssignRoleRequest { role }).await
    }

    pub async fn user_permissions(&self, user_id: i64) -> ClientResult<Value> {
        self.get(&endpoints::user_permissions(user_id)).await
    }

    pub async fn create_ticket(&self, request: &CreateTicketRequest) -> ClientResult<Ticket> {
        self.post(endpoints::SUPPORT_TICKETS, request).await
    }

    pub async fn open_tickets(&self) -> ClientResult<Value> {
        self.get(endpoints::OPEN_TICKETS).await
    }

    pub async fn audit_logs(&self) -> ClientResult<Value> {
        self.get(endpoints::AUDIT_LOGS).await
    }
}
