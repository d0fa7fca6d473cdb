//! Request/response DTOs and their mapping to/from domain types.

use serde::{Deserialize, Serialize};

use simplebank_core::{AccountId, Currency, UserId};
use simplebank_ledger::{Account, TransferRequest, UserRecord};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct BalanceChangeRequest {
    pub amount: i64,
}

/// Transfer body; field names are part of the wire contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequestBody {
    pub from_account_id: AccountId,
    pub to_user_id: UserId,
    pub to_account_id: AccountId,
    pub amount: i64,
}

impl From<TransferRequestBody> for TransferRequest {
    fn from(body: TransferRequestBody) -> Self {
        TransferRequest {
            from_account_id: body.from_account_id,
            to_user_id: body.to_user_id,
            to_account_id: body.to_account_id,
            amount: body.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub currency: Currency,
    pub amount: i64,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            currency: account.currency,
            amount: account.balance(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: UserId,
    pub username: String,
}

impl From<UserRecord> for CreatedUserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id: UserId,
    pub username: String,
    pub accounts: Vec<AccountResponse>,
}

impl UserProfileResponse {
    pub fn new(user: UserRecord, accounts: Vec<Account>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            accounts: accounts.into_iter().map(AccountResponse::from).collect(),
        }
    }
}
