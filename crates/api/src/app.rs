//! Router construction and request handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use simplebank_auth::{Principal, hash_password};
use simplebank_core::AccountId;
use simplebank_ledger::{
    Bank, InMemoryAccountStore, InMemoryUserDirectory, UserDirectory,
};

use crate::dto::{
    AccountResponse, BalanceChangeRequest, CreateUserRequest, CreatedUserResponse,
    TransferRequestBody, UserProfileResponse,
};
use crate::errors::{domain_error_to_response, json_error};
use crate::middleware::AuthState;

/// Runtime configuration, environment-driven.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: String,
    pub admin_username: String,
    pub admin_password: String,
    pub starting_balance: i64,
}

const DEFAULT_ADMIN_PASSWORD: &str = "admin";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            admin_username: "admin".to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let admin_password = std::env::var("SIMPLEBANK_ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("SIMPLEBANK_ADMIN_PASSWORD not set; using insecure dev default");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        let starting_balance =
            starting_balance_from(std::env::var("SIMPLEBANK_STARTING_BALANCE").ok());

        Self {
            addr: std::env::var("SIMPLEBANK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            admin_username: std::env::var("SIMPLEBANK_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password,
            starting_balance,
        }
    }
}

const DEFAULT_STARTING_BALANCE: i64 = 1;

/// Parse `SIMPLEBANK_STARTING_BALANCE`. Unparseable or negative values fall
/// back to the default, loudly.
fn starting_balance_from(raw: Option<String>) -> i64 {
    match raw {
        None => DEFAULT_STARTING_BALANCE,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value >= 0 => value,
            Ok(value) => {
                tracing::warn!(
                    value,
                    "SIMPLEBANK_STARTING_BALANCE must be non-negative; using {DEFAULT_STARTING_BALANCE}"
                );
                DEFAULT_STARTING_BALANCE
            }
            Err(_) => {
                tracing::warn!(
                    raw = %raw,
                    "SIMPLEBANK_STARTING_BALANCE is not an integer; using {DEFAULT_STARTING_BALANCE}"
                );
                DEFAULT_STARTING_BALANCE
            }
        },
    }
}

/// Service graph shared by every handler.
pub struct AppServices {
    pub bank: Bank<Arc<InMemoryAccountStore>, Arc<dyn UserDirectory>>,
    pub users: Arc<dyn UserDirectory>,
}

/// Wire the in-memory service graph and bootstrap the administrator.
pub fn build_services(config: &AppConfig) -> Arc<AppServices> {
    let accounts = Arc::new(InMemoryAccountStore::new());
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
    let bank = Bank::new(accounts, users.clone(), config.starting_balance);

    let admin_hash =
        hash_password(&config.admin_password).expect("failed to hash administrator password");
    bank.register_admin(&config.admin_username, &admin_hash)
        .expect("failed to bootstrap administrator");

    Arc::new(AppServices { bank, users })
}

pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = AuthState {
        users: services.users.clone(),
    };

    // Protected routes: every route below requires Basic credentials.
    let protected = Router::new()
        .route("/account/:id", get(get_account))
        .route("/account/deposit/:id", post(deposit))
        .route("/account/withdraw/:id", post(withdraw))
        .route("/transfer", post(transfer))
        .route("/user", post(create_user))
        .route("/user/list", get(list_users))
        .route("/user/me", get(me))
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            crate::middleware::auth_middleware,
        ));

    Router::new().route("/health", get(health)).merge(protected)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn parse_account_id(raw: &str) -> Result<AccountId, axum::response::Response> {
    raw.parse::<AccountId>().map_err(domain_error_to_response)
}

async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_account_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.bank.account(principal.user_id(), id) {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => domain_error_to_response(e),
    }
}

async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<BalanceChangeRequest>,
) -> axum::response::Response {
    let id = match parse_account_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.bank.deposit(principal.user_id(), id, body.amount) {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => domain_error_to_response(e),
    }
}

async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<BalanceChangeRequest>,
) -> axum::response::Response {
    let id = match parse_account_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.bank.withdraw(principal.user_id(), id, body.amount) {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => domain_error_to_response(e),
    }
}

async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<TransferRequestBody>,
) -> axum::response::Response {
    match services.bank.transfer(principal.user_id(), body.into()) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => domain_error_to_response(e),
    }
}

async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateUserRequest>,
) -> axum::response::Response {
    if !principal.is_admin() {
        return json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "administrator role required",
        );
    }

    let hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hashing_error",
                "service failure",
            );
        }
    };

    match services.bank.register_user(&body.username, &hash) {
        Ok(user) => (StatusCode::OK, Json(CreatedUserResponse::from(user))).into_response(),
        Err(e) => domain_error_to_response(e),
    }
}

async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if !principal.is_user() {
        return json_error(StatusCode::FORBIDDEN, "forbidden", "user role required");
    }

    let profiles: Vec<UserProfileResponse> = services
        .users
        .list()
        .into_iter()
        .filter(|u| u.is_banking_user())
        .map(|u| {
            let accounts = services.bank.accounts_of(u.id);
            UserProfileResponse::new(u, accounts)
        })
        .collect();

    (StatusCode::OK, Json(profiles)).into_response()
}

async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    match services.users.get(principal.user_id()) {
        Some(user) => {
            let accounts = services.bank.accounts_of(user.id);
            (StatusCode::OK, Json(UserProfileResponse::new(user, accounts))).into_response()
        }
        None => json_error(StatusCode::NOT_FOUND, "user_not_found", "user not found"),
    }
}
