//! # Backend crate
//!
//! The budgeting engine behind the app: income, budget categories,
//! expenses, reports and profiles, exposed over a REST API.
//!
//! The crate follows a layered architecture:
//! - **Domain**: the budgeting rules (allocation validation, spend
//!   aggregation, income composition) and orchestrating services
//! - **Storage**: trait-based stores with SQLite and filesystem-blob
//!   implementations
//! - **IO**: the axum REST surface
//!
//! All state lives in the stores; services recompute from a fresh
//! snapshot on every call, so there is no cache to invalidate.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::domain::{
    CategoryService, ExpenseService, IncomeService, ProfileService, ReportService,
};
use crate::storage::sqlite::{
    DbConnection, SqliteCategoryRepository, SqliteExpenseRepository, SqliteIncomeRepository,
    SqliteProfileRepository,
};
use crate::storage::{CategoryStore, ExpenseStore, FsBlobStore, IncomeStore, ProfileStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub category_service: Arc<CategoryService>,
    pub expense_service: Arc<ExpenseService>,
    pub income_service: Arc<IncomeService>,
    pub report_service: Arc<ReportService>,
    pub profile_service: Arc<ProfileService>,
}

impl AppState {
    /// Wire the services over a database connection and media directory.
    pub fn new(db: DbConnection, media_dir: impl Into<PathBuf>) -> Self {
        let categories: Arc<dyn CategoryStore> = Arc::new(SqliteCategoryRepository::new(db.clone()));
        let expenses: Arc<dyn ExpenseStore> = Arc::new(SqliteExpenseRepository::new(db.clone()));
        let incomes: Arc<dyn IncomeStore> = Arc::new(SqliteIncomeRepository::new(db.clone()));
        let profiles: Arc<dyn ProfileStore> = Arc::new(SqliteProfileRepository::new(db));
        let blobs = Arc::new(FsBlobStore::new(media_dir));

        Self {
            category_service: Arc::new(CategoryService::new(
                categories.clone(),
                expenses.clone(),
                incomes.clone(),
                profiles.clone(),
            )),
            expense_service: Arc::new(ExpenseService::new(expenses.clone(), categories.clone())),
            income_service: Arc::new(IncomeService::new(
                incomes,
                categories.clone(),
                expenses.clone(),
                profiles.clone(),
            )),
            report_service: Arc::new(ReportService::new(categories, expenses)),
            profile_service: Arc::new(ProfileService::new(profiles, blobs)),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(db_url: &str, media_dir: &Path) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(db_url).await?;

    info!("Setting up domain services");
    Ok(AppState::new(db, media_dir))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, media_dir: &Path) -> Router {
    // CORS setup to allow the app frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/users/:user_id/categories",
            get(io::rest::category_apis::list_categories)
                .post(io::rest::category_apis::write_category),
        )
        .route(
            "/users/:user_id/categories/recommended",
            post(io::rest::category_apis::create_recommended_categories),
        )
        .route(
            "/users/:user_id/categories/:category_id",
            axum::routing::delete(io::rest::category_apis::delete_category),
        )
        .route(
            "/users/:user_id/categories/:category_id/expenses",
            get(io::rest::expense_apis::list_category_expenses),
        )
        .route(
            "/users/:user_id/expenses",
            get(io::rest::expense_apis::list_expenses).post(io::rest::expense_apis::create_expense),
        )
        .route(
            "/users/:user_id/expenses/:expense_id",
            axum::routing::put(io::rest::expense_apis::update_expense)
                .delete(io::rest::expense_apis::delete_expense),
        )
        .route(
            "/users/:user_id/incomes",
            get(io::rest::income_apis::list_incomes).post(io::rest::income_apis::create_income),
        )
        .route(
            "/users/:user_id/incomes/summary",
            get(io::rest::income_apis::income_summary),
        )
        .route(
            "/users/:user_id/repayments",
            get(io::rest::income_apis::upcoming_repayments)
                .post(io::rest::income_apis::log_repayment),
        )
        .route(
            "/users/:user_id/reports",
            get(io::rest::report_apis::get_reports),
        )
        .route(
            "/users/:user_id/profile",
            get(io::rest::profile_apis::get_profile).put(io::rest::profile_apis::update_profile),
        )
        .route(
            "/users/:user_id/profile/image",
            post(io::rest::profile_apis::upload_profile_image),
        );

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(cors)
        .with_state(app_state)
}
