mod handlers;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        // Employees
        .route("/employees", get(handlers::list_employees))
        .route("/employees", post(handlers::hire_employee))
        .route("/employees/employed", get(handlers::list_employed))
        .route("/employees/seed", post(handlers::seed_employees))
        .route("/employees/{id}", get(handlers::get_employee))
        .route("/employees/{id}", delete(handlers::delete_employee))
        .route("/employees/{id}/fire", patch(handlers::fire_employee))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
