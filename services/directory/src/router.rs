use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use staffdesk_core::middleware::{propagate_request_id_layer, set_request_id_layer};

use crate::handlers::{
    changes::get_changes,
    employee::{
        archive_employee, create_employee, delete_employee, get_employee, get_employees,
        update_employee,
    },
    health::{healthz, readyz},
    session::{login, whoami},
    task::{create_task, delete_task, get_my_tasks, get_tasks, update_task},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/session", post(login))
        .route("/session", get(whoami))
        // Employees
        .route("/employees", post(create_employee))
        .route("/employees", get(get_employees))
        .route("/employees/@me/tasks", get(get_my_tasks))
        .route("/employees/{id}", get(get_employee))
        .route("/employees/{id}", patch(update_employee))
        .route("/employees/{id}/archive", post(archive_employee))
        .route("/employees/{id}", delete(delete_employee))
        // Tasks
        .route("/tasks", post(create_task))
        .route("/tasks", get(get_tasks))
        .route("/tasks/{id}", patch(update_task))
        .route("/tasks/{id}", delete(delete_task))
        // Change feed
        .route("/changes", get(get_changes))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
        .with_state(state)
}
