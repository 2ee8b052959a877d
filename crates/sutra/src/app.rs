use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{
        attendance::{
            delete_attendance, employee_attendance, list_attendance, mark_attendance,
            update_attendance,
        },
        dashboard::{attendance_summary, summary},
        employees::{
            create_employee, delete_employee, get_employee, list_employees, update_employee,
        },
        health::{health, root},
    },
    models::ErrorResponse,
    state::AppState,
};

static PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let api_routes = Router::new()
        // Employee routes
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{employee_id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        // Attendance routes
        .route("/attendance", get(list_attendance).post(mark_attendance))
        .route(
            "/attendance/{id}",
            get(employee_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
        // Dashboard routes
        .route("/dashboard/summary", get(summary))
        .route("/dashboard/attendance-summary", get(attendance_summary));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(process_time))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Stamps every response with its handling time in seconds.
async fn process_time(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(request).await;
    let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        response
            .headers_mut()
            .insert(PROCESS_TIME_HEADER.clone(), value);
    }
    response
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Resource not found")),
    )
}
