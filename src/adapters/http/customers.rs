//! Customers HTTP server.
//!
//! Thin transport layer over `CustomerService`: route wiring, input
//! framing, and error-to-status mapping. No business rules live here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::errors::ServiceError;
use crate::domain::models::{
    Customer, CustomerPage, CustomerPatch, HttpConfig, ListQuery, NewCustomer, TenantStats,
};
use crate::domain::ports::{CacheStore, CustomerRepository};
use crate::services::CustomerService;

/// Query parameters for customer listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Request to create a customer. The tenant comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a service error to a status code. Internal failures are logged
/// with full context and reported with a generic body.
fn error_response(err: ServiceError) -> ApiError {
    let (status, code) = match &err {
        ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        ServiceError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
        return (
            status,
            Json(ErrorResponse {
                error: "internal server error".to_string(),
                code: code.to_string(),
            }),
        );
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}

struct AppState<R: CustomerRepository, C: CacheStore> {
    service: Arc<CustomerService<R, C>>,
}

/// Customers HTTP server.
pub struct CustomersHttpServer<R: CustomerRepository + 'static, C: CacheStore + 'static> {
    config: HttpConfig,
    service: Arc<CustomerService<R, C>>,
}

impl<R: CustomerRepository + 'static, C: CacheStore + 'static> CustomersHttpServer<R, C> {
    pub fn new(service: Arc<CustomerService<R, C>>, config: HttpConfig) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        let state = Arc::new(AppState {
            service: Arc::clone(&self.service),
        });

        let app = Router::new()
            .route(
                "/api/v1/tenants/{tenant_id}/customers",
                get(list_customers::<R, C>).post(create_customer::<R, C>),
            )
            .route(
                "/api/v1/tenants/{tenant_id}/customers/{id}",
                get(get_customer::<R, C>).patch(update_customer::<R, C>),
            )
            .route("/api/v1/tenants/{tenant_id}/stats", get(tenant_stats::<R, C>))
            .route("/health", get(health_check))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("customers HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("customers HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn list_customers<R: CustomerRepository + 'static, C: CacheStore + 'static>(
    State(state): State<Arc<AppState<R, C>>>,
    Path(tenant_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<CustomerPage>, ApiError> {
    let query = ListQuery::new(tenant_id, params.search.as_deref(), params.limit, params.offset);
    state
        .service
        .list_customers(query)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn get_customer<R: CustomerRepository + 'static, C: CacheStore + 'static>(
    State(state): State<Arc<AppState<R, C>>>,
    Path((tenant_id, id)): Path<(String, Uuid)>,
) -> Result<Json<Customer>, ApiError> {
    state
        .service
        .get_customer(id, &tenant_id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn create_customer<R: CustomerRepository + 'static, C: CacheStore + 'static>(
    State(state): State<Arc<AppState<R, C>>>,
    Path(tenant_id): Path<String>,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let new = NewCustomer {
        tenant_id,
        email: body.email,
        password: body.password,
        full_name: body.full_name,
        phone: body.phone,
        address: body.address,
    };

    state
        .service
        .create_customer(new)
        .await
        .map(|customer| (StatusCode::CREATED, Json(customer)))
        .map_err(error_response)
}

async fn update_customer<R: CustomerRepository + 'static, C: CacheStore + 'static>(
    State(state): State<Arc<AppState<R, C>>>,
    Path((tenant_id, id)): Path<(String, Uuid)>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    state
        .service
        .update_customer(id, &tenant_id, patch)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn tenant_stats<R: CustomerRepository + 'static, C: CacheStore + 'static>(
    State(state): State<Arc<AppState<R, C>>>,
    Path(tenant_id): Path<String>,
) -> Result<Json<TenantStats>, ApiError> {
    state
        .service
        .tenant_stats(&tenant_id)
        .await
        .map(Json)
        .map_err(error_response)
}
