//! Backend HTTP API
//!
//! Serves the static user list, the waste item catalog, and accepts
//! collection point submissions. Uses hyper for the HTTP server.

use crate::domain::point::NewPoint;
use crate::domain::types::{CatalogItem, ItemId};
use crate::infra::metrics::{Metrics, MetricsSummary};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Fixed user list served by /users
const USERS: [&str; 3] = ["Lucas", "Gustavo", "Diego"];

/// Waste item catalog: (id, title, image file under /uploads)
const ITEM_CATALOG: [(i64, &str, &str); 6] = [
    (1, "Lâmpadas", "lampadas.svg"),
    (2, "Pilhas e Baterias", "baterias.svg"),
    (3, "Papéis e Papelão", "papeis-papelao.svg"),
    (4, "Resíduos Eletrônicos", "eletronicos.svg"),
    (5, "Resíduos Orgânicos", "organicos.svg"),
    (6, "Óleo de Cozinha", "oleo.svg"),
];

/// Shared request-handling state
pub struct AppState {
    metrics: Arc<Metrics>,
    public_url: String,
    next_point_id: AtomicU64,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, public_url: String) -> Self {
        Self { metrics, public_url, next_point_id: AtomicU64::new(1) }
    }
}

/// Build the catalog with image links under the configured public URL
fn catalog_items(public_url: &str) -> Vec<CatalogItem> {
    ITEM_CATALOG
        .iter()
        .map(|&(id, title, image)| CatalogItem {
            id: ItemId(id),
            title: title.to_string(),
            image_url: format!("{}/uploads/{}", public_url, image),
        })
        .collect()
}

/// Write a counter metric in Prometheus text exposition format
fn write_counter(output: &mut String, name: &str, help: &str, val: u64) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} counter");
    let _ = writeln!(output, "{name} {val}");
}

/// Format the service counters in Prometheus text exposition format
fn render_prometheus(summary: &MetricsSummary) -> String {
    let mut output = String::with_capacity(1024);
    write_counter(
        &mut output,
        "coleta_users_requests_total",
        "Total /users requests served",
        summary.users_requests,
    );
    write_counter(
        &mut output,
        "coleta_items_requests_total",
        "Total /items requests served",
        summary.items_requests,
    );
    write_counter(
        &mut output,
        "coleta_points_created_total",
        "Total collection points accepted",
        summary.points_created,
    );
    write_counter(
        &mut output,
        "coleta_points_rejected_total",
        "Total submissions rejected with an unparsable body",
        summary.points_rejected,
    );
    output
}

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response should not fail")
}

fn invalid_body_response() -> Response<Full<Bytes>> {
    json_response(StatusCode::BAD_REQUEST, r#"{"ok":false,"error":"invalid_body"}"#.to_string())
}

/// Handle POST /points: parse the submission record, assign an id, log it
async fn handle_create_point<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "point_body_read_failed");
            state.metrics.record_point_rejected();
            return invalid_body_response();
        }
    };

    match serde_json::from_slice::<NewPoint>(&body) {
        Ok(point) => {
            let id = state.next_point_id.fetch_add(1, Ordering::Relaxed);
            state.metrics.record_point_created();
            info!(
                id = id,
                name = %point.name,
                uf = %point.uf,
                city = %point.city,
                latitude = point.latitude,
                longitude = point.longitude,
                items = ?point.items,
                "point_created"
            );
            json_response(StatusCode::CREATED, format!(r#"{{"ok":true,"id":{}}}"#, id))
        }
        Err(e) => {
            warn!(error = %e, "point_body_invalid");
            state.metrics.record_point_rejected();
            invalid_body_response()
        }
    }
}

/// Handle HTTP requests
///
/// Generic over the request body so routes can be exercised in tests with
/// `Full<Bytes>` bodies.
pub(crate) async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    if req.method() == Method::POST && req.uri().path() == "/points" {
        return Ok(handle_create_point(req, &state).await);
    }

    match (req.method(), req.uri().path()) {
        (&Method::GET, "/users") => {
            state.metrics.record_users_request();
            info!("user_list_requested");
            let body = serde_json::to_string(&USERS).expect("static body should not fail");
            Ok(json_response(StatusCode::OK, body))
        }
        (&Method::GET, "/items") => {
            state.metrics.record_items_request();
            info!("item_catalog_requested");
            let body = serde_json::to_string(&catalog_items(&state.public_url))
                .expect("static catalog should not fail");
            Ok(json_response(StatusCode::OK, body))
        }
        (&Method::GET, "/health") => Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from("ok")))
            .expect("static response should not fail")),
        (&Method::GET, "/metrics") => {
            let body = render_prometheus(&state.metrics.report());
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
                .body(Full::new(Bytes::from(body)))
                .expect("static response should not fail"))
        }
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .expect("static response should not fail")),
    }
}

/// Start the backend API HTTP server
pub async fn start_api_server(
    bind_address: &str,
    port: u16,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", bind_address, port);
    let listener = TcpListener::bind(&addr).await?;

    info!(addr = %addr, "api_server_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let state = state.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let state = state.clone();
                                async move { handle_request(req, state).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(error = %e, "api_http_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "api_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("api_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}
