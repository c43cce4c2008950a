//! Mock IBGE localities server
//!
//! Canned stand-in for the public IBGE API for offline runs of `register`.
//!
//! Routes:
//! - GET /estados
//! - GET /estados/{uf}/municipios
//!
//! Usage:
//!   cargo run --bin mock_ibge -- --port 8001

use bytes::Bytes;
use clap::Parser;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mock_ibge")]
#[command(about = "Mock IBGE localities API for local runs")]
struct Args {
    /// TCP port to listen on
    #[arg(short, long, default_value = "8001")]
    port: u16,
}

/// Canned UF list: (code, name)
const UFS: [(&str, &str); 3] =
    [("SP", "São Paulo"), ("RJ", "Rio de Janeiro"), ("MG", "Minas Gerais")];

/// Canned municipalities per UF
const CITIES: [(&str, &[&str]); 3] = [
    ("SP", &["São Paulo", "Sorocaba", "Campinas"]),
    ("RJ", &["Rio de Janeiro", "Niterói"]),
    ("MG", &["Belo Horizonte", "Uberlândia"]),
];

fn estados_body() -> String {
    let records: Vec<serde_json::Value> = UFS
        .iter()
        .map(|&(sigla, nome)| serde_json::json!({ "sigla": sigla, "nome": nome }))
        .collect();
    serde_json::to_string(&records).expect("static body should not fail")
}

/// Unknown UFs get an empty list, like the real API
fn municipios_body(uf: &str) -> String {
    let names: &[&str] = CITIES
        .iter()
        .find(|&&(code, _)| code == uf)
        .map(|&(_, names)| names)
        .unwrap_or(&[]);
    let records: Vec<serde_json::Value> =
        names.iter().map(|&nome| serde_json::json!({ "nome": nome })).collect();
    serde_json::to_string(&records).expect("static body should not fail")
}

/// Extract the UF from a /estados/{uf}/municipios path
fn municipios_uf(path: &str) -> Option<&str> {
    path.strip_prefix("/estados/")?.strip_suffix("/municipios")
}

fn json_response(body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response should not fail")
}

fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::from("Not Found")))
        .expect("static response should not fail")
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    if req.method() != Method::GET {
        return Ok(not_found());
    }

    let path = req.uri().path();
    if path == "/estados" {
        info!("estados_requested");
        return Ok(json_response(estados_body()));
    }
    if let Some(uf) = municipios_uf(path) {
        info!(uf = %uf, "municipios_requested");
        return Ok(json_response(municipios_body(uf)));
    }
    Ok(not_found())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    let args = Args::parse();
    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!(port = %args.port, "mock_ibge_started");

    loop {
        let (stream, _addr) = listener.accept().await?;
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(e) =
                http1::Builder::new().serve_connection(io, service_fn(handle_request)).await
            {
                error!(error = %e, "mock_ibge_http_error");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_municipios_uf_parse() {
        assert_eq!(municipios_uf("/estados/SP/municipios"), Some("SP"));
        assert_eq!(municipios_uf("/estados"), None);
        assert_eq!(municipios_uf("/estados/SP"), None);
    }

    #[test]
    fn test_estados_body_shape() {
        let body = estados_body();
        assert!(body.contains(r#""sigla":"SP""#));
        assert!(body.contains(r#""sigla":"MG""#));
    }

    #[test]
    fn test_unknown_uf_is_empty_list() {
        assert_eq!(municipios_body("XX"), "[]");
        assert!(municipios_body("RJ").contains("Niterói"));
    }
}
