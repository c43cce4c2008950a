//! Registration form client
//!
//! Drives one full form session against the backend and the IBGE API:
//! spawns the independent startup lookups (device position, item catalog,
//! UF list) and a city-fetch worker, feeds the scripted selections from
//! the command line, submits, and reports the outcome.
//!
//! Usage:
//!   cargo run --bin register -- --uf SP --city Sorocaba \
//!       --lat -23.5 --lng -47.4 --item 3 --name "Test"

use clap::Parser;
use coleta_poc::domain::types::{Coordinates, Field, ItemId};
use coleta_poc::infra::Config;
use coleta_poc::io::{
    ApiClient, ConfiguredLocation, IbgeClient, LocalityProvider, LocationProvider, PointsApi,
};
use coleta_poc::services::{CityFetch, FormEvent, RegistrationForm, SubmissionOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// register - Create a collection point through the form engine
#[derive(Parser, Debug)]
#[command(name = "register", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// UF code for the collection point
    #[arg(long, default_value = "0")]
    uf: String,

    /// City name for the collection point
    #[arg(long, default_value = "0")]
    city: String,

    /// Map click latitude
    #[arg(long)]
    lat: Option<f64>,

    /// Map click longitude
    #[arg(long)]
    lng: Option<f64>,

    /// Catalog item ids to toggle on (repeatable)
    #[arg(long = "item")]
    items: Vec<i64>,

    /// Entity name
    #[arg(long, default_value = "")]
    name: String,

    /// Contact email
    #[arg(long, default_value = "")]
    email: String,

    /// Contact WhatsApp number
    #[arg(long, default_value = "")]
    whatsapp: String,
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
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        api_base_url = %config.api_base_url(),
        ibge_base_url = %config.ibge_base_url(),
        "form_session_started"
    );

    let api: Arc<dyn PointsApi> = Arc::new(ApiClient::new(&config)?);
    let localities = Arc::new(IbgeClient::new(&config)?);
    let location = ConfiguredLocation::new(&config);

    let (event_tx, event_rx) = mpsc::channel(64);
    let (city_fetch_tx, mut city_fetch_rx) = mpsc::channel::<CityFetch>(8);

    // Independent startup lookups; completion order does not matter.
    // Each is a single attempt: a failure is logged and produces no event.
    let position_tx = event_tx.clone();
    tokio::spawn(async move {
        if let Some(position) = location.current_position().await {
            let _ = position_tx.send(FormEvent::PositionResolved(position)).await;
        }
    });

    let items_api = api.clone();
    let items_tx = event_tx.clone();
    tokio::spawn(async move {
        match items_api.fetch_items().await {
            Ok(items) => {
                let _ = items_tx.send(FormEvent::ItemsLoaded(items)).await;
            }
            Err(e) => error!(error = %e, "item_catalog_fetch_failed"),
        }
    });

    let ufs_provider = localities.clone();
    let ufs_tx = event_tx.clone();
    tokio::spawn(async move {
        match ufs_provider.fetch_ufs().await {
            Ok(ufs) => {
                let _ = ufs_tx.send(FormEvent::UfsLoaded(ufs)).await;
            }
            Err(e) => error!(error = %e, "uf_list_fetch_failed"),
        }
    });

    // City-fetch worker: one lookup per issued request, results tagged
    // with the UF they were issued for
    let cities_provider = localities.clone();
    let cities_tx = event_tx.clone();
    tokio::spawn(async move {
        while let Some(fetch) = city_fetch_rx.recv().await {
            match cities_provider.fetch_cities(&fetch.uf).await {
                Ok(cities) => {
                    let _ =
                        cities_tx.send(FormEvent::CitiesLoaded { uf: fetch.uf, cities }).await;
                }
                Err(e) => error!(uf = %fetch.uf, error = %e, "city_list_fetch_failed"),
            }
        }
    });

    // Scripted user actions, ending with the submit
    event_tx.send(FormEvent::SelectUf(args.uf)).await?;
    event_tx.send(FormEvent::SelectCity(args.city)).await?;
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        event_tx.send(FormEvent::MapClick(Coordinates::new(lat, lng))).await?;
    }
    for id in args.items {
        event_tx.send(FormEvent::ToggleItem(ItemId(id))).await?;
    }
    event_tx.send(FormEvent::EditField { field: Field::Name, value: args.name }).await?;
    event_tx.send(FormEvent::EditField { field: Field::Email, value: args.email }).await?;
    event_tx
        .send(FormEvent::EditField { field: Field::Whatsapp, value: args.whatsapp })
        .await?;
    event_tx.send(FormEvent::Submit).await?;
    drop(event_tx);

    let mut form = RegistrationForm::new(api, city_fetch_tx);
    match form.run(event_rx).await {
        Some(SubmissionOutcome::Accepted { point }) => {
            info!(uf = %point.uf, city = %point.city, "collection_point_created");
            Ok(())
        }
        Some(SubmissionOutcome::Failed { error }) => {
            error!(error = %error, "collection_point_rejected");
            Err(error.into())
        }
        None => Err("form session ended without a submission".into()),
    }
}
