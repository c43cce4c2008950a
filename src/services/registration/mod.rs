//! Collection point registration form state machine
//!
//! The form is the central event processor that coordinates:
//! - Reference data loading (item catalog, UF list, dependent city list)
//! - Device position resolution and map position selection
//! - Contact field edits and item toggling
//! - Submission of the assembled record to the backend

mod handlers;
#[cfg(test)]
mod tests;

use crate::domain::point::NewPoint;
use crate::domain::types::{CatalogItem, ContactFields, Coordinates, Field, ItemId, NO_SELECTION};
use crate::io::PointsApi;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events driving the registration form
#[derive(Debug)]
pub enum FormEvent {
    /// One-shot device position resolved
    PositionResolved(Coordinates),
    /// Item catalog fetch completed
    ItemsLoaded(Vec<CatalogItem>),
    /// UF list fetch completed
    UfsLoaded(Vec<String>),
    /// City list fetch completed, tagged with the UF it was issued for
    CitiesLoaded { uf: String, cities: Vec<String> },
    /// User picked a UF from the dropdown
    SelectUf(String),
    /// User picked a city from the dropdown
    SelectCity(String),
    /// User clicked the map
    MapClick(Coordinates),
    /// User edited a contact field
    EditField { field: Field, value: String },
    /// User toggled a catalog item
    ToggleItem(ItemId),
    /// User submitted the form
    Submit,
}

/// Dependent city-list fetch request, issued on UF selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFetch {
    pub uf: String,
}

/// Outcome of a submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The backend accepted the record; the form session is over
    Accepted { point: NewPoint },
    /// The create request failed; the form state is unchanged
    Failed { error: String },
}

/// Registration form state machine
///
/// All state is owned here and mutated only by the event handlers, one
/// event at a time.
pub struct RegistrationForm {
    /// Item catalog (empty until loaded)
    pub(crate) items: Vec<CatalogItem>,
    /// UF dropdown entries (empty until loaded)
    pub(crate) ufs: Vec<String>,
    /// City dropdown entries from the most recently applied fetch
    pub(crate) cities: Vec<String>,
    /// Current UF selection (sentinel until picked)
    pub(crate) selected_uf: String,
    /// Current city selection (sentinel until picked)
    pub(crate) selected_city: String,
    /// Initial map center from the device position
    pub(crate) initial_position: Coordinates,
    /// Selected point from map clicks
    pub(crate) selected_position: Coordinates,
    /// Free-text contact fields
    pub(crate) contact: ContactFields,
    /// Toggled-on catalog items, in toggle order
    pub(crate) selected_items: Vec<ItemId>,
    /// Channel to the city-fetch worker
    pub(crate) city_fetch_tx: mpsc::Sender<CityFetch>,
    /// Backend used at submit time
    pub(crate) api: Arc<dyn PointsApi>,
    /// Outcome of the last submission attempt
    pub(crate) last_submission: Option<SubmissionOutcome>,
}

impl RegistrationForm {
    pub fn new(api: Arc<dyn PointsApi>, city_fetch_tx: mpsc::Sender<CityFetch>) -> Self {
        Self {
            items: Vec::new(),
            ufs: Vec::new(),
            cities: Vec::new(),
            selected_uf: NO_SELECTION.to_string(),
            selected_city: NO_SELECTION.to_string(),
            initial_position: Coordinates::default(),
            selected_position: Coordinates::default(),
            contact: ContactFields::default(),
            selected_items: Vec::new(),
            city_fetch_tx,
            api,
            last_submission: None,
        }
    }

    /// Run the form session, consuming events until a submission attempt
    /// completes or the channel closes
    pub async fn run(
        &mut self,
        mut event_rx: mpsc::Receiver<FormEvent>,
    ) -> Option<SubmissionOutcome> {
        while let Some(event) = event_rx.recv().await {
            if self.process_event(event).await {
                break;
            }
        }
        self.last_submission.clone()
    }

    /// Process a single event, dispatching to the appropriate handler
    ///
    /// Returns true once a submission attempt has completed.
    pub async fn process_event(&mut self, event: FormEvent) -> bool {
        match event {
            FormEvent::PositionResolved(position) => self.handle_position_resolved(position),
            FormEvent::ItemsLoaded(items) => self.handle_items_loaded(items),
            FormEvent::UfsLoaded(ufs) => self.handle_ufs_loaded(ufs),
            FormEvent::CitiesLoaded { uf, cities } => self.handle_cities_loaded(&uf, cities),
            FormEvent::SelectUf(code) => self.handle_select_uf(code),
            FormEvent::SelectCity(name) => self.handle_select_city(name),
            FormEvent::MapClick(position) => self.handle_map_click(position),
            FormEvent::EditField { field, value } => self.handle_edit_field(field, value),
            FormEvent::ToggleItem(id) => self.handle_toggle_item(id),
            FormEvent::Submit => {
                self.handle_submit().await;
                return true;
            }
        }
        false
    }

    /// Assemble the submission record from the current state
    pub fn assemble_record(&self) -> NewPoint {
        NewPoint {
            name: self.contact.name.clone(),
            email: self.contact.email.clone(),
            whatsapp: self.contact.whatsapp.clone(),
            uf: self.selected_uf.clone(),
            city: self.selected_city.clone(),
            latitude: self.selected_position.latitude,
            longitude: self.selected_position.longitude,
            items: self.selected_items.clone(),
        }
    }

    /// Outcome of the last submission attempt, if any
    pub fn last_submission(&self) -> Option<&SubmissionOutcome> {
        self.last_submission.as_ref()
    }

    /// Loaded item catalog, for rendering the selectable grid
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Loaded UF dropdown entries
    pub fn ufs(&self) -> &[String] {
        &self.ufs
    }

    /// City dropdown entries for the current UF
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Initial map center from the device position
    pub fn initial_position(&self) -> Coordinates {
        self.initial_position
    }
}
