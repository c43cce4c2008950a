//! Event handlers for the registration form
//!
//! Each handler processes one event, updating form state and triggering
//! side effects (the dependent city fetch, the submit request).

use super::{CityFetch, RegistrationForm, SubmissionOutcome};
use crate::domain::types::{CatalogItem, Coordinates, Field, ItemId, NO_SELECTION};
use tracing::{debug, error, info, warn};

impl RegistrationForm {
    /// Apply the one-shot device position
    pub(crate) fn handle_position_resolved(&mut self, position: Coordinates) {
        self.initial_position = position;
        debug!(position = %position, "initial_position_resolved");
    }

    pub(crate) fn handle_items_loaded(&mut self, items: Vec<CatalogItem>) {
        info!(count = items.len(), "item_catalog_loaded");
        self.items = items;
    }

    pub(crate) fn handle_ufs_loaded(&mut self, ufs: Vec<String>) {
        info!(count = ufs.len(), "uf_list_loaded");
        self.ufs = ufs;
    }

    /// Apply a completed city fetch
    ///
    /// Applied only while the fetch's UF still matches the current selection;
    /// a fetch superseded by a newer selection is dropped, so the city list
    /// always reflects the most recently selected UF.
    pub(crate) fn handle_cities_loaded(&mut self, uf: &str, cities: Vec<String>) {
        if uf != self.selected_uf {
            info!(stale_uf = %uf, selected_uf = %self.selected_uf, "city_list_superseded");
            return;
        }
        info!(uf = %uf, count = cities.len(), "city_list_loaded");
        self.cities = cities;
    }

    /// Set the UF selection and issue the dependent city fetch
    ///
    /// The sentinel suppresses the fetch. The previously selected city is
    /// kept; only the city list refreshes once the fetch resolves.
    pub(crate) fn handle_select_uf(&mut self, code: String) {
        self.selected_uf = code;

        if self.selected_uf == NO_SELECTION {
            debug!("city_fetch_suppressed");
            return;
        }

        let fetch = CityFetch { uf: self.selected_uf.clone() };
        if self.city_fetch_tx.try_send(fetch).is_err() {
            warn!(uf = %self.selected_uf, "city_fetch_dropped");
            return;
        }
        info!(uf = %self.selected_uf, "city_fetch_issued");
    }

    /// Set the city selection; not validated against the fetched list
    pub(crate) fn handle_select_city(&mut self, name: String) {
        self.selected_city = name;
        debug!(city = %self.selected_city, "city_selected");
    }

    /// Overwrite the selected point unconditionally; no bounds checking
    pub(crate) fn handle_map_click(&mut self, position: Coordinates) {
        self.selected_position = position;
        debug!(position = %position, "map_clicked");
    }

    pub(crate) fn handle_edit_field(&mut self, field: Field, value: String) {
        debug!(field = field.as_str(), "field_edited");
        match field {
            Field::Name => self.contact.name = value,
            Field::Email => self.contact.email = value,
            Field::Whatsapp => self.contact.whatsapp = value,
        }
    }

    /// Symmetric toggle: select if absent, remove if present
    pub(crate) fn handle_toggle_item(&mut self, id: ItemId) {
        if let Some(index) = self.selected_items.iter().position(|&item| item == id) {
            self.selected_items.remove(index);
            debug!(item = %id, "item_deselected");
        } else {
            self.selected_items.push(id);
            debug!(item = %id, "item_selected");
        }
    }

    /// Assemble and send the submission record
    ///
    /// Both arms are observable: acceptance ends the session, failure is
    /// logged and surfaced through the outcome.
    pub(crate) async fn handle_submit(&mut self) {
        let point = self.assemble_record();

        let outcome = match self.api.create_point(&point).await {
            Ok(()) => {
                info!(
                    name = %point.name,
                    uf = %point.uf,
                    city = %point.city,
                    items = ?point.items,
                    "point_submitted"
                );
                SubmissionOutcome::Accepted { point }
            }
            Err(e) => {
                error!(error = %e, "point_submit_failed");
                SubmissionOutcome::Failed { error: e.to_string() }
            }
        };

        self.last_submission = Some(outcome);
    }
}
