//! Tests for the registration form state machine

use super::*;
use crate::domain::point::NewPoint;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc::error::TryRecvError;

/// Test backend that records created points and can be told to fail
struct MockApi {
    created: Mutex<Vec<NewPoint>>,
    fail: AtomicBool,
}

impl MockApi {
    fn new() -> Self {
        Self { created: Mutex::new(Vec::new()), fail: AtomicBool::new(false) }
    }

    fn created(&self) -> Vec<NewPoint> {
        self.created.lock().unwrap().clone()
    }

    fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PointsApi for MockApi {
    async fn fetch_items(&self) -> anyhow::Result<Vec<CatalogItem>> {
        Ok(vec![CatalogItem {
            id: ItemId(3),
            title: "Papéis e Papelão".to_string(),
            image_url: "http://localhost:3333/uploads/papeis-papelao.svg".to_string(),
        }])
    }

    async fn create_point(&self, point: &NewPoint) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        self.created.lock().unwrap().push(point.clone());
        Ok(())
    }
}

/// Test harness that keeps the city-fetch receiver alive so `try_send`
/// succeeds
struct TestForm {
    form: RegistrationForm,
    city_fetch_rx: mpsc::Receiver<CityFetch>,
    api: Arc<MockApi>,
}

impl std::ops::Deref for TestForm {
    type Target = RegistrationForm;
    fn deref(&self) -> &Self::Target {
        &self.form
    }
}

impl std::ops::DerefMut for TestForm {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.form
    }
}

fn create_test_form() -> TestForm {
    let (city_fetch_tx, city_fetch_rx) = mpsc::channel(8);
    let api = Arc::new(MockApi::new());
    let form = RegistrationForm::new(api.clone(), city_fetch_tx);
    TestForm { form, city_fetch_rx, api }
}

#[tokio::test]
async fn test_toggle_item_adds_then_removes() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::ToggleItem(ItemId(3))).await;
    assert_eq!(harness.selected_items, vec![ItemId(3)]);

    harness.process_event(FormEvent::ToggleItem(ItemId(5))).await;
    assert_eq!(harness.selected_items, vec![ItemId(3), ItemId(5)]);

    harness.process_event(FormEvent::ToggleItem(ItemId(3))).await;
    assert_eq!(harness.selected_items, vec![ItemId(5)]);
}

#[tokio::test]
async fn test_double_toggle_restores_original_set() {
    let mut harness = create_test_form();
    harness.process_event(FormEvent::ToggleItem(ItemId(1))).await;
    let before = harness.selected_items.clone();

    harness.process_event(FormEvent::ToggleItem(ItemId(2))).await;
    harness.process_event(FormEvent::ToggleItem(ItemId(2))).await;

    assert_eq!(harness.selected_items, before);
}

#[tokio::test]
async fn test_sentinel_uf_never_issues_city_fetch() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::SelectUf(NO_SELECTION.to_string())).await;

    assert_eq!(harness.selected_uf, NO_SELECTION);
    assert!(matches!(harness.city_fetch_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_select_uf_issues_exactly_one_fetch() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::SelectUf("SP".to_string())).await;

    assert_eq!(harness.city_fetch_rx.try_recv().unwrap(), CityFetch { uf: "SP".to_string() });
    assert!(matches!(harness.city_fetch_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_every_uf_change_reissues_fetch() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::SelectUf("SP".to_string())).await;
    harness.process_event(FormEvent::SelectUf("RJ".to_string())).await;

    assert_eq!(harness.city_fetch_rx.try_recv().unwrap(), CityFetch { uf: "SP".to_string() });
    assert_eq!(harness.city_fetch_rx.try_recv().unwrap(), CityFetch { uf: "RJ".to_string() });
}

#[tokio::test]
async fn test_superseded_city_list_is_dropped() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::SelectUf("SP".to_string())).await;
    harness.process_event(FormEvent::SelectUf("RJ".to_string())).await;

    // The SP fetch resolves after RJ was selected: stale, must not apply
    harness
        .process_event(FormEvent::CitiesLoaded {
            uf: "SP".to_string(),
            cities: vec!["Sorocaba".to_string()],
        })
        .await;
    assert!(harness.cities.is_empty());

    harness
        .process_event(FormEvent::CitiesLoaded {
            uf: "RJ".to_string(),
            cities: vec!["Niterói".to_string()],
        })
        .await;
    assert_eq!(harness.cities, vec!["Niterói"]);
}

#[tokio::test]
async fn test_city_selection_carries_over_on_uf_change() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::SelectUf("SP".to_string())).await;
    harness.process_event(FormEvent::SelectCity("Sorocaba".to_string())).await;
    harness.process_event(FormEvent::SelectUf("RJ".to_string())).await;

    // Only the list refreshes; the selected name is kept
    assert_eq!(harness.selected_city, "Sorocaba");
}

#[tokio::test]
async fn test_map_click_overwrites_selected_position() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::MapClick(Coordinates::new(-23.5, -47.4))).await;
    assert_eq!(harness.selected_position, Coordinates::new(-23.5, -47.4));

    harness.process_event(FormEvent::MapClick(Coordinates::new(10.0, 20.0))).await;
    assert_eq!(harness.selected_position, Coordinates::new(10.0, 20.0));
}

#[tokio::test]
async fn test_position_resolved_sets_initial_center_only() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::PositionResolved(Coordinates::new(-23.49, -47.40))).await;

    assert_eq!(harness.initial_position, Coordinates::new(-23.49, -47.40));
    assert_eq!(harness.selected_position, Coordinates::default());
}

#[tokio::test]
async fn test_edit_fields() {
    let mut harness = create_test_form();

    harness
        .process_event(FormEvent::EditField { field: Field::Name, value: "Test".to_string() })
        .await;
    harness
        .process_event(FormEvent::EditField {
            field: Field::Email,
            value: "test@example.com".to_string(),
        })
        .await;
    harness
        .process_event(FormEvent::EditField {
            field: Field::Whatsapp,
            value: "+5511999999999".to_string(),
        })
        .await;

    assert_eq!(harness.contact.name, "Test");
    assert_eq!(harness.contact.email, "test@example.com");
    assert_eq!(harness.contact.whatsapp, "+5511999999999");
}

#[tokio::test]
async fn test_submit_with_untouched_form_uses_defaults() {
    let mut harness = create_test_form();

    let done = harness.process_event(FormEvent::Submit).await;
    assert!(done);

    let created = harness.api.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].uf, NO_SELECTION);
    assert_eq!(created[0].city, NO_SELECTION);
    assert_eq!(created[0].latitude, 0.0);
    assert_eq!(created[0].longitude, 0.0);
    assert!(created[0].items.is_empty());
    assert!(created[0].name.is_empty());
}

#[tokio::test]
async fn test_submit_failure_yields_failed_outcome() {
    let mut harness = create_test_form();
    harness.api.fail_next();

    let done = harness.process_event(FormEvent::Submit).await;
    assert!(done);

    assert!(harness.api.created().is_empty());
    assert!(matches!(
        harness.last_submission(),
        Some(SubmissionOutcome::Failed { error }) if error.contains("connection refused")
    ));
}

#[tokio::test]
async fn test_full_registration_flow() {
    let mut harness = create_test_form();

    harness.process_event(FormEvent::UfsLoaded(vec!["SP".to_string()])).await;
    harness.process_event(FormEvent::SelectUf("SP".to_string())).await;
    assert_eq!(harness.city_fetch_rx.try_recv().unwrap(), CityFetch { uf: "SP".to_string() });

    harness
        .process_event(FormEvent::CitiesLoaded {
            uf: "SP".to_string(),
            cities: vec!["Sorocaba".to_string()],
        })
        .await;
    assert_eq!(harness.cities, vec!["Sorocaba"]);

    harness.process_event(FormEvent::SelectCity("Sorocaba".to_string())).await;
    harness.process_event(FormEvent::MapClick(Coordinates::new(-23.5, -47.4))).await;
    harness.process_event(FormEvent::ToggleItem(ItemId(3))).await;
    harness
        .process_event(FormEvent::EditField { field: Field::Name, value: "Test".to_string() })
        .await;

    let done = harness.process_event(FormEvent::Submit).await;
    assert!(done);

    let expected = NewPoint {
        name: "Test".to_string(),
        email: String::new(),
        whatsapp: String::new(),
        uf: "SP".to_string(),
        city: "Sorocaba".to_string(),
        latitude: -23.5,
        longitude: -47.4,
        items: vec![ItemId(3)],
    };
    assert_eq!(harness.api.created(), vec![expected.clone()]);
    assert!(matches!(
        harness.last_submission(),
        Some(SubmissionOutcome::Accepted { point }) if *point == expected
    ));
}
