// ==========================================
// SQLite integration tests
// ==========================================
// Full stack on a temporary database file:
// AppState -> BoqApi -> InstantiationEngine -> Sqlite* repositories
// ==========================================

mod helpers;

use dupa_estimator::api::{ApiError, InstantiateRequest, UpdateQuantityRequest};
use dupa_estimator::app::AppState;
use dupa_estimator::config::config_keys;
use dupa_estimator::domain::types::{MarkupBasis, RateKind};
use dupa_estimator::domain::RateRecord;
use dupa_estimator::engine::{EngineError, EngineRepositories, InstantiateOptions, InstantiationEngine};
use dupa_estimator::logging;
use dupa_estimator::repository::MasterDataRepository;
use helpers::mock_config::MockConfig;
use helpers::mock_repos::{
    InMemoryLineItemRepository, InMemoryProjectRepository, InMemoryTemplateRepository,
};
use helpers::test_data_builder::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

fn open_state() -> (NamedTempFile, AppState) {
    logging::init_test();
    let temp_file = NamedTempFile::new().expect("Failed to create temp db");
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::new(db_path).expect("Failed to init AppState");
    (temp_file, state)
}

fn seed(state: &AppState) {
    state.template_repo.upsert(&reference_template()).unwrap();
    state
        .master_data_repo
        .upsert_labor_rate(&labor_sheet(LOCATION, 100.0, 80.0))
        .unwrap();
    state.master_data_repo.upsert_equipment_rate(&backhoe()).unwrap();
    for price in reference_material_prices() {
        state.master_data_repo.insert_material_price(&price).unwrap();
    }
    state.project_repo.upsert(&reference_project()).unwrap();
}

fn request(quantity: f64) -> InstantiateRequest {
    InstantiateRequest {
        template_id: TEMPLATE_ID.to_string(),
        project_id: PROJECT_ID.to_string(),
        location: LOCATION.to_string(),
        quantity,
        use_evaluated: false,
        active_only: None,
        as_of: Some(as_of()),
    }
}

// ==========================================
// Line item lifecycle
// ==========================================

#[tokio::test]
async fn test_instantiate_and_reload_round_trip() {
    let (_temp_file, state) = open_state();
    seed(&state);

    let item = state.boq_api.instantiate(request(3.0)).await.unwrap();
    assert!(approx_eq(item.direct_cost, EXPECTED_DIRECT_COST));
    assert!(approx_eq(item.unit_cost, EXPECTED_UNIT_COST));

    let loaded = state.boq_api.get_line_item(&item.line_item_id).await.unwrap();
    assert_eq!(loaded, item);

    let listed = state.boq_api.list_line_items(PROJECT_ID).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].line_item_id, item.line_item_id);
}

#[tokio::test]
async fn test_items_survive_reopen() {
    let (temp_file, state) = open_state();
    seed(&state);
    let item = state.boq_api.instantiate(request(2.0)).await.unwrap();
    drop(state);

    let db_path = temp_file.path().to_str().unwrap().to_string();
    let reopened = AppState::new(db_path).unwrap();
    assert_eq!(reopened.schema_version, Some(dupa_estimator::db::CURRENT_SCHEMA_VERSION));
    let loaded = reopened.boq_api.get_line_item(&item.line_item_id).await.unwrap();
    assert_eq!(loaded.total_amount, item.total_amount);
    assert_eq!(loaded.hauling, item.hauling);
}

#[tokio::test]
async fn test_update_quantity_keeps_snapshot() {
    let (_temp_file, state) = open_state();
    seed(&state);
    let item = state.boq_api.instantiate(request(1.0)).await.unwrap();

    // rates move after instantiation
    state
        .master_data_repo
        .upsert_labor_rate(&labor_sheet(LOCATION, 150.0, 120.0))
        .unwrap();

    let updated = state
        .boq_api
        .update_quantity(UpdateQuantityRequest {
            line_item_id: item.line_item_id.clone(),
            quantity: 4.0,
        })
        .await
        .unwrap();

    assert_eq!(updated.quantity, 4.0);
    assert_eq!(updated.unit_cost, item.unit_cost);
    assert_eq!(updated.labor, item.labor);
    assert!(approx_eq(updated.total_amount, item.unit_cost * 4.0));

    let loaded = state.boq_api.get_line_item(&item.line_item_id).await.unwrap();
    assert_eq!(loaded, updated);
}

#[tokio::test]
async fn test_update_and_delete_unknown_item_are_not_found() {
    let (_temp_file, state) = open_state();

    let err = state
        .boq_api
        .update_quantity(UpdateQuantityRequest {
            line_item_id: "missing".to_string(),
            quantity: 1.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = state.boq_api.delete_line_item("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_line_item() {
    let (_temp_file, state) = open_state();
    seed(&state);
    let item = state.boq_api.instantiate(request(1.0)).await.unwrap();

    state.boq_api.delete_line_item(&item.line_item_id).await.unwrap();

    let err = state.boq_api.get_line_item(&item.line_item_id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(state.boq_api.list_line_items(PROJECT_ID).await.unwrap().is_empty());
}

// ==========================================
// Failure paths leave no rows behind
// ==========================================

#[tokio::test]
async fn test_missing_material_price_persists_nothing() {
    let (_temp_file, state) = open_state();
    state.template_repo.upsert(&reference_template()).unwrap();
    state
        .master_data_repo
        .upsert_labor_rate(&labor_sheet(LOCATION, 100.0, 80.0))
        .unwrap();
    state.master_data_repo.upsert_equipment_rate(&backhoe()).unwrap();
    state.project_repo.upsert(&reference_project()).unwrap();

    let err = state.boq_api.instantiate(request(1.0)).await.unwrap_err();
    assert!(matches!(err, ApiError::RateUnavailable(_)));
    assert!(state.boq_api.list_line_items(PROJECT_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_request_is_rejected_up_front() {
    let (_temp_file, state) = open_state();
    seed(&state);

    let mut bad = request(1.0);
    bad.location = "  ".to_string();
    let err = state.boq_api.instantiate(bad).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "location"));
}

// ==========================================
// Configuration
// ==========================================

#[tokio::test]
async fn test_evaluated_markup_follows_config() {
    let (_temp_file, state) = open_state();
    seed(&state);

    let mut evaluated = request(1.0);
    evaluated.use_evaluated = true;

    let item = state.boq_api.instantiate(evaluated.clone()).await.unwrap();
    assert_eq!(item.markup_basis, MarkupBasis::Evaluated);

    state
        .config_manager
        .set_config_value(config_keys::ALLOW_EVALUATED_MARKUP, "false")
        .unwrap();
    let err = state.boq_api.instantiate(evaluated).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "use_evaluated"));
}

// ==========================================
// Master data lookups
// ==========================================

#[tokio::test]
async fn test_material_price_selection() {
    let (_temp_file, state) = open_state();
    let repo = &state.master_data_repo;
    let jan = chrono::NaiveDate::from_ymd_opt(2026, 1, 1);
    let feb = chrono::NaiveDate::from_ymd_opt(2026, 2, 1);
    let jun = chrono::NaiveDate::from_ymd_opt(2026, 6, 1);

    repo.insert_material_price(&material_price("MAT-GRV", 900.0, None, feb)).unwrap();
    repo.insert_material_price(&material_price("MAT-GRV", 950.0, Some(LOCATION), jan)).unwrap();
    repo.insert_material_price(&material_price("MAT-GRV", 990.0, Some(LOCATION), jun)).unwrap();

    // location-specific beats general; future-dated ignored
    let found = repo
        .find_rate(RateKind::Material, "MAT-GRV", LOCATION, as_of())
        .await
        .unwrap();
    match found {
        Some(RateRecord::Material(price)) => assert_eq!(price.base_price, 950.0),
        other => panic!("unexpected record: {:?}", other),
    }

    // elsewhere only the general price applies
    let found = repo
        .find_rate(RateKind::Material, "MAT-GRV", "Valencia City", as_of())
        .await
        .unwrap();
    match found {
        Some(RateRecord::Material(price)) => assert_eq!(price.base_price, 900.0),
        other => panic!("unexpected record: {:?}", other),
    }

    let found = repo
        .find_rate(RateKind::Material, "MAT-NONE", LOCATION, as_of())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_labor_lookup_ignores_location_case() {
    let (_temp_file, state) = open_state();
    state
        .master_data_repo
        .upsert_labor_rate(&labor_sheet(LOCATION, 100.0, 80.0))
        .unwrap();

    let found = state
        .master_data_repo
        .find_rate(RateKind::Labor, "Foreman", "MALAYBALAY CITY", as_of())
        .await
        .unwrap();
    match found {
        Some(RateRecord::Labor(sheet)) => assert_eq!(sheet.rate_for("foreman"), Some(100.0)),
        other => panic!("unexpected record: {:?}", other),
    }
}

// ==========================================
// Lookup budget against a busy database
// ==========================================

#[tokio::test]
async fn test_rate_lookup_timeout_fires_while_database_is_locked() {
    let (temp_file, state) = open_state();
    seed(&state);

    let line_items = Arc::new(InMemoryLineItemRepository::new());
    let repos = EngineRepositories::new(
        Arc::new(InMemoryTemplateRepository::with(vec![reference_template()])),
        state.master_data_repo.clone(),
        Arc::new(InMemoryProjectRepository::with(vec![reference_project()])),
        line_items.clone(),
    );
    let engine = InstantiationEngine::new(Arc::new(MockConfig::with_timeout_ms(20)), repos);

    // another writer holds the database; readers wait on busy_timeout
    let blocker = rusqlite::Connection::open(temp_file.path()).unwrap();
    blocker.execute_batch("BEGIN EXCLUSIVE;").unwrap();

    let started = Instant::now();
    let result = engine
        .instantiate(
            TEMPLATE_ID,
            LOCATION,
            1.0,
            PROJECT_ID,
            InstantiateOptions {
                as_of: Some(as_of()),
                ..Default::default()
            },
        )
        .await;
    let elapsed = started.elapsed();

    blocker.execute_batch("COMMIT;").unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, EngineError::RateLookupTimeout { budget_ms: 20 }));
    assert!(err.is_retryable());
    assert!(elapsed < Duration::from_millis(1_000), "elapsed={:?}", elapsed);
    assert_eq!(line_items.save_calls(), 0);
}

#[tokio::test]
async fn test_sqlite_lookups_succeed_once_lock_is_released() {
    let (temp_file, state) = open_state();
    seed(&state);

    let blocker = rusqlite::Connection::open(temp_file.path()).unwrap();
    blocker.execute_batch("BEGIN EXCLUSIVE;").unwrap();
    let release = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        blocker.execute_batch("COMMIT;").unwrap();
    });

    // no budget configured: the lookup waits out the lock
    let found = state
        .master_data_repo
        .find_rate(RateKind::Equipment, "EQ-001", LOCATION, as_of())
        .await
        .unwrap();
    release.join().unwrap();

    assert!(matches!(found, Some(RateRecord::Equipment(_))));
}
