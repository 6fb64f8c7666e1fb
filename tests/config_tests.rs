mod common;

use std::time::{Duration, Instant};

use common::{flight_ids, quarter_form};
use flight_ledger::config::{ConfigManager, PlannerConfig};
use flight_ledger::core::services::{FlightField, NoOp};
use flight_ledger::core::CampaignManager;
use flight_ledger::ledger::TemplateType;
use tempfile::TempDir;

#[test]
fn stored_config_drives_the_manager() {
    let temp = TempDir::new().expect("create temp dir");
    let configs = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    configs
        .save(&PlannerConfig {
            history_limit: 3,
            lock_debounce_ms: 500,
            budget_tolerance: 1.0,
        })
        .unwrap();

    let config = configs.load().unwrap();
    let mut manager = CampaignManager::with_config(&config);
    let id = manager
        .generate_campaign(&quarter_form(), TemplateType::Programmatic)
        .unwrap();
    let flights = flight_ids(&manager, id);

    for budget in [100.5, 100.0, 99.5, 100.25] {
        manager
            .update_flight_value(id, flights[0], FlightField::Budget, budget)
            .unwrap();
    }
    assert_eq!(manager.history_len(), 3);
    assert!(manager.budget_status(id).unwrap().is_valid);

    let now = Instant::now();
    manager.toggle_flight_lock_at(id, flights[1], now).unwrap();
    assert_eq!(
        manager.toggle_flight_lock_at(id, flights[1], now + Duration::from_millis(300)),
        Err(NoOp::Debounced)
    );
}

#[test]
fn invalid_config_is_refused() {
    let temp = TempDir::new().expect("create temp dir");
    let configs = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let result = configs.save(&PlannerConfig {
        budget_tolerance: f64::NAN,
        ..PlannerConfig::default()
    });
    assert!(result.is_err());
    assert!(!configs.path().exists());
}
