#![allow(dead_code)]

use flight_ledger::core::CampaignManager;
use flight_ledger::ledger::{
    Campaign, CampaignForm, DateRange, Flight, FlightMetrics, MetricType, RateConfig,
    TemplateType,
};
use chrono::NaiveDate;
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// First quarter of 2025, $300 at $10 CPM.
pub fn quarter_form() -> CampaignForm {
    CampaignForm {
        tactic: "Blended Tactics - Standard".into(),
        start_date: "2025-01-01".into(),
        end_date: "2025-03-31".into(),
        total_budget: "300".into(),
        rate: "10".into(),
        total_impressions: "30000".into(),
        total_views: String::new(),
        metric_type: MetricType::Cpm,
    }
}

pub fn youtube_form() -> CampaignForm {
    CampaignForm {
        tactic: "YouTube - TrueView".into(),
        start_date: "2025-01-01".into(),
        end_date: "2025-02-28".into(),
        total_budget: "310".into(),
        rate: "0.05".into(),
        total_impressions: String::new(),
        total_views: "6200".into(),
        metric_type: MetricType::Cpv,
    }
}

/// Manager holding one generated programmatic campaign.
pub fn manager_with_quarter() -> (CampaignManager, Uuid) {
    let mut manager = CampaignManager::new();
    let id = manager
        .generate_campaign(&quarter_form(), TemplateType::Programmatic)
        .expect("valid quarter form");
    (manager, id)
}

/// Budget-only campaign with one flight per budget, one month each.
pub fn social_campaign(budgets: &[f64]) -> Campaign {
    let flights = budgets
        .iter()
        .enumerate()
        .map(|(position, budget)| {
            let month = position as u32 + 1;
            Flight::new(
                month,
                date(2025, month, 1),
                date(2025, month, 28),
                *budget,
                FlightMetrics::SemSocial,
            )
        })
        .collect();
    Campaign::new(
        "Meta - Facebook",
        TemplateType::SemSocial,
        RateConfig::new(8.0, MetricType::Cpm),
        DateRange::new(date(2025, 1, 1), date(2025, 12, 28)).expect("range"),
        CampaignForm::default(),
        flights,
    )
}

pub fn flight_ids(manager: &CampaignManager, campaign_id: Uuid) -> Vec<Uuid> {
    manager
        .campaign(campaign_id)
        .expect("campaign present")
        .flights
        .iter()
        .map(|flight| flight.id)
        .collect()
}

pub fn budgets(manager: &CampaignManager, campaign_id: Uuid) -> Vec<f64> {
    manager
        .campaign(campaign_id)
        .expect("campaign present")
        .flights
        .iter()
        .map(|flight| flight.budget)
        .collect()
}
