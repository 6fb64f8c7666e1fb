use serde::{Deserialize, Serialize};

use crate::calc::{round_to_cents, sum_cents};
use crate::config::DEFAULT_BUDGET_TOLERANCE;
use crate::ledger::{Campaign, FlightMetrics, TemplateType};

/// Column totals shown in the flight table footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightTotals {
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_impressions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_retail: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetDrift {
    Balanced,
    Over,
    Under,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub is_valid: bool,
    /// Current minus requested, in cents.
    pub difference: f64,
    pub total_budget: f64,
    pub original_budget: f64,
}

impl BudgetStatus {
    pub fn drift(&self) -> BudgetDrift {
        if self.is_valid {
            BudgetDrift::Balanced
        } else if self.difference > 0.0 {
            BudgetDrift::Over
        } else {
            BudgetDrift::Under
        }
    }

    pub fn redistributable_amount(&self) -> Option<f64> {
        (self.difference < 0.0 && !self.is_valid).then(|| self.difference.abs())
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(campaign: &Campaign) -> FlightTotals {
        let flights = &campaign.flights;
        let mut totals = FlightTotals {
            budget: sum_cents(flights.iter().map(|flight| flight.budget)),
            ..FlightTotals::default()
        };
        let programmatic = flights.iter().filter_map(|flight| match &flight.metrics {
            FlightMetrics::Programmatic(metrics) => Some(metrics),
            _ => None,
        });
        let youtube = flights.iter().filter_map(|flight| match &flight.metrics {
            FlightMetrics::YouTube(metrics) => Some(metrics),
            _ => None,
        });
        match campaign.template_type {
            TemplateType::Programmatic => {
                totals.impressions = Some(programmatic.clone().map(|m| m.impressions).sum());
                totals.traffic_budget =
                    Some(sum_cents(programmatic.clone().map(|m| m.traffic_budget)));
                totals.traffic_impressions =
                    Some(programmatic.map(|m| m.traffic_impressions).sum());
            }
            TemplateType::YouTube => {
                totals.total_views = Some(youtube.clone().map(|m| m.total_views).sum());
                totals.total_retail = Some(sum_cents(youtube.map(|m| m.total_retail)));
            }
            TemplateType::SemSocial => {}
        }
        totals
    }

    pub fn budget_status(campaign: &Campaign) -> BudgetStatus {
        Self::budget_status_with_tolerance(campaign, DEFAULT_BUDGET_TOLERANCE)
    }

    pub fn budget_status_with_tolerance(campaign: &Campaign, tolerance: f64) -> BudgetStatus {
        let total = campaign.total_budget();
        let requested = campaign.requested_budget();
        let difference = total - requested;
        let is_valid = difference.abs() < tolerance;
        if !is_valid {
            tracing::warn!(
                campaign = %campaign.name,
                difference = round_to_cents(difference),
                "flight budgets drifted from the requested total"
            );
        }
        BudgetStatus {
            is_valid,
            difference: round_to_cents(difference),
            total_budget: round_to_cents(total),
            original_budget: round_to_cents(requested),
        }
    }
}
