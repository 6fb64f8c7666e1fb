use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{position_of, Identifiable};
use super::flight::Flight;
use super::template::{MetricType, RateConfig, TemplateType};
use crate::calc::{parse_number, round_to_integer};

/// Raw campaign inputs as typed into the setup form.
///
/// Values stay as strings so half-typed input survives until generation;
/// numeric fields are parsed leniently when used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignForm {
    pub tactic: String,
    pub start_date: String,
    pub end_date: String,
    pub total_budget: String,
    pub rate: String,
    pub total_impressions: String,
    pub total_views: String,
    pub metric_type: MetricType,
}

impl CampaignForm {
    pub fn rate_value(&self) -> f64 {
        parse_number(&self.rate)
    }

    pub fn rate_config(&self) -> RateConfig {
        RateConfig::new(self.rate_value(), self.metric_type)
    }

    /// Sets the total budget and derives the matching impressions (CPM) or views (CPV).
    pub fn set_total_budget(&mut self, value: impl Into<String>) {
        self.total_budget = value.into();
        let rate = self.rate_value();
        if rate <= 0.0 {
            return;
        }
        let budget = parse_number(&self.total_budget);
        match self.metric_type {
            MetricType::Cpm => {
                self.total_impressions = round_to_integer(budget * 1000.0 / rate).to_string();
            }
            MetricType::Cpv => {
                self.total_views = round_to_integer(budget / rate).to_string();
            }
        }
    }

    /// Sets total impressions and, for CPM pricing, derives the budget.
    pub fn set_total_impressions(&mut self, value: impl Into<String>) {
        self.total_impressions = value.into();
        let rate = self.rate_value();
        if rate > 0.0 && self.metric_type == MetricType::Cpm {
            let impressions = parse_number(&self.total_impressions);
            self.total_budget = format!("{:.2}", impressions * rate / 1000.0);
        }
    }

    /// Sets total views and, for CPV pricing, derives the budget.
    pub fn set_total_views(&mut self, value: impl Into<String>) {
        self.total_views = value.into();
        let rate = self.rate_value();
        if rate > 0.0 && self.metric_type == MetricType::Cpv {
            let views = parse_number(&self.total_views);
            self.total_budget = format!("{:.2}", views * rate);
        }
    }

    /// Sets the rate and re-derives the goal from the current budget.
    pub fn set_rate(&mut self, value: impl Into<String>) {
        self.rate = value.into();
        if !self.total_budget.trim().is_empty() {
            let budget = self.total_budget.clone();
            self.set_total_budget(budget);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Builds a range when `end` is not before `start`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Option<Self> {
        (end_date >= start_date).then_some(Self {
            start_date,
            end_date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// A named collection of flights sharing a template type and rate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub template_type: TemplateType,
    pub rate_config: RateConfig,
    pub date_range: DateRange,
    pub form: CampaignForm,
    pub flights: Vec<Flight>,
    /// Baseline captured at generation, used only to reset the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_flights: Option<Vec<Flight>>,
}

impl Campaign {
    pub fn new(
        name: impl Into<String>,
        template_type: TemplateType,
        rate_config: RateConfig,
        date_range: DateRange,
        form: CampaignForm,
        flights: Vec<Flight>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            template_type,
            rate_config,
            date_range,
            form,
            flights,
            original_flights: None,
        }
    }

    /// Captures the current flights as the reset baseline.
    pub fn with_baseline(mut self) -> Self {
        self.original_flights = Some(self.flights.clone());
        self
    }

    /// Total budget originally requested on the form.
    pub fn requested_budget(&self) -> f64 {
        parse_number(&self.form.total_budget)
    }

    pub fn flight_index(&self, id: Uuid) -> Option<usize> {
        position_of(&self.flights, id)
    }

    pub fn flight(&self, id: Uuid) -> Option<&Flight> {
        self.flights.iter().find(|flight| flight.id() == id)
    }

    pub fn flight_mut(&mut self, id: Uuid) -> Option<&mut Flight> {
        self.flights.iter_mut().find(|flight| flight.id == id)
    }

    pub fn total_budget(&self) -> f64 {
        self.flights.iter().map(|flight| flight.budget).sum()
    }
}
