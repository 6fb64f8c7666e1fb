use std::fmt;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::template::{RateConfig, TemplateType};
use crate::calc::{
    active_days, budget_from_impressions, impressions_from_budget, round_to_cents,
    traffic_budget, TRAFFIC_BUFFER,
};

/// Which fields of a flight are frozen against edits and redistribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LockScope {
    Budget,
    Impressions,
    All,
}

/// Display ordinal of a flight; split children collapse under their parent as `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineLabel {
    Number(u32),
    Collapsed,
}

impl LineLabel {
    pub fn number(&self) -> Option<u32> {
        match self {
            LineLabel::Number(value) => Some(*value),
            LineLabel::Collapsed => None,
        }
    }
}

impl fmt::Display for LineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLabel::Number(value) => write!(f, "{value}"),
            LineLabel::Collapsed => f.write_str("-"),
        }
    }
}

impl Serialize for LineLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LineLabel::Number(value) => serializer.serialize_u32(*value),
            LineLabel::Collapsed => serializer.serialize_str("-"),
        }
    }
}

impl<'de> Deserialize<'de> for LineLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(LineLabel::Number(value)),
            Raw::Text(text) if text == "-" => Ok(LineLabel::Collapsed),
            Raw::Text(text) => text
                .parse()
                .map(LineLabel::Number)
                .map_err(|_| de::Error::custom(format!("invalid line label `{text}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SplitRole {
    Parent,
    Child,
}

/// Membership in a split group: one parent and any number of children share `parent_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SplitMembership {
    pub parent_id: Uuid,
    pub role: SplitRole,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammaticMetrics {
    pub impressions: u64,
    pub traffic_budget: f64,
    pub traffic_impressions: u64,
}

impl ProgrammaticMetrics {
    /// Fills the traffic buffer for the given budget, keeping `impressions` as-is.
    pub fn with_traffic(impressions: u64, budget: f64, rate: f64) -> Self {
        let traffic = traffic_budget(budget);
        Self {
            impressions,
            traffic_budget: traffic,
            traffic_impressions: impressions_from_budget(traffic, rate),
        }
    }

    /// Figures for a freshly generated flight, where the traffic budget is the
    /// unrounded buffered budget.
    pub fn generated(impressions: u64, budget: f64, rate: f64) -> Self {
        let traffic = budget * TRAFFIC_BUFFER;
        Self {
            impressions,
            traffic_budget: traffic,
            traffic_impressions: impressions_from_budget(traffic, rate),
        }
    }

    fn refresh_traffic(&mut self, budget: f64, rate: f64) {
        self.traffic_budget = traffic_budget(budget);
        self.traffic_impressions = impressions_from_budget(self.traffic_budget, rate);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeMetrics {
    pub total_views: u64,
    pub days_in_flight: u32,
    pub daily_views: f64,
    pub daily_platform_budget: f64,
    pub total_retail: f64,
}

impl YouTubeMetrics {
    pub fn derive(total_views: u64, days_in_flight: u32, rate: &RateConfig) -> Self {
        let mut metrics = Self {
            total_views,
            days_in_flight,
            ..Self::default()
        };
        metrics.set_views(total_views, rate);
        metrics
    }

    /// Updates the view count and everything derived from it.
    ///
    /// Pricing figures are left untouched when no rate is configured.
    pub fn set_views(&mut self, total_views: u64, rate: &RateConfig) {
        self.total_views = total_views;
        if self.days_in_flight == 0 {
            return;
        }
        // Two decimals, same rounding as currency.
        self.daily_views = round_to_cents(total_views as f64 / self.days_in_flight as f64);
        if rate.has_rate() {
            let per_view = rate.per_view();
            self.daily_platform_budget = self.daily_views * per_view;
            self.total_retail = total_views as f64 * per_view;
        }
    }
}

/// Template-specific figures carried by a flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "template")]
pub enum FlightMetrics {
    #[serde(rename = "programmatic")]
    Programmatic(ProgrammaticMetrics),
    #[serde(rename = "youtube")]
    YouTube(YouTubeMetrics),
    #[serde(rename = "sem-social")]
    SemSocial,
}

impl FlightMetrics {
    pub fn template(&self) -> TemplateType {
        match self {
            FlightMetrics::Programmatic(_) => TemplateType::Programmatic,
            FlightMetrics::YouTube(_) => TemplateType::YouTube,
            FlightMetrics::SemSocial => TemplateType::SemSocial,
        }
    }
}

/// A single time-boxed budget allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub line: LineLabel,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<LockScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitMembership>,
    pub metrics: FlightMetrics,
}

impl Flight {
    pub fn new(
        line: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: f64,
        metrics: FlightMetrics,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            line: LineLabel::Number(line),
            start_date,
            end_date,
            budget,
            locked: None,
            split: None,
            metrics,
        }
    }

    pub fn template(&self) -> TemplateType {
        self.metrics.template()
    }

    pub fn active_days(&self) -> i64 {
        active_days(self.start_date, self.end_date)
    }

    pub fn impressions(&self) -> Option<u64> {
        match &self.metrics {
            FlightMetrics::Programmatic(metrics) => Some(metrics.impressions),
            _ => None,
        }
    }

    pub fn total_views(&self) -> Option<u64> {
        match &self.metrics {
            FlightMetrics::YouTube(metrics) => Some(metrics.total_views),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    pub fn is_fully_locked(&self) -> bool {
        self.locked == Some(LockScope::All)
    }

    /// Whether a lock (partial or full) freezes the given scope.
    pub fn freezes(&self, scope: LockScope) -> bool {
        matches!(self.locked, Some(LockScope::All)) || self.locked == Some(scope)
    }

    pub fn is_parent(&self) -> bool {
        matches!(self.split, Some(SplitMembership { role: SplitRole::Parent, .. }))
    }

    pub fn is_child(&self) -> bool {
        matches!(self.split, Some(SplitMembership { role: SplitRole::Child, .. }))
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        self.split.map(|membership| membership.parent_id)
    }

    /// Sets the budget, rounded to cents, and derives impressions and traffic from it.
    pub fn set_budget(&mut self, budget: f64, rate: &RateConfig) {
        self.budget = round_to_cents(budget);
        self.derive_from_budget(rate);
    }

    /// Adds `increment` to the stored budget as-is, so amounts credited in
    /// whole cents are never absorbed by rounding the existing budget.
    pub fn credit_budget(&mut self, increment: f64, rate: &RateConfig) {
        self.budget += increment;
        self.derive_from_budget(rate);
    }

    /// Sets impressions and derives the budget from them. Returns `false` when
    /// the flight does not carry impressions.
    pub fn set_impressions(&mut self, impressions: u64, rate: &RateConfig) -> bool {
        let FlightMetrics::Programmatic(metrics) = &mut self.metrics else {
            return false;
        };
        metrics.impressions = impressions;
        if rate.has_rate() {
            self.budget = budget_from_impressions(impressions, rate.rate);
            metrics.refresh_traffic(self.budget, rate.rate);
        }
        true
    }

    fn derive_from_budget(&mut self, rate: &RateConfig) {
        if !rate.has_rate() {
            return;
        }
        if let FlightMetrics::Programmatic(metrics) = &mut self.metrics {
            metrics.impressions = impressions_from_budget(self.budget, rate.rate);
            metrics.refresh_traffic(self.budget, rate.rate);
        }
    }

    /// Sets total views. Returns `false` when the flight does not carry views.
    pub fn set_total_views(&mut self, total_views: u64, rate: &RateConfig) -> bool {
        let FlightMetrics::YouTube(metrics) = &mut self.metrics else {
            return false;
        };
        metrics.set_views(total_views, rate);
        true
    }

    /// Zeroes the budget and every derived amount, leaving day counts intact.
    pub fn zero_out(&mut self) {
        self.budget = 0.0;
        match &mut self.metrics {
            FlightMetrics::Programmatic(metrics) => {
                *metrics = ProgrammaticMetrics::default();
            }
            FlightMetrics::YouTube(metrics) => {
                metrics.total_views = 0;
                metrics.daily_views = 0.0;
                metrics.daily_platform_budget = 0.0;
                metrics.total_retail = 0.0;
            }
            FlightMetrics::SemSocial => {}
        }
    }
}
