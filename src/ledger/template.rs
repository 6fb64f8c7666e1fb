use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Determines which derived figures a campaign's flights carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TemplateType {
    #[serde(rename = "programmatic")]
    Programmatic,
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "sem-social")]
    SemSocial,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Programmatic => "programmatic",
            TemplateType::YouTube => "youtube",
            TemplateType::SemSocial => "sem-social",
        }
    }

    /// Template used for a line item coming from the order system.
    pub fn for_imported_product(product: &str) -> Self {
        match product {
            "YouTube" => TemplateType::YouTube,
            "SEM" | "Meta" | "Spark" => TemplateType::SemSocial,
            _ => TemplateType::Programmatic,
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "programmatic" => Ok(TemplateType::Programmatic),
            "youtube" => Ok(TemplateType::YouTube),
            "sem-social" => Ok(TemplateType::SemSocial),
            other => Err(format!("unknown template type `{other}`")),
        }
    }
}

/// Basis on which the rate is quoted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MetricType {
    /// Price per 1000 impressions.
    #[default]
    #[serde(rename = "CPM")]
    Cpm,
    /// Price per view.
    #[serde(rename = "CPV")]
    Cpv,
}

impl MetricType {
    /// Maps a KPI label; anything other than `CPV` is priced per mille.
    pub fn from_kpi(kpi: &str) -> Self {
        if kpi.trim().eq_ignore_ascii_case("CPV") {
            MetricType::Cpv
        } else {
            MetricType::Cpm
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Cpm => "CPM",
            MetricType::Cpv => "CPV",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateConfig {
    pub rate: f64,
    pub metric_type: MetricType,
}

impl RateConfig {
    pub fn new(rate: f64, metric_type: MetricType) -> Self {
        Self { rate, metric_type }
    }

    pub fn has_rate(&self) -> bool {
        self.rate.is_finite() && self.rate > 0.0
    }

    /// Price of a single view under the configured basis.
    pub fn per_view(&self) -> f64 {
        match self.metric_type {
            MetricType::Cpv => self.rate,
            MetricType::Cpm => self.rate / 1000.0,
        }
    }
}
