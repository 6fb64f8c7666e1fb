//! Tactic reference records used to seed campaign forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calc::parse_number;
use crate::ledger::{MetricType, TemplateType};

/// Rate-card entry as supplied by the reference-data service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tactic {
    pub category: String,
    pub product: String,
    pub sub_product: String,
    /// Display rate such as `$24.00`.
    pub rate: String,
    pub kpi: String,
}

impl Tactic {
    pub fn new(category: &str, product: &str, sub_product: &str, rate: &str, kpi: &str) -> Self {
        Self {
            category: category.into(),
            product: product.into(),
            sub_product: sub_product.into(),
            rate: rate.into(),
            kpi: kpi.into(),
        }
    }

    /// Label shown in the tactic picker and used as the campaign name.
    pub fn label(&self) -> String {
        format!("{} - {}", self.product, self.sub_product)
    }

    pub fn rate_value(&self) -> f64 {
        parse_number(&self.rate)
    }

    pub fn metric_type(&self) -> MetricType {
        MetricType::from_kpi(&self.kpi)
    }

    pub fn template_type(&self) -> TemplateType {
        if self.product == "YouTube" {
            TemplateType::YouTube
        } else if self.product == "Spark" || self.category == "Google" || self.category == "Social"
        {
            TemplateType::SemSocial
        } else {
            TemplateType::Programmatic
        }
    }
}

/// Finds the tactic whose label matches and returns its template type.
pub fn resolve_template(label: &str, catalog: &[Tactic]) -> Option<TemplateType> {
    catalog
        .iter()
        .find(|tactic| tactic.label() == label)
        .map(Tactic::template_type)
}

/// Built-in rate card used when the reference service is unavailable.
pub fn default_catalog() -> Vec<Tactic> {
    [
        ("Email Marketing", "Email Marketing", "1:1 Marketing", "$24.00", "CPM"),
        ("Email Marketing", "Email Marketing", "B2B (Business Targeting)", "$24.00", "CPM"),
        ("Email Marketing", "Email Marketing", "B2C (Consumer Targeting)", "$30.00", "CPM"),
        ("Programmatic", "Programmatic Audio", "AAT", "$25.00", "CPM"),
        ("Programmatic", "Programmatic Audio", "RON", "$25.00", "CPM"),
        ("Programmatic", "Addressable Solutions", "CTV", "$35.00", "CPM"),
        ("Programmatic", "Addressable Solutions", "Local CTV", "$35.00", "CPM"),
        ("Programmatic", "Blended Tactics", "Standard", "$15.00", "CPM"),
        ("Programmatic", "STV", "Local", "$35.00", "CPM"),
        ("Programmatic", "YouTube", "TrueView", "$0.05", "CPV"),
        ("Programmatic", "YouTube", "Bumper", "$15.00", "CPM"),
        ("Programmatic", "YouTube", "Shorts", "$12.00", "CPM"),
        ("Social", "Meta", "Facebook", "$8.00", "CPM"),
        ("Social", "Meta", "Instagram", "$10.00", "CPM"),
        ("Social", "Snapchat", "Standard", "$12.00", "CPM"),
        ("Social", "TikTok", "Standard", "$15.00", "CPM"),
        ("Social", "Twitter", "Standard", "$8.00", "CPM"),
        ("Social", "Pinterest", "Standard", "$10.00", "CPM"),
        ("Social", "LinkedIn", "Standard", "$18.00", "CPM"),
        ("Google", "SEM", "Search", "$2.50", "CPLC"),
        ("Google", "SEM", "Display", "$8.00", "CPM"),
        ("Google", "Spark", "Standard", "$12.00", "CPM"),
        ("Local Display", "CPM Display", "Standard", "$8.00", "CPM"),
        ("Local Display", "Takeovers", "Homepage", "$25.00", "CPM"),
        ("Local Display", "Sponsorship", "Standard", "$15.00", "CPM"),
    ]
    .into_iter()
    .map(|(category, product, sub_product, rate, kpi)| {
        Tactic::new(category, product, sub_product, rate, kpi)
    })
    .collect()
}

/// Line item handed over by the order-import collaborator, already normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportedTactic {
    pub id: String,
    pub display_name: String,
    pub product: String,
    pub sub_product: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: f64,
    #[serde(default)]
    pub contracted_impressions: u64,
    #[serde(default)]
    pub contracted_kpi_goal: u64,
    /// Rate for the line item, quoted per `kpi`.
    pub cpm: f64,
    #[serde(default)]
    pub kpi: String,
}

impl ImportedTactic {
    pub fn template_type(&self) -> TemplateType {
        TemplateType::for_imported_product(&self.product)
    }

    pub fn metric_type(&self) -> MetricType {
        MetricType::from_kpi(&self.kpi)
    }
}
