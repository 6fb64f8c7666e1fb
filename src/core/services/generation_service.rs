//! Builds campaigns of month-sized flights from form or import input.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calc::{parse_number, round_to_count};
use crate::dates::{days_in_month, format_date, last_of_month, months_between, parse_date};
use crate::ledger::{
    Campaign, CampaignForm, DateRange, Flight, FlightMetrics, MetricType, ProgrammaticMetrics,
    RateConfig, TemplateType, YouTubeMetrics,
};
use crate::tactics::ImportedTactic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Tactic,
    StartDate,
    EndDate,
    TotalBudget,
    Rate,
    TotalImpressions,
    TotalViews,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Tactic => "tactic",
            FormField::StartDate => "startDate",
            FormField::EndDate => "endDate",
            FormField::TotalBudget => "totalBudget",
            FormField::Rate => "rate",
            FormField::TotalImpressions => "totalImpressions",
            FormField::TotalViews => "totalViews",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level problems that keep a form from generating flights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("campaign form has {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

/// How the outermost flights are bounded.
#[derive(Debug, Clone, Copy)]
enum Edges {
    SnapToMonths,
    KeepRange,
}

#[derive(Debug, Clone, Copy)]
struct PlanTotals {
    budget: f64,
    impressions: f64,
    views: f64,
}

pub struct GenerationService;

impl GenerationService {
    pub fn generate_flights(
        form: &CampaignForm,
        template: TemplateType,
    ) -> Result<Campaign, ValidationErrors> {
        let range = Self::validate(form)?;
        let rate = form.rate_config();
        let views_source = if form.total_views.trim().is_empty() {
            &form.total_impressions
        } else {
            &form.total_views
        };
        let totals = PlanTotals {
            budget: parse_number(&form.total_budget),
            impressions: parse_number(&form.total_impressions),
            views: parse_number(views_source),
        };
        let flights = build_flights(range, Edges::SnapToMonths, template, &rate, totals);
        let campaign = Campaign::new(
            form.tactic.clone(),
            template,
            rate,
            range,
            form.clone(),
            flights,
        )
        .with_baseline();
        tracing::info!(
            campaign = %campaign.name,
            template = %template,
            flights = campaign.flights.len(),
            "generated campaign flights"
        );
        Ok(campaign)
    }

    /// Months between the ends snap to calendar boundaries while the first and
    /// last flights keep the line item's exact dates.
    pub fn generate_from_import(tactic: &ImportedTactic) -> Result<Campaign, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if tactic.end_date < tactic.start_date {
            errors.insert(FormField::EndDate, "End date must not precede start date");
        }
        if !tactic.total_budget.is_finite() || tactic.total_budget <= 0.0 {
            errors.insert(FormField::TotalBudget, "Total budget must be positive");
        }
        let range = match DateRange::new(tactic.start_date, tactic.end_date) {
            Some(range) if errors.is_empty() => range,
            _ => return Err(errors),
        };

        let template = tactic.template_type();
        let metric_type = tactic.metric_type();
        let rate = RateConfig::new(tactic.cpm, metric_type);
        let form = CampaignForm {
            tactic: tactic.display_name.clone(),
            start_date: format_date(tactic.start_date),
            end_date: format_date(tactic.end_date),
            total_budget: tactic.total_budget.to_string(),
            rate: tactic.cpm.to_string(),
            total_impressions: tactic.contracted_impressions.to_string(),
            total_views: tactic.contracted_kpi_goal.to_string(),
            metric_type,
        };
        let totals = PlanTotals {
            budget: tactic.total_budget,
            impressions: tactic.contracted_impressions as f64,
            views: tactic.contracted_kpi_goal as f64,
        };
        let flights = build_flights(range, Edges::KeepRange, template, &rate, totals);
        let campaign = Campaign::new(
            tactic.display_name.clone(),
            template,
            rate,
            range,
            form,
            flights,
        )
        .with_baseline();
        tracing::info!(
            campaign = %campaign.name,
            line_item = %tactic.id,
            flights = campaign.flights.len(),
            "generated campaign from imported line item"
        );
        Ok(campaign)
    }

    pub fn validate(form: &CampaignForm) -> Result<DateRange, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let has_tactic = !form.tactic.trim().is_empty();
        if !has_tactic {
            errors.insert(FormField::Tactic, "Please select a tactic");
        }
        let start = required_date(
            &form.start_date,
            FormField::StartDate,
            "Start date",
            &mut errors,
        );
        let end = required_date(&form.end_date, FormField::EndDate, "End date", &mut errors);
        if form.total_budget.trim().is_empty() {
            errors.insert(FormField::TotalBudget, "Total budget is required");
        }
        if form.rate.trim().is_empty() {
            errors.insert(FormField::Rate, "Rate is required");
        }
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                errors.insert(FormField::EndDate, "End date must be after start date");
            }
        }
        if has_tactic {
            match form.metric_type {
                MetricType::Cpv if form.total_views.trim().is_empty() => {
                    errors.insert(FormField::TotalViews, "Total views required");
                }
                MetricType::Cpm if form.total_impressions.trim().is_empty() => {
                    errors.insert(FormField::TotalImpressions, "Total impressions required");
                }
                _ => {}
            }
        }

        match (start, end) {
            (Some(start), Some(end)) if errors.is_empty() => {
                DateRange::new(start, end).ok_or(errors)
            }
            _ => Err(errors),
        }
    }
}

fn required_date(
    raw: &str,
    field: FormField,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        errors.insert(field, format!("{label} is required"));
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.insert(field, format!("{label} is not a valid date"));
    }
    parsed
}

fn build_flights(
    range: DateRange,
    edges: Edges,
    template: TemplateType,
    rate: &RateConfig,
    totals: PlanTotals,
) -> Vec<Flight> {
    let months = months_between(range.start_date, range.end_date);
    let count = months.len();
    let budget = totals.budget / count as f64;

    months
        .iter()
        .enumerate()
        .map(|(index, month)| {
            let (mut start, mut end) = (*month, last_of_month(*month));
            if let Edges::KeepRange = edges {
                if index == 0 {
                    start = range.start_date;
                }
                if index + 1 == count {
                    end = range.end_date;
                }
            }
            let metrics = match template {
                TemplateType::Programmatic => {
                    let impressions = round_to_count(totals.impressions / count as f64);
                    FlightMetrics::Programmatic(ProgrammaticMetrics::generated(
                        impressions,
                        budget,
                        rate.rate,
                    ))
                }
                TemplateType::YouTube => {
                    let views = round_to_count(totals.views / count as f64);
                    let days = days_in_month(month.year(), month.month());
                    FlightMetrics::YouTube(YouTubeMetrics::derive(views, days, rate))
                }
                TemplateType::SemSocial => FlightMetrics::SemSocial,
            };
            Flight::new(index as u32 + 1, start, end, budget, metrics)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LineLabel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quarter_form() -> CampaignForm {
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

    #[test]
    fn blank_form_reports_every_required_field() {
        let errors = GenerationService::generate_flights(
            &CampaignForm::default(),
            TemplateType::Programmatic,
        )
        .expect_err("blank form must fail");
        assert_eq!(errors.get(FormField::Tactic), Some("Please select a tactic"));
        assert!(errors.contains(FormField::StartDate));
        assert!(errors.contains(FormField::EndDate));
        assert!(errors.contains(FormField::TotalBudget));
        assert!(errors.contains(FormField::Rate));
        // Metric goal is only checked once a tactic is chosen.
        assert!(!errors.contains(FormField::TotalImpressions));
    }

    #[test]
    fn end_date_must_follow_start_date() {
        let mut form = quarter_form();
        form.end_date = "2025-01-01".into();
        let errors = GenerationService::validate(&form).expect_err("same-day range");
        assert_eq!(
            errors.get(FormField::EndDate),
            Some("End date must be after start date")
        );
    }

    #[test]
    fn metric_goal_follows_metric_type() {
        let mut form = quarter_form();
        form.metric_type = MetricType::Cpv;
        let errors = GenerationService::validate(&form).expect_err("views missing");
        assert_eq!(errors.get(FormField::TotalViews), Some("Total views required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unparsable_dates_are_reported_on_their_field() {
        let mut form = quarter_form();
        form.start_date = "01/01/2025".into();
        let errors = GenerationService::validate(&form).expect_err("bad date");
        assert!(errors.contains(FormField::StartDate));
    }

    #[test]
    fn programmatic_quarter_splits_evenly() {
        let campaign =
            GenerationService::generate_flights(&quarter_form(), TemplateType::Programmatic)
                .unwrap();
        assert_eq!(campaign.flights.len(), 3);
        assert_eq!(campaign.name, "Blended Tactics - Standard");
        let expected_ends = [date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)];
        for (index, flight) in campaign.flights.iter().enumerate() {
            assert_eq!(flight.line, LineLabel::Number(index as u32 + 1));
            assert_eq!(flight.end_date, expected_ends[index]);
            assert_eq!(flight.budget, 100.0);
            let FlightMetrics::Programmatic(metrics) = flight.metrics else {
                panic!("expected programmatic metrics");
            };
            assert_eq!(metrics.impressions, 10_000);
            assert_eq!(metrics.traffic_budget, 101.0);
        }
        assert_eq!(campaign.original_flights.as_ref(), Some(&campaign.flights));
    }

    #[test]
    fn uneven_budget_is_not_corrected() {
        let mut form = quarter_form();
        form.total_budget = "100".into();
        let campaign =
            GenerationService::generate_flights(&form, TemplateType::SemSocial).unwrap();
        assert_eq!(campaign.flights[0].budget, 100.0 / 3.0);
        assert!(matches!(campaign.flights[0].metrics, FlightMetrics::SemSocial));
    }

    #[test]
    fn youtube_flights_use_calendar_month_days() {
        let mut form = quarter_form();
        form.metric_type = MetricType::Cpv;
        form.rate = "0.05".into();
        form.total_views = "9000".into();
        let campaign = GenerationService::generate_flights(&form, TemplateType::YouTube).unwrap();
        let FlightMetrics::YouTube(feb) = campaign.flights[1].metrics else {
            panic!("expected youtube metrics");
        };
        assert_eq!(feb.total_views, 3000);
        assert_eq!(feb.days_in_flight, 28);
        assert_eq!(feb.daily_views, 107.14);
        assert!((feb.total_retail - 150.0).abs() < 1e-9);
    }

    #[test]
    fn youtube_cpm_falls_back_to_impressions_goal() {
        let campaign =
            GenerationService::generate_flights(&quarter_form(), TemplateType::YouTube).unwrap();
        assert_eq!(campaign.flights[0].total_views(), Some(10_000));
    }

    #[test]
    fn import_keeps_exact_outer_dates() {
        let tactic = ImportedTactic {
            id: "li-1".into(),
            display_name: "Addressable Solutions - CTV".into(),
            product: "Addressable Solutions".into(),
            sub_product: "CTV".into(),
            start_date: date(2025, 1, 15),
            end_date: date(2025, 3, 10),
            total_budget: 900.0,
            contracted_impressions: 30_000,
            contracted_kpi_goal: 0,
            cpm: 35.0,
            kpi: "CPM".into(),
        };
        let campaign = GenerationService::generate_from_import(&tactic).unwrap();
        assert_eq!(campaign.template_type, TemplateType::Programmatic);
        assert_eq!(campaign.flights.len(), 3);
        assert_eq!(campaign.flights[0].start_date, date(2025, 1, 15));
        assert_eq!(campaign.flights[0].end_date, date(2025, 1, 31));
        assert_eq!(campaign.flights[1].start_date, date(2025, 2, 1));
        assert_eq!(campaign.flights[1].end_date, date(2025, 2, 28));
        assert_eq!(campaign.flights[2].end_date, date(2025, 3, 10));
        assert_eq!(campaign.requested_budget(), 900.0);
    }

    #[test]
    fn import_rejects_reversed_range() {
        let tactic = ImportedTactic {
            id: "li-2".into(),
            display_name: "Meta - Facebook".into(),
            product: "Meta".into(),
            sub_product: "Facebook".into(),
            start_date: date(2025, 4, 1),
            end_date: date(2025, 3, 1),
            total_budget: 100.0,
            contracted_impressions: 0,
            contracted_kpi_goal: 0,
            cpm: 8.0,
            kpi: "CPM".into(),
        };
        let errors = GenerationService::generate_from_import(&tactic).expect_err("reversed");
        assert!(errors.contains(FormField::EndDate));
    }

    #[test]
    fn generated_traffic_keeps_unrounded_buffer() {
        let form = CampaignForm {
            total_budget: "100".into(),
            ..quarter_form()
        };
        let campaign = GenerationService::generate_flights(&form, TemplateType::Programmatic)
            .expect("valid form");
        let FlightMetrics::Programmatic(metrics) = campaign.flights[0].metrics else {
            panic!("expected programmatic metrics");
        };
        assert!((metrics.traffic_budget - 100.0 / 3.0 * 1.01).abs() < 1e-9);
        assert_ne!(metrics.traffic_budget, 33.67);
    }
}
