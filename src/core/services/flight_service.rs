use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc::{round_to_cents, round_to_count};
use crate::ledger::{
    Campaign, Flight, FlightMetrics, LineLabel, LockScope, ProgrammaticMetrics, SplitMembership,
    SplitRole, YouTubeMetrics,
};

use super::{NoOp, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlightField {
    Budget,
    Impressions,
    TotalViews,
}

impl FromStr for FlightField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "budget" => Ok(FlightField::Budget),
            "impressions" => Ok(FlightField::Impressions),
            "totalViews" => Ok(FlightField::TotalViews),
            other => Err(format!("unknown flight field `{other}`")),
        }
    }
}

pub struct FlightService;

impl FlightService {
    /// Budget edits derive impressions and impression edits derive budget; the
    /// two are never recomputed together.
    pub fn update_value(
        campaign: &mut Campaign,
        flight_id: Uuid,
        field: FlightField,
        value: f64,
    ) -> ServiceResult {
        let rate = campaign.rate_config;
        let flight = campaign
            .flight_mut(flight_id)
            .ok_or(NoOp::FlightNotFound)?;
        if flight.is_fully_locked() {
            return Err(NoOp::FlightLocked);
        }
        match field {
            FlightField::Budget => {
                if flight.freezes(LockScope::Budget) {
                    return Err(NoOp::FieldLocked);
                }
                flight.set_budget(value, &rate);
            }
            FlightField::Impressions => {
                if flight.freezes(LockScope::Impressions) {
                    return Err(NoOp::FieldLocked);
                }
                if !flight.set_impressions(round_to_count(value), &rate) {
                    return Err(NoOp::FieldNotApplicable);
                }
            }
            FlightField::TotalViews => {
                if !flight.set_total_views(round_to_count(value), &rate) {
                    return Err(NoOp::FieldNotApplicable);
                }
            }
        }
        Ok(())
    }

    /// Replaces the flight in place with two halves split at the date midpoint.
    pub fn split(campaign: &mut Campaign, flight_id: Uuid) -> ServiceResult<(Uuid, Uuid)> {
        let index = campaign
            .flight_index(flight_id)
            .ok_or(NoOp::FlightNotFound)?;
        let rate = campaign.rate_config;
        let original = &campaign.flights[index];

        let total_days = (original.end_date - original.start_date).num_days();
        if total_days < 1 {
            return Err(NoOp::CannotSplit);
        }
        let half_days = (total_days + 1) / 2;
        let mid = original.start_date + Duration::days(half_days);

        let first_budget = round_to_cents(original.budget / 2.0);
        let second_budget = round_to_cents(original.budget - first_budget);

        let (parent_id, first_role) = match original.split {
            Some(membership) => (membership.parent_id, membership.role),
            None => (Uuid::new_v4(), SplitRole::Parent),
        };

        let mut first = original.clone();
        let mut second = original.clone();

        if !original.is_parent() {
            first.id = Uuid::new_v4();
        }
        first.line = match first_role {
            SplitRole::Parent => original.line,
            SplitRole::Child => LineLabel::Collapsed,
        };
        first.split = Some(SplitMembership {
            parent_id,
            role: first_role,
        });
        first.end_date = mid - Duration::days(1);
        first.budget = first_budget;

        second.id = Uuid::new_v4();
        second.line = LineLabel::Collapsed;
        second.split = Some(SplitMembership {
            parent_id,
            role: SplitRole::Child,
        });
        second.start_date = mid;
        second.budget = second_budget;

        match original.metrics {
            FlightMetrics::Programmatic(metrics) => {
                let first_impressions = round_to_count(metrics.impressions as f64 / 2.0);
                let second_impressions = metrics.impressions - first_impressions;
                first.metrics = FlightMetrics::Programmatic(ProgrammaticMetrics::with_traffic(
                    first_impressions,
                    first_budget,
                    rate.rate,
                ));
                second.metrics = FlightMetrics::Programmatic(ProgrammaticMetrics::with_traffic(
                    second_impressions,
                    second_budget,
                    rate.rate,
                ));
            }
            FlightMetrics::YouTube(metrics) => {
                let first_views = round_to_count(metrics.total_views as f64 / 2.0);
                let second_views = metrics.total_views - first_views;
                first.metrics = FlightMetrics::YouTube(YouTubeMetrics::derive(
                    first_views,
                    first.active_days() as u32,
                    &rate,
                ));
                second.metrics = FlightMetrics::YouTube(YouTubeMetrics::derive(
                    second_views,
                    second.active_days() as u32,
                    &rate,
                ));
            }
            FlightMetrics::SemSocial => {}
        }

        let ids = (first.id, second.id);
        campaign.flights.splice(index..=index, [first, second]);
        tracing::debug!(
            campaign = %campaign.name,
            parent_id = %parent_id,
            "split flight into two halves"
        );
        Ok(ids)
    }

    pub fn toggle_lock(
        campaign: &mut Campaign,
        flight_id: Uuid,
    ) -> ServiceResult<Option<LockScope>> {
        let flight = campaign
            .flight_mut(flight_id)
            .ok_or(NoOp::FlightNotFound)?;
        flight.locked = if flight.is_fully_locked() {
            None
        } else {
            Some(LockScope::All)
        };
        Ok(flight.locked)
    }

    pub fn set_lock(
        campaign: &mut Campaign,
        flight_id: Uuid,
        scope: Option<LockScope>,
    ) -> ServiceResult {
        let flight = campaign
            .flight_mut(flight_id)
            .ok_or(NoOp::FlightNotFound)?;
        flight.locked = scope;
        Ok(())
    }

    /// Returns the budget the flight held before zeroing.
    pub fn zero_out(campaign: &mut Campaign, flight_id: Uuid) -> ServiceResult<f64> {
        let flight = campaign
            .flight_mut(flight_id)
            .ok_or(NoOp::FlightNotFound)?;
        if flight.is_fully_locked() {
            return Err(NoOp::FlightLocked);
        }
        let freed = flight.budget;
        flight.zero_out();
        flight.locked = Some(LockScope::All);
        Ok(freed)
    }

    pub fn reset(campaign: &mut Campaign) -> ServiceResult {
        let baseline: Vec<Flight> = campaign
            .original_flights
            .as_ref()
            .ok_or(NoOp::NoBaseline)?
            .clone();
        campaign.flights = baseline;
        Ok(())
    }
}
