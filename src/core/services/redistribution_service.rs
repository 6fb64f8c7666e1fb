use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc::round_to_cents;
use crate::ledger::Campaign;

use super::{NoOp, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedistributionMethod {
    Even,
    /// Proportional to active days.
    Weighted,
    Custom,
}

impl FromStr for RedistributionMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "even" => Ok(RedistributionMethod::Even),
            "weighted" => Ok(RedistributionMethod::Weighted),
            "custom" => Ok(RedistributionMethod::Custom),
            other => Err(format!("unknown redistribution method `{other}`")),
        }
    }
}

pub struct RedistributionService;

impl RedistributionService {
    /// `custom` credits exactly `targets`, skipping only flights locked `all`.
    pub fn redistribute(
        campaign: &mut Campaign,
        amount: f64,
        method: RedistributionMethod,
        targets: &[Uuid],
        exclude: Option<Uuid>,
    ) -> ServiceResult {
        if round_to_cents(amount) <= 0.0 {
            return Err(NoOp::NothingToDistribute);
        }

        let eligible = Self::eligible_indices(campaign, method, targets, exclude);
        if eligible.is_empty() {
            return Err(NoOp::NoEligibleFlights);
        }

        let increments = match method {
            RedistributionMethod::Weighted => {
                let weights: Vec<i64> = eligible
                    .iter()
                    .map(|&index| campaign.flights[index].active_days())
                    .collect();
                Self::weighted_shares(amount, &weights)
            }
            RedistributionMethod::Even | RedistributionMethod::Custom => {
                Self::even_shares(amount, eligible.len())
            }
        };

        let rate = campaign.rate_config;
        for (index, increment) in eligible.into_iter().zip(increments) {
            campaign.flights[index].credit_budget(increment, &rate);
        }
        tracing::debug!(
            campaign = %campaign.name,
            amount,
            method = ?method,
            "redistributed budget"
        );
        Ok(())
    }

    /// Leftover cents go one apiece to the leading shares.
    pub fn even_shares(amount: f64, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let cents = (round_to_cents(amount) * 100.0).round() as i64;
        let count_i = count as i64;
        let per_share = cents.div_euclid(count_i);
        let remainder = cents.rem_euclid(count_i);
        (0..count_i)
            .map(|position| {
                let extra = i64::from(position < remainder);
                (per_share + extra) as f64 / 100.0
            })
            .collect()
    }

    pub fn weighted_shares(amount: f64, weights: &[i64]) -> Vec<f64> {
        let total: i64 = weights.iter().map(|weight| (*weight).max(0)).sum();
        if total <= 0 {
            return Self::even_shares(amount, weights.len());
        }
        weights
            .iter()
            .map(|weight| round_to_cents(amount * (*weight).max(0) as f64 / total as f64))
            .collect()
    }

    fn eligible_indices(
        campaign: &Campaign,
        method: RedistributionMethod,
        targets: &[Uuid],
        exclude: Option<Uuid>,
    ) -> Vec<usize> {
        match method {
            RedistributionMethod::Custom => {
                let mut indices: Vec<usize> = Vec::with_capacity(targets.len());
                for id in targets {
                    let Some(index) = campaign.flight_index(*id) else {
                        continue;
                    };
                    if campaign.flights[index].is_fully_locked() || indices.contains(&index) {
                        continue;
                    }
                    indices.push(index);
                }
                indices
            }
            RedistributionMethod::Even | RedistributionMethod::Weighted => campaign
                .flights
                .iter()
                .enumerate()
                .filter(|(_, flight)| Some(flight.id) != exclude && !flight.is_locked())
                .map(|(index, _)| index)
                .collect(),
        }
    }
}
