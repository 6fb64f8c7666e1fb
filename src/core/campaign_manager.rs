use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::core::history::History;
use crate::core::services::{
    BudgetStatus, FlightField, FlightService, FlightTotals, GenerationService, NoOp,
    RedistributionMethod, RedistributionService, ServiceResult, SummaryService, ValidationErrors,
};
use crate::ledger::{common::position_of, Campaign, CampaignForm, LockScope, TemplateType};
use crate::tactics::ImportedTactic;

/// Facade that owns the campaign collection and records every applied change.
pub struct CampaignManager {
    campaigns: Vec<Campaign>,
    history: History,
    lock_cooldowns: HashMap<(Uuid, Uuid), Instant>,
    lock_debounce: Duration,
    budget_tolerance: f64,
}

impl Default for CampaignManager {
    fn default() -> Self {
        Self::with_config(&PlannerConfig::default())
    }
}

impl CampaignManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &PlannerConfig) -> Self {
        Self {
            campaigns: Vec::new(),
            history: History::with_capacity(config.history_limit),
            lock_cooldowns: HashMap::new(),
            lock_debounce: Duration::from_millis(config.lock_debounce_ms),
            budget_tolerance: config.budget_tolerance,
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn campaign(&self, campaign_id: Uuid) -> Option<&Campaign> {
        self.campaigns
            .iter()
            .find(|campaign| campaign.id == campaign_id)
    }

    pub fn add_campaign(&mut self, campaign: Campaign) -> Uuid {
        let id = campaign.id;
        tracing::info!(campaign = %campaign.name, flights = campaign.flights.len(), "campaign added");
        self.campaigns.push(campaign);
        self.record();
        id
    }

    pub fn generate_campaign(
        &mut self,
        form: &CampaignForm,
        template_type: TemplateType,
    ) -> Result<Uuid, ValidationErrors> {
        let campaign = GenerationService::generate_flights(form, template_type)?;
        Ok(self.add_campaign(campaign))
    }

    pub fn import_campaign(&mut self, tactic: &ImportedTactic) -> Result<Uuid, ValidationErrors> {
        let campaign = GenerationService::generate_from_import(tactic)?;
        Ok(self.add_campaign(campaign))
    }

    pub fn update_campaign_name(&mut self, campaign_id: Uuid, name: &str) -> ServiceResult {
        self.apply(campaign_id, |campaign| {
            campaign.name = name.to_string();
            Ok(())
        })
    }

    pub fn delete_campaign(&mut self, campaign_id: Uuid) -> ServiceResult<Campaign> {
        let Some(index) = position_of(&self.campaigns, campaign_id) else {
            return Err(NoOp::CampaignNotFound);
        };
        let removed = self.campaigns.remove(index);
        self.lock_cooldowns
            .retain(|(campaign, _), _| *campaign != campaign_id);
        tracing::info!(campaign = %removed.name, "campaign deleted");
        self.record();
        Ok(removed)
    }

    pub fn update_flight_value(
        &mut self,
        campaign_id: Uuid,
        flight_id: Uuid,
        field: FlightField,
        value: f64,
    ) -> ServiceResult {
        self.apply(campaign_id, |campaign| {
            FlightService::update_value(campaign, flight_id, field, value)
        })
    }

    pub fn split_flight(&mut self, campaign_id: Uuid, flight_id: Uuid) -> ServiceResult<(Uuid, Uuid)> {
        self.apply(campaign_id, |campaign| FlightService::split(campaign, flight_id))
    }

    pub fn toggle_flight_lock(
        &mut self,
        campaign_id: Uuid,
        flight_id: Uuid,
    ) -> ServiceResult<Option<LockScope>> {
        self.toggle_flight_lock_at(campaign_id, flight_id, Instant::now())
    }

    /// Toggles the lock as of `now`; a repeat toggle of the same flight inside
    /// the debounce window is ignored.
    pub fn toggle_flight_lock_at(
        &mut self,
        campaign_id: Uuid,
        flight_id: Uuid,
        now: Instant,
    ) -> ServiceResult<Option<LockScope>> {
        let key = (campaign_id, flight_id);
        if let Some(until) = self.lock_cooldowns.get(&key) {
            if now < *until {
                tracing::debug!(flight = %flight_id, "lock toggle debounced");
                return Err(NoOp::Debounced);
            }
        }
        let state = self.apply(campaign_id, |campaign| {
            FlightService::toggle_lock(campaign, flight_id)
        })?;
        self.lock_cooldowns.retain(|_, until| *until > now);
        self.lock_cooldowns.insert(key, now + self.lock_debounce);
        Ok(state)
    }

    pub fn set_flight_lock(
        &mut self,
        campaign_id: Uuid,
        flight_id: Uuid,
        scope: Option<LockScope>,
    ) -> ServiceResult {
        self.apply(campaign_id, |campaign| {
            FlightService::set_lock(campaign, flight_id, scope)
        })
    }

    pub fn zero_out_flight(&mut self, campaign_id: Uuid, flight_id: Uuid) -> ServiceResult<f64> {
        self.apply(campaign_id, |campaign| FlightService::zero_out(campaign, flight_id))
    }

    pub fn redistribute_budget(
        &mut self,
        campaign_id: Uuid,
        amount: f64,
        method: RedistributionMethod,
        targets: &[Uuid],
        exclude: Option<Uuid>,
    ) -> ServiceResult {
        self.apply(campaign_id, |campaign| {
            RedistributionService::redistribute(campaign, amount, method, targets, exclude)
        })
    }

    pub fn reset_campaign(&mut self, campaign_id: Uuid) -> ServiceResult {
        self.apply(campaign_id, FlightService::reset)?;
        tracing::info!(campaign = %campaign_id, "campaign reset to generated flights");
        Ok(())
    }

    pub fn undo(&mut self) -> ServiceResult {
        let snapshot = self.history.undo().ok_or(NoOp::NothingToUndo)?;
        self.campaigns = snapshot;
        tracing::debug!(position = ?self.history.position(), "undo");
        Ok(())
    }

    pub fn redo(&mut self) -> ServiceResult {
        let snapshot = self.history.redo().ok_or(NoOp::NothingToRedo)?;
        self.campaigns = snapshot;
        tracing::debug!(position = ?self.history.position(), "redo");
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn budget_status(&self, campaign_id: Uuid) -> Option<BudgetStatus> {
        self.campaign(campaign_id).map(|campaign| {
            SummaryService::budget_status_with_tolerance(campaign, self.budget_tolerance)
        })
    }

    pub fn totals(&self, campaign_id: Uuid) -> Option<FlightTotals> {
        self.campaign(campaign_id).map(SummaryService::totals)
    }

    fn apply<T>(
        &mut self,
        campaign_id: Uuid,
        operation: impl FnOnce(&mut Campaign) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let campaign = self
            .campaigns
            .iter_mut()
            .find(|campaign| campaign.id == campaign_id)
            .ok_or(NoOp::CampaignNotFound)?;
        match operation(campaign) {
            Ok(value) => {
                self.record();
                Ok(value)
            }
            Err(reason) => {
                tracing::debug!(campaign = %campaign_id, %reason, "operation skipped");
                Err(reason)
            }
        }
    }

    fn record(&mut self) {
        self.history.push(&self.campaigns);
        tracing::debug!(snapshots = self.history.len(), "history recorded");
    }
}
