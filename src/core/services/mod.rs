//! Ledger operations over a single campaign.

pub mod flight_service;
pub mod generation_service;
pub mod redistribution_service;
pub mod summary_service;

pub use flight_service::{FlightField, FlightService};
pub use generation_service::{FormField, GenerationService, ValidationErrors};
pub use redistribution_service::{RedistributionMethod, RedistributionService};
pub use summary_service::{BudgetDrift, BudgetStatus, FlightTotals, SummaryService};

pub type ServiceResult<T = ()> = Result<T, NoOp>;

/// Why an operation left state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NoOp {
    #[error("campaign not found")]
    CampaignNotFound,
    #[error("flight not found")]
    FlightNotFound,
    #[error("flight is locked")]
    FlightLocked,
    #[error("field is locked on this flight")]
    FieldLocked,
    #[error("field does not apply to this template")]
    FieldNotApplicable,
    #[error("lock toggled again inside the cooldown window")]
    Debounced,
    #[error("no flight is eligible for redistribution")]
    NoEligibleFlights,
    #[error("nothing to redistribute")]
    NothingToDistribute,
    #[error("campaign has no generated baseline")]
    NoBaseline,
    #[error("flight spans a single day and cannot be split")]
    CannotSplit,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}
