//! Campaign and flight records plus the per-template derivation rules.

pub mod campaign;
pub mod common;
pub mod flight;
pub mod template;

pub use campaign::{Campaign, CampaignForm, DateRange};
pub use common::Identifiable;
pub use flight::{
    Flight, FlightMetrics, LineLabel, LockScope, ProgrammaticMetrics, SplitMembership,
    SplitRole, YouTubeMetrics,
};
pub use template::{MetricType, RateConfig, TemplateType};
