pub mod campaign_manager;
pub mod history;
pub mod services;

pub use campaign_manager::CampaignManager;
pub use history::History;
