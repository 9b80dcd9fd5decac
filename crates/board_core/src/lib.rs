//! Flight board core: seeded records, the scripted claim timeline, the
//! claim-paid notifier and the projection the front ends render.

pub mod clock;
pub mod config;
pub mod notifier;
pub mod probe;
pub mod session;
pub mod store;
pub mod timer;
pub mod view;

pub use config::{load_settings, BoardSettings, ConfigError};
pub use notifier::{ClaimNotifier, HttpClaimNotifier, NotifyAck, NotifyError};
pub use session::{BoardSession, DeliveryStatus, SessionUpdate};
pub use view::{BoardView, DisplayZone};
