//! Two-phase lifecycle step handlers
//!
//! Add and remove orchestrate a model-persistence phase and a
//! runtime-effects phase. Model mutation is atomic and independently
//! auditable from the possibly-fallible act of starting real services, so
//! a runtime-phase failure rolls back only runtime effects (with the one
//! asymmetry that remove restores its detached node so it can be retried).

pub mod add;
pub mod remove;
pub mod service_host;

pub use add::AddStepHandler;
pub use remove::RemoveStepHandler;
pub use service_host::{HostEvent, RecordingHost, ServiceHost};
