//! Full-screen review of a plan before any script is written.

mod app;
mod events;
mod models;
mod rendering;

pub use app::App;
pub use events::run_review;
pub use models::{PlanStats, ReviewOutcome};
