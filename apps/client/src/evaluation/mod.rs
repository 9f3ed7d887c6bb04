// Client-side evaluation pipeline: payload building, the two service calls,
// and the badge classifier used by the results view.

pub mod classifier;
pub mod orchestrator;
pub mod payload;

pub use classifier::{severity_tier, SeverityTier};
pub use orchestrator::{MealPlanStatus, Orchestrator, PendingPlan, PlanMode, Submission};
pub use payload::{age_in_months, age_preview, build_request, build_request_at};
