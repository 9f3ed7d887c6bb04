//! Evaluation Orchestrator: the two service calls behind one form submission.
//!
//! # Contract
//! - `evaluate` is load-bearing: any failure is returned to the caller and no
//!   bundle exists.
//! - `generate_meal_plan` surfaces its errors when called on its own.
//! - `evaluate_and_plan` returns as soon as the evaluation resolves. In
//!   `Automatic` mode the plan keeps running as a `PendingPlan`; it never fails,
//!   delays or replaces the evaluation, and a failed plan only ever becomes
//!   `MealPlanStatus::Unavailable`.
//! - One attempt per call; the calls share nothing but the immutable subject.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::evaluation::payload::build_request;
use crate::models::{ActivityLevel, EvaluationBundle, MealPlan, Subject};
use crate::service_client::EvaluationService;

/// Whether the combined flow requests the plan right away or waits for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanMode {
    #[default]
    Automatic,
    Deferred,
}

/// The meal-plan slot of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum MealPlanStatus {
    Ready(MealPlan),
    /// The request was made and failed; the UI shows "not available".
    Unavailable,
    /// Automatic mode: requested alongside the evaluation, not settled yet.
    Pending,
    /// Deferred mode: nothing requested yet.
    NotRequested,
}

impl MealPlanStatus {
    pub fn plan(&self) -> Option<&MealPlan> {
        match self {
            MealPlanStatus::Ready(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub results: EvaluationBundle,
    pub meal_plan: MealPlanStatus,
}

/// A meal-plan request still in flight after its evaluation returned.
///
/// Dropping it abandons the request.
#[derive(Debug)]
pub struct PendingPlan {
    handle: JoinHandle<Result<MealPlan, AppError>>,
}

impl PendingPlan {
    /// Waits for the plan. The outcome goes to `AppModel::apply_plan`.
    pub async fn wait(mut self) -> Result<MealPlan, AppError> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) => Err(AppError::Network(format!("meal plan request did not complete: {e}"))),
        }
    }
}

impl Drop for PendingPlan {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    service: Arc<dyn EvaluationService>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn EvaluationService>) -> Self {
        Self { service }
    }

    /// Primary evaluation. Every failure is surfaced.
    pub async fn evaluate(
        &self,
        subject: &Subject,
        activity: ActivityLevel,
    ) -> Result<EvaluationBundle, AppError> {
        let request = build_request(subject)?;
        let bundle = self.service.evaluate_all(&request, activity).await?;
        info!(
            age_months = request.age_months,
            actividad = activity.as_query(),
            "Evaluation received"
        );
        Ok(bundle)
    }

    /// Standalone meal-plan generation. Every failure is surfaced.
    pub async fn generate_meal_plan(
        &self,
        subject: &Subject,
        activity: ActivityLevel,
    ) -> Result<MealPlan, AppError> {
        let request = build_request(subject)?;
        let plan = self.service.generate_meal_plan(&request, activity).await?;
        info!(days = plan.days.len(), "Meal plan received");
        Ok(plan)
    }

    /// Starts the plan request on its own task.
    pub fn spawn_meal_plan(&self, subject: &Subject, activity: ActivityLevel) -> PendingPlan {
        let orchestrator = self.clone();
        let subject = subject.clone();
        let handle =
            tokio::spawn(async move { orchestrator.generate_meal_plan(&subject, activity).await });
        PendingPlan { handle }
    }

    /// Runs the evaluation and, in `Automatic` mode, starts the plan beside it.
    ///
    /// Returns once the evaluation resolves. On success the submission's plan
    /// slot is `Pending` and the running request comes back with it; on failure
    /// the plan request is abandoned.
    pub async fn evaluate_and_plan(
        &self,
        subject: &Subject,
        activity: ActivityLevel,
        mode: PlanMode,
    ) -> Result<(Submission, Option<PendingPlan>), AppError> {
        match mode {
            PlanMode::Automatic => {
                let pending = self.spawn_meal_plan(subject, activity);
                let results = self.evaluate(subject, activity).await.map_err(|e| {
                    debug!("Evaluation failed; abandoning meal plan request");
                    e
                })?;
                let submission = Submission {
                    results,
                    meal_plan: MealPlanStatus::Pending,
                };
                Ok((submission, Some(pending)))
            }
            PlanMode::Deferred => {
                let submission = Submission {
                    results: self.evaluate(subject, activity).await?,
                    meal_plan: MealPlanStatus::NotRequested,
                };
                Ok((submission, None))
            }
        }
    }
}
