//! Front-end state machine: `Form` ⇄ `Results`.
//!
//! Every async request is started with a `Ticket` holding the generation it was
//! issued in. Leaving a view or starting a new submission bumps the generation,
//! so responses that arrive late are dropped instead of overwriting newer state.

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::evaluation::{MealPlanStatus, Submission};
use crate::models::MealPlan;

/// Shown above the form whenever a submission fails for a non-input reason.
pub const EVALUATION_FAILED: &str = "No se pudo calcular la evaluación.";

#[derive(Debug, Clone, PartialEq)]
pub struct FormError {
    pub message: String,
    pub detail: Option<String>,
}

impl FormError {
    fn from_app_error(e: &AppError) -> Self {
        match e {
            AppError::InvalidInput(msg) => FormError { message: msg.clone(), detail: None },
            other => {
                let detail = other.user_message();
                FormError {
                    message: EVALUATION_FAILED.to_string(),
                    detail: (detail != EVALUATION_FAILED).then_some(detail),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Form { error: Option<FormError> },
    Results { submission: Submission },
}

/// Proof that a request was started in a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

#[derive(Debug)]
pub struct AppModel {
    view: View,
    generation: u64,
    busy: bool,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            view: View::Form { error: None },
            generation: 0,
            busy: false,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// A request is in flight; the submit button shows "Evaluando…".
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Starts a submission from the form. Clears any previous error.
    pub fn begin_submit(&mut self) -> Ticket {
        self.generation += 1;
        self.busy = true;
        self.view = View::Form { error: None };
        Ticket { generation: self.generation }
    }

    /// Applies a finished submission. Returns `false` when the ticket is stale.
    pub fn apply_submission(&mut self, ticket: Ticket, outcome: Result<Submission, AppError>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.generation, current = self.generation, "Dropping stale submission");
            return false;
        }
        self.busy = false;
        self.view = match outcome {
            Ok(submission) => View::Results { submission },
            Err(e) => {
                warn!(code = e.code(), "Submission failed: {e}");
                View::Form { error: Some(FormError::from_app_error(&e)) }
            }
        };
        true
    }

    /// Returns to the form and abandons whatever is in flight.
    pub fn back(&mut self) {
        self.generation += 1;
        self.busy = false;
        self.view = View::Form { error: None };
    }

    /// Starts a plan request from the results view, or claims the one still
    /// pending from the submission. `None` outside `Results` or when a plan is
    /// already there.
    pub fn begin_plan_request(&mut self) -> Option<Ticket> {
        match &self.view {
            View::Results { submission } if submission.meal_plan.plan().is_none() => {
                self.busy = true;
                Some(Ticket { generation: self.generation })
            }
            _ => None,
        }
    }

    /// Fills the plan slot. A failure becomes `Unavailable`; the results stay.
    pub fn apply_plan(&mut self, ticket: Ticket, result: Result<MealPlan, AppError>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.generation, current = self.generation, "Dropping stale meal plan");
            return false;
        }
        let View::Results { submission } = &mut self.view else {
            return false;
        };
        self.busy = false;
        submission.meal_plan = match result {
            Ok(plan) => MealPlanStatus::Ready(plan),
            Err(e) => {
                warn!(code = e.code(), "Deferred meal plan failed: {e}");
                MealPlanStatus::Unavailable
            }
        };
        true
    }
}
