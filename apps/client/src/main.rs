mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use growth_client::config::Config;
use growth_client::evaluation::{age_preview, MealPlanStatus, Orchestrator, PlanMode};
use growth_client::export::export_plan;
use growth_client::models::Subject;
use growth_client::service_client::ServiceClient;
use growth_client::ui::{
    draw_bars, draw_listing, percentile_chart, plan_listing, results_view, AppModel, View,
};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting growth client v{}", env!("CARGO_PKG_VERSION"));

    let form = cli.form();
    if let Some(months) = age_preview(&form.birth_date, Local::now().date_naive()) {
        println!("Edad estimada: {months} meses");
    }
    let subject = match Subject::from_form(&form) {
        Ok(subject) => subject,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::from(2));
        }
    };

    let client = ServiceClient::new(&config.service_url, config.request_timeout)?;
    info!(
        "Evaluation service at {} (timeout {:?})",
        client.base_url(),
        config.request_timeout
    );
    let orchestrator = Orchestrator::new(Arc::new(client));
    let activity = subject.activity_level;
    let mode = if cli.defer_plan { PlanMode::Deferred } else { PlanMode::Automatic };

    let mut model = AppModel::new();
    let mut pending = None;
    let ticket = model.begin_submit();
    println!("Evaluando…");
    tokio::select! {
        outcome = orchestrator.evaluate_and_plan(&subject, activity, mode) => {
            let outcome = outcome.map(|(submission, plan)| {
                pending = plan;
                submission
            });
            model.apply_submission(ticket, outcome);
        }
        _ = tokio::signal::ctrl_c() => {
            model.back();
            warn!("Interrupted; in-flight requests abandoned");
            return Ok(ExitCode::from(130));
        }
    }

    let submission = match model.view() {
        View::Results { submission } => submission,
        View::Form { error } => {
            if let Some(error) = error {
                eprintln!("{}", error.message);
                if let Some(detail) = &error.detail {
                    eprintln!("{detail}");
                }
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    print!("{}", results_view(&submission.results));
    if let Some(bars) = percentile_chart(&submission.results) {
        println!();
        print!("{}", draw_bars(&bars));
    }

    // Results are out; now settle the plan that ran beside the evaluation.
    if let Some(pending) = pending {
        if let Some(plan_ticket) = model.begin_plan_request() {
            println!("\nGenerando plan alimenticio…");
            tokio::select! {
                result = pending.wait() => {
                    model.apply_plan(plan_ticket, result);
                }
                _ = tokio::signal::ctrl_c() => {
                    model.back();
                    warn!("Interrupted; meal plan request abandoned");
                    return Ok(ExitCode::from(130));
                }
            }
        }
    }
    match submission_plan(&model) {
        Some(MealPlanStatus::Ready(plan)) => {
            println!();
            print!("{}", draw_listing(&plan_listing(plan), plan.weekly_total_kcal));
        }
        Some(MealPlanStatus::Unavailable) => println!("\nPlan alimenticio no disponible."),
        _ => {}
    }

    let Some(export) = cli.export else {
        return Ok(ExitCode::SUCCESS);
    };
    let path = export.unwrap_or_else(|| config.report_path.clone());

    if matches!(submission_plan(&model), Some(MealPlanStatus::NotRequested)) {
        if let Some(plan_ticket) = model.begin_plan_request() {
            println!("Generando plan alimenticio…");
            let result = orchestrator.generate_meal_plan(&subject, activity).await;
            model.apply_plan(plan_ticket, result);
        }
    }

    let plan = match submission_plan(&model) {
        Some(MealPlanStatus::Ready(plan)) => plan.clone(),
        _ => {
            eprintln!("No hay plan alimenticio para exportar.");
            return Ok(ExitCode::FAILURE);
        }
    };

    match export_plan(plan, path).await {
        Ok((written, document)) => {
            println!(
                "Plan exportado: {} ({} páginas)",
                written.display(),
                document.page_count()
            );
            if document.has_issues() {
                println!("Campos sin datos en el plan: {}", document.issues.len());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn submission_plan(model: &AppModel) -> Option<&MealPlanStatus> {
    match model.view() {
        View::Results { submission } => Some(&submission.meal_plan),
        View::Form { .. } => None,
    }
}
