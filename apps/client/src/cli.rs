use std::path::PathBuf;

use clap::Parser;

use growth_client::models::RawForm;

/// Child growth evaluation and weekly meal-plan export.
#[derive(Parser, Debug)]
#[command(name = "growth-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Birth date, YYYY-MM-DD
    #[arg(long)]
    pub birth_date: String,

    /// M or F
    #[arg(long)]
    pub sex: String,

    /// Weight in kilograms
    #[arg(long)]
    pub weight: String,

    /// Height in centimeters
    #[arg(long)]
    pub height: String,

    /// sedentario, moderado or activo
    #[arg(long, default_value = "moderado")]
    pub activity: String,

    /// Request the meal plan only when it is needed for export
    #[arg(long)]
    pub defer_plan: bool,

    /// Export the meal plan as PDF; without a value REPORT_PATH is used
    #[arg(long, value_name = "PATH")]
    pub export: Option<Option<PathBuf>>,
}

impl Cli {
    pub fn form(&self) -> RawForm {
        RawForm {
            birth_date: self.birth_date.clone(),
            sex: self.sex.clone(),
            weight_kg: self.weight.clone(),
            height_cm: self.height.clone(),
            activity: self.activity.clone(),
        }
    }
}
