use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Accepts the form's option values (`M`/`F`) and their spelled-out labels.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "m" | "masculino" => Some(Sex::Male),
            "f" | "femenino" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Coarse physical-activity tier sent as the `actividad` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "sedentario")]
    Sedentary,
    #[default]
    #[serde(rename = "moderado")]
    Moderate,
    #[serde(rename = "activo")]
    Active,
}

impl ActivityLevel {
    /// Parses the form value. An empty selection falls back to `Moderate`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" => Some(ActivityLevel::default()),
            "sedentario" | "sedentary" => Some(ActivityLevel::Sedentary),
            "moderado" | "moderate" => Some(ActivityLevel::Moderate),
            "activo" | "active" => Some(ActivityLevel::Active),
            _ => None,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentario",
            ActivityLevel::Moderate => "moderado",
            ActivityLevel::Active => "activo",
        }
    }
}

/// Raw form fields exactly as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RawForm {
    pub birth_date: String,
    pub sex: String,
    pub weight_kg: String,
    pub height_cm: String,
    pub activity: String,
}

/// The evaluated child. Built once from the form and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
}

/// Request body shared by `/evaluate-all` and `/generate-mealplan`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRequest {
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "edad_meses")]
    pub age_months: u32,
    #[serde(rename = "peso")]
    pub weight_kg: f64,
    /// Height in meters.
    #[serde(rename = "altura")]
    pub height_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parse_accepts_codes_and_labels() {
        assert_eq!(Sex::parse("M"), Some(Sex::Male));
        assert_eq!(Sex::parse(" femenino "), Some(Sex::Female));
        assert_eq!(Sex::parse(""), None);
        assert_eq!(Sex::parse("X"), None);
    }

    #[test]
    fn test_empty_activity_defaults_to_moderate() {
        assert_eq!(ActivityLevel::parse(""), Some(ActivityLevel::Moderate));
        assert_eq!(ActivityLevel::parse("Activo"), Some(ActivityLevel::Active));
        assert_eq!(ActivityLevel::parse("extreme"), None);
    }

    #[test]
    fn test_request_serializes_with_service_field_names() {
        let request = EvaluationRequest {
            sex: Sex::Male,
            age_months: 96,
            weight_kg: 30.5,
            height_m: 1.34,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"sexo": "M", "edad_meses": 96, "peso": 30.5, "altura": 1.34})
        );
    }
}
