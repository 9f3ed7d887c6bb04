//! Payload Builder: raw form fields → `Subject` → `EvaluationRequest`.
//!
//! Pure functions only. The evaluation date is a parameter everywhere except
//! `build_request`, which reads today's local date.

use chrono::{Datelike, Local, NaiveDate};

use crate::errors::AppError;
use crate::models::{ActivityLevel, EvaluationRequest, RawForm, Sex, Subject};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole completed months between `birth` and `today`.
///
/// Calendar-month difference, minus one when today's day-of-month is before the
/// birth day-of-month. Returns `None` when the birth date lies in the future.
pub fn age_in_months(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut months = (today.year() - birth.year()) * 12 + today.month() as i32 - birth.month() as i32;
    if today.day() < birth.day() {
        months -= 1;
    }
    u32::try_from(months).ok()
}

/// Live "Edad estimada" preview shown under the birth-date field.
pub fn age_preview(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), DATE_FORMAT).ok()?;
    age_in_months(birth, today)
}

impl Subject {
    /// Parses and validates the raw form.
    pub fn from_form(form: &RawForm) -> Result<Self, AppError> {
        let birth_date = parse_birth_date(&form.birth_date)?;
        let sex = Sex::parse(&form.sex)
            .ok_or_else(|| AppError::InvalidInput("Selecciona el sexo (M o F)".to_string()))?;
        let weight_kg = parse_positive(&form.weight_kg, "Peso")?;
        let height_cm = parse_positive(&form.height_cm, "Altura")?;
        let activity_level = ActivityLevel::parse(&form.activity).ok_or_else(|| {
            AppError::InvalidInput(format!("Nivel de actividad desconocido: '{}'", form.activity.trim()))
        })?;

        Ok(Subject {
            birth_date,
            sex,
            weight_kg,
            height_cm,
            activity_level,
        })
    }
}

/// Builds the request for today's date.
pub fn build_request(subject: &Subject) -> Result<EvaluationRequest, AppError> {
    build_request_at(subject, Local::now().date_naive())
}

/// Builds the request as of `today`. Height is converted from centimeters to meters.
pub fn build_request_at(subject: &Subject, today: NaiveDate) -> Result<EvaluationRequest, AppError> {
    ensure_positive(subject.weight_kg, "Peso")?;
    ensure_positive(subject.height_cm, "Altura")?;

    let age_months = age_in_months(subject.birth_date, today)
        .ok_or_else(|| AppError::InvalidInput("Fecha de nacimiento inválida".to_string()))?;

    Ok(EvaluationRequest {
        sex: subject.sex,
        age_months,
        weight_kg: subject.weight_kg,
        height_m: subject.height_cm / 100.0,
    })
}

fn parse_birth_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput("Fecha de nacimiento requerida".to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::InvalidInput("Fecha de nacimiento inválida".to_string()))
}

/// Accepts `,` as decimal separator since the form is used with Spanish keyboards.
fn parse_positive(raw: &str, field: &str) -> Result<f64, AppError> {
    let value = raw
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| AppError::InvalidInput(format!("{field} debe ser un número")))?;
    ensure_positive(value, field)?;
    Ok(value)
}

fn ensure_positive(value: f64, field: &str) -> Result<(), AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!("{field} debe ser mayor que cero")))
    }
}
