//! Weekly meal plan as returned by `/generate-mealplan`.
//!
//! Decoding is strict at the top level (a body without `plan` is a decode error)
//! and lenient below it: a day with a malformed field keeps the field as `None`
//! so the report can print a placeholder instead of dropping the whole plan.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::format::{format_number, PLACEHOLDER};

// ────────────────────────────────────────────────────────────────────────────
// Weekdays
// ────────────────────────────────────────────────────────────────────────────

/// Fixed 7-day cycle. `Ord` follows the canonical Monday-first order, so any
/// `BTreeMap<Weekday, _>` iterates in report order regardless of wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Key used by the service (`"miércoles"`, `"sábado"`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Weekday::Monday => "lunes",
            Weekday::Tuesday => "martes",
            Weekday::Wednesday => "miércoles",
            Weekday::Thursday => "jueves",
            Weekday::Friday => "viernes",
            Weekday::Saturday => "sábado",
            Weekday::Sunday => "domingo",
        }
    }

    /// Capitalized heading used on screen and in the report.
    pub fn title(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    /// Case- and accent-insensitive lookup of a service day key.
    pub fn from_key(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();
        match folded.as_str() {
            "lunes" => Some(Weekday::Monday),
            "martes" => Some(Weekday::Tuesday),
            "miercoles" => Some(Weekday::Wednesday),
            "jueves" => Some(Weekday::Thursday),
            "viernes" => Some(Weekday::Friday),
            "sabado" => Some(Weekday::Saturday),
            "domingo" => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Meal items
// ────────────────────────────────────────────────────────────────────────────

/// A structured food portion. Each field degrades to `None` on its own when
/// missing or of the wrong type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPortion {
    #[serde(alias = "nombre", default, deserialize_with = "de_text")]
    pub name: Option<String>,
    #[serde(alias = "cantidad", default, deserialize_with = "de_text")]
    pub quantity: Option<String>,
    #[serde(alias = "calorias", default, deserialize_with = "de_number")]
    pub kcal: Option<f64>,
}

/// One entry of a meal: either a plain label or a structured portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MealItem {
    Label(String),
    Portion(FoodPortion),
}

/// Separator between the segments of a structured item.
pub const ITEM_SEGMENT_SEPARATOR: &str = " — ";

impl fmt::Display for MealItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealItem::Label(text) => f.write_str(text),
            MealItem::Portion(portion) => {
                let name = portion.name.as_deref().filter(|n| !n.trim().is_empty());
                let mut segments = vec![name.unwrap_or(PLACEHOLDER).to_string()];
                if let Some(quantity) = portion.quantity.as_deref().filter(|q| !q.trim().is_empty()) {
                    segments.push(quantity.to_string());
                }
                if let Some(kcal) = portion.kcal {
                    segments.push(format!("{} kcal", format_number(kcal)));
                }
                f.write_str(&segments.join(ITEM_SEGMENT_SEPARATOR))
            }
        }
    }
}

/// Names and quantities arrive either as text (`"150g"`) or as a bare number.
fn de_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => n.as_f64().map(format_number),
        _ => None,
    })
}

fn de_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

// ────────────────────────────────────────────────────────────────────────────
// Day and week
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Macros {
    pub carbs_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub name: String,
    pub items: Vec<MealItem>,
}

impl Meal {
    /// Items formatted and joined with `separator`.
    pub fn joined_items(&self, separator: &str) -> String {
        self.items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// One weekday of the plan. `None` means the service sent the field missing or malformed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayPlan {
    pub total_kcal: Option<f64>,
    pub macros: Option<Macros>,
    /// Meals in the order the service listed them.
    pub meals: Option<Vec<Meal>>,
}

impl DayPlan {
    fn from_value(day: Weekday, value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!(day = day.key(), "Meal plan day is not an object");
            return DayPlan::default();
        };

        let macros = obj.get("macros").and_then(Value::as_object).map(|m| Macros {
            carbs_g: m.get("carbohidratos").and_then(Value::as_f64),
            protein_g: m.get("proteinas").and_then(Value::as_f64),
            fat_g: m.get("grasas").and_then(Value::as_f64),
        });

        let meals = obj
            .get("comidas")
            .and_then(Value::as_object)
            .map(|comidas| parse_meals(day, comidas));

        DayPlan {
            total_kcal: obj.get("calorias_totales").and_then(Value::as_f64),
            macros,
            meals,
        }
    }
}

fn parse_meals(day: Weekday, comidas: &Map<String, Value>) -> Vec<Meal> {
    comidas
        .iter()
        .map(|(name, value)| {
            let items = match value {
                Value::Array(raw_items) => raw_items
                    .iter()
                    .filter_map(|raw| match serde_json::from_value::<MealItem>(raw.clone()) {
                        Ok(item) => Some(item),
                        Err(e) => {
                            warn!(day = day.key(), meal = %name, "Skipping malformed meal item: {e}");
                            None
                        }
                    })
                    .collect(),
                Value::String(label) => vec![MealItem::Label(label.clone())],
                _ => {
                    warn!(day = day.key(), meal = %name, "Meal items are not a list");
                    Vec::new()
                }
            };
            Meal {
                name: name.clone(),
                items,
            }
        })
        .collect()
}

/// Wire shape of the `/generate-mealplan` body.
#[derive(Debug, Deserialize)]
struct MealPlanWire {
    plan: Map<String, Value>,
    #[serde(default, alias = "calorias_semanales", alias = "weekly_total_kcal")]
    total_semanal: Option<f64>,
}

/// The weekly plan. Days iterate in canonical order; missing days are absent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "MealPlanWire")]
pub struct MealPlan {
    pub days: BTreeMap<Weekday, DayPlan>,
    pub weekly_total_kcal: Option<f64>,
}

impl From<MealPlanWire> for MealPlan {
    fn from(wire: MealPlanWire) -> Self {
        let mut days = BTreeMap::new();
        for (key, value) in &wire.plan {
            match Weekday::from_key(key) {
                Some(day) => {
                    days.insert(day, DayPlan::from_value(day, value));
                }
                None => warn!(key = %key, "Ignoring unknown weekday in meal plan"),
            }
        }
        MealPlan {
            days,
            weekly_total_kcal: wire.total_semanal,
        }
    }
}

impl MealPlan {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in canonical order.
    pub fn ordered_days(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> {
        self.days.iter().map(|(day, plan)| (*day, plan))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
