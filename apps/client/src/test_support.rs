//! Fixtures shared by the in-module test suites.

use serde_json::{json, Value};

use crate::models::{MealPlan, RawForm};

pub fn sample_form() -> RawForm {
    RawForm {
        birth_date: "2016-05-20".to_string(),
        sex: "M".to_string(),
        weight_kg: "30.5".to_string(),
        height_cm: "134".to_string(),
        activity: "moderado".to_string(),
    }
}

pub fn sample_bundle_json() -> Value {
    json!({
        "imc": {"type": "IMC (OMS)", "value": 16.99, "zscore": 0.42, "percentile": 66.3, "classification": "Peso normal"},
        "peso_por_edad": {"type": "Peso por edad", "value": 30.5, "zscore": 1.1, "percentile": 86.4, "classification": "Peso normal"},
        "altura_por_edad": {"type": "Altura por edad", "value": 134.0, "zscore": 0.9, "percentile": 81.6, "classification": "Talla normal"},
        "calorias": {
            "TMB (Schofield)": 1197.35,
            "TMB (OMS)": 1187.35,
            "GET (Schofield)": 1796.03,
            "GET (OMS)": 1781.03,
            "IMC": 16.99,
            "Percentil IMC": 66.3,
            "Clasificación OMS": "Peso normal",
            "Factor de actividad": 1.5,
            "Nivel de actividad": "moderado",
            "Sugerencia": null
        }
    })
}

fn sample_day(kcal: f64) -> Value {
    json!({
        "calorias_totales": kcal,
        "macros": {"carbohidratos": 220, "proteinas": 65.5, "grasas": 58},
        "comidas": {
            "desayuno": ["Avena con leche", {"nombre": "Plátano", "cantidad": "1 unidad", "kcal": 105}],
            "colacion": [{"nombre": "Manzana", "cantidad": "150g", "kcal": 78}],
            "almuerzo": ["Arroz", {"nombre": "Pollo", "cantidad": "100g", "kcal": 165}, "Ensalada"],
            "cena": [{"nombre": "Sopa de verduras"}]
        }
    })
}

/// A full seven-day plan with the keys deliberately out of canonical order.
pub fn sample_plan_json() -> Value {
    json!({
        "plan": {
            "domingo": sample_day(1780.0),
            "lunes": sample_day(1781.0),
            "martes": sample_day(1779.5),
            "miércoles": sample_day(1781.0),
            "jueves": sample_day(1782.0),
            "viernes": sample_day(1780.0),
            "sábado": sample_day(1790.0)
        },
        "total_semanal": 12473.5
    })
}

pub fn sample_plan() -> MealPlan {
    serde_json::from_value(sample_plan_json()).expect("sample plan decodes")
}
