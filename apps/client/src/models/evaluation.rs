use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One growth indicator as computed by the evaluation service. Never recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    /// Service-provided label such as `"IMC (OMS)"`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub value: f64,
    pub zscore: f64,
    pub percentile: f64,
    pub classification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaloricResult {
    #[serde(rename = "TMB (Schofield)")]
    pub bmr_schofield: f64,
    #[serde(rename = "TMB (OMS)")]
    pub bmr_who: f64,
    #[serde(rename = "GET (Schofield)")]
    pub get_schofield: f64,
    #[serde(rename = "GET (OMS)")]
    pub get_who: f64,
    #[serde(rename = "IMC")]
    pub bmi: f64,
    #[serde(rename = "Percentil IMC")]
    pub bmi_percentile: f64,
    #[serde(rename = "Clasificación OMS")]
    pub who_classification: String,
    #[serde(rename = "Factor de actividad", default)]
    pub activity_factor: Option<f64>,
    #[serde(rename = "Nivel de actividad")]
    pub activity_level: String,
    #[serde(rename = "Sugerencia", default)]
    pub suggestion: Option<String>,
}

/// Wire shape of the `/evaluate-all` body: sections are decoded one by one.
#[derive(Debug, Deserialize)]
struct EvaluationBundleWire {
    #[serde(default)]
    imc: Option<Value>,
    #[serde(default)]
    peso_por_edad: Option<Value>,
    #[serde(default)]
    altura_por_edad: Option<Value>,
    #[serde(default)]
    calorias: Option<Value>,
}

/// Decodes one section; a section missing a field or holding a wrong type is
/// dropped on its own and the rest of the bundle survives.
fn section<T: DeserializeOwned>(key: &'static str, value: Option<Value>) -> Option<T> {
    let value = value.filter(|v| !v.is_null())?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(section = key, "Dropping malformed evaluation section: {e}");
            None
        }
    }
}

impl From<EvaluationBundleWire> for EvaluationBundle {
    fn from(wire: EvaluationBundleWire) -> Self {
        Self {
            bmi: section("imc", wire.imc),
            weight_for_age: section("peso_por_edad", wire.peso_por_edad),
            height_for_age: section("altura_por_edad", wire.altura_por_edad),
            caloric: section("calorias", wire.calorias),
        }
    }
}

/// Merged result of `/evaluate-all`.
///
/// Every section is optional: the service may omit any of them, and an absent
/// section is simply not rendered. A section that arrives incomplete is
/// treated as absent; a body that is not a JSON object fails as a whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "EvaluationBundleWire")]
pub struct EvaluationBundle {
    #[serde(rename = "imc")]
    pub bmi: Option<IndicatorResult>,
    #[serde(rename = "peso_por_edad")]
    pub weight_for_age: Option<IndicatorResult>,
    #[serde(rename = "altura_por_edad")]
    pub height_for_age: Option<IndicatorResult>,
    #[serde(rename = "calorias")]
    pub caloric: Option<CaloricResult>,
}

impl EvaluationBundle {
    pub fn is_empty(&self) -> bool {
        self.bmi.is_none()
            && self.weight_for_age.is_none()
            && self.height_for_age.is_none()
            && self.caloric.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_bundle_json;
    use serde_json::json;

    #[test]
    fn test_full_bundle_decodes() {
        let bundle: EvaluationBundle = serde_json::from_value(sample_bundle_json()).unwrap();
        let bmi = bundle.bmi.as_ref().unwrap();
        assert_eq!(bmi.classification, "Peso normal");
        assert_eq!(bmi.kind.as_deref(), Some("IMC (OMS)"));
        let caloric = bundle.caloric.as_ref().unwrap();
        assert!((caloric.get_who - 1781.03).abs() < 1e-9);
        assert_eq!(caloric.suggestion, None);
        assert_eq!(caloric.activity_factor, Some(1.5));
    }

    #[test]
    fn test_missing_sections_decode_as_absent() {
        let bundle: EvaluationBundle = serde_json::from_value(json!({
            "imc": {"value": 21.3, "zscore": 1.5, "percentile": 93.3, "classification": "Sobrepeso"}
        }))
        .unwrap();
        assert!(bundle.bmi.is_some());
        assert!(bundle.weight_for_age.is_none());
        assert!(bundle.height_for_age.is_none());
        assert!(bundle.caloric.is_none());
        assert!(!bundle.is_empty());
    }

    #[test]
    fn test_section_missing_a_field_is_dropped_alone() {
        let mut body = sample_bundle_json();
        body["calorias"]
            .as_object_mut()
            .unwrap()
            .remove("Percentil IMC");
        let bundle: EvaluationBundle = serde_json::from_value(body).unwrap();
        assert!(bundle.caloric.is_none());
        assert!(bundle.bmi.is_some());
        assert!(bundle.weight_for_age.is_some());
        assert!(bundle.height_for_age.is_some());
    }

    #[test]
    fn test_wrongly_typed_section_is_dropped_alone() {
        let bundle: EvaluationBundle = serde_json::from_value(json!({
            "imc": {"value": "high", "zscore": 1.5, "percentile": 93.3, "classification": "Sobrepeso"},
            "peso_por_edad": {"value": 20.1, "zscore": 0.4, "percentile": 65.5, "classification": "Normal"},
            "calorias": null
        }))
        .unwrap();
        assert!(bundle.bmi.is_none());
        assert_eq!(bundle.weight_for_age.unwrap().classification, "Normal");
        assert!(bundle.caloric.is_none());
    }

    #[test]
    fn test_non_object_body_fails_whole_bundle() {
        let result = serde_json::from_value::<EvaluationBundle>(json!(["imc"]));
        assert!(result.is_err(), "a body that is not an object yields no bundle");
    }
}
