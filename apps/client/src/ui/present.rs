//! Presentation builders: turn decoded service data into display-ready rows.
//!
//! Nothing here is recomputed from raw measurements; values are formatted as
//! received. The `Display` impls draw the plain-terminal version.

use std::fmt;

use crate::evaluation::{severity_tier, SeverityTier};
use crate::format::{format_number, format_optional, PLACEHOLDER};
use crate::models::{CaloricResult, EvaluationBundle, IndicatorResult, Macros, MealPlan};

// ────────────────────────────────────────────────────────────────────────────
// Results view
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: String,
    /// Set when the value is a classification label.
    pub badge: Option<SeverityTier>,
}

impl Field {
    fn plain(label: &str, value: String) -> Self {
        Self { label: label.to_string(), value, badge: None }
    }

    fn classified(label: &str, classification: &str) -> Self {
        Self {
            label: label.to_string(),
            value: classification.to_string(),
            badge: Some(severity_tier(Some(classification))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    /// Quick-glance "IMC: <classification>" chip.
    pub headline: Option<Field>,
    pub sections: Vec<Section>,
}

pub fn results_view(bundle: &EvaluationBundle) -> ResultsView {
    let headline = bundle
        .bmi
        .as_ref()
        .filter(|imc| !imc.classification.trim().is_empty())
        .map(|imc| Field::classified("IMC", &imc.classification));

    let mut sections = Vec::new();
    if let Some(caloric) = &bundle.caloric {
        sections.push(caloric_section(caloric));
    }
    if let Some(imc) = &bundle.bmi {
        sections.push(indicator_section("IMC", "IMC", imc, ""));
    }
    if let Some(weight) = &bundle.weight_for_age {
        sections.push(indicator_section("Peso para la edad", "Peso", weight, ""));
    }
    if let Some(height) = &bundle.height_for_age {
        sections.push(indicator_section("Altura para la edad", "Altura", height, " cm"));
    }

    ResultsView { headline, sections }
}

fn kcal(value: f64) -> String {
    format!("{} kcal", format_number(value))
}

fn caloric_section(c: &CaloricResult) -> Section {
    let mut fields = vec![
        Field::plain("Tasa Metabólica Basal (Schofield)", kcal(c.bmr_schofield)),
        Field::plain("Tasa Metabólica Basal (OMS)", kcal(c.bmr_who)),
        Field::plain("Gasto Energético Total (Schofield)", kcal(c.get_schofield)),
        Field::plain("Gasto Energético Total (OMS)", kcal(c.get_who)),
        Field::plain("IMC", format_number(c.bmi)),
        Field::classified("Clasificación", &c.who_classification),
        Field::plain("Actividad física", c.activity_level.clone()),
    ];
    if let Some(suggestion) = c.suggestion.as_deref().filter(|s| !s.trim().is_empty()) {
        fields.push(Field::plain("Sugerencia", suggestion.to_string()));
    }
    Section { title: "Requerimiento calórico".to_string(), fields }
}

fn indicator_section(title: &str, value_label: &str, r: &IndicatorResult, unit: &str) -> Section {
    Section {
        title: title.to_string(),
        fields: vec![
            Field::plain(value_label, format!("{}{unit}", format_number(r.value))),
            Field::plain("Z-score", format_number(r.zscore)),
            Field::plain("Percentil", format_number(r.percentile)),
            Field::classified("Clasificación", &r.classification),
        ],
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resultados")?;
        if let Some(chip) = &self.headline {
            writeln!(f, "  {}: {} {}", chip.label, chip.value, marker(chip.badge))?;
        }
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            for field in &section.fields {
                match field.badge {
                    Some(tier) => writeln!(f, "  {}: {} {}", field.label, field.value, tier.marker())?,
                    None => writeln!(f, "  {}: {}", field.label, field.value)?,
                }
            }
        }
        Ok(())
    }
}

fn marker(badge: Option<SeverityTier>) -> &'static str {
    badge.map(|t| t.marker()).unwrap_or("")
}

// ────────────────────────────────────────────────────────────────────────────
// Charts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub percentile: f64,
    pub color: &'static str,
}

/// Percentile bars for IMC, weight and height. Only drawn when all three exist.
pub fn percentile_chart(bundle: &EvaluationBundle) -> Option<Vec<Bar>> {
    let (imc, weight, height) = match (&bundle.bmi, &bundle.weight_for_age, &bundle.height_for_age) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => return None,
    };
    Some(vec![
        Bar { label: "IMC", percentile: imc.percentile, color: "#0ea5e9" },
        Bar { label: "Peso", percentile: weight.percentile, color: "#10b981" },
        Bar { label: "Altura", percentile: height.percentile, color: "#6366f1" },
    ])
}

const BAR_WIDTH: usize = 40;

/// Terminal rendering of the percentile bars on a 0–100 scale.
pub fn draw_bars(bars: &[Bar]) -> String {
    let mut out = String::from("Percentiles actuales por indicador\n");
    for bar in bars {
        let filled = ((bar.percentile.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "  {:<7}{}{} Percentil {:.1}\n",
            bar.label,
            "█".repeat(filled),
            "·".repeat(BAR_WIDTH - filled),
            bar.percentile
        ));
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub grams: f64,
    /// Share of the macro total, 0–100.
    pub share_pct: f64,
    pub color: &'static str,
}

/// Donut slices for one day's macros. `None` when a value is missing or the
/// total is zero.
pub fn macro_shares(macros: Option<&Macros>) -> Option<Vec<Slice>> {
    let m = macros?;
    let values = [
        ("Carbohidratos", m.carbs_g?, "#0ea5e9"),
        ("Proteínas", m.protein_g?, "#06b6d4"),
        ("Grasas", m.fat_g?, "#14b8a6"),
    ];
    let total: f64 = values.iter().map(|(_, g, _)| g).sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(
        values
            .into_iter()
            .map(|(label, grams, color)| Slice {
                label,
                grams,
                share_pct: grams / total * 100.0,
                color,
            })
            .collect(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Weekly listing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MealListing {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayListing {
    pub title: &'static str,
    pub total_kcal: String,
    /// (label, "<grams> g")
    pub macros: Vec<(&'static str, String)>,
    pub shares: Option<Vec<Slice>>,
    pub meals: Vec<MealListing>,
}

/// On-screen weekly listing, days in canonical order.
pub fn plan_listing(plan: &MealPlan) -> Vec<DayListing> {
    plan.ordered_days()
        .map(|(day, d)| {
            let grams = |v: Option<f64>| match v {
                Some(g) => format!("{} g", format_number(g)),
                None => PLACEHOLDER.to_string(),
            };
            let m = d.macros.clone().unwrap_or_default();
            DayListing {
                title: day.title(),
                total_kcal: match d.total_kcal {
                    Some(k) => kcal(k),
                    None => PLACEHOLDER.to_string(),
                },
                macros: vec![
                    ("Carbohidratos", grams(m.carbs_g)),
                    ("Proteínas", grams(m.protein_g)),
                    ("Grasas", grams(m.fat_g)),
                ],
                shares: macro_shares(d.macros.as_ref()),
                meals: d
                    .meals
                    .iter()
                    .flatten()
                    .map(|meal| MealListing {
                        name: meal.name.clone(),
                        items: meal.items.iter().map(ToString::to_string).collect(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Terminal rendering of the weekly listing.
pub fn draw_listing(days: &[DayListing], weekly_total: Option<f64>) -> String {
    let mut out = String::from("Plan alimenticio semanal\n");
    for day in days {
        out.push_str(&format!("\n{}\n  Calorías totales: {}\n  Macronutrientes:\n", day.title, day.total_kcal));
        for (label, value) in &day.macros {
            out.push_str(&format!("    - {label}: {value}\n"));
        }
        if let Some(shares) = &day.shares {
            let parts: Vec<String> = shares
                .iter()
                .map(|s| format!("{} {:.0}%", s.label, s.share_pct))
                .collect();
            out.push_str(&format!("    ({})\n", parts.join(" · ")));
        }
        out.push_str("  Comidas:\n");
        for meal in &day.meals {
            out.push_str(&format!("    {}:\n", meal.name));
            for item in &meal.items {
                out.push_str(&format!("      - {item}\n"));
            }
        }
    }
    if weekly_total.is_some() {
        out.push_str(&format!("\nTotal semanal: {} kcal\n", format_optional(weekly_total)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_bundle_json, sample_plan};
    use serde_json::json;

    fn bundle() -> EvaluationBundle {
        serde_json::from_value(sample_bundle_json()).unwrap()
    }

    #[test]
    fn test_results_view_section_order() {
        let view = results_view(&bundle());
        let titles: Vec<&str> = view.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Requerimiento calórico", "IMC", "Peso para la edad", "Altura para la edad"]
        );
        let chip = view.headline.unwrap();
        assert_eq!(chip.value, "Peso normal");
        assert_eq!(chip.badge, Some(SeverityTier::Normal));
    }

    #[test]
    fn test_absent_sections_are_skipped() {
        let partial: EvaluationBundle = serde_json::from_value(json!({
            "altura_por_edad": {"value": 120.0, "zscore": -2.3, "percentile": 1.1, "classification": "Talla baja"}
        }))
        .unwrap();
        let view = results_view(&partial);
        assert!(view.headline.is_none());
        assert_eq!(view.sections.len(), 1);
        let fields = &view.sections[0].fields;
        assert_eq!(fields[0].value, "120 cm");
        assert_eq!(fields[3].badge, Some(SeverityTier::Severe));
    }

    #[test]
    fn test_caloric_section_values_and_missing_suggestion() {
        let view = results_view(&bundle());
        let caloric = &view.sections[0];
        assert_eq!(caloric.fields[0].value, "1197.35 kcal");
        assert_eq!(caloric.fields[6].value, "moderado");
        assert!(caloric.fields.iter().all(|f| f.label != "Sugerencia"));
    }

    #[test]
    fn test_results_view_display_carries_markers() {
        let text = results_view(&bundle()).to_string();
        assert!(text.contains("IMC: Peso normal [OK]"));
        assert!(text.contains("Altura: 134 cm"));
    }

    #[test]
    fn test_percentile_chart_requires_all_three() {
        let bars = percentile_chart(&bundle()).unwrap();
        assert_eq!(bars.iter().map(|b| b.label).collect::<Vec<_>>(), vec!["IMC", "Peso", "Altura"]);
        assert_eq!(bars[1].color, "#10b981");

        let mut partial = bundle();
        partial.weight_for_age = None;
        assert!(percentile_chart(&partial).is_none());
    }

    #[test]
    fn test_draw_bars_scales_to_width() {
        let bars = vec![Bar { label: "IMC", percentile: 50.0, color: "#0ea5e9" }];
        let drawn = draw_bars(&bars);
        assert_eq!(drawn.matches('█').count(), BAR_WIDTH / 2);
        assert!(drawn.contains("Percentil 50.0"));
    }

    #[test]
    fn test_macro_shares_percentages() {
        let macros = Macros { carbs_g: Some(200.0), protein_g: Some(100.0), fat_g: Some(100.0) };
        let slices = macro_shares(Some(&macros)).unwrap();
        assert!((slices[0].share_pct - 50.0).abs() < 1e-9);
        assert!((slices[2].share_pct - 25.0).abs() < 1e-9);
        assert_eq!(slices[1].color, "#06b6d4");
    }

    #[test]
    fn test_macro_shares_none_for_zero_or_missing() {
        let zero = Macros { carbs_g: Some(0.0), protein_g: Some(0.0), fat_g: Some(0.0) };
        assert!(macro_shares(Some(&zero)).is_none());
        let partial = Macros { carbs_g: Some(10.0), protein_g: None, fat_g: Some(1.0) };
        assert!(macro_shares(Some(&partial)).is_none());
        assert!(macro_shares(None).is_none());
    }

    #[test]
    fn test_plan_listing_order_and_items() {
        let listing = plan_listing(&sample_plan());
        let titles: Vec<&str> = listing.iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]);
        let monday = &listing[0];
        assert_eq!(monday.total_kcal, "1781 kcal");
        assert_eq!(monday.meals[1].items, vec!["Manzana — 150g — 78 kcal".to_string()]);
        assert!(monday.shares.is_some());
    }

    #[test]
    fn test_draw_listing_includes_weekly_total() {
        let plan = sample_plan();
        let text = draw_listing(&plan_listing(&plan), plan.weekly_total_kcal);
        assert!(text.contains("Total semanal: 12473.5 kcal"));
        assert!(text.contains("      - Sopa de verduras"));
    }
}
