//! Report layout: one linear pass over the plan's days that positions every
//! element on A4 pages.
//!
//! # Per day
//! title line → kcal summary → macro table → meals table, each placed at the
//! running cursor. The meals table starts at the macro table's real bottom.
//!
//! # Page breaks
//! Only between days, never inside a table: after each non-last day a separator
//! is drawn and `PageCursor::check_break` decides, using the next day's
//! measured height, whether the next day starts a new page.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::format::{format_number, format_optional, PLACEHOLDER};
use crate::layout::document::{
    Document, Element, IssueKind, Page, RenderIssue, RgbColor, Rule, TableKind, TextBlock,
    TextRole,
};
use crate::layout::font_metrics::{default_page_config, get_metrics, FontFamily, PageConfig};
use crate::layout::page_fill::PageCursor;
use crate::layout::table::TableContent;
use crate::models::{DayPlan, Macros, MealPlan, Weekday};

pub const REPORT_TITLE: &str = "Plan alimenticio semanal";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

// ────────────────────────────────────────────────────────────────────────────
// Day blocks
// ────────────────────────────────────────────────────────────────────────────

/// Everything one day draws, measured but not yet placed.
struct DayBlock {
    day: Weekday,
    title: String,
    summary: String,
    macros: TableContent,
    meals: TableContent,
    height: f32,
}

fn build_day_block(
    day: Weekday,
    plan: &DayPlan,
    config: &PageConfig,
    issues: &mut Vec<RenderIssue>,
) -> DayBlock {
    let summary = match plan.total_kcal {
        Some(kcal) => format!("Calorías totales: {} kcal", format_number(kcal)),
        None => {
            issues.push(RenderIssue { day, kind: IssueKind::MissingTotalKcal });
            format!("Calorías totales: {PLACEHOLDER}")
        }
    };

    let macros = TableContent::two_column(
        TableKind::Macros,
        ["Macronutriente", "Cantidad"],
        macro_rows(day, plan.macros.as_ref(), issues),
        config.macro_label_width_mm,
        RgbColor::SKY,
        config,
    );

    let meal_rows = match &plan.meals {
        Some(meals) => meals
            .iter()
            .map(|meal| {
                vec![
                    capitalize(&meal.name),
                    meal.joined_items(&config.item_separator),
                ]
            })
            .collect(),
        None => {
            issues.push(RenderIssue { day, kind: IssueKind::MissingMeals });
            vec![vec![PLACEHOLDER.to_string(), PLACEHOLDER.to_string()]]
        }
    };
    let meals = TableContent::two_column(
        TableKind::Meals,
        ["Comida", "Alimentos"],
        meal_rows,
        config.meal_name_width_mm,
        RgbColor::TEAL,
        config,
    );

    let height = config.text_advance_mm(config.day_title_size_pt)
        + config.text_advance_mm(config.summary_size_pt)
        + macros.measure(config)
        + config.table_spacing_mm
        + meals.measure(config)
        + config.table_spacing_mm;

    DayBlock {
        day,
        title: day.title().to_string(),
        summary,
        macros,
        meals,
        height,
    }
}

fn macro_rows(day: Weekday, macros: Option<&Macros>, issues: &mut Vec<RenderIssue>) -> Vec<Vec<String>> {
    let values = match macros {
        Some(m) => [
            ("Carbohidratos", "carbohidratos", m.carbs_g),
            ("Proteínas", "proteinas", m.protein_g),
            ("Grasas", "grasas", m.fat_g),
        ],
        None => {
            issues.push(RenderIssue { day, kind: IssueKind::MissingMacros });
            [
                ("Carbohidratos", "carbohidratos", None),
                ("Proteínas", "proteinas", None),
                ("Grasas", "grasas", None),
            ]
        }
    };

    values
        .into_iter()
        .map(|(label, key, grams)| {
            if grams.is_none() && macros.is_some() {
                issues.push(RenderIssue { day, kind: IssueKind::MissingMacro(key) });
            }
            let value = match grams {
                Some(g) => format!("{} g", format_number(g)),
                None => PLACEHOLDER.to_string(),
            };
            vec![label.to_string(), value]
        })
        .collect()
}

/// "desayuno" → "Desayuno".
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page assembly
// ────────────────────────────────────────────────────────────────────────────

struct PageSet<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    cursor: PageCursor,
}

impl<'a> PageSet<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::new(1)],
            cursor: PageCursor::new(config.content_top_mm),
        }
    }

    fn push(&mut self, element: Element) {
        let index = self.cursor.page_index();
        // break_page keeps pages and cursor in step
        if let Some(page) = self.pages.get_mut(index) {
            page.elements.push(element);
        }
    }

    fn new_page(&mut self) {
        self.cursor.break_page(self.config);
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));
    }

    /// Places a text line at the cursor and advances past it.
    fn text_line(&mut self, role: TextRole, text: String, size_pt: f32, bold: bool) {
        let block = text_block(role, text, self.config.margin_left_mm, self.cursor.y(), size_pt, bold, self.config);
        self.cursor.advance(self.config.text_advance_mm(size_pt));
        self.push(Element::Text(block));
    }

    fn table(&mut self, content: &TableContent) {
        let placed = content.place(self.config.margin_left_mm, self.cursor.y(), self.config);
        self.cursor.move_to(placed.bottom() + self.config.table_spacing_mm);
        self.push(Element::Table(placed));
    }

    fn separator(&mut self) {
        let rule = Rule {
            x1: self.config.margin_left_mm,
            x2: self.config.page_width_mm - self.config.margin_right_mm,
            y: self.cursor.y(),
        };
        self.push(Element::Rule(rule));
        self.cursor.advance(self.config.separator_spacing_mm);
    }
}

fn text_block(
    role: TextRole,
    text: String,
    x: f32,
    y: f32,
    size_pt: f32,
    bold: bool,
    config: &PageConfig,
) -> TextBlock {
    TextBlock {
        role,
        text,
        x,
        y,
        height: config.line_height_mm(size_pt),
        size_pt,
        bold,
        color: if role == TextRole::Timestamp || role == TextRole::Footer {
            RgbColor::MUTED
        } else {
            RgbColor::BLACK
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the plan with the current local time in the header.
pub fn render_report(plan: &MealPlan) -> Document {
    render_report_at(plan, Local::now().naive_local(), &default_page_config())
}

/// Lays out the plan as of `generated_at`. Never fails: missing fields become
/// placeholders and are listed in `Document::issues`.
pub fn render_report_at(plan: &MealPlan, generated_at: NaiveDateTime, config: &PageConfig) -> Document {
    let mut issues = Vec::new();
    let blocks: Vec<DayBlock> = plan
        .ordered_days()
        .map(|(day, day_plan)| build_day_block(day, day_plan, config, &mut issues))
        .collect();

    let mut set = PageSet::new(config);

    let title = text_block(
        TextRole::Title,
        REPORT_TITLE.to_string(),
        config.margin_left_mm,
        config.title_top_mm,
        config.title_size_pt,
        true,
        config,
    );
    let stamp = text_block(
        TextRole::Timestamp,
        format!("Generado: {}", generated_at.format(TIMESTAMP_FORMAT)),
        config.margin_left_mm,
        title.bottom() + config.paragraph_gap_mm,
        config.timestamp_size_pt,
        false,
        config,
    );
    set.push(Element::Text(title));
    set.push(Element::Text(stamp));

    for (i, block) in blocks.iter().enumerate() {
        // Later days only get here when they fit or start a fresh page; the
        // first day starts below the header.
        if !set.cursor.fits(block.height, config) {
            warn!(
                day = block.day.key(),
                height_mm = block.height,
                remaining_mm = set.cursor.remaining(config),
                "Day is taller than the space it starts in"
            );
            issues.push(RenderIssue {
                day: block.day,
                kind: IssueKind::OversizedDay { height_mm: block.height },
            });
        }

        set.text_line(TextRole::DayTitle, block.title.clone(), config.day_title_size_pt, true);
        set.text_line(TextRole::DaySummary, block.summary.clone(), config.summary_size_pt, false);
        set.table(&block.macros);
        set.table(&block.meals);

        if let Some(next) = blocks.get(i + 1) {
            set.separator();
            if let Some(reason) = set.cursor.check_break(next.height, config) {
                debug!(before = next.day.key(), ?reason, "Page break");
                set.new_page();
            }
        }
    }

    if let Some(total) = plan.weekly_total_kcal {
        let needed = config.text_advance_mm(config.weekly_total_size_pt);
        if !set.cursor.fits(needed, config) {
            set.new_page();
        }
        set.text_line(
            TextRole::WeeklyTotal,
            format!("Total semanal: {} kcal", format_optional(Some(total))),
            config.weekly_total_size_pt,
            true,
        );
    }

    add_footers(&mut set.pages, config);

    for issue in &issues {
        warn!(day = issue.day.key(), kind = ?issue.kind, "Report rendered with placeholder");
    }
    info!(days = blocks.len(), pages = set.pages.len(), issues = issues.len(), "Report laid out");

    Document {
        title: REPORT_TITLE.to_string(),
        page_width_mm: config.page_width_mm,
        page_height_mm: config.page_height_mm,
        pages: set.pages,
        issues,
    }
}

/// "Página n de N", right-aligned at the bottom of every page.
fn add_footers(pages: &mut [Page], config: &PageConfig) {
    let total = pages.len();
    let metrics = get_metrics(&FontFamily::Helvetica);
    for page in pages.iter_mut() {
        let text = format!("Página {} de {}", page.number, total);
        let width = metrics.width_mm(&text, config.footer_size_pt);
        let x = config.page_width_mm - config.margin_right_mm - width;
        let y = config.page_height_mm - config.footer_offset_mm;
        page.elements.push(Element::Text(text_block(
            TextRole::Footer,
            text,
            x,
            y,
            config.footer_size_pt,
            false,
            config,
        )));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::document::PlacedTable;
    use crate::models::{Meal, MealItem};
    use crate::test_support::sample_plan;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn render(plan: &MealPlan) -> Document {
        render_report_at(plan, at(), &default_page_config())
    }

    fn plan_from(value: serde_json::Value) -> MealPlan {
        serde_json::from_value(value).unwrap()
    }

    fn simple_day() -> serde_json::Value {
        json!({
            "calorias_totales": 1500,
            "macros": {"carbohidratos": 180, "proteinas": 60, "grasas": 50},
            "comidas": {"desayuno": ["Pan"], "cena": ["Sopa"]}
        })
    }

    fn tables_of_day(doc: &Document, index: usize) -> (&PlacedTable, &PlacedTable) {
        let tables: Vec<&PlacedTable> = doc.tables().map(|(_, t)| t).collect();
        (tables[index * 2], tables[index * 2 + 1])
    }

    #[test]
    fn test_header_has_title_and_timestamp() {
        let doc = render(&sample_plan());
        let titles = doc.texts_with_role(TextRole::Title);
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].1.text, REPORT_TITLE);
        let stamps = doc.texts_with_role(TextRole::Timestamp);
        assert_eq!(stamps[0].1.text, "Generado: 01/08/2024 09:30");
        assert_eq!(stamps[0].0, 1);
    }

    #[test]
    fn test_single_short_day_fits_one_page() {
        let plan = plan_from(json!({"plan": {"lunes": simple_day()}, "total_semanal": 1500}));
        let doc = render(&plan);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.day_titles(), vec!["Lunes"]);
        assert!(!doc.has_issues());
    }

    #[test]
    fn test_full_week_spills_and_keeps_canonical_order() {
        let doc = render(&sample_plan());
        assert!(doc.page_count() > 1, "seven full days should not fit on one page");
        assert_eq!(
            doc.day_titles(),
            vec!["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]
        );
    }

    #[test]
    fn test_nothing_crosses_bottom_margin() {
        let config = default_page_config();
        let doc = render(&sample_plan());
        for page in &doc.pages {
            for element in &page.elements {
                if let Element::Text(t) = element {
                    if t.role == TextRole::Footer {
                        continue;
                    }
                }
                let (_, bottom) = element.vertical_extent();
                assert!(
                    bottom <= config.content_bottom_mm() + 1e-3,
                    "page {} element ends at {bottom}",
                    page.number
                );
            }
        }
    }

    #[test]
    fn test_each_day_stays_on_one_page() {
        let doc = render(&sample_plan());
        for page in &doc.pages {
            let titles = page.texts().filter(|t| t.role == TextRole::DayTitle).count();
            let tables = page.tables().count();
            assert_eq!(tables, titles * 2, "page {} splits a day", page.number);
        }
    }

    #[test]
    fn test_meals_table_starts_at_macro_table_bottom() {
        let config = default_page_config();
        let doc = render(&sample_plan());
        let (macros, meals) = tables_of_day(&doc, 0);
        assert_eq!(macros.kind, TableKind::Macros);
        assert_eq!(meals.kind, TableKind::Meals);
        assert!((meals.y - (macros.bottom() + config.table_spacing_mm)).abs() < 1e-4);
        assert_eq!(macros.header_fill, RgbColor::SKY);
        assert_eq!(meals.header_fill, RgbColor::TEAL);
    }

    #[test]
    fn test_macro_rows_and_values() {
        let doc = render(&sample_plan());
        let (macros, _) = tables_of_day(&doc, 0);
        assert_eq!(macros.row_labels(), vec!["Carbohidratos", "Proteínas", "Grasas"]);
        assert_eq!(macros.rows[1].cells[1], vec!["65.5 g".to_string()]);
        assert_eq!(macros.column_widths[0], default_page_config().macro_label_width_mm);
    }

    #[test]
    fn test_meals_rows_capitalized_and_items_joined() {
        let doc = render(&sample_plan());
        let (_, meals) = tables_of_day(&doc, 0);
        assert_eq!(meals.row_labels(), vec!["Desayuno", "Colacion", "Almuerzo", "Cena"]);
        let breakfast = meals.rows[0].cells[1].join(" ");
        assert_eq!(breakfast, "Avena con leche, Plátano — 1 unidad — 105 kcal");
    }

    #[test]
    fn test_zero_meals_gives_empty_meals_table() {
        let plan = plan_from(json!({"plan": {"martes": {
            "calorias_totales": 0,
            "macros": {"carbohidratos": 0, "proteinas": 0, "grasas": 0},
            "comidas": {}
        }}}));
        let doc = render(&plan);
        let (macros, meals) = tables_of_day(&doc, 0);
        assert_eq!(macros.rows.len(), 3);
        assert!(meals.rows.is_empty());
        assert!((meals.height() - meals.header.height).abs() < 1e-4);
        assert!(!doc.has_issues());
    }

    #[test]
    fn test_weekly_total_follows_last_table() {
        let config = default_page_config();
        let doc = render(&sample_plan());
        let totals = doc.texts_with_role(TextRole::WeeklyTotal);
        assert_eq!(totals.len(), 1);
        let (page, total) = totals[0];
        assert_eq!(total.text, "Total semanal: 12473.5 kcal");

        let (last_page, last_table) = doc.tables().last().unwrap();
        assert_eq!(page, last_page);
        assert!((total.y - (last_table.bottom() + config.table_spacing_mm)).abs() < 1e-4);
    }

    #[test]
    fn test_no_weekly_total_line_when_absent() {
        let plan = plan_from(json!({"plan": {"lunes": simple_day()}}));
        assert!(render(&plan).texts_with_role(TextRole::WeeklyTotal).is_empty());
    }

    #[test]
    fn test_weekly_total_moves_to_new_page_when_page_is_full() {
        let mut config = default_page_config();
        // Make the single day end just above the bottom margin.
        let plan = plan_from(json!({"plan": {"lunes": simple_day()}, "total_semanal": 1500}));
        let trial = render_report_at(&plan, at(), &config);
        let (_, last) = trial.tables().last().unwrap();
        let end = last.bottom() + config.table_spacing_mm;
        config.bottom_margin_mm = config.page_height_mm - end - 1.0;
        config.break_threshold_mm = config.bottom_margin_mm + 1.0;

        let doc = render_report_at(&plan, at(), &config);
        assert_eq!(doc.page_count(), 2);
        let totals = doc.texts_with_role(TextRole::WeeklyTotal);
        assert_eq!(totals[0].0, 2);
        assert_eq!(totals[0].1.y, config.top_margin_mm);
    }

    #[test]
    fn test_separators_only_between_days() {
        let doc = render(&sample_plan());
        let rules = doc
            .pages
            .iter()
            .flat_map(|p| &p.elements)
            .filter(|e| matches!(e, Element::Rule(_)))
            .count();
        assert_eq!(rules, 6);
    }

    #[test]
    fn test_page_break_resets_cursor_to_top_margin() {
        let config = default_page_config();
        let doc = render(&sample_plan());
        let second = &doc.pages[1];
        let first_title = second
            .texts()
            .find(|t| t.role == TextRole::DayTitle)
            .unwrap();
        assert_eq!(first_title.y, config.top_margin_mm);
    }

    #[test]
    fn test_footer_on_every_page() {
        let doc = render(&sample_plan());
        let footers = doc.texts_with_role(TextRole::Footer);
        assert_eq!(footers.len(), doc.page_count());
        let n = doc.page_count();
        for (i, (page, footer)) in footers.iter().enumerate() {
            assert_eq!(*page, i + 1);
            assert_eq!(footer.text, format!("Página {} de {}", i + 1, n));
        }
    }

    #[test]
    fn test_missing_fields_render_placeholders_and_issues() {
        let plan = plan_from(json!({"plan": {
            "jueves": {"macros": {"carbohidratos": 200}}
        }}));
        let doc = render(&plan);
        assert_eq!(doc.page_count(), 1);

        let summary = &doc.texts_with_role(TextRole::DaySummary)[0].1.text;
        assert_eq!(summary, "Calorías totales: N/D");
        let (macros, meals) = tables_of_day(&doc, 0);
        assert_eq!(macros.rows[2].cells[1], vec![PLACEHOLDER.to_string()]);
        assert_eq!(meals.rows.len(), 1);

        let kinds: Vec<&IssueKind> = doc.issues.iter().map(|i| &i.kind).collect();
        assert!(kinds.contains(&&IssueKind::MissingTotalKcal));
        assert!(kinds.contains(&&IssueKind::MissingMacro("proteinas")));
        assert!(kinds.contains(&&IssueKind::MissingMacro("grasas")));
        assert!(kinds.contains(&&IssueKind::MissingMeals));
        assert!(doc.issues.iter().all(|i| i.day == Weekday::Thursday));
    }

    #[test]
    fn test_missing_macros_object_is_one_issue() {
        let plan = plan_from(json!({"plan": {"viernes": {"calorias_totales": 1200, "comidas": {}}}}));
        let doc = render(&plan);
        assert_eq!(
            doc.issues,
            vec![RenderIssue { day: Weekday::Friday, kind: IssueKind::MissingMacros }]
        );
    }

    #[test]
    fn test_oversized_day_is_reported_and_still_drawn() {
        let mut plan = plan_from(json!({"plan": {"lunes": simple_day(), "martes": simple_day()}}));
        let meals: Vec<Meal> = (0..60)
            .map(|i| Meal {
                name: format!("comida {i}"),
                items: vec![MealItem::Label("Arroz con pollo y ensalada".to_string())],
            })
            .collect();
        if let Some(day) = plan.days.get_mut(&Weekday::Tuesday) {
            day.meals = Some(meals);
        }

        let doc = render(&plan);
        assert_eq!(doc.day_titles(), vec!["Lunes", "Martes"]);
        assert!(doc
            .issues
            .iter()
            .any(|i| i.day == Weekday::Tuesday && matches!(i.kind, IssueKind::OversizedDay { .. })));
        // The oversized day starts on a fresh page.
        let tuesday_page = doc
            .texts_with_role(TextRole::DayTitle)
            .into_iter()
            .find(|(_, t)| t.text == "Martes")
            .map(|(p, _)| p);
        assert_eq!(tuesday_page, Some(2));
    }

    fn plan_with_meal_rows(rows: usize) -> MealPlan {
        let comidas: serde_json::Map<String, serde_json::Value> = (0..rows)
            .map(|i| (format!("comida {i}"), json!(["Pan"])))
            .collect();
        plan_from(json!({"plan": {"lunes": {
            "calorias_totales": 1500,
            "macros": {"carbohidratos": 180, "proteinas": 60, "grasas": 50},
            "comidas": comidas
        }}}))
    }

    fn monday_height(plan: &MealPlan, config: &PageConfig) -> f32 {
        let day = plan.days.get(&Weekday::Monday).unwrap();
        build_day_block(Weekday::Monday, day, config, &mut Vec::new()).height
    }

    #[test]
    fn test_first_day_taller_than_space_below_header_is_reported() {
        let config = default_page_config();
        let below_header = config.content_bottom_mm() - config.content_top_mm;
        // Smallest plan whose only day overflows page 1 but would fit a fresh page.
        let (plan, height) = (1..60)
            .map(|rows| {
                let plan = plan_with_meal_rows(rows);
                let height = monday_height(&plan, &config);
                (plan, height)
            })
            .find(|(_, height)| *height > below_header)
            .unwrap();
        assert!(height <= config.usable_height_mm());

        let doc = render(&plan);
        assert_eq!(doc.page_count(), 1);
        assert!(doc
            .issues
            .iter()
            .any(|i| i.day == Weekday::Monday && matches!(i.kind, IssueKind::OversizedDay { .. })));
    }

    #[test]
    fn test_first_day_that_fits_below_header_has_no_issue() {
        let config = default_page_config();
        let below_header = config.content_bottom_mm() - config.content_top_mm;
        let plan = (1..60)
            .map(plan_with_meal_rows)
            .take_while(|plan| monday_height(plan, &config) <= below_header)
            .last()
            .unwrap();

        let doc = render(&plan);
        assert!(!doc.has_issues());
        let (_, meals) = tables_of_day(&doc, 0);
        assert!(meals.bottom() <= config.content_bottom_mm() + 1e-3);
    }

    #[test]
    fn test_several_days_fit_on_exactly_one_page() {
        let plan = plan_from(json!({
            "plan": {"lunes": simple_day(), "martes": simple_day(), "jueves": simple_day()},
            "total_semanal": 4500
        }));
        let doc = render(&plan);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.day_titles(), vec!["Lunes", "Martes", "Jueves"]);
        assert!(doc.texts_with_role(TextRole::DayTitle).iter().all(|(page, _)| *page == 1));
        assert_eq!(doc.tables().count(), 6);
        let rules = doc.pages[0]
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Rule(_)))
            .count();
        assert_eq!(rules, 2);
        assert_eq!(doc.texts_with_role(TextRole::WeeklyTotal)[0].0, 1);
        assert_eq!(doc.texts_with_role(TextRole::Footer)[0].1.text, "Página 1 de 1");
        assert!(!doc.has_issues());
    }

    #[test]
    fn test_empty_plan_still_produces_header_page() {
        let plan = plan_from(json!({"plan": {}}));
        let doc = render(&plan);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.day_titles().is_empty());
        assert_eq!(doc.texts_with_role(TextRole::Footer).len(), 1);
    }

    #[test]
    fn test_capitalize_handles_accents_and_empty() {
        assert_eq!(capitalize("almuerzo"), "Almuerzo");
        assert_eq!(capitalize("ñoquis"), "Ñoquis");
        assert_eq!(capitalize(""), "");
    }
}
