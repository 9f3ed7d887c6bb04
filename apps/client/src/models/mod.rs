pub mod evaluation;
pub mod meal_plan;
pub mod subject;

pub use evaluation::{CaloricResult, EvaluationBundle, IndicatorResult};
pub use meal_plan::{DayPlan, FoodPortion, Macros, Meal, MealItem, MealPlan, Weekday};
pub use subject::{ActivityLevel, EvaluationRequest, RawForm, Sex, Subject};
