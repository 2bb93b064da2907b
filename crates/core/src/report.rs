//! Per-run outcome report.

use serde::Serialize;

use crate::menu::Day;
use crate::week::WeekDates;
use crate::MealType;

/// What happened to the recipe itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecipeStatus {
    Created,
    Existing,
    Failed { reason: String },
}

/// What happened to the meal-plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MealPlanStatus {
    Created,
    Failed { reason: String },
    Skipped { reason: String },
}

/// One recipe on one day.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeOutcome {
    pub day: Day,
    pub date: String,
    pub name: String,
    pub recipe: RecipeStatus,
    pub meal_type: Option<MealType>,
    pub meal_plan: MealPlanStatus,
    /// Non-fatal problems such as ingredients that could not be created.
    pub warnings: Vec<String>,
}

impl RecipeOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self.recipe, RecipeStatus::Failed { .. }) && self.meal_plan == MealPlanStatus::Created
    }
}

/// Everything a run did, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct WeekReport {
    pub week: i64,
    pub year: i32,
    pub dates: WeekDates,
    pub outcomes: Vec<RecipeOutcome>,
}

impl WeekReport {
    pub fn new(week: i64, year: i32, dates: WeekDates) -> Self {
        Self { week, year, dates, outcomes: Vec::new() }
    }

    pub fn recipes_created(&self) -> usize {
        self.count(|o| o.recipe == RecipeStatus::Created)
    }

    pub fn recipes_existing(&self) -> usize {
        self.count(|o| o.recipe == RecipeStatus::Existing)
    }

    pub fn recipes_failed(&self) -> usize {
        self.count(|o| matches!(o.recipe, RecipeStatus::Failed { .. }))
    }

    pub fn meal_plans_created(&self) -> usize {
        self.count(|o| o.meal_plan == MealPlanStatus::Created)
    }

    /// Human-readable lines for every failure and warning.
    pub fn failures(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for outcome in &self.outcomes {
            let label = format!("{} {} '{}'", outcome.day, outcome.date, outcome.name);
            if let RecipeStatus::Failed { reason } = &outcome.recipe {
                lines.push(format!("{label}: recipe failed: {reason}"));
            }
            match &outcome.meal_plan {
                MealPlanStatus::Failed { reason } => lines.push(format!("{label}: meal plan failed: {reason}")),
                MealPlanStatus::Skipped { reason } if !matches!(outcome.recipe, RecipeStatus::Failed { .. }) => {
                    lines.push(format!("{label}: meal plan skipped: {reason}"))
                }
                _ => {}
            }
            lines.extend(outcome.warnings.iter().map(|w| format!("{label}: {w}")));
        }
        lines
    }

    /// True when every recipe landed in the meal plan without warnings.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_success() && o.warnings.is_empty())
    }

    fn count(&self, pred: impl Fn(&RecipeOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
