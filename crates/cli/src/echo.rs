use mealsync_core::{MealPlanStatus, RecipeStatus, WeekReport};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Mealsync".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Sync a weekly menu into Mealie\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a `label: value` detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print the per-recipe table and totals for a finished run
pub fn print_report(report: &WeekReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!(
        "{}",
        format!("Week {} of {} ({} to {})", report.week, report.year, report.dates.monday(), report.dates.sunday())
            .bold()
            .cyan()
    );
    eprintln!("{}", "═".repeat(60).dimmed());

    for outcome in &report.outcomes {
        let recipe = match &outcome.recipe {
            RecipeStatus::Created => "created".green().to_string(),
            RecipeStatus::Existing => "existing".blue().to_string(),
            RecipeStatus::Failed { .. } => "failed".red().to_string(),
        };
        let plan = match &outcome.meal_plan {
            MealPlanStatus::Created => "planned".green().to_string(),
            MealPlanStatus::Failed { .. } => "plan failed".red().to_string(),
            MealPlanStatus::Skipped { .. } => "not planned".yellow().to_string(),
        };
        let meal = outcome.meal_type.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string());

        eprintln!(
            "  {} {:<9} {:<10} {} [{}, {}]",
            outcome.date.dimmed(),
            outcome.day.to_string(),
            meal,
            outcome.name.bright_white(),
            recipe,
            plan
        );
        for warning in &outcome.warnings {
            eprintln!("      {} {}", "⚠".yellow(), warning.dimmed());
        }
    }

    eprintln!("{}", "─".repeat(60).dimmed());
    print_detail("Recipes created", &report.recipes_created().to_string());
    print_detail("Recipes existing", &report.recipes_existing().to_string());
    print_detail("Recipes failed", &report.recipes_failed().to_string());
    print_detail("Meal plan entries", &report.meal_plans_created().to_string());
    eprintln!();
}
