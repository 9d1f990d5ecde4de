//! Text rendering of tasks and listings. Everything takes `today` explicitly
//! so the relative due-date wording is deterministic.

use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::commands::Listing;
use crate::due::due_status;
use crate::models::{Priority, Task, DATE_FORMAT};

const RULE_WIDTH: usize = 60;

/// Renders one task as an indented block.
///
/// Pending tasks with a due date get a relative annotation ("Due in N days",
/// "OVERDUE by N days", "DUE TODAY"); completed tasks show the bare date.
pub fn render_task(task: &Task, today: NaiveDate) -> String {
    let status = if task.completed { "✓" } else { "○" };
    let mut lines = vec![
        format!("{} Task #{}", status, task.id),
        format!("  {}", task.description),
    ];

    if let Some(due) = task.due_date {
        let date = due.format(DATE_FORMAT);
        if task.completed {
            lines.push(format!("  📅 {}", date));
        } else {
            lines.push(format!("  📅 {} ({})", date, due_status(due, today).describe()));
        }
    }
    lines.push(format!("  {} Priority: {}", task.priority.marker(), task.priority.label()));
    if let Some(category) = &task.category {
        lines.push(format!("  🏷  Category: {}", category));
    }
    lines.join("\n")
}

/// Renders a listing grouped into pending and completed sections, followed by
/// a summary line. `store_is_empty` picks the message shown when nothing
/// matched.
pub fn render_listing(listing: &Listing<'_>, today: NaiveDate, store_is_empty: bool) -> String {
    if listing.is_empty() {
        return if store_is_empty {
            "📋 No tasks yet. Add one to get started!".to_string()
        } else {
            "📋 No tasks match your filters.".to_string()
        };
    }

    let mut blocks = Vec::new();
    if !listing.pending.is_empty() {
        blocks.push(section("📌 PENDING TASKS"));
        blocks.extend(listing.pending.iter().map(|t| render_task(t, today)));
    }
    if !listing.completed.is_empty() {
        blocks.push(section("✓ COMPLETED TASKS"));
        blocks.extend(listing.completed.iter().map(|t| render_task(t, today)));
    }
    let rule = "-".repeat(RULE_WIDTH);
    blocks.push(format!("{}\n{}\n{}", rule, summary(listing), rule));
    blocks.join("\n\n")
}

/// "Total: 3 tasks (2 pending, 1 completed)"
pub fn summary(listing: &Listing<'_>) -> String {
    let total = listing.total();
    format!(
        "Total: {} {} ({} pending, {} completed)",
        total,
        if total == 1 { "task" } else { "tasks" },
        listing.pending.len(),
        listing.completed.len()
    )
}

pub fn render_search(keyword: &str, results: &[&Task], today: NaiveDate) -> String {
    if results.is_empty() {
        return format!("🔍 No tasks found matching '{}'", keyword);
    }
    let mut blocks = vec![format!(
        "🔍 Found {} task(s) matching '{}':\n{}",
        results.len(),
        keyword,
        "=".repeat(RULE_WIDTH)
    )];
    blocks.extend(results.iter().map(|t| render_task(t, today)));
    blocks.join("\n\n")
}

/// Renders a listing as a table, pending tasks first.
pub fn render_table(listing: &Listing<'_>, today: NaiveDate) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in listing.pending.iter().chain(listing.completed.iter()) {
        let status = t.due_date.map(|d| due_status(d, today));
        let (time_left, time_color) = match status {
            Some(s) if !t.completed => {
                (s.short(), if s.is_overdue() { Color::Red } else { Color::Reset })
            }
            _ => ("-".to_string(), Color::Reset),
        };
        let priority_color = match t.priority {
            Priority::High if !t.completed => Color::Yellow,
            _ => Color::Reset,
        };
        let (status, status_color) = if t.completed {
            ("Done", Color::Green)
        } else {
            ("Pending", Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.description),
            Cell::new(format!("{} {}", t.priority.marker(), t.priority.label())).fg(priority_color),
            Cell::new(t.category.as_deref().unwrap_or("-")),
            Cell::new(t.due_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(time_left).fg(time_color),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

fn section(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{}\n{}\n{}", rule, title, rule)
}
