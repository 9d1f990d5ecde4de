use chrono::NaiveDate;

/// How a due date relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due date passed this many days ago.
    Overdue(i64),
    Today,
    /// Due this many days from now.
    Upcoming(i64),
}

/// Whole days from `today` until `due`; negative when `due` is in the past.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

pub fn due_status(due: NaiveDate, today: NaiveDate) -> DueStatus {
    match days_until(due, today) {
        d if d < 0 => DueStatus::Overdue(-d),
        0 => DueStatus::Today,
        d => DueStatus::Upcoming(d),
    }
}

impl DueStatus {
    pub fn is_overdue(self) -> bool {
        matches!(self, DueStatus::Overdue(_))
    }

    /// Long form used in the task listing, e.g. "Due in 3 days".
    pub fn describe(self) -> String {
        match self {
            DueStatus::Overdue(n) => format!("⚠ OVERDUE by {}", days(n)),
            DueStatus::Today => "⚠ DUE TODAY".to_string(),
            DueStatus::Upcoming(n) => format!("Due in {}", days(n)),
        }
    }

    /// Short form used in the table view, e.g. "3d overdue".
    pub fn short(self) -> String {
        match self {
            DueStatus::Overdue(n) => format!("{}d overdue", n),
            DueStatus::Today => "Today".to_string(),
            DueStatus::Upcoming(n) => format!("{}d", n),
        }
    }
}

fn days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}
