//! Text rendering of day records and the prompt payloads built from it.

use crate::fields::{FlagField, ListField, TextField};
use crate::models::DayRecord;
use crate::schedule::{SCHEDULE, TaskDetail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const NOT_AVAILABLE: &str = "N/A";

const DAILY_INSTRUCTIONS: &str = "You are an AI assistant that analyzes daily logs to identify patterns and trends in user habits and lifestyle.

Based on the provided daily log, create a summary highlighting key activities, habit adherence, and overall trends. Focus on identifying areas of improvement and positive habits.";

const WEEKLY_INSTRUCTIONS: &str = "You are an AI assistant that analyzes a week's worth of daily logs to identify patterns and trends in a user's habits and lifestyle.

Based on the provided daily logs, create a summary of the week. Highlight key achievements, consistent habits, areas of improvement, and any challenges faced.";

const MONTHLY_INSTRUCTIONS: &str = "You are an AI assistant that analyzes a month's worth of earlier summaries to identify long-term patterns, progress, and overall trends in a user's habits and lifestyle.

Based on the provided summaries, create a comprehensive monthly overview. Focus on:
- Consistent habits and successes.
- Areas that showed improvement over the month.
- Persistent challenges or areas needing more attention.
- Overall mood and energy level trends.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryScope {
    Daily,
    Weekly,
    Monthly,
}

/// Wire shape of a summarization request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryRequest {
    Daily {
        #[serde(rename = "dailyLog")]
        daily_log: String,
    },
    Weekly {
        #[serde(rename = "dailyLogs")]
        daily_logs: Vec<String>,
    },
    Monthly {
        #[serde(rename = "weeklySummaries")]
        weekly_summaries: Vec<String>,
    },
}

impl SummaryRequest {
    pub fn scope(&self) -> SummaryScope {
        match self {
            SummaryRequest::Daily { .. } => SummaryScope::Daily,
            SummaryRequest::Weekly { .. } => SummaryScope::Weekly,
            SummaryRequest::Monthly { .. } => SummaryScope::Monthly,
        }
    }

    /// Embeds the payload into the fixed instruction template for its scope.
    pub fn prompt(&self) -> String {
        match self {
            SummaryRequest::Daily { daily_log } => {
                format!("{DAILY_INSTRUCTIONS}\n\nDaily Log:\n{daily_log}\n")
            }
            SummaryRequest::Weekly { daily_logs } => format!(
                "{WEEKLY_INSTRUCTIONS}\n\nDaily Logs:\n{}",
                delimited(daily_logs, "--- Day Start ---", "--- Day End ---")
            ),
            SummaryRequest::Monthly { weekly_summaries } => format!(
                "{MONTHLY_INSTRUCTIONS}\n\nSummaries:\n{}",
                delimited(
                    weekly_summaries,
                    "--- Summary Start ---",
                    "--- Summary End ---"
                )
            ),
        }
    }
}

fn delimited(entries: &[String], open: &str, close: &str) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(open);
        out.push('\n');
        out.push_str(entry.trim_end());
        out.push('\n');
        out.push_str(close);
        out.push('\n');
    }
    out
}

pub fn format_weekly(daily_logs: &[String]) -> SummaryRequest {
    SummaryRequest::Weekly {
        daily_logs: daily_logs.to_vec(),
    }
}

pub fn format_monthly(prior_summaries: &[String]) -> SummaryRequest {
    SummaryRequest::Monthly {
        weekly_summaries: prior_summaries.to_vec(),
    }
}

/// One entry per day: the stored summary, or a note that none exists.
pub fn prior_summaries(days: &[DayRecord]) -> Vec<String> {
    days.iter()
        .map(|day| match day.ai_summary.as_deref() {
            Some(summary) => format!("Summary for {}:\n{summary}", day.creation_date),
            None => format!("No summary for {}.", day.creation_date),
        })
        .collect()
}

struct LogWriter {
    out: String,
}

impl LogWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn scalar(&mut self, indent: &str, label: &str, value: &str) {
        self.line(format!("{indent}- {label}: {}", or_na(value)));
    }

    fn optional<T: Display>(&mut self, indent: &str, label: &str, value: Option<T>) {
        match value {
            Some(value) => self.line(format!("{indent}- {label}: {value}")),
            None => self.line(format!("{indent}- {label}: {NOT_AVAILABLE}")),
        }
    }

    fn list(&mut self, indent: &str, label: &str, items: &[String]) {
        self.line(format!("{indent}- {label}:"));
        if items.is_empty() {
            self.line(format!("{indent}  {NOT_AVAILABLE}"));
        }
        for item in items {
            self.line(format!("{indent}  - {item}"));
        }
    }

    fn check(&mut self, indent: &str, label: &str, checked: bool) {
        let mark = if checked { 'x' } else { ' ' };
        self.line(format!("{indent}- [{mark}] {label}"));
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

const HABITS: [(FlagField, &str); 8] = [
    (FlagField::HabitSleep, "habit_sleep"),
    (FlagField::HabitExercise, "habit_exercise"),
    (FlagField::HabitWalk, "habit_walk"),
    (FlagField::HabitRead, "habit_read"),
    (FlagField::HabitStudy, "habit_study"),
    (FlagField::HabitWork, "habit_work"),
    (FlagField::HabitGroomAm, "habit_groom_am"),
    (FlagField::HabitGroomPm, "habit_groom_pm"),
];

const MEALS: [(ListField, &str); 4] = [
    (ListField::LogBreakfast, "Breakfast"),
    (ListField::LogLunch, "Lunch"),
    (ListField::LogSupper, "Supper"),
    (ListField::LogSnacks, "Snacks"),
];

/// Renders every field of `record` as a markdown daily note.
pub fn format_daily(record: &DayRecord) -> String {
    let mut log = LogWriter { out: String::new() };

    log.line("---");
    log.line(format!("creation-date: {}", record.creation_date));
    log.line(format!("day: {}", record.day_of_week));
    log.line("tags: daily-note");
    log.line("---");
    log.line("");

    log.line("## Daily Snapshot");
    log.optional("", "mood", record.mood);
    log.optional("", "energy", record.energy);
    log.scalar("", "steps", record.text(TextField::Steps));
    for (flag, label) in HABITS {
        log.line(format!("- {label}: {}", yes_no(record.flag(flag))));
    }
    log.scalar("", "habit_exercise_notes", record.text(TextField::HabitExerciseNotes));
    log.line("");

    log.line("## Today's Schedule");
    for task in SCHEDULE {
        log.line(format!("- **{}:** **{}**", task.time, task.title));
        for detail in task.details {
            match *detail {
                TaskDetail::Check { label, field } => log.check("  ", label, record.flag(field)),
                TaskDetail::Text { label, field } => log.scalar("  ", label, record.text(field)),
                TaskDetail::List { label, field } => log.list("  ", label, record.list(field)),
            }
        }
    }
    log.line("- **Throughout Day:** **Nutrition**");
    log.scalar("  ", "Total Calories Consumed", &record.nutrition_total_calories_consumed);
    log.scalar("  ", "Water Intake", &record.nutrition_water_intake);
    log.line("");

    log.line("## Day Stats");
    log.optional("", "Mood Today", record.day_stats_mood);
    log.optional("", "Energy Level", record.day_stats_energy);
    log.scalar("", "Steps", &record.day_stats_steps);
    log.scalar("", "Exercise Calories", &record.day_stats_exercise_calories);
    log.scalar("", "Total Calories", &record.day_stats_total_calories);
    log.line("");

    log.line("## Study Log");
    log.list("", "Topic(s)", &record.study_log_topics);
    log.scalar("", "Notes/Key Takeaways", &record.study_log_notes);
    log.scalar("", "Hours Logged", &record.study_log_hours);
    log.line("");

    log.line("## Nutrition Log");
    for (field, label) in MEALS {
        log.list("", label, record.list(field));
    }
    log.scalar("", "Total Calories", &record.nutrition_log_total_calories);

    log.out
}
