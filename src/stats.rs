use crate::models::{DayRecord, MonthData};
use crate::schedule::COMPLETION_FLAGS;
use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionBand {
    Empty,
    Band1,
    Band2,
    Band3,
    Band4,
}

impl CompletionBand {
    pub fn from_score(score: f64) -> Self {
        if score <= 0.0 {
            CompletionBand::Empty
        } else if score <= 25.0 {
            CompletionBand::Band1
        } else if score <= 50.0 {
            CompletionBand::Band2
        } else if score <= 75.0 {
            CompletionBand::Band3
        } else {
            CompletionBand::Band4
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub score: f64,
    pub band: CompletionBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RangeStats {
    pub sleep_goal_met: u32,
    pub exercise_days: u32,
    pub avg_calories_burned: f64,
    pub avg_water_intake: f64,
    pub avg_total_calories: f64,
    pub total_study_hours: f64,
    pub total_days: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewPoint {
    pub date: NaiveDate,
    pub mood: u8,
    pub energy: u8,
    pub steps_thousands: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub date: NaiveDate,
    pub exercise_type: Vec<String>,
    pub calories_burned: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub total_exercise_days: u32,
    pub total_calories_burned: f64,
    pub entries: Vec<ExerciseEntry>,
}

/// Inclusive date window with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangeStatsResponse {
    pub range: DateRange,
    pub stats: RangeStats,
}

/// Percentage of the fifteen scored schedule flags that are set.
pub fn completion_score(record: &DayRecord) -> f64 {
    let done = COMPLETION_FLAGS
        .iter()
        .filter(|flag| record.flag(**flag))
        .count();
    100.0 * done as f64 / COMPLETION_FLAGS.len() as f64
}

/// Aggregates a range of days.
///
/// Averages only count days whose value parses to a positive number, so a
/// blank day lowers neither the sum nor the denominator.
pub fn range_stats(days: &[DayRecord]) -> RangeStats {
    let mut stats = RangeStats {
        total_days: days.len() as u32,
        ..RangeStats::default()
    };
    let mut burned = Mean::default();
    let mut water = Mean::default();
    let mut consumed = Mean::default();

    for day in days {
        if day.schedule_sleep_met_goal {
            stats.sleep_goal_met += 1;
        }
        if day.habit_exercise {
            stats.exercise_days += 1;
        }
        burned.add(positive(&day.schedule_exercise_calories_burned));
        water.add(positive(&day.nutrition_water_intake));
        consumed.add(positive(&day.day_stats_total_calories));
        stats.total_study_hours += positive(&day.study_log_hours).unwrap_or(0.0);
    }

    stats.avg_calories_burned = burned.value();
    stats.avg_water_intake = water.value();
    stats.avg_total_calories = consumed.value();
    stats
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

fn positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Leading digits of `raw` as an integer; anything else reads as zero.
fn leading_integer(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().unwrap_or(0)
}

/// Every day of the range in order, substituting default records for gaps.
pub fn days_in_range(data: &MonthData, range: &DateRange) -> Vec<DayRecord> {
    let mut days = Vec::new();
    let mut date = range.start;
    while date <= range.end {
        let record = data
            .days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DayRecord::new(date));
        days.push(record);
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    days
}

pub fn week_range(date: NaiveDate) -> DateRange {
    let start = week_start(date);
    DateRange {
        label: week_label(start),
        start,
        end: start
            .checked_add_signed(Duration::days(6))
            .unwrap_or(NaiveDate::MAX),
    }
}

pub fn month_range(date: NaiveDate) -> DateRange {
    let start = date.with_day(1).unwrap_or(date);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateRange {
        label: start.format("%B %Y").to_string(),
        start,
        end,
    }
}

pub fn heatmap(data: &MonthData, date: NaiveDate) -> Vec<HeatmapCell> {
    days_in_range(data, &month_range(date))
        .iter()
        .map(|day| {
            let score = completion_score(day);
            HeatmapCell {
                date: day.creation_date,
                score,
                band: CompletionBand::from_score(score),
            }
        })
        .collect()
}

pub fn monthly_overview(data: &MonthData, date: NaiveDate) -> Vec<OverviewPoint> {
    days_in_range(data, &month_range(date))
        .iter()
        .map(|day| OverviewPoint {
            date: day.creation_date,
            mood: day.mood.map_or(0, |mood| mood.score()),
            energy: day.energy.map_or(0, |energy| energy.score()),
            steps_thousands: leading_integer(&day.day_stats_steps) as f64 / 1000.0,
        })
        .collect()
}

/// Stored days with any exercise logged, newest first.
pub fn exercise_log(data: &MonthData) -> ExerciseLog {
    let entries: Vec<ExerciseEntry> = data
        .days
        .values()
        .rev()
        .filter(|day| day.habit_exercise || day.schedule_exercise_workout_complete)
        .map(|day| ExerciseEntry {
            date: day.creation_date,
            exercise_type: day.schedule_exercise_type.clone(),
            calories_burned: day.schedule_exercise_calories_burned.clone(),
            notes: day.schedule_exercise_notes_performance.clone(),
        })
        .collect();

    let total_calories_burned = entries
        .iter()
        .filter_map(|entry| entry.calories_burned.trim().parse::<f64>().ok())
        .filter(|calories| calories.is_finite())
        .sum();

    ExerciseLog {
        total_exercise_days: entries.len() as u32,
        total_calories_burned,
        entries,
    }
}

pub fn is_weekly_report_day(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

pub fn is_monthly_report_day(date: NaiveDate) -> bool {
    month_range(date).end == date
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = Duration::days(date.weekday().num_days_from_monday() as i64);
    date.checked_sub_signed(offset).unwrap_or(NaiveDate::MIN)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
