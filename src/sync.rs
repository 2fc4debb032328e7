use crate::fields::{FieldUpdate, TextField};
use crate::models::DayRecord;

/// Writes `update` into `record` and refreshes the mirrored day-stats fields.
///
/// | written field                          | mirrored into                 |
/// |----------------------------------------|-------------------------------|
/// | `mood`                                 | `day_stats_mood`              |
/// | `energy`                               | `day_stats_energy`            |
/// | `schedule_walk_current_step_count`     | `day_stats_steps`             |
/// | `schedule_exercise_calories_burned`    | `day_stats_exercise_calories` |
/// | either total-calories field            | `day_stats_total_calories`    |
///
/// Total calories resolve to the consumed figure when it is non-empty and to
/// the meal-log figure otherwise.
pub fn apply_update(record: &mut DayRecord, update: FieldUpdate) {
    match update {
        FieldUpdate::Mood(mood) => {
            record.mood = mood;
            record.day_stats_mood = mood;
        }
        FieldUpdate::Energy(energy) => {
            record.energy = energy;
            record.day_stats_energy = energy;
        }
        FieldUpdate::Flag(field, checked) => *record.flag_mut(field) = checked,
        FieldUpdate::List(field, items) => *record.list_mut(field) = items,
        FieldUpdate::AiSummary(summary) => record.ai_summary = summary,
        FieldUpdate::Text(field, value) => {
            *record.text_mut(field) = value;
            sync_text(record, field);
        }
    }
}

/// Pure form of [`apply_update`].
pub fn apply_sync(record: &DayRecord, update: FieldUpdate) -> DayRecord {
    let mut next = record.clone();
    apply_update(&mut next, update);
    next
}

fn sync_text(record: &mut DayRecord, field: TextField) {
    match field {
        TextField::WalkCurrentStepCount => {
            record.day_stats_steps = record.schedule_walk_current_step_count.clone();
        }
        TextField::ExerciseCaloriesBurned => {
            record.day_stats_exercise_calories = record.schedule_exercise_calories_burned.clone();
        }
        TextField::TotalCaloriesConsumed | TextField::LogTotalCalories => {
            record.day_stats_total_calories = resolved_total_calories(record).to_string();
        }
        TextField::Steps
        | TextField::HabitExerciseNotes
        | TextField::SleepActualHours
        | TextField::WaterIntake
        | TextField::StudyNotes
        | TextField::StudyHours => {}
    }
}

pub fn resolved_total_calories(record: &DayRecord) -> &str {
    if record.nutrition_total_calories_consumed.trim().is_empty() {
        &record.nutrition_log_total_calories
    } else {
        &record.nutrition_total_calories_consumed
    }
}
