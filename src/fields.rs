//! Closed set of writable [`DayRecord`] fields, grouped by value category.
//!
//! Updates arrive as `{field, value}` pairs; [`FieldUpdate::from_json`] is the
//! only place a field name is matched against a string. Everything past that
//! point works on the typed enums below.

use crate::models::{DayRecord, Energy, Mood};
use serde_json::Value;
use std::fmt;

macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn parse(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

field_enum! {
    /// Boolean habit and schedule-completion fields.
    FlagField {
        HabitSleep => "habit_sleep",
        HabitExercise => "habit_exercise",
        HabitWalk => "habit_walk",
        HabitRead => "habit_read",
        HabitStudy => "habit_study",
        HabitWork => "habit_work",
        HabitGroomAm => "habit_groom_am",
        HabitGroomPm => "habit_groom_pm",
        SleepMetGoal => "schedule_sleep_met_goal",
        WakeupPrepDone => "schedule_wakeup_prep_done",
        WorkoutComplete => "schedule_exercise_workout_complete",
        Shower1Done => "schedule_shower_1_done",
        AmGroomingDone => "schedule_am_grooming_done",
        BreakfastAte => "schedule_breakfast_ate",
        BufferTransitionDone => "schedule_buffer_transition_done",
        WalkComplete6kSteps => "schedule_walk_complete_6k_steps",
        ReadGte1hr => "schedule_read_gte_1hr",
        LunchPrepEatCleanDone => "schedule_lunch_prep_eat_clean_done",
        Entertainment1FlexIntentional => "schedule_entertainment_1_flex_intentional",
        PersonalTimeFlexIntentional => "schedule_personal_time_errands_flex_intentional",
        SupperPrepEatAte => "schedule_supper_prep_eat_ate",
        CleanCleaned => "schedule_clean_cleaned",
        Shower2PmGroomDone => "schedule_shower_2_pm_groom_done",
        Entertainment2SocialFlexIntentional => "schedule_entertainment_2_social_flex_intentional",
        WindDownPrepSleepDone => "schedule_wind_down_prep_sleep_done",
    }
}

field_enum! {
    /// Free-text and numeric-as-text fields.
    TextField {
        Steps => "steps",
        HabitExerciseNotes => "habit_exercise_notes",
        SleepActualHours => "schedule_sleep_actual_hours",
        ExerciseCaloriesBurned => "schedule_exercise_calories_burned",
        WalkCurrentStepCount => "schedule_walk_current_step_count",
        TotalCaloriesConsumed => "nutrition_total_calories_consumed",
        WaterIntake => "nutrition_water_intake",
        StudyNotes => "study_log_notes",
        StudyHours => "study_log_hours",
        LogTotalCalories => "nutrition_log_total_calories",
    }
}

field_enum! {
    /// List-of-strings fields. Never null; absence is an empty list.
    ListField {
        ExerciseType => "schedule_exercise_type",
        ExerciseNotesPerformance => "schedule_exercise_notes_performance",
        BreakfastDetails => "schedule_breakfast_details",
        ReadBookMaterial => "schedule_read_book_material",
        ReadPagesProgress => "schedule_read_pages_progress",
        LunchMealDetails => "schedule_lunch_meal_details",
        Entertainment1FlexActivities => "schedule_entertainment_1_flex_activities",
        PersonalTimeFlexActivities => "schedule_personal_time_errands_flex_activities",
        SupperMealDetails => "schedule_supper_meal_details",
        Entertainment2SocialFlexActivities => "schedule_entertainment_2_social_flex_activities",
        WindDownActivities => "schedule_wind_down_activities",
        StudyTopics => "study_log_topics",
        LogBreakfast => "nutrition_log_breakfast",
        LogLunch => "nutrition_log_lunch",
        LogSupper => "nutrition_log_supper",
        LogSnacks => "nutrition_log_snacks",
    }
}

impl TextField {
    /// Fields that must hold a non-negative number or nothing.
    pub fn is_numeric(self) -> bool {
        match self {
            TextField::Steps
            | TextField::ExerciseCaloriesBurned
            | TextField::WalkCurrentStepCount
            | TextField::TotalCaloriesConsumed
            | TextField::WaterIntake
            | TextField::StudyHours
            | TextField::LogTotalCalories => true,
            TextField::HabitExerciseNotes | TextField::SleepActualHours | TextField::StudyNotes => {
                false
            }
        }
    }
}

/// Any field a caller may write. Derived day-stats and identity fields are
/// deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mood,
    Energy,
    Flag(FlagField),
    Text(TextField),
    List(ListField),
    AiSummary,
}

impl Field {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "mood" => Some(Field::Mood),
            "energy" => Some(Field::Energy),
            "ai_summary" => Some(Field::AiSummary),
            _ => FlagField::parse(key)
                .map(Field::Flag)
                .or_else(|| TextField::parse(key).map(Field::Text))
                .or_else(|| ListField::parse(key).map(Field::List)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Mood => "mood",
            Field::Energy => "energy",
            Field::AiSummary => "ai_summary",
            Field::Flag(field) => field.as_str(),
            Field::Text(field) => field.as_str(),
            Field::List(field) => field.as_str(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{field}' expects {expected}")]
    InvalidValue { field: Field, expected: &'static str },
    #[error("field '{field}' must be empty or a non-negative number, got '{value}'")]
    NotNumeric { field: TextField, value: String },
}

/// A single typed write against a [`DayRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Mood(Option<Mood>),
    Energy(Option<Energy>),
    Flag(FlagField, bool),
    Text(TextField, String),
    List(ListField, Vec<String>),
    AiSummary(Option<String>),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Mood(_) => Field::Mood,
            FieldUpdate::Energy(_) => Field::Energy,
            FieldUpdate::Flag(field, _) => Field::Flag(*field),
            FieldUpdate::Text(field, _) => Field::Text(*field),
            FieldUpdate::List(field, _) => Field::List(*field),
            FieldUpdate::AiSummary(_) => Field::AiSummary,
        }
    }

    /// Builds an update from a wire-level field name and JSON value.
    pub fn from_json(key: &str, value: Value) -> Result<Self, FieldError> {
        let field = Field::parse(key).ok_or_else(|| FieldError::UnknownField(key.to_string()))?;
        let invalid = |expected| FieldError::InvalidValue { field, expected };

        match field {
            Field::Mood => match optional_string(value).ok_or_else(|| invalid("a mood label"))? {
                None => Ok(FieldUpdate::Mood(None)),
                Some(raw) => raw
                    .parse()
                    .map(|mood| FieldUpdate::Mood(Some(mood)))
                    .map_err(|_| invalid("a mood label")),
            },
            Field::Energy => match optional_string(value).ok_or_else(|| invalid("an energy label"))? {
                None => Ok(FieldUpdate::Energy(None)),
                Some(raw) => raw
                    .parse()
                    .map(|energy| FieldUpdate::Energy(Some(energy)))
                    .map_err(|_| invalid("an energy label")),
            },
            Field::Flag(flag) => value
                .as_bool()
                .map(|checked| FieldUpdate::Flag(flag, checked))
                .ok_or_else(|| invalid("a boolean")),
            Field::Text(text) => {
                let raw = match value {
                    Value::Null => String::new(),
                    Value::String(raw) => raw,
                    Value::Number(number) => number.to_string(),
                    _ => return Err(invalid("a string")),
                };
                FieldUpdate::text(text, raw)
            }
            Field::List(list) => match value {
                Value::Null => Ok(FieldUpdate::List(list, Vec::new())),
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(item) => Ok(item),
                        _ => Err(invalid("a list of strings")),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(|items| FieldUpdate::List(list, items)),
                _ => Err(invalid("a list of strings")),
            },
            Field::AiSummary => optional_string(value)
                .map(FieldUpdate::AiSummary)
                .ok_or_else(|| invalid("a string")),
        }
    }

    /// Text update that enforces the numeric-as-text rule for numeric fields.
    pub fn text(field: TextField, raw: impl Into<String>) -> Result<Self, FieldError> {
        let raw = raw.into();
        if !field.is_numeric() {
            return Ok(FieldUpdate::Text(field, raw));
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(FieldUpdate::Text(field, String::new()));
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() && number >= 0.0 => {
                Ok(FieldUpdate::Text(field, trimmed.to_string()))
            }
            _ => Err(FieldError::NotNumeric { field, value: raw }),
        }
    }
}

/// `null` and blank strings both mean "absent".
fn optional_string(value: Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(raw) if raw.trim().is_empty() => Some(None),
        Value::String(raw) => Some(Some(raw)),
        _ => None,
    }
}

impl DayRecord {
    pub fn flag(&self, field: FlagField) -> bool {
        match field {
            FlagField::HabitSleep => self.habit_sleep,
            FlagField::HabitExercise => self.habit_exercise,
            FlagField::HabitWalk => self.habit_walk,
            FlagField::HabitRead => self.habit_read,
            FlagField::HabitStudy => self.habit_study,
            FlagField::HabitWork => self.habit_work,
            FlagField::HabitGroomAm => self.habit_groom_am,
            FlagField::HabitGroomPm => self.habit_groom_pm,
            FlagField::SleepMetGoal => self.schedule_sleep_met_goal,
            FlagField::WakeupPrepDone => self.schedule_wakeup_prep_done,
            FlagField::WorkoutComplete => self.schedule_exercise_workout_complete,
            FlagField::Shower1Done => self.schedule_shower_1_done,
            FlagField::AmGroomingDone => self.schedule_am_grooming_done,
            FlagField::BreakfastAte => self.schedule_breakfast_ate,
            FlagField::BufferTransitionDone => self.schedule_buffer_transition_done,
            FlagField::WalkComplete6kSteps => self.schedule_walk_complete_6k_steps,
            FlagField::ReadGte1hr => self.schedule_read_gte_1hr,
            FlagField::LunchPrepEatCleanDone => self.schedule_lunch_prep_eat_clean_done,
            FlagField::Entertainment1FlexIntentional => {
                self.schedule_entertainment_1_flex_intentional
            }
            FlagField::PersonalTimeFlexIntentional => {
                self.schedule_personal_time_errands_flex_intentional
            }
            FlagField::SupperPrepEatAte => self.schedule_supper_prep_eat_ate,
            FlagField::CleanCleaned => self.schedule_clean_cleaned,
            FlagField::Shower2PmGroomDone => self.schedule_shower_2_pm_groom_done,
            FlagField::Entertainment2SocialFlexIntentional => {
                self.schedule_entertainment_2_social_flex_intentional
            }
            FlagField::WindDownPrepSleepDone => self.schedule_wind_down_prep_sleep_done,
        }
    }

    pub fn flag_mut(&mut self, field: FlagField) -> &mut bool {
        match field {
            FlagField::HabitSleep => &mut self.habit_sleep,
            FlagField::HabitExercise => &mut self.habit_exercise,
            FlagField::HabitWalk => &mut self.habit_walk,
            FlagField::HabitRead => &mut self.habit_read,
            FlagField::HabitStudy => &mut self.habit_study,
            FlagField::HabitWork => &mut self.habit_work,
            FlagField::HabitGroomAm => &mut self.habit_groom_am,
            FlagField::HabitGroomPm => &mut self.habit_groom_pm,
            FlagField::SleepMetGoal => &mut self.schedule_sleep_met_goal,
            FlagField::WakeupPrepDone => &mut self.schedule_wakeup_prep_done,
            FlagField::WorkoutComplete => &mut self.schedule_exercise_workout_complete,
            FlagField::Shower1Done => &mut self.schedule_shower_1_done,
            FlagField::AmGroomingDone => &mut self.schedule_am_grooming_done,
            FlagField::BreakfastAte => &mut self.schedule_breakfast_ate,
            FlagField::BufferTransitionDone => &mut self.schedule_buffer_transition_done,
            FlagField::WalkComplete6kSteps => &mut self.schedule_walk_complete_6k_steps,
            FlagField::ReadGte1hr => &mut self.schedule_read_gte_1hr,
            FlagField::LunchPrepEatCleanDone => &mut self.schedule_lunch_prep_eat_clean_done,
            FlagField::Entertainment1FlexIntentional => {
                &mut self.schedule_entertainment_1_flex_intentional
            }
            FlagField::PersonalTimeFlexIntentional => {
                &mut self.schedule_personal_time_errands_flex_intentional
            }
            FlagField::SupperPrepEatAte => &mut self.schedule_supper_prep_eat_ate,
            FlagField::CleanCleaned => &mut self.schedule_clean_cleaned,
            FlagField::Shower2PmGroomDone => &mut self.schedule_shower_2_pm_groom_done,
            FlagField::Entertainment2SocialFlexIntentional => {
                &mut self.schedule_entertainment_2_social_flex_intentional
            }
            FlagField::WindDownPrepSleepDone => &mut self.schedule_wind_down_prep_sleep_done,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Steps => &self.steps,
            TextField::HabitExerciseNotes => &self.habit_exercise_notes,
            TextField::SleepActualHours => &self.schedule_sleep_actual_hours,
            TextField::ExerciseCaloriesBurned => &self.schedule_exercise_calories_burned,
            TextField::WalkCurrentStepCount => &self.schedule_walk_current_step_count,
            TextField::TotalCaloriesConsumed => &self.nutrition_total_calories_consumed,
            TextField::WaterIntake => &self.nutrition_water_intake,
            TextField::StudyNotes => &self.study_log_notes,
            TextField::StudyHours => &self.study_log_hours,
            TextField::LogTotalCalories => &self.nutrition_log_total_calories,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Steps => &mut self.steps,
            TextField::HabitExerciseNotes => &mut self.habit_exercise_notes,
            TextField::SleepActualHours => &mut self.schedule_sleep_actual_hours,
            TextField::ExerciseCaloriesBurned => &mut self.schedule_exercise_calories_burned,
            TextField::WalkCurrentStepCount => &mut self.schedule_walk_current_step_count,
            TextField::TotalCaloriesConsumed => &mut self.nutrition_total_calories_consumed,
            TextField::WaterIntake => &mut self.nutrition_water_intake,
            TextField::StudyNotes => &mut self.study_log_notes,
            TextField::StudyHours => &mut self.study_log_hours,
            TextField::LogTotalCalories => &mut self.nutrition_log_total_calories,
        }
    }

    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::ExerciseType => &self.schedule_exercise_type,
            ListField::ExerciseNotesPerformance => &self.schedule_exercise_notes_performance,
            ListField::BreakfastDetails => &self.schedule_breakfast_details,
            ListField::ReadBookMaterial => &self.schedule_read_book_material,
            ListField::ReadPagesProgress => &self.schedule_read_pages_progress,
            ListField::LunchMealDetails => &self.schedule_lunch_meal_details,
            ListField::Entertainment1FlexActivities => {
                &self.schedule_entertainment_1_flex_activities
            }
            ListField::PersonalTimeFlexActivities => {
                &self.schedule_personal_time_errands_flex_activities
            }
            ListField::SupperMealDetails => &self.schedule_supper_meal_details,
            ListField::Entertainment2SocialFlexActivities => {
                &self.schedule_entertainment_2_social_flex_activities
            }
            ListField::WindDownActivities => &self.schedule_wind_down_activities,
            ListField::StudyTopics => &self.study_log_topics,
            ListField::LogBreakfast => &self.nutrition_log_breakfast,
            ListField::LogLunch => &self.nutrition_log_lunch,
            ListField::LogSupper => &self.nutrition_log_supper,
            ListField::LogSnacks => &self.nutrition_log_snacks,
        }
    }

    pub fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::ExerciseType => &mut self.schedule_exercise_type,
            ListField::ExerciseNotesPerformance => &mut self.schedule_exercise_notes_performance,
            ListField::BreakfastDetails => &mut self.schedule_breakfast_details,
            ListField::ReadBookMaterial => &mut self.schedule_read_book_material,
            ListField::ReadPagesProgress => &mut self.schedule_read_pages_progress,
            ListField::LunchMealDetails => &mut self.schedule_lunch_meal_details,
            ListField::Entertainment1FlexActivities => {
                &mut self.schedule_entertainment_1_flex_activities
            }
            ListField::PersonalTimeFlexActivities => {
                &mut self.schedule_personal_time_errands_flex_activities
            }
            ListField::SupperMealDetails => &mut self.schedule_supper_meal_details,
            ListField::Entertainment2SocialFlexActivities => {
                &mut self.schedule_entertainment_2_social_flex_activities
            }
            ListField::WindDownActivities => &mut self.schedule_wind_down_activities,
            ListField::StudyTopics => &mut self.study_log_topics,
            ListField::LogBreakfast => &mut self.nutrition_log_breakfast,
            ListField::LogLunch => &mut self.nutrition_log_lunch,
            ListField::LogSupper => &mut self.nutrition_log_supper,
            ListField::LogSnacks => &mut self.nutrition_log_snacks,
        }
    }
}
