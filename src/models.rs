use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, thiserror::Error)]
#[error("unknown label '{0}'")]
pub struct UnknownLabel(pub String);

/// Strips an optional emoji prefix ("😊 Happy") down to the bare label.
fn bare_label(raw: &str) -> &str {
    raw.trim().rsplit(char::is_whitespace).next().unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Neutral,
    Stressed,
    Excited,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Neutral,
        Mood::Stressed,
        Mood::Excited,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Neutral => "Neutral",
            Mood::Stressed => "Stressed",
            Mood::Excited => "Excited",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Neutral => "😐",
            Mood::Stressed => "😩",
            Mood::Excited => "🤩",
        }
    }

    /// Chart scale used by the monthly overview.
    pub fn score(self) -> u8 {
        match self {
            Mood::Excited => 5,
            Mood::Happy => 4,
            Mood::Neutral => 3,
            Mood::Sad => 2,
            Mood::Stressed | Mood::Angry => 1,
        }
    }
}

impl FromStr for Mood {
    type Err = UnknownLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let label = bare_label(raw);
        Self::ALL
            .into_iter()
            .find(|mood| mood.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownLabel(raw.to_string()))
    }
}

impl TryFrom<String> for Mood {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Energy {
    High,
    Medium,
    Low,
}

impl Energy {
    pub const ALL: [Energy; 3] = [Energy::High, Energy::Medium, Energy::Low];

    pub fn label(self) -> &'static str {
        match self {
            Energy::High => "High",
            Energy::Medium => "Medium",
            Energy::Low => "Low",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Energy::High => "⚡️",
            Energy::Medium => "🔋",
            Energy::Low => "🔌",
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Energy::High => 3,
            Energy::Medium => 2,
            Energy::Low => 1,
        }
    }
}

impl FromStr for Energy {
    type Err = UnknownLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let label = bare_label(raw);
        Self::ALL
            .into_iter()
            .find(|energy| energy.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownLabel(raw.to_string()))
    }
}

impl TryFrom<String> for Energy {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Everything tracked for one calendar date.
///
/// Field names double as the persisted JSON keys. Missing keys load as zero
/// values, so files written by older layouts still rehydrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DayRecord {
    pub creation_date: NaiveDate,
    pub day_of_week: String,

    #[serde(deserialize_with = "lenient::optional_label")]
    pub mood: Option<Mood>,
    #[serde(deserialize_with = "lenient::optional_label")]
    pub energy: Option<Energy>,
    pub steps: String,
    pub habit_sleep: bool,
    pub habit_exercise: bool,
    pub habit_exercise_notes: String,
    pub habit_walk: bool,
    pub habit_read: bool,
    pub habit_study: bool,
    pub habit_work: bool,
    pub habit_groom_am: bool,
    pub habit_groom_pm: bool,

    pub schedule_sleep_met_goal: bool,
    pub schedule_sleep_actual_hours: String,
    pub schedule_wakeup_prep_done: bool,
    pub schedule_exercise_workout_complete: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_exercise_type: Vec<String>,
    pub schedule_exercise_calories_burned: String,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_exercise_notes_performance: Vec<String>,
    pub schedule_shower_1_done: bool,
    pub schedule_am_grooming_done: bool,
    pub schedule_breakfast_ate: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_breakfast_details: Vec<String>,
    pub schedule_buffer_transition_done: bool,
    pub schedule_walk_complete_6k_steps: bool,
    pub schedule_walk_current_step_count: String,
    pub schedule_read_gte_1hr: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_read_book_material: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_read_pages_progress: Vec<String>,
    pub schedule_lunch_prep_eat_clean_done: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_lunch_meal_details: Vec<String>,
    pub schedule_entertainment_1_flex_intentional: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_entertainment_1_flex_activities: Vec<String>,
    pub schedule_personal_time_errands_flex_intentional: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_personal_time_errands_flex_activities: Vec<String>,
    pub schedule_supper_prep_eat_ate: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_supper_meal_details: Vec<String>,
    pub schedule_clean_cleaned: bool,
    pub schedule_shower_2_pm_groom_done: bool,
    pub schedule_entertainment_2_social_flex_intentional: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_entertainment_2_social_flex_activities: Vec<String>,
    pub schedule_wind_down_prep_sleep_done: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub schedule_wind_down_activities: Vec<String>,

    pub nutrition_total_calories_consumed: String,
    pub nutrition_water_intake: String,

    #[serde(deserialize_with = "lenient::optional_label")]
    pub day_stats_mood: Option<Mood>,
    #[serde(deserialize_with = "lenient::optional_label")]
    pub day_stats_energy: Option<Energy>,
    pub day_stats_steps: String,
    pub day_stats_exercise_calories: String,
    pub day_stats_total_calories: String,

    #[serde(deserialize_with = "lenient::list")]
    pub study_log_topics: Vec<String>,
    pub study_log_notes: String,
    pub study_log_hours: String,

    #[serde(deserialize_with = "lenient::list")]
    pub nutrition_log_breakfast: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub nutrition_log_lunch: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub nutrition_log_supper: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub nutrition_log_snacks: Vec<String>,
    pub nutrition_log_total_calories: String,

    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_summary: Option<String>,
}

impl DayRecord {
    /// Zero-valued record for `date`: flags false, text empty, lists empty,
    /// no summary.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            creation_date: date,
            day_of_week: weekday_name(date).to_string(),
            ..Self::default()
        }
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// The whole persisted collection, one record per date.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MonthData {
    pub days: BTreeMap<NaiveDate, DayRecord>,
}

impl MonthData {
    /// Re-derives identity fields from each key so a hand-edited or legacy
    /// file cannot disagree with its own index.
    pub fn normalize(&mut self) {
        for (date, record) in self.days.iter_mut() {
            record.creation_date = *date;
            record.day_of_week = weekday_name(*date).to_string();
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<StringOrList>::deserialize(deserializer)?;
        Ok(match value {
            None => Vec::new(),
            Some(StringOrList::One(item)) if item.trim().is_empty() => Vec::new(),
            Some(StringOrList::One(item)) => vec![item],
            Some(StringOrList::Many(items)) => items,
        })
    }

    pub fn optional_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => match raw.parse() {
                Ok(label) => Ok(Some(label)),
                Err(err) => {
                    tracing::warn!("dropping stored label: {err}");
                    Ok(None)
                }
            },
            _ => Ok(None),
        }
    }

    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|text| !text.trim().is_empty()))
    }
}

#[derive(Debug, Deserialize)]
pub struct FieldPatch {
    pub field: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub record: DayRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn new_record_is_zero_valued() {
        let record = DayRecord::new(date("2024-06-15"));
        assert_eq!(record.day_of_week, "Saturday");
        assert!(record.mood.is_none());
        assert!(!record.habit_sleep);
        assert!(!record.schedule_wind_down_prep_sleep_done);
        assert!(record.schedule_exercise_type.is_empty());
        assert_eq!(record.nutrition_water_intake, "");
        assert!(record.ai_summary.is_none());
    }

    #[test]
    fn weekday_uses_sunday_first_calendar() {
        assert_eq!(weekday_name(date("2024-06-16")), "Sunday");
        assert_eq!(weekday_name(date("2024-06-17")), "Monday");
    }

    #[test]
    fn labels_parse_with_or_without_emoji() {
        assert_eq!("Happy".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!("😩 Stressed".parse::<Mood>().unwrap(), Mood::Stressed);
        assert_eq!("⚡️ High".parse::<Energy>().unwrap(), Energy::High);
        assert_eq!("low".parse::<Energy>().unwrap(), Energy::Low);
        assert!("Sleepy".parse::<Mood>().is_err());
    }

    #[test]
    fn legacy_record_loads_leniently() {
        let json = serde_json::json!({
            "creation_date": "2024-06-15",
            "mood": "😊 Happy",
            "energy": "",
            "schedule_exercise_notes_performance": "felt strong",
            "schedule_read_pages_progress": "",
            "study_log_topics": null,
            "ai_summary": ""
        });
        let record: DayRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.mood, Some(Mood::Happy));
        assert_eq!(record.energy, None);
        assert_eq!(record.schedule_exercise_notes_performance, vec!["felt strong"]);
        assert!(record.schedule_read_pages_progress.is_empty());
        assert!(record.study_log_topics.is_empty());
        assert!(record.ai_summary.is_none());
    }

    #[test]
    fn normalize_rederives_identity_from_key() {
        let mut data = MonthData::default();
        data.days.insert(date("2024-06-15"), DayRecord::default());
        data.normalize();
        let record = &data.days[&date("2024-06-15")];
        assert_eq!(record.creation_date, date("2024-06-15"));
        assert_eq!(record.day_of_week, "Saturday");
    }
}
