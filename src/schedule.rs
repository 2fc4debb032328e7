use crate::fields::{FlagField, ListField, TextField};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskDetail {
    Check {
        label: &'static str,
        #[serde(serialize_with = "as_key")]
        field: FlagField,
    },
    Text {
        label: &'static str,
        #[serde(serialize_with = "as_key")]
        field: TextField,
    },
    List {
        label: &'static str,
        #[serde(serialize_with = "as_key")]
        field: ListField,
    },
}

/// One time-blocked slot of the fixed daily schedule.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScheduleTask {
    pub id: &'static str,
    pub title: &'static str,
    pub time: &'static str,
    pub details: &'static [TaskDetail],
}

fn as_key<S, F>(field: &F, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    F: std::fmt::Display,
{
    serializer.collect_str(field)
}

const fn check(label: &'static str, field: FlagField) -> TaskDetail {
    TaskDetail::Check { label, field }
}

const fn text(label: &'static str, field: TextField) -> TaskDetail {
    TaskDetail::Text { label, field }
}

const fn list(label: &'static str, field: ListField) -> TaskDetail {
    TaskDetail::List { label, field }
}

pub const SCHEDULE: &[ScheduleTask] = &[
    ScheduleTask {
        id: "sleep",
        title: "Sleep",
        time: "00:00 - 08:00",
        details: &[
            check("Met 8hr Goal?", FlagField::SleepMetGoal),
            text("Actual Sleep Hours", TextField::SleepActualHours),
        ],
    },
    ScheduleTask {
        id: "wakeup",
        title: "Wake up / Prep",
        time: "08:00 - 08:10",
        details: &[check("Done?", FlagField::WakeupPrepDone)],
    },
    ScheduleTask {
        id: "exercise",
        title: "Exercise",
        time: "08:10 - 08:50",
        details: &[
            check("Workout Complete?", FlagField::WorkoutComplete),
            list("Exercise Type", ListField::ExerciseType),
            text("Calories Burned", TextField::ExerciseCaloriesBurned),
            list("Notes/Performance", ListField::ExerciseNotesPerformance),
        ],
    },
    ScheduleTask {
        id: "shower1",
        title: "Shower 1",
        time: "08:50 - 09:00",
        details: &[check("Done?", FlagField::Shower1Done)],
    },
    ScheduleTask {
        id: "amgroom",
        title: "AM Grooming & Teeth",
        time: "09:00 - 09:30",
        details: &[check("Done?", FlagField::AmGroomingDone)],
    },
    ScheduleTask {
        id: "breakfast",
        title: "Breakfast",
        time: "09:30 - 09:50",
        details: &[
            check("Ate Breakfast?", FlagField::BreakfastAte),
            list("Breakfast Details", ListField::BreakfastDetails),
        ],
    },
    ScheduleTask {
        id: "buffer",
        title: "Buffer / Transition",
        time: "09:50 - 10:00",
        details: &[check("Done?", FlagField::BufferTransitionDone)],
    },
    ScheduleTask {
        id: "walk",
        title: "Walk",
        time: "11:10 - 12:10",
        details: &[
            check("Walk Complete (>=6k steps)?", FlagField::WalkComplete6kSteps),
            text("Steps Taken", TextField::WalkCurrentStepCount),
        ],
    },
    ScheduleTask {
        id: "read",
        title: "Read",
        time: "12:10 - 13:10",
        details: &[
            check("Read >= 1hr?", FlagField::ReadGte1hr),
            list("Book/Material", ListField::ReadBookMaterial),
            list("Pages/Progress", ListField::ReadPagesProgress),
        ],
    },
    ScheduleTask {
        id: "lunch",
        title: "Lunch Prep/Eat/Clean",
        time: "13:10 - 14:10",
        details: &[
            check("Done?", FlagField::LunchPrepEatCleanDone),
            list("Meal Details", ListField::LunchMealDetails),
        ],
    },
    ScheduleTask {
        id: "ent1",
        title: "Entertainment Block 1 / Flex",
        time: "14:10 - 17:10",
        details: &[
            check("Used Time Intentionally?", FlagField::Entertainment1FlexIntentional),
            list("Activities", ListField::Entertainment1FlexActivities),
        ],
    },
    ScheduleTask {
        id: "personal",
        title: "Personal Time / Errands / Flex",
        time: "17:10 - 18:10",
        details: &[
            check("Used Time Intentionally?", FlagField::PersonalTimeFlexIntentional),
            list("Activities", ListField::PersonalTimeFlexActivities),
        ],
    },
    ScheduleTask {
        id: "supper",
        title: "Supper Prep/Eat",
        time: "18:10 - 18:40",
        details: &[
            check("Ate Supper?", FlagField::SupperPrepEatAte),
            list("Meal Details", ListField::SupperMealDetails),
        ],
    },
    ScheduleTask {
        id: "clean",
        title: "Clean",
        time: "18:40 - 19:10",
        details: &[check("Cleaned?", FlagField::CleanCleaned)],
    },
    ScheduleTask {
        id: "shower2",
        title: "Shower 2 + PM Groom/Teeth",
        time: "19:10 - 19:55",
        details: &[check("Done?", FlagField::Shower2PmGroomDone)],
    },
    ScheduleTask {
        id: "ent2",
        title: "Entertainment Block 2 / Social / Flex",
        time: "19:55 - 23:00",
        details: &[
            check("Used Time Intentionally?", FlagField::Entertainment2SocialFlexIntentional),
            list("Activities", ListField::Entertainment2SocialFlexActivities),
        ],
    },
    ScheduleTask {
        id: "winddown",
        title: "Wind down / Prep for sleep",
        time: "23:00 - 00:00",
        details: &[
            check("Done?", FlagField::WindDownPrepSleepDone),
            list("Wind Down Activities", ListField::WindDownActivities),
        ],
    },
];

/// Completion flags that count toward the daily completion score.
pub const COMPLETION_FLAGS: [FlagField; 15] = [
    FlagField::SleepMetGoal,
    FlagField::WorkoutComplete,
    FlagField::Shower1Done,
    FlagField::AmGroomingDone,
    FlagField::BreakfastAte,
    FlagField::WalkComplete6kSteps,
    FlagField::ReadGte1hr,
    FlagField::LunchPrepEatCleanDone,
    FlagField::Entertainment1FlexIntentional,
    FlagField::PersonalTimeFlexIntentional,
    FlagField::SupperPrepEatAte,
    FlagField::CleanCleaned,
    FlagField::Shower2PmGroomDone,
    FlagField::Entertainment2SocialFlexIntentional,
    FlagField::WindDownPrepSleepDone,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_slot_leads_with_its_completion_flag() {
        for task in SCHEDULE {
            assert!(
                matches!(task.details.first(), Some(TaskDetail::Check { .. })),
                "{} has no completion flag",
                task.id
            );
        }
    }

    #[test]
    fn scored_flags_are_schedule_flags() {
        let scheduled: HashSet<FlagField> = SCHEDULE
            .iter()
            .flat_map(|task| task.details.iter())
            .filter_map(|detail| match detail {
                TaskDetail::Check { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        for flag in COMPLETION_FLAGS {
            assert!(scheduled.contains(&flag), "{flag} missing from schedule");
        }
        assert_eq!(scheduled.len(), COMPLETION_FLAGS.len() + 2);
    }

    #[test]
    fn schedule_serializes_field_keys() {
        let json = serde_json::to_value(&SCHEDULE[0]).unwrap();
        assert_eq!(json["details"][0]["kind"], "check");
        assert_eq!(json["details"][0]["field"], "schedule_sleep_met_goal");
    }
}
