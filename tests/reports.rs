use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::NaiveDate;
use dailytrac::fields::{FieldUpdate, TextField};
use dailytrac::models::Mood;
use dailytrac::reports;
use dailytrac::storage::MemoryBackend;
use dailytrac::summarizer::{SummarizeError, Summarizer, SummaryReply};
use dailytrac::summary::{SummaryRequest, SummaryScope};
use dailytrac::{AppState, DayStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify};

enum Behaviour {
    Reply(&'static str),
    Empty,
    Fail,
}

struct StubSummarizer {
    behaviour: Behaviour,
    calls: AtomicUsize,
    last: Mutex<Option<SummaryRequest>>,
    hold_daily: Option<Arc<Notify>>,
}

impl StubSummarizer {
    fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            hold_daily: None,
        }
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryReply, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().await = Some(request.clone());
        if let (Some(gate), SummaryScope::Daily) = (&self.hold_daily, request.scope()) {
            gate.notified().await;
        }
        match self.behaviour {
            Behaviour::Reply(text) => Ok(SummaryReply::new(text)),
            Behaviour::Empty => Ok(SummaryReply::default()),
            Behaviour::Fail => Err(SummarizeError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
        }
    }
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

async fn state_with(stub: Arc<StubSummarizer>) -> (Arc<MemoryBackend>, AppState) {
    let backend = Arc::new(MemoryBackend::default());
    let store = DayStore::open(backend.clone()).await;
    (backend, AppState::new(store, stub))
}

#[tokio::test]
async fn daily_summary_end_to_end() {
    let stub = Arc::new(StubSummarizer::new(Behaviour::Reply("Good day.")));
    let (backend, state) = state_with(stub.clone()).await;
    let day = date("2024-06-15");

    state.store.ensure(day).await.unwrap();
    state
        .store
        .upsert(day, FieldUpdate::Mood(Some(Mood::Happy)))
        .await
        .unwrap();
    let record = state
        .store
        .upsert(day, FieldUpdate::Text(TextField::LogTotalCalories, "1800".into()))
        .await
        .unwrap();
    assert_eq!(record.day_stats_mood, Some(Mood::Happy));
    assert_eq!(record.day_stats_total_calories, "1800");

    let response = reports::summarize_day(&state, day).await.unwrap();
    assert_eq!(response.summary.as_deref(), Some("Good day."));
    assert!(response.notice.is_none());
    assert_eq!(
        state.store.get(day).await.ai_summary.as_deref(),
        Some("Good day.")
    );
    assert_eq!(
        backend.snapshot().await.days[&day].ai_summary.as_deref(),
        Some("Good day.")
    );

    match stub.last.lock().await.as_ref() {
        Some(SummaryRequest::Daily { daily_log }) => {
            assert!(daily_log.contains("- mood: 😊 Happy"));
            assert!(daily_log.contains("- Total Calories: 1800"));
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn missing_day_is_reported_without_calling_the_service() {
    let stub = Arc::new(StubSummarizer::new(Behaviour::Reply("unused")));
    let (_backend, state) = state_with(stub.clone()).await;

    let err = reports::summarize_day(&state, date("2024-06-15"))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_summary_is_a_soft_error() {
    let stub = Arc::new(StubSummarizer::new(Behaviour::Empty));
    let (_backend, state) = state_with(stub).await;
    let day = date("2024-06-15");
    state.store.ensure(day).await.unwrap();

    let response = reports::summarize_day(&state, day).await.unwrap();
    assert!(response.summary.is_none());
    assert!(response.notice.is_some());
    assert!(state.store.get(day).await.ai_summary.is_none());
}

#[tokio::test]
async fn failure_releases_the_busy_flag_and_keeps_state() {
    let stub = Arc::new(StubSummarizer::new(Behaviour::Fail));
    let (_backend, state) = state_with(stub.clone()).await;
    let day = date("2024-06-15");
    let before = state.store.ensure(day).await.unwrap();

    for _ in 0..2 {
        let err = reports::summarize_day(&state, day).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(!state.locks.is_busy(SummaryScope::Daily));
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    assert_eq!(state.store.get(day).await, before);
}

#[tokio::test]
async fn busy_scope_rejects_duplicates_but_not_other_scopes() {
    let gate = Arc::new(Notify::new());
    let stub = Arc::new(StubSummarizer {
        hold_daily: Some(gate.clone()),
        ..StubSummarizer::new(Behaviour::Reply("Done."))
    });
    let (_backend, state) = state_with(stub).await;
    let day = date("2024-06-15");
    state.store.ensure(day).await.unwrap();

    let first = {
        let state = state.clone();
        tokio::spawn(async move { reports::summarize_day(&state, day).await })
    };
    while !state.locks.is_busy(SummaryScope::Daily) {
        tokio::task::yield_now().await;
    }

    let err = reports::summarize_day(&state, day).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);

    let weekly = reports::summarize_week(&state, day).await.unwrap();
    assert_eq!(weekly.summary.as_deref(), Some("Done."));

    gate.notify_one();
    let response = first.await.unwrap().unwrap();
    assert_eq!(response.summary.as_deref(), Some("Done."));
    assert!(!state.locks.is_busy(SummaryScope::Daily));
}

#[tokio::test]
async fn weekly_report_covers_monday_to_sunday() {
    let stub = Arc::new(StubSummarizer::new(Behaviour::Reply("Busy week.")));
    let (_backend, state) = state_with(stub.clone()).await;
    state
        .store
        .upsert(
            date("2024-06-11"),
            FieldUpdate::Text(TextField::StudyHours, "2".into()),
        )
        .await
        .unwrap();

    let err = reports::summarize_week(&state, date("2024-06-14"))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);

    let report = reports::summarize_week(&state, date("2024-06-15")).await.unwrap();
    assert_eq!(report.range.start, date("2024-06-10"));
    assert_eq!(report.range.end, date("2024-06-16"));
    assert_eq!(report.stats.total_days, 7);
    assert_eq!(report.stats.total_study_hours, 2.0);

    match stub.last.lock().await.as_ref() {
        Some(SummaryRequest::Weekly { daily_logs }) => {
            assert_eq!(daily_logs.len(), 7);
            assert!(daily_logs[0].contains("creation-date: 2024-06-10"));
            assert!(daily_logs[6].contains("creation-date: 2024-06-16"));
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn monthly_report_sends_prior_summaries() {
    let stub = Arc::new(StubSummarizer::new(Behaviour::Empty));
    let (_backend, state) = state_with(stub.clone()).await;
    state
        .store
        .upsert(
            date("2024-06-03"),
            FieldUpdate::AiSummary(Some("Strong start.".into())),
        )
        .await
        .unwrap();

    let err = reports::summarize_month(&state, date("2024-06-29"))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);

    let report = reports::summarize_month(&state, date("2024-06-30")).await.unwrap();
    assert!(report.summary.is_none());
    assert!(report.notice.is_some());
    assert_eq!(report.stats.total_days, 30);

    match stub.last.lock().await.as_ref() {
        Some(SummaryRequest::Monthly { weekly_summaries }) => {
            assert_eq!(weekly_summaries.len(), 30);
            assert_eq!(weekly_summaries[0], "No summary for 2024-06-01.");
            assert_eq!(
                weekly_summaries[2],
                "Summary for 2024-06-03:\nStrong start."
            );
        }
        other => panic!("unexpected request {other:?}"),
    }
}
