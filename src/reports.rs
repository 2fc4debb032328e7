//! Daily, weekly and monthly summary flows.
//!
//! Each scope has its own busy flag; a second request for a scope that is
//! already running is refused rather than queued. Failures from the
//! summarization service are reported to the caller and never change stored
//! state.

use crate::errors::AppError;
use crate::fields::FieldUpdate;
use crate::models::DailySummaryResponse;
use crate::stats::{self, DateRange, RangeStats};
use crate::state::AppState;
use crate::summarizer::{SummarizeError, SummaryReply};
use crate::summary::{self, SummaryRequest, SummaryScope};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

#[derive(Debug, Default)]
pub struct ScopeLocks {
    daily: AtomicBool,
    weekly: AtomicBool,
    monthly: AtomicBool,
}

impl ScopeLocks {
    fn flag(&self, scope: SummaryScope) -> &AtomicBool {
        match scope {
            SummaryScope::Daily => &self.daily,
            SummaryScope::Weekly => &self.weekly,
            SummaryScope::Monthly => &self.monthly,
        }
    }

    /// Marks `scope` busy; the flag clears when the guard drops.
    pub fn try_acquire(&self, scope: SummaryScope) -> Option<ScopeGuard<'_>> {
        self.flag(scope)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScopeGuard { locks: self, scope })
    }

    pub fn is_busy(&self, scope: SummaryScope) -> bool {
        self.flag(scope).load(Ordering::Acquire)
    }
}

pub struct ScopeGuard<'a> {
    locks: &'a ScopeLocks,
    scope: SummaryScope,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.locks.flag(self.scope).store(false, Ordering::Release);
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangeReport {
    pub scope: SummaryScope,
    pub range: DateRange,
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub stats: RangeStats,
}

fn busy(scope: SummaryScope) -> AppError {
    AppError::conflict(format!(
        "A {} summary is already being generated.",
        scope_name(scope)
    ))
}

async fn request_summary(
    state: &AppState,
    request: &SummaryRequest,
) -> Result<SummaryReply, AppError> {
    match state.summarizer.summarize(request).await {
        Ok(reply) => Ok(reply),
        Err(SummarizeError::NotConfigured) => {
            warn!(scope = ?request.scope(), "summary requested but no service is configured");
            Err(AppError::bad_gateway("AI summaries are not configured."))
        }
        Err(err) => {
            error!(scope = ?request.scope(), "summary request failed: {err}");
            Err(AppError::bad_gateway(
                "An error occurred while generating the summary.",
            ))
        }
    }
}

/// Summarizes one stored day and saves the result as its `ai_summary`.
pub async fn summarize_day(
    state: &AppState,
    date: NaiveDate,
) -> Result<DailySummaryResponse, AppError> {
    let record = state
        .store
        .find(date)
        .await
        .ok_or_else(|| AppError::not_found("No data found for this day to summarize."))?;

    let _guard = state
        .locks
        .try_acquire(SummaryScope::Daily)
        .ok_or_else(|| busy(SummaryScope::Daily))?;

    let request = SummaryRequest::Daily {
        daily_log: summary::format_daily(&record),
    };
    let reply = request_summary(state, &request).await?;

    match reply.summary {
        Some(text) => {
            let record = state
                .store
                .upsert(date, FieldUpdate::AiSummary(Some(text.clone())))
                .await?;
            info!(%date, "daily summary generated");
            Ok(DailySummaryResponse {
                date,
                summary: Some(text),
                notice: None,
                record,
            })
        }
        None => {
            warn!(%date, "daily summary came back empty");
            Ok(DailySummaryResponse {
                date,
                summary: None,
                notice: Some("Failed to generate summary. No content returned.".to_string()),
                record,
            })
        }
    }
}

/// Weekly report for the Monday-to-Sunday week containing `date`.
/// Only offered on Saturdays.
pub async fn summarize_week(state: &AppState, date: NaiveDate) -> Result<RangeReport, AppError> {
    if !stats::is_weekly_report_day(date) {
        return Err(AppError::bad_request(
            "Weekly reports can be generated on Saturdays.",
        ));
    }
    let _guard = state
        .locks
        .try_acquire(SummaryScope::Weekly)
        .ok_or_else(|| busy(SummaryScope::Weekly))?;

    let range = stats::week_range(date);
    let days = state.store.range(&range).await;
    let daily_logs: Vec<String> = days.iter().map(summary::format_daily).collect();
    let reply = request_summary(state, &summary::format_weekly(&daily_logs)).await?;

    Ok(range_report(SummaryScope::Weekly, range, reply, stats::range_stats(&days)))
}

/// Monthly report built from each day's stored summary.
/// Only offered on the last day of the month.
pub async fn summarize_month(state: &AppState, date: NaiveDate) -> Result<RangeReport, AppError> {
    if !stats::is_monthly_report_day(date) {
        return Err(AppError::bad_request(
            "Monthly reports can be generated on the last day of the month.",
        ));
    }
    let _guard = state
        .locks
        .try_acquire(SummaryScope::Monthly)
        .ok_or_else(|| busy(SummaryScope::Monthly))?;

    let range = stats::month_range(date);
    let days = state.store.range(&range).await;
    let prior = summary::prior_summaries(&days);
    let reply = request_summary(state, &summary::format_monthly(&prior)).await?;

    Ok(range_report(SummaryScope::Monthly, range, reply, stats::range_stats(&days)))
}

fn range_report(
    scope: SummaryScope,
    range: DateRange,
    reply: SummaryReply,
    stats: RangeStats,
) -> RangeReport {
    let notice = match reply.summary {
        Some(_) => {
            info!(?scope, label = %range.label, "summary generated");
            None
        }
        None => {
            warn!(?scope, label = %range.label, "summary came back empty");
            Some(format!("Failed to generate {} summary.", scope_name(scope)))
        }
    };
    RangeReport {
        scope,
        range,
        summary: reply.summary,
        notice,
        stats,
    }
}

fn scope_name(scope: SummaryScope) -> &'static str {
    match scope {
        SummaryScope::Daily => "daily",
        SummaryScope::Weekly => "weekly",
        SummaryScope::Monthly => "monthly",
    }
}
