//! Reminder evaluation — decides which sessions and tasks are due soon.
//!
//! Pure functions over a snapshot and a reference time. Windows are
//! half-open on the left: an item exactly at `now` (or earlier) has already
//! happened, an item exactly one hour or 24 hours away is still inside.

use chrono::{DateTime, Duration, Utc};
use lexdesk_core::config::Locale;
use lexdesk_core::types::{Session, Task};

use crate::notify::{NotificationRecord, ReminderWindow};

const HOUR_WINDOW_SECS: i64 = 60 * 60;
const DAY_WINDOW_SECS: i64 = 24 * HOUR_WINDOW_SECS;

fn hour_window() -> Duration {
    Duration::seconds(HOUR_WINDOW_SECS)
}

fn day_window() -> Duration {
    Duration::seconds(DAY_WINDOW_SECS)
}

/// Window a session falls into. The hour bucket wins over the day bucket.
pub fn classify_session(session: &Session, now: DateTime<Utc>) -> Option<ReminderWindow> {
    let diff = session.date_time - now;
    if diff <= Duration::zero() {
        None
    } else if diff <= hour_window() {
        Some(ReminderWindow::WithinHour)
    } else if diff <= day_window() {
        Some(ReminderWindow::WithinDay)
    } else {
        None
    }
}

/// Window a task deadline falls into. Done tasks never qualify.
pub fn classify_task(task: &Task, now: DateTime<Utc>) -> Option<ReminderWindow> {
    if task.is_done {
        return None;
    }
    let diff = task.deadline - now;
    if diff > Duration::zero() && diff <= day_window() {
        Some(ReminderWindow::WithinDay)
    } else {
        None
    }
}

/// Build the full reminder set: sessions in input order, then tasks.
pub fn evaluate(
    sessions: &[Session],
    tasks: &[Task],
    now: DateTime<Utc>,
    locale: Locale,
) -> Vec<NotificationRecord> {
    let session_records = sessions.iter().filter_map(|session| {
        classify_session(session, now)
            .map(|window| NotificationRecord::for_session(session, window, locale))
    });
    let task_records = tasks.iter().filter_map(|task| {
        classify_task(task, now).map(|_| NotificationRecord::for_task(task, locale))
    });
    session_records.chain(task_records).collect()
}
