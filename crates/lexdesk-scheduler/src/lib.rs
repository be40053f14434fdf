//! # LexDesk Scheduler
//!
//! Reminder engine for court sessions and task deadlines.
//!
//! ## Design Principles
//! - Stateless recomputation — every cycle re-fetches and rebuilds the set
//! - Tokio timers only — zero overhead when idle
//! - Fetch failures never clear what is already shown
//! - Explicit stop handle — nothing publishes after `stop()` returns
//!
//! ## Architecture
//! ```text
//! NotificationEngine (tokio interval, 60s)
//!   ├── set_user(user) → first cycle immediately
//!   ├── cycle: CaseDataProvider
//!   │     ├── list_sessions(user) ┐ concurrently,
//!   │     └── list_tasks(user)    ┘ bounded by fetch timeout
//!   ├── reminders::evaluate(sessions, tasks, now)
//!   │     ├── session ≤ 1h  → "within an hour"
//!   │     ├── session ≤ 24h → "within 24 hours"
//!   │     └── task ≤ 24h    → "within 24 hours"
//!   └── publish → watch channel (last write wins)
//! ```

pub mod engine;
pub mod notify;
pub mod reminders;
pub mod store;

pub use engine::NotificationEngine;
pub use notify::{NotificationRecord, NotificationSource, ReminderWindow};
pub use store::{CaseData, CaseStore};
