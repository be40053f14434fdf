//! Notification records — what the engine publishes after each cycle.
//! Records are rebuilt from scratch every cycle and never persisted.

use lexdesk_core::config::Locale;
use lexdesk_core::types::{Session, Task};
use serde::{Deserialize, Serialize};

/// Lookahead window an item fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderWindow {
    /// Due in at most one hour.
    WithinHour,
    /// Due in more than one hour and at most 24 hours.
    WithinDay,
}

impl ReminderWindow {
    /// Coarse "time remaining" label shown next to the message.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ReminderWindow::WithinHour, Locale::En) => "within an hour",
            (ReminderWindow::WithinDay, Locale::En) => "within 24 hours",
            (ReminderWindow::WithinHour, Locale::Ar) => "خلال ساعة",
            (ReminderWindow::WithinDay, Locale::Ar) => "خلال 24 ساعة",
        }
    }
}

impl std::fmt::Display for ReminderWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label(Locale::En))
    }
}

/// Item a record was raised for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum NotificationSource {
    Session(Session),
    Task(Task),
}

/// A reminder ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// ID of the originating session or task.
    pub id: String,
    pub message: String,
    pub source: NotificationSource,
    pub window: ReminderWindow,
    /// Localized `window` label.
    pub time_until: String,
}

impl NotificationRecord {
    /// Build a session reminder.
    pub fn for_session(session: &Session, window: ReminderWindow, locale: Locale) -> Self {
        let name = session.display_name();
        let message = match (window, locale) {
            (ReminderWindow::WithinHour, Locale::En) => format!("Session ({name}) starts soon."),
            (ReminderWindow::WithinDay, Locale::En) => {
                format!("Reminder: session ({name}) tomorrow.")
            }
            (ReminderWindow::WithinHour, Locale::Ar) => format!("جلسة ({name}) تبدأ قريباً."),
            (ReminderWindow::WithinDay, Locale::Ar) => format!("تذكير: جلسة ({name}) غداً."),
        };
        Self {
            id: session.id.clone(),
            message,
            source: NotificationSource::Session(session.clone()),
            window,
            time_until: window.label(locale).to_string(),
        }
    }

    /// Build a task deadline reminder. Tasks only use the 24-hour window.
    pub fn for_task(task: &Task, locale: Locale) -> Self {
        let title = &task.title;
        let message = match locale {
            Locale::En => format!("Reminder: task ({title}) is due tomorrow."),
            Locale::Ar => format!("تذكير: موعد استحقاق مهمة ({title}) غداً."),
        };
        let window = ReminderWindow::WithinDay;
        Self {
            id: task.id.clone(),
            message,
            source: NotificationSource::Task(task.clone()),
            window,
            time_until: window.label(locale).to_string(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.source {
            NotificationSource::Session(session) => Some(session),
            NotificationSource::Task(_) => None,
        }
    }

    pub fn task(&self) -> Option<&Task> {
        match &self.source {
            NotificationSource::Task(task) => Some(task),
            NotificationSource::Session(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session() -> Session {
        Session {
            id: "s1".into(),
            case_id: "c1".into(),
            date_time: Utc::now(),
            case_name: Some("United Brothers Co. v. ...".into()),
            court_name: "High Court of Appeal".into(),
            court_division: String::new(),
            case_number: "1445/58".into(),
            notes: String::new(),
            plaintiffs: vec!["cl2".into()],
            defendants: vec!["cl1".into()],
        }
    }

    fn task() -> Task {
        Task {
            id: "t1".into(),
            title: "Draft memorandum".into(),
            description: None,
            deadline: Utc::now(),
            is_done: false,
            case_id: "c1".into(),
        }
    }

    #[test]
    fn test_session_record_english() {
        let record =
            NotificationRecord::for_session(&session(), ReminderWindow::WithinHour, Locale::En);
        assert_eq!(record.id, "s1");
        assert_eq!(record.message, "Session (United Brothers Co. v. ...) starts soon.");
        assert_eq!(record.time_until, "within an hour");
        assert!(record.session().is_some());
        assert!(record.task().is_none());
    }

    #[test]
    fn test_session_record_falls_back_to_court() {
        let mut s = session();
        s.case_name = None;
        let record = NotificationRecord::for_session(&s, ReminderWindow::WithinDay, Locale::En);
        assert_eq!(record.message, "Reminder: session (High Court of Appeal) tomorrow.");
        assert_eq!(record.time_until, "within 24 hours");
    }

    #[test]
    fn test_task_record_arabic() {
        let record = NotificationRecord::for_task(&task(), Locale::Ar);
        assert_eq!(record.id, "t1");
        assert_eq!(record.message, "تذكير: موعد استحقاق مهمة (Draft memorandum) غداً.");
        assert_eq!(record.time_until, "خلال 24 ساعة");
        assert_eq!(record.window, ReminderWindow::WithinDay);
        assert_eq!(record.task().map(|t| t.id.as_str()), Some("t1"));
    }

    #[test]
    fn test_record_json_shape() {
        let record = NotificationRecord::for_task(&task(), Locale::En);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source"]["kind"], "task");
        assert_eq!(json["window"], "within_day");
        assert_eq!(json["time_until"], "within 24 hours");
    }
}
