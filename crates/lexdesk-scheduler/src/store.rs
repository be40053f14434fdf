//! File-based case store — the office data the reminder engine reads.
//! Data saved as one pretty-printed JSON file — human-readable, hand-editable.
//! The file is re-read only when its modification time changes.

use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use lexdesk_core::error::{LexError, Result};
use lexdesk_core::traits::CaseDataProvider;
use lexdesk_core::types::{
    Case, Client, SecretaryPermissions, Session, Task, User, UserRole,
};
use serde::{Deserialize, Serialize};

/// Everything stored in the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

struct FileState {
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// Case store serving sessions and tasks with role-based visibility.
pub struct CaseStore {
    data: RwLock<CaseData>,
    file: Option<RwLock<FileState>>,
}

impl CaseStore {
    /// In-memory store, never touches disk.
    pub fn new(data: CaseData) -> Self {
        Self {
            data: RwLock::new(data),
            file: None,
        }
    }

    /// Open a store backed by `path`. Later reads pick up edits to the file.
    pub fn open(path: &Path) -> Result<Self> {
        let (data, modified) = read_file(path)?;
        tracing::debug!(
            "📂 Loaded {} session(s), {} task(s) from {}",
            data.sessions.len(),
            data.tasks.len(),
            path.display()
        );
        Ok(Self {
            data: RwLock::new(data),
            file: Some(RwLock::new(FileState {
                path: path.to_path_buf(),
                modified,
            })),
        })
    }

    /// Save the current data to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        tracing::debug!("💾 Saved case data to {}", path.display());
        Ok(())
    }

    /// Copy of the current data.
    pub fn snapshot(&self) -> CaseData {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Look up a user by email, ignoring case.
    pub fn find_user_by_email(&self, email: &str) -> Result<User> {
        let wanted = email.trim().to_lowercase();
        self.snapshot()
            .users
            .into_iter()
            .find(|u| u.email.to_lowercase() == wanted)
            .ok_or_else(|| LexError::NotFound {
                entity: "user",
                id: email.to_string(),
            })
    }

    /// Re-read the backing file when it changed on disk.
    fn refresh(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let path = file.read().unwrap_or_else(|e| e.into_inner()).path.clone();
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| LexError::Provider(format!("{}: {e}", path.display())))?;

        let mut state = file.write().unwrap_or_else(|e| e.into_inner());
        if state.modified == Some(modified) {
            return Ok(());
        }
        let (data, modified) =
            read_file(&path).map_err(|e| LexError::Provider(format!("reload failed: {e}")))?;
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = data;
        state.modified = modified;
        tracing::info!("🔄 Reloaded case data from {}", path.display());
        Ok(())
    }

    /// Demo office with times relative to `now`.
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self::new(demo_data(now))
    }
}

fn read_file(path: &Path) -> Result<(CaseData, Option<SystemTime>)> {
    if !path.exists() {
        return Err(LexError::NotFound {
            entity: "data file",
            id: path.display().to_string(),
        });
    }
    let json = std::fs::read_to_string(path)?;
    let data: CaseData = serde_json::from_str(&json)?;
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    Ok((data, modified))
}

/// "<plaintiffs> v. ..." from the plaintiffs' client names, if any resolve.
fn derive_case_name(session: &Session, clients: &[Client]) -> Option<String> {
    let names: Vec<&str> = session
        .plaintiffs
        .iter()
        .filter_map(|id| clients.iter().find(|c| &c.id == id))
        .map(|c| c.name.as_str())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(format!("{} v. ...", names.join(", ")))
    }
}

#[async_trait]
impl CaseDataProvider for CaseStore {
    async fn list_sessions(&self, user: &User) -> Result<Vec<Session>> {
        self.refresh()?;
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());

        let visible: Vec<&Session> = if user.role == UserRole::Client {
            let own_cases: Vec<&str> = data
                .cases
                .iter()
                .filter(|c| user.linked_client_id.as_deref() == Some(c.client_id.as_str()))
                .map(|c| c.id.as_str())
                .collect();
            data.sessions
                .iter()
                .filter(|s| own_cases.contains(&s.case_id.as_str()))
                .collect()
        } else {
            data.sessions.iter().collect()
        };

        Ok(visible
            .into_iter()
            .map(|s| {
                let mut session = s.clone();
                session.case_name = derive_case_name(s, &data.clients);
                session
            })
            .collect())
    }

    async fn list_tasks(&self, user: &User) -> Result<Vec<Task>> {
        if user.role == UserRole::Client {
            return Ok(Vec::new());
        }
        self.refresh()?;
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(data.tasks.clone())
    }
}

fn demo_data(now: DateTime<Utc>) -> CaseData {
    let mut secretary = User::new("2", "Jane Smith", "secretary@example.com", UserRole::Secretary);
    secretary.permissions = Some(SecretaryPermissions::Full);
    let mut view_only = User::new("6", "Mike Ross", "viewonly@example.com", UserRole::Secretary);
    view_only.permissions = Some(SecretaryPermissions::Read);
    let mut ahmed = User::new("3", "Ahmed Mahmoud", "ahmed@client.com", UserRole::Client);
    ahmed.linked_client_id = Some("cl1".into());
    let mut acme = User::new("4", "ACME Corp.", "acme@example.com", UserRole::Client);
    acme.linked_client_id = Some("cl2".into());

    let client = |id: &str, name: &str, phone: &str| Client {
        id: id.into(),
        name: name.into(),
        phone_number: phone.into(),
    };
    let case = |id: &str, number: &str, court: &str, client_id: &str, client_name: &str, archived| Case {
        id: id.into(),
        case_number: number.into(),
        court_name: court.into(),
        client_id: client_id.into(),
        client_name: client_name.into(),
        details: String::new(),
        is_archived: archived,
    };
    let session = |id: &str, case_id: &str, at: DateTime<Utc>, court: &str, division: &str, number: &str, plaintiffs: &[&str], defendants: &[&str]| Session {
        id: id.into(),
        case_id: case_id.into(),
        date_time: at,
        case_name: None,
        court_name: court.into(),
        court_division: division.into(),
        case_number: number.into(),
        notes: String::new(),
        plaintiffs: plaintiffs.iter().map(|p| p.to_string()).collect(),
        defendants: defendants.iter().map(|d| d.to_string()).collect(),
    };
    let task = |id: &str, title: &str, deadline: DateTime<Utc>, is_done, case_id: &str| Task {
        id: id.into(),
        title: title.into(),
        description: None,
        deadline,
        is_done,
        case_id: case_id.into(),
    };

    CaseData {
        users: vec![
            User::new("1", "John Doe", "admin@example.com", UserRole::Admin),
            secretary,
            ahmed,
            acme,
            User::new("5", "Sarah Lee", "partner@example.com", UserRole::Partner),
            view_only,
        ],
        clients: vec![
            client("cl1", "Ahmed Mahmoud", "0501234567"),
            client("cl2", "United Brothers Co.", "0129876543"),
            client("cl3", "Fatima Ali", "0551112223"),
            client("cl4", "Peter Jones", "0555555555"),
        ],
        cases: vec![
            case("c1", "C123-456", "Supreme Court of California", "cl2", "United Brothers Co.", false),
            case("c2", "C789-012", "District Court of Appeals", "cl4", "Peter Jones", false),
            case("c3", "A555-111", "Old Municipal Court", "cl1", "Ahmed Mahmoud", true),
        ],
        sessions: vec![
            session("s1", "c1", now + Duration::days(3), "High Court of Appeal", "First Commercial Circuit", "1445/58", &["cl2"], &["cl1"]),
            session("s2", "c2", now + Duration::days(7), "District Court", "Third Criminal Circuit", "1444/102", &["cl3"], &[]),
            session("s3", "c2", now + Duration::minutes(45), "District Court", "Third Criminal Circuit", "1444/102", &[], &["cl4"]),
        ],
        tasks: vec![
            task("t1", "Draft memorandum for Case #C123-456", now + Duration::days(2), false, "c1"),
            task("t2", "File discovery documents", now + Duration::days(5), false, "c2"),
            task("t3", "Review client testimony", now - Duration::days(1), true, "c1"),
            task("t4", "Prepare hearing bundle", now + Duration::hours(20), false, "c2"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn store() -> CaseStore {
        CaseStore::demo(now())
    }

    #[tokio::test]
    async fn test_staff_sees_all_sessions_with_case_names() {
        let store = store();
        let admin = store.find_user_by_email("ADMIN@example.com").unwrap();
        let sessions = store.list_sessions(&admin).await.unwrap();

        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].case_name.as_deref(), Some("United Brothers Co. v. ..."));
        assert_eq!(sessions[1].case_name.as_deref(), Some("Fatima Ali v. ..."));
        // no plaintiffs: falls back to the court in reminders
        assert_eq!(sessions[2].case_name, None);
        assert_eq!(sessions[2].display_name(), "District Court");
    }

    #[tokio::test]
    async fn test_client_sees_own_sessions_and_no_tasks() {
        let store = store();
        let acme = store.find_user_by_email("acme@example.com").unwrap();

        let sessions = store.list_sessions(&acme).await.unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1"]);
        assert!(store.list_tasks(&acme).await.unwrap().is_empty());

        let unlinked = User::new("9", "Nobody", "nobody@example.com", UserRole::Client);
        assert!(store.list_sessions(&unlinked).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_staff_sees_all_tasks() {
        let store = store();
        let partner = store.find_user_by_email("partner@example.com").unwrap();
        assert_eq!(store.list_tasks(&partner).await.unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_user() {
        let err = store().find_user_by_email("ghost@example.com").unwrap_err();
        assert!(matches!(err, LexError::NotFound { entity: "user", .. }));
    }

    #[tokio::test]
    async fn test_save_open_and_reload() {
        let dir = std::env::temp_dir().join("lexdesk-test-store");
        std::fs::remove_dir_all(&dir).ok();
        let path = dir.join("data.json");
        store().save(&path).unwrap();

        let opened = CaseStore::open(&path).unwrap();
        assert_eq!(opened.snapshot(), store().snapshot());

        // Rewrite the file with one task removed; the next read picks it up.
        let mut data = opened.snapshot();
        data.tasks.pop();
        std::fs::write(&path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
        let file = std::fs::File::options().append(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + std::time::Duration::from_secs(5)).unwrap();

        let admin = opened.find_user_by_email("admin@example.com").unwrap();
        assert_eq!(opened.list_tasks(&admin).await.unwrap().len(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unreadable_file_is_provider_error() {
        let dir = std::env::temp_dir().join("lexdesk-test-store-broken");
        std::fs::remove_dir_all(&dir).ok();
        let path = dir.join("data.json");
        store().save(&path).unwrap();
        let opened = CaseStore::open(&path).unwrap();

        std::fs::write(&path, "{ not json").unwrap();
        let file = std::fs::File::options().append(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + std::time::Duration::from_secs(5)).unwrap();

        let admin = opened.find_user_by_email("admin@example.com").unwrap();
        let err = opened.list_sessions(&admin).await.unwrap_err();
        assert!(matches!(err, LexError::Provider(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_missing_file() {
        let path = std::env::temp_dir().join("lexdesk-test-missing").join("data.json");
        assert!(matches!(
            CaseStore::open(&path),
            Err(LexError::NotFound { entity: "data file", .. })
        ));
    }
}
