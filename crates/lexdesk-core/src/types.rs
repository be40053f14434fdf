//! Domain types shared by the engine and the data providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of the person viewing the office data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Office owner.
    Admin,
    Partner,
    Secretary,
    /// External client; only sees their own cases and never gets reminders.
    Client,
}

impl UserRole {
    /// Whether this role receives session and task reminders.
    pub fn receives_reminders(&self) -> bool {
        !matches!(self, UserRole::Client)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Partner => write!(f, "partner"),
            UserRole::Secretary => write!(f, "secretary"),
            UserRole::Client => write!(f, "client"),
        }
    }
}

/// Access level of a secretary account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretaryPermissions {
    Read,
    Full,
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<SecretaryPermissions>,
    /// Client record this account belongs to (client role only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_client_id: Option<String>,
}

impl User {
    pub fn new(id: &str, name: &str, email: &str, role: UserRole) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            permissions: None,
            linked_client_id: None,
        }
    }
}

/// A client of the office (plaintiff or defendant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
}

/// A case file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub case_number: String,
    pub court_name: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub is_archived: bool,
}

/// A scheduled court appearance tied to a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub case_id: String,
    pub date_time: DateTime<Utc>,
    /// Display name derived by the data provider from the plaintiffs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    pub court_name: String,
    #[serde(default)]
    pub court_division: String,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub notes: String,
    /// Client IDs.
    #[serde(default)]
    pub plaintiffs: Vec<String>,
    /// Client IDs.
    #[serde(default)]
    pub defendants: Vec<String>,
}

impl Session {
    /// Name used in reminders: the case name, falling back to the court.
    pub fn display_name(&self) -> &str {
        match self.case_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.court_name,
        }
    }
}

/// A to-do item with a deadline, tied to a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub is_done: bool,
    pub case_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(case_name: Option<&str>) -> Session {
        Session {
            id: "s1".into(),
            case_id: "c1".into(),
            date_time: Utc::now(),
            case_name: case_name.map(str::to_string),
            court_name: "District Court".into(),
            court_division: String::new(),
            case_number: String::new(),
            notes: String::new(),
            plaintiffs: vec![],
            defendants: vec![],
        }
    }

    #[test]
    fn test_display_name_prefers_case_name() {
        assert_eq!(session(Some("Smith v. ...")).display_name(), "Smith v. ...");
        assert_eq!(session(None).display_name(), "District Court");
        assert_eq!(session(Some("")).display_name(), "District Court");
    }

    #[test]
    fn test_only_clients_skip_reminders() {
        assert!(UserRole::Admin.receives_reminders());
        assert!(UserRole::Partner.receives_reminders());
        assert!(UserRole::Secretary.receives_reminders());
        assert!(!UserRole::Client.receives_reminders());
    }

    #[test]
    fn test_user_roundtrip_lowercase_role() {
        let json = r#"{"id":"3","name":"Ahmed","email":"ahmed@client.com","role":"client","linked_client_id":"cl1"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Client);
        assert_eq!(user.linked_client_id.as_deref(), Some("cl1"));
        assert!(user.permissions.is_none());
    }
}
