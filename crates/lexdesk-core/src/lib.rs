//! # LexDesk Core
//!
//! Shared building blocks for the LexDesk reminder engine:
//! domain types (users, cases, sessions, tasks), the data-provider and clock
//! traits the engine consumes, configuration and the common error type.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{LexDeskConfig, Locale, NotificationSettings};
pub use error::{LexError, Result};
pub use traits::{CaseDataProvider, Clock, FixedClock, SystemClock};
pub use types::{Case, Client, SecretaryPermissions, Session, Task, User, UserRole};
