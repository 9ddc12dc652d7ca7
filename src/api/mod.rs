//! Typed CRM API surfaces.
//!
//! Each surface is a thin set of named calls with a fixed path, method and
//! body. All behavior (identity, envelopes, errors) lives in the gateway.

pub mod journal;
pub mod stats;
pub mod tasks;
pub mod users;

pub use journal::{JournalApi, JournalEntry, NewJournalEntry};
pub use stats::{DashboardStats, StatsApi};
pub use tasks::{NewTask, Task, TasksApi};
pub use users::{User, UsersApi};
