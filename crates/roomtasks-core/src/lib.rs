//! # Roomtasks Core Library
//!
//! Core logic for a chat bot that shows Google Tasks lists inside chat
//! rooms. The `roomtasks` CLI drives the same code from a terminal.
//!
//! ## Architecture
//!
//! - **Task model**: records, the per-list tree and its dual markup/text
//!   rendering with urgency markers
//! - **Loader**: turns backend items into trees
//! - **Integrations**: the [`TaskBackend`] seam and its Google Tasks client
//! - **Module**: chat command dispatch and the per-room numbering snapshot
//! - **Digest**: the weekday morning summary for every room
//! - **Storage**: TOML configuration including room associations
//!
//! ## Key Components
//!
//! - [`TaskTree`]: parent/child assembly of one task list
//! - [`TasksModule`]: command entry point
//! - [`RoomIndex`]: resolves `show <n>` against the last listing
//! - [`Config`]: application configuration

pub mod digest;
pub mod error;
pub mod integrations;
pub mod loader;
pub mod module;
pub mod room_index;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, Result};
pub use integrations::{GoogleTasksClient, NewTask, RawTask, TaskBackend, TaskListInfo, TaskUpdate};
pub use module::{Command, Listing, Reply, Response, Sender, TasksModule};
pub use room_index::RoomIndex;
pub use storage::{Config, DigestConfig, GoogleConfig, RoomSettings};
pub use task::{NodeId, Rendered, TaskLink, TaskRecord, TaskTree, Urgency};
