pub mod google_tasks;
pub mod traits;

pub use google_tasks::{GoogleTasksClient, DEFAULT_API_BASE};
pub use traits::{NewTask, RawLink, RawTask, TaskBackend, TaskListInfo, TaskUpdate};
