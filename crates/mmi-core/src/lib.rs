pub mod collection;
pub mod document;
pub mod error;
pub mod manager;
pub mod mapping;
pub mod memory;
pub mod store;
pub mod task;

// Re-exports
pub use collection::{Collection, CollectionError};
pub use document::{Document, Filter, Sort, SortDirection, Update};
pub use error::{Error, Result};
pub use manager::TaskManager;
pub use memory::MemoryCollection;
pub use store::TaskStore;
pub use task::{parse_due_date, NewTask, Priority, Status, Task, TaskUpdate, DATE_FORMAT};
