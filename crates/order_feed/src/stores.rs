pub mod file_cursor_store;
pub mod in_memory_cursor_store;

pub use file_cursor_store::FileCursorStore;
pub use in_memory_cursor_store::InMemoryCursorStore;
