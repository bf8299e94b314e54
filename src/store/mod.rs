pub mod json_store;
pub mod progress_store;

pub use json_store::JsonStore;
pub use progress_store::ProgressStore;
