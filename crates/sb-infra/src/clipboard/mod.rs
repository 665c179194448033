pub mod entry_store;
pub mod history_cache;

pub use entry_store::DieselEntryStore;
pub use history_cache::CachedEntryStore;
