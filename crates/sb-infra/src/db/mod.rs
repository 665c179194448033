pub mod executor;
pub mod models;
pub mod pool;
pub mod schema;

pub use executor::{DbExecutor, DieselSqliteExecutor};
