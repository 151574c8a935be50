pub mod documents;
pub mod memory;
pub mod metrics;
pub mod postgres;
pub mod redis;
pub mod store;

pub use documents::DocumentService;
pub use memory::MemoryStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use postgres::PostgresStore;
pub use self::redis::RedisStore;
pub use store::{DocumentStore, StoreError};
