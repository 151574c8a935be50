pub mod documents;
pub mod health;
pub mod metrics;

pub use documents::{
    clear_document, create_document, method_not_allowed, read_document, update_document,
};
pub use health::health_check;
