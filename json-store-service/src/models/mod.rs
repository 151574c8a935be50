pub mod document;

pub use document::{merge, namespace, Document, NAMESPACES};
