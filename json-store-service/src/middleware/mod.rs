pub mod access;

pub use access::{access_middleware, AccessPolicy, RequestOrigin};
