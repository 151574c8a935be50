pub mod envelope;
pub mod shape;

pub use envelope::{Envelope, EnvelopeStatus, ServerResponse, StoreResponse};
pub use shape::ResponseShape;
