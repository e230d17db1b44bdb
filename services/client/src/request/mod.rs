pub mod classify;
pub mod envelope;
pub(crate) mod lenient;

pub use classify::{classify, Envelope};
pub use envelope::{ApiClient, RequestOptions};
