pub mod adapters;
pub mod config;
pub mod error;
pub mod request;
pub mod resources;
pub mod session;

pub use error::{ClientError, ClientResult, ErrorKind};
pub use request::{ApiClient, Envelope, RequestOptions};
pub use resources::{RecordQuery, Watchlist};
pub use session::SessionStore;
