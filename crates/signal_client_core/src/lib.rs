pub mod domain;
pub mod pagination;
pub mod ports;
pub mod validation;

pub use domain::{
    BacktestDetail, BacktestPage, BacktestRecord, LoginGrant, PaginationInfo, ProfitDirection,
    RecordStatus, Session, SymbolEntry, UserDetails,
};
pub use pagination::{compute_window, validate_transition, PageTransition, DEFAULT_WINDOW_SIZE};
pub use ports::{
    HttpMethod, HttpTransport, PortError, PortResult, SessionStorage, TransportRequest,
    TransportResponse,
};
pub use validation::ValidationError;
