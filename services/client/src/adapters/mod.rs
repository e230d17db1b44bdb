pub mod file_storage;
pub mod http;
pub mod memory_storage;

pub use file_storage::FileSessionStorage;
pub use http::ReqwestTransport;
pub use memory_storage::MemorySessionStorage;
