pub mod kv_store;
pub mod memory_store;
pub mod redis_store;
pub mod safe_store;

pub use kv_store::*;
pub use memory_store::*;
pub use redis_store::*;
pub use safe_store::*;
