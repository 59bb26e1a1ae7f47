pub mod exchange_registry;
pub mod history_service;
pub mod input_sanitizer;
pub mod leverage_calculator;

pub use exchange_registry::*;
pub use history_service::*;
pub use input_sanitizer::*;
pub use leverage_calculator::*;
