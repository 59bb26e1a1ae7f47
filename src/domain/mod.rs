pub mod calculation;
pub mod exchange;
pub mod history;
pub mod numeric;
pub mod position;

pub use calculation::*;
pub use exchange::*;
pub use history::*;
pub use position::*;
