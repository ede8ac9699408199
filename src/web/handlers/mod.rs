pub mod score_handlers;
pub mod system_handlers;

pub use score_handlers::*;
pub use system_handlers::*;
