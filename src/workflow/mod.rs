pub mod config;
pub mod conversion;
pub mod definition;
pub mod kinds;

pub use config::NodeConfig;
pub use conversion::*;
pub use definition::*;
pub use kinds::*;
