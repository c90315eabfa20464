pub mod config;
pub mod input;
pub mod report;
pub mod session;

pub use config::SessionConfig;
pub use input::{parse_integer, parse_natural, verify_ceiling};
pub use report::{session_report, SessionReport};
pub use session::Session;
