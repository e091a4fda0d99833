// Handler modules
pub mod analyze;
pub mod config;
pub mod fix;
pub mod health;
pub mod rules;
pub mod validate;

// Re-export all handler functions
pub use analyze::handle_analyze;
pub use config::handle_config;
pub use fix::handle_fix;
pub use health::handle_health;
pub use rules::handle_rules;
pub use validate::{ValidateOptions, handle_validate};
