pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod result;
pub mod validation;

pub use config::AppConfig;
pub use error::TaskboardError;
pub use input::TextInput;
pub use logging::{init_logging, LogTarget};
pub use result::TaskboardResult;
pub use validation::{normalize_name, word_count, FieldErrors, FormField};
