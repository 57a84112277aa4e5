pub mod context;
pub mod error;

pub use context::{AppContext, CycleSummary, RESUME_NOTICE};
pub use error::{MailvaneError, Result};
