pub mod entry;
pub mod state;

pub use entry::MailEntry;
pub use state::{PollState, StatusSnapshot};
