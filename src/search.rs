pub mod debouncer;
pub mod query;
pub mod session;

pub use debouncer::Debouncer;
pub use query::SearchQuery;
pub use session::{SearchSession, SessionChange};
