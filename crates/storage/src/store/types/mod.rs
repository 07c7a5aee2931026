#![forbid(unsafe_code)]

mod engagements;
mod events;
mod preferences;
mod suppliers;
mod tasks;
mod users;
mod venues;

pub use engagements::*;
pub use events::*;
pub use preferences::*;
pub use suppliers::*;
pub use tasks::*;
pub use users::*;
pub use venues::*;
