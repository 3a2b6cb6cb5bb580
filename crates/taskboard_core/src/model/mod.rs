mod profile;
mod task;

pub use profile::{DEFAULT_NAME, DEFAULT_POSITION, Profile};
pub use task::{Priority, Task};
