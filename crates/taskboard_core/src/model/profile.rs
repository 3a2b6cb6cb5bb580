use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "John Doe";
pub const DEFAULT_POSITION: &str = "Software Developer";

/// The single user-identity record shown in the UI chrome. Created at most
/// once per persisted-storage lifetime, then loaded unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub position: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            position: DEFAULT_POSITION.to_string(),
        }
    }
}
