use crate::error::StoreError;
use crate::interact::PromptSource;
use crate::model::{DEFAULT_NAME, DEFAULT_POSITION, Profile};
use crate::storage::{KeyValueStore, PROFILE_KEY};

const NAME_PROMPT: &str = "Enter your name:";
const POSITION_PROMPT: &str = "Enter your position:";

/// Provides exactly one profile per persisted-storage lifetime. The only
/// transition is Unset -> Set, driven by [`ProfileStore::initialize_from_prompt`].
pub struct ProfileStore<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> ProfileStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Reads the persisted profile. Absent and corrupt snapshots both
    /// signal absence.
    pub fn load(&self) -> Result<Option<Profile>, StoreError> {
        let Some(raw) = self.kv.get(PROFILE_KEY)? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// First-run setup: asks for name then position, falling back to the
    /// literal defaults when a prompt is declined or answered blank.
    /// Persists the resulting profile before returning it.
    pub fn initialize_from_prompt(
        &self,
        prompts: &dyn PromptSource,
    ) -> Result<Profile, StoreError> {
        let name = answer_or_default(prompts.ask(NAME_PROMPT, DEFAULT_NAME), DEFAULT_NAME);
        let position = answer_or_default(
            prompts.ask(POSITION_PROMPT, DEFAULT_POSITION),
            DEFAULT_POSITION,
        );

        let profile = Profile { name, position };
        let snapshot = serde_json::to_string(&profile)
            .map_err(|err| StoreError::corrupt_data(err.to_string()))?;
        self.kv.set(PROFILE_KEY, &snapshot)?;

        Ok(profile)
    }
}

fn answer_or_default(answer: Option<String>, default: &str) -> String {
    match answer {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}
