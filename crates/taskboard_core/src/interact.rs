/// Source of optional free-text input, used only for first-run profile setup.
/// `None` models a declined prompt.
pub trait PromptSource {
    fn ask(&self, message: &str, default: &str) -> Option<String>;
}

/// Yes/no gate consulted before destructive operations (single-task delete,
/// clear-all). The store skips the mutation when the gate answers false.
pub trait ConfirmGate {
    fn ask(&self, message: &str) -> bool;
}

/// Gate that waves everything through. Used when the caller already has
/// consent (`--yes`, `assume_yes` in the config).
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn ask(&self, _message: &str) -> bool {
        true
    }
}
