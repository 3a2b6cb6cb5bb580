use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskboard add "Buy milk" --priority low
    Add {
        text: Option<String>,
        #[arg(short, long, value_name = "low|medium|high")]
        priority: Option<String>,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: taskboard toggle 1734652800000
    Toggle {
        id: i64,
    },
    /// Delete a task (asks for confirmation)
    ///
    /// Example: taskboard delete 1734652800000
    Delete {
        id: i64,
    },
    /// Delete all tasks (asks for confirmation)
    ///
    /// Example: taskboard clear --yes
    Clear,
    /// List tasks
    ///
    /// Example: taskboard list pending
    /// Example: taskboard list completed
    List {
        #[command(subcommand)]
        list: ListCommand,
    },
    /// Show the user profile, creating it on first run
    ///
    /// Example: taskboard profile
    Profile,
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// List tasks that are still open
    Pending,
    /// List completed tasks
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    AssumeYes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field = canonicalize_flag_name(key_raw)
        .ok_or_else(|| "override key cannot be empty".to_string())?;

    match canonical_field.as_str() {
        "theme" => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::Theme,
            value,
        }),
        "assume_yes" | "yes" => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::AssumeYes,
            value,
        }),
        other => Err(format!("unknown config field '{other}'")),
    }
}

/// Accepts the usual spellings of a boolean override value.
pub fn parse_override_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => Err(format!("'{other}' is not a boolean value")),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverrideTarget, parse_config_override, parse_override_bool};

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Midnight ").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Midnight");
    }

    #[test]
    fn parse_config_override_accepts_assume_yes_spellings() {
        let parsed = parse_config_override("assume-yes=true").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::AssumeYes);

        let parsed = parse_config_override("yes=1").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::AssumeYes);
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("theme").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_unknown_field() {
        let err = parse_config_override("palette=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_override_bool_accepts_common_spellings() {
        assert_eq!(parse_override_bool("yes"), Ok(true));
        assert_eq!(parse_override_bool("OFF"), Ok(false));
        assert!(parse_override_bool("maybe").is_err());
    }
}
