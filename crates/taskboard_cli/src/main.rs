use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, Write};
use tabled::{Table, Tabled};
use taskboard_cli::cli::{
    Cli, Command, ConfigOverrideTarget, ListCommand, parse_config_override, parse_override_bool,
};
use taskboard_core::clock::{Clock, SystemClock};
use taskboard_core::config::{
    Config, ConfigOverrides, Palette, load_config_with_fallback, merge_overrides, palette_for_theme,
};
use taskboard_core::error::StoreError;
use taskboard_core::interact::{AutoConfirm, ConfirmGate, PromptSource};
use taskboard_core::model::{Profile, Task};
use taskboard_core::profile_store::ProfileStore;
use taskboard_core::storage::FileKvStore;
use taskboard_core::task_store::{TaskStore, task_overdue};

/// Prompt collaborator backed by the terminal. EOF and read failures count
/// as a declined prompt.
struct StdinPrompt;

impl PromptSource for StdinPrompt {
    fn ask(&self, message: &str, default: &str) -> Option<String> {
        print!("{message} [{default}] ");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            // Closed stdin gives no echoed newline, so emit one ourselves.
            Ok(0) | Err(_) => {
                println!();
                None
            }
            Ok(_) => {
                let answer = line.trim();
                if answer.is_empty() {
                    None
                } else {
                    Some(answer.to_string())
                }
            }
        }
    }
}

/// Confirmation gate backed by the terminal. Anything but an explicit yes
/// declines.
struct StdinConfirm;

impl ConfirmGate for StdinConfirm {
    fn ask(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Created")]
    date: String,
    #[tabled(rename = "Overdue")]
    overdue: &'static str,
}

fn open_task_store() -> Result<TaskStore<FileKvStore, SystemClock>, StoreError> {
    Ok(TaskStore::open(FileKvStore::open_default()?, SystemClock))
}

fn open_profile_store() -> Result<ProfileStore<FileKvStore>, StoreError> {
    Ok(ProfileStore::new(FileKvStore::open_default()?))
}

/// Loads the profile, running the one-time prompt setup if none exists yet.
fn ensure_profile() -> Result<Profile, StoreError> {
    let store = open_profile_store()?;
    match store.load()? {
        Some(profile) => Ok(profile),
        None => store.initialize_from_prompt(&StdinPrompt),
    }
}

fn print_tasks_plain(tasks: &[Task], empty_message: &str, palette: &Palette) {
    if tasks.is_empty() {
        println!("{}", palette.mutedize(empty_message));
        return;
    }

    let now = SystemClock.now();
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            id: task.id,
            text: task.text.clone(),
            priority: task.priority.label(),
            date: task.date.clone(),
            overdue: if task_overdue(task, now) { "yes" } else { "-" },
        })
        .collect();

    println!("{}", Table::new(rows));

    let overdue_count = tasks
        .iter()
        .filter(|task| task_overdue(task, now))
        .count();
    if overdue_count > 0 {
        println!(
            "{}",
            palette.warnize(&format!("{overdue_count} task(s) overdue"))
        );
    }
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), StoreError> {
    let now = SystemClock.now();
    let mut payload = Vec::with_capacity(tasks.len());
    for task in tasks {
        let mut value = serde_json::to_value(task)
            .map_err(|err| StoreError::corrupt_data(err.to_string()))?;
        value["overdue"] = serde_json::Value::Bool(task_overdue(task, now));
        payload.push(value);
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), StoreError> {
    let value =
        serde_json::to_value(task).map_err(|err| StoreError::corrupt_data(err.to_string()))?;
    println!("{value}");
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> StoreError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    StoreError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, StoreError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(StoreError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn overrides_from_cli(raw: &[String]) -> Result<ConfigOverrides, StoreError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(StoreError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::AssumeYes => {
                overrides.assume_yes =
                    Some(parse_override_bool(&parsed.value).map_err(StoreError::invalid_input)?);
            }
        }
    }
    Ok(overrides)
}

fn effective_config(cli: &Cli, base: &Config) -> Result<Config, StoreError> {
    let overrides = overrides_from_cli(&cli.config_override)?;
    Ok(merge_overrides(base, &overrides))
}

fn run_command(cli: Cli, base_config: &Config) -> Result<(), StoreError> {
    let config = effective_config(&cli, base_config)?;
    let palette = palette_for_theme(config.theme.as_deref());
    let gate: &dyn ConfirmGate = if cli.yes || config.assume_yes {
        &AutoConfirm
    } else {
        &StdinConfirm
    };

    match cli.command {
        Command::Add { text, priority } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(StoreError::invalid_input("task text is required")),
            };
            let priority = match priority {
                Some(value) => value,
                None => return Err(StoreError::invalid_input("--priority is required")),
            };

            let mut store = open_task_store()?;
            let task = store.create(&text, &priority)?.ok_or_else(|| {
                StoreError::invalid_input("priority must be one of low, medium, high")
            })?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!(
                    "Added task: {} ({})",
                    palette.accentize(&task.text),
                    task.id
                );
            }
        }
        Command::Toggle { id } => {
            let mut store = open_task_store()?;
            match store.toggle_completion(id)? {
                Some(task) if cli.json => print_task_json(&task)?,
                Some(task) if task.completed => {
                    println!("Completed task: {} ({})", task.text, task.id);
                }
                Some(task) => {
                    println!("Reopened task: {} ({})", task.text, task.id);
                }
                None => println!("No task with id {id}; nothing changed"),
            }
        }
        Command::Delete { id } => {
            let mut store = open_task_store()?;
            if store.delete(id, gate)? {
                println!("Deleted task {id}");
            } else {
                println!("Nothing deleted");
            }
        }
        Command::Clear => {
            let mut store = open_task_store()?;
            if store.clear_all(gate)? {
                println!("All tasks deleted");
            } else {
                println!("Nothing deleted");
            }
        }
        Command::List { list } => {
            let store = open_task_store()?;
            match list {
                ListCommand::Pending => {
                    let tasks = store.list_pending();
                    if cli.json {
                        print_tasks_json(&tasks)?;
                    } else {
                        print_tasks_plain(&tasks, "No tasks yet. Add your first task!", &palette);
                    }
                }
                ListCommand::Completed => {
                    let tasks = store.list_completed();
                    if cli.json {
                        print_tasks_json(&tasks)?;
                    } else {
                        print_tasks_plain(&tasks, "No completed tasks yet.", &palette);
                    }
                }
            }
        }
        Command::Profile => {
            let profile = ensure_profile()?;
            if cli.json {
                let value = serde_json::to_value(&profile)
                    .map_err(|err| StoreError::corrupt_data(err.to_string()))?;
                println!("{value}");
            } else {
                println!(
                    "{} ({})",
                    palette.accentize(&profile.name),
                    palette.mutedize(&profile.position)
                );
            }
        }
    }

    Ok(())
}

fn run_interactive(base_config: &Config) -> Result<(), StoreError> {
    let palette = palette_for_theme(base_config.theme.as_deref());

    // First run asks for the profile before anything else happens.
    let profile = ensure_profile()?;
    println!(
        "Hi {} ({})",
        palette.accentize(&profile.name),
        palette.mutedize(&profile.position)
    );

    let mut input = String::new();
    let stdin = io::stdin();

    loop {
        input.clear();
        // Lock per line: dispatched commands may read stdin themselves
        // (confirmation gates).
        let bytes = stdin
            .lock()
            .read_line(&mut input)
            .map_err(|err| StoreError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskboard".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, base_config) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let config_load = load_config_with_fallback();
    if let Some(err) = config_load.error.as_ref() {
        eprintln!("WARNING: {}", err);
    }

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&config_load.config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
        // --help / --version render through clap directly.
        Err(err) => {
            print!("{err}");
            return;
        }
    };

    if let Err(err) = run_command(cli, &config_load.config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
