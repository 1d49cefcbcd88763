use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::activity::ActivityLogger;
use crate::config::{AppConfig, ConfigManager};
use crate::core::{FinanceTracker, SystemClock};
use crate::errors::FinanceError;
use crate::persistence::{AutosaveEvent, JsonFileStore};

use super::commands;
use super::output;
use super::registry::CommandRegistry;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {usage}"))
    }
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: FinanceTracker,
    pub config: AppConfig,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = JsonFileStore::new(config_manager.data_dir(&config))?;
        let tracker = FinanceTracker::open(
            Box::new(store),
            &config,
            Box::new(SystemClock),
            ActivityLogger::tracing(),
        )?;
        for warning in tracker.load_warnings() {
            output::warning(warning);
        }

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            tracker,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        let marker = if self.tracker.has_unsaved_changes() {
            "*"
        } else {
            ""
        };
        format!("finwell [{}]{marker} > ", self.tracker.group())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let result = match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        };
        self.pump();
        result
    }

    /// Lets the autosave controller write if its quiet period has elapsed.
    pub(crate) fn pump(&mut self) {
        if let Some(event) = self.tracker.pump() {
            report_autosave(&event);
        }
    }

    /// Writes anything pending; called when the shell exits.
    pub(crate) fn shutdown(&mut self) {
        if let Some(event) = self.tracker.flush() {
            report_autosave(&event);
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    /// Asks before a destructive action. Scripts are never prompted.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(core) if core.is_user_facing() => output::error(core),
            other => {
                tracing::error!(error = %other, "command failed");
                output::error(other);
            }
        }
    }
}

fn report_autosave(event: &AutosaveEvent) {
    match event {
        AutosaveEvent::Saved { .. } => output::success("Changes saved."),
        AutosaveEvent::Failed { warning } => output::warning(warning),
    }
}
