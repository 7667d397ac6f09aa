//! Line-oriented form session
//!
//! Reads commands such as `set weight 72.5` or `submit` and drives a
//! [`FormController`], printing the form or results after each step.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::client::RecommendationClient;
use crate::controller::{FormController, Phase};
use crate::error::{FitPlanError, FieldError};
use crate::export::{export_plan, ExportFormat};
use crate::injury::{zone_options, zone_prompt, InjuryCategory, InjuryType};
use crate::profile::{Choice, ProfileField};
use crate::render;

pub const HELP: &str = "\
Commands:
  set <field> <value>      update a field (name, age, sex, weight, height, level,
                           goal, frequency, equipment, injury, zone)
  zones                    list the zones allowed for the current injury type
  show                     print the form, or the plan when one is shown
  submit                   request a plan
  reset                    leave the plan and return to the form
  export <file> [format]   save the shown plan (json, text, csv)
  help                     show this help
  quit                     leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { field: ProfileField, value: String },
    Zones,
    Show,
    Submit,
    Reset,
    Export { path: PathBuf, format: Option<String> },
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for the list")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).ok_or(
                    CommandError::MissingArgument {
                        command: "set",
                        argument: "a field and a value",
                    },
                )?;
                Command::Set {
                    field: field.parse()?,
                    value: value.trim().to_string(),
                }
            }
            "zones" => Command::Zones,
            "show" => Command::Show,
            "submit" => Command::Submit,
            "reset" | "back" => Command::Reset,
            "export" => {
                let mut parts = rest.split_whitespace();
                let path = parts.next().ok_or(CommandError::MissingArgument {
                    command: "export",
                    argument: "a file path",
                })?;
                Command::Export {
                    path: PathBuf::from(path),
                    format: parts.next().map(str::to_string),
                }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Spinner shown while a request is in flight
pub fn submit_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Generating your plan...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Text listing the zone choices for `injury_type`
pub fn describe_zones(injury_type: InjuryType) -> String {
    if injury_type.category() == InjuryCategory::None {
        return "No injury selected, the zone stays 'none'.".to_string();
    }
    let names = zone_options(injury_type)
        .iter()
        .map(|zone| zone.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} for {}: {}", zone_prompt(injury_type), injury_type.label(), names)
}

/// Whether the session keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Execute one command, writing its output to `out`
pub async fn execute<C, W>(
    command: Command,
    controller: &mut FormController,
    client: &C,
    out: &mut W,
) -> std::io::Result<Flow>
where
    C: RecommendationClient + ?Sized,
    W: Write,
{
    match command {
        Command::Set { field, value } => {
            if let Err(e) = controller.apply_text(field, &value) {
                writeln!(out, "{}", e.user_message())?;
            } else if matches!(controller.phase(), Phase::Submitting) {
                writeln!(out, "Queued {} until the current request finishes", field)?;
            }
        }
        Command::Zones => {
            writeln!(out, "{}", describe_zones(controller.profile().injury.kind()))?;
        }
        Command::Show => write_current_view(controller, out)?,
        Command::Submit => {
            let spinner = submit_spinner();
            let result = controller.submit(client).await;
            spinner.finish_and_clear();
            match result {
                Ok(_) => write_current_view(controller, out)?,
                Err(e) => writeln!(out, "{}", e.user_message())?,
            }
        }
        Command::Reset => match controller.reset() {
            Ok(()) => write_current_view(controller, out)?,
            Err(e) => writeln!(out, "{}", e.user_message())?,
        },
        Command::Export { path, format } => {
            match export_shown(controller, &path, format.as_deref()) {
                Ok(format) => writeln!(out, "Saved {} plan to {}", format, path.display())?,
                Err(e) => writeln!(out, "{}", e.user_message())?,
            }
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn export_shown(
    controller: &FormController,
    path: &std::path::Path,
    format: Option<&str>,
) -> Result<ExportFormat, FitPlanError> {
    let shown = controller.shown_plan().ok_or_else(|| FitPlanError::Phase {
        phase: controller.phase().name().to_string(),
        action: "export without a plan on screen".to_string(),
    })?;
    let format = ExportFormat::resolve(format, path)?;
    export_plan(shown, format, path)?;
    Ok(format)
}

fn write_current_view<W: Write>(controller: &FormController, out: &mut W) -> std::io::Result<()> {
    match controller.shown_plan() {
        Some(shown) => write!(out, "{}", render::render_results(shown)),
        None => write!(out, "{}", render::render_form(controller)),
    }
}

/// Run commands from `input` until `quit` or end of input
pub async fn run<R, W, C>(
    controller: &mut FormController,
    client: &C,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    C: RecommendationClient + ?Sized,
{
    info!(session = %controller.session_id(), "Interactive session started");
    writeln!(out, "{}", HELP)?;
    write_current_view(controller, out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        debug!(?command, "Executing command");
        if execute(command, controller, client, out).await? == Flow::Quit {
            break;
        }
    }

    info!(
        session = %controller.session_id(),
        revision = controller.revision(),
        "Interactive session ended"
    );
    Ok(())
}
