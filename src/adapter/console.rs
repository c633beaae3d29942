use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use snafu::prelude::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Error as IoError};

use crate::domain::entity::duration::TryNewPhaseDurationError;
use crate::domain::entity::settings::TryNewLongBreakIntervalError;
use crate::domain::entity::{LongBreakInterval, PhaseDuration, SettingsPatch};
use crate::domain::pomodoro::inbound::{AbandonOutcome, PauseOutcome, QueryResponse, StartOutcome};
use crate::domain::pomodoro::ApplicationCore;
use crate::tracing_report;

const HELP: &str = "\
Commands:
  start, resume        start a new cycle or resume the paused phase
  pause                pause the running phase
  abandon              give up the current cycle
  restart              restart the focus phase of the current cycle
  status               show the current phase and time left
  stats                show minutes focused today
  set <key> <value>    change a setting; keys: focus, short_break,
                       long_break (25, 90s, 1500ms, 10m), sessions,
                       auto_breaks, auto_pomodoros (on/off)
  help                 show this message
  quit                 leave";

/// A line oriented front end which reads commands from `input` and writes
/// replies to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
    core: Arc<ApplicationCore>,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new [`Console`].
    pub fn new(input: R, output: W, core: ApplicationCore) -> Self {
        Self {
            input,
            output,
            core: Arc::new(core),
        }
    }

    /// Handle commands until `quit` or the end of input.
    ///
    /// # Errors
    ///
    /// This function will return an error if reading input or writing a
    /// reply fails.
    pub async fn serve(&mut self) -> Result<(), ConsoleError> {
        self.write("Type `help` to list commands.").await?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self.input.read_line(&mut line).await.context(ReadSnafu)?;
            if read == 0 {
                tracing::debug!("Input closed");
                return Ok(());
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let reply = match line.parse::<ConsoleCommand>() {
                Ok(ConsoleCommand::Quit) => return Ok(()),
                Ok(command) => self.handle(command).await,
                Err(err) => {
                    tracing::debug!(%line, "Rejected input");
                    snafu::Report::from_error(err).to_string()
                }
            };
            self.write(&reply).await?;
        }
    }

    #[tracing::instrument(skip(self))]
    async fn handle(&self, command: ConsoleCommand) -> String {
        let core = &self.core;
        match command {
            ConsoleCommand::StartOrResume => match core.start_or_resume.start_or_resume().await {
                StartOutcome::Started => "Pomodoro session started!".to_owned(),
                StartOutcome::Resumed => "Timer resumed".to_owned(),
                StartOutcome::AlreadyRunning => "Timer is already running".to_owned(),
            },
            ConsoleCommand::Pause => match core.pause.pause().await {
                PauseOutcome::Paused => "Timer paused".to_owned(),
                PauseOutcome::NotRunning => "Timer is not running".to_owned(),
            },
            ConsoleCommand::Abandon => match core.abandon.abandon().await {
                AbandonOutcome::Abandoned => "Session abandoned".to_owned(),
                AbandonOutcome::NothingToAbandon => "Nothing to abandon".to_owned(),
            },
            ConsoleCommand::Restart => {
                core.restart.restart().await;
                "Session restarted".to_owned()
            }
            ConsoleCommand::Status => render_status(&core.query.query().await),
            ConsoleCommand::Stats => {
                let today = Local::now().date_naive();
                match core.stats.focus_minutes(today).await {
                    Ok(minutes) => format!("Focused {minutes} minutes today"),
                    Err(err) => {
                        tracing_report!(err, "Could not read statistics");
                        "Could not read statistics".to_owned()
                    }
                }
            }
            ConsoleCommand::Set(patch) => {
                core.update_settings.update_settings(patch).await;
                "Settings updated".to_owned()
            }
            ConsoleCommand::Help => HELP.to_owned(),
            ConsoleCommand::Quit => String::new(),
        }
    }

    async fn write(&mut self, reply: &str) -> Result<(), ConsoleError> {
        self.output
            .write_all(format!("{reply}\n").as_bytes())
            .await
            .context(WriteSnafu)?;
        self.output.flush().await.context(WriteSnafu)
    }
}

fn render_status(response: &QueryResponse) -> String {
    let paused = if response.paused { " (paused)" } else { "" };
    format!(
        "{}{paused} {} | sessions completed: {}",
        response.mode, response.clock, response.completed_sessions,
    )
}

/// Commands understood by the [`Console`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    StartOrResume,
    Pause,
    Abandon,
    Restart,
    Status,
    Stats,
    Set(SettingsPatch),
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(command) = words.next() else {
            return EmptySnafu.fail();
        };

        let res = match command.to_ascii_lowercase().as_str() {
            "start" | "resume" => Self::StartOrResume,
            "pause" => Self::Pause,
            "abandon" => Self::Abandon,
            "restart" => Self::Restart,
            "status" => Self::Status,
            "stats" => Self::Stats,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "set" => {
                let (Some(key), Some(value)) = (words.next(), words.next()) else {
                    return MissingArgumentSnafu { command: "set" }.fail();
                };
                Self::Set(parse_setting(key, value).context(SettingSnafu)?)
            }
            _ => return UnknownSnafu { command }.fail(),
        };

        ensure!(words.next().is_none(), TrailingSnafu { command });
        Ok(res)
    }
}

/// Build a patch changing a single setting.
///
/// # Errors
///
/// This function will return an error if the key is unknown or the value is
/// invalid for it.
pub fn parse_setting(key: &str, value: &str) -> Result<SettingsPatch, ParseSettingError> {
    let mut patch = SettingsPatch::default();
    match key {
        "focus" => patch.focus_duration = Some(parse_duration(value)?),
        "short_break" => patch.short_break_duration = Some(parse_duration(value)?),
        "long_break" => patch.long_break_duration = Some(parse_duration(value)?),
        "sessions" => {
            let sessions = parse_number(value)?;
            let sessions = u32::try_from(sessions)
                .ok()
                .context(OutOfRangeSnafu { value })?;
            patch.sessions_until_long_break =
                Some(LongBreakInterval::try_new(sessions).context(InvalidIntervalSnafu)?);
        }
        "auto_breaks" => patch.auto_start_breaks = Some(parse_flag(value)?),
        "auto_pomodoros" => patch.auto_start_pomodoros = Some(parse_flag(value)?),
        _ => return UnknownKeySnafu { key }.fail(),
    }
    Ok(patch)
}

/// A bare number counts minutes.
fn parse_duration(value: &str) -> Result<PhaseDuration, ParseSettingError> {
    let (digits, millis_per_unit) = if let Some(digits) = value.strip_suffix("ms") {
        (digits, 1)
    } else if let Some(digits) = value.strip_suffix('s') {
        (digits, 1_000)
    } else if let Some(digits) = value.strip_suffix('m') {
        (digits, 60_000)
    } else {
        (value, 60_000)
    };

    let millis = parse_number(digits)?
        .checked_mul(millis_per_unit)
        .context(OutOfRangeSnafu { value })?;
    PhaseDuration::try_from_millis(millis).context(InvalidDurationSnafu)
}

fn parse_number(value: &str) -> Result<u64, ParseSettingError> {
    value.parse().context(InvalidNumberSnafu { value })
}

fn parse_flag(value: &str) -> Result<bool, ParseSettingError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => InvalidFlagSnafu { value }.fail(),
    }
}

/// An error type for the [`Console`].
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ConsoleError {
    #[snafu(display("Could not read a command"))]
    Read { source: IoError },
    #[snafu(display("Could not write a reply"))]
    Write { source: IoError },
}

/// An error type for parsing a [`ConsoleCommand`].
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseCommandError {
    #[snafu(display("Empty command"))]
    Empty,
    #[snafu(display("Unknown command `{command}`, type `help` to list commands"))]
    Unknown { command: String },
    #[snafu(display("Command `{command}` needs more arguments"))]
    MissingArgument { command: String },
    #[snafu(display("Too many arguments for `{command}`"))]
    Trailing { command: String },
    #[snafu(display("Could not change setting"))]
    Setting { source: ParseSettingError },
}

/// An error type for parsing a single setting.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseSettingError {
    #[snafu(display("Unknown setting `{key}`"))]
    UnknownKey { key: String },
    #[snafu(display("`{value}` is not a number"))]
    InvalidNumber { value: String, source: ParseIntError },
    #[snafu(display("`{value}` is out of range"))]
    OutOfRange { value: String },
    #[snafu(display("`{value}` is neither on nor off"))]
    InvalidFlag { value: String },
    #[snafu(display("Invalid duration"))]
    InvalidDuration { source: TryNewPhaseDurationError },
    #[snafu(display("Invalid number of sessions"))]
    InvalidInterval { source: TryNewLongBreakIntervalError },
}
