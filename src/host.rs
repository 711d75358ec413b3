//! Line-oriented host commands for the headless adapter.
//!
//! Each stdin line stands for one host callback or popup action, e.g.
//! `start 128`, `progress 64`, `toggle new-best`, `percent 80`.

use std::time::Duration;

use crate::session::{LifecycleListener, SessionContext};
use crate::HostSettings;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Start(i32),
    End,
    Progress(i32),
    Complete(i32),
    Save,
    /// Advance the host clock without waiting.
    Tick(Duration),
    ToggleNewBest,
    ToggleComplete,
    /// Raw text of the percent box; may be empty.
    Percent(String),
    Show,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("{command}: expected {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

fn int_arg(command: &'static str, arg: Option<&str>) -> Result<i32, ParseError> {
    arg.and_then(|a| a.parse().ok()).ok_or(ParseError::BadArgument {
        command,
        expected: "an integer",
    })
}

impl HostCommand {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Option<Result<Self, ParseError>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = Some(rest).filter(|r| !r.is_empty());

        let command = match word {
            "start" => int_arg("start", arg).map(HostCommand::Start),
            "end" => Ok(HostCommand::End),
            "progress" => int_arg("progress", arg).map(HostCommand::Progress),
            "complete" => int_arg("complete", arg).map(HostCommand::Complete),
            "save" => Ok(HostCommand::Save),
            "tick" => arg
                .and_then(|a| a.parse::<f32>().ok())
                .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
                .map(HostCommand::Tick)
                .ok_or(ParseError::BadArgument {
                    command: "tick",
                    expected: "a non-negative number of seconds",
                }),
            "toggle" => match arg {
                Some("new-best") => Ok(HostCommand::ToggleNewBest),
                Some("complete") => Ok(HostCommand::ToggleComplete),
                _ => Err(ParseError::BadArgument {
                    command: "toggle",
                    expected: "new-best or complete",
                }),
            },
            "percent" => Ok(HostCommand::Percent(rest.to_owned())),
            "show" => Ok(HostCommand::Show),
            "quit" | "exit" => Ok(HostCommand::Quit),
            other => Err(ParseError::Unknown(other.to_owned())),
        };
        Some(command)
    }
}

/// Applies a command to the session. Returns `false` on `Quit`.
///
/// `Tick` is not handled here because the clock belongs to the caller.
pub fn apply<S: HostSettings>(ctx: &mut SessionContext<S>, command: &HostCommand) -> bool {
    match command {
        HostCommand::Start(id) => ctx.on_session_start(*id),
        HostCommand::End => ctx.on_session_end(),
        HostCommand::Progress(percent) => ctx.on_progress(*percent),
        HostCommand::Complete(percent) => ctx.on_complete(*percent),
        HostCommand::Save => ctx.on_save(),
        HostCommand::Tick(_) => {}
        HostCommand::ToggleNewBest => report(ctx.toggle_new_best(), "new best"),
        HostCommand::ToggleComplete => report(ctx.toggle_complete(), "complete"),
        HostCommand::Percent(text) => match ctx.set_percent_from_input(text) {
            Some(percent) => log::info!("host: threshold now {percent}%"),
            None => log::warn!("host: no level is active"),
        },
        HostCommand::Show => show(ctx),
        HostCommand::Quit => return false,
    }
    true
}

fn report(value: Option<bool>, what: &str) {
    match value {
        Some(on) => log::info!("host: screenshot on {what} {}", if on { "on" } else { "off" }),
        None => log::warn!("host: no level is active"),
    }
}

fn show<S: HostSettings>(ctx: &SessionContext<S>) {
    match ctx.active() {
        Some(active) => log::info!("host: active {active:?}"),
        None => log::info!("host: no active level"),
    }
    log::info!(
        "host: {} stored overrides, defaults {:?}",
        ctx.store().len(),
        ctx.settings().defaults()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<HostCommand, ParseError> {
        HostCommand::parse(line).expect("line should produce a command")
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(HostCommand::parse(""), None);
        assert_eq!(HostCommand::parse("   "), None);
        assert_eq!(HostCommand::parse("# level 7 run"), None);
    }

    #[test]
    fn lifecycle_commands_parse() {
        assert_eq!(parse("start 128"), Ok(HostCommand::Start(128)));
        assert_eq!(parse("  progress   64 "), Ok(HostCommand::Progress(64)));
        assert_eq!(parse("complete 100"), Ok(HostCommand::Complete(100)));
        assert_eq!(parse("end"), Ok(HostCommand::End));
        assert_eq!(parse("save"), Ok(HostCommand::Save));
        assert_eq!(parse("exit"), Ok(HostCommand::Quit));
    }

    #[test]
    fn tick_takes_seconds() {
        assert_eq!(
            parse("tick 0.25"),
            Ok(HostCommand::Tick(Duration::from_millis(250)))
        );
        assert!(parse("tick -1").is_err());
        assert!(parse("tick 1e30").is_err());
        assert!(parse("tick nan").is_err());
        assert!(parse("tick").is_err());
    }

    #[test]
    fn percent_keeps_raw_text() {
        assert_eq!(parse("percent"), Ok(HostCommand::Percent(String::new())));
        assert_eq!(parse("percent 8x"), Ok(HostCommand::Percent("8x".into())));
    }

    #[test]
    fn toggle_needs_a_known_target() {
        assert_eq!(parse("toggle new-best"), Ok(HostCommand::ToggleNewBest));
        assert_eq!(parse("toggle complete"), Ok(HostCommand::ToggleComplete));
        assert!(matches!(
            parse("toggle everything"),
            Err(ParseError::BadArgument { command: "toggle", .. })
        ));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(parse("jump"), Err(ParseError::Unknown("jump".into())));
        assert!(matches!(
            parse("start level"),
            Err(ParseError::BadArgument { command: "start", .. })
        ));
    }
}
