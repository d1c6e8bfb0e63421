//! Control commands read from stdin
//!
//! One command per line:
//!
//! ```text
//! register|unregister|enable|disable|connect|disconnect <kind>
//! default <kind>|none
//! offline on|off
//! status
//! quit
//! ```

use anyhow::{Result, bail};
use technotify_core::TechnologyKind;

/// A parsed control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Register(TechnologyKind),
    Unregister(TechnologyKind),
    Enable(TechnologyKind),
    Disable(TechnologyKind),
    Connect(TechnologyKind),
    Disconnect(TechnologyKind),
    /// `None` clears the default service
    Default(Option<TechnologyKind>),
    Offline(bool),
    Status,
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();

        let Some(verb) = words.next() else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }

        let arg = words.next().map(str::to_ascii_lowercase);
        if let Some(extra) = words.next() {
            bail!("unexpected argument '{}'", extra);
        }

        let command = match (verb.to_ascii_lowercase().as_str(), arg.as_deref()) {
            ("register", Some(kind)) => Command::Register(kind.parse()?),
            ("unregister", Some(kind)) => Command::Unregister(kind.parse()?),
            ("enable", Some(kind)) => Command::Enable(kind.parse()?),
            ("disable", Some(kind)) => Command::Disable(kind.parse()?),
            ("connect", Some(kind)) => Command::Connect(kind.parse()?),
            ("disconnect", Some(kind)) => Command::Disconnect(kind.parse()?),
            ("default", Some("none")) => Command::Default(None),
            ("default", Some(kind)) => Command::Default(Some(kind.parse()?)),
            ("offline", Some("on")) => Command::Offline(true),
            ("offline", Some("off")) => Command::Offline(false),
            ("offline", Some(other)) => bail!("offline expects on|off, got '{}'", other),
            ("status", None) => Command::Status,
            ("quit", None) => Command::Quit,
            (verb, None) => bail!("'{}' needs an argument or is unknown", verb),
            (verb, Some(_)) => bail!("unknown command '{}'", verb),
        };

        Ok(Some(command))
    }
}
