//! `swale-log` is the run log shared by scripted geoprocessing sequences: a
//! line-oriented, timestamped log appended to a file, with each message
//! mirrored to a host-provided message channel.
//!
//! The log path is plain configuration, resolved once by the caller at
//! startup and passed in; nothing in this crate inspects the machine it runs
//! on.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Messages surfaced to the host channel are cut off at this many
/// characters. The file line is written in full.
pub const HOST_MESSAGE_LIMIT: usize = 1000;

/// Where the run log file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub path: PathBuf,
}

impl LogConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file next to the current working directory, for runs without an
    /// externally supplied destination.
    pub fn local_default() -> Self {
        Self::new("script_log.log")
    }
}

/// Receives the short form of every logged message, e.g. a geoprocessing
/// host's message window.
pub trait HostChannel {
    fn post(&mut self, message: &str);
}

/// Default channel: forwards to the `log` facade at info level.
#[derive(Debug, Default)]
pub struct FacadeChannel;

impl HostChannel for FacadeChannel {
    fn post(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// Append-mode run log.
pub struct RunLog<C = FacadeChannel> {
    file: File,
    channel: C,
}

impl RunLog<FacadeChannel> {
    pub fn open(config: &LogConfig) -> io::Result<Self> {
        Self::with_channel(config, FacadeChannel)
    }
}

impl<C: HostChannel> RunLog<C> {
    pub fn with_channel(config: &LogConfig, channel: C) -> io::Result<Self> {
        if let Some(dir) = parent_dir(&config.path) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)?;
        Ok(Self { file, channel })
    }

    /// Appends `"{timestamp} - {message}"` to the log file and mirrors the
    /// message (truncated to [`HOST_MESSAGE_LIMIT`]) to the host channel.
    pub fn message(&mut self, message: &str) -> io::Result<()> {
        let stamp = Local::now().format("%m/%d/%y %H:%M:%S");
        writeln!(self.file, "{stamp} - {message}")?;
        self.channel.post(truncate_for_host(message));
        Ok(())
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

/// First [`HOST_MESSAGE_LIMIT`] characters of `message`, cut on a character
/// boundary.
pub fn truncate_for_host(message: &str) -> &str {
    match message.char_indices().nth(HOST_MESSAGE_LIMIT) {
        Some((index, _)) => &message[..index],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::{truncate_for_host, HOST_MESSAGE_LIMIT};

    #[test]
    fn short_messages_pass_through() {
        assert_eq!(truncate_for_host("copying of_points"), "copying of_points");
    }

    #[test]
    fn long_messages_are_cut_at_the_limit() {
        let long = "x".repeat(HOST_MESSAGE_LIMIT + 50);
        assert_eq!(truncate_for_host(&long).len(), HOST_MESSAGE_LIMIT);
    }

    #[test]
    fn truncation_lands_on_a_character_boundary() {
        let long = "é".repeat(HOST_MESSAGE_LIMIT + 1);
        let cut = truncate_for_host(&long);
        assert_eq!(cut.chars().count(), HOST_MESSAGE_LIMIT);
    }
}
