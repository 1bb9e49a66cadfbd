//! Bad-channel bookkeeping for spectral-density inspection. Produces a
//! `channel -> status` table that output writers color or filter on; no
//! statistics live here.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::input::InputError;
use crate::input::reader::open_maybe_gz;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Normal,
    Flagged,
}

impl ChannelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelStatus::Normal => "normal",
            ChannelStatus::Flagged => "flagged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelEntry {
    pub name: String,
    pub status: ChannelStatus,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("bad channel {name} is not in the channel list")]
    UnknownChannel { name: String },
    #[error("channel list {0} is empty")]
    EmptyChannelList(PathBuf),
}

/// One channel name per line; blank lines and surrounding whitespace are
/// ignored. Order is preserved.
pub fn read_name_list(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut names = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| InputError::io(path, e))?;
        if read == 0 {
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        names.push(line.to_string());
    }
    Ok(names)
}

pub fn channel_status_table(
    channels: &[String],
    bads: &[String],
) -> Result<Vec<ChannelEntry>, ChannelError> {
    let known: BTreeSet<&str> = channels.iter().map(String::as_str).collect();
    let mut flagged = BTreeSet::new();
    for bad in bads {
        if !known.contains(bad.as_str()) {
            return Err(ChannelError::UnknownChannel { name: bad.clone() });
        }
        if !flagged.insert(bad.as_str()) {
            tracing::warn!(channel = %bad, "bad channel listed twice");
        }
    }

    Ok(channels
        .iter()
        .map(|name| ChannelEntry {
            name: name.clone(),
            status: if flagged.contains(name.as_str()) {
                ChannelStatus::Flagged
            } else {
                ChannelStatus::Normal
            },
        })
        .collect())
}

pub fn load_channel_status(
    channels_path: &Path,
    bads_path: &Path,
) -> Result<Vec<ChannelEntry>, ChannelError> {
    let channels = read_name_list(channels_path)?;
    if channels.is_empty() {
        return Err(ChannelError::EmptyChannelList(channels_path.to_path_buf()));
    }
    let bads = read_name_list(bads_path)?;
    let table = channel_status_table(&channels, &bads)?;
    tracing::info!(
        channels = table.len(),
        flagged = table
            .iter()
            .filter(|e| e.status == ChannelStatus::Flagged)
            .count(),
        "built channel status table"
    );
    Ok(table)
}

#[cfg(test)]
#[path = "../../tests/src_inline/channels/tests.rs"]
mod tests;
