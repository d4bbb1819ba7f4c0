use chrono::Utc;

use pulse_types::events::ConnectionMode;
use pulse_types::models::Record;

/// Id of the synthetic record shown on an empty board.
pub const PLACEHOLDER_ID: &str = "welcome";

pub const EMPTY_BOARD_NOTICE: &str = "The board is empty. Be the first to share a thought!";

pub const LOCAL_MODE_NOTICE: &str = "Welcome! Pulse is currently in local mode. \
To sync with everyone, set the remote URL and API key in the host environment.";

/// Result of one read: the ordered records and the mode they were read in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub mode: ConnectionMode,
    pub records: Vec<Record>,
}

impl Feed {
    pub fn empty(mode: ConnectionMode) -> Self {
        Self {
            mode,
            records: Vec::new(),
        }
    }

    /// What the board displays right now.
    pub fn present(&self) -> Vec<Record> {
        present(
            &self.records,
            self.mode.is_configured(),
            Utc::now().timestamp_millis(),
        )
    }
}

/// The records as given, or exactly one system placeholder when there are
/// none. The placeholder text depends on whether a remote is configured.
pub fn present(records: &[Record], configured: bool, now_millis: i64) -> Vec<Record> {
    if !records.is_empty() {
        return records.to_vec();
    }

    let notice = if configured {
        EMPTY_BOARD_NOTICE
    } else {
        LOCAL_MODE_NOTICE
    };
    vec![Record::system(PLACEHOLDER_ID, notice, now_millis)]
}
