//! Status transition history for the current session.
//!
//! [`StatusHistoryTracker`] remembers, for every entity it has seen, the
//! current status and when that status began. Each new snapshot is diffed
//! against that memory; entities whose status changed produce a
//! [`TransitionLogEntry`] describing the period that just ended.
//!
//! ```text
//! snapshot (name, status)* ──▶ observe(now) ──┬──▶ current_state (name → StatusRecord)
//!                                             └──▶ log (append-only transitions)
//! ```

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use super::duration::format_duration;
use super::table::Table;

/// Timezone-aware timestamp used for every tracked time.
pub type Timestamp = DateTime<FixedOffset>;

/// Format used for start/end times in tables and exports.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column headers for the transition log table.
pub const LOG_COLUMNS: [&str; 6] = [
    "Site Name",
    "From Status",
    "To Status",
    "Start Time (WIB)",
    "End Time (WIB)",
    "Duration",
];

/// A single (entity, status) observation inside a snapshot.
///
/// Either side may be missing; such observations are skipped by the tracker.
pub trait Observation {
    fn entity(&self) -> Option<&str>;
    fn status(&self) -> Option<&str>;
}

impl<N: AsRef<str>, S: AsRef<str>> Observation for (N, S) {
    fn entity(&self) -> Option<&str> {
        Some(self.0.as_ref())
    }

    fn status(&self) -> Option<&str> {
        Some(self.1.as_ref())
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn entity(&self) -> Option<&str> {
        (**self).entity()
    }

    fn status(&self) -> Option<&str> {
        (**self).status()
    }
}

/// Current status of one entity and when it began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub status: String,
    pub since: Timestamp,
}

/// One detected status change. Never modified once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionLogEntry {
    pub entity_name: String,
    pub from_status: String,
    pub to_status: String,
    /// When `from_status` began.
    pub start_time: Timestamp,
    /// When the change was detected.
    pub end_time: Timestamp,
    /// `end_time - start_time`, formatted by [`format_duration`].
    pub duration: String,
}

impl TransitionLogEntry {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.entity_name.clone(),
            self.from_status.clone(),
            self.to_status.clone(),
            self.start_time.format(TIME_FORMAT).to_string(),
            self.end_time.format(TIME_FORMAT).to_string(),
            self.duration.clone(),
        ]
    }
}

/// Tracks per-entity status over one session and logs every transition.
///
/// Not synchronized: one tracker belongs to one session and is driven from a
/// single thread. Create a new tracker (or call [`reset`](Self::reset)) to
/// start a new session.
#[derive(Debug, Clone, Default)]
pub struct StatusHistoryTracker {
    current_state: HashMap<String, StatusRecord>,
    log: Vec<TransitionLogEntry>,
}

impl StatusHistoryTracker {
    /// Create a tracker with no remembered entities and an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff a snapshot against the remembered state.
    ///
    /// - unseen entity: remembered with `since = now`, nothing logged
    /// - same status: untouched (its period keeps accruing)
    /// - different status: the ended period is logged and the entity
    ///   restarts with the new status at `now`
    ///
    /// Entities absent from `snapshot` are left as they are. A name repeated
    /// within one snapshot keeps its first position and its last status.
    ///
    /// `now` must not precede any previously recorded `since`.
    ///
    /// Returns the number of transitions appended by this call.
    pub fn observe<I>(&mut self, snapshot: I, now: Timestamp) -> usize
    where
        I: IntoIterator,
        I::Item: Observation,
    {
        let mut order: Vec<String> = Vec::new();
        let mut latest: HashMap<String, String> = HashMap::new();

        for obs in snapshot {
            let (Some(name), Some(status)) = (obs.entity(), obs.status()) else {
                continue;
            };
            if latest.insert(name.to_string(), status.to_string()).is_none() {
                order.push(name.to_string());
            }
        }

        let before = self.log.len();
        for name in order {
            if let Some(status) = latest.remove(&name) {
                self.apply(name, status, now);
            }
        }

        let appended = self.log.len() - before;
        debug!(
            entities = self.current_state.len(),
            transitions = appended,
            "Observed status snapshot"
        );
        appended
    }

    fn apply(&mut self, name: String, status: String, now: Timestamp) {
        match self.current_state.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(StatusRecord { status, since: now });
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if record.status == status {
                    return;
                }
                let from_status = std::mem::replace(&mut record.status, status.clone());
                let start_time = std::mem::replace(&mut record.since, now);

                debug!(entity = %slot.key(), from = %from_status, to = %status, "Status transition");
                self.log.push(TransitionLogEntry {
                    entity_name: slot.key().clone(),
                    from_status,
                    to_status: status,
                    start_time,
                    end_time: now,
                    duration: format_duration(now.signed_duration_since(start_time)),
                });
            }
        }
    }

    /// Copy of the current per-entity state, ordered by name.
    pub fn current_snapshot(&self) -> BTreeMap<String, StatusRecord> {
        self.current_state.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Copy of the transition log in detection order.
    pub fn log_entries(&self) -> Vec<TransitionLogEntry> {
        self.log.clone()
    }

    /// Remembered state of a single entity.
    pub fn status_of(&self, name: &str) -> Option<StatusRecord> {
        self.current_state.get(name).cloned()
    }

    /// Number of entities seen so far.
    pub fn len(&self) -> usize {
        self.current_state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_state.is_empty()
    }

    /// Number of transitions recorded so far.
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Forget all state and history.
    pub fn reset(&mut self) {
        self.current_state.clear();
        self.log.clear();
    }

    /// The transition log as a table with [`LOG_COLUMNS`] headers.
    pub fn log_table(&self) -> Table {
        Table::new(
            LOG_COLUMNS.iter().map(|c| c.to_string()).collect(),
            self.log.iter().map(TransitionLogEntry::to_row).collect(),
        )
    }
}
