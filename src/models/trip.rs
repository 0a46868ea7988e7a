use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    meeting::Meeting,
    wire::{datetime_local, RecordId, WireDateTime},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub start_trip: WireDateTime,
    pub end_trip: WireDateTime,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

impl Trip {
    pub fn start_month(&self) -> u32 {
        self.start_trip.month()
    }

    pub fn meeting(&self, id: &RecordId) -> Option<&Meeting> {
        self.meetings.iter().find(|meeting| &meeting.id == id)
    }

    /// Appends the meeting, or replaces the one already carrying its id.
    pub fn upsert_meeting(&mut self, meeting: Meeting) {
        match self.meetings.iter_mut().find(|m| m.id == meeting.id) {
            Some(existing) => *existing = meeting,
            None => self.meetings.push(meeting),
        }
    }

    /// Drops every meeting carrying `id`. Returns whether any was held.
    pub fn remove_meeting(&mut self, id: &RecordId) -> bool {
        let before = self.meetings.len();
        self.meetings.retain(|m| &m.id != id);
        self.meetings.len() != before
    }

    /// Collapses repeated meeting ids: the first position is kept and the
    /// last occurrence wins, as with [`Trip::upsert_meeting`].
    pub fn dedupe_meetings(&mut self) {
        let meetings = std::mem::take(&mut self.meetings);
        for meeting in meetings {
            self.upsert_meeting(meeting);
        }
    }
}

/// Body of `POST /trips`. Start and end travel as `datetime-local` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub title: String,
    pub description: String,
    #[serde(with = "datetime_local")]
    pub start_trip: NaiveDateTime,
    #[serde(with = "datetime_local")]
    pub end_trip: NaiveDateTime,
}
