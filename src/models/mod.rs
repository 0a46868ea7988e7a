pub mod meeting;
pub mod trip;
pub mod wire;

pub use meeting::{Meeting, MeetingDraft};
pub use trip::{Trip, TripDraft};
pub use wire::{RecordId, WireDateTime};
