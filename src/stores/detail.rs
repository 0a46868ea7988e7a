use tokio::sync::watch;
use tracing::debug;

use super::{LoadStatus, LoadTickets};
use crate::{
    error::{AppError, FetchFailure},
    models::{Meeting, MeetingDraft, RecordId, Trip},
    services::TripGateway,
};

/// Snapshot of the single trip the detail view is showing.
#[derive(Debug, Clone, Default)]
pub struct TripDetail {
    pub status: LoadStatus,
    pub requested: Option<RecordId>,
    pub trip: Option<Trip>,
    pub failure: Option<FetchFailure>,
}

impl TripDetail {
    pub fn holds(&self, trip_id: &RecordId) -> bool {
        self.status == LoadStatus::Loaded
            && self.trip.as_ref().is_some_and(|trip| &trip.id == trip_id)
    }
}

#[derive(Debug)]
pub struct TripDetailStore {
    gateway: TripGateway,
    state: watch::Sender<TripDetail>,
    tickets: LoadTickets,
}

impl TripDetailStore {
    pub fn new(gateway: TripGateway) -> Self {
        let (state, _) = watch::channel(TripDetail::default());
        Self {
            gateway,
            state,
            tickets: LoadTickets::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TripDetail> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TripDetail {
        self.state.borrow().clone()
    }

    pub async fn load(&self, trip_id: RecordId) -> Result<(), AppError> {
        let ticket = self.tickets.issue();
        self.state.send_replace(TripDetail {
            status: LoadStatus::Loading,
            requested: Some(trip_id.clone()),
            trip: None,
            failure: None,
        });

        let result = self.gateway.get_trip(&trip_id).await;
        if !self.tickets.is_current(ticket) {
            debug!(ticket, %trip_id, "discarding superseded trip response");
            return result.map(drop).map_err(AppError::from);
        }

        match result {
            Ok(mut trip) => {
                trip.dedupe_meetings();
                self.state.send_modify(|detail| {
                    detail.status = LoadStatus::Loaded;
                    detail.trip = Some(trip);
                });
                Ok(())
            }
            Err(failure) => {
                self.state.send_modify(|detail| {
                    detail.status = LoadStatus::Failed;
                    detail.failure = Some(failure.clone());
                });
                Err(failure.into())
            }
        }
    }

    pub async fn add_meeting(&self, draft: &MeetingDraft) -> Result<Meeting, AppError> {
        let trip_id = self.loaded_trip_id()?;
        let meeting = self.gateway.add_meeting(&trip_id, draft).await?;
        self.apply(&trip_id, |trip| trip.upsert_meeting(meeting.clone()));
        Ok(meeting)
    }

    /// Removing an id the trip does not hold leaves the meetings unchanged.
    pub async fn remove_meeting(&self, meeting_id: &RecordId) -> Result<(), AppError> {
        let trip_id = self.loaded_trip_id()?;
        self.gateway.delete_meeting(&trip_id, meeting_id).await?;
        self.apply(&trip_id, |trip| {
            trip.remove_meeting(meeting_id);
        });
        Ok(())
    }

    fn loaded_trip_id(&self) -> Result<RecordId, AppError> {
        let detail = self.state.borrow();
        let trip_id = match (detail.status, detail.trip.as_ref()) {
            (LoadStatus::Loaded, Some(trip)) => Some(trip.id.clone()),
            _ => None,
        };
        trip_id.ok_or(AppError::NotLoaded)
    }

    fn apply(&self, trip_id: &RecordId, mutate: impl FnOnce(&mut Trip)) {
        self.state.send_if_modified(|detail| {
            if !detail.holds(trip_id) {
                debug!(%trip_id, "trip changed while meeting call was in flight");
                return false;
            }
            match detail.trip.as_mut() {
                Some(trip) => {
                    mutate(trip);
                    true
                }
                None => false,
            }
        });
    }
}
