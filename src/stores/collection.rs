use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::{filter_by_month, LoadStatus, LoadTickets, MonthFilter};
use crate::{
    error::{AppError, FetchFailure},
    models::Trip,
    services::TripGateway,
};

/// Snapshot of the trip list as last published.
#[derive(Debug, Clone, Default)]
pub struct TripCollection {
    pub status: LoadStatus,
    pub trips: Arc<Vec<Trip>>,
    pub failure: Option<FetchFailure>,
}

impl TripCollection {
    pub fn filtered(&self, filter: MonthFilter) -> Vec<Trip> {
        filter_by_month(&self.trips, filter)
    }
}

#[derive(Debug)]
pub struct TripCollectionStore {
    gateway: TripGateway,
    state: watch::Sender<TripCollection>,
    tickets: LoadTickets,
}

impl TripCollectionStore {
    pub fn new(gateway: TripGateway) -> Self {
        let (state, _) = watch::channel(TripCollection::default());
        Self {
            gateway,
            state,
            tickets: LoadTickets::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TripCollection> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TripCollection {
        self.state.borrow().clone()
    }

    /// Replaces the held trips with the remote list. On failure the previous
    /// trips stay in place and the failure is returned.
    pub async fn load(&self) -> Result<(), AppError> {
        let ticket = self.tickets.issue();
        self.state.send_modify(|collection| {
            collection.status = LoadStatus::Loading;
        });

        let result = self.gateway.list_trips().await;
        if !self.tickets.is_current(ticket) {
            debug!(ticket, "discarding superseded trip list response");
            return result.map(drop).map_err(AppError::from);
        }

        match result {
            Ok(trips) => {
                debug!(count = trips.len(), "trip list loaded");
                self.state.send_modify(|collection| {
                    collection.status = LoadStatus::Loaded;
                    collection.trips = Arc::new(trips);
                    collection.failure = None;
                });
                Ok(())
            }
            Err(failure) => {
                self.state.send_modify(|collection| {
                    collection.status = LoadStatus::Failed;
                    collection.failure = Some(failure.clone());
                });
                Err(failure.into())
            }
        }
    }

    /// Adds a trip the gateway already created. No remote call.
    pub fn append(&self, trip: Trip) {
        self.state.send_modify(|collection| {
            Arc::make_mut(&mut collection.trips).push(trip);
        });
    }
}
