use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use url::Url;

use crate::{
    error::{AppError, FetchCause, FetchFailure, Operation},
    models::{Meeting, MeetingDraft, RecordId, Trip, TripDraft},
};

/// Stateless client for the remote trips API. One call, one round trip.
#[derive(Debug, Clone)]
pub struct TripGateway {
    client: Client,
    base_url: Arc<Url>,
}

impl TripGateway {
    pub fn new(base_url: Url) -> Result<Self, AppError> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "api base url cannot carry paths: {base_url}"
            )));
        }
        let client = Client::builder()
            .user_agent(concat!("tripboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self {
            client,
            base_url: Arc::new(base_url),
        })
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>, FetchFailure> {
        let operation = Operation::ListTrips;
        let request = self.client.get(self.endpoint(&["trips"]));
        let response = self.send(&operation, request).await?;
        self.decode(&operation, response).await
    }

    pub async fn get_trip(&self, trip_id: &RecordId) -> Result<Trip, FetchFailure> {
        let operation = Operation::GetTrip {
            trip_id: trip_id.clone(),
        };
        let request = self
            .client
            .get(self.endpoint(&["trips", &trip_id.to_string()]));
        let response = self.send(&operation, request).await?;
        self.decode(&operation, response).await
    }

    pub async fn create_trip(&self, draft: &TripDraft) -> Result<Trip, FetchFailure> {
        let operation = Operation::CreateTrip;
        let request = self.client.post(self.endpoint(&["trips"])).json(draft);
        let response = self.send(&operation, request).await?;
        let trip: Trip = self.decode(&operation, response).await?;
        info!(trip_id = %trip.id, "trip created");
        Ok(trip)
    }

    pub async fn add_meeting(
        &self,
        trip_id: &RecordId,
        draft: &MeetingDraft,
    ) -> Result<Meeting, FetchFailure> {
        let operation = Operation::AddMeeting {
            trip_id: trip_id.clone(),
        };
        let request = self
            .client
            .post(self.endpoint(&["trips", &trip_id.to_string(), "meetings"]))
            .json(draft);
        let response = self.send(&operation, request).await?;
        self.decode(&operation, response).await
    }

    pub async fn delete_meeting(
        &self,
        trip_id: &RecordId,
        meeting_id: &RecordId,
    ) -> Result<(), FetchFailure> {
        let operation = Operation::DeleteMeeting {
            trip_id: trip_id.clone(),
            meeting_id: meeting_id.clone(),
        };
        let request = self.client.delete(self.endpoint(&[
            "trips",
            &trip_id.to_string(),
            "meetings",
            &meeting_id.to_string(),
        ]));
        self.send(&operation, request).await?;
        info!(%trip_id, %meeting_id, "meeting deleted");
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = (*self.base_url).clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        operation: &Operation,
        request: RequestBuilder,
    ) -> Result<Response, FetchFailure> {
        debug!(%operation, "dispatching api request");
        let response = request
            .send()
            .await
            .map_err(|err| self.fail(operation, FetchCause::Transport(err.to_string())))?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.fail(operation, FetchCause::Status(status.as_u16())));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        response: Response,
    ) -> Result<T, FetchFailure> {
        response
            .json::<T>()
            .await
            .map_err(|err| self.fail(operation, FetchCause::Decode(err.to_string())))
    }

    fn fail(&self, operation: &Operation, cause: FetchCause) -> FetchFailure {
        let failure = FetchFailure::new(operation.clone(), cause);
        error!(error = %failure, "api request failed");
        failure
    }
}
