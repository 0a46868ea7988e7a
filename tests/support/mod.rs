#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{Datelike, NaiveDateTime, Timelike};
use tokio::net::TcpListener;
use tripboard::{
    config::AppConfig,
    models::{Meeting, MeetingDraft, RecordId, Trip, TripDraft, WireDateTime},
    services::TripGateway,
    state::AppState,
};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTrips,
    GetTrip,
    CreateTrip,
    AddMeeting,
    DeleteMeeting,
}

#[derive(Debug, Default)]
struct ApiData {
    trips: Vec<Trip>,
    next_id: i64,
    failing: HashSet<Endpoint>,
    hits: HashMap<Endpoint, usize>,
    delays: HashMap<RecordId, Duration>,
    list_delays: VecDeque<Duration>,
    create_bodies: Vec<serde_json::Value>,
    list_body: Option<String>,
}

type Shared = Arc<Mutex<ApiData>>;

/// In-process stand-in for the remote trips API, mounted under `/api/`.
#[derive(Debug, Clone)]
pub struct FakeApi {
    data: Shared,
    pub base_url: Url,
}

impl FakeApi {
    pub async fn start() -> Self {
        let data: Shared = Arc::new(Mutex::new(ApiData {
            next_id: 100,
            ..ApiData::default()
        }));
        let router = Router::new()
            .route("/api/trips", get(list_trips).post(create_trip))
            .route("/api/trips/:id", get(get_trip))
            .route("/api/trips/:id/meetings", post(add_meeting))
            .route("/api/trips/:id/meetings/:meeting_id", delete(delete_meeting))
            .with_state(data.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("fake api address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("fake api server");
        });

        let base_url = Url::parse(&format!("http://{addr}/api/")).expect("fake api url");
        Self { data, base_url }
    }

    fn data(&self) -> MutexGuard<'_, ApiData> {
        self.data.lock().expect("fake api lock")
    }

    pub fn gateway(&self) -> TripGateway {
        TripGateway::new(self.base_url.clone()).expect("gateway")
    }

    pub fn app_state(&self) -> AppState {
        let config = AppConfig {
            api_base_url: self.base_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            static_dir: PathBuf::from("static"),
        };
        AppState::new(config, self.gateway())
    }

    pub fn seed(&self, trip: Trip) {
        self.data().trips.push(trip);
    }

    pub fn seed_meeting(&self, trip_id: i64, meeting_id: i64, title: &str) {
        let mut data = self.data();
        let trip = data
            .trips
            .iter_mut()
            .find(|trip| trip.id == RecordId::Int(trip_id))
            .expect("seeded trip");
        trip.meetings.push(Meeting {
            id: RecordId::Int(meeting_id),
            title: title.to_string(),
            description: format!("{title} notes"),
        });
    }

    /// Serves `body` verbatim from `GET /trips`.
    pub fn override_list_body(&self, body: &str) {
        self.data().list_body = Some(body.to_string());
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.data().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.data().failing.remove(&endpoint);
    }

    pub fn delay_trip(&self, trip_id: i64, delay: Duration) {
        self.data().delays.insert(RecordId::Int(trip_id), delay);
    }

    /// Delays the next `GET /trips` only. The response holds the trips
    /// present when the request arrived.
    pub fn delay_list(&self, delay: Duration) {
        self.data().list_delays.push_back(delay);
    }

    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.data().hits.get(&endpoint).copied().unwrap_or(0)
    }

    pub fn trips(&self) -> Vec<Trip> {
        self.data().trips.clone()
    }

    pub fn last_create_body(&self) -> Option<serde_json::Value> {
        self.data().create_bodies.last().cloned()
    }
}

pub fn sample_trip(id: i64, title: &str, month: u32) -> Trip {
    let start = WireDateTime::new(2024, month, 1, 9, 0).expect("valid start");
    let end = WireDateTime::new(2024, month, 5, 18, 0).expect("valid end");
    Trip {
        id: RecordId::Int(id),
        title: title.to_string(),
        description: format!("{title} trip"),
        start_trip: start,
        end_trip: end,
        meetings: Vec::new(),
    }
}

fn wire_instant(value: NaiveDateTime) -> WireDateTime {
    WireDateTime::new(
        value.year(),
        value.month(),
        value.day(),
        value.hour(),
        value.minute(),
    )
    .expect("draft instant fits the wire format")
}

/// Records the hit and reports whether the endpoint is set to fail.
fn hit(data: &Shared, endpoint: Endpoint) -> bool {
    let mut data = data.lock().expect("fake api lock");
    *data.hits.entry(endpoint).or_default() += 1;
    data.failing.contains(&endpoint)
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn list_trips(State(data): State<Shared>) -> Response {
    if hit(&data, Endpoint::ListTrips) {
        return server_error();
    }
    let (delay, response) = {
        let mut data = data.lock().expect("fake api lock");
        let response = match &data.list_body {
            Some(body) => (
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body.clone(),
            )
                .into_response(),
            None => Json(data.trips.clone()).into_response(),
        };
        (data.list_delays.pop_front(), response)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    response
}

async fn get_trip(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    if hit(&data, Endpoint::GetTrip) {
        return server_error();
    }
    let id = RecordId::parse(&id);
    let delay = data.lock().expect("fake api lock").delays.get(&id).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let trip = data
        .lock()
        .expect("fake api lock")
        .trips
        .iter()
        .find(|trip| trip.id == id)
        .cloned();
    match trip {
        Some(trip) => Json(trip).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_trip(State(data): State<Shared>, Json(body): Json<serde_json::Value>) -> Response {
    if hit(&data, Endpoint::CreateTrip) {
        return server_error();
    }
    let mut data = data.lock().expect("fake api lock");
    data.create_bodies.push(body.clone());
    let Ok(draft) = serde_json::from_value::<TripDraft>(body) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    data.next_id += 1;
    let trip = Trip {
        id: RecordId::Int(data.next_id),
        title: draft.title,
        description: draft.description,
        start_trip: wire_instant(draft.start_trip),
        end_trip: wire_instant(draft.end_trip),
        meetings: Vec::new(),
    };
    data.trips.push(trip.clone());
    (StatusCode::CREATED, Json(trip)).into_response()
}

async fn add_meeting(
    State(data): State<Shared>,
    Path(id): Path<String>,
    Json(draft): Json<MeetingDraft>,
) -> Response {
    if hit(&data, Endpoint::AddMeeting) {
        return server_error();
    }
    let id = RecordId::parse(&id);
    let mut data = data.lock().expect("fake api lock");
    data.next_id += 1;
    let meeting = Meeting {
        id: RecordId::Int(data.next_id),
        title: draft.title,
        description: draft.description,
    };
    let Some(trip) = data.trips.iter_mut().find(|trip| trip.id == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    trip.meetings.push(meeting.clone());
    (StatusCode::CREATED, Json(meeting)).into_response()
}

async fn delete_meeting(
    State(data): State<Shared>,
    Path((id, meeting_id)): Path<(String, String)>,
) -> Response {
    if hit(&data, Endpoint::DeleteMeeting) {
        return server_error();
    }
    let id = RecordId::parse(&id);
    let meeting_id = RecordId::parse(&meeting_id);
    let mut data = data.lock().expect("fake api lock");
    let Some(trip) = data.trips.iter_mut().find(|trip| trip.id == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    trip.meetings.retain(|meeting| meeting.id != meeting_id);
    StatusCode::NO_CONTENT.into_response()
}
