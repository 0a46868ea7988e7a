use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::{AppError, FetchFailure},
    forms::{FormErrors, MeetingForm},
    models::RecordId,
    state::AppState,
    stores::TripDetailStore,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:id", get(trip_detail))
        .route("/trips/:id/meetings", post(meeting_create))
        .route(
            "/trips/:id/meetings/:meeting_id/delete",
            post(meeting_delete),
        )
}

#[derive(Clone)]
struct MeetingRow {
    id: String,
    title: String,
    description: String,
}

#[derive(Default)]
struct MeetingFormView {
    title: String,
    description: String,
    title_error: &'static str,
    description_error: &'static str,
}

impl MeetingFormView {
    fn filled(form: &MeetingForm, errors: &FormErrors) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            title_error: errors.message_for("title"),
            description_error: errors.message_for("description"),
        }
    }
}

#[derive(Template)]
#[template(path = "trips/detail.html")]
struct TripDetailTemplate {
    id: String,
    title: String,
    description: String,
    start: String,
    end: String,
    meetings: Vec<MeetingRow>,
    show_meeting_form: bool,
    form: MeetingFormView,
    show_error: bool,
    error_message: String,
}

#[derive(Template)]
#[template(path = "trips/missing.html")]
struct TripMissingTemplate {
    id: String,
    not_found: bool,
}

struct DetailPage {
    status: StatusCode,
    show_meeting_form: bool,
    form: MeetingFormView,
    error_message: Option<&'static str>,
}

impl DetailPage {
    fn plain(status: StatusCode) -> Self {
        Self {
            status,
            show_meeting_form: false,
            form: MeetingFormView::default(),
            error_message: None,
        }
    }
}

#[derive(Deserialize)]
struct DetailQuery {
    #[serde(default)]
    meeting_form: String,
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, AppError> {
    let store = state.mount_trip_detail();
    if let Some(missing) = mount(&store, RecordId::parse(&trip_id)).await? {
        return Ok(missing);
    }
    let mut page = DetailPage::plain(StatusCode::OK);
    page.show_meeting_form = query.meeting_form == "open";
    render_detail(&store, page)
}

async fn meeting_create(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<MeetingForm>,
) -> Result<Response, AppError> {
    let store = state.mount_trip_detail();
    if let Some(missing) = mount(&store, RecordId::parse(&trip_id)).await? {
        return Ok(missing);
    }

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            return render_detail(
                &store,
                DetailPage {
                    status: StatusCode::BAD_REQUEST,
                    show_meeting_form: true,
                    form: MeetingFormView::filled(&form, &errors),
                    error_message: None,
                },
            )
        }
    };

    match store.add_meeting(&draft).await {
        Ok(meeting) => {
            info!(%trip_id, meeting_id = %meeting.id, "meeting added");
            render_detail(&store, DetailPage::plain(StatusCode::CREATED))
        }
        Err(AppError::Fetch(failure)) => {
            warn!(error = %failure, "meeting was not added");
            render_detail(
                &store,
                DetailPage {
                    status: StatusCode::BAD_GATEWAY,
                    show_meeting_form: true,
                    form: MeetingFormView::filled(&form, &FormErrors::default()),
                    error_message: Some("Could not add the meeting. Please try again."),
                },
            )
        }
        Err(err) => Err(err),
    }
}

async fn meeting_delete(
    State(state): State<AppState>,
    Path((trip_id, meeting_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let store = state.mount_trip_detail();
    if let Some(missing) = mount(&store, RecordId::parse(&trip_id)).await? {
        return Ok(missing);
    }

    match store.remove_meeting(&RecordId::parse(&meeting_id)).await {
        Ok(()) => render_detail(&store, DetailPage::plain(StatusCode::OK)),
        Err(AppError::Fetch(failure)) => {
            warn!(error = %failure, "meeting was not deleted");
            let mut page = DetailPage::plain(StatusCode::BAD_GATEWAY);
            page.error_message = Some("Could not delete the meeting. Please try again.");
            render_detail(&store, page)
        }
        Err(err) => Err(err),
    }
}

/// Loads the trip; a failed load yields the "trip not found" page instead.
async fn mount(store: &TripDetailStore, trip_id: RecordId) -> Result<Option<Response>, AppError> {
    match store.load(trip_id.clone()).await {
        Ok(()) => Ok(None),
        Err(AppError::Fetch(failure)) => Ok(Some(render_missing(&trip_id, &failure))),
        Err(err) => Err(err),
    }
}

fn render_missing(trip_id: &RecordId, failure: &FetchFailure) -> Response {
    warn!(error = %failure, "trip detail unavailable");
    (
        failure.status_hint(),
        AskamaTemplateResponse::into_response(TripMissingTemplate {
            id: trip_id.to_string(),
            not_found: failure.is_not_found(),
        }),
    )
        .into_response()
}

fn render_detail(store: &TripDetailStore, page: DetailPage) -> Result<Response, AppError> {
    let trip = store.snapshot().trip.ok_or(AppError::NotLoaded)?;
    let meetings = trip
        .meetings
        .into_iter()
        .map(|meeting| MeetingRow {
            id: meeting.id.to_string(),
            title: meeting.title,
            description: meeting.description,
        })
        .collect();

    Ok((
        page.status,
        AskamaTemplateResponse::into_response(TripDetailTemplate {
            id: trip.id.to_string(),
            title: trip.title,
            description: trip.description,
            start: trip.start_trip.display(),
            end: trip.end_trip.display(),
            meetings,
            show_meeting_form: page.show_meeting_form,
            form: page.form,
            show_error: page.error_message.is_some(),
            error_message: page.error_message.unwrap_or_default().to_string(),
        }),
    )
        .into_response())
}
