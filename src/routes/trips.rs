use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::AppError,
    forms::{FormErrors, TripForm},
    models::Trip,
    state::AppState,
    stores::{InvalidMonth, MonthFilter, TripCollectionStore},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/trips", get(trips_list).post(trip_create))
}

#[derive(Clone)]
struct TripCard {
    id: String,
    title: String,
    description: String,
    start: String,
    end: String,
}

impl From<Trip> for TripCard {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            start: trip.start_trip.display(),
            end: trip.end_trip.display(),
            title: trip.title,
            description: trip.description,
        }
    }
}

#[derive(Clone)]
struct MonthOption {
    value: u32,
    label: &'static str,
    selected: bool,
}

#[derive(Default)]
struct TripFormView {
    title: String,
    description: String,
    start_trip: String,
    end_trip: String,
    title_error: &'static str,
    description_error: &'static str,
    start_trip_error: &'static str,
    end_trip_error: &'static str,
}

impl TripFormView {
    fn filled(form: &TripForm, errors: &FormErrors) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            start_trip: form.start_trip.clone(),
            end_trip: form.end_trip.clone(),
            title_error: errors.message_for("title"),
            description_error: errors.message_for("description"),
            start_trip_error: errors.message_for("startTrip"),
            end_trip_error: errors.message_for("endTrip"),
        }
    }
}

#[derive(Template)]
#[template(path = "trips/list.html")]
struct TripsListTemplate {
    trips: Vec<TripCard>,
    months: Vec<MonthOption>,
    all_months: bool,
    month_value: String,
    show_form: bool,
    form: TripFormView,
    show_error: bool,
    error_message: String,
}

struct ListPage {
    status: StatusCode,
    filter: MonthFilter,
    show_form: bool,
    form: TripFormView,
    error_message: Option<&'static str>,
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    month: String,
    #[serde(default)]
    form: String,
}

async fn trips_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let filter: MonthFilter = query
        .month
        .parse()
        .map_err(|err: InvalidMonth| AppError::BadRequest(err.to_string()))?;

    let store = state.mount_trip_list();
    let (status, error_message) = mount(&store).await?;

    Ok(render_list(
        &store,
        ListPage {
            status,
            filter,
            show_form: query.form == "open",
            form: TripFormView::default(),
            error_message,
        },
    ))
}

async fn trip_create(
    State(state): State<AppState>,
    Form(form): Form<TripForm>,
) -> Result<Response, AppError> {
    let filter: MonthFilter = form
        .month
        .parse()
        .map_err(|err: InvalidMonth| AppError::BadRequest(err.to_string()))?;

    let store = state.mount_trip_list();
    let (_, list_error) = mount(&store).await?;

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(render_list(
                &store,
                ListPage {
                    status: StatusCode::BAD_REQUEST,
                    filter,
                    show_form: true,
                    form: TripFormView::filled(&form, &errors),
                    error_message: None,
                },
            ))
        }
    };

    match state.gateway.create_trip(&draft).await {
        Ok(trip) => {
            info!(trip_id = %trip.id, title = %trip.title, "trip added to list");
            store.append(trip);
            Ok(render_list(
                &store,
                ListPage {
                    status: StatusCode::CREATED,
                    filter,
                    show_form: false,
                    form: TripFormView::default(),
                    error_message: list_error,
                },
            ))
        }
        Err(failure) => {
            warn!(error = %failure, "trip was not created");
            Ok(render_list(
                &store,
                ListPage {
                    status: StatusCode::BAD_GATEWAY,
                    filter,
                    show_form: true,
                    form: TripFormView::filled(&form, &FormErrors::default()),
                    error_message: Some("Could not create the trip. Please try again."),
                },
            ))
        }
    }
}

/// Loads the list; a remote failure still renders, with a banner.
async fn mount(
    store: &TripCollectionStore,
) -> Result<(StatusCode, Option<&'static str>), AppError> {
    match store.load().await {
        Ok(()) => Ok((StatusCode::OK, None)),
        Err(AppError::Fetch(failure)) => {
            warn!(error = %failure, "rendering trip list without remote data");
            Ok((
                StatusCode::BAD_GATEWAY,
                Some("Could not load trips. Please try again later."),
            ))
        }
        Err(err) => Err(err),
    }
}

fn render_list(store: &TripCollectionStore, page: ListPage) -> Response {
    let trips = store
        .snapshot()
        .filtered(page.filter)
        .into_iter()
        .map(TripCard::from)
        .collect();
    let months = (1..=12)
        .map(|value| MonthOption {
            value,
            label: MonthFilter::month_name(value),
            selected: page.filter == MonthFilter::Month(value),
        })
        .collect();

    (
        page.status,
        AskamaTemplateResponse::into_response(TripsListTemplate {
            trips,
            months,
            all_months: page.filter == MonthFilter::All,
            month_value: match page.filter {
                MonthFilter::All => String::new(),
                MonthFilter::Month(month) => month.to_string(),
            },
            show_form: page.show_form,
            form: page.form,
            show_error: page.error_message.is_some(),
            error_message: page.error_message.unwrap_or_default().to_string(),
        }),
    )
        .into_response()
}
