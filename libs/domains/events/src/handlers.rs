use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::EventResult;
use crate::models::{CreateEvent, Event, EventSearch, LocationFilter, UpdateEvent};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        update_event,
        delete_event,
        join_event,
        search_events,
        filter_events,
    ),
    components(
        schemas(Event, CreateEvent, UpdateEvent, LocationFilter, EventSearch),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Event listing, joining and search")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/search", get(search_events))
        .route("/filter", get(filter_events))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/{id}/join", post(join_event))
        .with_state(shared_service)
}

/// List all events
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "List of events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events().await?;
    Ok(Json(events))
}

/// Create a new event
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateEvent,
    responses(
        (status = 200, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<Json<Event>> {
    let event = service.create_event(input).await?;
    Ok(Json(event))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<Event>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Update an event.
///
/// Only title, category, description, date, location and attendees are written.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<Event>> {
    let event = service.update_event(id, input).await?;
    Ok(Json(event))
}

/// Delete an event; unknown ids succeed too
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<()> {
    service.delete_event(id).await
}

/// Join an event if it still has capacity
#[utoipa::path(
    post,
    path = "/{id}/join",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Joined; returns the updated event", body = Event),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn join_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<Event>> {
    let event = service.join_event(id).await?;
    Ok(Json(event))
}

/// Search events by location substring and/or exact category
#[utoipa::path(
    get,
    path = "/search",
    tag = entity::Model::TAG,
    params(EventSearch),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(search): Query<EventSearch>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.search_events(search).await?;
    Ok(Json(events))
}

/// Filter events by exact city, zipcode and area
#[utoipa::path(
    get,
    path = "/filter",
    tag = entity::Model::TAG,
    params(LocationFilter),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(filter): Query<LocationFilter>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.filter_by_location(filter).await?;
    Ok(Json(events))
}
