use std::sync::Arc;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventSearch, LocationFilter, SearchQuery, UpdateEvent};
use crate::repository::EventRepository;

/// Service layer for event business logic
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All events, ordered by id
    pub async fn list_events(&self) -> EventResult<Vec<Event>> {
        self.repository.list().await
    }

    pub async fn get_event(&self, id: i64) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// List a new event; the store assigns id and creation time
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        if input.attendees > input.max_attendees {
            return Err(EventError::Validation(format!(
                "attendees ({}) cannot exceed maxAttendees ({})",
                input.attendees, input.max_attendees
            )));
        }

        self.repository.create(input).await
    }

    /// Overwrite title, category, description, date, location and attendees
    pub async fn update_event(&self, id: i64, input: UpdateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        let current = self.get_event(id).await?;
        if input.attendees > current.max_attendees {
            return Err(EventError::Validation(format!(
                "attendees ({}) cannot exceed maxAttendees ({})",
                input.attendees, current.max_attendees
            )));
        }

        self.repository.update(id, input).await
    }

    /// Remove an event. Deleting an unknown id is not an error.
    pub async fn delete_event(&self, id: i64) -> EventResult<()> {
        if !self.repository.delete(id).await? {
            tracing::debug!(event_id = id, "Delete of unknown event ignored");
        }
        Ok(())
    }

    /// Take one seat at the event.
    ///
    /// Fails with `Full` when the event is at capacity, including when a
    /// concurrent join took the last seat first.
    pub async fn join_event(&self, id: i64) -> EventResult<Event> {
        let event = self.get_event(id).await?;
        if !event.has_capacity() {
            return Err(EventError::Full(id));
        }

        let joined = self
            .repository
            .try_join(id)
            .await?
            .ok_or(EventError::Full(id))?;

        tracing::info!(
            event_id = id,
            attendees = joined.attendees,
            max_attendees = joined.max_attendees,
            "Joined event"
        );
        Ok(joined)
    }

    /// Exact-match lookup on whichever of city, zipcode and area are present
    pub async fn filter_by_location(&self, filter: LocationFilter) -> EventResult<Vec<Event>> {
        match filter.query() {
            Some(query) => {
                tracing::debug!(?query, "Filtering events by location");
                self.repository.find_by_location(&query).await
            }
            None => self.repository.list().await,
        }
    }

    /// Substring location search, optionally narrowed to one category
    pub async fn search_events(&self, search: EventSearch) -> EventResult<Vec<Event>> {
        let query = search.query();
        tracing::debug!(?query, "Searching events");

        match query {
            Some(SearchQuery::LocationAndCategory { location, category }) => {
                self.repository
                    .search_by_location_and_category(&location, &category)
                    .await
            }
            Some(SearchQuery::Location(location)) => {
                self.repository.search_by_location(&location).await
            }
            Some(SearchQuery::Category(category)) => {
                self.repository.find_by_category(&category).await
            }
            None => self.repository.list().await,
        }
    }
}
