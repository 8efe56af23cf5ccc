use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, LocationQuery, UpdateEvent};

/// Persistence for events.
///
/// Lists are ordered by ascending id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event; the store assigns `id` and `created_at`
    async fn create(&self, input: CreateEvent) -> EventResult<Event>;

    async fn get_by_id(&self, id: i64) -> EventResult<Option<Event>>;

    async fn list(&self) -> EventResult<Vec<Event>>;

    /// Overwrite the updatable fields; `NotFound` if the row is gone
    async fn update(&self, id: i64, input: UpdateEvent) -> EventResult<Event>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i64) -> EventResult<bool>;

    /// Increment attendees only while below capacity.
    ///
    /// `None` when the event is missing or already full.
    async fn try_join(&self, id: i64) -> EventResult<Option<Event>>;

    /// Exact match on the location fields named by `query`
    async fn find_by_location(&self, query: &LocationQuery) -> EventResult<Vec<Event>>;

    async fn find_by_category(&self, category: &str) -> EventResult<Vec<Event>>;

    /// Case-insensitive substring match on city, area or zipcode
    async fn search_by_location(&self, term: &str) -> EventResult<Vec<Event>>;

    /// [`search_by_location`](Self::search_by_location) restricted to an exact category
    async fn search_by_location_and_category(
        &self,
        term: &str,
        category: &str,
    ) -> EventResult<Vec<Event>>;
}

/// Map-backed repository for development and tests
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    state: Arc<RwLock<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    events: BTreeMap<i64, Event>,
    last_id: i64,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect<F>(&self, predicate: F) -> Vec<Event>
    where
        F: Fn(&Event) -> bool,
    {
        let state = self.state.read().await;
        state
            .events
            .values()
            .filter(|&e| predicate(e))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let event = Event {
            id: state.last_id,
            title: input.title,
            category: input.category,
            description: input.description,
            date: input.date,
            location: input.location,
            city: input.city,
            zipcode: input.zipcode,
            area: input.area,
            icon: input.icon,
            attendees: input.attendees,
            max_attendees: input.max_attendees,
            created_at: Utc::now(),
        };
        state.events.insert(event.id, event.clone());

        tracing::info!(event_id = event.id, "Created event");
        Ok(event)
    }

    async fn get_by_id(&self, id: i64) -> EventResult<Option<Event>> {
        let state = self.state.read().await;
        Ok(state.events.get(&id).cloned())
    }

    async fn list(&self) -> EventResult<Vec<Event>> {
        Ok(self.collect(|_| true).await)
    }

    async fn update(&self, id: i64, input: UpdateEvent) -> EventResult<Event> {
        let mut state = self.state.write().await;
        let event = state.events.get_mut(&id).ok_or(EventError::NotFound(id))?;
        event.apply_update(input);

        tracing::info!(event_id = id, "Updated event");
        Ok(event.clone())
    }

    async fn delete(&self, id: i64) -> EventResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.events.remove(&id).is_some();
        if removed {
            tracing::info!(event_id = id, "Deleted event");
        }
        Ok(removed)
    }

    async fn try_join(&self, id: i64) -> EventResult<Option<Event>> {
        let mut state = self.state.write().await;
        match state.events.get_mut(&id) {
            Some(event) if event.has_capacity() => {
                event.attendees += 1;
                Ok(Some(event.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_by_location(&self, query: &LocationQuery) -> EventResult<Vec<Event>> {
        Ok(self.collect(|e| query.matches(e)).await)
    }

    async fn find_by_category(&self, category: &str) -> EventResult<Vec<Event>> {
        Ok(self.collect(|e| e.category == category).await)
    }

    async fn search_by_location(&self, term: &str) -> EventResult<Vec<Event>> {
        Ok(self.collect(|e| e.location_contains(term)).await)
    }

    async fn search_by_location_and_category(
        &self,
        term: &str,
        category: &str,
    ) -> EventResult<Vec<Event>> {
        Ok(self
            .collect(|e| e.category == category && e.location_contains(term))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_MAX_ATTENDEES;

    fn create_input(title: &str, category: &str, city: Option<&str>) -> CreateEvent {
        CreateEvent {
            title: title.to_string(),
            category: category.to_string(),
            description: None,
            date: "2025-07-14".to_string(),
            location: "Main square".to_string(),
            city: city.map(str::to_string),
            zipcode: None,
            area: None,
            icon: None,
            attendees: 0,
            max_attendees: DEFAULT_MAX_ATTENDEES,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryEventRepository::new();

        let first = repo.create(create_input("a", "music", None)).await.unwrap();
        let second = repo.create(create_input("b", "music", None)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let listed: Vec<i64> = repo.list().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(listed, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryEventRepository::new();
        let first = repo.create(create_input("a", "music", None)).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());

        let second = repo.create(create_input("b", "music", None)).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_try_join_stops_at_capacity() {
        let repo = InMemoryEventRepository::new();
        let mut input = create_input("Tiny", "social", None);
        input.max_attendees = 1;
        let event = repo.create(input).await.unwrap();

        let joined = repo.try_join(event.id).await.unwrap().unwrap();
        assert_eq!(joined.attendees, 1);

        assert!(repo.try_join(event.id).await.unwrap().is_none());
        let stored = repo.get_by_id(event.id).await.unwrap().unwrap();
        assert_eq!(stored.attendees, 1);
    }

    #[tokio::test]
    async fn test_try_join_missing_event() {
        let repo = InMemoryEventRepository::new();
        assert!(repo.try_join(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_event() {
        let repo = InMemoryEventRepository::new();
        let update = UpdateEvent {
            title: "x".into(),
            category: "y".into(),
            description: None,
            date: "z".into(),
            location: "w".into(),
            attendees: 0,
        };
        assert!(matches!(
            repo.update(5, update).await,
            Err(EventError::NotFound(5))
        ));
    }

    #[tokio::test]
    async fn test_search_by_location_with_category() {
        let repo = InMemoryEventRepository::new();
        repo.create(create_input("Jazz", "music", Some("Paris"))).await.unwrap();
        repo.create(create_input("Chess", "games", Some("Paris"))).await.unwrap();
        repo.create(create_input("Rock", "music", Some("Lyon"))).await.unwrap();

        let found = repo
            .search_by_location_and_category("PAR", "music")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Jazz");

        let found = repo.search_by_location("par").await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
