use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
};

use crate::{
    entity,
    error::{EventError, EventResult},
    models::{CreateEvent, Event, LocationQuery, UpdateEvent},
    repository::EventRepository,
};

pub struct PgEventRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn fetch(&self, query: Select<entity::Entity>) -> EventResult<Vec<Event>> {
        let models = query
            .order_by_asc(entity::Column::Id)
            .all(self.base.db())
            .await?;
        Ok(models.into_iter().map(Event::from).collect())
    }
}

/// `%term%` for LIKE, lowercased, with the term's own wildcards escaped
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn location_contains(term: &str) -> Expr {
    let pattern = like_pattern(term);
    Expr::cust_with_values(
        "(LOWER(city) LIKE $1 OR LOWER(area) LIKE $2 OR LOWER(zipcode) LIKE $3)",
        [pattern.clone(), pattern.clone(), pattern],
    )
}

fn location_condition(query: &LocationQuery) -> Condition {
    let (city, zipcode, area) = query.fields();
    let mut condition = Condition::all();
    if let Some(city) = city {
        condition = condition.add(entity::Column::City.eq(city));
    }
    if let Some(zipcode) = zipcode {
        condition = condition.add(entity::Column::Zipcode.eq(zipcode));
    }
    if let Some(area) = area {
        condition = condition.add(entity::Column::Area.eq(area));
    }
    condition
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let active_model: entity::ActiveModel = input.into();
        let model = self.base.insert(active_model).await?;

        tracing::info!(event_id = model.id, "Created event");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> EventResult<Option<Event>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Event::from))
    }

    async fn list(&self) -> EventResult<Vec<Event>> {
        self.fetch(entity::Entity::find()).await
    }

    async fn update(&self, id: i64, input: UpdateEvent) -> EventResult<Event> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))?;

        // Only these columns are marked dirty, so nothing else is written
        let mut active_model: entity::ActiveModel = model.into();
        active_model.title = Set(input.title);
        active_model.category = Set(input.category);
        active_model.description = Set(input.description);
        active_model.date = Set(input.date);
        active_model.location = Set(input.location);
        active_model.attendees = Set(input.attendees);

        let updated = self.base.update(active_model).await?;

        tracing::info!(event_id = id, "Updated event");
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> EventResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(event_id = id, "Deleted event");
        }
        Ok(rows_affected > 0)
    }

    async fn try_join(&self, id: i64) -> EventResult<Option<Event>> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Attendees, Expr::cust("attendees + 1"))
            .filter(entity::Column::Id.eq(id))
            .filter(Expr::cust("attendees < max_attendees"))
            .exec(self.base.db())
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn find_by_location(&self, query: &LocationQuery) -> EventResult<Vec<Event>> {
        self.fetch(entity::Entity::find().filter(location_condition(query)))
            .await
    }

    async fn find_by_category(&self, category: &str) -> EventResult<Vec<Event>> {
        self.fetch(entity::Entity::find().filter(entity::Column::Category.eq(category)))
            .await
    }

    async fn search_by_location(&self, term: &str) -> EventResult<Vec<Event>> {
        self.fetch(entity::Entity::find().filter(location_contains(term)))
            .await
    }

    async fn search_by_location_and_category(
        &self,
        term: &str,
        category: &str,
    ) -> EventResult<Vec<Event>> {
        self.fetch(
            entity::Entity::find()
                .filter(entity::Column::Category.eq(category))
                .filter(location_contains(term)),
        )
        .await
    }
}
