use crate::models::{CreateEvent, Event};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Row of the `events` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub category: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub date: String,
    pub location: String,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub area: Option<String>,
    pub icon: Option<String>,
    pub attendees: i32,
    pub max_attendees: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// OpenAPI tag for the events endpoints
    pub const TAG: &'static str = "events";
    /// Mount point of the events router under `/api`
    pub const URL: &'static str = "/events";
}

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            category: model.category,
            description: model.description,
            date: model.date,
            location: model.location,
            city: model.city,
            zipcode: model.zipcode,
            area: model.area,
            icon: model.icon,
            attendees: model.attendees,
            max_attendees: model.max_attendees,
            created_at: model.created_at.into(),
        }
    }
}

impl From<CreateEvent> for ActiveModel {
    fn from(input: CreateEvent) -> Self {
        ActiveModel {
            id: NotSet,
            title: Set(input.title),
            category: Set(input.category),
            description: Set(input.description),
            date: Set(input.date),
            location: Set(input.location),
            city: Set(input.city),
            zipcode: Set(input.zipcode),
            area: Set(input.area),
            icon: Set(input.icon),
            attendees: Set(input.attendees),
            max_attendees: Set(input.max_attendees),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
