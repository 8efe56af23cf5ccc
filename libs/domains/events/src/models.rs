use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Default capacity for a newly listed event
pub const DEFAULT_MAX_ATTENDEES: i32 = 20;

fn default_max_attendees() -> i32 {
    DEFAULT_MAX_ATTENDEES
}

/// Event entity - a listed gathering with capacity and location attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Generated identifier
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    /// Free-form date string as entered by the organiser (never parsed)
    pub date: String,
    pub location: String,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub area: Option<String>,
    pub icon: Option<String>,
    /// Number of people who joined
    pub attendees: i32,
    /// Capacity; joins are rejected once reached
    pub max_attendees: i32,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether another attendee can join
    pub fn has_capacity(&self) -> bool {
        self.attendees < self.max_attendees
    }

    /// Overwrite the fields an update is allowed to touch.
    ///
    /// City, zipcode, area, icon, max_attendees and created_at are left as they are.
    pub fn apply_update(&mut self, update: UpdateEvent) {
        self.title = update.title;
        self.category = update.category;
        self.description = update.description;
        self.date = update.date;
        self.location = update.location;
        self.attendees = update.attendees;
    }

    /// Whether any of city, area or zipcode contains `term`, ignoring case
    pub fn location_contains(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [&self.city, &self.area, &self.zipcode]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// DTO for listing a new event.
///
/// Any `id` or `createdAt` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub date: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub area: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub attendees: i32,
    #[serde(default = "default_max_attendees")]
    #[validate(range(min = 0))]
    pub max_attendees: i32,
}

/// DTO for updating an event.
///
/// Only these six fields are written; anything else in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub date: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[validate(range(min = 0))]
    pub attendees: i32,
}

/// Exact-match location filter.
///
/// Only absent parameters are ignored; an empty string is matched literally.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocationFilter {
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub area: Option<String>,
}

/// One of the seven non-empty exact-match lookups over city, zipcode and area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    CityZipcodeArea {
        city: String,
        zipcode: String,
        area: String,
    },
    CityZipcode {
        city: String,
        zipcode: String,
    },
    CityArea {
        city: String,
        area: String,
    },
    ZipcodeArea {
        zipcode: String,
        area: String,
    },
    City(String),
    Zipcode(String),
    Area(String),
}

impl LocationFilter {
    /// Select the lookup for the supplied parameters; `None` means "all events"
    pub fn query(self) -> Option<LocationQuery> {
        match (self.city, self.zipcode, self.area) {
            (Some(city), Some(zipcode), Some(area)) => Some(LocationQuery::CityZipcodeArea {
                city,
                zipcode,
                area,
            }),
            (Some(city), Some(zipcode), None) => Some(LocationQuery::CityZipcode { city, zipcode }),
            (Some(city), None, Some(area)) => Some(LocationQuery::CityArea { city, area }),
            (None, Some(zipcode), Some(area)) => Some(LocationQuery::ZipcodeArea { zipcode, area }),
            (Some(city), None, None) => Some(LocationQuery::City(city)),
            (None, Some(zipcode), None) => Some(LocationQuery::Zipcode(zipcode)),
            (None, None, Some(area)) => Some(LocationQuery::Area(area)),
            (None, None, None) => None,
        }
    }
}

impl LocationQuery {
    /// The (city, zipcode, area) values this lookup constrains
    pub fn fields(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self {
            Self::CityZipcodeArea {
                city,
                zipcode,
                area,
            } => (Some(city), Some(zipcode), Some(area)),
            Self::CityZipcode { city, zipcode } => (Some(city), Some(zipcode), None),
            Self::CityArea { city, area } => (Some(city), None, Some(area)),
            Self::ZipcodeArea { zipcode, area } => (None, Some(zipcode), Some(area)),
            Self::City(city) => (Some(city), None, None),
            Self::Zipcode(zipcode) => (None, Some(zipcode), None),
            Self::Area(area) => (None, None, Some(area)),
        }
    }

    /// Exact match against a stored event
    pub fn matches(&self, event: &Event) -> bool {
        let (city, zipcode, area) = self.fields();
        let eq = |wanted: Option<&str>, field: &Option<String>| {
            wanted.is_none_or(|w| field.as_deref() == Some(w))
        };
        eq(city, &event.city) && eq(zipcode, &event.zipcode) && eq(area, &event.area)
    }
}

/// Free-text search parameters.
///
/// `q` is accepted as an alias for `location`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventSearch {
    /// Case-insensitive substring matched against city, area and zipcode
    #[serde(alias = "q")]
    pub location: Option<String>,
    /// Exact category
    pub category: Option<String>,
}

/// Search variant chosen from the non-blank parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    LocationAndCategory { location: String, category: String },
    Location(String),
    Category(String),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl EventSearch {
    /// Select the search variant; blank values count as absent and `None` means "all events"
    pub fn query(self) -> Option<SearchQuery> {
        match (non_blank(self.location), non_blank(self.category)) {
            (Some(location), Some(category)) => {
                Some(SearchQuery::LocationAndCategory { location, category })
            }
            (Some(location), None) => Some(SearchQuery::Location(location)),
            (None, Some(category)) => Some(SearchQuery::Category(category)),
            (None, None) => None,
        }
    }
}
