//! PostgreSQL plumbing shared by the API and its tests.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use database::common::RetryConfig;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, Some(RetryConfig::new())).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "connect_api").await?;
//! ```

pub mod common;
pub mod postgres;
pub mod repository;

pub use common::{DatabaseError, DatabaseResult};
pub use repository::BaseRepository;
