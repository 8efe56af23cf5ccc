use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Events::Title))
                    .col(string(Events::Category))
                    .col(text_null(Events::Description))
                    .col(string(Events::Date))
                    .col(string(Events::Location))
                    .col(string_null(Events::City))
                    .col(string_null(Events::Zipcode))
                    .col(string_null(Events::Area))
                    .col(string_null(Events::Icon))
                    .col(integer(Events::Attendees).default(0))
                    .col(integer(Events::MaxAttendees).default(20))
                    .col(
                        timestamp_with_time_zone(Events::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE events
                    ADD CONSTRAINT events_attendees_within_capacity
                    CHECK (attendees >= 0 AND attendees <= max_attendees)
                "#,
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_category")
                    .table(Events::Table)
                    .col(Events::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_city")
                    .table(Events::Table)
                    .col(Events::City)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Title,
    Category,
    Description,
    Date,
    Location,
    City,
    Zipcode,
    Area,
    Icon,
    Attendees,
    MaxAttendees,
    CreatedAt,
}
