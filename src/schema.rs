use sea_orm::{error::*, sea_query, ConnectionTrait, DbConn, ExecResult};
use sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, TableCreateStatement};

use crate::entity::{profile, user};

async fn create_table(db: &DbConn, stmt: &TableCreateStatement) -> Result<ExecResult, DbErr> {
    let builder = db.get_database_backend();
    db.execute(builder.build(stmt)).await
}

pub async fn create_user_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(user::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(user::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .to_owned();

    create_table(db, &stmt).await
}

pub async fn create_profile_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(profile::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(profile::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(profile::Column::Email)
                .string()
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(profile::Column::Name).string().not_null())
        .col(
            ColumnDef::new(profile::Column::UserId)
                .integer()
                .not_null()
                .unique_key(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("FK_profile_user")
                .from(profile::Entity, profile::Column::UserId)
                .to(user::Entity, user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned();

    create_table(db, &stmt).await
}

/// The profile table carries the foreign key, so the user table goes first.
pub async fn create_tables(db: &DbConn) -> Result<(), DbErr> {
    create_user_table(db).await?;
    create_profile_table(db).await?;

    Ok(())
}
