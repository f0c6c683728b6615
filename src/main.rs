use sea_orm::{Database, DbConn, DbErr, EntityTrait};

use upsert_connect_or_create::entity::prelude::*;
use upsert_connect_or_create::ops::{self, ConnectOrCreateProfile, ProfileAttrs, ProfileKey};
use upsert_connect_or_create::schema;

const SENTINEL_EMAIL: &str = "should-not-be-created@example.com";
const SENTINEL_NAME: &str = "should-not-be-created";

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    tracing_subscriber::fmt::init();

    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_owned());
    let db = Database::connect(&url).await?;

    let outcome = run(&db).await;

    // Teardown runs whether the sequence passed or not; a failure then
    // propagates and the process exits non-zero.
    db.close().await?;

    outcome
}

async fn run(db: &DbConn) -> Result<(), DbErr> {
    schema::create_tables(db).await?;
    ops::reset(db).await?;

    let (user, profile) =
        ops::create_user_with_profile(db, ProfileAttrs::new("foo@example.com", "Foo")).await?;

    let profiles = Profile::find().all(db).await?;

    ensure(
        profiles.len() == 1,
        "expected exactly one profile after create",
    )?;
    ensure(
        profiles[0].user_id == user.id,
        "created profile is not connected to the created user",
    )?;

    println!(
        "profile with id {} is connected to user {}",
        profile.id, profile.user_id
    );

    // The target already matches the profile created above, so the update
    // branch must connect to it and change nothing.
    ops::upsert_user(
        db,
        user.id,
        ProfileAttrs::new("foo@example.com", "Foo"),
        ConnectOrCreateProfile {
            target: ProfileKey::UserId(user.id),
            create: ProfileAttrs::new(SENTINEL_EMAIL, SENTINEL_NAME),
        },
    )
    .await?;

    let refetched = Profile::find_by_id(profile.id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("profile {} disappeared", profile.id)))?;

    let profiles = Profile::find().all(db).await?;

    println!(
        "{} profile(s) exist after the upsert; profile {} is connected to user {}",
        profiles.len(),
        refetched.id,
        refetched.user_id
    );

    ensure(profiles.len() == 1, "upsert duplicated the profile")?;
    ensure(
        refetched.user_id == user.id,
        "upsert disconnected the profile from its user",
    )?;
    ensure(
        !profiles.iter().any(|p| p.email == SENTINEL_EMAIL),
        "the connect-or-create create branch ran despite a matching profile",
    )?;

    Ok(())
}

fn ensure(cond: bool, msg: &str) -> Result<(), DbErr> {
    if cond {
        Ok(())
    } else {
        Err(DbErr::Custom(msg.to_owned()))
    }
}
