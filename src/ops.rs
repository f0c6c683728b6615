use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::entity::{prelude::*, profile, user};

/// Column values for a profile create branch.
#[derive(Clone, Debug)]
pub struct ProfileAttrs {
    pub email: String,
    pub name: String,
}

impl ProfileAttrs {
    pub fn new<E, N>(email: E, name: N) -> Self
    where
        E: Into<String>,
        N: Into<String>,
    {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// A uniqueness condition to look up a profile by. Both columns carry a
/// unique key, so each variant matches at most one row.
#[derive(Clone, Debug)]
pub enum ProfileKey {
    UserId(i32),
    Email(String),
}

impl ProfileKey {
    fn condition(&self) -> Condition {
        match self {
            Self::UserId(user_id) => Condition::all().add(profile::Column::UserId.eq(*user_id)),
            Self::Email(email) => Condition::all().add(profile::Column::Email.eq(email.as_str())),
        }
    }
}

/// The nested operation carried by the update branch of [`upsert_user`]:
/// connect to the profile matching `target`, or create one from `create`.
#[derive(Clone, Debug)]
pub struct ConnectOrCreateProfile {
    pub target: ProfileKey,
    pub create: ProfileAttrs,
}

/// Profiles first, they hold the foreign key.
pub async fn reset<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    Profile::delete_many().exec(db).await?;
    User::delete_many().exec(db).await?;

    Ok(())
}

/// Inserts a user together with its profile in one transaction.
pub async fn create_user_with_profile(
    db: &DbConn,
    attrs: ProfileAttrs,
) -> Result<(user::Model, profile::Model), DbErr> {
    let txn = db.begin().await?;

    let user = user::ActiveModel {
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let profile = profile::ActiveModel {
        email: Set(attrs.email),
        name: Set(attrs.name),
        user_id: Set(user.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(
        user_id = user.id,
        profile_id = profile.id,
        "created user with profile"
    );

    Ok((user, profile))
}

/// Connects `user_id` to the profile matching `op.target`, or creates one
/// from `op.create` when nothing matches.
///
/// A matched profile that already references `user_id` is returned as-is:
/// no field is written and no row is inserted. A matched profile held by a
/// different user is re-pointed; if that user_id is already taken the
/// unique key rejects it and the error surfaces unmodified.
pub async fn connect_or_create_profile<C>(
    db: &C,
    user_id: i32,
    op: ConnectOrCreateProfile,
) -> Result<profile::Model, DbErr>
where
    C: ConnectionTrait,
{
    if let Some(existing) = Profile::find().filter(op.target.condition()).one(db).await? {
        if existing.user_id == user_id {
            tracing::debug!(
                profile_id = existing.id,
                user_id,
                "profile already connected"
            );
            return Ok(existing);
        }

        tracing::debug!(profile_id = existing.id, user_id, "re-pointing profile");
        let mut existing: profile::ActiveModel = existing.into();
        existing.user_id = Set(user_id);
        return existing.update(db).await;
    }

    tracing::debug!(user_id, "no profile matched; creating one");
    profile::ActiveModel {
        email: Set(op.create.email),
        name: Set(op.create.name),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create-if-absent-else-update keyed on `user.id`, in one transaction.
///
/// Absent: the user is inserted under `user_id` itself with a profile built
/// from `create`. Present: the update branch runs
/// [`connect_or_create_profile`], so an already-satisfied `update.target`
/// leaves the relation exactly as it was.
pub async fn upsert_user(
    db: &DbConn,
    user_id: i32,
    create: ProfileAttrs,
    update: ConnectOrCreateProfile,
) -> Result<user::Model, DbErr> {
    let txn = db.begin().await?;

    let user = match User::find_by_id(user_id).one(&txn).await? {
        Some(user) => {
            connect_or_create_profile(&txn, user.id, update).await?;
            user
        }
        None => {
            let user = user::ActiveModel { id: Set(user_id) }.insert(&txn).await?;

            profile::ActiveModel {
                email: Set(create.email),
                name: Set(create.name),
                user_id: Set(user.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            user
        }
    };

    txn.commit().await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn user_id_key_filters_on_unique_column() {
        let query = Profile::find()
            .filter(ProfileKey::UserId(42).condition())
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(query.contains(r#""profile"."user_id" = 42"#), "{query}");
    }

    #[test]
    fn email_key_filters_on_unique_column() {
        let query = Profile::find()
            .filter(ProfileKey::Email("foo@example.com".to_owned()).condition())
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(query.contains(r#""profile"."email" = 'foo@example.com'"#), "{query}");
    }
}
