//! [`Command`] for creating a new [`Person`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::person::{Email, Name, Notes, Phone};
use crate::{
    domain::{person, user, Person},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Person`].
#[derive(Clone, Debug)]
pub struct CreatePerson {
    /// ID of the [`User`] owning the new [`Person`] record.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// First [`Name`] of a new [`Person`].
    pub first_name: person::Name,

    /// Last [`Name`] of a new [`Person`].
    pub last_name: person::Name,

    /// [`Email`] of a new [`Person`].
    pub email: Option<person::Email>,

    /// [`Phone`] of a new [`Person`].
    pub phone: Option<person::Phone>,

    /// Free-text [`Notes`] about a new [`Person`].
    pub notes: person::Notes,
}

impl<Db> Command<CreatePerson> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Person>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Person;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePerson) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePerson {
            owner_id,
            first_name,
            last_name,
            email,
            phone,
            notes,
        } = cmd;

        let person = Person {
            id: person::Id::new(),
            owner_id,
            first_name,
            last_name,
            email,
            phone,
            notes,
            is_active: true,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(person.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(person)
    }
}

/// Error of [`CreatePerson`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
