//! [`Command`] for updating a [`Person`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
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

/// [`Command`] for updating the details of a [`Person`].
///
/// Omitted fields keep their stored values. Setting `is_active` to `false`
/// soft-deactivates the [`Person`] without touching its assignments.
#[derive(Clone, Debug)]
pub struct UpdatePerson {
    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Person`] to update.
    pub person_id: person::Id,

    /// New first [`Name`] of the [`Person`].
    pub first_name: Option<person::Name>,

    /// New last [`Name`] of the [`Person`].
    pub last_name: Option<person::Name>,

    /// New [`Email`] of the [`Person`].
    pub email: Option<person::Email>,

    /// New [`Phone`] of the [`Person`].
    pub phone: Option<person::Phone>,

    /// New free-text [`Notes`] about the [`Person`].
    pub notes: Option<person::Notes>,

    /// New active flag of the [`Person`].
    pub is_active: Option<bool>,
}

impl<Db> Command<UpdatePerson> for Service<Db>
where
    Db: Database<
            Select<By<Option<Person>, (user::Id, person::Id)>>,
            Ok = Option<Person>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Update<Person>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Person;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdatePerson) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePerson {
            owner_id,
            person_id,
            first_name,
            last_name,
            email,
            phone,
            notes,
            is_active,
        } = cmd;

        let person = self
            .database()
            .execute(Select(By::<Option<Person>, _>::new((
                owner_id, person_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PersonNotExists(person_id))
            .map_err(tracerr::wrap!())?;

        let person = Person {
            first_name: first_name.unwrap_or(person.first_name),
            last_name: last_name.unwrap_or(person.last_name),
            email: email.or(person.email),
            phone: phone.or(person.phone),
            notes: notes.unwrap_or(person.notes),
            is_active: is_active.unwrap_or(person.is_active),
            ..person
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(person.clone()))
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

/// Error of [`UpdatePerson`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Person`] with the provided ID does not exist or is not owned by the
    /// requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Person(id: {_0})` does not exist")]
    PersonNotExists(#[error(not(source))] person::Id),
}
