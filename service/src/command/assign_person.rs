//! [`Command`] for assigning a [`Person`] to a property or unit.

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        assignment::{self, Target},
        person, property, unit, user, Assignment, Person, Property, Unit,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] assigning a [`Person`] to a [`Target`] with the provided
/// role.
///
/// A single upsert transition: an existing row of the same
/// `(person, target)` pair (active or previously removed) is reused with the
/// role overwritten, so repeated assignments can never violate the pair
/// uniqueness.
#[derive(Clone, Debug)]
pub struct AssignPerson {
    /// ID of the [`User`] performing the assignment.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Person`] to assign.
    pub person_id: person::Id,

    /// [`Target`] to assign the [`Person`] to.
    pub target: Target,

    /// [`assignment::Role`] of the [`Person`] within the [`Target`].
    pub role: assignment::Role,
}

impl<Db> Command<AssignPerson> for Service<Db>
where
    Db: Database<
            Select<By<Option<Person>, (user::Id, person::Id)>>,
            Ok = Option<Person>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, (user::Id, property::Id)>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, (user::Id, unit::Id)>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Assignment>, (person::Id, Target)>>,
            Ok = Option<Assignment>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Person, person::Id>>, Err = Traced<database::Error>>
        + Database<Insert<Assignment>, Err = Traced<database::Error>>
        + Database<Update<Assignment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AssignPerson) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignPerson {
            owner_id,
            person_id,
            target,
            role,
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

        match target {
            Target::Property(property_id) => self
                .database()
                .execute(Select(By::<Option<Property>, _>::new((
                    owner_id,
                    property_id,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::PropertyNotExists(property_id))
                .map_err(tracerr::wrap!())
                .map(drop)?,
            Target::Unit(unit_id) => self
                .database()
                .execute(Select(By::<Option<Unit>, _>::new((
                    owner_id, unit_id,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UnitNotExists(unit_id))
                .map_err(tracerr::wrap!())
                .map(drop)?,
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes concurrent assignments of the same `Person`, so the
        // select-then-write below cannot produce a duplicate pair row.
        tx.execute(Lock(By::new(person.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Assignment>, _>::new((
                person.id, target,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let reused = existing.is_some();
        let assignment =
            Assignment::assign(existing, person.id, target, role);

        if reused {
            tx.execute(Update(assignment.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        } else {
            tx.execute(Insert(assignment.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`AssignPerson`] [`Command`] execution.
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

    /// [`Property`] with the provided ID does not exist or is not owned by
    /// the requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Unit`] with the provided ID does not exist or is not owned by the
    /// requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Unit(id: {_0})` does not exist")]
    UnitNotExists(#[error(not(source))] unit::Id),
}
