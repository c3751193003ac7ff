//! [`Command`] for removing a [`Person`] from a property or unit.

use common::operations::{
    By, Commit, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        assignment::Target, person, user, Assignment, Person,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] removing a [`Person`] from a [`Target`].
///
/// Removal only deactivates the [`Assignment`] row, keeping it for history
/// and for reactivation by a later assignment of the same pair.
#[derive(Clone, Copy, Debug)]
pub struct UnassignPerson {
    /// ID of the [`User`] performing the removal.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Person`] to remove.
    pub person_id: person::Id,

    /// [`Target`] to remove the [`Person`] from.
    pub target: Target,
}

impl<Db> Command<UnassignPerson> for Service<Db>
where
    Db: Database<
            Select<By<Option<Person>, (user::Id, person::Id)>>,
            Ok = Option<Person>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Assignment>, (person::Id, Target)>>,
            Ok = Option<Assignment>,
            Err = Traced<database::Error>,
        > + Database<Update<Assignment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UnassignPerson,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignPerson {
            owner_id,
            person_id,
            target,
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

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let assignment = tx
            .execute(Select(By::<Option<Assignment>, _>::new((
                person.id, target,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|a| a.is_active)
            .ok_or(E::AssignmentNotExists)
            .map_err(tracerr::wrap!())?
            .deactivated();

        tx.execute(Update(assignment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`UnassignPerson`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// No active [`Assignment`] exists for the provided pair.
    #[display("No active `Assignment` exists for the provided pair")]
    AssignmentNotExists,

    /// [`Person`] with the provided ID does not exist or is not owned by the
    /// requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Person(id: {_0})` does not exist")]
    PersonNotExists(#[error(not(source))] person::Id),
}
