//! [`Command`] for deleting a [`Unit`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{unit, user, Unit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Unit`].
///
/// Deletion is hard and cascades to the [`Unit`]'s [`Rental`]s and person
/// assignments.
#[derive(Clone, Copy, Debug)]
pub struct DeleteUnit {
    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Unit`] to delete.
    pub unit_id: unit::Id,
}

impl<Db> Command<DeleteUnit> for Service<Db>
where
    Db: Database<
            Select<By<Option<Unit>, (user::Id, unit::Id)>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Lock<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Delete<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteUnit { owner_id, unit_id } = cmd;

        let unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new((owner_id, unit_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Unit`.
        tx.execute(Lock(By::new(unit.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Delete(By::<Unit, _>::new(unit.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(())
    }
}

/// Error of [`DeleteUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Unit`] with the provided ID does not exist or is not owned by the
    /// requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Unit(id: {_0})` does not exist")]
    UnitNotExists(#[error(not(source))] unit::Id),
}
