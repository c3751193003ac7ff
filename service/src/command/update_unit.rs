//! [`Command`] for updating the details of a [`Unit`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::command::UpdateStandardRent;
#[cfg(doc)]
use crate::domain::unit::{Kind, Name, Size};
use crate::{
    domain::{unit, user, Unit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the details of a [`Unit`].
///
/// Omitted fields keep their stored values. The standard monthly
/// rent/utilities are not updatable here: changing them goes through
/// [`UpdateStandardRent`] with its conflict protection.
#[derive(Clone, Debug)]
pub struct UpdateUnit {
    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Unit`] to update.
    pub unit_id: unit::Id,

    /// New [`Name`] of the [`Unit`].
    pub name: Option<unit::Name>,

    /// New [`Kind`] of the [`Unit`].
    pub kind: Option<unit::Kind>,

    /// New free-text [`Size`] of the [`Unit`].
    pub size: Option<unit::Size>,

    /// New active flag of the [`Unit`].
    pub is_active: Option<bool>,
}

impl<Db> Command<UpdateUnit> for Service<Db>
where
    Db: Database<
            Select<By<Option<Unit>, (user::Id, unit::Id)>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Update<Unit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Unit;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUnit {
            owner_id,
            unit_id,
            name,
            kind,
            size,
            is_active,
        } = cmd;

        let unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new((owner_id, unit_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        let unit = Unit {
            name: name.unwrap_or(unit.name),
            kind: kind.unwrap_or(unit.kind),
            size: size.or(unit.size),
            is_active: is_active.unwrap_or(unit.is_active),
            ..unit
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(unit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(unit)
    }
}

/// Error of [`UpdateUnit`] [`Command`] execution.
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
