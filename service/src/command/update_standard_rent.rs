//! [`Command`] for changing the standard rent of a [`Unit`] going forward.

use common::{
    operations::{
        By, Commit, Lock, Select, Transact, Transacted, Update,
    },
    Money, YearMonth,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{unit, user, Rental, Unit},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] updating the standard monthly rent/utilities of a [`Unit`]
/// effective from a given month, protecting previously customized months
/// from a silent overwrite.
///
/// Stored [`Rental`] rows at or after `effective_from` whose explicit
/// portions differ from the [`Unit`]'s current standard block the change:
/// the command returns [`Outcome::Conflict`] listing them, and the caller
/// resubmits with `force_update` set to overwrite them (destructively) or
/// abandons the change. The blocked state is never persisted.
#[derive(Clone, Copy, Debug)]
pub struct UpdateStandardRent {
    /// ID of the [`User`] performing the change.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Unit`] to change.
    pub unit_id: unit::Id,

    /// New standard monthly rent. Must be positive.
    pub monthly_rent: Money,

    /// New standard monthly utilities, if any.
    pub monthly_utilities: Option<Money>,

    /// First [`YearMonth`] the new standard applies to.
    pub effective_from: YearMonth,

    /// Overwrites conflicting customized months instead of aborting.
    pub force_update: bool,
}

/// Outcome of the [`UpdateStandardRent`] [`Command`].
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The change has been applied; carries the updated [`Unit`].
    Applied(Unit),

    /// The change was blocked by previously customized months.
    ///
    /// Nothing has been written; carries the rows an overwrite would affect,
    /// with their current and would-be totals.
    Conflict(Vec<read::rental::AffectedRental>),
}

impl<Db> Command<UpdateStandardRent> for Service<Db>
where
    Db: Database<
            Select<By<Option<Unit>, (user::Id, unit::Id)>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Rental>, (unit::Id, YearMonth)>>,
            Ok = Vec<Rental>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Update<Unit>, Err = Traced<database::Error>>
        + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateStandardRent,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateStandardRent {
            owner_id,
            unit_id,
            monthly_rent,
            monthly_utilities,
            effective_from,
            force_update,
        } = cmd;

        if monthly_rent.is_zero() {
            return Err(tracerr::new!(E::NonPositiveRent));
        }

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

        // Serializes against concurrent month upserts of the same `Unit`.
        tx.execute(Lock(By::new(unit.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let stored = tx
            .execute(Select(By::<Vec<Rental>, _>::new((
                unit.id,
                effective_from,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let affected = read::rental::propagation_conflicts(
            &unit,
            &stored,
            effective_from,
            monthly_rent,
            monthly_utilities,
        );

        if !affected.is_empty() && !force_update {
            tracing::debug!(
                unit_id = %unit.id,
                conflicts = affected.len(),
                "standard rent change blocked by customized months",
            );
            // Read-only so far, so dropping the transaction is fine.
            return Ok(Outcome::Conflict(affected));
        }

        let unit = Unit {
            monthly_rent,
            monthly_utilities,
            ..unit
        };
        tx.execute(Update(unit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Forcing pins the conflicting rows to the new standard explicitly.
        for affected in affected {
            let rental = Rental {
                rent: Some(monthly_rent),
                utilities: monthly_utilities,
                amount: affected.new_amount,
                ..affected.rental
            };
            tx.execute(Update(rental))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Outcome::Applied(unit))
    }
}

/// Error of [`UpdateStandardRent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided standard monthly rent is not positive.
    #[display("Standard monthly rent must be positive")]
    NonPositiveRent,

    /// [`Unit`] with the provided ID does not exist or is not owned by the
    /// requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Unit(id: {_0})` does not exist")]
    UnitNotExists(#[error(not(source))] unit::Id),
}
