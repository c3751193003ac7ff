//! [`Command`] for creating or updating a single month [`Rental`] row.

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Money, Month, Year,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, unit, user, Rental, Unit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] creating or updating the [`Rental`] row of a [`Unit`] for a
/// single month.
///
/// At most one row exists per `(unit, month, year)`: a second upsert for the
/// same month updates the first row instead of creating another one.
#[derive(Clone, Debug)]
pub struct UpsertMonthEntry {
    /// ID of the [`User`] performing the upsert.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Unit`] the month entry belongs to.
    pub unit_id: unit::Id,

    /// [`Month`] of the entry.
    pub month: Month,

    /// [`Year`] of the entry.
    pub year: Year,

    /// Explicit rent portion of the entry.
    ///
    /// [`None`] stores a `NULL` portion, meaning the [`Unit`]'s standard
    /// monthly rent applies (also going forward, should the standard change).
    pub rent: Option<Money>,

    /// Explicit utilities portion of the entry.
    ///
    /// [`None`] stores a `NULL` portion, meaning the [`Unit`]'s standard
    /// monthly utilities apply.
    pub utilities: Option<Money>,

    /// Paid flag of the entry.
    ///
    /// [`None`] keeps the stored value on update (`false` on creation).
    pub is_paid: Option<bool>,

    /// Free-text notes of the entry.
    ///
    /// [`None`] keeps the stored value on update (empty on creation).
    pub notes: Option<rental::Notes>,
}

/// Output of the [`UpsertMonthEntry`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// The resulting [`Rental`] row.
    pub rental: Rental,

    /// Indicator whether the row was created rather than updated.
    pub created: bool,
}

impl<Db> Command<UpsertMonthEntry> for Service<Db>
where
    Db: Database<
            Select<By<Option<Unit>, (user::Id, unit::Id)>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rental>, (unit::Id, Month, Year)>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Insert<Rental>, Err = Traced<database::Error>>
        + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpsertMonthEntry,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpsertMonthEntry {
            owner_id,
            unit_id,
            month,
            year,
            rent,
            utilities,
            is_paid,
            notes,
        } = cmd;

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

        // Serializes concurrent upserts of the same `Unit`, so the
        // select-then-write below cannot produce a duplicate month row.
        tx.execute(Lock(By::new(unit.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Rental>, _>::new((
                unit.id, month, year,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let amount = total_amount(&unit, rent, utilities);

        let (rental, created) = match existing {
            Some(existing) => (
                Rental {
                    rent,
                    utilities,
                    amount,
                    is_paid: is_paid.unwrap_or(existing.is_paid),
                    notes: notes.unwrap_or_else(|| existing.notes.clone()),
                    ..existing
                },
                false,
            ),
            None => (
                Rental {
                    id: rental::Id::new(),
                    unit_id: unit.id,
                    month,
                    year,
                    rent,
                    utilities,
                    amount,
                    is_paid: is_paid.unwrap_or(false),
                    notes: notes.unwrap_or_default(),
                    created_at: DateTime::now().coerce(),
                },
                true,
            ),
        };

        if created {
            tx.execute(Insert(rental.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        } else {
            tx.execute(Update(rental.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { rental, created })
    }
}

/// Resolves the total amount of a month entry: the explicit portions fall
/// back to the `unit`'s standards, and the total is always their sum, never
/// carried over from a stored row.
fn total_amount(
    unit: &Unit,
    rent: Option<Money>,
    utilities: Option<Money>,
) -> Money {
    rent.unwrap_or(unit.monthly_rent)
        + utilities.unwrap_or_else(|| unit.standard_utilities())
}

/// Error of [`UpsertMonthEntry`] [`Command`] execution.
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

#[cfg(test)]
mod spec {
    use common::{DateTimeOf, Money};

    use crate::domain::{property, unit, Unit};

    use super::total_amount;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn unit(rent: &str, utilities: Option<&str>) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id: property::Id::new(),
            name: unit::Name::new("DG rechts").unwrap(),
            kind: unit::Kind::Apartment,
            monthly_rent: money(rent),
            monthly_utilities: utilities.map(money),
            size: None,
            is_active: true,
            created_at: DateTimeOf::<()>::now().coerce(),
        }
    }

    // The total is always the sum of the effective portions.
    #[test]
    fn total_is_sum_of_effective_portions() {
        let unit = unit("1000", Some("100"));

        assert_eq!(total_amount(&unit, None, None), money("1100"));
        assert_eq!(
            total_amount(&unit, Some(money("1200")), None),
            money("1300"),
        );
        assert_eq!(
            total_amount(&unit, None, Some(money("150"))),
            money("1150"),
        );
        assert_eq!(
            total_amount(&unit, Some(money("900")), Some(money("0"))),
            money("900"),
        );
    }

    #[test]
    fn missing_utilities_standard_counts_as_zero() {
        let unit = unit("750", None);

        assert_eq!(total_amount(&unit, None, None), money("750"));
        assert_eq!(
            total_amount(&unit, Some(money("800")), None),
            money("800"),
        );
    }
}
