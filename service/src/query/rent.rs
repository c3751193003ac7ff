//! [`Query`] for the yearly rent overview of a [`Unit`].

use common::{
    operations::{By, Select},
    Year,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{unit, user, Rental, Unit},
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// [`Query`] producing the complete 12-month rent overview of a [`Unit`] for
/// a single year.
///
/// Months without a stored [`Rental`] row are synthesized from the [`Unit`]'s
/// standard rent/utilities; a [`Unit`] without any stored rows yields 12
/// synthesized entries rather than an error.
#[derive(Clone, Copy, Debug)]
pub struct YearlyOverview {
    /// ID of the [`User`] requesting the overview.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Unit`] to produce the overview for.
    pub unit_id: unit::Id,

    /// [`Year`] to produce the overview for.
    ///
    /// Defaults to the current calendar year.
    pub year: Option<Year>,
}

/// Output of the [`YearlyOverview`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Unit`] the overview belongs to, in its current state.
    pub unit: Unit,

    /// [`Year`] the overview was resolved for.
    pub year: Year,

    /// The 12 [`read::rental::MonthEntry`]s, months `1..=12` in order.
    pub entries: Vec<read::rental::MonthEntry>,
}

impl<Db> Query<YearlyOverview> for Service<Db>
where
    Db: Database<
            Select<By<Option<Unit>, (user::Id, unit::Id)>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Rental>, (unit::Id, Year)>>,
            Ok = Vec<Rental>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: YearlyOverview,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let YearlyOverview {
            owner_id,
            unit_id,
            year,
        } = query;
        let year = year.unwrap_or_else(Year::current);

        let unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new((owner_id, unit_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        let rentals = self
            .database()
            .execute(Select(By::<Vec<Rental>, _>::new((unit.id, year))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let entries = read::rental::reconcile(&unit, &rentals, year);

        Ok(Output {
            unit,
            year,
            entries,
        })
    }
}

/// Error of [`YearlyOverview`] [`Query`] execution.
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
