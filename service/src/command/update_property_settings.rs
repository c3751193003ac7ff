//! [`Command`] for persisting the valuation [`Settings`] of a [`Property`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Percent,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{property, settings, user, Property, Settings},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] persisting the valuation and investment-comparison
/// [`Settings`] of a [`Property`], so the calculators reopen with the same
/// assumptions.
///
/// The row is upserted: one row per [`Property`] at most.
#[derive(Clone, Copy, Debug)]
pub struct UpdatePropertySettings {
    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Property`] the [`Settings`] belong to.
    pub property_id: property::Id,

    /// Gross rent [`settings::Multiplier`] to persist.
    pub gross_rent_multiplier: settings::Multiplier,

    /// Operating expense ratio to persist. Must be within `0..=100`.
    pub operating_expense_ratio: Percent,

    /// Value adjustment to persist.
    pub value_adjustment: Percent,

    /// Appreciation rate to persist.
    pub appreciation_rate: Percent,

    /// ETF return rate to persist.
    pub etf_return_rate: Percent,

    /// Comparison horizon to persist.
    pub comparison_years: settings::Years,
}

impl<Db> Command<UpdatePropertySettings> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, (user::Id, property::Id)>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Settings>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Settings;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePropertySettings,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePropertySettings {
            owner_id,
            property_id,
            gross_rent_multiplier,
            operating_expense_ratio,
            value_adjustment,
            appreciation_rate,
            etf_return_rate,
            comparison_years,
        } = cmd;

        let ratio = operating_expense_ratio.value();
        if ratio < Decimal::ZERO || ratio > Decimal::ONE_HUNDRED {
            return Err(tracerr::new!(E::InvalidExpenseRatio));
        }

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new((
                owner_id,
                property_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let settings = Settings {
            property_id: property.id,
            gross_rent_multiplier,
            operating_expense_ratio,
            value_adjustment,
            appreciation_rate,
            etf_return_rate,
            comparison_years,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(settings))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(settings)
    }
}

/// Error of [`UpdatePropertySettings`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided operating expense ratio is outside the `0..=100` range.
    #[display("Operating expense ratio must be within `0..=100`")]
    InvalidExpenseRatio,

    /// [`Property`] with the provided ID does not exist or is not owned by
    /// the requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}
