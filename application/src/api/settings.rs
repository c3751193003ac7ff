//! [`Settings`]-related definitions.

use common::Percent;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;

use crate::{
    api::{self, scalar},
    Context,
};

/// Valuation and investment-comparison settings of a `Property`.
#[derive(Clone, Copy, Debug, From)]
pub struct Settings(domain::Settings);

/// Valuation and investment-comparison settings of a `Property`.
///
/// Persisted per property, so the calculators reopen with the owner's
/// last-chosen assumptions.
#[graphql_object(context = Context)]
impl Settings {
    /// `Property` these settings belong to.
    #[must_use]
    pub fn property_id(&self) -> api::property::Id {
        self.0.property_id.into()
    }

    /// Gross rent multiplier used for the valuation.
    #[must_use]
    pub fn gross_rent_multiplier(&self) -> Multiplier {
        self.0.gross_rent_multiplier.into()
    }

    /// Share of the yearly rent consumed by operating expenses.
    #[must_use]
    pub fn operating_expense_ratio(&self) -> Percent {
        self.0.operating_expense_ratio
    }

    /// Manual adjustment applied to the estimated value.
    #[must_use]
    pub fn value_adjustment(&self) -> Percent {
        self.0.value_adjustment
    }

    /// Assumed yearly appreciation rate of the property value.
    #[must_use]
    pub fn appreciation_rate(&self) -> Percent {
        self.0.appreciation_rate
    }

    /// Assumed yearly return rate of the alternative ETF investment.
    #[must_use]
    pub fn etf_return_rate(&self) -> Percent {
        self.0.etf_return_rate
    }

    /// Horizon of the investment comparison, in years.
    #[must_use]
    pub fn comparison_years(&self) -> i32 {
        i32::from(self.0.comparison_years.number())
    }
}

/// Gross rent multiplier: how many yearly rents a property is worth.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GrossRentMultiplier",
    with = scalar::Via::<domain::settings::Multiplier>,
)]
pub struct Multiplier(domain::settings::Multiplier);
