//! [`Settings`] definitions.

use std::str::FromStr;

use common::Percent;
use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::domain::property;

/// Valuation and investment-comparison parameters persisted per [`Property`],
/// so the calculators reopen with the owner's last-chosen assumptions.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    /// ID of the [`Property`] these [`Settings`] belong to.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// Gross rent [`Multiplier`] used for the valuation.
    pub gross_rent_multiplier: Multiplier,

    /// Share of the yearly rent consumed by operating expenses.
    pub operating_expense_ratio: Percent,

    /// Manual adjustment applied to the estimated value.
    pub value_adjustment: Percent,

    /// Assumed yearly appreciation rate of the property value.
    pub appreciation_rate: Percent,

    /// Assumed yearly return rate of the alternative ETF investment.
    pub etf_return_rate: Percent,

    /// Horizon of the investment comparison, in [`Years`].
    pub comparison_years: Years,
}

impl Settings {
    /// Returns the default [`Settings`] of a [`Property`] without a persisted
    /// row yet.
    ///
    /// [`Property`]: crate::domain::Property
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn defaults(property_id: property::Id) -> Self {
        Self {
            property_id,
            gross_rent_multiplier: Multiplier::new(Decimal::from(25))
                .expect("in range"),
            operating_expense_ratio: Percent::new(Decimal::from(20))
                .expect("in range"),
            value_adjustment: Percent::ZERO,
            appreciation_rate: Percent::new(Decimal::from(2))
                .expect("in range"),
            etf_return_rate: Percent::new(Decimal::from(7)).expect("in range"),
            comparison_years: Years::new(10).expect("in range"),
        }
    }
}

/// Gross rent multiplier: how many yearly rents the property is worth.
///
/// Guaranteed to be positive and at most `1000`.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Multiplier(Decimal);

impl Multiplier {
    /// Creates a new [`Multiplier`] by checking the provided value is within
    /// the `(0, 1000]` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (val > Decimal::ZERO && val <= Decimal::ONE_THOUSAND)
            .then_some(Self(val))
    }

    /// Creates a new [`Multiplier`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be within the `(0, 1000]` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Returns the inner [`Decimal`] value of this [`Multiplier`].
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Multiplier {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Multiplier` value")
    }
}

/// Whole number of years, within the `1..=100` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Years(u16);

impl Years {
    /// Creates a new [`Years`] if the given `years` are within the `1..=100`
    /// range.
    #[must_use]
    pub fn new(years: u16) -> Option<Self> {
        (1..=100).contains(&years).then_some(Self(years))
    }

    /// Creates a new [`Years`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided `years` must be within the `1..=100` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(years: u16) -> Self {
        Self(years)
    }

    /// Returns the number of this [`Years`].
    #[must_use]
    pub const fn number(&self) -> u16 {
        self.0
    }
}

impl TryFrom<i32> for Years {
    type Error = &'static str;

    fn try_from(years: i32) -> Result<Self, Self::Error> {
        u16::try_from(years)
            .ok()
            .and_then(Self::new)
            .ok_or("`Years` must be within `1..=100`")
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    //! Module providing integration with [`postgres_types`] crate.

    use std::error::Error as StdError;

    use postgres_types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    };

    use super::Years;

    impl FromSql<'_> for Years {
        accepts!(INT4);

        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            u16::try_from(i32::from_sql(ty, raw)?)
                .ok()
                .and_then(Self::new)
                .ok_or_else(|| "invalid `Years` value".into())
        }
    }

    impl ToSql for Years {
        accepts!(INT4);
        to_sql_checked!();

        fn to_sql(
            &self,
            ty: &Type,
            w: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
            i32::from(self.0).to_sql(ty, w)
        }
    }
}
