//! [`Money`]-related definitions.

use std::{iter::Sum, ops, str::FromStr};

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Non-negative amount of money with a minor-unit (cent) precision.
///
/// The application is single-currency, so no currency tag is carried around.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// [`Money`] amount of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] amount if the given `amount` is non-negative
    /// and has no sub-cent fraction.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO && amount == amount.round_dp(2))
            .then_some(Self(amount))
    }

    /// Creates a new [`Money`] amount without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided `amount` must be non-negative with at most two decimal
    /// places.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a new [`Money`] amount by rounding the given `amount` to the
    /// cent precision (bankers' rounding).
    ///
    /// [`None`] is returned if the `amount` is negative.
    #[must_use]
    pub fn rounded(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then(|| Self(amount.round_dp(2)))
    }

    /// Returns the inner [`Decimal`] amount of this [`Money`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Money` amount")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative money amount in `{major}.{minor}` decimal format with at
    /// most two decimal places.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("1234.56").unwrap().amount(),
            decimal("1234.56"),
        );
        assert_eq!(Money::from_str("0").unwrap(), Money::ZERO);
        assert_eq!(Money::from_str("100").unwrap().amount(), decimal("100"));

        assert!(Money::from_str("-1").is_err());
        assert!(Money::from_str("1.999").is_err());
        assert!(Money::from_str("1,5").is_err());
        assert!(Money::from_str("EUR").is_err());
    }

    #[test]
    fn rejects_sub_cent_fraction() {
        assert!(Money::new(decimal("10.001")).is_none());
        assert!(Money::new(decimal("-0.01")).is_none());
        assert!(Money::new(decimal("10.01")).is_some());
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(
            Money::rounded(decimal("129600.000")).unwrap().amount(),
            decimal("129600.00"),
        );
        assert_eq!(
            Money::rounded(decimal("10.005")).unwrap().amount(),
            decimal("10.00"),
        );
        assert!(Money::rounded(decimal("-1")).is_none());
    }

    #[test]
    fn adds_and_sums() {
        let a = Money::from_str("1000").unwrap();
        let b = Money::from_str("100.50").unwrap();
        assert_eq!((a + b).amount(), decimal("1100.50"));
        assert_eq!(
            [a, b, Money::ZERO].into_iter().sum::<Money>().amount(),
            decimal("1100.50"),
        );
    }
}
