//! [`Comparison`] definition.

use common::{Money, Percent};
use derive_more::{Display, Error};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};
use tracerr::Traced;

use crate::{domain::settings, Query, Service};

/// [`Query`] comparing buying a property against investing the same capital
/// into an ETF over a multi-year horizon.
///
/// Pure arithmetic over its inputs; nothing is read from or written to the
/// database.
#[derive(Clone, Copy, Debug)]
pub struct Comparison {
    /// Purchase value of the property.
    pub property_value: Money,

    /// Yearly rental income of the property.
    pub annual_rent: Money,

    /// Yearly operating expenses of the property.
    pub annual_expenses: Money,

    /// Assumed yearly appreciation rate of the property value.
    pub appreciation_rate: Percent,

    /// Assumed yearly return rate of the ETF.
    pub etf_return_rate: Percent,

    /// Horizon of the comparison.
    pub years: settings::Years,
}

/// Output of the [`Comparison`] [`Query`].
#[derive(Clone, Copy, Debug)]
pub struct Output {
    /// Property value compounded by the appreciation rate over the horizon.
    pub property_final_value: Money,

    /// Undistributed rental income accumulated over the horizon
    /// (`years × (annual_rent − annual_expenses)`).
    ///
    /// Negative when the expenses exceed the rent.
    pub property_rental_income: Decimal,

    /// Final property scenario value: compounded value plus accumulated
    /// income.
    pub property_total: Decimal,

    /// Annualized return of the property scenario, in percent (geometric
    /// mean over the horizon).
    pub property_annualized_return: Decimal,

    /// The same capital grown at the ETF rate over the horizon.
    ///
    /// Rental income is excluded from this scenario: it models investing
    /// the capital instead of buying the property at all.
    pub etf_final_value: Money,

    /// Advantage of the property scenario over the ETF scenario.
    ///
    /// Negative when the ETF comes out ahead.
    pub difference: Decimal,
}

/// Computes the [`Comparison`] [`Output`].
///
/// [`None`] is returned when the property value is zero, since no return can
/// be annualized over zero capital.
#[expect(clippy::missing_panics_doc, reason = "amounts stay non-negative")]
#[must_use]
pub fn compare(comparison: &Comparison) -> Option<Output> {
    let Comparison {
        property_value,
        annual_rent,
        annual_expenses,
        appreciation_rate,
        etf_return_rate,
        years,
    } = comparison;

    if property_value.is_zero() {
        return None;
    }
    let initial = property_value.amount();

    let growth = Decimal::ONE + appreciation_rate.fraction();
    let mut value = initial;
    for _ in 0..years.number() {
        value *= growth;
    }

    let income = (annual_rent.amount() - annual_expenses.amount())
        * Decimal::from(years.number());
    let total = value + income;

    let etf_growth = Decimal::ONE + etf_return_rate.fraction();
    let mut etf_value = initial;
    for _ in 0..years.number() {
        etf_value *= etf_growth;
    }

    Some(Output {
        property_final_value: Money::rounded(value)
            .expect("non-negative by construction"),
        property_rental_income: income.round_dp(2),
        property_total: total.round_dp(2),
        property_annualized_return: annualized_return(initial, total, *years),
        etf_final_value: Money::rounded(etf_value)
            .expect("non-negative by construction"),
        difference: (total - etf_value).round_dp(2),
    })
}

/// Annualizes the growth from `initial` to `total` over the `years` horizon
/// as the geometric mean, in percent.
///
/// A scenario losing the entire capital (or more) annualizes to `-100`.
fn annualized_return(
    initial: Decimal,
    total: Decimal,
    years: settings::Years,
) -> Decimal {
    let ratio = total / initial;
    if ratio <= Decimal::ZERO {
        return -Decimal::ONE_HUNDRED;
    }

    // The n-th root has no exact decimal representation; `f64` precision is
    // fine for a presentational rate.
    let ratio = ratio.to_f64().expect("`Decimal` to `f64` never fails");
    let rate = (ratio.powf(1. / f64::from(years.number())) - 1.) * 100.;

    Decimal::from_f64(rate)
        .expect("finite by construction")
        .round_dp(4)
}

impl<Db> Query<Comparison> for Service<Db> {
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Comparison) -> Result<Self::Ok, Self::Err> {
        compare(&query)
            .ok_or(ExecutionError::ZeroPropertyValue)
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`Comparison`] [`Query`] execution.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ExecutionError {
    /// Provided property value is zero.
    #[display("Cannot compare investments over a zero property value")]
    ZeroPropertyValue,
}

#[cfg(test)]
mod spec {
    use common::{Money, Percent};
    use rust_decimal::Decimal;

    use crate::domain::settings;

    use super::{compare, Comparison};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn comparison(years: u16) -> Comparison {
        Comparison {
            property_value: money("100000"),
            annual_rent: money("12000"),
            annual_expenses: money("2000"),
            appreciation_rate: "2".parse::<Percent>().unwrap(),
            etf_return_rate: "7".parse::<Percent>().unwrap(),
            years: settings::Years::new(years).unwrap(),
        }
    }

    #[test]
    fn single_year_comparison() {
        let output = compare(&comparison(1)).unwrap();

        assert_eq!(output.property_final_value, money("102000"));
        assert_eq!(output.property_rental_income, decimal("10000"));
        assert_eq!(output.property_total, decimal("112000"));
        assert_eq!(output.etf_final_value, money("107000"));
        assert_eq!(output.difference, decimal("5000"));
        assert_eq!(output.property_annualized_return, decimal("12"));
    }

    #[test]
    fn compounds_yearly_over_the_horizon() {
        let output = compare(&comparison(2)).unwrap();

        assert_eq!(output.property_final_value, money("104040"));
        assert_eq!(output.property_rental_income, decimal("20000"));
        assert_eq!(output.property_total, decimal("124040"));
        assert_eq!(output.etf_final_value, money("114490"));
        assert_eq!(output.difference, decimal("9550"));

        // sqrt(1.2404) − 1 ≈ 11.37%.
        let annualized = output.property_annualized_return;
        assert!(annualized > decimal("11.37"));
        assert!(annualized < decimal("11.38"));
    }

    // The ETF branch grows the capital only: rental income never leaks into
    // it.
    #[test]
    fn etf_scenario_excludes_rental_income() {
        let mut cmp = comparison(10);
        cmp.etf_return_rate = cmp.appreciation_rate;

        let output = compare(&cmp).unwrap();

        assert_eq!(
            output.etf_final_value,
            output.property_final_value,
        );
        assert_eq!(output.difference, output.property_rental_income);
    }

    #[test]
    fn negative_net_income_accumulates() {
        let mut cmp = comparison(3);
        cmp.annual_expenses = money("15000");

        let output = compare(&cmp).unwrap();

        assert_eq!(output.property_rental_income, decimal("-9000"));
    }

    #[test]
    fn zero_property_value_is_rejected() {
        let mut cmp = comparison(5);
        cmp.property_value = Money::ZERO;

        assert!(compare(&cmp).is_none());
    }
}
