//! [`Valuation`] definition.

use common::{
    operations::{By, Select},
    Money, Percent,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{property, settings, user, Property, Settings, Unit},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] estimating the value of a [`Property`] with the gross rent
/// multiplier method.
///
/// The estimate is derived from the standard monthly rents of the
/// [`Property`]'s active [`Unit`]s. Parameters default to the persisted
/// [`Settings`] of the [`Property`] (or [`Settings::defaults()`] without a
/// persisted row).
#[derive(Clone, Copy, Debug)]
pub struct Valuation {
    /// ID of the [`User`] requesting the valuation.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`Property`] to evaluate.
    pub property_id: property::Id,

    /// Explicit [`Parameters`] overriding the persisted [`Settings`].
    pub parameters: Option<Parameters>,
}

/// Parameters of a [`Valuation`].
#[derive(Clone, Copy, Debug)]
pub struct Parameters {
    /// Gross rent multiplier applied to the yearly rent.
    pub gross_rent_multiplier: settings::Multiplier,

    /// Share of the yearly rent consumed by operating expenses.
    ///
    /// Within the `0..=100` range.
    pub operating_expense_ratio: Percent,

    /// Manual adjustment applied to the estimated value.
    pub value_adjustment: Percent,
}

impl Parameters {
    /// Creates new [`Parameters`], checking the `operating_expense_ratio` is
    /// within the `0..=100` range.
    #[must_use]
    pub fn new(
        gross_rent_multiplier: settings::Multiplier,
        operating_expense_ratio: Percent,
        value_adjustment: Percent,
    ) -> Option<Self> {
        let ratio = operating_expense_ratio.value();
        (ratio >= Decimal::ZERO && ratio <= Decimal::ONE_HUNDRED).then_some(
            Self {
                gross_rent_multiplier,
                operating_expense_ratio,
                value_adjustment,
            },
        )
    }
}

impl From<&Settings> for Parameters {
    fn from(settings: &Settings) -> Self {
        Self {
            gross_rent_multiplier: settings.gross_rent_multiplier,
            operating_expense_ratio: settings.operating_expense_ratio,
            value_adjustment: settings.value_adjustment,
        }
    }
}

/// Output of the [`Valuation`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Evaluated [`Property`].
    pub property: Property,

    /// [`Parameters`] the valuation was computed with.
    pub parameters: Parameters,

    /// Computed [`Evaluation`].
    ///
    /// [`None`] if the [`Property`] has no active [`Unit`]s with rent, making
    /// an estimate impossible.
    pub evaluation: Option<Evaluation>,
}

/// Computed result of a [`Valuation`].
#[derive(Clone, Copy, Debug)]
pub struct Evaluation {
    /// Sum of standard monthly rent and utilities over active [`Unit`]s.
    pub total_monthly_rent: Money,

    /// [`Evaluation::total_monthly_rent`] times 12.
    pub total_yearly_rent: Money,

    /// Yearly rent reduced by the operating expense ratio.
    pub net_operating_income: Money,

    /// Yearly rent times the gross rent multiplier.
    pub estimated_value: Money,

    /// [`Evaluation::estimated_value`] with the manual adjustment applied.
    pub adjusted_value: Money,

    /// Capitalization rate implied by the multiplier, in percent.
    pub implied_cap_rate: Decimal,

    /// Fixed ±10% band around the adjusted value.
    pub value_range: ValueRange,
}

/// Value range of an [`Evaluation`].
#[derive(Clone, Copy, Debug)]
pub struct ValueRange {
    /// Lower bound of the range.
    pub low: Money,

    /// Upper bound of the range.
    pub high: Money,
}

/// Sums the standard monthly rent and utilities over the active `units`.
#[must_use]
pub fn total_monthly_rent(units: &[Unit]) -> Money {
    units
        .iter()
        .filter(|u| u.is_active)
        .map(Unit::standard_total)
        .sum()
}

/// Computes the [`Evaluation`] of a property with the given total monthly
/// rent under the given [`Parameters`].
///
/// [`None`] is returned when the total rent is zero, since the gross rent
/// multiplier method is undefined without rent.
#[expect(clippy::missing_panics_doc, reason = "amounts stay non-negative")]
#[must_use]
pub fn evaluate(
    total_monthly_rent: Money,
    parameters: &Parameters,
) -> Option<Evaluation> {
    if total_monthly_rent.is_zero() {
        return None;
    }

    let monthly = total_monthly_rent.amount();
    let yearly = monthly * Decimal::from(12);
    let noi = yearly
        * (Decimal::ONE - parameters.operating_expense_ratio.fraction());
    let estimated = yearly * parameters.gross_rent_multiplier.value();
    let adjusted =
        estimated * (Decimal::ONE + parameters.value_adjustment.fraction());
    // `estimated > 0` holds since both the rent and the multiplier are
    // positive.
    let cap_rate = noi / estimated * Decimal::ONE_HUNDRED;

    let money = |amount: Decimal| {
        Money::rounded(amount).expect("non-negative by construction")
    };
    Some(Evaluation {
        total_monthly_rent,
        total_yearly_rent: money(yearly),
        net_operating_income: money(noi),
        estimated_value: money(estimated),
        adjusted_value: money(adjusted),
        implied_cap_rate: cap_rate.round_dp(4),
        value_range: ValueRange {
            low: money(adjusted * Decimal::new(9, 1)),
            high: money(adjusted * Decimal::new(11, 1)),
        },
    })
}

impl<Db> Query<Valuation> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, (user::Id, property::Id)>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Settings>, property::Id>>,
            Ok = Option<Settings>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Unit>, property::Id>>,
            Ok = Vec<Unit>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Valuation) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Valuation {
            owner_id,
            property_id,
            parameters,
        } = query;

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

        let parameters = match parameters {
            Some(parameters) => parameters,
            None => self
                .database()
                .execute(Select(By::<Option<Settings>, _>::new(property.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .as_ref()
                .map_or_else(
                    || (&Settings::defaults(property.id)).into(),
                    Into::into,
                ),
        };

        let units = self
            .database()
            .execute(Select(By::<Vec<Unit>, _>::new(property.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let evaluation = evaluate(total_monthly_rent(&units), &parameters);

        Ok(Output {
            property,
            parameters,
            evaluation,
        })
    }
}

/// Error of [`Valuation`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist or is not owned by
    /// the requesting [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}

#[cfg(test)]
mod spec {
    use common::{DateTimeOf, Money, Percent};
    use rust_decimal::Decimal;

    use crate::domain::{property, settings, unit, Unit};

    use super::{evaluate, total_monthly_rent, Parameters};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn parameters(multiplier: &str, ratio: &str, adjustment: &str) -> Parameters {
        Parameters::new(
            multiplier.parse::<settings::Multiplier>().unwrap(),
            ratio.parse::<Percent>().unwrap(),
            adjustment.parse::<Percent>().unwrap(),
        )
        .unwrap()
    }

    fn unit(rent: &str, utilities: Option<&str>, is_active: bool) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id: property::Id::new(),
            name: unit::Name::new("1. OG").unwrap(),
            kind: unit::Kind::Apartment,
            monthly_rent: money(rent),
            monthly_utilities: utilities.map(money),
            size: None,
            is_active,
            created_at: DateTimeOf::<()>::now().coerce(),
        }
    }

    #[test]
    fn evaluates_single_unit_property() {
        let evaluation =
            evaluate(money("1000"), &parameters("12", "25", "0")).unwrap();

        assert_eq!(evaluation.total_yearly_rent, money("12000"));
        assert_eq!(evaluation.estimated_value, money("144000"));
        assert_eq!(evaluation.net_operating_income, money("9000"));
        assert_eq!(evaluation.adjusted_value, money("144000"));
        assert_eq!(evaluation.implied_cap_rate, decimal("6.25"));
        assert_eq!(evaluation.value_range.low, money("129600"));
        assert_eq!(evaluation.value_range.high, money("158400"));
    }

    #[test]
    fn applies_value_adjustment() {
        let evaluation =
            evaluate(money("1000"), &parameters("12", "25", "10")).unwrap();

        assert_eq!(evaluation.estimated_value, money("144000"));
        assert_eq!(evaluation.adjusted_value, money("158400"));
        assert_eq!(evaluation.value_range.low, money("142560"));
        assert_eq!(evaluation.value_range.high, money("174240"));
    }

    // The gross rent multiplier method is undefined without rent, so a
    // zero-rent property yields no evaluation instead of dividing by zero.
    #[test]
    fn zero_rent_yields_no_evaluation() {
        assert!(evaluate(Money::ZERO, &parameters("12", "25", "0")).is_none());
    }

    #[test]
    fn sums_active_units_only() {
        let units = [
            unit("1000", Some("100"), true),
            unit("500", None, true),
            unit("9999", Some("999"), false),
        ];

        assert_eq!(total_monthly_rent(&units), money("1600"));
    }

    #[test]
    fn rejects_expense_ratio_above_hundred() {
        assert!(Parameters::new(
            "12".parse().unwrap(),
            "150".parse::<Percent>().unwrap(),
            Percent::ZERO,
        )
        .is_none());
    }
}
