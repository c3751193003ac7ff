//! Financial report definitions.

use common::{Money, Percent};
use derive_more::From;
use juniper::graphql_object;
use service::query::report::{investment, valuation};

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// Result of the `evaluateProperty` query.
#[derive(Clone, Debug)]
pub struct Valuation {
    /// Evaluated `Property`.
    property: api::Property,

    /// Parameters the valuation was computed with.
    parameters: valuation::Parameters,

    /// Computed evaluation, if an estimate was possible.
    evaluation: Option<Evaluation>,
}

/// Estimated value of a `Property` by the gross rent multiplier method.
#[graphql_object(name = "PropertyValuation", context = Context)]
impl Valuation {
    /// Evaluated `Property`.
    #[must_use]
    pub fn property(&self) -> &api::Property {
        &self.property
    }

    /// Parameters the valuation was computed with.
    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.parameters.into()
    }

    /// Computed evaluation.
    ///
    /// `null` when the `Property` has no active `Unit`s with rent, making an
    /// estimate impossible.
    #[must_use]
    pub fn evaluation(&self) -> &Option<Evaluation> {
        &self.evaluation
    }
}

impl From<valuation::Output> for Valuation {
    fn from(output: valuation::Output) -> Self {
        let valuation::Output {
            property,
            parameters,
            evaluation,
        } = output;
        Self {
            property: property.into(),
            parameters,
            evaluation: evaluation.map(Into::into),
        }
    }
}

/// Parameters of a `PropertyValuation`.
#[derive(Clone, Copy, Debug, From)]
pub struct Parameters(valuation::Parameters);

/// Parameters of a `PropertyValuation`.
#[graphql_object(name = "ValuationParameters", context = Context)]
impl Parameters {
    /// Gross rent multiplier applied to the yearly rent.
    #[must_use]
    pub fn gross_rent_multiplier(&self) -> api::settings::Multiplier {
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
}

/// Computed evaluation of a `PropertyValuation`.
#[derive(Clone, Copy, Debug, From)]
pub struct Evaluation(valuation::Evaluation);

/// Computed evaluation of a `PropertyValuation`.
#[graphql_object(name = "PropertyEvaluation", context = Context)]
impl Evaluation {
    /// Sum of standard monthly rent and utilities over active `Unit`s.
    #[must_use]
    pub fn total_monthly_rent(&self) -> Money {
        self.0.total_monthly_rent
    }

    /// Total monthly rent times 12.
    #[must_use]
    pub fn total_yearly_rent(&self) -> Money {
        self.0.total_yearly_rent
    }

    /// Yearly rent reduced by the operating expense ratio.
    #[must_use]
    pub fn net_operating_income(&self) -> Money {
        self.0.net_operating_income
    }

    /// Yearly rent times the gross rent multiplier.
    #[must_use]
    pub fn estimated_value(&self) -> Money {
        self.0.estimated_value
    }

    /// Estimated value with the manual adjustment applied.
    #[must_use]
    pub fn adjusted_value(&self) -> Money {
        self.0.adjusted_value
    }

    /// Capitalization rate implied by the multiplier, in percent.
    #[must_use]
    pub fn implied_cap_rate(&self) -> scalar::Decimal {
        self.0.implied_cap_rate.into()
    }

    /// Fixed ±10% band around the adjusted value.
    #[must_use]
    pub fn value_range(&self) -> ValueRange {
        ValueRange {
            low: self.0.value_range.low,
            high: self.0.value_range.high,
        }
    }
}

/// Value range of a `PropertyEvaluation`.
#[derive(Clone, Copy, Debug)]
pub struct ValueRange {
    /// Lower bound of the range.
    low: Money,

    /// Upper bound of the range.
    high: Money,
}

/// Value range of a `PropertyEvaluation`.
#[graphql_object(name = "ValuationRange", context = Context)]
impl ValueRange {
    /// Lower bound of the range.
    #[must_use]
    pub fn low(&self) -> Money {
        self.low
    }

    /// Upper bound of the range.
    #[must_use]
    pub fn high(&self) -> Money {
        self.high
    }
}

/// Result of the `compareInvestment` query.
#[derive(Clone, Copy, Debug, From)]
pub struct InvestmentComparison(investment::Output);

/// Multi-year comparison of buying a property against investing the same
/// capital into an ETF.
#[graphql_object(context = Context)]
impl InvestmentComparison {
    /// Property value compounded by the appreciation rate over the horizon.
    #[must_use]
    pub fn property_final_value(&self) -> Money {
        self.0.property_final_value
    }

    /// Undistributed rental income accumulated over the horizon.
    ///
    /// Negative when the expenses exceed the rent.
    #[must_use]
    pub fn property_rental_income(&self) -> scalar::Decimal {
        self.0.property_rental_income.into()
    }

    /// Final property scenario value: compounded value plus accumulated
    /// income.
    #[must_use]
    pub fn property_total(&self) -> scalar::Decimal {
        self.0.property_total.into()
    }

    /// Annualized return of the property scenario, in percent.
    #[must_use]
    pub fn property_annualized_return(&self) -> scalar::Decimal {
        self.0.property_annualized_return.into()
    }

    /// The same capital grown at the ETF rate over the horizon, rental income
    /// excluded.
    #[must_use]
    pub fn etf_final_value(&self) -> Money {
        self.0.etf_final_value
    }

    /// Advantage of the property scenario over the ETF scenario.
    ///
    /// Negative when the ETF comes out ahead.
    #[must_use]
    pub fn difference(&self) -> scalar::Decimal {
        self.0.difference.into()
    }
}

impl AsError for valuation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => {
                Some(api::property::PropertyError::NotExists.into())
            }
        }
    }
}

impl AsError for investment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ZeroPropertyValue => {
                Some(ReportError::ZeroPropertyValue.into())
            }
        }
    }
}

crate::define_error! {
    enum ReportError {
        #[code = "ZERO_PROPERTY_VALUE"]
        #[status = BAD_REQUEST]
        #[message = "Cannot compare investments over a zero property value"]
        ZeroPropertyValue,
    }
}
