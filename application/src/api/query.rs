//! GraphQL [`Query`]s definitions.

use common::{Money, Percent, Year};
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::user::UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Property` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "property",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::property::ById::by((my_id.into(), id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::property::PropertyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of the current `User`'s `Property`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "properties",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn properties(
        first: Option<i32>,
        after: Option<api::property::list::Cursor>,
        last: Option<i32>,
        before: Option<api::property::list::Cursor>,
        name: Option<api::property::Name>,
        ctx: &Context,
    ) -> Result<api::property::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let my_id = ctx.current_session().await?.user_id;

        let arguments = read::property::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::properties::List::by(
                read::property::list::Selector {
                    arguments,
                    filter: read::property::list::Filter {
                        owner_id: my_id.into(),
                        name: name.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Unit` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist
    ///                       or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "unit",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn unit(
        id: api::unit::Id,
        ctx: &Context,
    ) -> Result<api::Unit, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::unit::ById::by((my_id.into(), id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::unit::UnitError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the complete yearly rent overview of a `Unit`: exactly 12
    /// month entries, either stored or synthesized from the `Unit`'s
    /// standard rent/utilities.
    ///
    /// `year` defaults to the current calendar year.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist
    ///                       or belongs to another `User`;
    /// - `INVALID_YEAR` - the provided `year` is out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "yearlyOverview",
            otel.name = Self::SPAN_NAME,
            unit_id = %unit_id,
            year = ?year,
        ),
    )]
    pub async fn yearly_overview(
        unit_id: api::unit::Id,
        year: Option<i32>,
        ctx: &Context,
    ) -> Result<api::rental::YearlyOverview, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let year = year
            .map(Year::try_from)
            .transpose()
            .map_err(|_| api::ValidationError::InvalidYear.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::rent::YearlyOverview {
                owner_id: my_id.into(),
                unit_id: unit_id.into(),
                year,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Person` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PERSON_NOT_EXISTS` - the `Person` with the specified ID does not
    ///                         exist or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "person",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn person(
        id: api::person::Id,
        ctx: &Context,
    ) -> Result<api::Person, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::person::ById::by((my_id.into(), id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::person::PersonError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of the current `User`'s `Person`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "persons",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn persons(
        first: Option<i32>,
        after: Option<api::person::list::Cursor>,
        last: Option<i32>,
        before: Option<api::person::list::Cursor>,
        name: Option<api::person::Name>,
        ctx: &Context,
    ) -> Result<api::person::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let my_id = ctx.current_session().await?.user_id;

        let arguments = read::person::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::persons::List::by(read::person::list::Selector {
                arguments,
                filter: read::person::list::Filter {
                    owner_id: my_id.into(),
                    name: name.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the valuation settings of the specified `Property`.
    ///
    /// Falls back to the defaults when no settings have been persisted yet.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "propertySettings",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn property_settings(
        property_id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::settings::Settings, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let property = ctx
            .service()
            .execute(query::property::ById::by((
                my_id.into(),
                property_id.into(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::property::PropertyError::NotExists.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::settings::OfProperty::by(property.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|settings| {
                settings
                    .unwrap_or_else(|| domain::Settings::defaults(property.id))
                    .into()
            })
    }

    /// Estimates the value of a `Property` with the gross rent multiplier
    /// method.
    ///
    /// Parameters must be provided all together or not at all; omitted, the
    /// `Property`'s persisted settings (or the defaults) apply.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`;
    /// - `INVALID_VALUATION_PARAMETERS` - only a part of the parameters was
    ///                                    provided;
    /// - `INVALID_EXPENSE_RATIO` - the expense ratio is out of the `0..=100`
    ///                             range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "evaluateProperty",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn evaluate_property(
        property_id: api::property::Id,
        gross_rent_multiplier: Option<api::settings::Multiplier>,
        operating_expense_ratio: Option<Percent>,
        value_adjustment: Option<Percent>,
        ctx: &Context,
    ) -> Result<api::report::Valuation, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let parameters = match (
            gross_rent_multiplier,
            operating_expense_ratio,
            value_adjustment,
        ) {
            (None, None, None) => None,
            (Some(multiplier), Some(ratio), Some(adjustment)) => Some(
                query::report::valuation::Parameters::new(
                    multiplier.into(),
                    ratio,
                    adjustment,
                )
                .ok_or_else(|| {
                    api::ValidationError::InvalidExpenseRatio.into()
                })
                .map_err(ctx.error())?,
            ),
            (
                None | Some(_),
                None | Some(_),
                None | Some(_),
            ) => {
                return Err(ctx.error()(
                    api::ValidationError::PartialValuationParameters.into(),
                ));
            }
        };

        ctx.service()
            .execute(query::report::Valuation {
                owner_id: my_id.into(),
                property_id: property_id.into(),
                parameters,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Compares buying a property against investing the same capital into an
    /// ETF over a multi-year horizon.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_YEARS` - the provided `years` are out of the `1..=100`
    ///                     range;
    /// - `ZERO_PROPERTY_VALUE` - the provided property value is zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "compareInvestment",
            otel.name = Self::SPAN_NAME,
            years = %years,
        ),
    )]
    pub async fn compare_investment(
        property_value: Money,
        annual_rent: Money,
        annual_expenses: Money,
        appreciation_rate: Percent,
        etf_return_rate: Percent,
        years: i32,
        ctx: &Context,
    ) -> Result<api::report::InvestmentComparison, Error> {
        // Scoped to a session like every other entry point, even though the
        // computation reads nothing.
        drop(ctx.current_session().await?);

        let years = years
            .try_into()
            .map_err(|_| api::ValidationError::InvalidYears.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::report::Comparison {
                property_value,
                annual_rent,
                annual_expenses,
                appreciation_rate,
                etf_return_rate,
                years,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
