//! GraphQL [`Mutation`]s definitions.

use common::{Money, Month, Percent, Year, YearMonth};
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

/// Resolves the single [`domain::assignment::Target`] out of the optional
/// `propertyId`/`unitId` pair.
fn assignment_target(
    property_id: Option<api::property::Id>,
    unit_id: Option<api::unit::Id>,
) -> Result<domain::assignment::Target, Error> {
    match (property_id, unit_id) {
        (Some(property_id), None) => {
            Ok(domain::assignment::Target::Property(property_id.into()))
        }
        (None, Some(unit_id)) => {
            Ok(domain::assignment::Target::Unit(unit_id.into()))
        }
        (None, None) | (Some(_), Some(_)) => {
            Err(api::ValidationError::AmbiguousAssignmentTarget.into())
        }
    }
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials and contact info,
    /// and signs them in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            email = ?email,
            login = %login,
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        login: api::user::Login,
        password: api::user::Password,
        email: Option<api::user::Email>,
        phone: Option<api::user::Phone>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `Session` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials do not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateSession::ByCredentials {
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Updates the `User`'s password to the provided one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_PASSWORD` - provided `old_password` does not match the
    ///                      current `User` password.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserPassword",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_user_password(
        new_password: api::user::Password,
        old_password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserPassword {
                user_id: my_id.into(),
                new_password: secrecy::SecretBox::init_with(move || {
                    new_password.into()
                }),
                old_password: secrecy::SecretBox::init_with(move || {
                    old_password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Property` with the provided details.
    #[tracing::instrument(
        skip_all,
        fields(
            address = %address,
            gql.name = "createProperty",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_property(
        name: api::property::Name,
        address: api::property::Address,
        description: Option<api::property::Description>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateProperty {
                owner_id: my_id.into(),
                name: name.into(),
                address: address.into(),
                description: description.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the details of a `Property`.
    ///
    /// Omitted fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProperty",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_property(
        id: api::property::Id,
        name: Option<api::property::Name>,
        address: Option<api::property::Address>,
        description: Option<api::property::Description>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateProperty {
                owner_id: my_id.into(),
                property_id: id.into(),
                name: name.map(Into::into),
                address: address.map(Into::into),
                description: description.map(Into::into),
                is_active,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes a `Property`, together with its `Unit`s, their rent ledgers
    /// and person assignments.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProperty",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteProperty {
                owner_id: my_id.into(),
                property_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Adds a new `Unit` to a `Property`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`;
    /// - `NON_POSITIVE_RENT` - the provided standard monthly rent is zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUnit",
            monthly_rent = %monthly_rent,
            name = %name,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn create_unit(
        property_id: api::property::Id,
        name: api::unit::Name,
        kind: api::unit::Kind,
        monthly_rent: Money,
        monthly_utilities: Option<Money>,
        size: Option<api::unit::Size>,
        ctx: &Context,
    ) -> Result<api::Unit, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateUnit {
                owner_id: my_id.into(),
                property_id: property_id.into(),
                name: name.into(),
                kind: kind.into(),
                monthly_rent,
                monthly_utilities,
                size: size.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the details of a `Unit`.
    ///
    /// Omitted fields keep their stored values. The standard monthly
    /// rent/utilities are changed through `updateStandardRent` instead.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist
    ///                       or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUnit",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_unit(
        id: api::unit::Id,
        name: Option<api::unit::Name>,
        kind: Option<api::unit::Kind>,
        size: Option<api::unit::Size>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Unit, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUnit {
                owner_id: my_id.into(),
                unit_id: id.into(),
                name: name.map(Into::into),
                kind: kind.map(Into::into),
                size: size.map(Into::into),
                is_active,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes a `Unit`, together with its rent ledger and person
    /// assignments.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist
    ///                       or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteUnit",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_unit(
        id: api::unit::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteUnit {
                owner_id: my_id.into(),
                unit_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Creates or updates the month entry of a `Unit`'s rent ledger.
    ///
    /// At most one entry exists per `(unit, month, year)`: a second upsert
    /// for the same month updates the first entry. Omitted `rentAmount`/
    /// `utilitiesAmount` fall back to the `Unit`'s standard values; omitted
    /// `isPaid`/`notes` keep the stored values on update. The total amount
    /// is always recomputed as the sum of the effective portions.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist
    ///                       or belongs to another `User`;
    /// - `INVALID_MONTH` - the provided `month` is out of the `1..=12` range;
    /// - `INVALID_YEAR` - the provided `year` is out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "upsertMonthEntry",
            month = %month,
            otel.name = Self::SPAN_NAME,
            unit_id = %unit_id,
            year = %year,
        ),
    )]
    pub async fn upsert_month_entry(
        unit_id: api::unit::Id,
        month: i32,
        year: i32,
        rent_amount: Option<Money>,
        utilities_amount: Option<Money>,
        is_paid: Option<bool>,
        notes: Option<api::rental::Notes>,
        ctx: &Context,
    ) -> Result<api::rental::UpsertResult, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let month = Month::try_from(month)
            .map_err(|_| api::ValidationError::InvalidMonth.into())
            .map_err(ctx.error())?;
        let year = Year::try_from(year)
            .map_err(|_| api::ValidationError::InvalidYear.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpsertMonthEntry {
                owner_id: my_id.into(),
                unit_id: unit_id.into(),
                month,
                year,
                rent: rent_amount,
                utilities: utilities_amount,
                is_paid,
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Changes the standard monthly rent/utilities of a `Unit` effective
    /// from the provided month.
    ///
    /// Stored month entries at or after the effective month whose explicit
    /// amounts differ from the `Unit`'s current standard block the change:
    /// they are returned as `affectedRentals` (with their current and
    /// would-be totals) and nothing is written. Resubmitting with
    /// `forceUpdate` overwrites them with the new standard.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist
    ///                       or belongs to another `User`;
    /// - `NON_POSITIVE_RENT` - the provided standard monthly rent is zero;
    /// - `INVALID_MONTH` - the provided month is out of the `1..=12` range;
    /// - `INVALID_YEAR` - the provided year is out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            effective_from_month = %effective_from_month,
            effective_from_year = %effective_from_year,
            force_update = ?force_update,
            gql.name = "updateStandardRent",
            monthly_rent = %monthly_rent,
            otel.name = Self::SPAN_NAME,
            unit_id = %unit_id,
        ),
    )]
    pub async fn update_standard_rent(
        unit_id: api::unit::Id,
        monthly_rent: Money,
        monthly_utilities: Option<Money>,
        effective_from_month: i32,
        effective_from_year: i32,
        force_update: Option<bool>,
        ctx: &Context,
    ) -> Result<api::unit::UpdateStandardRentResult, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let month = Month::try_from(effective_from_month)
            .map_err(|_| api::ValidationError::InvalidMonth.into())
            .map_err(ctx.error())?;
        let year = Year::try_from(effective_from_year)
            .map_err(|_| api::ValidationError::InvalidYear.into())
            .map_err(ctx.error())?;

        let outcome = ctx
            .service()
            .execute(command::UpdateStandardRent {
                owner_id: my_id.into(),
                unit_id: unit_id.into(),
                monthly_rent,
                monthly_utilities,
                effective_from: YearMonth::new(year, month),
                force_update: force_update.unwrap_or(false),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        Ok(match outcome {
            command::update_standard_rent::Outcome::Applied(unit) => {
                api::unit::UpdateStandardRentResult {
                    message: "Standard rent updated".to_owned(),
                    unit: Some(unit.into()),
                    affected_rentals: Vec::new(),
                }
            }
            command::update_standard_rent::Outcome::Conflict(affected) => {
                // Nothing was written; the 409-like outcome carries the rows
                // to review before resubmitting with `forceUpdate`.
                ctx.set_error_status_code(http::StatusCode::CONFLICT);
                api::unit::UpdateStandardRentResult {
                    message: format!(
                        "{} month entries with custom amounts would be \
                         overwritten; resubmit with `forceUpdate` to \
                         proceed",
                        affected.len(),
                    ),
                    unit: None,
                    affected_rentals: affected
                        .into_iter()
                        .map(Into::into)
                        .collect(),
                }
            }
        })
    }

    /// Creates a new `Person`.
    #[tracing::instrument(
        skip_all,
        fields(
            first_name = %first_name,
            gql.name = "createPerson",
            last_name = %last_name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_person(
        first_name: api::person::Name,
        last_name: api::person::Name,
        email: Option<api::person::Email>,
        phone: Option<api::person::Phone>,
        notes: Option<api::person::Notes>,
        ctx: &Context,
    ) -> Result<api::Person, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreatePerson {
                owner_id: my_id.into(),
                first_name: first_name.into(),
                last_name: last_name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                notes: notes.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the details of a `Person`.
    ///
    /// Omitted fields keep their stored values. Setting `isActive` to
    /// `false` deactivates the `Person` without touching their assignments.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PERSON_NOT_EXISTS` - the `Person` with the specified ID does not
    ///                         exist or belongs to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updatePerson",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_person(
        id: api::person::Id,
        first_name: Option<api::person::Name>,
        last_name: Option<api::person::Name>,
        email: Option<api::person::Email>,
        phone: Option<api::person::Phone>,
        notes: Option<api::person::Notes>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Person, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdatePerson {
                owner_id: my_id.into(),
                person_id: id.into(),
                first_name: first_name.map(Into::into),
                last_name: last_name.map(Into::into),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                notes: notes.map(Into::into),
                is_active,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns a `Person` to a property or unit with the provided role.
    ///
    /// Exactly one of `propertyId`/`unitId` must be provided. Assigning a
    /// previously removed pair reactivates the existing assignment with the
    /// new role instead of creating a second one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PERSON_NOT_EXISTS` - the `Person` with the specified ID does not
    ///                         exist or belongs to another `User`;
    /// - `PROPERTY_NOT_EXISTS` / `UNIT_NOT_EXISTS` - the target does not
    ///                                               exist or belongs to
    ///                                               another `User`;
    /// - `AMBIGUOUS_ASSIGNMENT_TARGET` - none or both of
    ///                                   `propertyId`/`unitId` were provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "assignPerson",
            otel.name = Self::SPAN_NAME,
            person_id = %person_id,
            property_id = ?property_id.as_ref().map(ToString::to_string),
            role = %role,
            unit_id = ?unit_id.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn assign_person(
        person_id: api::person::Id,
        property_id: Option<api::property::Id>,
        unit_id: Option<api::unit::Id>,
        role: api::assignment::Role,
        ctx: &Context,
    ) -> Result<api::Assignment, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let target = assignment_target(property_id, unit_id)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::AssignPerson {
                owner_id: my_id.into(),
                person_id: person_id.into(),
                target,
                role: role.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes a `Person` from a property or unit.
    ///
    /// The assignment is deactivated, not deleted: it stays listed for
    /// history and is reactivated by a later `assignPerson` of the same
    /// pair.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PERSON_NOT_EXISTS` - the `Person` with the specified ID does not
    ///                         exist or belongs to another `User`;
    /// - `ASSIGNMENT_NOT_EXISTS` - no active assignment exists for the pair;
    /// - `AMBIGUOUS_ASSIGNMENT_TARGET` - none or both of
    ///                                   `propertyId`/`unitId` were provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unassignPerson",
            otel.name = Self::SPAN_NAME,
            person_id = %person_id,
            property_id = ?property_id.as_ref().map(ToString::to_string),
            unit_id = ?unit_id.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn unassign_person(
        person_id: api::person::Id,
        property_id: Option<api::property::Id>,
        unit_id: Option<api::unit::Id>,
        ctx: &Context,
    ) -> Result<api::Assignment, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let target = assignment_target(property_id, unit_id)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UnassignPerson {
                owner_id: my_id.into(),
                person_id: person_id.into(),
                target,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Persists the valuation and investment-comparison settings of a
    /// `Property`, so the calculators reopen with the same assumptions.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist or belongs to another `User`;
    /// - `INVALID_EXPENSE_RATIO` - the expense ratio is out of the `0..=100`
    ///                             range;
    /// - `INVALID_YEARS` - the comparison horizon is out of the `1..=100`
    ///                     range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updatePropertySettings",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn update_property_settings(
        property_id: api::property::Id,
        gross_rent_multiplier: api::settings::Multiplier,
        operating_expense_ratio: Percent,
        value_adjustment: Percent,
        appreciation_rate: Percent,
        etf_return_rate: Percent,
        comparison_years: i32,
        ctx: &Context,
    ) -> Result<api::settings::Settings, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let comparison_years = comparison_years
            .try_into()
            .map_err(|_| api::ValidationError::InvalidYears.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdatePropertySettings {
                owner_id: my_id.into(),
                property_id: property_id.into(),
                gross_rent_multiplier: gross_rent_multiplier.into(),
                operating_expense_ratio,
                value_adjustment,
                appreciation_rate,
                etf_return_rate,
                comparison_years,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
