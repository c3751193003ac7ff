//! [`Unit`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{command, domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A rentable unit of a `Property`.
#[derive(Clone, Debug, From)]
pub struct Unit {
    /// ID of this [`Unit`].
    id: Id,

    /// Underlying [`domain::Unit`].
    unit: OnceCell<domain::Unit>,
}

impl From<domain::Unit> for Unit {
    fn from(unit: domain::Unit) -> Self {
        Self {
            id: unit.id.into(),
            unit: OnceCell::new_with(Some(unit)),
        }
    }
}

impl Unit {
    /// Returns the underlying [`domain::Unit`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Unit`] doesn't exist or is not owned by the
    /// current `User`.
    async fn unit(&self, ctx: &Context) -> Result<&domain::Unit, Error> {
        let id = self.id.into();
        self.unit
            .get_or_try_init(|| async {
                let my_id = ctx.current_session().await?.user_id;
                ctx.service()
                    .execute(query::unit::ById::by((my_id.into(), id)))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|u| {
                        future::ready(
                            u.ok_or_else(|| UnitError::NotExists.into()),
                        )
                    })
                    .await
            })
            .await
    }
}

/// A rentable unit of a `Property`.
#[graphql_object(context = Context)]
impl Unit {
    /// Unique identifier of this `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Property` this `Unit` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.property",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn property(
        &self,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let unit = self.unit(ctx).await?;
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::property::ById::by((
                my_id.into(),
                unit.property_id,
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::property::PropertyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Name of this `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.unit(ctx).await?.name.clone().into())
    }

    /// Kind of this `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.unit(ctx).await?.kind.into())
    }

    /// Standard monthly rent of this `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.monthlyRent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn monthly_rent(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.unit(ctx).await?.monthly_rent)
    }

    /// Standard monthly utilities of this `Unit`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.monthlyUtilities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn monthly_utilities(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.unit(ctx).await?.monthly_utilities)
    }

    /// Free-text size of this `Unit`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.size",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn size(&self, ctx: &Context) -> Result<Option<Size>, Error> {
        Ok(self.unit(ctx).await?.size.clone().map(Into::into))
    }

    /// Indicator whether this `Unit` is active.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.isActive",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.unit(ctx).await?.is_active)
    }

    /// `DateTime` when this `Unit` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.unit(ctx).await?.created_at.coerce())
    }

    /// Person assignments of this `Unit`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.assignments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn assignments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Assignment>, Error> {
        let unit = self.unit(ctx).await?;
        ctx.service()
            .execute(query::assignments::OfTarget::by(
                domain::assignment::Target::Unit(unit.id),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|assignments| {
                assignments.into_iter().map(Into::into).collect()
            })
    }
}

/// Unique identifier of a `Unit`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::unit::Id)]
#[into(domain::unit::Id)]
#[graphql(name = "UnitId", transparent)]
pub struct Id(Uuid);

/// Name of a `Unit`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UnitName", with = scalar::Via::<domain::unit::Name>)]
pub struct Name(domain::unit::Name);

/// Free-text size of a `Unit`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UnitSize", with = scalar::Via::<domain::unit::Size>)]
pub struct Size(domain::unit::Size);

/// Kind of a `Unit`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "UnitKind")]
pub enum Kind {
    /// An apartment.
    Apartment,

    /// A garage.
    Garage,

    /// A parking spot.
    Parking,

    /// A storage room.
    Storage,

    /// An attic.
    Attic,

    /// A garden.
    Garden,

    /// A commercial space.
    Commercial,

    /// Any other kind of unit.
    Other,
}

impl From<domain::unit::Kind> for Kind {
    fn from(kind: domain::unit::Kind) -> Self {
        use domain::unit::Kind as K;
        match kind {
            K::Apartment => Self::Apartment,
            K::Garage => Self::Garage,
            K::Parking => Self::Parking,
            K::Storage => Self::Storage,
            K::Attic => Self::Attic,
            K::Garden => Self::Garden,
            K::Commercial => Self::Commercial,
            K::Other => Self::Other,
        }
    }
}

impl From<Kind> for domain::unit::Kind {
    fn from(kind: Kind) -> Self {
        use Kind as K;
        match kind {
            K::Apartment => Self::Apartment,
            K::Garage => Self::Garage,
            K::Parking => Self::Parking,
            K::Storage => Self::Storage,
            K::Attic => Self::Attic,
            K::Garden => Self::Garden,
            K::Commercial => Self::Commercial,
            K::Other => Self::Other,
        }
    }
}

/// Result of the `updateStandardRent` mutation.
#[derive(Clone, Debug)]
pub struct UpdateStandardRentResult {
    /// Human-readable outcome message.
    pub message: String,

    /// Updated `Unit`, when the change has been applied.
    pub unit: Option<Unit>,

    /// Customized months blocking the change, when it has not.
    pub affected_rentals: Vec<AffectedRental>,
}

/// Result of the `updateStandardRent` mutation.
///
/// Either `unit` is set (the change has been applied), or `affectedRentals`
/// lists the customized months that blocked it, to be confirmed with
/// `forceUpdate`.
#[graphql_object(context = Context)]
impl UpdateStandardRentResult {
    /// Human-readable outcome message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Updated `Unit`, when the change has been applied.
    #[must_use]
    pub fn unit(&self) -> &Option<Unit> {
        &self.unit
    }

    /// Customized months blocking the change, when it has not been applied.
    #[must_use]
    pub fn affected_rentals(&self) -> &[AffectedRental] {
        &self.affected_rentals
    }
}

/// A stored month entry a standard rent change would overwrite.
#[derive(Clone, Debug)]
pub struct AffectedRental {
    /// Month of the affected entry.
    month: i32,

    /// Year of the affected entry.
    year: i32,

    /// Current total amount of the affected entry.
    current_amount: Money,

    /// Total amount the entry would carry under the proposed standard.
    new_amount: Money,
}

/// A stored month entry a standard rent change would overwrite.
#[graphql_object(context = Context)]
impl AffectedRental {
    /// Month of the affected entry.
    #[must_use]
    pub fn month(&self) -> i32 {
        self.month
    }

    /// Year of the affected entry.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Current total amount of the affected entry.
    #[must_use]
    pub fn current_amount(&self) -> Money {
        self.current_amount
    }

    /// Total amount the entry would carry under the proposed standard.
    #[must_use]
    pub fn new_amount(&self) -> Money {
        self.new_amount
    }
}

impl From<read::rental::AffectedRental> for AffectedRental {
    fn from(affected: read::rental::AffectedRental) -> Self {
        Self {
            month: i32::from(affected.rental.month.number()),
            year: affected.rental.year.number(),
            current_amount: affected.rental.amount,
            new_amount: affected.new_amount,
        }
    }
}

crate::define_error! {
    enum UnitError {
        #[code = "UNIT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Unit` with the specified ID does not exist"]
        NotExists,

        #[code = "NON_POSITIVE_RENT"]
        #[status = BAD_REQUEST]
        #[message = "Standard monthly rent must be positive"]
        NonPositiveRent,
    }
}

impl AsError for command::create_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NonPositiveRent => Some(UnitError::NonPositiveRent.into()),
            Self::PropertyNotExists(_) => {
                Some(api::property::PropertyError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UnitNotExists(_) => Some(UnitError::NotExists.into()),
        }
    }
}

impl AsError for command::delete_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UnitNotExists(_) => Some(UnitError::NotExists.into()),
        }
    }
}

impl AsError for command::update_standard_rent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NonPositiveRent => Some(UnitError::NonPositiveRent.into()),
            Self::UnitNotExists(_) => Some(UnitError::NotExists.into()),
        }
    }
}
