//! [`Unit`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, marker, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::property;

/// Rentable unit of a [`Property`].
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct Unit {
    /// ID of this [`Unit`].
    pub id: Id,

    /// ID of the [`Property`] this [`Unit`] belongs to.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// [`Name`] of this [`Unit`].
    pub name: Name,

    /// [`Kind`] of this [`Unit`].
    pub kind: Kind,

    /// Standard monthly rent of this [`Unit`].
    ///
    /// Always positive. Month [`Rental`]s without an explicit rent portion
    /// fall back to this amount.
    ///
    /// [`Rental`]: crate::domain::Rental
    pub monthly_rent: Money,

    /// Standard monthly utilities of this [`Unit`], if any.
    ///
    /// [`None`] is treated as zero.
    pub monthly_utilities: Option<Money>,

    /// Free-text [`Size`] of this [`Unit`] (e.g. `"54 m²"`).
    pub size: Option<Size>,

    /// Indicator whether this [`Unit`] is active.
    pub is_active: bool,

    /// [`DateTime`] when this [`Unit`] was created.
    pub created_at: CreationDateTime,
}

impl Unit {
    /// Returns the standard monthly utilities of this [`Unit`], with a missing
    /// amount treated as zero.
    #[must_use]
    pub fn standard_utilities(&self) -> Money {
        self.monthly_utilities.unwrap_or(Money::ZERO)
    }

    /// Returns the standard monthly total (rent plus utilities) of this
    /// [`Unit`].
    #[must_use]
    pub fn standard_total(&self) -> Money {
        self.monthly_rent + self.standard_utilities()
    }
}

/// ID of a [`Unit`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`Unit`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Free-text size of a [`Unit`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Size(String);

impl Size {
    /// Creates a new [`Size`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `size` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(size: impl Into<String>) -> Self {
        Self(size.into())
    }

    /// Creates a new [`Size`] if the given `size` is valid.
    #[must_use]
    pub fn new(size: impl Into<String>) -> Option<Self> {
        let size = size.into();
        Self::check(&size).then_some(Self(size))
    }

    /// Checks whether the given `size` is a valid [`Size`].
    fn check(size: impl AsRef<str>) -> bool {
        let size = size.as_ref();
        size.trim() == size && !size.is_empty() && size.len() <= 512
    }
}

impl FromStr for Size {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Size`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Unit`]."]
    enum Kind {
        #[doc = "An apartment."]
        Apartment = 1,

        #[doc = "A garage."]
        Garage = 2,

        #[doc = "A parking spot."]
        Parking = 3,

        #[doc = "A storage room."]
        Storage = 4,

        #[doc = "An attic."]
        Attic = 5,

        #[doc = "A garden."]
        Garden = 6,

        #[doc = "A commercial space."]
        Commercial = 7,

        #[doc = "Any other kind of unit."]
        Other = 8,
    }
}

/// [`DateTime`] when a [`Unit`] was created.
pub type CreationDateTime = DateTimeOf<(Unit, marker::Creation)>;
