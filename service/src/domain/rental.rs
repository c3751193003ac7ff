//! [`Rental`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{marker, DateTimeOf, Money, Month, Year, YearMonth};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::unit;

/// Persisted ledger row of a [`Unit`] for a single month.
///
/// At most one [`Rental`] exists per `(unit, month, year)` triple.
///
/// [`Unit`]: crate::domain::Unit
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the [`Unit`] this [`Rental`] belongs to.
    ///
    /// [`Unit`]: crate::domain::Unit
    pub unit_id: unit::Id,

    /// [`Month`] this [`Rental`] covers.
    pub month: Month,

    /// [`Year`] this [`Rental`] covers.
    pub year: Year,

    /// Rent portion of this [`Rental`].
    ///
    /// [`None`] means the [`Unit`]'s standard monthly rent applies.
    ///
    /// [`Unit`]: crate::domain::Unit
    pub rent: Option<Money>,

    /// Utilities portion of this [`Rental`].
    ///
    /// [`None`] means the [`Unit`]'s standard monthly utilities apply.
    ///
    /// [`Unit`]: crate::domain::Unit
    pub utilities: Option<Money>,

    /// Total amount of this [`Rental`].
    ///
    /// Recomputed as the sum of the effective rent and utilities portions on
    /// every write, never edited independently.
    pub amount: Money,

    /// Indicator whether this [`Rental`] has been paid.
    pub is_paid: bool,

    /// Free-text [`Notes`] of this [`Rental`].
    pub notes: Notes,

    /// [`DateTime`] when this [`Rental`] was created.
    pub created_at: CreationDateTime,
}

impl Rental {
    /// Returns the [`YearMonth`] this [`Rental`] covers.
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }
}

/// ID of a [`Rental`].
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

/// Free-text notes of a [`Rental`].
///
/// May be empty.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Notes(String);

impl Notes {
    /// Creates a new [`Notes`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `notes` match the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(notes: impl Into<String>) -> Self {
        Self(notes.into())
    }

    /// Creates a new [`Notes`] if the given `notes` are valid.
    #[must_use]
    pub fn new(notes: impl Into<String>) -> Option<Self> {
        let notes = notes.into();
        Self::check(&notes).then_some(Self(notes))
    }

    /// Checks whether the given `notes` are valid [`Notes`].
    fn check(notes: impl AsRef<str>) -> bool {
        notes.as_ref().len() <= 2048
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

/// [`DateTime`] when a [`Rental`] was created.
pub type CreationDateTime = DateTimeOf<(Rental, marker::Creation)>;
