//! Calendar types of the monthly rent ledger.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::fmt;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};

/// Calendar month of a year.
///
/// Guaranteed to be within the `1..=12` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Month(u8);

impl Month {
    /// First [`Month`] of a year.
    pub const JANUARY: Self = Self(1);

    /// Last [`Month`] of a year.
    pub const DECEMBER: Self = Self(12);

    /// Creates a new [`Month`] if the given `month` is within the `1..=12`
    /// range.
    #[must_use]
    pub fn new(month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(month))
    }

    /// Creates a new [`Month`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided `month` must be within the `1..=12` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(month: u8) -> Self {
        Self(month)
    }

    /// Returns the ordinal number of this [`Month`] (`1` for January).
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// Returns an [`Iterator`] over all 12 [`Month`]s of a year, in calendar
    /// order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }
}

impl TryFrom<i32> for Month {
    type Error = &'static str;

    fn try_from(month: i32) -> Result<Self, Self::Error> {
        u8::try_from(month)
            .ok()
            .and_then(Self::new)
            .ok_or("`Month` must be within `1..=12`")
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Month {
    accepts!(INT2);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        u8::try_from(i16::from_sql(ty, raw)?)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| "invalid `Month` value".into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Month {
    accepts!(INT2);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        i16::from(self.0).to_sql(ty, w)
    }
}

/// Calendar year.
///
/// Guaranteed to be within the `1..=9999` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Year(i32);

impl Year {
    /// Creates a new [`Year`] if the given `year` is within the `1..=9999`
    /// range.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        (1..=9999).contains(&year).then_some(Self(year))
    }

    /// Creates a new [`Year`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided `year` must be within the `1..=9999` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(year: i32) -> Self {
        Self(year)
    }

    /// Returns the current calendar [`Year`] (UTC).
    #[expect(clippy::missing_panics_doc, reason = "infallible until 10000 AD")]
    #[must_use]
    pub fn current() -> Self {
        Self::new(time::OffsetDateTime::now_utc().year())
            .expect("current year is always in range")
    }

    /// Returns the number of this [`Year`].
    #[must_use]
    pub const fn number(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Year {
    type Error = &'static str;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        Self::new(year).ok_or("`Year` must be within `1..=9999`")
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Year {
    accepts!(INT4);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Self::new(i32::from_sql(ty, raw)?)
            .ok_or_else(|| "invalid `Year` value".into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Year {
    accepts!(INT4);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

/// A specific [`Month`] of a specific [`Year`].
///
/// Ordered chronologically: first by [`Year`], then by [`Month`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YearMonth {
    /// [`Year`] of this [`YearMonth`].
    pub year: Year,

    /// [`Month`] of this [`YearMonth`].
    pub month: Month,
}

impl YearMonth {
    /// Creates a new [`YearMonth`] with the provided parts.
    #[must_use]
    pub const fn new(year: Year, month: Month) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { year, month } = self;
        write!(f, "{year}-{:02}", month.number())
    }
}

#[cfg(test)]
mod spec {
    use super::{Month, Year, YearMonth};

    #[test]
    fn month_range_is_validated() {
        assert!(Month::new(0).is_none());
        assert!(Month::new(13).is_none());
        for m in 1..=12 {
            assert_eq!(Month::new(m).unwrap().number(), m);
        }

        assert!(Month::try_from(-1).is_err());
        assert!(Month::try_from(300).is_err());
        assert_eq!(Month::try_from(3).unwrap(), Month::new(3).unwrap());
    }

    #[test]
    fn all_months_are_ordered() {
        let months = Month::all().collect::<Vec<_>>();
        assert_eq!(months.len(), 12);
        assert_eq!(months.first(), Some(&Month::JANUARY));
        assert_eq!(months.last(), Some(&Month::DECEMBER));
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn year_range_is_validated() {
        assert!(Year::new(0).is_none());
        assert!(Year::new(10_000).is_none());
        assert_eq!(Year::new(2025).unwrap().number(), 2025);
    }

    #[test]
    fn year_month_orders_chronologically() {
        let ym = |y, m| {
            YearMonth::new(Year::new(y).unwrap(), Month::new(m).unwrap())
        };

        assert!(ym(2024, 12) < ym(2025, 1));
        assert!(ym(2025, 3) < ym(2025, 4));
        assert_eq!(ym(2025, 7), ym(2025, 7));
        assert_eq!(ym(2025, 7).to_string(), "2025-07");
    }
}
