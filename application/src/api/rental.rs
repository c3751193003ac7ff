//! [`Rental`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{command, domain, query, read};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A stored month entry of a `Unit`'s rent ledger.
#[derive(Clone, Debug, From)]
pub struct Rental(domain::Rental);

/// A stored month entry of a `Unit`'s rent ledger.
#[graphql_object(context = Context)]
impl Rental {
    /// Unique identifier of this `Rental`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Unit` this `Rental` belongs to.
    #[must_use]
    pub fn unit_id(&self) -> api::unit::Id {
        self.0.unit_id.into()
    }

    /// Month this `Rental` covers.
    #[must_use]
    pub fn month(&self) -> i32 {
        i32::from(self.0.month.number())
    }

    /// Year this `Rental` covers.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year.number()
    }

    /// Explicit rent portion of this `Rental`.
    ///
    /// `null` means the `Unit`'s standard monthly rent applies.
    #[must_use]
    pub fn rent_amount(&self) -> Option<Money> {
        self.0.rent
    }

    /// Explicit utilities portion of this `Rental`.
    ///
    /// `null` means the `Unit`'s standard monthly utilities apply.
    #[must_use]
    pub fn utilities_amount(&self) -> Option<Money> {
        self.0.utilities
    }

    /// Total amount of this `Rental`.
    #[must_use]
    pub fn total_amount(&self) -> Money {
        self.0.amount
    }

    /// Indicator whether this `Rental` has been paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.0.is_paid
    }

    /// Free-text notes of this `Rental`.
    #[must_use]
    pub fn notes(&self) -> Notes {
        self.0.notes.clone().into()
    }

    /// `DateTime` when this `Rental` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Rental`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::rental::Id)]
#[into(domain::rental::Id)]
#[graphql(name = "RentalId", transparent)]
pub struct Id(Uuid);

/// Free-text notes of a `Rental`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RentalNotes", with = scalar::Via::<domain::rental::Notes>)]
pub struct Notes(domain::rental::Notes);

/// Complete yearly rent overview of a `Unit`.
#[derive(Clone, Debug)]
pub struct YearlyOverview {
    /// `Unit` the overview belongs to.
    unit: api::Unit,

    /// Resolved year of the overview.
    year: i32,

    /// The 12 month entries of the overview.
    entries: Vec<MonthEntry>,
}

/// Complete yearly rent overview of a `Unit`: exactly 12 month entries,
/// either stored or synthesized from the `Unit`'s standard rent/utilities.
#[graphql_object(context = Context)]
impl YearlyOverview {
    /// `Unit` the overview belongs to, in its current state.
    #[must_use]
    pub fn unit(&self) -> &api::Unit {
        &self.unit
    }

    /// Resolved year of the overview.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The 12 month entries of the overview, months 1 through 12 in order.
    #[must_use]
    pub fn yearly_overview(&self) -> &[MonthEntry] {
        &self.entries
    }
}

impl From<query::rent::Output> for YearlyOverview {
    fn from(output: query::rent::Output) -> Self {
        let query::rent::Output {
            unit,
            year,
            entries,
        } = output;
        Self {
            unit: unit.into(),
            year: year.number(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Entry of a `YearlyOverview`.
#[derive(Clone, Debug, From)]
pub struct MonthEntry(read::rental::MonthEntry);

/// Entry of a `YearlyOverview`, either backed by a stored `Rental` row
/// (`exists == true`) or synthesized from the `Unit`'s standards.
#[graphql_object(context = Context)]
impl MonthEntry {
    /// Month of this entry.
    #[must_use]
    pub fn month(&self) -> i32 {
        i32::from(self.0.month.number())
    }

    /// Year of this entry.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year.number()
    }

    /// Effective rent portion of this entry.
    #[must_use]
    pub fn rent_amount(&self) -> Money {
        self.0.rent
    }

    /// Effective utilities portion of this entry.
    #[must_use]
    pub fn utilities_amount(&self) -> Money {
        self.0.utilities
    }

    /// Total amount of this entry.
    #[must_use]
    pub fn total_amount(&self) -> Money {
        self.0.total
    }

    /// Indicator whether this entry has been paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.0.is_paid
    }

    /// Free-text notes of this entry.
    #[must_use]
    pub fn notes(&self) -> Notes {
        self.0.notes.clone().into()
    }

    /// ID of the backing `Rental` row, if any.
    #[must_use]
    pub fn rental_id(&self) -> Option<Id> {
        self.0.rental_id.map(Into::into)
    }

    /// Indicator whether this entry is backed by a stored `Rental` row.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.0.exists
    }
}

/// Result of the `upsertMonthEntry` mutation.
#[derive(Clone, Debug)]
pub struct UpsertResult {
    /// Human-readable outcome message.
    pub message: String,

    /// The resulting `Rental` row.
    pub rental: Rental,

    /// Indicator whether the row was created rather than updated.
    pub created: bool,
}

/// Result of the `upsertMonthEntry` mutation.
#[graphql_object(name = "MonthEntryUpsertResult", context = Context)]
impl UpsertResult {
    /// Human-readable outcome message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The resulting `Rental` row.
    #[must_use]
    pub fn rental(&self) -> &Rental {
        &self.rental
    }

    /// Indicator whether the row was created rather than updated.
    #[must_use]
    pub fn created(&self) -> bool {
        self.created
    }
}

impl From<command::upsert_month_entry::Output> for UpsertResult {
    fn from(output: command::upsert_month_entry::Output) -> Self {
        let command::upsert_month_entry::Output { rental, created } = output;
        Self {
            message: if created {
                "Month entry created".to_owned()
            } else {
                "Month entry updated".to_owned()
            },
            rental: rental.into(),
            created,
        }
    }
}

crate::define_error! {
    enum RentalError {
        #[code = "MONTH_ENTRY_EXISTS"]
        #[status = BAD_REQUEST]
        #[message = "A month entry for this `Unit` and month already exists"]
        MonthEntryExists,
    }
}

impl AsError for command::upsert_month_entry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => {
                if e.is_unique_violation(Some("rentals_unit_month_year_key")) {
                    Some(RentalError::MonthEntryExists.into())
                } else {
                    e.try_as_error()
                }
            }
            Self::UnitNotExists(_) => {
                Some(api::unit::UnitError::NotExists.into())
            }
        }
    }
}

impl AsError for query::rent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UnitNotExists(_) => {
                Some(api::unit::UnitError::NotExists.into())
            }
        }
    }
}
