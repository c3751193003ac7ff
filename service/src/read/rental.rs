//! [`Rental`]-related read definitions.
//!
//! Holds the ledger reconciliation: merging the sparse stored [`Rental`] rows
//! of a [`Unit`] with its standard rent/utilities into a complete yearly
//! overview, and detecting which stored rows a standard rent change would
//! overwrite.

use common::{Money, Month, Year, YearMonth};

use crate::domain::{rental, unit::Unit, Rental};

/// Entry of the yearly rent overview of a [`Unit`].
///
/// Either backed by a stored [`Rental`] row (`exists == true`) or synthesized
/// from the [`Unit`]'s standard rent/utilities.
#[derive(Clone, Debug)]
pub struct MonthEntry {
    /// [`Month`] this entry covers.
    pub month: Month,

    /// [`Year`] this entry covers.
    pub year: Year,

    /// Effective rent portion of this entry.
    pub rent: Money,

    /// Effective utilities portion of this entry.
    pub utilities: Money,

    /// Total amount of this entry.
    ///
    /// For a stored row this is the persisted [`Rental::amount`] verbatim;
    /// only synthesized entries compute it as `rent + utilities`.
    pub total: Money,

    /// Indicator whether this entry has been paid.
    pub is_paid: bool,

    /// Free-text notes of this entry.
    pub notes: rental::Notes,

    /// ID of the backing [`Rental`] row, if any.
    pub rental_id: Option<rental::Id>,

    /// Indicator whether this entry is backed by a stored [`Rental`] row.
    pub exists: bool,
}

/// Merges the stored `rentals` of the `unit` for the given `year` into a
/// complete overview of exactly 12 [`MonthEntry`]s, months `1..=12` in
/// ascending order.
///
/// Months without a stored row are synthesized from the `unit`'s standard
/// rent/utilities. Stored rows fall back per portion: a `NULL` rent or
/// utilities portion means the standard applies.
#[must_use]
pub fn reconcile(
    unit: &Unit,
    rentals: &[Rental],
    year: Year,
) -> Vec<MonthEntry> {
    Month::all()
        .map(|month| {
            match rentals.iter().find(|r| r.month == month && r.year == year) {
                Some(row) => MonthEntry {
                    month,
                    year,
                    rent: row.rent.unwrap_or(unit.monthly_rent),
                    utilities: row
                        .utilities
                        .unwrap_or_else(|| unit.standard_utilities()),
                    // The persisted total is authoritative for stored rows.
                    total: row.amount,
                    is_paid: row.is_paid,
                    notes: row.notes.clone(),
                    rental_id: Some(row.id),
                    exists: true,
                },
                None => MonthEntry {
                    month,
                    year,
                    rent: unit.monthly_rent,
                    utilities: unit.standard_utilities(),
                    total: unit.standard_total(),
                    is_paid: false,
                    notes: rental::Notes::default(),
                    rental_id: None,
                    exists: false,
                },
            }
        })
        .collect()
}

/// A stored [`Rental`] row that a standard rent change would overwrite.
#[derive(Clone, Debug)]
pub struct AffectedRental {
    /// The affected [`Rental`] row, with its current amounts.
    pub rental: Rental,

    /// Total amount the row would carry under the proposed standard values.
    pub new_amount: Money,
}

/// Collects the stored `rentals` of the `unit` at or after `since` whose
/// explicitly overridden portions differ from the `unit`'s current standard
/// values, chronologically ordered.
///
/// These are the rows a standard rent change to `new_rent`/`new_utilities`
/// would destructively overwrite, so callers must confirm before applying.
/// Rows with `NULL` portions track the standard by definition and are never
/// reported.
#[must_use]
pub fn propagation_conflicts(
    unit: &Unit,
    rentals: &[Rental],
    since: YearMonth,
    new_rent: Money,
    new_utilities: Option<Money>,
) -> Vec<AffectedRental> {
    let new_amount = new_rent + new_utilities.unwrap_or(Money::ZERO);

    let mut affected = rentals
        .iter()
        .filter(|r| r.year_month() >= since)
        .filter(|r| {
            r.rent.is_some_and(|rent| rent != unit.monthly_rent)
                || r.utilities
                    .is_some_and(|u| u != unit.standard_utilities())
        })
        .map(|r| AffectedRental {
            rental: r.clone(),
            new_amount,
        })
        .collect::<Vec<_>>();
    affected.sort_by_key(|a| a.rental.year_month());

    affected
}

#[cfg(test)]
mod spec {
    use common::{DateTimeOf, Money, Month, Year, YearMonth};

    use crate::domain::{rental, unit, Rental, Unit};

    use super::{propagation_conflicts, reconcile};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn unit(rent: &str, utilities: Option<&str>) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id: crate::domain::property::Id::new(),
            name: unit::Name::new("EG links").unwrap(),
            kind: unit::Kind::Apartment,
            monthly_rent: money(rent),
            monthly_utilities: utilities.map(money),
            size: None,
            is_active: true,
            created_at: DateTimeOf::<()>::now().coerce(),
        }
    }

    fn rental(
        unit: &Unit,
        month: u8,
        year: i32,
        rent: Option<&str>,
        utilities: Option<&str>,
        amount: &str,
    ) -> Rental {
        Rental {
            id: rental::Id::new(),
            unit_id: unit.id,
            month: Month::new(month).unwrap(),
            year: Year::new(year).unwrap(),
            rent: rent.map(money),
            utilities: utilities.map(money),
            amount: money(amount),
            is_paid: false,
            notes: rental::Notes::default(),
            created_at: DateTimeOf::<()>::now().coerce(),
        }
    }

    fn year(y: i32) -> Year {
        Year::new(y).unwrap()
    }

    fn since(y: i32, m: u8) -> YearMonth {
        YearMonth::new(year(y), Month::new(m).unwrap())
    }

    // With no stored rows at all, every month is synthesized from the
    // standard rent/utilities.
    #[test]
    fn synthesizes_all_twelve_months() {
        let unit = unit("1000", Some("100"));

        let overview = reconcile(&unit, &[], year(2025));

        assert_eq!(overview.len(), 12);
        for (i, entry) in overview.iter().enumerate() {
            assert_eq!(usize::from(entry.month.number()), i + 1);
            assert_eq!(entry.year, year(2025));
            assert_eq!(entry.rent, money("1000"));
            assert_eq!(entry.utilities, money("100"));
            assert_eq!(entry.total, money("1100"));
            assert!(!entry.is_paid);
            assert!(!entry.exists);
            assert!(entry.rental_id.is_none());
        }
    }

    #[test]
    fn always_returns_twelve_ordered_months() {
        let unit = unit("800", None);
        let stored = [
            rental(&unit, 12, 2025, Some("900"), None, "900"),
            rental(&unit, 1, 2025, None, None, "800"),
            rental(&unit, 6, 2024, Some("700"), None, "700"),
        ];

        let overview = reconcile(&unit, &stored, year(2025));

        assert_eq!(overview.len(), 12);
        assert!(overview
            .windows(2)
            .all(|w| w[0].month < w[1].month));
        // The 2024 row must not leak into the 2025 overview.
        assert!(!overview[5].exists);
        assert!(overview[0].exists);
        assert!(overview[11].exists);
    }

    #[test]
    fn stored_row_falls_back_per_portion() {
        let unit = unit("1000", Some("100"));
        let stored = [rental(&unit, 3, 2025, Some("1200"), None, "1300")];

        let overview = reconcile(&unit, &stored, year(2025));

        let march = &overview[2];
        assert!(march.exists);
        assert_eq!(march.rent, money("1200"));
        assert_eq!(march.utilities, money("100"));
        assert_eq!(march.total, money("1300"));
        assert_eq!(march.rental_id, Some(stored[0].id));
    }

    // The persisted total of a stored row is returned verbatim, even when it
    // no longer matches the sum of its portions.
    #[test]
    fn stored_total_is_trusted_verbatim() {
        let unit = unit("1000", Some("100"));
        let stored = [rental(&unit, 7, 2025, None, None, "999")];

        let overview = reconcile(&unit, &stored, year(2025));

        let july = &overview[6];
        assert_eq!(july.rent, money("1000"));
        assert_eq!(july.utilities, money("100"));
        assert_eq!(july.total, money("999"));
    }

    #[test]
    fn missing_utilities_standard_counts_as_zero() {
        let unit = unit("1000", None);

        let overview = reconcile(&unit, &[], year(2025));

        assert_eq!(overview[0].utilities, Money::ZERO);
        assert_eq!(overview[0].total, money("1000"));
    }

    #[test]
    fn conflicts_report_overridden_future_rows() {
        let unit = unit("1000", Some("100"));
        let overridden = rental(&unit, 3, 2025, Some("1200"), None, "1300");
        let stored = [
            overridden.clone(),
            // Tracks the standard, never a conflict.
            rental(&unit, 4, 2025, None, None, "1100"),
            // Explicit portions equal to the standard, not a conflict.
            rental(&unit, 5, 2025, Some("1000"), Some("100"), "1100"),
        ];

        let affected = propagation_conflicts(
            &unit,
            &stored,
            since(2025, 1),
            money("1100"),
            Some(money("100")),
        );

        assert_eq!(affected.len(), 1);
        assert_eq!(affected[0].rental.id, overridden.id);
        assert_eq!(affected[0].rental.amount, money("1300"));
        assert_eq!(affected[0].new_amount, money("1200"));
    }

    #[test]
    fn conflicts_ignore_rows_before_effective_from() {
        let unit = unit("1000", Some("100"));
        let stored = [
            rental(&unit, 2, 2025, Some("1200"), None, "1300"),
            rental(&unit, 11, 2024, Some("950"), None, "1050"),
        ];

        let affected = propagation_conflicts(
            &unit,
            &stored,
            since(2025, 2),
            money("1100"),
            Some(money("100")),
        );

        assert_eq!(affected.len(), 1);
        assert_eq!(affected[0].rental.id, stored[0].id);
    }

    #[test]
    fn overridden_utilities_alone_conflict() {
        let unit = unit("1000", Some("100"));
        let stored = [rental(&unit, 8, 2025, None, Some("150"), "1150")];

        let affected = propagation_conflicts(
            &unit,
            &stored,
            since(2025, 1),
            money("1000"),
            Some(money("120")),
        );

        assert_eq!(affected.len(), 1);
        assert_eq!(affected[0].new_amount, money("1120"));
    }

    #[test]
    fn conflicts_are_chronologically_ordered() {
        let unit = unit("1000", None);
        let stored = [
            rental(&unit, 1, 2026, Some("1300"), None, "1300"),
            rental(&unit, 9, 2025, Some("1200"), None, "1200"),
            rental(&unit, 3, 2026, Some("1400"), None, "1400"),
        ];

        let affected = propagation_conflicts(
            &unit,
            &stored,
            since(2025, 1),
            money("1100"),
            None,
        );

        let months = affected
            .iter()
            .map(|a| a.rental.year_month())
            .collect::<Vec<_>>();
        assert_eq!(
            months,
            vec![since(2025, 9), since(2026, 1), since(2026, 3)],
        );
    }
}
