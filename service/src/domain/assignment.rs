//! [`Assignment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{marker, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{person, property, unit};

/// Role assignment of a [`Person`] to a [`Target`].
///
/// At most one row exists per `(person, target)` pair. Removing an assignment
/// only deactivates it, and assigning the same pair again reactivates the
/// existing row with the new [`Role`], keeping its ID and history.
///
/// [`Person`]: crate::domain::Person
#[derive(Clone, Debug)]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: Id,

    /// ID of the assigned [`Person`].
    ///
    /// [`Person`]: crate::domain::Person
    pub person_id: person::Id,

    /// [`Target`] the [`Person`] is assigned to.
    ///
    /// [`Person`]: crate::domain::Person
    pub target: Target,

    /// [`Role`] of the [`Person`] within the [`Target`].
    ///
    /// [`Person`]: crate::domain::Person
    pub role: Role,

    /// Indicator whether this [`Assignment`] is active.
    pub is_active: bool,

    /// [`DateTime`] when this [`Assignment`] was created.
    pub created_at: CreationDateTime,
}

impl Assignment {
    /// Resolves an assignment of the provided [`Role`] against the `existing`
    /// row of the same `(person, target)` pair, returning the row to persist.
    ///
    /// An existing row (active or previously deactivated) is reused with its
    /// [`Role`] overwritten, so the `(person, target)` uniqueness cannot be
    /// violated by repeated assignments.
    #[must_use]
    pub fn assign(
        existing: Option<Self>,
        person_id: person::Id,
        target: Target,
        role: Role,
    ) -> Self {
        match existing {
            Some(existing) => Self {
                role,
                is_active: true,
                ..existing
            },
            None => Self {
                id: Id::new(),
                person_id,
                target,
                role,
                is_active: true,
                created_at: DateTimeOf::<()>::now().coerce(),
            },
        }
    }

    /// Returns this [`Assignment`] deactivated.
    #[must_use]
    pub fn deactivated(self) -> Self {
        Self {
            is_active: false,
            ..self
        }
    }
}

/// ID of an [`Assignment`].
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

/// Target of an [`Assignment`]: a whole property or a single unit.
#[derive(Clone, Copy, Debug, Eq, From, Hash, PartialEq)]
pub enum Target {
    /// Assignment to a [`Property`] (e.g. caretaker, owner).
    ///
    /// [`Property`]: crate::domain::Property
    Property(property::Id),

    /// Assignment to a [`Unit`] (e.g. tenant, guarantor).
    ///
    /// [`Unit`]: crate::domain::Unit
    Unit(unit::Id),
}

/// Free-form role of an [`Assignment`].
///
/// The role vocabulary differs between property-level and unit-level
/// assignments, but is not validated here.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Role(String);

impl Role {
    /// Creates a new [`Role`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `role` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Creates a new [`Role`] if the given `role` is valid.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Option<Self> {
        let role = role.into();
        Self::check(&role).then_some(Self(role))
    }

    /// Checks whether the given `role` is a valid [`Role`].
    fn check(role: impl AsRef<str>) -> bool {
        let role = role.as_ref();
        role.trim() == role && !role.is_empty() && role.len() <= 128
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Role`")
    }
}

/// [`DateTime`] when an [`Assignment`] was created.
pub type CreationDateTime = DateTimeOf<(Assignment, marker::Creation)>;

#[cfg(test)]
mod spec {
    use common::DateTimeOf;

    use crate::domain::{person, property, unit};

    use super::{Assignment, Id, Role, Target};

    fn role(s: &str) -> Role {
        Role::new(s).unwrap()
    }

    fn existing(is_active: bool) -> Assignment {
        Assignment {
            id: Id::new(),
            person_id: person::Id::new(),
            target: Target::Property(property::Id::new()),
            role: role("caretaker"),
            is_active,
            created_at: DateTimeOf::<()>::now().coerce(),
        }
    }

    #[test]
    fn assign_reactivates_deactivated_row() {
        let prior = existing(false);
        let assigned = Assignment::assign(
            Some(prior.clone()),
            prior.person_id,
            prior.target,
            role("owner"),
        );

        assert_eq!(assigned.id, prior.id);
        assert_eq!(assigned.role, role("owner"));
        assert!(assigned.is_active);
    }

    #[test]
    fn assign_overwrites_role_of_active_row() {
        let prior = existing(true);
        let assigned = Assignment::assign(
            Some(prior.clone()),
            prior.person_id,
            prior.target,
            role("tenant"),
        );

        assert_eq!(assigned.id, prior.id);
        assert_eq!(assigned.role, role("tenant"));
        assert!(assigned.is_active);
    }

    #[test]
    fn assign_creates_fresh_row_when_absent() {
        let person_id = person::Id::new();
        let target = Target::Unit(unit::Id::new());
        let assigned =
            Assignment::assign(None, person_id, target, role("tenant"));

        assert_eq!(assigned.person_id, person_id);
        assert_eq!(assigned.target, target);
        assert!(assigned.is_active);
    }

    #[test]
    fn deactivated_keeps_identity() {
        let prior = existing(true);
        let removed = prior.clone().deactivated();

        assert_eq!(removed.id, prior.id);
        assert_eq!(removed.role, prior.role);
        assert!(!removed.is_active);
    }
}
