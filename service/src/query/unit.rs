//! [`Query`] collection related to a single [`Unit`].

use common::operations::By;

use crate::domain::{unit, user, Unit};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Unit`] by its [`unit::Id`], scoped to the [`user::Id`]
/// transitively owning it.
///
/// Foreign and missing [`Unit`]s are indistinguishable: both resolve to
/// [`None`].
pub type ById = DatabaseQuery<By<Option<Unit>, (user::Id, unit::Id)>>;
