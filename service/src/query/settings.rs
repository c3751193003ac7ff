//! [`Query`] collection related to [`Settings`].

use common::operations::By;

use crate::domain::{property, Settings};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the persisted [`Settings`] of a [`property::Id`].
///
/// [`None`] means no row has been persisted yet; callers fall back to
/// [`Settings::defaults()`].
pub type OfProperty = DatabaseQuery<By<Option<Settings>, property::Id>>;
