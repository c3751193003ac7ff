//! [`Query`] collection related to multiple [`Unit`]s.

use common::operations::By;

use crate::domain::{property, Unit};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Unit`]s of a [`property::Id`], ordered by name.
pub type OfProperty = DatabaseQuery<By<Vec<Unit>, property::Id>>;
