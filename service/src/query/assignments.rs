//! [`Query`] collection related to [`Assignment`]s.

use common::operations::By;

use crate::domain::{assignment, person, Assignment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Assignment`]s of an [`assignment::Target`], active and
/// deactivated alike, newest first.
pub type OfTarget = DatabaseQuery<By<Vec<Assignment>, assignment::Target>>;

/// Queries all [`Assignment`]s of a [`person::Id`], active and deactivated
/// alike, newest first.
pub type OfPerson = DatabaseQuery<By<Vec<Assignment>, person::Id>>;
