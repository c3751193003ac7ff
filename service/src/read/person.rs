//! [`Person`]-related read definitions.

#[cfg(doc)]
use crate::domain::Person;

pub mod list {
    //! [`Person`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{person, user};
    #[cfg(doc)]
    use crate::domain::Person;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = person::Id;

    /// Cursor pointing to a specific [`Person`] in a list.
    pub type Cursor = person::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug)]
    pub struct Filter {
        /// [`user::Id`] whose [`Person`]s are listed.
        ///
        /// Rows of other owners are never returned.
        pub owner_id: user::Id,

        /// [`person::Name`] (or its part) to fuzzy search for, matched
        /// against both first and last names.
        pub name: Option<person::Name>,
    }

    /// Total count of [`Person`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
