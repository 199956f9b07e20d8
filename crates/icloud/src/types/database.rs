//! Database selector.

use super::wire::wire_enum;

wire_enum! {
    /// Database within a container to operate on.
    pub enum Database as "database" {
        /// Accessible to all users of the app.
        Public => "public",
        /// Private data visible only to the current user.
        Private => "private",
        /// Records shared with the current user.
        Shared => "shared",
    }
}
