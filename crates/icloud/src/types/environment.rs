//! Container environment.

use super::wire::wire_enum;

wire_enum! {
    /// Environment of an app's container.
    pub enum Environment as "environment" {
        /// Not accessible by apps available on the store.
        Development => "development",
        /// Accessible by development apps and apps available on the store.
        Production => "production",
    }
}
