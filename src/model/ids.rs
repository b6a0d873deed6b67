//! Strongly typed identifiers.
//!
//! Every id wraps a `u32` and serializes as a bare number. `Display` adds a prefix
//! (`branch_3`, `product_7`) so ids read unambiguously in logs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identifies a store branch.
    BranchId,
    "branch"
);
id_type!(
    /// Identifies a catalog product.
    ProductId,
    "product"
);
id_type!(
    /// Identifies an authenticated customer. Issued by the identity service.
    UserId,
    "user"
);
id_type!(
    /// Identifies a stored transaction line.
    TransactionId,
    "txn"
);
