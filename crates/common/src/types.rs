use serde::{Deserialize, Serialize};

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw primary key value.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw primary key value.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

row_id!(
    /// Primary key of an order.
    ///
    /// Orders are listed in ascending key order, so the key doubles as
    /// a creation sequence.
    OrderId
);

row_id!(
    /// Primary key of a catalog item.
    ItemId
);

row_id!(
    /// Primary key of an order line item.
    LineItemId
);

/// Table a restaurant order is placed for.
///
/// Construction does not validate; the lifecycle service rejects
/// non-positive values before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableNumber(i32);

impl TableNumber {
    pub fn new(number: i32) -> Self {
        Self(number)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns true if the number can identify a real table.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for TableNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TableNumber {
    fn from(number: i32) -> Self {
        Self(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_ordering_follows_raw_value() {
        let mut ids = vec![OrderId::new(3), OrderId::new(1), OrderId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![OrderId::new(1), OrderId::new(2), OrderId::new(3)]);
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&ItemId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: OrderId = serde_json::from_str("7").unwrap();
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn table_number_validity() {
        assert!(TableNumber::new(1).is_valid());
        assert!(!TableNumber::new(0).is_valid());
        assert!(!TableNumber::new(-4).is_valid());
    }
}
