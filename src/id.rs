use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

// Asset and wallet IDs are opaque strings assigned by the caller. They are kept as
// distinct types so one can never be used to look up the other.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Get the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }
    };
}

string_id!(
    /// AssetId identifies a tokenized asset in the registry.
    AssetId
);

string_id!(
    /// WalletId identifies a digital wallet in the registry.
    WalletId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_new_id() {
        let id = AssetId::new("asset_001");
        assert_eq!(id.as_str(), "asset_001");
        assert_eq!(&*id, "asset_001");
        assert_eq!(id.to_string(), "asset_001");
    }

    #[test]
    fn test_default_id_is_empty() {
        assert!(WalletId::default().is_empty());
    }

    #[test]
    fn test_lookup_by_str() {
        // Maps keyed by an ID can be queried with a plain &str
        let mut map = HashMap::new();
        map.insert(WalletId::from("wallet_001"), 7);

        assert_eq!(map.get("wallet_001"), Some(&7));
        assert_eq!(map.get("wallet_002"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = AssetId::from("asset_001".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"asset_001\"");

        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
