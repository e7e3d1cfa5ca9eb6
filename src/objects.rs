use crate::id::{AssetId, WalletId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Current wall-clock time in seconds since the Unix epoch
pub fn current_time_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

// Enums that travel as snake_case strings. Parsing never fails: anything that is
// not a known value becomes the fallback variant.
macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The canonical wire value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Look up an exact wire value
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Parse a wire value, falling back to the default variant if unrecognized
            pub fn parse(value: &str) -> Self {
                Self::from_wire(value).unwrap_or($name::$fallback)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$fallback
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::parse(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok($name::parse(&value))
            }
        }
    };
}

lenient_enum!(
    /// Category of the underlying item an asset tokenizes
    AssetType, fallback = Other {
        Equity => "equity",
        Debt => "debt",
        RealEstate => "real_estate",
        Commodity => "commodity",
        Fund => "fund",
        IntellectualProperty => "intellectual_property",
        Art => "art",
        CarbonCredit => "carbon_credit",
        Other => "other",
    }
);

lenient_enum!(
    /// Regulatory review state of an asset
    ComplianceStatus, fallback = Pending {
        /// Not yet reviewed; every asset starts here
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        UnderReview => "under_review",
    }
);

lenient_enum!(
    /// Custody model of a wallet
    WalletType, fallback = Custodial {
        /// Keys are held by the platform on behalf of the owner
        Custodial => "custodial",
        /// Keys are held by the owner
        NonCustodial => "non_custodial",
        /// Keys are split between the platform and the owner
        Hybrid => "hybrid",
    }
);

/// TokenizedAsset is a tokenized representation of an item of value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizedAsset {
    /// Caller-assigned unique identifier
    pub id: AssetId,

    /// Human-readable name
    pub name: String,

    /// Category of the tokenized item
    pub asset_type: AssetType,

    /// Monetary value
    pub value: f64,

    /// Opaque identifier of the owning party
    pub owner: String,

    /// Free-form key/value metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Regulatory review state
    #[serde(default)]
    pub compliance_status: ComplianceStatus,

    /// Creation time (Unix seconds)
    pub created_at: u64,

    /// Last modification time (Unix seconds)
    pub updated_at: u64,
}

impl TokenizedAsset {
    /// Create a new asset in the `pending` compliance state, stamped with the current time
    pub fn new(
        id: impl Into<AssetId>,
        name: impl Into<String>,
        asset_type: AssetType,
        value: f64,
        owner: impl Into<String>,
        metadata: HashMap<String, String>,
    ) -> Self {
        let now = current_time_secs();
        Self {
            id: id.into(),
            name: name.into(),
            asset_type,
            value,
            owner: owner.into(),
            metadata,
            compliance_status: ComplianceStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at` to the current time
    pub fn touch(&mut self) {
        self.updated_at = current_time_secs();
    }
}

/// DigitalWallet associates an owner with a set of asset references.
///
/// `assets` is a membership list, not ownership: the assets themselves live in
/// the registry. `balance` is maintained incrementally as members come and go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalWallet {
    /// Caller-assigned unique identifier
    pub id: WalletId,

    /// Opaque identifier of the owning party
    pub owner: String,

    /// Member asset IDs in insertion order, without duplicates
    #[serde(default)]
    pub assets: Vec<AssetId>,

    /// Sum of member asset values, as of each membership change
    #[serde(default)]
    pub balance: f64,

    /// Custody model
    pub wallet_type: WalletType,

    /// Creation time (Unix seconds)
    pub created_at: u64,

    /// Last modification time (Unix seconds)
    pub updated_at: u64,
}

impl DigitalWallet {
    /// Create an empty wallet, stamped with the current time
    pub fn new(id: impl Into<WalletId>, owner: impl Into<String>, wallet_type: WalletType) -> Self {
        let now = current_time_secs();
        Self {
            id: id.into(),
            owner: owner.into(),
            assets: Vec::new(),
            balance: 0.0,
            wallet_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether an asset is a member of this wallet
    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.iter().any(|id| id.as_str() == asset_id)
    }

    /// Refresh `updated_at` to the current time
    pub fn touch(&mut self) {
        self.updated_at = current_time_secs();
    }
}
