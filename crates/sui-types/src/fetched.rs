//! Object and coin data returned by the query service.
//!
//! These are the transport-neutral shapes resolution works with. Transport
//! implementations convert their wire responses into them.

use serde::{Deserialize, Serialize};

use crate::address::{ObjectDigest, ObjectId, SuiAddress};
use crate::transaction::ObjectRef;

/// Object ownership as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    AddressOwner(SuiAddress),
    /// Owned by another object (dynamic fields, wrapped children).
    ObjectOwner(SuiAddress),
    Shared { initial_shared_version: u64 },
    Immutable,
}

impl Owner {
    pub fn is_shared(&self) -> bool {
        matches!(self, Owner::Shared { .. })
    }

    /// Version the object became shared at, for shared objects.
    pub fn initial_shared_version(&self) -> Option<u64> {
        match self {
            Owner::Shared {
                initial_shared_version,
            } => Some(*initial_shared_version),
            _ => None,
        }
    }
}

/// Current metadata of a live object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectData {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
    pub owner: Owner,
}

impl ObjectData {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.object_id,
            version: self.version,
            digest: self.digest,
        }
    }
}

/// One entry of a batched object lookup, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectResponse {
    Exists(ObjectData),
    /// Deleted, wrapped, or never existed.
    NotFound { object_id: ObjectId },
}

impl ObjectResponse {
    pub fn object_id(&self) -> ObjectId {
        match self {
            ObjectResponse::Exists(data) => data.object_id,
            ObjectResponse::NotFound { object_id } => *object_id,
        }
    }

    pub fn data(&self) -> Option<&ObjectData> {
        match self {
            ObjectResponse::Exists(data) => Some(data),
            ObjectResponse::NotFound { .. } => None,
        }
    }
}

/// A coin owned by an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinObject {
    pub coin_type: String,
    pub coin_object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
    pub balance: u64,
}

impl CoinObject {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.coin_object_id,
            version: self.version,
            digest: self.digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_shared_version() {
        let shared = Owner::Shared {
            initial_shared_version: 42,
        };
        assert!(shared.is_shared());
        assert_eq!(shared.initial_shared_version(), Some(42));
        assert!(!Owner::Immutable.is_shared());
        assert_eq!(
            Owner::AddressOwner(SuiAddress::from_u16(1)).initial_shared_version(),
            None
        );
    }

    #[test]
    fn test_object_response_accessors() {
        let data = ObjectData {
            object_id: SuiAddress::from_u16(5),
            version: 3,
            digest: ObjectDigest::new([1; 32]),
            owner: Owner::Immutable,
        };
        let found = ObjectResponse::Exists(data.clone());
        assert_eq!(found.object_id(), SuiAddress::from_u16(5));
        assert_eq!(found.data().map(|d| d.object_ref().version), Some(3));

        let missing = ObjectResponse::NotFound {
            object_id: SuiAddress::from_u16(6),
        };
        assert!(missing.data().is_none());
        assert_eq!(missing.object_id(), SuiAddress::from_u16(6));
    }
}
