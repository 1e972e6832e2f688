//! Identifiers for arena-owned entities.

use serde::{Deserialize, Serialize};

/// Handle to a bone inside a [`Skeleton`](crate::skeleton::Skeleton) arena.
/// Dense indices in insertion order; opaque externally.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        BoneId(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        assert_eq!(BoneId::from_index(3), BoneId(3));
        assert_eq!(BoneId(7).index(), 7);
    }
}
