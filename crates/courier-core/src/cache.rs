//! Cache capability flags.
//!
//! [`CacheFlags`] configures which entity categories the cache layer retains.
//! Each primitive flag is a single bit; named composites are computed unions
//! of primitive bits. Values are built once at configuration time and queried
//! (never mutated) for the lifetime of the owning configuration — every
//! operation returns a new value.
//!
//! # Sub-mask Queries
//!
//! [`has`](CacheFlags::has) uses sub-mask semantics: `flags.has(bit)` is true
//! iff *every* bit set in `bit` is also set in `flags`. This lets callers
//! test single categories and pre-combined groups with the same predicate:
//!
//! ```rust
//! use courier_core::CacheFlags;
//!
//! let flags = CacheFlags::DEFAULT;
//! assert!(flags.has(CacheFlags::TEXT_CHANNELS));
//! assert!(flags.has(CacheFlags::CHANNELS)); // the whole group
//! assert!(flags.missing(CacheFlags::VOICE_STATES));
//! ```

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitset selecting which entity caches are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheFlags(u32);

impl CacheFlags {
    /// No caches enabled.
    pub const NONE: Self = Self(0);

    pub const GUILDS: Self = Self(1 << 0);
    pub const DM_CHANNELS: Self = Self(1 << 1);
    pub const CATEGORIES: Self = Self(1 << 2);
    pub const TEXT_CHANNELS: Self = Self(1 << 3);
    pub const VOICE_CHANNELS: Self = Self(1 << 4);
    pub const STORE_CHANNELS: Self = Self(1 << 5);
    pub const ROLES: Self = Self(1 << 6);
    pub const ROLE_TAGS: Self = Self(1 << 7);
    pub const EMOJIS: Self = Self(1 << 8);
    pub const VOICE_STATES: Self = Self(1 << 9);
    pub const STAGE_INSTANCES: Self = Self(1 << 10);

    /// Every channel kind.
    pub const CHANNELS: Self = Self(
        Self::DM_CHANNELS.0
            | Self::CATEGORIES.0
            | Self::TEXT_CHANNELS.0
            | Self::VOICE_CHANNELS.0
            | Self::STORE_CHANNELS.0,
    );

    /// Roles together with their tags.
    pub const FULL_ROLES: Self = Self(Self::ROLES.0 | Self::ROLE_TAGS.0);

    /// The set used when no explicit configuration is given.
    pub const DEFAULT: Self = Self(Self::CHANNELS.0 | Self::ROLES.0 | Self::EMOJIS.0);

    /// Every cacheable category.
    pub const ALL: Self = Self(
        Self::CHANNELS.0
            | Self::FULL_ROLES.0
            | Self::EMOJIS.0
            | Self::VOICE_STATES.0
            | Self::STAGE_INSTANCES.0,
    );

    /// All primitive (single-bit) flags, in bit order.
    pub const PRIMITIVES: [Self; 11] = [
        Self::GUILDS,
        Self::DM_CHANNELS,
        Self::CATEGORIES,
        Self::TEXT_CHANNELS,
        Self::VOICE_CHANNELS,
        Self::STORE_CHANNELS,
        Self::ROLES,
        Self::ROLE_TAGS,
        Self::EMOJIS,
        Self::VOICE_STATES,
        Self::STAGE_INSTANCES,
    ];

    /// Returns the raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds a value from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the union of `self` and `other`.
    ///
    /// Chain calls (or use `|`) to add more than one flag at a time.
    pub const fn add(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` with all bits of `other` cleared.
    ///
    /// Clearing a bit that is not set is a no-op for that bit.
    pub const fn remove(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns `true` iff every bit set in `bit` is also set in `self`.
    pub const fn has(self, bit: Self) -> bool {
        self.0 & bit.0 == bit.0
    }

    /// Returns `true` iff [`has`](Self::has) holds for every element of `bits`.
    pub fn has_all(self, bits: &[Self]) -> bool {
        bits.iter().all(|&bit| self.has(bit))
    }

    /// Inverse of [`has`](Self::has).
    pub const fn missing(self, bit: Self) -> bool {
        !self.has(bit)
    }

    /// Returns `true` iff at least one element of `bits` fails [`has`](Self::has).
    pub fn missing_any(self, bits: &[Self]) -> bool {
        bits.iter().any(|&bit| self.missing(bit))
    }

    /// Returns `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CacheFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.add(rhs)
    }
}

impl BitOrAssign for CacheFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CacheFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_has() {
        let flags = CacheFlags::NONE.add(CacheFlags::GUILDS).add(CacheFlags::ROLES);
        assert!(flags.has(CacheFlags::GUILDS));
        assert!(flags.has(CacheFlags::ROLES));
        assert!(flags.missing(CacheFlags::EMOJIS));
    }

    #[test]
    fn remove_clears_only_named_bits() {
        let flags = CacheFlags::GUILDS | CacheFlags::ROLES;
        let flags = flags.remove(CacheFlags::GUILDS);
        assert!(!flags.has(CacheFlags::GUILDS));
        assert!(flags.has(CacheFlags::ROLES));

        // Removing an absent bit is a no-op.
        assert_eq!(flags.remove(CacheFlags::EMOJIS), flags);
    }

    #[test]
    fn has_uses_submask_semantics() {
        let flags = CacheFlags::CHANNELS | CacheFlags::ROLES;
        assert!(flags.has(CacheFlags::CHANNELS));
        assert!(flags.has(CacheFlags::TEXT_CHANNELS | CacheFlags::ROLES));
        assert!(!flags.has(CacheFlags::CHANNELS | CacheFlags::EMOJIS));

        // Partial overlap is not enough.
        let partial = CacheFlags::TEXT_CHANNELS;
        assert!(!partial.has(CacheFlags::CHANNELS));
    }

    #[test]
    fn has_all_and_missing_any() {
        let flags = CacheFlags::DEFAULT;
        assert!(flags.has_all(&[CacheFlags::ROLES, CacheFlags::EMOJIS]));
        assert!(!flags.has_all(&[CacheFlags::ROLES, CacheFlags::VOICE_STATES]));

        // missing_any(x, y) <=> missing(x) || missing(y)
        for x in CacheFlags::PRIMITIVES {
            for y in CacheFlags::PRIMITIVES {
                assert_eq!(
                    flags.missing_any(&[x, y]),
                    flags.missing(x) || flags.missing(y)
                );
            }
        }
    }

    #[test]
    fn primitives_do_not_alias() {
        for (i, a) in CacheFlags::PRIMITIVES.iter().enumerate() {
            assert!(a.bits().is_power_of_two(), "{a:?} is not a single bit");
            for b in &CacheFlags::PRIMITIVES[i + 1..] {
                assert_eq!(a.bits() & b.bits(), 0, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn composites_are_unions_of_primitives() {
        assert_eq!(
            CacheFlags::CHANNELS,
            CacheFlags::DM_CHANNELS
                | CacheFlags::CATEGORIES
                | CacheFlags::TEXT_CHANNELS
                | CacheFlags::VOICE_CHANNELS
                | CacheFlags::STORE_CHANNELS
        );
        assert_eq!(CacheFlags::FULL_ROLES, CacheFlags::ROLES | CacheFlags::ROLE_TAGS);
        assert!(CacheFlags::ALL.has(CacheFlags::DEFAULT));
        assert!(CacheFlags::ALL.has_all(&CacheFlags::PRIMITIVES[1..]));
    }
}
