//! The [`Component`] contract generated accessors are written against.
//!
//! ## Type identity
//!
//! [`ComponentTypeId`] is the FNV-1a 64-bit hash of the component's declared
//! name, so the id a generator computes from the schema and the id the
//! runtime computes from the Rust type agree without sharing any state.

/// Identifies a component type by the FNV-1a hash of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self::from_name(C::type_name())
    }
}

/// Data attachable to an entity.
///
/// `Default` supplies the `old` value of a `Changed` record when a replace
/// targets an entity that did not hold the component. `PartialEq` is the
/// structural equality used to silence no-op replaces.
///
/// ```rust
/// use ecsgen_runtime::Component;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Health {
///     current: i32,
///     max: i32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Clone + PartialEq + Default + Send + Sync + 'static {
    /// The declared component name.
    fn type_name() -> &'static str;

    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }
}
