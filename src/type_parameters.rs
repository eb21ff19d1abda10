//! Type parameters that key generic instantiations of an entry
//!
//! `Repository<User>` and `Repository<Order>` are the same entry name
//! with different [`TypeParameters`]. Equality is positional, so
//! `[A, B]` and `[B, A]` are different instantiations.

use smallvec::SmallVec;
use twox_hash::XxHash64;
use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::Arc
};

const DIGEST_SEED: u64 = 0;
const DEFAULT_PARAMS_COUNT: usize = 2;

/// A single type identity, represented by its canonical type name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter(Arc<str>);

impl TypeParameter {
    /// Creates a type parameter from a type name
    #[inline]
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self(type_name.into())
    }

    /// Creates a type parameter for the Rust type `T`
    #[inline]
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Returns the type name
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.0
    }

    #[inline]
    fn digest(&self) -> u64 {
        XxHash64::oneshot(DIGEST_SEED, self.0.as_bytes())
    }
}

impl Debug for TypeParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

impl Display for TypeParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeParameter {
    #[inline]
    fn from(type_name: &str) -> Self {
        Self::new(type_name)
    }
}

impl From<String> for TypeParameter {
    #[inline]
    fn from(type_name: String) -> Self {
        Self::new(type_name)
    }
}

/// An ordered, immutable list of [`TypeParameter`]
///
/// The digest is computed once on construction: every parameter's type name
/// is hashed, then the ordered concatenation of those hashes is hashed again.
#[derive(Clone)]
pub struct TypeParameters {
    params: SmallVec<[TypeParameter; DEFAULT_PARAMS_COUNT]>,
    digest: u64
}

impl Default for TypeParameters {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl TypeParameters {
    /// Creates type parameters from an ordered list of type names
    #[inline]
    pub fn new<I>(params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeParameter>
    {
        Self::from_params(params.into_iter().map(Into::into).collect())
    }

    /// Creates the "no generic parameters" value
    #[inline]
    pub fn empty() -> Self {
        Self::from_params(SmallVec::new())
    }

    fn from_params(params: SmallVec<[TypeParameter; DEFAULT_PARAMS_COUNT]>) -> Self {
        let digests = params
            .iter()
            .flat_map(|p| p.digest().to_le_bytes())
            .collect::<Vec<u8>>();
        let digest = XxHash64::oneshot(DIGEST_SEED, &digests);
        Self { params, digest }
    }

    /// Returns the deterministic digest of this list
    #[inline]
    pub fn digest(&self) -> u64 {
        self.digest
    }

    /// Returns `true` if there is at least one type parameter
    #[inline]
    pub fn has_type_parameters(&self) -> bool {
        !self.params.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the type parameter at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TypeParameter> {
        self.params.get(index)
    }

    /// Returns `true` if the list contains `param` at any position
    #[inline]
    pub fn contains(&self, param: &TypeParameter) -> bool {
        self.params.contains(param)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TypeParameter> {
        self.params.iter()
    }
}

impl<P: Into<TypeParameter>> FromIterator<P> for TypeParameters {
    #[inline]
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_params(iter.into_iter().map(Into::into).collect())
    }
}

impl PartialEq for TypeParameters {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

impl Eq for TypeParameters {}

impl Hash for TypeParameters {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest);
    }
}

impl Debug for TypeParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.params.iter()).finish()
    }
}

impl Display for TypeParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(param.type_name())?;
        }
        Ok(())
    }
}
