//! Session dictionary for interned object keys.
//!
//! Streams never spell out object keys inside records. Instead, dictionary
//! units bind small integer codes to key strings, and records refer to keys by
//! code. The dictionary is append-only: a code, once bound, keeps its name for
//! the rest of the session, and the session may span several streams.

use indexmap::IndexMap;
use indexmap::map::Entry;

/// A dictionary code as it appears on the wire.
///
/// Codes are ordered numerically, not by definition order. Use
/// [`Dictionary::iter`] to walk definitions in the order they arrived.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DictCode(u32);

impl DictCode {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw code for encoding/debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for DictCode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for DictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    #[error("dictionary code {0} referenced before it was defined")]
    UnknownCode(DictCode),
    #[error("dictionary code {code} already bound to {existing:?}, cannot rebind to {attempted:?}")]
    DuplicateCode {
        code: DictCode,
        existing: String,
        attempted: String,
    },
}

/// Append-only code → name table.
///
/// One instance lives for a whole decode session and is passed by `&mut` into
/// each decode call, so later streams see codes defined by earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Bindings in definition order.
    names: IndexMap<DictCode, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `code` to `name`.
    ///
    /// Re-binding a code to the name it already has is a no-op. Re-binding it
    /// to anything else fails and leaves the dictionary unchanged.
    pub fn define(&mut self, code: DictCode, name: &str) -> Result<(), DictionaryError> {
        match self.names.entry(code) {
            Entry::Occupied(slot) if slot.get() == name => Ok(()),
            Entry::Occupied(slot) => Err(DictionaryError::DuplicateCode {
                code,
                existing: slot.get().clone(),
                attempted: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(name.to_owned());
                Ok(())
            }
        }
    }

    /// Look up the name bound to `code`.
    #[inline]
    pub fn resolve(&self, code: DictCode) -> Result<&str, DictionaryError> {
        self.names
            .get(&code)
            .map(String::as_str)
            .ok_or(DictionaryError::UnknownCode(code))
    }

    #[inline]
    pub fn contains(&self, code: DictCode) -> bool {
        self.names.contains_key(&code)
    }

    /// Number of bound codes.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over bindings in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (DictCode, &str)> {
        self.names.iter().map(|(code, name)| (*code, name.as_str()))
    }
}
