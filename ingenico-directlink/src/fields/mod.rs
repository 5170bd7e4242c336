//! Gateway message payloads.
//!
//! A [`FieldSet`] is the ordered name/value list exchanged with the gateway, both for outbound
//! orders and for inbound feedback requests. Names keep the case they were written with but are
//! compared case-insensitively, so `orderID` and `ORDERID` address the same field.
//!
//! The [`builders`] module layers named setters on top of a field set and [`names`] holds the
//! wire names.
//!
//! # Examples
//!
//! ```
//! use ingenico_directlink::fields::FieldSet;
//!
//! let mut fields = FieldSet::new();
//! fields.set("orderID", "1234");
//! fields.set("ORDERID", "1235");
//!
//! assert_eq!(fields.len(), 1);
//! assert_eq!(fields.get("OrderId"), Some("1235"));
//! ```

pub mod builders;
pub mod names;

pub use builders::{
    CreditCardData, CustomerData, DirectLinkData, GeneralData, SecureData, Window3ds,
};

/// Ordered collection of gateway fields with case-insensitive name identity.
///
/// Insertion order is preserved; overwriting an existing field keeps its position and takes the
/// spelling of the latest write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(String, String)>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Sets a field, replacing any field whose name matches case-insensitively.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();

        if let Some(slot) = self.position(&name) {
            self.entries[slot] = (name, value);
        } else {
            self.entries.push((name, value));
        }
        self
    }

    /// Returns the value of a field, looked up case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|slot| self.entries[slot].1.as_str())
    }

    /// Returns `true` when a field with this name exists, even with an empty value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|slot| self.entries.remove(slot).1)
    }

    /// Snapshot of all fields as ordered pairs.
    #[must_use]
    pub fn all(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }

    /// Copies every field of `other` into this set; fields of `other` win on conflict.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        for (name, value) in &other.entries {
            self.set(name.as_str(), value.as_str());
        }
        self
    }

    /// Returns a copy of this set with every name converted to ASCII uppercase.
    ///
    /// Inbound requests are normalised this way before they are inspected.
    #[must_use]
    pub fn to_uppercase_names(&self) -> Self {
        self.entries.iter().map(|(name, value)| (name.to_ascii_uppercase(), value.clone())).collect()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the set holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        fields.extend(iter);
        fields
    }
}

impl<K, V> Extend<(K, V)> for FieldSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
