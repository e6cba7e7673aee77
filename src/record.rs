//! Record types shared between the crawler and the output sink
//!
//! This module defines the recognized product fields and the per-product
//! record that the extractor produces and the CSV report consumes.

use std::collections::BTreeMap;
use std::fmt;

/// The product metadata fields recognized by the extractor
///
/// Declaration order is the canonical order; it fixes the column order of the
/// CSV report regardless of the order flags were passed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    /// Gross unit price as a decimal string (e.g. "42.90")
    GrossUnitPrice,

    /// Full display name of the product
    FullName,

    /// Free-text description supplied by the producer
    DescriptionFromSupplier,

    /// Language the product metadata is written in
    LanguageName,
}

impl ProductField {
    /// All recognized fields in canonical order
    pub const ALL: [ProductField; 4] = [
        ProductField::GrossUnitPrice,
        ProductField::FullName,
        ProductField::DescriptionFromSupplier,
        ProductField::LanguageName,
    ];

    /// Returns the key this field is stored under in the embedded data block
    ///
    /// The same string is used as the CSV column header.
    pub fn key(&self) -> &'static str {
        match self {
            ProductField::GrossUnitPrice => "grossUnitPrice",
            ProductField::FullName => "fullName",
            ProductField::DescriptionFromSupplier => "descriptionFromSupplier",
            ProductField::LanguageName => "languageName",
        }
    }

    /// Returns true if this field holds a decimal price value
    ///
    /// Price fields use a digits-and-decimal-point extraction pattern; all
    /// other fields use a quoted-string pattern.
    pub fn is_price(&self) -> bool {
        matches!(self, ProductField::GrossUnitPrice)
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Extracted metadata for a single product page
///
/// A record always carries exactly the fields that were requested for the
/// run, each present with a value or an explicit `None`. This keeps the field
/// set stable across all records handed to the report writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    values: BTreeMap<ProductField, Option<String>>,
}

impl ProductRecord {
    /// Creates a record carrying the given fields, all unset
    pub fn with_fields(fields: &[ProductField]) -> Self {
        let values = fields.iter().map(|f| (*f, None)).collect();
        Self { values }
    }

    /// Stores a value (or explicit absence) for a field
    pub fn set(&mut self, field: ProductField, value: Option<String>) {
        self.values.insert(field, value);
    }

    /// Returns the value of a field, if the field is carried and matched
    pub fn get(&self, field: ProductField) -> Option<&str> {
        self.values.get(&field).and_then(|v| v.as_deref())
    }

    /// Iterates the carried fields in canonical order
    pub fn fields(&self) -> impl Iterator<Item = ProductField> + '_ {
        self.values.keys().copied()
    }

    /// Iterates `(field, value)` pairs in canonical order
    pub fn entries(&self) -> impl Iterator<Item = (ProductField, Option<&str>)> {
        self.values.iter().map(|(f, v)| (*f, v.as_deref()))
    }

    /// Number of fields carried by this record
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name to show in progress output
    ///
    /// Falls back to a placeholder when the full name was not requested or
    /// did not match.
    pub fn display_name(&self) -> &str {
        self.get(ProductField::FullName).unwrap_or("Unnamed product")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys() {
        assert_eq!(ProductField::GrossUnitPrice.key(), "grossUnitPrice");
        assert_eq!(ProductField::FullName.key(), "fullName");
        assert_eq!(
            ProductField::DescriptionFromSupplier.key(),
            "descriptionFromSupplier"
        );
        assert_eq!(ProductField::LanguageName.key(), "languageName");
    }

    #[test]
    fn test_only_price_field_is_price() {
        let prices: Vec<_> = ProductField::ALL.iter().filter(|f| f.is_price()).collect();
        assert_eq!(prices, vec![&ProductField::GrossUnitPrice]);
    }

    #[test]
    fn test_record_carries_requested_fields_unset() {
        let record =
            ProductRecord::with_fields(&[ProductField::FullName, ProductField::GrossUnitPrice]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(ProductField::FullName), None);
        assert_eq!(record.get(ProductField::GrossUnitPrice), None);
    }

    #[test]
    fn test_record_field_order_is_canonical() {
        // Request in reverse order; iteration must come back canonical.
        let record =
            ProductRecord::with_fields(&[ProductField::LanguageName, ProductField::GrossUnitPrice]);
        let fields: Vec<_> = record.fields().collect();
        assert_eq!(
            fields,
            vec![ProductField::GrossUnitPrice, ProductField::LanguageName]
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut record = ProductRecord::with_fields(&[ProductField::FullName]);
        record.set(ProductField::FullName, Some("Melk".to_string()));
        assert_eq!(record.get(ProductField::FullName), Some("Melk"));
    }

    #[test]
    fn test_display_name_fallback() {
        let record = ProductRecord::with_fields(&[ProductField::GrossUnitPrice]);
        assert_eq!(record.display_name(), "Unnamed product");

        let mut named = ProductRecord::with_fields(&[ProductField::FullName]);
        named.set(ProductField::FullName, Some("Brunost".to_string()));
        assert_eq!(named.display_name(), "Brunost");
    }
}
