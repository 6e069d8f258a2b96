//! Entity name derivations.
//!
//! The Admin API spells the same entity differently depending on where it
//! shows up: `product_manufacturer` in the DAL, `product-manufacturer` in URL
//! paths and the entity-definition document, and `ProductManufacturer` in
//! OpenAPI component names.

use heck::ToUpperCamelCase;

/// Lowercase the name and swap underscores for hyphens.
///
/// ```rust
/// use shopware_util::naming::to_kebab_entity;
///
/// assert_eq!(to_kebab_entity("Product_Manufacturer"), "product-manufacturer");
/// ```
pub fn to_kebab_entity(entity: &str) -> String {
    entity.to_lowercase().replace('_', "-")
}

/// Upper camel case spelling used for OpenAPI schema names.
///
/// This is a heuristic: schema names with extra suffixes (`ProductJsonApi`)
/// or acronyms are not derived, callers compare the result
/// case-insensitively.
///
/// ```rust
/// use shopware_util::naming::to_pascal_entity;
///
/// assert_eq!(to_pascal_entity("order_line-item"), "OrderLineItem");
/// ```
pub fn to_pascal_entity(entity: &str) -> String {
    entity.replace('-', "_").to_upper_camel_case()
}

/// Compare two entity spellings ignoring case and the `_`/`-` separator.
pub fn entity_names_match(left: &str, right: &str) -> bool {
    left.to_lowercase().replace('-', "_") == right.to_lowercase().replace('-', "_")
}
