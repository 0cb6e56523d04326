//! Property listing model
//!
//! A `Property` is owned by the store: it is created from a validated
//! [`NewProperty`] payload, mutated only through [`PropertyPatch`] merges,
//! and destroyed by explicit delete. Identity is assigned at creation and
//! never changes.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::core::error::{FieldViolation, ValidationError};

/// Maximum number of images attached to one property
pub const MAX_IMAGES: usize = 10;

fn zip_regex() -> &'static Regex {
    static ZIP: OnceLock<Regex> = OnceLock::new();
    ZIP.get_or_init(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip pattern"))
}

/// Property category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Villa,
    Townhouse,
}

impl PropertyType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "house" => Some(PropertyType::House),
            "apartment" => Some(PropertyType::Apartment),
            "condo" => Some(PropertyType::Condo),
            "villa" => Some(PropertyType::Villa),
            "townhouse" => Some(PropertyType::Townhouse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Condo => "condo",
            PropertyType::Villa => "villa",
            PropertyType::Townhouse => "townhouse",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a listing
///
/// Listings stay visible in every state; the client's favorites view only
/// keeps featured listings that are still `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Pending,
    Sold,
    Rented,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
        }
    }
}

/// Postal location of a property; all fields required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Reference to a stored image file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Original file name as uploaded
    pub file_name: String,
    /// Public URL of the stored file
    pub url: String,
}

/// A listed real-estate record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Unique identifier, assigned at creation, immutable
    pub id: Uuid,

    pub title: String,
    pub description: String,
    pub price: f64,

    #[serde(rename = "type")]
    pub property_type: PropertyType,

    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Living area in square feet
    pub area: u32,

    pub location: Location,

    /// Free-text amenity labels; no fixed enumeration enforced
    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub status: PropertyStatus,

    /// Ordered stored-file references, attached at creation
    #[serde(default)]
    pub images: Vec<ImageRef>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Build a property from a validated payload, assigning identity
    pub fn from_new(new: NewProperty, images: Vec<ImageRef>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            price: new.price,
            property_type: new.property_type,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            area: new.area,
            location: new.location,
            amenities: new.amenities,
            featured: new.featured,
            status: new.status,
            images,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Creation payload for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: f64,

    #[serde(rename = "type")]
    pub property_type: PropertyType,

    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: u32,

    pub location: Location,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub status: PropertyStatus,
}

impl NewProperty {
    /// Build a creation payload from multipart form fields.
    ///
    /// Numeric fields are coerced from their textual form representation;
    /// coercion failures and missing required fields are collected as
    /// violations rather than reported one at a time.
    pub fn from_form(fields: &HashMap<String, Vec<String>>) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();

        let text = |name: &str, violations: &mut Vec<FieldViolation>| -> String {
            match fields.get(name).and_then(|v| v.first()) {
                Some(value) => value.clone(),
                None => {
                    violations.push(FieldViolation::new(name, "is required"));
                    String::new()
                }
            }
        };

        let title = text("title", &mut violations);
        let description = text("description", &mut violations);
        let address = text("address", &mut violations);
        let city = text("city", &mut violations);
        let state = text("state", &mut violations);
        let zip_code = text("zipCode", &mut violations);

        let price = parse_number::<f64>(fields, "price", &mut violations);
        let bedrooms = parse_number::<u32>(fields, "bedrooms", &mut violations);
        let bathrooms = parse_number::<u32>(fields, "bathrooms", &mut violations);
        let area = parse_number::<u32>(fields, "area", &mut violations);

        let property_type = match fields.get("type").and_then(|v| v.first()) {
            Some(raw) => PropertyType::parse(raw).unwrap_or_else(|| {
                violations.push(FieldViolation::new(
                    "type",
                    "must be one of house, apartment, condo, villa, townhouse",
                ));
                PropertyType::House
            }),
            None => {
                violations.push(FieldViolation::new("type", "is required"));
                PropertyType::House
            }
        };

        let featured = fields
            .get("featured")
            .and_then(|v| v.first())
            .map(|v| v == "true")
            .unwrap_or(false);

        let amenities = fields.get("amenities").cloned().unwrap_or_default();

        if !violations.is_empty() {
            return Err(ValidationError::FieldErrors(violations));
        }

        Ok(Self {
            title,
            description,
            price,
            property_type,
            bedrooms,
            bathrooms,
            area,
            location: Location {
                address,
                city,
                state,
                zip_code,
            },
            amenities,
            featured,
            status: PropertyStatus::Available,
        })
    }

    /// Check semantic constraints, collecting every violation
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push(FieldViolation::new("title", "must not be empty"));
        }
        if self.description.trim().is_empty() {
            violations.push(FieldViolation::new("description", "must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            violations.push(FieldViolation::new("price", "must be non-negative"));
        }
        validate_location(&self.location, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(violations))
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    fields: &HashMap<String, Vec<String>>,
    name: &str,
    violations: &mut Vec<FieldViolation>,
) -> T
where
    T: Default,
{
    match fields.get(name).and_then(|v| v.first()) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            violations.push(FieldViolation::new(name, "must be a non-negative number"));
            T::default()
        }),
        None => {
            violations.push(FieldViolation::new(name, "is required"));
            T::default()
        }
    }
}

fn validate_location(location: &Location, violations: &mut Vec<FieldViolation>) {
    if location.address.trim().is_empty() {
        violations.push(FieldViolation::new("address", "must not be empty"));
    }
    if location.city.trim().is_empty() {
        violations.push(FieldViolation::new("city", "must not be empty"));
    }
    if location.state.trim().is_empty() {
        violations.push(FieldViolation::new("state", "must not be empty"));
    }
    if !zip_regex().is_match(&location.zip_code) {
        violations.push(FieldViolation::new(
            "zipCode",
            "must be a ZIP code (12345 or 12345-6789)",
        ));
    }
}

/// Partial update for a property; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,

    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,

    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<u32>,
    pub location: Option<Location>,
    pub amenities: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub status: Option<PropertyStatus>,
}

impl PropertyPatch {
    /// Check the provided fields, collecting every violation
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                violations.push(FieldViolation::new("title", "must not be empty"));
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                violations.push(FieldViolation::new("description", "must not be empty"));
            }
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                violations.push(FieldViolation::new("price", "must be non-negative"));
            }
        }
        if let Some(location) = &self.location {
            validate_location(location, &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(violations))
        }
    }

    /// Merge the provided fields into a property and refresh its timestamp
    pub fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(area) = self.area {
            property.area = area;
        }
        if let Some(location) = self.location {
            property.location = location;
        }
        if let Some(amenities) = self.amenities {
            property.amenities = amenities;
        }
        if let Some(featured) = self.featured {
            property.featured = featured;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        property.touch();
    }
}

/// Search filter over the property collection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    /// Case-insensitive substring match on address, city, or state
    pub location: Option<String>,

    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,

    /// Inclusive price bounds as "min-max"; either side may be omitted
    pub price_range: Option<String>,

    pub status: Option<PropertyStatus>,
}

impl PropertyQuery {
    /// Pure predicate over one property
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(needle) = &self.location {
            let needle = needle.to_lowercase();
            let location = &property.location;
            let hit = location.address.to_lowercase().contains(&needle)
                || location.city.to_lowercase().contains(&needle)
                || location.state.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(property_type) = self.property_type {
            if property.property_type != property_type {
                return false;
            }
        }

        if let Some(range) = &self.price_range {
            let (min, max) = parse_price_range(range);
            if let Some(min) = min {
                if property.price < min {
                    return false;
                }
            }
            if let Some(max) = max {
                if property.price > max {
                    return false;
                }
            }
        }

        if let Some(status) = self.status {
            if property.status != status {
                return false;
            }
        }

        true
    }
}

fn parse_price_range(range: &str) -> (Option<f64>, Option<f64>) {
    let (min, max) = match range.split_once('-') {
        Some((min, max)) => (min, max),
        None => (range, ""),
    };
    (min.trim().parse().ok(), max.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(entries: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in entries {
            map.entry(k.to_string())
                .or_default()
                .push(v.to_string());
        }
        map
    }

    fn valid_form() -> HashMap<String, Vec<String>> {
        form(&[
            ("title", "Sunny Loft"),
            ("description", "Bright two-bedroom loft downtown"),
            ("price", "325000"),
            ("type", "apartment"),
            ("bedrooms", "2"),
            ("bathrooms", "1"),
            ("area", "980"),
            ("address", "12 Main St"),
            ("city", "Springfield"),
            ("state", "IL"),
            ("zipCode", "62704"),
            ("amenities", "Balcony"),
            ("amenities", "Elevator"),
            ("featured", "true"),
        ])
    }

    pub(crate) fn sample_new() -> NewProperty {
        NewProperty::from_form(&valid_form()).unwrap()
    }

    #[test]
    fn test_from_form_coerces_numbers() {
        let new = sample_new();
        assert_eq!(new.price, 325_000.0);
        assert_eq!(new.bedrooms, 2);
        assert_eq!(new.area, 980);
        assert!(new.featured);
        assert_eq!(new.amenities, vec!["Balcony", "Elevator"]);
        assert_eq!(new.property_type, PropertyType::Apartment);
    }

    #[test]
    fn test_from_form_collects_all_missing_fields() {
        let err = NewProperty::from_form(&form(&[("title", "X")])).unwrap_err();
        let ValidationError::FieldErrors(violations) = err else {
            panic!("expected field errors");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"price"));
        assert!(fields.contains(&"zipCode"));
        assert!(!fields.contains(&"title"));
    }

    #[test]
    fn test_from_form_rejects_unparseable_number() {
        let mut fields = valid_form();
        fields.insert("bedrooms".to_string(), vec!["two".to_string()]);
        let err = NewProperty::from_form(&fields).unwrap_err();
        assert!(err.to_string().contains("bedrooms"));
    }

    #[test]
    fn test_from_form_rejects_unknown_type() {
        let mut fields = valid_form();
        fields.insert("type".to_string(), vec!["castle".to_string()]);
        assert!(NewProperty::from_form(&fields).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price_and_empty_title() {
        let mut new = sample_new();
        new.price = -1.0;
        new.title = " ".to_string();
        let err = new.validate().unwrap_err();
        let display = err.to_string();
        assert!(display.contains("price"));
        assert!(display.contains("title"));
    }

    #[test]
    fn test_validate_zip_format() {
        let mut new = sample_new();
        new.location.zip_code = "abcde".to_string();
        assert!(new.validate().is_err());

        new.location.zip_code = "62704-1234".to_string();
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_patch_merges_only_provided_fields() {
        let mut property = Property::from_new(sample_new(), vec![]);
        let before = property.clone();

        let patch = PropertyPatch {
            price: Some(299_000.0),
            featured: Some(false),
            ..Default::default()
        };
        patch.apply(&mut property);

        assert_eq!(property.price, 299_000.0);
        assert!(!property.featured);
        assert_eq!(property.title, before.title);
        assert_eq!(property.location, before.location);
        assert!(property.updated_at >= before.updated_at);
        assert_eq!(property.id, before.id);
    }

    #[test]
    fn test_patch_validate_rejects_negative_price() {
        let patch = PropertyPatch {
            price: Some(-5.0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let empty = PropertyPatch::default();
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_property_serializes_type_field() {
        let property = Property::from_new(sample_new(), vec![]);
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["type"], "apartment");
        assert_eq!(json["status"], "available");
        assert_eq!(json["location"]["zipCode"], "62704");
    }

    #[test]
    fn test_query_location_and_price_range() {
        let property = Property::from_new(sample_new(), vec![]);

        let query = PropertyQuery {
            location: Some("springfield".to_string()),
            price_range: Some("300000-400000".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&property));

        let query = PropertyQuery {
            price_range: Some("400000-".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&property));

        let query = PropertyQuery {
            price_range: Some("-400000".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&property));
    }

    #[test]
    fn test_query_type_and_status() {
        let mut property = Property::from_new(sample_new(), vec![]);

        let query = PropertyQuery {
            property_type: Some(PropertyType::Villa),
            ..Default::default()
        };
        assert!(!query.matches(&property));

        property.status = PropertyStatus::Sold;
        let query = PropertyQuery {
            status: Some(PropertyStatus::Available),
            ..Default::default()
        };
        assert!(!query.matches(&property));
    }
}
