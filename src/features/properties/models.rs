use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "property_purpose", rename_all = "UPPERCASE")]
pub enum Purpose {
    #[default]
    Rent,
    Sale,
    Seasonal,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Rent => "RENT",
            Purpose::Sale => "SALE",
            Purpose::Seasonal => "SEASONAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RENT" => Some(Purpose::Rent),
            "SALE" => Some(Purpose::Sale),
            "SEASONAL" => Some(Purpose::Seasonal),
            _ => None,
        }
    }
}

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "property_status", rename_all = "UPPERCASE")]
pub enum PropertyStatus {
    #[default]
    Available,
    Rented,
    Sold,
    Archived,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Default, Debug)]
pub struct Amenity {
    pub name: String,
    pub quantity: i32,
}

#[derive(FromRow, Deserialize, Serialize, Clone, PartialEq, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub code: Option<String>,
    pub title: String,
    pub description: String,
    pub purpose: Purpose,
    pub property_type: String,
    pub category_id: Option<Uuid>,
    pub broker_id: Option<Uuid>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub rent_price: Option<BigDecimal>,
    pub sale_price: Option<BigDecimal>,
    pub status: PropertyStatus,
    pub address: String,
    pub city: String,
    pub neighborhood: String,
    #[sqlx(json)]
    pub amenities: Vec<Amenity>,
    pub images: Vec<String>,
    pub views: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Price that matters for the listing purpose: sale price for SALE, rent price otherwise.
    pub fn effective_price(&self) -> Option<&BigDecimal> {
        match self.purpose {
            Purpose::Sale => self.sale_price.as_ref(),
            Purpose::Rent | Purpose::Seasonal => self.rent_price.as_ref(),
        }
    }

    pub fn has_amenity(&self, name: &str) -> bool {
        self.amenities.iter().any(|amenity| amenity.name == name)
    }
}

#[derive(FromRow, Deserialize, Serialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
