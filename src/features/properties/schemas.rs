use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    features::properties::{
        models::{Amenity, Property, PropertyStatus, Purpose},
        query::{ListingPage, ListingRequest},
    },
    services::image_url::{ImageTransform, ImageUrlResolver, is_data_url},
};

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Validate, Clone, Default, Debug)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_prices"))]
pub struct PropertyIn {
    #[validate(length(max = 32))]
    pub code: Option<String>,
    #[validate(length(min = 3, max = 160))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub purpose: Purpose,
    #[validate(length(min = 1, max = 60))]
    pub property_type: String,
    pub category_id: Option<Uuid>,
    pub broker_id: Option<Uuid>,
    #[validate(range(min = 0, max = 100))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0.0))]
    pub area: Option<f64>,
    pub rent_price: Option<BigDecimal>,
    pub sale_price: Option<BigDecimal>,
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub address: String,
    #[validate(length(min = 1, max = 120))]
    pub city: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    #[validate(nested)]
    pub amenities: Vec<AmenityIn>,
    /// Images already stored that the listing keeps, in display order.
    #[serde(default)]
    #[validate(custom(function = "validate_image_references"))]
    pub images: Vec<String>,
}

#[derive(Deserialize, Validate, Clone, Default, Debug)]
pub struct AmenityIn {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

fn one() -> i32 {
    1
}

/// The price that matches the purpose is required and non-negative.
fn validate_prices(input: &PropertyIn) -> Result<(), ValidationError> {
    let (price, field) = match input.purpose {
        Purpose::Sale => (input.sale_price.as_ref(), "salePrice"),
        Purpose::Rent | Purpose::Seasonal => (input.rent_price.as_ref(), "rentPrice"),
    };

    match price {
        None => Err(ValidationError::new("price_required")
            .with_message(format!("{field} is required for {}", input.purpose.as_str()).into())),
        Some(price) if *price < BigDecimal::zero() => Err(ValidationError::new("price_negative")
            .with_message(format!("{field} must not be negative").into())),
        Some(_) => Ok(()),
    }
}

/// Inline `data:` payloads are never stored, only references to files.
fn validate_image_references(images: &[String]) -> Result<(), ValidationError> {
    if images.iter().any(|reference| is_data_url(reference.trim())) {
        return Err(ValidationError::new("inline_image")
            .with_message("images must reference stored files, not inline data".into()));
    }
    Ok(())
}

impl PropertyIn {
    /// Keep-list entries that may be stored on `property_id`.
    ///
    /// When the listing already exists only references it holds survive.
    /// A new listing may keep foreign URLs or paths under its own prefix.
    pub fn kept_images(
        &self,
        images: &ImageUrlResolver,
        property_id: Uuid,
        existing: Option<&[String]>,
    ) -> Vec<String> {
        let prefix = format!("properties/{property_id}/");

        let mut kept: Vec<String> = Vec::with_capacity(self.images.len());
        for reference in &self.images {
            let reference = reference.trim();
            if reference.is_empty() || is_data_url(reference) {
                continue;
            }
            let allowed = match existing {
                Some(existing) => existing.iter().any(|own| own == reference),
                None => images
                    .bucket_path(reference)
                    .is_none_or(|path| path.starts_with(&prefix)),
            };
            if allowed && !kept.iter().any(|own| own == reference) {
                kept.push(reference.to_string());
            }
        }
        kept
    }

    /// Rent and sale price with the one the purpose does not use cleared.
    pub fn prices(&self) -> (Option<BigDecimal>, Option<BigDecimal>) {
        match self.purpose {
            Purpose::Sale => (None, self.sale_price.clone()),
            Purpose::Rent | Purpose::Seasonal => (self.rent_price.clone(), None),
        }
    }

    pub fn amenities(&self) -> Vec<Amenity> {
        self.amenities
            .iter()
            .map(|amenity| Amenity {
                name: amenity.name.trim().to_string(),
                quantity: amenity.quantity,
            })
            .collect()
    }

    pub fn code(&self) -> Option<String> {
        self.code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }
}

#[derive(Deserialize, Debug)]
pub struct StatusIn {
    pub status: PropertyStatus,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ViewIn {
    /// Count the client already shows after its local increment.
    pub optimistic_views: Option<i64>,
}

#[derive(Deserialize, Validate, Debug)]
pub struct CategoryIn {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOut {
    #[serde(flatten)]
    pub property: Property,
    pub image_urls: Vec<String>,
    pub thumbnail_url: Option<String>,
}

impl PropertyOut {
    pub fn new(property: Property, images: &ImageUrlResolver) -> Self {
        let image_urls = property
            .images
            .iter()
            .map(|reference| images.resolve(reference, Some(&ImageTransform::DETAIL)))
            .filter(|url| !url.is_empty())
            .collect();
        let thumbnail_url = property
            .images
            .iter()
            .map(|reference| images.resolve(reference, Some(&ImageTransform::THUMBNAIL)))
            .find(|url| !url.is_empty());

        PropertyOut {
            property,
            image_urls,
            thumbnail_url,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub properties: Vec<PropertyOut>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    /// Canonical query string of the page that was served.
    pub query: String,
}

impl SearchResponse {
    pub fn new(page: ListingPage<'_>, request: &ListingRequest, images: &ImageUrlResolver) -> Self {
        let served = ListingRequest {
            page: Some(page.page),
            ..request.clone()
        };

        SearchResponse {
            properties: page
                .items
                .into_iter()
                .map(|property| PropertyOut::new(property.clone(), images))
                .collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
            query: served.to_query_string(),
        }
    }
}

#[derive(Serialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ViewOut {
    pub views: i64,
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn input(purpose: Purpose) -> PropertyIn {
        PropertyIn {
            title: "Casa com quintal".to_string(),
            purpose,
            property_type: "casa".to_string(),
            city: "Cachoeiras de Macacu".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn purpose_price_is_required() {
        let missing = PropertyIn {
            sale_price: Some(BigDecimal::from(300_000)),
            ..input(Purpose::Rent)
        };
        assert!(missing.validate().is_err());

        let present = PropertyIn {
            rent_price: Some(BigDecimal::from(1_200)),
            ..input(Purpose::Seasonal)
        };
        assert!(present.validate().is_ok());

        let negative = PropertyIn {
            sale_price: Some(BigDecimal::from_str("-1").unwrap()),
            ..input(Purpose::Sale)
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn unused_price_is_cleared() {
        let both = PropertyIn {
            rent_price: Some(BigDecimal::from(900)),
            sale_price: Some(BigDecimal::from(250_000)),
            ..input(Purpose::Sale)
        };
        assert_eq!(both.prices(), (None, Some(BigDecimal::from(250_000))));

        let rent = PropertyIn {
            purpose: Purpose::Rent,
            ..both
        };
        assert_eq!(rent.prices(), (Some(BigDecimal::from(900)), None));
    }

    #[test]
    fn amenities_default_to_one_unit() {
        let parsed: PropertyIn = serde_json::from_value(serde_json::json!({
            "title": "Apartamento",
            "purpose": "RENT",
            "propertyType": "apartamento",
            "city": "Niterói",
            "rentPrice": "1500.00",
            "amenities": [{"name": " Piscina "}, {"name": "Vaga", "quantity": 2}]
        }))
        .unwrap();

        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.amenities(), vec![
            Amenity {
                name: "Piscina".to_string(),
                quantity: 1
            },
            Amenity {
                name: "Vaga".to_string(),
                quantity: 2
            },
        ]);
    }

    #[test]
    fn inline_image_data_is_rejected() {
        let inline = PropertyIn {
            rent_price: Some(BigDecimal::from(1_200)),
            images: vec![format!("data:image/png;base64,{}", "A".repeat(200_000))],
            ..input(Purpose::Rent)
        };
        let errors = inline.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("images"));
    }

    #[test]
    fn new_listing_cannot_claim_other_listing_images() {
        let resolver = ImageUrlResolver::new(None, "http://localhost:9000", "property-images");
        let property_id = Uuid::new_v4();
        let own = format!("properties/{property_id}/a.jpg");
        let other = "properties/00000000-0000-0000-0000-000000000099/other.png".to_string();
        let other_absolute = format!("http://localhost:9000/property-images/{other}");
        let foreign = "https://cdn.example.com/fachada.jpg".to_string();

        let new = PropertyIn {
            images: vec![
                other.clone(),
                other_absolute,
                own.clone(),
                foreign.clone(),
                "data:image/png;base64,AAAA".to_string(),
            ],
            ..input(Purpose::Rent)
        };

        assert_eq!(new.kept_images(&resolver, property_id, None), vec![own, foreign]);
    }

    #[test]
    fn existing_listing_keeps_only_its_own_images() {
        let resolver = ImageUrlResolver::new(None, "http://localhost:9000", "property-images");
        let property_id = Uuid::new_v4();
        let stored = vec![
            format!("properties/{property_id}/a.jpg"),
            format!("properties/{property_id}/b.jpg"),
        ];

        let edit = PropertyIn {
            images: vec![
                stored[1].clone(),
                "properties/00000000-0000-0000-0000-000000000099/other.png".to_string(),
                format!("properties/{property_id}/never-uploaded.jpg"),
                stored[1].clone(),
            ],
            ..input(Purpose::Rent)
        };

        assert_eq!(
            edit.kept_images(&resolver, property_id, Some(stored.as_slice())),
            vec![stored[1].clone()]
        );
    }

    #[test]
    fn blank_code_is_dropped() {
        let blank = PropertyIn {
            code: Some("  ".to_string()),
            ..input(Purpose::Rent)
        };
        assert_eq!(blank.code(), None);
    }

    fn search(properties: &[Property], query: &str) -> SearchResponse {
        let resolver = ImageUrlResolver::new(None, "http://localhost:9000", "property-images");
        let request = ListingRequest::from_query(query);
        let (mut view, requested_page) = request.clone().into_view();
        let page = view.run(properties, requested_page);
        SearchResponse::new(page, &request, &resolver)
    }

    #[test]
    fn search_response_echoes_the_page_it_served() {
        let properties: Vec<Property> = (0..12)
            .map(|_| Property {
                id: Uuid::new_v4(),
                city: "Itaborai".to_string(),
                ..Default::default()
            })
            .collect();

        let second = search(&properties, "city=Itaborai&page=2");
        assert_eq!(second.page, 2);
        assert_eq!(second.total_pages, 2);
        assert_eq!(second.properties.len(), 3);
        assert_eq!(second.query, "city=Itaborai&page=2");

        let out_of_range = search(&properties, "page=7&city=Itaborai");
        assert_eq!(out_of_range.page, 1);
        assert_eq!(out_of_range.total, 12);
        assert_eq!(out_of_range.properties.len(), 9);
        assert_eq!(out_of_range.query, "city=Itaborai");
    }

    #[test]
    fn output_resolves_images_and_skips_inline_data() {
        let resolver = ImageUrlResolver::new(None, "http://localhost:9000", "property-images");
        let property = Property {
            images: vec![
                "data:image/png;base64,AAAA".to_string(),
                "properties/1/a.jpg".to_string(),
            ],
            ..Default::default()
        };

        let out = PropertyOut::new(property, &resolver);
        assert_eq!(out.image_urls, vec![
            "http://localhost:9000/property-images/properties/1/a.jpg"
        ]);
        assert_eq!(
            out.thumbnail_url.as_deref(),
            Some("http://localhost:9000/property-images/properties/1/a.jpg")
        );

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("imageUrls").is_some());
        assert!(json.get("propertyType").is_some());
    }
}
