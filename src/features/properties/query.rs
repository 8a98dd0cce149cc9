//! Listing search over an already fetched property collection.
//!
//! The pipeline is `collection -> filter -> sort -> page`. Nothing here fails:
//! malformed query values are read as "no constraint".

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use uuid::Uuid;

use crate::features::properties::models::{Property, PropertyStatus, Purpose};

/// Price range bucket written as `"<min>-<max>"` or `"<min>+"`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PriceBucket {
    key: String,
    min: u64,
    max: Option<u64>,
}

impl PriceBucket {
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        let (min_part, max_part) = match key.split_once('-') {
            Some((min, max)) => (min, Some(max)),
            None => (key, None),
        };

        let min = min_part.trim().trim_end_matches('+').trim().parse::<u64>().ok()?;
        let max = max_part.and_then(|max| max.trim().parse::<u64>().ok());

        if max.is_some_and(|max| max < min) {
            return None;
        }

        Some(PriceBucket {
            key: key.to_string(),
            min,
            max,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> Option<u64> {
        self.max
    }

    pub fn contains(&self, price: &BigDecimal) -> bool {
        *price >= BigDecimal::from(self.min)
            && self.max.is_none_or(|max| *price <= BigDecimal::from(max))
    }
}

/// Individual constraints of a [`FilterRequest`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Clause {
    Purpose,
    Search,
    City,
    Neighborhood,
    Code,
    PropertyType,
    Category,
    PriceRange,
    MinBedrooms,
    MinBathrooms,
    Amenities,
}

impl Clause {
    pub const ALL: [Clause; 11] = [
        Clause::Purpose,
        Clause::Search,
        Clause::City,
        Clause::Neighborhood,
        Clause::Code,
        Clause::PropertyType,
        Clause::Category,
        Clause::PriceRange,
        Clause::MinBedrooms,
        Clause::MinBathrooms,
        Clause::Amenities,
    ];
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct FilterRequest {
    pub purpose: Option<Purpose>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub code: Option<String>,
    pub property_type: Option<String>,
    pub category_id: Option<Uuid>,
    pub price_range: Option<PriceBucket>,
    pub min_bedrooms: Option<i32>,
    pub min_bathrooms: Option<i32>,
    pub amenities: BTreeSet<String>,
}

impl FilterRequest {
    pub fn is_active(&self, clause: Clause) -> bool {
        match clause {
            Clause::Purpose => self.purpose.is_some(),
            Clause::Search => self.search.is_some(),
            Clause::City => self.city.is_some(),
            Clause::Neighborhood => self.neighborhood.is_some(),
            Clause::Code => self.code.is_some(),
            Clause::PropertyType => self.property_type.is_some(),
            Clause::Category => self.category_id.is_some(),
            Clause::PriceRange => self.price_range.is_some(),
            Clause::MinBedrooms => self.min_bedrooms.is_some(),
            Clause::MinBathrooms => self.min_bathrooms.is_some(),
            Clause::Amenities => !self.amenities.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Clause::ALL.iter().all(|clause| !self.is_active(*clause))
    }

    pub fn without(&self, clause: Clause) -> Self {
        let mut filter = self.clone();
        match clause {
            Clause::Purpose => filter.purpose = None,
            Clause::Search => filter.search = None,
            Clause::City => filter.city = None,
            Clause::Neighborhood => filter.neighborhood = None,
            Clause::Code => filter.code = None,
            Clause::PropertyType => filter.property_type = None,
            Clause::Category => filter.category_id = None,
            Clause::PriceRange => filter.price_range = None,
            Clause::MinBedrooms => filter.min_bedrooms = None,
            Clause::MinBathrooms => filter.min_bathrooms = None,
            Clause::Amenities => filter.amenities.clear(),
        }
        filter
    }

    fn holds(&self, property: &Property, clause: Clause) -> bool {
        match clause {
            Clause::Purpose => self.purpose.is_none_or(|purpose| property.purpose == purpose),
            Clause::Search => self.search.as_deref().is_none_or(|term| {
                let term = term.to_lowercase();
                [
                    &property.title,
                    &property.description,
                    &property.neighborhood,
                    &property.city,
                    &property.address,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }),
            Clause::City => self.city.as_deref().is_none_or(|city| property.city == city),
            Clause::Neighborhood => self
                .neighborhood
                .as_deref()
                .is_none_or(|neighborhood| property.neighborhood == neighborhood),
            Clause::Code => self.code.as_deref().is_none_or(|code| {
                property
                    .code
                    .as_deref()
                    .is_some_and(|own| own.to_lowercase().contains(&code.to_lowercase()))
            }),
            Clause::PropertyType => self
                .property_type
                .as_deref()
                .is_none_or(|property_type| property.property_type == property_type),
            Clause::Category => self
                .category_id
                .is_none_or(|category_id| property.category_id == Some(category_id)),
            Clause::PriceRange => self.price_range.as_ref().is_none_or(|bucket| {
                property
                    .effective_price()
                    .is_some_and(|price| bucket.contains(price))
            }),
            Clause::MinBedrooms => self
                .min_bedrooms
                .is_none_or(|min| property.bedrooms.is_some_and(|count| count >= min)),
            Clause::MinBathrooms => self
                .min_bathrooms
                .is_none_or(|min| property.bathrooms.is_some_and(|count| count >= min)),
            Clause::Amenities => self
                .amenities
                .iter()
                .all(|amenity| property.has_amenity(amenity)),
        }
    }

    /// Reads the filter keys of a query string. Unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut filter = FilterRequest::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            filter.apply_pair(&key, &value);
        }
        filter
    }

    fn apply_pair(&mut self, key: &str, value: &str) -> bool {
        match key {
            "purpose" => self.purpose = active_value(value).and_then(Purpose::parse),
            "q" => self.search = active_value(value).map(str::to_string),
            "city" => self.city = active_value(value).map(str::to_string),
            "neighborhood" => self.neighborhood = active_value(value).map(str::to_string),
            "code" => self.code = active_value(value).map(str::to_string),
            "type" => self.property_type = active_value(value).map(str::to_string),
            "category" => {
                self.category_id = active_value(value).and_then(|id| Uuid::parse_str(id).ok())
            }
            "price" => self.price_range = active_value(value).and_then(PriceBucket::parse),
            "bedrooms" => self.min_bedrooms = active_value(value).and_then(parse_minimum),
            "bathrooms" => self.min_bathrooms = active_value(value).and_then(parse_minimum),
            "amenities" => {
                if let Some(amenity) = active_value(value) {
                    self.amenities.insert(amenity.to_string());
                }
            }
            _ => return false,
        }
        true
    }

    fn append_pairs<T: form_urlencoded::Target>(&self, serializer: &mut form_urlencoded::Serializer<'_, T>) {
        if let Some(purpose) = self.purpose {
            serializer.append_pair("purpose", purpose.as_str());
        }
        if let Some(search) = &self.search {
            serializer.append_pair("q", search);
        }
        if let Some(city) = &self.city {
            serializer.append_pair("city", city);
        }
        if let Some(neighborhood) = &self.neighborhood {
            serializer.append_pair("neighborhood", neighborhood);
        }
        if let Some(code) = &self.code {
            serializer.append_pair("code", code);
        }
        if let Some(property_type) = &self.property_type {
            serializer.append_pair("type", property_type);
        }
        if let Some(category_id) = &self.category_id {
            serializer.append_pair("category", &category_id.to_string());
        }
        if let Some(bucket) = &self.price_range {
            serializer.append_pair("price", bucket.key());
        }
        if let Some(min) = self.min_bedrooms {
            serializer.append_pair("bedrooms", &min.to_string());
        }
        if let Some(min) = self.min_bathrooms {
            serializer.append_pair("bathrooms", &min.to_string());
        }
        for amenity in &self.amenities {
            serializer.append_pair("amenities", amenity);
        }
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.append_pairs(&mut serializer);
        serializer.finish()
    }
}

fn active_value(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("any") || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value)
    }
}

fn parse_minimum(value: &str) -> Option<i32> {
    value
        .trim_end_matches('+')
        .parse::<i32>()
        .ok()
        .filter(|min| *min >= 0)
}

/// Whether `property` survives every active clause of `filter`.
///
/// Only `AVAILABLE` listings are ever eligible.
pub fn matches(property: &Property, filter: &FilterRequest) -> bool {
    property.status == PropertyStatus::Available
        && Clause::ALL
            .iter()
            .all(|clause| filter.holds(property, *clause))
}

#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(SortKey::Newest),
            "oldest" => Some(SortKey::Oldest),
            "price_asc" => Some(SortKey::PriceAsc),
            "price_desc" => Some(SortKey::PriceDesc),
            _ => None,
        }
    }
}

/// Orders listings in place. Ties are broken on id so the order is total.
pub fn sort_listings(items: &mut [&Property], key: SortKey) {
    let zero = BigDecimal::from(0);
    let price = |property: &Property| property.effective_price().unwrap_or(&zero).clone();

    match key {
        SortKey::Newest => items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
        SortKey::Oldest => items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::PriceAsc => items.sort_by(|a, b| {
            price(*a)
                .cmp(&price(*b))
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::PriceDesc => items.sort_by(|a, b| {
            price(*b)
                .cmp(&price(*a))
                .then_with(|| b.id.cmp(&a.id))
        }),
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn page_size(&self) -> usize {
        match self {
            ViewMode::Grid => 9,
            ViewMode::List => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[derive(Debug)]
pub struct ListingPage<'a> {
    pub items: Vec<&'a Property>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Search state of one results view: filter, sort, view mode and current page.
///
/// Any change to filter, sort or view mode sends the view back to page 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingView {
    filter: FilterRequest,
    sort: SortKey,
    view_mode: ViewMode,
    page: usize,
}

impl Default for ListingView {
    fn default() -> Self {
        ListingView::new(FilterRequest::default(), SortKey::default(), ViewMode::default())
    }
}

impl ListingView {
    pub fn new(filter: FilterRequest, sort: SortKey, view_mode: ViewMode) -> Self {
        ListingView {
            filter,
            sort,
            view_mode,
            page: 1,
        }
    }

    pub fn filter(&self) -> &FilterRequest {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.view_mode.page_size()
    }

    pub fn set_filter(&mut self, filter: FilterRequest) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if sort != self.sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if view_mode != self.view_mode {
            self.view_mode = view_mode;
            self.page = 1;
        }
    }

    /// Moves to `page` when it lies in `[1, total_pages]`; otherwise nothing changes.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if (1..=total_pages).contains(&page) {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Filtered and sorted listings, without paging.
    pub fn results<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        let mut items: Vec<&Property> = properties
            .iter()
            .filter(|property| matches(property, &self.filter))
            .collect();
        sort_listings(&mut items, self.sort);
        items
    }

    pub fn run<'a>(&mut self, properties: &'a [Property], requested_page: Option<usize>) -> ListingPage<'a> {
        let results = self.results(properties);
        let page_size = self.page_size();
        let total = results.len();
        let total_pages = total_pages(total, page_size);

        if let Some(page) = requested_page {
            self.go_to_page(page, total_pages);
        }

        ListingPage {
            items: page_slice(&results, self.page, page_size).to_vec(),
            page: self.page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// Full request of the results page as carried in the URL.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ListingRequest {
    pub filter: FilterRequest,
    pub sort: SortKey,
    pub view_mode: ViewMode,
    pub page: Option<usize>,
}

impl ListingRequest {
    pub fn from_query(query: &str) -> Self {
        let mut request = ListingRequest::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if request.filter.apply_pair(&key, &value) {
                continue;
            }
            match key.as_ref() {
                "sort" => request.sort = SortKey::parse(&value).unwrap_or_default(),
                "view" => request.view_mode = ViewMode::parse(&value).unwrap_or_default(),
                "page" => request.page = value.trim().parse::<usize>().ok(),
                _ => {}
            }
        }

        request
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.filter.append_pairs(&mut serializer);
        if self.sort != SortKey::default() {
            serializer.append_pair("sort", self.sort.as_str());
        }
        if self.view_mode != ViewMode::default() {
            serializer.append_pair("view", self.view_mode.as_str());
        }
        if let Some(page) = self.page.filter(|page| *page > 1) {
            serializer.append_pair("page", &page.to_string());
        }
        serializer.finish()
    }

    pub fn into_view(self) -> (ListingView, Option<usize>) {
        (
            ListingView::new(self.filter, self.sort, self.view_mode),
            self.page,
        )
    }
}

/// Dropdown values derived from the available listings.
#[derive(Serialize, Clone, PartialEq, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub neighborhoods: BTreeMap<String, Vec<String>>,
    pub property_types: Vec<String>,
    pub amenities: Vec<String>,
}

pub fn filter_options(properties: &[Property]) -> FilterOptions {
    let mut cities = BTreeSet::new();
    let mut neighborhoods: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut property_types = BTreeSet::new();
    let mut amenities = BTreeSet::new();

    for property in properties
        .iter()
        .filter(|property| property.status == PropertyStatus::Available)
    {
        if let Some(city) = non_blank(&property.city) {
            cities.insert(city.to_string());
            if let Some(neighborhood) = non_blank(&property.neighborhood) {
                neighborhoods
                    .entry(city.to_string())
                    .or_default()
                    .insert(neighborhood.to_string());
            }
        }
        if let Some(property_type) = non_blank(&property.property_type) {
            property_types.insert(property_type.to_string());
        }
        for amenity in &property.amenities {
            if let Some(name) = non_blank(&amenity.name) {
                amenities.insert(name.to_string());
            }
        }
    }

    FilterOptions {
        cities: cities.into_iter().collect(),
        neighborhoods: neighborhoods
            .into_iter()
            .map(|(city, names)| (city, names.into_iter().collect()))
            .collect(),
        property_types: property_types.into_iter().collect(),
        amenities: amenities.into_iter().collect(),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::properties::models::Amenity;
    use chrono::{Duration, TimeZone, Utc};
    use std::str::FromStr;

    fn price(value: &str) -> Option<BigDecimal> {
        Some(BigDecimal::from_str(value).unwrap())
    }

    fn listing(seq: u32) -> Property {
        Property {
            id: Uuid::from_u128(seq as u128),
            title: format!("Imóvel {seq}"),
            description: "Bem localizado".to_string(),
            purpose: Purpose::Rent,
            property_type: "casa".to_string(),
            city: "Cachoeiras de Macacu".to_string(),
            neighborhood: "Centro".to_string(),
            address: "Rua Principal, 10".to_string(),
            status: PropertyStatus::Available,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::days(seq as i64),
            ..Default::default()
        }
    }

    fn amenities(names: &[&str]) -> Vec<Amenity> {
        names
            .iter()
            .map(|name| Amenity {
                name: name.to_string(),
                quantity: 1,
            })
            .collect()
    }

    fn ids(items: &[&Property]) -> Vec<Uuid> {
        items.iter().map(|property| property.id).collect()
    }

    fn run_filter<'a>(properties: &'a [Property], filter: &FilterRequest) -> Vec<&'a Property> {
        properties
            .iter()
            .filter(|property| matches(property, filter))
            .collect()
    }

    #[test]
    fn rent_city_and_bucket_example() {
        let rent = Property {
            rent_price: price("700"),
            ..listing(1)
        };
        let sale = Property {
            purpose: Purpose::Sale,
            sale_price: price("700"),
            ..listing(2)
        };
        let properties = vec![rent.clone(), sale];

        let filter = FilterRequest::from_query(
            "purpose=RENT&city=Cachoeiras+de+Macacu&price=501-1000",
        );
        assert_eq!(ids(&run_filter(&properties, &filter)), vec![rent.id]);
    }

    #[test]
    fn open_ended_bucket_example() {
        let bucket = PriceBucket::parse("2001+").unwrap();
        assert!(bucket.contains(&BigDecimal::from(5000)));
        assert!(!bucket.contains(&BigDecimal::from(2000)));
        assert_eq!(bucket.max(), None);
    }

    #[test]
    fn amenity_subset_example() {
        let only_pool = Property {
            amenities: amenities(&["Piscina"]),
            ..listing(1)
        };
        let full = Property {
            amenities: amenities(&["Piscina", "Churrasqueira", "Garagem"]),
            ..listing(2)
        };
        let properties = vec![only_pool, full.clone()];

        let filter =
            FilterRequest::from_query("amenities=Piscina&amenities=Churrasqueira");
        assert_eq!(ids(&run_filter(&properties, &filter)), vec![full.id]);
    }

    #[test]
    fn only_available_listings_are_eligible() {
        let properties = vec![
            listing(1),
            Property {
                status: PropertyStatus::Archived,
                ..listing(2)
            },
            Property {
                status: PropertyStatus::Rented,
                ..listing(3)
            },
            Property {
                status: PropertyStatus::Sold,
                ..listing(4)
            },
        ];

        let everything = run_filter(&properties, &FilterRequest::default());
        assert_eq!(ids(&everything), vec![Uuid::from_u128(1)]);

        let by_title = FilterRequest {
            search: Some("Imóvel 2".to_string()),
            ..Default::default()
        };
        assert!(run_filter(&properties, &by_title).is_empty());
    }

    #[test]
    fn search_term_matches_any_text_field_ignoring_case() {
        let properties = vec![
            Property {
                title: "Sítio com LAGO".to_string(),
                ..listing(1)
            },
            Property {
                neighborhood: "Japuíba".to_string(),
                ..listing(2)
            },
            Property {
                address: "Estrada do Lago, km 3".to_string(),
                ..listing(3)
            },
            listing(4),
        ];

        let filter = FilterRequest::from_query("q=lago");
        assert_eq!(
            ids(&run_filter(&properties, &filter)),
            vec![Uuid::from_u128(1), Uuid::from_u128(3)]
        );

        let filter = FilterRequest::from_query("q=JAPU");
        assert_eq!(ids(&run_filter(&properties, &filter)), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn code_is_a_partial_case_insensitive_match() {
        let coded = Property {
            code: Some("CA-0042".to_string()),
            ..listing(1)
        };
        let uncoded = listing(2);
        let properties = vec![coded.clone(), uncoded];

        let filter = FilterRequest::from_query("code=ca-00");
        assert_eq!(ids(&run_filter(&properties, &filter)), vec![coded.id]);
    }

    #[test]
    fn price_bucket_uses_purpose_price_and_rejects_missing_prices() {
        let sale = Property {
            purpose: Purpose::Sale,
            rent_price: price("800"),
            sale_price: price("250000"),
            ..listing(1)
        };
        let seasonal = Property {
            purpose: Purpose::Seasonal,
            rent_price: price("900"),
            ..listing(2)
        };
        let unpriced = listing(3);
        let properties = vec![sale.clone(), seasonal.clone(), unpriced];

        let cheap = FilterRequest::from_query("price=501-1000");
        assert_eq!(ids(&run_filter(&properties, &cheap)), vec![seasonal.id]);

        let expensive = FilterRequest::from_query("price=200000%2B");
        assert_eq!(ids(&run_filter(&properties, &expensive)), vec![sale.id]);
    }

    #[test]
    fn bucket_bounds_are_inclusive() {
        let bucket = PriceBucket::parse("501-1000").unwrap();
        assert!(bucket.contains(&BigDecimal::from(501)));
        assert!(bucket.contains(&BigDecimal::from(1000)));
        assert!(!bucket.contains(&BigDecimal::from(500)));
        assert!(!bucket.contains(&BigDecimal::from_str("1000.01").unwrap()));
    }

    #[test]
    fn malformed_buckets_are_no_constraint() {
        assert_eq!(PriceBucket::parse("cheap"), None);
        assert_eq!(PriceBucket::parse("-500"), None);
        assert_eq!(PriceBucket::parse("1000-500"), None);

        let trailing = PriceBucket::parse("500-").unwrap();
        assert_eq!((trailing.min(), trailing.max()), (500, None));

        let filter = FilterRequest::from_query("price=cheap");
        assert!(filter.is_empty());
    }

    #[test]
    fn minimum_rooms_require_a_defined_count() {
        let properties = vec![
            Property {
                bedrooms: Some(3),
                bathrooms: Some(2),
                ..listing(1)
            },
            Property {
                bedrooms: Some(1),
                bathrooms: Some(1),
                ..listing(2)
            },
            listing(3),
        ];

        let filter = FilterRequest::from_query("bedrooms=2&bathrooms=2");
        assert_eq!(ids(&run_filter(&properties, &filter)), vec![Uuid::from_u128(1)]);

        let filter = FilterRequest::from_query("bedrooms=0");
        assert_eq!(
            ids(&run_filter(&properties, &filter)),
            vec![Uuid::from_u128(1), Uuid::from_u128(2)]
        );
    }

    #[test]
    fn removing_any_clause_never_shrinks_results() {
        let category = Uuid::from_u128(99);
        let mut properties = Vec::new();
        for seq in 0..40u32 {
            properties.push(Property {
                purpose: if seq % 3 == 0 { Purpose::Sale } else { Purpose::Rent },
                city: if seq % 2 == 0 { "Itaboraí" } else { "Cachoeiras de Macacu" }.to_string(),
                neighborhood: if seq % 5 == 0 { "Japuíba" } else { "Centro" }.to_string(),
                code: (seq % 4 != 0).then(|| format!("CD-{seq:03}")),
                property_type: if seq % 7 == 0 { "apartamento" } else { "casa" }.to_string(),
                category_id: (seq % 2 == 1).then_some(category),
                rent_price: (seq % 6 != 0).then(|| BigDecimal::from(400 + seq * 50)),
                sale_price: (seq % 3 == 0).then(|| BigDecimal::from(100_000 + seq * 1_000)),
                bedrooms: (seq % 8 != 0).then_some((seq % 4) as i32),
                bathrooms: Some((seq % 3) as i32),
                amenities: if seq % 2 == 1 {
                    amenities(&["Piscina", "Garagem"])
                } else {
                    amenities(&["Garagem"])
                },
                status: if seq % 11 == 0 {
                    PropertyStatus::Archived
                } else {
                    PropertyStatus::Available
                },
                ..listing(seq)
            });
        }

        let full = FilterRequest::from_query(&format!(
            "purpose=RENT&q=im%C3%B3vel&city=Cachoeiras+de+Macacu&neighborhood=Centro&code=cd\
             &type=casa&category={category}&price=501-2000&bedrooms=1&bathrooms=1\
             &amenities=Piscina&amenities=Garagem"
        ));
        for clause in Clause::ALL {
            assert!(full.is_active(clause), "{clause:?} should be active");
        }

        let narrow = ids(&run_filter(&properties, &full));
        assert!(!narrow.is_empty());

        for clause in Clause::ALL {
            let wider = ids(&run_filter(&properties, &full.without(clause)));
            assert!(
                narrow.iter().all(|id| wider.contains(id)),
                "dropping {clause:?} lost results"
            );
        }

        // matches() is exactly the conjunction of the clauses
        for property in &properties {
            let expected = property.status == PropertyStatus::Available
                && Clause::ALL.iter().all(|clause| full.holds(property, *clause));
            assert_eq!(matches(property, &full), expected);
        }
    }

    #[test]
    fn newest_is_default_and_oldest_reverses_it() {
        let properties: Vec<Property> = [3, 1, 2].into_iter().map(listing).collect();
        let mut view = ListingView::default();
        let page = view.run(&properties, None);
        assert_eq!(
            ids(&page.items),
            vec![Uuid::from_u128(3), Uuid::from_u128(2), Uuid::from_u128(1)]
        );

        view.set_sort(SortKey::Oldest);
        let page = view.run(&properties, None);
        assert_eq!(
            ids(&page.items),
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
    }

    #[test]
    fn price_sort_treats_missing_price_as_zero() {
        let properties = vec![
            Property {
                rent_price: price("1500"),
                ..listing(1)
            },
            listing(2),
            Property {
                purpose: Purpose::Sale,
                sale_price: price("300"),
                rent_price: price("9999"),
                ..listing(3)
            },
        ];

        let mut items: Vec<&Property> = properties.iter().collect();
        sort_listings(&mut items, SortKey::PriceAsc);
        assert_eq!(
            ids(&items),
            vec![Uuid::from_u128(2), Uuid::from_u128(3), Uuid::from_u128(1)]
        );
    }

    #[test]
    fn price_desc_is_price_asc_reversed() {
        // duplicated prices on purpose
        let properties: Vec<Property> = (1..=12u32)
            .map(|seq| Property {
                rent_price: Some(BigDecimal::from(500 + (seq % 4) * 100)),
                ..listing(seq)
            })
            .collect();

        let mut asc: Vec<&Property> = properties.iter().collect();
        sort_listings(&mut asc, SortKey::PriceAsc);
        let mut desc: Vec<&Property> = properties.iter().collect();
        sort_listings(&mut desc, SortKey::PriceDesc);

        asc.reverse();
        assert_eq!(ids(&asc), ids(&desc));
    }

    #[test]
    fn sorting_leaves_the_source_collection_untouched() {
        let properties: Vec<Property> = [2, 3, 1].into_iter().map(listing).collect();
        let before = properties.clone();
        let mut view = ListingView::new(FilterRequest::default(), SortKey::Oldest, ViewMode::List);
        let _ = view.run(&properties, Some(1));
        assert_eq!(properties, before);
    }

    #[test]
    fn pages_reconstruct_the_sorted_list() {
        let properties: Vec<Property> = (1..=23u32).map(listing).collect();
        let view = ListingView::default();
        let all = ids(&view.results(&properties));

        for page_size in 1..=25 {
            let pages = total_pages(all.len(), page_size);
            let mut rebuilt = Vec::new();
            for page in 1..=pages {
                rebuilt.extend_from_slice(page_slice(&all, page, page_size));
            }
            assert_eq!(rebuilt, all, "page size {page_size}");
        }
    }

    #[test]
    fn page_sizes_follow_view_mode() {
        let properties: Vec<Property> = (1..=12u32).map(listing).collect();

        let mut grid = ListingView::default();
        let page = grid.run(&properties, Some(2));
        assert_eq!((page.page, page.page_size, page.total_pages), (2, 9, 2));
        assert_eq!(page.items.len(), 3);

        let mut list = ListingView::new(FilterRequest::default(), SortKey::Newest, ViewMode::List);
        let page = list.run(&properties, Some(3));
        assert_eq!((page.page, page.page_size, page.total_pages), (3, 5, 3));
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let properties: Vec<Property> = (1..=12u32).map(listing).collect();
        let mut view = ListingView::default();

        let page = view.run(&properties, Some(2));
        assert_eq!(page.page, 2);

        let page = view.run(&properties, Some(3));
        assert_eq!(page.page, 2);
        let page = view.run(&properties, Some(0));
        assert_eq!(page.page, 2);

        assert!(!view.go_to_page(1, 0));
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn changes_reset_to_first_page() {
        let properties: Vec<Property> = (1..=30u32).map(listing).collect();
        let mut view = ListingView::default();

        view.run(&properties, Some(3));
        view.set_sort(SortKey::PriceAsc);
        assert_eq!(view.page(), 1);

        view.run(&properties, Some(2));
        view.set_view_mode(ViewMode::List);
        assert_eq!(view.page(), 1);

        view.run(&properties, Some(4));
        view.set_filter(FilterRequest::from_query("bedrooms=1"));
        assert_eq!(view.page(), 1);

        // re-applying the same values keeps the page
        view.run(&properties, Some(1));
        view.set_view_mode(ViewMode::List);
        view.set_sort(SortKey::PriceAsc);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn query_string_omits_defaults() {
        assert_eq!(ListingRequest::default().to_query_string(), "");

        let request = ListingRequest::from_query(
            "city=any&neighborhood=&purpose=all&sort=newest&view=grid&page=1&type=Any",
        );
        assert_eq!(request, ListingRequest {
            page: Some(1),
            ..Default::default()
        });
        assert_eq!(request.to_query_string(), "");
    }

    #[test]
    fn query_string_round_trips_every_field() {
        let category = Uuid::from_u128(7);
        let query = format!(
            "amenities=Garagem&page=2&bathrooms=1&purpose=SALE&q=vista+mar&city=Niter%C3%B3i\
             &neighborhood=Icara%C3%AD&code=AP&type=apartamento&category={category}\
             &price=2001%2B&bedrooms=3&amenities=Piscina&sort=price_desc&view=list"
        );
        let request = ListingRequest::from_query(&query);

        assert_eq!(request.filter.purpose, Some(Purpose::Sale));
        assert_eq!(request.filter.search.as_deref(), Some("vista mar"));
        assert_eq!(request.filter.city.as_deref(), Some("Niterói"));
        assert_eq!(request.filter.category_id, Some(category));
        assert_eq!(request.filter.price_range.as_ref().map(PriceBucket::key), Some("2001+"));
        assert_eq!(request.filter.amenities.len(), 2);
        assert_eq!(request.sort, SortKey::PriceDesc);
        assert_eq!(request.view_mode, ViewMode::List);
        assert_eq!(request.page, Some(2));

        let encoded = request.to_query_string();
        assert_eq!(
            encoded,
            format!(
                "purpose=SALE&q=vista+mar&city=Niter%C3%B3i&neighborhood=Icara%C3%AD&code=AP\
                 &type=apartamento&category={category}&price=2001%2B&bedrooms=3&bathrooms=1\
                 &amenities=Garagem&amenities=Piscina&sort=price_desc&view=list&page=2"
            )
        );
        assert_eq!(ListingRequest::from_query(&encoded), request);
    }

    #[test]
    fn malformed_values_are_tolerated() {
        let request = ListingRequest::from_query(
            "purpose=LEASE&category=not-a-uuid&bedrooms=-2&bathrooms=two&sort=random&view=map&page=x&%ZZ=1",
        );
        assert!(request.filter.is_empty());
        assert_eq!(request.sort, SortKey::Newest);
        assert_eq!(request.view_mode, ViewMode::Grid);
        assert_eq!(request.page, None);
    }

    #[test]
    fn filter_options_cover_available_listings_only() {
        let properties = vec![
            Property {
                amenities: amenities(&["Piscina"]),
                ..listing(1)
            },
            Property {
                city: "Itaboraí".to_string(),
                neighborhood: "Venda das Pedras".to_string(),
                property_type: "terreno".to_string(),
                ..listing(2)
            },
            Property {
                city: "Niterói".to_string(),
                amenities: amenities(&["Sauna"]),
                status: PropertyStatus::Archived,
                ..listing(3)
            },
        ];

        let options = filter_options(&properties);
        assert_eq!(options.cities, vec!["Cachoeiras de Macacu", "Itaboraí"]);
        assert_eq!(options.neighborhoods["Itaboraí"], vec!["Venda das Pedras"]);
        assert_eq!(options.property_types, vec!["casa", "terreno"]);
        assert_eq!(options.amenities, vec!["Piscina"]);
    }
}
