use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{Lead, SocialLinks};

// Apify "Google Maps" dataset item (the field-rich shape)
//  ├── title, address, street, city, state, postalCode, countryCode, neighborhood
//  ├── phone, phoneUnformatted, website, domain, emails[]
//  ├── location
//  │    ├── lat
//  │    └── lng
//  ├── categoryName, totalScore, reviewsCount, imagesCount, imageUrl, placeId, rank
//  ├── claimThisBusiness, permanentlyClosed, temporarilyClosed, isAdvertisement
//  └── linkedIns[], twitters[], instagrams[], facebooks[], youtubes[], tiktoks[], pinterests[], discords[]

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApifyPlace {
    pub title: Option<String>,
    pub address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
    pub neighborhood: Option<String>,

    pub phone: Option<String>,
    pub phone_unformatted: Option<String>,
    pub website: Option<String>,
    pub domain: Option<String>,
    pub emails: Vec<String>,

    pub location: Option<LatLng>,
    pub category_name: Option<String>,
    pub total_score: Option<f64>,
    pub reviews_count: Option<i64>,
    pub images_count: Option<i64>,
    pub image_url: Option<String>,
    pub place_id: Option<String>,
    pub rank: Option<i64>,
    pub scraped_at: Option<String>,

    pub claim_this_business: Option<bool>,
    pub permanently_closed: Option<bool>,
    pub temporarily_closed: Option<bool>,
    pub is_advertisement: Option<bool>,

    pub linked_ins: Vec<String>,
    pub twitters: Vec<String>,
    pub instagrams: Vec<String>,
    pub facebooks: Vec<String>,
    pub youtubes: Vec<String>,
    pub tiktoks: Vec<String>,
    pub pinterests: Vec<String>,
    pub discords: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<ApifyPlace> for Lead {
    fn from(p: ApifyPlace) -> Self {
        let scraped_at = p
            .scraped_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        let (latitude, longitude) = p
            .location
            .map(|l| (l.lat, l.lng))
            .unwrap_or((None, None));

        Lead {
            name: p.title.unwrap_or_default(),
            phone: p.phone.unwrap_or_default(),
            phone_unformatted: p.phone_unformatted.unwrap_or_default(),
            website: p.website.unwrap_or_default(),
            domain: p.domain.unwrap_or_default(),
            emails: p.emails,
            address: p.address.unwrap_or_default(),
            street: p.street.unwrap_or_default(),
            neighborhood: p.neighborhood.unwrap_or_default(),
            city: p.city.unwrap_or_default(),
            state: p.state.unwrap_or_default(),
            postal_code: p.postal_code.unwrap_or_default(),
            country_code: p.country_code.unwrap_or_default(),
            latitude,
            longitude,
            category_name: p.category_name.unwrap_or_default(),
            total_score: p.total_score,
            reviews_count: p.reviews_count,
            images_count: p.images_count,
            place_id: p.place_id.unwrap_or_default(),
            image_url: p.image_url.unwrap_or_default(),
            rank: p.rank,
            claim_this_business: p.claim_this_business,
            permanently_closed: p.permanently_closed,
            temporarily_closed: p.temporarily_closed,
            is_advertisement: p.is_advertisement,
            scraped_at,
            social: SocialLinks {
                linked_ins: p.linked_ins,
                twitters: p.twitters,
                instagrams: p.instagrams,
                facebooks: p.facebooks,
                youtubes: p.youtubes,
                tiktoks: p.tiktoks,
                pinterests: p.pinterests,
                discords: p.discords,
            },
            ..Default::default()
        }
    }
}

// SerpAPI google_maps engine response
//  ├── error (present on failure, with HTTP 200 in some cases)
//  └── local_results[]
//       ├── position, title, address, phone, website, type
//       ├── rating, reviews, place_id, thumbnail
//       └── gps_coordinates
//            ├── latitude
//            └── longitude

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SerpResponse {
    pub error: Option<String>,
    pub local_results: Option<Vec<SerpPlace>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SerpPlace {
    pub position: Option<i64>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub place_id: Option<String>,
    pub thumbnail: Option<String>,
    pub gps_coordinates: Option<GpsCoordinates>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GpsCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<SerpPlace> for Lead {
    fn from(p: SerpPlace) -> Self {
        let (latitude, longitude) = p
            .gps_coordinates
            .map(|g| (g.latitude, g.longitude))
            .unwrap_or((None, None));

        Lead {
            name: p.title.unwrap_or_default(),
            address: p.address.unwrap_or_default(),
            phone: p.phone.unwrap_or_default(),
            website: p.website.unwrap_or_default(),
            category_name: p.category.unwrap_or_default(),
            total_score: p.rating,
            reviews_count: p.reviews,
            place_id: p.place_id.unwrap_or_default(),
            image_url: p.thumbnail.unwrap_or_default(),
            rank: p.position,
            latitude,
            longitude,
            ..Default::default()
        }
    }
}
