// Data structures shared across the core modules and the API layer.
// Wire shapes (Vehicle, QueryCriteria, AiResponse) use camelCase keys to
// match the frontend contract; the raw inventory shape keeps the snake_case
// keys of the bundled dataset.

use serde::{Deserialize, Serialize};

// A single raw inventory record as it appears in the bundled catalog data.
// Every field may be absent or malformed in the source data, so everything
// is defaulted; the normalizer substitutes sensible values.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawInventoryRecord {
    #[serde(default)]
    pub maker_name: String,
    #[serde(default)]
    pub car_model_name: String,
    #[serde(default)]
    pub grade1: Option<String>,
    #[serde(default)]
    pub model_year: String, // Kept as String; parsed during normalization
    #[serde(default)]
    pub mileage: u32,
    #[serde(default)]
    pub total_price_show: String, // e.g. "70.7万円"
    #[serde(default)]
    pub photo_files: Option<Vec<String>>,
    #[serde(default)]
    pub engine_type: Option<String>,
    #[serde(default)]
    pub displacement: Option<u32>,
    #[serde(default)]
    pub door: Option<u32>,
    #[serde(default)]
    pub person: Option<u32>,
    #[serde(default)]
    pub equip_names: Option<Vec<String>>,
    #[serde(default)]
    pub body_type_name: Option<String>,
    #[serde(default)]
    pub code: String, // Stable identifying code, seeds the placeholder image URL
}

// Derived human-readable spec summaries (not raw fields).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VehicleSpecs {
    pub engine: String,
    pub size: String,
    pub safety: String,
}

// The canonical vehicle shape all core operations consume and produce.
//
// Identity invariant: within one session, two Vehicle instances are treated
// as the same vehicle iff their `name` strings are equal. Favorites and
// dedup rely on this. It is a deliberate simplification, not a true unique
// key; two distinct listings could share a display name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub name: String,
    pub year: u32,
    pub mileage: u32,
    pub price: f64, // Units of 10,000 yen (manyen)
    pub image_url: String,
    pub specs: VehicleSpecs,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_drop_notification: Option<bool>,
}

// Structured search criteria received from the frontend form or produced by
// the intent extractor. An absent field imposes no constraint.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryCriteria {
    pub maker: Option<String>,
    pub model: Option<String>,
    pub min_year: Option<u32>,
    pub max_year: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_mileage: Option<u32>,
    pub body_type: Option<String>,
}

impl QueryCriteria {
    // True when no dimension is constrained. The search engine itself
    // accepts empty criteria (returns the full catalog unchanged); callers
    // that require at least one constraint check this first.
    pub fn is_empty(&self) -> bool {
        self.maker.is_none()
            && self.model.is_none()
            && self.min_year.is_none()
            && self.max_year.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.max_mileage.is_none()
            && self.body_type.is_none()
    }
}

// --- Conversation / generative-backend contract ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

// One turn of the chat history forwarded to the generative backend.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConversationTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    Conversation,
    CarResults,
}

// The discriminated response contract of the generative backend: either a
// conversational message (empty `cars`) or a vehicle-results payload.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub response_type: ResponseType,
    pub message: String,
    #[serde(default)]
    pub cars: Vec<Vehicle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,
}
