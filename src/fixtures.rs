//! Randomized test data for tag payloads
//!
//! The free functions draw from the thread-local RNG. `FixtureGenerator` owns
//! its own RNG so a run can be replayed from a seed.

use crate::api::models::NewTag;
use chrono::{SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const DEFAULT_ALPHANUMERIC_LEN: usize = 10;

pub const DEFAULT_IMAGE_URL: &str = "http://placeimg.com/640/480/abstract";

const ALPHANUMERIC_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const MAX_COLOR: u32 = 0xFF_FFFF;

/// Wire names of tag payload fields
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const COLOR: &str = "color";
    pub const IMAGE: &str = "image";
    pub const DESCRIPTION: &str = "description";
    pub const EVENT_ID: &str = "eventId";
    pub const TIME_OF_FACT_OFFSET: &str = "timeOfFactOffset";
}

/// How a single payload field deviates from the generated default
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOverride {
    Value(Value),
    /// Drop the field from the payload entirely
    Absent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagOverrides {
    fields: BTreeMap<String, FieldOverride>,
}

impl TagOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields
            .insert(field.to_string(), FieldOverride::Value(value.into()));
        self
    }

    pub fn omit(mut self, field: &str) -> Self {
        self.fields.insert(field.to_string(), FieldOverride::Absent);
        self
    }

    fn apply(&self, payload: &mut Map<String, Value>) {
        for (field, change) in &self.fields {
            match change {
                FieldOverride::Value(value) => {
                    payload.insert(field.clone(), value.clone());
                }
                FieldOverride::Absent => {
                    payload.remove(field);
                }
            }
        }
    }
}

pub fn random_identifier() -> Uuid {
    identifier_from(&mut rand::rng())
}

pub fn random_alphanumeric(length: usize) -> String {
    alphanumeric_from(&mut rand::rng(), length)
}

pub fn random_color() -> String {
    color_from(&mut rand::rng())
}

/// Render a 24-bit value as `#rrggbb`, zero padded
pub fn format_color(value: u32) -> String {
    format!("#{:06x}", value & MAX_COLOR)
}

/// Current UTC time, millisecond precision, `Z` suffix
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A complete valid tag payload with `overrides` applied on top
pub fn build_tag_payload(overrides: &TagOverrides) -> Value {
    tag_payload_from(&mut rand::rng(), DEFAULT_IMAGE_URL, overrides)
}

fn identifier_from<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn alphanumeric_from<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHANUMERIC_CHARSET.len());
            ALPHANUMERIC_CHARSET[idx] as char
        })
        .collect()
}

fn color_from<R: Rng>(rng: &mut R) -> String {
    format_color(rng.random_range(0..=MAX_COLOR))
}

fn tag_payload_from<R: Rng>(rng: &mut R, image_url: &str, overrides: &TagOverrides) -> Value {
    let tag = NewTag {
        id: identifier_from(rng).to_string(),
        title: alphanumeric_from(rng, DEFAULT_ALPHANUMERIC_LEN),
        color: color_from(rng),
        image: image_url.to_string(),
        description: alphanumeric_from(rng, DEFAULT_ALPHANUMERIC_LEN),
        event_id: identifier_from(rng).to_string(),
        time_of_fact_offset: current_timestamp(),
    };

    let mut payload = match serde_json::to_value(tag) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    overrides.apply(&mut payload);
    Value::Object(payload)
}

/// Fixture source owned by a single run
pub struct FixtureGenerator {
    rng: StdRng,
    seed: Option<u64>,
    image_url: String,
}

impl FixtureGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            seed: None,
            image_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }

    /// Deterministic generator, same seed gives the same fixtures
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
            image_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn identifier(&mut self) -> Uuid {
        identifier_from(&mut self.rng)
    }

    pub fn alphanumeric(&mut self, length: usize) -> String {
        alphanumeric_from(&mut self.rng, length)
    }

    pub fn color(&mut self) -> String {
        color_from(&mut self.rng)
    }

    pub fn tag_payload(&mut self, overrides: &TagOverrides) -> Value {
        tag_payload_from(&mut self.rng, &self.image_url, overrides)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.random_range(0..items.len()))
    }
}

impl Default for FixtureGenerator {
    fn default() -> Self {
        Self::new()
    }
}
