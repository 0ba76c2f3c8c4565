//! The tag scenarios, in the order the standard suite runs them

use super::context::{EventTypeSelection, Prerequisite, SuiteContext};
use super::runner::Scenario;
use crate::api::client::RequestOptions;
use crate::api::constants::headers;
use crate::api::models::{Tag, TagEventData, TagEventRequest};
use crate::assertions::{
    ID_REQUIRED_MESSAGE, TITLE_REQUIRED_MESSAGE, assert_error_envelope, assert_field_eq,
    assert_status, assert_validation_error,
};
use crate::error::{HarnessError, Result};
use crate::fixtures::{self, TagOverrides, fields};
use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;

pub const CREATE_TAG: &str = "Create new Tag";
pub const UPDATE_TAG_EVENT: &str = "Update Tag Event";
pub const CREATE_TAG_MISSING_ID: &str = "Create new Tag - Missing ID";
pub const CREATE_TAG_MISSING_TITLE: &str = "Create new Tag - Missing Title";

/// POST a valid tag and keep it for the update case
pub struct CreateTag;

#[async_trait]
impl Scenario for CreateTag {
    fn name(&self) -> &str {
        CREATE_TAG
    }

    fn prerequisites(&self) -> &[Prerequisite] {
        &[Prerequisite::Token]
    }

    async fn run(&self, ctx: &mut SuiteContext) -> Result<()> {
        let payload = ctx.fixtures.tag_payload(&TagOverrides::new());
        let expected_id = payload[fields::ID].as_str().unwrap_or_default().to_string();
        let requested_color = payload[fields::COLOR].as_str().map(str::to_string);

        let response = ctx
            .client
            .post(
                &ctx.tags_url(),
                RequestOptions::new().accept(headers::ACCEPT_TEXT_PLAIN).json(payload),
            )
            .await?;

        assert_status(&response, 201)?;
        let body = response.json()?;
        assert_field_eq(&body, fields::ID, &expected_id)?;

        let mut tag: Tag = response.json_as()?;
        if tag.color.is_none() {
            tag.color = requested_color;
        }
        if tag.latest_event_hash.is_none() {
            warn!("No latestEventHash found in the created tag response");
        }

        info!("Created tag {}", tag.id);
        ctx.record_created_tag(tag);
        Ok(())
    }
}

/// PUT an event onto the tag created earlier in the run
pub struct UpdateTagEvent;

impl UpdateTagEvent {
    async fn put_event(&self, ctx: &mut SuiteContext, event_type: &str) -> Result<()> {
        let tag = ctx.created_tag()?.clone();

        let data = TagEventData {
            color: tag.color.clone(),
            previous_event_hash: tag.latest_event_hash.clone(),
            event_id: ctx.fixtures.identifier().to_string(),
            author_id: ctx.author_id().to_string(),
            time_of_fact_offset: fixtures::current_timestamp(),
        };
        let request = TagEventRequest {
            event_type: event_type.to_string(),
            event_data: serde_json::to_string(&data)
                .map_err(|e| HarnessError::Json(format!("Failed to encode event data: {}", e)))?,
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| HarnessError::Json(format!("Failed to encode event request: {}", e)))?;

        let response = ctx
            .client
            .put(
                &ctx.tag_event_url(&tag.id),
                RequestOptions::new().accept(headers::CONTENT_TYPE_JSON).json(body),
            )
            .await?;

        assert_status(&response, 200)?;
        let updated = response.json()?;
        let latest_event_hash = updated
            .get("latestEventHash")
            .and_then(Value::as_str)
            .map(str::to_string);

        info!("Applied {} event to tag {}", event_type, tag.id);
        ctx.record_tag_event(latest_event_hash);
        Ok(())
    }
}

#[async_trait]
impl Scenario for UpdateTagEvent {
    fn name(&self) -> &str {
        UPDATE_TAG_EVENT
    }

    fn prerequisites(&self) -> &[Prerequisite] {
        &[Prerequisite::Token, Prerequisite::EventTypes, Prerequisite::CreatedTag]
    }

    async fn run(&self, ctx: &mut SuiteContext) -> Result<()> {
        let available = ctx.event_types()?.to_vec();

        let selected: Vec<String> = match ctx.event_type_selection {
            EventTypeSelection::Random => ctx.fixtures.pick(&available).cloned().into_iter().collect(),
            EventTypeSelection::All => available,
        };

        for event_type in &selected {
            self.put_event(ctx, event_type).await?;
        }
        Ok(())
    }
}

/// POST a tag with one required field left out and expect a validation error
pub struct CreateTagValidation {
    name: &'static str,
    omitted_field: &'static str,
    error_field: &'static str,
    expected_message: &'static str,
}

impl CreateTagValidation {
    pub fn missing_id() -> Self {
        Self {
            name: CREATE_TAG_MISSING_ID,
            omitted_field: fields::ID,
            error_field: "Id",
            expected_message: ID_REQUIRED_MESSAGE,
        }
    }

    pub fn missing_title() -> Self {
        Self {
            name: CREATE_TAG_MISSING_TITLE,
            omitted_field: fields::TITLE,
            error_field: "Title",
            expected_message: TITLE_REQUIRED_MESSAGE,
        }
    }
}

#[async_trait]
impl Scenario for CreateTagValidation {
    fn name(&self) -> &str {
        self.name
    }

    fn prerequisites(&self) -> &[Prerequisite] {
        &[Prerequisite::Token]
    }

    async fn run(&self, ctx: &mut SuiteContext) -> Result<()> {
        let payload = ctx
            .fixtures
            .tag_payload(&TagOverrides::new().omit(self.omitted_field));

        let response = ctx
            .client
            .post(
                &ctx.tags_url(),
                RequestOptions::new().accept(headers::ACCEPT_TEXT_PLAIN).json(payload),
            )
            .await?;

        assert_status(&response, 400)?;
        let body = response.json()?;
        assert_validation_error(&body, self.error_field, self.expected_message)?;
        assert_error_envelope(&body)?;
        Ok(())
    }
}
