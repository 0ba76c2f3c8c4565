use crate::api::client::HttpTestClient;
use crate::api::constants;
use crate::api::models::{Tag, Token};
use crate::error::{HarnessError, Result};
use crate::fixtures::FixtureGenerator;
use log::debug;
use std::sync::Arc;

/// Progress of a run through its dependent states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStage {
    Uninitialized,
    TokenAcquired,
    ReferenceDataLoaded,
    TagCreated,
    TagUpdated,
}

/// State a scenario needs an earlier step to have produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Token,
    EventTypes,
    CreatedTag,
}

/// Which fetched event types the update case exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTypeSelection {
    /// One type, chosen by the run's fixture generator
    #[default]
    Random,
    /// Every fetched type in order, chaining event hashes
    All,
}

/// Everything a run shares between its cases
///
/// Constructed once per run and handed to each scenario by `&mut`.
pub struct SuiteContext {
    pub client: HttpTestClient,
    pub fixtures: FixtureGenerator,
    pub event_type_selection: EventTypeSelection,
    base_url: String,
    tenant_id: String,
    author_id: String,
    token: Option<Arc<Token>>,
    event_types: Vec<String>,
    created_tag: Option<Tag>,
    stage: RunStage,
}

impl SuiteContext {
    pub fn new(client: HttpTestClient, base_url: &str, tenant_id: &str) -> Self {
        Self {
            client,
            fixtures: FixtureGenerator::new(),
            event_type_selection: EventTypeSelection::default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            author_id: "work-items-e2e".to_string(),
            token: None,
            event_types: Vec::new(),
            created_tag: None,
            stage: RunStage::Uninitialized,
        }
    }

    pub fn with_fixtures(mut self, fixtures: FixtureGenerator) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn with_author_id(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = author_id.into();
        self
    }

    pub fn with_event_type_selection(mut self, selection: EventTypeSelection) -> Self {
        self.event_type_selection = selection;
        self
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    pub fn set_token(&mut self, token: Arc<Token>) {
        self.client = self.client.clone().with_token(token.clone());
        self.token = Some(token);
        self.advance(RunStage::TokenAcquired);
    }

    pub fn set_event_types(&mut self, event_types: Vec<String>) {
        self.event_types = event_types;
        self.advance(RunStage::ReferenceDataLoaded);
    }

    pub fn record_created_tag(&mut self, tag: Tag) {
        self.created_tag = Some(tag);
        self.advance(RunStage::TagCreated);
    }

    /// Carry the hash returned by an event update into the next one
    pub fn record_tag_event(&mut self, latest_event_hash: Option<String>) {
        if let (Some(tag), Some(hash)) = (self.created_tag.as_mut(), latest_event_hash) {
            tag.latest_event_hash = Some(hash);
        }
        self.advance(RunStage::TagUpdated);
    }

    pub fn token(&self) -> Result<&Token> {
        self.token.as_deref().ok_or_else(|| {
            HarnessError::Precondition("Authorization token is missing, token retrieval did not run".into())
        })
    }

    pub fn event_types(&self) -> Result<&[String]> {
        if self.event_types.is_empty() {
            return Err(HarnessError::Precondition("No event types were fetched for the tenant".into()));
        }
        Ok(&self.event_types)
    }

    pub fn created_tag(&self) -> Result<&Tag> {
        self.created_tag.as_ref().ok_or_else(|| {
            HarnessError::Precondition("No tag was created by an earlier case".into())
        })
    }

    pub fn check(&self, prerequisite: Prerequisite) -> Result<()> {
        match prerequisite {
            Prerequisite::Token => self.token().map(|_| ()),
            Prerequisite::EventTypes => self.event_types().map(|_| ()),
            Prerequisite::CreatedTag => self.created_tag().map(|_| ()),
        }
    }

    pub fn tags_url(&self) -> String {
        constants::tags_endpoint(&self.base_url, &self.tenant_id)
    }

    pub fn event_types_url(&self) -> String {
        constants::event_types_endpoint(&self.base_url, &self.tenant_id)
    }

    pub fn tag_event_url(&self, tag_id: &str) -> String {
        constants::tag_event_endpoint(&self.base_url, &self.tenant_id, tag_id)
    }

    fn advance(&mut self, stage: RunStage) {
        if stage > self.stage {
            debug!("Run stage {:?} -> {:?}", self.stage, stage);
            self.stage = stage;
        }
    }
}
