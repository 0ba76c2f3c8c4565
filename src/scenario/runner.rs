use super::cases::{CreateTag, CreateTagValidation, UpdateTagEvent};
use super::context::{EventTypeSelection, Prerequisite, SuiteContext};
use super::report::RunReport;
use crate::api::auth::TokenProvider;
use crate::api::client::{HttpTestClient, RequestOptions};
use crate::api::constants::headers;
use crate::config::RunConfig;
use crate::error::{HarnessError, Result};
use crate::fixtures::FixtureGenerator;
use async_trait::async_trait;
use log::{error, info, warn};
use std::time::Instant;

/// One test case of the suite
#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    /// State that must exist before `run` is called
    fn prerequisites(&self) -> &[Prerequisite] {
        &[]
    }

    async fn run(&self, ctx: &mut SuiteContext) -> Result<()>;
}

/// Options chosen per invocation rather than per environment
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub seed: Option<u64>,
    pub event_type_selection: EventTypeSelection,
}

/// Runs scenarios in declared order against one shared context
pub struct ScenarioRunner {
    scenarios: Vec<Box<dyn Scenario>>,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// The tag suite: create, update, then the two validation cases
    pub fn standard() -> Self {
        Self::new()
            .with_scenario(CreateTag)
            .with_scenario(UpdateTagEvent)
            .with_scenario(CreateTagValidation::missing_id())
            .with_scenario(CreateTagValidation::missing_title())
    }

    pub fn with_scenario(mut self, scenario: impl Scenario + 'static) -> Self {
        self.scenarios.push(Box::new(scenario));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name()).collect()
    }

    /// Run every case, a failed prerequisite fails the case without running it
    pub async fn run(&self, ctx: &mut SuiteContext) -> RunReport {
        let mut report = RunReport::new(ctx.fixtures.seed());

        for scenario in &self.scenarios {
            let name = scenario.name();
            let started = Instant::now();

            let result = match check_prerequisites(scenario.as_ref(), ctx) {
                Ok(()) => {
                    info!("Running case: {}", name);
                    scenario.run(ctx).await
                }
                Err(err) => Err(err),
            };

            match &result {
                Ok(()) => info!("Case passed: {}", name),
                Err(err) => error!("Case failed: {}: {}", name, err),
            }
            report.record(name, result, started.elapsed());
        }

        report
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn check_prerequisites(scenario: &dyn Scenario, ctx: &SuiteContext) -> Result<()> {
    for prerequisite in scenario.prerequisites() {
        ctx.check(*prerequisite)?;
    }
    Ok(())
}

/// Fetch the tenant's event types into the context
pub async fn load_event_types(ctx: &mut SuiteContext) -> Result<()> {
    let response = ctx
        .client
        .get(
            &ctx.event_types_url(),
            RequestOptions::new().accept(headers::CONTENT_TYPE_JSON),
        )
        .await?;

    if !response.is_success() {
        return Err(HarnessError::Setup(format!(
            "Failed to fetch event types (status {}): {}",
            response.status(),
            response.text()
        )));
    }

    let event_types: Vec<String> = response.json_as()?;
    if event_types.is_empty() {
        warn!("Tenant {} returned no event types", ctx.tenant_id());
    }
    info!("Event types retrieved: {:?}", event_types);

    ctx.set_event_types(event_types);
    Ok(())
}

/// Acquire the run token and load reference data
///
/// Any error here aborts the run before a single case executes.
pub async fn setup(config: &RunConfig, options: &RunOptions) -> Result<SuiteContext> {
    let client = HttpTestClient::new(&config.settings)?;

    let fixtures = match options.seed {
        Some(seed) => FixtureGenerator::seeded(seed),
        None => FixtureGenerator::new(),
    }
    .with_image_url(config.settings.image_url.clone());

    let mut ctx = SuiteContext::new(client.clone(), &config.base_url, &config.credentials.tenant_id)
        .with_fixtures(fixtures)
        .with_author_id(config.settings.author_id.clone())
        .with_event_type_selection(options.event_type_selection);

    let provider = TokenProvider::new(client, config.token_url(), config.credentials.clone())
        .with_scope(config.scope.clone());
    let token = provider.token().await?;
    ctx.set_token(token);

    load_event_types(&mut ctx).await?;
    Ok(ctx)
}

/// Setup followed by the standard suite
pub async fn run_suite(config: &RunConfig, options: &RunOptions) -> Result<RunReport> {
    let mut ctx = setup(config, options).await?;
    let runner = ScenarioRunner::standard();
    info!("Running {} cases for tenant {}", runner.names().len(), ctx.tenant_id());
    Ok(runner.run(&mut ctx).await)
}
