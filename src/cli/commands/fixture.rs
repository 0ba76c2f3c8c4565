use anyhow::Result;
use clap::Args;
use work_items_e2e::fixtures::{FixtureGenerator, TagOverrides};

#[derive(Args)]
pub struct FixtureCommand {
    /// Payload field to leave out (repeatable), e.g. `--omit id`
    #[arg(long)]
    pub omit: Vec<String>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Image URL to place in the payload
    #[arg(long)]
    pub image_url: Option<String>,
}

pub fn fixture_command(command: &FixtureCommand) -> Result<()> {
    let mut generator = match command.seed {
        Some(seed) => FixtureGenerator::seeded(seed),
        None => FixtureGenerator::new(),
    };
    if let Some(image_url) = &command.image_url {
        generator = generator.with_image_url(image_url.clone());
    }

    let overrides = command
        .omit
        .iter()
        .fold(TagOverrides::new(), |overrides, field| overrides.omit(field));

    let payload = generator.tag_payload(&overrides);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
