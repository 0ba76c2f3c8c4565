pub mod fixture;
pub mod run;
pub mod token;

pub use fixture::{FixtureCommand, fixture_command};
pub use run::{RunCommand, run_command};
pub use token::token_command;
