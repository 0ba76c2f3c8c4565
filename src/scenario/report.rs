use crate::error::HarnessError;
use colored::Colorize;
use std::time::Duration;

#[derive(Debug)]
pub enum CaseStatus {
    Passed,
    Failed(HarnessError),
}

#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub status: CaseStatus,
    pub duration: Duration,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        matches!(self.status, CaseStatus::Passed)
    }

    pub fn error(&self) -> Option<&HarnessError> {
        match &self.status {
            CaseStatus::Passed => None,
            CaseStatus::Failed(err) => Some(err),
        }
    }
}

/// Outcome of every case in a run, in execution order
#[derive(Debug, Default)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
    pub seed: Option<u64>,
}

impl RunReport {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            cases: Vec::new(),
            seed,
        }
    }

    pub fn record(&mut self, name: &str, result: Result<(), HarnessError>, duration: Duration) {
        let status = match result {
            Ok(()) => CaseStatus::Passed,
            Err(err) => CaseStatus::Failed(err),
        };
        self.cases.push(CaseReport {
            name: name.to_string(),
            status,
            duration,
        });
    }

    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.name == name)
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|case| case.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.len() - self.passed_count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn print_summary(&self) {
        println!();
        for case in &self.cases {
            let millis = case.duration.as_millis();
            match &case.status {
                CaseStatus::Passed => {
                    println!("  {} {} ({} ms)", "✓".green(), case.name, millis);
                }
                CaseStatus::Failed(err) => {
                    println!("  {} {} ({} ms)", "✗".red(), case.name.bold(), millis);
                    println!("      {}: {}", err.kind().yellow(), err);
                }
            }
        }

        println!();
        let summary = format!(
            "{} passed, {} failed, {} total",
            self.passed_count(),
            self.failed_count(),
            self.cases.len()
        );
        if self.is_success() {
            println!("{}", summary.green().bold());
        } else {
            println!("{}", summary.red().bold());
        }

        if let Some(seed) = self.seed {
            println!("Fixture seed: {}", seed);
        }
    }
}
