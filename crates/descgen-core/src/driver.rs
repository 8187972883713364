//! Batch run: load the dataset, generate one description per record, append rows.

use std::io::Write;
use std::path::Path;

use descgen_llm::LlmProvider;
use futures::StreamExt;

use crate::dataset::{self, CompanyRecord, DatasetError};
use crate::generator::DescriptionGenerator;
use crate::writer::{DescriptionWriter, OutputRow, WriterError};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Writer(#[from] WriterError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Generation requests in flight at once; values below 1 are treated as 1.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loading,
    Iterating { processed: usize, total: usize },
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub generated: usize,
    pub failed: usize,
}

fn attempt_message(name: &str) -> String {
    format!("Generating description for {name}")
}

fn failure_message(name: &str) -> String {
    format!("Error generating description for {name}")
}

/// Drives one batch run.
///
/// A failed generation never stops the run: the record gets the sentinel
/// description and the next record is processed. Rows are written in input
/// order even when several requests are in flight.
pub struct Driver<P> {
    generator: DescriptionGenerator<P>,
    options: RunOptions,
    state: RunState,
}

impl<P: LlmProvider> Driver<P> {
    #[must_use]
    pub fn new(provider: P, options: RunOptions) -> Self {
        Self {
            generator: DescriptionGenerator::new(provider),
            options,
            state: RunState::Loading,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Load `input`, then append one row per record to `output`.
    ///
    /// The dataset is fully loaded before the output file is touched, so a bad
    /// dataset leaves the output unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Dataset`] if the dataset cannot be loaded and
    /// [`DriverError::Writer`] if the output file cannot be opened or written.
    pub async fn run(&mut self, input: &Path, output: &Path) -> Result<RunSummary, DriverError> {
        self.state = RunState::Loading;
        let records = dataset::load(input)?;
        let mut writer = DescriptionWriter::append(output)?;
        self.process(&records, &mut writer).await
    }

    /// # Errors
    ///
    /// Returns [`DriverError::Writer`] if a row cannot be written.
    pub async fn process<W: Write>(
        &mut self,
        records: &[CompanyRecord],
        writer: &mut DescriptionWriter<W>,
    ) -> Result<RunSummary, DriverError> {
        let total = records.len();
        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };
        self.state = RunState::Iterating {
            processed: 0,
            total,
        };
        tracing::info!(
            total,
            concurrency = self.options.concurrency,
            "generating descriptions"
        );

        let generator = &self.generator;
        let results = futures::stream::iter(records)
            .map(move |record| async move {
                println!("{}", attempt_message(&record.name));
                let outcome = generator.generate(record).await;
                (record, outcome)
            })
            .buffered(self.options.concurrency.max(1));
        let mut results = std::pin::pin!(results);

        while let Some((record, outcome)) = results.next().await {
            let row = match outcome {
                Ok(text) => {
                    summary.generated += 1;
                    OutputRow::generated(record.name.as_str(), &text)
                }
                Err(e) => {
                    println!("{}", failure_message(&record.name));
                    tracing::warn!(
                        company = %record.name,
                        error = %e,
                        "description generation failed"
                    );
                    summary.failed += 1;
                    OutputRow::failed(record.name.as_str())
                }
            };
            writer.write_row(&row)?;
            self.state = RunState::Iterating {
                processed: summary.generated + summary.failed,
                total,
            };
        }

        self.state = RunState::Done;
        tracing::info!(
            total = summary.total,
            generated = summary.generated,
            failed = summary.failed,
            "run complete"
        );
        Ok(summary)
    }
}
