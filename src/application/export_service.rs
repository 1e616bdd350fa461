use crate::domain::errors::DomainError;
use crate::domain::export::{run_export, ExportEntity, ExportLimits, ExportOutcome};
use crate::domain::ports::ExportSource;

/// Thin wrapper binding the configured limits to the chunked export
/// pipeline.
#[derive(Debug, Clone)]
pub struct ExportService<S> {
    source: S,
    limits: ExportLimits,
}

impl<S: ExportSource> ExportService<S> {
    pub fn new(source: S, limits: ExportLimits) -> Self {
        Self { source, limits }
    }

    pub fn export(&self, entity: ExportEntity) -> Result<ExportOutcome, DomainError> {
        run_export(&self.source, entity, self.limits)
    }
}
