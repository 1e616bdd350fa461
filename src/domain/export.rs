use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;
use super::ports::ExportSource;

/// Flattened key/value projection of one source entity. Ephemeral:
/// built for the duration of an export response, never persisted.
pub type ExportRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportEntity {
    Orders,
    Categories,
    Users,
}

impl ExportEntity {
    pub fn label(&self) -> &'static str {
        match self {
            ExportEntity::Orders => "orders",
            ExportEntity::Categories => "categories",
            ExportEntity::Users => "users",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExportLimits {
    /// Inclusive upper bound on the collection size; exports are
    /// refused only when the count is strictly greater.
    pub size_ceiling: i64,
    pub chunk_size: i64,
}

impl Default for ExportLimits {
    fn default() -> Self {
        Self {
            size_ceiling: 10_000,
            chunk_size: 1_000,
        }
    }
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub records: Vec<ExportRecord>,
    pub total: i64,
    pub message: String,
}

/// Lazy sequence of `(offset, limit)` windows covering `total` records.
/// Keeping this separate from the fetch loop makes the chunk plan
/// testable without touching any source.
pub fn chunk_windows(total: i64, chunk_size: i64) -> impl Iterator<Item = (i64, i64)> {
    let size = chunk_size.max(1);
    (0..)
        .map(move |i| i * size)
        .take_while(move |offset| *offset < total)
        .map(move |offset| (offset, size.min(total - offset)))
}

/// Runs a full chunked export.
///
/// The count runs first and the ceiling check happens before any bulk
/// read, so an oversized collection costs exactly one count query.
/// Chunking then bounds peak memory to one window of hydrated rows
/// regardless of collection size; the two bounds are independent and
/// both required.
pub fn run_export<S: ExportSource + ?Sized>(
    source: &S,
    entity: ExportEntity,
    limits: ExportLimits,
) -> Result<ExportOutcome, DomainError> {
    let total = source.count(entity)?;

    if total > limits.size_ceiling {
        return Err(DomainError::DatasetTooLarge {
            total,
            ceiling: limits.size_ceiling,
        });
    }

    if total == 0 {
        return Ok(ExportOutcome {
            records: Vec::new(),
            total: 0,
            message: format!("No {} to export", entity.label()),
        });
    }

    let mut records = Vec::with_capacity(total as usize);
    for (offset, limit) in chunk_windows(total, limits.chunk_size) {
        let chunk = source.fetch_chunk(entity, offset, limit)?;
        records.extend(chunk);
    }

    Ok(ExportOutcome {
        total,
        message: format!("Exported {} {} records", records.len(), entity.label()),
        records,
    })
}
