//! Relational read contract consumed by the pipeline.
//!
//! The relational query layer lives outside this crate. [`EmlRepository`] names the fourteen
//! lookups (plus the system-constant lookup) the pipeline needs; each returns the raw row set
//! it found. Cardinality rules are applied by [`crate::fetch`], not here, so a repository never
//! has to decide whether an empty result is acceptable.
//!
//! Row types derive `Deserialize` so [`crate::snapshot::SnapshotStore`] can load them from YAML.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Failures raised by the backing store itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Rows
// ============================================================================

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DataPackageRow {
    pub data_package_id: i64,
    pub uuid: Uuid,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OccurrenceSubmissionRow {
    pub occurrence_submission_id: i64,
    pub survey_id: i64,
    /// Storage key of the submission's output artifact.
    #[serde(default)]
    pub output_key: Option<String>,
}

/// A publish event for an occurrence submission.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PublishStatusRow {
    #[serde(default)]
    pub event_timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SurveyRow {
    pub survey_id: i64,
    pub project_id: i64,
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub objectives: Option<String>,
    /// ISO-8601 date or timestamp.
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub lead_first_name: String,
    pub lead_last_name: String,
    pub location_name: String,
    #[serde(default)]
    pub location_description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectRow {
    pub project_id: i64,
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub objectives: Option<String>,
    #[serde(default)]
    pub caveats: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    pub coordinator_first_name: String,
    pub coordinator_last_name: String,
    pub coordinator_agency_name: String,
    pub coordinator_email_address: String,
    /// Whether the coordinator's personal details may appear in published metadata.
    pub coordinator_public: bool,
    pub location_name: String,
    #[serde(default)]
    pub location_description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FundingSourceRow {
    pub funding_source_id: i64,
    pub funding_source_name: String,
    pub investment_action_category_name: String,
    pub funding_amount: f64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub funding_source_project_id: Option<String>,
}

/// Extent of a survey or project geometry.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoundingBoxRow {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// One polygon ring: `[lat, lon]` pairs in ring order.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolygonRow {
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TaxonomicCoverageRow {
    pub taxon_rank_name: String,
    pub unit_name1: String,
    pub unit_name2: String,
    pub english_name: String,
    pub code: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConservationActionRow {
    pub level_1_name: String,
    pub level_2_name: String,
    pub level_3_name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StakeholderPartnershipRow {
    pub name: String,
}

// ============================================================================
// Read contract
// ============================================================================

/// Read-only lookups over the relational store.
///
/// Every method is a single query returning whatever rows match; none of them write.
/// Implementations are shared across concurrent pipeline runs and must not cache.
#[async_trait]
pub trait EmlRepository: Send + Sync {
    async fn data_package(&self, data_package_id: i64) -> StoreResult<Vec<DataPackageRow>>;

    /// Occurrence submissions linked to a data package.
    async fn occurrence_submissions(
        &self,
        data_package_id: i64,
    ) -> StoreResult<Vec<OccurrenceSubmissionRow>>;

    /// Publish events for a submission, latest first.
    async fn publish_status(
        &self,
        occurrence_submission_id: i64,
    ) -> StoreResult<Vec<PublishStatusRow>>;

    async fn survey(&self, survey_id: i64) -> StoreResult<Vec<SurveyRow>>;

    async fn project(&self, project_id: i64) -> StoreResult<Vec<ProjectRow>>;

    async fn survey_funding_sources(&self, survey_id: i64) -> StoreResult<Vec<FundingSourceRow>>;

    async fn project_funding_sources(&self, project_id: i64)
        -> StoreResult<Vec<FundingSourceRow>>;

    async fn survey_bounding_box(&self, survey_id: i64) -> StoreResult<Vec<BoundingBoxRow>>;

    async fn project_bounding_box(&self, project_id: i64) -> StoreResult<Vec<BoundingBoxRow>>;

    async fn survey_polygons(&self, survey_id: i64) -> StoreResult<Vec<PolygonRow>>;

    async fn project_polygons(&self, project_id: i64) -> StoreResult<Vec<PolygonRow>>;

    /// Focal species recorded against a survey.
    async fn focal_taxonomic_coverage(
        &self,
        survey_id: i64,
    ) -> StoreResult<Vec<TaxonomicCoverageRow>>;

    async fn iucn_conservation_actions(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<ConservationActionRow>>;

    async fn stakeholder_partnerships(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<StakeholderPartnershipRow>>;

    /// Value of a named system constant; `None` when the row or its value is absent.
    async fn system_constant(&self, name: &str) -> StoreResult<Option<String>>;
}
