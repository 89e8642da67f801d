//! YAML-backed store.
//!
//! A snapshot is a nested export of the records one or more EML runs read: system constants,
//! data packages, occurrence submissions with their publish events, surveys and projects with
//! their dependent rows. [`SnapshotStore`] answers every [`EmlRepository`] lookup by filtering
//! the loaded snapshot, so the CLI and tests can run the full pipeline without a database.
//!
//! Unknown keys are rejected and schema mismatches report the offending path.

use crate::repository::{
    BoundingBoxRow, ConservationActionRow, DataPackageRow, EmlRepository, FundingSourceRow,
    OccurrenceSubmissionRow, PolygonRow, ProjectRow, PublishStatusRow, StakeholderPartnershipRow,
    StoreError, StoreResult, SurveyRow, TaxonomicCoverageRow,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Snapshot model
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Snapshot {
    /// System constants by name. A `null` value is stored but resolves as absent.
    pub constants: BTreeMap<String, Option<String>>,
    pub data_packages: Vec<DataPackageRow>,
    pub occurrence_submissions: Vec<SubmissionRecord>,
    pub surveys: Vec<SurveyRecord>,
    pub projects: Vec<ProjectRecord>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubmissionRecord {
    pub occurrence_submission_id: i64,
    pub data_package_id: i64,
    pub survey_id: i64,
    #[serde(default)]
    pub output_key: Option<String>,
    /// Publish events, latest first.
    #[serde(default)]
    pub publish_events: Vec<PublishStatusRow>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SurveyRecord {
    pub survey: SurveyRow,
    #[serde(default)]
    pub funding_sources: Vec<FundingSourceRow>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBoxRow>,
    #[serde(default)]
    pub polygons: Vec<PolygonRow>,
    #[serde(default)]
    pub focal_taxa: Vec<TaxonomicCoverageRow>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectRecord {
    pub project: ProjectRow,
    #[serde(default)]
    pub funding_sources: Vec<FundingSourceRow>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBoxRow>,
    #[serde(default)]
    pub polygons: Vec<PolygonRow>,
    #[serde(default)]
    pub iucn_conservation_actions: Vec<ConservationActionRow>,
    #[serde(default)]
    pub stakeholder_partnerships: Vec<StakeholderPartnershipRow>,
}

// ============================================================================
// Store
// ============================================================================

/// Read-only [`EmlRepository`] over an in-memory [`Snapshot`].
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    snapshot: Snapshot,
}

impl SnapshotStore {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Parses a YAML snapshot.
    pub fn parse(yaml: &str) -> StoreResult<Self> {
        let de = serde_yaml::Deserializer::from_str(yaml);
        let snapshot: Snapshot = serde_path_to_error::deserialize(de).map_err(|e| {
            let path = e.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            StoreError::InvalidSnapshot(format!("{path}: {}", e.inner()))
        })?;

        tracing::debug!(
            data_packages = snapshot.data_packages.len(),
            surveys = snapshot.surveys.len(),
            projects = snapshot.projects.len(),
            "parsed snapshot"
        );
        Ok(Self { snapshot })
    }

    /// Reads and parses a YAML snapshot from disk.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::parse(&yaml)
    }

    fn survey_record(&self, survey_id: i64) -> Option<&SurveyRecord> {
        self.snapshot
            .surveys
            .iter()
            .find(|record| record.survey.survey_id == survey_id)
    }

    fn project_record(&self, project_id: i64) -> Option<&ProjectRecord> {
        self.snapshot
            .projects
            .iter()
            .find(|record| record.project.project_id == project_id)
    }
}

#[async_trait]
impl EmlRepository for SnapshotStore {
    async fn data_package(&self, data_package_id: i64) -> StoreResult<Vec<DataPackageRow>> {
        Ok(self
            .snapshot
            .data_packages
            .iter()
            .filter(|row| row.data_package_id == data_package_id)
            .cloned()
            .collect())
    }

    async fn occurrence_submissions(
        &self,
        data_package_id: i64,
    ) -> StoreResult<Vec<OccurrenceSubmissionRow>> {
        Ok(self
            .snapshot
            .occurrence_submissions
            .iter()
            .filter(|record| record.data_package_id == data_package_id)
            .map(|record| OccurrenceSubmissionRow {
                occurrence_submission_id: record.occurrence_submission_id,
                survey_id: record.survey_id,
                output_key: record.output_key.clone(),
            })
            .collect())
    }

    async fn publish_status(
        &self,
        occurrence_submission_id: i64,
    ) -> StoreResult<Vec<PublishStatusRow>> {
        Ok(self
            .snapshot
            .occurrence_submissions
            .iter()
            .filter(|record| record.occurrence_submission_id == occurrence_submission_id)
            .flat_map(|record| record.publish_events.iter().cloned())
            .collect())
    }

    async fn survey(&self, survey_id: i64) -> StoreResult<Vec<SurveyRow>> {
        Ok(self
            .survey_record(survey_id)
            .map(|record| record.survey.clone())
            .into_iter()
            .collect())
    }

    async fn project(&self, project_id: i64) -> StoreResult<Vec<ProjectRow>> {
        Ok(self
            .project_record(project_id)
            .map(|record| record.project.clone())
            .into_iter()
            .collect())
    }

    async fn survey_funding_sources(&self, survey_id: i64) -> StoreResult<Vec<FundingSourceRow>> {
        Ok(self
            .survey_record(survey_id)
            .map(|record| record.funding_sources.clone())
            .unwrap_or_default())
    }

    async fn project_funding_sources(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<FundingSourceRow>> {
        Ok(self
            .project_record(project_id)
            .map(|record| record.funding_sources.clone())
            .unwrap_or_default())
    }

    async fn survey_bounding_box(&self, survey_id: i64) -> StoreResult<Vec<BoundingBoxRow>> {
        Ok(self
            .survey_record(survey_id)
            .and_then(|record| record.bounding_box)
            .into_iter()
            .collect())
    }

    async fn project_bounding_box(&self, project_id: i64) -> StoreResult<Vec<BoundingBoxRow>> {
        Ok(self
            .project_record(project_id)
            .and_then(|record| record.bounding_box)
            .into_iter()
            .collect())
    }

    async fn survey_polygons(&self, survey_id: i64) -> StoreResult<Vec<PolygonRow>> {
        Ok(self
            .survey_record(survey_id)
            .map(|record| record.polygons.clone())
            .unwrap_or_default())
    }

    async fn project_polygons(&self, project_id: i64) -> StoreResult<Vec<PolygonRow>> {
        Ok(self
            .project_record(project_id)
            .map(|record| record.polygons.clone())
            .unwrap_or_default())
    }

    async fn focal_taxonomic_coverage(
        &self,
        survey_id: i64,
    ) -> StoreResult<Vec<TaxonomicCoverageRow>> {
        Ok(self
            .survey_record(survey_id)
            .map(|record| record.focal_taxa.clone())
            .unwrap_or_default())
    }

    async fn iucn_conservation_actions(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<ConservationActionRow>> {
        Ok(self
            .project_record(project_id)
            .map(|record| record.iucn_conservation_actions.clone())
            .unwrap_or_default())
    }

    async fn stakeholder_partnerships(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<StakeholderPartnershipRow>> {
        Ok(self
            .project_record(project_id)
            .map(|record| record.stakeholder_partnerships.clone())
            .unwrap_or_default())
    }

    async fn system_constant(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.snapshot.constants.get(name).cloned().flatten())
    }
}
