//! Shared fixtures for unit tests.

use crate::constants::{
    INTELLECTUAL_RIGHTS, ORGANIZATION_NAME_FULL, ORGANIZATION_URL, PROVIDER_URL,
    SECURITY_PROVIDER_URL, TAXONOMIC_PROVIDER_URL,
};
use crate::repository::{
    BoundingBoxRow, ConservationActionRow, DataPackageRow, EmlRepository, FundingSourceRow,
    OccurrenceSubmissionRow, PolygonRow, ProjectRow, PublishStatusRow, StakeholderPartnershipRow,
    StoreError, StoreResult, SurveyRow, TaxonomicCoverageRow,
};
use crate::snapshot::{ProjectRecord, Snapshot, SnapshotStore, SubmissionRecord, SurveyRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eml_types::DataPackageId;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

pub const DATA_PACKAGE_UUID: Uuid = Uuid::from_u128(0x0b6f6c1e_6b42_4c55_9f8e_2f4c5a1d9e01);
pub const SURVEY_UUID: Uuid = Uuid::from_u128(0x7d1c8a52_3f0e_4b7a_8d43_5e2f9b6c4a10);
pub const PROJECT_UUID: Uuid = Uuid::from_u128(0x3a9e1f04_c2d7_4e68_b5a1_96f0d8e2c7b3);

pub fn package_id(value: i64) -> DataPackageId {
    DataPackageId::new(value).expect("positive data package id")
}

fn timestamp(value: &str) -> DateTime<Utc> {
    value.parse().expect("valid RFC 3339 timestamp")
}

fn funding_row(id: i64, name: &str, category: &str, amount: f64) -> FundingSourceRow {
    FundingSourceRow {
        funding_source_id: id,
        funding_source_name: name.into(),
        investment_action_category_name: category.into(),
        funding_amount: amount,
        start_date: "2021-04-01T07:00:00.000Z".into(),
        end_date: "2022-03-31T07:00:00.000Z".into(),
        funding_source_project_id: Some(format!("FS-{id}")),
    }
}

/// Data package 1 → submission 10 → survey 1 → project 1, with every optional lookup populated.
pub fn fixture_snapshot() -> Snapshot {
    let constants = [
        (PROVIDER_URL, "https://biohub.example/provider"),
        (SECURITY_PROVIDER_URL, "https://biohub.example/auth"),
        (ORGANIZATION_NAME_FULL, "Biohub Organization"),
        (ORGANIZATION_URL, "https://biohub.example"),
        (INTELLECTUAL_RIGHTS, "Open Government Licence"),
        (TAXONOMIC_PROVIDER_URL, "https://taxa.example"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), Some(value.to_string())))
    .collect();

    Snapshot {
        constants,
        data_packages: vec![DataPackageRow {
            data_package_id: 1,
            uuid: DATA_PACKAGE_UUID,
        }],
        occurrence_submissions: vec![SubmissionRecord {
            occurrence_submission_id: 10,
            data_package_id: 1,
            survey_id: 1,
            output_key: Some("submissions/10/output.zip".into()),
            publish_events: vec![PublishStatusRow {
                event_timestamp: Some(timestamp("2023-03-14T22:05:00Z")),
            }],
        }],
        surveys: vec![SurveyRecord {
            survey: SurveyRow {
                survey_id: 1,
                project_id: 1,
                uuid: SURVEY_UUID,
                name: "Moose Survey 2021".into(),
                objectives: Some("Count moose".into()),
                start_date: "2021-01-01T08:00:00.000Z".into(),
                end_date: Some("2021-03-31T07:00:00.000Z".into()),
                lead_first_name: "Lee".into(),
                lead_last_name: "Park".into(),
                location_name: "Skeena".into(),
                location_description: Some("Upper watershed".into()),
            },
            funding_sources: vec![funding_row(5, "Habitat Fund", "Monitoring", 50000.0)],
            bounding_box: Some(BoundingBoxRow {
                xmin: -128.5,
                xmax: -126.0,
                ymin: 54.0,
                ymax: 55.5,
            }),
            polygons: vec![PolygonRow {
                points: vec![[54.0, -128.5], [55.5, -128.5], [55.5, -126.0], [54.0, -126.0]],
            }],
            focal_taxa: vec![TaxonomicCoverageRow {
                taxon_rank_name: "Species".into(),
                unit_name1: "Alces".into(),
                unit_name2: "alces".into(),
                english_name: "Moose".into(),
                code: "M-ALAM".into(),
            }],
        }],
        projects: vec![ProjectRecord {
            project: ProjectRow {
                project_id: 1,
                uuid: PROJECT_UUID,
                name: "Moose Recovery".into(),
                objectives: Some("Recover moose populations".into()),
                caveats: None,
                comments: Some("Year two".into()),
                coordinator_first_name: "Jane".into(),
                coordinator_last_name: "Doe".into(),
                coordinator_agency_name: "Wildlife Agency".into(),
                coordinator_email_address: "j@x.org".into(),
                coordinator_public: true,
                location_name: "Northern Region".into(),
                location_description: None,
            },
            funding_sources: vec![funding_row(7, "Recovery Fund", "Planning", 125000.0)],
            bounding_box: Some(BoundingBoxRow {
                xmin: -130.0,
                xmax: -120.0,
                ymin: 50.0,
                ymax: 58.0,
            }),
            polygons: vec![],
            iucn_conservation_actions: vec![ConservationActionRow {
                level_1_name: "Land/water protection".into(),
                level_2_name: "Site/area protection".into(),
                level_3_name: "Protected area designation".into(),
            }],
            stakeholder_partnerships: vec![StakeholderPartnershipRow {
                name: "Moose Society".into(),
            }],
        }],
    }
}

/// Wraps a repository and counts every lookup that reaches it.
pub struct CountingRepository<R> {
    inner: R,
    calls: AtomicUsize,
}

impl<R> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<R: EmlRepository> EmlRepository for CountingRepository<R> {
    async fn data_package(&self, data_package_id: i64) -> StoreResult<Vec<DataPackageRow>> {
        self.tick();
        self.inner.data_package(data_package_id).await
    }

    async fn occurrence_submissions(
        &self,
        data_package_id: i64,
    ) -> StoreResult<Vec<OccurrenceSubmissionRow>> {
        self.tick();
        self.inner.occurrence_submissions(data_package_id).await
    }

    async fn publish_status(
        &self,
        occurrence_submission_id: i64,
    ) -> StoreResult<Vec<PublishStatusRow>> {
        self.tick();
        self.inner.publish_status(occurrence_submission_id).await
    }

    async fn survey(&self, survey_id: i64) -> StoreResult<Vec<SurveyRow>> {
        self.tick();
        self.inner.survey(survey_id).await
    }

    async fn project(&self, project_id: i64) -> StoreResult<Vec<ProjectRow>> {
        self.tick();
        self.inner.project(project_id).await
    }

    async fn survey_funding_sources(&self, survey_id: i64) -> StoreResult<Vec<FundingSourceRow>> {
        self.tick();
        self.inner.survey_funding_sources(survey_id).await
    }

    async fn project_funding_sources(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<FundingSourceRow>> {
        self.tick();
        self.inner.project_funding_sources(project_id).await
    }

    async fn survey_bounding_box(&self, survey_id: i64) -> StoreResult<Vec<BoundingBoxRow>> {
        self.tick();
        self.inner.survey_bounding_box(survey_id).await
    }

    async fn project_bounding_box(&self, project_id: i64) -> StoreResult<Vec<BoundingBoxRow>> {
        self.tick();
        self.inner.project_bounding_box(project_id).await
    }

    async fn survey_polygons(&self, survey_id: i64) -> StoreResult<Vec<PolygonRow>> {
        self.tick();
        self.inner.survey_polygons(survey_id).await
    }

    async fn project_polygons(&self, project_id: i64) -> StoreResult<Vec<PolygonRow>> {
        self.tick();
        self.inner.project_polygons(project_id).await
    }

    async fn focal_taxonomic_coverage(
        &self,
        survey_id: i64,
    ) -> StoreResult<Vec<TaxonomicCoverageRow>> {
        self.tick();
        self.inner.focal_taxonomic_coverage(survey_id).await
    }

    async fn iucn_conservation_actions(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<ConservationActionRow>> {
        self.tick();
        self.inner.iucn_conservation_actions(project_id).await
    }

    async fn stakeholder_partnerships(
        &self,
        project_id: i64,
    ) -> StoreResult<Vec<StakeholderPartnershipRow>> {
        self.tick();
        self.inner.stakeholder_partnerships(project_id).await
    }

    async fn system_constant(&self, name: &str) -> StoreResult<Option<String>> {
        self.tick();
        self.inner.system_constant(name).await
    }
}

/// Every lookup fails as if the store were unreachable.
pub struct FailingRepository;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".into()))
}

#[async_trait]
impl EmlRepository for FailingRepository {
    async fn data_package(&self, _: i64) -> StoreResult<Vec<DataPackageRow>> {
        unavailable()
    }

    async fn occurrence_submissions(&self, _: i64) -> StoreResult<Vec<OccurrenceSubmissionRow>> {
        unavailable()
    }

    async fn publish_status(&self, _: i64) -> StoreResult<Vec<PublishStatusRow>> {
        unavailable()
    }

    async fn survey(&self, _: i64) -> StoreResult<Vec<SurveyRow>> {
        unavailable()
    }

    async fn project(&self, _: i64) -> StoreResult<Vec<ProjectRow>> {
        unavailable()
    }

    async fn survey_funding_sources(&self, _: i64) -> StoreResult<Vec<FundingSourceRow>> {
        unavailable()
    }

    async fn project_funding_sources(&self, _: i64) -> StoreResult<Vec<FundingSourceRow>> {
        unavailable()
    }

    async fn survey_bounding_box(&self, _: i64) -> StoreResult<Vec<BoundingBoxRow>> {
        unavailable()
    }

    async fn project_bounding_box(&self, _: i64) -> StoreResult<Vec<BoundingBoxRow>> {
        unavailable()
    }

    async fn survey_polygons(&self, _: i64) -> StoreResult<Vec<PolygonRow>> {
        unavailable()
    }

    async fn project_polygons(&self, _: i64) -> StoreResult<Vec<PolygonRow>> {
        unavailable()
    }

    async fn focal_taxonomic_coverage(&self, _: i64) -> StoreResult<Vec<TaxonomicCoverageRow>> {
        unavailable()
    }

    async fn iucn_conservation_actions(&self, _: i64) -> StoreResult<Vec<ConservationActionRow>> {
        unavailable()
    }

    async fn stakeholder_partnerships(
        &self,
        _: i64,
    ) -> StoreResult<Vec<StakeholderPartnershipRow>> {
        unavailable()
    }

    async fn system_constant(&self, _: &str) -> StoreResult<Option<String>> {
        unavailable()
    }
}

/// Convenience for tests that only need the fixture store.
pub fn fixture_store() -> SnapshotStore {
    SnapshotStore::from_snapshot(fixture_snapshot())
}
