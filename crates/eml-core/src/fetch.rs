//! Entity fetchers.
//!
//! Thin wrappers over [`EmlRepository`] that apply the read contract:
//! - a non-positive identifier is a build failure, raised before the store is touched
//! - the data package must exist, and exactly one occurrence submission must resolve
//! - every other lookup returns what it found, empty included; the assembler decides
//! - store failures propagate unchanged

use crate::constants::{DATA_PACKAGE_NOT_FOUND, SUBMISSION_NOT_DISTINCT};
use crate::error::{EmlError, EmlResult};
use crate::repository::{
    BoundingBoxRow, ConservationActionRow, DataPackageRow, EmlRepository, FundingSourceRow,
    OccurrenceSubmissionRow, PolygonRow, ProjectRow, PublishStatusRow, StakeholderPartnershipRow,
    SurveyRow, TaxonomicCoverageRow,
};

fn require_id(id: i64, statement: &str) -> EmlResult<()> {
    if id <= 0 {
        return Err(EmlError::Build(format!(
            "Failed to build SQL get statement for {statement}"
        )));
    }
    Ok(())
}

pub async fn data_package(
    repository: &dyn EmlRepository,
    data_package_id: i64,
) -> EmlResult<DataPackageRow> {
    require_id(data_package_id, "data package")?;
    repository
        .data_package(data_package_id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| EmlError::NotFound(DATA_PACKAGE_NOT_FOUND.into()))
}

/// Fails with `NotFound` unless exactly one submission is linked to the data package.
pub async fn occurrence_submission(
    repository: &dyn EmlRepository,
    data_package_id: i64,
) -> EmlResult<OccurrenceSubmissionRow> {
    require_id(data_package_id, "occurrence submission")?;
    let mut rows = repository.occurrence_submissions(data_package_id).await?;
    if rows.len() != 1 {
        tracing::debug!(
            data_package_id,
            rows = rows.len(),
            "occurrence submission cardinality check failed"
        );
        return Err(EmlError::NotFound(SUBMISSION_NOT_DISTINCT.into()));
    }
    Ok(rows.remove(0))
}

/// Latest publish event, if any.
pub async fn publish_status(
    repository: &dyn EmlRepository,
    occurrence_submission_id: i64,
) -> EmlResult<Option<PublishStatusRow>> {
    require_id(occurrence_submission_id, "publish status")?;
    Ok(repository
        .publish_status(occurrence_submission_id)
        .await?
        .into_iter()
        .next())
}

pub async fn survey(repository: &dyn EmlRepository, survey_id: i64) -> EmlResult<Option<SurveyRow>> {
    require_id(survey_id, "survey")?;
    Ok(repository.survey(survey_id).await?.into_iter().next())
}

pub async fn project(
    repository: &dyn EmlRepository,
    project_id: i64,
) -> EmlResult<Option<ProjectRow>> {
    require_id(project_id, "project")?;
    Ok(repository.project(project_id).await?.into_iter().next())
}

pub async fn survey_funding_sources(
    repository: &dyn EmlRepository,
    survey_id: i64,
) -> EmlResult<Vec<FundingSourceRow>> {
    require_id(survey_id, "survey funding sources")?;
    Ok(repository.survey_funding_sources(survey_id).await?)
}

pub async fn project_funding_sources(
    repository: &dyn EmlRepository,
    project_id: i64,
) -> EmlResult<Vec<FundingSourceRow>> {
    require_id(project_id, "project funding sources")?;
    Ok(repository.project_funding_sources(project_id).await?)
}

pub async fn survey_bounding_box(
    repository: &dyn EmlRepository,
    survey_id: i64,
) -> EmlResult<Option<BoundingBoxRow>> {
    require_id(survey_id, "survey bounding box")?;
    Ok(repository
        .survey_bounding_box(survey_id)
        .await?
        .into_iter()
        .next())
}

pub async fn project_bounding_box(
    repository: &dyn EmlRepository,
    project_id: i64,
) -> EmlResult<Option<BoundingBoxRow>> {
    require_id(project_id, "project bounding box")?;
    Ok(repository
        .project_bounding_box(project_id)
        .await?
        .into_iter()
        .next())
}

pub async fn survey_polygons(
    repository: &dyn EmlRepository,
    survey_id: i64,
) -> EmlResult<Vec<PolygonRow>> {
    require_id(survey_id, "survey polygons")?;
    Ok(repository.survey_polygons(survey_id).await?)
}

pub async fn project_polygons(
    repository: &dyn EmlRepository,
    project_id: i64,
) -> EmlResult<Vec<PolygonRow>> {
    require_id(project_id, "project polygons")?;
    Ok(repository.project_polygons(project_id).await?)
}

pub async fn focal_taxonomic_coverage(
    repository: &dyn EmlRepository,
    survey_id: i64,
) -> EmlResult<Vec<TaxonomicCoverageRow>> {
    require_id(survey_id, "focal taxonomic coverage")?;
    Ok(repository.focal_taxonomic_coverage(survey_id).await?)
}

pub async fn iucn_conservation_actions(
    repository: &dyn EmlRepository,
    project_id: i64,
) -> EmlResult<Vec<ConservationActionRow>> {
    require_id(project_id, "project IUCN conservation actions")?;
    Ok(repository.iucn_conservation_actions(project_id).await?)
}

pub async fn stakeholder_partnerships(
    repository: &dyn EmlRepository,
    project_id: i64,
) -> EmlResult<Vec<StakeholderPartnershipRow>> {
    require_id(project_id, "project stakeholder partnerships")?;
    Ok(repository.stakeholder_partnerships(project_id).await?)
}
