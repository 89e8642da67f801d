//! EML document assembly.
//!
//! Assembly runs in two phases followed by a pure transform:
//!
//! 1. [`resolve_context`]: the sequential chain data package → occurrence submission → publish
//!    status → survey → project. Each lookup needs an identifier produced by the one before.
//! 2. [`gather_related`]: every remaining lookup plus the system constants. These have no data
//!    dependency on each other and are awaited together; the first failure aborts the run.
//! 3. [`assemble`]: builds the [`EmlDocument`] from the gathered inputs. No I/O.
//!
//! Element order inside the document follows the order of the builder calls in this module.

use crate::constants::{
    CAVEATS_TITLE, COMMENTS_TITLE, OBJECTIVES_TITLE, PROJECT_NOT_FOUND, PUBLISH_STATUS_NOT_FOUND,
    SURVEY_NOT_FOUND,
};
use crate::coverage::{build_geographic_coverage, geographic_description};
use crate::error::{EmlError, EmlResult};
use crate::fetch;
use crate::funding::build_funding;
use crate::repository::{
    BoundingBoxRow, ConservationActionRow, DataPackageRow, EmlRepository, FundingSourceRow,
    OccurrenceSubmissionRow, PolygonRow, ProjectRow, StakeholderPartnershipRow, SurveyRow,
    TaxonomicCoverageRow,
};
use crate::resolver::{ConstantResolver, SystemConstants};
use chrono::SecondsFormat;
use eml::constants::{LANGUAGE, PACKAGE_ID_PREFIX, PERSONNEL_ROLE};
use eml::{
    Abstract, Access, AdditionalMetadata, ConservationAction, Coverage, Dataset, EmlDocument,
    EmlProject, Party, Personnel, ProjectMetadata, Section, StudyAreaDescription, TaxonId,
    TaxonomicClassification, TaxonomicCoverage, TemporalCoverage,
};
use eml_types::{calendar_date, DataPackageId, NonEmptyText};

// ============================================================================
// Inputs
// ============================================================================

/// Records resolved by the sequential phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageContext {
    pub data_package: DataPackageRow,
    pub occurrence_submission: OccurrenceSubmissionRow,
    /// Publish date, `YYYY-MM-DD`.
    pub pub_date: String,
    pub survey: SurveyRow,
    pub project: ProjectRow,
}

/// Records gathered by the fan-out phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelatedRecords {
    pub survey_funding: Vec<FundingSourceRow>,
    pub project_funding: Vec<FundingSourceRow>,
    pub survey_bounding_box: Option<BoundingBoxRow>,
    pub survey_polygons: Vec<PolygonRow>,
    pub project_bounding_box: Option<BoundingBoxRow>,
    pub project_polygons: Vec<PolygonRow>,
    pub taxonomic_coverage: Vec<TaxonomicCoverageRow>,
    pub conservation_actions: Vec<ConservationActionRow>,
    pub stakeholder_partnerships: Vec<StakeholderPartnershipRow>,
}

/// Everything [`assemble`] needs.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyInputs {
    pub context: PackageContext,
    pub related: RelatedRecords,
    pub constants: SystemConstants,
}

// ============================================================================
// Phase 1: sequential resolution
// ============================================================================

pub async fn resolve_context(
    repository: &dyn EmlRepository,
    data_package_id: DataPackageId,
) -> EmlResult<PackageContext> {
    let data_package = fetch::data_package(repository, data_package_id.get()).await?;
    let occurrence_submission =
        fetch::occurrence_submission(repository, data_package_id.get()).await?;

    let event_timestamp =
        fetch::publish_status(repository, occurrence_submission.occurrence_submission_id)
            .await?
            .and_then(|status| status.event_timestamp)
            .ok_or_else(|| EmlError::NotFound(PUBLISH_STATUS_NOT_FOUND.into()))?;
    let pub_date =
        calendar_date(&event_timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)).to_string();

    let survey = fetch::survey(repository, occurrence_submission.survey_id)
        .await?
        .ok_or_else(|| EmlError::NotFound(SURVEY_NOT_FOUND.into()))?;
    let project = fetch::project(repository, survey.project_id)
        .await?
        .ok_or_else(|| EmlError::NotFound(PROJECT_NOT_FOUND.into()))?;

    tracing::debug!(
        survey_id = survey.survey_id,
        project_id = project.project_id,
        "resolved package context"
    );

    Ok(PackageContext {
        data_package,
        occurrence_submission,
        pub_date,
        survey,
        project,
    })
}

// ============================================================================
// Phase 2: fan-out / fan-in
// ============================================================================

pub async fn gather_related(
    repository: &dyn EmlRepository,
    context: &PackageContext,
) -> EmlResult<(RelatedRecords, SystemConstants)> {
    let survey_id = context.survey.survey_id;
    let project_id = context.project.project_id;
    let resolver = ConstantResolver::new(repository);

    let (
        survey_funding,
        project_funding,
        survey_bounding_box,
        survey_polygons,
        project_bounding_box,
        project_polygons,
        taxonomic_coverage,
        conservation_actions,
        stakeholder_partnerships,
        constants,
    ) = tokio::try_join!(
        fetch::survey_funding_sources(repository, survey_id),
        // Project funding is looked up by the survey id.
        fetch::project_funding_sources(repository, survey_id),
        fetch::survey_bounding_box(repository, survey_id),
        fetch::survey_polygons(repository, survey_id),
        fetch::project_bounding_box(repository, project_id),
        fetch::project_polygons(repository, project_id),
        fetch::focal_taxonomic_coverage(repository, survey_id),
        fetch::iucn_conservation_actions(repository, project_id),
        fetch::stakeholder_partnerships(repository, project_id),
        async { Ok::<_, EmlError>(resolver.resolve_all().await) },
    )?;

    Ok((
        RelatedRecords {
            survey_funding,
            project_funding,
            survey_bounding_box,
            survey_polygons,
            project_bounding_box,
            project_polygons,
            taxonomic_coverage,
            conservation_actions,
            stakeholder_partnerships,
        },
        constants,
    ))
}

/// Runs both phases and returns the assembly inputs.
pub async fn collect_inputs(
    repository: &dyn EmlRepository,
    data_package_id: DataPackageId,
) -> EmlResult<AssemblyInputs> {
    let context = resolve_context(repository, data_package_id).await?;
    let (related, constants) = gather_related(repository, &context).await?;
    Ok(AssemblyInputs {
        context,
        related,
        constants,
    })
}

// ============================================================================
// Assembly
// ============================================================================

/// Builds the EML record. `supplied_title` wins over the data package uuid when non-blank.
pub fn assemble(
    inputs: &AssemblyInputs,
    supplied_title: Option<&str>,
) -> EmlResult<EmlDocument> {
    let AssemblyInputs {
        context,
        related,
        constants,
    } = inputs;
    let package_uuid = context.data_package.uuid.to_string();

    let title = match NonEmptyText::from_optional(supplied_title) {
        Some(title) => title,
        None => NonEmptyText::new(&package_uuid)
            .map_err(|e| EmlError::InvalidInput(format!("dataset title: {e}")))?,
    };

    let mut survey_project = survey_project(context, related, constants);
    survey_project.related_project = Some(Box::new(parent_project(context, related, constants)));

    Ok(EmlDocument {
        package_id: format!("{PACKAGE_ID_PREFIX}{package_uuid}"),
        system: constants.provider_url.clone(),
        access: Access::public_read(&constants.security_provider_url),
        dataset: Dataset {
            id: package_uuid,
            system: constants.provider_url.clone(),
            title,
            creator: Party::organization(&constants.organization_name_full, None),
            metadata_provider: organisation_identity(constants),
            pub_date: context.pub_date.clone(),
            language: LANGUAGE.to_string(),
            intellectual_rights: constants.intellectual_rights.clone(),
            contact: contact(&context.project, constants),
            project: survey_project,
        },
        additional_metadata: additional_metadata(&context.project, related),
    })
}

fn organisation_identity(constants: &SystemConstants) -> Party {
    Party::organization(
        &constants.organization_name_full,
        Some(constants.organization_url.clone()),
    )
}

/// Coordinator identity when the project allows it, otherwise the organisation's.
fn visible_party(
    project: &ProjectRow,
    constants: &SystemConstants,
    given_name: &str,
    sur_name: &str,
) -> Party {
    if !project.coordinator_public {
        return organisation_identity(constants);
    }
    Party::Individual {
        given_name: given_name.to_string(),
        sur_name: sur_name.to_string(),
        organization_name: project.coordinator_agency_name.clone(),
        electronic_mail_address: project.coordinator_email_address.clone(),
    }
}

fn contact(project: &ProjectRow, constants: &SystemConstants) -> Party {
    visible_party(
        project,
        constants,
        &project.coordinator_first_name,
        &project.coordinator_last_name,
    )
}

fn personnel(party: Party) -> Personnel {
    Personnel {
        party,
        role: PERSONNEL_ROLE.to_string(),
    }
}

/// The survey, rendered as the dataset's `project`.
fn survey_project(
    context: &PackageContext,
    related: &RelatedRecords,
    constants: &SystemConstants,
) -> EmlProject {
    let survey = &context.survey;
    let project = &context.project;

    let temporal = match survey.end_date.as_deref() {
        Some(end) => TemporalCoverage::Range {
            begin: calendar_date(&survey.start_date).to_string(),
            end: calendar_date(end).to_string(),
        },
        None => TemporalCoverage::Single(calendar_date(&survey.start_date).to_string()),
    };

    EmlProject {
        id: survey.uuid.to_string(),
        system: constants.provider_url.clone(),
        title: survey.name.clone(),
        personnel: personnel(visible_party(
            project,
            constants,
            &survey.lead_first_name,
            &survey.lead_last_name,
        )),
        abstract_: Abstract {
            sections: vec![Section::new(OBJECTIVES_TITLE, survey.objectives.clone())],
        },
        funding: build_funding(&related.survey_funding),
        study_area_description: StudyAreaDescription {
            coverage: Coverage {
                geographic: build_geographic_coverage(
                    geographic_description(
                        &survey.location_name,
                        survey.location_description.as_deref(),
                    ),
                    related.survey_bounding_box.as_ref(),
                    &related.survey_polygons,
                ),
                temporal: Some(temporal),
                taxonomic: taxonomic_coverage(
                    &related.taxonomic_coverage,
                    &constants.taxonomic_provider_url,
                ),
            },
        },
        related_project: None,
    }
}

/// The parent project, rendered as the survey's `relatedProject`.
fn parent_project(
    context: &PackageContext,
    related: &RelatedRecords,
    constants: &SystemConstants,
) -> EmlProject {
    let project = &context.project;

    EmlProject {
        id: project.uuid.to_string(),
        system: constants.provider_url.clone(),
        title: project.name.clone(),
        personnel: personnel(contact(project, constants)),
        abstract_: Abstract {
            sections: vec![
                Section::new(OBJECTIVES_TITLE, project.objectives.clone()),
                Section::new(CAVEATS_TITLE, project.caveats.clone()),
                Section::new(COMMENTS_TITLE, project.comments.clone()),
            ],
        },
        funding: build_funding(&related.project_funding),
        study_area_description: StudyAreaDescription {
            coverage: Coverage {
                geographic: build_geographic_coverage(
                    geographic_description(
                        &project.location_name,
                        project.location_description.as_deref(),
                    ),
                    related.project_bounding_box.as_ref(),
                    &related.project_polygons,
                ),
                temporal: None,
                taxonomic: None,
            },
        },
        related_project: None,
    }
}

fn taxonomic_coverage(
    rows: &[TaxonomicCoverageRow],
    provider_url: &str,
) -> Option<TaxonomicCoverage> {
    if rows.is_empty() {
        return None;
    }
    Some(TaxonomicCoverage {
        classifications: rows
            .iter()
            .map(|row| TaxonomicClassification {
                taxon_rank_name: row.taxon_rank_name.clone(),
                taxon_rank_value: format!("{} {}", row.unit_name1, row.unit_name2),
                common_name: row.english_name.clone(),
                taxon_id: TaxonId {
                    provider: provider_url.to_string(),
                    value: row.code.clone(),
                },
            })
            .collect(),
    })
}

fn additional_metadata(project: &ProjectRow, related: &RelatedRecords) -> Vec<AdditionalMetadata> {
    let actions = &related.conservation_actions;
    let partnerships = &related.stakeholder_partnerships;

    if actions.len() | partnerships.len() == 0 {
        return Vec::new();
    }

    let describes = project.uuid.to_string();
    let mut entries = Vec::new();

    if !actions.is_empty() {
        entries.push(AdditionalMetadata {
            describes: describes.clone(),
            metadata: ProjectMetadata::ConservationActions(
                actions
                    .iter()
                    .map(|row| ConservationAction {
                        level_1: row.level_1_name.clone(),
                        level_2: row.level_2_name.clone(),
                        level_3: row.level_3_name.clone(),
                    })
                    .collect(),
            ),
        });
    }

    if !partnerships.is_empty() {
        entries.push(AdditionalMetadata {
            describes,
            metadata: ProjectMetadata::StakeholderPartnerships(
                partnerships.iter().map(|row| row.name.clone()).collect(),
            ),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotStore;
    use crate::test_support::{fixture_snapshot, package_id, FailingRepository};

    async fn inputs(store: &SnapshotStore) -> AssemblyInputs {
        collect_inputs(store, package_id(1))
            .await
            .expect("collect inputs")
    }

    #[tokio::test]
    async fn publish_date_is_truncated_utc_day() {
        let store = SnapshotStore::from_snapshot(fixture_snapshot());
        let context = resolve_context(&store, package_id(1))
            .await
            .expect("resolve context");
        assert_eq!(context.pub_date, "2023-03-14");
    }

    #[tokio::test]
    async fn unpublished_submission_is_not_found() {
        let mut snapshot = fixture_snapshot();
        snapshot.occurrence_submissions[0].publish_events.clear();
        let store = SnapshotStore::from_snapshot(snapshot);

        let err = resolve_context(&store, package_id(1))
            .await
            .expect_err("unpublished submission");
        assert!(matches!(err, EmlError::NotFound(msg) if msg == PUBLISH_STATUS_NOT_FOUND));
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let mut snapshot = fixture_snapshot();
        snapshot.projects.clear();
        let store = SnapshotStore::from_snapshot(snapshot);

        let err = resolve_context(&store, package_id(1))
            .await
            .expect_err("missing project");
        assert!(matches!(err, EmlError::NotFound(msg) if msg == PROJECT_NOT_FOUND));
    }

    #[tokio::test]
    async fn upstream_failure_aborts_fan_out() {
        let store = SnapshotStore::from_snapshot(fixture_snapshot());
        let context = resolve_context(&store, package_id(1))
            .await
            .expect("resolve context");

        let err = gather_related(&FailingRepository, &context)
            .await
            .expect_err("fan-out fails");
        assert!(matches!(err, EmlError::Upstream(_)));
    }

    #[tokio::test]
    async fn supplied_title_wins_and_blank_falls_back_to_uuid() {
        let store = SnapshotStore::from_snapshot(fixture_snapshot());
        let inputs = inputs(&store).await;

        let titled = assemble(&inputs, Some("  Moose 2021  ")).expect("assemble");
        assert_eq!(titled.dataset.title.as_str(), "Moose 2021");

        let untitled = assemble(&inputs, Some("   ")).expect("assemble");
        assert_eq!(
            untitled.dataset.title.as_str(),
            inputs.context.data_package.uuid.to_string()
        );
        let fallback = assemble(&inputs, None).expect("assemble");
        assert_eq!(fallback.dataset.title, untitled.dataset.title);
    }

    #[tokio::test]
    async fn private_coordinator_never_appears() {
        let mut snapshot = fixture_snapshot();
        snapshot.projects[0].project.coordinator_public = false;
        let store = SnapshotStore::from_snapshot(snapshot);
        let document = assemble(&inputs(&store).await, None).expect("assemble");

        let dataset = &document.dataset;
        let related = dataset
            .project
            .related_project
            .as_ref()
            .expect("related project");
        for party in [
            &dataset.contact,
            &dataset.project.personnel.party,
            &related.personnel.party,
        ] {
            assert_eq!(
                party,
                &Party::organization(
                    "Biohub Organization",
                    Some("https://biohub.example".into())
                )
            );
        }
    }

    #[tokio::test]
    async fn public_coordinator_names_lead_on_survey_and_coordinator_on_project() {
        let store = SnapshotStore::from_snapshot(fixture_snapshot());
        let document = assemble(&inputs(&store).await, None).expect("assemble");

        let Party::Individual {
            given_name,
            electronic_mail_address,
            ..
        } = &document.dataset.project.personnel.party
        else {
            panic!("expected individual survey personnel");
        };
        assert_eq!(given_name, "Lee");
        assert_eq!(electronic_mail_address, "j@x.org");

        let Party::Individual { given_name, .. } = &document.dataset.contact else {
            panic!("expected individual contact");
        };
        assert_eq!(given_name, "Jane");
    }

    #[tokio::test]
    async fn additional_metadata_only_for_non_empty_sources() {
        let mut snapshot = fixture_snapshot();
        snapshot.projects[0].iucn_conservation_actions.clear();
        let store = SnapshotStore::from_snapshot(snapshot.clone());
        let document = assemble(&inputs(&store).await, None).expect("assemble");
        assert_eq!(document.additional_metadata.len(), 1);
        assert!(matches!(
            &document.additional_metadata[0].metadata,
            ProjectMetadata::StakeholderPartnerships(names) if names == &["Moose Society"]
        ));

        snapshot.projects[0].stakeholder_partnerships.clear();
        let store = SnapshotStore::from_snapshot(snapshot);
        let document = assemble(&inputs(&store).await, None).expect("assemble");
        assert!(document.additional_metadata.is_empty());
    }

    #[tokio::test]
    async fn project_funding_follows_survey_identifier() {
        let mut snapshot = fixture_snapshot();
        // Move the project to an id that differs from the survey id.
        snapshot.projects[0].project.project_id = 7;
        snapshot.surveys[0].survey.project_id = 7;
        let store = SnapshotStore::from_snapshot(snapshot);
        let inputs = inputs(&store).await;

        assert!(inputs.related.project_funding.is_empty());
        let document = assemble(&inputs, None).expect("assemble");
        let related = document
            .dataset
            .project
            .related_project
            .expect("related project");
        assert!(related.funding.is_none());
    }

    #[tokio::test]
    async fn taxonomic_coverage_omitted_without_focal_taxa() {
        let mut snapshot = fixture_snapshot();
        snapshot.surveys[0].focal_taxa.clear();
        let store = SnapshotStore::from_snapshot(snapshot);
        let document = assemble(&inputs(&store).await, None).expect("assemble");
        assert!(document
            .dataset
            .project
            .study_area_description
            .coverage
            .taxonomic
            .is_none());
    }
}
