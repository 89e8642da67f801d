//! Typed EML 2.2.0 record.
//!
//! Each struct mirrors one element of the EML vocabulary that the pipeline emits. Optional
//! sections are `Option<T>` (or an empty `Vec`): an absent section is never written, not even
//! as an empty element.
//!
//! Mapping to XML happens in one place, [`EmlDocument::to_xml_node`], and follows the field
//! order of the structs below. That order is the element order downstream partners expect.

use crate::constants::{
    ACCESS_ORDER, ACCESS_PERMISSION, ACCESS_PRINCIPAL, EML_NAMESPACE, ROOT_ELEMENT,
    SCHEMA_LOCATION, STMML_NAMESPACE, XSI_NAMESPACE,
};
use crate::xml::XmlNode;
use eml_types::NonEmptyText;

// ============================================================================
// Record types
// ============================================================================

/// Root `eml:eml` record.
#[derive(Clone, Debug, PartialEq)]
pub struct EmlDocument {
    /// `packageId` attribute, `urn:uuid:<data package uuid>`.
    pub package_id: String,
    /// `system` attribute, the provider URL.
    pub system: String,
    pub access: Access,
    pub dataset: Dataset,
    /// Rendered after `dataset`; empty when there is nothing to describe.
    pub additional_metadata: Vec<AdditionalMetadata>,
}

/// Static access policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Access {
    pub auth_system: String,
    pub order: String,
    pub allow: AccessRule,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessRule {
    pub principal: String,
    pub permission: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub id: String,
    pub system: String,
    pub title: NonEmptyText,
    pub creator: Party,
    pub metadata_provider: Party,
    /// Calendar date, `YYYY-MM-DD`.
    pub pub_date: String,
    pub language: String,
    pub intellectual_rights: String,
    pub contact: Party,
    /// The survey. EML calls it a project; the parent project sits in `related_project`.
    pub project: EmlProject,
}

/// A responsible party: either a named individual or an organisation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Party {
    Individual {
        given_name: String,
        sur_name: String,
        organization_name: String,
        electronic_mail_address: String,
    },
    Organization {
        organization_name: String,
        online_url: Option<String>,
    },
}

/// A project `personnel` entry: a party plus its role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Personnel {
    pub party: Party,
    pub role: String,
}

/// An EML `project` (or `relatedProject`) entry.
#[derive(Clone, Debug, PartialEq)]
pub struct EmlProject {
    pub id: String,
    pub system: String,
    pub title: String,
    pub personnel: Personnel,
    pub abstract_: Abstract,
    pub funding: Option<Funding>,
    pub study_area_description: StudyAreaDescription,
    pub related_project: Option<Box<EmlProject>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Abstract {
    pub sections: Vec<Section>,
}

/// A titled text section, optionally holding nested sections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// `None` renders as an empty `<para/>`.
    pub para: Option<String>,
    pub sections: Vec<Section>,
}

impl Section {
    pub fn new(title: impl Into<String>, para: Option<String>) -> Self {
        Self {
            title: title.into(),
            para,
            sections: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Funding {
    pub section: Section,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StudyAreaDescription {
    pub coverage: Coverage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Coverage {
    pub geographic: GeographicCoverage,
    pub temporal: Option<TemporalCoverage>,
    pub taxonomic: Option<TaxonomicCoverage>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeographicCoverage {
    pub geographic_description: String,
    pub bounding_coordinates: Option<BoundingCoordinates>,
    pub polygons: Vec<GPolygon>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingCoordinates {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

/// One `datasetGPolygon`, described by its outer ring.
#[derive(Clone, Debug, PartialEq)]
pub struct GPolygon {
    pub outer_ring: Vec<GRingPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GRingPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemporalCoverage {
    Range { begin: String, end: String },
    Single(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomicCoverage {
    pub classifications: Vec<TaxonomicClassification>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomicClassification {
    pub taxon_rank_name: String,
    pub taxon_rank_value: String,
    pub common_name: String,
    pub taxon_id: TaxonId,
}

/// Taxon identifier scoped to a taxonomic provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonId {
    pub provider: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdditionalMetadata {
    /// Identifier of the element this metadata describes (the project uuid).
    pub describes: String,
    pub metadata: ProjectMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectMetadata {
    ConservationActions(Vec<ConservationAction>),
    StakeholderPartnerships(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConservationAction {
    pub level_1: String,
    pub level_2: String,
    pub level_3: String,
}

// ============================================================================
// XML mapping
// ============================================================================

impl EmlDocument {
    /// Maps the record onto an ordered XML tree rooted at `eml:eml`.
    pub fn to_xml_node(&self) -> XmlNode {
        XmlNode::new(ROOT_ELEMENT)
            .attr("packageId", &self.package_id)
            .attr("system", &self.system)
            .attr("xmlns:eml", EML_NAMESPACE)
            .attr("xmlns:xsi", XSI_NAMESPACE)
            .attr("xmlns:stmml", STMML_NAMESPACE)
            .attr("xsi:schemaLocation", SCHEMA_LOCATION)
            .child(self.access.to_xml_node())
            .child(self.dataset.to_xml_node())
            .children(self.additional_metadata.iter().map(AdditionalMetadata::to_xml_node))
    }
}

impl Access {
    /// The fixed public-read policy under the given authentication system.
    pub fn public_read(auth_system: impl Into<String>) -> Self {
        Self {
            auth_system: auth_system.into(),
            order: ACCESS_ORDER.to_string(),
            allow: AccessRule {
                principal: ACCESS_PRINCIPAL.to_string(),
                permission: ACCESS_PERMISSION.to_string(),
            },
        }
    }

    fn to_xml_node(&self) -> XmlNode {
        XmlNode::new("access")
            .attr("authSystem", &self.auth_system)
            .attr("order", &self.order)
            .child(
                XmlNode::new("allow")
                    .child(XmlNode::leaf("principal", &self.allow.principal))
                    .child(XmlNode::leaf("permission", &self.allow.permission)),
            )
    }
}

impl Dataset {
    fn to_xml_node(&self) -> XmlNode {
        XmlNode::new("dataset")
            .attr("id", &self.id)
            .attr("system", &self.system)
            .child(XmlNode::leaf("title", self.title.as_str()))
            .child(self.creator.to_xml_node("creator"))
            .child(self.metadata_provider.to_xml_node("metadataProvider"))
            .child(XmlNode::leaf("pubDate", &self.pub_date))
            .child(XmlNode::leaf("language", &self.language))
            .child(
                XmlNode::new("intellectualRights")
                    .child(XmlNode::leaf("para", &self.intellectual_rights)),
            )
            .child(self.contact.to_xml_node("contact"))
            .child(self.project.to_xml_node("project"))
    }
}

impl Party {
    /// Organisational identity with a URL.
    pub fn organization(name: impl Into<String>, online_url: Option<String>) -> Self {
        Party::Organization {
            organization_name: name.into(),
            online_url,
        }
    }

    fn to_xml_node(&self, element: &str) -> XmlNode {
        self.append_to(XmlNode::new(element))
    }

    fn append_to(&self, node: XmlNode) -> XmlNode {
        match self {
            Party::Individual {
                given_name,
                sur_name,
                organization_name,
                electronic_mail_address,
            } => node
                .child(
                    XmlNode::new("individualName")
                        .child(XmlNode::leaf("givenName", given_name))
                        .child(XmlNode::leaf("surName", sur_name)),
                )
                .child(XmlNode::leaf("organizationName", organization_name))
                .child(XmlNode::leaf("electronicMailAddress", electronic_mail_address)),
            Party::Organization {
                organization_name,
                online_url,
            } => node
                .child(XmlNode::leaf("organizationName", organization_name))
                .optional_child(online_url.as_ref().map(|url| XmlNode::leaf("onlineUrl", url))),
        }
    }
}

impl Personnel {
    fn to_xml_node(&self) -> XmlNode {
        self.party
            .append_to(XmlNode::new("personnel"))
            .child(XmlNode::leaf("role", &self.role))
    }
}

impl EmlProject {
    fn to_xml_node(&self, element: &str) -> XmlNode {
        XmlNode::new(element)
            .attr("id", &self.id)
            .attr("system", &self.system)
            .child(XmlNode::leaf("title", &self.title))
            .child(self.personnel.to_xml_node())
            .child(
                XmlNode::new("abstract")
                    .children(self.abstract_.sections.iter().map(Section::to_xml_node)),
            )
            .optional_child(
                self.funding
                    .as_ref()
                    .map(|funding| XmlNode::new("funding").child(funding.section.to_xml_node())),
            )
            .child(self.study_area_description.to_xml_node())
            .optional_child(
                self.related_project
                    .as_ref()
                    .map(|related| related.to_xml_node("relatedProject")),
            )
    }
}

impl Section {
    fn to_xml_node(&self) -> XmlNode {
        XmlNode::new("section")
            .child(XmlNode::leaf("title", &self.title))
            .child(XmlNode::leaf("para", self.para.as_deref().unwrap_or_default()))
            .children(self.sections.iter().map(Section::to_xml_node))
    }
}

impl StudyAreaDescription {
    fn to_xml_node(&self) -> XmlNode {
        let coverage = &self.coverage;
        XmlNode::new("studyAreaDescription").child(
            XmlNode::new("coverage")
                .child(coverage.geographic.to_xml_node())
                .optional_child(coverage.temporal.as_ref().map(TemporalCoverage::to_xml_node))
                .optional_child(coverage.taxonomic.as_ref().map(TaxonomicCoverage::to_xml_node)),
        )
    }
}

impl GeographicCoverage {
    fn to_xml_node(&self) -> XmlNode {
        XmlNode::new("geographicCoverage")
            .child(XmlNode::leaf(
                "geographicDescription",
                &self.geographic_description,
            ))
            .optional_child(self.bounding_coordinates.map(|bounds| {
                XmlNode::new("boundingCoordinates")
                    .child(XmlNode::leaf("westBoundingCoordinate", bounds.west.to_string()))
                    .child(XmlNode::leaf("eastBoundingCoordinate", bounds.east.to_string()))
                    .child(XmlNode::leaf("northBoundingCoordinate", bounds.north.to_string()))
                    .child(XmlNode::leaf("southBoundingCoordinate", bounds.south.to_string()))
            }))
            .children(self.polygons.iter().map(|polygon| {
                XmlNode::new("datasetGPolygon").child(
                    XmlNode::new("datasetGPolygonOuterGRing").children(
                        polygon.outer_ring.iter().map(|point| {
                            XmlNode::new("gRingPoint")
                                .child(XmlNode::leaf("gRingLatitude", point.latitude.to_string()))
                                .child(XmlNode::leaf(
                                    "gRingLongitude",
                                    point.longitude.to_string(),
                                ))
                        }),
                    ),
                )
            }))
    }
}

impl TemporalCoverage {
    fn to_xml_node(&self) -> XmlNode {
        let inner = match self {
            TemporalCoverage::Range { begin, end } => XmlNode::new("rangeOfDates")
                .child(XmlNode::new("beginDate").child(XmlNode::leaf("calendarDate", begin)))
                .child(XmlNode::new("endDate").child(XmlNode::leaf("calendarDate", end))),
            TemporalCoverage::Single(date) => {
                XmlNode::new("singleDateTime").child(XmlNode::leaf("calendarDate", date))
            }
        };
        XmlNode::new("temporalCoverage").child(inner)
    }
}

impl TaxonomicCoverage {
    fn to_xml_node(&self) -> XmlNode {
        XmlNode::new("taxonomicCoverage").children(self.classifications.iter().map(|taxon| {
            XmlNode::new("taxonomicClassification")
                .child(XmlNode::leaf("taxonRankName", &taxon.taxon_rank_name))
                .child(XmlNode::leaf("taxonRankValue", &taxon.taxon_rank_value))
                .child(XmlNode::leaf("commonName", &taxon.common_name))
                .child(
                    XmlNode::leaf("taxonId", &taxon.taxon_id.value)
                        .attr("provider", &taxon.taxon_id.provider),
                )
        }))
    }
}

impl AdditionalMetadata {
    fn to_xml_node(&self) -> XmlNode {
        let metadata = match &self.metadata {
            ProjectMetadata::ConservationActions(actions) => XmlNode::new("IUCNConservationActions")
                .children(actions.iter().map(|action| {
                    XmlNode::new("IUCNConservationAction")
                        .child(XmlNode::leaf(
                            "IUCNConservationActionLevel1Classification",
                            &action.level_1,
                        ))
                        .child(XmlNode::leaf(
                            "IUCNConservationActionLevel2SubclassClassification",
                            &action.level_2,
                        ))
                        .child(XmlNode::leaf(
                            "IUCNConservationActionLevel3SubclassClassification",
                            &action.level_3,
                        ))
                })),
            ProjectMetadata::StakeholderPartnerships(names) => {
                XmlNode::new("stakeholderPartnerships").children(names.iter().map(|name| {
                    XmlNode::new("stakeholderPartnership").child(XmlNode::leaf("name", name))
                }))
            }
        };

        XmlNode::new("additionalMetadata")
            .child(XmlNode::leaf("describes", &self.describes))
            .child(XmlNode::new("metadata").child(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderOptions, XmlWriter};

    fn compact(node: &XmlNode) -> String {
        XmlWriter::new(RenderOptions::compact())
            .expect("valid options")
            .render(node)
            .expect("render")
    }

    fn survey_project(funding: Option<Funding>) -> EmlProject {
        EmlProject {
            id: "s-uuid".into(),
            system: "https://provider.example".into(),
            title: "Moose Survey".into(),
            personnel: Personnel {
                party: Party::organization("Biohub Org", Some("https://org.example".into())),
                role: "pointOfContact".into(),
            },
            abstract_: Abstract {
                sections: vec![Section::new("Objectives", Some("Count moose".into()))],
            },
            funding,
            study_area_description: StudyAreaDescription {
                coverage: Coverage {
                    geographic: GeographicCoverage {
                        geographic_description: "Lake".into(),
                        bounding_coordinates: None,
                        polygons: vec![],
                    },
                    temporal: None,
                    taxonomic: None,
                },
            },
            related_project: None,
        }
    }

    #[test]
    fn absent_funding_writes_no_element() {
        let xml = compact(&survey_project(None).to_xml_node("project"));
        assert!(!xml.contains("<funding"));
        assert!(xml.contains(
            "<abstract><section><title>Objectives</title><para>Count moose</para></section></abstract>"
        ));
    }

    #[test]
    fn present_funding_writes_nested_sections() {
        let funding = Funding {
            section: Section::new("Funding Source", Some("Grant A".into())).with_sections(vec![
                Section::new("Investment Action Category", Some("Action 1".into())),
            ]),
        };
        let xml = compact(&survey_project(Some(funding)).to_xml_node("project"));
        assert!(xml.contains(
            "<funding><section><title>Funding Source</title><para>Grant A</para><section><title>Investment Action Category</title><para>Action 1</para></section></section></funding>"
        ));
    }

    #[test]
    fn individual_personnel_writes_name_then_role() {
        let personnel = Personnel {
            party: Party::Individual {
                given_name: "Jane".into(),
                sur_name: "Doe".into(),
                organization_name: "Agency".into(),
                electronic_mail_address: "j@x.org".into(),
            },
            role: "pointOfContact".into(),
        };
        assert_eq!(
            compact(&personnel.to_xml_node()),
            "<personnel><individualName><givenName>Jane</givenName><surName>Doe</surName></individualName><organizationName>Agency</organizationName><electronicMailAddress>j@x.org</electronicMailAddress><role>pointOfContact</role></personnel>"
        );
    }

    #[test]
    fn taxon_id_carries_provider_attribute() {
        let coverage = TaxonomicCoverage {
            classifications: vec![TaxonomicClassification {
                taxon_rank_name: "Species".into(),
                taxon_rank_value: "Alces alces".into(),
                common_name: "Moose".into(),
                taxon_id: TaxonId {
                    provider: "https://taxa.example".into(),
                    value: "M-ALAL".into(),
                },
            }],
        };
        assert_eq!(
            compact(&coverage.to_xml_node()),
            r#"<taxonomicCoverage><taxonomicClassification><taxonRankName>Species</taxonRankName><taxonRankValue>Alces alces</taxonRankValue><commonName>Moose</commonName><taxonId provider="https://taxa.example">M-ALAL</taxonId></taxonomicClassification></taxonomicCoverage>"#
        );
    }

    #[test]
    fn temporal_coverage_single_date() {
        assert_eq!(
            compact(&TemporalCoverage::Single("2021-01-01".into()).to_xml_node()),
            "<temporalCoverage><singleDateTime><calendarDate>2021-01-01</calendarDate></singleDateTime></temporalCoverage>"
        );
    }

    #[test]
    fn bounding_coordinates_render_shortest_decimal() {
        let coverage = GeographicCoverage {
            geographic_description: "Area".into(),
            bounding_coordinates: Some(BoundingCoordinates {
                west: -120.0,
                east: 49.25,
                north: -121.5,
                south: 48.0,
            }),
            polygons: vec![],
        };
        assert_eq!(
            compact(&coverage.to_xml_node()),
            "<geographicCoverage><geographicDescription>Area</geographicDescription><boundingCoordinates><westBoundingCoordinate>-120</westBoundingCoordinate><eastBoundingCoordinate>49.25</eastBoundingCoordinate><northBoundingCoordinate>-121.5</northBoundingCoordinate><southBoundingCoordinate>48</southBoundingCoordinate></boundingCoordinates></geographicCoverage>"
        );
    }
}
