//! EML wire/boundary support.
//!
//! This crate owns the output side of the EML pipeline:
//! - a typed model of an Ecological Metadata Language 2.2.0 record ([`document`])
//! - a small ordered XML node tree and its text writer ([`xml`])
//! - the fixed literals every record carries ([`constants`])
//!
//! It knows nothing about where record data comes from. Aggregating relational rows into an
//! [`EmlDocument`] is the job of `eml-core`.

pub mod constants;
pub mod document;
pub mod xml;

pub use document::{
    Abstract, Access, AccessRule, AdditionalMetadata, BoundingCoordinates, ConservationAction,
    Coverage, Dataset, EmlDocument, EmlProject, Funding, GPolygon, GRingPoint, GeographicCoverage,
    Party, Personnel, ProjectMetadata, Section, StudyAreaDescription, TaxonId,
    TaxonomicClassification, TaxonomicCoverage, TemporalCoverage,
};
pub use xml::{RenderOptions, XmlNode, XmlWriter};

/// Errors returned by the `eml` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum EmlWireError {
    #[error("invalid XML name: {0:?}")]
    InvalidName(String),

    #[error("invalid XML text: {0}")]
    InvalidText(String),

    #[error("invalid render options: {0}")]
    InvalidOptions(String),
}

/// Type alias for Results that can fail with an [`EmlWireError`].
pub type EmlWireResult<T> = Result<T, EmlWireError>;

/// EML rendering operations.
///
/// Zero-sized namespace for turning a typed [`EmlDocument`] into its canonical XML text.
pub struct Eml;

impl Eml {
    /// Render an EML record as XML text.
    ///
    /// # Errors
    ///
    /// Returns [`EmlWireError`] if the render options are unusable, an element/attribute name
    /// in the tree is not a valid XML name, or text holds a character XML cannot carry.
    pub fn render(document: &EmlDocument, options: &RenderOptions) -> EmlWireResult<String> {
        XmlWriter::new(options.clone())?.render(&document.to_xml_node())
    }
}
