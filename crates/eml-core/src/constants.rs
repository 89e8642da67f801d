//! Constants used throughout the EML core crate.
//!
//! System-constant names, fallback values, section titles and error messages live here so
//! the assembler and its tests agree on the exact literals.

/// Value substituted for any system constant that is absent at read time.
pub const NOT_SUPPLIED: &str = "Not Supplied";

/// System constant: provider URL, used as the `system` of every identified element.
pub const PROVIDER_URL: &str = "PROVIDER_URL";

/// System constant: authentication system for the access block.
pub const SECURITY_PROVIDER_URL: &str = "SECURITY_PROVIDER_URL";

/// System constant: full organisation name.
pub const ORGANIZATION_NAME_FULL: &str = "ORGANIZATION_NAME_FULL";

/// System constant: organisation URL.
pub const ORGANIZATION_URL: &str = "ORGANIZATION_URL";

/// System constant: intellectual-rights statement.
pub const INTELLECTUAL_RIGHTS: &str = "INTELLECTUAL_RIGHTS";

/// System constant: provider URL attached to every taxon identifier.
pub const TAXONOMIC_PROVIDER_URL: &str = "TAXONOMIC_PROVIDER_URL";

/// Every system constant the assembler reads, in resolution order.
pub const SYSTEM_CONSTANT_NAMES: [&str; 6] = [
    PROVIDER_URL,
    SECURITY_PROVIDER_URL,
    ORGANIZATION_NAME_FULL,
    ORGANIZATION_URL,
    INTELLECTUAL_RIGHTS,
    TAXONOMIC_PROVIDER_URL,
];

/// Separator between a location name and its description.
pub const LOCATION_DESCRIPTION_SEPARATOR: &str = " - ";

/// Abstract section titles.
pub const OBJECTIVES_TITLE: &str = "Objectives";
pub const CAVEATS_TITLE: &str = "Caveats";
pub const COMMENTS_TITLE: &str = "Comments";

/// Funding section titles, outermost first.
pub const FUNDING_SOURCE_TITLE: &str = "Funding Source";
pub const INVESTMENT_ACTION_CATEGORY_TITLE: &str = "Investment Action Category";
pub const FUNDING_SOURCE_PROJECT_ID_TITLE: &str = "Funding Source Project ID";
pub const FUNDING_AMOUNT_TITLE: &str = "Funding Amount";
pub const FUNDING_START_DATE_TITLE: &str = "Funding Start Date";
pub const FUNDING_END_DATE_TITLE: &str = "Funding End Date";

/// Snapshot file looked up in the working directory when no path is configured.
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "eml-snapshot.yaml";

pub const MISSING_DATA_PACKAGE_ID: &str = "Missing required body param data_package_id";
pub const DATA_PACKAGE_NOT_FOUND: &str = "Failed to get data package record";
pub const SUBMISSION_NOT_DISTINCT: &str =
    "Failed to acquire distinct survey occurrence submission record";
pub const PUBLISH_STATUS_NOT_FOUND: &str = "Failed to acquire published survey status record";
pub const SURVEY_NOT_FOUND: &str = "Failed to get survey record";
pub const PROJECT_NOT_FOUND: &str = "Failed to get project record";
