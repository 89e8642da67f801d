//! Fixed literals carried by every EML record.

/// Prefix applied to the data package UUID to form the root `packageId`.
pub const PACKAGE_ID_PREFIX: &str = "urn:uuid:";

/// Root element name.
pub const ROOT_ELEMENT: &str = "eml:eml";

/// `xmlns:eml` namespace declaration.
pub const EML_NAMESPACE: &str = "https://eml.ecoinformatics.org/eml-2.2.0";

/// `xmlns:xsi` namespace declaration.
///
/// Downstream partners consume the stmml URI here, not the W3C instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.xml-cml.org/schema/stmml-1.1";

/// `xmlns:stmml` namespace declaration.
pub const STMML_NAMESPACE: &str = "http://www.xml-cml.org/schema/stmml-1.1";

/// `xsi:schemaLocation` value.
pub const SCHEMA_LOCATION: &str = "https://eml.ecoinformatics.org/eml-2.2.0 xsd/eml.xsd";

/// Access block evaluation order.
pub const ACCESS_ORDER: &str = "allowFirst";

/// Principal granted access.
pub const ACCESS_PRINCIPAL: &str = "public";

/// Permission granted to the principal.
pub const ACCESS_PERMISSION: &str = "read";

/// Value of `dataset/language`.
pub const LANGUAGE: &str = "english";

/// Role attached to every `personnel` entry.
pub const PERSONNEL_ROLE: &str = "pointOfContact";

/// XML declaration emitted ahead of the root element.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
