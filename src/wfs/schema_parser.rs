use super::xml_reader::{walk_document, XmlNode};
use crate::constants::*;
use crate::errors::{AppError, AppResult};
use tracing::{debug, warn};

// Depths below the `schema` root:
// complexType / complexContent / extension / sequence / element
const COMPLEX_TYPE_DEPTH: usize = 1;
const SEQUENCE_DEPTH: usize = 4;
const ELEMENT_DEPTH: usize = 5;

// What GeoServer emits at the two wildcard levels
const EXPECTED_CONTENT_LEVELS: [&str; 2] = ["complexContent", "extension"];

/// Parses a WFS `DescribeFeatureType` response (an XSD document) into the attribute
/// names of `type_name`, in document order.
///
/// The feature type is looked up as the top-level `complexType` named
/// `"{type_name}Type"`, and attributes are the `element` children of the `sequence`
/// found two levels below it. This is the shape GeoServer generates; other servers
/// may nest their schemas differently.
///
/// # Errors
///
/// - `MalformedDocument` if `content` is not well-formed XML.
/// - `AttributeMissing` if a matched `element` has no `name` attribute.
///
/// A schema without the requested complex type yields an empty vector.
pub fn parse_schema(content: &[u8], type_name: &str) -> AppResult<Vec<String>> {
    let target = format!("{type_name}{SCHEMA_TYPE_SUFFIX}");
    let mut attributes = Vec::new();
    let mut ancestors: Vec<String> = Vec::new();
    let mut inside_target = false;

    walk_document(content, |node| {
        match node {
            XmlNode::Open(element) => {
                if element.depth == COMPLEX_TYPE_DEPTH {
                    inside_target = element.name == COMPLEX_TYPE_ELEMENT
                        && element.attribute(NAME_ATTRIBUTE) == Some(target.as_str());
                }

                if inside_target {
                    if element.depth == SEQUENCE_DEPTH
                        && element.name == SEQUENCE_ELEMENT
                        && !has_expected_content_levels(&ancestors)
                    {
                        warn!(
                            complex_type = target.as_str(),
                            found = ancestors[COMPLEX_TYPE_DEPTH + 1..].join("/").as_str(),
                            expected = EXPECTED_CONTENT_LEVELS.join("/").as_str(),
                            "Unexpected schema nesting; attribute names may be unreliable"
                        );
                    }

                    if element.depth == ELEMENT_DEPTH
                        && element.name == SCHEMA_ELEMENT
                        && ancestors[SEQUENCE_DEPTH] == SEQUENCE_ELEMENT
                    {
                        let name = element.attribute(NAME_ATTRIBUTE).ok_or_else(|| {
                            AppError::AttributeMissing {
                                element: format!("{target}/{SCHEMA_ELEMENT}"),
                                attribute: NAME_ATTRIBUTE.to_string(),
                            }
                        })?;
                        attributes.push(name.to_string());
                    }
                }

                ancestors.push(element.name.clone());
            }
            XmlNode::Close { depth } => {
                ancestors.truncate(depth);
                if depth == COMPLEX_TYPE_DEPTH {
                    inside_target = false;
                }
            }
            XmlNode::Text { .. } => {}
        }
        Ok(())
    })?;

    debug!(
        complex_type = target.as_str(),
        attributes = attributes.len(),
        "Parsed DescribeFeatureType response"
    );
    Ok(attributes)
}

/// Whether the levels between `complexType` and `sequence` are the
/// `complexContent/extension` pair GeoServer generates.
fn has_expected_content_levels(ancestors: &[String]) -> bool {
    ancestors
        .get(COMPLEX_TYPE_DEPTH + 1..SEQUENCE_DEPTH)
        .is_some_and(|found| found == &EXPECTED_CONTENT_LEVELS[..])
}
