use super::xml_reader::{walk_document, XmlNode};
use crate::constants::MEMBER_ELEMENT;
use crate::errors::AppResult;
use crate::models::Row;
use tracing::debug;

// Depths below the `FeatureCollection` root
const MEMBER_DEPTH: usize = 1;
const FEATURE_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// Text collected for one attribute element of a feature.
struct FieldBuilder {
    name: String,
    text: Option<String>,
    /// Set once a child element opens; text after it is tail text, not the field value.
    has_child: bool,
}

/// Builder for the row of the feature currently being parsed.
struct FeatureBuilder {
    inside_member: bool,
    row: Option<Row>,
    field: Option<FieldBuilder>,
}

impl FeatureBuilder {
    fn new() -> Self {
        Self {
            inside_member: false,
            row: None,
            field: None,
        }
    }

    fn enter_member_level(&mut self, name: &str) {
        self.inside_member = name == MEMBER_ELEMENT;
    }

    fn leave_member_level(&mut self) {
        self.inside_member = false;
    }

    fn start_feature(&mut self) {
        if self.inside_member {
            self.row = Some(Row::new());
        }
    }

    fn start_field(&mut self, name: &str) {
        if self.row.is_some() {
            self.field = Some(FieldBuilder {
                name: name.to_string(),
                text: None,
                has_child: false,
            });
        }
    }

    fn mark_nested_element(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.has_child = true;
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(field) = self.field.as_mut() {
            if !field.has_child {
                field
                    .text
                    .get_or_insert_with(String::new)
                    .push_str(text);
            }
        }
    }

    fn finish_field(&mut self) {
        if let (Some(row), Some(field)) = (self.row.as_mut(), self.field.take()) {
            row.insert(field.name, field.text);
        }
    }

    fn finish_feature(&mut self) -> Option<Row> {
        self.field = None;
        self.row.take()
    }
}

/// Parses a WFS 2.0 `GetFeature` response into one [`Row`] per feature.
///
/// Features are the children of each `member` element directly under the root,
/// whatever their namespace. Every direct child of a feature becomes a field keyed
/// by its local name, holding the text that precedes its first child element
/// (`None` when there is none). Nested content such as GML geometries is not
/// flattened further.
///
/// # Errors
///
/// Returns `MalformedDocument` if `content` is not well-formed XML. A response
/// without `member` elements is not an error and yields an empty vector.
pub fn parse_features(content: &[u8]) -> AppResult<Vec<Row>> {
    let mut rows = Vec::new();
    let mut builder = FeatureBuilder::new();

    walk_document(content, |node| {
        match node {
            XmlNode::Open(element) => match element.depth {
                MEMBER_DEPTH => builder.enter_member_level(&element.name),
                FEATURE_DEPTH => builder.start_feature(),
                FIELD_DEPTH => builder.start_field(&element.name),
                depth if depth > FIELD_DEPTH => builder.mark_nested_element(),
                _ => {}
            },
            XmlNode::Text { text, depth } if depth == FIELD_DEPTH + 1 => {
                builder.push_text(text);
            }
            XmlNode::Close { depth } => match depth {
                FIELD_DEPTH => builder.finish_field(),
                FEATURE_DEPTH => {
                    if let Some(row) = builder.finish_feature() {
                        rows.push(row);
                    }
                }
                MEMBER_DEPTH => builder.leave_member_level(),
                _ => {}
            },
            _ => {}
        }
        Ok(())
    })?;

    debug!(rows = rows.len(), "Parsed GetFeature response");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_parse_features_one_row_per_member() {
        let xml = r#"<?xml version="1.0"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:geonode="http://www.geonode.org/">
  <wfs:member>
    <geonode:roads gml:id="roads.1" xmlns:gml="http://www.opengis.net/gml/3.2">
      <geonode:id>1</geonode:id>
      <geonode:name>Main St</geonode:name>
    </geonode:roads>
  </wfs:member>
  <wfs:member>
    <geonode:roads>
      <geonode:id>2</geonode:id>
      <geonode:name>High St</geonode:name>
    </geonode:roads>
  </wfs:member>
</wfs:FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("id"), Some("1"));
        assert_eq!(rows[0].value("name"), Some("Main St"));
        assert_eq!(rows[1].value("id"), Some("2"));
        assert_eq!(rows[1].value("name"), Some("High St"));
    }

    #[test]
    fn test_parse_features_namespace_collision_last_wins() {
        let xml = r#"<FeatureCollection xmlns:a="urn:a" xmlns:b="urn:b">
  <member><feature><a:code>x</a:code><b:code>y</b:code></feature></member>
</FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0].value("code"), Some("y"));
    }

    #[test]
    fn test_parse_features_empty_and_self_closing_have_no_text() {
        let xml = r#"<FeatureCollection>
  <member><f><a/><b></b><c> </c></f></member>
</FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert_eq!(rows[0].get("a"), Some(None));
        assert_eq!(rows[0].get("b"), Some(None));
        assert_eq!(rows[0].get("c"), Some(Some(" ")));
    }

    #[test]
    fn test_parse_features_nested_geometry_keeps_leading_text_only() {
        let xml = r#"<FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2">
  <member><f><the_geom><gml:Point><gml:pos>1 2</gml:pos></gml:Point></the_geom><id>7</id></f></member>
</FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert_eq!(rows[0].get("the_geom"), Some(None));
        assert_eq!(rows[0].value("id"), Some("7"));
        assert!(!rows[0].contains("pos"));
    }

    #[test]
    fn test_parse_features_no_members_is_empty() {
        let xml = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" numberMatched="0" numberReturned="0"/>"#;
        let rows = parse_features(xml.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_features_ignores_non_member_children() {
        let xml = r#"<FeatureCollection>
  <boundedBy><f><x>1</x></f></boundedBy>
  <member><f><x>2</x></f></member>
</FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("x"), Some("2"));
    }

    #[test]
    fn test_parse_features_only_direct_members_of_root() {
        let xml = r#"<FeatureCollection>
  <additionalObjects><member><f><x>1</x></f></member></additionalObjects>
</FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_features_member_with_several_features() {
        let xml = r#"<FeatureCollection>
  <member><f><x>1</x></f><f><x>2</x></f></member>
</FeatureCollection>"#;

        let rows = parse_features(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].value("x"), Some("2"));
    }

    #[test]
    fn test_parse_features_malformed() {
        let xml = r#"<FeatureCollection>
  <member><f><x>1</x></f></member>
  <member><f><x>2"#;

        let result = parse_features(xml.as_bytes());
        assert!(matches!(result, Err(AppError::MalformedDocument(_))));
    }
}
