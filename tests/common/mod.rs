//! Common test utilities for integration tests

/// GetFeature response as GeoServer returns it for a small roads layer
#[allow(dead_code)]
pub const ROADS_FEATURES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:geonode="http://www.geonode.org/" numberMatched="3" numberReturned="3" timeStamp="2024-05-02T10:00:00.000Z">
  <wfs:member>
    <geonode:roads gml:id="roads.1">
      <geonode:id>1</geonode:id>
      <geonode:geom><gml:MultiLineString srsName="urn:ogc:def:crs:EPSG::4326"><gml:lineStringMember><gml:LineString><gml:posList>0 0 1 1</gml:posList></gml:LineString></gml:lineStringMember></gml:MultiLineString></geonode:geom>
      <geonode:length>12.5</geonode:length>
    </geonode:roads>
  </wfs:member>
  <wfs:member>
    <geonode:roads gml:id="roads.2">
      <geonode:id>2</geonode:id>
      <geonode:length>7.25</geonode:length>
    </geonode:roads>
  </wfs:member>
  <wfs:member>
    <geonode:roads gml:id="roads.3">
      <geonode:id>3</geonode:id>
      <geonode:length/>
    </geonode:roads>
  </wfs:member>
</wfs:FeatureCollection>"#;

/// GetFeature response with no features
#[allow(dead_code)]
pub const EMPTY_FEATURES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" numberMatched="0" numberReturned="0" timeStamp="2024-05-02T10:00:00.000Z"/>"#;

/// DescribeFeatureType response for the roads layer
#[allow(dead_code)]
pub const ROADS_SCHEMA_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:geonode="http://www.geonode.org/" elementFormDefault="qualified" targetNamespace="http://www.geonode.org/">
  <xsd:import namespace="http://www.opengis.net/gml/3.2" schemaLocation="http://localhost:8080/geoserver/schemas/gml/3.2.1/gml.xsd"/>
  <xsd:complexType name="roadsType">
    <xsd:complexContent>
      <xsd:extension base="gml:AbstractFeatureType">
        <xsd:sequence>
          <xsd:element maxOccurs="1" minOccurs="0" name="id" nillable="true" type="xsd:int"/>
          <xsd:element maxOccurs="1" minOccurs="0" name="geom" nillable="true" type="gml:MultiLineStringPropertyType"/>
          <xsd:element maxOccurs="1" minOccurs="0" name="length" nillable="true" type="xsd:double"/>
        </xsd:sequence>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:element name="roads" substitutionGroup="gml:AbstractFeature" type="geonode:roadsType"/>
</xsd:schema>"#;

/// Truncated response body
#[allow(dead_code)]
pub const TRUNCATED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0">
  <wfs:member>
    <geonode:roads xmlns:geonode="http://www.geonode.org/">
      <geonode:id>1</geonode:id>"#;

/// GetFeature response declared and encoded as ISO-8859-1, with CRLF line breaks
#[allow(dead_code)]
pub const LATIN1_FEATURES_XML: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\r\n\
<wfs:FeatureCollection xmlns:wfs=\"http://www.opengis.net/wfs/2.0\" xmlns:geonode=\"http://www.geonode.org/\">\r\n\
  <wfs:member>\r\n\
    <geonode:streets>\r\n\
      <geonode:name>Caf\xe9 Street</geonode:name>\r\n\
      <geonode:note>line one\r\nline two</geonode:note>\r\n\
    </geonode:streets>\r\n\
  </wfs:member>\r\n\
</wfs:FeatureCollection>\r\n";
