// WFS protocol parameters
pub const WFS_SERVICE: &str = "wfs";
pub const WFS_VERSION: &str = "2.0.0";
pub const OWS_PATH: &str = "ows";

// GeoServer names each feature's complex type `<layer name>Type`
pub const SCHEMA_TYPE_SUFFIX: &str = "Type";

// Element and attribute names matched in responses
pub const MEMBER_ELEMENT: &str = "member";
pub const COMPLEX_TYPE_ELEMENT: &str = "complexType";
pub const SEQUENCE_ELEMENT: &str = "sequence";
pub const SCHEMA_ELEMENT: &str = "element";
pub const NAME_ATTRIBUTE: &str = "name";

// Catalog values
pub const TABULAR_SUBTYPE: &str = "tabular";

// Defaults
pub const DEFAULT_GEOSERVER_LOCATION: &str = "http://localhost:8080/geoserver";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
