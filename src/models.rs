use serde::ser::{Serialize, SerializeMap, Serializer};

/// The two properties of a catalog resource the WFS requests need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Server-side layer identifier (e.g. `geonode:roads`), sent as `typeName`.
    pub type_name: String,
    /// Layer name without workspace (e.g. `roads`), used to find `<name>Type` in the schema.
    pub display_name: String,
}

impl ResourceDescriptor {
    pub fn new(type_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            display_name: display_name.into(),
        }
    }
}

/// One feature flattened to its direct child elements.
///
/// Fields keep the order in which their local names first appeared. Inserting a
/// name that is already present replaces its value in place, so when two
/// namespaces collapse to the same local name the last one in the document wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, value: Option<String>) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Text of the named field, `None` when the field is absent or has no text.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).flatten()
    }

    /// Distinguishes an absent field (`None`) from a field without text (`Some(None)`).
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(existing, _)| existing == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Kind of catalog resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceType {
    Dataset,
    Map,
    Document,
    Other(String),
}

/// A resource as the surrounding catalog stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Workspace-qualified layer name (`geonode:roads`).
    pub alternate: String,
    /// Bare layer name (`roads`).
    pub name: String,
    pub resource_type: ResourceType,
    pub subtype: Option<String>,
    /// Layers of a map; empty for every other resource type.
    pub datasets: Vec<CatalogEntry>,
}

impl CatalogEntry {
    pub fn dataset(alternate: &str, name: &str, subtype: Option<&str>) -> Self {
        Self {
            alternate: alternate.to_string(),
            name: name.to_string(),
            resource_type: ResourceType::Dataset,
            subtype: subtype.map(str::to_string),
            datasets: Vec::new(),
        }
    }

    pub fn map(alternate: &str, name: &str, datasets: Vec<CatalogEntry>) -> Self {
        Self {
            alternate: alternate.to_string(),
            name: name.to_string(),
            resource_type: ResourceType::Map,
            subtype: None,
            datasets,
        }
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.alternate.as_str(), self.name.as_str())
    }
}

impl From<&CatalogEntry> for ResourceDescriptor {
    fn from(entry: &CatalogEntry) -> Self {
        entry.descriptor()
    }
}
