//! What the archive layer knows about an entry before any decoder looks at its bytes.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Property key holding the image width.
pub const WIDTH: &str = "Width";
/// Property key holding the image height.
pub const HEIGHT: &str = "Height";
/// Property key selecting a palette by index.
pub const PALETTE_ID: &str = "PaletteID";
/// Property key naming the pixel format, e.g. `"RGBA8888"` or `"BC1"`.
pub const IMAGE_FORMAT: &str = "ImageFormat";

/// A single property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// An integer, e.g. a dimension
    Int(i64),
    /// A string, e.g. a format name
    Text(String),
}

/// String keyed property bag set by the container layer for one resource.
///
/// Archive formats that store geometry or format codes outside of the texture bytes pass
/// them to the decoders through here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceProperties {
    values: BTreeMap<String, PropertyValue>,
}

impl ResourceProperties {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an integer property, replacing any previous value.
    pub fn set_int(&mut self, key: &str, value: i64) -> &mut Self {
        self.values
            .insert(key.to_string(), PropertyValue::Int(value));
        self
    }

    /// Sets a string property, replacing any previous value.
    pub fn set_text(&mut self, key: &str, value: &str) -> &mut Self {
        self.values
            .insert(key.to_string(), PropertyValue::Text(value.to_string()));
        self
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Integer value for `key`. Text values holding a decimal number are accepted too.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            PropertyValue::Int(value) => Some(*value),
            PropertyValue::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Integer value for `key` when it fits in a `u32`.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_int(key).and_then(|value| u32::try_from(value).ok())
    }

    /// String value for `key`.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Int(_) => None,
        }
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Everything a decoder may know about an entry besides its bytes: its name, the type of
/// archive it came from and the archive's property bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerContext {
    name: Option<String>,
    extension: Option<String>,
    container: Option<String>,
    properties: ResourceProperties,
}

impl ContainerContext {
    /// An entry with no name, no container and no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// An entry named `name`; the extension is taken from the text after the last `.`.
    pub fn from_name(name: &str) -> Self {
        let file_name = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .filter(|extension| !extension.is_empty());
        Self {
            name: Some(name.to_string()),
            extension,
            ..Self::default()
        }
    }

    /// Sets the type of archive the entry came from, e.g. `"ps2-afs"`.
    pub fn with_container(mut self, container: &str) -> Self {
        self.container = Some(container.to_string());
        self
    }

    /// Replaces the property bag.
    pub fn with_properties(mut self, properties: ResourceProperties) -> Self {
        self.properties = properties;
        self
    }

    /// The entry name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The lowercase extension without a dot, if the name has one.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// The archive type, if known.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// The property bag.
    pub fn properties(&self) -> &ResourceProperties {
        &self.properties
    }

    /// Mutable access to the property bag.
    pub fn properties_mut(&mut self) -> &mut ResourceProperties {
        &mut self.properties
    }
}
