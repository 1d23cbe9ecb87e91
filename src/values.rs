//! Typed single-value producers
//!
//! [`ConfigValue<T>`] is a ready-made [`IniProducer`] holding one value of a
//! scalar type. It writes a single property named `<tag>_Value` into its
//! section, where `<tag>` comes from the [`IniValue`] implementation.
//!
//! Tags and formats match files already deployed by existing tooling:
//! `Boolean_Value=True`, `Int32_Value=4`, `Single_Value=2.5`,
//! `Vector3_Value=0,1.5,-3` and so on.
//!
//! Setting the value only changes memory. A running application never writes
//! its configuration back to storage.

use std::fmt;
use std::str::FromStr;

use crate::document::PropertyMap;
use crate::error::{Error, Result};
use crate::producer::IniProducer;

/// A type that can be stored as a single property string
pub trait IniValue: Sized {
    /// Type name used to build the property name, e.g. `Single`
    const TYPE_TAG: &'static str;

    fn to_ini_string(&self) -> String;

    /// Parse a stored string. The error is a human readable reason.
    fn from_ini_str(value: &str) -> std::result::Result<Self, String>;
}

impl IniValue for bool {
    const TYPE_TAG: &'static str = "Boolean";

    fn to_ini_string(&self) -> String {
        let text = if *self { "True" } else { "False" };
        text.to_string()
    }

    fn from_ini_str(value: &str) -> std::result::Result<Self, String> {
        // Hand-edited files often say True/FALSE.
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err("expected 'true' or 'false'".to_string()),
        }
    }
}

macro_rules! impl_ini_value_from_str {
    ($($ty:ty => $tag:literal),* $(,)?) => {
        $(
            impl IniValue for $ty {
                const TYPE_TAG: &'static str = $tag;

                fn to_ini_string(&self) -> String {
                    self.to_string()
                }

                fn from_ini_str(value: &str) -> std::result::Result<Self, String> {
                    value.trim().parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

impl_ini_value_from_str!(i32 => "Int32", i64 => "Int64", f32 => "Single", f64 => "Double");

impl IniValue for String {
    const TYPE_TAG: &'static str = "String";

    fn to_ini_string(&self) -> String {
        self.clone()
    }

    fn from_ini_str(value: &str) -> std::result::Result<Self, String> {
        Ok(value.to_string())
    }
}

/// Three-component vector, stored as `x,y,z`.
///
/// Parsing also accepts the parenthesized `(x, y, z)` form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for Vec3 {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("expected 3 comma-separated numbers, got {}", parts.len()));
        }
        let component = |text: &str| text.parse::<f32>().map_err(|e| e.to_string());
        Ok(Vec3::new(
            component(parts[0])?,
            component(parts[1])?,
            component(parts[2])?,
        ))
    }
}

impl IniValue for Vec3 {
    const TYPE_TAG: &'static str = "Vector3";

    fn to_ini_string(&self) -> String {
        self.to_string()
    }

    fn from_ini_str(value: &str) -> std::result::Result<Self, String> {
        value.parse()
    }
}

/// The file a value is written to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigFile {
    #[default]
    Config,
    Testing,
    Custom(String),
}

impl ConfigFile {
    /// Base file name: the variant's upper-case identifier with only its
    /// first letter kept upper-case and underscores turned into spaces.
    pub fn file_name(&self) -> String {
        match self {
            ConfigFile::Config => display_name("CONFIG"),
            ConfigFile::Testing => display_name("TESTING"),
            ConfigFile::Custom(name) => name.clone(),
        }
    }
}

fn display_name(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .map(|c| if c == '_' { ' ' } else { c })
            .collect(),
        None => String::new(),
    }
}

/// A producer holding one typed value
#[derive(Debug, Clone)]
pub struct ConfigValue<T: IniValue> {
    section: String,
    file: ConfigFile,
    description: String,
    property: String,
    value: T,
}

impl<T: IniValue> ConfigValue<T> {
    /// Create a producer for `section` in the default file, starting at
    /// `default`
    pub fn new(section: impl Into<String>, default: T) -> Self {
        Self {
            section: section.into(),
            file: ConfigFile::default(),
            description: String::new(),
            property: format!("{}_Value", T::TYPE_TAG),
            value: default,
        }
    }

    pub fn in_file(mut self, file: ConfigFile) -> Self {
        self.file = file;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn property_name(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Change the in-memory value. Nothing is written to storage.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: IniValue> IniProducer for ConfigValue<T> {
    fn section_name(&self) -> &str {
        &self.section
    }

    fn file_name(&self) -> String {
        self.file.file_name()
    }

    fn export_properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert(self.property.clone(), self.value.to_ini_string());
        properties
    }

    fn import_properties(&mut self, properties: &PropertyMap) -> Result<()> {
        let raw = properties
            .get(&self.property)
            .ok_or_else(|| Error::PropertyNotFound {
                document: self.file_name(),
                section: self.section.clone(),
                property: self.property.clone(),
            })?;
        self.value = T::from_ini_str(raw).map_err(|message| Error::ValueParse {
            property: self.property.clone(),
            value: raw.clone(),
            message,
        })?;
        Ok(())
    }
}

pub type BoolConfig = ConfigValue<bool>;
pub type IntConfig = ConfigValue<i32>;
pub type LongConfig = ConfigValue<i64>;
pub type FloatConfig = ConfigValue<f32>;
pub type DoubleConfig = ConfigValue<f64>;
pub type StringConfig = ConfigValue<String>;
pub type Vec3Config = ConfigValue<Vec3>;
