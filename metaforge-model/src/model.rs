//! Meta-model entity types.
//!
//! The meta-model is the platform-independent representation of the system
//! being generated: an ordered sequence of classes, each carrying stereotypes
//! (selector tags for the generation pipeline) and attributes. Package paths
//! are stored as segments; callers choose the delimiter when rendering them.

use serde::Serialize;

/// The root meta-model entity.
///
/// Produced by [`crate::parse_file`] and treated as read-only by the
/// generation pipeline. Class order is preserved from the model file because
/// generation output order depends on it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaModel {
    /// Model name.
    pub name: String,
    /// Classes in model order.
    pub classes: Vec<MetaClass>,
}

impl MetaModel {
    /// Look up a class by its bare name. Returns the first match in model order.
    pub fn class(&self, name: &str) -> Option<&MetaClass> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// A class in the meta-model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaClass {
    /// Class name.
    pub name: String,
    /// Package path segments, outermost first. Empty for the root package.
    pub package: Vec<String>,
    /// Free-text comment from the model, if any.
    pub comment: Option<String>,
    /// Stereotypes in declaration order. A class is processed once per
    /// stereotype it carries.
    pub stereotypes: Vec<Stereotype>,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
}

impl MetaClass {
    /// Fully-qualified name, unique within a valid model.
    ///
    /// Used as the script-execution identity so that two classes sharing a
    /// bare name in different packages do not share execution records.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.package.join("::"), self.name)
        }
    }

    /// Package path joined with the given delimiter.
    pub fn package_name(&self, delimiter: &str) -> String {
        self.package.join(delimiter)
    }

    /// Package path as a relative directory name (`sales/orders`).
    /// Empty string for the root package.
    pub fn package_dir_name(&self) -> String {
        self.package.join("/")
    }

    /// True when the class lives directly in the root package.
    pub fn in_root_package(&self) -> bool {
        self.package.is_empty()
    }

    /// Class name prefixed with its package path, joined with the given
    /// delimiter (`sales.orders.Order` for delimiter `.`).
    pub fn class_name_with_path(&self, delimiter: &str) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.package.join(delimiter), delimiter, self.name)
        }
    }

    /// True when the model carries a non-empty comment for this class.
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// A stereotype tag on a class.
///
/// Stereotypes carry no generation logic of their own; the name selects
/// which plugin scripts and templates apply to the class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stereotype {
    /// Stereotype name, also the template/script subdirectory name.
    pub name: String,
}

impl Stereotype {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An attribute of a class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// The attribute's datatype.
    pub datatype: Datatype,
    /// Visibility flag; defaults to public in the model file.
    pub is_public: bool,
    /// Read-only flag.
    pub is_read_only: bool,
    /// Free-text comment from the model, if any.
    pub comment: Option<String>,
}

impl Attribute {
    /// True when the attribute references another model class.
    pub fn is_object(&self) -> bool {
        matches!(self.datatype, Datatype::Object(_))
    }

    /// The datatype name: the primitive name, or the referenced class name.
    pub fn type_name(&self) -> &str {
        match &self.datatype {
            Datatype::Primitive(name) => name,
            Datatype::Object(obj) => &obj.name,
        }
    }

    /// True when the model carries a non-empty comment for this attribute.
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// An attribute datatype: either a primitive name or a reference to another
/// model class.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Datatype {
    /// A primitive type name (`String`, `Number`, ...). Interpretation is
    /// left to platform plugins.
    Primitive(String),
    /// A reference to another class in the model.
    Object(ObjectDatatype),
}

/// A reference to another model class, used as an attribute datatype.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDatatype {
    /// Referenced class name.
    pub name: String,
    /// Package path segments of the referenced class.
    pub package: Vec<String>,
}

impl ObjectDatatype {
    /// Referenced class name prefixed with its package path.
    pub fn class_name_with_path(&self, delimiter: &str) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.package.join(delimiter), delimiter, self.name)
        }
    }
}
