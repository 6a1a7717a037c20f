//! JSON model reader.
//!
//! Model files are JSON documents exported from a modeling tool. Package
//! paths appear as delimited strings; the file declares its own delimiter
//! (`packageDelimiter`, default `.`) and the reader splits paths into
//! segments so the rest of the system never depends on the source notation.

use std::path::Path;

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    model::{Attribute, Datatype, MetaClass, MetaModel, ObjectDatatype, Stereotype},
};

fn default_delimiter() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModel {
    name: String,
    #[serde(default = "default_delimiter")]
    package_delimiter: String,
    #[serde(default)]
    classes: Vec<RawClass>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClass {
    name: String,
    #[serde(default)]
    package: String,
    comment: Option<String>,
    #[serde(default)]
    stereotypes: Vec<String>,
    #[serde(default)]
    attributes: Vec<RawAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttribute {
    name: String,
    #[serde(rename = "type")]
    datatype: RawDatatype,
    #[serde(default = "default_true")]
    public: bool,
    #[serde(default)]
    read_only: bool,
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDatatype {
    Primitive(String),
    Object {
        name: String,
        #[serde(default)]
        package: String,
    },
}

fn split_package(path: &str, delimiter: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(delimiter)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

impl RawModel {
    fn into_model(self) -> MetaModel {
        let delimiter = self.package_delimiter;
        MetaModel {
            name: self.name,
            classes: self
                .classes
                .into_iter()
                .map(|class| class.into_class(&delimiter))
                .collect(),
        }
    }
}

impl RawClass {
    fn into_class(self, delimiter: &str) -> MetaClass {
        MetaClass {
            name: self.name,
            package: split_package(&self.package, delimiter),
            comment: self.comment,
            stereotypes: self.stereotypes.into_iter().map(Stereotype::new).collect(),
            attributes: self
                .attributes
                .into_iter()
                .map(|attr| attr.into_attribute(delimiter))
                .collect(),
        }
    }
}

impl RawAttribute {
    fn into_attribute(self, delimiter: &str) -> Attribute {
        let datatype = match self.datatype {
            RawDatatype::Primitive(name) => Datatype::Primitive(name),
            RawDatatype::Object { name, package } => Datatype::Object(ObjectDatatype {
                name,
                package: split_package(&package, delimiter),
            }),
        };
        Attribute {
            name: self.name,
            datatype,
            is_public: self.public,
            is_read_only: self.read_only,
            comment: self.comment,
        }
    }
}

/// Parse a model file from the given path
pub fn parse_file(path: impl AsRef<Path>) -> Result<MetaModel> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    parse_str_with_filename(&content, &filename)
}

/// Parse a model from a string (uses "model.json" as default filename)
pub fn parse_str(content: &str) -> Result<MetaModel> {
    parse_str_with_filename(content, "model.json")
}

/// Parse a model from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<MetaModel> {
    let raw: RawModel =
        serde_json::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
    Ok(raw.into_model())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_model() {
        let model = parse_str(r#"{ "name": "Shop" }"#).unwrap();
        assert_eq!(model.name, "Shop");
        assert!(model.classes.is_empty());
    }

    #[test]
    fn test_parse_class_with_package() {
        let model = parse_str(
            r#"{
                "name": "Shop",
                "classes": [
                    { "name": "Order", "package": "sales.orders", "stereotypes": ["Entity"] }
                ]
            }"#,
        )
        .unwrap();

        let order = model.class("Order").unwrap();
        assert_eq!(order.package, vec!["sales", "orders"]);
        assert_eq!(order.stereotypes, vec![Stereotype::new("Entity")]);
    }

    #[test]
    fn test_parse_custom_delimiter() {
        let model = parse_str(
            r#"{
                "name": "Shop",
                "packageDelimiter": "::",
                "classes": [ { "name": "Order", "package": "sales::orders" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(model.classes[0].package, vec!["sales", "orders"]);
    }

    #[test]
    fn test_parse_attributes() {
        let model = parse_str(
            r#"{
                "name": "Shop",
                "classes": [{
                    "name": "Order",
                    "attributes": [
                        { "name": "total", "type": "Number", "readOnly": true },
                        { "name": "notes", "type": "String", "public": false },
                        { "name": "customer", "type": { "name": "Customer", "package": "crm" } }
                    ]
                }]
            }"#,
        )
        .unwrap();

        let attrs = &model.classes[0].attributes;
        assert!(attrs[0].is_public);
        assert!(attrs[0].is_read_only);
        assert_eq!(attrs[0].type_name(), "Number");
        assert!(!attrs[1].is_public);
        assert!(attrs[2].is_object());
        assert_eq!(attrs[2].type_name(), "Customer");
    }

    #[test]
    fn test_parse_error_reports_source() {
        let err = parse_str("{ \"name\": }").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/definitely/not/here/model.json").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_parse_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{ "name": "Shop", "classes": [] }"#).unwrap();

        let model = parse_file(&path).unwrap();
        assert_eq!(model.name, "Shop");
    }
}
