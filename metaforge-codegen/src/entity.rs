//! Materialization of meta-model entities into template render values.
//!
//! Templates see entities as plain JSON objects with camelCase members:
//! native meta-model fields first, then whatever the platform's mixins
//! computed. A class is materialized once per (class, stereotype) pipeline
//! iteration because members like `stereotypeName` depend on the stereotype
//! currently being processed.

use metaforge_model::{Attribute, Datatype, MetaClass, ObjectDatatype, Stereotype};
use serde_json::{Map, Value, json};

use crate::{
    error::Result,
    mixin::{EntityKind, MixinRegistry},
    options::GenOptions,
};

/// Materialize a class for the given stereotype context.
pub fn class_entity(
    class: &MetaClass,
    stereotype: &Stereotype,
    mixins: &MixinRegistry,
    options: &GenOptions,
) -> Result<Value> {
    let delimiter = &options.package_delimiter;
    let mut map = Map::new();
    map.insert("name".into(), json!(class.name));
    map.insert("comment".into(), json!(class.comment));
    map.insert("hasComment".into(), json!(class.has_comment()));
    map.insert("packageName".into(), json!(class.package_name(delimiter)));
    map.insert("packageDirName".into(), json!(class.package_dir_name()));
    map.insert("inRootPackage".into(), json!(class.in_root_package()));
    map.insert(
        "classNameWithPath".into(),
        json!(class.class_name_with_path(delimiter)),
    );
    map.insert("stereotypeName".into(), json!(stereotype.name));
    map.insert(
        "stereotypes".into(),
        Value::Array(
            class
                .stereotypes
                .iter()
                .map(|s| json!({ "name": s.name }))
                .collect(),
        ),
    );

    let attributes = class
        .attributes
        .iter()
        .map(|attr| attribute_entity(attr, mixins, options))
        .collect::<Result<Vec<_>>>()?;
    map.insert("attributes".into(), Value::Array(attributes));

    mixins.apply(EntityKind::Class, &mut map, options)?;
    Ok(Value::Object(map))
}

/// Materialize an attribute, including its object datatype when it
/// references another class.
pub fn attribute_entity(
    attr: &Attribute,
    mixins: &MixinRegistry,
    options: &GenOptions,
) -> Result<Value> {
    let mut map = Map::new();
    map.insert("name".into(), json!(attr.name));
    map.insert("typeName".into(), json!(attr.type_name()));
    map.insert("isPublic".into(), json!(attr.is_public));
    map.insert("isReadOnly".into(), json!(attr.is_read_only));
    map.insert("isObject".into(), json!(attr.is_object()));
    map.insert("comment".into(), json!(attr.comment));
    map.insert("hasComment".into(), json!(attr.has_comment()));

    if let Datatype::Object(obj) = &attr.datatype {
        map.insert(
            "objectDatatype".into(),
            datatype_entity(obj, mixins, options)?,
        );
    }

    mixins.apply(EntityKind::Attribute, &mut map, options)?;
    Ok(Value::Object(map))
}

fn datatype_entity(
    obj: &ObjectDatatype,
    mixins: &MixinRegistry,
    options: &GenOptions,
) -> Result<Value> {
    let mut map = Map::new();
    map.insert("className".into(), json!(obj.name));
    map.insert(
        "classNameWithPath".into(),
        json!(obj.class_name_with_path(&options.package_delimiter)),
    );

    mixins.apply(EntityKind::ObjectDatatype, &mut map, options)?;
    Ok(Value::Object(map))
}
