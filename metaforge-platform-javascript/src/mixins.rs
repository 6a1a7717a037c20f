//! Mixin registrations for the JavaScript platform.
//!
//! Registered once by the platform support script's platform hook. The
//! render context matches the template vocabulary: `{{jsIdentifierName}}`
//! inside an attribute block behaves exactly like a native member.

use metaforge_codegen::{EntityKind, MixinRegistry};
use serde_json::{Value, json};

use crate::naming::{COMMENT_BUDGET, js_identifier, js_path, plural, wrap_comment};

/// Attach the JavaScript naming conventions to the meta-model entity kinds.
pub fn register(mixins: &mut MixinRegistry) {
    // The comment of any entity, wrapped for 80-column doc blocks.
    mixins.register_getter(EntityKind::Element, "commentLines", |scope| {
        let lines = match scope.str("comment") {
            Some(comment) => wrap_comment(comment, COMMENT_BUDGET),
            None => Vec::new(),
        };
        Ok(json!(lines))
    });

    mixins.register_getter(EntityKind::Attribute, "jsIdentifierName", |scope| {
        let name = scope.str("name").unwrap_or_default();
        let is_public = scope
            .entity
            .get("isPublic")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        Ok(json!(js_identifier(name, is_public, scope.flag("isReadOnly"))))
    });

    mixins.register_getter(EntityKind::ObjectDatatype, "jsClassNameWithPath", |scope| {
        let path = scope.str("classNameWithPath").unwrap_or_default();
        Ok(json!(js_path(path, &scope.options.package_delimiter)))
    });

    mixins.register_getter(EntityKind::Class, "jsClassNameWithPath", |scope| {
        let path = scope.str("classNameWithPath").unwrap_or_default();
        Ok(json!(js_path(path, &scope.options.package_delimiter)))
    });

    mixins.register_getter(EntityKind::Class, "jsPackageName", |scope| {
        let package = scope.str("packageName").unwrap_or_default();
        Ok(json!(js_path(package, &scope.options.package_delimiter)))
    });

    mixins.register_getter(EntityKind::Class, "pluralName", |scope| {
        Ok(json!(plural(scope.str("name").unwrap_or_default())))
    });

    // The variable a class's service instance is bound to in generated code.
    mixins.register_getter(EntityKind::Class, "serviceVarName", |scope| {
        let name = scope.str("name").unwrap_or_default();
        match scope.str("stereotypeName") {
            Some("Entity") => Ok(json!(format!("{name}Dao"))),
            Some("Service") => Ok(json!(name)),
            other => Err(format!(
                "there is no service name for stereotype {}",
                other.unwrap_or("<none>")
            )),
        }
    });

    // The partial path used to import the class's service module.
    mixins.register_getter(EntityKind::Class, "importPath", |scope| {
        let service = scope.str("serviceVarName").unwrap_or_default().to_string();
        if scope.flag("inRootPackage") {
            Ok(json!(service))
        } else {
            let dir = scope.str("packageDirName").unwrap_or_default();
            Ok(json!(format!("{dir}/{service}")))
        }
    });
}

#[cfg(test)]
mod tests {
    use metaforge_codegen::{GenOptions, entity::class_entity};
    use metaforge_model::parse_str;

    use super::*;

    fn registry() -> MixinRegistry {
        let mut mixins = MixinRegistry::new();
        register(&mut mixins);
        mixins
    }

    fn order_entity(stereotype_index: usize) -> Value {
        let model = parse_str(
            r#"{
                "name": "Shop",
                "classes": [{
                    "name": "Order",
                    "package": "sales.orders",
                    "comment": "A customer order.",
                    "stereotypes": ["Entity", "Service"],
                    "attributes": [
                        { "name": "total", "type": "Number", "readOnly": true },
                        { "name": "notes", "type": "String" }
                    ]
                }]
            }"#,
        )
        .unwrap();
        let class = &model.classes[0];
        class_entity(
            class,
            &class.stereotypes[stereotype_index],
            &registry(),
            &GenOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_service_var_name_by_stereotype() {
        assert_eq!(order_entity(0)["serviceVarName"], "OrderDao");
        assert_eq!(order_entity(1)["serviceVarName"], "Order");
    }

    #[test]
    fn test_import_path_uses_package_dir() {
        assert_eq!(order_entity(0)["importPath"], "sales/orders/OrderDao");
    }

    #[test]
    fn test_plural_and_package_members() {
        let entity = order_entity(0);
        assert_eq!(entity["pluralName"], "orders");
        assert_eq!(entity["jsPackageName"], "sales.orders");
        assert_eq!(entity["jsClassNameWithPath"], "sales.orders.Order");
    }

    #[test]
    fn test_attribute_identifier_prefix() {
        let entity = order_entity(0);
        assert_eq!(entity["attributes"][0]["jsIdentifierName"], "_total");
        assert_eq!(entity["attributes"][1]["jsIdentifierName"], "notes");
    }

    #[test]
    fn test_comment_lines_on_class() {
        let entity = order_entity(0);
        assert_eq!(entity["commentLines"], json!(["A customer order."]));
    }

    #[test]
    fn test_service_var_name_rejects_unknown_stereotype() {
        let model = parse_str(
            r#"{
                "name": "Shop",
                "classes": [ { "name": "Report", "stereotypes": ["Dashboard"] } ]
            }"#,
        )
        .unwrap();
        let class = &model.classes[0];
        let result = class_entity(
            class,
            &class.stereotypes[0],
            &registry(),
            &GenOptions::default(),
        );
        assert!(result.is_err());
    }
}
