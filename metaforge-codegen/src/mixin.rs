//! Mixin registry: computed members attached to meta-model entity kinds.
//!
//! Platform plugins layer naming and path conventions onto the
//! platform-independent meta-model without the core knowing about any
//! platform. Instead of mutating entity types, registrations live in a
//! capability table keyed by entity kind and member name; when an entity is
//! materialized into its render value the table is consulted and each getter's
//! result is inserted next to the native fields, making registered members
//! indistinguishable from native ones inside templates.
//!
//! Registrations are additive and last-registration-wins per (kind, name).
//! Getters run in registration order, element-kind getters before
//! kind-specific ones, and each getter sees the members produced before it.

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    options::GenOptions,
};

/// The closed set of meta-model entity kinds that accept mixins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Every meta-model entity; members registered here apply to all kinds.
    Element,
    Attribute,
    ObjectDatatype,
    Class,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Element => "element",
            EntityKind::Attribute => "attribute",
            EntityKind::ObjectDatatype => "object-datatype",
            EntityKind::Class => "class",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver context passed to getters and methods: the entity materialized
/// so far plus the run options.
pub struct MixinScope<'a> {
    pub entity: &'a Map<String, Value>,
    pub options: &'a GenOptions,
}

impl MixinScope<'_> {
    /// Convenience accessor for a string-valued entity member.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.entity.get(key).and_then(Value::as_str)
    }

    /// Convenience accessor for a bool-valued entity member (false when
    /// absent).
    pub fn flag(&self, key: &str) -> bool {
        self.entity
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A zero-argument computed accessor. Evaluated fresh on every
/// materialization; results are never memoized.
pub type Getter = Arc<dyn Fn(&MixinScope) -> std::result::Result<Value, String> + Send + Sync>;

/// A callable member invoked by plugin scripts with explicit arguments.
pub type Method =
    Arc<dyn Fn(&MixinScope, &[Value]) -> std::result::Result<Value, String> + Send + Sync>;

enum Member {
    Getter(Getter),
    Method(Method),
}

/// Capability table of registered mixin members.
#[derive(Default)]
pub struct MixinRegistry {
    tables: HashMap<EntityKind, IndexMap<String, Member>>,
}

impl MixinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a computed accessor on an entity kind. A later registration
    /// under the same (kind, name) replaces the earlier one.
    pub fn register_getter<F>(&mut self, kind: EntityKind, name: impl Into<String>, getter: F)
    where
        F: Fn(&MixinScope) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.tables
            .entry(kind)
            .or_default()
            .insert(name.into(), Member::Getter(Arc::new(getter)));
    }

    /// Register a callable method on an entity kind. Same last-wins rule as
    /// getters.
    pub fn register_method<F>(&mut self, kind: EntityKind, name: impl Into<String>, method: F)
    where
        F: Fn(&MixinScope, &[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.tables
            .entry(kind)
            .or_default()
            .insert(name.into(), Member::Method(Arc::new(method)));
    }

    /// True when a member is registered under (kind, name), consulting the
    /// element table as a fallback.
    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.member(kind, name).is_some()
    }

    /// Evaluate all getters registered for an entity kind against a
    /// materialized entity, inserting each result as a member. Element-kind
    /// getters run first.
    pub fn apply(
        &self,
        kind: EntityKind,
        entity: &mut Map<String, Value>,
        options: &GenOptions,
    ) -> Result<()> {
        self.apply_table(EntityKind::Element, entity, options)?;
        if kind != EntityKind::Element {
            self.apply_table(kind, entity, options)?;
        }
        Ok(())
    }

    fn apply_table(
        &self,
        kind: EntityKind,
        entity: &mut Map<String, Value>,
        options: &GenOptions,
    ) -> Result<()> {
        let Some(table) = self.tables.get(&kind) else {
            return Ok(());
        };
        for (name, member) in table {
            if let Member::Getter(getter) = member {
                let value = getter(&MixinScope { entity, options }).map_err(|message| {
                    Error::Mixin {
                        kind: kind.as_str(),
                        name: name.clone(),
                        message,
                    }
                })?;
                entity.insert(name.clone(), value);
            }
        }
        Ok(())
    }

    /// Invoke a registered method by name, looking in the specific kind's
    /// table first and falling back to the element table.
    pub fn invoke(
        &self,
        kind: EntityKind,
        name: &str,
        entity: &Map<String, Value>,
        options: &GenOptions,
        args: &[Value],
    ) -> Result<Value> {
        let member = self.member(kind, name).ok_or_else(|| Error::Mixin {
            kind: kind.as_str(),
            name: name.to_string(),
            message: "no such member".to_string(),
        })?;
        let scope = MixinScope { entity, options };
        let result = match member {
            Member::Getter(getter) => getter(&scope),
            Member::Method(method) => method(&scope, args),
        };
        result.map_err(|message| Error::Mixin {
            kind: kind.as_str(),
            name: name.to_string(),
            message,
        })
    }

    fn member(&self, kind: EntityKind, name: &str) -> Option<&Member> {
        self.tables
            .get(&kind)
            .and_then(|table| table.get(name))
            .or_else(|| {
                self.tables
                    .get(&EntityKind::Element)
                    .and_then(|table| table.get(name))
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entity(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_getter_applies_to_entity() {
        let mut registry = MixinRegistry::new();
        registry.register_getter(EntityKind::Class, "shout", |scope| {
            Ok(json!(scope.str("name").unwrap_or_default().to_uppercase()))
        });

        let mut class = entity(&[("name", json!("order"))]);
        registry
            .apply(EntityKind::Class, &mut class, &GenOptions::default())
            .unwrap();

        assert_eq!(class["shout"], json!("ORDER"));
    }

    #[test]
    fn test_element_getters_apply_to_every_kind() {
        let mut registry = MixinRegistry::new();
        registry.register_getter(EntityKind::Element, "tagged", |_| Ok(json!(true)));

        for kind in [
            EntityKind::Class,
            EntityKind::Attribute,
            EntityKind::ObjectDatatype,
        ] {
            let mut e = entity(&[]);
            registry
                .apply(kind, &mut e, &GenOptions::default())
                .unwrap();
            assert_eq!(e["tagged"], json!(true));
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = MixinRegistry::new();
        registry.register_getter(EntityKind::Class, "label", |_| Ok(json!("first")));
        registry.register_getter(EntityKind::Class, "label", |_| Ok(json!("second")));

        let mut class = entity(&[]);
        registry
            .apply(EntityKind::Class, &mut class, &GenOptions::default())
            .unwrap();
        assert_eq!(class["label"], json!("second"));
    }

    #[test]
    fn test_later_getter_sees_earlier_member() {
        let mut registry = MixinRegistry::new();
        registry.register_getter(EntityKind::Class, "base", |_| Ok(json!("Order")));
        registry.register_getter(EntityKind::Class, "derived", |scope| {
            Ok(json!(format!("{}Dao", scope.str("base").unwrap_or_default())))
        });

        let mut class = entity(&[]);
        registry
            .apply(EntityKind::Class, &mut class, &GenOptions::default())
            .unwrap();
        assert_eq!(class["derived"], json!("OrderDao"));
    }

    #[test]
    fn test_getter_failure_is_typed() {
        let mut registry = MixinRegistry::new();
        registry.register_getter(EntityKind::Class, "broken", |_| {
            Err("no service path".to_string())
        });

        let mut class = entity(&[]);
        let err = registry
            .apply(EntityKind::Class, &mut class, &GenOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Mixin { name, .. } if name == "broken"));
    }

    #[test]
    fn test_method_invoke() {
        let mut registry = MixinRegistry::new();
        registry.register_method(EntityKind::Class, "prefixed", |scope, args| {
            let prefix = args.first().and_then(Value::as_str).unwrap_or_default();
            Ok(json!(format!(
                "{prefix}{}",
                scope.str("name").unwrap_or_default()
            )))
        });

        let class = entity(&[("name", json!("Order"))]);
        let value = registry
            .invoke(
                EntityKind::Class,
                "prefixed",
                &class,
                &GenOptions::default(),
                &[json!("I")],
            )
            .unwrap();
        assert_eq!(value, json!("IOrder"));
    }

    #[test]
    fn test_invoke_unknown_member_fails() {
        let registry = MixinRegistry::new();
        let err = registry
            .invoke(
                EntityKind::Class,
                "missing",
                &entity(&[]),
                &GenOptions::default(),
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, Error::Mixin { .. }));
    }
}
