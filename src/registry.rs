//! Family registry: discriminator string -> spec constructor.
//!
//! One registry instance is built at startup and passed by reference; there
//! is no global.

use crate::error::{Result, SpecError};
use crate::spec::{BernoulliSpec, FamilySpec, FunctionSpec, NormalSpec, UniformSpec};
use serde_json::{Map, Value};
use std::any::TypeId;
use std::collections::BTreeMap;

type ParseFn = fn(&Map<String, Value>) -> Result<FunctionSpec>;

/// A registered family: its identity plus the strict payload constructor.
#[derive(Debug, Clone, Copy)]
pub struct FamilyEntry {
    family: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    parse: ParseFn,
}

impl FamilyEntry {
    fn of<T: FamilySpec>() -> Self {
        Self {
            family: T::FAMILY,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            parse: |payload| T::from_fields(payload).map(Into::into),
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Build and validate a spec from a payload object.
    pub fn parse(&self, payload: &Map<String, Value>) -> Result<FunctionSpec> {
        (self.parse)(payload)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FamilyRegistry {
    families: BTreeMap<&'static str, FamilyEntry>,
}

impl FamilyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding bernoulli, normal and uniform.
    pub fn with_builtin_families() -> Result<Self> {
        let mut registry = Self::new();
        registry.register::<BernoulliSpec>()?;
        registry.register::<UniformSpec>()?;
        registry.register::<NormalSpec>()?;
        Ok(registry)
    }

    /// Register `T` under its discriminator. Re-registering `T` is a no-op;
    /// a different type under the same name is a conflict.
    pub fn register<T: FamilySpec>(&mut self) -> Result<()> {
        let entry = FamilyEntry::of::<T>();
        if entry.family.trim().is_empty() {
            return Err(SpecError::validation(
                "family",
                format!("{} must declare a non-empty family", entry.type_name),
            ));
        }

        if let Some(existing) = self.families.get(entry.family) {
            if existing.type_id == entry.type_id {
                return Ok(());
            }
            return Err(SpecError::RegistrationConflict {
                family: entry.family.to_string(),
                existing: existing.type_name,
            });
        }

        self.families.insert(entry.family, entry);
        Ok(())
    }

    pub fn get(&self, family: &str) -> Result<&FamilyEntry> {
        self.families
            .get(family)
            .ok_or_else(|| SpecError::UnknownFamily {
                family: family.to_string(),
                available: self.available(),
            })
    }

    fn available(&self) -> String {
        if self.families.is_empty() {
            "<none>".to_string()
        } else {
            self.list_families().join(", ")
        }
    }

    /// Resolve the payload's `family` and construct through that family.
    pub fn parse(&self, payload: &Value) -> Result<FunctionSpec> {
        let Some(object) = payload.as_object() else {
            return Err(SpecError::validation(
                "payload",
                "spec payload must be a JSON object",
            ));
        };
        let Some(family) = object.get("family").and_then(Value::as_str) else {
            return Err(SpecError::validation(
                "family",
                "spec payload must include a string 'family' field",
            ));
        };
        self.get(family)?.parse(object)
    }

    /// Registered names, sorted.
    pub fn list_families(&self) -> Vec<&'static str> {
        // BTreeMap keys iterate in order.
        self.families.keys().copied().collect()
    }
}
