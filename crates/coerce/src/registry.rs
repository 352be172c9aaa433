//! Type-name resolution.
//!
//! Backs the "type from text" strategy. Built-in scalars are registered
//! under their short, qualified and common alias names; enums and object
//! types are registered by the application. Lookups are case-insensitive.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;

use crate::target::{ObjectType, TargetType};
use crate::typed::NamedEnum;

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::with_builtins);

const BUILTIN_ALIASES: [(&str, TargetType); 14] = [
    ("boolean", TargetType::Bool),
    ("byte", TargetType::Byte),
    ("short", TargetType::Short),
    ("int", TargetType::Int),
    ("integer", TargetType::Int),
    ("long", TargetType::Long),
    ("float", TargetType::Float),
    ("single", TargetType::Float),
    ("double", TargetType::Double),
    ("str", TargetType::String),
    ("text", TargetType::String),
    ("guid", TargetType::Guid),
    ("datetime", TargetType::DateTime),
    ("type", TargetType::Type),
];

/// Case-insensitive table from type names to descriptors.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    names: RwLock<HashMap<String, TargetType>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the built-in scalars.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for ty in TargetType::SCALARS {
            registry.register(ty);
        }
        registry.register(TargetType::Type);
        registry.register(TargetType::Object(ObjectType::OBJECT));
        for (alias, ty) in BUILTIN_ALIASES {
            registry.register_alias(alias, ty);
        }
        registry
    }

    /// The process-wide registry used by the default engine.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers `ty` under its short and qualified names.
    ///
    /// Registering the same type twice is harmless.
    pub fn register(&self, ty: TargetType) {
        let mut names = self.names.write();
        names.insert(ty.name().to_lowercase(), ty.clone());
        names.insert(ty.qualified_name().to_lowercase(), ty);
    }

    /// Registers an extra spelling for `ty`.
    pub fn register_alias(&self, alias: &str, ty: TargetType) {
        self.names.write().insert(alias.to_lowercase(), ty);
    }

    /// Registers a named enum.
    pub fn register_enum<E: NamedEnum>(&self) {
        self.register(TargetType::Enum(E::enum_type()));
    }

    /// Resolves a type name.
    ///
    /// Accepts `Name`, `path::Name`, `Option<Name>`, `Name?` and a
    /// qualified form with a trailing `, extra` section (which is ignored).
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<TargetType> {
        let name = strip_qualifier(name.trim()).trim();
        if name.is_empty() {
            return None;
        }

        if let Some(inner) = name.strip_suffix('?') {
            return self.resolve_non_nullable(inner).map(TargetType::nullable);
        }
        if let Some(inner) = strip_option(name) {
            return self.resolve_non_nullable(inner).map(TargetType::nullable);
        }

        let key = name.to_lowercase();
        let names = self.names.read();
        if let Some(ty) = names.get(&key) {
            return Some(ty.clone());
        }

        // Fall back to the last path segment.
        let simple = key
            .rsplit_once("::")
            .or_else(|| key.rsplit_once('.'))
            .map(|(_, simple)| simple)?;
        names.get(simple).cloned()
    }

    fn resolve_non_nullable(&self, name: &str) -> Option<TargetType> {
        self.resolve(name).filter(|ty| !ty.is_nullable())
    }

    /// Number of registered spellings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

/// Drops everything after the first top-level comma.
fn strip_qualifier(name: &str) -> &str {
    let mut depth = 0usize;
    for (idx, ch) in name.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return &name[..idx],
            _ => {}
        }
    }
    name
}

/// `Option<T>` / `core::option::Option<T>` → `T`.
fn strip_option(name: &str) -> Option<&str> {
    let open = name.find('<')?;
    let inner = name.strip_suffix('>')?;
    let head = name[..open].trim();
    let head_simple = head.rsplit_once("::").map_or(head, |(_, simple)| simple);
    head_simple
        .eq_ignore_ascii_case("option")
        .then(|| inner[open + 1..].trim())
}
