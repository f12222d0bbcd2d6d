use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    compose::porter_duff::PorterDuff,
    foundation::error::{PortaError, PortaResult},
    ops::{
        Operation, OperationKind, ParamSpec,
        composer::PorterDuffOp,
        filter::{Invert, Nop, Opacity, Threshold, Translate},
        source::{Checkerboard, ColorSource, Fractal},
    },
};

/// Builds an operation instance from a JSON parameter object.
pub type Constructor =
    Arc<dyn Fn(&serde_json::Value) -> PortaResult<Arc<dyn Operation>> + Send + Sync>;

/// What a registered operation looks like from the outside.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OperationDecl {
    pub name: String,
    pub kind: OperationKind,
    pub params: Vec<ParamSpec>,
    pub aux_slots: Vec<&'static str>,
}

impl OperationDecl {
    pub fn new(name: impl Into<String>, kind: OperationKind, params: &[ParamSpec]) -> Self {
        Self {
            name: name.into(),
            kind,
            params: params.to_vec(),
            aux_slots: kind.aux_slots().to_vec(),
        }
    }
}

#[derive(Clone)]
struct Entry {
    decl: OperationDecl,
    ctor: Constructor,
}

/// Name-keyed table of operation constructors.
#[derive(Clone, Default)]
pub struct OperationRegistry {
    entries: BTreeMap<String, Entry>,
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl OperationRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in operation.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();

        for op in PorterDuff::ALL {
            let node = PorterDuffOp::new(op);
            reg.register(
                OperationDecl::new(op.name(), OperationKind::Composer, &[]),
                move |raw| Ok(Arc::new(node.with_params(raw)?)),
            );
        }
        reg.register(
            OperationDecl::new("over", OperationKind::Composer, &[]),
            |raw| Ok(Arc::new(PorterDuffOp::over().with_params(raw)?)),
        );

        reg.register(
            OperationDecl::new(ColorSource::NAME, OperationKind::Source, ColorSource::PARAMS),
            |raw| Ok(Arc::new(ColorSource::from_params(raw)?)),
        );
        reg.register(
            OperationDecl::new(Checkerboard::NAME, OperationKind::Source, Checkerboard::PARAMS),
            |raw| Ok(Arc::new(Checkerboard::from_params(raw)?)),
        );
        reg.register(
            OperationDecl::new(Fractal::NAME, OperationKind::Source, Fractal::PARAMS),
            |raw| Ok(Arc::new(Fractal::from_params(raw)?)),
        );

        reg.register(
            OperationDecl::new(Threshold::NAME, OperationKind::Filter, Threshold::PARAMS),
            |raw| Ok(Arc::new(Threshold::from_params(raw)?)),
        );
        reg.register(
            OperationDecl::new(Translate::NAME, OperationKind::Filter, Translate::PARAMS),
            |raw| Ok(Arc::new(Translate::from_params(raw)?)),
        );
        reg.register(
            OperationDecl::new(Opacity::NAME, OperationKind::Filter, Opacity::PARAMS),
            |raw| Ok(Arc::new(Opacity::from_params(raw)?)),
        );
        reg.register(
            OperationDecl::new(Invert::NAME, OperationKind::Filter, &[]),
            |raw| Ok(Arc::new(Invert::from_params(raw)?)),
        );
        reg.register(
            OperationDecl::new(Nop::NAME, OperationKind::Filter, &[]),
            |raw| Ok(Arc::new(Nop::from_params(raw)?)),
        );

        reg
    }

    /// Add or replace the operation named `decl.name`. Returns the declaration it replaced.
    pub fn register<F>(&mut self, decl: OperationDecl, ctor: F) -> Option<OperationDecl>
    where
        F: Fn(&serde_json::Value) -> PortaResult<Arc<dyn Operation>> + Send + Sync + 'static,
    {
        let name = decl.name.clone();
        self.entries
            .insert(
                name,
                Entry {
                    decl,
                    ctor: Arc::new(ctor),
                },
            )
            .map(|old| old.decl)
    }

    pub fn get(&self, name: &str) -> Option<&OperationDecl> {
        self.entries.get(name).map(|e| &e.decl)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn decls(&self) -> impl Iterator<Item = &OperationDecl> + '_ {
        self.entries.values().map(|e| &e.decl)
    }

    /// Instantiate `name` with `params` (`null` for defaults).
    pub fn create(&self, name: &str, params: &serde_json::Value) -> PortaResult<Arc<dyn Operation>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| PortaError::UnknownOperator(name.to_string()))?;
        (entry.ctor)(params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/registry.rs"]
mod tests;
