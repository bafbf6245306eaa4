use std::collections::BTreeMap;
use thiserror::Error;

/// The query and mutation field names one resource module contributes.
#[derive(Debug, Clone, Copy)]
pub struct ModuleFields {
    pub module: &'static str,
    pub queries: &'static [&'static str],
    pub mutations: &'static [&'static str],
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompositionError {
    #[error("duplicate {kind} field `{field}` declared by both `{first}` and `{second}`")]
    Collision {
        kind: &'static str,
        field: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// The merged root field maps, field name -> owning module.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ComposedFields {
    pub queries: BTreeMap<&'static str, &'static str>,
    pub mutations: BTreeMap<&'static str, &'static str>,
}

/// Merges the per-module field maps into one query map and one mutation map.
///
/// A field name declared by two modules is an error, never a silent
/// override; module order only determines which module is reported first.
pub fn compose(modules: &[ModuleFields]) -> Result<ComposedFields, CompositionError> {
    let mut composed = ComposedFields::default();
    for module in modules {
        for &field in module.queries {
            if let Some(first) = composed.queries.insert(field, module.module) {
                return Err(CompositionError::Collision {
                    kind: "query",
                    field,
                    first,
                    second: module.module,
                });
            }
        }
        for &field in module.mutations {
            if let Some(first) = composed.mutations.insert(field, module.module) {
                return Err(CompositionError::Collision {
                    kind: "mutation",
                    field,
                    first,
                    second: module.module,
                });
            }
        }
    }
    Ok(composed)
}
