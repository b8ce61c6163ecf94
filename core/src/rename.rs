#![deny(missing_docs)]

//! # Rename Propagation
//!
//! Keeps references intact when a schema is renamed. The schema itself is
//! renamed by the caller; this pass rewrites everything that points at it.

use crate::model::{BodySchema, EntityStore, ExampleValue, NodeShape};
use crate::selector::Selector;
use tracing::info;

/// Rewrites every reference to schema `old` so it points at `new`.
///
/// Covers operation selectors (request, default response, response entries),
/// schema and field shapes (refs, array items, composition variants), open
/// drafts, reusable responses and request bodies, and example forms.
/// Returns the number of rewritten references; `old == new` is a no-op.
pub fn propagate_rename(store: &mut EntityStore, old: &str, new: &str) -> usize {
    if old == new {
        return 0;
    }
    let mut count = 0;

    for op in &mut store.operations {
        for selector in op.selectors_mut() {
            if selector.schema_name() == Some(old) {
                *selector = Selector::schema(new);
                count += 1;
            }
        }
    }

    let shapes = store
        .schemas
        .iter_mut()
        .map(|s| &mut s.shape)
        .chain(store.drafts.iter_mut().map(|d| &mut d.node.shape));
    for shape in shapes {
        count += rename_in_shape(shape, old, new);
    }

    let bodies = store
        .responses
        .iter_mut()
        .map(|r| &mut r.schema)
        .chain(store.request_bodies.iter_mut().map(|b| &mut b.schema));
    for body in bodies {
        if let BodySchema::Ref { ref_name } = body {
            if ref_name == old {
                *ref_name = new.to_string();
                count += 1;
            }
        }
    }

    for example in &mut store.examples {
        if let ExampleValue::Form(form) = &mut example.value {
            if form.schema.as_deref() == Some(old) {
                form.schema = Some(new.to_string());
                count += 1;
            }
        }
    }

    info!(old, new, count, "Propagated schema rename");
    count
}

fn rename_in_shape(shape: &mut NodeShape, old: &str, new: &str) -> usize {
    let mut count = 0;
    shape.for_each_ref_mut(&mut |target| {
        if target == old {
            *target = new.to_string();
            count += 1;
        }
    });
    count
}
