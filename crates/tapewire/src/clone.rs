// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled deep clone.
//!
//! Cloning is hot enough to deserve the same treatment as the wire codecs:
//! the per-type work plan is computed once and cached, and each clone call
//! just walks the plan. Unlike the wire codecs, the clone plan covers every
//! field, including untagged `Object` and list references, and it tolerates
//! cyclic record graphs by tracking already-cloned records per call.

use crate::descriptor::{FieldKind, TypeDescriptor};
use crate::record::{Record, SharedRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// One slot's clone action.
enum CloneOp {
    /// Plain value, cloned by `Value::clone`.
    Copy(usize),
    /// Nested record reference, deep-cloned through the visited map.
    Object(usize),
    /// List of record references, each deep-cloned.
    List(usize),
}

/// Compiled clone plan for one type.
struct ClonePlan {
    ops: Vec<CloneOp>,
}

impl ClonePlan {
    fn build(descriptor: &TypeDescriptor) -> Self {
        let ops = descriptor
            .fields()
            .iter()
            .enumerate()
            .map(|(slot, field)| match field.kind {
                FieldKind::Object => CloneOp::Object(slot),
                FieldKind::List => CloneOp::List(slot),
                _ => CloneOp::Copy(slot),
            })
            .collect();
        Self { ops }
    }
}

/// Deep-clone service with a per-type plan cache.
#[derive(Default)]
pub struct Cloner {
    plans: RwLock<HashMap<Arc<str>, Arc<ClonePlan>>>,
}

impl Cloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-clone a record graph. Shared references in the source come out
    /// shared in the clone, and cycles terminate.
    pub fn clone_record(&self, source: &SharedRecord) -> SharedRecord {
        let mut visited = HashMap::new();
        self.clone_shared(source, &mut visited)
    }

    fn plan_for(&self, descriptor: &Arc<TypeDescriptor>) -> Arc<ClonePlan> {
        if let Some(hit) = self.plans.read().get(descriptor.name()) {
            return Arc::clone(hit);
        }
        let mut plans = self.plans.write();
        if let Some(hit) = plans.get(descriptor.name()) {
            return Arc::clone(hit);
        }
        log::debug!("compiling clone plan for type '{}'", descriptor.name());
        let plan = Arc::new(ClonePlan::build(descriptor));
        plans.insert(descriptor.name_arc(), Arc::clone(&plan));
        plan
    }

    fn clone_shared(
        &self,
        source: &SharedRecord,
        visited: &mut HashMap<usize, SharedRecord>,
    ) -> SharedRecord {
        let key = Arc::as_ptr(source) as usize;
        if let Some(done) = visited.get(&key) {
            return Arc::clone(done);
        }
        let guard = source.read();
        let target = Record::blank(guard.descriptor()).into_shared();
        // Registered before field work so cycles resolve to the clone.
        visited.insert(key, Arc::clone(&target));

        let plan = self.plan_for(guard.descriptor());
        for op in &plan.ops {
            match *op {
                CloneOp::Copy(slot) => {
                    let value = guard.slot(slot).clone();
                    target.write().set_slot(slot, value);
                }
                CloneOp::Object(slot) => {
                    if let crate::value::Value::Object(Some(inner)) = guard.slot(slot) {
                        let cloned = self.clone_shared(inner, visited);
                        target
                            .write()
                            .set_slot(slot, crate::value::Value::Object(Some(cloned)));
                    }
                }
                CloneOp::List(slot) => {
                    if let crate::value::Value::List(items) = guard.slot(slot) {
                        let cloned = items
                            .iter()
                            .map(|item| self.clone_shared(item, visited))
                            .collect();
                        target.write().set_slot(slot, crate::value::Value::List(cloned));
                    }
                }
            }
        }
        drop(guard);
        target
    }
}

impl std::fmt::Debug for Cloner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloner")
            .field("plans", &self.plans.read().len())
            .finish()
    }
}
