//! Input registry.
//!
//! Inputs are appended in declaration order and never removed. Object inputs
//! are deduplicated by object id: declaring the same object twice returns the
//! existing input.

use serde_json::Value;
use sui_tx_types::{CallArg, InputKind, InputValue, ObjectArg, ObjectId, TransactionInput};
use tracing::trace;

use crate::error::{BuildError, BuildResult};

/// Declaration view over a transaction's input list.
pub struct InputRegistry<'a> {
    inputs: &'a mut Vec<TransactionInput>,
}

impl<'a> InputRegistry<'a> {
    pub fn new(inputs: &'a mut Vec<TransactionInput>) -> Self {
        Self { inputs }
    }

    /// Index of the object input referring to `id`, if declared.
    pub fn find_object(&self, id: &ObjectId) -> Option<u16> {
        self.inputs
            .iter()
            .find(|input| input.kind == InputKind::Object && input.object_id().as_ref() == Some(id))
            .map(|input| input.index)
    }

    /// Declare an object by id, to be resolved against the ledger.
    pub fn declare_object_id(&mut self, id: ObjectId) -> BuildResult<u16> {
        if let Some(index) = self.find_object(&id) {
            trace!(object = %id.short(), index, "Reusing object input");
            return Ok(index);
        }
        self.push(InputKind::Object, InputValue::Raw(Value::String(id.to_string())))
    }

    /// Declare an object with an already known reference.
    ///
    /// Re-declaring a shared object mutably upgrades an existing immutable
    /// declaration; mutability never goes back down.
    pub fn declare_object_arg(&mut self, arg: ObjectArg) -> BuildResult<u16> {
        let id = arg.id();
        let Some(index) = self.find_object(&id) else {
            return self.push(InputKind::Object, InputValue::Resolved(CallArg::Object(arg)));
        };
        if let ObjectArg::SharedObject { mutable: true, .. } = arg {
            if let InputValue::Resolved(CallArg::Object(ObjectArg::SharedObject {
                mutable, ..
            })) = &mut self.inputs[index as usize].value
            {
                *mutable = true;
            }
        }
        trace!(object = %id.short(), index, "Reusing object input");
        Ok(index)
    }

    /// Declare a pure input. Pure inputs are never deduplicated.
    pub fn declare_pure(&mut self, value: InputValue) -> BuildResult<u16> {
        self.push(InputKind::Pure, value)
    }

    fn push(&mut self, kind: InputKind, value: InputValue) -> BuildResult<u16> {
        let index = u16::try_from(self.inputs.len()).map_err(|_| BuildError::TooManyInputs)?;
        self.inputs.push(TransactionInput { index, kind, value });
        Ok(index)
    }
}
