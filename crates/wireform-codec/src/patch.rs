//! JSON Merge Patch (RFC 7386).
//!
//! Patches and diffs operate on the JSON representation of a typed value:
//! the value is encoded through its JSON codec, the patch applied to the
//! document, and the result decoded back through the same codec, so a
//! patch can never produce a value the type would reject.

use crate::engine::Engine;
use crate::wire::Codec;
use serde_json::Value as JsonValue;
use thiserror::Error;
use wireform_schema::{Bindings, DecodeError, EncodeError, ResolveError, TypeDescriptor, Value};

/// A merge patch application failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Apply a merge patch document to a JSON document.
///
/// Null members of an object patch remove the target member; non-object
/// patches replace the target outright.
pub fn merge_patch(target: JsonValue, patch: &JsonValue) -> JsonValue {
    let JsonValue::Object(patch_members) = patch else {
        return patch.clone();
    };
    let mut members = match target {
        JsonValue::Object(members) => members,
        _ => serde_json::Map::new(),
    };
    for (name, member_patch) in patch_members {
        if member_patch.is_null() {
            members.remove(name);
        } else {
            let current = members.remove(name).unwrap_or(JsonValue::Null);
            members.insert(name.clone(), merge_patch(current, member_patch));
        }
    }
    JsonValue::Object(members)
}

/// The minimal merge patch that transforms one JSON document into another.
pub fn merge_diff(old: &JsonValue, new: &JsonValue) -> JsonValue {
    let (JsonValue::Object(old_members), JsonValue::Object(new_members)) = (old, new) else {
        return new.clone();
    };
    let mut diff = serde_json::Map::new();
    for (name, new_member) in new_members {
        match old_members.get(name) {
            Some(old_member) if old_member == new_member => {}
            Some(old_member) => {
                let member_diff = merge_diff(old_member, new_member);
                if member_diff != JsonValue::Object(serde_json::Map::new()) {
                    diff.insert(name.clone(), member_diff);
                }
            }
            None => {
                diff.insert(name.clone(), new_member.clone());
            }
        }
    }
    for name in old_members.keys() {
        if !new_members.contains_key(name) {
            diff.insert(name.clone(), JsonValue::Null);
        }
    }
    JsonValue::Object(diff)
}

/// Apply a merge patch to a typed value through its JSON codec.
pub fn json_merge_patch(
    engine: &Engine,
    descriptor: &TypeDescriptor,
    value: &Value,
    patch: &JsonValue,
) -> Result<Value, PatchError> {
    let codec = engine.json_codec(descriptor)?;
    let bindings = Bindings::root();
    let document = codec.encode(value, &bindings)?;
    Ok(codec.decode(merge_patch(document, patch), &bindings)?)
}

/// The merge patch between the JSON representations of two typed values.
pub fn json_merge_diff(
    engine: &Engine,
    descriptor: &TypeDescriptor,
    old: &Value,
    new: &Value,
) -> Result<JsonValue, PatchError> {
    let codec = engine.json_codec(descriptor)?;
    let bindings = Bindings::root();
    Ok(merge_diff(
        &codec.encode(old, &bindings)?,
        &codec.encode(new, &bindings)?,
    ))
}
