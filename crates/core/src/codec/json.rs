//! JSON summary codec (serialize only).

use serde_json::{Map, Value};

use crate::meta::{MediaMetadata, MetadataError, SUMMARY_TAGS};

/// Builds the summary object: mimetype, file, size, duration (`HH:MM:SS`),
/// chapters, and whichever allow-listed tags are present.
pub fn summary(meta: &MediaMetadata) -> Result<Value, MetadataError> {
    let mimetype = mime_guess::from_path(&meta.format.filename)
        .first_raw()
        .unwrap_or_default();

    let mut obj = Map::new();
    obj.insert("mimetype".to_string(), Value::from(mimetype));
    obj.insert("file".to_string(), Value::from(meta.format.filename.clone()));
    obj.insert("size".to_string(), Value::from(meta.format.size.clone()));
    obj.insert("duration".to_string(), Value::from(meta.format.hhmmss()));
    obj.insert("chapters".to_string(), serde_json::to_value(&meta.chapters)?);

    for (key, value) in &meta.format.tags {
        if SUMMARY_TAGS.contains(&key.as_str()) {
            obj.insert(key.clone(), Value::from(value.clone()));
        }
    }

    Ok(Value::Object(obj))
}

/// Serializes the summary as compact JSON text.
pub fn serialize(meta: &MediaMetadata) -> Result<String, MetadataError> {
    Ok(serde_json::to_string(&summary(meta)?)?)
}
