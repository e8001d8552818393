//! NSKeyedArchiver string-array decoding.
//!
//! GameTrack stores platform and genre lists as keyed-archiver property lists:
//! a `$objects` table where the root object holds an `NS.objects` list of UID
//! references back into that table. This module decodes exactly that shape,
//! a flat array of strings, and nothing else.

use std::io::Cursor;

use plist::{Dictionary, Value};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("plist parse error: {0}")]
    Plist(#[from] plist::Error),

    #[error("archive is not a dictionary")]
    NotADictionary,

    #[error("archive has no $objects table")]
    MissingObjects,

    #[error("archive root object {0} is missing or not a dictionary")]
    MissingRoot(u64),

    #[error("archive root has no NS.objects list")]
    NotAnArray,
}

/// Decode a keyed-archiver blob into the strings its root array references.
///
/// References that point outside the object table, or at anything other than
/// a string, are skipped.
pub fn decode_string_array(data: &[u8]) -> Result<Vec<String>, ArchiveError> {
    let value = Value::from_reader(Cursor::new(data))?;
    let archive = value.as_dictionary().ok_or(ArchiveError::NotADictionary)?;
    let objects = archive
        .get("$objects")
        .and_then(Value::as_array)
        .ok_or(ArchiveError::MissingObjects)?;

    let root_index = root_uid(archive).unwrap_or(1);
    let root = usize::try_from(root_index)
        .ok()
        .and_then(|i| objects.get(i))
        .and_then(Value::as_dictionary)
        .ok_or(ArchiveError::MissingRoot(root_index))?;

    let refs = root
        .get("NS.objects")
        .and_then(Value::as_array)
        .ok_or(ArchiveError::NotAnArray)?;

    let strings = refs
        .iter()
        .filter_map(Value::as_uid)
        .filter_map(|uid| usize::try_from(uid.get()).ok())
        .filter_map(|idx| objects.get(idx))
        .filter_map(Value::as_string)
        .map(str::to_string)
        .collect();

    Ok(strings)
}

/// Decode an optional blob, mapping every failure to an empty list.
///
/// This is the only entry point record extraction uses: a broken list column
/// must never fail the row.
pub fn string_array_or_empty(data: Option<&[u8]>) -> Vec<String> {
    let Some(data) = data.filter(|d| !d.is_empty()) else {
        return Vec::new();
    };
    match decode_string_array(data) {
        Ok(strings) => strings,
        Err(e) => {
            log::debug!("Ignoring undecodable archive blob ({} bytes): {e}", data.len());
            Vec::new()
        }
    }
}

/// `$top.root`, when the archive declares it.
fn root_uid(archive: &Dictionary) -> Option<u64> {
    archive
        .get("$top")
        .and_then(Value::as_dictionary)
        .and_then(|top| top.get("root"))
        .and_then(Value::as_uid)
        .map(|uid| uid.get())
}
