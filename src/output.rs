use crate::error::{Error, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

const MIDI_EXTENSIONS: [&str; 2] = ["mid", "midi"];

/// `dir/song.mid` becomes `dir/song_<suffix>.mid`
pub fn derived_output_path(input: &Path, suffix: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| Error::InvalidOutputPath(format!("{} has no file name", input.display())))?;
    let mut name = OsString::from(stem);
    name.push(format!("_{}", suffix));
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    Ok(input.with_file_name(name))
}

fn has_midi_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map_or(false, |extension| {
            MIDI_EXTENSIONS
                .iter()
                .any(|midi| extension.eq_ignore_ascii_case(midi))
        })
}

/// Where an operation on `input` writes its result.
///
/// Without an explicit name the suffix is inserted before the extension. An
/// explicit name gets `.mid` appended unless it already ends in `.mid` or
/// `.midi`, and a bare file name lands next to the input file.
pub fn output_path(input: &Path, explicit: Option<&Path>, suffix: &str) -> Result<PathBuf> {
    let explicit = match explicit {
        Some(explicit) => explicit,
        None => return derived_output_path(input, suffix),
    };
    if explicit.file_name().is_none() {
        return Err(Error::InvalidOutputPath(format!(
            "{} has no file name",
            explicit.display()
        )));
    }
    let mut path = if explicit.parent() == Some(Path::new("")) {
        input
            .parent()
            .map_or_else(|| explicit.to_path_buf(), |dir| dir.join(explicit))
    } else {
        explicit.to_path_buf()
    };
    if !has_midi_extension(&path) {
        let mut name = path.as_os_str().to_owned();
        name.push(".mid");
        path = PathBuf::from(name);
    }
    Ok(path)
}
