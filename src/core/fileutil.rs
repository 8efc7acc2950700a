use std::path::Path;

/// Path handling for Include directives and asset references. Separators are
/// normalized to forward slashes so scenes authored on Windows resolve on
/// any platform.

pub fn standardize_path_separator(path: &str) -> String {
    path.replace('\\', "/")
}

/// Split a path into its directory part and file name. A path with no
/// separator lives in ".".
pub fn path_and_filename(file: &str) -> (String, String) {
    let file = standardize_path_separator(file);

    match file.rfind('/') {
        Some(p) => (file[..p].to_owned(), file[p + 1..].to_owned()),
        None => (".".to_owned(), file),
    }
}

/// Resolve `path` against `position` (the directory of the including file).
/// Absolute paths and drive-qualified paths pass through unchanged.
pub fn concatenate_paths(position: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let path = standardize_path_separator(path);
    let bytes = path.as_bytes();

    if bytes[0] == b'/' || (path.len() > 3 && bytes[1] == b':' && bytes[2] == b'/') {
        path
    } else {
        format!("{}/{}", position, path)
    }
}

pub fn has_extension<P: AsRef<Path>>(name: P, ext: &str) -> bool {
    name.as_ref()
        .extension()
        .map(|x| x.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
