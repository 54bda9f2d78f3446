//! Destination directory and output filename for queued episodes.
//!
//! By default names are used exactly as scraped: the collection title becomes
//! one path segment under the configured download path and the episode title
//! becomes `<title>.mp4`. With sanitizing on, both pass through
//! [`sanitize_name`] first.

mod sanitize;

pub use sanitize::sanitize_name;

/// Extension given to every output file.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Fallback when sanitizing leaves nothing usable.
const FALLBACK_NAME: &str = "untitled";

/// POSIX-style join of the download root and the collection directory.
///
/// The result is normalized: repeated `/` collapse, `.` segments drop out and
/// `..` pops the previous segment (never above `/`). An empty root yields the
/// collection alone, relative to the daemon's own default directory.
pub fn join_dir(base: &str, collection: &str) -> String {
    let joined = match (base.is_empty(), collection.is_empty()) {
        (true, true) => return ".".to_string(),
        (true, false) => collection.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{collection}"),
    };
    normalize(&joined)
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }

    let body = parts.join("/");
    let suffix = if trailing { "/" } else { "" };
    match (absolute, body.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{body}{suffix}"),
        (false, true) => format!(".{suffix}"),
        (false, false) => format!("{body}{suffix}"),
    }
}

/// `<title>.mp4`
pub fn output_name(title: &str) -> String {
    format!("{title}.{OUTPUT_EXTENSION}")
}

/// How scraped titles turn into `dir` / `out` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Naming {
    pub sanitize: bool,
}

impl Naming {
    pub fn new(sanitize: bool) -> Self {
        Self { sanitize }
    }

    pub fn dir(&self, base: &str, collection: &str) -> String {
        join_dir(base, &self.segment(collection))
    }

    pub fn out(&self, title: &str) -> String {
        output_name(&self.segment(title))
    }

    fn segment(&self, raw: &str) -> String {
        if !self.sanitize {
            return raw.to_string();
        }
        let clean = sanitize_name(raw);
        if clean.is_empty() || clean == "." || clean == ".." {
            FALLBACK_NAME.to_string()
        } else {
            clean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_dir_cases() {
        assert_eq!(join_dir("/srv/media", "S1"), "/srv/media/S1");
        assert_eq!(join_dir("/srv/media/", "S1"), "/srv/media/S1");
        assert_eq!(join_dir("/", "S1"), "/S1");
        assert_eq!(join_dir("", "S1"), "S1");
    }

    #[test]
    fn join_dir_normalizes() {
        assert_eq!(join_dir("/srv//media", "S1"), "/srv/media/S1");
        assert_eq!(join_dir(".", "S1"), "S1");
        assert_eq!(join_dir("./downloads/", "S1"), "downloads/S1");
        assert_eq!(join_dir("/srv/media/../video", "S1"), "/srv/video/S1");
        assert_eq!(join_dir("/", ".."), "/");
        assert_eq!(join_dir("..", "S1"), "../S1");
        assert_eq!(join_dir("a", "../.."), "..");
        assert_eq!(join_dir("/srv/media", "S1/"), "/srv/media/S1/");
        assert_eq!(join_dir("", ""), ".");
    }

    #[test]
    fn output_name_appends_mp4() {
        assert_eq!(output_name("Episode 1"), "Episode 1.mp4");
        assert_eq!(output_name(""), ".mp4");
    }

    #[test]
    fn raw_naming_skips_sanitizing() {
        let naming = Naming::default();
        assert_eq!(naming.dir("/data", "Season 1"), "/data/Season 1");
        assert_eq!(naming.dir("/data", "../escape"), "/escape");
        assert_eq!(naming.out("a/b"), "a/b.mp4");
    }

    #[test]
    fn sanitized_naming_strips_separators() {
        let naming = Naming::new(true);
        assert_eq!(naming.dir("/data", "../escape"), "/data/escape");
        assert_eq!(naming.out("a/b"), "a_b.mp4");
        assert_eq!(naming.dir("/data", ".."), "/data/untitled");
        assert_eq!(naming.out("  Episode 3  "), "Episode 3.mp4");
    }
}
