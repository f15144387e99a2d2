use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;

/// Reads the publish month out of a destination-relative path shaped like
/// `<year>/<month>/...`.
pub(super) fn parse_article_date(dest_relative: &Path) -> anyhow::Result<NaiveDate> {
    let mut segments = dest_relative.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy()),
        _ => None,
    });
    let (Some(year), Some(month)) = (segments.next(), segments.next()) else {
        bail!("expected <year>/<month>/ at the start of {:?}", dest_relative);
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        bail!("invalid year {:?} in {:?}", year, dest_relative);
    }
    if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        bail!("invalid month {:?} in {:?}", month, dest_relative);
    }

    NaiveDate::parse_from_str(&format!("{month}/{year}/01"), "%m/%Y/%d")
        .with_context(|| format!("invalid date {month}/{year}"))
}

pub(super) fn first_line(content: &str) -> &str {
    content.split('\n').next().unwrap_or_default()
}

/// Source of the first line that starts with an image, e.g. `images/hero.png`
/// for `![alt](images/hero.png)`.
pub(super) fn find_hero_image(content: &str) -> Option<&str> {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("!["))?;
    let (_, rest) = line.split_once("](")?;
    Some(rest.split_once(')').map_or(rest, |(src, _)| src))
}

pub(super) fn image_url(site_base: &str, dest_relative: &Path, src: &str) -> String {
    let dir = dest_relative.parent().unwrap_or(Path::new(""));
    // joined, not replaced: `/img.png` still lives under the article dir
    let resolved = normalize(&dir.join(src.trim_start_matches('/')));
    format!("{site_base}{}", url_path(&resolved))
}

pub(super) fn derive_title(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace('-', " "))
        .unwrap_or_default()
}

pub(super) fn html_file_name(source: &Path) -> String {
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}.html").to_lowercase()
}

/// Lexically resolves `.` and `..`. A `..` that climbs past the start is kept.
pub(super) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::Normal(s) => out.push(s),
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

pub(crate) fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
