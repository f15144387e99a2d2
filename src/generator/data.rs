use serde::Serialize;
use std::path::PathBuf;

use crate::metadata::Categories;

use super::utils::html_file_name;

/// A markdown file found under the article dir.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Article {
    pub source: PathBuf,
    /// `source` relative to the article dir.
    pub relative: PathBuf,
}

impl Article {
    /// Output path relative to the out dir: same directory, lower-cased
    /// file name with an `.html` extension.
    pub fn dest_relative(&self) -> PathBuf {
        let name = html_file_name(&self.relative);
        match self.relative.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

#[derive(Serialize, Debug)]
pub(super) struct ArticlePageData<'a> {
    pub version: &'a str,
    pub last_updated_formatted: String,
    pub current_category_path: &'a str,
    pub categories: &'a Categories,

    pub path: String,
    pub article_time_str: String,
    pub title: String,
    pub desc: &'a str,
    pub image_url: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn article(relative: &str) -> Article {
        Article {
            source: Path::new("/src").join(relative),
            relative: PathBuf::from(relative),
        }
    }

    #[test]
    fn dest_keeps_directory_and_lower_cases_name() {
        assert_eq!(
            article("2023/04/My-Post.md").dest_relative(),
            PathBuf::from("2023/04/my-post.html")
        );
        assert_eq!(
            article("Drafts/Idea.md").dest_relative(),
            PathBuf::from("Drafts/idea.html")
        );
        assert_eq!(article("top.md").dest_relative(), PathBuf::from("top.html"));
    }
}
