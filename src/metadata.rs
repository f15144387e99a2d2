use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the externally generated category index.
///
/// Only `path` is interpreted; every other field is carried through to the
/// templates untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct Category {
    pub path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
struct CategoryIndex {
    #[serde(rename = "Categories")]
    categories: Vec<Category>,
}

pub(crate) type Categories = BTreeMap<String, Category>;

pub(crate) fn load_categories(categories_json: &Path) -> anyhow::Result<Categories> {
    let fd = File::open(categories_json)
        .with_context(|| format!("read {:?}", categories_json))?;
    let reader = BufReader::new(fd);
    let index: CategoryIndex = serde_json::from_reader(reader)
        .with_context(|| format!("parse {:?}", categories_json))?;

    Ok(index
        .categories
        .into_iter()
        .map(|c| (c.path.clone(), c))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("categories.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn keys_categories_by_path() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            r#"{"Categories": [
                {"path": "dev", "text": "Dev", "children": []},
                {"path": "web", "text": "Web"}
            ]}"#,
        );

        let categories = load_categories(&path).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories["dev"].path, "dev");
        assert_eq!(categories["web"].extra["text"], "Web");
        assert!(categories["dev"].extra["children"].is_array());
    }

    #[test]
    fn passes_unknown_fields_through() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, r#"{"Categories": [{"path": "a", "n": 3}]}"#);

        let categories = load_categories(&path).unwrap();
        let value = serde_json::to_value(&categories["a"]).unwrap();
        assert_eq!(value, serde_json::json!({"path": "a", "n": 3}));
    }

    #[test]
    fn later_duplicate_wins() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            r#"{"Categories": [{"path": "a", "v": 1}, {"path": "a", "v": 2}]}"#,
        );

        let categories = load_categories(&path).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories["a"].extra["v"], 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_categories(&tmp.path().join("nope.json")).is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "{not json");
        assert!(load_categories(&path).is_err());
    }

    #[test]
    fn category_without_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, r#"{"Categories": [{"text": "x"}]}"#);
        assert!(load_categories(&path).is_err());
    }
}
