use std::path::PathBuf;

use crate::metadata::Categories;

/// Everything an article render needs, built once at startup and shared
/// read-only by every render job.
#[derive(Debug)]
pub(crate) struct Context {
    pub article_dir: PathBuf,
    pub out_dir: PathBuf,

    pub version: String,
    pub site_base: String,
    pub jobs: usize,

    pub handlebars: handlebars::Handlebars<'static>,
    pub categories: Categories,
}
