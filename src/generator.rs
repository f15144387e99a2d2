use std::{
    collections::VecDeque,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use log::{debug, error, info};
use pulldown_cmark::{html, Options, Parser};
use rayon::prelude::*;

use crate::{context::Context, renderer::ARTICLE};

mod data;
pub(crate) mod utils;

use data::{Article, ArticlePageData};
use utils::{derive_title, find_hero_image, first_line, image_url, parse_article_date, url_path};

/// `02 Jan 06 15:04 -0700`
pub(crate) const RFC822: &str = "%d %b %y %H:%M %z";

#[derive(Debug, Default)]
pub(crate) struct BuildReport {
    /// Destination-relative paths of the pages written.
    pub rendered: Vec<PathBuf>,
    /// Source paths of the articles that were skipped.
    pub failed: Vec<PathBuf>,
}

fn copy_asset(from: &Path, to: &Path) -> anyhow::Result<()> {
    if let Some(parent) = to.parent() {
        fs_extra::dir::create_all(parent, false)
            .with_context(|| format!("while creating {:?}", parent))?;
    }
    let mut opts = fs_extra::file::CopyOptions::new();
    opts.overwrite = true;
    fs_extra::file::copy(from, to, &opts)
        .with_context(|| format!("while copying {:?} to {:?}", from, to))?;
    debug!("copied {:?}", to);

    Ok(())
}

/// Walks `article_dir`, copying every asset into `out_dir` and returning the
/// markdown files left to render. Dot-named files are skipped; dot-named
/// directories are still walked.
pub(crate) fn collect_articles(ctx: &Context) -> anyhow::Result<Vec<Article>> {
    let mut articles = vec![];

    let mut q = VecDeque::new();
    q.push_back(PathBuf::new());
    while let Some(path) = q.pop_front() {
        let current_searching_directory_path = ctx.article_dir.join(&path);

        for entry in std::fs::read_dir(&current_searching_directory_path)
            .with_context(|| format!("while reading {:?}", current_searching_directory_path))?
        {
            let entry = entry?;
            let relative = path.join(entry.file_name());
            // follows symlinks
            let meta = std::fs::metadata(entry.path())
                .with_context(|| format!("while inspecting {:?}", entry.path()))?;

            if meta.is_dir() {
                q.push_back(relative);
            } else if meta.is_file() {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                if relative.extension().is_some_and(|ext| ext == "md") {
                    articles.push(Article {
                        source: entry.path(),
                        relative,
                    });
                } else {
                    copy_asset(&entry.path(), &ctx.out_dir.join(&relative))?;
                }
            }
        }
    }

    articles.sort();
    Ok(articles)
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

/// Renders one article to `out_dir`, returning its destination-relative path.
pub(crate) fn generate_article(ctx: &Context, article: &Article) -> anyhow::Result<PathBuf> {
    let dest_relative = article.dest_relative();

    let date = parse_article_date(&dest_relative).context("parse time from path")?;
    debug!("{:?} is dated {}", dest_relative, date.format("%Y/%m"));

    let bytes = std::fs::read(&article.source)
        .with_context(|| format!("while reading {:?}", article.source))?;
    let content = String::from_utf8_lossy(&bytes);

    let image_url = find_hero_image(&content)
        .map(|src| image_url(&ctx.site_base, &dest_relative, src))
        .unwrap_or_default();

    let mut body_html = String::new();
    html::push_html(&mut body_html, Parser::new_ext(&content, markdown_options()));

    let out_path = ctx.out_dir.join(&dest_relative);
    if let Some(parent) = out_path.parent() {
        fs_extra::dir::create_all(parent, false)
            .with_context(|| format!("while creating {:?}", parent))?;
    }
    let fd = File::create(&out_path).with_context(|| format!("create {:?}", out_path))?;
    let mut writer = BufWriter::new(fd);

    let data = ArticlePageData {
        version: &ctx.version,
        last_updated_formatted: chrono::Local::now().format(RFC822).to_string(),
        current_category_path: "",
        categories: &ctx.categories,

        path: url_path(&dest_relative),
        article_time_str: date.format("%B %Y").to_string(),
        title: derive_title(&article.source),
        desc: first_line(&content),
        image_url,
        html: body_html,
    };
    ctx.handlebars
        .render_to_write(ARTICLE, &data, &mut writer)
        .context("render")?;
    writer
        .flush()
        .with_context(|| format!("while writing {:?}", out_path))?;

    Ok(dest_relative)
}

/// Copies assets, then renders every article on a pool of `ctx.jobs` workers.
///
/// Only the walk can fail the build. A failing article is logged and listed
/// in the report; the others still render.
pub(crate) fn generate(ctx: &Context) -> anyhow::Result<BuildReport> {
    let articles = collect_articles(ctx)?;
    info!("{} articles found", articles.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ctx.jobs.max(1))
        .build()
        .context("while starting render workers")?;

    let results: Vec<_> = pool.install(|| {
        articles
            .par_iter()
            .map(|article| {
                let result = generate_article(ctx, article);
                match &result {
                    Ok(dest) => info!("{}", url_path(dest)),
                    Err(e) => error!("{}: {:#}", article.source.display(), e),
                }
                (article, result)
            })
            .collect()
    });

    let mut report = BuildReport::default();
    for (article, result) in results {
        match result {
            Ok(dest) => report.rendered.push(dest),
            Err(_) => report.failed.push(article.source.clone()),
        }
    }

    Ok(report)
}
