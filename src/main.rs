use anyhow::{bail, Context as _};
use clap::{command, value_parser, Arg, ArgMatches};
use context::Context;
use log::{info, warn};
use std::path::PathBuf;

mod context;
mod generator;
mod metadata;
mod renderer;

const VERSION: &str = include_str!("../.version");

fn path_arg(matches: &ArgMatches, name: &str) -> anyhow::Result<PathBuf> {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .with_context(|| format!("{name} is required"))
}

/// Logs at `info` unless `filter_env` says otherwise, so every rendered page
/// is listed by default.
fn logger(filter_env: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(filter_env, "info"))
}

fn main() -> anyhow::Result<()> {
    logger("RUST_LOG").init();

    let matches = command!()
        .args([
            Arg::new("article_dir")
                .help("Directory of markdown articles, laid out as <year>/<month>/")
                .value_parser(value_parser!(PathBuf))
                .default_value("../../xbarapp.com/articles"),
            Arg::new("out_dir")
                .help("Directory the pages and assets are written to")
                .value_parser(value_parser!(PathBuf))
                .default_value("../../xbarapp.com/public/docs"),
            Arg::new("template_dir")
                .help("Directory holding _layout.html and article.html")
                .value_parser(value_parser!(PathBuf))
                .default_value("../../xbarapp.com/templates"),
            Arg::new("categories_json")
                .help("Category index generated by an earlier build step")
                .value_parser(value_parser!(PathBuf))
                .default_value("../../xbarapp.com/public/docs/plugins/categories.json"),
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .help("Number of articles rendered at once [default: available cores]")
                .value_parser(value_parser!(usize)),
            Arg::new("site_base")
                .long("site-base")
                .help("Absolute URL hero images are resolved against")
                .default_value("https://xbarapp.com/docs/"),
        ])
        .get_matches();

    let article_dir = path_arg(&matches, "article_dir")?;
    if !article_dir.is_dir() {
        bail!("article_dir must be a directory.");
    }
    let out_dir = path_arg(&matches, "out_dir")?;
    if out_dir.exists() && !out_dir.is_dir() {
        bail!("if out_dir exists, it must be directory.");
    }
    let template_dir = path_arg(&matches, "template_dir")?;
    if !template_dir.is_dir() {
        bail!("template_dir must be a directory.");
    }
    let categories_json = path_arg(&matches, "categories_json")?;

    let jobs = match matches.get_one::<usize>("jobs") {
        Some(jobs) => *jobs,
        None => std::thread::available_parallelism().map_or(1, |n| n.get()),
    };
    let site_base = matches
        .get_one::<String>("site_base")
        .cloned()
        .context("site_base is required")?;

    let ctx = Context {
        article_dir,
        out_dir,
        version: VERSION.trim().to_string(),
        site_base,
        jobs,
        handlebars: renderer::generate_renderer(&template_dir).context("generator")?,
        categories: metadata::load_categories(&categories_json)
            .context("read categories.json")?,
    };

    let report = generator::generate(&ctx)?;
    info!("{} articles rendered", report.rendered.len());
    if !report.failed.is_empty() {
        warn!("{} articles skipped", report.failed.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn logs_info_by_default() {
        let logger = logger("BLOGGEN_TEST_UNSET_LOG_FILTER").build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }

    #[test]
    fn version_marker_is_embedded() {
        assert!(!VERSION.trim().is_empty());
        assert!(!VERSION.trim().contains('\n'));
    }
}
