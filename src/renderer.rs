use std::path::Path;

use anyhow::Context;
use handlebars::Handlebars;

pub(crate) const LAYOUT_TEMPLATE: &str = "_layout.html";
pub(crate) const ARTICLE_TEMPLATE: &str = "article.html";

/// Name the article page is rendered under. The article template pulls the
/// layout in as a partial block, so one render produces the whole page.
pub(crate) const ARTICLE: &str = "article";
pub(crate) const LAYOUT: &str = "layout";

pub(crate) fn generate_renderer(template_dir: &Path) -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    // missing fields fail the render instead of producing an empty string
    handlebars.set_strict_mode(true);
    handlebars.register_partial(
        LAYOUT,
        std::fs::read_to_string(template_dir.join(LAYOUT_TEMPLATE)).context(LAYOUT_TEMPLATE)?,
    )?;
    handlebars
        .register_template_file(ARTICLE, template_dir.join(ARTICLE_TEMPLATE))
        .context(ARTICLE_TEMPLATE)?;

    Ok(handlebars)
}
