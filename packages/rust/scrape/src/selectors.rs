//! Every assumption about the project site's markup lives here.
//!
//! Project containers on the listing page have no class or id; they are
//! recognised only by an exact inline `style` string. If the site changes its
//! markup, this is the file to edit.

use scraper::{ElementRef, Html, Selector};

use projectbook_shared::{MarkupConfig, ProjectBookError, Result};

/// Raw fields pulled out of one listing container, before URL resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub id: String,
    pub title: String,
    pub href: String,
}

/// Compiled selectors for the listing and detail pages.
#[derive(Debug)]
pub struct Markup {
    container_style: String,
    id_attribute: String,
    styled_div: Selector,
    paragraph: Selector,
    link: Selector,
    description: Selector,
}

impl Markup {
    /// Compile selectors from the `[markup]` config section.
    pub fn new(config: &MarkupConfig) -> Result<Self> {
        Ok(Self {
            container_style: config.container_style.clone(),
            id_attribute: config.id_attribute.clone(),
            styled_div: parse_selector("div[style]")?,
            paragraph: parse_selector("p")?,
            link: parse_selector("a")?,
            description: parse_selector(&format!("div[{}]", config.description_attribute))?,
        })
    }

    /// Project containers in document order.
    pub fn containers<'a>(&'a self, doc: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        doc.select(&self.styled_div)
            .filter(|el| el.value().attr("style") == Some(self.container_style.as_str()))
    }

    /// Pull id, title and link out of one container.
    ///
    /// The first `<p>` holds the id attribute; its first `<a>` holds the title
    /// text and the detail link.
    pub fn extract_item(&self, container: ElementRef<'_>) -> std::result::Result<RawItem, String> {
        let paragraph = container
            .select(&self.paragraph)
            .next()
            .ok_or("no <p> element")?;

        let link = paragraph
            .select(&self.link)
            .next()
            .ok_or("no <a> element inside the first <p>")?;

        let id = paragraph
            .value()
            .attr(&self.id_attribute)
            .ok_or_else(|| format!("first <p> has no `{}` attribute", self.id_attribute))?;

        let href = link.value().attr("href").ok_or("link has no href")?;

        Ok(RawItem {
            id: id.to_string(),
            title: link.text().collect::<String>().trim().to_string(),
            href: href.to_string(),
        })
    }

    /// The description element of a detail page, if present.
    pub fn description<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&self.description).next()
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ProjectBookError::config(format!("invalid markup selector '{css}': {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup() -> Markup {
        Markup::new(&MarkupConfig::default()).unwrap()
    }

    fn container(style: &str, inner: &str) -> String {
        format!(r#"<div style="{style}">{inner}</div>"#)
    }

    #[test]
    fn only_exact_style_matches() {
        let style = MarkupConfig::default().container_style;
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            container(&style, "<p>one</p>"),
            container("padding : 15px 15px;", "<p>not a project</p>"),
            container(&style, "<p>two</p>"),
        );
        let doc = Html::parse_document(&html);
        let m = markup();
        let texts: Vec<String> = m
            .containers(&doc)
            .map(|el| el.text().collect::<String>())
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn extract_item_reads_first_paragraph() {
        let style = MarkupConfig::default().container_style;
        let html = container(
            &style,
            r#"<p data-project-title="17"><a href="details.php?id=17"> Graph Colouring </a></p>
               <p data-project-title="99"><a href="other.php">Ignored</a></p>"#,
        );
        let doc = Html::parse_document(&html);
        let m = markup();
        let el = m.containers(&doc).next().unwrap();
        let item = m.extract_item(el).unwrap();
        assert_eq!(
            item,
            RawItem {
                id: "17".into(),
                title: "Graph Colouring".into(),
                href: "details.php?id=17".into(),
            }
        );
    }

    #[test]
    fn extract_item_names_what_is_missing() {
        let style = MarkupConfig::default().container_style;
        let m = markup();

        let doc = Html::parse_document(&container(&style, "<span>no paragraph</span>"));
        let err = m.extract_item(m.containers(&doc).next().unwrap()).unwrap_err();
        assert!(err.contains("<p>"));

        let doc = Html::parse_document(&container(&style, r#"<p><a href="x">T</a></p>"#));
        let err = m.extract_item(m.containers(&doc).next().unwrap()).unwrap_err();
        assert!(err.contains("data-project-title"));

        let doc = Html::parse_document(&container(&style, r#"<p data-project-title="1">T</p>"#));
        let err = m.extract_item(m.containers(&doc).next().unwrap()).unwrap_err();
        assert!(err.contains("<a>"));
    }

    #[test]
    fn invalid_description_attribute_is_config_error() {
        let config = MarkupConfig {
            description_attribute: "data-]broken".into(),
            ..MarkupConfig::default()
        };
        let err = Markup::new(&config).unwrap_err();
        assert!(matches!(err, ProjectBookError::Config { .. }));
    }
}
