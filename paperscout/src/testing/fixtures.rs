//! Page fixtures shaped like the scraped search pages.

/// One result item of a repository search results page.
#[derive(Debug, Clone, Default)]
pub struct ResultItem {
    /// Link target; `None` renders an item without a name link.
    pub href: Option<String>,
    /// Link text.
    pub link_text: String,
    /// Description paragraph.
    pub description: Option<String>,
    /// Language tag.
    pub language: Option<String>,
    /// Star link text.
    pub stars: Option<String>,
    /// Fork link text.
    pub forks: Option<String>,
}

impl ResultItem {
    /// Creates an item linking to `/<owner>/<name>` with `owner/name` as text.
    #[must_use]
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            href: Some(format!("/{owner}/{name}")),
            link_text: format!("{owner}/{name}"),
            ..Default::default()
        }
    }

    /// Creates an item with an arbitrary link target.
    #[must_use]
    pub fn with_href(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            link_text: href.trim_start_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Creates an item with no name link at all.
    #[must_use]
    pub fn without_link() -> Self {
        Self {
            description: Some("Sponsored".to_string()),
            ..Default::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Sets the language.
    #[must_use]
    pub fn language(mut self, text: &str) -> Self {
        self.language = Some(text.to_string());
        self
    }

    /// Sets the star link text.
    #[must_use]
    pub fn stars(mut self, text: &str) -> Self {
        self.stars = Some(text.to_string());
        self
    }

    /// Sets the fork link text.
    #[must_use]
    pub fn forks(mut self, text: &str) -> Self {
        self.forks = Some(text.to_string());
        self
    }

    fn render(&self) -> String {
        let base = self.href.as_deref().unwrap_or("/unknown/unknown");
        let mut html = String::from("<li><div data-testid=\"results-list-item\">");

        if let Some(href) = &self.href {
            html.push_str(&format!(
                "<div class=\"title\"><a href=\"{href}\" data-hydro-click=\"search_result.click\">\n    {}\n</a></div>",
                self.link_text
            ));
        }
        if let Some(description) = &self.description {
            html.push_str(&format!("<p>{description}</p>"));
        }

        html.push_str("<ul class=\"meta\">");
        if let Some(language) = &self.language {
            html.push_str(&format!(
                "<li><span itemprop=\"programmingLanguage\">{language}</span></li>"
            ));
        }
        if let Some(stars) = &self.stars {
            html.push_str(&format!(
                "<li><a href=\"{base}/stargazers\"><svg></svg><span>{stars}</span></a></li>"
            ));
        }
        if let Some(forks) = &self.forks {
            html.push_str(&format!(
                "<li><a href=\"{base}/network/members\"><span>{forks}</span></a></li>"
            ));
        }
        html.push_str("</ul></div></li>");
        html
    }
}

/// Renders a repository search results page containing `items`.
#[must_use]
pub fn results_page(items: &[ResultItem]) -> String {
    let rendered: String = items.iter().map(ResultItem::render).collect();
    format!(
        "<!DOCTYPE html><html><head><title>Search results</title></head><body>\
         <main><div><ul data-testid=\"results-list\">{rendered}</ul></div></main>\
         </body></html>"
    )
}

/// Renders a bare anchor as found in unstructured page markup.
#[must_use]
pub fn repo_anchor(path: &str, text: &str) -> String {
    format!("<a href=\"{path}\" class=\"Link--secondary\">{text}</a>")
}

/// Renders a video results page body with one embedded entry per
/// `(video_id, title)` pair.
#[must_use]
pub fn video_page(entries: &[(&str, &str)]) -> String {
    let payload: String = entries
        .iter()
        .map(|(id, title)| {
            format!(
                r#"{{"videoRenderer":{{"videoId":"{id}","thumbnail":{{"thumbnails":[]}},"title":{{"runs":[{{"text":"{title}"}}]}}}}}},"#
            )
        })
        .collect();
    format!(
        "<!DOCTYPE html><html><body><script>var ytInitialData = {{\"contents\":[{payload}]}};</script></body></html>"
    )
}
