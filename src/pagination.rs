//! Cursor pagination as advertised in Sentry's `Link` response header:
//!
//! ```text
//! <https://sentry.io/api/0/...&cursor=0:0:1>; rel="previous"; results="false"; cursor="0:0:1",
//! <https://sentry.io/api/0/...&cursor=0:100:0>; rel="next"; results="true"; cursor="0:100:0"
//! ```

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub previous: Option<LinkPage>,
    pub next: Option<LinkPage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPage {
    pub url: String,
    /// `false` when following the link would return an empty page.
    pub results: bool,
    pub cursor: String,
}

impl Link {
    pub fn parse(header: &str) -> Self {
        let mut link = Link::default();

        for segment in header.split(',') {
            let mut parts = segment.split(';').map(str::trim);
            let Some(url) = parts
                .next()
                .and_then(|url| url.strip_prefix('<'))
                .and_then(|url| url.strip_suffix('>'))
            else {
                continue;
            };

            let mut rel = None;
            let mut results = false;
            let mut cursor = None;
            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                let value = value.trim().trim_matches('"');
                match key.trim() {
                    "rel" => rel = Some(value),
                    "results" => results = value == "true",
                    "cursor" => cursor = Some(value.to_string()),
                    _ => {}
                }
            }

            let (Some(rel), Some(cursor)) = (rel, cursor) else {
                continue;
            };
            let page = LinkPage {
                url: url.to_string(),
                results,
                cursor,
            };
            match rel {
                "previous" => link.previous = Some(page),
                "next" => link.next = Some(page),
                _ => {}
            }
        }

        link
    }

    /// Cursor of the next page, if there is one with results.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next
            .as_ref()
            .filter(|page| page.results)
            .map(|page| page.cursor.as_str())
    }

    pub fn has_next(&self) -> bool {
        self.next_cursor().is_some()
    }
}
