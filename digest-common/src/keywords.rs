use regex::Regex;

/// Compiled keyword watchlist.
///
/// A keyword matches case-insensitively when neither neighbour of the match is
/// a letter, a digit or an underscore. Keywords are literal text, regex
/// syntax has no effect.
pub struct KeywordMatcher {
    keywords: Vec<(String, Regex)>,
}

impl KeywordMatcher {
    /// Parses a comma separated list; blank entries are ignored.
    pub fn new(keywords_csv: &str) -> Self {
        let keywords = keywords_csv
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .filter_map(|k| {
                let pattern = format!(
                    r"(?i)(?:^|[^\p{{L}}\p{{N}}_]){}(?:$|[^\p{{L}}\p{{N}}_])",
                    regex::escape(k)
                );

                match Regex::new(&pattern) {
                    Ok(regex) => Some((k.to_string(), regex)),
                    Err(error) => {
                        tracing::warn!(%error, keyword = k, "skipping keyword");
                        None
                    }
                }
            })
            .collect();

        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords found in `text`, in watchlist order.
    pub fn find(&self, text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }
}

pub fn match_keywords(text: &str, keywords_csv: &str) -> Vec<String> {
    KeywordMatcher::new(keywords_csv).find(text)
}
