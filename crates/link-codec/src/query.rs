//! The parameter bag shared by every link format.
//!
//! Links have been issued in three shapes over time:
//! `base?c=..&i=..#p=..`, `base#?c=..&i=..&p=..` and a bare `base?c=..&p=..`.
//! All of them parse into one ordered key/value bag where the first
//! occurrence of a key wins.

use indexmap::IndexMap;
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::error::LinkError;
use crate::params::{KEY_CHAIN, KEY_INDEX, KEY_PASSWORD, KEY_TRACK, KEY_VERSION, RESERVED_KEYS};

/// Characters left unescaped in chain and index lists.
const LIST_SAFE: &[char] = &['(', ')', ',', '-', '.', '_', '*'];

#[derive(Debug, Clone)]
pub(crate) struct ParamBag {
    /// The link with query and fragment removed.
    pub base_url: String,
    pub params: IndexMap<String, String>,
}

impl ParamBag {
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let url = Url::parse(link).map_err(|e| LinkError::malformed(link, e.to_string()))?;

        let mut params = IndexMap::new();
        let query = url.query().filter(|q| !q.is_empty());
        let fragment = url.fragment().unwrap_or("");

        if let Some(query) = query {
            absorb(&mut params, query);
        }
        // A `#?...` fragment is a whole query; a `#p=...` fragment only adds the
        // password. Both parse the same way once the `?` is gone.
        let fragment_query = fragment.strip_prefix('?').unwrap_or(fragment);
        absorb(&mut params, fragment_query);

        debug!(
            has_query = query.is_some(),
            fragment_query = fragment.starts_with('?'),
            keys = params.len(),
            "parsed link parameters"
        );

        // The base is kept as written; `Url` would add a `/` to a bare host.
        let link = link.trim();
        let base_url = link.find(['?', '#']).map_or(link, |end| &link[..end]);

        Ok(ParamBag {
            base_url: base_url.to_owned(),
            params,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a required parameter, treating an empty value as absent.
    pub fn require(&self, link: &str, key: &'static str) -> Result<&str, LinkError> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| LinkError::missing(link, key))
    }

    pub fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_owned()
    }

    /// Parameters outside the reserved `c,v,i,p,t` set, in link order.
    pub fn extras(&self) -> impl Iterator<Item = (&String, &String)> + '_ {
        self.params
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
    }
}

fn absorb(params: &mut IndexMap<String, String>, raw: &str) {
    // Links pasted out of HTML keep their `&amp;` separators.
    let raw = raw.replace("&amp;", "&");
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
}

/// Fields of a rendered link. Chain and index values are lists and keep
/// their `(`, `)` and `,` characters literal.
pub(crate) struct LinkParts<'a> {
    pub base_url: &'a str,
    pub chain_ids: &'a str,
    pub contract_version: &'a str,
    pub deposit_indices: &'a str,
    pub track_id: &'a str,
    pub password: &'a str,
    pub extras: &'a IndexMap<String, String>,
}

impl LinkParts<'_> {
    /// `{base}?c=..&v=..&i=..[&t=..][&extra=..]#p=..`
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.base_url.len() + 64);
        out.push_str(self.base_url);

        out.push('?');
        push_pair(&mut out, KEY_CHAIN, &escape_list(self.chain_ids));
        out.push('&');
        push_pair(&mut out, KEY_VERSION, &escape(self.contract_version));
        out.push('&');
        push_pair(&mut out, KEY_INDEX, &escape_list(self.deposit_indices));

        if !self.track_id.is_empty() {
            out.push('&');
            push_pair(&mut out, KEY_TRACK, &escape(self.track_id));
        }
        for (key, value) in self.extras {
            out.push('&');
            push_pair(&mut out, &escape(key), &escape(value));
        }

        out.push('#');
        push_pair(&mut out, KEY_PASSWORD, &escape(self.password));
        out
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');
    out.push_str(value);
}

/// `application/x-www-form-urlencoded` escaping of a single value.
pub(crate) fn escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn escape_list(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || LIST_SAFE.contains(&c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            out.extend(form_urlencoded::byte_serialize(c.encode_utf8(&mut buf).as_bytes()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_and_password_fragment_merge() {
        let bag = ParamBag::parse("https://x.io/claim?c=1&v=v4&i=7#p=secret").unwrap();
        assert_eq!(bag.get("c"), Some("1"));
        assert_eq!(bag.get("i"), Some("7"));
        assert_eq!(bag.get("p"), Some("secret"));
        assert_eq!(bag.base_url, "https://x.io/claim");
    }

    #[test]
    fn fragment_query_used_without_query() {
        let bag = ParamBag::parse("https://x.io/claim#?c=10&v=v3&i=2&p=pw").unwrap();
        assert_eq!(bag.get("c"), Some("10"));
        assert_eq!(bag.get("p"), Some("pw"));
        assert_eq!(bag.base_url, "https://x.io/claim");
    }

    #[test]
    fn first_occurrence_wins() {
        let bag = ParamBag::parse("https://x.io/claim?c=1&c=2#?c=3&p=a&p=b").unwrap();
        assert_eq!(bag.get("c"), Some("1"));
        assert_eq!(bag.get("p"), Some("a"));
    }

    #[test]
    fn base_without_path_is_kept_as_written() {
        let bag = ParamBag::parse("https://x.io?c=1&i=2#p=z").unwrap();
        assert_eq!(bag.base_url, "https://x.io");
        assert_eq!(bag.get("c"), Some("1"));
    }

    #[test]
    fn html_escaped_separators_are_tolerated() {
        let bag = ParamBag::parse("https://x.io/claim?c=1&amp;v=v4&amp;i=3#p=z").unwrap();
        assert_eq!(bag.get("v"), Some("v4"));
        assert_eq!(bag.get("i"), Some("3"));
    }

    #[test]
    fn not_a_url_is_malformed() {
        let err = ParamBag::parse("peanut.to/claim?c=1").unwrap_err();
        assert!(matches!(err, LinkError::MalformedLink { .. }));
    }

    #[test]
    fn require_rejects_empty_value() {
        let link = "https://x.io/claim?c=&i=1";
        let bag = ParamBag::parse(link).unwrap();
        assert!(matches!(
            bag.require(link, "c"),
            Err(LinkError::MissingField { field: "c", .. })
        ));
        assert_eq!(bag.require(link, "i").unwrap(), "1");
    }

    #[test]
    fn extras_skip_reserved_keys() {
        let bag = ParamBag::parse("https://x.io/claim?c=1&ref=abc&i=2#p=z&utm=q").unwrap();
        let extras: Vec<_> = bag.extras().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(extras, vec![("ref", "abc"), ("utm", "q")]);
    }

    #[test]
    fn render_keeps_list_punctuation() {
        let extras = IndexMap::new();
        let link = LinkParts {
            base_url: "https://x.io/claim",
            chain_ids: "1,2",
            contract_version: "v4.2",
            deposit_indices: "(28,5),40",
            track_id: "",
            password: "pw",
            extras: &extras,
        }
        .render();
        assert_eq!(link, "https://x.io/claim?c=1,2&v=v4.2&i=(28,5),40#p=pw");
    }

    #[test]
    fn render_escapes_free_text() {
        let mut extras = IndexMap::new();
        extras.insert("note".to_string(), "a b&c".to_string());
        let link = LinkParts {
            base_url: "https://x.io/claim",
            chain_ids: "1",
            contract_version: "v4",
            deposit_indices: "3",
            track_id: "ui",
            password: "p&w=1",
            extras: &extras,
        }
        .render();
        assert_eq!(
            link,
            "https://x.io/claim?c=1&v=v4&i=3&t=ui&note=a+b%26c#p=p%26w%3D1"
        );
    }
}
