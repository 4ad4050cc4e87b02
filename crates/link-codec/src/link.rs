use indexmap::IndexMap;
use tracing::debug;

use crate::error::LinkError;
use crate::params::{
    LinkParams, RawLinkParams, KEY_CHAIN, KEY_INDEX, KEY_PASSWORD, KEY_TRACK, KEY_VERSION,
};
use crate::query::{LinkParts, ParamBag};

/// Decodes a single-deposit claim link.
///
/// Accepts the current `?c=..&i=..#p=..` form as well as the older
/// `#?c=..&i=..&p=..` and all-in-query forms. A link without `p` decodes to
/// an empty password.
pub fn decode(link: &str) -> Result<LinkParams, LinkError> {
    let bag = ParamBag::parse(link)?;

    let chain_id = canonical_chain_id(link, bag.require(link, KEY_CHAIN)?)?;
    let raw_index = bag.require(link, KEY_INDEX)?;
    let deposit_index = raw_index.parse::<u64>().map_err(|_| {
        LinkError::malformed(link, format!("deposit index '{raw_index}' is not an integer"))
    })?;

    let params = LinkParams {
        chain_id,
        contract_version: bag.get_or_empty(KEY_VERSION),
        deposit_index,
        password: bag.get_or_empty(KEY_PASSWORD),
        track_id: bag.get_or_empty(KEY_TRACK),
    };
    debug!(
        chain_id = %params.chain_id,
        version = %params.contract_version,
        deposit_index,
        "decoded claim link"
    );
    Ok(params)
}

/// Decodes a link without interpreting any value.
///
/// Chain and index values are returned verbatim, so this works for
/// multilinks and compressed index lists as well.
pub fn decode_raw(link: &str) -> Result<RawLinkParams, LinkError> {
    let bag = ParamBag::parse(link)?;
    Ok(RawLinkParams {
        chain_id: bag.require(link, KEY_CHAIN)?.to_owned(),
        contract_version: bag.get_or_empty(KEY_VERSION),
        deposit_indices: bag.require(link, KEY_INDEX)?.to_owned(),
        password: bag.get_or_empty(KEY_PASSWORD),
        track_id: bag.get_or_empty(KEY_TRACK),
    })
}

/// Encodes `params` as a claim link rooted at `base_url`.
///
/// The password always goes into the fragment so it is never sent to the
/// server hosting the claim page.
pub fn encode(params: &LinkParams, base_url: &str) -> String {
    LinkParts {
        base_url,
        chain_ids: &params.chain_id,
        contract_version: &params.contract_version,
        deposit_indices: &params.deposit_index.to_string(),
        track_id: &params.track_id,
        password: &params.password,
        extras: &IndexMap::new(),
    }
    .render()
}

/// Normalizes a decimal chain id, so `"0137"` and `"137"` name one chain.
pub(crate) fn canonical_chain_id(link: &str, raw: &str) -> Result<String, LinkError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LinkError::missing(link, KEY_CHAIN));
    }
    raw.parse::<u64>()
        .map(|id| id.to_string())
        .map_err(|_| LinkError::malformed(link, format!("chain id '{raw}' is not numeric")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DEFAULT_BASE_URL;

    fn params(password: &str) -> LinkParams {
        LinkParams {
            chain_id: "137".into(),
            contract_version: "v4.2".into(),
            deposit_index: 12,
            password: password.into(),
            track_id: String::new(),
        }
    }

    #[test]
    fn decode_all_in_query_link() {
        let decoded = decode("http://x/claim?c=5&v=v4&i=4663&t=ui&p=ABC").unwrap();
        assert_eq!(
            decoded,
            LinkParams {
                chain_id: "5".into(),
                contract_version: "v4".into(),
                deposit_index: 4663,
                password: "ABC".into(),
                track_id: "ui".into(),
            }
        );
    }

    #[test]
    fn decode_password_fragment() {
        let decoded = decode("https://peanut.to/claim?c=10&v=v3&i=7#p=s3cret").unwrap();
        assert_eq!(decoded.chain_id, "10");
        assert_eq!(decoded.password, "s3cret");
        assert_eq!(decoded.track_id, "");
    }

    #[test]
    fn decode_fragment_query() {
        let decoded = decode("https://peanut.to/claim#?c=1&v=v4&i=99&p=pw").unwrap();
        assert_eq!(decoded.deposit_index, 99);
        assert_eq!(decoded.password, "pw");
    }

    #[test]
    fn decode_canonicalizes_chain_id() {
        let decoded = decode("https://x/claim?c=0137&i=1").unwrap();
        assert_eq!(decoded.chain_id, "137");
        assert_eq!(decoded.password, "");
        assert_eq!(decoded.contract_version, "");
    }

    #[test]
    fn decode_missing_chain() {
        let err = decode("https://x/claim?v=v4&i=1#p=a").unwrap_err();
        assert!(matches!(err, LinkError::MissingField { field: "c", .. }));
    }

    #[test]
    fn decode_missing_index() {
        let err = decode("https://x/claim?c=1#p=a").unwrap_err();
        assert!(matches!(err, LinkError::MissingField { field: "i", .. }));
    }

    #[test]
    fn decode_rejects_non_numeric_values() {
        assert!(matches!(
            decode("https://x/claim?c=one&i=1").unwrap_err(),
            LinkError::MalformedLink { .. }
        ));
        assert!(matches!(
            decode("https://x/claim?c=1&i=(1,2)").unwrap_err(),
            LinkError::MalformedLink { .. }
        ));
    }

    #[test]
    fn decode_rejects_non_urls() {
        assert!(matches!(
            decode("not a link").unwrap_err(),
            LinkError::MalformedLink { .. }
        ));
    }

    #[test]
    fn encode_layout() {
        let mut p = params("abc");
        p.track_id = "ui".into();
        assert_eq!(
            encode(&p, DEFAULT_BASE_URL),
            "https://peanut.to/claim?c=137&v=v4.2&i=12&t=ui#p=abc"
        );
    }

    #[test]
    fn encode_omits_empty_track() {
        assert_eq!(
            encode(&params("abc"), "https://x.io/c"),
            "https://x.io/c?c=137&v=v4.2&i=12#p=abc"
        );
    }

    #[test]
    fn round_trip_with_awkward_password() {
        let p = params("a b&c=d#e?f%g+h/é");
        assert_eq!(decode(&encode(&p, DEFAULT_BASE_URL)).unwrap(), p);
    }

    #[test]
    fn decode_raw_keeps_lists() {
        let raw = decode_raw("https://x/claim?c=1,2&v=v4&i=(5,2)#p=z").unwrap();
        assert_eq!(raw.chain_id, "1,2");
        assert_eq!(raw.deposit_indices, "(5,2)");
        assert_eq!(raw.password, "z");
    }
}
