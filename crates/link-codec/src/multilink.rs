//! Links that carry several deposits.
//!
//! All deposits of a multilink share one version, password and track id.
//! The chain list either holds one chain for every slot or one chain per
//! slot; the index list may use compressed `(start,count)` runs.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::LinkError;
use crate::link::canonical_chain_id;
use crate::params::{LinkParams, KEY_CHAIN, KEY_INDEX, KEY_PASSWORD, KEY_TRACK, KEY_VERSION};
use crate::query::{LinkParts, ParamBag};
use crate::range::{compress, expand_index_list, format_list, format_ranges, is_compressed};

/// A parsed multilink with every index expanded.
///
/// Only [`MultiLink::parse`] builds one, so the chain list always holds
/// either one chain or exactly one chain per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLink {
    base_url: String,
    chain_ids: Vec<String>,
    deposit_indices: Vec<u64>,
    contract_version: String,
    password: String,
    track_id: String,
    extra: IndexMap<String, String>,
}

impl MultiLink {
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let bag = ParamBag::parse(link)?;

        let chain_ids = bag
            .require(link, KEY_CHAIN)?
            .split(',')
            .map(|chain| canonical_chain_id(link, chain))
            .collect::<Result<Vec<_>, _>>()?;
        let deposit_indices = expand_index_list(bag.require(link, KEY_INDEX)?)
            .map_err(|reason| LinkError::malformed(link, reason))?;

        if chain_ids.len() != 1 && chain_ids.len() != deposit_indices.len() {
            return Err(LinkError::CardinalityMismatch {
                link: link.to_owned(),
                expected: deposit_indices.len(),
                actual: chain_ids.len(),
            });
        }

        Ok(MultiLink {
            base_url: bag.base_url.clone(),
            chain_ids,
            deposit_indices,
            contract_version: bag.get_or_empty(KEY_VERSION),
            password: bag.get_or_empty(KEY_PASSWORD),
            track_id: bag.get_or_empty(KEY_TRACK),
            extra: bag
                .extras()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Either a single chain shared by all slots, or one chain per slot.
    pub fn chain_ids(&self) -> &[String] {
        &self.chain_ids
    }

    pub fn deposit_indices(&self) -> &[u64] {
        &self.deposit_indices
    }

    pub fn contract_version(&self) -> &str {
        &self.contract_version
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Parameters outside `c,v,i,p,t`, in link order.
    pub fn extra(&self) -> &IndexMap<String, String> {
        &self.extra
    }

    pub fn len(&self) -> usize {
        self.deposit_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deposit_indices.is_empty()
    }

    /// `(chain_id, deposit_index)` for every slot, in order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.deposit_indices
            .iter()
            .enumerate()
            .map(move |(n, index)| (self.chain_for_slot(n), *index))
    }

    fn chain_for_slot(&self, n: usize) -> &str {
        match self.chain_ids.as_slice() {
            [single] => single,
            chains => &chains[n],
        }
    }

    pub fn to_link_params(&self) -> Vec<LinkParams> {
        self.slots()
            .map(|(chain_id, deposit_index)| LinkParams {
                chain_id: chain_id.to_owned(),
                contract_version: self.contract_version.clone(),
                deposit_index,
                password: self.password.clone(),
                track_id: self.track_id.clone(),
            })
            .collect()
    }

    /// Renders the multilink, with `(start,count)` runs when `compressed`.
    pub fn to_link(&self, compressed: bool) -> String {
        let indices = if compressed {
            format_ranges(&compress(&self.deposit_indices))
        } else {
            format_list(&self.deposit_indices)
        };
        self.render(&self.chain_ids.join(","), &indices)
    }

    fn render(&self, chain_ids: &str, deposit_indices: &str) -> String {
        LinkParts {
            base_url: &self.base_url,
            chain_ids,
            contract_version: &self.contract_version,
            deposit_indices,
            track_id: &self.track_id,
            password: &self.password,
            extras: &self.extra,
        }
        .render()
    }
}

/// Splits a multilink into one link per deposit.
pub fn expand_multilink(link: &str) -> Result<Vec<String>, LinkError> {
    let multi = MultiLink::parse(link)?;
    debug!(slots = multi.len(), chains = multi.chain_ids.len(), "expanding multilink");

    Ok(multi
        .slots()
        .map(|(chain_id, index)| multi.render(chain_id, &index.to_string()))
        .collect())
}

/// Rewrites the index list of `link` as `(start,count)` runs.
pub fn shorten_multilink(link: &str) -> Result<String, LinkError> {
    Ok(MultiLink::parse(link)?.to_link(true))
}

/// Whether the index list of `link` is entirely in compressed form. Links
/// that cannot be parsed are reported as not shortened.
pub fn is_shortened_link(link: &str) -> bool {
    ParamBag::parse(link)
        .ok()
        .and_then(|bag| bag.get(KEY_INDEX).map(is_compressed))
        .unwrap_or(false)
}

/// Merges links into one multilink.
///
/// Version, password, track id and base URL come from the first link; the
/// others are not checked against it. Chain ids collapse to a single value
/// only when every slot names the same chain. Extra parameters from all
/// links are kept, a later link overriding an earlier value.
pub fn create_multilink_from_links<S: AsRef<str>>(links: &[S]) -> Result<String, LinkError> {
    Ok(accumulate(links, false)?.to_link(false))
}

/// Like [`create_multilink_from_links`], but fails with
/// [`LinkError::InconsistentLinks`] when a link's version or password
/// differs from the first link's.
pub fn create_multilink_from_links_strict<S: AsRef<str>>(
    links: &[S],
) -> Result<String, LinkError> {
    Ok(accumulate(links, true)?.to_link(false))
}

/// Merges several multilinks into one shortened multilink.
///
/// Inputs must agree on version and password.
pub fn combine_multilinks<S: AsRef<str>>(links: &[S]) -> Result<String, LinkError> {
    let mut expanded = Vec::new();
    for link in links {
        expanded.extend(expand_multilink(link.as_ref())?);
    }
    Ok(accumulate(&expanded, true)?.to_link(true))
}

fn accumulate<S: AsRef<str>>(links: &[S], strict: bool) -> Result<MultiLink, LinkError> {
    let (first, rest) = links.split_first().ok_or(LinkError::EmptyInput)?;
    let mut acc = MultiLink::parse(first.as_ref())?;
    let mut slot_chains: Vec<String> = acc.slots().map(|(c, _)| c.to_owned()).collect();

    for link in rest {
        let link = link.as_ref();
        let next = MultiLink::parse(link)?;
        if strict {
            if next.contract_version != acc.contract_version {
                return Err(LinkError::InconsistentLinks {
                    link: link.to_owned(),
                    field: KEY_VERSION,
                });
            }
            if next.password != acc.password {
                return Err(LinkError::InconsistentLinks {
                    link: link.to_owned(),
                    field: KEY_PASSWORD,
                });
            }
        }

        slot_chains.extend(next.slots().map(|(c, _)| c.to_owned()));
        acc.deposit_indices.extend_from_slice(&next.deposit_indices);
        for (key, value) in next.extra {
            acc.extra.insert(key, value);
        }
    }

    let shared = slot_chains
        .first()
        .filter(|first| slot_chains.iter().all(|c| c == *first))
        .cloned();
    acc.chain_ids = match shared {
        Some(chain) => vec![chain],
        None => slot_chains,
    };
    debug!(
        links = links.len(),
        slots = acc.len(),
        chains = acc.chain_ids.len(),
        "created multilink"
    );
    Ok(acc)
}
