//! Process-wide cache of parsed WSDL documents.
//!
//! Entries are keyed by the URL of the root document and live until
//! [`clear`] is called or the process exits.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use memoq_util::Transport;
use tracing::debug;
use url::Url;

use super::{error, parser, types::Definition};

type Cache = Mutex<HashMap<Url, Arc<Definition>>>;

static CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    CACHE.get_or_init(Default::default)
}

/// Returns the cached definition for `url`, parsing it on first use.
pub fn load(url: &Url, transport: &dyn Transport) -> Result<Arc<Definition>, error::Error> {
    if let Some(definition) = cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(url)
        .cloned()
    {
        debug!(%url, "WSDL cache hit");
        return Ok(definition);
    }

    let definition = Arc::new(parser::parse(url.clone(), transport)?);

    cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(url.clone(), Arc::clone(&definition));

    Ok(definition)
}

pub fn contains(url: &Url) -> bool {
    cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(url)
}

pub fn clear() {
    cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
