use std::{cell::OnceCell, fmt, sync::Arc};

use memoq_util::{xml::Element, Transport};

use crate::{
    Config, Error, LiveDocsService, Response, SecurityService, ServerProjectService, Service,
    TbService, TmService,
};

/// One memoQ server.
///
/// Service wrappers are connected on first use and kept for the life of the
/// value, so each WSDL is loaded at most once per server.
pub struct MemoQServer {
    config: Config,
    transport: Arc<dyn Transport>,
    server_project: OnceCell<ServerProjectService>,
    tm: OnceCell<TmService>,
    tb: OnceCell<TbService>,
    security: OnceCell<SecurityService>,
    live_docs: OnceCell<LiveDocsService>,
}

impl MemoQServer {
    /// A server at `base_url`, for example `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_config(Config::new(base_url)?)
    }

    pub fn with_config(config: Config) -> Result<Self, Error> {
        let transport = config.transport()?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            server_project: OnceCell::new(),
            tm: OnceCell::new(),
            tb: OnceCell::new(),
            security: OnceCell::new(),
            live_docs: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url().as_str().trim_end_matches('/')
    }

    pub fn server_project_service(&self) -> Result<&ServerProjectService, Error> {
        self.service(&self.server_project)
    }

    pub fn tm_service(&self) -> Result<&TmService, Error> {
        self.service(&self.tm)
    }

    pub fn tb_service(&self) -> Result<&TbService, Error> {
        self.service(&self.tb)
    }

    pub fn security_service(&self) -> Result<&SecurityService, Error> {
        self.service(&self.security)
    }

    pub fn live_docs_service(&self) -> Result<&LiveDocsService, Error> {
        self.service(&self.live_docs)
    }

    /// The API version, which is the version of the memoQ server.
    pub fn api_version(&self) -> Result<String, Error> {
        self.server_project_service()?.get_api_version()
    }

    pub fn projects(&self) -> Result<Vec<Element>, Error> {
        Ok(items(self.server_project_service()?.list_projects(None::<Element>)?))
    }

    pub fn tms(&self) -> Result<Vec<Element>, Error> {
        Ok(items(self.tm_service()?.list_tms(None::<&str>, None::<&str>)?))
    }

    pub fn tbs(&self) -> Result<Vec<Element>, Error> {
        Ok(items(self.tb_service()?.list_tbs()?))
    }

    pub fn users(&self) -> Result<Vec<Element>, Error> {
        Ok(items(self.security_service()?.list_users()?))
    }

    pub fn groups(&self) -> Result<Vec<Element>, Error> {
        Ok(items(self.security_service()?.list_groups()?))
    }

    pub fn corpora(&self) -> Result<Vec<Element>, Error> {
        Ok(items(self.live_docs_service()?.list_corpora()?))
    }

    /// `memoQ server v{version} @ {base_url}`. Asks the server for its version.
    pub fn summary(&self) -> Result<String, Error> {
        Ok(format!(
            "memoQ server v{} @ {}",
            self.api_version()?,
            self.base_url()
        ))
    }

    fn service<'a, S: Service>(&self, cell: &'a OnceCell<S>) -> Result<&'a S, Error> {
        if let Some(service) = cell.get() {
            return Ok(service);
        }

        let service = S::connect_with(&self.config, self.transport.clone())?;
        Ok(cell.get_or_init(|| service))
    }
}

fn items(response: Response) -> Vec<Element> {
    response
        .into_result()
        .map(Element::into_children)
        .unwrap_or_default()
}

impl fmt::Debug for MemoQServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoQServer")
            .field("base_url", &self.base_url())
            .finish()
    }
}
