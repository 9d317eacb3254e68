//! One wrapper per memoQ web service.
//!
//! Typed methods pass their arguments through unchanged. Scalars become
//! text, `None` becomes `xsi:nil` and complex data contracts are given as the
//! `Vec<Element>` of their fields. Anything without a typed method is
//! reachable through [`Service::call`](crate::Service::call).

macro_rules! service {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident = $operation:literal ($($param:ident: $wire:literal),* $(,)?);
            )*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            inner: $crate::WebService,
        }

        impl $name {
            /// Connects to the service of the server at `base_url`, without
            /// credentials.
            pub fn new(base_url: &str) -> Result<Self, $crate::Error> {
                Self::connect(&$crate::Config::new(base_url)?)
            }

            pub fn connect(config: &$crate::Config) -> Result<Self, $crate::Error> {
                <Self as $crate::Service>::connect_with(config, config.transport()?)
            }

            $(
                $(#[$method_meta])*
                pub fn $method(
                    &self,
                    $($param: impl Into<memoq_util::xml::Content>),*
                ) -> Result<$crate::Response, $crate::Error> {
                    self.inner.call(
                        $operation,
                        vec![$(memoq_util::xml::Element::new($wire, $param)),*],
                    )
                }
            )*
        }

        impl $crate::Service for $name {
            const KIND: $crate::ServiceKind = $crate::ServiceKind::$kind;

            fn connect_with(
                config: &$crate::Config,
                transport: std::sync::Arc<dyn memoq_util::Transport>,
            ) -> Result<Self, $crate::Error> {
                Ok(Self {
                    inner: $crate::WebService::connect(Self::KIND, config, transport)?,
                })
            }

            fn web_service(&self) -> &$crate::WebService {
                &self.inner
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("endpoint", &self.inner.endpoint().as_str())
                    .finish()
            }
        }
    };
}

mod file_manager;
mod license;
mod live_docs;
mod resource;
mod security;
mod server_project;
mod tasks;
mod tb;
mod tm;

pub use file_manager::FileManagerService;
pub use license::LicenseService;
pub use live_docs::LiveDocsService;
pub use resource::ResourceService;
pub use security::SecurityService;
pub use server_project::ServerProjectService;
pub use tasks::TasksService;
pub use tb::TbService;
pub use tm::TmService;
