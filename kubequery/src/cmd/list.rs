use futures::future::BoxFuture;
use futures::FutureExt;
use kube::api::{Api, ApiResource, DynamicObject, ListParams, TypeMeta};
use kube::Client;
use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::structs::HostContext;

/// One page of a list response.
#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<DynamicObject>,
    pub continue_token: Option<String>,
}

/// Source of list pages. The cluster client in production, a scripted fake
/// in tests.
pub trait Pager: Send + Sync {
    fn list_page<'a>(
        &'a self,
        resource: &'a ApiResource,
        continue_token: Option<String>,
    ) -> BoxFuture<'a, Result<Page>>;
}

#[derive(Clone)]
pub struct KubePager {
    client: Client,
}

impl KubePager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Pager for KubePager {
    fn list_page<'a>(
        &'a self,
        resource: &'a ApiResource,
        continue_token: Option<String>,
    ) -> BoxFuture<'a, Result<Page>> {
        async move {
            let api: Api<DynamicObject> = Api::all_with(self.client.clone(), resource);
            let mut params = ListParams::default();
            if let Some(token) = continue_token.as_deref() {
                params = params.continue_token(token);
            }
            let mut list = api.list(&params).await?;

            // List responses carry the kind on the list, not on each item.
            for obj in &mut list.items {
                if obj.types.is_none() {
                    obj.types = Some(TypeMeta {
                        kind: resource.kind.clone(),
                        api_version: resource.api_version.clone(),
                    });
                }
            }

            Ok(Page {
                items: list.items,
                continue_token: list.metadata.continue_,
            })
        }
        .boxed()
    }
}

/// Walks every page of `resource` across all namespaces, handing each page to
/// `on_page` in list order. Stops when the server returns no continue token.
///
/// Cancellation is checked before each request and raced against it; a
/// cancelled context fails the whole walk with [`Error::Cancelled`].
pub async fn for_each_page<F>(
    pager: &dyn Pager,
    resource: &ApiResource,
    ctx: &HostContext,
    mut on_page: F,
) -> Result<usize>
where
    F: FnMut(Vec<DynamicObject>) -> Result<()>,
{
    let mut continue_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = tokio::select! {
            biased;
            _ = ctx.token().cancelled() => {
                warn!(kind = %resource.kind, pages, "list cancelled by host");
                return Err(Error::Cancelled);
            }
            page = pager.list_page(resource, continue_token.take()) => page?,
        };
        pages += 1;
        debug!(kind = %resource.kind, page = pages, items = page.items.len(), "fetched page");

        on_page(page.items)?;

        match page.continue_token {
            Some(token) if !token.is_empty() => continue_token = Some(token),
            _ => break,
        }
    }

    Ok(pages)
}
