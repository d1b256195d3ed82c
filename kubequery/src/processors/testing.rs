//! Scripted list responses for generator tests.

use std::sync::Mutex;

use futures::future::BoxFuture;
use futures::FutureExt;
use k8s_openapi::serde_json;
use kube::api::{ApiResource, DynamicObject};
use kube::core::ErrorResponse;
use tokio_util::sync::CancellationToken;

use crate::cmd::list::{Page, Pager};
use crate::errors::Result;

pub fn fixture(json: &str) -> DynamicObject {
    serde_json::from_str(json).expect("fixture is a valid object")
}

#[derive(Debug, Clone)]
struct ScriptedPage {
    kind: String,
    continue_token: Option<String>,
    items: Vec<DynamicObject>,
    next: Option<String>,
}

/// Serves pages keyed by kind and incoming continue token. A request with no
/// matching page gets an empty final page.
#[derive(Debug, Default)]
pub struct FakePager {
    pages: Vec<ScriptedPage>,
    calls: Mutex<Vec<(String, Option<String>)>>,
    cancel_on: Option<(usize, CancellationToken)>,
    failure: Option<(u16, String)>,
}

impl FakePager {
    pub fn page(
        mut self,
        kind: &str,
        continue_token: Option<&str>,
        items: Vec<DynamicObject>,
        next: Option<&str>,
    ) -> Self {
        self.pages.push(ScriptedPage {
            kind: kind.to_string(),
            continue_token: continue_token.map(String::from),
            items,
            next: next.map(String::from),
        });
        self
    }

    /// Cancels `token` when the `call`th request (zero based) is issued.
    pub fn cancel_on_call(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_on = Some((call, token));
        self
    }

    pub fn fail_with(mut self, code: u16, message: &str) -> Self {
        self.failure = Some((code, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Pager for FakePager {
    fn list_page<'a>(
        &'a self,
        resource: &'a ApiResource,
        continue_token: Option<String>,
    ) -> BoxFuture<'a, Result<Page>> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((resource.kind.clone(), continue_token.clone()));
            calls.len() - 1
        };
        if let Some((at, token)) = &self.cancel_on {
            if *at == call {
                token.cancel();
            }
        }

        async move {
            if let Some((code, message)) = &self.failure {
                return Err(kube::Error::Api(ErrorResponse {
                    status: "Failure".into(),
                    message: message.clone(),
                    reason: "Forbidden".into(),
                    code: *code,
                })
                .into());
            }
            let page = self
                .pages
                .iter()
                .find(|p| p.kind == resource.kind && p.continue_token == continue_token)
                .map(|p| Page {
                    items: p.items.clone(),
                    continue_token: p.next.clone(),
                })
                .unwrap_or_default();
            Ok(page)
        }
        .boxed()
    }
}
