//! Tool Router - builds the rmcp ToolRouter from the registry catalog.
//!
//! Each route races its invocation against the request's cancellation token,
//! so a cancelled call drops the in-flight upstream request.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::CallToolResult,
};
use tracing::info;

use super::registry::{CatalogEntry, catalog};
use crate::domains::openwebui::OpenWebUiClient;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<OpenWebUiClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    catalog()
        .into_iter()
        .fold(ToolRouter::new(), |router, entry| {
            router.with_route(create_route(entry, client.clone()))
        })
}

fn create_route<S>(entry: CatalogEntry, client: Arc<OpenWebUiClient>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn((entry.tool)(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let cancellation = ctx.request_context.ct.clone();
        let client = client.clone();
        async move {
            let call = (entry.dispatch)(&client, args);
            until_cancelled(entry.name, call, cancellation.cancelled()).await
        }
        .boxed()
    })
}

/// Run `call` unless `cancelled` completes first; the losing future is dropped.
async fn until_cancelled<C, X>(
    name: &str,
    call: C,
    cancelled: X,
) -> Result<CallToolResult, McpError>
where
    C: Future<Output = CallToolResult>,
    X: Future<Output = ()>,
{
    tokio::select! {
        result = call => Ok(result),
        _ = cancelled => {
            info!("{} cancelled by the client", name);
            Err(McpError::internal_error(format!("{} was cancelled", name), None))
        }
    }
}
