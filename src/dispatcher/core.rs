//! Request dispatch: router lookup, handler invocation, deferred
//! completion, response serialization.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use may::sync::mpsc;
use tracing::{debug, error, info};
use ulid::Ulid;

use crate::http::{RawRequest, RawResponse, Request, Response};
use crate::router::Router;
use crate::scheduler::{PendingOp, Scheduler};

/// A registered route handler.
///
/// Handlers are uniform function capabilities from a request to a
/// [`Reply`]; the two execution shapes are expressed in the return value,
/// not in the function type.
pub type Handler = Arc<dyn Fn(Request) -> Reply + Send + Sync>;

/// What a handler hands back to the dispatcher.
pub enum Reply {
    /// The response is ready now.
    Immediate(Response),
    /// The response will be resolved later through a [`Resolver`].
    Deferred(DeferredReply),
}

impl Reply {
    /// Suspend: create a deferred reply and the resolver that settles it.
    ///
    /// The pending operation is registered at this moment, before the
    /// handler returns, so shutdown-readiness accounting can never miss
    /// the suspension.
    #[must_use]
    pub fn deferred(scheduler: &Scheduler) -> (Reply, Resolver) {
        let (tx, rx) = mpsc::channel();
        let op = scheduler.register("deferred");
        (
            Reply::Deferred(DeferredReply { rx }),
            Resolver { tx, _op: op },
        )
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Immediate(response)
    }
}

/// Receiving half of a suspended handler's reply.
pub struct DeferredReply {
    rx: mpsc::Receiver<Response>,
}

impl DeferredReply {
    /// Park until the resolver settles, or `None` if it was dropped
    /// without resolving.
    fn wait(self) -> Option<Response> {
        self.rx.recv().ok()
    }
}

/// Settles a suspended handler's response.
///
/// Consuming it with [`Resolver::resolve`] releases the dispatcher that
/// is parked on the reply; dropping it unresolved surfaces as a 500.
/// Either way the pending operation is released.
pub struct Resolver {
    tx: mpsc::Sender<Response>,
    _op: PendingOp,
}

impl Resolver {
    /// Deliver the final response to the waiting dispatcher.
    pub fn resolve(self, response: Response) {
        // A send error means the dispatcher gave up waiting; the response
        // has nowhere to go and the pending op is released on drop.
        let _ = self.tx.send(response);
    }
}

/// Wires raw requests through router, handler, and scheduler.
#[derive(Clone)]
pub struct Dispatcher {
    router: Router,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen route table.
    #[must_use]
    pub fn new(router: Router) -> Self {
        Dispatcher { router }
    }

    /// The route table this dispatcher serves.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle one transport request to completion.
    ///
    /// Parses the raw request into the request model, resolves the route,
    /// invokes the handler (waiting on the scheduler if it suspends), and
    /// serializes the outcome. All handler faults are absorbed here.
    #[must_use]
    pub fn handle(&self, raw: RawRequest) -> RawResponse {
        let request_id = Ulid::new();
        let mut request = Request::from_raw(raw);
        debug!(
            target: "mockd::dispatcher",
            %request_id,
            method = %request.method(),
            path = request.path(),
            "request received"
        );

        let (handler, pattern, params) = match self.router.route(request.method(), request.path())
        {
            Some(m) => (Arc::clone(m.handler), m.pattern.to_string(), m.params),
            None => {
                return Response::empty(404).into_raw();
            }
        };
        request.bind_params(params);

        let method = request.method().clone();
        let path = request.path().to_string();
        let reply = catch_unwind(AssertUnwindSafe(|| handler(request)));

        let response = match reply {
            Err(panic) => {
                error!(
                    target: "mockd::dispatcher",
                    %request_id,
                    %method,
                    %path,
                    %pattern,
                    detail = %panic_message(&panic),
                    "handler fault"
                );
                internal_error()
            }
            Ok(Reply::Immediate(response)) => response,
            Ok(Reply::Deferred(deferred)) => {
                debug!(
                    target: "mockd::dispatcher",
                    %request_id,
                    %pattern,
                    "handler suspended, waiting on completion"
                );
                match deferred.wait() {
                    Some(response) => response,
                    None => {
                        error!(
                            target: "mockd::dispatcher",
                            %request_id,
                            %method,
                            %path,
                            %pattern,
                            "deferred reply dropped without resolving"
                        );
                        internal_error()
                    }
                }
            }
        };

        info!(
            target: "mockd::dispatcher",
            %request_id,
            %method,
            %path,
            status = response.status(),
            "request complete"
        );
        response.into_raw()
    }
}

/// Opaque 500 response; fault detail goes to the log, never to the body.
fn internal_error() -> Response {
    Response::text("Internal Server Error").with_status(500)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
