use std::fmt;

use futures::channel::oneshot;
use log::warn;

use crate::Capability;

/// How a capability request was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The listed capabilities were granted.
    Granted(Vec<Capability>),
    /// The request was refused.
    Denied,
}

impl Resolution {
    /// Returns `true` for [`Resolution::Granted`].
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Receives the single resolution of a capability request.
///
/// Taking `self` by box means a sink can be used at most once.
pub trait ResolutionSink: Send {
    /// Deliver `resolution` to the party that asked.
    fn resolve(self: Box<Self>, resolution: Resolution);
}

impl<F> ResolutionSink for F
where
    F: FnOnce(Resolution) + Send,
{
    fn resolve(self: Box<Self>, resolution: Resolution) {
        (*self)(resolution);
    }
}

/// One-shot handle for answering a capability request.
///
/// [`Responder::grant`] and [`Responder::deny`] consume the handle, so a
/// request cannot be answered twice. A responder dropped without an answer
/// denies the request.
pub struct Responder {
    sink: Option<Box<dyn ResolutionSink>>,
}

impl Responder {
    /// Wrap a sink.
    pub fn new(sink: impl ResolutionSink + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    /// Grant `resources`.
    pub fn grant(mut self, resources: Vec<Capability>) -> Resolution {
        self.resolve(Resolution::Granted(resources))
    }

    /// Refuse the request.
    pub fn deny(mut self) -> Resolution {
        self.resolve(Resolution::Denied)
    }

    fn resolve(&mut self, resolution: Resolution) -> Resolution {
        if let Some(sink) = self.sink.take() {
            sink.resolve(resolution.clone());
        }
        resolution
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if self.sink.is_some() {
            warn!("capability request dropped without an answer; denying");
            self.resolve(Resolution::Denied);
        }
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("resolved", &self.sink.is_none())
            .finish()
    }
}

/// A request from embedded content for one or more capabilities.
#[derive(Debug)]
pub struct CapabilityRequest {
    resources: Vec<Capability>,
    responder: Responder,
}

impl CapabilityRequest {
    /// Create a request answered through `responder`.
    #[must_use]
    pub fn new(resources: Vec<Capability>, responder: Responder) -> Self {
        Self {
            resources,
            responder,
        }
    }

    /// Create a request whose answer is sent over a channel.
    #[must_use]
    pub fn channel(resources: Vec<Capability>) -> (Self, oneshot::Receiver<Resolution>) {
        let (sender, receiver) = oneshot::channel();
        let responder = Responder::new(move |resolution: Resolution| {
            let _ = sender.send(resolution);
        });
        (Self::new(resources, responder), receiver)
    }

    /// The requested capabilities, in the order the content asked for them.
    #[must_use]
    pub fn resources(&self) -> &[Capability] {
        &self.resources
    }

    /// Split into the requested capabilities and the responder.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Capability>, Responder) {
        (self.resources, self.responder)
    }
}
