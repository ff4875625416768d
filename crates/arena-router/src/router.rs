use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arena_core::{Address, Topic};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{InterfaceError, RouterError};
use crate::event::{EventFilter, FilterConstructor, LogEvent};
use crate::handle::FacetHandle;
use crate::interface::{FacetInterface, FunctionFragment};
use crate::manifest::{read_text, EndpointManifest};

/// Where a member name resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "target", content = "facet", rename_all = "snake_case")]
pub enum Target {
    PrimaryInterface,
    Facet(String),
    RouterSelf,
}

/// Operations the router answers itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeOp {
    GetFacet,
    GetFacetInterface,
    GetFilter,
    GetEventInterface,
}

impl NativeOp {
    pub const ALL: [NativeOp; 4] = [
        NativeOp::GetFacet,
        NativeOp::GetFacetInterface,
        NativeOp::GetFilter,
        NativeOp::GetEventInterface,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NativeOp::GetFacet => "getFacet",
            NativeOp::GetFacetInterface => "getFacetInterface",
            NativeOp::GetFilter => "getFilter",
            NativeOp::GetEventInterface => "getEventInterface",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// Callable produced by [`FacetRouter::resolve`].
#[derive(Debug)]
pub enum Binding<'r, T> {
    Function {
        target: Target,
        handle: &'r FacetHandle<T>,
        function: &'r FunctionFragment,
    },
    Native(NativeOp),
}

impl<T> Binding<'_, T> {
    pub fn target(&self) -> Target {
        match self {
            Binding::Function { target, .. } => target.clone(),
            Binding::Native(_) => Target::RouterSelf,
        }
    }
}

/// Write-once memo tables. The first write for a key wins.
#[derive(Debug, Default)]
struct RouterCaches {
    members: HashMap<String, Target>,
    topics: HashMap<Topic, usize>,
    filters: HashMap<String, FilterConstructor>,
}

/// One addressable surface over a primary interface and its facets.
///
/// Facets keep the order they were given at construction. That order breaks
/// every tie: when two facets define the same member the earlier one wins,
/// silently, and stays cached. Use [`FacetRouter::get_facet`] to reach a
/// shadowed member explicitly.
#[derive(Debug)]
pub struct FacetRouter<T> {
    primary: FacetHandle<T>,
    facets: Vec<FacetHandle<T>>,
    caches: Mutex<RouterCaches>,
}

impl<T> FacetRouter<T> {
    /// Binds the primary interface and each `(name, interface)` facet to
    /// `address` and the shared `transport`.
    pub fn new(
        address: Address,
        primary: FacetInterface,
        facets: Vec<(String, FacetInterface)>,
        transport: Arc<T>,
    ) -> Result<Self, RouterError> {
        let mut handles: Vec<FacetHandle<T>> = Vec::with_capacity(facets.len());
        for (name, interface) in facets {
            if handles.iter().any(|h| h.name() == name) {
                return Err(RouterError::DuplicateFacet(name));
            }
            handles.push(FacetHandle::new(
                name,
                address,
                interface,
                Arc::clone(&transport),
            ));
        }
        debug!(%address, facets = handles.len(), "facet router constructed");
        Ok(Self {
            primary: FacetHandle::new("primary", address, primary, transport),
            facets: handles,
            caches: Mutex::new(RouterCaches::default()),
        })
    }

    /// Loads every descriptor named by `manifest`, resolving paths against
    /// `base_dir`.
    pub fn from_manifest(
        manifest: &EndpointManifest,
        base_dir: &Path,
        transport: Arc<T>,
    ) -> Result<Self, RouterError> {
        let address = manifest.endpoint_address()?;
        let load = |facet: &str, path: &Path| -> Result<FacetInterface, RouterError> {
            let text = read_text(&base_dir.join(path))?;
            FacetInterface::from_json(&text).map_err(|source| RouterError::Interface {
                facet: facet.to_string(),
                source,
            })
        };
        let primary = load("primary", &manifest.primary)?;
        let mut facets = Vec::with_capacity(manifest.facets.len());
        for entry in &manifest.facets {
            facets.push((entry.name.clone(), load(&entry.name, &entry.descriptor)?));
        }
        Self::new(address, primary, facets, transport)
    }

    fn caches(&self) -> MutexGuard<'_, RouterCaches> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn address(&self) -> Address {
        self.primary.address()
    }

    pub fn primary(&self) -> &FacetHandle<T> {
        &self.primary
    }

    /// Facet names in construction order.
    pub fn facet_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.facets.iter().map(FacetHandle::name)
    }

    /// Resolves `name` to the interface that serves it.
    ///
    /// The primary interface is consulted first on every call and is never
    /// cached. Otherwise the first answer found (facet in construction order,
    /// then the router's own operations) is memoized permanently.
    pub fn resolve_target(&self, name: &str) -> Option<Target> {
        if self.primary.interface().defines(name) {
            return Some(Target::PrimaryInterface);
        }

        let mut caches = self.caches();
        if let Some(target) = caches.members.get(name) {
            return Some(target.clone());
        }

        let found = self
            .facets
            .iter()
            .find(|facet| facet.interface().defines(name))
            .map(|facet| Target::Facet(facet.name().to_string()))
            .or_else(|| NativeOp::from_name(name).map(|_| Target::RouterSelf))?;

        debug!(member = name, target = ?found, "member resolution cached");
        Some(
            caches
                .members
                .entry(name.to_string())
                .or_insert(found)
                .clone(),
        )
    }

    /// Resolves `name` to a callable binding.
    ///
    /// Unknown members resolve to `None`. A cached facet that no longer
    /// defines the member after an interface replacement also yields `None`;
    /// the cached target itself is never re-evaluated.
    pub fn resolve(&self, name: &str) -> Option<Binding<'_, T>> {
        match self.resolve_target(name)? {
            Target::PrimaryInterface => Some(Binding::Function {
                target: Target::PrimaryInterface,
                handle: &self.primary,
                function: self.primary.interface().function(name)?,
            }),
            Target::Facet(facet) => {
                let handle = self.get_facet(&facet)?;
                Some(Binding::Function {
                    function: handle.interface().function(name)?,
                    target: Target::Facet(facet),
                    handle,
                })
            }
            Target::RouterSelf => NativeOp::from_name(name).map(Binding::Native),
        }
    }

    /// Facet handle by name, bypassing resolution.
    pub fn get_facet(&self, name: &str) -> Option<&FacetHandle<T>> {
        self.facets.iter().find(|facet| facet.name() == name)
    }

    pub fn get_facet_interface(&self, name: &str) -> Option<&FacetInterface> {
        self.get_facet(name).map(FacetHandle::interface)
    }

    /// Builds an event filter for `signature` (bare event name or full
    /// signature) from the first facet whose event table defines it.
    ///
    /// The owning facet's constructor is cached; later calls reapply it to
    /// the new `args`.
    pub fn get_filter(
        &self,
        signature: &str,
        args: &[Option<Topic>],
    ) -> Result<EventFilter, RouterError> {
        let mut caches = self.caches();
        if let Some(constructor) = caches.filters.get(signature) {
            return constructor.apply(args);
        }

        let constructor = self
            .facets
            .iter()
            .find_map(|facet| {
                facet.interface().event(signature).map(|event| FilterConstructor {
                    signature: event.signature.clone(),
                    address: facet.address(),
                    topic: (!event.anonymous).then_some(event.topic),
                    indexed: event.indexed_count(),
                })
            })
            .ok_or_else(|| RouterError::FilterNotFound(signature.to_string()))?;

        debug!(event = signature, "event filter constructor cached");
        caches
            .filters
            .entry(signature.to_string())
            .or_insert(constructor)
            .apply(args)
    }

    /// Finds the facet whose interface recognizes the event's primary topic.
    pub fn get_event_facet(&self, event: &LogEvent) -> Result<&FacetHandle<T>, RouterError> {
        let topic = event
            .primary_topic()
            .copied()
            .ok_or(RouterError::UnrecognizedTopic {
                topic: None,
                source: None,
            })?;

        let mut caches = self.caches();
        if let Some(index) = caches.topics.get(&topic) {
            return Ok(&self.facets[*index]);
        }

        let mut last: Option<InterfaceError> = None;
        for (index, facet) in self.facets.iter().enumerate() {
            match facet.interface().get_event(&topic) {
                Ok(_) => {
                    let index = *caches.topics.entry(topic).or_insert(index);
                    debug!(%topic, facet = facet.name(), "event topic cached");
                    return Ok(&self.facets[index]);
                }
                Err(err) => last = Some(err),
            }
        }
        warn!(%topic, "event topic not recognized by any facet");
        Err(RouterError::UnrecognizedTopic {
            topic: Some(topic),
            source: last,
        })
    }

    /// Interface able to decode `event`, see [`FacetRouter::get_event_facet`].
    pub fn get_event_interface(&self, event: &LogEvent) -> Result<&FacetInterface, RouterError> {
        self.get_event_facet(event).map(FacetHandle::interface)
    }

    /// Swaps the primary interface. Takes effect on the next resolution.
    pub fn replace_primary_interface(&mut self, interface: FacetInterface) {
        self.primary.set_interface(interface);
    }

    /// Swaps one facet's interface after an upgrade of the remote module.
    ///
    /// Cached resolutions are kept as they are.
    pub fn replace_facet_interface(
        &mut self,
        name: &str,
        interface: FacetInterface,
    ) -> Result<(), RouterError> {
        let facet = self
            .facets
            .iter_mut()
            .find(|facet| facet.name() == name)
            .ok_or_else(|| RouterError::UnknownFacet(name.to_string()))?;
        facet.set_interface(interface);
        Ok(())
    }
}
