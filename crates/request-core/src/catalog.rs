//! Per-protocol request catalogs

use crate::error::RegistryError;
use crate::model::{Protocol, Request};
use std::collections::HashMap;
use tracing::debug;

/// Validated, immutable set of requests for one protocol
///
/// Iteration order comes from the explicit `order` list. Requests declared
/// but absent from the order are hidden from listings yet stay callable.
#[derive(Debug, Clone)]
pub struct Catalog {
    protocol: Protocol,
    requests: &'static [Request],
    order: &'static [&'static str],
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Validate and index a static request table
    pub fn new(
        protocol: Protocol,
        requests: &'static [Request],
        order: &'static [&'static str],
    ) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(requests.len());
        for (pos, request) in requests.iter().enumerate() {
            if request.protocol != protocol {
                return Err(RegistryError::ProtocolMismatch {
                    request: request.name.to_string(),
                    catalog: protocol.to_string(),
                });
            }
            if let Some(idx) = request.position_collision() {
                return Err(RegistryError::PositionCollision {
                    request: request.name.to_string(),
                    index: idx,
                });
            }
            if index.insert(request.name, pos).is_some() {
                return Err(RegistryError::DuplicateRequest(request.name.to_string()));
            }
        }
        if let Some(name) = order.iter().find(|name| !index.contains_key(**name)) {
            return Err(RegistryError::UnknownOrderedName(name.to_string()));
        }

        debug!(
            protocol = %protocol,
            requests = requests.len(),
            listed = order.len(),
            "request catalog loaded"
        );

        Ok(Self {
            protocol,
            requests,
            order,
            index,
        })
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Request by dispatch name
    pub fn get(&self, name: &str) -> Option<&'static Request> {
        let requests = self.requests;
        self.index.get(name).map(|&pos| &requests[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Listed requests in display order
    pub fn iter_ordered(&self) -> impl Iterator<Item = &'static Request> + '_ {
        self.order.iter().filter_map(move |name| self.get(name))
    }

    /// Declared requests missing from the display order, in declaration order
    pub fn hidden(&self) -> impl Iterator<Item = &'static Request> + '_ {
        let order = self.order;
        self.requests
            .iter()
            .filter(move |request| !order.contains(&request.name))
    }

    /// Every declared request, in declaration order
    pub fn all(&self) -> &'static [Request] {
        self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
