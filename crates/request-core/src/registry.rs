//! Operation table: request names bound to typed handler functions

use crate::binding::{bind, BoundCall, FormInputs};
use crate::catalog::Catalog;
use crate::error::{DispatchError, RegistryError};
use crate::property::PropertyAccessor;
use bwks_xml_core::Document;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Result of a dispatched operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Raw document returned by the server
    Document(Document),
    /// Extracted, structured data
    Value(serde_json::Value),
    /// Operation succeeded with nothing to show
    Done,
}

impl Outcome {
    /// Wrap any serializable value
    pub fn json<T: serde::Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Outcome::Value(value),
            Err(e) => Outcome::Value(serde_json::Value::String(e.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Document(doc) => write!(f, "{}", doc),
            Outcome::Value(serde_json::Value::String(s)) => f.write_str(s),
            Outcome::Value(value) => {
                let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
            Outcome::Done => f.write_str("OK"),
        }
    }
}

/// Handler for one operation on client type `C`
pub type Handler<C, E> = for<'a> fn(&'a mut C, BoundCall) -> BoxFuture<'a, Result<Outcome, E>>;

/// Every catalog entry bound to exactly one handler
pub struct OperationTable<C, E> {
    catalog: Catalog,
    handlers: HashMap<&'static str, Handler<C, E>>,
}

impl<C, E> OperationTable<C, E>
where
    C: Send,
    E: From<DispatchError>,
{
    /// Build the table, failing if any request lacks a handler or vice versa
    pub fn new(
        catalog: Catalog,
        entries: &[(&'static str, Handler<C, E>)],
    ) -> Result<Self, RegistryError> {
        let mut handlers = HashMap::with_capacity(entries.len());
        for (name, handler) in entries {
            if !catalog.contains(name) {
                return Err(RegistryError::OrphanHandler(name.to_string()));
            }
            handlers.insert(*name, *handler);
        }
        if let Some(missing) = catalog.all().iter().find(|r| !handlers.contains_key(r.name)) {
            return Err(RegistryError::MissingHandler(missing.name.to_string()));
        }

        debug!(protocol = %catalog.protocol(), handlers = handlers.len(), "operation table built");
        Ok(Self { catalog, handlers })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handler by operation name
    pub fn handler(&self, name: &str) -> Option<Handler<C, E>> {
        self.handlers.get(name).copied()
    }

    /// Bind `inputs` for `name` and invoke its handler on `client`
    ///
    /// Binding and lookup failures come back as `E::from(DispatchError)`;
    /// errors from the handler propagate unchanged.
    pub async fn dispatch(
        &self,
        client: &mut C,
        name: &str,
        inputs: &FormInputs,
        accessor: &mut dyn PropertyAccessor,
    ) -> Result<Outcome, E> {
        let request = self
            .catalog
            .get(name)
            .ok_or_else(|| DispatchError::unknown_operation(name))?;
        let handler = self
            .handler(name)
            .ok_or_else(|| DispatchError::unknown_operation(name))?;

        let call = bind(request, inputs, accessor)?;
        // values may carry passwords; log the call shape only
        info!(
            operation = name,
            positional = call.positional.len(),
            keywords = ?call.keyword.keys().collect::<Vec<_>>(),
            "dispatching operation"
        );
        handler(client, call).await
    }
}

impl<C, E> fmt::Debug for OperationTable<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("OperationTable")
            .field("protocol", &self.catalog.protocol())
            .field("operations", &names)
            .finish()
    }
}
