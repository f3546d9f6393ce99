//! Request console
//!
//! Renders request forms pre-filled from the user's settings and executes
//! submitted forms on a client opened for that one call.

use crate::account::{Account, AdminCredentials};
use crate::config::BwksConfig;
use crate::error::{BwksError, BwksResult};
use crate::properties::{fetch_server_data, resolve_property, LAZY_PROPERTIES};
use bwks_infra_common::LogContext;
use bwks_ocip_core::{Exchange, OciClient, OciError};
use bwks_request_core::{
    form_defaults, FormField, FormInputs, OperationTable, PropertyAccessor, PropertyValue, Protocol, Request,
};
use bwks_xsi_core::{XsiClient, XsiError};
use std::fmt;
use tracing::{debug, error, info, Instrument, Level};

const SCA_DEVICE_TYPE_HEADING: &str = "Device Type";

/// A request form with every argument pre-filled
#[derive(Debug, Clone)]
pub struct RenderedRequest {
    pub request: &'static Request,
    pub fields: Vec<FormField>,
}

impl RenderedRequest {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// What one executed request printed
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub operation: String,
    pub protocol: Protocol,
    /// The handler's result, rendered as text
    pub output: String,
    /// OCI-P only: the last command sent and its response
    pub exchange: Option<Exchange>,
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exchange {
            Some(exchange) => write!(
                f,
                "OCI Command: \n{}\nOCI Response:\n{}\n",
                exchange.command,
                exchange.response.as_deref().unwrap_or_default()
            ),
            None => f.write_str(&self.output),
        }
    }
}

/// Both operation tables plus the configuration clients are opened with
pub struct Console {
    config: BwksConfig,
    xsi: OperationTable<XsiClient, XsiError>,
    ocip: OperationTable<OciClient, OciError>,
}

impl Console {
    pub fn new(config: BwksConfig) -> BwksResult<Self> {
        let xsi = bwks_xsi_core::operation_table()?;
        let ocip = bwks_ocip_core::operation_table()?;
        info!(
            xsi_operations = xsi.catalog().len(),
            ocip_operations = ocip.catalog().len(),
            "request console ready"
        );
        Ok(Self { config, xsi, ocip })
    }

    pub fn config(&self) -> &BwksConfig {
        &self.config
    }

    /// XSI requests in listing order
    pub fn xsi_requests(&self) -> impl Iterator<Item = &'static Request> + '_ {
        self.xsi.catalog().iter_ordered()
    }

    /// OCI-P requests in listing order
    pub fn ocip_requests(&self) -> impl Iterator<Item = &'static Request> + '_ {
        self.ocip.catalog().iter_ordered()
    }

    pub fn render_xsi(&self, name: &str, accessor: &dyn PropertyAccessor) -> BwksResult<RenderedRequest> {
        render(self.xsi.catalog().get(name), name, accessor)
    }

    pub fn render_ocip(&self, name: &str, accessor: &dyn PropertyAccessor) -> BwksResult<RenderedRequest> {
        render(self.ocip.catalog().get(name), name, accessor)
    }

    /// Open an XSI client for `account` with the configured settings
    pub fn xsi_client(&self, account: &Account) -> BwksResult<XsiClient> {
        Ok(XsiClient::new(
            self.config.xsi_for(&account.server),
            account.username.as_str(),
            account.password.as_str(),
        )?)
    }

    /// Open and log in an OCI-P client for `admin`
    pub async fn ocip_client(&self, admin: &AdminCredentials) -> BwksResult<OciClient> {
        if admin.username.is_empty() {
            return Err(BwksError::missing_setting("admin_username"));
        }
        if admin.password.is_empty() {
            return Err(BwksError::missing_setting("admin_password"));
        }
        let config = self.config.ocip_for(&admin.server);
        Ok(OciClient::connect(&config, admin.username.as_str(), admin.password.as_str()).await?)
    }

    /// Bind and run an XSI request on a fresh client for `account`
    pub async fn execute_xsi(
        &self,
        name: &str,
        inputs: &FormInputs,
        account: &Account,
        accessor: &mut dyn PropertyAccessor,
    ) -> BwksResult<ExecutionReport> {
        let span = LogContext::with_operation("xsi", name)
            .with_field("user", account.username.as_str())
            .span(Level::INFO);
        self.run_xsi(name, inputs, account, accessor)
            .instrument(span)
            .await
    }

    async fn run_xsi(
        &self,
        name: &str,
        inputs: &FormInputs,
        account: &Account,
        accessor: &mut dyn PropertyAccessor,
    ) -> BwksResult<ExecutionReport> {
        debug!("executing XSI request");
        let mut client = self.xsi_client(account)?;
        let outcome = self.xsi.dispatch(&mut client, name, inputs, accessor).await?;
        Ok(ExecutionReport {
            operation: name.to_string(),
            protocol: Protocol::Xsi,
            output: outcome.to_string(),
            exchange: None,
        })
    }

    /// Bind and run an OCI-P request on a fresh, logged in client
    pub async fn execute_ocip(
        &self,
        name: &str,
        inputs: &FormInputs,
        admin: &AdminCredentials,
        accessor: &mut dyn PropertyAccessor,
    ) -> BwksResult<ExecutionReport> {
        let span = LogContext::with_operation("ocip", name)
            .with_field("admin", admin.username.as_str())
            .span(Level::INFO);
        self.run_ocip(name, inputs, admin, accessor)
            .instrument(span)
            .await
    }

    async fn run_ocip(
        &self,
        name: &str,
        inputs: &FormInputs,
        admin: &AdminCredentials,
        accessor: &mut dyn PropertyAccessor,
    ) -> BwksResult<ExecutionReport> {
        debug!("executing OCI-P request");
        let mut client = self.ocip_client(admin).await?;
        let outcome = self.ocip.dispatch(&mut client, name, inputs, accessor).await?;
        Ok(ExecutionReport {
            operation: name.to_string(),
            protocol: Protocol::Ocip,
            output: outcome.to_string(),
            exchange: client.last_exchange().cloned(),
        })
    }

    /// Cache the directory entry and device config of `account`
    pub async fn fetch_account_data(&self, account: &Account, accessor: &mut dyn PropertyAccessor) -> BwksResult<()> {
        let client = self.xsi_client(account)?;
        fetch_server_data(&client, accessor).await
    }

    /// Read a setting, resolving `deviceName` and `fileContent` through XSI
    pub async fn resolve_property(
        &self,
        name: &str,
        account: &Account,
        accessor: &mut dyn PropertyAccessor,
    ) -> BwksResult<PropertyValue> {
        let client = self.xsi_client(account)?;
        resolve_property(&client, accessor, name).await
    }

    /// Resolve the lazy settings a request's form needs
    ///
    /// A setting that cannot be resolved is logged and left unset, so the
    /// form falls back to its declared default.
    pub async fn resolve_form(
        &self,
        request: &Request,
        account: &Account,
        accessor: &mut dyn PropertyAccessor,
    ) -> BwksResult<()> {
        let lazy: Vec<&str> = request
            .args
            .iter()
            .map(|arg| arg.name)
            .filter(|name| LAZY_PROPERTIES.contains(name))
            .collect();
        if lazy.is_empty() {
            return Ok(());
        }
        let client = self.xsi_client(account)?;
        for name in lazy {
            if let Err(e) = resolve_property(&client, accessor, name).await {
                error!(property = name, error = %e, "failed to resolve property");
            }
        }
        Ok(())
    }

    /// Device types of the SCA endpoints assigned to `user_id`
    pub async fn sca_device_types(&self, admin: &AdminCredentials, user_id: &str) -> BwksResult<Vec<String>> {
        let mut client = self.ocip_client(admin).await?;
        let records = client.user_get_sca_list(user_id).await?;
        Ok(records
            .into_iter()
            .filter_map(|mut record| record.remove(SCA_DEVICE_TYPE_HEADING))
            .collect())
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("xsi", &self.xsi)
            .field("ocip", &self.ocip)
            .finish()
    }
}

fn render(request: Option<&'static Request>, name: &str, accessor: &dyn PropertyAccessor) -> BwksResult<RenderedRequest> {
    let request = request.ok_or_else(|| bwks_request_core::DispatchError::unknown_operation(name))?;
    Ok(RenderedRequest {
        request,
        fields: form_defaults(request, accessor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::InMemoryProperties;
    use bwks_request_core::ArgumentKind;

    fn console() -> Console {
        Console::new(BwksConfig::default().with_server("https://xsp.example.com")).unwrap()
    }

    #[test]
    fn test_render_prefills_stored_values() {
        let props = InMemoryProperties::new().with("deviceName", "pc1_alice");
        let rendered = console()
            .render_ocip("group_device_modify_config_file", &props)
            .unwrap();
        assert_eq!(rendered.field("deviceName").unwrap().value, PropertyValue::text("pc1_alice"));
        assert_eq!(rendered.field("fileFormat").unwrap().value, PropertyValue::text("config.xml"));
    }

    #[test]
    fn test_render_bool_defaults() {
        let rendered = console()
            .render_xsi("set_dnd", &InMemoryProperties::new())
            .unwrap();
        assert!(rendered
            .fields
            .iter()
            .any(|f| f.kind == ArgumentKind::Bool));
    }

    #[test]
    fn test_render_unknown_is_recoverable() {
        let err = console()
            .render_xsi("no_such_request", &InMemoryProperties::new())
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_report_display() {
        let report = ExecutionReport {
            operation: "user_get".to_string(),
            protocol: Protocol::Ocip,
            output: String::new(),
            exchange: Some(Exchange {
                command: "<cmd/>".to_string(),
                response: Some("<resp/>".to_string()),
            }),
        };
        assert_eq!(report.to_string(), "OCI Command: \n<cmd/>\nOCI Response:\n<resp/>\n");
    }
}
