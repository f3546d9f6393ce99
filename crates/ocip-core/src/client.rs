//! OCI-P session: login handshake and command exchange

use crate::command::{build_command, render, response_type, CommandElement};
use crate::config::OciConfig;
use crate::error::{OciError, OciResult};
use crate::session::{signed_password, AuthState, GroupScope, LabelledSessionId, SessionIdGenerator};
use crate::transport::{OciTransport, SoapTransport};
use bwks_xml_core::{node_value, parse, Document};
use std::fmt;
use tracing::{debug, info, trace, warn};

/// The last command sent and the reply it got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub command: String,
    pub response: Option<String>,
}

/// OCI-P client owned by one conversation
///
/// Commands take `&mut self`; a client is never shared between callers.
pub struct OciClient {
    transport: Box<dyn OciTransport>,
    username: String,
    password: String,
    session_id: String,
    state: AuthState,
    group_override: Option<GroupScope>,
    last_exchange: Option<Exchange>,
}

impl OciClient {
    /// Client posting to the SOAP service derived from `config`; not logged in yet
    pub fn new(config: &OciConfig, username: impl Into<String>, password: impl Into<String>) -> OciResult<Self> {
        let transport = SoapTransport::new(config)?;
        info!(location = transport.location(), "OCI-P client created");
        Ok(Self::with_transport(
            Box::new(transport),
            &LabelledSessionId::new(config.session_label.clone()),
            username,
            password,
        ))
    }

    /// Client over any transport, with the session id drawn once from `ids`
    pub fn with_transport(
        transport: Box<dyn OciTransport>,
        ids: &dyn SessionIdGenerator,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            username: username.into(),
            password: password.into(),
            session_id: ids.session_id(),
            state: AuthState::Unauthenticated,
            group_override: None,
            last_exchange: None,
        }
    }

    /// Create and log in
    pub async fn connect(config: &OciConfig, username: impl Into<String>, password: impl Into<String>) -> OciResult<Self> {
        let mut client = Self::new(config, username, password)?;
        client.login().await?;
        Ok(client)
    }

    /// Run both handshake phases
    pub async fn login(&mut self) -> OciResult<()> {
        self.authentication_request().await?;
        self.login_request().await?;
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn last_exchange(&self) -> Option<&Exchange> {
        self.last_exchange.as_ref()
    }

    /// Scope group commands to another group than the admin's own
    pub fn override_group(&mut self, scope: Option<GroupScope>) {
        self.group_override = scope;
    }

    /// Group used by group-scoped commands
    pub fn group_scope(&self) -> OciResult<GroupScope> {
        if let Some(scope) = &self.group_override {
            return Ok(scope.clone());
        }
        self.state.scope().cloned()
    }

    /// First handshake phase: obtain a nonce
    pub async fn authentication_request(&mut self) -> OciResult<Document> {
        let user = CommandElement::text("userId", self.username.clone());
        let response = self
            .exchange("AuthenticationRequest", &[user])
            .await
            .map_err(handshake_error)?;
        let nonce = node_value(response.root(), "command/nonce")
            .ok_or_else(|| OciError::authentication("authentication response carries no nonce"))?;
        debug!(user = %self.username, "OCI-P nonce received");
        self.state = AuthState::Challenged { nonce };
        Ok(response)
    }

    /// Second handshake phase: consume the nonce and log in
    pub async fn login_request(&mut self) -> OciResult<Document> {
        let nonce = self.state.take_nonce()?;
        let elements = [
            CommandElement::text("userId", self.username.clone()),
            CommandElement::text("signedPassword", signed_password(&self.password, &nonce)),
        ];
        let response = self
            .exchange("LoginRequest14sp4", &elements)
            .await
            .map_err(handshake_error)?;

        let scope = GroupScope::new(
            node_value(response.root(), "command/serviceProviderId").unwrap_or_default(),
            node_value(response.root(), "command/groupId").unwrap_or_default(),
        );
        info!(
            user = %self.username,
            service_provider = %scope.service_provider_id,
            group = %scope.group_id,
            "OCI-P login accepted"
        );
        self.state = AuthState::Authenticated { scope };
        Ok(response)
    }

    pub async fn logout_request(&mut self) -> OciResult<Document> {
        let user = CommandElement::text("userId", self.username.clone());
        let response = self.send("LogoutRequest", &[user]).await?;
        self.state = AuthState::Unauthenticated;
        info!(user = %self.username, "OCI-P logout");
        Ok(response)
    }

    /// Send a command; requires a completed login
    pub async fn send(&mut self, command_type: &str, elements: &[CommandElement]) -> OciResult<Document> {
        if !self.is_authenticated() {
            return Err(OciError::authentication(format!(
                "{} requires a logged in session",
                command_type
            )));
        }
        self.exchange(command_type, elements).await
    }

    /// Send a group command with `serviceProviderId` and `groupId` in front
    pub async fn send_group(&mut self, command_type: &str, elements: &[CommandElement]) -> OciResult<Document> {
        let scope = self.group_scope()?;
        let mut scoped = Vec::with_capacity(elements.len() + 2);
        scoped.push(CommandElement::text("serviceProviderId", scope.service_provider_id));
        scoped.push(CommandElement::text("groupId", scope.group_id));
        scoped.extend_from_slice(elements);
        self.send(command_type, &scoped).await
    }

    async fn exchange(&mut self, command_type: &str, elements: &[CommandElement]) -> OciResult<Document> {
        let request = render(&build_command(&self.session_id, command_type, elements)?)?;
        trace!(command = command_type, request = %request, "OCI-P command");
        self.last_exchange = Some(Exchange {
            command: request.clone(),
            response: None,
        });

        let reply = self.transport.process(&request).await?;
        trace!(command = command_type, response = %reply, "OCI-P response");
        if let Some(exchange) = self.last_exchange.as_mut() {
            exchange.response = Some(reply.clone());
        }

        let response = parse(&reply)?;
        if response_type(&response).as_deref() == Some("Error") {
            warn!(
                command = command_type,
                summary = node_value(response.root(), "command/summary").as_deref().unwrap_or(""),
                "OCI-P error response"
            );
            return Err(OciError::protocol(request, reply));
        }
        Ok(response)
    }
}

fn handshake_error(error: OciError) -> OciError {
    match error {
        OciError::Protocol { response, .. } => {
            let summary = parse(&response)
                .ok()
                .and_then(|doc| node_value(doc.root(), "command/summary"))
                .unwrap_or(response);
            OciError::authentication(summary)
        }
        other => other,
    }
}

impl fmt::Debug for OciClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OciClient")
            .field("username", &self.username)
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("group_override", &self.group_override)
            .finish()
    }
}
