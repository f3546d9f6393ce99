//! OCI-P sessions driven through a scripted transport

use bwks_ocip_core::{
    operation_table, signed_password, AuthState, FixedSessionId, GroupScope, NewUser, OciClient, OciError,
    ScriptedTransport, TestUser,
};
use bwks_request_core::{form_inputs, DiscardProperties};
use bwks_xml_core::parse;
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

const SESSION: &str = "sess-1";

fn response(command_type: &str, body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#,
            r#"<BroadsoftDocument protocol="OCI" xmlns="C" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<sessionId xmlns="">{}</sessionId>"#,
            r#"<command echo="" xsi:type="{}" xmlns="">{}</command></BroadsoftDocument>"#
        ),
        SESSION, command_type, body
    )
}

fn error_response(summary: &str) -> String {
    format!(
        concat!(
            r#"<BroadsoftDocument protocol="OCI" xmlns="C" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<sessionId xmlns="">{}</sessionId>"#,
            r#"<command type="Error" echo="" xsi:type="c:ErrorResponse" xmlns:c="C" xmlns="">"#,
            r#"<summary>{}</summary></command></BroadsoftDocument>"#
        ),
        SESSION, summary
    )
}

fn success() -> String {
    response("c:SuccessResponse", "")
}

fn client(transport: &ScriptedTransport) -> OciClient {
    OciClient::with_transport(
        Box::new(transport.clone()),
        &FixedSessionId(SESSION.to_string()),
        "admin@example.com",
        "secret",
    )
}

async fn logged_in(transport: &ScriptedTransport) -> OciClient {
    transport
        .reply(response("AuthenticationResponse", "<userId>admin@example.com</userId><nonce>1234567890</nonce><passwordAlgorithm>MD5</passwordAlgorithm>"))
        .reply(response(
            "LoginResponse14sp4",
            "<loginType>Group</loginType><serviceProviderId>sp1</serviceProviderId><groupId>grp1</groupId>",
        ));
    let mut client = client(transport);
    assert_ok!(client.login().await);
    client
}

fn command_text(message: &str, path: &str) -> Option<String> {
    let doc = parse(message).ok()?;
    doc.find(path).and_then(|e| e.text())
}

#[tokio::test]
async fn test_two_phase_login() {
    let transport = ScriptedTransport::new();
    let client = logged_in(&transport).await;

    assert_eq!(
        client.state(),
        &AuthState::Authenticated {
            scope: GroupScope::new("sp1", "grp1")
        }
    );

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    let auth = parse(&sent[0]).unwrap();
    assert_eq!(
        auth.find("command").and_then(|c| c.attribute("xsi:type")),
        Some("AuthenticationRequest")
    );
    assert_eq!(
        command_text(&sent[1], "command/signedPassword"),
        Some(signed_password("secret", "1234567890"))
    );
    for message in &sent {
        assert_eq!(command_text(message, "sessionId").as_deref(), Some(SESSION));
    }
}

#[tokio::test]
async fn test_commands_require_login() {
    let transport = ScriptedTransport::new();
    let mut client = client(&transport);

    let err = assert_err!(client.user_get("bob@example.com").await);
    assert!(matches!(err, OciError::Authentication { .. }));
    let err = assert_err!(client.login_request().await);
    assert!(matches!(err, OciError::Authentication { .. }));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_rejected_login_is_authentication_error() {
    let transport = ScriptedTransport::new();
    transport
        .reply(response("AuthenticationResponse", "<nonce>abc</nonce>"))
        .reply(error_response("[Error 4962] Invalid password"));
    let mut client = client(&transport);

    match client.login().await {
        Err(OciError::Authentication { message }) => assert_eq!(message, "[Error 4962] Invalid password"),
        other => panic!("expected authentication error, got {:?}", other),
    }
    assert_eq!(client.state(), &AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_error_response_carries_both_documents() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport.reply(error_response("[Error 4008] User not found: bob@example.com"));

    let err = assert_err!(client.user_get("bob@example.com").await);
    match err {
        OciError::Protocol { request, response } => {
            assert!(request.contains(r#"xsi:type="UserGetRequest21""#));
            assert!(response.contains("User not found"));
        }
        other => panic!("expected protocol error, got {:?}", other),
    }
    let exchange = client.last_exchange().unwrap();
    assert!(exchange.response.as_deref().unwrap_or_default().contains("Error 4008"));
}

#[tokio::test]
async fn test_group_scope_injected_and_overridable() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport.reply(success()).reply(success());

    assert_ok!(client.group_access_device_delete("pc1_bob").await);
    client.override_group(Some(GroupScope::new("sp2", "grp2")));
    assert_ok!(client.group_access_device_delete("pc1_bob").await);

    let sent = transport.sent();
    let own = parse(&sent[2]).unwrap();
    let names: Vec<&str> = own
        .find("command")
        .unwrap()
        .children()
        .map(|c| c.local_name())
        .collect();
    assert_eq!(names, vec!["serviceProviderId", "groupId", "deviceName"]);
    assert_eq!(command_text(&sent[2], "command/groupId").as_deref(), Some("grp1"));
    assert_eq!(command_text(&sent[3], "command/serviceProviderId").as_deref(), Some("sp2"));
    assert_eq!(command_text(&sent[3], "command/groupId").as_deref(), Some("grp2"));
}

#[tokio::test]
async fn test_user_add_takes_first_available_number() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport
        .reply(response(
            "GroupDnGetAvailableListResponse",
            "<phoneNumber>+358401234567</phoneNumber><phoneNumber>+358401234568</phoneNumber>",
        ))
        .reply(success())
        .reply(response(
            "UserGetResponse21",
            "<serviceProviderId>sp1</serviceProviderId><groupId>grp1</groupId><lastName>Builder</lastName><firstName>Bob</firstName><phoneNumber>+358401234567</phoneNumber><extension>4567</extension>",
        ));

    let user = NewUser::new("bob@example.com", "Builder", "Bob", "Welcom3");
    let data = assert_ok!(client.user_add(&user).await);
    assert_eq!(data["extension"], "4567");
    assert_eq!(data["userId"], "bob@example.com");

    let add = &transport.sent()[3];
    assert_eq!(command_text(add, "command/phoneNumber").as_deref(), Some("+358401234567"));
    assert_eq!(command_text(add, "command/extension").as_deref(), Some("4567"));
    assert_eq!(command_text(add, "command/callingLineIdLastName").as_deref(), Some("Builder"));
    assert_eq!(command_text(add, "command/callingLineIdFirstName").as_deref(), Some("Bob"));
}

#[tokio::test]
async fn test_create_test_user_reports_failed_step() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport
        .reply(response(
            "GroupDomainGetAssignedListResponse",
            "<groupDefaultDomain>example.com</groupDefaultDomain><domain>other.example.com</domain>",
        ))
        .reply(response("GroupDnGetAvailableListResponse", "<phoneNumber>+358401230001</phoneNumber>"))
        .reply(success())
        .reply(response("UserGetResponse21", "<lastName>Anderson</lastName>"))
        .reply(error_response("[Error 4200] Number already active"));

    let test_user = TestUser::new("Alice", "Anderson", "Welcom3");
    match client.create_test_user(&test_user).await {
        Err(OciError::StepFailed { step, completed, source }) => {
            assert_eq!(step, "activate number");
            assert_eq!(completed, vec!["get assigned domains", "get available numbers", "add user"]);
            assert!(matches!(*source, OciError::Protocol { .. }));
        }
        other => panic!("expected step failure, got {:?}", other),
    }

    let add = &transport.sent()[4];
    assert_eq!(command_text(add, "command/userId").as_deref(), Some("andersonalice@example.com"));
}

#[tokio::test]
async fn test_create_test_user_needs_default_domain() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport.reply(response("GroupDomainGetAssignedListResponse", ""));

    let test_user = TestUser::new("Alice", "Anderson", "Welcom3");
    match client.create_test_user(&test_user).await {
        Err(OciError::StepFailed { step, completed, source }) => {
            assert_eq!(step, "get assigned domains");
            assert!(completed.is_empty());
            assert!(matches!(
                *source,
                OciError::MissingElement { ref element, .. } if element == "groupDefaultDomain"
            ));
        }
        other => panic!("expected step failure, got {:?}", other),
    }
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test]
async fn test_reprovisioning_reports_created_devices() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport
        .reply(response("UserGetResponse21", "<lastName>Anderson</lastName>"))
        .reply(response("UserSharedCallAppearanceGetResponse16sp2", ""))
        .reply(success())
        .reply(error_response("[Error 4500] Line port already in use"));

    let result = client
        .provision_user_with_devices("alice@example.com", Some("Polycom-550"), &[])
        .await;
    match result {
        Err(OciError::StepFailed { step, completed, source }) => {
            assert!(step.starts_with("add primary endpoint p"), "step was {}", step);
            assert_eq!(completed.len(), 2);
            assert_eq!(completed[0], "delete devices");
            assert!(completed[1].starts_with("add device p") && completed[1].ends_with("_alice"));
            assert!(matches!(*source, OciError::Protocol { .. }));
        }
        other => panic!("expected step failure, got {:?}", other),
    }

    let endpoint_add = &transport.sent()[5];
    assert!(command_text(endpoint_add, "command/endpoint/accessDeviceEndpoint/linePort")
        .unwrap_or_default()
        .ends_with("_alice@example.com"));
}

#[tokio::test]
async fn test_reprovisioning_rejects_bare_user_id() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;

    let err = assert_err!(
        client
            .provision_user_with_devices("alice", Some("Polycom-550"), &[])
            .await
    );
    assert!(err.is_recoverable());
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn test_delete_user_reports_failed_step() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport
        .reply(response("UserGetResponse21", "<lastName>Anderson</lastName>"))
        .reply(response("UserSharedCallAppearanceGetResponse16sp2", ""))
        .reply(error_response("[Error 4008] User not found"));

    match client.delete_user_and_devices("alice@example.com").await {
        Err(OciError::StepFailed { step, completed, .. }) => {
            assert_eq!(step, "delete user");
            assert_eq!(completed, vec!["delete devices"]);
        }
        other => panic!("expected step failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_primary_endpoint_delete_sends_nil() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport.reply(success());

    assert_ok!(client.user_primary_endpoint_delete("bob@example.com").await);
    let doc = parse(&transport.sent()[2]).unwrap();
    let endpoint = doc.find("command/endpoint").unwrap();
    assert_eq!(endpoint.attribute("xsi:nil"), Some("true"));
}

#[tokio::test]
async fn test_dispatch_security_classification_default() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    transport.reply(response("UserSecurityClassificationGetResponse", ""));

    let table = operation_table().unwrap();
    let outcome = assert_ok!(
        table
            .dispatch(
                &mut client,
                "user_get_security_classification",
                &form_inputs([("userId", "bob@example.com")]),
                &mut DiscardProperties,
            )
            .await
    );
    assert_eq!(outcome.to_string(), "Unclassified");
}

#[tokio::test]
async fn test_dispatch_unknown_operation_is_recoverable() {
    let transport = ScriptedTransport::new();
    let mut client = logged_in(&transport).await;
    let table = operation_table().unwrap();

    let err = assert_err!(
        table
            .dispatch(&mut client, "user_teleport", &form_inputs([("userId", "bob")]), &mut DiscardProperties)
            .await
    );
    assert!(err.is_recoverable());
    assert_eq!(transport.sent().len(), 2);
}
