mod common;

use std::{io, sync::Arc};

use common::{action, config, MockTransport, WSDL_HOST};
use memoq::{
    Config, Element, Error, FileManagerService, LicenseService, LiveDocsService, ResourceService,
    SecurityService, ServerProjectService, Service, ServiceKind, TasksService, TbService,
    TmService, WebService, MEMOQ_NAMESPACE,
};

fn version_of<S: Service>(config: &Config, transport: &Arc<MockTransport>) -> String {
    transport.respond_with("GetApiVersion", "9.12.8");
    S::connect_with(config, transport.clone())
        .unwrap()
        .get_api_version()
        .unwrap()
}

#[test]
fn every_service_calls_the_base_host() {
    let config = config("routing");
    let transport = MockTransport::new();

    for kind in ServiceKind::ALL {
        let service = WebService::connect(kind, &config, transport.clone()).unwrap();
        transport.respond_with("GetApiVersion", "9.12.8");
        service.call("GetApiVersion", Vec::new()).unwrap();
    }

    let posted = transport.posted();
    assert_eq!(posted.len(), ServiceKind::ALL.len());

    for (kind, request) in ServiceKind::ALL.iter().zip(&posted) {
        assert_eq!(request.url.host_str(), Some("routing.memoq.test"));
        assert_ne!(request.url.host_str(), Some(WSDL_HOST));
        assert_eq!(request.url.port(), Some(8080));
        assert_eq!(
            request.url.path(),
            format!("/memoqservices/{0}/{0}Service", kind.name())
        );
    }
}

#[test]
fn get_api_version_returns_the_server_string() {
    let config = config("version");
    let transport = MockTransport::new();

    assert_eq!(version_of::<ServerProjectService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<TmService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<TbService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<FileManagerService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<SecurityService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<LicenseService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<LiveDocsService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<ResourceService>(&config, &transport), "9.12.8");
    assert_eq!(version_of::<TasksService>(&config, &transport), "9.12.8");
}

#[test]
fn requests_carry_action_and_namespace() {
    let config = config("envelope");
    let transport = MockTransport::new();
    let tm = TmService::connect_with(&config, transport.clone()).unwrap();

    transport.respond_with("GetApiVersion", "9.12.8");
    tm.get_api_version().unwrap();

    let posted = transport.posted();
    let request = &posted[0];
    assert_eq!(request.content_type, "text/xml; charset=utf-8");
    assert_eq!(
        request.soap_action.as_deref(),
        Some(action("tm", "GetApiVersion").as_str())
    );
    assert!(request.body.contains(&format!(
        r#"<soap:Body><GetApiVersion xmlns="{}"></GetApiVersion></soap:Body>"#,
        MEMOQ_NAMESPACE
    )));
    assert!(!request.body.contains("soap:Header"));
}

#[test]
fn typed_methods_use_wire_parameter_names() {
    let config = config("typed");
    let transport = MockTransport::new();
    let tm = TmService::connect_with(&config, transport.clone()).unwrap();

    transport.respond_with("ListTMs", "");
    let response = tm.list_tms("eng", None::<&str>).unwrap();
    assert!(response.items().is_empty());

    let posted = transport.posted();
    let body = &posted[0].body;
    assert!(body.contains("<srcLang>eng</srcLang>"));
    assert!(body.contains(r#"<targetLang xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:nil="true"/>"#));
}

#[test]
fn transport_errors_propagate_unchanged() {
    let config = config("unreachable");
    let transport = MockTransport::new();
    let projects = ServerProjectService::connect_with(&config, transport.clone()).unwrap();

    transport.fail_with(io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into());

    match projects.get_api_version() {
        Err(Error::Soap(memoq_util::Error::Io(err))) => {
            assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
            assert_eq!(err.to_string(), "refused");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn soap_faults_propagate_with_server_code() {
    let config = config("fault");
    let transport = MockTransport::new();
    let projects = ServerProjectService::connect_with(&config, transport.clone()).unwrap();

    transport.respond(
        500,
        common::envelope(concat!(
            "<s:Fault><faultcode>s:Client</faultcode>",
            "<faultstring>No such project.</faultstring></s:Fault>"
        )),
    );

    match projects.get_project("00000000-0000-0000-0000-000000000000") {
        Err(Error::Soap(memoq_util::Error::Fault(fault))) => {
            assert_eq!(fault.code, "s:Client");
            assert_eq!(fault.message, "No such project.");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn identical_calls_make_separate_round_trips() {
    let config = config("repeat");
    let transport = MockTransport::new();
    let tb = TbService::connect_with(&config, transport.clone()).unwrap();

    transport.respond_with("ListTBs", "<TBInfo><Name>First</Name></TBInfo>");
    transport.respond_with("ListTBs", "<TBInfo><Name>Second</Name></TBInfo>");

    let first = tb.list_tbs().unwrap();
    let second = tb.list_tbs().unwrap();

    let posted = transport.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].body, posted[1].body);
    assert_ne!(first, second);
}

#[test]
fn unknown_operations_are_rejected_locally() {
    let config = config("unknown");
    let transport = MockTransport::new();
    let tm = TmService::connect_with(&config, transport.clone()).unwrap();

    match tm.concordance("tm-guid", Vec::<Element>::new(), None::<&str>) {
        Err(Error::UnknownOperation { service, operation }) => {
            assert_eq!(service, ServiceKind::Tm);
            assert_eq!(operation, "Concordance");
        }
        other => panic!("unexpected result {:?}", other),
    }

    assert!(transport.posted().is_empty());
}

#[test]
fn api_key_is_sent_as_a_soap_header() {
    let config = config("apikey").with_api_key("0123-secret");
    let transport = MockTransport::new();
    let security = SecurityService::connect_with(&config, transport.clone()).unwrap();

    transport.respond_with("ListUsers", "");
    security.list_users().unwrap();

    assert!(transport.posted()[0]
        .body
        .contains("<soap:Header><ApiKey>0123-secret</ApiKey></soap:Header>"));
}

#[test]
fn wsdl_is_loaded_once_per_service() {
    let config = config("cached");
    let transport = MockTransport::new();

    let first = LiveDocsService::connect_with(&config, transport.clone()).unwrap();
    let second = LiveDocsService::connect_with(&config, transport.clone()).unwrap();

    assert_eq!(first.endpoint(), second.endpoint());
    assert_eq!(
        transport.fetched(),
        [ServiceKind::LiveDocs.wsdl_url(config.base_url()).unwrap()]
    );
    assert!(first.operations().contains(&"ListCorpora"));
}

#[test]
fn soap12_only_services_send_the_action_in_the_content_type() {
    let config = config("soap12");
    let transport = MockTransport::soap12_only();
    let tm = TmService::connect_with(&config, transport.clone()).unwrap();

    transport.respond_with("GetApiVersion", "9.12.8");
    assert_eq!(tm.get_api_version().unwrap(), "9.12.8");

    let posted = transport.posted();
    let request = &posted[0];
    assert_eq!(request.url.host_str(), Some("soap12.memoq.test"));
    assert_eq!(
        request.content_type,
        format!(
            r#"application/soap+xml; charset=utf-8; action="{}""#,
            action("tm", "GetApiVersion")
        )
    );
    assert_eq!(request.soap_action, None);
    assert!(request
        .body
        .contains(r#"xmlns:soap="http://www.w3.org/2003/05/soap-envelope""#));
}
