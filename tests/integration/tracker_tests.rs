use crate::common::*;
use ticket_link::{RequestError, TrackerSchema};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_legacy_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .and(body_string_contains("username=agent"))
        .and(body_string_contains("password=secret"))
        .respond_with(html(DASHBOARD))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_valid_session_fetches_once() {
    let server = MockServer::start().await;
    mount_legacy_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .and(query_param("id", "123456"))
        .respond_with(html(LEGACY_TICKET))
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);

    let first = tracker.get_ticket_data("123456").await.unwrap();
    assert_eq!(first.ticket_label, "Ticket #123456");
    assert_eq!(first.title, "Printer on second floor is jammed");
    assert_eq!(first.url, format!("{}/tickets.php?id=123456", server.uri()));
    assert!(tracker.has_session());

    let second = tracker.get_ticket_data("123456").await.unwrap();
    assert_eq!(first, second);

    assert_eq!(
        request_paths(&server).await,
        vec!["/login.php", "/tickets.php", "/tickets.php"]
    );
}

#[tokio::test]
async fn test_expired_session_relogs_once() {
    let server = MockServer::start().await;
    mount_legacy_login(&server).await;

    // The first ticket request finds the session expired
    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_LOGIN))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_TICKET))
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    let data = tracker.get_ticket_data("123456").await.unwrap();

    assert_eq!(data.ticket_label, "Ticket #123456");
    assert_eq!(
        request_paths(&server).await,
        vec!["/login.php", "/tickets.php", "/login.php", "/tickets.php"]
    );
}

#[tokio::test]
async fn test_expired_session_never_retries_twice() {
    let server = MockServer::start().await;
    mount_legacy_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_LOGIN))
        .expect(2)
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    let result = tracker.get_ticket_data("123456").await;

    assert!(matches!(result, Err(RequestError::InvalidCredentials)));
    assert_eq!(
        request_paths(&server).await,
        vec!["/login.php", "/tickets.php", "/login.php", "/tickets.php"]
    );
}

#[tokio::test]
async fn test_rejected_login_stops_before_ticket() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html(LEGACY_LOGIN))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_TICKET))
        .expect(0)
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    let result = tracker.get_ticket_data("123456").await;

    match result {
        Err(e @ RequestError::InvalidCredentials) => {
            assert!(e.to_string().contains("Login name or password is incorrect"))
        }
        other => panic!("expected InvalidCredentials, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scp_login_posts_csrf_token_and_keeps_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scp/login.php"))
        .and(body_string_contains("do=scplogin"))
        .and(body_string_contains("userid=agent"))
        .and(body_string_contains("passwd=secret"))
        .and(body_string_contains("__CSRFToken__=9f0a6c1e2b7d4e55a1c3"))
        .respond_with(html(DASHBOARD).insert_header("set-cookie", "OSTSESSID=abc123; Path=/"))
        .expect(1)
        .mount(&server)
        .await;

    // Token harvest: the plain login form
    Mock::given(method("POST"))
        .and(path("/scp/login.php"))
        .respond_with(html(SCP_LOGIN))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/scp/tickets.php"))
        .and(query_param("id", "42"))
        .and(header("cookie", "OSTSESSID=abc123"))
        .respond_with(html(SCP_TICKET))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/scp/", server.uri());
    let mut tracker = create_tracker(&base_url, TrackerSchema::Scp);
    let data = tracker.get_ticket_data("42").await.unwrap();

    assert_eq!(data.ticket_label, "Ticket #387622");
    assert_eq!(data.title, "Cannot access VPN from home office");
    assert_eq!(data.url, format!("{}tickets.php?id=42", base_url));
}

#[tokio::test]
async fn test_scp_login_without_token_is_unexpected_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html("<html><body><h1>Maintenance</h1></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Scp);
    let result = tracker.get_ticket_data("42").await;

    assert!(matches!(result, Err(RequestError::UnexpectedPage { .. })));
}

#[tokio::test]
async fn test_config_update_reaches_next_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html(DASHBOARD))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_TICKET))
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    tracker.get_ticket_data("123456").await.unwrap();

    tracker
        .set_config([("user", "boss"), ("password", "new-secret")])
        .unwrap();
    assert!(!tracker.has_session());

    tracker.get_ticket_data("123456").await.unwrap();

    let logins = request_bodies(&server, "/login.php").await;
    assert_eq!(logins.len(), 2);
    assert!(logins[0].contains("username=agent"));
    assert!(logins[1].contains("username=boss"));
    assert!(logins[1].contains("password=new-secret"));
}

#[tokio::test]
async fn test_unchanged_config_keeps_session() {
    let server = MockServer::start().await;
    mount_legacy_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_TICKET))
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    tracker.get_ticket_data("123456").await.unwrap();

    tracker
        .set_config([("user", "agent"), ("password", "secret")])
        .unwrap();
    assert!(tracker.has_session());

    tracker.get_ticket_data("123456").await.unwrap();
    assert_eq!(request_bodies(&server, "/login.php").await.len(), 1);
}

#[tokio::test]
async fn test_missing_ticket_page_is_unexpected_page() {
    let server = MockServer::start().await;
    mount_legacy_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html><body>Not Found</body></html>"))
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    let result = tracker.get_ticket_data("999").await;

    match result {
        Err(RequestError::UnexpectedPage { url, .. }) => {
            assert_eq!(url, format!("{}/tickets.php?id=999", server.uri()))
        }
        other => panic!("expected UnexpectedPage, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_login_keeps_no_session() {
    let server = MockServer::start().await;

    // First login is rejected, later ones succeed
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html(LEGACY_LOGIN))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html(DASHBOARD))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_TICKET))
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);

    let result = tracker.get_ticket_data("123456").await;
    assert!(matches!(result, Err(RequestError::InvalidCredentials)));
    assert!(!tracker.has_session());

    let data = tracker.get_ticket_data("123456").await.unwrap();
    assert_eq!(data.ticket_label, "Ticket #123456");
    assert_eq!(
        request_paths(&server).await,
        vec!["/login.php", "/login.php", "/tickets.php"]
    );
}

#[tokio::test]
async fn test_rejected_relogin_after_expired_session() {
    let server = MockServer::start().await;

    // The first login succeeds, the relogin is rejected
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html(DASHBOARD))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(html(LEGACY_LOGIN))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets.php"))
        .respond_with(html(LEGACY_LOGIN))
        .expect(1)
        .mount(&server)
        .await;

    let mut tracker = create_tracker(&server.uri(), TrackerSchema::Legacy);
    let result = tracker.get_ticket_data("123456").await;

    assert!(matches!(result, Err(RequestError::InvalidCredentials)));
    assert!(!tracker.has_session());
    assert_eq!(
        request_paths(&server).await,
        vec!["/login.php", "/tickets.php", "/login.php"]
    );
}

#[tokio::test]
async fn test_scp_expired_session_harvests_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scp/login.php"))
        .and(body_string_contains("do=scplogin"))
        .and(body_string_contains("__CSRFToken__=9f0a6c1e2b7d4e55a1c3"))
        .respond_with(html(DASHBOARD))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/scp/login.php"))
        .respond_with(html(SCP_LOGIN))
        .expect(2)
        .mount(&server)
        .await;

    // The first ticket request finds the session expired
    Mock::given(method("POST"))
        .and(path("/scp/tickets.php"))
        .respond_with(html(SCP_LOGIN))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/scp/tickets.php"))
        .respond_with(html(SCP_TICKET))
        .mount(&server)
        .await;

    let base_url = format!("{}/scp/", server.uri());
    let mut tracker = create_tracker(&base_url, TrackerSchema::Scp);
    let data = tracker.get_ticket_data("42").await.unwrap();

    assert_eq!(data.ticket_label, "Ticket #387622");
    assert!(tracker.has_session());
    assert_eq!(
        request_paths(&server).await,
        vec![
            "/scp/login.php",
            "/scp/login.php",
            "/scp/tickets.php",
            "/scp/login.php",
            "/scp/login.php",
            "/scp/tickets.php",
        ]
    );

    let logins = request_bodies(&server, "/scp/login.php").await;
    assert_eq!(logins.len(), 4);
    assert!(logins[0].is_empty());
    assert!(logins[1].contains("do=scplogin"));
    assert!(logins[2].is_empty());
    assert!(logins[3].contains("do=scplogin"));
}
