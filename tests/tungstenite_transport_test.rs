//! Status channel over a real socket, against in-process axum servers.

mod common;

use std::sync::Arc;
use std::time::Duration;

use arena_dashboard::adapters::{MemoryPage, TungsteniteTransport};
use arena_dashboard::channel::{ChannelClient, ChannelConfig, ChannelState, StatusDisplay};
use arena_dashboard::config::DashboardConfig;
use arena_dashboard::traits::{element_ids, ChannelTransport, TransportEvent};
use common::{start_socket_server, wait_until, ServerMode};
use tokio::time::timeout;

async fn next_event(link: &mut arena_dashboard::traits::TransportLink) -> TransportEvent {
    timeout(Duration::from_secs(2), link.events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("link closed")
}

#[tokio::test]
async fn test_echo_round_trip() {
    let addr = start_socket_server(ServerMode::Echo).await;
    let transport = TungsteniteTransport::new();
    let mut link = transport
        .open(&format!("ws://{}/game_running", addr))
        .await
        .unwrap();

    assert_eq!(next_event(&mut link).await, TransportEvent::Opened);
    link.outbound.send("Game(s) running".to_string()).await.unwrap();
    assert_eq!(
        next_event(&mut link).await,
        TransportEvent::Message("Game(s) running".to_string())
    );
}

#[tokio::test]
async fn test_server_close_is_clean() {
    let addr = start_socket_server(ServerMode::AnnounceAndClose).await;
    let transport = TungsteniteTransport::new();
    let mut link = transport
        .open(&format!("ws://{}/game_running", addr))
        .await
        .unwrap();

    assert_eq!(next_event(&mut link).await, TransportEvent::Opened);
    assert_eq!(
        next_event(&mut link).await,
        TransportEvent::Message("Idle".to_string())
    );
    assert_eq!(
        next_event(&mut link).await,
        TransportEvent::Closed {
            clean: true,
            code: Some(1000)
        }
    );
}

#[tokio::test]
async fn test_dropped_connection_is_broken() {
    let addr = start_socket_server(ServerMode::Drop).await;
    let transport = TungsteniteTransport::new();
    let mut link = transport
        .open(&format!("ws://{}/game_running", addr))
        .await
        .unwrap();

    assert_eq!(next_event(&mut link).await, TransportEvent::Opened);
    loop {
        match next_event(&mut link).await {
            TransportEvent::Errored(_) => continue,
            event => {
                assert_eq!(
                    event,
                    TransportEvent::Closed {
                        clean: false,
                        code: None
                    }
                );
                break;
            }
        }
    }
}

#[tokio::test]
async fn test_client_teardown_completes_handshake() {
    let addr = start_socket_server(ServerMode::Echo).await;
    let page = Arc::new(MemoryPage::new());
    let display = Arc::new(StatusDisplay::new(page.clone(), element_ids::STATUS));

    let client = ChannelClient::init(
        Arc::new(TungsteniteTransport::new()),
        ChannelConfig::new(addr.to_string()),
        display.clone(),
    )
    .await
    .unwrap();

    let mut state = client.state_receiver();
    wait_until(&mut state, |s| *s == ChannelState::Open).await;

    client.send_message("ping").await.unwrap();
    // Echo arrives as a status line while the state stays open
    timeout(Duration::from_secs(2), async {
        while display.last_message().map(|m| m.text) != Some("ping".to_string()) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("echo not displayed");
    assert_eq!(client.state(), ChannelState::Open);

    client.teardown();
    let closed = timeout(Duration::from_secs(2), client.closed())
        .await
        .expect("close handshake did not finish");
    assert_eq!(closed, ChannelState::Closed { clean: true });
    assert!(page
        .content(element_ids::STATUS)
        .unwrap()
        .contains("Clean connection end"));
}

#[tokio::test]
async fn test_refused_connection_reports_broken() {
    let page = Arc::new(MemoryPage::new());
    let display = Arc::new(StatusDisplay::new(page, element_ids::STATUS));

    // Nothing listens here; construction still succeeds
    let client = ChannelClient::init(
        Arc::new(TungsteniteTransport::new()),
        ChannelConfig::new("127.0.0.1:59998"),
        display.clone(),
    )
    .await
    .unwrap();

    let closed = timeout(Duration::from_secs(5), client.closed())
        .await
        .expect("refused connect was not reported");
    assert_eq!(closed, ChannelState::Closed { clean: false });
    assert_eq!(display.last_message().unwrap().text, "Connection broken");
}

#[tokio::test]
async fn test_secure_only_falls_back_to_wss_url() {
    let page = Arc::new(MemoryPage::new());
    let display = Arc::new(StatusDisplay::new(page, element_ids::STATUS));

    let client = ChannelClient::init(
        Arc::new(TungsteniteTransport::new().secure_only(true)),
        ChannelConfig::new("127.0.0.1:59997"),
        display,
    )
    .await
    .unwrap();

    assert_eq!(client.url(), "wss://127.0.0.1:59997/game_running");
}

#[tokio::test]
async fn test_tls_backend_channel_uses_wss() {
    let page = Arc::new(MemoryPage::new());
    let display = Arc::new(StatusDisplay::new(page, element_ids::STATUS));
    let config = DashboardConfig::default()
        .with_backend("127.0.0.1:59996")
        .with_tls(true);

    let client = ChannelClient::init(
        Arc::new(TungsteniteTransport::new().secure_only(config.secure_sockets())),
        config.channel_config(),
        display,
    )
    .await
    .unwrap();

    assert!(config.results_url().starts_with("https://"));
    assert_eq!(client.url(), "wss://127.0.0.1:59996/game_running");
}
