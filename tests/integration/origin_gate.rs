//! Origin verification for embedded frames

use super::test_utils::{bind, top_and_frame};
use frame_relay::host::MemoryHost;
use frame_relay::listener::ORIGIN_NOT_VERIFIED;
use frame_relay::simulation::{run_handshake, HandshakeScenario};
use frame_relay::{build_message, ContentKind, MessageKind, ReplyOriginPolicy, TargetOrigin};

const TOP_URL: &str = "https://app.example/";
const FRAME_URL: &str = "https://login.example/frame";

fn forged_ack() -> serde_json::Value {
    build_message(
        MessageKind::Url,
        ContentKind::UrlTopFrame,
        "https://attacker.example/",
    )
    .to_wire()
}

#[test]
fn test_foreign_window_is_rejected() {
    let (host, _top, frame) = top_and_frame(TOP_URL, FRAME_URL);
    frame
        .listener
        .cache()
        .write(ContentKind::UrlNavigate, "https://idp.example/auth");
    let attacker = host.open_top("https://attacker.example/").unwrap();

    host.post_from(attacker, frame.window, forged_ack(), &TargetOrigin::Any);
    assert_eq!(host.run_until_idle(), 1);

    assert_eq!(
        frame.diagnostics.warnings(),
        vec![ORIGIN_NOT_VERIFIED.to_string()]
    );
    assert_eq!(frame.listener.cache().read(ContentKind::UrlTopFrame), None);
    assert_eq!(host.delivered().len(), 1, "no reply may be sent");
}

#[test]
fn test_sibling_frame_is_rejected() {
    let (host, top, frame) = top_and_frame(TOP_URL, FRAME_URL);
    let sibling = host.open_embedded(top.window, "https://ads.example/").unwrap();

    host.post_from(sibling, frame.window, forged_ack(), &TargetOrigin::Any);
    host.run_until_idle();

    assert_eq!(frame.diagnostics.warnings().len(), 1);
    assert!(frame.listener.cache().is_empty());
}

#[test]
fn test_intermediate_parent_is_not_the_top() {
    let host = MemoryHost::new();
    let top = host.open_top(TOP_URL).unwrap();
    let middle = host.open_embedded(top, "https://widgets.example/").unwrap();
    let inner = host.open_embedded(middle, FRAME_URL).unwrap();
    let inner = bind(&host, inner, ReplyOriginPolicy::Echo);
    inner
        .listener
        .cache()
        .write(ContentKind::UrlNavigate, "https://idp.example/auth");

    host.post_from(middle, inner.window, forged_ack(), &TargetOrigin::Any);
    assert_eq!(host.run_until_idle(), 1);

    assert_eq!(inner.diagnostics.warnings().len(), 1);
    assert_eq!(inner.listener.cache().read(ContentKind::UrlTopFrame), None);
}

#[test]
fn test_every_unverified_message_warns_once() {
    let (host, _top, frame) = top_and_frame(TOP_URL, FRAME_URL);
    let attacker = host.open_top("https://attacker.example/").unwrap();

    host.post_from(
        attacker,
        frame.window,
        serde_json::json!("noise"),
        &TargetOrigin::Any,
    );
    host.post_from(attacker, frame.window, forged_ack(), &TargetOrigin::Any);
    host.run_until_idle();

    assert_eq!(frame.diagnostics.warnings().len(), 2);
}

#[test]
fn test_spoofed_ack_does_not_derail_handshake() {
    let scenario = HandshakeScenario {
        spoof_acknowledgment: true,
        ..HandshakeScenario::default()
    };
    let report = run_handshake(&scenario, ReplyOriginPolicy::Echo).unwrap();

    assert!(report.completed);
    assert_eq!(report.warnings, vec![ORIGIN_NOT_VERIFIED.to_string()]);
    assert_eq!(
        report.cached_top_frame.as_deref(),
        Some("https://app.example/")
    );
    assert_eq!(report.deliveries.len(), 4);
}
