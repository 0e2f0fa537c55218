//! Edge case tests for fos-codec-guard
//!
//! Rules, guarded APIs and installation against a full media window.

use std::sync::Arc;

use fos_codec_guard::config::{AV1_ONLY_KEY, BLOCK_60FPS_KEY, ENABLE_KEY};
use fos_codec_guard::*;
use fos_media::*;
use serde_json::json;

fn flags() -> Arc<FlagTable> {
    Arc::new(FlagTable::new())
}

fn installed_window(flags: &Arc<FlagTable>) -> MediaWindow {
    let window = MediaWindow::native().without_battery();
    let outcome = smol::block_on(CodecGuard::new(flags.clone()).install_if_enabled(&window));
    assert!(matches!(outcome, InstallOutcome::Installed(_)));
    window
}

// ============================================================================
// RULE TESTS
// ============================================================================

#[test]
fn test_default_blocks_every_non_h264_token() {
    let policy = CodecPolicy::new(flags());
    for token in ["webm", "vp8", "vp9", "av01", "av1", "vp08", "vp09"] {
        assert!(policy.is_disallowed_type(&format!("video/x-{token}")), "{token}");
        assert!(policy.is_disallowed_type(&format!("video/mp4; codecs=\"{token}.0\"")), "{token}");
    }
    assert!(!policy.is_disallowed_type("video/mp4; codecs=\"avc1.42e01e\""));
}

#[test]
fn test_av1_only_mode() {
    let flags = flags();
    flags.set(AV1_ONLY_KEY, "true");
    let policy = CodecPolicy::new(flags);

    assert!(!policy.is_disallowed_type("video/webm; codecs=\"vp9\""));
    assert!(policy.is_disallowed_type("video/webm; codecs=\"vp8\""));
    assert!(policy.is_disallowed_type("video/mp4; codecs=\"av1\""));
}

#[test]
fn test_high_framerate_without_codec_token() {
    let flags = flags();
    flags.set(BLOCK_60FPS_KEY, true);
    let policy = CodecPolicy::new(flags);

    assert!(policy.is_disallowed_type("video/mp4;framerate=60"));
    assert!(!policy.is_disallowed_type("video/mp4;framerate=24"));
}

#[test]
fn test_decoding_config_never_fails() {
    let policy = CodecPolicy::new(flags());
    assert!(!policy.is_disallowed_decoding_config(None));
    assert!(!policy.is_disallowed_decoding_config(Some(&MediaDecodingConfiguration::default())));

    // Page-supplied junk
    for value in [
        json!({}),
        json!({ "video": null }),
        json!({ "video": 7 }),
        json!({ "video": { "contentType": ["video/webm"] } }),
        json!({ "video": { "framerate": "120" } }),
    ] {
        let config = MediaDecodingConfiguration::from_json(value.clone());
        assert!(!policy.is_disallowed_decoding_config(config.as_ref()), "{value}");
    }
}

#[test]
fn test_decoding_config_from_page_json() {
    let flags = flags();
    flags.set(BLOCK_60FPS_KEY, "true");
    let policy = CodecPolicy::new(flags);

    let config = MediaDecodingConfiguration::from_json(json!({
        "type": "media-source",
        "video": {
            "contentType": "video/mp4; codecs=\"avc1.64002a\"",
            "width": 1920,
            "height": 1080,
            "bitrate": 4_000_000,
            "framerate": 60
        }
    }));
    assert!(policy.is_disallowed_decoding_config(config.as_ref()));
}

// ============================================================================
// GUARDED API TESTS
// ============================================================================

#[test]
fn test_sentinel_shapes_never_cross() {
    let flags = flags();
    let window = installed_window(&flags);

    let empty: CanPlayType = window.can_play_type(None).unwrap();
    assert_eq!(empty.as_str(), "");
    let unsupported: bool = window.is_type_supported(None).unwrap();
    assert!(!unsupported);

    assert_eq!(window.can_play_type(Some("video/webm; codecs=\"vp9\"")).unwrap().as_str(), "");
    assert!(!window.is_type_supported(Some("video/webm; codecs=\"vp9\"")).unwrap());
}

#[test]
fn test_allowed_types_keep_native_answers() {
    let flags = flags();
    let window = installed_window(&flags);

    assert_eq!(
        window.can_play_type(Some("video/mp4; codecs=\"avc1.42E01E\"")).unwrap(),
        CanPlayType::Probably
    );
    assert_eq!(window.can_play_type(Some("video/mp4")).unwrap(), CanPlayType::Maybe);
    assert_eq!(window.can_play_type(Some("video/x-flv")).unwrap(), CanPlayType::Empty);
    assert!(window.is_type_supported(Some("video/mp4; codecs=\"avc1.42E01E\"")).unwrap());
}

#[test]
fn test_flag_changes_apply_without_reinstall() {
    let flags = flags();
    let window = installed_window(&flags);
    let vp9 = Some("video/webm; codecs=\"vp09.00.10.08\"");

    assert_eq!(window.can_play_type(vp9).unwrap(), CanPlayType::Empty);
    flags.set(AV1_ONLY_KEY, true);
    assert_eq!(window.can_play_type(vp9).unwrap(), CanPlayType::Probably);

    // Turning the master switch off later does not unpatch
    flags.set(ENABLE_KEY, false);
    assert_eq!(
        window.can_play_type(Some("video/mp4; codecs=\"av01.0.05M.08\"")).unwrap(),
        CanPlayType::Empty
    );
}

#[test]
fn test_decoding_info_through_window() {
    let flags = flags();
    let window = installed_window(&flags);

    let vp9 = MediaDecodingConfiguration::video("video/webm; codecs=\"vp9\"");
    let info = smol::block_on(window.decoding_info(Some(vp9))).unwrap();
    assert_eq!(info, MediaCapabilitiesInfo::unsupported());

    let h264 = MediaDecodingConfiguration::video("video/mp4; codecs=\"avc1.640028\"")
        .with_size(1280, 720)
        .with_framerate(30.0);
    let info = smol::block_on(window.decoding_info(Some(h264))).unwrap();
    assert_eq!(info, MediaCapabilitiesInfo::new(true, true, true));

    // Native rejection still reaches the page
    assert!(smol::block_on(window.decoding_info(None)).is_err());
}

// ============================================================================
// INSTALLATION TESTS
// ============================================================================

#[test]
fn test_install_twice_patches_once() {
    let flags = flags();
    let window = installed_window(&flags);

    let guard = CodecGuard::new(flags.clone());
    assert_eq!(smol::block_on(guard.install_if_enabled(&window)), InstallOutcome::AlreadyInjected);
    assert_eq!(smol::block_on(guard.install_if_enabled(&window)), InstallOutcome::AlreadyInjected);

    assert_eq!(window.can_play_type.replacements(), 1);
    assert_eq!(window.is_type_supported.replacements(), 1);
    assert_eq!(window.decoding_info.replacements(), 1);
}

#[test]
fn test_disabled_leaves_originals() {
    let flags = flags();
    flags.set(ENABLE_KEY, false);
    let window = MediaWindow::native().without_battery();

    let outcome = smol::block_on(CodecGuard::new(flags).install_if_enabled(&window));
    assert_eq!(outcome, InstallOutcome::Disabled);
    assert_eq!(
        window.can_play_type(Some("video/webm; codecs=\"vp9\"")).unwrap(),
        CanPlayType::Probably
    );
    assert!(window.is_type_supported(Some("video/webm")).unwrap());
}

#[test]
fn test_each_document_installs_separately() {
    let flags = flags();
    let guard = CodecGuard::new(flags);
    let top = MediaWindow::native().without_battery();
    let frame = MediaWindow::native().without_battery();

    assert!(matches!(smol::block_on(guard.install_if_enabled(&top)), InstallOutcome::Installed(_)));
    assert!(matches!(smol::block_on(guard.install_if_enabled(&frame)), InstallOutcome::Installed(_)));
}

#[test]
fn test_partial_environment() {
    let flags = flags();
    let registry = Arc::new(CodecRegistry::new());
    let window = MediaWindow::empty().with_is_type_supported(Arc::new(NativeMseSupport::new(registry)));

    let outcome = smol::block_on(CodecGuard::new(flags).install_if_enabled(&window));
    let InstallOutcome::Installed(report) = outcome else {
        panic!("expected installation, got {outcome:?}");
    };
    assert_eq!(report.installed(), 1);
    assert!(report.is_type_supported.is_ok());
    assert!(!window.is_type_supported(Some("video/webm")).unwrap());
}
