mod common;

use common::{wait_until, ScriptedDevice};
use std::time::Duration;
use ynca::{
    Avail, MediaPlayback, Playback, PlaybackInfo, Repeat, Shuffle, SubunitId, YncaConnection,
};

fn usb_script() -> common::Script {
    vec![
        (
            ("USB", "METAINFO"),
            vec!["@USB:ALBUM=Album", "@USB:ARTIST=Artist", "@USB:SONG=Song"],
        ),
        (("USB", "AVAIL"), vec!["@USB:AVAIL=Ready"]),
        (("USB", "PLAYBACKINFO"), vec!["@USB:PLAYBACKINFO=Pause"]),
        (("USB", "REPEAT"), vec!["@USB:REPEAT=Single"]),
        (("USB", "SHUFFLE"), vec!["@USB:SHUFFLE=On"]),
    ]
}

fn setup() -> (ScriptedDevice, MediaPlayback) {
    let (remote, local) = tokio::io::duplex(16 * 1024);
    let device = ScriptedDevice::spawn(remote, usb_script());
    let connection = YncaConnection::from_stream_with_spacing(local, Duration::ZERO);
    let player = MediaPlayback::new(SubunitId::Usb, connection);
    (device, player)
}

#[tokio::test]
async fn initialize_populates_playback_state() {
    let (device, player) = setup();

    player.initialize().unwrap();
    wait_until(|| player.shuffle().is_some()).await;

    assert_eq!(player.avail(), Some(Avail::Ready));
    assert_eq!(player.repeat(), Some(Repeat::Single));
    assert_eq!(player.shuffle(), Some(Shuffle::On));
    assert_eq!(player.playback_info(), Some(PlaybackInfo::Pause));
    assert_eq!(player.album().as_deref(), Some("Album"));
    assert_eq!(player.artist().as_deref(), Some("Artist"));
    assert_eq!(player.song().as_deref(), Some("Song"));
    // STATION was probed but answered @UNDEFINED; nothing cached.
    assert_eq!(player.station(), None);

    device.stop();
}

#[tokio::test]
async fn metainfo_is_requested_once_for_all_three_fields() {
    let (device, player) = setup();

    player.initialize().unwrap();
    wait_until(|| player.shuffle().is_some()).await;

    let sent = device.sent_lines();
    let metainfo_gets = sent.iter().filter(|l| *l == "@USB:METAINFO=?").count();
    assert_eq!(metainfo_gets, 1);
    assert!(!sent.contains(&"@USB:ARTIST=?".to_string()));
    assert!(!sent.contains(&"@USB:ALBUM=?".to_string()));
    assert!(!sent.contains(&"@USB:SONG=?".to_string()));

    device.stop();
}

#[tokio::test]
async fn setters_and_playback_render_wire_values() {
    let (device, player) = setup();

    player.set_repeat(Repeat::All).unwrap();
    player.set_shuffle(Shuffle::Off).unwrap();
    player.playback(Playback::Play).unwrap();
    wait_until(|| device.sent_lines().len() == 3).await;

    assert_eq!(
        device.sent_lines(),
        vec![
            "@USB:REPEAT=All",
            "@USB:SHUFFLE=Off",
            "@USB:PLAYBACK=Play",
        ]
    );

    device.stop();
}

#[tokio::test]
async fn device_pushed_updates_flow_through_callbacks() {
    let (device, player) = setup();

    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen_cb = seen.clone();
    player.register_update_callback(move |subunit, function, value| {
        seen_cb
            .lock()
            .unwrap()
            .push((subunit, function.to_string(), value.clone()));
    });

    player.initialize().unwrap();
    wait_until(|| player.playback_info() == Some(PlaybackInfo::Pause)).await;

    let seen = seen.lock().unwrap();
    assert!(seen
        .iter()
        .any(|(subunit, function, _)| *subunit == SubunitId::Usb && function == "PLAYBACKINFO"));
    assert!(seen
        .iter()
        .any(|(_, function, value)| function == "SONG"
            && *value == ynca::Value::Str("Song".into())));

    device.stop();
}
