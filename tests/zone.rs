mod common;

use common::{wait_until, ScriptedDevice};
use std::time::Duration;
use ynca::{
    Avail, InitVolLvl, Input, Mute, Playback, Pwr, SoundPrg, SubunitId, Value, YncaConnection,
    Zone,
};

fn zone_script() -> common::Script {
    vec![
        (("MAIN", "AVAIL"), vec!["@MAIN:AVAIL=Ready"]),
        (
            ("MAIN", "BASIC"),
            vec![
                "@MAIN:PWR=On",
                "@MAIN:SLEEP=Off",
                "@MAIN:VOL=-24.0",
                "@MAIN:MUTE=Off",
                "@MAIN:INP=HDMI1",
                "@MAIN:STRAIGHT=Off",
                "@MAIN:SOUNDPRG=Standard",
                "@MAIN:PUREDIRMODE=Off",
            ],
        ),
        (("MAIN", "MAXVOL"), vec!["@MAIN:MAXVOL=16.5"]),
        (("MAIN", "ZONENAME"), vec!["@MAIN:ZONENAME=Living"]),
        (("MAIN", "INITVOLLVL"), vec!["@MAIN:INITVOLLVL=-20.0"]),
        (("MAIN", "INITVOLMODE"), vec!["@MAIN:INITVOLMODE=On"]),
        (
            ("MAIN", "SCENENAME"),
            vec![
                "@MAIN:SCENE1NAME=Movie",
                "@MAIN:SCENE2NAME=Music",
                "@MAIN:SCENE3NAME=Game",
            ],
        ),
    ]
}

fn setup() -> (ScriptedDevice, Zone) {
    let (remote, local) = tokio::io::duplex(16 * 1024);
    let device = ScriptedDevice::spawn(remote, zone_script());
    let connection = YncaConnection::from_stream_with_spacing(local, Duration::ZERO);
    let zone = Zone::new(SubunitId::Main, connection);
    (device, zone)
}

#[tokio::test]
async fn initialize_populates_zone_attributes() {
    let (device, zone) = setup();

    zone.initialize().unwrap();
    wait_until(|| zone.scenes().len() == 3).await;

    assert_eq!(zone.avail(), Some(Avail::Ready));
    assert_eq!(zone.pwr(), Some(Pwr::On));
    assert_eq!(zone.volume(), Some(-24.0));
    assert_eq!(zone.max_volume(), Some(16.5));
    assert_eq!(zone.mute(), Some(Mute::Off));
    assert_eq!(zone.input(), Some(Input::Hdmi1));
    assert_eq!(zone.sound_prg(), Some(SoundPrg::Standard));
    assert_eq!(zone.zone_name().as_deref(), Some("Living"));
    // The multi converter tags a numeric level distinctly from the modes.
    assert_eq!(zone.init_vol_lvl(), Some(Value::Float(-20.0)));

    let scenes = zone.scenes();
    assert_eq!(scenes.get("1").map(String::as_str), Some("Movie"));
    assert_eq!(scenes.get("3").map(String::as_str), Some("Game"));

    device.stop();
}

#[tokio::test]
async fn initialize_coalesces_the_basic_group() {
    let (device, zone) = setup();

    zone.initialize().unwrap();
    wait_until(|| zone.scenes().len() == 3).await;

    let sent = device.sent_lines();
    let basic_gets = sent.iter().filter(|l| *l == "@MAIN:BASIC=?").count();
    assert_eq!(basic_gets, 1);
    // PWR, VOL, MUTE etc. are covered by BASIC and must not be polled.
    assert!(!sent.contains(&"@MAIN:PWR=?".to_string()));
    assert!(!sent.contains(&"@MAIN:VOL=?".to_string()));
    assert!(sent.contains(&"@MAIN:MAXVOL=?".to_string()));
    assert!(sent.contains(&"@MAIN:SCENENAME=?".to_string()));

    device.stop();
}

#[tokio::test]
async fn volume_is_rounded_onto_the_half_db_grid() {
    let (device, zone) = setup();

    zone.set_volume(0.3).unwrap();
    wait_until(|| !device.sent_lines().is_empty()).await;
    assert_eq!(device.sent_lines(), vec!["@MAIN:VOL=0.5"]);

    device.stop();
}

#[tokio::test]
async fn imperative_zone_commands_render_wire_values() {
    let (device, zone) = setup();

    zone.scene("2").unwrap();
    zone.volume_up(0.5).unwrap();
    zone.volume_down(2.0).unwrap();
    zone.playback(Playback::SkipFwd).unwrap();
    zone.set_init_vol_lvl(InitVolLvl::Mute).unwrap();
    zone.set_init_vol_lvl_db(-20.3).unwrap();
    wait_until(|| device.sent_lines().len() == 6).await;

    assert_eq!(
        device.sent_lines(),
        vec![
            "@MAIN:SCENE=Scene 2",
            "@MAIN:VOL=Up",
            "@MAIN:VOL=Down 2 dB",
            "@MAIN:PLAYBACK=Skip Fwd",
            "@MAIN:INITVOLLVL=Mute",
            "@MAIN:INITVOLLVL=-20.5",
        ]
    );

    device.stop();
}

#[tokio::test]
async fn zone_name_longer_than_nine_chars_is_rejected() {
    let (device, zone) = setup();

    assert!(zone.set_zone_name("Livingroom").is_err());
    zone.set_zone_name("Den").unwrap();
    wait_until(|| !device.sent_lines().is_empty()).await;
    // The oversized name never reached the wire.
    assert_eq!(device.sent_lines(), vec!["@MAIN:ZONENAME=Den"]);

    device.stop();
}
