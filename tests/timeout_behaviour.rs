use std::time::Duration;

use melsec_fx::error::FxError;
use melsec_fx::fx_client::FxClient;
use melsec_fx_mock::MockFxPlc;

#[test]
fn read_times_out_when_controller_stays_silent() {
    let plc = MockFxPlc::new();
    plc.set_silent(true);
    let client = FxClient::new(plc.clone())
        .with_timeout(Duration::from_millis(40))
        .with_loop_delay(Duration::from_millis(5));

    let err = client.read_u16("D0").expect_err("no response must time out");
    assert!(matches!(err, FxError::Timeout), "got {err}");
}

#[test]
fn write_times_out_when_controller_stays_silent() {
    let plc = MockFxPlc::new();
    plc.set_silent(true);
    let client = FxClient::new(plc.clone())
        .with_timeout(Duration::from_millis(40))
        .with_loop_delay(Duration::from_millis(5));

    let err = client
        .write("D0", 0x55AAu16)
        .expect_err("no ACK must time out");
    assert!(matches!(err, FxError::Timeout));
}

#[test]
fn channel_recovers_after_a_timeout() {
    let plc = MockFxPlc::new();
    plc.set_silent(true);
    let client = FxClient::new(plc.clone())
        .with_timeout(Duration::from_millis(40))
        .with_loop_delay(Duration::from_millis(5));

    let err = client.read_u16("D0").expect_err("first call times out");
    assert!(matches!(err, FxError::Timeout));

    // the timed-out transaction read nothing, so once the controller talks
    // again the next exchange starts clean
    plc.set_silent(false);
    assert!(client.write("D0", 0x0042u16).expect("write after recovery"));
    assert_eq!(client.read_u16("D0").expect("read after recovery"), 0x0042);
}
