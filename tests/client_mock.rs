use melsec_fx::error::FxError;
use melsec_fx::fx_client::FxClient;
use melsec_fx_mock::MockFxPlc;

fn build_client(plc: &MockFxPlc) -> FxClient<MockFxPlc> {
    // initialize logging so frame dumps are visible with FX_DUMP_FRAMES=1
    let _ = env_logger::builder().is_test(true).try_init();
    FxClient::new(plc.clone())
}

#[test]
fn write_then_read_u16() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    let accepted = client.write("D0", 0x1234u16).expect("write D0");
    assert!(accepted, "controller should ACK the write");
    assert_eq!(client.read_u16("D0").expect("read D0"), 0x1234);
    // D0 occupies two bytes at unit 0x1000, low byte first
    assert_eq!(plc.image(0x1000, 2), vec![0x34, 0x12]);
}

#[test]
fn write_then_read_u32_and_byte() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    assert!(client.write("D10", 0xDEAD_BEEFu32).expect("write D10"));
    assert_eq!(client.read_u32("D10").expect("read D10"), 0xDEAD_BEEF);

    assert!(client.write("D2", 0xABu8).expect("write D2"));
    assert_eq!(client.read_bytes("D2", 1).expect("read D2"), vec![0xAB]);
}

#[test]
fn read_f32_from_preloaded_register() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    // D4 -> unit 0x1008
    plc.load(0x1008, &1.5f32.to_le_bytes());
    let value = client.read_f32("D4").expect("read D4");
    assert!((value - 1.5).abs() < f32::EPSILON);
}

#[test]
fn float_write_round_trip() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    assert!(client.write("D100", -3.25f32).expect("write D100"));
    let value = client.read_f32("D100").expect("read D100");
    assert!((value - -3.25).abs() < f32::EPSILON);
}

#[test]
fn force_m0_round_trip() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    assert!(client.write_bool("M0", true).expect("force M0 on"));
    assert!(client.read_bool("M0").expect("read M0"));
    assert_eq!(plc.image(0x0100, 1), vec![0x01]);

    assert!(client.write_bool("M0", false).expect("force M0 off"));
    assert!(!client.read_bool("M0").expect("read M0 again"));
}

#[test]
fn force_special_m_bank() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    assert!(client.write_bool("M8002", true).expect("force M8002"));
    assert!(client.read_bool("M8002").expect("read M8002"));
    // neighbours stay untouched
    assert!(!client.read_bool("M8003").expect("read M8003"));
}

#[test]
fn force_y_uses_octal_numbering() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    // "Y10" is point 8 -> second output byte, bit 0
    assert!(client.write_bool("Y10", true).expect("force Y10"));
    assert!(client.read_bool("Y10").expect("read Y10"));
    assert_eq!(plc.image(0x00A1, 1), vec![0x01]);
    assert!(!client.read_bool("Y0").expect("read Y0"));
}

#[test]
fn read_input_bits() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    // X0..X7 image byte at unit 0x0080, X2 set
    plc.load(0x0080, &[0b0000_0100]);
    assert!(client.read_bool("X2").expect("read X2"));
    assert!(!client.read_bool("X0").expect("read X0"));
}

#[test]
fn read_m_relay_by_bit_position() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    // M146 -> unit 0x0112, bit 2
    plc.load(0x0112, &[0b0000_0100]);
    assert!(client.read_bool("M146").expect("read M146"));
    assert!(!client.read_bool("M144").expect("read M144"));
}

#[test]
fn force_on_read_only_area_is_rejected_locally() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    let err = client.write_bool("X0", true).expect_err("X is read-only");
    assert!(matches!(err, FxError::UnsupportedOperation(_)));
    let err = client.write_bool("T3", true).expect_err("T force refused");
    assert!(matches!(err, FxError::UnsupportedOperation(_)));
}

#[test]
fn device_rejection_is_data_not_an_error() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    // S5000 resolves to a force address outside every window the controller
    // maps; the device answers NAK, which surfaces as Ok(false)
    let accepted = client.write_bool("S5000", true).expect("exchange runs");
    assert!(!accepted);
}

#[test]
fn invalid_addresses_fail_before_touching_the_wire() {
    let plc = MockFxPlc::new();
    let client = build_client(&plc);

    let err = client.read_u16("Q0").expect_err("unknown area");
    assert!(matches!(err, FxError::InvalidAddress(_)));
    let err = client.read_u16("D").expect_err("missing offset");
    assert!(matches!(err, FxError::InvalidAddress(_)));
    let err = client.read_u16("X8").expect_err("octal digit out of base");
    assert!(matches!(err, FxError::InvalidAddress(_)));
}
