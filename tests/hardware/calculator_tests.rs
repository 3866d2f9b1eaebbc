//! Request cycles against a real calculator board.
//!
//! ```bash
//! export TEST_PORT=/dev/ttyACM0   # or COM3 on Windows
//! export TEST_BAUD=9600           # optional, default: 9600
//! cargo test --features hardware-tests -- --ignored
//! ```

use super::utils::skip_without_hardware;
use serial_calc::{AppError, Session, Transaction};

fn answer(session: &mut Session<serial_calc::SyncSerialPort>, expression: &str) -> String {
    match session.transact(expression).expect("request cycle") {
        Transaction::Completed(exchange) => exchange.result.to_string(),
        Transaction::NoResponse { waited } => panic!("no answer to {expression:?} after {waited:?}"),
    }
}

#[test]
#[ignore]
fn board_multiplies() {
    let Some(test_port) = skip_without_hardware() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::open(&test_port.to_config(dir.path())).unwrap();

    assert_eq!(answer(&mut session, "54 * 22"), "1188");
}

#[test]
#[ignore]
fn board_reports_division_by_zero() {
    let Some(test_port) = skip_without_hardware() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::open(&test_port.to_config(dir.path())).unwrap();

    assert_eq!(answer(&mut session, "7 / 0"), "DIV0");
}

#[test]
#[ignore]
fn board_rejects_garbage() {
    let Some(test_port) = skip_without_hardware() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::open(&test_port.to_config(dir.path())).unwrap();

    assert_eq!(answer(&mut session, "hello"), "ERR");
}

#[test]
#[ignore]
fn missing_device_is_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = serial_calc::Config::default();
    config.serial.port = "/dev/does-not-exist-serial-calc".to_string();
    config.session.results_log = dir.path().join("results.txt");

    let err = Session::open(&config).unwrap_err();
    assert!(matches!(
        err,
        AppError::PortOpen { .. } | AppError::PortConfig { .. }
    ));
}
