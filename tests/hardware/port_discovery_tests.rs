//! Port enumeration on the host.

use serial_calc::port::list_ports;

#[test]
#[ignore]
fn test_list_ports_does_not_fail() {
    let ports = list_ports().expect("enumerate serial ports");

    println!("Available serial ports ({}):", ports.len());
    for summary in &ports {
        println!("  {summary}");
        assert!(!summary.name.is_empty());
    }
}

#[test]
#[ignore]
fn test_configured_port_is_listed() {
    let Some(name) = std::env::var("TEST_PORT").ok() else {
        println!("Skipping hardware test: TEST_PORT not set");
        return;
    };
    let ports = list_ports().expect("enumerate serial ports");
    assert!(
        ports.iter().any(|summary| summary.name == name),
        "{name} not among {ports:?}"
    );
}
