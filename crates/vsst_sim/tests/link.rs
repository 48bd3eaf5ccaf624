//! Link event dispatch into the engine.

mod common;

use common::dut;
use vsst_config::{load_config_from_str, LinkPortDef};
use vsst_sim::{AccessPath, DutError, LinkAdapter, LinkError, PortAction, PortEvent};

fn defs(entries: &[&str]) -> Vec<LinkPortDef> {
    entries.iter().map(|e| e.parse().unwrap()).collect()
}

#[test]
fn immediate_write_then_read() {
    let mut d = dut(AccessPath::Direct);
    let link = LinkAdapter::new(&d, &defs(&["loop_in:0:3:2", "loop_out:1:3:1"])).unwrap();
    assert_eq!(link.len(), 2);

    let resp = link
        .handle(&mut d, 0, &PortEvent::write(0, vec![0xaa, 0xbb, 0x01]))
        .unwrap();
    assert!(resp.is_none());

    let resp = link.handle(&mut d, 1, &PortEvent::read()).unwrap().unwrap();
    assert_eq!(resp.action, PortAction::Read);
    assert_eq!(resp.at_tick, 0);
    assert_eq!(resp.packet, vec![0xaa, 0xbb, 0x01]);
}

#[test]
fn deferred_write_is_relative_to_now() {
    let mut d = dut(AccessPath::Introspective);
    let link = LinkAdapter::new(&d, &defs(&["din:4:1:2"])).unwrap();
    d.tick(10).unwrap();

    link.handle(&mut d, 4, &PortEvent::write(3, vec![9])).unwrap();
    assert_eq!(d.pending_writes(), 1);
    d.tick(5).unwrap();
    assert_eq!(d.model().din_at(12), Some(0));
    assert_eq!(d.model().din_at(13), Some(9));
}

#[test]
fn events_survive_the_wire() {
    let mut d = dut(AccessPath::Direct);
    let link = LinkAdapter::new(&d, &defs(&["din:0:1:2", "sum:1:4:1"])).unwrap();

    let wire = PortEvent::write(0, vec![5]).encode().unwrap();
    link.handle(&mut d, 0, &PortEvent::decode(&wire).unwrap())
        .unwrap();
    d.tick(2).unwrap();

    let wire = PortEvent::read().encode().unwrap();
    let resp = link
        .handle(&mut d, 1, &PortEvent::decode(&wire).unwrap())
        .unwrap()
        .unwrap();
    let resp = PortEvent::decode(&resp.encode().unwrap()).unwrap();
    assert_eq!(resp.packet, 10u32.to_le_bytes().to_vec());
    assert_eq!(resp.at_tick, 2);
}

#[test]
fn deferred_write_past_last_tick_fails() {
    let mut d = dut(AccessPath::Direct);
    let link = LinkAdapter::new(&d, &defs(&["din:0:1:2"])).unwrap();
    d.tick(1).unwrap();

    let wire = PortEvent::write(u64::MAX, vec![1]).encode().unwrap();
    let err = link
        .handle(&mut d, 0, &PortEvent::decode(&wire).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        LinkError::TickOverflow {
            offset: u64::MAX,
            now: 1,
            ..
        }
    ));
    assert_eq!(d.pending_writes(), 0);

    link.handle(&mut d, 0, &PortEvent::write(u64::MAX - 1, vec![1]))
        .unwrap();
    assert_eq!(d.pending_writes(), 1);
}

#[test]
fn adapter_from_config() {
    let config = load_config_from_str(
        r#"
[link]
ports = ["mem24:7:384:2", "mem_out:8:384:1"]
"#,
    )
    .unwrap();
    let mut d = dut(AccessPath::Direct);
    let link = LinkAdapter::new(&d, &config.link.ports).unwrap();
    let packet: Vec<u8> = (0..384).map(|i| (i % 251) as u8).collect();
    link.handle(&mut d, 7, &PortEvent::write(0, packet.clone()))
        .unwrap();
    let resp = link.handle(&mut d, 8, &PortEvent::read()).unwrap().unwrap();
    assert_eq!(resp.packet, packet);
}

#[test]
fn rejects_bad_definitions() {
    let d = dut(AccessPath::Direct);
    assert!(matches!(
        LinkAdapter::new(&d, &defs(&["ghost:0:1:2"])),
        Err(LinkError::Dut(DutError::UnknownPort(_)))
    ));
    assert!(matches!(
        LinkAdapter::new(&d, &defs(&["din:0:2:2"])),
        Err(LinkError::SizeMismatch {
            expected: 1,
            actual: 2,
            ..
        })
    ));
    assert!(matches!(
        LinkAdapter::new(&d, &defs(&["din:0:1:3"])),
        Err(LinkError::InOutUnsupported(_))
    ));
    assert!(matches!(
        LinkAdapter::new(&d, &defs(&["sum:0:4:2"])),
        Err(LinkError::Dut(DutError::NotAnInput(_)))
    ));
    assert!(matches!(
        LinkAdapter::new(&d, &defs(&["din:0:1:2", "w8_d1:0:1:2"])),
        Err(LinkError::DuplicateId(0))
    ));
}

#[test]
fn rejects_bad_events() {
    let mut d = dut(AccessPath::Direct);
    let link = LinkAdapter::new(&d, &defs(&["din:0:1:2", "sum:1:4:1"])).unwrap();

    assert!(matches!(
        link.handle(&mut d, 9, &PortEvent::read()),
        Err(LinkError::UnknownPortId(9))
    ));
    assert!(matches!(
        link.handle(&mut d, 0, &PortEvent::write(0, vec![1, 2])),
        Err(LinkError::SizeMismatch { .. })
    ));
    assert!(matches!(
        link.handle(&mut d, 0, &PortEvent::read()),
        Err(LinkError::NotReadable(_))
    ));
    assert!(matches!(
        link.handle(&mut d, 1, &PortEvent::write(0, vec![0; 4])),
        Err(LinkError::NotWritable(_))
    ));

    d.finish();
    assert!(matches!(
        link.handle(&mut d, 0, &PortEvent::write(0, vec![1])),
        Err(LinkError::Dut(DutError::Finished))
    ));
}
