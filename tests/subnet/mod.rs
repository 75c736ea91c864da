use std::io::Cursor;
use std::time::Duration;

use pcap_recon::pcap::{PcapHeader, PcapReader, PcapWriter};
use pcap_recon::progress::RunStatus;
use pcap_recon::subnet::{group_cidrs, group_subnets, scan_subnets, SubnetInventory};

use crate::common::{arp_frame, capture, dhcp_reply_frame, ntp_frame, tcp_frame};

const DHCP_OFFER: u8 = 2;
const DHCP_ACK: u8 = 5;
const DHCP_REQUEST: u8 = 3;

fn mixed_capture() -> Vec<u8> {
    let frames = vec![
        arp_frame([192, 168, 10, 1], [192, 168, 10, 20]),
        tcp_frame([10, 1, 0, 10], [10, 1, 1, 10], false),
        tcp_frame([10, 1, 0, 11], [10, 1, 1, 11], false),
        tcp_frame([10, 1, 2, 10], [93, 184, 216, 34], false),
        tcp_frame([10, 9, 0, 1], [10, 9, 0, 2], true),
        tcp_frame([127, 0, 0, 1], [169, 254, 3, 4], false),
        dhcp_reply_frame(DHCP_OFFER, [172, 20, 4, 50], [255, 255, 252, 0], [172, 20, 4, 1]),
        dhcp_reply_frame(DHCP_ACK, [172, 20, 4, 50], [255, 255, 252, 0], [172, 20, 4, 1]),
        dhcp_reply_frame(DHCP_REQUEST, [172, 30, 0, 9], [255, 255, 255, 0], [172, 30, 0, 1]),
        ntp_frame(3, Default::default(), Default::default()),
    ];

    let records: Vec<_> = frames
        .into_iter()
        .enumerate()
        .map(|(i, frame)| (Duration::new(1_650_000_000, i as u32 * 1000), frame))
        .collect();
    capture(PcapHeader::default(), &records)
}

fn scan(input: Vec<u8>, private_only: bool) -> SubnetInventory {
    let mut reader = PcapReader::new(Cursor::new(input)).unwrap();
    let mut inventory = SubnetInventory::new(private_only);
    scan_subnets::<_, Vec<u8>>(&mut reader, None, &mut inventory, &RunStatus::new()).unwrap();
    inventory
}

fn strings<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[test]
fn subnets_in_discovery_order() {
    let inventory = scan(mixed_capture(), false);

    assert_eq!(
        strings(&inventory.cidrs()),
        ["192.168.10.0/24", "10.1.0.0/24", "10.1.1.0/24", "10.1.2.0/24", "93.184.216.0/24", "172.20.4.0/22"]
    );
    assert!(inventory.saw_public());
}

#[test]
fn private_only_drops_public_networks() {
    let inventory = scan(mixed_capture(), true);

    assert_eq!(inventory.len(), 5);
    assert!(inventory.subnets().iter().all(|s| s.is_private));
    assert!(!inventory.saw_public());
}

#[test]
fn supernets_of_a_capture() {
    let inventory = scan(mixed_capture(), true);
    let groups = group_cidrs(inventory.cidrs());

    let supernets: Vec<String> = groups.iter().filter_map(|g| g.supernet()).map(|s| s.to_string()).collect();
    assert_eq!(supernets, ["10.1.0.0/22", "172.20.4.0/32", "192.168.10.0/32"]);
    assert_eq!(groups.iter().map(|g| g.len()).collect::<Vec<_>>(), [3, 1, 1]);
}

#[test]
fn supernet_examples() {
    let groups = group_subnets(&["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].supernet().unwrap().to_string(), "10.0.0.0/22");

    assert_eq!(group_subnets(&["10.0.0.0/24", "10.0.10.0/24"]).len(), 2);
    assert!(group_subnets::<String>(&[]).is_empty());
}

#[test]
fn pass_through_copy_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.pcap");
    let input = mixed_capture();

    let mut reader = PcapReader::new(Cursor::new(input.clone())).unwrap();
    let mut writer = PcapWriter::create(&path, reader.header()).unwrap();
    let mut inventory = SubnetInventory::new(false);
    let status = RunStatus::new();

    let read = scan_subnets(&mut reader, Some(&mut writer), &mut inventory, &status).unwrap();
    writer.close().unwrap();

    assert_eq!(read, 10);
    assert_eq!(status.packets(), 10);
    assert_eq!(std::fs::read(&path).unwrap(), input);
}
