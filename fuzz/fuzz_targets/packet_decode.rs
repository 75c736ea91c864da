#![no_main]
use libfuzzer_sys::fuzz_target;
use pcap_recon::decode::DecodedPacket;
use pcap_recon::subnet::SubnetObserver;
use pcap_recon::DataLink;

fuzz_target!(|data: &[u8]| {
    let observer = SubnetObserver::new();
    for datalink in [DataLink::ETHERNET, DataLink::RAW, DataLink::LINUX_SLL] {
        let packet = DecodedPacket::decode(datalink, data);
        observer.observe(&packet);
    }
});
