use dnswalk_application::ports::TraceSink;
use dnswalk_domain::{QueryKey, RecordType, ResourceRecord};
use std::net::IpAddr;

/// Renders trace events on stdout in the classic lookup-tool layout:
/// a query line per datagram sent, then the response header and its
/// three sections record by record.
pub struct StdoutTraceSink;

impl TraceSink for StdoutTraceSink {
    fn query_sent(&self, id: u16, key: &QueryKey, server: IpAddr) {
        println!();
        println!();
        println!(
            "Query ID     {} {}  {} --> {}",
            id,
            key.name(),
            key.record_type(),
            server
        );
    }

    fn response_received(
        &self,
        id: u16,
        authoritative: bool,
        answers: &[ResourceRecord],
        authority: &[ResourceRecord],
        additional: &[ResourceRecord],
    ) {
        println!("Response ID: {id} Authoritative = {authoritative}");
        print_section("Answers", answers);
        print_section("Nameservers", authority);
        print_section("Additional Information", additional);
    }
}

fn print_section(label: &str, records: &[ResourceRecord]) {
    println!("  {} ({})", label, records.len());
    for record in records {
        println!(
            "       {:<30} {:<10} {:<4} {}",
            record.name(),
            record.ttl(),
            type_label(record.record_type()),
            record.value_text()
        );
    }
}

/// Unsupported types show their numeric code instead of a mnemonic.
fn type_label(record_type: RecordType) -> String {
    match record_type {
        RecordType::Other(code) => code.to_string(),
        _ => record_type.to_string(),
    }
}
