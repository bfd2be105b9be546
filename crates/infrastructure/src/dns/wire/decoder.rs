use super::name::decode_name;
use dnswalk_domain::{Rcode, RecordData, RecordType, ResolveError, ResourceRecord};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;

/// A decoded response: header facts plus the three record sections.
#[derive(Debug)]
pub struct ParsedMessage {
    pub id: u16,
    /// AA bit; gates whether the engine may cache these records.
    pub authoritative: bool,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl ParsedMessage {
    /// All records across the three sections, in wire order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authority.iter())
            .chain(self.additional.iter())
    }
}

/// Decodes a raw response against the ID of the outstanding query.
///
/// A mismatched ID, a header that is not a plain un-truncated response, or
/// a non-zero RCODE all fail the whole message; the caller treats any of
/// these the same as a timeout. A record whose RDATA cannot be decoded is
/// dropped on its own (the RDLENGTH keeps the stream aligned), so one bad
/// record does not take down its siblings. A record that breaks before
/// its RDLENGTH is known leaves the stream position unrecoverable;
/// everything decoded up to that point is kept and the rest of the
/// message is abandoned.
pub fn decode_response(message: &[u8], expected_id: u16) -> Result<ParsedMessage, ResolveError> {
    let mut reader = Reader::new(message);

    let id = reader.read_u16()?;
    if id != expected_id {
        return Err(ResolveError::TransactionMismatch {
            expected: expected_id,
            got: id,
        });
    }

    let flags = reader.read_u16()?;
    let qr = flags >> 15 & 1;
    let opcode = flags >> 11 & 0xF;
    let authoritative = flags >> 10 & 1 == 1;
    let truncated = flags >> 9 & 1 == 1;
    let z = flags >> 4 & 0x7;
    let rcode = Rcode::from_code((flags & 0xF) as u8);

    if qr != 1 {
        return Err(ResolveError::MalformedResponse(
            "QR bit clear: not a response".to_string(),
        ));
    }
    if opcode != 0 {
        return Err(ResolveError::MalformedResponse(format!(
            "unexpected OPCODE {opcode}"
        )));
    }
    if truncated {
        return Err(ResolveError::Truncated);
    }
    if z != 0 {
        return Err(ResolveError::MalformedResponse(
            "reserved Z bits set".to_string(),
        ));
    }
    if rcode != Rcode::NoError {
        return Err(ResolveError::Rcode(rcode));
    }

    let qdcount = reader.read_u16()?;
    let ancount = reader.read_u16()?;
    let nscount = reader.read_u16()?;
    let arcount = reader.read_u16()?;

    // The question is echoed back verbatim; skip it without checking that
    // it matches what was asked.
    for _ in 0..qdcount {
        reader.skip_name()?;
        reader.skip(4)?; // QTYPE + QCLASS
    }

    let (answers, intact) = read_section(&mut reader, ancount);
    let (authority, intact) = if intact {
        read_section(&mut reader, nscount)
    } else {
        (Vec::new(), false)
    };
    let additional = if intact {
        read_section(&mut reader, arcount).0
    } else {
        Vec::new()
    };

    Ok(ParsedMessage {
        id,
        authoritative,
        answers,
        authority,
        additional,
    })
}

/// Reads up to `count` records; the flag is false when the stream broke
/// mid-record and nothing past this point can be decoded.
fn read_section(reader: &mut Reader<'_>, count: u16) -> (Vec<ResourceRecord>, bool) {
    let mut records = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        match read_record(reader) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => {
                debug!(error = %e, "abandoning rest of message");
                return (records, false);
            }
        }
    }
    (records, true)
}

/// Reads one resource record. `Ok(None)` means the record's RDATA was
/// undecodable and has been skipped; an error means the failure came
/// before RDLENGTH was known, so realignment is impossible.
fn read_record(reader: &mut Reader<'_>) -> Result<Option<ResourceRecord>, ResolveError> {
    let name = reader.read_name()?;
    let record_type = RecordType::from_code(reader.read_u16()?);
    let _class = reader.read_u16()?;
    let ttl = clamp_ttl(reader.read_u32()?);
    let rdlength = usize::from(reader.read_u16()?);

    let rdata_start = reader.pos;
    let rdata_end = rdata_start
        .checked_add(rdlength)
        .filter(|end| *end <= reader.message.len())
        .ok_or_else(|| {
            ResolveError::MalformedResponse("RDLENGTH exceeds message".to_string())
        })?;

    let data = match read_rdata(reader.message, record_type, rdata_start, rdata_end) {
        Ok(data) => data,
        Err(e) => {
            debug!(name = %name, %record_type, error = %e, "dropping undecodable record");
            reader.pos = rdata_end;
            return Ok(None);
        }
    };

    reader.pos = rdata_end;
    Ok(Some(ResourceRecord::new(name, record_type, ttl, data)))
}

fn read_rdata(
    message: &[u8],
    record_type: RecordType,
    rdata_start: usize,
    rdata_end: usize,
) -> Result<RecordData, ResolveError> {
    let rdlength = rdata_end - rdata_start;
    match record_type {
        RecordType::A => {
            if rdlength != 4 {
                return Err(ResolveError::MalformedResponse(format!(
                    "A record with RDLENGTH {rdlength}"
                )));
            }
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&message[rdata_start..rdata_end]);
            Ok(RecordData::Ipv4(Ipv4Addr::from(octets)))
        }
        RecordType::AAAA => {
            if rdlength != 16 {
                return Err(ResolveError::MalformedResponse(format!(
                    "AAAA record with RDLENGTH {rdlength}"
                )));
            }
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&message[rdata_start..rdata_end]);
            Ok(RecordData::Ipv6(Ipv6Addr::from(octets)))
        }
        RecordType::NS | RecordType::CNAME => {
            let (target, _) = decode_name(message, rdata_start)?;
            Ok(RecordData::Name(target))
        }
        RecordType::MX => {
            if rdlength < 3 {
                return Err(ResolveError::MalformedResponse(format!(
                    "MX record with RDLENGTH {rdlength}"
                )));
            }
            let preference = u16::from_be_bytes([
                message[rdata_start],
                message[rdata_start + 1],
            ]);
            let (exchange, _) = decode_name(message, rdata_start + 2)?;
            Ok(RecordData::Mx {
                preference,
                exchange,
            })
        }
        // SOA and anything unsupported: consume the bytes, keep them
        // opaque for trace output only.
        RecordType::SOA | RecordType::Other(_) => {
            Ok(RecordData::Opaque(
                message[rdata_start..rdata_end].to_vec(),
            ))
        }
    }
}

/// TTLs are unsigned seconds; a set sign bit is a degenerate value and
/// clamps to zero.
fn clamp_ttl(raw: u32) -> u32 {
    if raw & 0x8000_0000 != 0 {
        0
    } else {
        raw
    }
}

struct Reader<'a> {
    message: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(message: &'a [u8]) -> Self {
        Self { message, pos: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, ResolveError> {
        let byte = *self
            .message
            .get(self.pos)
            .ok_or_else(|| eof("header or record"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u16(&mut self) -> Result<u16, ResolveError> {
        let hi = self.read_u8()?;
        let lo = self.read_u8()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn read_u32(&mut self) -> Result<u32, ResolveError> {
        let hi = self.read_u16()?;
        let lo = self.read_u16()?;
        Ok(u32::from(hi) << 16 | u32::from(lo))
    }

    fn skip(&mut self, n: usize) -> Result<(), ResolveError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.message.len())
            .ok_or_else(|| eof("skipped bytes"))?;
        self.pos = end;
        Ok(())
    }

    fn read_name(&mut self) -> Result<String, ResolveError> {
        let (name, next) = decode_name(self.message, self.pos)?;
        self.pos = next;
        Ok(name)
    }

    fn skip_name(&mut self) -> Result<(), ResolveError> {
        self.read_name().map(|_| ())
    }
}

fn eof(what: &str) -> ResolveError {
    ResolveError::MalformedResponse(format!("unexpected end of message in {what}"))
}
