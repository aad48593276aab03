use crate::error::RconError;

/// Packet type discriminants recognized by the Minecraft rcon protocol.
/// Value `1` is reserved and never appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Server to client reply, wire value `0`.
    Response,
    /// Client to server command execution, wire value `2`.
    Command,
    /// Client to server authentication, wire value `3`.
    Login,
}

impl PacketType {
    pub fn to_le_bytes(self) -> [u8; 4] {
        i32::from(self).to_le_bytes()
    }
}

impl From<PacketType> for i32 {
    fn from(kind: PacketType) -> i32 {
        match kind {
            PacketType::Response => 0,
            PacketType::Command => 2,
            PacketType::Login => 3,
        }
    }
}

impl TryFrom<i32> for PacketType {
    type Error = RconError;

    fn try_from(value: i32) -> Result<PacketType, RconError> {
        match value {
            0 => Ok(PacketType::Response),
            2 => Ok(PacketType::Command),
            3 => Ok(PacketType::Login),
            other => Err(RconError::UnknownPacketType(other)),
        }
    }
}

/// A single rcon request or response. Packets are built right before packing
/// or produced by unpacking a received buffer, never mutated in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    kind: PacketType,
    body: String,
}

impl Packet {
    /// Bytes a packet occupies beyond its body: 4 (id) + 4 (type) + 2 (null
    /// terminators). The leading length field counts everything but itself.
    pub const BASE_PACKET_SIZE: usize = 10;
    /// Length prefix plus the id and type fields.
    pub const HEADER_SIZE: usize = 12;

    pub fn new(id: i32, kind: PacketType, body: impl Into<String>) -> Self {
        Packet {
            id,
            kind,
            body: body.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn kind(&self) -> PacketType {
        self.kind
    }

    pub fn body(&self) -> &str {
        self.body.as_ref()
    }

    // Since the only one of these values that can change in length is the
    // body, the value of the length field is the byte-length of the body
    // plus 10.
    pub fn size(&self) -> i32 {
        (self.body.len() + Self::BASE_PACKET_SIZE) as i32
    }

    pub fn pack(&self) -> Vec<u8> {
        // Size, ID, Type, Body, Terminator
        let mut payload = Vec::with_capacity(self.body.len() + Self::HEADER_SIZE + 2);
        payload.extend_from_slice(&self.size().to_le_bytes());
        payload.extend_from_slice(&self.id.to_le_bytes());
        payload.extend_from_slice(&self.kind.to_le_bytes());
        payload.extend_from_slice(self.body.as_bytes());
        // null terminate the body, then null terminate the entire packet
        payload.extend_from_slice(&[0, 0]);
        payload
    }

    /// Parses one complete packet out of `raw`, length prefix included. The
    /// declared length must fit inside the supplied bytes; anything shorter
    /// is rejected instead of read past the end.
    pub fn unpack(raw: &[u8]) -> Result<Self, RconError> {
        if raw.len() < Self::HEADER_SIZE {
            return Err(RconError::TruncatedPacket {
                expected: Self::HEADER_SIZE,
                actual: raw.len(),
            });
        }

        let declared = i32::from_le_bytes(raw[0..4].try_into()?);
        if declared < Self::BASE_PACKET_SIZE as i32 {
            return Err(RconError::TruncatedPacket {
                expected: Self::BASE_PACKET_SIZE,
                actual: declared.max(0) as usize,
            });
        }

        // the length field does not count its own 4 bytes
        let total = declared as usize + 4;
        if raw.len() < total {
            return Err(RconError::TruncatedPacket {
                expected: total,
                actual: raw.len(),
            });
        }

        let id = i32::from_le_bytes(raw[4..8].try_into()?);
        let kind = i32::from_le_bytes(raw[8..12].try_into()?).try_into()?;
        // body sits between the header and the two trailing null bytes
        let body = std::str::from_utf8(&raw[Self::HEADER_SIZE..total - 2])?;

        Ok(Packet::new(id, kind, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_lays_out_fields_little_endian() {
        let packet = Packet::new(1, PacketType::Login, "secret");
        let raw = packet.pack();

        assert_eq!(raw.len(), 20);
        assert_eq!(&raw[0..4], &16i32.to_le_bytes()); // 6 byte body + 10
        assert_eq!(&raw[4..8], &1i32.to_le_bytes());
        assert_eq!(&raw[8..12], &3i32.to_le_bytes());
        assert_eq!(&raw[12..18], b"secret");
        assert_eq!(&raw[18..20], &[0, 0]);
    }

    #[test]
    fn length_field_is_body_length_plus_ten() {
        for body in ["", "list", "say hello world"] {
            let raw = Packet::new(7, PacketType::Command, body).pack();
            let declared = i32::from_le_bytes(raw[0..4].try_into().unwrap());
            assert_eq!(declared as usize, body.len() + 10);
        }
    }

    #[test]
    fn unpack_round_trips_pack() {
        let original = Packet::new(2, PacketType::Command, "list");
        let decoded = Packet::unpack(&original.pack()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn unpack_round_trips_empty_body() {
        let original = Packet::new(-1, PacketType::Response, "");
        let decoded = Packet::unpack(&original.pack()).unwrap();
        assert_eq!(decoded.id(), -1);
        assert_eq!(decoded.kind(), PacketType::Response);
        assert_eq!(decoded.body(), "");
    }

    #[test]
    fn unpack_rejects_short_header() {
        let err = Packet::unpack(&[0; 7]).unwrap_err();
        assert!(matches!(err, RconError::TruncatedPacket { actual: 7, .. }));
    }

    #[test]
    fn unpack_rejects_body_past_end_of_buffer() {
        let mut raw = Packet::new(2, PacketType::Command, "list").pack();
        // claim 100 more body bytes than were received
        raw[0..4].copy_from_slice(&114i32.to_le_bytes());

        let err = Packet::unpack(&raw).unwrap_err();
        assert!(matches!(
            err,
            RconError::TruncatedPacket {
                expected: 118,
                actual: 18
            }
        ));
    }

    #[test]
    fn unpack_rejects_negative_declared_length() {
        let mut raw = Packet::new(2, PacketType::Command, "list").pack();
        raw[0..4].copy_from_slice(&(-3i32).to_le_bytes());

        let err = Packet::unpack(&raw).unwrap_err();
        assert!(matches!(err, RconError::TruncatedPacket { .. }));
    }

    #[test]
    fn unpack_rejects_reserved_type() {
        let mut raw = Packet::new(2, PacketType::Command, "list").pack();
        raw[8..12].copy_from_slice(&1i32.to_le_bytes());

        let err = Packet::unpack(&raw).unwrap_err();
        assert!(matches!(err, RconError::UnknownPacketType(1)));
    }

    #[test]
    fn unpack_rejects_invalid_utf8_body() {
        let mut raw = Packet::new(2, PacketType::Response, "ab").pack();
        raw[12] = 0xff;

        let err = Packet::unpack(&raw).unwrap_err();
        assert!(matches!(err, RconError::MalformedPacketBody(_)));
    }
}
