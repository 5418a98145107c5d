use core::fmt;

use crate::{CUSTOM_EPOCH, id::layout::write_bit_layout_debug};

/// A 64-bit Snowflake ID with a split datacenter/worker location.
///
/// - 1 bit reserved (sign bit, always zero)
/// - 41 bits timestamp (ms since [`CUSTOM_EPOCH`])
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             17 16         12 11             0
///              +--------------+----------------+-----------------+-------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter (5)  | worker (5)  | sequence (12) |
///              +--------------+----------------+-----------------+-------------+---------------+
///              |<------------------ MSB ------------- 64 bits ------------- LSB ------------->|
/// ```
///
/// IDs order the same way as their raw integers: timestamp first, then
/// location, then sequence.
///
/// # Example
///
/// ```
/// use idutils::SnowflakeId;
///
/// let id = SnowflakeId::from_components(161_937_560_343, 7, 7, 2795);
/// assert_eq!(id.to_raw(), 679_215_357_097_835_243);
/// assert_eq!(id.unix_millis(), 1_450_772_535_000);
/// assert_eq!(id.datacenter_id(), 7);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 2795);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: i64 = (1 << 41) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: i64 = (1 << 5) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: i64 = (1 << 5) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: i64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = 22;

    /// Number of bits to shift the datacenter ID to its correct position (bit
    /// 17).
    pub const DATACENTER_ID_SHIFT: u32 = 17;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u32 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Packs the four fields into an ID. Each field is masked to its width,
    /// so out-of-range values never bleed into neighbouring fields.
    ///
    /// `timestamp` is relative to [`CUSTOM_EPOCH`], not to the Unix epoch.
    pub const fn from_components(
        timestamp: i64,
        datacenter_id: i64,
        worker_id: i64,
        sequence: i64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id =
            (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Extracts the timestamp (ms since [`CUSTOM_EPOCH`]) from the packed ID.
    pub const fn timestamp(&self) -> i64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the timestamp and rebases it onto the Unix epoch.
    pub const fn unix_millis(&self) -> i64 {
        self.timestamp() + CUSTOM_EPOCH
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> i64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> i64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> i64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> i64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_datacenter_id() -> i64 {
        Self::DATACENTER_ID_MASK
    }

    pub const fn max_worker_id() -> i64 {
        Self::WORKER_ID_MASK
    }

    pub const fn max_sequence() -> i64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this type into its raw integer representation.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Wraps a raw integer without validation.
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` when the reserved sign bit is clear. Every ID the
    /// generator issues is valid; negative raw values only come from outside.
    pub const fn is_valid(&self) -> bool {
        self.id >= 0
    }

    /// Returns the ID as a zero-padded 19-digit string, which sorts
    /// lexicographically in the same order as the IDs themselves.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bit_layout_debug(f, self)
    }
}
