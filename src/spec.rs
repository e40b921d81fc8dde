//! Static catalogue of the EDF header layout.
//!
//! The header starts with a fixed 256 byte block followed by ten grouped
//! per-channel blocks (all labels, then all transducers, and so on), each
//! channel contributing another 256 bytes in total. Every field is a
//! fixed-width, left-justified, space-padded ASCII run; numeric fields are
//! plain ASCII digits. The catalogue below is the single source of truth for
//! names, offsets, widths and encoding kinds used by the codec and the model.

/// Size of the fixed top-level header block in bytes.
pub const FIXED_HEADER_BYTES: usize = 256;

/// Bytes contributed by each channel across the grouped per-channel blocks.
pub const BYTES_PER_CHANNEL: usize = 256;

/// Upper sanity bound for the channel count field.
pub const MAX_CHANNELS: usize = 4096;

/// Encoding kind of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free ASCII text, right-padded with spaces.
    Text,
    /// ASCII decimal integer, optionally signed.
    Integer,
    /// ASCII decimal number with an optional fraction (dot separator always).
    Float,
    /// `dd.mm.yy` with the 1985 clipping year convention.
    Date,
    /// `hh.mm.ss`.
    Time,
}

/// Layout description of a single header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// For fixed fields the absolute byte offset. For per-channel fields the
    /// cumulative width of the per-channel blocks preceding this one.
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
    pub per_channel: bool,
}

impl FieldSpec {
    /// Absolute byte offset of this field's value for the given channel.
    /// Per-channel blocks are grouped, so the block for this field starts at
    /// `256 + offset * channel_count`. The `channel` argument is ignored for
    /// fixed fields.
    pub fn location(&self, channel_count: usize, channel: usize) -> usize {
        if self.per_channel {
            FIXED_HEADER_BYTES + self.offset * channel_count + channel * self.width
        } else {
            self.offset
        }
    }
}

/// The complete header field catalogue in on-disk order.
pub const FIELDS: &[FieldSpec] = &[
    field("version", 0, 8, FieldKind::Text),
    field("patient_id", 8, 80, FieldKind::Text),
    field("recording_id", 88, 80, FieldKind::Text),
    field("start_date", 168, 8, FieldKind::Date),
    field("start_time", 176, 8, FieldKind::Time),
    field("header_bytes", 184, 8, FieldKind::Integer),
    field("reserved", 192, 44, FieldKind::Text),
    field("record_count", 236, 8, FieldKind::Integer),
    field("record_duration", 244, 8, FieldKind::Float),
    field("channel_count", 252, 4, FieldKind::Integer),
    channel_field("label", 0, 16, FieldKind::Text),
    channel_field("transducer", 16, 80, FieldKind::Text),
    channel_field("physical_dimension", 96, 8, FieldKind::Text),
    channel_field("physical_min", 104, 8, FieldKind::Float),
    channel_field("physical_max", 112, 8, FieldKind::Float),
    channel_field("digital_min", 120, 8, FieldKind::Integer),
    channel_field("digital_max", 128, 8, FieldKind::Integer),
    channel_field("prefilter", 136, 80, FieldKind::Text),
    channel_field("samples_per_record", 216, 8, FieldKind::Integer),
    channel_field("channel_reserved", 224, 32, FieldKind::Text),
];

const fn field(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
        kind,
        per_channel: false,
    }
}

const fn channel_field(
    name: &'static str,
    offset: usize,
    width: usize,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
        kind,
        per_channel: true,
    }
}

/// Looks up a field by its catalogue name.
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Total header size in bytes for the given channel count.
pub fn header_bytes(channel_count: usize) -> usize {
    FIXED_HEADER_BYTES + channel_count * BYTES_PER_CHANNEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_block_covers_exactly_256_bytes() {
        let mut expected_offset = 0;
        for f in FIELDS.iter().filter(|f| !f.per_channel) {
            assert_eq!(f.offset, expected_offset, "gap before {}", f.name);
            expected_offset += f.width;
        }
        assert_eq!(expected_offset, FIXED_HEADER_BYTES);
    }

    #[test]
    fn channel_blocks_cover_exactly_256_bytes() {
        let mut expected_offset = 0;
        for f in FIELDS.iter().filter(|f| f.per_channel) {
            assert_eq!(f.offset, expected_offset, "gap before {}", f.name);
            expected_offset += f.width;
        }
        assert_eq!(expected_offset, BYTES_PER_CHANNEL);
    }

    #[test]
    fn per_channel_locations_are_grouped_by_block() {
        let labels = lookup("label").unwrap();
        // Three channels: label block occupies [256, 304), one row of 16 each
        assert_eq!(labels.location(3, 0), 256);
        assert_eq!(labels.location(3, 2), 288);

        let transducers = lookup("transducer").unwrap();
        assert_eq!(transducers.location(3, 0), 256 + 16 * 3);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(lookup("record_count").unwrap().offset, 236);
        assert!(lookup("no_such_field").is_none());
    }

    #[test]
    fn total_size_formula() {
        assert_eq!(header_bytes(3), 1024);
        assert_eq!(header_bytes(36), 9472);
    }
}
