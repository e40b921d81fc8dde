use chrono::{Datelike, NaiveDate, NaiveTime};
use std::str::FromStr;

use crate::Specification;
use crate::spec::{self, MAX_CHANNELS};

/// Decoded EDF/EDF+ header value.
///
/// One instance per open recording. The per-channel arrays of the on-disk
/// layout are folded into an array of [`Channel`] structs so their lengths
/// can never drift apart; the channel count and the header byte count are
/// derived from `channels.len()` and are re-rendered on every encode.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub version: String,
    /// Local patient identification, raw 80 byte field with padding removed.
    pub patient_id: String,
    /// Local recording identification, raw 80 byte field with padding removed.
    pub recording_id: String,
    /// Raw `dd.mm.yy` field. Damaged files carry unreadable bytes here and
    /// must stay inspectable, so the text is kept verbatim; see
    /// [`Header::parsed_start_date`].
    pub start_date: String,
    /// Raw `hh.mm.ss` field, kept verbatim like the date.
    pub start_time: String,
    /// 44 byte free-text field; carries the EDF+C / EDF+D continuation marker.
    pub reserved: String,
    /// Declared number of data records; `-1` means unknown, determine from
    /// the file size (see [`Header::geometry`]).
    pub record_count: i64,
    /// Duration of one data record in seconds.
    pub record_duration: f64,
    pub channels: Vec<Channel>,

    /// Header byte count as declared by the file, kept verbatim so callers
    /// can detect hand-edited or truncated files against [`Header::header_bytes`].
    pub(crate) declared_header_bytes: i64,

    /// Set by decode when the on-disk header lacked the 80 byte recording
    /// identification field and a placeholder was synthesized.
    pub(crate) recording_id_missing: bool,
}

/// One per-channel row of the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub label: String,
    pub transducer: String,
    pub physical_dimension: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: i32,
    pub digital_max: i32,
    pub prefilter: String,
    /// Kept verbatim from the file, including nonsensical negative values,
    /// so corruption stays visible. Model writes reject anything `<= 0`.
    pub samples_per_record: i64,
    pub reserved: String,
}

impl Channel {
    /// A valid placeholder channel: empty texts, the full 16 bit digital
    /// range, a symmetric unit physical range and one sample per record.
    pub fn placeholder() -> Self {
        Self {
            label: String::new(),
            transducer: String::new(),
            physical_dimension: String::new(),
            physical_min: -1.0,
            physical_max: 1.0,
            digital_min: -32768,
            digital_max: 32767,
            prefilter: String::new(),
            samples_per_record: 1,
            reserved: String::new(),
        }
    }
}

impl Header {
    /// A default header with every field set to a valid placeholder: the
    /// anonymous EDF+ identification strings, epoch-style start instant,
    /// zero records and a single placeholder channel (the channel count must
    /// stay positive at all times).
    pub fn new() -> Self {
        Self {
            version: "0".to_string(),
            patient_id: "X X X X".to_string(),
            recording_id: "Startdate X X X X".to_string(),
            start_date: "01.01.00".to_string(),
            start_time: "00.00.00".to_string(),
            reserved: String::new(),
            record_count: 0,
            record_duration: 1.0,
            channels: vec![Channel::placeholder()],
            declared_header_bytes: spec::header_bytes(1) as i64,
            recording_id_missing: false,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Total header size implied by the channel count: `256 + 256 * n`.
    pub fn header_bytes(&self) -> usize {
        spec::header_bytes(self.channels.len())
    }

    /// Header byte count as declared on disk. Differs from
    /// [`Header::header_bytes`] only for hand-edited or damaged files.
    pub fn declared_header_bytes(&self) -> i64 {
        self.declared_header_bytes
    }

    /// The start date as a calendar date, `None` when the raw field does not
    /// parse as `dd.mm.yy`.
    pub fn parsed_start_date(&self) -> Option<NaiveDate> {
        parse_start_date(&self.start_date)
    }

    /// The start time as a clock time, `None` when the raw field does not
    /// parse as `hh.mm.ss`.
    pub fn parsed_start_time(&self) -> Option<NaiveTime> {
        parse_start_time(&self.start_time)
    }

    /// Whether the on-disk header lacked the recording identification field
    /// entirely (unanonymized NATUS exports) and decode synthesized the
    /// placeholder. Such a file is 80 bytes shorter than its repaired form.
    pub fn recording_id_missing(&self) -> bool {
        self.recording_id_missing
    }

    /// Specification the file claims through its reserved field.
    pub fn specification(&self) -> Specification {
        if self.reserved.starts_with("EDF+C") || self.reserved.starts_with("EDF+D") {
            Specification::EdfPlus
        } else {
            Specification::Edf
        }
    }

    pub fn is_continuous(&self) -> bool {
        !self.reserved.starts_with("EDF+D")
    }

    /// Samples contributed by all channels to one data record.
    pub fn samples_per_record(&self) -> i64 {
        self.channels.iter().map(|c| c.samples_per_record).sum()
    }

    /// Derives the real geometry of the file from its actual byte length.
    /// Data records hold two bytes per sample, so the record count that the
    /// file can actually hold is `(len - header) / 2 / samples_per_record`.
    pub fn geometry(&self, file_len: u64) -> FileGeometry {
        let real_header_bytes = self.header_bytes();
        // Data records start 80 bytes earlier in a file whose recording
        // identification field was missing at decode
        let disk_header_bytes = if self.recording_id_missing {
            real_header_bytes - 80
        } else {
            real_header_bytes
        };
        let data_bytes = file_len.saturating_sub(disk_header_bytes as u64);
        let samples = self.samples_per_record();
        let real_record_count = if samples <= 0 {
            0
        } else {
            (data_bytes / 2 / samples as u64) as i64
        };

        FileGeometry {
            real_header_bytes,
            real_record_count,
        }
    }

    /// Record count with the `-1` sentinel resolved against the file length.
    pub fn resolved_record_count(&self, file_len: u64) -> i64 {
        if self.record_count < 0 {
            self.geometry(file_len).real_record_count
        } else {
            self.record_count
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry derived from the actual file size instead of the declared header
/// fields. Used to detect truncated or hand-edited files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileGeometry {
    pub real_header_bytes: usize,
    pub real_record_count: i64,
}

/// Parses the old style `dd.mm.yy` date with clipping year 1985: years 85-99
/// map to 1985-1999, years 00-84 to 2000-2084. The literal year `yy` marks a
/// date beyond 2084 and maps to the year 2100.
pub fn parse_start_date(date: &str) -> Option<NaiveDate> {
    let parts = date.split('.').collect::<Vec<_>>();
    if parts.len() != 3 {
        return None;
    }

    let year = if parts[2] == "yy" {
        2100
    } else {
        match u8::from_str(parts[2]) {
            Ok(y) if y < 85 => 2000 + y as i32,
            Ok(y) if y < 100 => 1900 + y as i32,
            _ => return None,
        }
    };

    let day = u32::from_str(parts[0]).ok()?;
    let month = u32::from_str(parts[1]).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Renders the old style `dd.mm.yy` date. Years outside the 1985-2084
/// clipping range are rendered as the literal `yy`.
pub fn format_start_date(date: &NaiveDate) -> String {
    let year = if date.year() >= 2085 || date.year() <= 1984 {
        "yy".to_string()
    } else {
        format!("{:0>2}", date.year() % 100)
    };

    format!("{:0>2}.{:0>2}.{}", date.day(), date.month(), year)
}

pub fn parse_start_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time.trim_ascii_end(), "%H.%M.%S").ok()
}

pub fn format_start_time(time: &NaiveTime) -> String {
    time.format("%H.%M.%S").to_string()
}

/// Checks a requested channel count against the hard catalogue bounds.
pub fn channel_count_in_bounds(count: usize) -> bool {
    count > 0 && count <= MAX_CHANNELS
}
