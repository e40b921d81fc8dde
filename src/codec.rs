//! Pure byte-buffer codec for the EDF/EDF+ header region.
//!
//! `decode` and `encode` are deterministic, side-effect-free transforms
//! between a raw buffer and a [`Header`] value. Neither performs I/O; the
//! caller supplies the first `256 + 256 * n` bytes of the file and persists
//! the encoded result. Decoding never mutates its input.
//!
//! Text handling is latin-1 both ways (one byte, one char), so any input
//! buffer decodes losslessly. On encode, over-length text is truncated at
//! the byte boundary and reported through `log::warn!`, which the format
//! itself permits. Numeric values that cannot be rendered inside their width
//! fail hard, since dropping digits would silently change them.

use crate::error::{DecodeError, EncodeError};
use crate::header::{Channel, Header};
use crate::spec::{self, FIXED_HEADER_BYTES, FieldSpec, MAX_CHANNELS};

/// The mandatory leading token of an EDF+ recording identification.
pub const STARTDATE_TOKEN: &str = "Startdate";

/// Decodes a raw header buffer into a [`Header`].
///
/// The fixed 256 byte block is read first to learn the channel count; the
/// buffer must then hold the full `256 + 256 * n` header region. The declared
/// header byte count and record count are retained verbatim so callers can
/// compare them against [`Header::geometry`] to spot hand-edited files.
///
/// Unanonymized NATUS exports omit the 80 byte recording identification
/// field entirely, shifting every later field forward; such a buffer is
/// detected by the clock-stamp digits sitting where the identification
/// should start, realigned, and decoded with a synthesized placeholder
/// identification (see [`Header::recording_id_missing`]).
pub fn decode(bytes: &[u8]) -> Result<Header, DecodeError> {
    if bytes.len() < FIXED_HEADER_BYTES {
        return Err(DecodeError::Truncated {
            expected: FIXED_HEADER_BYTES,
            actual: bytes.len(),
        });
    }

    let recording_spec = field("recording_id");
    if recording_id_is_missing(raw(bytes, recording_spec, 0, 0)) {
        log::warn!("recording identification field is missing, realigning the header");
        let mut placeholder = vec![b' '; recording_spec.width];
        let text = b"Startdate X X X X";
        placeholder[..text.len()].copy_from_slice(text);

        let mut realigned = Vec::with_capacity(bytes.len() + recording_spec.width);
        realigned.extend_from_slice(&bytes[..recording_spec.offset]);
        realigned.extend_from_slice(&placeholder);
        realigned.extend_from_slice(&bytes[recording_spec.offset..]);
        let mut header = decode_aligned(&realigned)?;
        header.recording_id_missing = true;
        return Ok(header);
    }

    decode_aligned(bytes)
}

fn decode_aligned(bytes: &[u8]) -> Result<Header, DecodeError> {
    let channel_count = int_field(bytes, field("channel_count"), 0)?;
    if channel_count <= 0 || channel_count > MAX_CHANNELS as i64 {
        return Err(DecodeError::InvalidChannelCount(channel_count));
    }
    let channel_count = channel_count as usize;

    let expected = spec::header_bytes(channel_count);
    if bytes.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    let mut channels = vec![Channel::placeholder(); channel_count];

    for (i, channel) in channels.iter_mut().enumerate() {
        channel.label = channel_text(bytes, "label", channel_count, i);
        channel.transducer = channel_text(bytes, "transducer", channel_count, i);
        channel.physical_dimension = channel_text(bytes, "physical_dimension", channel_count, i);
        channel.physical_min = float_field(bytes, field("physical_min"), channel_count, i)?;
        channel.physical_max = float_field(bytes, field("physical_max"), channel_count, i)?;
        channel.digital_min = int_field_at(bytes, field("digital_min"), channel_count, i)? as i32;
        channel.digital_max = int_field_at(bytes, field("digital_max"), channel_count, i)? as i32;
        channel.prefilter = channel_text(bytes, "prefilter", channel_count, i);
        // Kept verbatim, negatives included: a corrupted count must stay
        // visible instead of being silently repaired
        channel.samples_per_record =
            int_field_at(bytes, field("samples_per_record"), channel_count, i)?;
        channel.reserved = channel_text(bytes, "channel_reserved", channel_count, i);
    }

    Ok(Header {
        version: text_field(bytes, field("version"), 0),
        patient_id: text_field(bytes, field("patient_id"), 0),
        recording_id: text_field(bytes, field("recording_id"), 0),
        start_date: text_field(bytes, field("start_date"), 0),
        start_time: text_field(bytes, field("start_time"), 0),
        reserved: text_field(bytes, field("reserved"), 0),
        record_count: int_field(bytes, field("record_count"), 0)?,
        record_duration: float_field(bytes, field("record_duration"), 0, 0)?,
        channels,
        declared_header_bytes: int_field(bytes, field("header_bytes"), 0)?,
        recording_id_missing: false,
    })
}

/// Detects the unanonymized NATUS layout: the 80 byte recording
/// identification field is absent, so the concatenated `dd.mm.yyhh.mm.ss`
/// clock stamp and the header byte digits sit at its offset instead.
fn recording_id_is_missing(field: &[u8]) -> bool {
    const DIGIT_POSITIONS: [usize; 11] = [0, 1, 3, 4, 6, 7, 8, 9, 11, 12, 14];
    field.len() > 14
        && DIGIT_POSITIONS
            .iter()
            .all(|&i| field[i].is_ascii_digit())
}

/// Encodes a [`Header`] into exactly `256 + 256 * n` bytes.
///
/// The header byte count and channel count fields are always re-rendered
/// from the channel array, never taken from a stored value.
pub fn encode(header: &Header) -> Result<Vec<u8>, EncodeError> {
    let channel_count = header.channel_count();
    let mut buf = vec![b' '; spec::header_bytes(channel_count)];

    write_text(&mut buf, field("version"), 0, 0, &header.version, None)?;
    write_text(&mut buf, field("patient_id"), 0, 0, &header.patient_id, None)?;
    write_text(
        &mut buf,
        field("recording_id"),
        0,
        0,
        &header.recording_id,
        Some(STARTDATE_TOKEN),
    )?;
    write_text(&mut buf, field("start_date"), 0, 0, &header.start_date, None)?;
    write_text(&mut buf, field("start_time"), 0, 0, &header.start_time, None)?;
    write_int(
        &mut buf,
        field("header_bytes"),
        0,
        0,
        header.header_bytes() as i64,
    )?;
    write_text(&mut buf, field("reserved"), 0, 0, &header.reserved, None)?;
    write_int(&mut buf, field("record_count"), 0, 0, header.record_count)?;
    write_float(
        &mut buf,
        field("record_duration"),
        0,
        0,
        header.record_duration,
    )?;
    write_int(
        &mut buf,
        field("channel_count"),
        0,
        0,
        channel_count as i64,
    )?;

    // On-disk layout groups each per-channel field into its own block, so the
    // channels are walked once per block rather than once per channel
    for (i, channel) in header.channels.iter().enumerate() {
        write_text(&mut buf, field("label"), channel_count, i, &channel.label, None)?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_text(
            &mut buf,
            field("transducer"),
            channel_count,
            i,
            &channel.transducer,
            None,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_text(
            &mut buf,
            field("physical_dimension"),
            channel_count,
            i,
            &channel.physical_dimension,
            None,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_float(
            &mut buf,
            field("physical_min"),
            channel_count,
            i,
            channel.physical_min,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_float(
            &mut buf,
            field("physical_max"),
            channel_count,
            i,
            channel.physical_max,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_int(
            &mut buf,
            field("digital_min"),
            channel_count,
            i,
            channel.digital_min as i64,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_int(
            &mut buf,
            field("digital_max"),
            channel_count,
            i,
            channel.digital_max as i64,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_text(
            &mut buf,
            field("prefilter"),
            channel_count,
            i,
            &channel.prefilter,
            None,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_int(
            &mut buf,
            field("samples_per_record"),
            channel_count,
            i,
            channel.samples_per_record,
        )?;
    }
    for (i, channel) in header.channels.iter().enumerate() {
        write_text(
            &mut buf,
            field("channel_reserved"),
            channel_count,
            i,
            &channel.reserved,
            None,
        )?;
    }

    Ok(buf)
}

fn field(name: &'static str) -> &'static FieldSpec {
    spec::lookup(name).expect("field name comes from the static catalogue")
}

fn raw<'a>(bytes: &'a [u8], spec: &FieldSpec, channel_count: usize, channel: usize) -> &'a [u8] {
    let offset = spec.location(channel_count, channel);
    &bytes[offset..offset + spec.width]
}

/// Reads a text field as latin-1 and removes the trailing space padding.
fn text_field(bytes: &[u8], spec: &FieldSpec, channel_count: usize) -> String {
    text_field_at(bytes, spec, channel_count, 0)
}

fn text_field_at(bytes: &[u8], spec: &FieldSpec, channel_count: usize, channel: usize) -> String {
    let value: String = raw(bytes, spec, channel_count, channel)
        .iter()
        .map(|b| *b as char)
        .collect();
    value.trim_end_matches(' ').to_string()
}

fn channel_text(bytes: &[u8], name: &'static str, channel_count: usize, channel: usize) -> String {
    text_field_at(bytes, field(name), channel_count, channel)
}

fn int_field(bytes: &[u8], spec: &FieldSpec, channel_count: usize) -> Result<i64, DecodeError> {
    int_field_at(bytes, spec, channel_count, 0)
}

fn int_field_at(
    bytes: &[u8],
    spec: &FieldSpec,
    channel_count: usize,
    channel: usize,
) -> Result<i64, DecodeError> {
    let value = text_field_at(bytes, spec, channel_count, channel);
    value
        .trim()
        .parse()
        .map_err(|_| DecodeError::MalformedField {
            field: spec.name,
            value,
        })
}

fn float_field(
    bytes: &[u8],
    spec: &FieldSpec,
    channel_count: usize,
    channel: usize,
) -> Result<f64, DecodeError> {
    let value = text_field_at(bytes, spec, channel_count, channel);
    value
        .trim()
        .parse()
        .map_err(|_| DecodeError::MalformedField {
            field: spec.name,
            value,
        })
}

/// Writes a text value left-justified into its field. Over-length values are
/// truncated at the byte boundary (logged, lossy by design) unless the cut
/// would destroy a mandatory leading token. Characters outside latin-1 are
/// substituted with `?` and logged.
fn write_text(
    buf: &mut [u8],
    spec: &FieldSpec,
    channel_count: usize,
    channel: usize,
    value: &str,
    protected_token: Option<&'static str>,
) -> Result<(), EncodeError> {
    let offset = spec.location(channel_count, channel);
    let target = &mut buf[offset..offset + spec.width];

    if value.chars().count() > spec.width {
        if let Some(token) = protected_token {
            if value.starts_with(token) && token.len() > spec.width {
                return Err(EncodeError::StructuralViolation {
                    field: spec.name,
                    token,
                });
            }
        }
        log::warn!(
            "field `{}` holds {} characters, truncating to {} bytes",
            spec.name,
            value.chars().count(),
            spec.width
        );
    }

    for (slot, ch) in target.iter_mut().zip(value.chars()) {
        *slot = if (ch as u32) <= 0xFF {
            ch as u32 as u8
        } else {
            log::warn!(
                "field `{}` contains non-latin-1 character {:?}, substituting `?`",
                spec.name,
                ch
            );
            b'?'
        };
    }

    Ok(())
}

fn write_int(
    buf: &mut [u8],
    spec: &FieldSpec,
    channel_count: usize,
    channel: usize,
    value: i64,
) -> Result<(), EncodeError> {
    let rendered = value.to_string();
    if rendered.len() > spec.width {
        return Err(EncodeError::FieldTooLong {
            field: spec.name,
            width: spec.width,
        });
    }
    write_text(buf, spec, channel_count, channel, &rendered, None)
}

fn write_float(
    buf: &mut [u8],
    spec: &FieldSpec,
    channel_count: usize,
    channel: usize,
    value: f64,
) -> Result<(), EncodeError> {
    let rendered = render_float(value, spec.width).ok_or(EncodeError::FieldTooLong {
        field: spec.name,
        width: spec.width,
    })?;
    write_text(buf, spec, channel_count, channel, &rendered, None)
}

/// Renders a float into at most `width` ASCII bytes, preferring the shortest
/// exact form and shaving fractional precision when it does not fit. Returns
/// `None` when even the integer part overflows the field.
fn render_float(value: f64, width: usize) -> Option<String> {
    let shortest = format!("{value}");
    if shortest.len() <= width {
        return Some(shortest);
    }

    for precision in (0..width).rev() {
        let rendered = format!("{value:.precision$}");
        if rendered.len() <= width {
            return Some(rendered);
        }
    }

    None
}
