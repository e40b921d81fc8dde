//! Mediated mutation of a decoded header.
//!
//! [`HeaderModel`] owns one [`Header`] and is the only mutation path the
//! surrounding tooling is supposed to use: every edit is checked against the
//! field catalogue (width, type, value ranges) before it is committed, and
//! every commit is published to registered observers so table views and
//! report generators can refresh without the model knowing who they are.
//!
//! A model instance is single-writer by contract. It holds no internal
//! locking; confine it to one owning session or guard it externally.

use crate::codec;
use crate::error::{EncodeError, ModelError};
use crate::header::{self, Channel, FileGeometry, Header};
use crate::spec::{self, FieldKind, FieldSpec};
use crate::validator::{self, Finding};

/// Closed value type for the name-addressed field surface. Per-channel
/// fields travel as whole arrays indexed by channel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    TextArray(Vec<String>),
    IntegerArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

/// A committed field mutation, published to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: FieldValue,
    pub new: FieldValue,
}

type Observer = Box<dyn Fn(&FieldChange)>;

/// Mutable in-memory representation of one open header.
pub struct HeaderModel {
    header: Header,
    observers: Vec<Observer>,
}

impl HeaderModel {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            observers: Vec::new(),
        }
    }

    /// Decodes a raw buffer straight into a model.
    pub fn decode(bytes: &[u8]) -> Result<Self, crate::error::DecodeError> {
        Ok(Self::new(codec::decode(bytes)?))
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn into_header(self) -> Header {
        self.header
    }

    /// Registers a change observer. Observers receive every committed
    /// mutation; the model never learns their identity.
    pub fn subscribe(&mut self, observer: impl Fn(&FieldChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Encodes the current header state.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        codec::encode(&self.header)
    }

    /// Advisory findings for the current identification strings and the raw
    /// start date/time fields.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = validator::validate_patient_id(&self.header.patient_id);
        findings.extend(validator::validate_recording_id(&self.header.recording_id));
        findings.extend(validator::validate_start_fields(&self.header));
        findings
    }

    /// Read-only snapshot of every catalogue field, derived fields included.
    pub fn snapshot(&self) -> Vec<(&'static str, FieldValue)> {
        spec::FIELDS
            .iter()
            .map(|f| (f.name, self.get_field(f)))
            .collect()
    }

    /// Current value of a field by catalogue name.
    pub fn get(&self, name: &str) -> Result<FieldValue, ModelError> {
        let spec = spec::lookup(name).ok_or_else(|| ModelError::UnknownField(name.to_string()))?;
        Ok(self.get_field(spec))
    }

    /// Sets a field by catalogue name. Width, type and range constraints are
    /// checked before anything is committed; derived fields are rejected.
    /// Per-channel fields expect a whole array of `channel_count` values.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ModelError> {
        let spec = spec::lookup(name).ok_or_else(|| ModelError::UnknownField(name.to_string()))?;
        if is_immutable(spec.name) {
            return Err(ModelError::ImmutableField(spec.name));
        }

        let old = self.get_field(spec);
        if spec.per_channel {
            self.set_channel_array(spec, &value)?;
        } else {
            self.set_fixed(spec, &value)?;
        }
        self.notify(FieldChange {
            field: spec.name,
            old,
            new: self.get_field(spec),
        });
        Ok(())
    }

    /// Sets a per-channel field for a single channel.
    pub fn set_channel_field(
        &mut self,
        name: &str,
        channel: usize,
        value: FieldValue,
    ) -> Result<(), ModelError> {
        let spec = spec::lookup(name).ok_or_else(|| ModelError::UnknownField(name.to_string()))?;
        if !spec.per_channel {
            return Err(ModelError::TypeMismatch {
                field: spec.name,
                expected: "per-channel array",
            });
        }
        let count = self.header.channel_count();
        if channel >= count {
            return Err(ModelError::ChannelOutOfBounds { channel, count });
        }

        let old = self.get_field(spec);
        match spec.kind {
            FieldKind::Text => {
                let text = expect_text(spec, &value)?;
                check_text(spec, &text)?;
                if let Some(slot) = channel_text_slot(&mut self.header.channels[channel], spec.name)
                {
                    *slot = text;
                }
            }
            FieldKind::Integer => {
                let number = expect_integer(spec, &value)?;
                self.check_and_set_channel_int(spec, channel, number)?;
            }
            FieldKind::Float => {
                let number = expect_float(spec, &value)?;
                self.check_and_set_channel_float(spec, channel, number)?;
            }
            FieldKind::Date | FieldKind::Time => unreachable!("no per-channel date fields"),
        }
        self.notify(FieldChange {
            field: spec.name,
            old,
            new: self.get_field(spec),
        });
        Ok(())
    }

    /// Grows the channel array with placeholder channels or truncates it,
    /// keeping every per-channel array in lock-step and recomputing the
    /// header byte count. The only way the channel count ever changes.
    pub fn resize_channels(&mut self, new_count: usize) -> Result<(), ModelError> {
        if !header::channel_count_in_bounds(new_count) {
            return Err(ModelError::InvalidChannelCount(new_count));
        }

        let old_count = self.header.channel_count();
        if new_count == old_count {
            return Ok(());
        }
        self.header
            .channels
            .resize_with(new_count, Channel::placeholder);
        self.notify(FieldChange {
            field: "channel_count",
            old: FieldValue::Integer(old_count as i64),
            new: FieldValue::Integer(new_count as i64),
        });
        // The derived byte count moves in lock-step, so observers watching it
        // hear about the resize too
        self.notify(FieldChange {
            field: "header_bytes",
            old: FieldValue::Integer(spec::header_bytes(old_count) as i64),
            new: FieldValue::Integer(spec::header_bytes(new_count) as i64),
        });
        Ok(())
    }

    /// Repairs the record count from the real file length, resolving the
    /// `-1` sentinel or a corrupted declared count. The only mutation path
    /// for `record_count`.
    pub fn adopt_geometry(&mut self, file_len: u64) -> FileGeometry {
        let geometry = self.header.geometry(file_len);
        let old = self.header.record_count;
        if old != geometry.real_record_count {
            self.header.record_count = geometry.real_record_count;
            self.notify(FieldChange {
                field: "record_count",
                old: FieldValue::Integer(old),
                new: FieldValue::Integer(geometry.real_record_count),
            });
        }
        geometry
    }

    fn set_fixed(&mut self, spec: &FieldSpec, value: &FieldValue) -> Result<(), ModelError> {
        match spec.name {
            "patient_id" | "recording_id" | "reserved" => {
                let text = expect_text(spec, value)?;
                check_text(spec, &text)?;
                match spec.name {
                    "patient_id" => self.header.patient_id = text,
                    "recording_id" => self.header.recording_id = text,
                    _ => self.header.reserved = text,
                }
            }
            "start_date" => {
                let text = expect_text(spec, value)?;
                let parsed =
                    header::parse_start_date(&text).ok_or_else(|| ModelError::InvalidValue {
                        field: spec.name,
                        reason: format!("{text:?} is not a dd.mm.yy date"),
                    })?;
                self.header.start_date = header::format_start_date(&parsed);
            }
            "start_time" => {
                let text = expect_text(spec, value)?;
                let parsed =
                    header::parse_start_time(&text).ok_or_else(|| ModelError::InvalidValue {
                        field: spec.name,
                        reason: format!("{text:?} is not a hh.mm.ss time"),
                    })?;
                self.header.start_time = header::format_start_time(&parsed);
            }
            "record_duration" => {
                let duration = expect_float(spec, value)?;
                if !(duration > 0.0) {
                    return Err(ModelError::InvalidValue {
                        field: spec.name,
                        reason: format!("record duration must be positive, got {duration}"),
                    });
                }
                self.header.record_duration = duration;
            }
            _ => unreachable!("immutable fields are filtered before dispatch"),
        }
        Ok(())
    }

    fn set_channel_array(&mut self, spec: &FieldSpec, value: &FieldValue) -> Result<(), ModelError> {
        let count = self.header.channel_count();
        match spec.kind {
            FieldKind::Text => {
                let values = match value {
                    FieldValue::TextArray(v) => v,
                    _ => {
                        return Err(ModelError::TypeMismatch {
                            field: spec.name,
                            expected: "text array",
                        });
                    }
                };
                check_array_len(spec, values.len(), count)?;
                for text in values {
                    check_text(spec, text)?;
                }
                for (channel, text) in self.header.channels.iter_mut().zip(values) {
                    if let Some(slot) = channel_text_slot(channel, spec.name) {
                        *slot = text.clone();
                    }
                }
            }
            FieldKind::Integer => {
                let values = match value {
                    FieldValue::IntegerArray(v) => v,
                    _ => {
                        return Err(ModelError::TypeMismatch {
                            field: spec.name,
                            expected: "integer array",
                        });
                    }
                };
                check_array_len(spec, values.len(), count)?;
                for (i, number) in values.iter().enumerate() {
                    self.check_channel_int(spec, i, *number)?;
                }
                for (i, number) in values.iter().enumerate() {
                    self.commit_channel_int(spec, i, *number);
                }
            }
            FieldKind::Float => {
                let values = match value {
                    FieldValue::FloatArray(v) => v,
                    _ => {
                        return Err(ModelError::TypeMismatch {
                            field: spec.name,
                            expected: "float array",
                        });
                    }
                };
                check_array_len(spec, values.len(), count)?;
                for (i, number) in values.iter().enumerate() {
                    self.check_channel_float(spec, i, *number)?;
                }
                for (i, number) in values.iter().enumerate() {
                    self.commit_channel_float(spec, i, *number);
                }
            }
            FieldKind::Date | FieldKind::Time => unreachable!("no per-channel date fields"),
        }
        Ok(())
    }

    fn check_and_set_channel_int(
        &mut self,
        spec: &FieldSpec,
        channel: usize,
        value: i64,
    ) -> Result<(), ModelError> {
        self.check_channel_int(spec, channel, value)?;
        self.commit_channel_int(spec, channel, value);
        Ok(())
    }

    /// Digital ranges are rejected on write when they would invert: the
    /// minimum must stay strictly below the maximum of the same channel.
    fn check_channel_int(
        &self,
        spec: &FieldSpec,
        channel: usize,
        value: i64,
    ) -> Result<(), ModelError> {
        let current = &self.header.channels[channel];
        match spec.name {
            "digital_min" | "digital_max" => {
                if i32::try_from(value).is_err() {
                    return Err(ModelError::InvalidRange {
                        channel,
                        reason: format!("{value} does not fit a 16 bit digital range field"),
                    });
                }
                if spec.name == "digital_min" && value >= current.digital_max as i64 {
                    return Err(ModelError::InvalidRange {
                        channel,
                        reason: format!(
                            "digital_min {value} must be below digital_max {}",
                            current.digital_max
                        ),
                    });
                }
                if spec.name == "digital_max" && value <= current.digital_min as i64 {
                    return Err(ModelError::InvalidRange {
                        channel,
                        reason: format!(
                            "digital_max {value} must be above digital_min {}",
                            current.digital_min
                        ),
                    });
                }
            }
            "samples_per_record" => {
                if value <= 0 {
                    return Err(ModelError::InvalidRange {
                        channel,
                        reason: format!("samples_per_record must be positive, got {value}"),
                    });
                }
            }
            _ => unreachable!("no other per-channel integer fields"),
        }
        Ok(())
    }

    fn commit_channel_int(&mut self, spec: &FieldSpec, channel: usize, value: i64) {
        let target = &mut self.header.channels[channel];
        match spec.name {
            "digital_min" => target.digital_min = value as i32,
            "digital_max" => target.digital_max = value as i32,
            "samples_per_record" => target.samples_per_record = value,
            _ => unreachable!(),
        }
    }

    fn check_and_set_channel_float(
        &mut self,
        spec: &FieldSpec,
        channel: usize,
        value: f64,
    ) -> Result<(), ModelError> {
        self.check_channel_float(spec, channel, value)?;
        self.commit_channel_float(spec, channel, value);
        Ok(())
    }

    fn check_channel_float(
        &self,
        spec: &FieldSpec,
        channel: usize,
        value: f64,
    ) -> Result<(), ModelError> {
        let current = &self.header.channels[channel];
        if !value.is_finite() {
            return Err(ModelError::InvalidRange {
                channel,
                reason: format!("{} must be finite", spec.name),
            });
        }
        if spec.name == "physical_min" && value >= current.physical_max {
            return Err(ModelError::InvalidRange {
                channel,
                reason: format!(
                    "physical_min {value} must be below physical_max {}",
                    current.physical_max
                ),
            });
        }
        if spec.name == "physical_max" && value <= current.physical_min {
            return Err(ModelError::InvalidRange {
                channel,
                reason: format!(
                    "physical_max {value} must be above physical_min {}",
                    current.physical_min
                ),
            });
        }
        Ok(())
    }

    fn commit_channel_float(&mut self, spec: &FieldSpec, channel: usize, value: f64) {
        let target = &mut self.header.channels[channel];
        match spec.name {
            "physical_min" => target.physical_min = value,
            "physical_max" => target.physical_max = value,
            _ => unreachable!(),
        }
    }

    fn get_field(&self, spec: &FieldSpec) -> FieldValue {
        let h = &self.header;
        match spec.name {
            "version" => FieldValue::Text(h.version.clone()),
            "patient_id" => FieldValue::Text(h.patient_id.clone()),
            "recording_id" => FieldValue::Text(h.recording_id.clone()),
            "start_date" => FieldValue::Text(h.start_date.clone()),
            "start_time" => FieldValue::Text(h.start_time.clone()),
            "header_bytes" => FieldValue::Integer(h.header_bytes() as i64),
            "reserved" => FieldValue::Text(h.reserved.clone()),
            "record_count" => FieldValue::Integer(h.record_count),
            "record_duration" => FieldValue::Float(h.record_duration),
            "channel_count" => FieldValue::Integer(h.channel_count() as i64),
            "label" => FieldValue::TextArray(h.channels.iter().map(|c| c.label.clone()).collect()),
            "transducer" => {
                FieldValue::TextArray(h.channels.iter().map(|c| c.transducer.clone()).collect())
            }
            "physical_dimension" => FieldValue::TextArray(
                h.channels
                    .iter()
                    .map(|c| c.physical_dimension.clone())
                    .collect(),
            ),
            "physical_min" => {
                FieldValue::FloatArray(h.channels.iter().map(|c| c.physical_min).collect())
            }
            "physical_max" => {
                FieldValue::FloatArray(h.channels.iter().map(|c| c.physical_max).collect())
            }
            "digital_min" => {
                FieldValue::IntegerArray(h.channels.iter().map(|c| c.digital_min as i64).collect())
            }
            "digital_max" => {
                FieldValue::IntegerArray(h.channels.iter().map(|c| c.digital_max as i64).collect())
            }
            "prefilter" => {
                FieldValue::TextArray(h.channels.iter().map(|c| c.prefilter.clone()).collect())
            }
            "samples_per_record" => {
                FieldValue::IntegerArray(h.channels.iter().map(|c| c.samples_per_record).collect())
            }
            "channel_reserved" => {
                FieldValue::TextArray(h.channels.iter().map(|c| c.reserved.clone()).collect())
            }
            _ => unreachable!("field name comes from the static catalogue"),
        }
    }

    fn notify(&self, change: FieldChange) {
        for observer in &self.observers {
            observer(&change);
        }
    }
}

/// Derived fields are recomputed, never settable: the header byte count and
/// channel count follow the channel array, the record count follows the real
/// file geometry, and the version literal is fixed by the format.
fn is_immutable(name: &str) -> bool {
    matches!(
        name,
        "header_bytes" | "record_count" | "channel_count" | "version"
    )
}

fn expect_text(spec: &FieldSpec, value: &FieldValue) -> Result<String, ModelError> {
    match value {
        FieldValue::Text(v) => Ok(v.clone()),
        _ => Err(ModelError::TypeMismatch {
            field: spec.name,
            expected: "text",
        }),
    }
}

fn expect_integer(spec: &FieldSpec, value: &FieldValue) -> Result<i64, ModelError> {
    match value {
        FieldValue::Integer(v) => Ok(*v),
        _ => Err(ModelError::TypeMismatch {
            field: spec.name,
            expected: "integer",
        }),
    }
}

fn expect_float(spec: &FieldSpec, value: &FieldValue) -> Result<f64, ModelError> {
    match value {
        FieldValue::Float(v) => Ok(*v),
        FieldValue::Integer(v) => Ok(*v as f64),
        _ => Err(ModelError::TypeMismatch {
            field: spec.name,
            expected: "float",
        }),
    }
}

fn check_text(spec: &FieldSpec, value: &str) -> Result<(), ModelError> {
    let len = value.chars().count();
    if len > spec.width {
        return Err(ModelError::ValueTooWide {
            field: spec.name,
            len,
            width: spec.width,
        });
    }
    if !is_printable_ascii(value) {
        return Err(ModelError::InvalidValue {
            field: spec.name,
            reason: "only printable ASCII is allowed".to_string(),
        });
    }
    Ok(())
}

fn check_array_len(spec: &FieldSpec, found: usize, expected: usize) -> Result<(), ModelError> {
    if found != expected {
        return Err(ModelError::ArrayLengthMismatch {
            field: spec.name,
            expected,
            found,
        });
    }
    Ok(())
}

fn channel_text_slot<'a>(channel: &'a mut Channel, name: &str) -> Option<&'a mut String> {
    match name {
        "label" => Some(&mut channel.label),
        "transducer" => Some(&mut channel.transducer),
        "physical_dimension" => Some(&mut channel.physical_dimension),
        "prefilter" => Some(&mut channel.prefilter),
        "channel_reserved" => Some(&mut channel.reserved),
        _ => None,
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, 0x20..=0x7E))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn model() -> HeaderModel {
        let mut header = Header::new();
        header.channels[0].label = "EEG Fpz-Cz".to_string();
        HeaderModel::new(header)
    }

    #[test]
    fn set_field_commits_and_notifies() {
        let mut model = model();
        let seen: Rc<RefCell<Vec<FieldChange>>> = Rc::default();
        let sink = Rc::clone(&seen);
        model.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        model
            .set_field("patient_id", FieldValue::Text("X X X X".to_string()))
            .unwrap();

        let changes = seen.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "patient_id");
        assert_eq!(changes[0].new, FieldValue::Text("X X X X".to_string()));
        assert_eq!(model.header().patient_id, "X X X X");
    }

    #[test]
    fn derived_fields_are_immutable() {
        let mut model = model();
        for name in ["header_bytes", "record_count", "channel_count", "version"] {
            assert_eq!(
                model.set_field(name, FieldValue::Integer(1)),
                Err(ModelError::ImmutableField(name)),
            );
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut model = model();
        assert_eq!(
            model.set_field("no_such_field", FieldValue::Integer(1)),
            Err(ModelError::UnknownField("no_such_field".to_string()))
        );
    }

    #[test]
    fn over_width_text_is_rejected_before_commit() {
        let mut model = model();
        let before = model.header().clone();
        let err = model
            .set_field("patient_id", FieldValue::Text("x".repeat(81)))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::ValueTooWide {
                field: "patient_id",
                len: 81,
                width: 80
            }
        );
        assert_eq!(model.header(), &before);
    }

    #[test]
    fn start_date_is_set_through_its_text_form() {
        let mut model = model();
        model
            .set_field("start_date", FieldValue::Text("16.09.87".to_string()))
            .unwrap();
        assert_eq!(model.header().start_date, "16.09.87");
        assert_eq!(
            model.header().parsed_start_date(),
            chrono::NaiveDate::from_ymd_opt(1987, 9, 16)
        );

        let err = model
            .set_field("start_date", FieldValue::Text("16/09/87".to_string()))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { field: "start_date", .. }));
    }

    #[test]
    fn digital_min_not_below_max_is_rejected_on_write() {
        let mut model = model();
        // Placeholder channel has digital_max 32767
        let err = model
            .set_channel_field("digital_min", 0, FieldValue::Integer(32767))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRange { channel: 0, .. }));

        // Strictly below the max commits fine
        model
            .set_channel_field("digital_min", 0, FieldValue::Integer(-2048))
            .unwrap();
        assert_eq!(model.header().channels[0].digital_min, -2048);
    }

    #[test]
    fn physical_range_must_not_invert() {
        let mut model = model();
        let err = model
            .set_field("physical_max", FieldValue::FloatArray(vec![-2.0]))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRange { channel: 0, .. }));
    }

    #[test]
    fn whole_array_length_must_match_channel_count() {
        let mut model = model();
        let err = model
            .set_field(
                "label",
                FieldValue::TextArray(vec!["a".to_string(), "b".to_string()]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::ArrayLengthMismatch {
                field: "label",
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn array_writes_are_all_or_nothing() {
        let mut model = model();
        model.resize_channels(2).unwrap();
        let before = model.header().clone();
        // Second element inverts its range, nothing may be committed
        let err = model
            .set_field("samples_per_record", FieldValue::IntegerArray(vec![10, 0]))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRange { channel: 1, .. }));
        assert_eq!(model.header(), &before);
    }

    #[test]
    fn resize_grows_with_placeholders_and_notifies() {
        let mut model = model();
        let seen: Rc<RefCell<Vec<FieldChange>>> = Rc::default();
        let sink = Rc::clone(&seen);
        model.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        model.resize_channels(3).unwrap();
        assert_eq!(model.header().channel_count(), 3);
        assert_eq!(model.header().header_bytes(), 256 + 256 * 3);
        assert_eq!(model.header().channels[2], Channel::placeholder());
        assert_eq!(seen.borrow()[0].field, "channel_count");
        // The derived byte count is published alongside the resize
        assert_eq!(seen.borrow()[1].field, "header_bytes");
        assert_eq!(
            seen.borrow()[1].new,
            FieldValue::Integer(256 + 256 * 3)
        );

        model.resize_channels(1).unwrap();
        assert_eq!(model.header().channels[0].label, "EEG Fpz-Cz");

        assert_eq!(
            model.resize_channels(0),
            Err(ModelError::InvalidChannelCount(0))
        );
    }

    #[test]
    fn resize_then_encode_matches_the_size_rule() {
        let mut model = model();
        for n in [1usize, 2, 7, 36] {
            model.resize_channels(n).unwrap();
            let bytes = model.encode().unwrap();
            assert_eq!(bytes.len(), 256 + 256 * n);
        }
    }

    #[test]
    fn adopt_geometry_repairs_the_record_count() {
        let mut model = model();
        model
            .set_channel_field("samples_per_record", 0, FieldValue::Integer(100))
            .unwrap();

        // 512 header bytes + 5 records of 100 samples * 2 bytes
        let geometry = model.adopt_geometry(512 + 5 * 200);
        assert_eq!(geometry.real_record_count, 5);
        assert_eq!(model.header().record_count, 5);
    }

    #[test]
    fn findings_follow_identification_edits() {
        let mut model = model();
        assert!(model.findings().is_empty());

        model
            .set_field(
                "recording_id",
                FieldValue::Text("Begindate X X X X".to_string()),
            )
            .unwrap();
        assert_eq!(model.findings().len(), 1);
    }

    #[test]
    fn snapshot_exposes_derived_fields() {
        let model = model();
        let snapshot = model.snapshot();
        let get = |name: &str| {
            snapshot
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("header_bytes"), FieldValue::Integer(512));
        assert_eq!(get("channel_count"), FieldValue::Integer(1));
        assert_eq!(
            get("label"),
            FieldValue::TextArray(vec!["EEG Fpz-Cz".to_string()])
        );
    }
}
