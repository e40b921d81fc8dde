/*!
`edfhdr-rs` is a pure Rust codec and validation engine for the header region
of EDF/EDF+ files. It is the data-model core of a header inspection and
repair tool: the surrounding shell (file browser, table views, report
generation) reads field values from a [`HeaderModel`] snapshot and requests
writes, while this crate owns parsing, structural validation and the exact
fixed-width byte layout. It is based on the official specification
[here](https://www.edfplus.info/).

The crate performs no file I/O. Callers hand the first
`256 + 256 * channel_count` bytes of a file to [`codec::decode`] (or
[`session::EditSession::open`]) and persist the bytes that [`codec::encode`]
returns; the data records that follow the header are never touched and stay
correctly addressed because the encoded header always has exactly the byte
count its own fields declare.

# Examples

## Inspect and edit a header

```rust
use edfhdr_rs::{FieldValue, Header, HeaderModel, codec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // In the real tool these bytes come from the start of an .edf file
    let mut header = Header::new();
    header.patient_id = "MCH-0234567 F 02-MAY-1951 Haagse_Harry".to_string();
    let bytes = codec::encode(&header)?;

    let mut model = HeaderModel::decode(&bytes)?;
    assert!(model.findings().is_empty());

    model.set_field(
        "recording_id",
        FieldValue::Text("Startdate 02-MAR-2002 PSG-1234/2002 NN Telemetry03".to_string()),
    )?;
    model.set_channel_field("label", 0, FieldValue::Text("EEG Fpz-Cz".to_string()))?;

    // The caller persists this buffer over the file's header region
    let out = model.encode()?;
    assert_eq!(out.len(), model.header().header_bytes());
    Ok(())
}
```

## Advisory EDF+ compliance findings

Plain EDF files legitimately violate the EDF+ subfield conventions, so the
validator reports findings instead of failing:

```rust
use edfhdr_rs::validator;

let findings = validator::validate_patient_id("MCH-0234567 Q 02-MAY-1951 Name");
assert_eq!(findings.len(), 1);
println!("{}", findings[0]);
```

## Track open files and dirty state

```rust
use edfhdr_rs::{FieldValue, Header, codec};
use edfhdr_rs::session::SessionManager;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bytes = codec::encode(&Header::new())?;

    let mut sessions = SessionManager::new();
    let session = sessions.open("recording.edf", &bytes)?;
    assert!(!session.is_dirty()?);

    session
        .model_mut()
        .set_field("patient_id", FieldValue::Text("MCH-0234567 F X X".to_string()))?;
    assert!(session.is_dirty()?);

    sessions.close(Path::new("recording.edf"));
    Ok(())
}
```
*/

pub mod codec;
pub mod error;
pub mod header;
pub mod model;
pub mod session;
pub mod spec;
pub mod validator;

mod tests;

pub use error::{DecodeError, EncodeError, ModelError};
pub use header::{Channel, FileGeometry, Header};
pub use model::{FieldChange, FieldValue, HeaderModel};
pub use validator::Finding;

/// Specification a file claims through its 44 byte reserved field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Specification {
    /// The original EDF specification from 1992. See the official specifications [here](https://www.edfplus.info/specs/edf.html).
    Edf,

    #[default]
    /// The extended EDF specification from 2003. See the official specifications [here](https://www.edfplus.info/specs/edfplus.html).
    EdfPlus,
}
