//! Advisory EDF+ structural checks for the identification strings.
//!
//! EDF+ layers a subfield convention on top of the free-text patient and
//! recording identification fields of plain EDF. Files that predate EDF+
//! legitimately violate it, so everything here reports [`Finding`] values
//! and never fails: a finding must never abort a write.

use chrono::NaiveDate;
use std::fmt::Display;
use std::str::FromStr;

use crate::header::Header;

/// Subfield placeholder for unknown, not applicable or anonymized content.
pub const UNKNOWN_SUBFIELD: &str = "X";

/// The twelve English month abbreviations of the `dd-MMM-yyyy` subfield
/// format, uppercase as the specification demands.
pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// An advisory compliance finding. Findings are data, not errors; they are
/// surfaced to the report collaborator and never block decoding or writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The field does not tokenize into its required leading subfields.
    MissingSubfields {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    /// The sex subfield is not one of `F`, `M` or `X`.
    InvalidSexToken { token: String, index: usize },
    /// A date subfield is not `dd-MMM-yyyy` or names no calendar date.
    InvalidDateToken { token: String, index: usize },
    /// The recording identification does not open with the literal `Startdate`.
    MissingStartdateToken { token: String },
    /// The raw start date or start time field does not parse as a clock value.
    UnreadableStartField {
        field: &'static str,
        value: String,
    },
}

impl Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSubfields {
                field,
                expected,
                found,
            } => write!(
                f,
                "`{field}` must start with {expected} space-separated subfields, found {found}"
            ),
            Self::InvalidSexToken { token, index } => {
                write!(f, "subfield {index} must be F, M or X, found {token:?}")
            }
            Self::InvalidDateToken { token, index } => write!(
                f,
                "subfield {index} must be a dd-MMM-yyyy date or X, found {token:?}"
            ),
            Self::MissingStartdateToken { token } => {
                write!(f, "first subfield must be the literal Startdate, found {token:?}")
            }
            Self::UnreadableStartField { field, value } => {
                write!(f, "`{field}` holds {value:?}, which is not a readable clock value")
            }
        }
    }
}

/// Checks the local patient identification against the EDF+ subfield rules:
/// `code sex birthdate name`, space-separated, underscores standing in for
/// embedded spaces, any subfield replaceable by the `X` placeholder.
pub fn validate_patient_id(value: &str) -> Vec<Finding> {
    let tokens = value.split_ascii_whitespace().collect::<Vec<_>>();
    if tokens.len() < 4 {
        return vec![Finding::MissingSubfields {
            field: "patient_id",
            expected: 4,
            found: tokens.len(),
        }];
    }

    let mut findings = Vec::new();
    if tokens[1] != UNKNOWN_SUBFIELD && Sex::from_str(tokens[1]).is_err() {
        findings.push(Finding::InvalidSexToken {
            token: tokens[1].to_string(),
            index: 1,
        });
    }
    if tokens[2] != UNKNOWN_SUBFIELD && parse_date_token(tokens[2]).is_none() {
        findings.push(Finding::InvalidDateToken {
            token: tokens[2].to_string(),
            index: 2,
        });
    }

    findings
}

/// Checks the local recording identification against the EDF+ subfield rules:
/// the literal `Startdate`, a `dd-MMM-yyyy` date (or `X`) and three
/// administrative codes.
pub fn validate_recording_id(value: &str) -> Vec<Finding> {
    let tokens = value.split_ascii_whitespace().collect::<Vec<_>>();
    if tokens.len() < 5 {
        return vec![Finding::MissingSubfields {
            field: "recording_id",
            expected: 5,
            found: tokens.len(),
        }];
    }

    let mut findings = Vec::new();
    if tokens[0] != "Startdate" {
        findings.push(Finding::MissingStartdateToken {
            token: tokens[0].to_string(),
        });
    }
    if tokens[1] != UNKNOWN_SUBFIELD && parse_date_token(tokens[1]).is_none() {
        findings.push(Finding::InvalidDateToken {
            token: tokens[1].to_string(),
            index: 1,
        });
    }

    findings
}

/// Checks the raw start date and time fields of a decoded header. Damaged
/// files keep their bytes verbatim through decode so they stay inspectable;
/// this is where the damage gets reported.
pub fn validate_start_fields(header: &Header) -> Vec<Finding> {
    let mut findings = Vec::new();
    if header.parsed_start_date().is_none() {
        findings.push(Finding::UnreadableStartField {
            field: "start_date",
            value: header.start_date.clone(),
        });
    }
    if header.parsed_start_time().is_none() {
        findings.push(Finding::UnreadableStartField {
            field: "start_time",
            value: header.start_time.clone(),
        });
    }
    findings
}

/// Strictly parses a `dd-MMM-yyyy` subfield date: two day digits, one of the
/// twelve uppercase month abbreviations, four year digits, and the result
/// must exist on the calendar. `02-MAY-1951` is fine, `2-AUG-1951` is not.
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let parts = token.split('-').collect::<Vec<_>>();
    if parts.len() != 3 {
        return None;
    }

    let [day, month, year] = [parts[0], parts[1], parts[2]];
    if day.len() != 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month_number = MONTHS.iter().position(|m| *m == month)? as u32 + 1;

    NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month_number,
        day.parse().ok()?,
    )
}

/// Renders a date back into the `dd-MMM-yyyy` subfield form.
pub fn format_date_token(date: &NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string().to_uppercase()
}

/// Reads one subfield: the `X` placeholder means unknown, underscores stand
/// in for embedded spaces.
pub fn parse_subfield(token: &str) -> Option<String> {
    if token == UNKNOWN_SUBFIELD {
        return None;
    }
    Some(token.replace('_', " "))
}

/// Renders one subfield, substituting underscores for spaces and the `X`
/// placeholder for unknown content.
pub fn format_subfield(value: Option<&str>) -> String {
    match value {
        Some(v) => v.replace(' ', "_"),
        None => UNKNOWN_SUBFIELD.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
}

impl Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "F"),
            Self::Male => write!(f, "M"),
        }
    }
}

impl FromStr for Sex {
    type Err = ();
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "F" => Ok(Self::Female),
            "M" => Ok(Self::Male),
            _ => Err(()),
        }
    }
}

/// Best-effort structured view of the patient identification for the report
/// and table collaborators. Parsing never fails; unknown or malformed
/// subfields simply come back as `None`. Compliance problems are reported
/// separately through [`validate_patient_id`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PatientId {
    pub code: Option<String>,
    pub sex: Option<Sex>,
    pub birthdate: Option<NaiveDate>,
    pub name: Option<String>,
    pub additional: Vec<Option<String>>,
}

impl PatientId {
    pub fn parse(value: &str) -> Self {
        let tokens = value.split_ascii_whitespace().collect::<Vec<_>>();
        Self {
            code: tokens.first().and_then(|t| parse_subfield(t)),
            sex: tokens.get(1).and_then(|t| Sex::from_str(t).ok()),
            birthdate: tokens.get(2).and_then(|t| parse_date_token(t)),
            name: tokens.get(3).and_then(|t| parse_subfield(t)),
            additional: tokens
                .iter()
                .skip(4)
                .map(|t| parse_subfield(t))
                .collect(),
        }
    }

    /// Renders the identification back into its 80 byte field form.
    pub fn to_field(&self) -> String {
        let mut value = format!(
            "{} {} {} {}",
            format_subfield(self.code.as_deref()),
            format_subfield(self.sex.map(|s| s.to_string()).as_deref()),
            format_subfield(self.birthdate.map(|d| format_date_token(&d)).as_deref()),
            format_subfield(self.name.as_deref()),
        );
        for extra in &self.additional {
            value.push(' ');
            value.push_str(&format_subfield(extra.as_deref()));
        }
        value
    }
}

/// Best-effort structured view of the recording identification.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingId {
    pub startdate: Option<NaiveDate>,
    pub admin_code: Option<String>,
    pub technician: Option<String>,
    pub equipment: Option<String>,
    pub additional: Vec<Option<String>>,
}

impl RecordingId {
    pub fn parse(value: &str) -> Self {
        let tokens = value.split_ascii_whitespace().collect::<Vec<_>>();
        // Tolerate a missing Startdate literal by treating the first token as
        // the date when it parses as one
        let offset = if tokens.first() == Some(&"Startdate") { 1 } else { 0 };
        Self {
            startdate: tokens.get(offset).and_then(|t| parse_date_token(t)),
            admin_code: tokens.get(offset + 1).and_then(|t| parse_subfield(t)),
            technician: tokens.get(offset + 2).and_then(|t| parse_subfield(t)),
            equipment: tokens.get(offset + 3).and_then(|t| parse_subfield(t)),
            additional: tokens
                .iter()
                .skip(offset + 4)
                .map(|t| parse_subfield(t))
                .collect(),
        }
    }

    pub fn to_field(&self) -> String {
        let mut value = format!(
            "Startdate {} {} {} {}",
            format_subfield(self.startdate.map(|d| format_date_token(&d)).as_deref()),
            format_subfield(self.admin_code.as_deref()),
            format_subfield(self.technician.as_deref()),
            format_subfield(self.equipment.as_deref()),
        );
        for extra in &self.additional {
            value.push(' ');
            value.push_str(&format_subfield(extra.as_deref()));
        }
        value
    }
}
