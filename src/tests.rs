#[cfg(test)]
mod end_to_end {
    use chrono::{NaiveDate, NaiveTime};
    use std::path::Path;

    use crate::codec::{decode, encode};
    use crate::model::{FieldValue, HeaderModel};
    use crate::session::{EditSession, SessionManager};
    use crate::{DecodeError, Specification};

    // Real 3-channel PSG header: EEG, rectal temperature and the EDF+
    // annotations signal, 2880 records of 30 seconds
    const PSG_HEADER: &str = "0       MCH-0234567 F 16-SEP-1987 Haagse_Harry                                          Startdate 16-SEP-1987 PSG-1234/1987 NN Telemetry03                              16.09.8720.35.001024    EDF+C                                       2880    30      3   EEG Fpz-Cz      Temp rectal     EDF Annotations AgAgCl cup electrodes                                                           Rectal thermistor                                                                                                                                               uV      degC            -440    34.4    -1      510     40.2    1       -2048   -2048   -32768  2047    2047    32767   HP:0.1Hz LP:75Hz N:50Hz                                                         LP:0.1Hz (first order)                                                                                                                                          15000   3       320     Reserved for EEG signal         Reserved for Body temperature                                   ";

    #[test]
    fn decode_parses_the_psg_fixture() {
        let header = decode(PSG_HEADER.as_bytes()).unwrap();

        assert_eq!(header.version, "0");
        assert_eq!(
            header.patient_id,
            "MCH-0234567 F 16-SEP-1987 Haagse_Harry"
        );
        assert_eq!(
            header.recording_id,
            "Startdate 16-SEP-1987 PSG-1234/1987 NN Telemetry03"
        );
        assert_eq!(header.start_date, "16.09.87");
        assert_eq!(
            header.parsed_start_date(),
            NaiveDate::from_ymd_opt(1987, 9, 16)
        );
        assert_eq!(header.start_time, "20.35.00");
        assert_eq!(header.parsed_start_time(), NaiveTime::from_hms_opt(20, 35, 0));
        assert_eq!(header.declared_header_bytes(), 1024);
        assert_eq!(header.header_bytes(), 1024);
        assert_eq!(header.reserved, "EDF+C");
        assert_eq!(header.specification(), Specification::EdfPlus);
        assert!(header.is_continuous());
        assert_eq!(header.record_count, 2880);
        assert_eq!(header.record_duration, 30.0);
        assert_eq!(header.channel_count(), 3);

        let eeg = &header.channels[0];
        assert_eq!(eeg.label, "EEG Fpz-Cz");
        assert_eq!(eeg.transducer, "AgAgCl cup electrodes");
        assert_eq!(eeg.physical_dimension, "uV");
        assert_eq!(eeg.physical_min, -440.0);
        assert_eq!(eeg.physical_max, 510.0);
        assert_eq!(eeg.digital_min, -2048);
        assert_eq!(eeg.digital_max, 2047);
        assert_eq!(eeg.prefilter, "HP:0.1Hz LP:75Hz N:50Hz");
        assert_eq!(eeg.samples_per_record, 15000);
        assert_eq!(eeg.reserved, "Reserved for EEG signal");

        let temp = &header.channels[1];
        assert_eq!(temp.label, "Temp rectal");
        assert_eq!(temp.physical_min, 34.4);
        assert_eq!(temp.physical_max, 40.2);
        assert_eq!(temp.samples_per_record, 3);

        let annotations = &header.channels[2];
        assert_eq!(annotations.label, "EDF Annotations");
        assert_eq!(annotations.digital_min, -32768);
        assert_eq!(annotations.digital_max, 32767);
        assert_eq!(annotations.samples_per_record, 320);
    }

    #[test]
    fn psg_fixture_round_trips_byte_identically() {
        let header = decode(PSG_HEADER.as_bytes()).unwrap();
        let encoded = encode(&header).unwrap();
        assert_eq!(encoded, PSG_HEADER.as_bytes());
    }

    #[test]
    fn psg_fixture_round_trips_by_value() {
        let header = decode(PSG_HEADER.as_bytes()).unwrap();
        let again = decode(&encode(&header).unwrap()).unwrap();
        assert_eq!(again, header);
    }

    #[test]
    fn truncated_psg_header_is_rejected_with_sizes() {
        let err = decode(&PSG_HEADER.as_bytes()[..700]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                expected: 1024,
                actual: 700
            }
        );
    }

    #[test]
    fn fixture_has_no_compliance_findings() {
        let model = HeaderModel::decode(PSG_HEADER.as_bytes()).unwrap();
        assert!(model.findings().is_empty());
    }

    #[test]
    fn declared_geometry_matches_the_file_size() {
        let header = decode(PSG_HEADER.as_bytes()).unwrap();
        // 15000 + 3 + 320 samples per record, two bytes each
        let file_len = 1024 + 2880 * (15000 + 3 + 320) * 2;
        let geometry = header.geometry(file_len);
        assert_eq!(geometry.real_header_bytes, 1024);
        assert_eq!(geometry.real_record_count, 2880);
    }

    #[test]
    fn hand_edited_header_bytes_are_detectable() {
        let mut bytes = PSG_HEADER.as_bytes().to_vec();
        bytes[184..192].copy_from_slice(b"9472    ");
        let header = decode(&bytes).unwrap();
        assert_eq!(header.declared_header_bytes(), 9472);
        assert_ne!(header.declared_header_bytes() as usize, header.header_bytes());

        // Re-encoding repairs the declared count
        let repaired = decode(&encode(&header).unwrap()).unwrap();
        assert_eq!(repaired.declared_header_bytes(), 1024);
    }

    #[test]
    fn model_edit_flow_over_the_fixture() {
        let mut model = HeaderModel::decode(PSG_HEADER.as_bytes()).unwrap();

        model
            .set_field("patient_id", FieldValue::Text("X X X X".to_string()))
            .unwrap();
        model
            .set_channel_field("prefilter", 1, FieldValue::Text("LP:0.5Hz".to_string()))
            .unwrap();
        model.resize_channels(4).unwrap();

        let bytes = model.encode().unwrap();
        assert_eq!(bytes.len(), 256 + 256 * 4);

        let reloaded = decode(&bytes).unwrap();
        assert_eq!(reloaded.patient_id, "X X X X");
        assert_eq!(reloaded.channels[1].prefilter, "LP:0.5Hz");
        // The grown channel is a valid placeholder
        assert!(reloaded.channels[3].digital_min < reloaded.channels[3].digital_max);
        // Untouched channels kept their values
        assert_eq!(reloaded.channels[0].label, "EEG Fpz-Cz");
    }

    #[test]
    fn session_flow_over_the_fixture() {
        let mut sessions = SessionManager::new();
        let session = sessions.open("psg.edf", PSG_HEADER.as_bytes()).unwrap();
        assert!(!session.is_dirty().unwrap());

        session
            .model_mut()
            .set_field("patient_id", FieldValue::Text("X X X X".to_string()))
            .unwrap();
        assert!(session.is_dirty().unwrap());

        session.mark_saved().unwrap();
        assert!(!session.is_dirty().unwrap());

        assert!(sessions.close(Path::new("psg.edf")).is_some());
        assert!(sessions.is_empty());
    }

    #[test]
    fn damaged_start_date_stays_inspectable() {
        let mut bytes = PSG_HEADER.as_bytes().to_vec();
        bytes[168..176].copy_from_slice(b"99.99.99");

        let model = HeaderModel::decode(&bytes).unwrap();
        assert_eq!(model.header().start_date, "99.99.99");
        assert_eq!(model.header().parsed_start_date(), None);

        // The damage surfaces as an advisory finding, not a decode error
        let findings = model.findings();
        assert_eq!(findings.len(), 1);
        assert!(matches!(
            findings[0],
            crate::Finding::UnreadableStartField {
                field: "start_date",
                ..
            }
        ));

        // Write-back leaves the damaged bytes exactly as they were
        assert_eq!(model.encode().unwrap(), bytes);
    }

    #[test]
    fn missing_recording_id_is_repaired_from_the_fixture() {
        // Unanonymized NATUS export: the 80 byte recording identification
        // field is absent and everything after it sits 80 bytes early
        let mut damaged = PSG_HEADER.as_bytes()[..88].to_vec();
        damaged.extend_from_slice(&PSG_HEADER.as_bytes()[168..]);
        assert_eq!(damaged.len(), 1024 - 80);

        let header = decode(&damaged).unwrap();
        assert!(header.recording_id_missing());
        assert_eq!(header.recording_id, "Startdate X X X X");
        assert_eq!(header.start_date, "16.09.87");
        assert_eq!(header.record_count, 2880);
        assert_eq!(header.channel_count(), 3);
        assert_eq!(header.channels[0].label, "EEG Fpz-Cz");

        // Record math follows the real on-disk data offset
        let file_len = (1024 - 80) + 2880 * (15000 + 3 + 320) * 2;
        let geometry = header.geometry(file_len);
        assert_eq!(geometry.real_header_bytes, 1024);
        assert_eq!(geometry.real_record_count, 2880);

        // The repaired encoding carries the full layout again
        let repaired = encode(&header).unwrap();
        assert_eq!(repaired.len(), 1024);
        let reloaded = decode(&repaired).unwrap();
        assert!(!reloaded.recording_id_missing());
        assert_eq!(reloaded.recording_id, "Startdate X X X X");
    }

    #[test]
    fn adopting_geometry_resolves_an_unknown_record_count() {
        let mut bytes = PSG_HEADER.as_bytes().to_vec();
        bytes[236..244].copy_from_slice(b"-1      ");

        let mut session = EditSession::open(&bytes).unwrap();
        assert_eq!(session.model().header().record_count, -1);

        let file_len = 1024 + 100 * (15000 + 3 + 320) * 2;
        let geometry = session.model_mut().adopt_geometry(file_len);
        assert_eq!(geometry.real_record_count, 100);
        assert_eq!(session.model().header().record_count, 100);
    }
}
