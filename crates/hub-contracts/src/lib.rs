//! # hub-contracts
//!
//! Shared types, the column schema, and error contracts for the clinical hub
//! generator.
//!
//! Every crate in the workspace imports from here. Only data definitions,
//! constructors and construction-time validation live in this crate.

pub mod cell;
pub mod cohort;
pub mod error;
pub mod patient;
pub mod schema;
pub mod sheet;
pub mod verify;
pub mod visit;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use cell::Cell;
    use cohort::{Cohort, Flag, Serology, Sex, VisitKind};
    use error::HubError;
    use patient::{
        BaselineMarkers, Comorbidities, EscalationTier, NewPatient, Patient, PatientId,
        Prescription, PsoriasisAreas, Regimen,
    };
    use schema::{FieldGroup, COLUMN_COUNT, HEADERS};
    use sheet::SheetRows;

    fn no_comorbidities() -> Comorbidities {
        Comorbidities {
            hypertension: Flag::No,
            diabetes: Flag::No,
            dyslipidaemia: Flag::No,
            cardiovascular: Flag::No,
            gastritis: Flag::No,
            obesity: Flag::No,
            osteoporosis: Flag::No,
            gout: Flag::No,
        }
    }

    fn nsaid_regimen() -> Regimen {
        Regimen {
            tier: EscalationTier::NsaidOnly,
            systemic: Prescription::new("Naproxeno", "500mg/12h"),
            conventional: None,
            biologic: None,
        }
    }

    fn espa_fields() -> NewPatient {
        NewPatient {
            id: PatientId::new(Cohort::Espa, 2024, 1),
            name: "Ana García López".to_string(),
            sex: Sex::Female,
            clinician: "Dra. Carmen López".to_string(),
            markers: BaselineMarkers::Axial {
                hla_b27: Serology::Positive,
            },
            comorbidities: no_comorbidities(),
            regimen: nsaid_regimen(),
            treatment_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    // ── Schema ───────────────────────────────────────────────────────────────

    #[test]
    fn headers_have_expected_count_and_are_unique() {
        assert_eq!(HEADERS.len(), COLUMN_COUNT);
        let unique: HashSet<&str> = HEADERS.iter().copied().collect();
        assert_eq!(unique.len(), COLUMN_COUNT);
    }

    #[test]
    fn headers_start_and_end_where_expected() {
        assert_eq!(HEADERS[0], "ID_Paciente");
        assert_eq!(HEADERS[COLUMN_COUNT - 1], "Comentarios_Adicionales");
        assert_eq!(HEADERS[FieldGroup::Totals.range().start], "NAD_Total");
        assert_eq!(FieldGroup::Totals.range().start, 94);
    }

    #[test]
    fn field_groups_tile_the_header_row() {
        let mut next = 0;
        for group in FieldGroup::ALL {
            let range = group.range();
            assert_eq!(range.start, next, "{group:?} does not start where the previous ended");
            next = range.end;
        }
        assert_eq!(next, COLUMN_COUNT);
    }

    #[test]
    fn field_group_headers_line_up_with_labels() {
        assert_eq!(FieldGroup::SwollenJoints.headers()[0], "NAD_hombro_derecho");
        assert_eq!(FieldGroup::TenderJoints.headers()[0], "NAT_hombro_derecho");
        assert_eq!(FieldGroup::Basdai.headers()[6], "BASDAI_Result");
        assert_eq!(FieldGroup::TreatmentChange.width(), 9);
        assert_eq!(FieldGroup::TreatmentChange.headers()[0], "Cambio_Motivo");
        assert_eq!(FieldGroup::InitialTreatment.headers()[4], "Trat_Biologico");
    }

    // ── Cohort and flags ─────────────────────────────────────────────────────

    #[test]
    fn cohort_codes_and_sheet_names() {
        assert_eq!(Cohort::Espa.id_code(), "ESP");
        assert_eq!(Cohort::Aps.id_code(), "APS");
        assert_eq!(Cohort::Espa.sheet_name(), "ESPA");
        assert_eq!(Cohort::Aps.to_string(), "APS");
        assert_eq!(Cohort::Espa.default_max_swollen(), 12);
        assert_eq!(Cohort::Aps.default_max_swollen(), 10);
    }

    #[test]
    fn visit_kind_labels_round_trip() {
        for kind in [VisitKind::FirstVisit, VisitKind::FollowUp] {
            assert_eq!(VisitKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(VisitKind::from_label("Alta"), None);
    }

    #[test]
    fn flag_text_and_cell_views() {
        assert_eq!(Flag::from(true).as_str(), "SI");
        assert!(Flag::is_flag_text("NO"));
        assert!(!Flag::is_flag_text("si"));
        assert_eq!(Cell::from(Flag::Si).as_flag(), Some(Flag::Si));
        assert_eq!(Cell::text("7").as_f64(), Some(7.0));
        assert!(Cell::text("").is_empty());
        assert!(Cell::from(None::<f64>).is_empty());
        assert!(!Cell::Integer(0).is_empty());
    }

    // ── Patient ──────────────────────────────────────────────────────────────

    #[test]
    fn patient_id_renders_three_digit_sequence() {
        assert_eq!(PatientId::new(Cohort::Espa, 2024, 7).to_string(), "ESP-2024-007");
        assert_eq!(PatientId::new(Cohort::Aps, 2025, 30).to_string(), "APS-2025-030");
    }

    #[test]
    fn escalation_tier_thresholds() {
        assert_eq!(EscalationTier::from_draw(0.0), EscalationTier::NsaidOnly);
        assert_eq!(EscalationTier::from_draw(0.399), EscalationTier::NsaidOnly);
        assert_eq!(EscalationTier::from_draw(0.4), EscalationTier::Conventional);
        assert_eq!(EscalationTier::from_draw(0.699), EscalationTier::Conventional);
        assert_eq!(EscalationTier::from_draw(0.7), EscalationTier::Biologic);
        assert_eq!(EscalationTier::from_draw(0.999), EscalationTier::Biologic);
    }

    #[test]
    fn regimen_summary_joins_add_on() {
        let mut regimen = nsaid_regimen();
        assert_eq!(regimen.summary(), "Naproxeno 500mg/12h");

        regimen.tier = EscalationTier::Biologic;
        regimen.biologic = Some(Prescription::new("Adalimumab", "40mg/2sem"));
        assert_eq!(regimen.summary(), "Naproxeno 500mg/12h + Adalimumab 40mg/2sem");
    }

    #[test]
    fn patient_new_starts_on_initial_regimen() {
        let patient = Patient::new(espa_fields()).unwrap();
        assert_eq!(patient.current_treatment(), "Naproxeno 500mg/12h");
        assert_eq!(patient.cohort(), Cohort::Espa);
    }

    #[test]
    fn patient_new_rejects_cohort_mismatch() {
        let mut fields = espa_fields();
        fields.markers = BaselineMarkers::Psoriatic {
            hla_b27: Serology::Negative,
            rheumatoid_factor: Flag::No,
            anti_ccp: Flag::No,
            psoriasis: PsoriasisAreas {
                scalp: Flag::Si,
                nail: Flag::No,
                extensor: Flag::No,
                folds: Flag::No,
                palmoplantar: Flag::No,
            },
        };
        let err = Patient::new(fields).unwrap_err();
        assert!(matches!(err, HubError::InvalidPatient { .. }));
    }

    #[test]
    fn patient_new_rejects_inconsistent_tier() {
        let mut fields = espa_fields();
        fields.regimen.tier = EscalationTier::Conventional;
        let err = Patient::new(fields).unwrap_err();
        assert!(err.to_string().contains("tier 2"));
    }

    #[test]
    fn patient_new_rejects_out_of_range_sequence() {
        let mut fields = espa_fields();
        fields.id.sequence = 1000;
        assert!(Patient::new(fields).is_err());

        let mut fields = espa_fields();
        fields.id.sequence = 0;
        assert!(Patient::new(fields).is_err());
    }

    #[test]
    fn patient_current_treatment_is_the_only_mutable_field() {
        let mut patient = Patient::new(espa_fields()).unwrap();
        patient.set_current_treatment("Secukinumab 150mg/4sem");
        assert_eq!(patient.current_treatment(), "Secukinumab 150mg/4sem");
        assert_eq!(patient.regimen().summary(), "Naproxeno 500mg/12h");
    }

    // ── SheetRows ────────────────────────────────────────────────────────────

    #[test]
    fn sheet_rows_short_rows_read_as_empty() {
        let mut sheet = SheetRows::new("ESPA", vec!["A".to_string(), "B".to_string()]);
        sheet.rows.push(vec![Cell::text("x")]);
        assert_eq!(sheet.cell(0, "A"), Some(&Cell::text("x")));
        assert_eq!(sheet.cell(0, "B"), Some(&Cell::Empty));
        assert_eq!(sheet.cell(1, "A"), None);
        assert_eq!(sheet.cell(0, "C"), None);
        assert_eq!(sheet.total_rows(), 2);
    }

    // ── HubError display messages ────────────────────────────────────────────

    #[test]
    fn error_missing_sheet_display() {
        let err = HubError::MissingSheet {
            sheet: "ESPA".to_string(),
        };
        assert!(err.to_string().contains("'ESPA'"));
    }

    #[test]
    fn error_schema_mismatch_display() {
        let err = HubError::SchemaMismatch {
            sheet: "APS".to_string(),
            reason: "column 3 is 'Edad'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("APS"));
        assert!(msg.contains("Edad"));
    }

    #[test]
    fn error_io_display() {
        let err = HubError::Io {
            path: "hub.xlsx".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "i/o error on 'hub.xlsx': permission denied");
    }

    // ── Serde round-trip ─────────────────────────────────────────────────────

    #[test]
    fn regimen_round_trips_through_json() {
        let original = Regimen {
            tier: EscalationTier::Conventional,
            systemic: Prescription::new("Etoricoxib", "120mg/día"),
            conventional: Some(Prescription::new("Leflunomida", "20mg/día")),
            biologic: None,
        };
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"conventional\""));
        let decoded: Regimen = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }
}
