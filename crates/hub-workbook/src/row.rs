//! Flattening a typed `Visit` into the 220 cells of a cohort-sheet row.
//!
//! Groups that are `None` on the visit become runs of `Cell::Empty` as wide
//! as the group, so every row lines up with `HEADERS` whatever the cohort or
//! visit kind.

use chrono::NaiveDate;

use hub_contracts::{
    cell::Cell,
    patient::Prescription,
    schema::{FieldGroup, COLUMN_COUNT, DIGIT_SITES, JOINT_SITES},
    visit::Visit,
};
use hub_core::sampling::expand_flags;

/// Format of every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// One cohort-sheet row for `visit`, in `HEADERS` order.
pub fn visit_to_cells(visit: &Visit) -> Vec<Cell> {
    let mut row = RowBuilder::default();

    let identity = &visit.identity;
    row.push(identity.patient_id.to_string());
    row.push(identity.name.as_str());
    row.push(identity.sex.label());
    row.push(format_date(identity.date));
    row.push(identity.kind.label());

    let diagnosis = &visit.diagnosis;
    row.push(diagnosis.clinician.as_str());
    row.push(diagnosis.primary.diagnosis());
    row.blank(1);
    row.push(diagnosis.hla_b27.label());
    row.push(diagnosis.rheumatoid_factor);
    row.push(diagnosis.anti_ccp);

    match &visit.anamnesis {
        Some(a) => {
            row.push(a.symptom_onset.as_str());
            row.push(a.psoriasis_onset.clone());
            row.push(a.axial_pain);
            row.push(a.morning_stiffness.as_str());
            row.push(a.stiffness_duration.as_str());
            row.push(a.buttock_radiation);
            row.push(a.axial_involvement);
        }
        None => row.skip(FieldGroup::Anamnesis),
    }

    row.extend(expand_flags(&visit.joints.swollen, JOINT_SITES.len()));
    row.extend(expand_flags(&visit.joints.tender, JOINT_SITES.len()));
    row.extend(expand_flags(&visit.dactylitis.affected, DIGIT_SITES.len()));
    row.push(visit.joints.swollen.len());
    row.push(visit.joints.tender.len());
    row.push(visit.dactylitis.affected.len());

    let body = &visit.anthropometrics;
    row.push(body.weight_kg);
    row.push(body.height_cm);
    row.push(body.bmi);
    row.push(body.blood_pressure());

    match &visit.patient_reported {
        Some(p) => {
            row.push(p.global);
            row.push(p.pain);
            row.push(p.fatigue);
            row.push(p.morning_stiffness_min);
            row.push(p.night_pain);
        }
        None => row.skip(FieldGroup::PatientReported),
    }

    match &visit.psoriasis_areas {
        Some(areas) => row.extend([
            areas.scalp,
            areas.nail,
            areas.extensor,
            areas.folds,
            areas.palmoplantar,
        ]),
        None => row.skip(FieldGroup::PsoriasisAreas),
    }

    let extra = &visit.extra_articular;
    row.extend([extra.digestive, extra.uveitis, extra.psoriasis]);

    let c = &visit.comorbidities;
    row.extend([
        c.hypertension,
        c.diabetes,
        c.dyslipidaemia,
        c.cardiovascular,
        c.gastritis,
        c.obesity,
        c.osteoporosis,
        c.gout,
    ]);

    row.skip(FieldGroup::FamilyHistory);

    match &visit.toxic_habits {
        Some(habits) => {
            for habit in [habits.tobacco, habits.alcohol, habits.drugs] {
                row.push(habit);
                row.blank(1);
            }
        }
        None => row.skip(FieldGroup::ToxicHabits),
    }

    match &visit.enthesitis {
        Some(e) => {
            row.extend(e.right);
            row.extend(e.left);
            row.push(e.other);
        }
        None => row.skip(FieldGroup::Enthesitis),
    }

    match &visit.labs {
        Some(labs) => {
            row.push(labs.crp);
            row.push(labs.esr);
            // Free-text lab and imaging findings.
            row.blank(3);
        }
        None => row.skip(FieldGroup::Labs),
    }

    match &visit.basdai {
        Some(b) => {
            row.extend(b.questions.iter().map(|q| u32::from(*q)));
            row.push(b.result);
        }
        None => row.skip(FieldGroup::Basdai),
    }

    match &visit.asdas {
        Some(a) => row.extend([
            a.back_pain,
            a.stiffness,
            a.patient_global,
            a.crp_result,
            a.esr_result,
        ]),
        None => row.skip(FieldGroup::Asdas),
    }

    match &visit.metrology {
        Some(m) => {
            row.push(m.schober_cm);
            row.push(m.cervical_rotation_deg);
            row.push(m.occiput_wall_cm);
            row.push(m.tragus_wall_cm);
            row.push(m.chest_expansion_cm);
            row.push(m.intermalleolar_cm);
        }
        None => row.skip(FieldGroup::Metrology),
    }

    match &visit.pasi {
        Some(p) => {
            row.push(p.score);
            row.push(p.bsa_percentage);
            row.push(p.description.as_str());
        }
        None => row.skip(FieldGroup::Pasi),
    }

    match &visit.haq {
        Some(h) => {
            row.extend(h.categories);
            row.push(h.total);
        }
        None => row.skip(FieldGroup::Haq),
    }

    match &visit.lei {
        Some(l) => {
            row.extend(l.sites.iter().map(|s| u32::from(*s)));
            row.push(u32::from(l.score));
        }
        None => row.skip(FieldGroup::Lei),
    }

    match &visit.mda {
        Some(m) => {
            row.push(m.tender);
            row.push(m.swollen);
            row.push(m.pasi);
            row.push(m.pain_mm);
            row.push(m.global_mm);
            row.push(m.haq);
            row.push(u32::from(m.enthesitis));
            row.push(m.met);
        }
        None => row.skip(FieldGroup::Mda),
    }

    match &visit.rapid3 {
        Some(r) => row.extend([r.function, r.pain, r.global, r.score]),
        None => row.skip(FieldGroup::Rapid3),
    }

    row.push(visit.treatment.current.as_str());
    row.push(format_date(visit.treatment.start_date));
    // Decision_Terapeutica_PV
    row.blank(1);

    match &visit.continuation {
        Some(c) => row.extend([c.adherence, c.adjustment]),
        None => row.skip(FieldGroup::Continuation),
    }

    row.skip(FieldGroup::TreatmentChange);

    row.push(visit.follow_up_decision.map(|d| d.label()));

    match &visit.initial_treatment {
        Some(regimen) => {
            row.prescription(Some(&regimen.systemic));
            row.prescription(regimen.conventional.as_ref());
            row.prescription(regimen.biologic.as_ref());
        }
        None => row.skip(FieldGroup::InitialTreatment),
    }

    row.push(format_date(visit.next_review));
    row.blank(1);

    row.finish()
}

#[derive(Default)]
struct RowBuilder {
    cells: Vec<Cell>,
}

impl RowBuilder {
    fn push(&mut self, value: impl Into<Cell>) {
        self.cells.push(value.into());
    }

    fn extend<T: Into<Cell>>(&mut self, values: impl IntoIterator<Item = T>) {
        self.cells.extend(values.into_iter().map(Into::into));
    }

    fn blank(&mut self, n: usize) {
        self.cells.resize(self.cells.len() + n, Cell::Empty);
    }

    fn skip(&mut self, group: FieldGroup) {
        self.blank(group.width());
    }

    /// Drug name and dose as two cells.
    fn prescription(&mut self, prescription: Option<&Prescription>) {
        match prescription {
            Some(p) => {
                self.push(p.drug.as_str());
                self.push(p.dose.as_str());
            }
            None => self.blank(2),
        }
    }

    fn finish(self) -> Vec<Cell> {
        debug_assert_eq!(self.cells.len(), COLUMN_COUNT);
        self.cells
    }
}
