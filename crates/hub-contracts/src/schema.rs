//! The workbook schema: sheet names, the 220 cohort-sheet headers, the joint
//! and digit enumerations, and the field groups that partition the headers.
//!
//! Everything here is constant, so initializing a workbook twice always
//! produces the same header row in the same order.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Sheet holding the drug catalogue reference rows.
pub const MEDICATIONS_SHEET: &str = "Medications";

/// Sheet holding the clinician roster reference rows.
pub const STAFF_SHEET: &str = "Staff";

/// Column labels of the medications sheet.
pub const MEDICATION_HEADERS: [&str; 3] = ["Sistemicos", "FAMEs", "Biologicos"];

/// Column labels of the staff sheet.
pub const STAFF_HEADERS: [&str; 2] = ["Nombre", "Cargo"];

/// Number of columns in a cohort sheet.
pub const COLUMN_COUNT: usize = 220;

/// The 28 examined joints, in column order.
pub const JOINT_SITES: [&str; 28] = [
    "hombro-derecho", "hombro-izquierdo", "codo-derecho", "codo-izquierdo",
    "muneca-derecha", "muneca-izquierda", "rodilla-derecha", "rodilla-izquierda",
    "mcf1-derecha", "mcf2-derecha", "mcf3-derecha", "mcf4-derecha", "mcf5-derecha",
    "mcf1-izquierda", "mcf2-izquierda", "mcf3-izquierda", "mcf4-izquierda", "mcf5-izquierda",
    "ifp1-derecha", "ifp2-derecha", "ifp3-derecha", "ifp4-derecha", "ifp5-derecha",
    "ifp1-izquierda", "ifp2-izquierda", "ifp3-izquierda", "ifp4-izquierda", "ifp5-izquierda",
];

/// The 20 digits tracked for dactylitis: ten fingers, then ten toes.
pub const DIGIT_SITES: [&str; 20] = [
    "dedo1-mano-derecha", "dedo2-mano-derecha", "dedo3-mano-derecha",
    "dedo4-mano-derecha", "dedo5-mano-derecha",
    "dedo1-mano-izquierda", "dedo2-mano-izquierda", "dedo3-mano-izquierda",
    "dedo4-mano-izquierda", "dedo5-mano-izquierda",
    "dedo1-pie-derecho", "dedo2-pie-derecho", "dedo3-pie-derecho",
    "dedo4-pie-derecho", "dedo5-pie-derecho",
    "dedo1-pie-izquierdo", "dedo2-pie-izquierdo", "dedo3-pie-izquierdo",
    "dedo4-pie-izquierdo", "dedo5-pie-izquierdo",
];

/// Digits `0..HAND_DIGITS` are fingers; the rest are toes.
pub const HAND_DIGITS: usize = 10;

/// Header row shared by the `ESPA` and `APS` sheets.
pub const HEADERS: [&str; COLUMN_COUNT] = [
    // Identification
    "ID_Paciente", "Nombre_Paciente", "Sexo", "Fecha_Visita", "Tipo_Visita",
    // Diagnosis
    "Profesional", "Diagnostico_Primario", "Diagnostico_Secundario", "HLA_B27", "FR", "APCC",
    // Anamnesis
    "Inicio_Sintomas", "Inicio_Psoriasis", "Dolor_Axial", "Rigidez_Matutina", "Duracion_Rigidez",
    "Irradiacion_Nalgas", "Clinica_Axial_Presente",
    // Swollen joints
    "NAD_hombro_derecho", "NAD_hombro_izquierdo", "NAD_codo_derecho", "NAD_codo_izquierdo",
    "NAD_muneca_derecha", "NAD_muneca_izquierda", "NAD_rodilla_derecha", "NAD_rodilla_izquierda",
    "NAD_mcf1_derecha", "NAD_mcf2_derecha", "NAD_mcf3_derecha", "NAD_mcf4_derecha", "NAD_mcf5_derecha",
    "NAD_mcf1_izquierda", "NAD_mcf2_izquierda", "NAD_mcf3_izquierda", "NAD_mcf4_izquierda", "NAD_mcf5_izquierda",
    "NAD_ifp1_derecha", "NAD_ifp2_derecha", "NAD_ifp3_derecha", "NAD_ifp4_derecha", "NAD_ifp5_derecha",
    "NAD_ifp1_izquierda", "NAD_ifp2_izquierda", "NAD_ifp3_izquierda", "NAD_ifp4_izquierda", "NAD_ifp5_izquierda",
    // Tender joints
    "NAT_hombro_derecho", "NAT_hombro_izquierdo", "NAT_codo_derecho", "NAT_codo_izquierdo",
    "NAT_muneca_derecha", "NAT_muneca_izquierda", "NAT_rodilla_derecha", "NAT_rodilla_izquierda",
    "NAT_mcf1_derecha", "NAT_mcf2_derecha", "NAT_mcf3_derecha", "NAT_mcf4_derecha", "NAT_mcf5_derecha",
    "NAT_mcf1_izquierda", "NAT_mcf2_izquierda", "NAT_mcf3_izquierda", "NAT_mcf4_izquierda", "NAT_mcf5_izquierda",
    "NAT_ifp1_derecha", "NAT_ifp2_derecha", "NAT_ifp3_derecha", "NAT_ifp4_derecha", "NAT_ifp5_derecha",
    "NAT_ifp1_izquierda", "NAT_ifp2_izquierda", "NAT_ifp3_izquierda", "NAT_ifp4_izquierda", "NAT_ifp5_izquierda",
    // Dactylitis
    "DACT_dedo1_mano_derecha", "DACT_dedo2_mano_derecha", "DACT_dedo3_mano_derecha",
    "DACT_dedo4_mano_derecha", "DACT_dedo5_mano_derecha",
    "DACT_dedo1_mano_izquierda", "DACT_dedo2_mano_izquierda", "DACT_dedo3_mano_izquierda",
    "DACT_dedo4_mano_izquierda", "DACT_dedo5_mano_izquierda",
    "DACT_dedo1_pie_derecho", "DACT_dedo2_pie_derecho", "DACT_dedo3_pie_derecho",
    "DACT_dedo4_pie_derecho", "DACT_dedo5_pie_derecho",
    "DACT_dedo1_pie_izquierdo", "DACT_dedo2_pie_izquierdo", "DACT_dedo3_pie_izquierdo",
    "DACT_dedo4_pie_izquierdo", "DACT_dedo5_pie_izquierdo",
    // Totals
    "NAD_Total", "NAT_Total", "Dactilitis_Total",
    // Anthropometrics
    "Peso", "Talla", "IMC", "TA",
    // Patient-reported outcomes
    "EVA_Global", "EVA_Dolor", "EVA_Fatiga", "Rigidez_Matutina_Min", "Dolor_Nocturno",
    // Psoriasis areas
    "Psoriasis_Cuero_Cabelludo", "Psoriasis_Ungueal", "Psoriasis_Extensora", "Psoriasis_Pliegues",
    "Psoriasis_Palmoplantar",
    // Extra-articular
    "ExtraArticular_Digestiva", "ExtraArticular_Uveitis", "ExtraArticular_Psoriasis",
    // Comorbidities
    "Comorbilidad_HTA", "Comorbilidad_DM", "Comorbilidad_DLP", "Comorbilidad_ECV",
    "Comorbilidad_Gastritis", "Comorbilidad_Obesidad", "Comorbilidad_Osteoporosis", "Comorbilidad_Gota",
    // Family history
    "AF_Psoriasis", "AF_Artritis", "AF_EII", "AF_Uveitis",
    // Toxic habits
    "Toxico_Tabaco", "Toxico_Tabaco_Desc", "Toxico_Alcohol", "Toxico_Alcohol_Desc", "Toxico_Drogas",
    "Toxico_Drogas_Desc",
    // Enthesitis
    "Entesitis_Aquiles_Der", "Entesitis_Fascia_Der", "Entesitis_Epicondilo_Lat_Der",
    "Entesitis_Epicondilo_Med_Der", "Entesitis_Trocanter_Der",
    "Entesitis_Aquiles_Izq", "Entesitis_Fascia_Izq", "Entesitis_Epicondilo_Lat_Izq",
    "Entesitis_Epicondilo_Med_Izq", "Entesitis_Trocanter_Izq", "Otras_Entesitis",
    // Labs and imaging
    "PCR", "VSG", "Otros_Hallazgos_Analitica", "Hallazgos_Radiografia", "Hallazgos_RMN",
    // BASDAI
    "BASDAI_P1", "BASDAI_P2", "BASDAI_P3", "BASDAI_P4", "BASDAI_P5", "BASDAI_P6", "BASDAI_Result",
    // ASDAS
    "ASDAS_Dolor_Espalda", "ASDAS_Duracion_Rigidez", "ASDAS_EVA_Global", "ASDAS_CRP_Result",
    "ASDAS_ESR_Result",
    // Metrology
    "Schober", "Rotacion_Cervical", "Distancia_OP", "Distancia_TP", "Expansion_Toracica",
    "Distancia_Intermaleolar",
    // PASI
    "PASI_Score", "BSA_Percentage", "Psoriasis_Descripcion",
    // HAQ-DI
    "HAQ_Vestirse", "HAQ_Levantarse", "HAQ_Comer", "HAQ_Caminar", "HAQ_Higiene", "HAQ_Alcanzar",
    "HAQ_Agarrar", "HAQ_Actividades", "HAQ_Total",
    // LEI
    "LEI_Epicondilo_Lat_Izq", "LEI_Epicondilo_Lat_Der", "LEI_Epicondilo_Med_Izq",
    "LEI_Epicondilo_Med_Der", "LEI_Aquiles_Izq", "LEI_Aquiles_Der", "LEI_Score",
    // MDA
    "MDA_NAT", "MDA_NAD", "MDA_PASI", "MDA_Dolor", "MDA_Global", "MDA_HAQ", "MDA_Entesitis", "MDA_Cumple",
    // RAPID3
    "RAPID3_Funcion", "RAPID3_Dolor", "RAPID3_Global", "RAPID3_Score",
    // Current treatment
    "Tratamiento_Actual", "Fecha_Inicio_Tratamiento", "Decision_Terapeutica_PV",
    // Continue treatment
    "Continuar_Adherencia", "Continuar_Ajuste_Terapeutico",
    // Change treatment
    "Cambio_Motivo", "Cambio_Efectos_Adversos", "Cambio_Descripcion_Efectos",
    "Cambio_Sistemico_Farmaco", "Cambio_Sistemico_Dosis", "Cambio_FAME_Farmaco", "Cambio_FAME_Dosis",
    "Cambio_Biologico_Farmaco", "Cambio_Biologico_Dosis",
    // Follow-up decision
    "Decision_Terapeutica_SEG",
    // Initial treatments
    "Trat_Sistemico", "Trat_Sistemico_Dosis", "Trat_FAME", "Trat_FAME_Dosis", "Trat_Biologico",
    "Trat_Biologico_Dosis",
    // Scheduling
    "Fecha_Proxima_Revision", "Comentarios_Adicionales",
];

/// A contiguous block of related columns in a cohort sheet.
///
/// Groups are listed in column order and tile the whole header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldGroup {
    Identification,
    Diagnosis,
    Anamnesis,
    SwollenJoints,
    TenderJoints,
    Dactylitis,
    Totals,
    Anthropometrics,
    PatientReported,
    PsoriasisAreas,
    ExtraArticular,
    Comorbidities,
    FamilyHistory,
    ToxicHabits,
    Enthesitis,
    Labs,
    Basdai,
    Asdas,
    Metrology,
    Pasi,
    Haq,
    Lei,
    Mda,
    Rapid3,
    Treatment,
    Continuation,
    TreatmentChange,
    FollowUpDecision,
    InitialTreatment,
    Scheduling,
}

impl FieldGroup {
    /// Every group, in column order.
    pub const ALL: [FieldGroup; 30] = [
        FieldGroup::Identification,
        FieldGroup::Diagnosis,
        FieldGroup::Anamnesis,
        FieldGroup::SwollenJoints,
        FieldGroup::TenderJoints,
        FieldGroup::Dactylitis,
        FieldGroup::Totals,
        FieldGroup::Anthropometrics,
        FieldGroup::PatientReported,
        FieldGroup::PsoriasisAreas,
        FieldGroup::ExtraArticular,
        FieldGroup::Comorbidities,
        FieldGroup::FamilyHistory,
        FieldGroup::ToxicHabits,
        FieldGroup::Enthesitis,
        FieldGroup::Labs,
        FieldGroup::Basdai,
        FieldGroup::Asdas,
        FieldGroup::Metrology,
        FieldGroup::Pasi,
        FieldGroup::Haq,
        FieldGroup::Lei,
        FieldGroup::Mda,
        FieldGroup::Rapid3,
        FieldGroup::Treatment,
        FieldGroup::Continuation,
        FieldGroup::TreatmentChange,
        FieldGroup::FollowUpDecision,
        FieldGroup::InitialTreatment,
        FieldGroup::Scheduling,
    ];

    /// Number of columns in this group.
    pub fn width(self) -> usize {
        match self {
            FieldGroup::Identification => 5,
            FieldGroup::Diagnosis => 6,
            FieldGroup::Anamnesis => 7,
            FieldGroup::SwollenJoints | FieldGroup::TenderJoints => JOINT_SITES.len(),
            FieldGroup::Dactylitis => DIGIT_SITES.len(),
            FieldGroup::Totals => 3,
            FieldGroup::Anthropometrics => 4,
            FieldGroup::PatientReported => 5,
            FieldGroup::PsoriasisAreas => 5,
            FieldGroup::ExtraArticular => 3,
            FieldGroup::Comorbidities => 8,
            FieldGroup::FamilyHistory => 4,
            FieldGroup::ToxicHabits => 6,
            FieldGroup::Enthesitis => 11,
            FieldGroup::Labs => 5,
            FieldGroup::Basdai => 7,
            FieldGroup::Asdas => 5,
            FieldGroup::Metrology => 6,
            FieldGroup::Pasi => 3,
            FieldGroup::Haq => 9,
            FieldGroup::Lei => 7,
            FieldGroup::Mda => 8,
            FieldGroup::Rapid3 => 4,
            FieldGroup::Treatment => 3,
            FieldGroup::Continuation => 2,
            FieldGroup::TreatmentChange => 9,
            FieldGroup::FollowUpDecision => 1,
            FieldGroup::InitialTreatment => 6,
            FieldGroup::Scheduling => 2,
        }
    }

    /// Column indices covered by this group.
    pub fn range(self) -> Range<usize> {
        let start: usize = Self::ALL
            .iter()
            .take_while(|g| **g != self)
            .map(|g| g.width())
            .sum();
        start..start + self.width()
    }

    /// Header names covered by this group.
    pub fn headers(self) -> &'static [&'static str] {
        &HEADERS[self.range()]
    }
}
