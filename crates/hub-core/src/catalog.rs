//! Fixed pools the generator draws from: names, clinicians and the drug
//! catalogue of each cohort.
//!
//! All data in this module is hardcoded and fictional.

use hub_contracts::{cohort::Cohort, patient::Prescription};

// ── People ───────────────────────────────────────────────────────────────────

pub const FIRST_NAMES: &[&str] = &[
    "Juan", "María", "José", "Carmen", "Antonio", "Isabel", "Francisco", "Ana",
    "Manuel", "Teresa", "Rosa", "Luis", "Dolores", "Miguel", "Magdalena",
    "Javier", "Francisca", "Andrés", "Esperanza", "Jorge", "Amparo", "Enrique", "Pilar",
    "Ramón", "Consuelo", "Pedro", "Socorro", "Guillermo", "Adelaida", "Sergio", "Concepción",
    "Alfonso", "Filomena", "Fernando", "Agripina", "Óscar", "Jacinta", "Ricardo", "Elvira",
    "Emilio", "Matilde", "Héctor", "Modesta", "Julio", "Genoveva", "Daniel", "Violeta",
    "Arturo", "Antonia", "Valentín", "Soledad", "Ernesto", "Remedios", "Adolfo", "Josefa",
];

pub const SURNAMES: &[&str] = &[
    "García", "Martínez", "López", "González", "Fernández", "Rodríguez", "Sánchez",
    "Pérez", "Gómez", "Díaz", "Cruz", "Moreno", "Gutiérrez", "Ortiz", "Jiménez",
    "Castillo", "Ruiz", "Navarro", "Ramos", "Herrera", "Vázquez", "Cano", "Molina",
    "Romero", "León", "Iglesias", "Domínguez", "Serrano", "Flores", "Martín", "Delgado",
    "Cortés", "Campos", "Acosta", "Medina", "Reyes", "Rojas", "Carrillo", "Espinosa",
    "Santiago", "Vargas", "Cabrera", "Montoya", "Benítez", "Carmona", "Santana", "Romeral",
];

/// The rheumatology roster. Every patient is assigned one of these.
pub const CLINICIANS: [&str; 6] = [
    "Dr. Silvia García",
    "Dra. Carmen López",
    "Dr. Miguel Torres",
    "Dra. Ana Martínez",
    "Dr. Javier Ruiz",
    "Dra. Isabel Sánchez",
];

/// Role written next to each clinician in the staff reference sheet.
pub const CLINICIAN_ROLE: &str = "Reumatología";

// ── Drugs ────────────────────────────────────────────────────────────────────

/// A drug name and its fixed dose string.
pub type DrugEntry = (&'static str, &'static str);

/// Drugs available to one cohort, by escalation class.
#[derive(Debug)]
pub struct DrugCatalogue {
    pub nsaids: &'static [DrugEntry],
    pub conventional: &'static [DrugEntry],
    pub biologics: &'static [DrugEntry],
}

const NSAIDS: &[DrugEntry] = &[
    ("Naproxeno", "500mg/12h"),
    ("Ibuprofeno", "600mg/8h"),
    ("Etoricoxib", "120mg/día"),
];

static ESPA_DRUGS: DrugCatalogue = DrugCatalogue {
    nsaids: NSAIDS,
    conventional: &[("Sulfasalazina", "2g/día"), ("Metotrexato", "15mg/sem")],
    biologics: &[
        ("Adalimumab", "40mg/2sem"),
        ("Etanercept", "50mg/semana"),
        ("Secukinumab", "150mg/4sem"),
        ("Ixekizumab", "80mg/4sem"),
        ("Certolizumab", "400mg/4sem"),
    ],
};

static APS_DRUGS: DrugCatalogue = DrugCatalogue {
    nsaids: NSAIDS,
    conventional: &[("Metotrexato", "15mg/sem"), ("Leflunomida", "20mg/día")],
    biologics: &[
        ("Adalimumab", "40mg/2sem"),
        ("Etanercept", "50mg/semana"),
        ("Secukinumab", "150mg/4sem"),
        ("Ustekinumab", "90mg/12sem"),
        ("Guselkumab", "100mg/4sem"),
    ],
};

/// The drug catalogue of `cohort`.
pub fn drugs(cohort: Cohort) -> &'static DrugCatalogue {
    match cohort {
        Cohort::Espa => &ESPA_DRUGS,
        Cohort::Aps => &APS_DRUGS,
    }
}

pub fn prescription(entry: &DrugEntry) -> Prescription {
    Prescription::new(entry.0, entry.1)
}

// ── Reference sheet rows ─────────────────────────────────────────────────────

/// Rows for the medications sheet: one column per drug class, each listing
/// the union of both cohorts' drugs in catalogue order.
pub fn medication_rows() -> Vec<[String; 3]> {
    let classes: [fn(&DrugCatalogue) -> &'static [DrugEntry]; 3] =
        [|c| c.nsaids, |c| c.conventional, |c| c.biologics];
    let columns: Vec<Vec<String>> = classes
        .iter()
        .map(|class| {
            let mut names: Vec<String> = Vec::new();
            for cohort in Cohort::ALL {
                for entry in class(drugs(cohort)) {
                    let label = prescription(entry).to_string();
                    if !names.contains(&label) {
                        names.push(label);
                    }
                }
            }
            names
        })
        .collect();

    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|i| {
            let cell = |col: usize| columns[col].get(i).cloned().unwrap_or_default();
            [cell(0), cell(1), cell(2)]
        })
        .collect()
}

/// Rows for the staff sheet: `(name, role)` for every clinician.
pub fn staff_rows() -> Vec<[String; 2]> {
    CLINICIANS
        .iter()
        .map(|name| [name.to_string(), CLINICIAN_ROLE.to_string()])
        .collect()
}
