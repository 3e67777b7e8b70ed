//! The generation loop.
//!
//! For each cohort in order, for each patient: build the patient, draw the
//! number of visits, then assemble and append the first visit and every
//! follow-up. The sink is finalized once, after the last cohort.

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use hub_config::GeneratorConfig;
use hub_contracts::{
    cohort::{Cohort, VisitKind},
    error::{HubError, HubResult},
    visit::Visit,
};

use crate::{
    assembler::{assemble_visit, VisitPlan},
    patient::{build_patient, follow_up_date, TreatmentSwitch},
    scores::{self, ActivityCategory},
    traits::VisitSink,
};

/// Counts for one cohort after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortSummary {
    pub cohort: Cohort,
    pub patients: usize,
    pub first_visits: usize,
    pub follow_ups: usize,
    /// Follow-ups on which the current treatment was switched to a biologic.
    pub treatment_switches: usize,
    /// Follow-ups by activity category: BASDAI for ESPA, RAPID3 for APS.
    pub activity: BTreeMap<ActivityCategory, usize>,
}

impl CohortSummary {
    fn new(cohort: Cohort) -> Self {
        Self {
            cohort,
            patients: 0,
            first_visits: 0,
            follow_ups: 0,
            treatment_switches: 0,
            activity: BTreeMap::new(),
        }
    }

    pub fn visits(&self) -> usize {
        self.first_visits + self.follow_ups
    }
}

/// Result of a whole run, one entry per cohort in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub cohorts: Vec<CohortSummary>,
}

impl GenerationSummary {
    pub fn cohort(&self, cohort: Cohort) -> Option<&CohortSummary> {
        self.cohorts.iter().find(|c| c.cohort == cohort)
    }

    pub fn total_visits(&self) -> usize {
        self.cohorts.iter().map(CohortSummary::visits).sum()
    }
}

/// Drives one generation run from a validated configuration.
#[derive(Debug)]
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    switch: TreatmentSwitch,
}

impl<'a> Generator<'a> {
    /// Validate `config` and prepare a run.
    pub fn new(config: &'a GeneratorConfig) -> HubResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            switch: TreatmentSwitch::new(config.switch_probability)?,
        })
    }

    /// Generate both cohorts into `sink`, then finalize it.
    pub fn run<R, S>(&self, rng: &mut R, sink: &mut S) -> HubResult<GenerationSummary>
    where
        R: Rng + ?Sized,
        S: VisitSink + ?Sized,
    {
        let mut cohorts = Vec::with_capacity(Cohort::ALL.len());
        for cohort in Cohort::ALL {
            cohorts.push(self.run_cohort(rng, sink, cohort)?);
        }
        sink.finalize()?;

        let summary = GenerationSummary { cohorts };
        info!(visits = summary.total_visits(), "generation complete");
        Ok(summary)
    }

    fn run_cohort<R, S>(&self, rng: &mut R, sink: &mut S, cohort: Cohort) -> HubResult<CohortSummary>
    where
        R: Rng + ?Sized,
        S: VisitSink + ?Sized,
    {
        let settings = self.config.cohort(cohort);
        let max_swollen = self.config.max_swollen(cohort);
        let visits = self.config.visits;
        let mut summary = CohortSummary::new(cohort);

        info!(cohort = %cohort, patients = settings.patients, "generating cohort");

        for index in 0..settings.patients {
            let sequence = u16::try_from(index + 1).map_err(|_| HubError::InvalidParameter {
                reason: format!("patient sequence {} does not fit an identifier", index + 1),
            })?;
            let mut patient = build_patient(rng, cohort, sequence)?;
            let visit_count = rng.random_range(visits.min..=visits.max);
            let first = patient.treatment_start();

            let plan = VisitPlan {
                kind: VisitKind::FirstVisit,
                date: first,
                max_swollen,
            };
            sink.append(&assemble_visit(rng, &patient, &plan)?)?;
            summary.first_visits += 1;

            for follow_up in 1..visit_count {
                let date = follow_up_date(rng, first, follow_up)?;
                if self.switch.apply(rng, &mut patient)? {
                    summary.treatment_switches += 1;
                }
                let plan = VisitPlan {
                    kind: VisitKind::FollowUp,
                    date,
                    max_swollen,
                };
                let visit = assemble_visit(rng, &patient, &plan)?;
                if let Some(category) = activity_category(&visit) {
                    *summary.activity.entry(category).or_insert(0) += 1;
                }
                sink.append(&visit)?;
                summary.follow_ups += 1;
            }

            debug!(
                patient_id = %patient.id(),
                tier = patient.regimen().tier.level(),
                visits = visit_count,
                "patient generated"
            );
            summary.patients += 1;
        }

        info!(
            cohort = %cohort,
            patients = summary.patients,
            visits = summary.visits(),
            switches = summary.treatment_switches,
            "cohort generated"
        );
        Ok(summary)
    }
}

/// Generate with a fresh `Generator` over `config`.
pub fn generate<R, S>(config: &GeneratorConfig, rng: &mut R, sink: &mut S) -> HubResult<GenerationSummary>
where
    R: Rng + ?Sized,
    S: VisitSink + ?Sized,
{
    Generator::new(config)?.run(rng, sink)
}

fn activity_category(visit: &Visit) -> Option<ActivityCategory> {
    match visit.cohort() {
        Cohort::Espa => visit.basdai.as_ref().map(|b| scores::basdai_category(b.result)),
        Cohort::Aps => visit.rapid3.as_ref().map(|r| scores::rapid3_category(r.score)),
    }
}
