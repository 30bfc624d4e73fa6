#![forbid(unsafe_code)]
//! Roulement — moteur d'évaluation d'un planning mensuel par équipes.
//!
//! - Candidats pour une case (jour, poste) : règles bloquantes et indicatives.
//! - Simulation d'échange de postes entre deux personnes, sur copie.
//! - Alertes mensuelles : séries de travail, sous-effectif, séries A/J.
//! - Aucun état entre deux appels ; stockage JSON/CSV en dehors du moteur.

pub mod alerts;
pub mod calendar;
pub mod engine;
pub mod io;
pub mod model;
pub mod patterns;
pub mod report;
pub mod stats;
pub mod storage;

pub use alerts::{scan_alerts, Alert, AlertKind, AlertOptions};
pub use engine::{
    CandidateEvaluation, ConstraintContext, ConstraintViolation, Enforcement, Engine, EngineError,
    RuleSet, Severity, SwapCandidate, SwapViolation, ViolationKind,
};
pub use model::{
    Holiday, Schedule, Settings, ShiftCategory, ShiftCode, StaffId, StaffMember, TimeRange,
    Workbook,
};
pub use patterns::{PatternSet, ShiftPattern};
pub use report::{AlertRenderer, TextReport};
pub use stats::{fairness, hourly_coverage, monthly_counts, FairnessScore, HourCoverage};
pub use storage::{JsonStorage, Storage};
