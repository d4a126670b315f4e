//! Observed input tables for the cod–capelin consumption model.
//!
//! Purpose
//! -------
//! Hold the predator (cod) and prey (capelin) tables the model is fit to and
//! check, once, that their dimensions agree. Everything downstream (the
//! recurrence, the likelihood, the reporter) indexes these tables without
//! re-checking shapes.
//!
//! Key behaviors
//! -------------
//! - [`PredatorTables`] groups the seven `[years × predator ages]` tables.
//! - [`PreyTables`] groups the two `[years × prey ages]` tables plus the
//!   per-year off-season natural-mortality rate.
//! - [`ConsumptionData::new`] validates the combination and is the only way
//!   to build the container the model consumes.
//!
//! Invariants & assumptions
//! ------------------------
//! - All tables are non-empty.
//! - The seven predator tables share one shape; the empirical consumption
//!   table is the reference.
//! - The two prey tables share one shape; prey abundance is the reference.
//! - Predator tables, prey tables and the off-season vector cover the same
//!   number of years.
//!
//! Conventions
//! -----------
//! - Rows are years, columns are ages, both 0-based.
//! - Values are taken as given. Only dimensions are validated; the model
//!   never clamps or cleans observations.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each dimension failure mode.
use crate::consumption::errors::{ModelError, ModelResult};
use ndarray::{Array1, Array2};

/// Predator (cod) tables, each `[years × predator ages]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredatorTables {
    /// Empirical consumption per individual (`Cco`).
    pub consumption: Array2<f64>,
    /// Abundance (`Nco`).
    pub abundance: Array2<f64>,
    /// Proportion mature (`Oco`).
    pub maturity: Array2<f64>,
    /// Fraction of immature fish inside the sub-region (`SV`).
    pub subregion_immature: Array2<f64>,
    /// Mean weight (`Wco`).
    pub weight: Array2<f64>,
    /// Fishing mortality (`Fco`).
    pub fishing_mortality: Array2<f64>,
    /// Natural mortality (`Mco`).
    pub natural_mortality: Array2<f64>,
}

impl PredatorTables {
    fn named(&self) -> [(&'static str, &Array2<f64>); 7] {
        [
            ("predator_consumption", &self.consumption),
            ("predator_abundance", &self.abundance),
            ("predator_maturity", &self.maturity),
            ("predator_subregion_immature", &self.subregion_immature),
            ("predator_weight", &self.weight),
            ("predator_fishing_mortality", &self.fishing_mortality),
            ("predator_natural_mortality", &self.natural_mortality),
        ]
    }
}

/// Prey (capelin) tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PreyTables {
    /// Abundance (`Nmc`), `[years × prey ages]`.
    pub abundance: Array2<f64>,
    /// Mean weight (`Wmc`), `[years × prey ages]`.
    pub weight: Array2<f64>,
    /// Per-year off-season natural-mortality rate (`p3`).
    pub off_season_mortality: Array1<f64>,
}

/// Validated model input: predator tables plus prey tables.
///
/// Fields
/// ------
/// - `predator`: [`PredatorTables`]
/// - `prey`: [`PreyTables`]
///
/// Invariants
/// ----------
/// - See the module docs; all checks happen in [`ConsumptionData::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionData {
    pub predator: PredatorTables,
    pub prey: PreyTables,
}

impl ConsumptionData {
    /// Validate and bundle the model inputs.
    ///
    /// Errors
    /// ------
    /// - `ModelError::EmptyTable` when the predator or prey reference table
    ///   has zero years or zero ages.
    /// - `ModelError::TableShapeMismatch` when a table disagrees with the
    ///   reference table of its species.
    /// - `ModelError::YearCountMismatch` when the prey tables or the
    ///   off-season vector cover a different number of years than the
    ///   predator tables.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::{Array1, Array2};
    /// # use capelin_predation::consumption::core::data::{ConsumptionData, PredatorTables, PreyTables};
    /// let cod = Array2::<f64>::ones((4, 12));
    /// let predator = PredatorTables {
    ///     consumption: cod.clone(),
    ///     abundance: cod.clone(),
    ///     maturity: cod.clone() * 0.2,
    ///     subregion_immature: cod.clone() * 0.1,
    ///     weight: cod.clone(),
    ///     fishing_mortality: cod.clone() * 0.3,
    ///     natural_mortality: cod * 0.2,
    /// };
    /// let prey = PreyTables {
    ///     abundance: Array2::ones((4, 3)),
    ///     weight: Array2::ones((4, 3)),
    ///     off_season_mortality: Array1::from_elem(4, 0.1),
    /// };
    /// let data = ConsumptionData::new(predator, prey).unwrap();
    /// assert_eq!(data.n_years(), 4);
    /// ```
    pub fn new(predator: PredatorTables, prey: PreyTables) -> ModelResult<Self> {
        let reference = predator.consumption.dim();
        if reference.0 == 0 || reference.1 == 0 {
            return Err(ModelError::EmptyTable { table: "predator_consumption" });
        }
        for (table, values) in predator.named() {
            if values.dim() != reference {
                return Err(ModelError::TableShapeMismatch {
                    table,
                    expected: reference,
                    found: values.dim(),
                });
            }
        }

        let prey_reference = prey.abundance.dim();
        if prey_reference.0 == 0 || prey_reference.1 == 0 {
            return Err(ModelError::EmptyTable { table: "prey_abundance" });
        }
        if prey.weight.dim() != prey_reference {
            return Err(ModelError::TableShapeMismatch {
                table: "prey_weight",
                expected: prey_reference,
                found: prey.weight.dim(),
            });
        }
        if prey_reference.0 != reference.0 {
            return Err(ModelError::YearCountMismatch {
                table: "prey_abundance",
                expected: reference.0,
                found: prey_reference.0,
            });
        }
        if prey.off_season_mortality.len() != reference.0 {
            return Err(ModelError::YearCountMismatch {
                table: "prey_off_season_mortality",
                expected: reference.0,
                found: prey.off_season_mortality.len(),
            });
        }

        Ok(ConsumptionData { predator, prey })
    }

    /// Number of years shared by every table.
    pub fn n_years(&self) -> usize {
        self.predator.consumption.nrows()
    }

    /// Number of predator age classes.
    pub fn n_predator_ages(&self) -> usize {
        self.predator.consumption.ncols()
    }

    /// Number of prey age classes.
    pub fn n_prey_ages(&self) -> usize {
        self.prey.abundance.ncols()
    }
}
