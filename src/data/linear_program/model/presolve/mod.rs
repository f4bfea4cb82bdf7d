//! # Presolving linear programs
//!
//! A `Model` can be presolved by building an index, repeatedly applying reduction rules until no
//! rule applies anymore, and building a smaller model from what remains. Every reduction is logged
//! such that a solution of the smaller model can be mapped back onto the original one, see the
//! `postsolve` module.
use enum_map::EnumMap;
use log::debug;
use thiserror::Error;

use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::model::{Model, ModelError};
use crate::data::linear_program::model::presolve::counters::Counters;
use crate::data::linear_program::model::presolve::queues::Queues;

mod counters;
mod queues;
mod rule;


/// Reasons presolve can't start or can't finish.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresolveError {
    /// No model was provided.
    #[error("no model to presolve")]
    NullModel,
    /// The reduced model could not be built.
    #[error("reduced model is invalid: {0}")]
    Model(#[from] ModelError),
}

/// Result of presolving.
#[derive(Clone, Debug, PartialEq)]
pub enum PresolveStatus {
    /// No rule applied, the model should be solved as it is.
    NotReduced,
    /// A smaller model remains.
    Reduced,
    /// All rows and columns were removed.
    ReducedToEmpty,
    /// The model has no feasible solution.
    Infeasible,
    /// The model is unbounded, provided that it is feasible.
    Unbounded,
    /// The reductions went wrong, the model should be solved without presolve.
    Error(PresolveError),
}

/// Bound of a column that was tightened by a singleton row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundTightening {
    /// Value of the bound before the row was removed.
    pub previous: f64,
    /// Value implied by the row.
    pub implied: f64,
}

/// A single reduction, in terms of the indices of the original model.
#[derive(Clone, Debug, PartialEq)]
pub enum Reduction {
    /// A column with equal bounds was substituted into the rows.
    FixedColumn {
        /// Index of the column in the original model.
        column: usize,
        /// Value the column is fixed at.
        value: f64,
        /// Cost in the direction of optimization of the model.
        cost: f64,
        /// Entries in rows that were still present when the column was removed.
        entries: Vec<SparseTuple<f64>>,
    },
    /// A row without any entries was removed.
    EmptyRow {
        /// Index of the row in the original model.
        row: usize,
    },
    /// A row with a single entry was turned into bounds on its column.
    SingletonRow {
        /// Index of the row in the original model.
        row: usize,
        /// Index of the only column with an entry in the row.
        column: usize,
        /// Value of that entry.
        coefficient: f64,
        /// Lower bound of the row at the moment it was removed.
        lower: f64,
        /// Upper bound of the row at the moment it was removed.
        upper: f64,
        /// Column bounds that this row tightened.
        tightened: EnumMap<BoundDirection, Option<BoundTightening>>,
    },
    /// A column without any entries was set to its best bound.
    EmptyColumn {
        /// Index of the column in the original model.
        column: usize,
        /// Value the column is set to.
        value: f64,
        /// Cost in the direction of optimization of the model.
        cost: f64,
        /// Bound the value is at, `None` for a free column at zero.
        bound: Option<BoundDirection>,
    },
}

/// Everything needed to solve the reduced model and to map its solution back.
#[derive(Clone, Debug, PartialEq)]
pub struct PresolveInfo {
    /// How presolve ended.
    pub status: PresolveStatus,
    reduced: Option<Model>,
    reductions: Vec<Reduction>,
    /// For each reduced column, its index in the original model.
    column_map: Vec<usize>,
    /// For each reduced row, its index in the original model.
    row_map: Vec<usize>,
    nr_columns: usize,
    nr_rows: usize,
    tolerance: f64,
}

impl PresolveInfo {
    fn terminated(status: PresolveStatus, nr_columns: usize, nr_rows: usize, tolerance: f64) -> Self {
        Self {
            status,
            reduced: None,
            reductions: Vec::new(),
            column_map: Vec::new(),
            row_map: Vec::new(),
            nr_columns,
            nr_rows,
            tolerance,
        }
    }

    /// The reduced model, if presolve reduced anything.
    pub fn reduced_model(&self) -> Option<&Model> {
        self.reduced.as_ref()
    }
    /// Applied reductions, in order of application.
    pub fn reductions(&self) -> &[Reduction] {
        &self.reductions
    }
    /// Original index of each column of the reduced model.
    pub fn column_map(&self) -> &[usize] {
        &self.column_map
    }
    /// Original index of each row of the reduced model.
    pub fn row_map(&self) -> &[usize] {
        &self.row_map
    }
    /// Number of columns and rows of the original model.
    pub fn original_dimensions(&self) -> (usize, usize) {
        (self.nr_columns, self.nr_rows)
    }
    /// Number of columns and rows of the reduced model.
    pub fn reduced_dimensions(&self) -> (usize, usize) {
        match &self.reduced {
            Some(model) => (model.nr_columns(), model.nr_rows()),
            None => (self.nr_columns, self.nr_rows),
        }
    }
    /// Tolerance used to compare values with bounds.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Presolve a model.
///
/// # Arguments
///
/// * `model`: Model to reduce.
/// * `tolerance`: Primal feasibility tolerance, used to decide whether bounds are equal or
/// inconsistent.
///
/// # Return value
///
/// The status, and when the model was reduced, the reduced model and the log of reductions.
pub fn presolve(model: Option<&Model>, tolerance: f64) -> PresolveInfo {
    let Some(model) = model else {
        return PresolveInfo::terminated(PresolveStatus::Error(PresolveError::NullModel), 0, 0, tolerance);
    };

    let mut index = match Index::new(model, tolerance) {
        Ok(index) => index,
        Err(status) => {
            debug!("Presolve found the model {:?} before applying any rules", status);
            return PresolveInfo::terminated(status, model.nr_columns(), model.nr_rows(), tolerance);
        },
    };

    loop {
        match index.presolve_step() {
            Ok(true) => {},
            Ok(false) => break,
            Err(status) => {
                debug!("Presolve found the model {:?} after {} reductions", status, index.reductions.len());
                return PresolveInfo::terminated(status, model.nr_columns(), model.nr_rows(), tolerance);
            },
        }
    }

    index.finish()
}

/// Container data structure to keep track of presolve status.
///
/// Queues are used to determine which rules still have to be applied to which row or column.
/// Counters of the entries that remain in each row and column indicate when which rules can be
/// applied. The bounds are the current bounds, which change as rules are applied.
///
/// All indices are relative to the original model.
pub(super) struct Index<'a> {
    /// Which rule should still be applied to which row or column.
    queues: Queues,
    /// Remaining entries per row and column.
    counters: Counters<'a>,

    column_lower: Vec<f64>,
    column_upper: Vec<f64>,
    row_lower: Vec<f64>,
    row_upper: Vec<f64>,
    /// Constant of the objective, including the cost of the removed columns.
    offset: f64,

    reductions: Vec<Reduction>,
    tolerance: f64,
    model: &'a Model,
}

impl<'a> Index<'a> {
    /// Create a new instance.
    ///
    /// This operation creates a row major copy of the constraint matrix.
    ///
    /// # Return value
    ///
    /// `Err` with the `Infeasible` status if a column or row has inconsistent bounds.
    fn new(model: &'a Model, tolerance: f64) -> Result<Self, PresolveStatus> {
        let inconsistent = |lower: &[f64], upper: &[f64]| {
            lower.iter().zip(upper).any(|(&lower, &upper)| lower > upper + tolerance)
        };
        if inconsistent(model.column_lower(), model.column_upper())
            || inconsistent(model.row_lower(), model.row_upper()) {
            return Err(PresolveStatus::Infeasible);
        }

        let counters = Counters::new(model);
        let queues = Queues::new(&counters, model.column_lower(), model.column_upper(), tolerance);

        Ok(Self {
            queues,
            counters,

            column_lower: model.column_lower().to_vec(),
            column_upper: model.column_upper().to_vec(),
            row_lower: model.row_lower().to_vec(),
            row_upper: model.row_upper().to_vec(),
            offset: model.offset(),

            reductions: Vec::new(),
            tolerance,
            model,
        })
    }

    /// Apply a single presolve rule.
    ///
    /// The following rules are applied, in order of priority:
    ///
    /// 1. Substitute fixed column
    /// 2. Turn a singleton row into column bounds
    /// 3. Remove an empty row
    /// 4. Remove an empty column
    ///
    /// TODO(ENHANCEMENT): Doubleton equations and dominated columns.
    ///
    /// # Return value
    ///
    /// `Ok` indicating whether a rule was applied, `Err` if the model was found to be infeasible or
    /// unbounded.
    fn presolve_step(&mut self) -> Result<bool, PresolveStatus> {
        while let Some(column) = self.queues.fixed_column.pop() {
            if self.counters.is_column_active[column] {
                self.presolve_fixed_column(column);
                return Ok(true);
            }
        }
        while let Some(row) = self.queues.singleton_row.pop() {
            if self.counters.is_row_active[row] && self.counters.row[row] == 1 {
                return self.presolve_singleton_row(row).map(|()| true);
            }
        }
        while let Some(row) = self.queues.empty_row.pop() {
            if self.counters.is_row_active[row] && self.counters.row[row] == 0 {
                return self.presolve_empty_row(row).map(|()| true);
            }
        }
        while let Some(column) = self.queues.empty_column.pop() {
            if self.counters.is_column_active[column] && self.counters.column[column] == 0 {
                return self.presolve_empty_column(column).map(|()| true);
            }
        }

        Ok(false)
    }

    /// Whether the bounds of a column are equal within the tolerance.
    fn is_column_fixed(&self, column: usize) -> bool {
        self.column_upper[column] - self.column_lower[column] <= self.tolerance
    }

    /// Queue a row for the rule that matches its number of remaining entries.
    fn queue_row_by_counter(&mut self, row: usize) {
        match self.counters.row[row] {
            0 => self.queues.empty_row.push(row),
            1 => self.queues.singleton_row.push(row),
            _ => {},
        }
    }

    /// Queue a column for the empty column rule if no entries remain.
    fn queue_column_by_counter(&mut self, column: usize) {
        if self.counters.column[column] == 0 && !self.is_column_fixed(column) {
            self.queues.empty_column.push(column);
        }
    }

    /// Remove a column, updating the counters of the rows it appears in.
    fn remove_column(&mut self, column: usize) {
        let rows = self.counters.iter_active_column(column).map(|(i, _)| i).collect::<Vec<_>>();
        for row in rows {
            self.counters.row[row] -= 1;
            self.queue_row_by_counter(row);
        }
        self.counters.column[column] = 0;
        self.counters.is_column_active[column] = false;
    }

    /// Remove a row, updating the counters of the columns that appear in it.
    fn remove_row(&mut self, row: usize) {
        let columns = self.counters.iter_active_row(row).map(|(j, _)| j).collect::<Vec<_>>();
        for column in columns {
            self.counters.column[column] -= 1;
            self.queue_column_by_counter(column);
        }
        self.counters.row[row] = 0;
        self.counters.is_row_active[row] = false;
    }

    /// Build the reduced model from the rows and columns that remain.
    fn finish(self) -> PresolveInfo {
        let nr_columns = self.model.nr_columns();
        let nr_rows = self.model.nr_rows();

        if self.reductions.is_empty() {
            return PresolveInfo {
                status: PresolveStatus::NotReduced,
                reduced: None,
                reductions: Vec::new(),
                column_map: (0..nr_columns).collect(),
                row_map: (0..nr_rows).collect(),
                nr_columns,
                nr_rows,
                tolerance: self.tolerance,
            };
        }

        let column_map = (0..nr_columns).filter(|&j| self.counters.is_column_active[j]).collect::<Vec<_>>();
        let row_map = (0..nr_rows).filter(|&i| self.counters.is_row_active[i]).collect::<Vec<_>>();
        let mut new_row_index = vec![None; nr_rows];
        for (new, &old) in row_map.iter().enumerate() {
            new_row_index[old] = Some(new);
        }

        let select = |values: &[f64], map: &[usize]| map.iter().map(|&k| values[k]).collect::<Vec<_>>();
        let reduced = if column_map.is_empty() && row_map.is_empty() {
            Model::empty(self.model.objective(), 0_f64).with_offset(self.offset)
        } else {
            Model::new(
                self.model.objective(),
                select(self.model.cost(), &column_map),
                self.model.matrix().select(&column_map, &new_row_index, row_map.len()),
                select(&self.column_lower, &column_map),
                select(&self.column_upper, &column_map),
                select(&self.row_lower, &row_map),
                select(&self.row_upper, &row_map),
            ).and_then(|model| model.with_offset(self.offset))
        };

        let reduced = match reduced {
            Ok(model) => model,
            Err(error) => {
                return PresolveInfo::terminated(
                    PresolveStatus::Error(error.into()), nr_columns, nr_rows, self.tolerance,
                );
            },
        };

        let status = if column_map.is_empty() && row_map.is_empty() {
            PresolveStatus::ReducedToEmpty
        } else {
            PresolveStatus::Reduced
        };
        debug!(
            "Presolve removed {} of {} columns and {} of {} rows with {} reductions",
            nr_columns - column_map.len(), nr_columns, nr_rows - row_map.len(), nr_rows,
            self.reductions.len(),
        );

        PresolveInfo {
            status,
            reduced: Some(reduced),
            reductions: self.reductions,
            column_map,
            row_map,
            nr_columns,
            nr_rows,
            tolerance: self.tolerance,
        }
    }
}
