use std::fmt;

/// Errors raised while building or validating a numeric table
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// The table has no rows or no columns
    Empty,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Parameter values must be finite and inside [0, 1]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: f64,
    },
    DuplicateName(String),
    TooFewColumns {
        required: usize,
        found: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Empty => write!(f, "table is empty"),
            TableError::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} values, expected {expected}"),
            TableError::ValueOutOfRange { row, col, value } => {
                write!(f, "value {value} at row {row}, column {col} is outside [0, 1]")
            }
            TableError::DuplicateName(name) => write!(f, "duplicate column name '{name}'"),
            TableError::TooFewColumns { required, found } => {
                write!(f, "table has {found} columns, at least {required} required")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Errors raised while reading a parameter file
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    /// The file content does not follow the expected layout
    Format(String),
    Table(TableError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "i/o error: {e}"),
            LoadError::Format(msg) => write!(f, "malformed array file: {msg}"),
            LoadError::Table(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Table(e) => Some(e),
            LoadError::Format(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<TableError> for LoadError {
    fn from(err: TableError) -> Self {
        LoadError::Table(err)
    }
}

/// Errors raised by the k-medoids procedure
#[derive(Debug, Clone, PartialEq)]
pub enum ClusteringError {
    EmptyInput,
    InvalidClusterCount { requested: usize, samples: usize },
    InvalidSettings(&'static str),
}

impl fmt::Display for ClusteringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusteringError::EmptyInput => write!(f, "distance matrix is empty"),
            ClusteringError::InvalidClusterCount { requested, samples } => write!(
                f,
                "cannot form {requested} clusters from {samples} samples"
            ),
            ClusteringError::InvalidSettings(reason) => {
                write!(f, "invalid clustering settings: {reason}")
            }
        }
    }
}

impl std::error::Error for ClusteringError {}

/// Errors raised while computing sensitivities
#[derive(Debug, Clone, PartialEq)]
pub enum SensitivityError {
    LabelCountMismatch { labels: usize, samples: usize },
    LabelOutOfRange { sample: usize, label: usize },
    EmptyCluster(usize),
    InvalidSettings(&'static str),
}

impl fmt::Display for SensitivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityError::LabelCountMismatch { labels, samples } => {
                write!(f, "{labels} cluster labels given for {samples} samples")
            }
            SensitivityError::LabelOutOfRange { sample, label } => {
                write!(f, "sample {sample} has unknown cluster label {label}")
            }
            SensitivityError::EmptyCluster(c) => write!(f, "cluster {c} has no members"),
            SensitivityError::InvalidSettings(reason) => {
                write!(f, "invalid sensitivity settings: {reason}")
            }
        }
    }
}

impl std::error::Error for SensitivityError {}

/// Errors from the end-to-end analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Configuration error
    Config(String),
    Table(TableError),
    Clustering(ClusteringError),
    Sensitivity(SensitivityError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(msg) => write!(f, "configuration error: {msg}"),
            AnalysisError::Table(e) => write!(f, "{e}"),
            AnalysisError::Clustering(e) => write!(f, "{e}"),
            AnalysisError::Sensitivity(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Table(e) => Some(e),
            AnalysisError::Clustering(e) => Some(e),
            AnalysisError::Sensitivity(e) => Some(e),
            AnalysisError::Config(_) => None,
        }
    }
}

impl From<TableError> for AnalysisError {
    fn from(err: TableError) -> Self {
        AnalysisError::Table(err)
    }
}

impl From<ClusteringError> for AnalysisError {
    fn from(err: ClusteringError) -> Self {
        AnalysisError::Clustering(err)
    }
}

impl From<SensitivityError> for AnalysisError {
    fn from(err: SensitivityError) -> Self {
        AnalysisError::Sensitivity(err)
    }
}
