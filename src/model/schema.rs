use sha2::{Digest, Sha256};

/// Column contract shared by the feature normalizer and the exported model
/// artifacts.
///
/// The fitted preprocessing stage was trained against exactly these column
/// names in exactly this order. The contract is versioned together with the
/// artifacts and checked when they are loaded, never re-derived at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    /// Version bumped whenever the column contract changes.
    pub version: u32,
    /// One-hot encoded columns, in transform order.
    pub categorical: &'static [&'static str],
    /// Standardized numeric columns, in transform order (after categoricals).
    pub numeric: &'static [&'static str],
}

/// Schema the bundled artifacts were exported with.
pub const FEATURE_SCHEMA: FeatureSchema = FeatureSchema {
    version: 1,
    categorical: &["MaritalStatus", "EmploymentStatus", "AgeGroup"],
    numeric: &["CreditScore", "AnnualIncome", "NetWorth"],
};

impl FeatureSchema {
    /// Canonical text form the fingerprint is computed over.
    ///
    /// Format: `v<version>|cat:<c1>,<c2>,...|num:<n1>,<n2>,...`
    pub fn canonical(&self) -> String {
        format!(
            "v{}|cat:{}|num:{}",
            self.version,
            self.categorical.join(","),
            self.numeric.join(",")
        )
    }

    /// Lower-hex SHA-256 of [`FeatureSchema::canonical`].
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// All columns in transform order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categorical.iter().chain(self.numeric.iter()).copied()
    }
}
