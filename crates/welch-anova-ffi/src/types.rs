//! C-compatible types for FFI boundary

use libc::c_char;
use welch_anova_core::{DegeneracyPolicy, NanPolicy, WelchAnovaOptions, WelchFormula};

/// Error codes for FFI boundary
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    InvalidInput = 1,
    InsufficientGroups = 2,
    InvalidColumn = 3,
    NonNumericData = 4,
    DimensionMismatch = 5,
    MissingValue = 6,
    InternalError = 99,
}

/// Error information for FFI
#[repr(C)]
pub struct WelchAnovaError {
    pub code: ErrorCode,
    pub message: [c_char; 256],
}

impl WelchAnovaError {
    pub fn success() -> Self {
        Self {
            code: ErrorCode::Success,
            message: [0; 256],
        }
    }

    pub fn set(&mut self, code: ErrorCode, msg: &str) {
        self.code = code;
        let bytes = msg.as_bytes();
        let len = bytes.len().min(255);
        for (i, &b) in bytes[..len].iter().enumerate() {
            self.message[i] = b as c_char;
        }
        self.message[len] = 0;
    }
}

/// Array of f64 values with validity mask for NULL handling
#[repr(C)]
pub struct DataArray {
    /// Pointer to data values
    pub data: *const f64,
    /// Validity bitmask: bit i is 1 if data[i] is valid, 0 if NULL
    /// Can be NULL if all values are valid
    pub validity: *const u8,
    /// Number of elements
    pub len: usize,
}

impl DataArray {
    /// Check if index i is valid (not NULL)
    ///
    /// # Safety
    /// Caller must ensure index is within bounds
    pub unsafe fn is_valid(&self, i: usize) -> bool {
        if self.validity.is_null() {
            return true;
        }
        let byte_idx = i / 8;
        let bit_idx = i % 8;
        ((*self.validity.add(byte_idx)) >> bit_idx) & 1 == 1
    }

    /// Convert to Vec<Option<f64>>, NULL entries become None
    ///
    /// # Safety
    /// Caller must ensure pointers are valid and len is correct
    pub unsafe fn to_options(&self) -> Vec<Option<f64>> {
        if self.data.is_null() {
            return Vec::new();
        }
        (0..self.len)
            .map(|i| self.is_valid(i).then(|| *self.data.add(i)))
            .collect()
    }
}

/// Degeneracy policy for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneracyPolicyFFI {
    #[default]
    Substitute = 0,
    WarnAndSubstitute = 1,
    Exclude = 2,
}

impl From<DegeneracyPolicyFFI> for DegeneracyPolicy {
    fn from(p: DegeneracyPolicyFFI) -> Self {
        match p {
            DegeneracyPolicyFFI::Substitute => DegeneracyPolicy::Substitute,
            DegeneracyPolicyFFI::WarnAndSubstitute => DegeneracyPolicy::WarnAndSubstitute,
            DegeneracyPolicyFFI::Exclude => DegeneracyPolicy::Exclude,
        }
    }
}

/// F/df2 formula for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WelchFormulaFFI {
    #[default]
    Simplified = 0,
    Standard = 1,
}

impl From<WelchFormulaFFI> for WelchFormula {
    fn from(f: WelchFormulaFFI) -> Self {
        match f {
            WelchFormulaFFI::Simplified => WelchFormula::Simplified,
            WelchFormulaFFI::Standard => WelchFormula::Standard,
        }
    }
}

/// Options for Welch's ANOVA (FFI)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WelchAnovaOptionsFFI {
    pub degeneracy: DegeneracyPolicyFFI,
    /// Variance substituted for degenerate groups
    pub variance_floor: f64,
    pub formula: WelchFormulaFFI,
    /// Fail on NULL/NaN values instead of skipping them
    pub error_on_nan: bool,
}

impl Default for WelchAnovaOptionsFFI {
    fn default() -> Self {
        let opts = WelchAnovaOptions::default();
        Self {
            degeneracy: DegeneracyPolicyFFI::Substitute,
            variance_floor: opts.variance_floor,
            formula: WelchFormulaFFI::Simplified,
            error_on_nan: false,
        }
    }
}

impl From<WelchAnovaOptionsFFI> for WelchAnovaOptions {
    fn from(o: WelchAnovaOptionsFFI) -> Self {
        Self {
            degeneracy: o.degeneracy.into(),
            variance_floor: o.variance_floor,
            formula: o.formula.into(),
            nan_policy: if o.error_on_nan {
                NanPolicy::ErrorOnNaN
            } else {
                NanPolicy::DropNaN
            },
        }
    }
}

/// Welch ANOVA result for FFI
#[repr(C)]
pub struct WelchAnovaResultFFI {
    /// F statistic
    pub f_statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Numerator degrees of freedom
    pub ddof1: usize,
    /// Denominator degrees of freedom (may be +inf)
    pub ddof2: f64,
    /// Number of groups
    pub n_groups: usize,
    /// Total sample size
    pub n: usize,
    /// Number of groups with n <= 1 or zero variance
    pub n_degenerate: usize,
    /// Test method (must be freed)
    pub method: *mut c_char,
}

impl Default for WelchAnovaResultFFI {
    fn default() -> Self {
        Self {
            f_statistic: f64::NAN,
            p_value: f64::NAN,
            ddof1: 0,
            ddof2: f64::NAN,
            n_groups: 0,
            n: 0,
            n_degenerate: 0,
            method: std::ptr::null_mut(),
        }
    }
}
