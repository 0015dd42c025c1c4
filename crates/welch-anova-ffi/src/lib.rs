//! C FFI boundary for welch-anova-core
//!
//! This crate provides C-compatible functions so a host application (for example
//! a database extension) can run Welch's ANOVA over a value array and a group-code array.

mod types;

pub use types::*;

use libc::c_char;
use welch_anova_core::{welch_anova as core_welch_anova, Dataset, StatsError, WelchAnovaOptions};

const VALUES_COLUMN: &str = "values";
const GROUPS_COLUMN: &str = "groups";

/// Convert StatsError to ErrorCode
fn error_to_code(err: &StatsError) -> ErrorCode {
    match err {
        StatsError::InsufficientGroups { .. } => ErrorCode::InsufficientGroups,
        StatsError::InvalidColumn { .. } => ErrorCode::InvalidColumn,
        StatsError::NonNumericData { .. } => ErrorCode::NonNumericData,
        StatsError::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
        StatsError::MissingValue { .. } => ErrorCode::MissingValue,
        StatsError::InvalidValue { .. } | StatsError::InvalidInput(_) => ErrorCode::InvalidInput,
    }
}

/// Convert float group codes to integer labels; NULL/NaN codes become missing
fn group_codes(codes: &[Option<f64>]) -> Result<Vec<Option<i64>>, StatsError> {
    codes
        .iter()
        .enumerate()
        .map(|(row, code)| match code.filter(|g| !g.is_nan()) {
            None => Ok(None),
            Some(g) if g.is_finite() && g.fract() == 0.0 => Ok(Some(g as i64)),
            Some(g) => Err(StatsError::InvalidValue {
                field: "group code",
                message: format!("row {row}: {g} is not an integer"),
            }),
        })
        .collect()
}

/// Helper to allocate and copy a string
unsafe fn alloc_string(s: &str) -> *mut c_char {
    let len = s.len() + 1;
    let ptr = libc::malloc(len) as *mut c_char;
    if !ptr.is_null() {
        std::ptr::copy_nonoverlapping(s.as_ptr(), ptr as *mut u8, s.len());
        *ptr.add(s.len()) = 0;
    }
    ptr
}

/// Welch's one-way ANOVA
///
/// `groups` holds integer-valued group codes; a code with a fractional part
/// fails with `InvalidInput`. Rows where either array is NULL or NaN are
/// skipped (a missing value is rejected when `options.error_on_nan` is set).
///
/// # Safety
/// - `values` and `groups` must be valid DataArrays
/// - `out_result` must be a valid pointer
/// - `out_error` must be a valid pointer
///
/// # Returns
/// `true` on success, `false` on error (check `out_error` for details)
#[no_mangle]
pub unsafe extern "C" fn welch_anova(
    values: DataArray,
    groups: DataArray,
    options: WelchAnovaOptionsFFI,
    out_result: *mut WelchAnovaResultFFI,
    out_error: *mut WelchAnovaError,
) -> bool {
    if !out_error.is_null() {
        *out_error = WelchAnovaError::success();
    }

    if out_result.is_null() {
        if !out_error.is_null() {
            (*out_error).set(ErrorCode::InvalidInput, "out_result is NULL");
        }
        return false;
    }

    let values_vec = values.to_options();
    let groups_vec = groups.to_options();
    let opts: WelchAnovaOptions = options.into();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let data = Dataset::new()
            .with_column(GROUPS_COLUMN, group_codes(&groups_vec)?)?
            .with_column(VALUES_COLUMN, values_vec)?;
        core_welch_anova(&data, VALUES_COLUMN, GROUPS_COLUMN, &opts)
    }));

    let result = match result {
        Ok(r) => r,
        Err(_) => {
            if !out_error.is_null() {
                (*out_error).set(ErrorCode::InternalError, "Internal panic in Welch ANOVA");
            }
            return false;
        }
    };

    match result {
        Ok(r) => {
            (*out_result) = WelchAnovaResultFFI {
                f_statistic: r.f_statistic,
                p_value: r.p_value,
                ddof1: r.ddof1,
                ddof2: r.ddof2,
                n_groups: r.n_groups,
                n: r.n,
                n_degenerate: r.degenerate_groups.len(),
                method: alloc_string(&r.method),
            };
            true
        }
        Err(e) => {
            log::debug!("welch_anova failed: {e}");
            if !out_error.is_null() {
                (*out_error).set(error_to_code(&e), &e.to_string());
            }
            false
        }
    }
}

/// Free memory allocated by `welch_anova`
///
/// # Safety
/// - `result` must be NULL or a valid pointer to a WelchAnovaResultFFI
#[no_mangle]
pub unsafe extern "C" fn welch_anova_free_result(result: *mut WelchAnovaResultFFI) {
    if result.is_null() {
        return;
    }
    if !(*result).method.is_null() {
        libc::free((*result).method as *mut libc::c_void);
        (*result).method = std::ptr::null_mut();
    }
}
