use crate::models::SalesColumn;
use polars::prelude::*;

/// Sums `value` per distinct `key` and returns `(key, sum)` pairs in the
/// order given by `sort_by`.
///
/// The group-by output order is not stable, so callers always pass the full
/// set of sort keys they need, tie-breakers included.
pub fn sum_by(
    df: &DataFrame,
    key: SalesColumn,
    value: SalesColumn,
    sort_by: &[Expr],
    options: SortMultipleOptions,
) -> PolarsResult<Vec<(String, f64)>> {
    let grouped = df
        .clone()
        .lazy()
        .group_by([col(key.label())])
        .agg([col(value.label()).sum()])
        .sort_by_exprs(sort_by, options)
        .collect()?;

    let keys = grouped.column(key.label())?.str()?;
    let sums = grouped.column(value.label())?.f64()?;

    Ok(keys
        .into_iter()
        .zip(sums.into_iter())
        .filter_map(|(k, v)| Some((k?.to_string(), v?)))
        .collect())
}
