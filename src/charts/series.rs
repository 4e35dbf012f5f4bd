use crate::error::AnalyzerResult;
use crate::models::SalesColumn;
use crate::processor::grouping::sum_by;
use anyhow::Context;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

pub const AMOUNT_AXIS_TITLE: &str = "Suma Sprzedaży [PLN]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

/// Everything an external renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<ChartPoint>,
}

/// Total sale amount per calendar date, oldest first.
pub fn trend_series(df: &DataFrame) -> AnalyzerResult<Vec<(NaiveDate, f64)>> {
    // Dates are `YYYY-MM-DD` strings in the frame, so text order is chronological.
    let per_day = sum_by(
        df,
        SalesColumn::Date,
        SalesColumn::SaleAmount,
        &[col(SalesColumn::Date.label())],
        SortMultipleOptions::default(),
    )?;

    per_day
        .into_iter()
        .map(|(day, total)| -> AnalyzerResult<(NaiveDate, f64)> {
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .with_context(|| format!("invalid date key `{}` in sales frame", day))?;
            Ok((date, total))
        })
        .collect()
}

/// Total sale amount per category, largest first; equal totals by name.
pub fn category_series(df: &DataFrame) -> AnalyzerResult<Vec<(String, f64)>> {
    Ok(sum_by(
        df,
        SalesColumn::Category,
        SalesColumn::SaleAmount,
        &[
            col(SalesColumn::SaleAmount.label()),
            col(SalesColumn::Category.label()),
        ],
        SortMultipleOptions::default().with_order_descending_multi([true, false]),
    )?)
}

pub fn trend_chart(df: &DataFrame) -> AnalyzerResult<ChartSpec> {
    Ok(ChartSpec {
        kind: ChartKind::Line,
        title: "Trend Sprzedaży w Czasie".to_string(),
        x_title: "Data".to_string(),
        y_title: AMOUNT_AXIS_TITLE.to_string(),
        points: trend_series(df)?
            .into_iter()
            .map(|(date, y)| ChartPoint {
                x: date.format("%Y-%m-%d").to_string(),
                y,
            })
            .collect(),
    })
}

pub fn category_chart(df: &DataFrame) -> AnalyzerResult<ChartSpec> {
    Ok(ChartSpec {
        kind: ChartKind::Bar,
        title: "Suma Sprzedaży wg Kategorii".to_string(),
        x_title: "Kategoria Produktu".to_string(),
        y_title: AMOUNT_AXIS_TITLE.to_string(),
        points: category_series(df)?
            .into_iter()
            .map(|(x, y)| ChartPoint { x, y })
            .collect(),
    })
}
