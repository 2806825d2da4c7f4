//! Parquet file parser

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float16Array, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType as ArrowType, TimeUnit};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::Config;
use crate::model::{CellType, CellValue, Column, Table};

use super::Parser;

/// Parser for Parquet files. Column kinds come from the Arrow schema.
pub struct ParquetParser;

impl Parser for ParquetParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open Parquet file: {}", path.display()))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .context("Failed to create Parquet reader")?;

        let schema = builder.schema().clone();
        let reader = builder.build().context("Failed to build Parquet reader")?;

        let columns: Vec<Column> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                Column::with_type(field.name().clone(), i, arrow_type_to_cell_type(field.data_type()))
            })
            .collect();

        let mut table = Table::new(columns);

        let mut line_num = 1usize;
        for batch_result in reader {
            let batch = batch_result.context("Failed to read Parquet batch")?;

            for row_idx in 0..batch.num_rows() {
                line_num += 1;
                let cells = batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell_value(col, row_idx))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("Failed to decode Parquet row {}", line_num - 1))?;

                table.add_row(cells, line_num);
            }
        }

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "parquet" | "pq")
    }
}

fn arrow_type_to_cell_type(arrow_type: &ArrowType) -> CellType {
    match arrow_type {
        ArrowType::Null => CellType::Null,
        ArrowType::Boolean => CellType::Bool,
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32 => CellType::Int,
        // Values past i64::MAX are carried as floats
        ArrowType::UInt64 => CellType::Float,
        ArrowType::Float16 | ArrowType::Float32 | ArrowType::Float64 => CellType::Float,
        ArrowType::Date32 | ArrowType::Date64 => CellType::Date,
        ArrowType::Timestamp(_, _) => CellType::DateTime,
        // Text, and anything else rendered through Arrow's formatter
        _ => CellType::String,
    }
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("Unexpected array layout for {}", array.data_type()))
}

fn extract_cell_value(array: &ArrayRef, row_idx: usize) -> Result<CellValue> {
    if array.is_null(row_idx) {
        return Ok(CellValue::Null);
    }

    let value = match array.data_type() {
        ArrowType::Null => CellValue::Null,
        ArrowType::Boolean => CellValue::Bool(downcast::<BooleanArray>(array)?.value(row_idx)),
        ArrowType::Int8 => CellValue::Int(downcast::<Int8Array>(array)?.value(row_idx) as i64),
        ArrowType::Int16 => CellValue::Int(downcast::<Int16Array>(array)?.value(row_idx) as i64),
        ArrowType::Int32 => CellValue::Int(downcast::<Int32Array>(array)?.value(row_idx) as i64),
        ArrowType::Int64 => CellValue::Int(downcast::<Int64Array>(array)?.value(row_idx)),
        ArrowType::UInt8 => CellValue::Int(downcast::<UInt8Array>(array)?.value(row_idx) as i64),
        ArrowType::UInt16 => CellValue::Int(downcast::<UInt16Array>(array)?.value(row_idx) as i64),
        ArrowType::UInt32 => CellValue::Int(downcast::<UInt32Array>(array)?.value(row_idx) as i64),
        ArrowType::UInt64 => {
            let v = downcast::<UInt64Array>(array)?.value(row_idx);
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int)
        }
        ArrowType::Float16 => {
            CellValue::Float(downcast::<Float16Array>(array)?.value(row_idx).to_f64())
        }
        ArrowType::Float32 => {
            CellValue::Float(downcast::<Float32Array>(array)?.value(row_idx) as f64)
        }
        ArrowType::Float64 => CellValue::Float(downcast::<Float64Array>(array)?.value(row_idx)),
        ArrowType::Utf8 => CellValue::String(Cow::Owned(
            downcast::<StringArray>(array)?.value(row_idx).to_string(),
        )),
        ArrowType::LargeUtf8 => CellValue::String(Cow::Owned(
            downcast::<LargeStringArray>(array)?.value(row_idx).to_string(),
        )),
        ArrowType::Date32 => {
            let days = downcast::<Date32Array>(array)?.value(row_idx);
            // 719163 days between 0001-01-01 and the Unix epoch
            NaiveDate::from_num_days_from_ce_opt(days + 719_163)
                .map(CellValue::Date)
                .unwrap_or(CellValue::Null)
        }
        ArrowType::Date64 => {
            let millis = downcast::<Date64Array>(array)?.value(row_idx);
            DateTime::from_timestamp_millis(millis)
                .map(|dt| CellValue::Date(dt.date_naive()))
                .unwrap_or(CellValue::Null)
        }
        ArrowType::Timestamp(unit, _) => {
            let dt = match unit {
                TimeUnit::Second => {
                    DateTime::from_timestamp(downcast::<TimestampSecondArray>(array)?.value(row_idx), 0)
                }
                TimeUnit::Millisecond => DateTime::from_timestamp_millis(
                    downcast::<TimestampMillisecondArray>(array)?.value(row_idx),
                ),
                TimeUnit::Microsecond => DateTime::from_timestamp_micros(
                    downcast::<TimestampMicrosecondArray>(array)?.value(row_idx),
                ),
                TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(
                    downcast::<TimestampNanosecondArray>(array)?.value(row_idx),
                )),
            };
            dt.map(|dt| CellValue::DateTime(dt.naive_utc()))
                .unwrap_or(CellValue::Null)
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())
                .context("Failed to format Parquet value")?;
            CellValue::String(Cow::Owned(formatter.value(row_idx).to_string()))
        }
    };

    Ok(value)
}
