use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Education, EmployeeRecord, EmployeeTable, RecordError, YesNo};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an employee table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the HR column names (extra columns ignored)
/// * `.json`    – `[{ "Age": 41, "Attrition": "Yes", ... }, ...]`
/// * `.parquet` – one column per field, text or integer typed
pub fn load_file(path: &Path) -> Result<EmployeeTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV with a header row. Columns are matched by name, so their order
/// and any additional columns in the export do not matter.
pub fn read_csv<R: Read>(source: R) -> Result<EmployeeTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<EmployeeRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(EmployeeTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<EmployeeTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<EmployeeTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let JsonValue::Array(rows) = root else {
        bail!("Expected top-level JSON array");
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            serde_json::from_value::<EmployeeRecord>(row).with_context(|| format!("JSON row {i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EmployeeTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns carry the HR field names.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns any integer
/// width. Works with files written by both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<EmployeeTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = BatchColumns::from_batch(&batch)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let record = columns
                .record(row)
                .with_context(|| format!("Parquet row {row_no}"))?;
            records.push(record);
        }
    }

    Ok(EmployeeTable::from_records(records))
}

/// The nine HR columns of one record batch, normalised to Utf8 / Int64.
struct BatchColumns {
    age: Int64Array,
    attrition: StringArray,
    department: StringArray,
    education: Int64Array,
    education_field: StringArray,
    gender: StringArray,
    job_role: StringArray,
    over_time: StringArray,
    total_working_years: Int64Array,
}

impl BatchColumns {
    fn from_batch(batch: &RecordBatch) -> Result<Self> {
        Ok(BatchColumns {
            age: int_column(batch, "Age")?,
            attrition: text_column(batch, "Attrition")?,
            department: text_column(batch, "Department")?,
            education: int_column(batch, "Education")?,
            education_field: text_column(batch, "EducationField")?,
            gender: text_column(batch, "Gender")?,
            job_role: text_column(batch, "JobRole")?,
            over_time: text_column(batch, "OverTime")?,
            total_working_years: int_column(batch, "TotalWorkingYears")?,
        })
    }

    fn record(&self, row: usize) -> Result<EmployeeRecord, RecordError> {
        Ok(EmployeeRecord {
            age: count_at(&self.age, row, "Age")?,
            attrition: text_at(&self.attrition, row, "Attrition")?.parse::<YesNo>()?,
            department: text_at(&self.department, row, "Department")?,
            education: Education::try_from(int_at(&self.education, row, "Education")?)?,
            education_field: text_at(&self.education_field, row, "EducationField")?,
            gender: text_at(&self.gender, row, "Gender")?,
            job_role: text_at(&self.job_role, row, "JobRole")?,
            over_time: text_at(&self.over_time, row, "OverTime")?.parse::<YesNo>()?,
            total_working_years: count_at(&self.total_working_years, row, "TotalWorkingYears")?,
        })
    }
}

// -- Parquet / Arrow helpers --

fn text_column(batch: &RecordBatch, name: &'static str) -> Result<StringArray> {
    let col = batch
        .column_by_name(name)
        .ok_or(RecordError::MissingColumn(name))?;
    let utf8 = arrow::compute::cast(col, &DataType::Utf8)
        .with_context(|| format!("column '{name}' is not text"))?;
    Ok(utf8.as_string::<i32>().clone())
}

fn int_column(batch: &RecordBatch, name: &'static str) -> Result<Int64Array> {
    let col = batch
        .column_by_name(name)
        .ok_or(RecordError::MissingColumn(name))?;
    let ints = arrow::compute::cast(col, &DataType::Int64)
        .with_context(|| format!("column '{name}' is not an integer column"))?;
    Ok(ints.as_primitive::<Int64Type>().clone())
}

fn text_at(arr: &StringArray, row: usize, column: &'static str) -> Result<String, RecordError> {
    if arr.is_null(row) {
        return Err(RecordError::NullValue { column });
    }
    Ok(arr.value(row).to_string())
}

fn int_at(arr: &Int64Array, row: usize, column: &'static str) -> Result<i64, RecordError> {
    if arr.is_null(row) {
        return Err(RecordError::NullValue { column });
    }
    Ok(arr.value(row))
}

fn count_at(arr: &Int64Array, row: usize, column: &'static str) -> Result<u32, RecordError> {
    let value = int_at(arr, row, column)?;
    u32::try_from(value).map_err(|_| RecordError::Negative { column, value })
}
