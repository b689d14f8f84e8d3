use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const EMPLOYEES: usize = 1470;

/// (department, weight, job roles)
static DEPARTMENTS: [(&str, f64, &[&str]); 3] = [
    (
        "Research & Development",
        0.65,
        &[
            "Research Scientist",
            "Laboratory Technician",
            "Manufacturing Director",
            "Healthcare Representative",
            "Research Director",
            "Manager",
        ],
    ),
    (
        "Sales",
        0.30,
        &["Sales Executive", "Sales Representative", "Manager"],
    ),
    ("Human Resources", 0.05, &["Human Resources", "Manager"]),
];

static EDUCATION_FIELDS: [&str; 6] = [
    "Life Sciences",
    "Medical",
    "Marketing",
    "Technical Degree",
    "Human Resources",
    "Other",
];

/// One output row. `EmployeeNumber` is an extra column the dashboard ignores.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Row {
    employee_number: i64,
    age: i64,
    attrition: &'static str,
    department: &'static str,
    education: i64,
    education_field: &'static str,
    gender: &'static str,
    job_role: &'static str,
    over_time: &'static str,
    total_working_years: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_employee(id: i64, rng: &mut SimpleRng) -> Row {
    let mut roll = rng.next_f64();
    let &(department, _, roles) = DEPARTMENTS
        .iter()
        .find(|(_, weight, _)| {
            roll -= weight;
            roll < 0.0
        })
        .unwrap_or(&DEPARTMENTS[0]);

    let age = rng.gauss(37.0, 9.0).round().clamp(18.0, 60.0) as i64;
    let total_working_years = (rng.next_f64() * (age - 18) as f64).round() as i64;
    let over_time = rng.chance(0.28);

    // Overtime, short careers and youth push attrition up.
    let mut p_leave = 0.08;
    if over_time {
        p_leave += 0.18;
    }
    if total_working_years < 3 {
        p_leave += 0.15;
    }
    if age < 25 {
        p_leave += 0.07;
    }

    Row {
        employee_number: id,
        age,
        attrition: if rng.chance(p_leave) { "Yes" } else { "No" },
        department,
        education: 1 + (rng.next_u64() % 5) as i64,
        education_field: *rng.pick(&EDUCATION_FIELDS),
        gender: if rng.chance(0.6) { "Male" } else { "Female" },
        job_role: *rng.pick(roles),
        over_time: if over_time { "Yes" } else { "No" },
        total_working_years,
    }
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    fn ints(rows: &[Row], f: impl Fn(&Row) -> i64) -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn text(rows: &[Row], f: impl Fn(&Row) -> &'static str) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("EmployeeNumber", DataType::Int64, false),
        Field::new("Age", DataType::Int64, false),
        Field::new("Attrition", DataType::Utf8, false),
        Field::new("Department", DataType::Utf8, false),
        Field::new("Education", DataType::Int64, false),
        Field::new("EducationField", DataType::Utf8, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("JobRole", DataType::Utf8, false),
        Field::new("OverTime", DataType::Utf8, false),
        Field::new("TotalWorkingYears", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            ints(rows, |r| r.employee_number),
            ints(rows, |r| r.age),
            text(rows, |r| r.attrition),
            text(rows, |r| r.department),
            ints(rows, |r| r.education),
            text(rows, |r| r.education_field),
            text(rows, |r| r.gender),
            text(rows, |r| r.job_role),
            text(rows, |r| r.over_time),
            ints(rows, |r| r.total_working_years),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (1..=EMPLOYEES as i64)
        .map(|id| generate_employee(id, &mut rng))
        .collect();

    write_csv(&rows, "HR-Employee-Attrition.csv")?;
    write_parquet(&rows, "HR-Employee-Attrition.parquet")?;

    let leavers = rows.iter().filter(|r| r.attrition == "Yes").count();
    println!(
        "Wrote {} employees ({leavers} leavers) to HR-Employee-Attrition.csv and .parquet",
        rows.len()
    );
    Ok(())
}
