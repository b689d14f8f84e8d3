/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → EmployeeTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ EmployeeTable │  Vec<EmployeeRecord>, department index
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  department predicate → new EmployeeTable
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
