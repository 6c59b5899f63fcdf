//! I/O utilities: exhaustive scenario logging and per-objective league
//! exports.

pub mod csv_writer;
