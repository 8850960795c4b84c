//! Write synthesized expressions to files

mod bench;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use bench::write_bench;

use crate::error::Result;
use crate::logic::{Expressions, Reading};

/// Write expressions to a file
///
/// Files with a .bench extension get a netlist in the given reading; any other file gets the
/// plain listing of the expressions.
pub fn write_expressions_file(path: &Path, exprs: &Expressions, reading: Reading) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    match path.extension() {
        Some(s) if s == "bench" => write_bench(&mut w, exprs, reading)?,
        _ => write!(w, "{}", exprs)?,
    }
    w.flush()?;
    Ok(())
}
