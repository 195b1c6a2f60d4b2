//! Append-only output sinks
//!
//! The loop hands every diagnostics sample to a `DiagnosticsSink` and, when
//! trajectory recording is on, every tick's body positions to a `TrajectorySink`.
//! Both are best-effort: a failed write is logged by the loop and the physics
//! keeps going.
//!
//! The provided writers emit tab-separated text with a `#` header line, one
//! record per line, ready for gnuplot or numpy.loadtxt.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::simulation::diagnostics::Diagnostics;
use crate::simulation::states::Body;

/// Receives one record per sampling interval, in time order.
pub trait DiagnosticsSink {
    fn record(&mut self, sample: &Diagnostics) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receives every body position every tick, planet first, in stable storage order.
pub trait TrajectorySink {
    fn record(&mut self, t: f64, bodies: &[Body]) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Diagnostics as `t  planetToCentroid  avgDistance  momentum  energy`.
pub struct TsvDiagnosticsWriter<W: Write = BufWriter<File>> {
    out: W,
}

impl TsvDiagnosticsWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(create_file(path.as_ref())?)
    }
}

impl<W: Write> TsvDiagnosticsWriter<W> {
    /// Wrap a writer and emit the header line.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "# t\tplanetToCentroid\tavgDistance\tmomentum\tenergy")?;
        Ok(Self { out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticsSink for TsvDiagnosticsWriter<W> {
    fn record(&mut self, s: &Diagnostics) -> Result<()> {
        writeln!(
            self.out,
            "{}\t{}\t{}\t{}\t{}",
            s.t,
            s.planet_to_centroid,
            s.avg_distance,
            s.momentum_magnitude(),
            s.energy
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Positions as `t  planetX  planetY  bodyX_0  bodyY_0 ...`.
/// The header is written with the first row, once the body count is known.
pub struct TsvTrajectoryWriter<W: Write = BufWriter<File>> {
    out: W,
    header_written: bool,
}

impl TsvTrajectoryWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(create_file(path.as_ref())?))
    }
}

impl<W: Write> TsvTrajectoryWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, header_written: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self, asteroids: usize) -> Result<()> {
        write!(self.out, "# t\tplanetX\tplanetY")?;
        for i in 0..asteroids {
            write!(self.out, "\tbodyX_{i}\tbodyY_{i}")?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> TrajectorySink for TsvTrajectoryWriter<W> {
    fn record(&mut self, t: f64, bodies: &[Body]) -> Result<()> {
        if !self.header_written {
            self.write_header(bodies.len().saturating_sub(1))?;
            self.header_written = true;
        }
        write!(self.out, "{t}")?;
        for b in bodies {
            write!(self.out, "\t{}\t{}", b.pos.x, b.pos.y)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
